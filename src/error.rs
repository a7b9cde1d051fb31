// src/error.rs
//! Error handling for the crate.
//!
//! Failures here are assembly/configuration problems surfaced at construction
//! time; a mis-wired vehicle cannot physically function, so nothing degrades
//! gracefully at runtime. Raycast misses are not errors (they mean airborne).

use thiserror::Error;

/// Main error type — lightweight, Send + Sync + 'static.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The rigid-body handle given to a controller does not exist in the
    /// physics world.
    #[error("rigid body handle not present in the physics world")]
    MissingBody,

    /// A required rig part was not bound at construction.
    #[error("vehicle rig is missing required part `{0}`")]
    MissingPart(&'static str),

    /// A configuration value is outside its tuning range.
    #[error("configuration error: {0}")]
    Config(String),

    /// JSON (de)serialization of a configuration file.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error message.
    #[inline]
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    // === Kind checks ===
    #[inline]
    pub fn is_config(&self) -> bool {
        matches!(self, Error::Config(_))
    }

    #[inline]
    pub fn is_assembly(&self) -> bool {
        matches!(self, Error::MissingBody | Error::MissingPart(_))
    }
}

/// Convenient `Result` alias — use `crate::Result<T>` everywhere.
pub type Result<T> = std::result::Result<T, Error>;
