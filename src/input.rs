// src/input.rs
//! Input abstraction for vehicle control.
//!
//! The controller only ever sees [`InputSource`]: a 2-axis move vector and a
//! boolean action flag, latest-sampled-value semantics, queried once per fixed
//! tick. Concrete backends are injected at construction; nothing in the core
//! depends on a particular platform input system.

use std::sync::Arc;

use glam::Vec2;
use parking_lot::Mutex;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Capability the controller polls every fixed tick.
///
/// `move_xy` is approximately `[-1, 1]` per axis (x = steer, y = throttle),
/// `is_action` is the jump button. No buffering: callers get whatever was most
/// recently sampled.
pub trait InputSource: Send + Sync {
    fn move_xy(&self) -> Vec2;
    fn is_action(&self) -> bool;
}

#[derive(Debug, Default, Clone, Copy)]
struct InputState {
    move_xy: Vec2,
    action: bool,
}

/// Latest-value input store, shared between a producer (window event loop,
/// gamepad poller, test script) and the consuming controller.
///
/// Clone an `Arc<SampledInput>` into both sides; the producer writes through
/// the setters, the controller reads through [`InputSource`].
#[derive(Default)]
pub struct SampledInput {
    state: Mutex<InputState>,
}

impl SampledInput {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_move(&self, x: f32, y: f32) {
        self.state.lock().move_xy = Vec2::new(x, y);
    }

    pub fn set_action(&self, pressed: bool) {
        self.state.lock().action = pressed;
    }
}

impl InputSource for SampledInput {
    fn move_xy(&self) -> Vec2 {
        self.state.lock().move_xy
    }

    fn is_action(&self) -> bool {
        self.state.lock().action
    }
}

/// Key assignments for the keyboard backend.
#[derive(Debug, Clone, Copy)]
pub struct KeyBindings {
    pub forward: KeyCode,
    pub reverse: KeyCode,
    pub left: KeyCode,
    pub right: KeyCode,
    pub action: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: KeyCode::KeyW,
            reverse: KeyCode::KeyS,
            left: KeyCode::KeyA,
            right: KeyCode::KeyD,
            action: KeyCode::Space,
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Held {
    forward: bool,
    reverse: bool,
    left: bool,
    right: bool,
    action: bool,
}

/// Keyboard backend: ingests winit window events and writes composite
/// negative/positive key axes into a shared [`SampledInput`].
pub struct Keyboard {
    bindings: KeyBindings,
    sample: Arc<SampledInput>,
    held: Held,
}

impl Keyboard {
    pub fn new(sample: Arc<SampledInput>) -> Self {
        Self::with_bindings(sample, KeyBindings::default())
    }

    pub fn with_bindings(sample: Arc<SampledInput>, bindings: KeyBindings) -> Self {
        Self { bindings, sample, held: Held::default() }
    }

    /// Feed one window event. Call from the event loop; non-keyboard events
    /// are ignored.
    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        let WindowEvent::KeyboardInput { event, .. } = event else {
            return;
        };
        if event.repeat {
            return;
        }
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        self.apply_key(code, event.state == ElementState::Pressed);
    }

    fn apply_key(&mut self, code: KeyCode, pressed: bool) {
        let b = self.bindings;
        if code == b.forward {
            self.held.forward = pressed;
        } else if code == b.reverse {
            self.held.reverse = pressed;
        } else if code == b.left {
            self.held.left = pressed;
        } else if code == b.right {
            self.held.right = pressed;
        } else if code == b.action {
            self.held.action = pressed;
        } else {
            return;
        }

        let x = (self.held.right as i8 - self.held.left as i8) as f32;
        let y = (self.held.forward as i8 - self.held.reverse as i8) as f32;
        self.sample.set_move(x, y);
        self.sample.set_action(self.held.action);
    }
}
