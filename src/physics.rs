// src/physics.rs
//! Rapier-backed physics world.
//!
//! Owns the whole Rapier pipeline and exposes exactly the surface the vehicle
//! layer consumes: spawning the sphere proxy and static terrain, stepping,
//! downward raycasts with surface normals, and body control (continuous
//! acceleration, velocity-change impulses, velocity/position read-write).
//!
//! Public math is `glam`; nalgebra appears only at the Rapier boundary.

use glam::{Quat, Vec3};
use nalgebra::vector;
use rapier3d::prelude::*;

/// Result of a downward ray query.
#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    /// Distance from the ray origin to the hit point.
    pub distance: f32,
    /// Surface normal at the hit point.
    pub normal: Vec3,
    /// World-space hit point.
    pub point: Vec3,
}

/// Top-level physics container.
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    pipeline: PhysicsPipeline,
    integration_params: IntegrationParameters,
    islands: IslandManager,
    broad_phase: BroadPhase,
    narrow_phase: NarrowPhase,
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
}

impl PhysicsWorld {
    pub fn new(gravity: Vec3) -> Self {
        Self {
            gravity: vector![gravity.x as Real, gravity.y as Real, gravity.z as Real],
            pipeline: PhysicsPipeline::new(),
            integration_params: IntegrationParameters::default(),
            islands: IslandManager::new(),
            broad_phase: BroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// World gravity vector (the vehicle layer scales this itself; proxies are
    /// spawned with gravity scale zero).
    pub fn gravity(&self) -> Vec3 {
        to_glam(&self.gravity)
    }

    /// Step the simulation by `dt` seconds.
    ///
    /// User forces accumulated since the last step are consumed by this step
    /// and cleared afterwards, so a force applied every tick behaves as a
    /// continuous force and a force applied once acts for one tick only.
    pub fn step(&mut self, dt: f32) {
        self.integration_params.dt = dt as Real;

        self.pipeline.step(
            &self.gravity,
            &self.integration_params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );

        for (_, body) in self.bodies.iter_mut() {
            body.reset_forces(false);
        }
    }

    /// Refresh the query structures without stepping. Needed before the first
    /// raycast when no step has run yet.
    pub fn update_queries(&mut self) {
        self.query_pipeline.update(&self.bodies, &self.colliders);
    }

    // -------------------------------------------------------------------------
    // Spawning
    // -------------------------------------------------------------------------

    /// Static cuboid terrain piece (half extents).
    pub fn spawn_fixed_cuboid(&mut self, position: Vec3, half_extents: Vec3) -> RigidBodyHandle {
        let body = RigidBodyBuilder::fixed()
            .translation(vector![position.x as Real, position.y as Real, position.z as Real])
            .build();
        let collider = ColliderBuilder::cuboid(
            half_extents.x as Real,
            half_extents.y as Real,
            half_extents.z as Real,
        )
        .build();
        let handle = self.bodies.insert(body);
        self.colliders.insert_with_parent(collider, handle, &mut self.bodies);
        handle
    }

    /// Dynamic ball used as a vehicle collision proxy.
    ///
    /// Engine gravity and intrinsic damping are disabled at spawn; both are
    /// simulated by the vehicle controller instead.
    pub fn spawn_vehicle_proxy(&mut self, position: Vec3, radius: f32) -> RigidBodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .translation(vector![position.x as Real, position.y as Real, position.z as Real])
            .gravity_scale(0.0)
            .linear_damping(0.0)
            .lock_rotations()
            .build();
        let collider = ColliderBuilder::ball(radius as Real).build();
        let handle = self.bodies.insert(body);
        self.colliders.insert_with_parent(collider, handle, &mut self.bodies);
        handle
    }

    pub fn contains(&self, handle: RigidBodyHandle) -> bool {
        self.bodies.get(handle).is_some()
    }

    /// Re-assert that a body is fully script-driven: no engine gravity, no
    /// intrinsic damping.
    pub fn disable_gravity_and_damping(&mut self, handle: RigidBodyHandle) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.set_gravity_scale(0.0, false);
            body.set_linear_damping(0.0);
        }
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Cast a ray straight down from `origin`, at most `max_distance`,
    /// ignoring `exclude` (typically the caster's own proxy).
    pub fn raycast_down(
        &self,
        origin: Vec3,
        max_distance: f32,
        exclude: Option<RigidBodyHandle>,
    ) -> Option<RayHit> {
        let ray = Ray::new(
            nalgebra::point![origin.x as Real, origin.y as Real, origin.z as Real],
            vector![0.0, -1.0, 0.0],
        );
        let mut filter = QueryFilter::default();
        if let Some(handle) = exclude {
            filter = filter.exclude_rigid_body(handle);
        }

        self.query_pipeline
            .cast_ray_and_get_normal(
                &self.bodies,
                &self.colliders,
                &ray,
                max_distance as Real,
                true,
                filter,
            )
            .map(|(_, hit)| RayHit {
                distance: hit.toi as f32,
                normal: to_glam(&hit.normal),
                point: {
                    let p = ray.point_at(hit.toi);
                    Vec3::new(p.x as f32, p.y as f32, p.z as f32)
                },
            })
    }

    // -------------------------------------------------------------------------
    // Body control
    // -------------------------------------------------------------------------

    /// Apply a continuous acceleration for the upcoming step (mass-independent,
    /// internally scaled to a force).
    pub fn apply_acceleration(&mut self, handle: RigidBodyHandle, accel: Vec3) {
        if let Some(body) = self.bodies.get_mut(handle) {
            let force = accel * body.mass() as f32;
            body.add_force(vector![force.x as Real, force.y as Real, force.z as Real], true);
        }
    }

    /// Apply an instantaneous velocity change (mass-independent impulse).
    pub fn apply_velocity_change(&mut self, handle: RigidBodyHandle, delta_v: Vec3) {
        if let Some(body) = self.bodies.get_mut(handle) {
            let v = to_glam(body.linvel()) + delta_v;
            body.set_linvel(vector![v.x as Real, v.y as Real, v.z as Real], true);
        }
    }

    pub fn linear_velocity(&self, handle: RigidBodyHandle) -> Vec3 {
        self.bodies.get(handle).map(|b| to_glam(b.linvel())).unwrap_or(Vec3::ZERO)
    }

    pub fn set_linear_velocity(&mut self, handle: RigidBodyHandle, velocity: Vec3) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.set_linvel(
                vector![velocity.x as Real, velocity.y as Real, velocity.z as Real],
                true,
            );
        }
    }

    pub fn position(&self, handle: RigidBodyHandle) -> Vec3 {
        self.bodies
            .get(handle)
            .map(|b| to_glam(b.translation()))
            .unwrap_or(Vec3::ZERO)
    }

    pub fn set_position(&mut self, handle: RigidBodyHandle, position: Vec3) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.set_translation(
                vector![position.x as Real, position.y as Real, position.z as Real],
                true,
            );
        }
    }

    pub fn rotation(&self, handle: RigidBodyHandle) -> Quat {
        self.bodies
            .get(handle)
            .map(|b| {
                let r = b.rotation();
                Quat::from_xyzw(r.i as f32, r.j as f32, r.k as f32, r.w as f32)
            })
            .unwrap_or(Quat::IDENTITY)
    }

    pub fn mass(&self, handle: RigidBodyHandle) -> f32 {
        self.bodies.get(handle).map(|b| b.mass() as f32).unwrap_or(0.0)
    }
}

#[inline]
fn to_glam(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x as f32, v.y as f32, v.z as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn flat_world() -> PhysicsWorld {
        let mut world = PhysicsWorld::new(Vec3::new(0.0, -9.81, 0.0));
        // 100x1x100 slab whose top face sits at y = 0.
        world.spawn_fixed_cuboid(Vec3::new(0.0, -0.5, 0.0), Vec3::new(50.0, 0.5, 50.0));
        world
    }

    #[test]
    fn raycast_down_reports_distance_and_normal() {
        let mut world = flat_world();
        world.update_queries();

        let hit = world.raycast_down(Vec3::new(0.0, 2.0, 0.0), 5.0, None).unwrap();
        assert_relative_eq!(hit.distance, 2.0, epsilon = 1e-3);
        assert_relative_eq!(hit.normal.y, 1.0, epsilon = 1e-3);
        assert_relative_eq!(hit.point.y, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn raycast_down_misses_beyond_range() {
        let mut world = flat_world();
        world.update_queries();

        assert!(world.raycast_down(Vec3::new(0.0, 10.0, 0.0), 5.0, None).is_none());
    }

    #[test]
    fn raycast_excludes_own_proxy() {
        let mut world = flat_world();
        let proxy = world.spawn_vehicle_proxy(Vec3::new(0.0, 1.0, 0.0), 0.5);
        world.update_queries();

        // Casting from the proxy center would otherwise hit its own collider.
        let hit = world
            .raycast_down(Vec3::new(0.0, 1.0, 0.0), 5.0, Some(proxy))
            .unwrap();
        assert_relative_eq!(hit.distance, 1.0, epsilon = 1e-3);
    }

    #[test]
    fn proxy_ignores_world_gravity() {
        let mut world = flat_world();
        let proxy = world.spawn_vehicle_proxy(Vec3::new(0.0, 10.0, 0.0), 0.5);

        for _ in 0..10 {
            world.step(0.02);
        }
        assert_relative_eq!(world.linear_velocity(proxy).y, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn acceleration_integrates_mass_independently() {
        let mut world = flat_world();
        let proxy = world.spawn_vehicle_proxy(Vec3::new(0.0, 10.0, 0.0), 0.5);

        world.apply_acceleration(proxy, Vec3::new(0.0, 0.0, 10.0));
        world.step(0.02);
        assert_relative_eq!(world.linear_velocity(proxy).z, 0.2, epsilon = 1e-4);

        // The force does not persist into the next step.
        world.step(0.02);
        assert_relative_eq!(world.linear_velocity(proxy).z, 0.2, epsilon = 1e-4);
    }

    #[test]
    fn velocity_change_is_instantaneous() {
        let mut world = flat_world();
        let proxy = world.spawn_vehicle_proxy(Vec3::new(0.0, 10.0, 0.0), 0.5);

        world.apply_velocity_change(proxy, Vec3::new(0.0, 3.0, 0.0));
        assert_relative_eq!(world.linear_velocity(proxy).y, 3.0, epsilon = 1e-6);
    }
}
