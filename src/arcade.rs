//! A small kinematic integrator standing in for the engine's arcade physics.
//!
//! The game core never moves bodies by velocity itself; it writes velocities and flags and
//! expects something to integrate them and report contacts. This is that something for the
//! headless runner and the end-to-end tests.

use bevy_ecs::{query::Has, world::World};
use glam::Vec2;
use tracing::trace;

use crate::constants::{player, world};
use crate::geometry::Aabb;
use crate::systems::components::{Body, Collides, Contacts, PhysicsPaused, Solid};

/// Distance of the contact probes from each side of a body.
const PROBE: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcadePhysics {
    pub gravity: f32,
    /// Lowest y a colliding body's feet can reach.
    pub bottom: f32,
}

impl Default for ArcadePhysics {
    fn default() -> Self {
        Self {
            gravity: player::GRAVITY,
            bottom: world::WORLD_BOTTOM,
        }
    }
}

impl ArcadePhysics {
    /// Integrates every movable body by `dt` seconds and refreshes contact flags.
    ///
    /// Does nothing while [`PhysicsPaused`] is set.
    pub fn step(&self, world: &mut World, dt: f32) {
        if world.get_resource::<PhysicsPaused>().is_some_and(|paused| paused.0) {
            return;
        }

        let solids: Vec<Aabb> = world.query::<&Solid>().iter(world).map(|solid| solid.0).collect();

        let mut bodies = world.query::<(&mut Body, Option<&mut Contacts>, Has<Collides>)>();
        for (mut body, contacts, collides) in bodies.iter_mut(world) {
            if body.immovable {
                continue;
            }

            if body.gravity {
                body.velocity.y += self.gravity * dt;
            }

            let delta = body.velocity * dt;
            if !collides {
                body.position += delta;
                continue;
            }

            body.position.x += delta.x;
            self.resolve_x(&mut body, &solids, delta.x);
            body.position.y += delta.y;
            self.resolve_y(&mut body, &solids, delta.y);
            self.clamp_to_bounds(&mut body);

            if let Some(mut contacts) = contacts {
                let probed = self.probe(&body, &solids);
                if *contacts != probed {
                    trace!(?probed, "Contacts changed");
                    *contacts = probed;
                }
            }
        }
    }

    fn resolve_x(&self, body: &mut Body, solids: &[Aabb], moved: f32) {
        if moved == 0.0 {
            return;
        }

        for solid in solids {
            let aabb = body.aabb();
            if !aabb.overlaps(solid) {
                continue;
            }

            let correction = if moved > 0.0 {
                solid.min.x - aabb.max.x
            } else {
                solid.max.x - aabb.min.x
            };
            body.position.x += correction;
            body.velocity.x = 0.0;
        }
    }

    fn resolve_y(&self, body: &mut Body, solids: &[Aabb], moved: f32) {
        for solid in solids {
            let aabb = body.aabb();
            if !aabb.overlaps(solid) {
                continue;
            }

            // Anything not clearly moving up lands on top
            let correction = if moved < 0.0 {
                solid.max.y - aabb.min.y
            } else {
                solid.min.y - aabb.max.y
            };
            body.position.y += correction;
            body.velocity.y = 0.0;
        }
    }

    fn clamp_to_bounds(&self, body: &mut Body) {
        let aabb = body.aabb();
        if aabb.min.x < 0.0 {
            body.position.x -= aabb.min.x;
            body.velocity.x = body.velocity.x.max(0.0);
        }
        if aabb.max.y > self.bottom {
            body.position.y -= aabb.max.y - self.bottom;
            body.velocity.y = body.velocity.y.min(0.0);
        }
    }

    /// Which sides of the body have a solid (or the world edge) within one probe distance.
    pub fn probe(&self, body: &Body, solids: &[Aabb]) -> Contacts {
        let aabb = body.aabb();
        let touches = |offset: Vec2| solids.iter().any(|solid| aabb.translated(offset).overlaps(solid));

        let mut contacts = Contacts::empty();
        if touches(Vec2::new(0.0, PROBE)) || aabb.max.y >= self.bottom {
            contacts |= Contacts::DOWN;
        }
        if touches(Vec2::new(-PROBE, 0.0)) || aabb.min.x <= 0.0 {
            contacts |= Contacts::LEFT;
        }
        if touches(Vec2::new(PROBE, 0.0)) {
            contacts |= Contacts::RIGHT;
        }
        contacts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::components::{Origin, PlayerBundle};

    fn floor(world: &mut World, top: f32) {
        world.spawn(Solid(Aabb::new(Vec2::new(0.0, top), Vec2::new(1000.0, world::FLOOR_Y))));
    }

    #[test]
    fn test_lands_on_solid() {
        let mut world = World::new();
        floor(&mut world, 500.0);
        let player = world.spawn(PlayerBundle::at(Vec2::new(100.0, 490.0))).id();

        let physics = ArcadePhysics::default();
        for _ in 0..60 {
            physics.step(&mut world, 1.0 / 60.0);
        }

        let body = world.get::<Body>(player).unwrap();
        assert!((body.position.y - 500.0).abs() < 1e-3);
        assert!(world.get::<Contacts>(player).unwrap().grounded());
    }

    #[test]
    fn test_wall_contact() {
        let mut world = World::new();
        floor(&mut world, 500.0);
        world.spawn(Solid(Aabb::new(Vec2::new(200.0, 300.0), Vec2::new(300.0, world::FLOOR_Y))));
        let player = world.spawn(PlayerBundle::at(Vec2::new(180.0, 500.0))).id();
        world.get_mut::<Body>(player).unwrap().velocity.x = 160.0;

        let physics = ArcadePhysics::default();
        for _ in 0..10 {
            physics.step(&mut world, 1.0 / 60.0);
        }

        let body = world.get::<Body>(player).unwrap();
        assert!((body.aabb().max.x - 200.0).abs() < 1e-3);
        assert!(world.get::<Contacts>(player).unwrap().contains(Contacts::RIGHT));
    }

    #[test]
    fn test_paused_world_does_not_move() {
        let mut world = World::new();
        world.insert_resource(PhysicsPaused(true));
        let entity = world.spawn(Body::new(Vec2::new(10.0, 10.0), Vec2::splat(4.0), Origin::Center)).id();

        ArcadePhysics::default().step(&mut world, 0.5);

        assert_eq!(world.get::<Body>(entity).unwrap().position, Vec2::new(10.0, 10.0));
    }
}
