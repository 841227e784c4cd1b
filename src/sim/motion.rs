//! Ballistic motion and wall reflection

use super::kind::KindCounts;
use super::state::{Arena, Entity};
use crate::consts::ENDGAME_SPEED;

/// Speed multiplier for the coming tick.
///
/// With the endgame slowdown enabled, a field down to two kinds crawls at
/// [`ENDGAME_SPEED`] so the final chase stays watchable.
pub fn effective_speed(speed: f32, live: &KindCounts, endgame_slowdown: bool) -> f32 {
    if endgame_slowdown && live.active_kinds() == 2 {
        ENDGAME_SPEED
    } else {
        speed
    }
}

/// Move every entity by `vel * speed` and bounce it off the arena margin.
///
/// Returns the number of wall contacts this tick.
pub fn integrate(entities: &mut [Entity], speed: f32, arena: &Arena, size: f32) -> u32 {
    let (min, max) = arena.bounds(size);
    let mut bounces = 0;

    for entity in entities.iter_mut() {
        entity.pos += entity.vel * speed;

        if reflect_axis(&mut entity.pos.x, &mut entity.vel.x, min.x, max.x) {
            bounces += 1;
        }
        if reflect_axis(&mut entity.pos.y, &mut entity.vel.y, min.y, max.y) {
            bounces += 1;
        }
    }

    bounces
}

/// Clamp one axis into `[lo, hi]`, pointing its velocity back inside.
fn reflect_axis(pos: &mut f32, vel: &mut f32, lo: f32, hi: f32) -> bool {
    if *pos <= lo {
        *pos = lo;
        *vel = vel.abs();
        true
    } else if *pos >= hi {
        *pos = hi;
        *vel = -vel.abs();
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::ENTITY_SIZE;
    use crate::sim::kind::EntityKind;
    use glam::Vec2;
    use proptest::prelude::*;

    fn entity(pos: Vec2, vel: Vec2) -> Entity {
        Entity::new(0, pos, vel, EntityKind::Rock)
    }

    #[test]
    fn test_free_flight() {
        let arena = Arena::new(400.0, 300.0);
        let mut entities = vec![entity(Vec2::new(100.0, 100.0), Vec2::new(1.0, -0.5))];
        let bounces = integrate(&mut entities, 2.0, &arena, ENTITY_SIZE);

        assert_eq!(bounces, 0);
        assert_eq!(entities[0].pos, Vec2::new(102.0, 99.0));
        assert_eq!(entities[0].vel, Vec2::new(1.0, -0.5));
    }

    #[test]
    fn test_reflects_off_far_wall() {
        let arena = Arena::new(400.0, 300.0);
        let mut entities = vec![entity(Vec2::new(384.5, 150.0), Vec2::new(1.0, 0.0))];
        integrate(&mut entities, 1.0, &arena, ENTITY_SIZE);

        assert_eq!(entities[0].pos.x, 385.0);
        assert_eq!(entities[0].vel.x, -1.0);
    }

    #[test]
    fn test_reflects_off_near_wall_corner() {
        let arena = Arena::new(400.0, 300.0);
        let mut entities = vec![entity(Vec2::new(15.5, 16.0), Vec2::new(-1.0, -1.0))];
        let bounces = integrate(&mut entities, 1.0, &arena, ENTITY_SIZE);

        assert_eq!(bounces, 2);
        assert_eq!(entities[0].pos, Vec2::new(15.0, 15.0));
        assert_eq!(entities[0].vel, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_entity_parked_on_wall_moves_away() {
        let arena = Arena::new(400.0, 300.0);
        let mut entities = vec![entity(Vec2::new(15.0, 150.0), Vec2::new(0.5, 0.0))];
        integrate(&mut entities, 1.0, &arena, ENTITY_SIZE);
        integrate(&mut entities, 1.0, &arena, ENTITY_SIZE);

        assert_eq!(entities[0].vel.x, 0.5);
        assert!(entities[0].pos.x > 15.0);
    }

    #[test]
    fn test_endgame_slowdown() {
        let three = KindCounts { rock: 5, paper: 5, scissors: 5 };
        let two = KindCounts { rock: 5, paper: 0, scissors: 5 };
        assert_eq!(effective_speed(3.0, &three, true), 3.0);
        assert_eq!(effective_speed(3.0, &two, true), ENDGAME_SPEED);
        assert_eq!(effective_speed(3.0, &two, false), 3.0);
    }

    proptest! {
        /// Property: entities never leave the margin, whatever the speed
        #[test]
        fn test_boundary_containment(
            width in 60.0f32..1500.0,
            height in 60.0f32..1500.0,
            start in prop::collection::vec((0.0f32..1.0, 0.0f32..1.0, -1.0f32..=1.0, -1.0f32..=1.0), 1..40),
            speed in 0.1f32..=5.0,
            ticks in 1usize..400,
        ) {
            let arena = Arena::new(width, height);
            let (min, max) = arena.bounds(ENTITY_SIZE);
            let mut entities: Vec<Entity> = start
                .iter()
                .map(|&(fx, fy, vx, vy)| {
                    let pos = min + (max - min) * Vec2::new(fx, fy);
                    entity(pos, Vec2::new(vx, vy))
                })
                .collect();

            for _ in 0..ticks {
                integrate(&mut entities, speed, &arena, ENTITY_SIZE);
                for e in &entities {
                    prop_assert!(e.pos.x >= ENTITY_SIZE / 2.0 && e.pos.x <= width - ENTITY_SIZE / 2.0);
                    prop_assert!(e.pos.y >= ENTITY_SIZE / 2.0 && e.pos.y <= height - ENTITY_SIZE / 2.0);
                }
            }
        }
    }
}
