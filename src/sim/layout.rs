//! Initial entity placement for a round

use glam::Vec2;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::kind::EntityKind;
use super::state::{Arena, Entity};
use crate::consts::VELOCITY_SCALE;

/// How a round's population is spread over the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LayoutPolicy {
    /// Independent uniform positions, kinds spawned in blocks
    Uniform,
    /// Shuffled kinds on a jittered grid; no large empty regions
    #[default]
    GridJittered,
}

impl LayoutPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutPolicy::Uniform => "uniform",
            LayoutPolicy::GridJittered => "grid",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "uniform" | "random" => Some(LayoutPolicy::Uniform),
            "grid" | "grid_jittered" | "jittered" => Some(LayoutPolicy::GridJittered),
            _ => None,
        }
    }
}

/// Produce `3 * per_kind` entities for a fresh round.
///
/// Ids run from 0 in spawn order. A degenerate arena yields an empty
/// population instead of failing.
pub fn generate_entities<R: Rng + ?Sized>(
    arena: Arena,
    per_kind: u32,
    size: f32,
    policy: LayoutPolicy,
    rng: &mut R,
) -> Vec<Entity> {
    if arena.is_degenerate() {
        log::warn!(
            "Arena {}x{} not measured yet, spawning nothing",
            arena.width,
            arena.height
        );
        return Vec::new();
    }

    let entities = match policy {
        LayoutPolicy::Uniform => uniform(arena, per_kind, size, rng),
        LayoutPolicy::GridJittered => grid_jittered(arena, per_kind, size, rng),
    };
    log::debug!(
        "Laid out {} entities in {}x{} ({})",
        entities.len(),
        arena.width,
        arena.height,
        policy.as_str()
    );
    entities
}

fn uniform<R: Rng + ?Sized>(arena: Arena, per_kind: u32, size: f32, rng: &mut R) -> Vec<Entity> {
    let span_x = (arena.width - size).max(0.0);
    let span_y = (arena.height - size).max(0.0);
    let half = size / 2.0;
    let (min, max) = arena.bounds(size);

    let mut entities = Vec::with_capacity(per_kind as usize * EntityKind::ALL.len());
    let mut id = 0;
    for kind in EntityKind::ALL {
        for _ in 0..per_kind {
            let pos = Vec2::new(
                rng.random::<f32>() * span_x + half,
                rng.random::<f32>() * span_y + half,
            )
            .clamp(min, max);
            entities.push(Entity::new(id, pos, random_velocity(rng), kind));
            id += 1;
        }
    }
    entities
}

/// Grid dimensions `(rows, cols)` holding `count` cells with the arena's aspect
pub fn grid_shape(arena: Arena, count: u32) -> (u32, u32) {
    if count == 0 || arena.is_degenerate() {
        return (0, 0);
    }
    let aspect = arena.width / arena.height;
    let rows = ((count as f32 / aspect).sqrt().ceil() as u32).max(1);
    let cols = count.div_ceil(rows);
    (rows, cols)
}

fn grid_jittered<R: Rng + ?Sized>(
    arena: Arena,
    per_kind: u32,
    size: f32,
    rng: &mut R,
) -> Vec<Entity> {
    let count = per_kind * EntityKind::ALL.len() as u32;
    let (rows, cols) = grid_shape(arena, count);
    if rows == 0 {
        return Vec::new();
    }

    let mut kinds: Vec<EntityKind> = EntityKind::ALL
        .iter()
        .flat_map(|&k| std::iter::repeat_n(k, per_kind as usize))
        .collect();
    kinds.shuffle(rng);

    let cell = Vec2::new(arena.width / cols as f32, arena.height / rows as f32);
    let jitter = (cell - Vec2::splat(size)).max(Vec2::ZERO);
    let (min, max) = arena.bounds(size);

    kinds
        .into_iter()
        .enumerate()
        .map(|(i, kind)| {
            let i = i as u32;
            let center = Vec2::new(
                ((i % cols) as f32 + 0.5) * cell.x,
                ((i / cols) as f32 + 0.5) * cell.y,
            );
            let offset = Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5) * jitter;
            let pos = (center + offset).clamp(min, max);
            Entity::new(i, pos, random_velocity(rng), kind)
        })
        .collect()
}

fn random_velocity<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    Vec2::new(
        rng.random_range(-1.0..=1.0),
        rng.random_range(-1.0..=1.0),
    ) * VELOCITY_SCALE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{ENTITY_COUNT_PER_TYPE, ENTITY_SIZE};
    use crate::sim::kind::KindCounts;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::collections::HashSet;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(42)
    }

    #[test]
    fn test_default_population() {
        for policy in [LayoutPolicy::Uniform, LayoutPolicy::GridJittered] {
            let entities = generate_entities(
                Arena::new(1020.0, 720.0),
                ENTITY_COUNT_PER_TYPE,
                ENTITY_SIZE,
                policy,
                &mut rng(),
            );
            assert_eq!(entities.len(), 90);
            let counts = KindCounts::tally(entities.iter().map(|e| e.kind));
            assert_eq!(counts, KindCounts { rock: 30, paper: 30, scissors: 30 });

            let ids: HashSet<u32> = entities.iter().map(|e| e.id).collect();
            assert_eq!(ids.len(), entities.len());
        }
    }

    #[test]
    fn test_uniform_spawns_kinds_in_blocks() {
        let entities = generate_entities(
            Arena::new(800.0, 600.0),
            3,
            ENTITY_SIZE,
            LayoutPolicy::Uniform,
            &mut rng(),
        );
        let kinds: Vec<EntityKind> = entities.iter().map(|e| e.kind).collect();
        use EntityKind::*;
        assert_eq!(kinds, vec![Rock, Rock, Rock, Paper, Paper, Paper, Scissors, Scissors, Scissors]);
    }

    #[test]
    fn test_degenerate_arena_is_empty() {
        for arena in [Arena::new(0.0, 500.0), Arena::new(500.0, -1.0), Arena::new(-20.0, 0.0)] {
            for policy in [LayoutPolicy::Uniform, LayoutPolicy::GridJittered] {
                assert!(generate_entities(arena, 30, ENTITY_SIZE, policy, &mut rng()).is_empty());
            }
        }
    }

    #[test]
    fn test_grid_shape_fits_population() {
        let (rows, cols) = grid_shape(Arena::new(1020.0, 720.0), 90);
        assert_eq!((rows, cols), (8, 12));
        assert!(rows * cols >= 90);

        // Tall arena gets more rows than columns
        let (rows, cols) = grid_shape(Arena::new(300.0, 1200.0), 90);
        assert!(rows > cols);
        assert!(rows * cols >= 90);
    }

    #[test]
    fn test_grid_mixes_kinds_and_keeps_cells() {
        let arena = Arena::new(1020.0, 720.0);
        let entities = generate_entities(
            arena,
            ENTITY_COUNT_PER_TYPE,
            ENTITY_SIZE,
            LayoutPolicy::GridJittered,
            &mut Pcg32::seed_from_u64(1),
        );

        // Shuffled labels never come out in Rock/Paper/Scissors blocks
        let blocks: Vec<EntityKind> = EntityKind::ALL
            .iter()
            .flat_map(|&k| std::iter::repeat_n(k, ENTITY_COUNT_PER_TYPE as usize))
            .collect();
        let kinds: Vec<EntityKind> = entities.iter().map(|e| e.kind).collect();
        assert_ne!(kinds, blocks);

        // Entity i sits in cell i, row-major
        let (rows, cols) = grid_shape(arena, entities.len() as u32);
        let cell = Vec2::new(arena.width / cols as f32, arena.height / rows as f32);
        assert!(cell.cmpge(Vec2::splat(ENTITY_SIZE)).all());
        for (i, e) in entities.iter().enumerate() {
            let i = i as u32;
            let lo = Vec2::new((i % cols) as f32 * cell.x, (i / cols) as f32 * cell.y);
            let hi = lo + cell;
            assert!(
                e.pos.cmpge(lo).all() && e.pos.cmple(hi).all(),
                "entity {} at {:?} outside cell {:?}..{:?}",
                i,
                e.pos,
                lo,
                hi
            );
        }
    }

    #[test]
    fn test_velocity_in_unit_square() {
        let entities = generate_entities(
            Arena::new(1000.0, 1000.0),
            30,
            ENTITY_SIZE,
            LayoutPolicy::GridJittered,
            &mut rng(),
        );
        assert!(
            entities
                .iter()
                .all(|e| e.vel.x.abs() <= VELOCITY_SCALE && e.vel.y.abs() <= VELOCITY_SCALE)
        );
    }

    #[test]
    fn test_same_seed_same_layout() {
        let arena = Arena::new(640.0, 480.0);
        let a = generate_entities(arena, 30, ENTITY_SIZE, LayoutPolicy::GridJittered, &mut rng());
        let b = generate_entities(arena, 30, ENTITY_SIZE, LayoutPolicy::GridJittered, &mut rng());
        assert_eq!(a, b);
    }

    #[test]
    fn test_policy_names() {
        assert_eq!(LayoutPolicy::from_str("Grid"), Some(LayoutPolicy::GridJittered));
        assert_eq!(LayoutPolicy::from_str("uniform"), Some(LayoutPolicy::Uniform));
        assert_eq!(LayoutPolicy::from_str("spiral"), None);
    }

    proptest! {
        /// Property: every valid arena gets exactly K of each kind, all inside the margin
        #[test]
        fn test_population_invariant(
            width in 60.0f32..2000.0,
            height in 60.0f32..2000.0,
            per_kind in 1u32..60,
            grid in any::<bool>(),
            seed in any::<u64>(),
        ) {
            let policy = if grid { LayoutPolicy::GridJittered } else { LayoutPolicy::Uniform };
            let arena = Arena::new(width, height);
            let mut rng = Pcg32::seed_from_u64(seed);
            let entities = generate_entities(arena, per_kind, ENTITY_SIZE, policy, &mut rng);

            prop_assert_eq!(entities.len(), 3 * per_kind as usize);
            let counts = KindCounts::tally(entities.iter().map(|e| e.kind));
            for kind in EntityKind::ALL {
                prop_assert_eq!(counts.get(kind), per_kind);
            }
            for e in &entities {
                prop_assert!(arena.contains(e.pos, ENTITY_SIZE), "{:?} outside {:?}", e.pos, arena);
            }
        }
    }
}
