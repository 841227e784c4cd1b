//! Pairwise contact detection and rock-paper-scissors conversion
//!
//! Populations are small (90 at round start), so an all-pairs scan is used
//! rather than a spatial index.
//!
//! Resolution order is observable. Contacts are gathered from a read-only pass
//! over positions, then applied in ascending `(i, j)` order against the
//! *current* kinds, so an entity converted by an earlier contact this tick
//! fights its later contacts with its new kind. Positions do not move during
//! resolution, which makes this identical to resolving inside a nested loop.

use super::kind::duel;
use super::state::Entity;

/// Outcome counters for one collision pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// Overlapping pairs found
    pub contacts: u32,
    /// Pairs whose loser changed kind
    pub conversions: u32,
}

/// Index pairs `(i, j)`, `i < j`, whose centres are closer than `size`
pub fn find_contacts(entities: &[Entity], size: f32) -> Vec<(usize, usize)> {
    let reach_sq = size * size;
    let mut contacts = Vec::new();
    for (i, a) in entities.iter().enumerate() {
        for (j, b) in entities.iter().enumerate().skip(i + 1) {
            if a.pos.distance_squared(b.pos) < reach_sq {
                contacts.push((i, j));
            }
        }
    }
    contacts
}

/// Apply conversions and velocity swaps for the given contacts, in order.
///
/// Pairs that are not `i < j < len` are skipped.
pub fn resolve_contacts(entities: &mut [Entity], contacts: &[(usize, usize)]) -> CollisionReport {
    let mut report = CollisionReport::default();

    for &(i, j) in contacts {
        if i >= j || j >= entities.len() {
            log::warn!("Skipping invalid contact ({}, {}) among {} entities", i, j, entities.len());
            continue;
        }
        let (head, tail) = entities.split_at_mut(j);
        let (a, b) = (&mut head[i], &mut tail[0]);
        report.contacts += 1;

        if let Some(winner) = duel(a.kind, b.kind) {
            a.kind = winner;
            b.kind = winner;
            report.conversions += 1;
        }

        // Simplified elastic response: trade velocities outright
        std::mem::swap(&mut a.vel, &mut b.vel);
    }

    report
}

/// Detect and resolve every contact in the population
pub fn resolve_collisions(entities: &mut [Entity], size: f32) -> CollisionReport {
    let contacts = find_contacts(entities, size);
    resolve_contacts(entities, &contacts)
}
