//! Entity kinds and the rock-paper-scissors dominance rule

use std::fmt;

use serde::{Deserialize, Serialize};

/// The three fixed entity kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Rock,
    Paper,
    Scissors,
}

impl EntityKind {
    /// All kinds in canonical order (also the Uniform layout's spawn order)
    pub const ALL: [EntityKind; 3] = [EntityKind::Rock, EntityKind::Paper, EntityKind::Scissors];

    /// The kind this one converts on contact
    pub fn prey(self) -> EntityKind {
        match self {
            EntityKind::Rock => EntityKind::Scissors,
            EntityKind::Scissors => EntityKind::Paper,
            EntityKind::Paper => EntityKind::Rock,
        }
    }

    #[inline]
    pub fn beats(self, other: EntityKind) -> bool {
        self.prey() == other
    }

    /// Glyph drawn for this kind
    pub fn emoji(self) -> &'static str {
        match self {
            EntityKind::Rock => "🪨",
            EntityKind::Paper => "📄",
            EntityKind::Scissors => "✂️",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Rock => "rock",
            EntityKind::Paper => "paper",
            EntityKind::Scissors => "scissors",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.emoji(), self.as_str())
    }
}

/// Winner of a contact between two kinds, `None` when they match
pub fn duel(a: EntityKind, b: EntityKind) -> Option<EntityKind> {
    if a == b {
        None
    } else if a.beats(b) {
        Some(a)
    } else {
        Some(b)
    }
}

/// Per-kind tally, used both for live counts and round wins
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindCounts {
    pub rock: u32,
    pub paper: u32,
    pub scissors: u32,
}

impl KindCounts {
    pub fn get(&self, kind: EntityKind) -> u32 {
        match kind {
            EntityKind::Rock => self.rock,
            EntityKind::Paper => self.paper,
            EntityKind::Scissors => self.scissors,
        }
    }

    pub fn get_mut(&mut self, kind: EntityKind) -> &mut u32 {
        match kind {
            EntityKind::Rock => &mut self.rock,
            EntityKind::Paper => &mut self.paper,
            EntityKind::Scissors => &mut self.scissors,
        }
    }

    /// Increment a kind's count and return the new value
    pub fn increment(&mut self, kind: EntityKind) -> u32 {
        let count = self.get_mut(kind);
        *count += 1;
        *count
    }

    pub fn total(&self) -> u32 {
        self.rock + self.paper + self.scissors
    }

    /// Number of kinds with a non-zero count
    pub fn active_kinds(&self) -> usize {
        EntityKind::ALL.iter().filter(|&&k| self.get(k) > 0).count()
    }

    /// The kind holding the entire tally, if any.
    ///
    /// An empty tally satisfies `count == total` for every kind, so the
    /// `total > 0` check is what keeps an emptied population from naming a winner.
    pub fn sole_survivor(&self) -> Option<EntityKind> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        EntityKind::ALL.into_iter().find(|&k| self.get(k) == total)
    }

    /// The first kind at or above `target`
    pub fn first_to(&self, target: u32) -> Option<EntityKind> {
        EntityKind::ALL.into_iter().find(|&k| self.get(k) >= target)
    }

    /// Tally the kinds of a population
    pub fn tally<I: IntoIterator<Item = EntityKind>>(kinds: I) -> Self {
        let mut counts = Self::default();
        for kind in kinds {
            counts.increment(kind);
        }
        counts
    }
}
