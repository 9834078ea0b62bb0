//! Core domain types: draws, draw types, and streams.
//!
//! Grounded on `super_lotto/models.rs`'s `SuperLottoDraw`/`NumberVec`
//! pattern (immutable record plus a typed number collection) and on
//! `super_lotto/models.rs`'s `NumberZone` enum for the Front/Back split —
//! the direct precedent for this crate's `Stream` (Winning/Machine).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One of the two number sets predicted independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stream {
    Winning,
    Machine,
}

impl std::fmt::Display for Stream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stream::Winning => write!(f, "winning"),
            Stream::Machine => write!(f, "machine"),
        }
    }
}

/// Identity of a draw type (e.g. "morning", "evening" tirage). Newtype over
/// `i64` so it can't be confused with a plain count or index at call sites,
/// matching the teacher's preference for typed ids over bare integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DrawTypeId(pub i64);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawType {
    pub id: DrawTypeId,
    pub name: String,
    pub category: String,
}

impl DrawType {
    /// Name lookup is case-insensitive per the spec's data model.
    pub fn name_matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// A single lottery event: five winning numbers, optionally five machine
/// numbers, all drawn from 1..=90. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draw {
    pub draw_type_id: DrawTypeId,
    pub date: DateTime<Utc>,
    /// 0 (Sunday) ..= 6 (Saturday), matching `chrono::Weekday::num_days_from_sunday`.
    pub day_of_week: u8,
    pub winning: [u8; 5],
    /// Present iff all five machine numbers are known; partial machine
    /// draws are represented as `None` for the whole group, never as a
    /// mix of `Some`/missing.
    pub machine: Option<[u8; 5]>,
}

impl Draw {
    /// Numbers for the given stream, if present for this draw.
    pub fn numbers(&self, stream: Stream) -> Option<[u8; 5]> {
        match stream {
            Stream::Winning => Some(self.winning),
            Stream::Machine => self.machine,
        }
    }

    /// Two draws are "the same draw" for leakage-guard purposes (spec
    /// §4.7 step 1) when their number sets match, independent of
    /// insertion order.
    pub fn same_numbers(&self, other: &Draw) -> bool {
        let mut a = self.winning;
        let mut b = other.winning;
        a.sort_unstable();
        b.sort_unstable();
        if a != b {
            return false;
        }
        match (self.machine, other.machine) {
            (Some(mut ma), Some(mut mb)) => {
                ma.sort_unstable();
                mb.sort_unstable();
                ma == mb
            }
            (None, None) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw(winning: [u8; 5], machine: Option<[u8; 5]>) -> Draw {
        Draw {
            draw_type_id: DrawTypeId(1),
            date: Utc::now(),
            day_of_week: 0,
            winning,
            machine,
        }
    }

    #[test]
    fn same_numbers_ignores_order() {
        let a = draw([1, 2, 3, 4, 5], Some([10, 20, 30, 40, 50]));
        let b = draw([5, 4, 3, 2, 1], Some([50, 40, 30, 20, 10]));
        assert!(a.same_numbers(&b));
    }

    #[test]
    fn same_numbers_respects_missing_machine_set() {
        let a = draw([1, 2, 3, 4, 5], Some([10, 20, 30, 40, 50]));
        let b = draw([1, 2, 3, 4, 5], None);
        assert!(!a.same_numbers(&b));
    }

    #[test]
    fn name_lookup_is_case_insensitive() {
        let dt = DrawType { id: DrawTypeId(1), name: "Morning".into(), category: "daily".into() };
        assert!(dt.name_matches("morning"));
        assert!(dt.name_matches("MORNING"));
        assert!(!dt.name_matches("evening"));
    }
}
