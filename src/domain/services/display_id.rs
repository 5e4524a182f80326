//! Year-scoped badge numbers: `YYYY` followed by a three digit sequence.

pub const MAX_SEQUENCE_PER_YEAR: i32 = 999;

const SEQUENCE_WIDTH: i64 = 1000;

/// `compose(2026, 42) == 2026042`. Only meaningful for `1..=MAX_SEQUENCE_PER_YEAR`.
pub fn compose(year: i32, sequence: i32) -> i64 {
    i64::from(year) * SEQUENCE_WIDTH + i64::from(sequence)
}
