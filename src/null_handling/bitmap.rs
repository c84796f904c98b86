// --- IN: src/null_handling/bitmap.rs ---

//! The per-column validity bitmap and the two null-marking semantics.
//!
//! One bit per row records presence (1) or absence (0). A second, parallel bit
//! records whether an absent row was *retracted* by an update (a previously
//! valid value withdrawn) rather than *never set* by an insert. Both states
//! read as null; only the update path may need to report the difference.

use bitvec::prelude::*;
use serde::{Deserialize, Serialize};

/// How a null encountered during a fill is recorded.
///
/// Chosen once at the top of a fill call and passed by value to every
/// null-marking site.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum NullPolicy {
    /// Initial or append load: a null is a fresh, never-set slot.
    #[default]
    Insert,
    /// Update of existing rows: a null retracts a previously valid value.
    Update,
}

impl NullPolicy {
    pub fn from_is_update(is_update: bool) -> Self {
        if is_update {
            NullPolicy::Update
        } else {
            NullPolicy::Insert
        }
    }
}

/// The observable state of a single row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStatus {
    Valid,
    /// Null because the slot was never written (insert semantics).
    Invalid,
    /// Null because an update withdrew the value.
    Retracted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidityBitmap {
    valid: BitVec,
    retracted: BitVec,
}

impl ValidityBitmap {
    /// A bitmap of `len` rows, all never set.
    pub fn new_invalid(len: usize) -> Self {
        Self {
            valid: BitVec::repeat(false, len),
            retracted: BitVec::repeat(false, len),
        }
    }

    /// A bitmap of `len` rows, all valid.
    pub fn new_valid(len: usize) -> Self {
        Self {
            valid: BitVec::repeat(true, len),
            retracted: BitVec::repeat(false, len),
        }
    }

    pub fn len(&self) -> usize {
        self.valid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.valid.is_empty()
    }

    /// Rows past the end read as not valid.
    pub fn is_valid(&self, row: usize) -> bool {
        self.valid.get(row).map(|bit| *bit).unwrap_or(false)
    }

    pub fn status(&self, row: usize) -> RowStatus {
        if self.is_valid(row) {
            RowStatus::Valid
        } else if self.retracted.get(row).map(|bit| *bit).unwrap_or(false) {
            RowStatus::Retracted
        } else {
            RowStatus::Invalid
        }
    }

    /// Marks `row` present. Panics if `row` is out of bounds; callers check first.
    pub fn set_valid(&mut self, row: usize) {
        self.valid.set(row, true);
        self.retracted.set(row, false);
    }

    /// Marks `row` as a never-set slot.
    pub fn clear(&mut self, row: usize) {
        self.valid.set(row, false);
        self.retracted.set(row, false);
    }

    /// Marks `row` as a retracted value.
    pub fn unset(&mut self, row: usize) {
        self.valid.set(row, false);
        self.retracted.set(row, true);
    }

    pub fn mark_null(&mut self, row: usize, policy: NullPolicy) {
        match policy {
            NullPolicy::Insert => self.clear(row),
            NullPolicy::Update => self.unset(row),
        }
    }

    /// Marks every row present, discarding any retraction marks.
    pub fn fill_valid(&mut self) {
        self.valid.fill(true);
        self.retracted.fill(false);
    }

    /// Grows or truncates to `len` rows. New rows are never set.
    pub fn resize(&mut self, len: usize) {
        self.valid.resize(len, false);
        self.retracted.resize(len, false);
    }

    pub fn null_count(&self) -> usize {
        self.valid.count_zeros()
    }

    pub fn retracted_count(&self) -> usize {
        self.retracted.count_ones()
    }

    /// Iterates the validity bits in row order (`true` = present).
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.valid.iter().by_vals()
    }
}
