//! Storage Contracts
//!
//! Vocabulary shared by repository traits across domains.

/// Outcome of an insert-if-absent write
///
/// Dedup-sensitive inserts (provider event logs, tracking rows) must
/// distinguish "this call created the row" from "the row was already
/// there", including when a concurrent insert of the same key loses the
/// race. A unique-key conflict maps to `AlreadyExists`, never to an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The row was created by this call
    Inserted,
    /// A row with the same key already existed
    AlreadyExists,
}

impl InsertOutcome {
    pub fn is_inserted(self) -> bool {
        matches!(self, InsertOutcome::Inserted)
    }
}
