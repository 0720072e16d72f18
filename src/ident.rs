use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier of a polygon or via in the output board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(Uuid);

impl ObjectId {
    /// Returns the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Source of fresh object identifiers.
///
/// Generators draw the ids of emitted polygons and vias from one of these,
/// passed in by the caller, so construction has no hidden state.
pub trait IdGenerator {
    /// Returns an identifier not returned before by this generator.
    fn next_id(&mut self) -> ObjectId;
}

/// Random (v4) UUIDs, for boards that will be merged with other content.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&mut self) -> ObjectId {
        ObjectId(Uuid::new_v4())
    }
}

/// Deterministic identifiers counting up from a base value.
#[derive(Debug, Default, Clone)]
pub struct SequentialIds {
    next: u128,
}

impl SequentialIds {
    /// Creates a generator whose first identifier is `start`.
    #[must_use]
    pub fn starting_at(start: u128) -> Self {
        Self { next: start }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> ObjectId {
        let id = ObjectId(Uuid::from_u128(self.next));
        self.next = self.next.wrapping_add(1);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_ids_are_distinct_and_repeatable() {
        let mut a = SequentialIds::default();
        let mut b = SequentialIds::default();
        let first = a.next_id();
        assert_ne!(first, a.next_id());
        assert_eq!(first, b.next_id());
    }

    #[test]
    fn random_ids_differ() {
        let mut ids = RandomIds;
        assert_ne!(ids.next_id(), ids.next_id());
    }

    #[test]
    fn starting_value_is_used() {
        let mut ids = SequentialIds::starting_at(42);
        assert_eq!(ids.next_id().as_uuid().as_u128(), 42);
    }
}
