//! Opaque ID newtypes for design-model nodes.
//!
//! Each ID is a thin `u32` wrapper that is `Copy`, `Hash`, and `Serialize`/`Deserialize`.
//! IDs are created by [`Arena::alloc`](crate::arena::Arena::alloc) and used for O(1) lookup.

use crate::arena::ArenaId;
use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl ArenaId for $name {
            fn from_raw(index: u32) -> Self {
                Self(index)
            }

            fn as_raw(self) -> u32 {
                self.0
            }
        }
    };
}

define_id!(
    /// Opaque, copyable ID for a signal within an architecture.
    SignalId
);

define_id!(
    /// Opaque, copyable ID for a process within an architecture.
    ProcessId
);

define_id!(
    /// Opaque, copyable ID for a physical port on an entity.
    PortId
);

define_id!(
    /// Opaque, copyable ID for a type in the [`TypeDb`](crate::types::TypeDb).
    TypeId
);

define_id!(
    /// Opaque, copyable ID for a statement.
    ///
    /// Statement IDs are handed out in construction order by
    /// [`Architecture::next_stmt_id`](crate::arch::Architecture::next_stmt_id)
    /// and are used to order processes deterministically.
    StmtId
);

define_id!(
    /// Opaque, copyable ID for an interface node in a synthesizer arena.
    IntfId
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn id_roundtrip() {
        let id = SignalId::from_raw(42);
        assert_eq!(id.as_raw(), 42);
    }

    #[test]
    fn stmt_ids_order_by_index() {
        assert!(StmtId::from_raw(3) < StmtId::from_raw(10));
        let max = [StmtId::from_raw(4), StmtId::from_raw(9), StmtId::from_raw(1)]
            .into_iter()
            .max();
        assert_eq!(max, Some(StmtId::from_raw(9)));
    }

    #[test]
    fn id_hash_in_set() {
        let mut set = HashSet::new();
        set.insert(PortId::from_raw(1));
        set.insert(PortId::from_raw(2));
        set.insert(PortId::from_raw(1));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn id_serde_roundtrip() {
        let id = IntfId::from_raw(99);
        let json = serde_json::to_string(&id).unwrap();
        let restored: IntfId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, restored);
    }
}
