//! Opaque ID newtypes for placement entities.
//!
//! [`TemplateId`], [`MacroInstId`], and [`NetId`] index the input design
//! arenas; [`HardMacroId`] and [`PathId`] index the placer's internal model.
//! All are thin `u32` wrappers that are `Copy`, `Hash`, and
//! `Serialize`/`Deserialize`.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
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

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Opaque, copyable ID for a macro template in the design.
    TemplateId
);

define_id!(
    /// Opaque, copyable ID for a macro instance in the design.
    MacroInstId
);

define_id!(
    /// Opaque, copyable ID for a net in the design.
    NetId
);

define_id!(
    /// Opaque, copyable ID for a hard macro in the placement model.
    HardMacroId
);

define_id!(
    /// Opaque, copyable ID for a path in the placement model.
    PathId
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn id_roundtrip() {
        let id = TemplateId::from_raw(42);
        assert_eq!(id.as_raw(), 42);
    }

    #[test]
    fn id_equality() {
        let a = HardMacroId::from_raw(3);
        let b = HardMacroId::from_raw(3);
        let c = HardMacroId::from_raw(4);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn id_hash_in_set() {
        let mut set = HashSet::new();
        set.insert(PathId::from_raw(1));
        set.insert(PathId::from_raw(2));
        set.insert(PathId::from_raw(1));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn id_serde_roundtrip() {
        let id = NetId::from_raw(55);
        let json = serde_json::to_string(&id).unwrap();
        let restored: NetId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, restored);
    }

    #[test]
    fn id_display() {
        let id = MacroInstId::from_raw(7);
        assert_eq!(format!("{id}"), "7");
    }
}
