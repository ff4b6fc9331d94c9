//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  The inner integer is `pub` to allow
//! direct indexing into the graph arena `Vec`s via `id.0 as usize`, but
//! callers should prefer the `.index()` helpers for clarity.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel for "no valid ID" (`u32::MAX`).
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }

            /// ID for the `n`-th arena slot.
            ///
            /// # Panics
            /// Panics if `n` does not fit the inner integer (more than ~4.3
            /// billion slots in one graph).
            #[inline]
            pub fn from_index(n: usize) -> Self {
                match <$inner>::try_from(n) {
                    Ok(v) if v != <$inner>::MAX => $name(v),
                    _ => panic!("{} overflow: {n}", stringify!($name)),
                }
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of a graph node (segment endpoint or synthetic snap point).
    pub struct NodeId(u32);
}

typed_id! {
    /// Index of a graph edge.  Edges created by snapping are appended, so
    /// existing `EdgeId`s stay valid after a split.
    pub struct EdgeId(u32);
}

typed_id! {
    /// Index of a decomposed single-part feature in the graph's feature
    /// arena.  Edges point back to their originating feature through it.
    pub struct FeatureId(u32);
}
