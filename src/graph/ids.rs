//! Handle and identity types for graph nodes.
//!
//! Two kinds of numbers name a node:
//!
//! - **Handles** ([`VertexId`], [`EdgeId`], [`TriangleId`]) are type-safe slot
//!   indices into the graph's arenas. Every cross reference between nodes is a
//!   handle, so the cyclic vertex/edge/triangle relations never own each other.
//! - **Identities** ([`NodeId`]) are the ids carried through serialization.
//!   They are unique across all three node kinds within one graph and are
//!   never zero; zero is the "no reference" value of the flattened format.

use std::fmt::{self, Debug};
use std::num::NonZeroU32;

/// A type-safe vertex handle.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct VertexId(u32);

/// A type-safe edge handle.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct EdgeId(u32);

/// A type-safe triangle handle.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct TriangleId(u32);

const INVALID: u32 = u32::MAX;

macro_rules! impl_handle_type {
    ($name:ident, $display:literal) => {
        impl $name {
            /// Create a new handle from a slot index.
            #[inline]
            pub fn new(index: usize) -> Self {
                debug_assert!(index < INVALID as usize, "slot {} too large", index);
                Self(index as u32)
            }

            /// Create an invalid/null handle.
            #[inline]
            pub fn invalid() -> Self {
                Self(INVALID)
            }

            /// Get the slot index.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// Check if this is a valid (non-null) handle.
            #[inline]
            pub fn is_valid(self) -> bool {
                self.0 != INVALID
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, "{}({})", $display, self.0)
                } else {
                    write!(f, "{}(INVALID)", $display)
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::invalid()
            }
        }

        impl From<usize> for $name {
            fn from(v: usize) -> Self {
                Self::new(v)
            }
        }
    };
}

impl_handle_type!(VertexId, "V");
impl_handle_type!(EdgeId, "E");
impl_handle_type!(TriangleId, "T");

/// The identity of a node, unique across all node kinds of one graph.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct NodeId(NonZeroU32);

impl NodeId {
    /// Wrap a raw id. Returns `None` for the reserved value 0.
    #[inline]
    pub fn new(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(Self)
    }

    /// Get the raw id value.
    #[inline]
    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// Raw value of an optional id, with 0 standing for `None`.
    #[inline]
    pub fn raw_or_zero(id: Option<NodeId>) -> u32 {
        id.map_or(0, NodeId::get)
    }
}

impl Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic identity counter, local to one graph construction.
///
/// Starts at 1 so that no node ever receives the reserved id 0.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: NonZeroU32,
}

impl IdAllocator {
    /// Create a counter whose first id is 1.
    pub fn new() -> Self {
        Self {
            next: NonZeroU32::MIN,
        }
    }

    /// Hand out the next id.
    ///
    /// # Panics
    /// Panics if more than `u32::MAX - 1` ids are requested.
    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next = self.next.checked_add(1).expect("node id space exhausted");
        id
    }

    /// Number of ids handed out so far.
    pub fn allocated(&self) -> u32 {
        self.next.get() - 1
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
