//! Typed node ids.
//!
//! The concrete graph and the abstract graph each get their own id type so
//! that a [`ConcreteNodeId`] can never be used to index the abstract graph
//! (or vice versa) by accident. Both are zero-cost `u32` newtypes.

use crate::graph::GraphId;
use std::hash::{BuildHasherDefault, Hasher};

macro_rules! node_id_type {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub(crate) struct $name(pub(crate) u32);

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for u32 {
            fn from(id: $name) -> u32 {
                id.0
            }
        }

        impl GraphId for $name {
            fn index(self) -> usize {
                self.0 as usize
            }
            fn from_index(index: usize) -> Self {
                $name(index as u32)
            }
        }
    };
}

node_id_type!(ConcreteNodeId, "Identifies a node in the concrete grid graph.");
node_id_type!(AbstractNodeId, "Identifies a node in the abstract graph.");

/// A [`Hasher`] specialized for small dense integer ids, avoiding the cost of
/// a general-purpose hash for keys that are already well distributed.
#[derive(Default)]
pub(crate) struct IdHasher(u64);

impl Hasher for IdHasher {
    fn write(&mut self, _bytes: &[u8]) {
        unreachable!("IdHasher only supports write_u32/write_u64")
    }
    fn write_u32(&mut self, id: u32) {
        self.0 = id as u64;
    }
    fn write_u64(&mut self, id: u64) {
        self.0 = id;
    }
    fn finish(&self) -> u64 {
        self.0
    }
}

/// A [`HashMap`](hashbrown::HashMap) keyed by a typed id, using [`IdHasher`].
pub(crate) type IdMap<K, V> = hashbrown::HashMap<K, V, BuildHasherDefault<IdHasher>>;
/// A [`HashSet`](hashbrown::HashSet) of a typed id, using [`IdHasher`].
pub(crate) type IdSet<K> = hashbrown::HashSet<K, BuildHasherDefault<IdHasher>>;
