use std::fmt::Debug;
use std::hash::Hash;

/// Affinity key.
///
/// Tasks with equal keys never overlap and run in submission order. The scheduler
/// only compares keys for equality and uses them as map keys; `Debug` is used to
/// name the key in [`Event`](crate::Event)s.
///
/// Implemented for every type meeting the bounds.
pub trait Key: Eq + Hash + Clone + Debug + Send + Sync + 'static {}

impl<T> Key for T where T: Eq + Hash + Clone + Debug + Send + Sync + 'static {}
