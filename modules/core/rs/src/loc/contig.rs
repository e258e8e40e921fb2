use std::fmt::Debug;
use std::hash::Hash;

/// Chromosome (contig) identifier. Usually a `String`, but any ordered, hashable key will do.
/// Tracks are reported in the contig order, hence `Ord`.
pub trait Contig: Hash + Eq + Ord + Clone + Debug + Send + Sync {}

impl<T: Hash + Eq + Ord + Clone + Debug + Send + Sync> Contig for T {}
