pub mod allocator;
pub mod geometry;
pub mod units;

use ahash::{AHashMap, AHashSet};
pub type SmallKeyHashMap<K, V> = AHashMap<K, V>;
pub type SmallKeyHashSet<K> = AHashSet<K>;

// Re-exports.
pub use approx;
pub use ilattice;
pub use ilattice::glam;
pub use static_assertions;
