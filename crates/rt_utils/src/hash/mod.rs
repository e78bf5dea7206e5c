//! Provide hash containers, re-exports *hashbrown* and *foldhash*.
//!
//! All containers default to [`FixedHashState`], so iteration order only
//! depends on the inserted keys, never on the process.

// -----------------------------------------------------------------------------
// Modules

mod hasher;

// -----------------------------------------------------------------------------
// Exports

pub use hasher::{FixedHashState, FixedHasher};
pub use hasher::{NoOpHashState, NoOpHasher};

/// A [`hashbrown::HashMap`] using [`FixedHashState`] by default.
pub type HashMap<K, V, S = FixedHashState> = hashbrown::HashMap<K, V, S>;

/// A [`hashbrown::HashSet`] using [`FixedHashState`] by default.
pub type HashSet<T, S = FixedHashState> = hashbrown::HashSet<T, S>;

/// Re-export of hashbrown's map entry API.
pub mod hash_map {
    pub use hashbrown::hash_map::{Entry, OccupiedEntry, VacantEntry};
}

// -----------------------------------------------------------------------------
// Re-export crates

pub use foldhash;
pub use hashbrown;

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{HashMap, HashSet};

    #[test]
    fn fixed_state_containers() {
        let mut map: HashMap<&str, u32> = HashMap::default();
        map.insert("red", 0);
        map.insert("green", 1);
        assert_eq!(map.get("green"), Some(&1));

        let set: HashSet<u32> = [1, 2, 3, 2].into_iter().collect();
        assert_eq!(set.len(), 3);
    }
}
