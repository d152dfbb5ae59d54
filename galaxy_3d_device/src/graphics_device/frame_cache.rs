/// Per-frame cache keyed by frame generation
///
/// Entries are valid only for the generation they were written in. The first
/// access with a newer generation drops everything, so ending a frame is just
/// a counter increment on the device.

use std::hash::Hash;
use rustc_hash::FxHashMap;

#[derive(Debug)]
pub struct FrameCache<K, V> {
    generation: u64,
    entries: FxHashMap<K, V>,
}

impl<K: Eq + Hash, V> Default for FrameCache<K, V> {
    fn default() -> Self {
        Self { generation: 0, entries: FxHashMap::default() }
    }
}

impl<K: Eq + Hash, V> FrameCache<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    fn sync(&mut self, generation: u64) {
        if generation != self.generation {
            self.entries.clear();
            self.generation = generation;
        }
    }

    pub fn get(&self, generation: u64, key: &K) -> Option<&V> {
        if generation != self.generation {
            return None;
        }
        self.entries.get(key)
    }

    pub fn insert(&mut self, generation: u64, key: K, value: V) {
        self.sync(generation);
        self.entries.insert(key, value);
    }

    pub fn get_or_insert_with<F: FnOnce() -> V>(&mut self, generation: u64, key: K, build: F) -> &V {
        self.sync(generation);
        self.entries.entry(key).or_insert_with(build)
    }

    /// Live entries for `generation`
    pub fn len(&self, generation: u64) -> usize {
        if generation != self.generation { 0 } else { self.entries.len() }
    }

    pub fn is_empty(&self, generation: u64) -> bool {
        self.len(generation) == 0
    }
}

#[cfg(test)]
#[path = "frame_cache_tests.rs"]
mod tests;
