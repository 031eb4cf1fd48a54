//! Per-frame object pool keyed by type and declaration order.
//!
//! The draw routine is re-executed from scratch on every frame. Objects that must keep
//! their identity across frames (draw elements, animation state) are requested from a
//! [`SlotCache`] in call order: the n-th request for a given key within a frame always
//! lands on the same pooled instance, so long as the routine issues its calls in the same
//! order every frame.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

pub struct SlotCache<K, T> {
    pools: HashMap<K, Vec<T>>,
    cursors: HashMap<K, usize>,
}

impl<K, T> Default for SlotCache<K, T> {
    fn default() -> Self {
        Self {
            pools: HashMap::new(),
            cursors: HashMap::new(),
        }
    }
}

impl<K, T> SlotCache<K, T>
where
    K: Copy + Eq + Hash + Debug,
    T: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the instance pooled at the current ordinal for `key` and advances the cursor.
    ///
    /// On a hit `on_hit` is invoked with the reused instance so the caller can reset it with
    /// the new frame's parameters. On a miss `factory` builds a fresh instance which is
    /// appended to the pool.
    pub fn next(
        &mut self,
        key: K,
        factory: impl FnOnce(K) -> T,
        on_hit: impl FnOnce(&T),
    ) -> T {
        let cursor = self.cursors.entry(key).or_insert(0);
        let index = *cursor;
        *cursor += 1;

        let pool = self.pools.entry(key).or_default();
        match pool.get(index) {
            Some(item) => {
                on_hit(item);
                item.clone()
            }
            None => {
                debug_assert_eq!(
                    pool.len(),
                    index,
                    "slot {index} of {key:?} requested before slot {}",
                    pool.len()
                );
                let item = factory(key);
                pool.push(item.clone());
                item
            }
        }
    }

    /// Rewinds every key to ordinal 0. Pooled instances are kept for reuse.
    pub fn reset_cursors(&mut self) {
        for cursor in self.cursors.values_mut() {
            *cursor = 0;
        }
    }

    /// Ordinal the next request for `key` will receive in this frame.
    pub fn cursor(&self, key: K) -> usize {
        self.cursors.get(&key).copied().unwrap_or(0)
    }

    /// Number of instances ever allocated for `key`.
    pub fn pooled(&self, key: K) -> usize {
        self.pools.get(&key).map_or(0, Vec::len)
    }

    /// Instances allocated for `key`, in ordinal order.
    pub fn pool(&self, key: K) -> &[T] {
        self.pools.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.pools.values().flatten()
    }

    /// Drops every pooled instance. Used when the owning chart is torn down.
    pub fn clear(&mut self) {
        self.pools.clear();
        self.cursors.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_cursor_tracks_per_key() {
        let mut cache: SlotCache<&'static str, Rc<Cell<u32>>> = SlotCache::new();
        cache.next("a", |_| Rc::new(Cell::new(0)), |_| {});
        cache.next("a", |_| Rc::new(Cell::new(0)), |_| {});
        cache.next("b", |_| Rc::new(Cell::new(0)), |_| {});

        assert_eq!(cache.cursor("a"), 2);
        assert_eq!(cache.cursor("b"), 1);
        assert_eq!(cache.cursor("c"), 0);

        cache.reset_cursors();
        assert_eq!(cache.cursor("a"), 0);
        assert_eq!(cache.pooled("a"), 2);
    }

    #[test]
    fn test_on_hit_only_called_on_reuse() {
        let mut cache: SlotCache<u8, Rc<Cell<u32>>> = SlotCache::new();
        let hits = Cell::new(0);
        cache.next(0, |_| Rc::new(Cell::new(1)), |_| hits.set(hits.get() + 1));
        assert_eq!(hits.get(), 0);

        cache.reset_cursors();
        let item = cache.next(0, |_| Rc::new(Cell::new(2)), |i| {
            hits.set(hits.get() + 1);
            i.set(7);
        });
        assert_eq!(hits.get(), 1);
        assert_eq!(item.get(), 7);
    }
}
