//! Level bucket index
//!
//! Groups catalog entries into buckets of ten levels so a loot roll only
//! has to look at the handful of buckets that overlap its level window.

use std::collections::BTreeMap;

use super::item::ItemDefinition;

/// Width of one level bucket
pub const BUCKET_WIDTH: i32 = 10;

/// Bucket key for a level (floor division, also for negative levels)
pub fn bucket_of(level: i32) -> i32 {
    level.div_euclid(BUCKET_WIDTH)
}

/// Catalog indices grouped by `floor(base_item_level / 10)`
#[derive(Debug, Clone, Default)]
pub struct LevelBucketIndex {
    buckets: BTreeMap<i32, Vec<usize>>,
}

impl LevelBucketIndex {
    /// Build the index in one pass over the items
    pub fn build(items: &[ItemDefinition]) -> Self {
        let mut buckets: BTreeMap<i32, Vec<usize>> = BTreeMap::new();
        for (idx, item) in items.iter().enumerate() {
            buckets.entry(bucket_of(item.base_item_level)).or_default().push(idx);
        }
        log::debug!("Indexed {} items into {} level buckets", items.len(), buckets.len());
        Self { buckets }
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Indices of every item in a bucket overlapping `[min_level, max_level]`.
    /// Never misses an in-range item; may yield out-of-range neighbours.
    pub fn lookup(&self, min_level: i32, max_level: i32) -> impl Iterator<Item = usize> + '_ {
        let (lo, hi) = if min_level <= max_level {
            (min_level, max_level)
        } else {
            (max_level, min_level)
        };
        self.buckets
            .range(bucket_of(lo)..=bucket_of(hi))
            .flat_map(|(_, indices)| indices.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items_at(levels: &[i32]) -> Vec<ItemDefinition> {
        levels
            .iter()
            .map(|lvl| ItemDefinition::new(format!("item_{lvl}"), "Test", *lvl))
            .collect()
    }

    #[test]
    fn test_bucket_of() {
        assert_eq!(bucket_of(0), 0);
        assert_eq!(bucket_of(9), 0);
        assert_eq!(bucket_of(10), 1);
        assert_eq!(bucket_of(-1), -1);
    }

    #[test]
    fn test_lookup_has_no_false_negatives() {
        let items = items_at(&[1, 5, 9, 10, 14, 19, 20, 35, 47, -3]);
        let index = LevelBucketIndex::build(&items);

        for min in -5..50 {
            for max in min..min + 12 {
                let found: Vec<usize> = index.lookup(min, max).collect();
                for (idx, item) in items.iter().enumerate() {
                    if item.base_item_level >= min && item.base_item_level <= max {
                        assert!(found.contains(&idx), "level {} missed for [{min}, {max}]", item.base_item_level);
                    }
                }
            }
        }
    }

    #[test]
    fn test_lookup_only_touches_overlapping_buckets() {
        let items = items_at(&[5, 15, 25, 35]);
        let index = LevelBucketIndex::build(&items);
        assert_eq!(index.bucket_count(), 4);

        let found: Vec<usize> = index.lookup(12, 18).collect();
        assert_eq!(found, vec![1]);
    }

    #[test]
    fn test_reversed_range() {
        let items = items_at(&[5, 15]);
        let index = LevelBucketIndex::build(&items);
        assert_eq!(index.lookup(19, 0).count(), 2);
    }
}
