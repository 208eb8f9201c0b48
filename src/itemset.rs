// Copyright 2018 Chris Pearce
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::item::Item;
use fnv::FnvHashMap;
use std::cmp;

pub type ItemsetSupport = FnvHashMap<Vec<Item>, f64>;

#[derive(Clone, Hash, PartialEq, Eq, Debug)]
pub struct ItemSet {
    pub items: Vec<Item>,
    pub count: u32,
}

// Smaller itemsets first, then lexicographic by item.
impl Ord for ItemSet {
    fn cmp(&self, other: &ItemSet) -> cmp::Ordering {
        self.len()
            .cmp(&other.len())
            .then_with(|| self.items.cmp(&other.items))
            .then_with(|| self.count.cmp(&other.count))
    }
}

impl PartialOrd for ItemSet {
    fn partial_cmp(&self, other: &ItemSet) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl ItemSet {
    pub fn new(mut items: Vec<Item>, count: u32) -> ItemSet {
        items.sort();
        ItemSet { items, count }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// The output of one miner: itemsets in canonical order plus the number of
// transactions they were counted over.
#[derive(Clone, Debug, PartialEq)]
pub struct FrequentItemsets {
    itemsets: Vec<ItemSet>,
    num_transactions: u32,
}

impl FrequentItemsets {
    pub fn new(mut itemsets: Vec<ItemSet>, num_transactions: u32) -> FrequentItemsets {
        itemsets.sort();
        FrequentItemsets {
            itemsets,
            num_transactions,
        }
    }

    pub fn itemsets(&self) -> &[ItemSet] {
        &self.itemsets
    }

    pub fn len(&self) -> usize {
        self.itemsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.itemsets.is_empty()
    }

    pub fn num_transactions(&self) -> u32 {
        self.num_transactions
    }

    pub fn support_of(&self, itemset: &ItemSet) -> f64 {
        if self.num_transactions == 0 {
            return 0.0;
        }
        itemset.count as f64 / self.num_transactions as f64
    }

    pub fn itemset_support(&self) -> ItemsetSupport {
        self.itemsets
            .iter()
            .map(|itemset| (itemset.items.clone(), self.support_of(itemset)))
            .collect()
    }
}

// Smallest transaction count whose support reaches min_support. Computed by
// comparing supports directly, so that thresholds like 0.3 * 10 don't round
// the wrong way. Never less than 1.
pub fn min_count(min_support: f64, num_transactions: u32) -> u32 {
    if num_transactions == 0 {
        return 1;
    }
    let n = num_transactions as f64;
    let mut count = (min_support * n).floor().max(0.0) as u32;
    while count <= num_transactions && (count as f64) / n < min_support {
        count += 1;
    }
    cmp::max(count, 1)
}

#[cfg(test)]
mod tests {
    use super::{min_count, FrequentItemsets, ItemSet};
    use crate::item::Item;

    fn items(ids: &[u32]) -> Vec<Item> {
        ids.iter().map(|&i| Item::with_id(i)).collect()
    }

    #[test]
    fn test_min_count() {
        let cases = [
            (0.3, 10, 3),
            (0.3, 3, 1),
            (0.005, 100, 1),
            (0.005, 1000, 5),
            (0.005, 1001, 6),
            (0.5, 4, 2),
            (0.0, 7, 1),
            (1.0, 7, 7),
            (0.4, 0, 1),
        ];
        for &(min_support, n, expected) in cases.iter() {
            assert_eq!(
                min_count(min_support, n),
                expected,
                "min_support={} n={}",
                min_support,
                n
            );
        }
    }

    #[test]
    fn test_canonical_order() {
        let frequent = FrequentItemsets::new(
            vec![
                ItemSet::new(items(&[2, 1]), 2),
                ItemSet::new(items(&[3]), 1),
                ItemSet::new(items(&[1]), 3),
            ],
            4,
        );
        let sets: Vec<Vec<Item>> = frequent.itemsets().iter().map(|i| i.items.clone()).collect();
        assert_eq!(sets, vec![items(&[1]), items(&[3]), items(&[1, 2])]);
        let support = frequent.itemset_support();
        assert_eq!(support[&items(&[1, 2])], 0.5);
        assert_eq!(support[&items(&[1])], 0.75);
    }
}
