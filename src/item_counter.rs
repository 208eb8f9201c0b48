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

// Dense per-item counts, indexed by item id.
#[derive(Clone, Debug, Default)]
pub struct ItemCounter {
    counter: Vec<u32>,
}

impl ItemCounter {
    pub fn new() -> ItemCounter {
        ItemCounter { counter: vec![] }
    }
    pub fn add(&mut self, item: &Item, count: u32) {
        let index = item.as_index();
        if self.counter.len() <= index {
            self.counter.resize(index + 1, 0);
        }
        self.counter[index] += count;
    }
    pub fn get(&self, item: &Item) -> u32 {
        self.counter.get(item.as_index()).cloned().unwrap_or(0)
    }
    pub fn items_with_count_at_least(&self, min_count: u32) -> Vec<Item> {
        (1..self.counter.len())
            .filter(|&i| self.counter[i] >= min_count && self.counter[i] > 0)
            .map(|i| Item::with_id(i as u32))
            .collect()
    }
    // Most frequent first; ties broken by descending id so the order is total.
    pub fn sort_descending(&self, v: &mut [Item]) {
        v.sort_by(|a, b| {
            let count_a = self.get(a);
            let count_b = self.get(b);
            if count_a == count_b {
                return b.cmp(a);
            }
            count_b.cmp(&count_a)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::ItemCounter;
    use crate::item::Item;

    #[test]
    fn test_item_counter() {
        let mut counter = ItemCounter::new();
        let (a, b, c) = (Item::with_id(1), Item::with_id(2), Item::with_id(3));
        counter.add(&a, 1);
        counter.add(&b, 3);
        counter.add(&c, 1);
        counter.add(&a, 1);
        assert_eq!(counter.get(&a), 2);
        assert_eq!(counter.get(&Item::with_id(9)), 0);
        assert_eq!(counter.items_with_count_at_least(2), vec![a, b]);
        assert_eq!(counter.items_with_count_at_least(0), vec![a, b, c]);

        let mut v = vec![a, b, c];
        counter.sort_descending(&mut v);
        assert_eq!(v, vec![b, a, c]);
    }
}
