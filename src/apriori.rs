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

use crate::encoder::TransactionMatrix;
use crate::index::Index;
use crate::item::Item;
use crate::itemset::{min_count, FrequentItemsets, ItemSet};
use fnv::FnvHashSet;
use itertools::Itertools;
use rayon::prelude::*;

// Level-wise search: the frequent itemsets of size k+1 are counted only
// among candidates whose every k-subset was frequent.
pub fn apriori(matrix: &TransactionMatrix, min_support: f64) -> FrequentItemsets {
    let index = Index::from_matrix(matrix);
    let num_transactions = index.transaction_count() as u32;
    let min_count = min_count(min_support, num_transactions);

    let mut level: Vec<ItemSet> = (1..=matrix.num_items())
        .map(|id| Item::with_id(id as u32))
        .map(|item| ItemSet::new(vec![item], index.count(&[item])))
        .filter(|itemset| itemset.count >= min_count)
        .collect();

    let mut itemsets: Vec<ItemSet> = vec![];
    while !level.is_empty() {
        let mut next: Vec<ItemSet> = generate_candidates(&level)
            .into_par_iter()
            .map(|candidate| {
                let count = index.count(&candidate);
                ItemSet::new(candidate, count)
            })
            .filter(|itemset| itemset.count >= min_count)
            .collect();
        next.sort();
        itemsets.append(&mut level);
        level = next;
    }

    FrequentItemsets::new(itemsets, num_transactions)
}

// Joins pairs of same-size itemsets which differ only in their last item.
// Expects level to be sorted.
fn generate_candidates(level: &[ItemSet]) -> Vec<Vec<Item>> {
    let frequent: FnvHashSet<&[Item]> = level.iter().map(|i| i.items.as_slice()).collect();
    let mut candidates: Vec<Vec<Item>> = vec![];
    for (position, a) in level.iter().enumerate() {
        let k = a.len();
        for b in &level[position + 1..] {
            if a.items[..k - 1] != b.items[..k - 1] {
                break;
            }
            let mut candidate = a.items.clone();
            candidate.push(b.items[k - 1]);
            let all_subsets_frequent = candidate
                .iter()
                .cloned()
                .combinations(k)
                .all(|subset| frequent.contains(subset.as_slice()));
            if all_subsets_frequent {
                candidates.push(candidate);
            }
        }
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::{apriori, generate_candidates};
    use crate::encoder::encode;
    use crate::item::Item;
    use crate::itemset::ItemSet;

    fn itemset(ids: &[u32]) -> ItemSet {
        ItemSet::new(ids.iter().map(|&i| Item::with_id(i)).collect(), 1)
    }

    #[test]
    fn test_generate_candidates() {
        let level = vec![itemset(&[1]), itemset(&[2]), itemset(&[3])];
        let candidates: Vec<Vec<u32>> = generate_candidates(&level)
            .iter()
            .map(|c| c.iter().map(|i| i.as_index() as u32).collect())
            .collect();
        assert_eq!(candidates, vec![vec![1, 2], vec![1, 3], vec![2, 3]]);

        // {1,2,4} is pruned because {2,4} isn't frequent.
        let level = vec![
            itemset(&[1, 2]),
            itemset(&[1, 3]),
            itemset(&[1, 4]),
            itemset(&[2, 3]),
        ];
        let candidates: Vec<Vec<u32>> = generate_candidates(&level)
            .iter()
            .map(|c| c.iter().map(|i| i.as_index() as u32).collect())
            .collect();
        assert_eq!(candidates, vec![vec![1, 2, 3]]);
    }

    #[test]
    fn test_apriori() {
        let transactions = vec![
            vec!["MILK", "BREAD"],
            vec!["MILK", "EGGS"],
            vec!["MILK", "BREAD", "EGGS"],
            vec!["TEA"],
        ];
        let matrix = encode(&transactions).unwrap();
        let itemizer = matrix.itemizer();

        let frequent = apriori(&matrix, 0.5);
        let found: Vec<(Vec<String>, u32)> = frequent
            .itemsets()
            .iter()
            .map(|i| (itemizer.to_str_vec(&i.items), i.count))
            .collect();
        let expected = vec![
            (vec!["BREAD".to_owned()], 2),
            (vec!["EGGS".to_owned()], 2),
            (vec!["MILK".to_owned()], 3),
            (vec!["BREAD".to_owned(), "MILK".to_owned()], 2),
            (vec!["EGGS".to_owned(), "MILK".to_owned()], 2),
        ];
        assert_eq!(found, expected);
        assert_eq!(frequent.num_transactions(), 4);
        assert_eq!(frequent.support_of(&frequent.itemsets()[2]), 0.75);
    }

    #[test]
    fn test_apriori_nothing_frequent() {
        let transactions = vec![vec!["A"], vec!["B"], vec!["C"]];
        let matrix = encode(&transactions).unwrap();
        assert!(apriori(&matrix, 0.5).is_empty());
    }
}
