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

use crate::itemset::FrequentItemsets;
use crate::miner::Miner;
use crate::rule::Rule;
use crate::vec_sets::split_out;
use itertools::Itertools;

// Every rule A => B where A ∪ B is a frequent itemset, A and B are
// non-empty and disjoint, and the rule's confidence reaches min_confidence.
// Itemsets are visited in canonical order, and for each itemset the larger
// antecedents come first.
pub fn generate_rules(itemsets: &FrequentItemsets, min_confidence: f64, source: Miner) -> Vec<Rule> {
    let itemset_support = itemsets.itemset_support();
    let mut rules: Vec<Rule> = vec![];
    for itemset in itemsets.itemsets().iter().filter(|i| i.len() > 1) {
        for size in (1..itemset.len()).rev() {
            for antecedent in itemset.items.iter().cloned().combinations(size) {
                let consequent = split_out(&itemset.items, &antecedent);
                if let Some(rule) =
                    Rule::make(antecedent, consequent, &itemset_support, min_confidence, source)
                {
                    rules.push(rule);
                }
            }
        }
    }
    rules
}
