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
use crate::miner::Miner;
use crate::rule::Rule;
use crate::vec_sets::intersection;
use itertools::Itertools;
use ordered_float::OrderedFloat;

// A rule whose antecedent overlaps the cart.
#[derive(Clone, Debug, PartialEq)]
pub struct Suggestion {
    pub recommend: Vec<Item>,
    pub match_score: f64,
    pub confidence: f64,
    pub source: Miner,
}

// Rounds to 2 decimal places from the exact decimal value of x, with exact
// halves going to the even neighbour, so 0.625 becomes 0.62.
pub fn round2(x: f64) -> f64 {
    format!("{:.2}", x).parse().unwrap_or(x)
}

// Scores each rule by the fraction of its antecedent already in the cart.
// Rules with no overlap are dropped. cart must be sorted and deduplicated.
fn score(cart: &[Item], rules: &[Rule], suggestions: &mut Vec<Suggestion>) {
    for rule in rules {
        let matched = intersection(cart, &rule.antecedent).len();
        if matched == 0 {
            continue;
        }
        suggestions.push(Suggestion {
            recommend: rule.consequent.clone(),
            match_score: round2(matched as f64 / rule.antecedent.len() as f64),
            confidence: round2(rule.confidence),
            source: rule.source,
        });
    }
}

// Matching rules from both miners, best first. The sort is stable, so rules
// with equal scores keep FP-Growth's rules ahead of Apriori's, each in
// generation order.
pub fn suggestions(cart: &[Item], rules_fp: &[Rule], rules_ap: &[Rule]) -> Vec<Suggestion> {
    let cart: Vec<Item> = cart.iter().cloned().sorted().dedup().collect();
    let mut suggestions: Vec<Suggestion> = vec![];
    score(&cart, rules_fp, &mut suggestions);
    score(&cart, rules_ap, &mut suggestions);
    suggestions.sort_by_key(|s| (OrderedFloat(-s.match_score), OrderedFloat(-s.confidence)));
    suggestions
}

// The first top_n distinct items recommended by the ranked suggestions.
pub fn rank(cart: &[Item], rules_fp: &[Rule], rules_ap: &[Rule], top_n: usize) -> Vec<Item> {
    suggestions(cart, rules_fp, rules_ap)
        .into_iter()
        .flat_map(|suggestion| suggestion.recommend)
        .unique()
        .take(top_n)
        .collect()
}
