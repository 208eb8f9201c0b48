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
use crate::itemizer::Itemizer;
use crate::itemset::ItemsetSupport;
use crate::miner::Miner;
use crate::vec_sets::union;
use std::fmt;
use std::hash::{Hash, Hasher};

#[derive(Clone, Debug)]
pub struct Rule {
    pub antecedent: Vec<Item>,
    pub consequent: Vec<Item>,
    pub confidence: f64,
    pub lift: f64,
    pub support: f64,
    pub source: Miner,
}

impl Eq for Rule {}

// Rules are identified by their antecedent and consequent; the statistics
// and source are derived from those.
impl Hash for Rule {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.antecedent.hash(state);
        self.consequent.hash(state);
    }
}

impl PartialEq for Rule {
    fn eq(&self, other: &Rule) -> bool {
        self.antecedent == other.antecedent && self.consequent == other.consequent
    }
}

impl Rule {
    // Creates a new Rule from (antecedent,consequent) if the rule
    // would be above the min_confidence threshold. Both sides must be
    // sorted, and their union must be a frequent itemset.
    pub fn make(
        antecedent: Vec<Item>,
        consequent: Vec<Item>,
        itemset_support: &ItemsetSupport,
        min_confidence: f64,
        source: Miner,
    ) -> Option<Rule> {
        if antecedent.is_empty() || consequent.is_empty() {
            return None;
        }

        let ac_vec: Vec<Item> = union(&antecedent, &consequent);
        let ac_sup = *itemset_support.get(&ac_vec)?;
        let a_sup = *itemset_support.get(&antecedent)?;

        let confidence = ac_sup / a_sup;
        if confidence < min_confidence {
            return None;
        }
        let c_sup = *itemset_support.get(&consequent)?;
        let lift = ac_sup / (a_sup * c_sup);

        Some(Rule {
            antecedent,
            consequent,
            confidence,
            lift,
            support: ac_sup,
            source,
        })
    }

    // Formats as "ANTECEDENT => CONSEQUENT" using the item names.
    pub fn display<'a>(&'a self, itemizer: &'a Itemizer) -> RuleDisplay<'a> {
        RuleDisplay { rule: self, itemizer }
    }
}

pub struct RuleDisplay<'a> {
    rule: &'a Rule,
    itemizer: &'a Itemizer,
}

impl<'a> fmt::Display for RuleDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} => {}",
            Item::item_vec_to_string(&self.rule.antecedent, self.itemizer),
            Item::item_vec_to_string(&self.rule.consequent, self.itemizer)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Rule;
    use crate::item::Item;
    use crate::itemizer::Itemizer;
    use crate::itemset::ItemsetSupport;
    use crate::miner::Miner;

    #[test]
    fn test_make() {
        let (a, b) = (Item::with_id(1), Item::with_id(2));
        let mut support = ItemsetSupport::default();
        support.insert(vec![a], 0.5);
        support.insert(vec![b], 0.8);
        support.insert(vec![a, b], 0.4);

        let rule = Rule::make(vec![a], vec![b], &support, 0.4, Miner::Apriori).unwrap();
        assert_eq!(rule.confidence, 0.8);
        assert_eq!(rule.support, 0.4);
        assert!((rule.lift - 1.0).abs() < 1e-9);
        assert_eq!(rule.source, Miner::Apriori);

        // b => a has confidence 0.5.
        assert!(Rule::make(vec![b], vec![a], &support, 0.6, Miner::Apriori).is_none());
        assert!(Rule::make(vec![], vec![a], &support, 0.0, Miner::Apriori).is_none());

        // Equality ignores the source.
        let other = Rule::make(vec![a], vec![b], &support, 0.4, Miner::FpGrowth).unwrap();
        assert_eq!(rule, other);

        let mut itemizer = Itemizer::new();
        itemizer.id_of("MILK");
        itemizer.id_of("BREAD");
        assert_eq!(rule.display(&itemizer).to_string(), "MILK => BREAD");
    }
}
