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

use crate::apriori::apriori;
use crate::encoder::TransactionMatrix;
use crate::fptree::fp_growth;
use crate::generate_rules::generate_rules;
use crate::itemset::FrequentItemsets;
use crate::rule::Rule;
use std::fmt;

// The two frequent itemset algorithms. They must agree on every input, so
// running both is a cross check; each rule remembers which one produced it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Miner {
    FpGrowth,
    Apriori,
}

impl Miner {
    pub fn name(&self) -> &'static str {
        match self {
            Miner::FpGrowth => "FP-Growth",
            Miner::Apriori => "Apriori",
        }
    }

    pub fn frequent_itemsets(&self, matrix: &TransactionMatrix, min_support: f64) -> FrequentItemsets {
        match self {
            Miner::FpGrowth => fp_growth(matrix, min_support),
            Miner::Apriori => apriori(matrix, min_support),
        }
    }

    pub fn rules(&self, matrix: &TransactionMatrix, min_support: f64, min_confidence: f64) -> Vec<Rule> {
        let itemsets = self.frequent_itemsets(matrix, min_support);
        generate_rules(&itemsets, min_confidence, *self)
    }
}

impl fmt::Display for Miner {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}
