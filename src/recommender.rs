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

use crate::config::MiningConfig;
use crate::encoder::{encode, TransactionMatrix};
use crate::error::{BasketError, Result};
use crate::miner::Miner;
use crate::ranker::rank;
use crate::request::{Cart, RecommendResponse};
use crate::rule::Rule;
use crate::transaction_store::{Dataset, TransactionStore};
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, warn};

// The rules both miners found in one dataset snapshot.
pub struct MinedRules {
    matrix: TransactionMatrix,
    fp_rules: Vec<Rule>,
    ap_rules: Vec<Rule>,
}

impl MinedRules {
    pub fn fp_rules(&self) -> &[Rule] {
        &self.fp_rules
    }

    pub fn ap_rules(&self) -> &[Rule] {
        &self.ap_rules
    }

    // Ranked item names for the cart. Cart items the dataset has never seen
    // can't match any antecedent, so they are ignored.
    pub fn recommend(&self, cart: &Cart, top_n: usize) -> Vec<String> {
        let itemizer = self.matrix.itemizer();
        let cart_items: Vec<_> = cart
            .items()
            .iter()
            .filter_map(|name| itemizer.get(name))
            .collect();
        let items = rank(&cart_items, &self.fp_rules, &self.ap_rules, top_n);
        itemizer.to_str_vec(&items)
    }

    pub fn write_csv<W: Write>(&self, output: W) -> csv::Result<()> {
        let itemizer = self.matrix.itemizer();
        let mut writer = csv::Writer::from_writer(output);
        writer.write_record(["Source", "Antecedent->Consequent", "Confidence", "Lift", "Support"])?;
        for rule in self.fp_rules.iter().chain(self.ap_rules.iter()) {
            writer.write_record(&[
                rule.source.to_string(),
                rule.display(itemizer).to_string(),
                rule.confidence.to_string(),
                rule.lift.to_string(),
                rule.support.to_string(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }
}

// Encodes the dataset and runs both miners over it concurrently.
pub fn mine(dataset: &Dataset, config: &MiningConfig) -> Result<MinedRules> {
    let timer = Instant::now();
    let matrix = encode(&dataset.transactions())?;
    debug!(
        "Encoded {} transactions over {} items in {} ms",
        matrix.num_transactions(),
        matrix.num_items(),
        timer.elapsed().as_millis()
    );

    let timer = Instant::now();
    let rules_for = |miner: Miner| miner.rules(&matrix, config.min_support, config.min_confidence);
    let (fp_rules, ap_rules) = rayon::join(|| rules_for(Miner::FpGrowth), || rules_for(Miner::Apriori));
    info!(
        "Generated {} FP-Growth rules and {} Apriori rules in {} ms",
        fp_rules.len(),
        ap_rules.len(),
        timer.elapsed().as_millis()
    );
    if fp_rules != ap_rules {
        warn!("FP-Growth and Apriori disagree on the rule set");
    }

    Ok(MinedRules {
        matrix,
        fp_rules,
        ap_rules,
    })
}

pub struct Recommendation {
    pub response: RecommendResponse,
    // None when there was nothing to mine.
    pub rules: Option<MinedRules>,
}

// Runs the full cycle for each request: store the cart, reload the dataset,
// mine it, and rank the rules against the cart. Safe to share between
// threads; the store serializes writers.
pub struct Recommender {
    store: TransactionStore,
    config: MiningConfig,
}

impl Recommender {
    pub fn new<P: AsRef<Path>>(dataset_path: P, config: MiningConfig) -> Result<Recommender> {
        config.validate()?;
        Ok(Recommender {
            store: TransactionStore::new(dataset_path),
            config,
        })
    }

    pub fn store(&self) -> &TransactionStore {
        &self.store
    }

    pub fn recommend(&self, cart: &Cart) -> Result<Recommendation> {
        let start = Instant::now();
        let dataset = self.store.append_and_load(cart.items()).map_err(|err| {
            error!("Failed to update dataset {}: {}", self.store.path().display(), err);
            err
        })?;
        info!(
            "Dataset {} holds {} carts over {} columns",
            self.store.path().display(),
            dataset.num_rows(),
            dataset.num_columns()
        );

        let rules = match mine(&dataset, &self.config) {
            Ok(rules) => Some(rules),
            Err(BasketError::Mining(reason)) => {
                warn!("Nothing to mine, returning no recommendations: {}", reason);
                None
            }
            Err(err) => return Err(err),
        };

        let recommendations = match rules {
            Some(ref rules) => rules.recommend(cart, self.config.top_n),
            None => vec![],
        };
        info!(
            "Recommended {} items for a {} item cart in {} ms",
            recommendations.len(),
            cart.len(),
            start.elapsed().as_millis()
        );

        Ok(Recommendation {
            response: RecommendResponse {
                input_cart: cart.items().to_vec(),
                recommendations,
            },
            rules,
        })
    }

    // Entry point for a request layer holding a raw JSON body.
    pub fn recommend_json(&self, body: &str) -> Result<RecommendResponse> {
        let cart = Cart::from_json(body)?;
        Ok(self.recommend(&cart)?.response)
    }
}
