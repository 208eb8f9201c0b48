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

//! Grocery recommendations from association rules mined over past carts.
//!
//! Each request stores the shopper's cart in an append-only CSV dataset,
//! mines the whole dataset with both FP-Growth and Apriori, and ranks the
//! resulting rules by how much of their antecedent is already in the cart.

pub mod apriori;
pub mod config;
pub mod encoder;
pub mod error;
pub mod fptree;
pub mod generate_rules;
pub mod index;
pub mod item;
pub mod item_counter;
pub mod itemizer;
pub mod itemset;
pub mod miner;
pub mod ranker;
pub mod recommender;
pub mod request;
pub mod rule;
pub mod transaction_store;
pub mod vec_sets;

pub use config::MiningConfig;
pub use error::{BasketError, Result};
pub use recommender::{Recommendation, Recommender};
pub use request::{Cart, RecommendResponse};
