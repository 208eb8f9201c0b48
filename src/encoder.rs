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

use crate::error::{BasketError, Result};
use crate::item::Item;
use crate::itemizer::Itemizer;
use itertools::Itertools;

// One-hot encoding of a list of transactions: one row per transaction, one
// column per vocabulary entry. Column c holds the item with id c + 1.
#[derive(Debug)]
pub struct TransactionMatrix {
    itemizer: Itemizer,
    rows: Vec<Vec<bool>>,
}

impl TransactionMatrix {
    pub fn itemizer(&self) -> &Itemizer {
        &self.itemizer
    }

    pub fn vocabulary(&self) -> &[String] {
        self.itemizer.vocabulary()
    }

    pub fn num_transactions(&self) -> usize {
        self.rows.len()
    }

    pub fn num_items(&self) -> usize {
        self.itemizer.len()
    }

    pub fn rows(&self) -> &[Vec<bool>] {
        &self.rows
    }

    // The rows as sorted item lists. Empty rows are kept so that row
    // positions line up with the matrix.
    pub fn transactions(&self) -> Vec<Vec<Item>> {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .filter(|&(_, &present)| present)
                    .map(|(column, _)| Item::with_id(column as u32 + 1))
                    .collect()
            })
            .collect()
    }
}

// Builds the boolean matrix for the given transactions. The vocabulary is
// the sorted set of distinct non-empty item names, so the encoding only
// depends on the transactions themselves.
pub fn encode<S: AsRef<str>>(transactions: &[Vec<S>]) -> Result<TransactionMatrix> {
    let vocabulary: Vec<&str> = transactions
        .iter()
        .flat_map(|transaction| transaction.iter().map(|item| item.as_ref()))
        .filter(|item| !item.is_empty())
        .sorted()
        .dedup()
        .collect();

    if vocabulary.is_empty() {
        return Err(BasketError::mining(format!(
            "no items in {} transactions",
            transactions.len()
        )));
    }

    let mut itemizer = Itemizer::new();
    for name in &vocabulary {
        itemizer.id_of(name);
    }

    let rows = transactions
        .iter()
        .map(|transaction| {
            let mut row = vec![false; vocabulary.len()];
            for name in transaction.iter().map(|item| item.as_ref()) {
                if let Some(item) = itemizer.get(name) {
                    row[item.as_index() - 1] = true;
                }
            }
            row
        })
        .collect();

    Ok(TransactionMatrix { itemizer, rows })
}

#[cfg(test)]
mod tests {
    use super::encode;
    use crate::item::Item;

    #[test]
    fn test_encode() {
        let transactions = vec![
            vec!["MILK", "BREAD"],
            vec!["EGGS", "MILK", "", "MILK"],
            vec![""],
        ];
        let matrix = encode(&transactions).unwrap();
        assert_eq!(matrix.vocabulary(), &["BREAD", "EGGS", "MILK"]);
        assert_eq!(matrix.num_transactions(), 3);
        assert_eq!(matrix.num_items(), 3);
        assert_eq!(
            matrix.rows(),
            &[
                vec![true, false, true],
                vec![false, true, true],
                vec![false, false, false],
            ]
        );
        assert_eq!(
            matrix.transactions(),
            vec![
                vec![Item::with_id(1), Item::with_id(3)],
                vec![Item::with_id(2), Item::with_id(3)],
                vec![],
            ]
        );
    }

    #[test]
    fn test_encode_is_deterministic() {
        let transactions = vec![vec!["C", "A"], vec!["B"], vec!["A", "D"]];
        let first = encode(&transactions).unwrap();
        let second = encode(&transactions).unwrap();
        assert_eq!(first.vocabulary(), second.vocabulary());
        assert_eq!(first.rows(), second.rows());
    }

    #[test]
    fn test_encode_empty_vocabulary() {
        let no_transactions: Vec<Vec<String>> = vec![];
        assert!(encode(&no_transactions).is_err());
        let blank = vec![vec!["", ""]];
        assert!(encode(&blank).is_err());
    }
}
