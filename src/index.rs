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
use crate::item::Item;

// Inverted index from item to the sorted list of transaction ids containing
// it. Supports the Apriori counting pass.
pub struct Index {
    index: Vec<Vec<usize>>,
    transaction_count: usize,
}

impl Index {
    pub fn new() -> Index {
        Index {
            index: Vec::new(),
            transaction_count: 0,
        }
    }

    pub fn from_matrix(matrix: &TransactionMatrix) -> Index {
        let mut index = Index::new();
        for transaction in matrix.transactions() {
            index.insert(&transaction);
        }
        index
    }

    pub fn insert(&mut self, transaction: &[Item]) {
        let tid = self.transaction_count;
        self.transaction_count += 1;
        for item in transaction {
            let item_index = item.as_index();
            if self.index.len() <= item_index {
                self.index.resize(item_index + 1, vec![]);
            }
            self.index[item_index].push(tid);
        }
    }

    pub fn transaction_count(&self) -> usize {
        self.transaction_count
    }

    // Number of transactions containing every item in the itemset.
    pub fn count(&self, itemset: &[Item]) -> u32 {
        if itemset.is_empty() {
            return 0;
        }

        let mut tid_lists: Vec<&Vec<usize>> = vec![];
        for item in itemset {
            match self.index.get(item.as_index()) {
                Some(tids) => tid_lists.push(tids),
                None => return 0,
            }
        }

        if tid_lists.len() == 1 {
            return tid_lists[0].len() as u32;
        }

        // Walk the shortest list, and advance a cursor through each of the
        // others looking for the same tid.
        tid_lists.sort_by_key(|tids| tids.len());
        let mut p: Vec<usize> = vec![0; tid_lists.len()];
        let mut count = 0;
        for &tid in tid_lists[0].iter() {
            let mut tid_in_all_item_tid_lists = true;
            for i in 1..tid_lists.len() {
                while p[i] < tid_lists[i].len() && tid_lists[i][p[i]] < tid {
                    p[i] += 1;
                }
                if p[i] == tid_lists[i].len() || tid_lists[i][p[i]] != tid {
                    tid_in_all_item_tid_lists = false;
                    break;
                }
            }
            if tid_in_all_item_tid_lists {
                count += 1
            }
        }
        count
    }
}
