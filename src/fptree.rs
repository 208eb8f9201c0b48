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
use crate::item_counter::ItemCounter;
use crate::itemset::{min_count, FrequentItemsets, ItemSet};
use rayon::prelude::*;

#[derive(Debug)]
struct FPNode {
    item: Item,
    count: u32,
    children: Vec<usize>,
    parent: usize,
}

impl FPNode {
    fn new(item: Item, parent: usize) -> FPNode {
        FPNode {
            item,
            count: 0,
            children: Vec::with_capacity(1),
            parent,
        }
    }

    fn is_root(&self) -> bool {
        self.item.is_null()
    }
}

// Nodes are stored in fixed size cohorts so that growing the tree never
// moves existing nodes.
pub struct FPTree {
    nodes: Vec<Vec<FPNode>>,
    item_count: ItemCounter,
    next_node_id: usize,
    item_lists: Vec<Vec<usize>>,
}

const FPTREE_SPLAY: usize = 32;

impl FPTree {
    pub fn new() -> FPTree {
        let mut tree = FPTree {
            nodes: vec![],
            item_count: ItemCounter::new(),
            next_node_id: 0,
            item_lists: Vec::new(),
        };
        // Add root. It's its own parent.
        tree.add_node(0, Item::null());
        tree
    }

    fn add_node(&mut self, parent: usize, item: Item) -> usize {
        let id = self.next_node_id;
        self.next_node_id += 1;
        let (cohort, element) = self.sub_indicies_of(id);
        debug_assert!(cohort <= self.nodes.len());
        if self.nodes.len() <= cohort {
            self.nodes.push(Vec::with_capacity(FPTREE_SPLAY));
        }
        debug_assert!(element == self.nodes[cohort].len());
        self.nodes[cohort].push(FPNode::new(item, parent));
        if id != parent {
            self.get_node_mut(parent).children.push(id);
        }
        self.add_to_item_list(item, id);
        id
    }

    fn add_to_item_list(&mut self, item: Item, id: usize) {
        if item.is_null() {
            return;
        }
        let index = item.as_index();
        if index >= self.item_lists.len() {
            self.item_lists.resize(index + 1, vec![]);
        }
        self.item_lists[index].push(id);
    }

    fn sub_indicies_of(&self, id: usize) -> (usize, usize) {
        (id / FPTREE_SPLAY, id % FPTREE_SPLAY)
    }

    fn get_node_mut(&mut self, id: usize) -> &mut FPNode {
        let (cohort, index) = self.sub_indicies_of(id);
        &mut self.nodes[cohort][index]
    }

    fn get_node(&self, id: usize) -> &FPNode {
        let (cohort, index) = self.sub_indicies_of(id);
        &self.nodes[cohort][index]
    }

    fn child_of(&self, id: usize, item: Item) -> Option<usize> {
        self.get_node(id)
            .children
            .iter()
            .cloned()
            .find(|&child_id| self.get_node(child_id).item == item)
    }

    fn insert_child(&mut self, id: usize, item: Item, count: u32) -> usize {
        let child_id = match self.child_of(id, item) {
            Some(child_id) => child_id,
            None => self.add_node(id, item),
        };
        self.get_node_mut(child_id).count += count;
        child_id
    }

    pub fn insert(&mut self, transaction: &[Item], count: u32) {
        // Start iterating at the root node.
        let mut id = 0;
        for &item in transaction {
            // Keep a count of item frequencies of what's in the
            // tree to make sorting later easier.
            self.item_count.add(&item, count);
            id = self.insert_child(id, item, count);
        }
    }

    pub fn item_count(&self) -> &ItemCounter {
        &self.item_count
    }

    pub fn num_nodes(&self) -> usize {
        self.next_node_id
    }

    // The tree of prefix paths leading to every occurrence of item, each
    // weighted by that occurrence's count.
    pub fn construct_conditional_tree(&self, item: Item) -> FPTree {
        let mut conditional_tree = FPTree::new();
        let item_list = match self.item_lists.get(item.as_index()) {
            Some(item_list) => item_list,
            None => return conditional_tree,
        };
        for &node_id in item_list {
            conditional_tree.insert(
                &self.path_from_root_to_excluding(node_id),
                self.get_node(node_id).count,
            );
        }
        conditional_tree
    }

    fn path_from_root_to_excluding(&self, node_id: usize) -> Vec<Item> {
        let mut path = vec![];
        let mut id = self.get_node(node_id).parent;
        loop {
            let node = self.get_node(id);
            if node.is_root() {
                break;
            }
            path.push(node.item);
            id = node.parent;
        }
        path.reverse();
        path
    }
}

pub fn sort_transaction(transaction: &mut [Item], item_count: &ItemCounter) {
    item_count.sort_descending(transaction);
}

// Mines every itemset with support of at least min_support from the matrix.
pub fn fp_growth(matrix: &TransactionMatrix, min_support: f64) -> FrequentItemsets {
    let transactions = matrix.transactions();
    let num_transactions = transactions.len() as u32;
    let min_count = min_count(min_support, num_transactions);

    // First pass counts item frequencies, so that the second pass can insert
    // each transaction with its most frequent items nearest the root.
    let mut item_count = ItemCounter::new();
    for transaction in &transactions {
        for item in transaction {
            item_count.add(item, 1);
        }
    }

    let mut fptree = FPTree::new();
    for transaction in transactions {
        let mut transaction: Vec<Item> = transaction
            .into_iter()
            .filter(|item| item_count.get(item) >= min_count)
            .collect();
        sort_transaction(&mut transaction, &item_count);
        fptree.insert(&transaction, 1);
    }

    let itemsets = grow(&fptree, min_count, &[]);
    FrequentItemsets::new(itemsets, num_transactions)
}

fn grow(fptree: &FPTree, min_count: u32, path: &[Item]) -> Vec<ItemSet> {
    // Get list of items in the tree which are above the minimum support
    // threshold.
    let items: Vec<Item> = fptree.item_count().items_with_count_at_least(min_count);

    items
        .par_iter()
        .flat_map(|&item| -> Vec<ItemSet> {
            let mut itemset: Vec<Item> = Vec::from(path);
            itemset.push(item);

            let conditional_tree = fptree.construct_conditional_tree(item);
            let mut result = grow(&conditional_tree, min_count, &itemset);

            result.push(ItemSet::new(itemset, fptree.item_count().get(&item)));
            result
        })
        .collect()
}
