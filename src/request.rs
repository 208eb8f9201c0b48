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
use crate::item::normalize_item_name;
use serde::{Deserialize, Serialize};

// A shopper's cart with every name normalized. Never empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cart {
    items: Vec<String>,
}

impl Cart {
    pub fn new<I, S>(names: I) -> Result<Cart>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Cart::from_names("cart", names)
    }

    fn from_names<I, S>(field: &str, names: I) -> Result<Cart>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let items: Vec<String> = names
            .into_iter()
            .filter_map(|name| normalize_item_name(name.as_ref()))
            .collect();
        if items.is_empty() {
            return Err(BasketError::validation(field, "contains no item names"));
        }
        Ok(Cart { items })
    }

    // "milk, bread,eggs"
    pub fn from_comma_separated(list: &str) -> Result<Cart> {
        Cart::new(list.split(','))
    }

    pub fn from_json(body: &str) -> Result<Cart> {
        let request: CartRequest = serde_json::from_str(body)?;
        request.into_cart()
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct GroceryEntry {
    #[serde(default)]
    pub name: Option<String>,
    // Accepted for compatibility; recommendations only use item presence.
    #[serde(default)]
    pub quantity: Option<serde_json::Value>,
}

// Request body. Either a plain list of names, or a grocery list of
// {name, quantity} entries. When both are sent the plain list wins.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CartRequest {
    #[serde(default)]
    pub cart: Option<Vec<String>>,
    #[serde(default, rename = "groceryList")]
    pub grocery_list: Option<Vec<GroceryEntry>>,
}

impl CartRequest {
    pub fn into_cart(self) -> Result<Cart> {
        if let Some(cart) = self.cart {
            return Cart::from_names("cart", cart);
        }
        if let Some(grocery_list) = self.grocery_list {
            // Entries without a name are skipped.
            return Cart::from_names(
                "groceryList",
                grocery_list.into_iter().filter_map(|entry| entry.name),
            );
        }
        Err(BasketError::validation(
            "cart",
            "please provide a \"cart\" list or \"groceryList\"",
        ))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub input_cart: Vec<String>,
    pub recommendations: Vec<String>,
}
