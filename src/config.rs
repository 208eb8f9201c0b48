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

pub const DEFAULT_MIN_SUPPORT: f64 = 0.005;
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.4;
pub const DEFAULT_TOP_N: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MiningConfig {
    pub min_support: f64,
    pub min_confidence: f64,
    pub top_n: usize,
}

impl Default for MiningConfig {
    fn default() -> MiningConfig {
        MiningConfig {
            min_support: DEFAULT_MIN_SUPPORT,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl MiningConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_support) {
            return Err(BasketError::validation(
                "min_support",
                "minimum itemset support must be in range [0,1]",
            ));
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(BasketError::validation(
                "min_confidence",
                "minimum rule confidence threshold must be in range [0,1]",
            ));
        }
        if self.top_n == 0 {
            return Err(BasketError::validation(
                "top_n",
                "must recommend at least one item",
            ));
        }
        Ok(())
    }
}
