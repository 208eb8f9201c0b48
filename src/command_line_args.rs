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

use std::env;
use std::io;
use std::process;

use argparse::{ArgumentParser, Store, StoreOption};
use basket::config::{MiningConfig, DEFAULT_MIN_CONFIDENCE, DEFAULT_MIN_SUPPORT, DEFAULT_TOP_N};

pub struct Arguments {
    pub dataset_path: String,
    pub cart: Option<String>,
    pub request_path: Option<String>,
    pub rules_output_path: Option<String>,
    pub min_support: f64,
    pub min_confidence: f64,
    pub top_n: usize,
}

impl Arguments {
    pub fn mining_config(&self) -> MiningConfig {
        MiningConfig {
            min_support: self.min_support,
            min_confidence: self.min_confidence,
            top_n: self.top_n,
        }
    }
}

pub fn parse_args_or_exit() -> Arguments {
    let mut args: Arguments = Arguments {
        dataset_path: String::new(),
        cart: None,
        request_path: None,
        rules_output_path: None,
        min_support: DEFAULT_MIN_SUPPORT,
        min_confidence: DEFAULT_MIN_CONFIDENCE,
        top_n: DEFAULT_TOP_N,
    };

    {
        let mut parser = ArgumentParser::new();
        parser.set_description(
            "Stores a shopping cart in a dataset of past carts, and recommends \
             items that are frequently bought with it.",
        );

        parser
            .refer(&mut args.dataset_path)
            .add_option(
                &["--dataset"],
                Store,
                "Dataset of past carts in CSV format. Created if missing.",
            )
            .metavar("file_path")
            .required();

        parser
            .refer(&mut args.cart)
            .add_option(
                &["--cart"],
                StoreOption,
                "Comma separated list of the items in the cart.",
            )
            .metavar("items");

        parser
            .refer(&mut args.request_path)
            .add_option(
                &["--request"],
                StoreOption,
                "JSON request body with a \"cart\" or \"groceryList\" field. \
                 Use - to read from stdin.",
            )
            .metavar("file_path");

        parser
            .refer(&mut args.rules_output_path)
            .add_option(
                &["--rules-output"],
                StoreOption,
                "File path in which to store the mined rules. \
                 Format: source, antecedent -> consequent, confidence, lift, support.",
            )
            .metavar("file_path");

        parser
            .refer(&mut args.min_support)
            .add_option(
                &["--min-support"],
                Store,
                "Minimum itemset support threshold, in range [0,1].",
            )
            .metavar("threshold");

        parser
            .refer(&mut args.min_confidence)
            .add_option(
                &["--min-confidence"],
                Store,
                "Minimum rule confidence threshold, in range [0,1].",
            )
            .metavar("threshold");

        parser
            .refer(&mut args.top_n)
            .add_option(
                &["--top-n"],
                Store,
                "Maximum number of items to recommend.",
            )
            .metavar("count");

        if env::args().count() == 1 {
            // Nothing useful to do if printing help fails.
            let _ = parser.print_help("Usage:", &mut io::stderr());
            process::exit(1);
        }

        if let Err(err) = parser.parse_args() {
            process::exit(err);
        }
    }

    match (&args.cart, &args.request_path) {
        (Some(_), Some(_)) => {
            eprintln!("Only one of --cart and --request may be given");
            process::exit(2);
        }
        (None, None) => {
            eprintln!("One of --cart or --request is required");
            process::exit(2);
        }
        _ => {}
    }

    args
}
