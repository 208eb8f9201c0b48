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

mod command_line_args;

use basket::error::BasketError;
use basket::recommender::Recommender;
use basket::request::Cart;
use command_line_args::{parse_args_or_exit, Arguments};

use std::error::Error;
use std::fs::{self, File};
use std::io::{self, Read};
use std::process;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn read_request_body(path: &str) -> Result<String, BasketError> {
    let body = if path == "-" {
        let mut body = String::new();
        io::stdin().read_to_string(&mut body).map(|_| body)
    } else {
        fs::read_to_string(path)
    };
    body.map_err(|e| BasketError::validation("request", format!("can't read {}: {}", path, e)))
}

fn run(args: &Arguments) -> Result<String, Box<dyn Error>> {
    let cart = match (&args.cart, &args.request_path) {
        (Some(cart), _) => Cart::from_comma_separated(cart)?,
        (None, Some(path)) => Cart::from_json(&read_request_body(path)?)?,
        (None, None) => return Err(BasketError::validation("cart", "no cart given").into()),
    };

    let recommender = Recommender::new(&args.dataset_path, args.mining_config())?;
    let recommendation = recommender.recommend(&cart)?;

    if let Some(ref path) = args.rules_output_path {
        let output = File::create(path)?;
        match recommendation.rules {
            Some(ref rules) => {
                rules.write_csv(output)?;
                info!(
                    "Wrote {} rules to {}",
                    rules.fp_rules().len() + rules.ap_rules().len(),
                    path
                );
            }
            None => info!("No rules to write to {}", path),
        }
    }

    Ok(serde_json::to_string_pretty(&recommendation.response)?)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let arguments = parse_args_or_exit();

    match run(&arguments) {
        Ok(response) => println!("{}", response),
        Err(err) => {
            error!("{}", err);
            let client_error = err
                .downcast_ref::<BasketError>()
                .map_or(false, |e| e.is_client_error());
            process::exit(if client_error { 2 } else { 1 });
        }
    }
}
