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

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BasketError>;

#[derive(Error, Debug)]
pub enum BasketError {
    // The request is unusable as sent; retrying it won't help.
    #[error("Invalid request field '{field}': {reason}")]
    Validation { field: String, reason: String },

    #[error("Malformed request body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Dataset {} is unreadable: {source}", .path.display())]
    StorageIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Dataset {} is corrupt: {reason}", .path.display())]
    StorageCorrupt { path: PathBuf, reason: String },

    // No items to mine, e.g. an empty dataset.
    #[error("Mining error: {0}")]
    Mining(String),
}

impl BasketError {
    pub fn validation<F: Into<String>, R: Into<String>>(field: F, reason: R) -> BasketError {
        BasketError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn storage_io(path: &Path, source: io::Error) -> BasketError {
        BasketError::StorageIo {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn storage_corrupt<R: Into<String>>(path: &Path, reason: R) -> BasketError {
        BasketError::StorageCorrupt {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    pub fn mining<R: Into<String>>(reason: R) -> BasketError {
        BasketError::Mining(reason.into())
    }

    // True for errors caused by what the caller sent, rather than by
    // the state of the dataset.
    pub fn is_client_error(&self) -> bool {
        match self {
            BasketError::Validation { .. } | BasketError::Json(_) => true,
            _ => false,
        }
    }

    pub fn is_storage_error(&self) -> bool {
        match self {
            BasketError::StorageIo { .. } | BasketError::StorageCorrupt { .. } => true,
            _ => false,
        }
    }
}
