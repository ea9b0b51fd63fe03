// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Loading the dataset and the drill configuration from disk.

use std::fs::read_to_string;
use std::path::PathBuf;

use karuta_core::config::DrillConfig;
use karuta_core::dataset::CardSet;
use karuta_core::error::ErrorReport;
use karuta_core::error::Fallible;
use karuta_core::error::fail;

/// Used when no dataset path is given.
pub const DEFAULT_DATASET: &str = "cards.json";

pub fn dataset_path(path: Option<String>) -> PathBuf {
    PathBuf::from(path.unwrap_or_else(|| DEFAULT_DATASET.to_string()))
}

/// Read and validate the card dataset. Duplicate ids are an error.
pub fn load_cards(path: Option<String>) -> Fallible<CardSet> {
    let path = dataset_path(path);
    if !path.is_file() {
        return fail(format!("dataset does not exist: {}", path.display()));
    }
    let text = read_to_string(&path)?;
    let cards = CardSet::from_json(&text).map_err(|e| {
        ErrorReport::new(format!("failed to load {}: {}", path.display(), e.message()))
    })?;
    log::debug!("Loaded {} cards from {}", cards.len(), path.display());
    Ok(cards)
}

/// Read the drill configuration, or use the defaults when no path is given.
pub fn load_config(path: Option<&str>) -> Fallible<DrillConfig> {
    match path {
        None => Ok(DrillConfig::default()),
        Some(path) => {
            let text = read_to_string(path)
                .map_err(|e| ErrorReport::new(format!("failed to read {path}: {e}")))?;
            DrillConfig::from_toml(&text)
        }
    }
}
