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

use std::fmt::Display;
use std::fmt::Formatter;

use karuta_core::dataset::CardSet;
use karuta_core::error::Fallible;
use karuta_core::types::card::CardId;
use karuta_core::types::range::CardRange;

use crate::dataset::load_cards;

/// What `check` found in a dataset that loaded.
#[derive(Debug, PartialEq)]
pub struct DatasetReport {
    pub card_count: usize,
    /// Numbers 1-100 that have no card; drills skip them.
    pub missing: Vec<CardId>,
    /// Cards no range can reach.
    pub unreachable: Vec<CardId>,
}

impl DatasetReport {
    pub fn new(cards: &CardSet) -> Self {
        Self {
            card_count: cards.len(),
            missing: cards.missing_in(CardRange::full()),
            unreachable: cards.outside(CardRange::full()),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.missing.is_empty() && self.unreachable.is_empty()
    }
}

impl Display for DatasetReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Cards: {}", self.card_count)?;
        if !self.missing.is_empty() {
            writeln!(f, "Missing numbers: {}", join_ids(&self.missing))?;
        }
        if !self.unreachable.is_empty() {
            writeln!(f, "Out of range: {}", join_ids(&self.unreachable))?;
        }
        if self.is_complete() {
            writeln!(f, "OK")?;
        }
        Ok(())
    }
}

fn join_ids(ids: &[CardId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn check_dataset(dataset: Option<String>) -> Fallible<()> {
    let cards = load_cards(dataset)?;
    print!("{}", DatasetReport::new(&cards));
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use super::*;
    use crate::helper::create_tmp_dataset;
    use crate::helper::create_tmp_directory;

    #[test]
    fn test_report() -> Fallible<()> {
        let dir = create_tmp_dataset()?;
        let cards = load_cards(Some(dir.join("cards.json").display().to_string()))?;
        let report = DatasetReport::new(&cards);
        assert_eq!(report.card_count, 5);
        assert_eq!(report.missing.len(), 95);
        assert_eq!(report.missing[0], 6);
        assert!(report.unreachable.is_empty());
        assert!(!report.is_complete());
        assert!(report.to_string().starts_with("Cards: 5\nMissing numbers: 6, 7, 8"));
        Ok(())
    }

    #[test]
    fn test_out_of_range_ids() -> Fallible<()> {
        let cards = CardSet::from_json(
            r#"[{"id": 0, "level": 1, "initial": "a", "content": "x"},
                {"id": 101, "level": 1, "initial": "b", "content": "y"}]"#,
        )?;
        let report = DatasetReport::new(&cards);
        assert_eq!(report.unreachable, vec![0, 101]);
        assert!(report.to_string().contains("Out of range: 0, 101"));
        Ok(())
    }

    #[test]
    fn test_check_rejects_duplicates() -> Fallible<()> {
        let dir = create_tmp_directory()?;
        let path = dir.join("cards.json");
        write(
            &path,
            r#"[{"id": 2, "level": 1, "initial": "a", "content": "x"},
                {"id": 2, "level": 1, "initial": "b", "content": "y"}]"#,
        )?;
        let result = check_dataset(Some(path.display().to_string()));
        assert!(result.unwrap_err().to_string().contains("duplicate card id 2"));
        Ok(())
    }
}
