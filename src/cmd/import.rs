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

//! Spreadsheet export (CSV) to dataset JSON.

use std::fs::write;
use std::path::Path;

use karuta_core::dataset::CardSet;
use karuta_core::error::ErrorReport;
use karuta_core::error::Fallible;
use karuta_core::types::card::Card;
use karuta_core::types::card::CardId;
use serde::Deserialize;

/// One sheet row. Column order does not matter; the header names do.
#[derive(Debug, Deserialize)]
struct Row {
    level: u32,
    initial: String,
    content: String,
}

/// Read the sheet and number the rows 1, 2, ... in order.
pub fn read_sheet(input: &Path) -> Fallible<CardSet> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(input)
        .map_err(|e| csv_error(input, e))?;
    let mut cards = Vec::new();
    for (index, row) in reader.deserialize::<Row>().enumerate() {
        let row = row.map_err(|e| csv_error(input, e))?;
        let id = CardId::try_from(index + 1)
            .map_err(|_| ErrorReport::new("too many rows in sheet"))?;
        cards.push(Card::new(id, row.initial, row.content, row.level));
    }
    CardSet::new(cards)
}

fn csv_error(input: &Path, e: csv::Error) -> ErrorReport {
    ErrorReport::new(format!("failed to read {}: {e}", input.display()))
}

pub fn import_csv(input: &str, output: Option<&str>) -> Fallible<()> {
    let cards = read_sheet(Path::new(input))?;
    let all: Vec<&Card> = cards.iter().collect();
    let json = serde_json::to_string_pretty(&all)?;
    match output {
        Some(path) => {
            write(path, json + "\n")?;
            log::info!("Wrote {} cards to {path}", cards.len());
        }
        None => println!("{json}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs::read_to_string;

    use super::*;
    use crate::helper::create_tmp_directory;

    #[test]
    fn test_import() -> Fallible<()> {
        let dir = create_tmp_directory()?;
        let input = dir.join("sheet.csv");
        write(
            &input,
            "level,initial,content\n3,あ,朝 寝坊 した\n1, い ,\"家の 鍵が, ない\"\n",
        )?;
        let output = dir.join("cards.json");
        import_csv(
            &input.display().to_string(),
            Some(&output.display().to_string()),
        )?;
        let text = read_to_string(&output)?;
        assert!(text.contains("朝 寝坊 した"));
        let cards = CardSet::from_json(&text)?;
        assert_eq!(cards.len(), 2);
        let second = cards.get(2).unwrap();
        assert_eq!(second.initial(), "い");
        assert_eq!(second.content(), "家の 鍵が, ない");
        assert_eq!(second.level(), 1);
        Ok(())
    }

    #[test]
    fn test_bad_level() -> Fallible<()> {
        let dir = create_tmp_directory()?;
        let input = dir.join("sheet.csv");
        write(&input, "level,initial,content\nhigh,あ,朝\n")?;
        let err = read_sheet(&input).unwrap_err();
        assert!(err.to_string().contains("sheet.csv"));
        Ok(())
    }

    #[test]
    fn test_missing_file() {
        assert!(read_sheet(Path::new("/definitely/not/here.csv")).is_err());
    }
}
