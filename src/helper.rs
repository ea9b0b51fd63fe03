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

//! Test fixtures.

use std::error::Error;
use std::fs::create_dir_all;
use std::fs::write;
use std::path::PathBuf;

use karuta_core::error::Fallible;
use tempfile::tempdir;

/// For tests that mix error types, e.g. HTTP client errors.
pub type TestResult = Result<(), Box<dyn Error>>;

pub const SAMPLE_CARDS: &str = r#"[
  {"id": 1, "level": 3, "initial": "あ", "content": "朝 寝坊 した"},
  {"id": 2, "level": 1, "initial": "い", "content": "家の 鍵が ない"},
  {"id": 3, "level": 5, "initial": "う", "content": "雨 なのに 傘が ない"},
  {"id": 4, "level": 2, "initial": "え", "content": "駅で 迷子"},
  {"id": 5, "level": 4, "initial": "お", "content": "お財布 忘れた"}
]"#;

/// An empty directory that outlives the test.
pub fn create_tmp_directory() -> Fallible<PathBuf> {
    let dir = tempdir()?.keep();
    Ok(dir.canonicalize()?)
}

/// A directory holding `cards.json` and a fake wasm bundle under `pkg/`.
pub fn create_tmp_dataset() -> Fallible<PathBuf> {
    let dir = create_tmp_directory()?;
    write(dir.join("cards.json"), SAMPLE_CARDS)?;
    let pkg = dir.join("pkg");
    create_dir_all(&pkg)?;
    write(pkg.join("karuta_wasm.js"), "export default function init() {}\n")?;
    write(pkg.join("karuta_wasm_bg.wasm"), b"\0asm\x01\0\0\0")?;
    Ok(dir)
}
