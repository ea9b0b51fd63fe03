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

use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

/// Serves files from the wasm-pack output directory.
///
/// Paths come straight from the request URL, so anything that could step
/// outside the directory is refused before touching the filesystem.
pub struct AssetDir {
    root: PathBuf,
}

#[derive(Debug, PartialEq)]
pub enum AssetError {
    /// Contains `..`, a root, or a drive prefix.
    Escapes,
    /// Not a regular file (missing, a directory, or a symlink).
    NotFound,
}

impl AssetDir {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn resolve(&self, path: &str) -> Result<PathBuf, AssetError> {
        let relative = Path::new(path);
        let plain = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !plain {
            return Err(AssetError::Escapes);
        }
        let full = self.root.join(relative);
        match full.symlink_metadata() {
            Ok(meta) if meta.is_file() => Ok(full),
            _ => Err(AssetError::NotFound),
        }
    }
}

pub fn content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase();
    match extension.as_str() {
        "js" | "mjs" => "text/javascript",
        "wasm" => "application/wasm",
        "json" => "application/json",
        "ts" => "text/plain",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use std::fs::create_dir;
    use std::fs::write;

    use super::*;
    use crate::helper::create_tmp_directory;
    use karuta_core::error::Fallible;

    #[test]
    fn test_resolves_file() -> Fallible<()> {
        let root = create_tmp_directory()?;
        write(root.join("app.js"), "")?;
        let assets = AssetDir::new(root.clone());
        assert_eq!(assets.resolve("app.js"), Ok(root.join("app.js")));
        assert_eq!(assets.resolve("./app.js"), Ok(root.join("./app.js")));
        Ok(())
    }

    #[test]
    fn test_rejects_escapes() -> Fallible<()> {
        let assets = AssetDir::new(create_tmp_directory()?);
        assert_eq!(assets.resolve("../secret"), Err(AssetError::Escapes));
        assert_eq!(assets.resolve("a/../../b"), Err(AssetError::Escapes));
        #[cfg(not(target_os = "windows"))]
        assert_eq!(assets.resolve("/etc/passwd"), Err(AssetError::Escapes));
        Ok(())
    }

    #[test]
    fn test_directories_and_missing() -> Fallible<()> {
        let root = create_tmp_directory()?;
        create_dir(root.join("snippets"))?;
        let assets = AssetDir::new(root);
        assert_eq!(assets.resolve("snippets"), Err(AssetError::NotFound));
        assert_eq!(assets.resolve("nope.wasm"), Err(AssetError::NotFound));
        Ok(())
    }

    #[cfg(not(target_os = "windows"))]
    #[test]
    fn test_symlink_refused() -> Fallible<()> {
        use std::os::unix::fs::symlink;

        let root = create_tmp_directory()?;
        write(root.join("real.js"), "")?;
        symlink(root.join("real.js"), root.join("link.js"))?;
        let assets = AssetDir::new(root);
        assert_eq!(assets.resolve("link.js"), Err(AssetError::NotFound));
        Ok(())
    }

    #[test]
    fn test_content_types() {
        assert_eq!(content_type(Path::new("karuta_wasm.js")), "text/javascript");
        assert_eq!(content_type(Path::new("karuta_wasm_bg.WASM")), "application/wasm");
        assert_eq!(content_type(Path::new("README")), "application/octet-stream");
    }
}
