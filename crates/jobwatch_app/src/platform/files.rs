use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use jobwatch_core::SelectedFile;

/// Reads the picked files in order. Contents are loaded but not inspected.
pub fn load_files(paths: &[PathBuf]) -> Result<Vec<SelectedFile>> {
    paths.iter().map(|path| load_file(path)).collect()
}

fn load_file(path: &Path) -> Result<SelectedFile> {
    let payload = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(SelectedFile::new(name, payload))
}
