//! Input file discovery

use ignore::WalkBuilder;
use std::path::PathBuf;

pub const EXTENSION: &str = "cst";

/// Expand directories into the `*.cst` files below them, in file-name order. Hidden
/// entries and anything excluded by `.gitignore` or `.ignore` files are skipped. Other
/// paths are kept as given, existing or not, so that a missing file is reported by
/// whoever reads it.
pub fn expand<'a>(
    paths: impl IntoIterator<Item = &'a PathBuf>,
) -> Result<Vec<PathBuf>, ignore::Error> {
    let mut found = Vec::new();
    for path in paths {
        if !path.is_dir() {
            found.push(path.clone());
            continue;
        }

        let mut builder = WalkBuilder::new(path);
        builder.sort_by_file_name(|a, b| a.cmp(b));
        for result in builder.build() {
            let entry = result?;
            let is_file = entry.file_type().is_some_and(|kind| kind.is_file());
            if is_file && entry.path().extension().is_some_and(|ext| ext == EXTENSION) {
                found.push(entry.into_path());
            }
        }
    }
    log::debug!("{} input files", found.len());
    Ok(found)
}
