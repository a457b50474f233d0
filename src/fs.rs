use std::{fs::create_dir_all, io::Cursor, path::{Path, PathBuf}};

use anyhow::{anyhow, bail, Context, Result};
use tempfile::TempDir;
use walkdir::WalkDir;
use zip::ZipArchive;

/// Create the directory if it doesn’t exist; error if a non-directory exists there.
pub(crate) fn ensure_dir_exists(path: &Path) -> Result<()> {
    if path.exists() {
        if !path.is_dir() { bail!("Path exists but is not a directory: {}", path.display()); }
    } else {
        create_dir_all(path)
            .with_context(|| format!("Failed to create directory {}", path.display()))?;
    }
    Ok(())
}

/// Create a fresh scratch directory, removed when the returned guard is dropped.
/// Lives under `root` when given, otherwise under the system temp dir.
pub(crate) fn scratch_dir(root: Option<&Path>) -> Result<TempDir> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("blobframe-");
    match root {
        Some(root) => {
            ensure_dir_exists(root)?;
            builder.tempdir_in(root)
                .with_context(|| format!("Failed to create scratch dir in {}", root.display()))
        },
        None => builder.tempdir().context("Failed to create scratch dir"),
    }
}

/// Extracts an in-memory `.zip` archive into the target directory.
pub(crate) fn extract_zip_bytes(bytes: &[u8], dest_dir: &Path) -> Result<()> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| anyhow!("failed to read zip archive: {}", e))?;

    archive
        .extract(dest_dir)
        .map_err(|e| anyhow!("failed to extract zip archive to {:?}: {}", dest_dir, e))?;

    Ok(())
}

/// Recursively list files under `root` whose extension matches `ext` (case-insensitive), sorted.
pub(crate) fn find_files_with_extension(root: &Path, ext: &str) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
        let matches = entry.file_type().is_file() && entry.path().extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(ext));
        if matches {
            found.push(entry.into_path());
        }
    }
    Ok(found)
}

/// Find the file beside `path` with the same stem and extension `ext`, matching the
/// extension case-insensitively (`ROADS.SHP` pairs with `ROADS.DBF` or `ROADS.dbf`).
pub(crate) fn find_sibling(path: &Path, ext: &str) -> Result<Option<PathBuf>> {
    let exact = path.with_extension(ext);
    if exact.is_file() {
        return Ok(Some(exact));
    }

    let Some(stem) = path.file_stem() else { return Ok(None) };
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut matches = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))? {
        let candidate = entry.with_context(|| format!("Failed to list {}", dir.display()))?.path();
        let same_ext = candidate.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(ext));
        if same_ext && candidate.file_stem() == Some(stem) && candidate.is_file() {
            matches.push(candidate);
        }
    }
    matches.sort();
    Ok(matches.into_iter().next())
}
