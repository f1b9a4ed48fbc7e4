//! Export of item pixels to image files.

use crate::codec::{ImageCodec, normalize_format};
use crate::error::{BoardResult, ItemFailure};
use crate::types::Item;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Outcome of an export batch.
#[derive(Debug, Default)]
pub struct ExportReport {
    pub written: Vec<PathBuf>,
    pub failures: Vec<ItemFailure>,
}

impl ExportReport {
    pub fn total(&self) -> usize {
        self.written.len() + self.failures.len()
    }
}

fn file_stem(item: &Item) -> String {
    let stem = item
        .path
        .rsplit(['/', '\\'])
        .next()
        .map(|name| Path::new(name))
        .and_then(|name| name.file_stem())
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    if stem.is_empty() {
        format!("item-{}", item.id)
    } else {
        stem
    }
}

/// First `<dir>/<stem>.<ext>`, `<dir>/<stem>-1.<ext>`, ... that does not exist.
fn free_path(dir: &Path, stem: &str, ext: &str) -> PathBuf {
    let mut candidate = dir.join(format!("{stem}.{ext}"));
    let mut n = 1;
    while candidate.exists() {
        candidate = dir.join(format!("{stem}-{n}.{ext}"));
        n += 1;
    }
    candidate
}

fn export_one(item: &Item, dir: &Path, codec: &dyn ImageCodec) -> BoardResult<PathBuf> {
    let ext = if item.format.is_empty() {
        "png".to_string()
    } else {
        normalize_format(&item.format)
    };
    let bytes = codec.encode(item.pixels(), &ext)?;
    let path = free_path(dir, &file_stem(item), &ext);
    fs::write(&path, bytes)?;
    Ok(path)
}

/// Write the current pixels of each item (flip included) into `dir`.
///
/// Existing files are never overwritten. A failing item is recorded and the
/// rest of the batch continues.
pub fn export_items<'a>(
    items: impl IntoIterator<Item = &'a Item>,
    dir: &Path,
    codec: &dyn ImageCodec,
) -> ExportReport {
    let mut report = ExportReport::default();
    if let Err(e) = fs::create_dir_all(dir) {
        warn!(dir = %dir.display(), error = %e, "export directory unavailable");
    }

    for item in items {
        match export_one(item, dir, codec) {
            Ok(path) => report.written.push(path),
            Err(e) => {
                warn!(id = item.id, error = %e, "export failed");
                report.failures.push(ItemFailure::new(item.path.clone(), e));
            }
        }
    }

    info!(
        written = report.written.len(),
        total = report.total(),
        dir = %dir.display(),
        "export finished"
    );
    report
}
