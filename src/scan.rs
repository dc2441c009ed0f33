use crate::dataset::{mask_dir, Area, Split};
use log::{info, warn};
use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions (lowercase) accepted as mask images.
pub const MASK_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "tif", "tiff"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskFile {
    /// Display form of the file name (lossy for non-UTF-8 names).
    pub name: String,
    pub file_name: OsString,
    pub path: PathBuf,
}

/// Result of a folder scan: files in directory-listing order plus a lookup by
/// raw file name.
#[derive(Debug, Clone, Default)]
pub struct MaskListing {
    files: Vec<MaskFile>,
    by_name: HashMap<OsString, usize>,
}

impl MaskListing {
    fn push(&mut self, file: MaskFile) {
        self.by_name.insert(file.file_name.clone(), self.files.len());
        self.files.push(file);
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MaskFile> {
        self.files.iter()
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|f| f.name.as_str())
    }

    pub fn get<S: AsRef<OsStr>>(&self, name: S) -> Option<&Path> {
        self.by_name
            .get(name.as_ref())
            .map(|&idx| self.files[idx].path.as_path())
    }

    /// Owned file name -> path mapping.
    pub fn to_map(&self) -> HashMap<OsString, PathBuf> {
        self.files
            .iter()
            .map(|f| (f.file_name.clone(), f.path.clone()))
            .collect()
    }
}

impl<'a> IntoIterator for &'a MaskListing {
    type Item = &'a MaskFile;
    type IntoIter = std::slice::Iter<'a, MaskFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

pub fn is_mask_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            MASK_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Scans `<root>/<split>/<area>/masks_png` for mask images.
///
/// Never fails: a missing directory yields an empty listing and a warning,
/// unreadable entries are skipped.
pub fn scan(dataset_root: &Path, split: Split, area: Area) -> MaskListing {
    scan_dir(&mask_dir(dataset_root, split, area))
}

/// Lists direct children of `dir` that are regular files with a mask
/// extension.
pub fn scan_dir(dir: &Path) -> MaskListing {
    let mut listing = MaskListing::default();

    if !dir.exists() {
        warn!("mask folder does not exist: {}", dir.display());
        return listing;
    }

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
    {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("skipping unreadable entry in {}: {}", dir.display(), e);
                continue;
            }
        };

        if !entry.file_type().is_file() || !is_mask_extension(entry.path()) {
            continue;
        }

        listing.push(MaskFile {
            name: entry.file_name().to_string_lossy().to_string(),
            file_name: entry.file_name().to_os_string(),
            path: entry.path().to_path_buf(),
        });
    }

    info!("found {} mask files in {}", listing.len(), dir.display());
    listing
}
