use crate::loader::{load_one_with, ImageDecoder, MaskDecoder, MaskLoad};
use crate::scan::MaskListing;
use anyhow::Result;
use serde::Serialize;
use std::io::Write;

/// Number of files the preview looks at.
pub const PREVIEW_LIMIT: usize = 10;

#[derive(Debug, Clone, Serialize)]
pub struct PreviewEntry {
    pub name: String,
    pub path: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub labels: Option<Vec<u8>>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PreviewReport {
    pub entries: Vec<PreviewEntry>,
}

impl PreviewReport {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Union of the label sets of every decoded entry.
    pub fn all_labels(&self) -> Vec<u8> {
        let mut labels: Vec<u8> = self
            .entries
            .iter()
            .filter_map(|e| e.labels.as_ref())
            .flatten()
            .copied()
            .collect();
        labels.sort_unstable();
        labels.dedup();
        labels
    }
}

pub fn preview<W: Write>(listing: &MaskListing, out: &mut W) -> Result<PreviewReport> {
    preview_with(&ImageDecoder, listing, out)
}

/// Decodes the first `PREVIEW_LIMIT` files of `listing` straight from disk and
/// writes each one's label set to `out`.
pub fn preview_with<W: Write>(
    decoder: &dyn MaskDecoder,
    listing: &MaskListing,
    out: &mut W,
) -> Result<PreviewReport> {
    let mut report = PreviewReport::default();

    for file in listing.iter().take(PREVIEW_LIMIT) {
        writeln!(out, "file: {}, path: {}", file.name, file.path.display())?;

        let mut entry = PreviewEntry {
            name: file.name.clone(),
            path: file.path.to_string_lossy().to_string(),
            width: None,
            height: None,
            labels: None,
            error: None,
        };

        match load_one_with(decoder, &file.path) {
            MaskLoad::Decoded(mask) => {
                let labels: Vec<u8> = mask.labels().into_iter().collect();
                writeln!(out, "{:?}", labels)?;
                entry.width = Some(mask.width());
                entry.height = Some(mask.height());
                entry.labels = Some(labels);
            }
            MaskLoad::Failed(reason) => {
                writeln!(out, "failed: {}", reason)?;
                entry.error = Some(reason);
            }
        }

        report.entries.push(entry);
    }

    Ok(report)
}
