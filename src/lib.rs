//! Inspect the label encoding of a segmentation mask dataset laid out as
//! `<root>/<Split>/<Area>/masks_png/`.

pub mod dataset;
pub mod loader;
pub mod preview;
pub mod scan;

pub use dataset::{mask_dir, Area, Split};
pub use loader::{load_all, load_one, Mask, MaskLoad};
pub use preview::{preview, PreviewReport, PREVIEW_LIMIT};
pub use scan::{scan, MaskFile, MaskListing};
