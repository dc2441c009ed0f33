use clap::ValueEnum;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Name of the per-area directory holding the label masks.
pub const MASKS_DIR: &str = "masks_png";

/// Dataset partition. The directory name matches the variant name exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize)]
pub enum Split {
    #[value(name = "Train", alias = "train")]
    Train,
    #[value(name = "Val", alias = "val")]
    Val,
    #[value(name = "Test", alias = "test")]
    Test,
}

impl Split {
    pub fn as_str(&self) -> &'static str {
        match self {
            Split::Train => "Train",
            Split::Val => "Val",
            Split::Test => "Test",
        }
    }
}

/// Geographic sub-region of a split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize)]
pub enum Area {
    #[value(name = "Urban", alias = "urban")]
    Urban,
    #[value(name = "Rural", alias = "rural")]
    Rural,
}

impl Area {
    pub fn as_str(&self) -> &'static str {
        match self {
            Area::Urban => "Urban",
            Area::Rural => "Rural",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `<root>/<split>/<area>/masks_png`
pub fn mask_dir(root: &Path, split: Split, area: Area) -> PathBuf {
    root.join(split.as_str()).join(area.as_str()).join(MASKS_DIR)
}
