use anyhow::{anyhow, Result};
use image::GrayImage;
use indicatif::ProgressBar;
use log::{info, warn};
use std::collections::{BTreeSet, HashMap};
use std::ffi::OsString;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;

/// A decoded single-channel mask. Sample values are class labels.
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    image: GrayImage,
}

impl Mask {
    pub fn new(image: GrayImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Row-major samples.
    pub fn samples(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        self.image.get_pixel_checked(x, y).map(|p| p[0])
    }

    /// Distinct sample values, ascending.
    pub fn labels(&self) -> BTreeSet<u8> {
        let mut seen = [false; 256];
        for &v in self.samples() {
            seen[v as usize] = true;
        }
        seen.iter()
            .enumerate()
            .filter(|(_, hit)| **hit)
            .map(|(v, _)| v as u8)
            .collect()
    }
}

/// Outcome of decoding one file. Failures never propagate as errors.
#[derive(Debug)]
pub enum MaskLoad {
    Decoded(Mask),
    Failed(String),
}

impl MaskLoad {
    pub fn is_decoded(&self) -> bool {
        matches!(self, MaskLoad::Decoded(_))
    }

    pub fn into_mask(self) -> Option<Mask> {
        match self {
            MaskLoad::Decoded(mask) => Some(mask),
            MaskLoad::Failed(_) => None,
        }
    }
}

pub trait MaskDecoder {
    fn name(&self) -> &'static str;
    fn decode_grayscale(&self, path: &Path) -> Result<Mask>;
}

/// Decodes through the `image` crate, converting color inputs to luma.
pub struct ImageDecoder;
impl MaskDecoder for ImageDecoder {
    fn name(&self) -> &'static str {
        "image"
    }

    fn decode_grayscale(&self, path: &Path) -> Result<Mask> {
        let img = image::open(path)?;
        Ok(Mask::new(img.into_luma8()))
    }
}

pub fn load_one(path: &Path) -> MaskLoad {
    load_one_with(&ImageDecoder, path)
}

/// Decodes one file, turning both errors and decoder panics into `Failed`.
pub fn load_one_with(decoder: &dyn MaskDecoder, path: &Path) -> MaskLoad {
    let result = catch_unwind(AssertUnwindSafe(|| decoder.decode_grayscale(path)))
        .unwrap_or_else(|_| Err(anyhow!("{} decoder panicked", decoder.name())));

    match result {
        Ok(mask) => MaskLoad::Decoded(mask),
        Err(e) => {
            warn!(
                "failed to load mask {} ({}): {}",
                path.display(),
                decoder.name(),
                e
            );
            MaskLoad::Failed(e.to_string())
        }
    }
}

/// Loads every path, keeping successes keyed by base file name.
pub fn load_all<P: AsRef<Path>>(paths: &[P]) -> HashMap<OsString, Mask> {
    load_all_with(&ImageDecoder, paths, &ProgressBar::hidden())
}

pub fn load_all_with<P: AsRef<Path>>(
    decoder: &dyn MaskDecoder,
    paths: &[P],
    progress: &ProgressBar,
) -> HashMap<OsString, Mask> {
    let mut masks = HashMap::new();

    for path in paths {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| path.as_os_str().to_os_string());

        if let Some(mask) = load_one_with(decoder, path).into_mask() {
            masks.insert(name, mask);
        }
        progress.inc(1);
    }

    info!("loaded {} of {} mask files", masks.len(), paths.len());
    masks
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use std::ffi::OsStr;
    use std::path::PathBuf;

    struct FailingDecoder;
    impl MaskDecoder for FailingDecoder {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn decode_grayscale(&self, path: &Path) -> Result<Mask> {
            Err(anyhow!("cannot decode {}", path.display()))
        }
    }

    /// Panics on any path whose name starts with "boom", decodes the rest.
    struct PanickingDecoder;
    impl MaskDecoder for PanickingDecoder {
        fn name(&self) -> &'static str {
            "panicking"
        }

        fn decode_grayscale(&self, path: &Path) -> Result<Mask> {
            let name = path.file_name().unwrap().to_string_lossy();
            if name.starts_with("boom") {
                panic!("corrupt header in {}", name);
            }
            Ok(Mask::new(GrayImage::from_pixel(1, 1, Luma([3u8]))))
        }
    }

    #[test]
    fn test_labels_sorted_unique() {
        let img = GrayImage::from_fn(4, 3, |x, y| Luma([[5u8, 0, 2][y as usize] * (x % 2) as u8]));
        let mask = Mask::new(img);
        let labels: Vec<u8> = mask.labels().into_iter().collect();
        assert_eq!(labels, vec![0, 2, 5]);
        assert_eq!(mask.dimensions(), (4, 3));
        assert_eq!(mask.get(1, 0), Some(5));
        assert_eq!(mask.get(4, 0), None);
    }

    #[test]
    fn test_missing_file_fails_softly() {
        let load = load_one(Path::new("/nonexistent/dir/mask.png"));
        match load {
            MaskLoad::Failed(reason) => assert!(!reason.is_empty()),
            MaskLoad::Decoded(_) => panic!("expected failure"),
        }
    }

    #[test]
    fn test_custom_decoder_failure_is_filtered() {
        let paths = vec![PathBuf::from("a.png"), PathBuf::from("b.png")];
        let masks = load_all_with(&FailingDecoder, &paths, &ProgressBar::hidden());
        assert!(masks.is_empty());

        match load_one_with(&FailingDecoder, Path::new("c.png")) {
            MaskLoad::Failed(reason) => assert_eq!(reason, "cannot decode c.png"),
            MaskLoad::Decoded(_) => panic!("expected failure"),
        }
    }

    #[test]
    fn test_decoder_panic_becomes_failed() {
        match load_one_with(&PanickingDecoder, Path::new("boom.png")) {
            MaskLoad::Failed(reason) => assert!(reason.contains("panicking decoder panicked")),
            MaskLoad::Decoded(_) => panic!("expected failure"),
        }

        let paths = vec![
            PathBuf::from("a.png"),
            PathBuf::from("boom.png"),
            PathBuf::from("b.png"),
        ];
        let masks = load_all_with(&PanickingDecoder, &paths, &ProgressBar::hidden());
        assert_eq!(masks.len(), 2);
        assert!(masks.contains_key(OsStr::new("a.png")));
        assert!(masks.contains_key(OsStr::new("b.png")));
    }

    #[test]
    fn test_corrupt_png_reason_names_cause_once() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("fake.png");
        std::fs::write(&path, b"not a png at all").unwrap();

        let expected = image::open(&path).unwrap_err().to_string();
        match load_one(&path) {
            MaskLoad::Failed(reason) => assert_eq!(reason, expected),
            MaskLoad::Decoded(_) => panic!("expected failure"),
        }
    }

    #[test]
    fn test_duplicate_base_name_keeps_last() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let first = temp.path().join("one");
        let second = temp.path().join("two");
        std::fs::create_dir_all(&first).unwrap();
        std::fs::create_dir_all(&second).unwrap();

        GrayImage::from_pixel(2, 2, Luma([1u8]))
            .save(first.join("m.png"))
            .unwrap();
        GrayImage::from_pixel(3, 3, Luma([7u8]))
            .save(second.join("m.png"))
            .unwrap();

        let masks = load_all(&[first.join("m.png"), second.join("m.png")]);
        assert_eq!(masks.len(), 1);
        assert_eq!(masks[OsStr::new("m.png")].dimensions(), (3, 3));
    }
}
