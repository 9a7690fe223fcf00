use std::path::Path;

use anyhow::{anyhow, bail, Result};
use log::{debug, info};
use rand::seq::SliceRandom;

use crate::data::sample::{Sample, SampleSource};

/// Number of digit classes.
pub const CLASS_COUNT: usize = 10;

// IDX magic numbers, big-endian: 2051 marks an image file, 2049 a label
// file.
const IMAGE_MAGIC: u32 = 2051;
const LABEL_MAGIC: u32 = 2049;

/// Parsed MNIST-style training set with a shuffled sampling cursor.
///
/// Pixels stay as their raw 0-255 bytes; scaling to `[0, 1]` happens when
/// a sample is produced, not at parse time.  The default cursor pops from
/// a shuffled index list and reshuffles when it runs dry; an optional
/// label restriction replaces it with a wrapping in-order walk over the
/// matching indices.
#[derive(Debug)]
pub struct MnistSet {
    images: Vec<Vec<u8>>,
    labels: Vec<u8>,
    pixels_per_image: usize,
    cursor: Vec<usize>,
    focus: Option<LabelCursor>,
}

/// Wrapping in-order walk over the indices that carry one label.
#[derive(Debug)]
struct LabelCursor {
    matches: Vec<usize>,
    next: usize,
}

// ---------------------------------------------------------------------------
// IDX parsing
// ---------------------------------------------------------------------------

fn read_u32(bytes: &[u8], offset: usize) -> Result<u32> {
    let slice = bytes
        .get(offset..offset + 4)
        .ok_or_else(|| anyhow!("IDX header truncated at byte {offset}"))?;
    Ok(u32::from_be_bytes([slice[0], slice[1], slice[2], slice[3]]))
}

/// Parses an IDX3 image buffer into flat row-major pixel vectors.
pub fn parse_idx_images(bytes: &[u8]) -> Result<Vec<Vec<u8>>> {
    let magic = read_u32(bytes, 0)?;
    if magic != IMAGE_MAGIC {
        bail!("IDX image magic is {magic}, expected {IMAGE_MAGIC}");
    }
    let count = read_u32(bytes, 4)? as usize;
    let rows = read_u32(bytes, 8)? as usize;
    let cols = read_u32(bytes, 12)? as usize;
    let pixels = rows
        .checked_mul(cols)
        .ok_or_else(|| anyhow!("IDX image dimensions {rows}x{cols} overflow"))?;
    if pixels == 0 {
        bail!("IDX image file declares zero-sized {rows}x{cols} images");
    }
    let data_len = count
        .checked_mul(pixels)
        .ok_or_else(|| anyhow!("IDX image file declares an impossible size ({count} x {pixels})"))?;
    let data = &bytes[16..];
    if data.len() < data_len {
        bail!(
            "IDX image file too short: {count} images of {rows}x{cols} need {data_len} data bytes, found {}",
            data.len()
        );
    }
    Ok(data[..data_len].chunks_exact(pixels).map(|chunk| chunk.to_vec()).collect())
}

/// Parses an IDX1 label buffer.
pub fn parse_idx_labels(bytes: &[u8]) -> Result<Vec<u8>> {
    let magic = read_u32(bytes, 0)?;
    if magic != LABEL_MAGIC {
        bail!("IDX label magic is {magic}, expected {LABEL_MAGIC}");
    }
    let count = read_u32(bytes, 4)? as usize;
    let data = &bytes[8..];
    if data.len() < count {
        bail!("IDX label file too short: declares {count} labels, found {}", data.len());
    }
    Ok(data[..count].to_vec())
}

// ---------------------------------------------------------------------------
// Sampling
// ---------------------------------------------------------------------------

impl MnistSet {
    /// Builds the set from raw IDX image and label buffers.
    pub fn from_idx_bytes(image_bytes: &[u8], label_bytes: &[u8]) -> Result<MnistSet> {
        let images = parse_idx_images(image_bytes)?;
        let labels = parse_idx_labels(label_bytes)?;
        if images.len() != labels.len() {
            bail!("IDX file mismatch: {} images but {} labels", images.len(), labels.len());
        }
        if images.is_empty() {
            bail!("IDX files hold no samples");
        }
        for &label in &labels {
            if usize::from(label) >= CLASS_COUNT {
                bail!("label {label} is outside the {CLASS_COUNT} digit classes");
            }
        }
        let pixels_per_image = images[0].len();
        Ok(MnistSet { images, labels, pixels_per_image, cursor: Vec::new(), focus: None })
    }

    /// Reads and parses an MNIST-style image/label file pair.
    pub fn load(image_path: &Path, label_path: &Path) -> Result<MnistSet> {
        let image_bytes = std::fs::read(image_path)
            .map_err(|e| anyhow!("Failed to read image file {}: {}", image_path.display(), e))?;
        let label_bytes = std::fs::read(label_path)
            .map_err(|e| anyhow!("Failed to read label file {}: {}", label_path.display(), e))?;
        let set = MnistSet::from_idx_bytes(&image_bytes, &label_bytes)?;
        info!("loaded {} images of {} pixels", set.len(), set.pixels_per_image());
        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn pixels_per_image(&self) -> usize {
        self.pixels_per_image
    }

    /// Restricts sampling to images carrying `label`, served in index
    /// order and wrapping after the last match.
    pub fn restrict_to_label(&mut self, label: u8) -> Result<()> {
        if usize::from(label) >= CLASS_COUNT {
            bail!("label {label} is outside the {CLASS_COUNT} digit classes");
        }
        let matches: Vec<usize> = self
            .labels
            .iter()
            .enumerate()
            .filter(|(_, &l)| l == label)
            .map(|(index, _)| index)
            .collect();
        if matches.is_empty() {
            bail!("no loaded sample carries label {label}");
        }
        debug!("restricting sampling to {} images of the digit {label}", matches.len());
        self.focus = Some(LabelCursor { matches, next: 0 });
        Ok(())
    }

    /// Draws the next sample along with its label.
    pub fn draw(&mut self) -> (u8, Sample) {
        let index = self.next_index();
        (self.labels[index], self.sample_at(index))
    }

    fn next_index(&mut self) -> usize {
        if let Some(focus) = &mut self.focus {
            let index = focus.matches[focus.next];
            focus.next = (focus.next + 1) % focus.matches.len();
            return index;
        }
        if self.cursor.is_empty() {
            debug!("reshuffling the sampling cursor");
            self.cursor = (0..self.images.len()).collect();
            self.cursor.shuffle(&mut rand::thread_rng());
        }
        self.cursor.pop().expect("a refilled cursor is never empty")
    }

    /// Sample at a fixed index: scaled pixels in, a one-hot digit out.
    fn sample_at(&self, index: usize) -> Sample {
        let input = self.images[index].iter().map(|&px| f64::from(px) / 255.0).collect();
        let mut target = vec![0.0; CLASS_COUNT];
        target[usize::from(self.labels[index])] = 1.0;
        Sample { input, target }
    }
}

impl SampleSource for MnistSet {
    fn next_sample(&mut self) -> Sample {
        self.draw().1
    }
}
