use crate::color::RgbColor;
use crate::decode::RgbBuffer;

/// Slices reserved up front when no estimate is given.
pub const DEFAULT_SLICE_ESTIMATE: usize = 1000;
const MIN_SLICE_ESTIMATE: usize = 10;

/// Squared channel sums over every pixel of one decoded frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameSummary {
    /// The sum of the square of each red value in the frame.
    pub red: u64,
    /// The sum of the square of each green value in the frame.
    pub green: u64,
    /// The sum of the square of each blue value in the frame.
    pub blue: u64,
}

impl FrameSummary {
    pub fn new(red: u64, green: u64, blue: u64) -> Self {
        Self { red, green, blue }
    }

    /// Scan a decoded frame. Only the first three bytes of each pixel are
    /// read, so RGB24 and RGB0/RGBA layouts both work.
    pub fn from_rgb(frame: &RgbBuffer) -> Self {
        let mut summary = Self::default();
        for pixel in frame.data().chunks_exact(frame.bytes_per_pixel()) {
            let (r, g, b) = (u64::from(pixel[0]), u64::from(pixel[1]), u64::from(pixel[2]));
            summary.red += r * r;
            summary.green += g * g;
            summary.blue += b * b;
        }
        summary
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct SliceTotals {
    red: f64,
    green: f64,
    blue: f64,
    frames: u64,
}

/// Accumulates frame summaries per slice and reduces them to one color each.
///
/// Sums are kept as `f64` so long slices of large frames cannot overflow.
/// Storage doubles whenever a slice lands past the end, so slices that never
/// receive a frame still exist and come out black.
#[derive(Debug)]
pub struct SliceSummarizer {
    frame_pixels: u64,
    slices: Vec<SliceTotals>,
    slice_count: usize,
}

impl SliceSummarizer {
    /// `frame_pixels` is the number of pixels in every frame.
    pub fn new(frame_pixels: u64) -> Self {
        Self::with_estimate(frame_pixels, DEFAULT_SLICE_ESTIMATE)
    }

    pub fn with_estimate(frame_pixels: u64, slice_estimate: usize) -> Self {
        let capacity = slice_estimate.max(MIN_SLICE_ESTIMATE);
        Self { frame_pixels, slices: vec![SliceTotals::default(); capacity], slice_count: 0 }
    }

    /// Number of slices written so far, counting gaps: one more than the
    /// highest slice index seen.
    pub fn slice_count(&self) -> usize {
        self.slice_count
    }

    pub fn capacity(&self) -> usize {
        self.slices.len()
    }

    fn grow_to_fit(&mut self, slice: usize) {
        let mut length = self.slices.len();
        while slice >= length {
            length *= 2;
        }
        log::trace!("growing slice storage from {} to {} for slice {}", self.slices.len(), length, slice);
        self.slices.resize(length, SliceTotals::default());
    }

    pub fn add(&mut self, slice: usize, summary: FrameSummary) {
        if slice >= self.slices.len() {
            self.grow_to_fit(slice);
        }
        self.slice_count = self.slice_count.max(slice + 1);

        let totals = &mut self.slices[slice];
        totals.red += summary.red as f64;
        totals.green += summary.green as f64;
        totals.blue += summary.blue as f64;
        totals.frames += 1;
    }

    /// Reduce every slice to its root-mean-square color.
    ///
    /// Consumes the summarizer; a run produces its colors exactly once.
    pub fn finalize(self) -> Vec<RgbColor> {
        let frame_pixels = self.frame_pixels as f64;
        self.slices[..self.slice_count]
            .iter()
            .map(|totals| {
                if totals.frames == 0 || frame_pixels == 0.0 {
                    return RgbColor::BLACK;
                }
                let slice_pixels = totals.frames as f64 * frame_pixels;
                RgbColor::new(
                    root_mean_square(totals.red, slice_pixels),
                    root_mean_square(totals.green, slice_pixels),
                    root_mean_square(totals.blue, slice_pixels),
                )
            })
            .collect()
    }
}

fn root_mean_square(sum_of_squares: f64, count: f64) -> u8 {
    // `as` saturates, which clamps anything above 255.
    (sum_of_squares / count).sqrt().round() as u8
}
