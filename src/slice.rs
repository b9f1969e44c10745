//! Assignment of frames to one-second slices.

use crate::error::{Result, SwatchError};
use std::fmt;

/// A stream's frame rate as reported by its metadata, e.g. `30000/1001`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRate {
    numerator: u32,
    denominator: u32,
}

impl FrameRate {
    pub fn new(numerator: i32, denominator: i32) -> Result<Self> {
        if numerator <= 0 || denominator <= 0 {
            return Err(SwatchError::InvalidFrameRate { numerator, denominator });
        }
        Ok(Self { numerator: numerator as u32, denominator: denominator as u32 })
    }

    pub fn numerator(&self) -> u32 {
        self.numerator
    }

    pub fn denominator(&self) -> u32 {
        self.denominator
    }

    /// Frames per second.
    pub fn fps(&self) -> f64 {
        f64::from(self.numerator) / f64::from(self.denominator)
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// Tracks which one-second slice the next frame belongs to.
///
/// The clock keeps the number of frames left in the current slice as a
/// float. While it is below zero the slice advances and one second's worth
/// of frames is added back, so the fractional remainder of rates such as
/// 29.97 carries into the next slice instead of being rounded away.
///
/// Call [`tick`](Self::tick) once per frame *before* accumulating the frame;
/// the returned index is the slice that frame belongs to.
#[derive(Debug, Clone)]
pub struct SliceClock {
    fps: f64,
    remaining: f64,
    slice: usize,
}

impl SliceClock {
    pub fn new(frame_rate: FrameRate) -> Self {
        let fps = frame_rate.fps();
        Self { fps, remaining: fps, slice: 0 }
    }

    pub fn tick(&mut self) -> usize {
        self.remaining -= 1.0;
        // Below 1 fps a single frame spans more than one slice.
        while self.remaining < 0.0 {
            self.slice += 1;
            // Add instead of assigning to keep the fractional remainder.
            self.remaining += self.fps;
        }
        self.slice
    }

    pub fn slice(&self) -> usize {
        self.slice
    }

    /// Frames left in the current slice, including any fractional carry.
    pub fn remaining(&self) -> f64 {
        self.remaining
    }
}
