//! The pull loop that feeds packets to a decoder and drains frames from it.
//!
//! The decoding service itself sits behind [`VideoDecoder`] so the loop can be
//! driven by the ffmpeg backend or by an in-memory decoder in tests.

use crate::error::{Result, SwatchError};
use crate::slice::FrameRate;

/// Metadata for the selected video stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamInfo {
    pub stream_index: usize,
    pub width: u32,
    pub height: u32,
    pub frame_rate: FrameRate,
}

impl StreamInfo {
    pub fn frame_pixels(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// Outcome of handing a packet (or end-of-stream) to the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendStatus {
    Accepted,
    /// The decoder's buffers are full. Drain frames, then send the same
    /// packet again.
    Full,
}

/// Outcome of asking the decoder for a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiveStatus {
    /// A frame was written into the caller's buffer.
    Frame,
    /// The decoder needs more input before it can produce another frame.
    Pending,
    /// The decoder has been flushed and will produce no more frames.
    Finished,
}

pub trait Packet {
    fn stream_index(&self) -> usize;
}

/// A demuxer and decoder pair for a single video stream.
pub trait VideoDecoder {
    type Packet: Packet;

    fn stream_info(&self) -> StreamInfo;

    /// Next packet from the container, from any stream. `None` at end of input.
    fn read_packet(&mut self) -> Result<Option<Self::Packet>>;

    fn send_packet(&mut self, packet: &Self::Packet) -> Result<SendStatus>;

    /// Signal end of input so the decoder releases buffered frames.
    fn send_eof(&mut self) -> Result<SendStatus>;

    /// Receive one decoded frame, converted to RGB, into `frame`.
    fn receive_frame(&mut self, frame: &mut RgbBuffer) -> Result<ReceiveStatus>;

    /// Bytes per pixel of the frames this decoder writes.
    fn bytes_per_pixel(&self) -> usize {
        3
    }
}

/// An owned, tightly packed RGB frame: `width * height` pixels of
/// `bytes_per_pixel` bytes each, red first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbBuffer {
    width: u32,
    height: u32,
    bytes_per_pixel: usize,
    data: Vec<u8>,
}

impl RgbBuffer {
    /// A zeroed frame. `bytes_per_pixel` must be 3 (RGB) or 4 (RGB plus one
    /// ignored byte).
    pub fn new(width: u32, height: u32, bytes_per_pixel: usize) -> Result<Self> {
        if !(3..=4).contains(&bytes_per_pixel) {
            return Err(SwatchError::PixelLayout { bytes_per_pixel });
        }
        let len = width as usize * height as usize * bytes_per_pixel;
        Ok(Self { width, height, bytes_per_pixel, data: vec![0; len] })
    }

    pub fn from_raw(width: u32, height: u32, bytes_per_pixel: usize, data: Vec<u8>) -> Result<Self> {
        let mut buffer = Self::new(width, height, bytes_per_pixel)?;
        buffer.fill_from(&data)?;
        Ok(buffer)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.bytes_per_pixel
    }

    pub fn row_len(&self) -> usize {
        self.width as usize * self.bytes_per_pixel
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Replace the whole frame with `data`, which must be exactly one frame.
    pub fn fill_from(&mut self, data: &[u8]) -> Result<()> {
        if data.len() != self.data.len() {
            return Err(SwatchError::FrameSize { expected: self.data.len(), actual: data.len() });
        }
        self.data.copy_from_slice(data);
        Ok(())
    }

    /// Copy rows out of a plane whose lines are `stride` bytes apart, dropping
    /// the padding at the end of each line.
    pub fn fill_from_strided(&mut self, plane: &[u8], stride: usize) -> Result<()> {
        let row_len = self.row_len();
        let rows = self.height as usize;
        let needed = if rows == 0 { 0 } else { (rows - 1) * stride + row_len };
        if stride < row_len || plane.len() < needed {
            return Err(SwatchError::FrameSize { expected: needed, actual: plane.len() });
        }
        for (y, row) in self.data.chunks_exact_mut(row_len).enumerate() {
            let start = y * stride;
            row.copy_from_slice(&plane[start..start + row_len]);
        }
        Ok(())
    }
}

/// Pull every frame of the selected stream through `on_frame`.
///
/// Packets are submitted one at a time. A full decoder is drained and the
/// same packet resubmitted; once input runs out the decoder is flushed and
/// drained a final time so no buffered frame is lost. Returns the number of
/// frames decoded.
pub fn consume_frames<D, F>(decoder: &mut D, mut on_frame: F) -> Result<u64>
where
    D: VideoDecoder,
    F: FnMut(u64, &RgbBuffer) -> Result<()>,
{
    let info = decoder.stream_info();
    let mut frame = RgbBuffer::new(info.width, info.height, decoder.bytes_per_pixel())?;
    let mut frames = 0u64;

    while let Some(packet) = decoder.read_packet()? {
        if packet.stream_index() != info.stream_index {
            continue;
        }
        loop {
            let status = decoder.send_packet(&packet)?;
            let drained = drain(decoder, &mut frame, &mut frames, &mut on_frame)?;
            match status {
                SendStatus::Accepted => break,
                SendStatus::Full if drained == 0 => return Err(SwatchError::DecoderStalled),
                SendStatus::Full => log::trace!("decoder full, drained {} frames before resubmitting", drained),
            }
        }
    }

    log::debug!("end of input after {} frames, flushing decoder", frames);
    loop {
        let status = decoder.send_eof()?;
        let drained = drain(decoder, &mut frame, &mut frames, &mut on_frame)?;
        match status {
            SendStatus::Accepted => break,
            SendStatus::Full if drained == 0 => return Err(SwatchError::DecoderStalled),
            SendStatus::Full => {}
        }
    }

    Ok(frames)
}

fn drain<D, F>(decoder: &mut D, frame: &mut RgbBuffer, frames: &mut u64, on_frame: &mut F) -> Result<u64>
where
    D: VideoDecoder,
    F: FnMut(u64, &RgbBuffer) -> Result<()>,
{
    let mut drained = 0;
    loop {
        match decoder.receive_frame(frame)? {
            ReceiveStatus::Frame => {
                on_frame(*frames, frame)?;
                *frames += 1;
                drained += 1;
            }
            ReceiveStatus::Pending | ReceiveStatus::Finished => return Ok(drained),
        }
    }
}
