//! In-memory decoder used to drive the pipeline without FFmpeg.

#![allow(dead_code)]

use std::collections::VecDeque;
use video_swatch::{
    FrameRate, Packet, ReceiveStatus, Result, RgbBuffer, SendStatus, StreamInfo, SwatchError, VideoDecoder,
};

pub const VIDEO_STREAM: usize = 0;
pub const AUDIO_STREAM: usize = 1;

#[derive(Debug, Clone)]
pub struct FakePacket {
    pub id: usize,
    pub stream: usize,
    pub frames: Vec<[u8; 3]>,
}

impl Packet for FakePacket {
    fn stream_index(&self) -> usize {
        self.stream
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Send(usize, SendStatus),
    Eof(SendStatus),
    Frame([u8; 3]),
}

/// Decoder with configurable latency and output bursts.
///
/// `delay` frames are held inside the decoder until end of stream is
/// signalled. At most `burst` frames are handed out between two submits;
/// while undelivered frames remain, submits report [`SendStatus::Full`].
pub struct FakeDecoder {
    info: StreamInfo,
    packets: VecDeque<FakePacket>,
    ready: VecDeque<[u8; 3]>,
    held: VecDeque<[u8; 3]>,
    delay: usize,
    burst: usize,
    released: usize,
    flushing: bool,
    fail_on_frame: Option<usize>,
    fail_on_send: Option<usize>,
    fail_on_read: Option<usize>,
    fail_on_eof: bool,
    frames_out: usize,
    reads: usize,
    bytes_per_pixel: usize,
    pub events: Vec<Event>,
}

impl FakeDecoder {
    pub fn new(width: u32, height: u32, frame_rate: FrameRate, packets: Vec<FakePacket>) -> Self {
        Self {
            info: StreamInfo { stream_index: VIDEO_STREAM, width, height, frame_rate },
            packets: packets.into(),
            ready: VecDeque::new(),
            held: VecDeque::new(),
            delay: 0,
            burst: usize::MAX,
            released: 0,
            flushing: false,
            fail_on_frame: None,
            fail_on_send: None,
            fail_on_read: None,
            fail_on_eof: false,
            frames_out: 0,
            reads: 0,
            bytes_per_pixel: 3,
            events: Vec::new(),
        }
    }

    /// One video packet per frame.
    pub fn one_frame_per_packet(width: u32, height: u32, frame_rate: FrameRate, frames: &[[u8; 3]]) -> Self {
        let packets = frames
            .iter()
            .enumerate()
            .map(|(id, &color)| FakePacket { id, stream: VIDEO_STREAM, frames: vec![color] })
            .collect();
        Self::new(width, height, frame_rate, packets)
    }

    pub fn with_delay(mut self, delay: usize) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_burst(mut self, burst: usize) -> Self {
        self.burst = burst;
        self
    }

    pub fn failing_on_frame(mut self, index: usize) -> Self {
        self.fail_on_frame = Some(index);
        self
    }

    /// Reject the packet with this id.
    pub fn failing_on_send(mut self, id: usize) -> Self {
        self.fail_on_send = Some(id);
        self
    }

    /// Fail the `index`th read from the container.
    pub fn failing_on_read(mut self, index: usize) -> Self {
        self.fail_on_read = Some(index);
        self
    }

    pub fn with_bytes_per_pixel(mut self, bytes_per_pixel: usize) -> Self {
        self.bytes_per_pixel = bytes_per_pixel;
        self
    }

    pub fn failing_on_eof(mut self) -> Self {
        self.fail_on_eof = true;
        self
    }

    pub fn sent_ids(&self) -> Vec<usize> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Send(id, SendStatus::Accepted) => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub fn frames(&self) -> Vec<[u8; 3]> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Frame(color) => Some(*color),
                _ => None,
            })
            .collect()
    }
}

impl VideoDecoder for FakeDecoder {
    type Packet = FakePacket;

    fn stream_info(&self) -> StreamInfo {
        self.info
    }

    fn bytes_per_pixel(&self) -> usize {
        self.bytes_per_pixel
    }

    fn read_packet(&mut self) -> Result<Option<FakePacket>> {
        let index = self.reads;
        self.reads += 1;
        if self.fail_on_read == Some(index) {
            return Err(SwatchError::ExternalCall { operation: "av_read_frame", code: -5 });
        }
        Ok(self.packets.pop_front())
    }

    fn send_packet(&mut self, packet: &FakePacket) -> Result<SendStatus> {
        assert_eq!(packet.stream, VIDEO_STREAM, "packet {} belongs to another stream", packet.id);
        assert!(!self.flushing, "packet sent after end of stream");
        if self.fail_on_send == Some(packet.id) {
            return Err(SwatchError::ExternalCall { operation: "avcodec_send_packet", code: -1094995529 });
        }
        self.released = 0;
        let status = if self.ready.is_empty() {
            for &color in &packet.frames {
                self.held.push_back(color);
                while self.held.len() > self.delay {
                    let next = self.held.pop_front().unwrap();
                    self.ready.push_back(next);
                }
            }
            SendStatus::Accepted
        } else {
            SendStatus::Full
        };
        self.events.push(Event::Send(packet.id, status));
        Ok(status)
    }

    fn send_eof(&mut self) -> Result<SendStatus> {
        if self.fail_on_eof {
            return Err(SwatchError::ExternalCall { operation: "avcodec_send_packet", code: -22 });
        }
        self.released = 0;
        let status = if self.ready.is_empty() {
            self.flushing = true;
            self.ready.extend(self.held.drain(..));
            SendStatus::Accepted
        } else {
            SendStatus::Full
        };
        self.events.push(Event::Eof(status));
        Ok(status)
    }

    fn receive_frame(&mut self, frame: &mut RgbBuffer) -> Result<ReceiveStatus> {
        if !self.flushing && self.released >= self.burst {
            return Ok(ReceiveStatus::Pending);
        }
        let Some(color) = self.ready.pop_front() else {
            return Ok(if self.flushing { ReceiveStatus::Finished } else { ReceiveStatus::Pending });
        };
        if self.fail_on_frame == Some(self.frames_out) {
            return Err(SwatchError::ExternalCall { operation: "avcodec_receive_frame", code: -1094995529 });
        }
        let pixels = frame.width() as usize * frame.height() as usize;
        let mut pixel = color.to_vec();
        pixel.resize(frame.bytes_per_pixel(), 0);
        let data: Vec<u8> = pixel.iter().copied().cycle().take(pixels * pixel.len()).collect();
        frame.fill_from(&data)?;
        self.released += 1;
        self.frames_out += 1;
        self.events.push(Event::Frame(color));
        Ok(ReceiveStatus::Frame)
    }
}

/// Decoder that never accepts input and never produces output.
pub struct StuckDecoder {
    pub info: StreamInfo,
}

impl VideoDecoder for StuckDecoder {
    type Packet = FakePacket;

    fn stream_info(&self) -> StreamInfo {
        self.info
    }

    fn read_packet(&mut self) -> Result<Option<FakePacket>> {
        Ok(Some(FakePacket { id: 0, stream: VIDEO_STREAM, frames: vec![[0, 0, 0]] }))
    }

    fn send_packet(&mut self, _packet: &FakePacket) -> Result<SendStatus> {
        Ok(SendStatus::Full)
    }

    fn send_eof(&mut self) -> Result<SendStatus> {
        Ok(SendStatus::Full)
    }

    fn receive_frame(&mut self, _frame: &mut RgbBuffer) -> Result<ReceiveStatus> {
        Ok(ReceiveStatus::Pending)
    }
}
