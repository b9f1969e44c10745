//! [`VideoDecoder`] backed by the FFmpeg libraries.

use crate::decode::{Packet, ReceiveStatus, RgbBuffer, SendStatus, StreamInfo, VideoDecoder};
use crate::error::{Result, SwatchError};
use crate::slice::FrameRate;
use ffmpeg_next::codec::packet::Packet as AvPacket;
use ffmpeg_next::format::context::Input;
use ffmpeg_next::format::Pixel;
use ffmpeg_next::software::scaling::{Context as Scaler, Flags};
use ffmpeg_next::util::error::EAGAIN;
use ffmpeg_next::util::frame::video::Video as VideoFrame;
use ffmpeg_next::Error as AvError;
use log::debug;
use std::path::Path;
use std::time::Instant;

pub struct FfmpegPacket(AvPacket);

impl Packet for FfmpegPacket {
    fn stream_index(&self) -> usize {
        self.0.stream()
    }
}

/// Demuxer, decoder and RGB24 scaler for the best video stream of a file.
pub struct FfmpegDecoder {
    // Fields drop in declaration order, which releases them in the reverse
    // of the order they were acquired in `open`.
    rgb_frame: VideoFrame,
    decoded_frame: VideoFrame,
    scaler: Scaler,
    decoder: ffmpeg_next::decoder::Video,
    input: Input,
    info: StreamInfo,
}

fn external(operation: &'static str, error: AvError) -> SwatchError {
    SwatchError::ExternalCall { operation, code: i32::from(error) }
}

impl FfmpegDecoder {
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SwatchError::InputNotFound(path.to_path_buf()));
        }
        ffmpeg_next::init().map_err(|e| external("ffmpeg init", e))?;
        let library_level = if log::log_enabled!(log::Level::Debug) {
            ffmpeg_next::util::log::Level::Info
        } else {
            ffmpeg_next::util::log::Level::Error
        };
        ffmpeg_next::util::log::set_level(library_level);

        let input = ffmpeg_next::format::input(&path).map_err(|e| external("avformat_open_input", e))?;
        debug!("opened input {}", path.display());
        if log::log_enabled!(log::Level::Debug) {
            ffmpeg_next::format::context::input::dump(&input, 0, path.to_str());
        }

        let (stream_index, parameters, rate) = {
            let stream = input.streams().best(ffmpeg_next::media::Type::Video).ok_or(SwatchError::NoVideoStream)?;
            let average = stream.avg_frame_rate();
            let rate = if average.numerator() > 0 && average.denominator() > 0 { average } else { stream.rate() };
            (stream.index(), stream.parameters(), rate)
        };
        debug!("found video stream (index: {})", stream_index);

        let context = ffmpeg_next::codec::context::Context::from_parameters(parameters)
            .map_err(|e| external("avcodec_parameters_to_context", e))?;
        let decoder = context.decoder().video().map_err(|e| external("avcodec_open2", e))?;
        debug!("opened codec");

        let (width, height) = (decoder.width(), decoder.height());
        let scaler = Scaler::get(decoder.format(), width, height, Pixel::RGB24, width, height, Flags::BILINEAR)
            .map_err(|e| external("sws_getContext", e))?;

        let info = StreamInfo {
            stream_index,
            width,
            height,
            frame_rate: FrameRate::new(rate.numerator(), rate.denominator())?,
        };

        Ok(Self {
            rgb_frame: VideoFrame::empty(),
            decoded_frame: VideoFrame::empty(),
            scaler,
            decoder,
            input,
            info,
        })
    }
}

impl VideoDecoder for FfmpegDecoder {
    type Packet = FfmpegPacket;

    fn stream_info(&self) -> StreamInfo {
        self.info
    }

    fn read_packet(&mut self) -> Result<Option<FfmpegPacket>> {
        let mut packet = AvPacket::empty();
        match packet.read(&mut self.input) {
            Ok(()) => Ok(Some(FfmpegPacket(packet))),
            Err(AvError::Eof) => Ok(None),
            Err(e) => Err(external("av_read_frame", e)),
        }
    }

    fn send_packet(&mut self, packet: &FfmpegPacket) -> Result<SendStatus> {
        match self.decoder.send_packet(&packet.0) {
            Ok(()) => Ok(SendStatus::Accepted),
            Err(AvError::Other { errno }) if errno == EAGAIN => Ok(SendStatus::Full),
            Err(e) => Err(external("avcodec_send_packet", e)),
        }
    }

    fn send_eof(&mut self) -> Result<SendStatus> {
        match self.decoder.send_eof() {
            // Already flushed.
            Ok(()) | Err(AvError::Eof) => Ok(SendStatus::Accepted),
            Err(AvError::Other { errno }) if errno == EAGAIN => Ok(SendStatus::Full),
            Err(e) => Err(external("avcodec_send_packet", e)),
        }
    }

    fn receive_frame(&mut self, frame: &mut RgbBuffer) -> Result<ReceiveStatus> {
        let receive_started = Instant::now();
        match self.decoder.receive_frame(&mut self.decoded_frame) {
            Ok(()) => {}
            Err(AvError::Other { errno }) if errno == EAGAIN => return Ok(ReceiveStatus::Pending),
            Err(AvError::Eof) => return Ok(ReceiveStatus::Finished),
            Err(e) => return Err(external("avcodec_receive_frame", e)),
        }
        let receive_took = receive_started.elapsed();

        let conversion_started = Instant::now();
        self.scaler
            .run(&self.decoded_frame, &mut self.rgb_frame)
            .map_err(|e| external("sws_scale", e))?;
        frame.fill_from_strided(self.rgb_frame.data(0), self.rgb_frame.stride(0))?;
        debug!("receive {:?}, conversion {:?}", receive_took, conversion_started.elapsed());

        Ok(ReceiveStatus::Frame)
    }
}
