use std::{ffi::c_int, ptr, sync::Arc};

use log::{debug, trace};
use rsmpeg::{
    avcodec::{AVCodecContext, AVPacket},
    avutil::AVFrame,
};
use tokio::sync::Mutex;

use crate::{
    builder::mandatory,
    codec::Codec,
    context::{CodecCtx, CodecOption},
    drain::drain,
    error::Result,
    ffi,
    options::Options,
};

mod puller;
mod pusher;

pub use puller::*;
pub use pusher::*;

impl CodecCtx {
    /// Submits one packet, or `None` to start draining the decoder.
    pub fn send_packet(&mut self, packet: Option<&AVPacket>) -> Result<()> {
        self.require_open()?;
        self.inner.send_packet(packet)?;
        Ok(())
    }

    /// Collects every frame the decoder has ready.
    pub fn receive_frames(&mut self) -> Result<Vec<AVFrame>> {
        self.require_open()?;
        let inner: &mut AVCodecContext = &mut self.inner;
        let frames = drain(|| inner.receive_frame())?;
        trace!("Received {} frames", frames.len());
        Ok(frames)
    }

    /// Submits `packet` and drains the frames it made available. `None`
    /// flushes: the returned frames are everything still buffered.
    pub fn decode(&mut self, packet: Option<&AVPacket>) -> Result<Vec<AVFrame>> {
        self.send_packet(packet)?;
        let frames = self.receive_frames()?;

        debug!(
            "Decoded {} frames from {}",
            frames.len(),
            if packet.is_some() { "packet" } else { "flush" }
        );

        Ok(frames)
    }

    /// Submits `packet` and tries to receive a single frame, returning it
    /// with the raw libavcodec result: 0 with a frame, otherwise the
    /// negative code of whichever call stopped (EAGAIN and EOF included).
    pub fn decode_step(&mut self, packet: Option<&AVPacket>) -> Result<(Option<AVFrame>, c_int)> {
        self.require_open()?;

        let packet_ptr = packet.map(|packet| packet.as_ptr()).unwrap_or(ptr::null());
        let ret = unsafe { ffi::avcodec_send_packet(self.inner.as_mut_ptr(), packet_ptr) };
        if ret < 0 {
            return Ok((None, ret));
        }

        let mut avframe = AVFrame::new();
        let ret = unsafe { ffi::avcodec_receive_frame(self.inner.as_mut_ptr(), avframe.as_mut_ptr()) };
        if ret < 0 {
            return Ok((None, ret));
        }

        Ok((Some(avframe), 0))
    }
}

pub struct DecoderBuilder {
    codec_name: Option<String>,
    codec_id: Option<ffi::AVCodecID>,
    options: Option<Options>,
    directives: Vec<CodecOption>,
}

impl DecoderBuilder {
    pub fn new() -> Self {
        Self {
            codec_name: None,
            codec_id: None,
            options: None,
            directives: Vec::new(),
        }
    }

    /// Opens the decoder and splits it into the halves of a pipeline.
    pub fn build(self) -> Result<(DecoderPusher, DecoderPuller)> {
        let codec = match self.codec_name {
            Some(codec_name) => Codec::find_decoder_by_name(&codec_name)?,
            None => Codec::find_decoder(mandatory(self.codec_id, "codec_name")?)?,
        };

        let decode_context = {
            let mut decode_context = CodecCtx::new(codec, &self.directives)?;
            decode_context.open(self.options)?;

            Arc::new(Mutex::new(decode_context))
        };

        Ok((
            DecoderPusher {
                decode_context: decode_context.clone(),
            },
            DecoderPuller {
                decode_context,
            },
        ))
    }

    builder_set!(codec_id, ffi::AVCodecID);
    builder_set!(options, Options);

    pub fn codec_name(mut self, codec_name: &str) -> Self {
        self.codec_name = Some(codec_name.to_string());
        self
    }

    pub fn directive(mut self, directive: CodecOption) -> Self {
        self.directives.push(directive);
        self
    }
}

impl Default for DecoderBuilder {
    fn default() -> Self {
        Self::new()
    }
}
