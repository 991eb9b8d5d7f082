use std::sync::Arc;

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
    /// Submits one frame, or `None` to start draining the encoder.
    pub fn send_frame(&mut self, frame: Option<&AVFrame>) -> Result<()> {
        self.require_open()?;
        self.inner.send_frame(frame)?;
        Ok(())
    }

    /// Collects every packet the encoder has ready.
    pub fn receive_packets(&mut self) -> Result<Vec<AVPacket>> {
        self.require_open()?;
        let inner: &mut AVCodecContext = &mut self.inner;
        let packets = drain(|| inner.receive_packet())?;
        trace!("Received {} packets", packets.len());
        Ok(packets)
    }

    /// Encodes a batch of frames, returning every packet produced while
    /// submitting them. Each frame is released once submitted.
    ///
    /// With an empty batch and `drain` set, a single flush is submitted
    /// instead and the packets the encoder still buffered are returned.
    pub fn encode(&mut self, frames: Vec<AVFrame>, drain: bool) -> Result<Vec<AVPacket>> {
        self.require_open()?;

        let mut inputs: Vec<Option<AVFrame>> = frames.into_iter().map(Some).collect();
        if inputs.is_empty() && drain {
            inputs.push(None);
        }

        let submitted = inputs.len();
        let mut packets = Vec::new();

        for frame in inputs {
            self.send_frame(frame.as_ref())?;
            drop(frame);

            packets.extend(self.receive_packets()?);
        }

        debug!("Encoded {} inputs into {} packets", submitted, packets.len());

        Ok(packets)
    }
}

pub struct EncoderBuilder {
    codec_name: Option<String>,
    codec_id: Option<ffi::AVCodecID>,
    options: Option<Options>,
    directives: Vec<CodecOption>,
}

impl EncoderBuilder {
    pub fn new() -> Self {
        Self {
            codec_name: None,
            codec_id: None,
            options: None,
            directives: Vec::new(),
        }
    }

    /// Opens the encoder and splits it into the halves of a pipeline.
    pub fn build(self) -> Result<(EncoderPusher, EncoderPuller)> {
        let codec = match self.codec_name {
            Some(codec_name) => Codec::find_encoder_by_name(&codec_name)?,
            None => Codec::find_encoder(mandatory(self.codec_id, "codec_name")?)?,
        };

        let encode_context = {
            let mut encode_context = CodecCtx::new(codec, &self.directives)?;
            encode_context.open(self.options)?;

            Arc::new(Mutex::new(encode_context))
        };

        Ok((
            EncoderPusher {
                encode_context: encode_context.clone(),
            },
            EncoderPuller {
                encode_context,
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

impl Default for EncoderBuilder {
    fn default() -> Self {
        Self::new()
    }
}
