use async_trait::async_trait;
use log::{debug, trace};
use rsmpeg::avcodec::AVPacket;

use crate::{
    error::Result,
    stage::{SharedCodecCtx, Stage},
};

/// Drains every packet a shared encoder has ready.
pub struct EncoderPuller {
    pub(super) encode_context: SharedCodecCtx,
}

impl EncoderPuller {
    pub fn flusher(&self) -> EncoderFlusher {
        EncoderFlusher {
            encode_context: self.encode_context.clone(),
        }
    }
}

#[async_trait]
impl Stage<()> for EncoderPuller {
    type Output = Vec<AVPacket>;

    async fn process(&mut self, _: ()) -> Result<Vec<AVPacket>> {
        let mut encode_context = self.encode_context.lock().await;
        let packets = encode_context.receive_packets()?;

        for packet in &packets {
            trace!("Encoded packet: pts {}, size {}", packet.pts, packet.size);
        }

        Ok(packets)
    }
}

/// Submits the end-of-stream flush to a shared encoder.
pub struct EncoderFlusher {
    pub(super) encode_context: SharedCodecCtx,
}

#[async_trait]
impl Stage<()> for EncoderFlusher {
    type Output = ();

    async fn process(&mut self, _: ()) -> Result<()> {
        debug!("Flushing encode context...");
        self.encode_context.lock().await.send_frame(None)
    }
}
