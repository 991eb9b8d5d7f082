use async_trait::async_trait;
use log::debug;
use rsmpeg::avcodec::AVPacket;

use crate::{
    error::Result,
    stage::{SharedCodecCtx, Stage},
};

/// Feeds packets into a shared decoder. `None` starts draining it.
pub struct DecoderPusher {
    pub(super) decode_context: SharedCodecCtx,
}

impl DecoderPusher {
    pub fn context(&self) -> SharedCodecCtx {
        self.decode_context.clone()
    }
}

#[async_trait]
impl Stage<Option<AVPacket>> for DecoderPusher {
    type Output = ();

    async fn process(&mut self, packet: Option<AVPacket>) -> Result<()> {
        let mut decode_context = self.decode_context.lock().await;

        if let Err(error) = decode_context.send_packet(packet.as_ref()) {
            debug!("Dropping packet, reason: {}", error);
            return Err(error);
        }

        Ok(())
    }
}
