use async_trait::async_trait;
use log::debug;
use rsmpeg::avutil::AVFrame;

use crate::{
    error::Result,
    stage::{SharedCodecCtx, Stage},
};

/// Drains every frame a shared decoder has ready.
pub struct DecoderPuller {
    pub(super) decode_context: SharedCodecCtx,
}

#[async_trait]
impl Stage<()> for DecoderPuller {
    type Output = Vec<AVFrame>;

    async fn process(&mut self, _: ()) -> Result<Vec<AVFrame>> {
        let mut decode_context = self.decode_context.lock().await;
        let frames = decode_context.receive_frames()?;

        if frames.is_empty() {
            debug!("No frames to be pulled");
        }

        Ok(frames)
    }
}
