use async_trait::async_trait;
use rsmpeg::avutil::AVFrame;

use crate::{
    error::Result,
    stage::{SharedCodecCtx, Stage},
};

/// Feeds frames into a shared encoder. `None` starts draining it.
pub struct EncoderPusher {
    pub(super) encode_context: SharedCodecCtx,
}

impl EncoderPusher {
    pub fn context(&self) -> SharedCodecCtx {
        self.encode_context.clone()
    }
}

#[async_trait]
impl Stage<Option<AVFrame>> for EncoderPusher {
    type Output = ();

    async fn process(&mut self, frame: Option<AVFrame>) -> Result<()> {
        let mut encode_context = self.encode_context.lock().await;
        encode_context.send_frame(frame.as_ref())
    }
}
