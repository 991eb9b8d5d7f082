use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{context::CodecCtx, error::Result};

/// A codec context shared between the halves of a pipeline.
pub type SharedCodecCtx = Arc<Mutex<CodecCtx>>;

/// One step of an async media pipeline.
#[async_trait]
pub trait Stage<I: Send + 'static>: Send {
    type Output: Send;

    async fn process(&mut self, input: I) -> Result<Self::Output>;
}
