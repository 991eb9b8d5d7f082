#[macro_use]
mod builder;

pub mod codec;
pub mod context;
pub mod decoders;
pub mod drain;
pub mod encoders;
pub mod error;
pub mod formats;
pub mod frames;
pub mod options;
pub mod stage;

pub use codec::Codec;
pub use context::{CodecCtx, CodecOption, State};
pub use error::{Error, Result};
pub use options::Options;
pub use stage::{SharedCodecCtx, Stage};

pub use rsmpeg::avcodec::AVPacket;
pub use rsmpeg::avutil::AVFrame;
pub use rsmpeg::ffi;
