use std::ffi::c_int;

use crate::{
    error::Result,
    ffi,
    formats::{Compliance, MbDecision},
};

use super::CodecCtx;

/// One configuration directive, applied to a context at creation or later.
#[derive(Debug, Clone)]
pub enum CodecOption {
    Width(c_int),
    Height(c_int),
    Dimension(c_int, c_int),
    PixFmt(ffi::AVPixelFormat),
    SampleFmt(ffi::AVSampleFormat),
    SampleRate(c_int),
    Channels(c_int),
    ChannelLayout(u64),
    BitRate(i64),
    TimeBase(c_int, c_int),
    PktTimeBase(c_int, c_int),
    FrameRate(c_int, c_int),
    GopSize(c_int),
    MaxBFrames(c_int),
    HasBFrames(c_int),
    Profile(c_int),
    Flag(u32),
    MbDecision(MbDecision),
    GlobalQuality(c_int),
    StrictCompliance(Compliance),
    ThreadCount(c_int),
    BitsPerRawSample(c_int),
    Extradata(Vec<u8>),
    /// Any AVOption of the context or its codec, by name.
    Opt(String, String),
}

impl CodecOption {
    pub fn apply(&self, ctx: &mut CodecCtx) -> Result<()> {
        match self {
            CodecOption::Width(width) => {
                ctx.set_width(*width);
            }
            CodecOption::Height(height) => {
                ctx.set_height(*height);
            }
            CodecOption::Dimension(width, height) => {
                ctx.set_dimension(*width, *height);
            }
            CodecOption::PixFmt(pix_fmt) => {
                ctx.set_pix_fmt(*pix_fmt);
            }
            CodecOption::SampleFmt(sample_fmt) => {
                ctx.set_sample_fmt(*sample_fmt)?;
            }
            CodecOption::SampleRate(sample_rate) => {
                ctx.set_sample_rate(*sample_rate);
            }
            CodecOption::Channels(channels) => {
                ctx.set_channels(*channels);
            }
            CodecOption::ChannelLayout(mask) => {
                ctx.set_channel_layout(*mask)?;
            }
            CodecOption::BitRate(bit_rate) => {
                ctx.set_bit_rate(*bit_rate);
            }
            CodecOption::TimeBase(num, den) => {
                ctx.set_time_base(*num, *den);
            }
            CodecOption::PktTimeBase(num, den) => {
                ctx.set_pkt_time_base(*num, *den);
            }
            CodecOption::FrameRate(num, den) => {
                ctx.set_frame_rate(*num, *den);
            }
            CodecOption::GopSize(gop_size) => {
                ctx.set_gop_size(*gop_size);
            }
            CodecOption::MaxBFrames(max_b_frames) => {
                ctx.set_max_b_frames(*max_b_frames);
            }
            CodecOption::HasBFrames(has_b_frames) => {
                ctx.set_has_b_frames(*has_b_frames);
            }
            CodecOption::Profile(profile) => {
                ctx.set_profile(*profile);
            }
            CodecOption::Flag(flag) => {
                ctx.set_flag(*flag);
            }
            CodecOption::MbDecision(decision) => {
                ctx.set_mb_decision(*decision);
            }
            CodecOption::GlobalQuality(quality) => {
                ctx.set_global_quality(*quality);
            }
            CodecOption::StrictCompliance(compliance) => {
                ctx.set_strict_compliance(*compliance);
            }
            CodecOption::ThreadCount(threads) => {
                ctx.set_thread_count(*threads);
            }
            CodecOption::BitsPerRawSample(bits) => {
                ctx.set_bits_per_raw_sample(*bits);
            }
            CodecOption::Extradata(extradata) => {
                ctx.set_extradata(extradata)?;
            }
            CodecOption::Opt(key, value) => {
                ctx.set_opt(key, value)?;
            }
        }

        Ok(())
    }
}
