#![allow(dead_code)]

use ffmpeg_codec_ctx::{
    ffi,
    frames::{fill_yuv420p, video_frame, yuv420p_size},
    AVFrame, CodecCtx, CodecOption,
};

pub const WIDTH: i32 = 64;
pub const HEIGHT: i32 = 48;

pub fn video_directives() -> Vec<CodecOption> {
    vec![
        CodecOption::Dimension(WIDTH, HEIGHT),
        CodecOption::PixFmt(ffi::AVPixelFormat_AV_PIX_FMT_YUV420P),
        CodecOption::TimeBase(1, 25),
    ]
}

pub fn raw_encoder() -> CodecCtx {
    let mut encoder = CodecCtx::encoder("rawvideo", &video_directives()).unwrap();
    encoder.open(None).unwrap();
    encoder
}

pub fn raw_decoder() -> CodecCtx {
    let mut decoder = CodecCtx::decoder("rawvideo", &video_directives()).unwrap();
    decoder.open(None).unwrap();
    decoder
}

/// MPEG-4 Part 2 with B-frames, so output lags input and the tail only
/// comes out on flush.
pub fn mpeg4_encoder() -> CodecCtx {
    let mut directives = video_directives();
    directives.push(CodecOption::BitRate(200_000));
    directives.push(CodecOption::MaxBFrames(2));
    let mut encoder = CodecCtx::encoder("mpeg4", &directives).unwrap();
    encoder.open(None).unwrap();
    encoder
}

/// A gradient that shifts with `index`, so every picture differs.
pub fn picture(index: usize) -> Vec<u8> {
    (0..yuv420p_size(WIDTH as usize, HEIGHT as usize))
        .map(|i| ((i + index * 7) % 251) as u8)
        .collect()
}

pub fn frame(index: usize) -> AVFrame {
    let mut avframe = video_frame(WIDTH, HEIGHT, ffi::AVPixelFormat_AV_PIX_FMT_YUV420P, index as i64).unwrap();
    fill_yuv420p(&mut avframe, &picture(index)).unwrap();
    avframe
}
