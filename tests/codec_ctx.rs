mod common;

use common::{frame, mpeg4_encoder, picture, raw_decoder, raw_encoder, video_directives};
use ffmpeg_codec_ctx::{
    ffi,
    frames::{audio_frame, read_yuv420p},
    CodecCtx, CodecOption, Error, State,
};

#[test]
fn decoder_returns_one_frame_per_raw_packet() {
    let mut encoder = raw_encoder();
    let frames = (0..5).map(frame).collect();
    let packets = encoder.encode(frames, false).unwrap();
    assert_eq!(packets.len(), 5);

    let mut decoder = raw_decoder();
    let mut decoded = Vec::new();
    for packet in &packets {
        decoded.extend(decoder.decode(Some(packet)).unwrap());
    }
    decoded.extend(decoder.decode(None).unwrap());

    assert_eq!(decoded.len(), 5);
    for (index, avframe) in decoded.iter().enumerate() {
        assert_eq!(read_yuv420p(avframe).unwrap(), picture(index));
    }
}

#[test]
fn empty_encode_with_drain_flushes_once() {
    let mut encoder = raw_encoder();
    let packets = encoder.encode(vec![frame(0)], false).unwrap();
    assert_eq!(packets.len(), 1);

    let flushed = encoder.encode(Vec::new(), true).unwrap();
    assert!(flushed.is_empty());

    // The encoder has seen end of stream, so a second flush is refused.
    assert!(encoder.encode(Vec::new(), true).is_err());
}

#[test]
fn delayed_packets_come_out_on_drain() {
    // Two B-frames per P-frame leave the last picture waiting for a reference.
    const FRAMES: usize = 8;

    let mut encoder = mpeg4_encoder();
    let mut packets = Vec::new();
    for index in 0..FRAMES {
        packets.extend(encoder.encode(vec![frame(index)], false).unwrap());
    }
    assert!(packets.len() < FRAMES);

    let flushed = encoder.encode(Vec::new(), true).unwrap();
    assert!(!flushed.is_empty());
    packets.extend(flushed);
    assert_eq!(packets.len(), FRAMES);

    let mut decoder = CodecCtx::decoder("mpeg4", &[]).unwrap();
    decoder.open(None).unwrap();
    let mut decoded = Vec::new();
    for packet in &packets {
        decoded.extend(decoder.decode(Some(packet)).unwrap());
    }
    decoded.extend(decoder.decode(None).unwrap());

    assert_eq!(decoded.len(), FRAMES);
    assert!(decoded.iter().all(|avframe| avframe.width == common::WIDTH));
}

#[test]
fn empty_encode_without_drain_submits_nothing() {
    let mut encoder = raw_encoder();
    assert!(encoder.encode(Vec::new(), false).unwrap().is_empty());

    let packets = encoder.encode(vec![frame(1)], false).unwrap();
    assert_eq!(packets.len(), 1);
}

#[test]
fn open_is_idempotent() {
    let mut decoder = CodecCtx::decoder("rawvideo", &video_directives()).unwrap();
    decoder.open(None).unwrap();
    let threads = decoder.thread_count();

    decoder.open(None).unwrap();
    assert_eq!(decoder.state(), State::Open);
    assert_eq!(decoder.thread_count(), threads);
}

#[test]
fn decoder_gets_default_threading() {
    let decoder = raw_decoder();
    let expected = (ffi::FF_THREAD_FRAME | ffi::FF_THREAD_SLICE) as i32;
    assert_eq!(decoder.thread_type(), expected);
}

#[test]
fn encoder_keeps_its_threading() {
    let encoder = raw_encoder();
    assert_eq!(encoder.thread_count(), 1);
}

#[test]
fn open_failure_names_the_codec() {
    // No dimensions or time base.
    let mut encoder = CodecCtx::encoder(
        "rawvideo",
        &[CodecOption::PixFmt(ffi::AVPixelFormat_AV_PIX_FMT_YUV420P)],
    )
    .unwrap();
    let error = encoder.open(None).unwrap_err();

    match &error {
        Error::Open { name, code, .. } => {
            assert_eq!(name, "rawvideo");
            assert!(*code < 0);
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(error.to_string().starts_with("error opening codec 'rawvideo:"));
    assert_eq!(encoder.state(), State::Configuring);
}

#[test]
fn encode_and_decode_need_an_open_context() {
    let mut encoder = CodecCtx::encoder("rawvideo", &video_directives()).unwrap();
    assert!(matches!(encoder.encode(vec![frame(0)], false), Err(Error::NotOpen)));

    let mut decoder = CodecCtx::decoder("rawvideo", &video_directives()).unwrap();
    assert!(matches!(decoder.decode(None), Err(Error::NotOpen)));
    assert!(matches!(decoder.decode_step(None), Err(Error::NotOpen)));
}

#[test]
fn unsupported_sample_format_fails_before_open() {
    let mut encoder = CodecCtx::encoder("pcm_s16le", &[]).unwrap();
    let result = encoder.set_sample_fmt(ffi::AVSampleFormat_AV_SAMPLE_FMT_FLT);

    assert!(matches!(result, Err(Error::UnsupportedSampleFormat { .. })));
    assert_eq!(encoder.state(), State::Configuring);
}

#[test]
fn pcm_frame_becomes_one_packet() {
    let mut encoder = CodecCtx::encoder(
        "pcm_s16le",
        &[
            CodecOption::SampleFmt(ffi::AVSampleFormat_AV_SAMPLE_FMT_S16),
            CodecOption::SampleRate(48000),
            CodecOption::Channels(2),
            CodecOption::TimeBase(1, 48000),
        ],
    )
    .unwrap();
    encoder.open(None).unwrap();

    let avframe = audio_frame(1024, ffi::AVSampleFormat_AV_SAMPLE_FMT_S16, 2, 48000, 0).unwrap();
    let packets = encoder.encode(vec![avframe], false).unwrap();

    assert_eq!(packets.len(), 1);
    assert_eq!(packets[0].size, 1024 * 2 * 2);
}

#[test]
fn decode_step_reports_raw_codes() {
    let mut encoder = raw_encoder();
    let packets = encoder.encode(vec![frame(3)], false).unwrap();

    let mut decoder = raw_decoder();
    let (avframe, code) = decoder.decode_step(Some(&packets[0])).unwrap();
    assert_eq!(code, 0);
    assert_eq!(read_yuv420p(&avframe.unwrap()).unwrap(), picture(3));

    let (avframe, code) = decoder.decode_step(None).unwrap();
    assert!(avframe.is_none());
    assert_eq!(code, ffi::AVERROR_EOF);
}

#[test]
fn closed_context_refuses_work() {
    let mut decoder = raw_decoder();
    decoder.close();
    decoder.close();

    assert_eq!(decoder.state(), State::Closed);
    assert!(matches!(decoder.decode(None), Err(Error::Closed)));
    assert!(matches!(decoder.open(None), Err(Error::Closed)));
    assert_eq!(decoder.video_size(), "64x48");

    decoder.free();
}

#[test]
fn unused_open_options_do_not_fail() {
    let mut encoder = CodecCtx::encoder("rawvideo", &video_directives()).unwrap();
    let options = ffmpeg_codec_ctx::Options::new().set("not_a_rawvideo_option", "1");

    encoder.open(Some(options)).unwrap();
    assert!(encoder.is_open());
}

#[test]
fn into_raw_hands_over_ownership() {
    let decoder = CodecCtx::decoder("rawvideo", &video_directives()).unwrap();
    let mut raw = decoder.into_raw().as_ptr();

    unsafe { ffi::avcodec_free_context(&mut raw) };
    assert!(raw.is_null());
}
