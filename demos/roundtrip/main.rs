use clap::Parser;
use ffmpeg_codec_ctx::{
    decoders::DecoderBuilder,
    encoders::EncoderBuilder,
    ffi,
    frames::{fill_yuv420p, read_yuv420p, video_frame, yuv420p_size},
    CodecOption, Options, Stage,
};

#[derive(Parser, Debug)]
struct Args {
    #[arg(short, long, default_value = "mpeg4")]
    encoder: String,

    #[arg(short, long, default_value = "mpeg4")]
    decoder: String,

    #[arg(long, default_value_t = 320)]
    width: i32,

    #[arg(long, default_value_t = 240)]
    height: i32,

    #[arg(short, long, default_value_t = 50)]
    frames: usize,

    #[arg(short = 'r', long, default_value_t = 25)]
    framerate: i32,

    #[arg(short, long, default_value_t = 400_000)]
    bitrate: i64,
}

/// Moving diagonal bands, enough for the encoder to have something to do.
fn synthetic_picture(width: usize, height: usize, index: usize) -> Vec<u8> {
    let mut picture = vec![128; yuv420p_size(width, height)];
    for y in 0..height {
        for x in 0..width {
            picture[y * width + x] = ((x + y + index * 3) % 256) as u8;
        }
    }
    picture
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();
    log::info!(
        "Round-tripping {} frames of {}x{} through {} -> {}",
        args.frames,
        args.width,
        args.height,
        args.encoder,
        args.decoder
    );

    let (mut encoder_pusher, mut encoder_puller) = EncoderBuilder::new()
        .codec_name(&args.encoder)
        .directive(CodecOption::Dimension(args.width, args.height))
        .directive(CodecOption::PixFmt(ffi::AVPixelFormat_AV_PIX_FMT_YUV420P))
        .directive(CodecOption::TimeBase(1, args.framerate))
        .directive(CodecOption::FrameRate(args.framerate, 1))
        .directive(CodecOption::BitRate(args.bitrate))
        .directive(CodecOption::GopSize(args.framerate))
        .options(Options::new().set("mpeg_quant", "0"))
        .build()?;

    let (mut decoder_pusher, mut decoder_puller) = DecoderBuilder::new()
        .codec_name(&args.decoder)
        .directive(CodecOption::Dimension(args.width, args.height))
        .directive(CodecOption::PixFmt(ffi::AVPixelFormat_AV_PIX_FMT_YUV420P))
        .build()?;

    let width = args.width as usize;
    let height = args.height as usize;

    let mut encoded_bytes = 0;
    let mut decoded = 0;

    for index in 0..=args.frames {
        if index < args.frames {
            let mut avframe = video_frame(
                args.width,
                args.height,
                ffi::AVPixelFormat_AV_PIX_FMT_YUV420P,
                index as i64,
            )?;
            fill_yuv420p(&mut avframe, &synthetic_picture(width, height, index))?;
            encoder_pusher.process(Some(avframe)).await?;
        } else {
            encoder_puller.flusher().process(()).await?;
        }

        for packet in encoder_puller.process(()).await? {
            encoded_bytes += packet.size as usize;
            decoder_pusher.process(Some(packet)).await?;

            for avframe in decoder_puller.process(()).await? {
                let picture = read_yuv420p(&avframe)?;
                log::debug!("Decoded frame pts {} ({} bytes)", avframe.pts, picture.len());
                decoded += 1;
            }
        }
    }

    decoder_pusher.process(None).await?;
    decoded += decoder_puller.process(()).await?.len();

    let raw_bytes = yuv420p_size(width, height) * args.frames;
    log::info!(
        "Encoded {} bytes of raw video into {} bytes, decoded {} frames back",
        raw_bytes,
        encoded_bytes,
        decoded
    );

    Ok(())
}
