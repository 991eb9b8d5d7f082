use std::ffi::c_int;

use rsmpeg::{avutil::AVFrame, UnsafeDerefMut};

use crate::{
    error::{check, Error, Result},
    ffi,
};

/// Allocates a video frame with buffers for `pix_fmt`.
pub fn video_frame(width: c_int, height: c_int, pix_fmt: ffi::AVPixelFormat, pts: i64) -> Result<AVFrame> {
    let mut avframe = AVFrame::new();
    avframe.set_format(pix_fmt);
    avframe.set_width(width);
    avframe.set_height(height);
    avframe.set_pts(pts);
    avframe.alloc_buffer()?;
    Ok(avframe)
}

/// Allocates an audio frame of `nb_samples` samples in the default layout
/// for `channels`.
pub fn audio_frame(
    nb_samples: c_int,
    sample_fmt: ffi::AVSampleFormat,
    channels: c_int,
    sample_rate: c_int,
    pts: i64,
) -> Result<AVFrame> {
    let mut avframe = AVFrame::new();
    unsafe {
        let raw = avframe.deref_mut();
        raw.nb_samples = nb_samples;
        raw.format = sample_fmt;
        raw.sample_rate = sample_rate;
        raw.pts = pts;
        ffi::av_channel_layout_default(&mut raw.ch_layout, channels);
    }
    avframe.alloc_buffer()?;
    Ok(avframe)
}

struct Plane {
    data: *mut u8,
    width: usize,
    height: usize,
    linesize: usize,
}

fn yuv420p_dimensions(avframe: &AVFrame) -> Result<(usize, usize)> {
    if avframe.format != ffi::AVPixelFormat_AV_PIX_FMT_YUV420P {
        return Err(Error::FrameLayout(format!(
            "expected yuv420p, frame has format {}",
            avframe.format
        )));
    }
    if avframe.width < 0 || avframe.height < 0 {
        return Err(Error::FrameLayout(format!(
            "negative frame size {}x{}",
            avframe.width, avframe.height
        )));
    }

    Ok((avframe.width as usize, avframe.height as usize))
}

/// The three YUV 4:2:0 planes of `avframe`. Fails on frames without buffers
/// and on bottom-up or short strides.
fn yuv420p_planes(avframe: &AVFrame) -> Result<[Plane; 3]> {
    let (width, height) = yuv420p_dimensions(avframe)?;
    let chroma_width = (width + 1) / 2;
    let chroma_height = (height + 1) / 2;

    let plane = |index: usize, width: usize, height: usize| -> Result<Plane> {
        let data = avframe.data[index];
        if data.is_null() {
            return Err(Error::FrameLayout(format!("plane {} has no buffer", index)));
        }
        let linesize = avframe.linesize[index];
        if linesize < 0 || (linesize as usize) < width {
            return Err(Error::FrameLayout(format!(
                "plane {} line size {} does not fit width {}",
                index, linesize, width
            )));
        }
        Ok(Plane {
            data,
            width,
            height,
            linesize: linesize as usize,
        })
    };

    Ok([
        plane(0, width, height)?,
        plane(1, chroma_width, chroma_height)?,
        plane(2, chroma_width, chroma_height)?,
    ])
}

/// Bytes a tightly packed YUV 4:2:0 picture of this size takes.
pub fn yuv420p_size(width: usize, height: usize) -> usize {
    let chroma = ((width + 1) / 2) * ((height + 1) / 2);
    width * height + 2 * chroma
}

/// Copies a packed Y, Cb, Cr buffer into the planes of `avframe`.
pub fn fill_yuv420p(avframe: &mut AVFrame, source: &[u8]) -> Result<()> {
    let (width, height) = yuv420p_dimensions(avframe)?;
    let expected = yuv420p_size(width, height);
    if source.len() != expected {
        return Err(Error::FrameLayout(format!(
            "expected {} bytes of yuv420p, got {}",
            expected,
            source.len()
        )));
    }

    check("av_frame_make_writable", unsafe {
        ffi::av_frame_make_writable(avframe.as_mut_ptr())
    })?;

    // Buffers may have moved.
    let mut offset = 0;
    for plane in yuv420p_planes(avframe)? {
        for row in 0..plane.height {
            let line = unsafe { std::slice::from_raw_parts_mut(plane.data.add(row * plane.linesize), plane.width) };
            line.copy_from_slice(&source[offset..offset + plane.width]);
            offset += plane.width;
        }
    }

    Ok(())
}

/// Reads the planes of `avframe` into one packed Y, Cb, Cr buffer.
pub fn read_yuv420p(avframe: &AVFrame) -> Result<Vec<u8>> {
    let planes = yuv420p_planes(avframe)?;
    let mut output = Vec::with_capacity(yuv420p_size(planes[0].width, planes[0].height));

    for plane in planes {
        for row in 0..plane.height {
            let line = unsafe { std::slice::from_raw_parts(plane.data.add(row * plane.linesize), plane.width) };
            output.extend_from_slice(line);
        }
    }

    Ok(output)
}
