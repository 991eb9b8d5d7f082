use std::ffi::{c_char, c_int, CStr};

use crate::ffi;

static COLOR_RANGE_NAMES: [(ffi::AVColorRange, &str); 3] = [
    (ffi::AVColorRange_AVCOL_RANGE_UNSPECIFIED, "unknown"),
    (ffi::AVColorRange_AVCOL_RANGE_MPEG, "tv"),
    (ffi::AVColorRange_AVCOL_RANGE_JPEG, "pc"),
];

/// Short name of a color range, as ffprobe prints it.
pub fn color_range_name(range: ffi::AVColorRange) -> Option<&'static str> {
    COLOR_RANGE_NAMES
        .iter()
        .find(|(value, _)| *value == range)
        .map(|(_, name)| *name)
}

/// Renders a codec tag as its four characters, least significant byte first.
pub fn fourcc(tag: u32) -> String {
    tag.to_le_bytes().iter().map(|&byte| byte as char).collect()
}

pub fn sample_fmt_name(sample_fmt: ffi::AVSampleFormat) -> Option<String> {
    c_str(unsafe { ffi::av_get_sample_fmt_name(sample_fmt) })
}

pub fn pix_fmt_name(pix_fmt: ffi::AVPixelFormat) -> Option<String> {
    c_str(unsafe { ffi::av_get_pix_fmt_name(pix_fmt) })
}

pub fn media_type_name(media_type: ffi::AVMediaType) -> Option<String> {
    c_str(unsafe { ffi::av_get_media_type_string(media_type) })
}

/// How strictly the codec follows the standard (`strict_std_compliance`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compliance {
    VeryStrict = 2,
    Strict = 1,
    Normal = 0,
    Unofficial = -1,
    Experimental = -2,
}

/// Macroblock decision algorithm (`mb_decision`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MbDecision {
    Simple = 0,
    Bits = 1,
    RateDistortion = 2,
}

pub(crate) fn c_str(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }

    Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
}

pub(crate) fn rational(num: c_int, den: c_int) -> ffi::AVRational {
    ffi::AVRational { num, den }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_range_names_match_ffprobe() {
        assert_eq!(color_range_name(ffi::AVColorRange_AVCOL_RANGE_UNSPECIFIED), Some("unknown"));
        assert_eq!(color_range_name(ffi::AVColorRange_AVCOL_RANGE_MPEG), Some("tv"));
        assert_eq!(color_range_name(ffi::AVColorRange_AVCOL_RANGE_JPEG), Some("pc"));
        assert_eq!(color_range_name(ffi::AVColorRange_AVCOL_RANGE_NB), None);
    }

    #[test]
    fn fourcc_reads_low_byte_first() {
        let tag = u32::from_le_bytes(*b"avc1");
        assert_eq!(fourcc(tag), "avc1");
    }

    #[test]
    fn format_names() {
        assert_eq!(sample_fmt_name(ffi::AVSampleFormat_AV_SAMPLE_FMT_S16).as_deref(), Some("s16"));
        assert_eq!(pix_fmt_name(ffi::AVPixelFormat_AV_PIX_FMT_YUV420P).as_deref(), Some("yuv420p"));
        assert_eq!(media_type_name(ffi::AVMediaType_AVMEDIA_TYPE_AUDIO).as_deref(), Some("audio"));
    }
}
