use std::ffi::{c_char, c_int, CStr};

use rsmpeg::error::RsmpegError;
use thiserror::Error;

use crate::ffi;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to allocate {0}")]
    Alloc(&'static str),

    #[error("codec '{0}' not found")]
    CodecNotFound(String),

    #[error("error opening codec '{name}:{long_name}', averror: {message}")]
    Open {
        name: String,
        long_name: String,
        code: c_int,
        message: String,
    },

    #[error("codec '{codec}' doesn't support sample format {format}")]
    UnsupportedSampleFormat { codec: String, format: String },

    #[error("codec context is not open")]
    NotOpen,

    #[error("codec context has been closed")]
    Closed,

    #[error("invalid option '{key}': {reason}")]
    InvalidOption { key: String, reason: String },

    #[error("frame layout mismatch: {0}")]
    FrameLayout(String),

    #[error("missing mandatory field `{0}`")]
    MissingField(&'static str),

    #[error("{context} failed: {message} ({code})")]
    Native {
        context: &'static str,
        code: c_int,
        message: String,
    },

    #[error(transparent)]
    Codec(#[from] RsmpegError),
}

impl Error {
    pub(crate) fn native(context: &'static str, code: c_int) -> Self {
        Error::Native {
            context,
            code,
            message: av_error_string(code),
        }
    }

    /// Native error code, when the failure came straight from libav*.
    pub fn code(&self) -> Option<c_int> {
        match self {
            Error::Open { code, .. } | Error::Native { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Turns a negative AVERROR code into the message libavutil has for it.
pub fn av_error_string(code: c_int) -> String {
    let mut buffer = [0 as c_char; ffi::AV_ERROR_MAX_STRING_SIZE as usize];
    let ret = unsafe { ffi::av_strerror(code, buffer.as_mut_ptr(), buffer.len()) };
    if ret < 0 {
        return format!("unknown error {}", code);
    }

    unsafe { CStr::from_ptr(buffer.as_ptr()) }
        .to_string_lossy()
        .into_owned()
}

pub(crate) fn check(context: &'static str, ret: c_int) -> Result<c_int> {
    if ret < 0 {
        Err(Error::native(context, ret))
    } else {
        Ok(ret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eof_has_a_message() {
        let message = av_error_string(ffi::AVERROR_EOF);
        assert_eq!(message, "End of file");
    }

    #[test]
    fn check_passes_non_negative_codes() {
        assert_eq!(check("noop", 3).unwrap(), 3);

        let error = check("noop", ffi::AVERROR_EOF).unwrap_err();
        assert_eq!(error.code(), Some(ffi::AVERROR_EOF));
        assert!(error.to_string().starts_with("noop failed"));
    }
}
