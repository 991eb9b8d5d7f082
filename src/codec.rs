use std::{
    ffi::{c_int, CString},
    fmt,
};

use rsmpeg::avcodec::{AVCodec, AVCodecRef};

use crate::{
    error::{Error, Result},
    ffi,
    formats::c_str,
};

/// Sample rate assumed for codecs that publish no list of supported rates.
const FALLBACK_SAMPLE_RATE: c_int = 44100;

/// A registered encoder or decoder implementation.
pub struct Codec {
    inner: AVCodecRef<'static>,
}

// SAFETY: codec descriptors are immutable statics owned by libavcodec.
unsafe impl Send for Codec {}
unsafe impl Sync for Codec {}

impl Codec {
    pub fn find_encoder(id: ffi::AVCodecID) -> Result<Self> {
        AVCodec::find_encoder(id)
            .map(|inner| Self { inner })
            .ok_or_else(|| Error::CodecNotFound(format!("encoder #{}", id)))
    }

    pub fn find_decoder(id: ffi::AVCodecID) -> Result<Self> {
        AVCodec::find_decoder(id)
            .map(|inner| Self { inner })
            .ok_or_else(|| Error::CodecNotFound(format!("decoder #{}", id)))
    }

    pub fn find_encoder_by_name(name: &str) -> Result<Self> {
        let c_name = CString::new(name).map_err(|_| Error::CodecNotFound(name.to_string()))?;
        AVCodec::find_encoder_by_name(&c_name)
            .map(|inner| Self { inner })
            .ok_or_else(|| Error::CodecNotFound(name.to_string()))
    }

    pub fn find_decoder_by_name(name: &str) -> Result<Self> {
        let c_name = CString::new(name).map_err(|_| Error::CodecNotFound(name.to_string()))?;
        AVCodec::find_decoder_by_name(&c_name)
            .map(|inner| Self { inner })
            .ok_or_else(|| Error::CodecNotFound(name.to_string()))
    }

    pub(crate) fn as_ptr(&self) -> *const ffi::AVCodec {
        self.inner.as_ptr()
    }

    fn raw(&self) -> &ffi::AVCodec {
        unsafe { &*self.as_ptr() }
    }

    pub fn id(&self) -> ffi::AVCodecID {
        self.raw().id
    }

    pub fn media_type(&self) -> ffi::AVMediaType {
        self.raw().type_
    }

    pub fn name(&self) -> String {
        c_str(self.raw().name).unwrap_or_default()
    }

    pub fn long_name(&self) -> String {
        c_str(self.raw().long_name).unwrap_or_default()
    }

    pub fn is_decoder(&self) -> bool {
        unsafe { ffi::av_codec_is_decoder(self.as_ptr()) != 0 }
    }

    pub fn is_encoder(&self) -> bool {
        unsafe { ffi::av_codec_is_encoder(self.as_ptr()) != 0 }
    }

    /// Sample formats the codec accepts, `None` if it publishes no list.
    pub fn sample_formats(&self) -> Option<Vec<ffi::AVSampleFormat>> {
        unsafe {
            terminated_list(
                self.raw().sample_fmts,
                ffi::AVSampleFormat_AV_SAMPLE_FMT_NONE,
            )
        }
    }

    pub fn supports_sample_format(&self, sample_fmt: ffi::AVSampleFormat) -> bool {
        match self.sample_formats() {
            Some(formats) => formats.contains(&sample_fmt),
            None => true,
        }
    }

    /// First format in the codec's list, the one it prefers.
    pub fn default_sample_format(&self) -> Option<ffi::AVSampleFormat> {
        self.sample_formats()
            .and_then(|formats| formats.first().copied())
    }

    pub fn supported_sample_rates(&self) -> Option<Vec<c_int>> {
        unsafe { terminated_list(self.raw().supported_samplerates, 0) }
    }

    pub fn supports_sample_rate(&self, sample_rate: c_int) -> bool {
        match self.supported_sample_rates() {
            Some(rates) => rates.contains(&sample_rate),
            None => true,
        }
    }

    /// Highest supported sample rate.
    pub fn best_sample_rate(&self) -> c_int {
        self.supported_sample_rates()
            .and_then(|rates| rates.into_iter().max())
            .unwrap_or(FALLBACK_SAMPLE_RATE)
    }
}

impl fmt::Debug for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Codec")
            .field("name", &self.name())
            .field("id", &self.id())
            .field("decoder", &self.is_decoder())
            .finish()
    }
}

unsafe fn terminated_list<T: Copy + PartialEq>(mut ptr: *const T, terminator: T) -> Option<Vec<T>> {
    if ptr.is_null() {
        return None;
    }

    let mut values = Vec::new();
    while *ptr != terminator {
        values.push(*ptr);
        ptr = ptr.add(1);
    }

    Some(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminated_list_stops_at_terminator() {
        let rates = [8000, 16000, 48000, 0, 96000];
        let values = unsafe { terminated_list(rates.as_ptr(), 0) };
        assert_eq!(values, Some(vec![8000, 16000, 48000]));
    }

    #[test]
    fn null_list_is_none() {
        let values = unsafe { terminated_list::<c_int>(std::ptr::null(), 0) };
        assert!(values.is_none());
    }

    #[test]
    fn pcm_encoder_publishes_its_sample_format() {
        let codec = Codec::find_encoder_by_name("pcm_s16le").unwrap();
        assert!(codec.is_encoder());
        assert!(!codec.is_decoder());
        assert_eq!(
            codec.default_sample_format(),
            Some(ffi::AVSampleFormat_AV_SAMPLE_FMT_S16)
        );
        assert!(!codec.supports_sample_format(ffi::AVSampleFormat_AV_SAMPLE_FMT_FLT));
    }

    #[test]
    fn unknown_codec_is_reported() {
        let error = Codec::find_decoder_by_name("no-such-codec").unwrap_err();
        assert!(matches!(error, Error::CodecNotFound(name) if name == "no-such-codec"));
    }
}
