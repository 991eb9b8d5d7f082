use std::{
    ffi::{c_int, CStr},
    fmt,
    ptr::{self, NonNull},
};

use cstr::cstr;
use log::{debug, warn};
use rsmpeg::{avcodec::AVCodecContext, UnsafeDerefMut};

use crate::{
    codec::Codec,
    error::{av_error_string, Error, Result},
    ffi,
    options::Options,
};

mod accessors;
mod directive;

pub use directive::*;

/// Threads a decoder gets when nothing else was configured.
const DECODER_THREADS: c_int = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Allocated, accepting configuration.
    Configuring,
    /// Bound to its codec; encode/decode allowed.
    Open,
    /// Open state released. Terminal: only accessors and `free` remain.
    Closed,
}

/// Configuration and runtime state for one encode or decode stream.
///
/// The handle exclusively owns the native context: it is released exactly
/// once, when the handle is dropped or passed to [`CodecCtx::free`], unless
/// ownership is handed off with [`CodecCtx::into_raw`].
pub struct CodecCtx {
    pub(crate) codec: Codec,
    pub(crate) inner: AVCodecContext,
    state: State,
    threads_configured: bool,
}

impl CodecCtx {
    /// Allocates a context for `codec` and applies `options` in order.
    pub fn new(codec: Codec, options: &[CodecOption]) -> Result<Self> {
        let raw = unsafe { ffi::avcodec_alloc_context3(codec.as_ptr()) };
        let raw = NonNull::new(raw).ok_or(Error::Alloc("AVCodecContext"))?;

        let mut ctx = Self {
            codec,
            inner: unsafe { AVCodecContext::from_raw(raw) },
            state: State::Configuring,
            threads_configured: false,
        };

        for option in options {
            option.apply(&mut ctx)?;
        }

        let codec_id = ctx.codec.id();
        ctx.raw_mut().codec_id = codec_id;

        Ok(ctx)
    }

    pub fn encoder(name: &str, options: &[CodecOption]) -> Result<Self> {
        Self::new(Codec::find_encoder_by_name(name)?, options)
    }

    pub fn decoder(name: &str, options: &[CodecOption]) -> Result<Self> {
        Self::new(Codec::find_decoder_by_name(name)?, options)
    }

    pub fn set_options(&mut self, options: &[CodecOption]) -> Result<&mut Self> {
        for option in options {
            option.apply(self)?;
        }
        Ok(self)
    }

    pub fn codec(&self) -> &Codec {
        &self.codec
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == State::Open
    }

    /// Binds the context to its codec. A no-op on an open context.
    ///
    /// Decoders without an explicit thread count get frame and slice
    /// threading on four threads.
    pub fn open(&mut self, options: Option<Options>) -> Result<()> {
        match self.state {
            State::Open => return Ok(()),
            State::Closed => return Err(Error::Closed),
            State::Configuring => {}
        }

        if self.codec.is_decoder() && !self.threads_configured {
            let raw = self.raw_mut();
            raw.thread_count = DECODER_THREADS;
            raw.thread_type = (ffi::FF_THREAD_FRAME | ffi::FF_THREAD_SLICE) as c_int;
        }

        let mut dict = match options {
            Some(options) => options.to_av_dict()?,
            None => None,
        }
        .map(|dict| dict.into_raw().as_ptr())
        .unwrap_or(ptr::null_mut());

        let ret = unsafe { ffi::avcodec_open2(self.inner.as_mut_ptr(), self.codec.as_ptr(), &mut dict) };

        if !dict.is_null() {
            warn_unused_options(&self.codec.name(), dict);
            unsafe { ffi::av_dict_free(&mut dict) };
        }

        if ret < 0 {
            return Err(Error::Open {
                name: self.codec.name(),
                long_name: self.codec.long_name(),
                code: ret,
                message: av_error_string(ret),
            });
        }

        debug!("Opened codec '{}' ({:?})", self.codec.name(), self);
        self.state = State::Open;

        Ok(())
    }

    /// Releases the codec's open state. The structure stays allocated so
    /// accessors keep working; encode, decode and open are refused from now on.
    pub fn close(&mut self) {
        if self.state == State::Closed {
            return;
        }

        unsafe { ffi::avcodec_close(self.inner.as_mut_ptr()) };
        self.state = State::Closed;

        debug!("Closed codec '{}'", self.codec.name());
    }

    /// Releases the structure itself. Same as dropping the handle.
    pub fn free(self) {
        debug!("Freeing codec context '{}'", self.codec.name());
        drop(self)
    }

    /// Hands the native context to another owner (for instance a format
    /// context that frees its streams' codec contexts itself). The returned
    /// pointer is no longer freed by this crate.
    pub fn into_raw(self) -> NonNull<ffi::AVCodecContext> {
        self.inner.into_raw()
    }

    pub fn as_ptr(&self) -> *const ffi::AVCodecContext {
        self.inner.as_ptr()
    }

    /// Discards buffered input and output, for instance after seeking.
    pub fn flush_buffers(&mut self) -> Result<()> {
        self.require_open()?;
        unsafe { ffi::avcodec_flush_buffers(self.inner.as_mut_ptr()) };
        Ok(())
    }

    pub(crate) fn require_open(&self) -> Result<()> {
        match self.state {
            State::Open => Ok(()),
            State::Configuring => Err(Error::NotOpen),
            State::Closed => Err(Error::Closed),
        }
    }

    pub(crate) fn raw(&self) -> &ffi::AVCodecContext {
        &self.inner
    }

    pub(crate) fn raw_mut(&mut self) -> &mut ffi::AVCodecContext {
        unsafe { self.inner.deref_mut() }
    }

    pub(crate) fn mark_threads_configured(&mut self) {
        self.threads_configured = true;
    }
}

impl fmt::Debug for CodecCtx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let raw = self.raw();
        f.debug_struct("CodecCtx")
            .field("codec", &self.codec.name())
            .field("state", &self.state)
            .field("width", &raw.width)
            .field("height", &raw.height)
            .field("pix_fmt", &raw.pix_fmt)
            .field("sample_fmt", &raw.sample_fmt)
            .field("sample_rate", &raw.sample_rate)
            .field("channels", &raw.ch_layout.nb_channels)
            .field("bit_rate", &raw.bit_rate)
            .field("time_base", &(raw.time_base.num, raw.time_base.den))
            .field("thread_count", &raw.thread_count)
            .finish()
    }
}

fn warn_unused_options(codec_name: &str, dict: *mut ffi::AVDictionary) {
    let mut entry: *mut ffi::AVDictionaryEntry = ptr::null_mut();

    loop {
        entry = unsafe {
            ffi::av_dict_get(dict, cstr!("").as_ptr(), entry, ffi::AV_DICT_IGNORE_SUFFIX as c_int)
        };
        if entry.is_null() {
            break;
        }

        let (key, value) = unsafe { (CStr::from_ptr((*entry).key), CStr::from_ptr((*entry).value)) };
        warn!(
            "Option {}={} not used by codec '{}'",
            key.to_string_lossy(),
            value.to_string_lossy(),
            codec_name
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_context_is_configuring() {
        let ctx = CodecCtx::encoder("rawvideo", &[]).unwrap();
        assert_eq!(ctx.state(), State::Configuring);
        assert_eq!(ctx.id(), ffi::AVCodecID_AV_CODEC_ID_RAWVIDEO);
        assert!(!ctx.is_open());
    }

    #[test]
    fn flush_requires_open_context() {
        let mut ctx = CodecCtx::decoder("rawvideo", &[]).unwrap();
        assert!(matches!(ctx.flush_buffers(), Err(Error::NotOpen)));
    }

    #[test]
    fn threads_by_name_count_as_configured() {
        let directives = [CodecOption::Opt("threads".into(), "2".into())];
        let mut decoder = CodecCtx::decoder("mpeg4", &directives).unwrap();
        assert!(decoder.threads_configured);

        decoder.open(None).unwrap();
        assert_eq!(decoder.thread_count(), 2);
    }

    #[test]
    fn other_named_options_leave_threading_alone() {
        let decoder = CodecCtx::decoder("mpeg4", &[CodecOption::Opt("b".into(), "1000".into())]).unwrap();
        assert!(!decoder.threads_configured);
    }

    #[test]
    fn debug_dump_names_codec() {
        let ctx = CodecCtx::encoder("rawvideo", &[CodecOption::Dimension(32, 16)]).unwrap();
        let dump = format!("{:?}", ctx);
        assert!(dump.contains("rawvideo"));
        assert!(dump.contains("width: 32"));
    }
}
