use std::{
    ffi::{c_int, c_void, CString},
    ptr,
};

use crate::{
    error::{check, Error, Result},
    ffi,
    formats::{self, c_str, rational, Compliance, MbDecision},
    options::to_cstring,
};

use super::CodecCtx;

macro_rules! getter {
    ($name: ident, $field: ident, $field_type: ty) => {
        pub fn $name(&self) -> $field_type {
            self.raw().$field
        }
    };
}

macro_rules! setter {
    ($name: ident, $field: ident, $field_type: ty) => {
        pub fn $name(&mut self, $field: $field_type) -> &mut Self {
            self.raw_mut().$field = $field;
            self
        }
    };
}

impl CodecCtx {
    getter!(id, codec_id, ffi::AVCodecID);
    getter!(media_type, codec_type, ffi::AVMediaType);
    getter!(width, width, c_int);
    getter!(height, height, c_int);
    getter!(coded_width, coded_width, c_int);
    getter!(coded_height, coded_height, c_int);
    getter!(pix_fmt, pix_fmt, ffi::AVPixelFormat);
    getter!(sample_fmt, sample_fmt, ffi::AVSampleFormat);
    getter!(sample_rate, sample_rate, c_int);
    getter!(frame_size, frame_size, c_int);
    getter!(bit_rate, bit_rate, i64);
    getter!(profile, profile, c_int);
    getter!(gop_size, gop_size, c_int);
    getter!(max_b_frames, max_b_frames, c_int);
    getter!(has_b_frames, has_b_frames, c_int);
    getter!(refs, refs, c_int);
    getter!(flags, flags, c_int);
    getter!(global_quality, global_quality, c_int);
    getter!(thread_count, thread_count, c_int);
    getter!(thread_type, thread_type, c_int);
    getter!(codec_tag, codec_tag, u32);
    getter!(color_range, color_range, ffi::AVColorRange);
    getter!(time_base, time_base, ffi::AVRational);
    getter!(pkt_time_base, pkt_timebase, ffi::AVRational);
    getter!(frame_rate, framerate, ffi::AVRational);
    getter!(sample_aspect_ratio, sample_aspect_ratio, ffi::AVRational);

    setter!(set_width, width, c_int);
    setter!(set_height, height, c_int);
    setter!(set_pix_fmt, pix_fmt, ffi::AVPixelFormat);
    setter!(set_sample_rate, sample_rate, c_int);
    setter!(set_bit_rate, bit_rate, i64);
    setter!(set_profile, profile, c_int);
    setter!(set_gop_size, gop_size, c_int);
    setter!(set_max_b_frames, max_b_frames, c_int);
    setter!(set_has_b_frames, has_b_frames, c_int);
    setter!(set_global_quality, global_quality, c_int);
    setter!(set_bits_per_raw_sample, bits_per_raw_sample, c_int);

    pub fn set_dimension(&mut self, width: c_int, height: c_int) -> &mut Self {
        let raw = self.raw_mut();
        raw.width = width;
        raw.height = height;
        self
    }

    pub fn set_time_base(&mut self, num: c_int, den: c_int) -> &mut Self {
        self.raw_mut().time_base = rational(num, den);
        self
    }

    pub fn set_pkt_time_base(&mut self, num: c_int, den: c_int) -> &mut Self {
        self.raw_mut().pkt_timebase = rational(num, den);
        self
    }

    pub fn set_frame_rate(&mut self, num: c_int, den: c_int) -> &mut Self {
        self.raw_mut().framerate = rational(num, den);
        self
    }

    /// Adds `flag` (one of the `AV_CODEC_FLAG_*` bits) to the context flags.
    pub fn set_flag(&mut self, flag: u32) -> &mut Self {
        self.raw_mut().flags |= flag as c_int;
        self
    }

    pub fn set_mb_decision(&mut self, decision: MbDecision) -> &mut Self {
        self.raw_mut().mb_decision = decision as c_int;
        self
    }

    pub fn set_strict_compliance(&mut self, compliance: Compliance) -> &mut Self {
        self.raw_mut().strict_std_compliance = compliance as c_int;
        self
    }

    /// An explicit thread count also keeps `open` from applying the decoder
    /// threading defaults.
    pub fn set_thread_count(&mut self, threads: c_int) -> &mut Self {
        self.raw_mut().thread_count = threads;
        self.mark_threads_configured();
        self
    }

    /// Rejects formats missing from the codec's published list.
    pub fn set_sample_fmt(&mut self, sample_fmt: ffi::AVSampleFormat) -> Result<&mut Self> {
        if !self.codec.supports_sample_format(sample_fmt) {
            return Err(Error::UnsupportedSampleFormat {
                codec: self.codec.name(),
                format: formats::sample_fmt_name(sample_fmt).unwrap_or_else(|| sample_fmt.to_string()),
            });
        }

        self.raw_mut().sample_fmt = sample_fmt;
        Ok(self)
    }

    pub fn channels(&self) -> c_int {
        self.raw().ch_layout.nb_channels
    }

    /// Channel mask of the layout, 0 when it isn't expressed as a mask.
    pub fn channel_layout(&self) -> u64 {
        let layout = &self.raw().ch_layout;
        if layout.order == ffi::AVChannelOrder_AV_CHANNEL_ORDER_NATIVE {
            unsafe { layout.u.mask }
        } else {
            0
        }
    }

    /// Uses the default layout for `channels` channels.
    pub fn set_channels(&mut self, channels: c_int) -> &mut Self {
        let raw = self.raw_mut();
        unsafe {
            ffi::av_channel_layout_uninit(&mut raw.ch_layout);
            ffi::av_channel_layout_default(&mut raw.ch_layout, channels);
        }
        self
    }

    pub fn set_channel_layout(&mut self, mask: u64) -> Result<&mut Self> {
        let raw = self.raw_mut();
        let ret = unsafe {
            ffi::av_channel_layout_uninit(&mut raw.ch_layout);
            ffi::av_channel_layout_from_mask(&mut raw.ch_layout, mask)
        };
        check("av_channel_layout_from_mask", ret)?;
        Ok(self)
    }

    /// Copies `extradata` into padded native memory owned by the context,
    /// releasing what was there before.
    pub fn set_extradata(&mut self, extradata: &[u8]) -> Result<&mut Self> {
        let size = c_int::try_from(extradata.len()).map_err(|_| Error::InvalidOption {
            key: "extradata".to_string(),
            reason: format!("{} bytes is too large", extradata.len()),
        })?;

        let padded_size = extradata.len() + ffi::AV_INPUT_BUFFER_PADDING_SIZE as usize;
        let buffer = unsafe { ffi::av_mallocz(padded_size) } as *mut u8;
        if buffer.is_null() {
            return Err(Error::Alloc("extradata"));
        }

        let raw = self.raw_mut();
        unsafe {
            ptr::copy_nonoverlapping(extradata.as_ptr(), buffer, extradata.len());
            ffi::av_freep(&mut raw.extradata as *mut *mut u8 as *mut c_void);
        }
        raw.extradata = buffer;
        raw.extradata_size = size;

        Ok(self)
    }

    pub fn extradata(&self) -> &[u8] {
        let raw = self.raw();
        if raw.extradata.is_null() || raw.extradata_size <= 0 {
            return &[];
        }
        unsafe { std::slice::from_raw_parts(raw.extradata, raw.extradata_size as usize) }
    }

    /// Sets an AVOption on the context, searching the codec's private
    /// options too.
    pub fn set_opt(&mut self, key: &str, value: &str) -> Result<&mut Self> {
        let c_key = CString::new(key).map_err(|_| Error::InvalidOption {
            key: key.to_string(),
            reason: "key contains a NUL byte".to_string(),
        })?;
        let c_value = to_cstring(key, value)?;

        let ret = unsafe {
            ffi::av_opt_set(
                self.inner.as_mut_ptr() as *mut c_void,
                c_key.as_ptr(),
                c_value.as_ptr(),
                ffi::AV_OPT_SEARCH_CHILDREN as c_int,
            )
        };
        check("av_opt_set", ret)?;
        if key == "threads" {
            self.mark_threads_configured();
        }

        Ok(self)
    }

    pub fn profile_name(&self) -> Option<String> {
        let raw = self.raw();
        c_str(unsafe { ffi::avcodec_profile_name(raw.codec_id, raw.profile) })
    }

    pub fn media_type_name(&self) -> Option<String> {
        formats::media_type_name(self.raw().codec_type)
    }

    pub fn codec_tag_name(&self) -> String {
        formats::fourcc(self.raw().codec_tag)
    }

    pub fn pix_fmt_name(&self) -> Option<String> {
        formats::pix_fmt_name(self.raw().pix_fmt)
    }

    pub fn sample_fmt_name(&self) -> Option<String> {
        formats::sample_fmt_name(self.raw().sample_fmt)
    }

    pub fn color_range_name(&self) -> Option<&'static str> {
        formats::color_range_name(self.raw().color_range)
    }

    /// Bits per sample for the codec, 0 when it has no fixed size.
    pub fn bits_per_sample(&self) -> c_int {
        unsafe { ffi::av_get_bits_per_sample(self.codec.id()) }
    }

    pub fn video_size(&self) -> String {
        format!("{}x{}", self.width(), self.height())
    }

    pub fn default_sample_fmt(&self) -> Option<ffi::AVSampleFormat> {
        self.codec.default_sample_format()
    }

    pub fn best_sample_rate(&self) -> c_int {
        self.codec.best_sample_rate()
    }

    pub fn supports_sample_rate(&self, sample_rate: c_int) -> bool {
        self.codec.supports_sample_rate(sample_rate)
    }
}
