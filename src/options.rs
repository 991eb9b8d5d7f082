use std::{collections::HashMap, ffi::CString};

use rsmpeg::avutil::AVDictionary;

use crate::error::{Error, Result};

/// String options handed to the codec when it is opened.
#[derive(Default, Clone, Debug)]
pub struct Options {
    pairs: HashMap<String, (String, u32)>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: &str, value: &str) -> Self {
        self.pairs.insert(key.to_string(), (value.to_string(), 0));
        self
    }

    pub fn set_flags(mut self, key: &str, value: &str, flags: u32) -> Self {
        self.pairs
            .insert(key.to_string(), (value.to_string(), flags));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Builds the native dictionary, or `None` when there is nothing to pass.
    pub fn to_av_dict(self) -> Result<Option<AVDictionary>> {
        let mut dict: Option<AVDictionary> = None;

        for (key, (value, flags)) in self.pairs {
            let c_key = to_cstring(&key, &key)?;
            let c_value = to_cstring(&key, &value)?;

            dict = Some(match dict {
                Some(dict) => dict.set(&c_key, &c_value, flags),
                None => AVDictionary::new(&c_key, &c_value, flags),
            });
        }

        Ok(dict)
    }
}

pub(crate) fn to_cstring(key: &str, value: &str) -> Result<CString> {
    CString::new(value).map_err(|_| Error::InvalidOption {
        key: key.to_string(),
        reason: "contains a NUL byte".to_string(),
    })
}
