// Copyright (c) 2021 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

use crate::{ffi, macros::vulkan_enum, ValidationError};
use ash::vk;
use std::{
    error::Error,
    ffi::CStr,
    fmt::{Display, Error as FmtError, Formatter},
};

vulkan_enum! {
    /// The type of the value of a layer setting.
    LayerSettingValueType impl {
        /// Returns the name of the type, as used in log messages.
        #[inline]
        pub const fn as_str(self) -> &'static str {
            match self {
                Self::Uint32 => "uint32",
                Self::Uint64 => "uint64",
                Self::Float => "float",
                Self::Bool => "bool",
                Self::String => "string",
            }
        }
    }
    = LayerSettingValueTypeEXT(i32);

    /// A 32-bit unsigned integer.
    Uint32 = UINT32,

    /// A 64-bit unsigned integer.
    Uint64 = UINT64,

    /// A 32-bit floating point number.
    Float = FLOAT,

    /// A boolean, passed as a `VkBool32`.
    Bool = BOOL,

    /// A UTF-8 string.
    String = STRING,
}

impl Display for LayerSettingValueType {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        f.write_str(self.as_str())
    }
}

/// The value of a layer setting.
///
/// This is the safe counterpart of the tag and union pair found in
/// [`LayerSettingValueEXT`](ffi::LayerSettingValueEXT).
#[derive(Clone, Debug, PartialEq)]
pub enum LayerSettingValue {
    Uint32(u32),
    Uint64(u64),
    Float(f32),
    Bool(bool),
    String(String),
}

impl LayerSettingValue {
    /// Returns the type of the value.
    #[inline]
    pub fn value_type(&self) -> LayerSettingValueType {
        match self {
            Self::Uint32(_) => LayerSettingValueType::Uint32,
            Self::Uint64(_) => LayerSettingValueType::Uint64,
            Self::Float(_) => LayerSettingValueType::Float,
            Self::Bool(_) => LayerSettingValueType::Bool,
            Self::String(_) => LayerSettingValueType::String,
        }
    }

    /// Parses a value of type `ty` from its textual form.
    ///
    /// This is the form used for default values in setting descriptions, in the layer settings
    /// file and in environment variables. Integers can be written in decimal or, with a `0x`
    /// prefix, in hexadecimal. Booleans accept `true`/`false`, `on`/`off` and `1`/`0`, in any
    /// case.
    pub fn parse(ty: LayerSettingValueType, s: &str) -> Result<Self, ParseValueError> {
        let err = || ParseValueError {
            value_type: ty,
            value: s.to_owned(),
        };
        let trimmed = s.trim();

        Ok(match ty {
            LayerSettingValueType::Uint32 => {
                Self::Uint32(parse_integer(trimmed).and_then(|v| v.try_into().ok()).ok_or_else(err)?)
            }
            LayerSettingValueType::Uint64 => Self::Uint64(parse_integer(trimmed).ok_or_else(err)?),
            LayerSettingValueType::Float => Self::Float(trimmed.parse().map_err(|_| err())?),
            LayerSettingValueType::Bool => {
                if ["true", "on", "1"].iter().any(|v| trimmed.eq_ignore_ascii_case(v)) {
                    Self::Bool(true)
                } else if ["false", "off", "0"].iter().any(|v| trimmed.eq_ignore_ascii_case(v)) {
                    Self::Bool(false)
                } else {
                    return Err(err());
                }
            }
            LayerSettingValueType::String => Self::String(s.to_owned()),
        })
    }

    /// Returns the value if it is a `Uint32`.
    #[inline]
    pub fn as_u32(&self) -> Option<u32> {
        match *self {
            Self::Uint32(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the value if it is a `Uint64`.
    #[inline]
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Self::Uint64(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the value if it is a `Float`.
    #[inline]
    pub fn as_f32(&self) -> Option<f32> {
        match *self {
            Self::Float(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the value if it is a `Bool`.
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Self::Bool(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the value if it is a `String`.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }
}

fn parse_integer(s: &str) -> Option<u64> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).ok()
    } else {
        s.parse().ok()
    }
}

/// Writes the value in the form accepted by [`LayerSettingValue::parse`].
impl Display for LayerSettingValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match self {
            Self::Uint32(v) => write!(f, "{}", v),
            Self::Uint64(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{:?}", v),
            Self::Bool(v) => write!(f, "{}", v),
            Self::String(v) => f.write_str(v),
        }
    }
}

impl From<u32> for LayerSettingValue {
    #[inline]
    fn from(val: u32) -> Self {
        Self::Uint32(val)
    }
}

impl From<u64> for LayerSettingValue {
    #[inline]
    fn from(val: u64) -> Self {
        Self::Uint64(val)
    }
}

impl From<f32> for LayerSettingValue {
    #[inline]
    fn from(val: f32) -> Self {
        Self::Float(val)
    }
}

impl From<bool> for LayerSettingValue {
    #[inline]
    fn from(val: bool) -> Self {
        Self::Bool(val)
    }
}

impl From<&str> for LayerSettingValue {
    #[inline]
    fn from(val: &str) -> Self {
        Self::String(val.to_owned())
    }
}

impl From<String> for LayerSettingValue {
    #[inline]
    fn from(val: String) -> Self {
        Self::String(val)
    }
}

/// The value of a string did not have the expected form for its type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseValueError {
    pub value_type: LayerSettingValueType,
    pub value: String,
}

impl Error for ParseValueError {}

impl Display for ParseValueError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(
            f,
            "`{}` is not a valid value of type {}",
            self.value, self.value_type,
        )
    }
}

/// A named value for one layer setting.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerSetting {
    /// The name of the setting. It may be prefixed with the layer prefix and a dot
    /// (`khronos_validation.debug_action`) to address a single layer.
    pub name: String,

    pub value: LayerSettingValue,
}

impl LayerSetting {
    #[inline]
    pub fn new(name: impl Into<String>, value: impl Into<LayerSettingValue>) -> Self {
        LayerSetting {
            name: name.into(),
            value: value.into(),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), Box<ValidationError>> {
        validate_name(&self.name, ffi::MAX_EXTENSION_NAME_SIZE)
            .map_err(|err| err.add_context("name"))?;

        if let LayerSettingValue::String(value) = &self.value {
            if value.contains('\0') {
                return Err(ValidationError::new("value", "contains a nul byte"));
            }
        }

        Ok(())
    }

    /// Converts a raw value, as found in an
    /// [`InstanceLayerSettingsEXT`](ffi::InstanceLayerSettingsEXT).
    ///
    /// # Safety
    ///
    /// - If `raw.ty` is `STRING`, `raw.data.value_string` must be null or point to a
    ///   NUL-terminated string.
    pub unsafe fn from_raw(raw: &ffi::LayerSettingValueEXT<'_>) -> Result<Self, Box<ValidationError>> {
        if raw.s_type != ffi::STRUCTURE_TYPE_LAYER_SETTING_VALUE_EXT {
            return Err(ValidationError::new(
                "s_type",
                "is not `STRUCTURE_TYPE_LAYER_SETTING_VALUE_EXT`",
            ));
        }

        let name = string_from_array(&raw.setting_name).map_err(|err| err.add_context("setting_name"))?;
        let ty = LayerSettingValueType::try_from(raw.ty)
            .map_err(|_| ValidationError::new("ty", "is not a valid `VkLayerSettingValueTypeEXT`"))?;

        let value = match ty {
            LayerSettingValueType::Uint32 => LayerSettingValue::Uint32(unsafe { raw.data.value32 }),
            LayerSettingValueType::Uint64 => LayerSettingValue::Uint64(unsafe { raw.data.value64 }),
            LayerSettingValueType::Float => {
                LayerSettingValue::Float(unsafe { raw.data.value_float })
            }
            LayerSettingValueType::Bool => {
                LayerSettingValue::Bool(unsafe { raw.data.value_bool } != vk::FALSE)
            }
            LayerSettingValueType::String => {
                let ptr = unsafe { raw.data.value_string };

                if ptr.is_null() {
                    return Err(ValidationError::new(
                        "data.value_string",
                        "is null while `ty` is `STRING`",
                    ));
                }

                let value = unsafe { CStr::from_ptr(ptr) };
                LayerSettingValue::String(
                    value
                        .to_str()
                        .map_err(|_| ValidationError::new("data.value_string", "is not valid UTF-8"))?
                        .to_owned(),
                )
            }
        };

        Ok(LayerSetting { name, value })
    }
}

/// Checks that `name` can be stored in an array of `bound` C characters.
pub(crate) fn validate_name(name: &str, bound: usize) -> Result<(), Box<ValidationError>> {
    if name.is_empty() {
        return Err(ValidationError::new("", "is empty"));
    }

    validate_string(name, bound)
}

/// Checks that `value` can be stored, NUL-terminated, in an array of `bound` C characters.
pub(crate) fn validate_string(value: &str, bound: usize) -> Result<(), Box<ValidationError>> {
    if value.contains('\0') {
        return Err(ValidationError::new("", "contains a nul byte"));
    }

    if value.len() >= bound {
        return Err(ValidationError::new(
            "",
            format!("is {} bytes long, but must be shorter than {} bytes", value.len(), bound),
        ));
    }

    Ok(())
}

/// Reads a NUL-terminated UTF-8 string out of a fixed-size C array.
pub(crate) fn string_from_array(array: &[std::ffi::c_char]) -> Result<String, Box<ValidationError>> {
    ffi::c_str_from_array(array)
        .ok_or_else(|| ValidationError::new("", "is not NUL-terminated"))?
        .to_str()
        .map(str::to_owned)
        .map_err(|_| ValidationError::new("", "is not valid UTF-8"))
}
