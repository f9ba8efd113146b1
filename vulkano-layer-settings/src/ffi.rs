// Copyright (c) 2021 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Raw C definitions of the `VK_EXT_layer_settings` extension.
//!
//! Everything here is laid out exactly like the C header, so pointers to these types can be
//! handed to, or received from, a Vulkan implementation. The structures follow the conventions
//! of Ash: snake case field names, `s_type`/`p_next` first, a `_marker` for the lifetime of any
//! borrowed data, and a `Default` implementation that fills in `s_type`.
//!
//! The extension is not part of the Vulkan registry, so Ash does not provide these types.

#![allow(non_camel_case_types)]

use ash::vk;
use std::{
    ffi::{c_char, c_void, CStr},
    fmt::{Debug, Error as FmtError, Formatter},
    marker::PhantomData,
    mem,
};

pub const EXT_LAYER_SETTINGS_NAME: &CStr = c"VK_EXT_layer_settings";
pub const EXT_LAYER_SETTINGS_SPEC_VERSION: u32 = 1;

/// Raw value of [`STRUCTURE_TYPE_INSTANCE_LAYER_SETTINGS_EXT`].
pub const STRUCTURE_TYPE_INSTANCE_LAYER_SETTINGS_EXT_RAW: u32 = 3000300003;
/// Raw value of [`STRUCTURE_TYPE_LAYER_SETTING_VALUE_EXT`].
pub const STRUCTURE_TYPE_LAYER_SETTING_VALUE_EXT_RAW: u32 = 3000300004;
/// Raw value of [`STRUCTURE_TYPE_LAYER_SETTING_DESCRIPTION_EXT`].
pub const STRUCTURE_TYPE_LAYER_SETTING_DESCRIPTION_EXT_RAW: u32 = 3000300005;
/// Raw value of [`STRUCTURE_TYPE_LAYER_SETTING_OPTION_EXT`].
pub const STRUCTURE_TYPE_LAYER_SETTING_OPTION_EXT_RAW: u32 = 3000300006;

// The values are above `i32::MAX`. `VkStructureType` is a 32-bit enum, so they are stored with
// the same bits as the unsigned constants of the header.
pub const STRUCTURE_TYPE_INSTANCE_LAYER_SETTINGS_EXT: vk::StructureType =
    vk::StructureType::from_raw(STRUCTURE_TYPE_INSTANCE_LAYER_SETTINGS_EXT_RAW as i32);
pub const STRUCTURE_TYPE_LAYER_SETTING_VALUE_EXT: vk::StructureType =
    vk::StructureType::from_raw(STRUCTURE_TYPE_LAYER_SETTING_VALUE_EXT_RAW as i32);
pub const STRUCTURE_TYPE_LAYER_SETTING_DESCRIPTION_EXT: vk::StructureType =
    vk::StructureType::from_raw(STRUCTURE_TYPE_LAYER_SETTING_DESCRIPTION_EXT_RAW as i32);
pub const STRUCTURE_TYPE_LAYER_SETTING_OPTION_EXT: vk::StructureType =
    vk::StructureType::from_raw(STRUCTURE_TYPE_LAYER_SETTING_OPTION_EXT_RAW as i32);

pub const MAX_EXTENSION_NAME_SIZE: usize = vk::MAX_EXTENSION_NAME_SIZE;
pub const MAX_DESCRIPTION_SIZE: usize = vk::MAX_DESCRIPTION_SIZE;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
#[doc = "<https://registry.khronos.org/vulkan/specs/latest/man/html/VkLayerSettingValueTypeEXT.html>"]
pub struct LayerSettingValueTypeEXT(pub(crate) i32);

impl LayerSettingValueTypeEXT {
    #[inline]
    pub const fn from_raw(x: i32) -> Self {
        Self(x)
    }

    #[inline]
    pub const fn as_raw(self) -> i32 {
        self.0
    }
}

impl LayerSettingValueTypeEXT {
    pub const UINT32: Self = Self(0);
    pub const UINT64: Self = Self(1);
    pub const FLOAT: Self = Self(2);
    pub const BOOL: Self = Self(3);
    pub const STRING: Self = Self(4);
}

impl Debug for LayerSettingValueTypeEXT {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        let name = match *self {
            Self::UINT32 => Some("UINT32"),
            Self::UINT64 => Some("UINT64"),
            Self::FLOAT => Some("FLOAT"),
            Self::BOOL => Some("BOOL"),
            Self::STRING => Some("STRING"),
            _ => None,
        };

        if let Some(name) = name {
            f.write_str(name)
        } else {
            Debug::fmt(&self.0, f)
        }
    }
}

/// The payload of a [`LayerSettingValueEXT`]. Which member is active is given by
/// [`LayerSettingValueEXT::ty`].
#[repr(C)]
#[derive(Copy, Clone)]
pub union LayerSettingValueDataEXT {
    pub value32: u32,
    pub value64: u64,
    pub value_float: f32,
    pub value_bool: vk::Bool32,
    pub value_string: *const c_char,
}

impl Default for LayerSettingValueDataEXT {
    #[inline]
    fn default() -> Self {
        unsafe { mem::zeroed() }
    }
}

impl Debug for LayerSettingValueDataEXT {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        f.write_str("LayerSettingValueDataEXT { .. }")
    }
}

#[repr(C)]
#[derive(Copy, Clone)]
pub struct LayerSettingValueEXT<'a> {
    pub s_type: vk::StructureType,
    pub p_next: *mut c_void,
    pub setting_name: [c_char; MAX_EXTENSION_NAME_SIZE],
    pub ty: LayerSettingValueTypeEXT,
    pub data: LayerSettingValueDataEXT,
    pub _marker: PhantomData<&'a ()>,
}

unsafe impl Send for LayerSettingValueEXT<'_> {}
unsafe impl Sync for LayerSettingValueEXT<'_> {}

impl Default for LayerSettingValueEXT<'_> {
    #[inline]
    fn default() -> Self {
        Self {
            s_type: STRUCTURE_TYPE_LAYER_SETTING_VALUE_EXT,
            p_next: std::ptr::null_mut(),
            setting_name: [0; MAX_EXTENSION_NAME_SIZE],
            ty: LayerSettingValueTypeEXT::default(),
            data: LayerSettingValueDataEXT::default(),
            _marker: PhantomData,
        }
    }
}

unsafe impl vk::TaggedStructure for LayerSettingValueEXT<'_> {
    const STRUCTURE_TYPE: vk::StructureType = STRUCTURE_TYPE_LAYER_SETTING_VALUE_EXT;
}

impl LayerSettingValueEXT<'_> {
    #[inline]
    pub fn setting_name_as_c_str(&self) -> Option<&CStr> {
        c_str_from_array(&self.setting_name)
    }
}

impl Debug for LayerSettingValueEXT<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        f.debug_struct("LayerSettingValueEXT")
            .field("s_type", &self.s_type)
            .field("p_next", &self.p_next)
            .field("setting_name", &self.setting_name_as_c_str())
            .field("ty", &self.ty)
            .finish_non_exhaustive()
    }
}

/// Extends `VkInstanceCreateInfo`.
#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct InstanceLayerSettingsEXT<'a> {
    pub s_type: vk::StructureType,
    pub p_next: *mut c_void,
    pub setting_count: u32,
    pub p_setting: *mut LayerSettingValueEXT<'a>,
    pub _marker: PhantomData<&'a ()>,
}

unsafe impl Send for InstanceLayerSettingsEXT<'_> {}
unsafe impl Sync for InstanceLayerSettingsEXT<'_> {}

impl Default for InstanceLayerSettingsEXT<'_> {
    #[inline]
    fn default() -> Self {
        Self {
            s_type: STRUCTURE_TYPE_INSTANCE_LAYER_SETTINGS_EXT,
            p_next: std::ptr::null_mut(),
            setting_count: 0,
            p_setting: std::ptr::null_mut(),
            _marker: PhantomData,
        }
    }
}

unsafe impl vk::TaggedStructure for InstanceLayerSettingsEXT<'_> {
    const STRUCTURE_TYPE: vk::StructureType = STRUCTURE_TYPE_INSTANCE_LAYER_SETTINGS_EXT;
}

unsafe impl vk::ExtendsInstanceCreateInfo for InstanceLayerSettingsEXT<'_> {}

#[repr(C)]
#[derive(Copy, Clone)]
pub struct LayerSettingDescriptionEXT<'a> {
    pub s_type: vk::StructureType,
    pub p_next: *mut c_void,
    pub setting_name: [c_char; MAX_EXTENSION_NAME_SIZE],
    pub ty: LayerSettingValueTypeEXT,
    pub description: [c_char; MAX_DESCRIPTION_SIZE],
    pub default_value: [c_char; MAX_DESCRIPTION_SIZE],
    pub _marker: PhantomData<&'a ()>,
}

unsafe impl Send for LayerSettingDescriptionEXT<'_> {}
unsafe impl Sync for LayerSettingDescriptionEXT<'_> {}

impl Default for LayerSettingDescriptionEXT<'_> {
    #[inline]
    fn default() -> Self {
        Self {
            s_type: STRUCTURE_TYPE_LAYER_SETTING_DESCRIPTION_EXT,
            p_next: std::ptr::null_mut(),
            setting_name: [0; MAX_EXTENSION_NAME_SIZE],
            ty: LayerSettingValueTypeEXT::default(),
            description: [0; MAX_DESCRIPTION_SIZE],
            default_value: [0; MAX_DESCRIPTION_SIZE],
            _marker: PhantomData,
        }
    }
}

unsafe impl vk::TaggedStructure for LayerSettingDescriptionEXT<'_> {
    const STRUCTURE_TYPE: vk::StructureType = STRUCTURE_TYPE_LAYER_SETTING_DESCRIPTION_EXT;
}

impl LayerSettingDescriptionEXT<'_> {
    #[inline]
    pub fn setting_name_as_c_str(&self) -> Option<&CStr> {
        c_str_from_array(&self.setting_name)
    }

    #[inline]
    pub fn description_as_c_str(&self) -> Option<&CStr> {
        c_str_from_array(&self.description)
    }

    #[inline]
    pub fn default_value_as_c_str(&self) -> Option<&CStr> {
        c_str_from_array(&self.default_value)
    }
}

impl Debug for LayerSettingDescriptionEXT<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        f.debug_struct("LayerSettingDescriptionEXT")
            .field("s_type", &self.s_type)
            .field("p_next", &self.p_next)
            .field("setting_name", &self.setting_name_as_c_str())
            .field("ty", &self.ty)
            .field("description", &self.description_as_c_str())
            .field("default_value", &self.default_value_as_c_str())
            .finish()
    }
}

#[repr(C)]
#[derive(Copy, Clone)]
pub struct LayerSettingOptionEXT<'a> {
    pub s_type: vk::StructureType,
    pub p_next: *mut c_void,
    pub option_name: [c_char; MAX_EXTENSION_NAME_SIZE],
    pub description: [c_char; MAX_DESCRIPTION_SIZE],
    pub _marker: PhantomData<&'a ()>,
}

unsafe impl Send for LayerSettingOptionEXT<'_> {}
unsafe impl Sync for LayerSettingOptionEXT<'_> {}

impl Default for LayerSettingOptionEXT<'_> {
    #[inline]
    fn default() -> Self {
        Self {
            s_type: STRUCTURE_TYPE_LAYER_SETTING_OPTION_EXT,
            p_next: std::ptr::null_mut(),
            option_name: [0; MAX_EXTENSION_NAME_SIZE],
            description: [0; MAX_DESCRIPTION_SIZE],
            _marker: PhantomData,
        }
    }
}

unsafe impl vk::TaggedStructure for LayerSettingOptionEXT<'_> {
    const STRUCTURE_TYPE: vk::StructureType = STRUCTURE_TYPE_LAYER_SETTING_OPTION_EXT;
}

impl LayerSettingOptionEXT<'_> {
    #[inline]
    pub fn option_name_as_c_str(&self) -> Option<&CStr> {
        c_str_from_array(&self.option_name)
    }

    #[inline]
    pub fn description_as_c_str(&self) -> Option<&CStr> {
        c_str_from_array(&self.description)
    }
}

impl Debug for LayerSettingOptionEXT<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        f.debug_struct("LayerSettingOptionEXT")
            .field("s_type", &self.s_type)
            .field("p_next", &self.p_next)
            .field("option_name", &self.option_name_as_c_str())
            .field("description", &self.description_as_c_str())
            .finish()
    }
}

#[doc = "<https://registry.khronos.org/vulkan/specs/latest/man/html/vkEnumerateInstanceLayerSettingsEXT.html>"]
pub type PFN_vkEnumerateInstanceLayerSettingsEXT = unsafe extern "system" fn(
    p_layer_name: *const c_char,
    p_setting_count: *mut u32,
    p_settings: *mut LayerSettingDescriptionEXT<'_>,
) -> vk::Result;

#[doc = "<https://registry.khronos.org/vulkan/specs/latest/man/html/vkEnumerateInstanceLayerSettingInfoEXT.html>"]
pub type PFN_vkEnumerateInstanceLayerSettingInfoEXT = unsafe extern "system" fn(
    p_layer_name: *const c_char,
    p_setting_name: *const c_char,
    p_setting_info_count: *mut u32,
    p_setting_options: *mut LayerSettingOptionEXT<'_>,
) -> vk::Result;

pub const ENUMERATE_INSTANCE_LAYER_SETTINGS_EXT_NAME: &CStr = c"vkEnumerateInstanceLayerSettingsEXT";
pub const ENUMERATE_INSTANCE_LAYER_SETTING_INFO_EXT_NAME: &CStr =
    c"vkEnumerateInstanceLayerSettingInfoEXT";

/// Returns the NUL-terminated string at the start of `array`, or `None` if `array` contains no
/// NUL.
#[inline]
pub fn c_str_from_array(array: &[c_char]) -> Option<&CStr> {
    CStr::from_bytes_until_nul(bytemuck::cast_slice(array)).ok()
}

/// Copies `src` into `dst` followed by a NUL, truncating it to fit. The rest of `dst` is zeroed.
pub(crate) fn copy_str_to_array(dst: &mut [c_char], src: &str) {
    let dst: &mut [u8] = bytemuck::cast_slice_mut(dst);
    let len = src.len().min(dst.len().saturating_sub(1));
    dst[..len].copy_from_slice(&src.as_bytes()[..len]);
    dst[len..].fill(0);
}
