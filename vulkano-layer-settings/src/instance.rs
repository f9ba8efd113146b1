// Copyright (c) 2021 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

use crate::{ffi, LayerSetting, LayerSettingValue, ValidationError};
use ash::vk;
use std::{
    ffi::CString,
    ptr, slice,
};

/// Setting values passed to layers when creating an instance.
///
/// This owns an [`InstanceLayerSettingsEXT`](ffi::InstanceLayerSettingsEXT) together with the
/// array of values and the strings it points to, so that it can be added to the `p_next` chain
/// of a `VkInstanceCreateInfo`.
///
/// ```
/// use ash::vk;
/// use vulkano_layer_settings::{InstanceLayerSettings, LayerSetting};
///
/// let mut layer_settings = InstanceLayerSettings::new([
///     LayerSetting::new("khronos_validation.debug_action", "VK_DBG_LAYER_ACTION_LOG_MSG"),
///     LayerSetting::new("khronos_validation.duplicate_message_limit", 20u32),
/// ])
/// .unwrap();
///
/// let mut create_info = vk::InstanceCreateInfo::default();
/// layer_settings.push_to(&mut create_info);
/// ```
#[derive(Debug)]
pub struct InstanceLayerSettings {
    raw: ffi::InstanceLayerSettingsEXT<'static>,
    values: Vec<ffi::LayerSettingValueEXT<'static>>,
    _strings: Vec<CString>,
    settings: Vec<LayerSetting>,
}

impl InstanceLayerSettings {
    /// Builds the raw structures for `settings`.
    ///
    /// Returns an error if a setting name is empty or too long, or if a name or a string value
    /// contains a NUL byte.
    pub fn new(settings: impl IntoIterator<Item = LayerSetting>) -> Result<Self, Box<ValidationError>> {
        let settings: Vec<_> = settings.into_iter().collect();
        let mut strings = Vec::new();
        let mut values = Vec::with_capacity(settings.len());

        for (index, setting) in settings.iter().enumerate() {
            setting
                .validate()
                .map_err(|err| err.add_context(format!("settings[{}]", index)))?;

            let mut raw = ffi::LayerSettingValueEXT {
                ty: setting.value.value_type().into(),
                ..Default::default()
            };
            ffi::copy_str_to_array(&mut raw.setting_name, &setting.name);

            match setting.value {
                LayerSettingValue::Uint32(value) => raw.data.value32 = value,
                LayerSettingValue::Uint64(value) => raw.data.value64 = value,
                LayerSettingValue::Float(value) => raw.data.value_float = value,
                LayerSettingValue::Bool(value) => raw.data.value_bool = value.into(),
                LayerSettingValue::String(ref value) => {
                    let value = CString::new(value.as_str()).map_err(|_| {
                        ValidationError::new(
                            format!("settings[{}].value", index),
                            "contains a nul byte",
                        )
                    })?;
                    raw.data.value_string = value.as_ptr();
                    strings.push(value);
                }
            }

            values.push(raw);
        }

        let raw = ffi::InstanceLayerSettingsEXT {
            setting_count: values.len() as u32,
            p_setting: if values.is_empty() {
                ptr::null_mut()
            } else {
                values.as_mut_ptr()
            },
            ..Default::default()
        };

        Ok(InstanceLayerSettings {
            raw,
            values,
            _strings: strings,
            settings,
        })
    }

    /// Returns the settings, in the order they were given.
    #[inline]
    pub fn settings(&self) -> &[LayerSetting] {
        &self.settings
    }

    /// Returns the raw structure.
    ///
    /// Its `p_next` is null unless [`push_to`](Self::push_to) has been called.
    #[inline]
    pub fn as_raw(&self) -> &ffi::InstanceLayerSettingsEXT<'static> {
        &self.raw
    }

    /// Returns the raw values that the raw structure points to.
    #[inline]
    pub fn raw_values(&self) -> &[ffi::LayerSettingValueEXT<'static>] {
        &self.values
    }

    /// Inserts the raw structure at the front of the `p_next` chain of `create_info`.
    pub fn push_to<'a>(&'a mut self, create_info: &mut vk::InstanceCreateInfo<'a>) {
        self.raw.p_next = create_info.p_next.cast_mut();
        create_info.p_next = ptr::from_ref(&self.raw).cast();
    }
}

/// Returns the first [`InstanceLayerSettingsEXT`](ffi::InstanceLayerSettingsEXT) in the `p_next`
/// chain of `create_info`.
///
/// # Safety
///
/// - Every structure in the `p_next` chain of `create_info` must be a valid Vulkan structure,
///   starting with `s_type` and `p_next`.
pub unsafe fn find_instance_layer_settings<'a>(
    create_info: &'a vk::InstanceCreateInfo<'_>,
) -> Option<&'a ffi::InstanceLayerSettingsEXT<'a>> {
    let mut next: *const vk::BaseInStructure<'_> = create_info.p_next.cast();

    while let Some(base) = unsafe { next.as_ref() } {
        if base.s_type == ffi::STRUCTURE_TYPE_INSTANCE_LAYER_SETTINGS_EXT {
            return Some(unsafe { &*next.cast::<ffi::InstanceLayerSettingsEXT<'a>>() });
        }

        next = base.p_next;
    }

    None
}

/// Reads the values out of an [`InstanceLayerSettingsEXT`](ffi::InstanceLayerSettingsEXT).
///
/// # Safety
///
/// - If `raw.setting_count` is not zero, `raw.p_setting` must point to `raw.setting_count`
///   values.
/// - The string values must be null or point to NUL-terminated strings.
pub unsafe fn read_instance_layer_settings(
    raw: &ffi::InstanceLayerSettingsEXT<'_>,
) -> Result<Vec<LayerSetting>, Box<ValidationError>> {
    if raw.s_type != ffi::STRUCTURE_TYPE_INSTANCE_LAYER_SETTINGS_EXT {
        return Err(ValidationError::new(
            "s_type",
            "is not `STRUCTURE_TYPE_INSTANCE_LAYER_SETTINGS_EXT`",
        ));
    }

    if raw.setting_count == 0 {
        return Ok(Vec::new());
    }

    if raw.p_setting.is_null() {
        return Err(ValidationError::new(
            "p_setting",
            "is null, but `setting_count` is not zero",
        ));
    }

    let values = unsafe { slice::from_raw_parts(raw.p_setting, raw.setting_count as usize) };

    values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            unsafe { LayerSetting::from_raw(value) }
                .map_err(|err| err.add_context(format!("p_setting[{}]", index)))
        })
        .collect()
}
