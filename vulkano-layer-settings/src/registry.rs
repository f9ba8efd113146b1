// Copyright (c) 2021 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! The settings that layers expose.
//!
//! A [`LayerSettingsRegistry`] is the layer-side source of truth for the two query commands of
//! `VK_EXT_layer_settings`. It maps layer names to a [`LayerSettingsInfo`], which lists the
//! settings of the layer in declaration order. Every description is validated when it is added,
//! so that the registry can always be written into the fixed-size C structures.
//!
//! The registry also resolves the effective value of each setting, from the declared default,
//! the values given by the application at instance creation, and the user's
//! [`LayerSettingsConfig`].

use crate::{
    config::{layer_prefix, LayerSettingsConfig},
    ffi, LayerSetting, LayerSettingDescription, LayerSettingOption, LayerSettingValue,
    ValidationError, Version,
};
use ash::vk;
use indexmap::IndexMap;
use std::{
    error::Error,
    ffi::{c_char, CStr},
    fmt::{Display, Error as FmtError, Formatter},
};

/// The settings of a single layer.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerSettingsInfo {
    layer_name: String,
    description: String,
    api_version: Option<Version>,
    settings: Vec<LayerSettingDescription>,
}

impl LayerSettingsInfo {
    /// Returns an empty `LayerSettingsInfo` for the layer with the given name.
    pub fn new(layer_name: impl Into<String>) -> Self {
        LayerSettingsInfo {
            layer_name: layer_name.into(),
            description: String::new(),
            api_version: None,
            settings: Vec::new(),
        }
    }

    /// Sets the description of the layer.
    #[inline]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the Vulkan version the layer was written against.
    #[inline]
    pub fn with_api_version(mut self, api_version: Version) -> Self {
        self.api_version = Some(api_version);
        self
    }

    /// Adds a setting to the layer.
    ///
    /// Returns an error if the description can't be represented in the C structures of the
    /// extension, if its default value or options are inconsistent, or if the layer already
    /// has a setting with the same name.
    pub fn add_setting(&mut self, setting: LayerSettingDescription) -> Result<(), Box<ValidationError>> {
        setting.validate().map_err(|err| err.add_context("setting"))?;

        if self.setting(&setting.name).is_some() {
            return Err(ValidationError::new(
                "setting.name",
                format!(
                    "is `{}`, but layer `{}` already has a setting with that name",
                    setting.name, self.layer_name,
                ),
            ));
        }

        self.settings.push(setting);

        Ok(())
    }

    /// Returns the name of the layer.
    #[inline]
    pub fn layer_name(&self) -> &str {
        &self.layer_name
    }

    /// Returns the description of the layer.
    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the Vulkan version the layer was written against, if known.
    #[inline]
    pub fn api_version(&self) -> Option<Version> {
        self.api_version
    }

    /// Returns the settings of the layer, in declaration order.
    #[inline]
    pub fn settings(&self) -> &[LayerSettingDescription] {
        &self.settings
    }

    /// Returns the setting with the given name.
    #[inline]
    pub fn setting(&self, name: &str) -> Option<&LayerSettingDescription> {
        self.settings.iter().find(|setting| setting.name == name)
    }
}

/// The settings of every layer known to the process.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayerSettingsRegistry {
    layers: IndexMap<String, LayerSettingsInfo>,
}

impl LayerSettingsRegistry {
    /// Returns an empty registry.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a layer to the registry.
    ///
    /// Returns an error if a layer with the same name was already added.
    pub fn add_layer(&mut self, layer: LayerSettingsInfo) -> Result<(), Box<ValidationError>> {
        if layer.layer_name.is_empty() {
            return Err(ValidationError::new("layer.layer_name", "is empty"));
        }

        if self.layers.contains_key(&layer.layer_name) {
            return Err(ValidationError::new(
                "layer.layer_name",
                format!("is `{}`, which is already in the registry", layer.layer_name),
            ));
        }

        log::debug!(
            "registered {} setting(s) for layer {}",
            layer.settings.len(),
            layer.layer_name,
        );
        self.layers.insert(layer.layer_name.clone(), layer);

        Ok(())
    }

    /// Returns the layer with the given name.
    #[inline]
    pub fn layer(&self, layer_name: &str) -> Option<&LayerSettingsInfo> {
        self.layers.get(layer_name)
    }

    /// Returns every layer in the registry, in the order they were added.
    #[inline]
    pub fn layers(&self) -> impl ExactSizeIterator<Item = &LayerSettingsInfo> {
        self.layers.values()
    }

    /// Returns the settings of the given layer.
    pub fn settings(&self, layer_name: &str) -> Result<&[LayerSettingDescription], LayerSettingsError> {
        self.layer(layer_name)
            .map(LayerSettingsInfo::settings)
            .ok_or_else(|| LayerSettingsError::LayerNotPresent(layer_name.to_owned()))
    }

    /// Returns the options of the given setting.
    ///
    /// Returns an error if the layer or the setting don't exist, or if the setting is not
    /// enumerable.
    pub fn setting_options(
        &self,
        layer_name: &str,
        setting_name: &str,
    ) -> Result<&[LayerSettingOption], LayerSettingsError> {
        let setting = self
            .settings(layer_name)?
            .iter()
            .find(|setting| setting.name == setting_name)
            .ok_or_else(|| LayerSettingsError::SettingNotPresent {
                layer_name: layer_name.to_owned(),
                setting_name: setting_name.to_owned(),
            })?;

        if !setting.is_enumerable() {
            return Err(LayerSettingsError::SettingNotEnumerable {
                layer_name: layer_name.to_owned(),
                setting_name: setting_name.to_owned(),
            });
        }

        Ok(&setting.options)
    }

    /// Implements `vkEnumerateInstanceLayerSettingsEXT` on top of the registry.
    ///
    /// If `p_settings` is null, `*p_setting_count` receives the number of settings of the
    /// layer. Otherwise, up to `*p_setting_count` descriptions are written, `*p_setting_count`
    /// receives the number of descriptions written, and `VK_INCOMPLETE` is returned if there
    /// were more. On error, nothing is written.
    ///
    /// # Safety
    ///
    /// - `p_layer_name` must be null or point to a NUL-terminated string.
    /// - `p_setting_count` must be null or valid for reads and writes.
    /// - If `p_settings` is not null, it must be valid for writes of `*p_setting_count`
    ///   elements.
    pub unsafe fn enumerate_settings(
        &self,
        p_layer_name: *const c_char,
        p_setting_count: *mut u32,
        p_settings: *mut ffi::LayerSettingDescriptionEXT<'_>,
    ) -> vk::Result {
        if p_layer_name.is_null() || p_setting_count.is_null() {
            return vk::Result::ERROR_INITIALIZATION_FAILED;
        }

        let Ok(layer_name) = unsafe { CStr::from_ptr(p_layer_name) }.to_str() else {
            return vk::Result::ERROR_LAYER_NOT_PRESENT;
        };
        let settings = match self.settings(layer_name) {
            Ok(settings) => settings,
            Err(err) => return err.into(),
        };

        unsafe {
            fill_enumeration(settings, p_setting_count, p_settings, |setting| {
                setting.to_raw()
            })
        }
    }

    /// Implements `vkEnumerateInstanceLayerSettingInfoEXT` on top of the registry.
    ///
    /// Follows the same rules as [`enumerate_settings`](Self::enumerate_settings). Unknown
    /// layers, unknown settings and settings without options return three different errors.
    ///
    /// # Safety
    ///
    /// - `p_layer_name` and `p_setting_name` must be null or point to NUL-terminated strings.
    /// - `p_setting_info_count` must be null or valid for reads and writes.
    /// - If `p_setting_options` is not null, it must be valid for writes of
    ///   `*p_setting_info_count` elements.
    pub unsafe fn enumerate_setting_options(
        &self,
        p_layer_name: *const c_char,
        p_setting_name: *const c_char,
        p_setting_info_count: *mut u32,
        p_setting_options: *mut ffi::LayerSettingOptionEXT<'_>,
    ) -> vk::Result {
        if p_layer_name.is_null() || p_setting_name.is_null() || p_setting_info_count.is_null() {
            return vk::Result::ERROR_INITIALIZATION_FAILED;
        }

        let Ok(layer_name) = unsafe { CStr::from_ptr(p_layer_name) }.to_str() else {
            return vk::Result::ERROR_LAYER_NOT_PRESENT;
        };
        // Names that are not UTF-8 can't match anything in the registry.
        let setting_name = unsafe { CStr::from_ptr(p_setting_name) };
        let result = match setting_name.to_str() {
            Ok(setting_name) => self.setting_options(layer_name, setting_name),
            Err(_) => self.settings(layer_name).and_then(|_| {
                Err(LayerSettingsError::SettingNotPresent {
                    layer_name: layer_name.to_owned(),
                    setting_name: setting_name.to_string_lossy().into_owned(),
                })
            }),
        };
        let options = match result {
            Ok(options) => options,
            Err(err) => return err.into(),
        };

        unsafe {
            fill_enumeration(options, p_setting_info_count, p_setting_options, |option| {
                option.to_raw()
            })
        }
    }

    /// Returns the effective value of every setting of the given layer, in declaration order.
    ///
    /// Each setting starts at its default value, which is then overridden in turn by:
    ///
    /// - the values in `api_settings`, usually read from the
    ///   [`InstanceLayerSettingsEXT`](ffi::InstanceLayerSettingsEXT) given at instance creation;
    /// - the value in the settings file of `config`;
    /// - the value in the environment captured by `config`.
    ///
    /// A setting in `api_settings` applies to this layer if its name is the name of one of the
    /// layer's settings, optionally preceded by the [layer prefix](layer_prefix) and a dot.
    /// Values of the wrong type, values that are not among a setting's options and values that
    /// can't be parsed are skipped with a warning.
    pub fn resolve(
        &self,
        layer_name: &str,
        api_settings: &[LayerSetting],
        config: &LayerSettingsConfig,
    ) -> Result<Vec<LayerSetting>, LayerSettingsError> {
        let layer = self
            .layer(layer_name)
            .ok_or_else(|| LayerSettingsError::LayerNotPresent(layer_name.to_owned()))?;
        let prefix = layer_prefix(layer_name);

        let mut values: IndexMap<&str, LayerSettingValue> = layer
            .settings
            .iter()
            .filter_map(|setting| Some((setting.name.as_str(), setting.parsed_default()?)))
            .collect();

        for api_setting in api_settings {
            let name = api_setting
                .name
                .strip_prefix(prefix.as_str())
                .and_then(|name| name.strip_prefix('.'))
                .unwrap_or(&api_setting.name);

            let Some(setting) = layer.setting(name) else {
                log::debug!("layer {} has no setting named {}", layer_name, api_setting.name);
                continue;
            };

            if setting.accepts(&api_setting.value) {
                values.insert(&setting.name, api_setting.value.clone());
            } else {
                log::warn!(
                    "ignoring value `{}` of type {} for setting {}.{}, which expects a {}{}",
                    api_setting.value,
                    api_setting.value.value_type(),
                    prefix,
                    setting.name,
                    setting.value_type,
                    if setting.is_enumerable() { " from its options" } else { "" },
                );
            }
        }

        for setting in &layer.settings {
            let Some((text, source)) = config.lookup(&prefix, &setting.name) else {
                continue;
            };

            match LayerSettingValue::parse(setting.value_type, text) {
                Ok(value) if setting.accepts(&value) => {
                    log::debug!("{}.{} = {} (from {})", prefix, setting.name, value, source);
                    values.insert(&setting.name, value);
                }
                Ok(value) => log::warn!(
                    "ignoring value `{}` for setting {}.{} from {}: not one of its options",
                    value,
                    prefix,
                    setting.name,
                    source,
                ),
                Err(err) => log::warn!(
                    "ignoring value for setting {}.{} from {}: {}",
                    prefix,
                    setting.name,
                    source,
                    err,
                ),
            }
        }

        Ok(values
            .into_iter()
            .map(|(name, value)| LayerSetting::new(name, value))
            .collect())
    }
}

/// Writes `items` to `p_output` with the two-call enumeration idiom.
unsafe fn fill_enumeration<T, R>(
    items: &[T],
    p_count: *mut u32,
    p_output: *mut R,
    mut to_raw: impl FnMut(&T) -> R,
) -> vk::Result {
    let total = items.len();

    if p_output.is_null() {
        unsafe { p_count.write(total as u32) };
        return vk::Result::SUCCESS;
    }

    let capacity = unsafe { p_count.read() } as usize;
    let written = capacity.min(total);

    for (index, item) in items[..written].iter().enumerate() {
        let output = unsafe { p_output.add(index) };
        unsafe { output.write(to_raw(item)) };
    }

    unsafe { p_count.write(written as u32) };

    if written < total {
        vk::Result::INCOMPLETE
    } else {
        vk::Result::SUCCESS
    }
}

/// Error that can happen when querying a [`LayerSettingsRegistry`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayerSettingsError {
    /// No layer with that name is in the registry.
    LayerNotPresent(String),

    /// The layer has no setting with that name.
    SettingNotPresent {
        layer_name: String,
        setting_name: String,
    },

    /// The setting exists, but does not have a list of options.
    SettingNotEnumerable {
        layer_name: String,
        setting_name: String,
    },
}

impl Error for LayerSettingsError {}

impl Display for LayerSettingsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match self {
            Self::LayerNotPresent(layer_name) => {
                write!(f, "the layer `{}` is not present", layer_name)
            }
            Self::SettingNotPresent {
                layer_name,
                setting_name,
            } => write!(
                f,
                "the layer `{}` has no setting named `{}`",
                layer_name, setting_name,
            ),
            Self::SettingNotEnumerable {
                layer_name,
                setting_name,
            } => write!(
                f,
                "the setting `{}` of layer `{}` does not have a list of options",
                setting_name, layer_name,
            ),
        }
    }
}

impl From<LayerSettingsError> for vk::Result {
    #[inline]
    fn from(err: LayerSettingsError) -> Self {
        match err {
            LayerSettingsError::LayerNotPresent(_) => vk::Result::ERROR_LAYER_NOT_PRESENT,
            LayerSettingsError::SettingNotPresent { .. } => vk::Result::ERROR_FEATURE_NOT_PRESENT,
            LayerSettingsError::SettingNotEnumerable { .. } => {
                vk::Result::ERROR_FORMAT_NOT_SUPPORTED
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{LayerSettingsError, LayerSettingsInfo, LayerSettingsRegistry};
    use crate::{
        ffi, tests::VALIDATION_LAYER, LayerSetting, LayerSettingDescription, LayerSettingValue,
        LayerSettingValueType, LayerSettingsConfig,
    };
    use ash::vk;
    use std::{ffi::CStr, ptr};

    #[test]
    fn null_buffer_returns_count() {
        let registry = test_registry!();
        let mut count = u32::MAX;

        let result = unsafe {
            registry.enumerate_settings(VALIDATION_LAYER.as_ptr(), &mut count, ptr::null_mut())
        };

        assert_eq!(result, vk::Result::SUCCESS);
        assert_eq!(count, 4);
    }

    #[test]
    fn second_call_is_complete() {
        let registry = test_registry!();
        let mut count = 0;
        let result = unsafe {
            registry.enumerate_settings(VALIDATION_LAYER.as_ptr(), &mut count, ptr::null_mut())
        };
        assert_eq!(result, vk::Result::SUCCESS);

        let mut output = vec![ffi::LayerSettingDescriptionEXT::default(); count as usize];
        let result = unsafe {
            registry.enumerate_settings(VALIDATION_LAYER.as_ptr(), &mut count, output.as_mut_ptr())
        };

        assert_eq!(result, vk::Result::SUCCESS);
        assert_eq!(count as usize, output.len());

        let names: Vec<_> = output
            .iter()
            .map(|raw| raw.setting_name_as_c_str().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(
            names,
            ["debug_action", "log_filename", "duplicate_message_limit", "enable_message_limit"],
        );
        assert_eq!(output[2].ty, ffi::LayerSettingValueTypeEXT::UINT32);
        assert_eq!(output[2].default_value_as_c_str(), Some(c"10"));
    }

    #[test]
    fn small_buffer_is_incomplete() {
        let registry = test_registry!();
        let mut output = [ffi::LayerSettingDescriptionEXT::default(); 4];
        let mut count = 2;

        let result = unsafe {
            registry.enumerate_settings(VALIDATION_LAYER.as_ptr(), &mut count, output.as_mut_ptr())
        };

        assert_eq!(result, vk::Result::INCOMPLETE);
        assert_eq!(count, 2);
        assert_eq!(output[1].setting_name_as_c_str(), Some(c"log_filename"));
        // Entries past the capacity are left alone.
        assert_eq!(output[2].setting_name_as_c_str(), Some(c""));
    }

    #[test]
    fn unknown_layer() {
        let registry = test_registry!();
        let mut count = 7;

        let result = unsafe {
            registry.enumerate_settings(c"VK_LAYER_missing".as_ptr(), &mut count, ptr::null_mut())
        };

        assert_eq!(result, vk::Result::ERROR_LAYER_NOT_PRESENT);
        assert_eq!(count, 7);

        let result = unsafe {
            registry.enumerate_setting_options(
                c"VK_LAYER_missing".as_ptr(),
                c"debug_action".as_ptr(),
                &mut count,
                ptr::null_mut(),
            )
        };
        assert_eq!(result, vk::Result::ERROR_LAYER_NOT_PRESENT);
    }

    #[test]
    fn names_that_are_not_utf8() {
        let mut registry = LayerSettingsRegistry::new();
        let mut layer = LayerSettingsInfo::new("VK_LAYER_\u{FFFD}");
        layer
            .add_setting(LayerSettingDescription::new("\u{FFFD}", LayerSettingValueType::Bool))
            .unwrap();
        registry.add_layer(layer).unwrap();

        let invalid = CStr::from_bytes_with_nul(b"VK_LAYER_\xff\0").unwrap();
        let mut count = 7;

        let result = unsafe {
            registry.enumerate_settings(invalid.as_ptr(), &mut count, ptr::null_mut())
        };
        assert_eq!(result, vk::Result::ERROR_LAYER_NOT_PRESENT);
        assert_eq!(count, 7);

        let result = unsafe {
            registry.enumerate_setting_options(
                invalid.as_ptr(),
                c"\u{FFFD}".as_ptr(),
                &mut count,
                ptr::null_mut(),
            )
        };
        assert_eq!(result, vk::Result::ERROR_LAYER_NOT_PRESENT);

        let result = unsafe {
            registry.enumerate_setting_options(
                c"VK_LAYER_\u{FFFD}".as_ptr(),
                CStr::from_bytes_with_nul(b"\xff\0").unwrap().as_ptr(),
                &mut count,
                ptr::null_mut(),
            )
        };
        assert_eq!(result, vk::Result::ERROR_FEATURE_NOT_PRESENT);
        assert_eq!(count, 7);
    }

    #[test]
    fn empty_registry() {
        let registry = LayerSettingsRegistry::new();
        let mut count = 7;

        let result = unsafe {
            registry.enumerate_settings(VALIDATION_LAYER.as_ptr(), &mut count, ptr::null_mut())
        };
        assert_eq!(result, vk::Result::ERROR_LAYER_NOT_PRESENT);

        let result = unsafe {
            registry.enumerate_setting_options(
                VALIDATION_LAYER.as_ptr(),
                c"debug_action".as_ptr(),
                &mut count,
                ptr::null_mut(),
            )
        };
        assert_eq!(result, vk::Result::ERROR_LAYER_NOT_PRESENT);
        assert_eq!(count, 7);
        assert_eq!(registry.layers().len(), 0);
    }

    #[test]
    fn null_arguments() {
        let registry = test_registry!();

        let result = unsafe {
            registry.enumerate_settings(ptr::null(), &mut 0, ptr::null_mut())
        };
        assert_eq!(result, vk::Result::ERROR_INITIALIZATION_FAILED);

        let result = unsafe {
            registry.enumerate_settings(VALIDATION_LAYER.as_ptr(), ptr::null_mut(), ptr::null_mut())
        };
        assert_eq!(result, vk::Result::ERROR_INITIALIZATION_FAILED);
    }

    #[test]
    fn option_errors_are_distinct() {
        let registry = test_registry!();
        let mut count = 0;

        let unknown = unsafe {
            registry.enumerate_setting_options(
                VALIDATION_LAYER.as_ptr(),
                c"report_flags".as_ptr(),
                &mut count,
                ptr::null_mut(),
            )
        };
        let not_enumerable = unsafe {
            registry.enumerate_setting_options(
                VALIDATION_LAYER.as_ptr(),
                c"duplicate_message_limit".as_ptr(),
                &mut count,
                ptr::null_mut(),
            )
        };

        assert_eq!(unknown, vk::Result::ERROR_FEATURE_NOT_PRESENT);
        assert_eq!(not_enumerable, vk::Result::ERROR_FORMAT_NOT_SUPPORTED);
        assert_ne!(unknown, not_enumerable);
        assert_eq!(
            registry.setting_options("VK_LAYER_KHRONOS_validation", "duplicate_message_limit"),
            Err(LayerSettingsError::SettingNotEnumerable {
                layer_name: "VK_LAYER_KHRONOS_validation".into(),
                setting_name: "duplicate_message_limit".into(),
            }),
        );
    }

    #[test]
    fn enumerable_settings_have_options() {
        let registry = test_registry!();

        for layer in registry.layers() {
            for setting in layer.settings().iter().filter(|s| s.is_enumerable()) {
                let layer_name = std::ffi::CString::new(layer.layer_name()).unwrap();
                let setting_name = std::ffi::CString::new(setting.name.as_str()).unwrap();
                let mut count = 0;

                let result = unsafe {
                    registry.enumerate_setting_options(
                        layer_name.as_ptr(),
                        setting_name.as_ptr(),
                        &mut count,
                        ptr::null_mut(),
                    )
                };
                assert_eq!(result, vk::Result::SUCCESS);
                assert!(count > 0);

                let mut output = vec![ffi::LayerSettingOptionEXT::default(); count as usize];
                let result = unsafe {
                    registry.enumerate_setting_options(
                        layer_name.as_ptr(),
                        setting_name.as_ptr(),
                        &mut count,
                        output.as_mut_ptr(),
                    )
                };
                assert_eq!(result, vk::Result::SUCCESS);
                assert_eq!(
                    output[0].option_name_as_c_str().unwrap().to_str().unwrap(),
                    setting.options[0].name,
                );
            }
        }
    }

    #[test]
    fn duplicates_rejected() {
        let mut registry = test_registry!();
        assert!(registry
            .add_layer(LayerSettingsInfo::new("VK_LAYER_KHRONOS_validation"))
            .is_err());

        let mut layer = LayerSettingsInfo::new("VK_LAYER_LUNARG_api_dump");
        layer
            .add_setting(LayerSettingDescription::new("show_timestamp", LayerSettingValueType::Bool))
            .unwrap();
        let err = layer
            .add_setting(LayerSettingDescription::new("show_timestamp", LayerSettingValueType::Bool))
            .unwrap_err();
        assert_eq!(err.context, "setting.name");
    }

    #[test]
    fn resolve_precedence() {
        let registry = test_registry!();
        let config = LayerSettingsConfig::parse(
            "# user settings\n\
             khronos_validation.duplicate_message_limit = 20\n\
             khronos_validation.enable_message_limit = maybe\n",
        )
        .with_env_var("VK_KHRONOS_VALIDATION_LOG_FILENAME", "env.txt");

        let api = [
            LayerSetting::new("khronos_validation.duplicate_message_limit", 5u32),
            LayerSetting::new("debug_action", "VK_DBG_LAYER_ACTION_BREAK"),
            LayerSetting::new("log_filename", "api.txt"),
            // Wrong type and unknown options are skipped.
            LayerSetting::new("enable_message_limit", 1u32),
            LayerSetting::new("debug_action", "VK_DBG_LAYER_ACTION_CRASH"),
            // Settings of other layers are ignored.
            LayerSetting::new("show_timestamp", true),
        ];

        let values = registry
            .resolve("VK_LAYER_KHRONOS_validation", &api, &config)
            .unwrap();

        assert_eq!(
            values,
            [
                LayerSetting::new("debug_action", "VK_DBG_LAYER_ACTION_BREAK"),
                LayerSetting::new("log_filename", "env.txt"),
                LayerSetting::new("duplicate_message_limit", 20u32),
                LayerSetting::new("enable_message_limit", LayerSettingValue::Bool(true)),
            ],
        );

        assert_eq!(
            registry.resolve("VK_LAYER_missing", &[], &config),
            Err(LayerSettingsError::LayerNotPresent("VK_LAYER_missing".into())),
        );
    }

    #[test]
    fn resolve_skips_empty_option_lists() {
        let registry = test_registry!();
        let config = LayerSettingsConfig::new()
            .with_env_var("VK_KHRONOS_VALIDATION_DEBUG_ACTION", "");
        let api = [LayerSetting::new("debug_action", " , ")];

        let values = registry
            .resolve("VK_LAYER_KHRONOS_validation", &api, &config)
            .unwrap();

        assert_eq!(
            values[0],
            LayerSetting::new("debug_action", "VK_DBG_LAYER_ACTION_LOG_MSG"),
        );
    }
}
