// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

#![cfg(test)]

use crate::{
    LayerSettingDescription, LayerSettingOption, LayerSettingValueType, LayerSettingsInfo,
    LayerSettingsRegistry, Version,
};
use std::ffi::CStr;

pub(crate) const VALIDATION_LAYER: &CStr = c"VK_LAYER_KHRONOS_validation";

/// Builds a registry with a small version of the validation layer's settings.
pub(crate) fn validation_registry() -> LayerSettingsRegistry {
    let mut layer = LayerSettingsInfo::new("VK_LAYER_KHRONOS_validation")
        .with_description("Khronos validation layer")
        .with_api_version(Version {
            major: 1,
            minor: 3,
            patch: 250,
        });

    for setting in [
        LayerSettingDescription {
            description: "Specifies what action is to be taken when a layer reports information"
                .into(),
            default_value: "VK_DBG_LAYER_ACTION_LOG_MSG".into(),
            options: vec![
                LayerSettingOption::with_description("VK_DBG_LAYER_ACTION_IGNORE", "Ignore"),
                LayerSettingOption::with_description("VK_DBG_LAYER_ACTION_LOG_MSG", "Log message"),
                LayerSettingOption::with_description("VK_DBG_LAYER_ACTION_BREAK", "Break"),
            ],
            ..LayerSettingDescription::new("debug_action", LayerSettingValueType::String)
        },
        LayerSettingDescription {
            description: "Specifies the output filename".into(),
            default_value: "stdout".into(),
            ..LayerSettingDescription::new("log_filename", LayerSettingValueType::String)
        },
        LayerSettingDescription {
            description: "Maximum number of times any single validation message is reported"
                .into(),
            default_value: "10".into(),
            ..LayerSettingDescription::new("duplicate_message_limit", LayerSettingValueType::Uint32)
        },
        LayerSettingDescription {
            description: "Enable limiting of duplicate messages".into(),
            default_value: "true".into(),
            ..LayerSettingDescription::new("enable_message_limit", LayerSettingValueType::Bool)
        },
    ] {
        layer.add_setting(setting).unwrap();
    }

    let mut registry = LayerSettingsRegistry::new();
    registry.add_layer(layer).unwrap();
    registry
}

/// Returns the test registry.
macro_rules! test_registry {
    () => {
        $crate::tests::validation_registry()
    };
}

/// Installs the test registry as the process-wide registry.
///
/// Every test that touches the process-wide registry installs the same content, so tests running
/// in parallel observe the same answers.
macro_rules! install_test_registry {
    () => {
        $crate::entry::install_registry(::std::sync::Arc::new(test_registry!()))
    };
}
