// Copyright (c) 2021 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

// The installed registry is process-wide, so this runs in its own test binary.

use ash::vk;
use std::{ptr, sync::Arc};
use vulkano_layer_settings::{
    entry, LayerSettingDescription, LayerSettingValueType, LayerSettingsInfo,
    LayerSettingsRegistry,
};

const LAYER: &std::ffi::CStr = c"VK_LAYER_LUNARG_api_dump";

fn query(count: &mut u32) -> (vk::Result, vk::Result) {
    let count: *mut u32 = count;
    let settings = unsafe {
        entry::enumerate_instance_layer_settings(LAYER.as_ptr(), count, ptr::null_mut())
    };
    let options = unsafe {
        entry::enumerate_instance_layer_setting_info(
            LAYER.as_ptr(),
            c"show_timestamp".as_ptr(),
            count,
            ptr::null_mut(),
        )
    };

    (settings, options)
}

#[test]
fn entry_points_without_registry() {
    entry::clear_registry();
    assert!(entry::installed_registry().is_none());

    let mut count = 7;
    assert_eq!(
        query(&mut count),
        (vk::Result::ERROR_LAYER_NOT_PRESENT, vk::Result::ERROR_LAYER_NOT_PRESENT),
    );
    assert_eq!(count, 7);

    let mut layer = LayerSettingsInfo::new("VK_LAYER_LUNARG_api_dump");
    layer
        .add_setting(LayerSettingDescription::new("show_timestamp", LayerSettingValueType::Bool))
        .unwrap();
    let mut registry = LayerSettingsRegistry::new();
    registry.add_layer(layer).unwrap();
    assert!(entry::install_registry(Arc::new(registry)).is_none());

    assert_eq!(
        query(&mut count),
        (vk::Result::SUCCESS, vk::Result::ERROR_FORMAT_NOT_SUPPORTED),
    );
    assert_eq!(count, 1);

    assert!(entry::clear_registry().is_some());
    assert_eq!(query(&mut count).0, vk::Result::ERROR_LAYER_NOT_PRESENT);
}
