// Copyright (c) 2021 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! The query entry points of `VK_EXT_layer_settings`, for use inside a layer.
//!
//! A layer describes its settings with a [`LayerSettingsRegistry`], installs it once with
//! [`install_registry`], and then hands out the two functions of this module when the loader
//! asks for them. The simplest way to do that is to call [`get_proc_addr`] at the start of the
//! layer's own `vkGetInstanceProcAddr`:
//!
//! ```
//! use ash::vk;
//! use std::ffi::{c_char, CStr};
//! use vulkano_layer_settings::entry;
//!
//! unsafe extern "system" fn layer_get_instance_proc_addr(
//!     _instance: vk::Instance,
//!     p_name: *const c_char,
//! ) -> vk::PFN_vkVoidFunction {
//!     let name = unsafe { CStr::from_ptr(p_name) };
//!
//!     if let Some(func) = entry::get_proc_addr(name) {
//!         return Some(func);
//!     }
//!
//!     // Dispatch the other commands down the chain.
//!     None
//! }
//! ```
//!
//! With the `export-entry-points` cargo feature, the two functions are also exported from the
//! library under their Vulkan names.

use crate::{ffi, LayerSettingsRegistry};
use ash::vk;
use parking_lot::RwLock;
use std::{
    ffi::{c_char, c_void, CStr},
    mem::transmute,
    sync::Arc,
};

static REGISTRY: RwLock<Option<Arc<LayerSettingsRegistry>>> = RwLock::new(None);

/// Installs the registry that the entry points of this module answer from, and returns the
/// previously installed one.
pub fn install_registry(registry: Arc<LayerSettingsRegistry>) -> Option<Arc<LayerSettingsRegistry>> {
    log::debug!(
        "installing layer settings registry with {} layer(s)",
        registry.layers().len(),
    );

    REGISTRY.write().replace(registry)
}

/// Removes the installed registry. The entry points then report every layer as not present.
pub fn clear_registry() -> Option<Arc<LayerSettingsRegistry>> {
    let previous = REGISTRY.write().take();

    if previous.is_some() {
        log::debug!("cleared layer settings registry");
    }

    previous
}

/// Returns the installed registry.
#[inline]
pub fn installed_registry() -> Option<Arc<LayerSettingsRegistry>> {
    REGISTRY.read().clone()
}

/// `vkEnumerateInstanceLayerSettingsEXT`, answered from the installed registry.
///
/// # Safety
///
/// See [`LayerSettingsRegistry::enumerate_settings`].
#[cfg_attr(
    feature = "export-entry-points",
    unsafe(export_name = "vkEnumerateInstanceLayerSettingsEXT")
)]
pub unsafe extern "system" fn enumerate_instance_layer_settings(
    p_layer_name: *const c_char,
    p_setting_count: *mut u32,
    p_settings: *mut ffi::LayerSettingDescriptionEXT<'_>,
) -> vk::Result {
    match REGISTRY.read().as_deref() {
        Some(registry) => unsafe {
            registry.enumerate_settings(p_layer_name, p_setting_count, p_settings)
        },
        None => vk::Result::ERROR_LAYER_NOT_PRESENT,
    }
}

/// `vkEnumerateInstanceLayerSettingInfoEXT`, answered from the installed registry.
///
/// # Safety
///
/// See [`LayerSettingsRegistry::enumerate_setting_options`].
#[cfg_attr(
    feature = "export-entry-points",
    unsafe(export_name = "vkEnumerateInstanceLayerSettingInfoEXT")
)]
pub unsafe extern "system" fn enumerate_instance_layer_setting_info(
    p_layer_name: *const c_char,
    p_setting_name: *const c_char,
    p_setting_info_count: *mut u32,
    p_setting_options: *mut ffi::LayerSettingOptionEXT<'_>,
) -> vk::Result {
    match REGISTRY.read().as_deref() {
        Some(registry) => unsafe {
            registry.enumerate_setting_options(
                p_layer_name,
                p_setting_name,
                p_setting_info_count,
                p_setting_options,
            )
        },
        None => vk::Result::ERROR_LAYER_NOT_PRESENT,
    }
}

/// Returns the entry point of this module with the given Vulkan name.
pub fn get_proc_addr(name: &CStr) -> vk::PFN_vkVoidFunction {
    let func = if name == ffi::ENUMERATE_INSTANCE_LAYER_SETTINGS_EXT_NAME {
        enumerate_instance_layer_settings as ffi::PFN_vkEnumerateInstanceLayerSettingsEXT
            as *const c_void
    } else if name == ffi::ENUMERATE_INSTANCE_LAYER_SETTING_INFO_EXT_NAME {
        enumerate_instance_layer_setting_info as ffi::PFN_vkEnumerateInstanceLayerSettingInfoEXT
            as *const c_void
    } else {
        return None;
    };

    Some(unsafe { transmute::<*const c_void, unsafe extern "system" fn()>(func) })
}
