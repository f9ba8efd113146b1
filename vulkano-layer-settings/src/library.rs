// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Querying layer settings from a Vulkan library.
//!
//! The two commands of `VK_EXT_layer_settings` are global commands: they are loaded with
//! `vkGetInstanceProcAddr` and a null instance, before any instance exists. A Vulkan
//! implementation is accessed through the [`Loader`] trait, usually with a
//! [`DynamicLibraryLoader`] that opens the system's Vulkan loader.
//!
//! A [`LayerSettingsLibrary`] wraps a loader, loads the two commands from it, and exposes them as
//! safe methods returning owned descriptions.

pub use crate::fns::LayerSettingsFunctions;
use crate::{
    LayerSettingDescription, LayerSettingOption, Validated, ValidationError, VulkanError,
};
use ash::vk;
use libloading::{Error as LibloadingError, Library};
use std::{
    error::Error,
    ffi::{c_char, CString},
    fmt::{Debug, Display, Error as FmtError, Formatter},
    path::Path,
    ptr,
    sync::Arc,
};

/// A Vulkan library, with the layer settings commands loaded from it.
#[derive(Debug)]
pub struct LayerSettingsLibrary {
    loader: Box<dyn Loader>,
    fns: LayerSettingsFunctions,
}

impl LayerSettingsLibrary {
    /// Loads the default Vulkan library for this system.
    pub fn new() -> Result<Arc<Self>, LoadingError> {
        #[cfg(windows)]
        const PATHS: [&str; 1] = ["vulkan-1.dll"];
        #[cfg(all(unix, not(target_os = "android"), not(target_os = "macos")))]
        const PATHS: [&str; 1] = ["libvulkan.so.1"];
        #[cfg(target_os = "macos")]
        const PATHS: [&str; 3] = [
            "libvulkan.dylib",
            "libvulkan.1.dylib",
            "/usr/local/lib/libvulkan.dylib",
        ];
        #[cfg(target_os = "android")]
        const PATHS: [&str; 2] = ["libvulkan.so.1", "libvulkan.so"];

        let mut err = None;

        for path in PATHS {
            match unsafe { DynamicLibraryLoader::new(path) } {
                Ok(loader) => return Ok(Self::with_loader(loader)),
                Err(e) => {
                    log::debug!("failed to load {}: {}", path, e);
                    err = Some(e);
                }
            }
        }

        Err(err.unwrap_or(LoadingError::VulkanError(VulkanError::InitializationFailed)))
    }

    /// Uses a custom Vulkan library.
    pub fn with_loader(loader: impl Loader + 'static) -> Arc<Self> {
        let fns = LayerSettingsFunctions::load(|name| {
            unsafe { loader.get_instance_proc_addr(vk::Instance::null(), name.as_ptr()) }
                .map_or(ptr::null(), |func| func as _)
        });

        if fns.enumerate_instance_layer_settings.is_none() {
            log::debug!("the Vulkan library does not expose `vkEnumerateInstanceLayerSettingsEXT`");
        }

        Arc::new(LayerSettingsLibrary {
            loader: Box::new(loader),
            fns,
        })
    }

    /// Returns pointers to the raw layer settings commands of the library.
    #[inline]
    pub fn fns(&self) -> &LayerSettingsFunctions {
        &self.fns
    }

    /// Returns whether the library exposes both layer settings commands.
    #[inline]
    pub fn is_supported(&self) -> bool {
        self.fns.enumerate_instance_layer_settings.is_some()
            && self.fns.enumerate_instance_layer_setting_info.is_some()
    }

    /// Returns the settings of the layer named `layer_name`, with their options.
    pub fn layer_settings(
        &self,
        layer_name: &str,
    ) -> Result<Vec<LayerSettingDescription>, Validated<VulkanError>> {
        let layer_name_vk = CString::new(layer_name)
            .map_err(|_| ValidationError::new("layer_name", "contains a nul byte"))?;
        let func = self
            .fns
            .enumerate_instance_layer_settings
            .ok_or(VulkanError::ExtensionNotPresent)?;

        let raw = unsafe {
            enumerate(|count, output| func(layer_name_vk.as_ptr(), count, output))
        }?;

        let mut settings = Vec::with_capacity(raw.len());

        for (index, raw) in raw.iter().enumerate() {
            let mut setting = LayerSettingDescription::from_raw(raw)
                .map_err(|err| err.add_context(format!("p_settings[{}]", index)))?;

            setting.options = match self.layer_setting_options(layer_name, &setting.name) {
                Ok(options) => options,
                Err(Validated::Error(VulkanError::FormatNotSupported)) => Vec::new(),
                Err(err) => {
                    return Err(err.map_validation(|err| {
                        err.add_context(format!("p_settings[{}]", index))
                    }))
                }
            };

            settings.push(setting);
        }

        Ok(settings)
    }

    /// Returns the options of the setting named `setting_name` of the layer named `layer_name`.
    ///
    /// Returns [`VulkanError::FeatureNotPresent`] if the layer has no such setting, and
    /// [`VulkanError::FormatNotSupported`] if the setting doesn't have a list of options.
    pub fn layer_setting_options(
        &self,
        layer_name: &str,
        setting_name: &str,
    ) -> Result<Vec<LayerSettingOption>, Validated<VulkanError>> {
        let layer_name_vk = CString::new(layer_name)
            .map_err(|_| ValidationError::new("layer_name", "contains a nul byte"))?;
        let setting_name_vk = CString::new(setting_name)
            .map_err(|_| ValidationError::new("setting_name", "contains a nul byte"))?;
        let func = self
            .fns
            .enumerate_instance_layer_setting_info
            .ok_or(VulkanError::ExtensionNotPresent)?;

        let raw = unsafe {
            enumerate(|count, output| {
                func(
                    layer_name_vk.as_ptr(),
                    setting_name_vk.as_ptr(),
                    count,
                    output,
                )
            })
        }?;

        let options = raw
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                LayerSettingOption::from_raw(raw)
                    .map_err(|err| err.add_context(format!("p_setting_options[{}]", index)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(options)
    }

    /// Calls `get_instance_proc_addr` on the underlying loader.
    #[inline]
    pub unsafe fn get_instance_proc_addr(
        &self,
        instance: vk::Instance,
        name: *const c_char,
    ) -> vk::PFN_vkVoidFunction {
        unsafe { self.loader.get_instance_proc_addr(instance, name) }
    }
}

/// Runs a two-call enumeration to completion, starting over whenever the count changed between
/// the two calls.
unsafe fn enumerate<T>(
    mut call: impl FnMut(*mut u32, *mut T) -> vk::Result,
) -> Result<Vec<T>, VulkanError> {
    loop {
        let mut count = 0;
        call(&mut count, ptr::null_mut())
            .result()
            .map_err(VulkanError::from)?;

        let mut output = Vec::with_capacity(count as usize);
        let result = call(&mut count, output.as_mut_ptr());

        match result {
            vk::Result::SUCCESS => {
                unsafe { output.set_len(count as usize) };
                return Ok(output);
            }
            vk::Result::INCOMPLETE => {
                log::trace!("layer settings enumeration was incomplete, retrying");
            }
            err => return Err(VulkanError::from(err)),
        }
    }
}

/// Implemented on objects that grant access to a Vulkan implementation.
pub unsafe trait Loader: Send + Sync {
    /// Calls the `vkGetInstanceProcAddr` function. The parameters are the same.
    ///
    /// The returned function must stay valid for as long as `self` is alive.
    unsafe fn get_instance_proc_addr(
        &self,
        instance: vk::Instance,
        name: *const c_char,
    ) -> vk::PFN_vkVoidFunction;
}

unsafe impl<T> Loader for Arc<T>
where
    T: Loader + ?Sized,
{
    unsafe fn get_instance_proc_addr(
        &self,
        instance: vk::Instance,
        name: *const c_char,
    ) -> vk::PFN_vkVoidFunction {
        unsafe { (**self).get_instance_proc_addr(instance, name) }
    }
}

impl Debug for dyn Loader {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        f.debug_struct("Loader").finish_non_exhaustive()
    }
}

/// Implementation of `Loader` that loads Vulkan from a dynamic library.
pub struct DynamicLibraryLoader {
    _vk_lib: Library,
    get_instance_proc_addr: vk::PFN_vkGetInstanceProcAddr,
}

impl DynamicLibraryLoader {
    /// Tries to load the dynamic library at the given path, and tries to
    /// load `vkGetInstanceProcAddr` in it.
    ///
    /// # Safety
    ///
    /// - The dynamic library must be a valid Vulkan implementation.
    pub unsafe fn new(path: impl AsRef<Path>) -> Result<DynamicLibraryLoader, LoadingError> {
        let vk_lib =
            unsafe { Library::new(path.as_ref()) }.map_err(LoadingError::LibraryLoadFailure)?;

        let get_instance_proc_addr = *unsafe { vk_lib.get(b"vkGetInstanceProcAddr") }
            .map_err(LoadingError::LibraryLoadFailure)?;

        log::debug!("loaded Vulkan library {}", path.as_ref().display());

        Ok(DynamicLibraryLoader {
            _vk_lib: vk_lib,
            get_instance_proc_addr,
        })
    }
}

unsafe impl Loader for DynamicLibraryLoader {
    #[inline]
    unsafe fn get_instance_proc_addr(
        &self,
        instance: vk::Instance,
        name: *const c_char,
    ) -> vk::PFN_vkVoidFunction {
        unsafe { (self.get_instance_proc_addr)(instance, name) }
    }
}

/// Error that can happen when loading a Vulkan library.
#[derive(Debug)]
pub enum LoadingError {
    /// Failed to load the Vulkan shared library.
    LibraryLoadFailure(LibloadingError),

    /// The Vulkan driver returned an error and was unable to complete the operation.
    VulkanError(VulkanError),
}

impl Error for LoadingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::LibraryLoadFailure(err) => Some(err),
            Self::VulkanError(err) => Some(err),
        }
    }
}

impl Display for LoadingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match self {
            Self::LibraryLoadFailure(_) => write!(f, "failed to load the Vulkan shared library"),
            Self::VulkanError(err) => write!(f, "a runtime error occurred: {err}"),
        }
    }
}

impl From<VulkanError> for LoadingError {
    fn from(err: VulkanError) -> Self {
        Self::VulkanError(err)
    }
}

#[cfg(test)]
mod tests {
    use super::{DynamicLibraryLoader, LayerSettingsLibrary, Loader, LoadingError};
    use crate::{entry, ffi, LayerSettingValueType, Validated, VulkanError};
    use ash::vk;
    use std::{
        cell::Cell,
        ffi::{c_char, c_void, CStr},
        mem::transmute,
    };

    /// Dispatches to the entry points of this crate, like a loader with one layer enabled.
    struct LayerLoader;

    unsafe impl Loader for LayerLoader {
        unsafe fn get_instance_proc_addr(
            &self,
            _instance: vk::Instance,
            name: *const c_char,
        ) -> vk::PFN_vkVoidFunction {
            entry::get_proc_addr(unsafe { CStr::from_ptr(name) })
        }
    }

    /// A Vulkan implementation without the extension.
    struct EmptyLoader;

    unsafe impl Loader for EmptyLoader {
        unsafe fn get_instance_proc_addr(
            &self,
            _instance: vk::Instance,
            _name: *const c_char,
        ) -> vk::PFN_vkVoidFunction {
            None
        }
    }

    #[test]
    fn dl_open_error() {
        match unsafe { DynamicLibraryLoader::new("_non_existing_library.void") } {
            Err(LoadingError::LibraryLoadFailure(_)) => (),
            _ => panic!(),
        }
    }

    #[test]
    fn settings_with_options() {
        install_test_registry!();
        let library = LayerSettingsLibrary::with_loader(LayerLoader);
        assert!(library.is_supported());

        let settings = library
            .layer_settings("VK_LAYER_KHRONOS_validation")
            .unwrap();
        assert_eq!(settings, test_registry!().settings("VK_LAYER_KHRONOS_validation").unwrap());

        let debug_action = &settings[0];
        assert_eq!(debug_action.value_type, LayerSettingValueType::String);
        assert_eq!(debug_action.default_value, "VK_DBG_LAYER_ACTION_LOG_MSG");
        assert_eq!(debug_action.options.len(), 3);
        assert!(settings[2].options.is_empty());
    }

    #[test]
    fn option_errors() {
        install_test_registry!();
        let library = LayerSettingsLibrary::with_loader(LayerLoader);

        assert!(matches!(
            library.layer_settings("VK_LAYER_missing"),
            Err(Validated::Error(VulkanError::LayerNotPresent)),
        ));
        assert!(matches!(
            library.layer_setting_options("VK_LAYER_KHRONOS_validation", "report_flags"),
            Err(Validated::Error(VulkanError::FeatureNotPresent)),
        ));
        assert!(matches!(
            library.layer_setting_options("VK_LAYER_KHRONOS_validation", "log_filename"),
            Err(Validated::Error(VulkanError::FormatNotSupported)),
        ));
        assert!(matches!(
            library.layer_setting_options("VK_LAYER_KHRONOS\0validation", "debug_action"),
            Err(Validated::ValidationError(_)),
        ));
    }

    #[test]
    fn extension_not_present() {
        let library = LayerSettingsLibrary::with_loader(EmptyLoader);
        assert!(!library.is_supported());
        assert!(matches!(
            library.layer_settings("VK_LAYER_KHRONOS_validation"),
            Err(Validated::Error(VulkanError::ExtensionNotPresent)),
        ));
    }

    thread_local! {
        static CALLS: Cell<u32> = const { Cell::new(0) };
    }

    /// Reports one setting less on its first call, as if the layer gained a setting between the
    /// two calls.
    unsafe extern "system" fn growing_settings(
        p_layer_name: *const c_char,
        p_setting_count: *mut u32,
        p_settings: *mut ffi::LayerSettingDescriptionEXT<'_>,
    ) -> vk::Result {
        let calls = CALLS.get();
        CALLS.set(calls + 1);

        if calls == 0 {
            unsafe { p_setting_count.write(3) };
            return vk::Result::SUCCESS;
        }

        unsafe { test_registry!().enumerate_settings(p_layer_name, p_setting_count, p_settings) }
    }

    struct GrowingLoader;

    unsafe impl Loader for GrowingLoader {
        unsafe fn get_instance_proc_addr(
            &self,
            _instance: vk::Instance,
            name: *const c_char,
        ) -> vk::PFN_vkVoidFunction {
            let name = unsafe { CStr::from_ptr(name) };

            if name == ffi::ENUMERATE_INSTANCE_LAYER_SETTINGS_EXT_NAME {
                let func = growing_settings as ffi::PFN_vkEnumerateInstanceLayerSettingsEXT;
                Some(unsafe { transmute::<*const c_void, unsafe extern "system" fn()>(func as _) })
            } else {
                entry::get_proc_addr(name)
            }
        }
    }

    #[test]
    fn retries_incomplete() {
        install_test_registry!();
        CALLS.set(0);

        let library = LayerSettingsLibrary::with_loader(GrowingLoader);
        let settings = library
            .layer_settings("VK_LAYER_KHRONOS_validation")
            .unwrap();

        assert_eq!(settings.len(), 4);
        assert_eq!(CALLS.get(), 4);
    }
}
