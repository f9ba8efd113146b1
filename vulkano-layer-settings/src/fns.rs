// Copyright (c) 2021 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

use crate::ffi;
use std::{
    ffi::{c_void, CStr},
    fmt::{Debug, Error as FmtError, Formatter},
    mem::transmute,
};

macro_rules! fns {
    ($struct_name:ident, { $($member:ident => $name:ident: $pfn:ident,)+ }) => {
        /// Raw Vulkan function pointers, `None` if the implementation doesn't provide them.
        #[derive(Clone, Copy)]
        pub struct $struct_name {
            $(
                pub $member: Option<ffi::$pfn>,
            )+
        }

        impl $struct_name {
            pub fn load<F>(mut load_fn: F) -> $struct_name
            where
                F: FnMut(&CStr) -> *const c_void,
            {
                $struct_name {
                    $(
                        $member: {
                            let ptr = load_fn(ffi::$name);

                            if ptr.is_null() {
                                None
                            } else {
                                Some(unsafe { transmute::<*const c_void, ffi::$pfn>(ptr) })
                            }
                        },
                    )+
                }
            }
        }

        impl Debug for $struct_name {
            fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
                f.debug_struct(stringify!($struct_name))
                    $(
                        .field(stringify!($member), &self.$member.map(|func| func as *const c_void))
                    )+
                    .finish()
            }
        }
    };
}

fns!(LayerSettingsFunctions, {
    enumerate_instance_layer_settings =>
        ENUMERATE_INSTANCE_LAYER_SETTINGS_EXT_NAME: PFN_vkEnumerateInstanceLayerSettingsEXT,
    enumerate_instance_layer_setting_info =>
        ENUMERATE_INSTANCE_LAYER_SETTING_INFO_EXT_NAME: PFN_vkEnumerateInstanceLayerSettingInfoEXT,
});

#[cfg(test)]
mod tests {
    use super::LayerSettingsFunctions;
    use crate::{entry, ffi};
    use std::ptr;

    #[test]
    fn load_missing() {
        let fns = LayerSettingsFunctions::load(|_| ptr::null());
        assert!(fns.enumerate_instance_layer_settings.is_none());
        assert!(fns.enumerate_instance_layer_setting_info.is_none());
    }

    #[test]
    fn load_by_name() {
        let mut names = Vec::new();
        let fns = LayerSettingsFunctions::load(|name| {
            names.push(name.to_owned());
            entry::get_proc_addr(name).map_or(ptr::null(), |func| func as _)
        });

        assert!(fns.enumerate_instance_layer_settings.is_some());
        assert!(fns.enumerate_instance_layer_setting_info.is_some());
        assert_eq!(
            names,
            [
                ffi::ENUMERATE_INSTANCE_LAYER_SETTINGS_EXT_NAME.to_owned(),
                ffi::ENUMERATE_INSTANCE_LAYER_SETTING_INFO_EXT_NAME.to_owned(),
            ],
        );
    }
}
