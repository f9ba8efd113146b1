// Copyright (c) 2022 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

/// Declares a Rust enum mirroring one of the raw enums of the [`ffi`](crate::ffi) module.
macro_rules! vulkan_enum {
    {
        $(#[doc = $ty_doc:literal])*
        $ty:ident
        $( impl { $($impls:item)* } )?
        = $ty_ffi:ident($repr:ty);

        $(
            $(#[doc = $variant_doc:literal])*
            $variant_name:ident = $variant_name_ffi:ident,
        )+
    } => {
        $(#[doc = $ty_doc])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        #[repr($repr)]
        pub enum $ty {
            $(
                $(#[doc = $variant_doc])*
                $variant_name = $crate::ffi::$ty_ffi::$variant_name_ffi.as_raw(),
            )+
        }

        impl $ty {
            #[allow(dead_code)]
            pub(crate) const COUNT: usize = [
                $($crate::ffi::$ty_ffi::$variant_name_ffi.as_raw()),+
            ].len();

            /// Returns every value of the enum, in declaration order.
            #[inline]
            pub const fn all() -> [Self; Self::COUNT] {
                [$(Self::$variant_name),+]
            }

            $(
                $($impls)*
            )?
        }

        impl From<$ty> for $crate::ffi::$ty_ffi {
            #[inline]
            fn from(val: $ty) -> Self {
                $crate::ffi::$ty_ffi::from_raw(val as $repr)
            }
        }

        impl TryFrom<$crate::ffi::$ty_ffi> for $ty {
            type Error = ();

            #[inline]
            fn try_from(val: $crate::ffi::$ty_ffi) -> Result<Self, Self::Error> {
                Ok(match val {
                    $(
                        $crate::ffi::$ty_ffi::$variant_name_ffi => Self::$variant_name,
                    )+
                    _ => return Err(()),
                })
            }
        }
    };
}

pub(crate) use vulkan_enum;
