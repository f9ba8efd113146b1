// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Layer settings for Vulkan layers, as defined by the `VK_EXT_layer_settings` instance
//! extension.
//!
//! The extension lets a layer describe the settings it understands (their name, type, default
//! value and, for some of them, a closed list of options), and lets an application or a tool
//! enumerate those settings and pass values for them when creating an instance.
//!
//! # Brief summary
//!
//! - The [`ffi`] module contains the raw C structures, bit-compatible with the extension's
//!   header. You only need them when talking to a Vulkan implementation directly.
//!
//! - On the layer side, a [`LayerSettingsRegistry`] describes the settings of one or more layers.
//!   It can be built by hand, or from the `settings` section of layer manifests with
//!   [`LayerSettingsRegistry::add_manifest`]. Once installed with [`entry::install_registry`],
//!   it answers the two query entry points of the extension found in the [`entry`] module.
//!
//! - On the application side, a [`LayerSettingsLibrary`] loads the two query entry points from a
//!   Vulkan library and returns the results as [`LayerSettingDescription`]s and
//!   [`LayerSettingOption`]s.
//!
//! - Values are passed to layers at instance creation with an [`InstanceLayerSettings`], which is
//!   appended to the `p_next` chain of `VkInstanceCreateInfo`. A layer reads them back with
//!   [`find_instance_layer_settings`] and [`read_instance_layer_settings`], and combines them with
//!   the user's [`LayerSettingsConfig`] through [`LayerSettingsRegistry::resolve`].

pub use config::{layer_prefix, ConfigError, ConfigSource, LayerSettingsConfig};
pub use description::{LayerSettingDescription, LayerSettingOption};
pub use instance::{find_instance_layer_settings, read_instance_layer_settings, InstanceLayerSettings};
pub use library::{DynamicLibraryLoader, LayerSettingsLibrary, Loader, LoadingError};
pub use manifest::ManifestError;
pub use registry::{LayerSettingsError, LayerSettingsInfo, LayerSettingsRegistry};
use std::{
    borrow::Cow,
    error::Error,
    fmt::{Debug, Display, Error as FmtError, Formatter},
};
pub use value::{LayerSetting, LayerSettingValue, LayerSettingValueType, ParseValueError};
pub use version::Version;

#[macro_use]
mod tests;
mod macros;
pub mod config;
mod description;
pub mod entry;
pub mod ffi;
pub mod fns;
mod instance;
pub mod library;
mod manifest;
pub mod registry;
mod value;
mod version;

/// An enumeration of runtime errors that can be returned by Vulkan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum VulkanError {
    OutOfHostMemory,
    OutOfDeviceMemory,
    InitializationFailed,
    LayerNotPresent,
    ExtensionNotPresent,
    FeatureNotPresent,
    IncompatibleDriver,
    FormatNotSupported,
    Unknown,
    Unnamed(ash::vk::Result),
}

impl From<ash::vk::Result> for VulkanError {
    fn from(val: ash::vk::Result) -> VulkanError {
        match val {
            ash::vk::Result::ERROR_OUT_OF_HOST_MEMORY => Self::OutOfHostMemory,
            ash::vk::Result::ERROR_OUT_OF_DEVICE_MEMORY => Self::OutOfDeviceMemory,
            ash::vk::Result::ERROR_INITIALIZATION_FAILED => Self::InitializationFailed,
            ash::vk::Result::ERROR_LAYER_NOT_PRESENT => Self::LayerNotPresent,
            ash::vk::Result::ERROR_EXTENSION_NOT_PRESENT => Self::ExtensionNotPresent,
            ash::vk::Result::ERROR_FEATURE_NOT_PRESENT => Self::FeatureNotPresent,
            ash::vk::Result::ERROR_INCOMPATIBLE_DRIVER => Self::IncompatibleDriver,
            ash::vk::Result::ERROR_FORMAT_NOT_SUPPORTED => Self::FormatNotSupported,
            ash::vk::Result::ERROR_UNKNOWN => Self::Unknown,
            x => Self::Unnamed(x),
        }
    }
}

impl Error for VulkanError {}

impl Display for VulkanError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match self {
            VulkanError::OutOfHostMemory => write!(f, "A host memory allocation has failed."),
            VulkanError::OutOfDeviceMemory => write!(f, "A device memory allocation has failed."),
            VulkanError::InitializationFailed => write!(
                f,
                "Initialization of an object could not be completed for implementation-specific \
                reasons.",
            ),
            VulkanError::LayerNotPresent => write!(
                f,
                "A requested layer is not present or could not be loaded.",
            ),
            VulkanError::ExtensionNotPresent => {
                write!(f, "A requested extension is not supported.")
            }
            VulkanError::FeatureNotPresent => write!(
                f,
                "A requested feature is not supported. For layer settings, the setting is not \
                declared by the layer.",
            ),
            VulkanError::IncompatibleDriver => write!(
                f,
                "The requested version of Vulkan is not supported by the driver or is otherwise \
                incompatible for implementation-specific reasons.",
            ),
            VulkanError::FormatNotSupported => write!(
                f,
                "A requested format is not supported. For layer settings, the setting does not \
                have a list of options.",
            ),
            VulkanError::Unknown => write!(
                f,
                "An unknown error has occurred; either the application has provided invalid \
                input, or an implementation failure has occurred.",
            ),
            VulkanError::Unnamed(result) => {
                write!(f, "Unnamed error, VkResult value {}", result.as_raw())
            }
        }
    }
}

/// A wrapper for error types of functions that can return validation errors.
#[derive(Clone)]
pub enum Validated<E> {
    /// A non-validation error occurred.
    Error(E),

    /// A validation error occurred.
    ValidationError(Box<ValidationError>),
}

impl<E> Validated<E> {
    /// Maps the inner `Error` value using the provided function, or does nothing if the value is
    /// `ValidationError`.
    #[inline]
    pub fn map<F>(self, f: impl FnOnce(E) -> F) -> Validated<F> {
        match self {
            Self::Error(err) => Validated::Error(f(err)),
            Self::ValidationError(err) => Validated::ValidationError(err),
        }
    }

    #[inline]
    fn map_validation(self, f: impl FnOnce(Box<ValidationError>) -> Box<ValidationError>) -> Self {
        match self {
            Self::Error(err) => Self::Error(err),
            Self::ValidationError(err) => Self::ValidationError(f(err)),
        }
    }

    /// Returns the inner `Error` value, or panics if it contains `ValidationError`.
    #[inline(always)]
    #[track_caller]
    pub fn unwrap(self) -> E {
        match self {
            Self::Error(err) => err,
            Self::ValidationError(err) => {
                panic!(
                    "called `Validated::unwrap` on a `ValidationError` value: {:?}",
                    err
                )
            }
        }
    }
}

impl<E> Error for Validated<E>
where
    E: Error + 'static,
{
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Error(err) => Some(err),
            Self::ValidationError(err) => Some(err),
        }
    }
}

impl<E> Display for Validated<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match self {
            Self::Error(_) => write!(f, "a non-validation error occurred"),
            Self::ValidationError(_) => write!(f, "a validation error occurred"),
        }
    }
}

impl<E> Debug for Validated<E>
where
    E: Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match self {
            Self::Error(err) => write!(f, "a non-validation error occurred: {}", err),
            Self::ValidationError(err) => {
                write!(f, "a validation error occurred\n\nCaused by:\n    {:?}", err)
            }
        }
    }
}

impl<E> From<Box<ValidationError>> for Validated<E> {
    fn from(err: Box<ValidationError>) -> Self {
        Self::ValidationError(err)
    }
}

impl From<VulkanError> for Validated<VulkanError> {
    fn from(err: VulkanError) -> Self {
        Self::Error(err)
    }
}

/// The arguments or other context of a call to a function were not valid.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ValidationError {
    /// The context in which the problem exists (e.g. a specific parameter).
    pub context: Cow<'static, str>,

    /// A description of the problem.
    pub problem: Cow<'static, str>,
}

impl ValidationError {
    pub(crate) fn new(
        context: impl Into<Cow<'static, str>>,
        problem: impl Into<Cow<'static, str>>,
    ) -> Box<Self> {
        Box::new(ValidationError {
            context: context.into(),
            problem: problem.into(),
        })
    }

    pub(crate) fn add_context(mut self: Box<Self>, context: impl Into<Cow<'static, str>>) -> Box<Self> {
        if self.context.is_empty() {
            self.context = context.into();
        } else {
            self.context = format!("{}.{}", context.into(), self.context).into();
        }

        self
    }
}

impl Debug for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        if self.context.is_empty() {
            write!(f, "{}", self.problem)
        } else {
            write!(f, "{}: {}", self.context, self.problem)
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        Debug::fmt(self, f)
    }
}

impl Error for ValidationError {}

/// A helper type for non-exhaustive structs.
///
/// This type cannot be constructed outside this crate. Structures with a field of this type can
/// only be constructed by calling a constructor function or `Default::default()`. The effect is
/// similar to the standard Rust `#[non_exhaustive]` attribute, except that it does not prevent
/// update syntax from being used.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NonExhaustive(pub(crate) ());
