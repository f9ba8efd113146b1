// Copyright (c) 2021 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

use crate::{
    ffi,
    value::{string_from_array, validate_name, validate_string},
    LayerSettingValue, LayerSettingValueType, NonExhaustive, ValidationError,
};
use smallvec::SmallVec;

/// Describes one setting exposed by a layer.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerSettingDescription {
    /// The name of the setting, without any layer prefix.
    pub name: String,

    /// The type of the values of the setting.
    pub value_type: LayerSettingValueType,

    /// A human-readable description of the setting.
    ///
    /// The default value is empty.
    pub description: String,

    /// The default value of the setting, in the form accepted by [`LayerSettingValue::parse`].
    ///
    /// The default value is the zero value of `value_type`: `0`, `0.0`, `false` or an empty
    /// string.
    pub default_value: String,

    /// The values that the setting is allowed to take. If empty, the setting is not
    /// enumerable and takes any value of its type.
    ///
    /// Only settings of type [`LayerSettingValueType::String`] can have options. Their values
    /// are a comma-separated list of option names.
    ///
    /// The default value is empty.
    pub options: Vec<LayerSettingOption>,

    pub _ne: NonExhaustive,
}

impl LayerSettingDescription {
    /// Returns a `LayerSettingDescription` with the specified `name` and `value_type`.
    #[inline]
    pub fn new(name: impl Into<String>, value_type: LayerSettingValueType) -> Self {
        let default_value = match value_type {
            LayerSettingValueType::Uint32 | LayerSettingValueType::Uint64 => "0",
            LayerSettingValueType::Float => "0.0",
            LayerSettingValueType::Bool => "false",
            LayerSettingValueType::String => "",
        };

        LayerSettingDescription {
            name: name.into(),
            value_type,
            description: String::new(),
            default_value: default_value.to_owned(),
            options: Vec::new(),
            _ne: NonExhaustive(()),
        }
    }

    /// Returns whether the setting has a list of allowed options.
    #[inline]
    pub fn is_enumerable(&self) -> bool {
        !self.options.is_empty()
    }

    /// Returns the option with the given name.
    #[inline]
    pub fn option(&self, name: &str) -> Option<&LayerSettingOption> {
        self.options.iter().find(|option| option.name == name)
    }

    /// Parses the default value of the setting.
    pub fn parsed_default(&self) -> Option<LayerSettingValue> {
        LayerSettingValue::parse(self.value_type, &self.default_value).ok()
    }

    /// Returns whether `value` is a valid value for this setting: it has the right type, and if
    /// the setting is enumerable, it has at least one comma-separated element and every element
    /// names an option.
    pub fn accepts(&self, value: &LayerSettingValue) -> bool {
        if value.value_type() != self.value_type {
            return false;
        }

        match value {
            LayerSettingValue::String(value) if self.is_enumerable() => {
                let mut elements = split_list(value).peekable();
                elements.peek().is_some() && elements.all(|element| self.option(element).is_some())
            }
            _ => true,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), Box<ValidationError>> {
        let &Self {
            ref name,
            value_type,
            ref description,
            ref default_value,
            ref options,
            _ne: _,
        } = self;

        validate_name(name, ffi::MAX_EXTENSION_NAME_SIZE).map_err(|err| err.add_context("name"))?;
        validate_string(description, ffi::MAX_DESCRIPTION_SIZE)
            .map_err(|err| err.add_context("description"))?;
        validate_string(default_value, ffi::MAX_DESCRIPTION_SIZE)
            .map_err(|err| err.add_context("default_value"))?;

        let default = LayerSettingValue::parse(value_type, default_value).map_err(|err| {
            ValidationError::new("default_value", err.to_string())
        })?;

        if !options.is_empty() {
            if value_type != LayerSettingValueType::String {
                return Err(ValidationError::new(
                    "options",
                    format!(
                        "is not empty, but `value_type` is `{:?}` instead of `String`",
                        value_type,
                    ),
                ));
            }

            let mut seen: SmallVec<[&str; 16]> = SmallVec::new();

            for (index, option) in options.iter().enumerate() {
                option
                    .validate()
                    .map_err(|err| err.add_context(format!("options[{}]", index)))?;

                if seen.contains(&option.name.as_str()) {
                    return Err(ValidationError::new(
                        format!("options[{}].name", index),
                        "is the name of an earlier option",
                    ));
                }

                seen.push(&option.name);
            }

            if split_list(default_value).next().is_none() {
                return Err(ValidationError::new(
                    "default_value",
                    "is empty, but `options` is not empty",
                ));
            }

            if !self.accepts(&default) {
                return Err(ValidationError::new(
                    "default_value",
                    "contains an element that is not one of `options`",
                ));
            }
        }

        Ok(())
    }

    pub(crate) fn to_raw(&self) -> ffi::LayerSettingDescriptionEXT<'static> {
        let mut raw = ffi::LayerSettingDescriptionEXT {
            ty: self.value_type.into(),
            ..Default::default()
        };
        ffi::copy_str_to_array(&mut raw.setting_name, &self.name);
        ffi::copy_str_to_array(&mut raw.description, &self.description);
        ffi::copy_str_to_array(&mut raw.default_value, &self.default_value);

        raw
    }

    /// Converts a raw description. The result has no options; they are queried separately.
    pub fn from_raw(raw: &ffi::LayerSettingDescriptionEXT<'_>) -> Result<Self, Box<ValidationError>> {
        let value_type = LayerSettingValueType::try_from(raw.ty).map_err(|_| {
            ValidationError::new("ty", "is not a valid `VkLayerSettingValueTypeEXT`")
        })?;

        Ok(LayerSettingDescription {
            name: string_from_array(&raw.setting_name)
                .map_err(|err| err.add_context("setting_name"))?,
            value_type,
            description: string_from_array(&raw.description)
                .map_err(|err| err.add_context("description"))?,
            default_value: string_from_array(&raw.default_value)
                .map_err(|err| err.add_context("default_value"))?,
            options: Vec::new(),
            _ne: NonExhaustive(()),
        })
    }
}

/// One allowed value of an enumerable setting.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerSettingOption {
    /// The name of the option, which is also the string value that selects it.
    pub name: String,

    /// A human-readable description of the option.
    ///
    /// The default value is empty.
    pub description: String,

    pub _ne: NonExhaustive,
}

impl LayerSettingOption {
    /// Returns a `LayerSettingOption` with the specified `name`.
    #[inline]
    pub fn new(name: impl Into<String>) -> Self {
        LayerSettingOption {
            name: name.into(),
            description: String::new(),
            _ne: NonExhaustive(()),
        }
    }

    /// Returns a `LayerSettingOption` with the specified `name` and `description`.
    #[inline]
    pub fn with_description(name: impl Into<String>, description: impl Into<String>) -> Self {
        LayerSettingOption {
            description: description.into(),
            ..Self::new(name)
        }
    }

    pub(crate) fn validate(&self) -> Result<(), Box<ValidationError>> {
        validate_name(&self.name, ffi::MAX_EXTENSION_NAME_SIZE)
            .map_err(|err| err.add_context("name"))?;

        if self.name.contains(',') {
            return Err(ValidationError::new("name", "contains a comma"));
        }

        validate_string(&self.description, ffi::MAX_DESCRIPTION_SIZE)
            .map_err(|err| err.add_context("description"))?;

        Ok(())
    }

    pub(crate) fn to_raw(&self) -> ffi::LayerSettingOptionEXT<'static> {
        let mut raw = ffi::LayerSettingOptionEXT::default();
        ffi::copy_str_to_array(&mut raw.option_name, &self.name);
        ffi::copy_str_to_array(&mut raw.description, &self.description);

        raw
    }

    pub fn from_raw(raw: &ffi::LayerSettingOptionEXT<'_>) -> Result<Self, Box<ValidationError>> {
        Ok(LayerSettingOption {
            name: string_from_array(&raw.option_name)
                .map_err(|err| err.add_context("option_name"))?,
            description: string_from_array(&raw.description)
                .map_err(|err| err.add_context("description"))?,
            _ne: NonExhaustive(()),
        })
    }
}

/// Splits a comma-separated list of option names, ignoring whitespace and empty elements.
pub(crate) fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value
        .split(',')
        .map(str::trim)
        .filter(|element| !element.is_empty())
}
