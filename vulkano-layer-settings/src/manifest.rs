// Copyright (c) 2021 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Reading setting declarations from layer manifests.
//!
//! Layers ship a JSON manifest that the Vulkan loader uses to find them. Newer manifests also
//! describe the settings of the layer under `layer.features.settings`.

use crate::{
    LayerSettingDescription, LayerSettingOption, LayerSettingValueType, LayerSettingsInfo,
    LayerSettingsRegistry, ValidationError, Version,
};
use serde::Deserialize;
use serde_json::Value;
use std::{
    error::Error,
    fmt::{Display, Error as FmtError, Formatter},
    fs, io,
    path::{Path, PathBuf},
};

#[derive(Clone, Debug, Deserialize)]
struct Manifest {
    layer: Option<ManifestLayer>,
    #[serde(default)]
    layers: Vec<ManifestLayer>,
}

#[derive(Clone, Debug, Deserialize)]
struct ManifestLayer {
    name: String,
    api_version: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    features: ManifestFeatures,
}

#[derive(Clone, Debug, Default, Deserialize)]
struct ManifestFeatures {
    #[serde(default)]
    settings: Vec<ManifestSetting>,
}

#[derive(Clone, Debug, Deserialize)]
struct ManifestSetting {
    key: String,
    label: Option<String>,
    description: Option<String>,
    #[serde(rename = "type")]
    ty: String,
    default: Option<Value>,
    #[serde(default)]
    flags: Vec<ManifestFlag>,
    #[serde(default)]
    settings: Vec<ManifestSetting>,
}

#[derive(Clone, Debug, Deserialize)]
struct ManifestFlag {
    key: String,
    label: Option<String>,
    description: Option<String>,
}

impl LayerSettingsInfo {
    /// Parses the settings of the layers declared in a layer manifest.
    ///
    /// Nested settings are listed after their parent, in declaration order.
    pub fn parse_manifest(json: &str) -> Result<Vec<Self>, ManifestError> {
        let manifest: Manifest = serde_json::from_str(json).map_err(ManifestError::Json)?;

        manifest
            .layer
            .into_iter()
            .chain(manifest.layers)
            .map(convert_layer)
            .collect()
    }
}

impl LayerSettingsRegistry {
    /// Adds the layers declared in a layer manifest.
    ///
    /// Nothing is added if any of the layers can't be added.
    pub fn add_manifest(&mut self, json: &str) -> Result<(), ManifestError> {
        let layers = LayerSettingsInfo::parse_manifest(json)?;

        for (index, layer) in layers.iter().enumerate() {
            let duplicate = self.layer(layer.layer_name()).is_some()
                || layers[..index]
                    .iter()
                    .any(|other| other.layer_name() == layer.layer_name());

            if duplicate {
                return Err(ManifestError::DuplicateLayer(layer.layer_name().to_owned()));
            }
        }

        for layer in layers {
            let layer_name = layer.layer_name().to_owned();
            self.add_layer(layer)
                .map_err(|err| ManifestError::Validation { layer_name, err })?;
        }

        Ok(())
    }

    /// Reads the layer manifest at `path` and adds the layers it declares.
    pub fn load_manifest(&mut self, path: impl AsRef<Path>) -> Result<(), ManifestError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|err| ManifestError::Io {
            path: path.to_owned(),
            err,
        })?;

        log::debug!("reading layer settings from manifest {}", path.display());

        self.add_manifest(&json)
    }
}

fn convert_layer(layer: ManifestLayer) -> Result<LayerSettingsInfo, ManifestError> {
    let mut info = LayerSettingsInfo::new(&layer.name).with_description(layer.description);

    if let Some(api_version) = &layer.api_version {
        match api_version.parse::<Version>() {
            Ok(api_version) => info = info.with_api_version(api_version),
            Err(_) => log::warn!(
                "layer {} has an invalid api_version `{}`",
                layer.name,
                api_version,
            ),
        }
    }

    let mut pending: Vec<ManifestSetting> = layer.features.settings;
    pending.reverse();

    while let Some(mut setting) = pending.pop() {
        let children = std::mem::take(&mut setting.settings);
        pending.extend(children.into_iter().rev());

        let key = setting.key.clone();
        let description = convert_setting(&layer.name, setting)?;
        info.add_setting(description)
            .map_err(|err| ManifestError::Validation {
                layer_name: layer.name.clone(),
                err: err.add_context(format!("settings[{}]", key)),
            })?;
    }

    Ok(info)
}

fn convert_setting(
    layer_name: &str,
    setting: ManifestSetting,
) -> Result<LayerSettingDescription, ManifestError> {
    let value_type = match setting.ty.as_str() {
        "BOOL" => LayerSettingValueType::Bool,
        "INT" | "UINT32" => LayerSettingValueType::Uint32,
        "UINT64" => LayerSettingValueType::Uint64,
        "FLOAT" => LayerSettingValueType::Float,
        "STRING" | "ENUM" | "FLAGS" | "LOAD_FILE" | "SAVE_FILE" | "SAVE_FOLDER" | "LIST"
        | "FRAMES" => LayerSettingValueType::String,
        _ => {
            return Err(ManifestError::UnknownSettingType {
                layer_name: layer_name.to_owned(),
                setting_name: setting.key,
                ty: setting.ty,
            })
        }
    };

    let mut description = LayerSettingDescription::new(setting.key, value_type);
    description.description = setting.description.or(setting.label).unwrap_or_default();

    if let Some(default) = setting.default {
        description.default_value =
            default_to_string(&default).ok_or_else(|| ManifestError::InvalidDefault {
                layer_name: layer_name.to_owned(),
                setting_name: description.name.clone(),
                default,
            })?;
    }

    description.options = setting
        .flags
        .into_iter()
        .map(|flag| LayerSettingOption {
            description: flag.description.or(flag.label).unwrap_or_default(),
            ..LayerSettingOption::new(flag.key)
        })
        .collect();

    Ok(description)
}

/// Converts a JSON default value into the textual form of setting values.
fn default_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Bool(value) => Some(value.to_string()),
        Value::Number(value) => Some(value.to_string()),
        Value::String(value) => Some(value.clone()),
        Value::Array(values) => values
            .iter()
            .map(|value| value.as_str())
            .collect::<Option<Vec<_>>>()
            .map(|values| values.join(",")),
        Value::Null | Value::Object(_) => None,
    }
}

/// Error that can happen when reading a layer manifest.
#[derive(Debug)]
pub enum ManifestError {
    /// The manifest couldn't be read.
    Io { path: PathBuf, err: io::Error },

    /// The manifest is not valid JSON, or doesn't have the expected structure.
    Json(serde_json::Error),

    /// A setting has a type that can't be represented.
    UnknownSettingType {
        layer_name: String,
        setting_name: String,
        ty: String,
    },

    /// A setting has a default value that can't be represented.
    InvalidDefault {
        layer_name: String,
        setting_name: String,
        default: Value,
    },

    /// A layer declared in the manifest is already in the registry, or declared twice.
    DuplicateLayer(String),

    /// A setting declaration is invalid.
    Validation {
        layer_name: String,
        err: Box<ValidationError>,
    },
}

impl Error for ManifestError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { err, .. } => Some(err),
            Self::Json(err) => Some(err),
            Self::Validation { err, .. } => Some(err),
            _ => None,
        }
    }
}

impl Display for ManifestError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match self {
            Self::Io { path, .. } => {
                write!(f, "failed to read the layer manifest `{}`", path.display())
            }
            Self::Json(_) => write!(f, "the layer manifest is not valid"),
            Self::UnknownSettingType {
                layer_name,
                setting_name,
                ty,
            } => write!(
                f,
                "setting `{}` of layer `{}` has the unknown type `{}`",
                setting_name, layer_name, ty,
            ),
            Self::InvalidDefault {
                layer_name,
                setting_name,
                default,
            } => write!(
                f,
                "setting `{}` of layer `{}` has the unsupported default value `{}`",
                setting_name, layer_name, default,
            ),
            Self::DuplicateLayer(layer_name) => {
                write!(f, "the layer `{}` is declared more than once", layer_name)
            }
            Self::Validation { layer_name, err } => {
                write!(f, "invalid settings for layer `{}`: {}", layer_name, err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ManifestError;
    use crate::{
        LayerSettingValue, LayerSettingValueType, LayerSettingsConfig, LayerSettingsInfo,
        LayerSettingsRegistry, Version,
    };

    const API_DUMP: &str = r#"{
        "file_format_version": "1.2.0",
        "layer": {
            "name": "VK_LAYER_LUNARG_api_dump",
            "type": "GLOBAL",
            "library_path": "./libVkLayer_api_dump.so",
            "api_version": "1.3.250",
            "implementation_version": "2",
            "description": "LunarG API dump layer",
            "features": {
                "settings": [
                    {
                        "key": "output_format",
                        "label": "Output Format",
                        "description": "Specifies the format used for output",
                        "type": "ENUM",
                        "default": "text",
                        "flags": [
                            { "key": "text", "label": "Text", "description": "Plain text" },
                            { "key": "html", "label": "HTML", "description": "HTML" },
                            { "key": "json", "label": "JSON", "description": "JSON" }
                        ]
                    },
                    {
                        "key": "file",
                        "label": "Output to File",
                        "type": "BOOL",
                        "default": false,
                        "settings": [
                            {
                                "key": "log_filename",
                                "label": "Log Filename",
                                "type": "SAVE_FILE",
                                "default": "vk_apidump.txt"
                            }
                        ]
                    },
                    {
                        "key": "indent_size",
                        "description": "Number of spaces to indent",
                        "type": "INT",
                        "default": 4
                    },
                    {
                        "key": "report_flags",
                        "type": "FLAGS",
                        "default": ["error", "warn"],
                        "flags": [
                            { "key": "info" },
                            { "key": "warn" },
                            { "key": "error" }
                        ]
                    }
                ]
            }
        }
    }"#;

    #[test]
    fn parse_settings() {
        let layers = LayerSettingsInfo::parse_manifest(API_DUMP).unwrap();
        assert_eq!(layers.len(), 1);

        let layer = &layers[0];
        assert_eq!(layer.layer_name(), "VK_LAYER_LUNARG_api_dump");
        assert_eq!(
            layer.api_version(),
            Some(Version {
                major: 1,
                minor: 3,
                patch: 250,
            }),
        );

        let names: Vec<_> = layer.settings().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            ["output_format", "file", "log_filename", "indent_size", "report_flags"],
        );

        let output_format = layer.setting("output_format").unwrap();
        assert_eq!(output_format.value_type, LayerSettingValueType::String);
        assert_eq!(output_format.options.len(), 3);
        assert_eq!(output_format.description, "Specifies the format used for output");

        let file = layer.setting("file").unwrap();
        assert_eq!(file.value_type, LayerSettingValueType::Bool);
        assert_eq!(file.description, "Output to File");
        assert_eq!(file.default_value, "false");

        assert_eq!(
            layer.setting("indent_size").unwrap().parsed_default(),
            Some(LayerSettingValue::Uint32(4)),
        );
        assert_eq!(layer.setting("report_flags").unwrap().default_value, "error,warn");
    }

    #[test]
    fn registry_from_manifest() {
        let mut registry = LayerSettingsRegistry::new();
        registry.add_manifest(API_DUMP).unwrap();

        let config = LayerSettingsConfig::parse("lunarg_api_dump.output_format = html");
        let values = registry
            .resolve("VK_LAYER_LUNARG_api_dump", &[], &config)
            .unwrap();
        assert_eq!(values[0].value, LayerSettingValue::String("html".into()));

        assert!(matches!(
            registry.add_manifest(API_DUMP),
            Err(ManifestError::DuplicateLayer(_)),
        ));
    }

    #[test]
    fn invalid_manifests() {
        assert!(matches!(
            LayerSettingsInfo::parse_manifest("{"),
            Err(ManifestError::Json(_)),
        ));

        let unknown_type = r#"{
            "file_format_version": "1.2.0",
            "layer": {
                "name": "VK_LAYER_test",
                "features": { "settings": [{ "key": "a", "type": "VECTOR" }] }
            }
        }"#;
        assert!(matches!(
            LayerSettingsInfo::parse_manifest(unknown_type),
            Err(ManifestError::UnknownSettingType { ty, .. }) if ty == "VECTOR",
        ));

        let bad_default = r#"{
            "file_format_version": "1.2.0",
            "layer": {
                "name": "VK_LAYER_test",
                "features": {
                    "settings": [{ "key": "level", "type": "ENUM", "default": "loud",
                                   "flags": [{ "key": "quiet" }] }]
                }
            }
        }"#;
        let err = LayerSettingsInfo::parse_manifest(bad_default).unwrap_err();
        match err {
            ManifestError::Validation { layer_name, err } => {
                assert_eq!(layer_name, "VK_LAYER_test");
                assert_eq!(err.context, "settings[level].setting.default_value");
            }
            _ => panic!(),
        }
    }

    #[test]
    fn manifest_without_settings() {
        let json = r#"{
            "file_format_version": "1.0.0",
            "layer": { "name": "VK_LAYER_MESA_device_select", "api_version": "1.3.211" }
        }"#;
        let layers = LayerSettingsInfo::parse_manifest(json).unwrap();
        assert!(layers[0].settings().is_empty());
    }
}
