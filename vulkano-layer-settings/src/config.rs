// Copyright (c) 2021 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! User configuration of layer settings, outside of the application.
//!
//! Users can override the settings of a layer without touching the application, with a layer
//! settings file or with environment variables. Both address a setting through the
//! [layer prefix](layer_prefix) of its layer:
//!
//! ```text
//! # vk_layer_settings.txt
//! khronos_validation.debug_action = VK_DBG_LAYER_ACTION_LOG_MSG
//! khronos_validation.duplicate_message_limit = 20
//! ```
//!
//! ```text
//! VK_KHRONOS_VALIDATION_DUPLICATE_MESSAGE_LIMIT=20
//! ```
//!
//! When both are present, the environment variable wins.

use indexmap::IndexMap;
use std::{
    env,
    error::Error,
    ffi::{OsStr, OsString},
    fmt::{Display, Error as FmtError, Formatter},
    fs, io,
    path::{Path, PathBuf},
};

/// The name of the layer settings file.
pub const SETTINGS_FILE_NAME: &str = "vk_layer_settings.txt";

/// The environment variable that points to the layer settings file, or to the directory that
/// contains it.
pub const SETTINGS_PATH_VAR: &str = "VK_LAYER_SETTINGS_PATH";

/// Returns the prefix that addresses the settings of `layer_name` in the layer settings file.
///
/// This is the name of the layer without its leading `VK_LAYER_`, in lowercase.
///
/// ```
/// use vulkano_layer_settings::layer_prefix;
///
/// assert_eq!(layer_prefix("VK_LAYER_KHRONOS_validation"), "khronos_validation");
/// ```
pub fn layer_prefix(layer_name: &str) -> String {
    let name = layer_name
        .strip_prefix("VK_LAYER_")
        .or_else(|| layer_name.strip_prefix("vk_layer_"))
        .unwrap_or(layer_name);

    name.to_ascii_lowercase()
}

/// Returns the environment variable that overrides `setting_name` of the layer with the given
/// prefix.
fn env_var_name(prefix: &str, setting_name: &str) -> String {
    format!("VK_{}_{}", prefix, setting_name).to_ascii_uppercase()
}

/// Returns the path of the layer settings file, given the value of [`SETTINGS_PATH_VAR`].
fn settings_file_path(settings_path: Option<&OsStr>) -> PathBuf {
    match settings_path {
        Some(path) => {
            let path = PathBuf::from(path);

            if path.is_dir() {
                path.join(SETTINGS_FILE_NAME)
            } else {
                path
            }
        }
        None => PathBuf::from(SETTINGS_FILE_NAME),
    }
}

/// Where a configured value comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConfigSource {
    /// The layer settings file.
    File,

    /// An environment variable.
    Environment,
}

impl Display for ConfigSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match self {
            Self::File => write!(f, "the layer settings file"),
            Self::Environment => write!(f, "the environment"),
        }
    }
}

/// The setting values configured by the user, keyed by layer prefix and setting name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LayerSettingsConfig {
    file: IndexMap<String, String>,
    env: IndexMap<String, String>,
}

impl LayerSettingsConfig {
    /// Returns an empty configuration.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the contents of a layer settings file.
    ///
    /// Each line is `<layer prefix>.<setting name> = <value>`. Everything after a `#` is a
    /// comment. Blank lines are ignored, and malformed lines are skipped with a warning. If a
    /// setting appears more than once, the last value wins.
    pub fn parse(text: &str) -> Self {
        let mut file = IndexMap::new();

        for (index, line) in text.lines().enumerate() {
            let line = match line.split_once('#') {
                Some((line, _comment)) => line,
                None => line,
            }
            .trim();

            if line.is_empty() {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                log::warn!("layer settings line {}: expected `key = value`", index + 1);
                continue;
            };
            let key = key.trim();

            match key.split_once('.') {
                Some((prefix, setting)) if !prefix.is_empty() && !setting.is_empty() => {
                    file.insert(key.to_owned(), value.trim().to_owned());
                }
                _ => log::warn!(
                    "layer settings line {}: `{}` is not of the form `<layer>.<setting>`",
                    index + 1,
                    key,
                ),
            }
        }

        LayerSettingsConfig {
            file,
            env: IndexMap::new(),
        }
    }

    /// Reads and parses the layer settings file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|err| ConfigError::Io {
            path: path.to_owned(),
            err,
        })?;

        log::debug!("read layer settings from {}", path.display());

        Ok(Self::parse(&text))
    }

    /// Builds the configuration of the current process.
    ///
    /// This is [`from_vars`](Self::from_vars) applied to the environment of the process.
    #[inline]
    pub fn from_environment() -> Result<Self, ConfigError> {
        Self::from_vars(env::vars_os())
    }

    /// Builds the configuration from a set of environment variables.
    ///
    /// The layer settings file is located with [`SETTINGS_PATH_VAR`], which can name the file
    /// or the directory that contains it. Without it, the file is looked for in the current
    /// directory. A missing file is not an error. Every variable starting with `VK_` is captured
    /// as a possible override. Variables that are not valid UTF-8 are ignored.
    pub fn from_vars(
        vars: impl IntoIterator<Item = (OsString, OsString)>,
    ) -> Result<Self, ConfigError> {
        let mut settings_path = None;
        let mut env = IndexMap::new();

        for (name, value) in vars {
            if name == SETTINGS_PATH_VAR {
                settings_path = Some(value.clone());
            }

            if let (Ok(name), Ok(value)) = (name.into_string(), value.into_string()) {
                if name.starts_with("VK_") {
                    env.insert(name, value);
                }
            }
        }

        let path = settings_file_path(settings_path.as_deref());
        let mut config = match Self::load(&path) {
            Ok(config) => config,
            Err(ConfigError::Io { err, .. }) if err.kind() == io::ErrorKind::NotFound => {
                Self::new()
            }
            Err(err) => return Err(err),
        };
        config.env = env;

        Ok(config)
    }

    /// Adds an environment variable to the configuration.
    #[inline]
    pub fn with_env_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(name.into(), value.into());
        self
    }

    /// Returns the value configured for `setting_name` of the layer with the given prefix, and
    /// where it comes from.
    pub fn lookup(&self, prefix: &str, setting_name: &str) -> Option<(&str, ConfigSource)> {
        if let Some(value) = self.env.get(&env_var_name(prefix, setting_name)) {
            return Some((value.trim(), ConfigSource::Environment));
        }

        self.file
            .get(&format!("{}.{}", prefix, setting_name))
            .map(|value| (value.as_str(), ConfigSource::File))
    }

    /// Returns whether the configuration contains no values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.file.is_empty() && self.env.is_empty()
    }
}

/// Error that can happen when loading the layer settings file.
#[derive(Debug)]
pub enum ConfigError {
    /// The file couldn't be read.
    Io { path: PathBuf, err: io::Error },
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { err, .. } => Some(err),
        }
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match self {
            Self::Io { path, .. } => {
                write!(f, "failed to read the layer settings file `{}`", path.display())
            }
        }
    }
}
