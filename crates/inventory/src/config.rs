/*
 * SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
 * SPDX-License-Identifier: LicenseRef-NvidiaProprietary
 *
 * NVIDIA CORPORATION, its affiliates and licensors retain all intellectual
 * property and proprietary rights in and to this material, related
 * documentation and any modifications thereto. Any use, reproduction,
 * disclosure or distribution of this material and related documentation
 * without an express license agreement from NVIDIA CORPORATION or
 * its affiliates is strictly prohibited.
 */
use std::path::{Path, PathBuf};
use std::time::Duration;

use duration_str::deserialize_duration;
use serde::{Deserialize, Serialize, Serializer};

use crate::source::ColumnAliases;

const DEFAULT_DATABASE_PATH: &str = "machine_history.db";
const DEFAULT_SOURCE_PATH: &str = "inventory.csv";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// Configuration for machine-inventory. Fields are documented as comments in the output of [`Config::into_annotated_config_file`].
pub struct Config {
    #[serde(default = "Defaults::database_path")]
    pub database_path: PathBuf,
    #[serde(default = "Defaults::source_path")]
    pub source_path: PathBuf,
    #[serde(default = "Defaults::delimiter")]
    pub delimiter: char,
    #[serde(
        default = "Defaults::busy_timeout",
        serialize_with = "serialize_duration",
        deserialize_with = "deserialize_duration"
    )]
    pub busy_timeout: Duration,
    #[serde(default)]
    pub columns: ColumnAliases,
}

pub struct Defaults;

impl Defaults {
    pub fn database_path() -> PathBuf {
        DEFAULT_DATABASE_PATH.into()
    }
    pub fn source_path() -> PathBuf {
        DEFAULT_SOURCE_PATH.into()
    }
    pub fn delimiter() -> char {
        ','
    }
    pub fn busy_timeout() -> Duration {
        Duration::from_secs(5)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file: {path}: {error}")]
    CouldNotRead { path: String, error: std::io::Error },
    #[error("Invalid TOML in config file: {path}: {error}")]
    InvalidToml {
        path: String,
        error: toml::de::Error,
    },
    #[error("Invalid delimiter {delimiter:?}: must be a single ASCII character")]
    InvalidDelimiter { delimiter: char },
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: Defaults::database_path(),
            source_path: Defaults::source_path(),
            delimiter: Defaults::delimiter(),
            busy_timeout: Defaults::busy_timeout(),
            columns: ColumnAliases::default(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let cfg = std::fs::read_to_string(path).map_err(|error| ConfigError::CouldNotRead {
            path: path.to_string_lossy().to_string(),
            error,
        })?;
        let config = toml::from_str::<Self>(&cfg).map_err(|error| ConfigError::InvalidToml {
            path: path.to_string_lossy().to_string(),
            error,
        })?;
        config.delimiter_byte()?;
        Ok(config)
    }

    /// The delimiter as the csv reader wants it.
    pub fn delimiter_byte(&self) -> Result<u8, ConfigError> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or(ConfigError::InvalidDelimiter {
                delimiter: self.delimiter,
            })
    }

    pub fn into_annotated_config_file(self) -> String {
        let Self {
            database_path,
            source_path,
            delimiter,
            busy_timeout,
            columns,
        } = self;
        let delimiter = delimiter.to_string();
        let busy_timeout = format!("{}s", busy_timeout.as_secs());
        let ColumnAliases {
            ordinal,
            name,
            user,
            sector,
            floor,
            ip,
            mac,
            port,
            comment,
        } = columns;

        format!(
            r#"
#####
## This is a default config file for machine-inventory. Everything in this file is optional: Any
## non-comment line in this file simply represents default values.
#####

## SQLite database holding machines and their history. Created on first use.
database_path = {database_path:?}

## Spreadsheet export (CSV with a header row) to import machines from
source_path = {source_path:?}

## Field delimiter of the spreadsheet export
delimiter = {delimiter:?}

## How long to wait for another process holding a lock on the database
busy_timeout = {busy_timeout:?}

## Header names accepted for each field, in order of preference. For every row the first listed
## column holding a value wins. Columns not listed anywhere are ignored.
[columns]
ordinal = {ordinal:?}
name = {name:?}
user = {user:?}
sector = {sector:?}
floor = {floor:?}
ip = {ip:?}
mac = {mac:?}
port = {port:?}
comment = {comment:?}
"#
        )
    }
}

fn serialize_duration<S>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format!("{}s", d.as_secs()))
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    #[test]
    fn test_default_file_is_actually_default() {
        let default_toml: Config = toml::from_str(&Config::default().into_annotated_config_file())
            .expect("default toml didn't parse");
        assert_eq!(default_toml, Config::default());
    }

    #[test]
    fn test_empty_config_file_is_default() {
        let empty_config: Config = toml::from_str("").expect("empty toml didn't parse");
        assert_eq!(empty_config, Config::default());
    }

    #[test]
    fn test_default_config_roundtrips() {
        let default = Config::default();
        let default_toml = toml::to_string(&default).expect("default toml didn't serialize");
        let roundtripped =
            toml::from_str::<Config>(&default_toml).expect("default toml didn't parse");
        assert_eq!(default, roundtripped);
    }

    #[test]
    fn test_partial_columns_keep_defaults() {
        let partial_config = indoc! {r#"
        database_path = "/var/lib/inventory/machines.db"
        delimiter = ";"
        busy_timeout = "30s"

        [columns]
        # only the MAC header differs, every other field keeps its default aliases
        mac = ["MAC"]
        "#};

        let config = toml::from_str::<Config>(partial_config).expect("Couldn't parse config toml");
        assert_eq!(
            config.database_path,
            PathBuf::from("/var/lib/inventory/machines.db")
        );
        assert_eq!(config.source_path, Defaults::source_path());
        assert_eq!(config.delimiter_byte().unwrap(), b';');
        assert_eq!(config.busy_timeout, Duration::from_secs(30));
        assert_eq!(config.columns.mac, vec!["MAC".to_string()]);
        assert_eq!(config.columns.user, ColumnAliases::default().user);
    }

    #[test]
    fn test_non_ascii_delimiter_is_rejected() {
        let config = Config {
            delimiter: '§',
            ..Default::default()
        };
        assert!(matches!(
            config.delimiter_byte(),
            Err(ConfigError::InvalidDelimiter { delimiter: '§' })
        ));
    }

    #[test]
    fn test_load_reports_missing_file() {
        let err = Config::load(Path::new("/nonexistent/machine-inventory.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::CouldNotRead { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.toml");
        std::fs::write(&path, "source_path = \"export.csv\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.source_path, PathBuf::from("export.csv"));
        assert_eq!(config.database_path, Defaults::database_path());
    }
}
