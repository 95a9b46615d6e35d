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

//! Reading machines out of the spreadsheet export.
//!
//! The export is a CSV file with a header row. Columns are found by name, never
//! by position, and each field may be known under several header spellings
//! (see [`ColumnAliases`]).

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use model::machine::NewMachine;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

use crate::errors::{InventoryError, InventoryResult};

const BYTE_ORDER_MARK: char = '\u{feff}';

/// The fields of a machine that can be read from the export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum SourceField {
    Ordinal,
    Name,
    User,
    Sector,
    Floor,
    Ip,
    Mac,
    Port,
    Comment,
}

impl SourceField {
    /// Header spellings used by the spreadsheet the export comes from.
    pub fn default_aliases(self) -> &'static [&'static str] {
        match self {
            Self::Ordinal => &["Linha"],
            Self::Name => &["Nome"],
            Self::User => &["Usuário", "Usuario"],
            Self::Sector => &["Setor"],
            Self::Floor => &["Andar"],
            Self::Ip => &["IP"],
            Self::Mac => &["Endereço MAC", "Endereco MAC"],
            Self::Port => &["Ponto"],
            Self::Comment => &["Comentario"],
        }
    }
}

/// Accepted header names per field, in order of preference. Matching is exact
/// and case sensitive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ColumnAliases {
    pub ordinal: Vec<String>,
    pub name: Vec<String>,
    pub user: Vec<String>,
    pub sector: Vec<String>,
    pub floor: Vec<String>,
    pub ip: Vec<String>,
    pub mac: Vec<String>,
    pub port: Vec<String>,
    pub comment: Vec<String>,
}

impl Default for ColumnAliases {
    fn default() -> Self {
        let aliases = |field: SourceField| {
            field
                .default_aliases()
                .iter()
                .map(|alias| alias.to_string())
                .collect()
        };
        Self {
            ordinal: aliases(SourceField::Ordinal),
            name: aliases(SourceField::Name),
            user: aliases(SourceField::User),
            sector: aliases(SourceField::Sector),
            floor: aliases(SourceField::Floor),
            ip: aliases(SourceField::Ip),
            mac: aliases(SourceField::Mac),
            port: aliases(SourceField::Port),
            comment: aliases(SourceField::Comment),
        }
    }
}

impl ColumnAliases {
    pub fn for_field(&self, field: SourceField) -> &[String] {
        match field {
            SourceField::Ordinal => &self.ordinal,
            SourceField::Name => &self.name,
            SourceField::User => &self.user,
            SourceField::Sector => &self.sector,
            SourceField::Floor => &self.floor,
            SourceField::Ip => &self.ip,
            SourceField::Mac => &self.mac,
            SourceField::Port => &self.port,
            SourceField::Comment => &self.comment,
        }
    }
}

/// Column positions for every field, resolved once from the header row.
#[derive(Debug, Clone)]
struct HeaderMap {
    positions: HashMap<SourceField, Vec<usize>>,
}

impl HeaderMap {
    fn new(headers: &StringRecord, aliases: &ColumnAliases) -> Self {
        let headers: Vec<&str> = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                if i == 0 {
                    header.trim_start_matches(BYTE_ORDER_MARK)
                } else {
                    header
                }
            })
            .collect();

        let positions = SourceField::iter()
            .map(|field| {
                let found: Vec<usize> = aliases
                    .for_field(field)
                    .iter()
                    .filter_map(|alias| {
                        headers
                            .iter()
                            .position(|header| *header == alias.as_str())
                    })
                    .collect();
                if found.is_empty() {
                    tracing::debug!(%field, "No column in source for field");
                }
                (field, found)
            })
            .collect();

        Self { positions }
    }

    fn has(&self, field: SourceField) -> bool {
        self.positions
            .get(&field)
            .is_some_and(|positions| !positions.is_empty())
    }

    /// The value of `field` in `record`: the first alias column that holds
    /// anything, trimmed. Blank if no such column has a value.
    fn value<'r>(&self, record: &'r StringRecord, field: SourceField) -> &'r str {
        self.positions
            .get(&field)
            .into_iter()
            .flatten()
            .filter_map(|&position| record.get(position))
            .find(|value| !value.is_empty())
            .map(str::trim)
            .unwrap_or_default()
    }

    fn machine(&self, record: &StringRecord) -> NewMachine {
        let text = |field| self.value(record, field).to_string();
        NewMachine {
            row_ordinal: self.value(record, SourceField::Ordinal).parse().ok(),
            name: text(SourceField::Name),
            assigned_user: text(SourceField::User),
            sector: text(SourceField::Sector),
            floor: text(SourceField::Floor),
            ip: text(SourceField::Ip),
            mac: model::mac::normalize(self.value(record, SourceField::Mac)),
            port: text(SourceField::Port),
            comment: text(SourceField::Comment),
        }
    }
}

/// One data row of the export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRow {
    /// Line in the source the row starts on, for diagnostics
    pub line: u64,
    pub machine: NewMachine,
}

/// A spreadsheet export opened for reading. The header row has already been
/// read and resolved, so a source that cannot be opened or has a broken header
/// fails before anything is written to the database.
pub struct TabularSource<R> {
    name: String,
    reader: csv::Reader<R>,
    headers: HeaderMap,
}

impl TabularSource<File> {
    pub fn open(path: &Path, delimiter: u8, aliases: &ColumnAliases) -> InventoryResult<Self> {
        let name = path.display().to_string();
        if !path.exists() {
            return Err(InventoryError::SourceNotFound { path: name });
        }
        let reader = reader_builder(delimiter)
            .from_path(path)
            .map_err(|source| InventoryError::SourceRead {
                path: name.clone(),
                source,
            })?;
        Self::new(name, reader, aliases)
    }
}

impl<R: Read> TabularSource<R> {
    /// Read an export from anything readable. `name` identifies the source in
    /// errors and logs.
    pub fn from_reader(
        reader: R,
        name: impl Into<String>,
        delimiter: u8,
        aliases: &ColumnAliases,
    ) -> InventoryResult<Self> {
        Self::new(
            name.into(),
            reader_builder(delimiter).from_reader(reader),
            aliases,
        )
    }

    fn new(name: String, mut reader: csv::Reader<R>, aliases: &ColumnAliases) -> InventoryResult<Self> {
        let headers = reader
            .headers()
            .map_err(|source| InventoryError::SourceRead {
                path: name.clone(),
                source,
            })?;
        let headers = HeaderMap::new(headers, aliases);
        if !headers.has(SourceField::Mac) {
            tracing::warn!(
                source = %name,
                "Source has none of the MAC address columns; every row will be skipped"
            );
        }
        Ok(Self {
            name,
            reader,
            headers,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The data rows, in file order. A record that cannot be read ends up as an
    /// error item; the caller decides whether to go on.
    pub fn rows(&mut self) -> impl Iterator<Item = InventoryResult<SourceRow>> + '_ {
        let Self {
            name,
            reader,
            headers,
        } = self;
        reader.records().map(move |record| {
            let record = record.map_err(|source| InventoryError::SourceRead {
                path: name.clone(),
                source,
            })?;
            Ok(SourceRow {
                line: record.position().map(|p| p.line()).unwrap_or_default(),
                machine: headers.machine(&record),
            })
        })
    }
}

fn reader_builder(delimiter: u8) -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::None);
    builder
}
