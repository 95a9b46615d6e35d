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
use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

/// Surrogate key of a row in the `machines` table. Assigned by the database on
/// first insert and never changed afterwards.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, sqlx::Type,
)]
#[sqlx(transparent)]
pub struct MachineId(pub i64);

impl From<i64> for MachineId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<MachineId> for i64 {
    fn from(id: MachineId) -> Self {
        id.0
    }
}

impl fmt::Display for MachineId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A physical machine or network endpoint, keyed by its canonical MAC address.
///
/// Text attributes that are NULL in storage are read back as empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Machine {
    pub id: MachineId,
    /// Ordinal of the spreadsheet row this machine was last imported from
    pub row_ordinal: Option<i64>,
    pub name: String,
    pub assigned_user: String,
    pub sector: String,
    pub floor: String,
    /// Advisory only. Changes on every import that reports a new address.
    pub ip: String,
    pub mac: String,
    pub port: String,
    pub comment: String,
}

impl<'r> FromRow<'r, SqliteRow> for Machine {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let text = |column: &str| -> Result<String, sqlx::Error> {
            Ok(row
                .try_get::<Option<String>, _>(column)?
                .unwrap_or_default())
        };
        Ok(Machine {
            id: row.try_get("id")?,
            row_ordinal: row.try_get("row_ordinal")?,
            name: text("name")?,
            assigned_user: text("assigned_user")?,
            sector: text("sector")?,
            floor: text("floor")?,
            ip: text("ip")?,
            mac: row.try_get("mac")?,
            port: text("port")?,
            comment: text("comment")?,
        })
    }
}

/// The values for a machine as read from one source row. Applying it either
/// creates the machine or replaces every attribute of the machine with the same
/// MAC.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewMachine {
    pub row_ordinal: Option<i64>,
    pub name: String,
    pub assigned_user: String,
    pub sector: String,
    pub floor: String,
    pub ip: String,
    /// Canonical MAC, see [`crate::mac::normalize`]
    pub mac: String,
    pub port: String,
    pub comment: String,
}
