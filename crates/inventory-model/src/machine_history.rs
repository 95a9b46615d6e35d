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
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use crate::machine::MachineId;

/// One immutable entry in a machine's history, e.g. a repair or an install.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEvent {
    pub id: i64,
    pub machine_id: MachineId,
    pub event: String,
    pub responsible: String,
    /// Assigned by the database when the row is inserted
    pub created_at: DateTime<Utc>,
    /// IP of the machine at the time the event was recorded. None for entries
    /// written before snapshots were stored.
    pub ip: Option<String>,
    /// Canonical MAC of the machine at the time the event was recorded
    pub mac: Option<String>,
}

impl<'r> FromRow<'r, SqliteRow> for HistoryEvent {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(HistoryEvent {
            id: row.try_get("id")?,
            machine_id: row.try_get("machine_id")?,
            event: row
                .try_get::<Option<String>, _>("event")?
                .unwrap_or_default(),
            responsible: row
                .try_get::<Option<String>, _>("responsible")?
                .unwrap_or_default(),
            created_at: row.try_get("created_at")?,
            ip: row.try_get("ip")?,
            mac: row.try_get("mac")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct NewHistoryEvent<'a> {
    pub machine_id: MachineId,
    pub event: &'a str,
    pub responsible: &'a str,
    pub ip: Option<&'a str>,
    pub mac: &'a str,
}
