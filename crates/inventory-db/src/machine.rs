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
use model::machine::{Machine, MachineId, NewMachine};
use sqlx::SqliteConnection;

use crate::{DatabaseError, DatabaseResult};

/// Insert `value`, or overwrite every attribute of the machine that already
/// has the same MAC. Blank values in `value` replace stored ones; nothing is
/// merged.
pub async fn upsert(txn: &mut SqliteConnection, value: &NewMachine) -> DatabaseResult<MachineId> {
    let query = "
INSERT INTO machines (row_ordinal, name, assigned_user, sector, floor, ip, mac, port, comment)
VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
ON CONFLICT(mac) DO UPDATE SET
    row_ordinal=excluded.row_ordinal,
    name=excluded.name,
    assigned_user=excluded.assigned_user,
    sector=excluded.sector,
    floor=excluded.floor,
    ip=excluded.ip,
    port=excluded.port,
    comment=excluded.comment
RETURNING id";
    sqlx::query_scalar(query)
        .bind(value.row_ordinal)
        .bind(&value.name)
        .bind(&value.assigned_user)
        .bind(&value.sector)
        .bind(&value.floor)
        .bind(&value.ip)
        .bind(&value.mac)
        .bind(&value.port)
        .bind(&value.comment)
        .fetch_one(txn)
        .await
        .map_err(|e| DatabaseError::query(query, e))
}

pub async fn find_id_by_mac(
    txn: &mut SqliteConnection,
    mac: &str,
) -> DatabaseResult<Option<MachineId>> {
    let query = "SELECT id FROM machines WHERE mac = ?";
    sqlx::query_scalar(query)
        .bind(mac)
        .fetch_optional(txn)
        .await
        .map_err(|e| DatabaseError::query(query, e))
}

pub async fn find_by_mac(
    txn: &mut SqliteConnection,
    mac: &str,
) -> DatabaseResult<Option<Machine>> {
    let query = "SELECT * FROM machines WHERE mac = ?";
    sqlx::query_as(query)
        .bind(mac)
        .fetch_optional(txn)
        .await
        .map_err(|e| DatabaseError::query(query, e))
}

pub async fn find_all(txn: &mut SqliteConnection) -> DatabaseResult<Vec<Machine>> {
    let query = "SELECT * FROM machines ORDER BY row_ordinal, mac";
    sqlx::query_as(query)
        .fetch_all(txn)
        .await
        .map_err(|e| DatabaseError::query(query, e))
}

/// Administrative removal. History rows of the machine go with it through the
/// foreign key cascade. Returns whether a machine was deleted.
pub async fn delete_by_mac(txn: &mut SqliteConnection, mac: &str) -> DatabaseResult<bool> {
    let query = "DELETE FROM machines WHERE mac = ?";
    sqlx::query(query)
        .bind(mac)
        .execute(txn)
        .await
        .map(|result| result.rows_affected() > 0)
        .map_err(|e| DatabaseError::query(query, e))
}

pub async fn count(txn: &mut SqliteConnection) -> DatabaseResult<i64> {
    let query = "SELECT COUNT(*) FROM machines";
    sqlx::query_scalar(query)
        .fetch_one(txn)
        .await
        .map_err(|e| DatabaseError::query(query, e))
}
