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

use model::machine::{Machine, MachineId};

use crate::{Inventory, InventoryError, InventoryResult};

impl Inventory {
    /// Identifier of the machine with the given MAC. The MAC is normalized
    /// first, so any spelling of it matches.
    pub async fn find_machine_id(&self, mac: &str) -> InventoryResult<Option<MachineId>> {
        let mac = model::mac::normalize(mac);
        self.store
            .with_txn(async |txn| db::machine::find_id_by_mac(txn, &mac).await)
            .await
            .map_err(Into::into)
    }

    pub async fn find_machine(&self, mac: &str) -> InventoryResult<Option<Machine>> {
        let mac = model::mac::normalize(mac);
        self.store
            .with_txn(async |txn| db::machine::find_by_mac(txn, &mac).await)
            .await
            .map_err(Into::into)
    }

    /// All machines, in spreadsheet order.
    pub async fn list_machines(&self) -> InventoryResult<Vec<Machine>> {
        self.store
            .with_txn(async |txn| db::machine::find_all(txn).await)
            .await
            .map_err(Into::into)
    }

    /// Remove the machine with the given MAC together with its history.
    /// Returns whether there was such a machine.
    pub async fn delete_machine(&self, mac: &str) -> InventoryResult<bool> {
        let mac = model::mac::normalize(mac);
        let deleted = self
            .store
            .with_txn(async |txn| db::machine::delete_by_mac(txn, &mac).await)
            .await
            .map_err(|e| InventoryError::from_database(e, format!("deleting MAC {mac}")))?;
        if deleted {
            tracing::info!(%mac, "Deleted machine and its history");
        }
        Ok(deleted)
    }
}
