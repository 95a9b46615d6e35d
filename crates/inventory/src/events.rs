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

use model::machine_history::{HistoryEvent, NewHistoryEvent};

use crate::{Inventory, InventoryError, InventoryResult};

impl Inventory {
    /// Append an event to the history of the machine with the given MAC. The
    /// machine's current IP and MAC are stored with the event, so the entry
    /// stays meaningful after later imports change them.
    ///
    /// Fails with [`InventoryError::MachineNotFound`] if no machine has that
    /// MAC; nothing is written in that case.
    pub async fn record_event(
        &self,
        mac: &str,
        description: &str,
        responsible: &str,
    ) -> InventoryResult<HistoryEvent> {
        let mac = model::mac::normalize(mac);
        let event = self
            .store
            .with_txn(async |txn| -> InventoryResult<HistoryEvent> {
                let machine = db::machine::find_by_mac(txn, &mac)
                    .await
                    .map_err(|e| {
                        InventoryError::from_database(e, format!("lookup of MAC {mac}"))
                    })?
                    .ok_or_else(|| InventoryError::MachineNotFound { mac: mac.clone() })?;
                let ip = Some(machine.ip.as_str()).filter(|ip| !ip.is_empty());
                db::machine_history::persist(
                    txn,
                    NewHistoryEvent {
                        machine_id: machine.id,
                        event: description,
                        responsible,
                        ip,
                        mac: &machine.mac,
                    },
                )
                .await
                .map_err(|e| InventoryError::from_database(e, format!("event for MAC {mac}")))
            })
            .await?;

        tracing::debug!(%mac, event_id = event.id, "Recorded event");
        Ok(event)
    }

    /// Events of the machine with the given MAC, newest first. Empty if the
    /// machine has no events or does not exist.
    pub async fn list_events(&self, mac: &str) -> InventoryResult<Vec<HistoryEvent>> {
        let mac = model::mac::normalize(mac);
        self.store
            .with_txn(async |txn| db::machine_history::for_mac(txn, &mac).await)
            .await
            .map_err(Into::into)
    }
}
