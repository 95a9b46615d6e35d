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
use sqlx::SqliteConnection;

use crate::{DatabaseError, DatabaseResult};

/// Append one entry to a machine's history. `created_at` is filled in by the
/// database.
pub async fn persist(
    txn: &mut SqliteConnection,
    value: NewHistoryEvent<'_>,
) -> DatabaseResult<HistoryEvent> {
    let query = "INSERT INTO machine_history (machine_id, event, responsible, ip, mac)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, machine_id, event, responsible, created_at, ip, mac";
    sqlx::query_as(query)
        .bind(value.machine_id)
        .bind(value.event)
        .bind(value.responsible)
        .bind(value.ip)
        .bind(value.mac)
        .fetch_one(txn)
        .await
        .map_err(|e| DatabaseError::query(query, e))
}

/// History of the machine with the given canonical MAC, newest first. Entries
/// sharing a timestamp are returned in reverse insertion order.
pub async fn for_mac(txn: &mut SqliteConnection, mac: &str) -> DatabaseResult<Vec<HistoryEvent>> {
    let query = "SELECT hm.id, hm.machine_id, hm.event, hm.responsible, hm.created_at, hm.ip, hm.mac
            FROM machine_history hm
            JOIN machines m ON m.id = hm.machine_id
            WHERE m.mac = ?
            ORDER BY hm.created_at DESC, hm.id DESC";
    sqlx::query_as(query)
        .bind(mac)
        .fetch_all(txn)
        .await
        .map_err(|e| DatabaseError::query(query, e))
}

pub async fn count(txn: &mut SqliteConnection) -> DatabaseResult<i64> {
    let query = "SELECT COUNT(*) FROM machine_history";
    sqlx::query_scalar(query)
        .fetch_one(txn)
        .await
        .map_err(|e| DatabaseError::query(query, e))
}

#[cfg(test)]
mod tests {
    use model::machine::{MachineId, NewMachine};
    use sqlx_testing::TestDatabase;

    use super::*;

    async fn create_machine(conn: &mut SqliteConnection, mac: &str) -> MachineId {
        crate::machine::upsert(
            conn,
            &NewMachine {
                ip: "10.1.1.1".to_string(),
                mac: mac.to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap()
    }

    fn new_event<'a>(machine_id: MachineId, event: &'a str, mac: &'a str) -> NewHistoryEvent<'a> {
        NewHistoryEvent {
            machine_id,
            event,
            responsible: "Igor",
            ip: Some("10.1.1.1"),
            mac,
        }
    }

    #[tokio::test]
    async fn persist_assigns_timestamp_and_keeps_snapshot() {
        let db = TestDatabase::new().await;
        let mut conn = db.connect().await;
        let mac = "C8:08:E9:5D:DF:F8";
        let machine_id = create_machine(&mut conn, mac).await;

        let before = chrono::Utc::now() - chrono::Duration::seconds(5);
        let event = persist(&mut conn, new_event(machine_id, "Disk swap", mac))
            .await
            .unwrap();

        assert_eq!(event.machine_id, machine_id);
        assert_eq!(event.event, "Disk swap");
        assert_eq!(event.responsible, "Igor");
        assert_eq!(event.ip.as_deref(), Some("10.1.1.1"));
        assert_eq!(event.mac.as_deref(), Some(mac));
        assert!(event.created_at > before);
    }

    #[tokio::test]
    async fn for_mac_lists_newest_first() {
        let db = TestDatabase::new().await;
        let mut conn = db.connect().await;
        let mac = "AA:BB:CC:DD:EE:FF";
        let machine_id = create_machine(&mut conn, mac).await;

        for event in ["A", "B", "C"] {
            persist(&mut conn, new_event(machine_id, event, mac))
                .await
                .unwrap();
        }

        let events: Vec<String> = for_mac(&mut conn, mac)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.event)
            .collect();
        assert_eq!(events, vec!["C", "B", "A"]);
    }

    #[tokio::test]
    async fn for_mac_only_returns_events_of_that_machine() {
        let db = TestDatabase::new().await;
        let mut conn = db.connect().await;
        let first = create_machine(&mut conn, "11:11:11:11:11:11").await;
        let second = create_machine(&mut conn, "22:22:22:22:22:22").await;

        persist(&mut conn, new_event(first, "first", "11:11:11:11:11:11"))
            .await
            .unwrap();
        persist(&mut conn, new_event(second, "second", "22:22:22:22:22:22"))
            .await
            .unwrap();

        let events = for_mac(&mut conn, "22:22:22:22:22:22").await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, "second");
        assert!(
            for_mac(&mut conn, "33:33:33:33:33:33")
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn persist_for_unknown_machine_violates_foreign_key() {
        let db = TestDatabase::new().await;
        let mut conn = db.connect().await;

        let err = persist(
            &mut conn,
            new_event(MachineId(999), "orphan", "AA:BB:CC:DD:EE:FF"),
        )
        .await
        .unwrap_err();
        assert!(err.is_constraint_violation());
        assert_eq!(count(&mut conn).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn deleting_machine_cascades_to_history() {
        let db = TestDatabase::new().await;
        let mut conn = db.connect().await;
        let mac = "AA:BB:CC:DD:EE:FF";
        let machine_id = create_machine(&mut conn, mac).await;
        let other = create_machine(&mut conn, "11:11:11:11:11:11").await;

        persist(&mut conn, new_event(machine_id, "install", mac))
            .await
            .unwrap();
        persist(&mut conn, new_event(machine_id, "repair", mac))
            .await
            .unwrap();
        persist(&mut conn, new_event(other, "install", "11:11:11:11:11:11"))
            .await
            .unwrap();
        assert_eq!(count(&mut conn).await.unwrap(), 3);

        assert!(crate::machine::delete_by_mac(&mut conn, mac).await.unwrap());
        assert_eq!(count(&mut conn).await.unwrap(), 1);
        assert!(for_mac(&mut conn, mac).await.unwrap().is_empty());
    }
}
