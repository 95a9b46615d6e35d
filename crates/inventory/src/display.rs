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

//! Rendering machines and their history for the command line.

use clap::ValueEnum;
use model::machine::Machine;
use model::machine_history::HistoryEvent;
use prettytable::{Table, row};
use serde::Serialize;

// OutputFormat are the supported output formats.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

#[derive(thiserror::Error, Debug)]
pub enum DisplayError {
    #[error("Failed to serialize output as JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to serialize output as YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub fn render_machines(machines: &[Machine], format: OutputFormat) -> Result<String, DisplayError> {
    render(machines, format, || machines_table(machines))
}

pub fn render_machine(machine: &Machine, format: OutputFormat) -> Result<String, DisplayError> {
    render(machine, format, || machine_details_table(machine))
}

pub fn render_events(events: &[HistoryEvent], format: OutputFormat) -> Result<String, DisplayError> {
    render(events, format, || events_table(events))
}

fn render<T: Serialize + ?Sized>(
    value: &T,
    format: OutputFormat,
    table: impl FnOnce() -> Table,
) -> Result<String, DisplayError> {
    Ok(match format {
        OutputFormat::Text => table().to_string(),
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    })
}

fn machines_table(machines: &[Machine]) -> Table {
    let mut table = Table::new();
    table.set_titles(row![
        "Row", "MAC", "Name", "User", "Sector", "Floor", "IP", "Port", "Comment"
    ]);
    for machine in machines {
        table.add_row(row![
            machine
                .row_ordinal
                .map(|ordinal| ordinal.to_string())
                .unwrap_or_default(),
            machine.mac,
            machine.name,
            machine.assigned_user,
            machine.sector,
            machine.floor,
            machine.ip,
            machine.port,
            machine.comment,
        ]);
    }
    table
}

fn machine_details_table(machine: &Machine) -> Table {
    let mut table = Table::new();
    table.add_row(row!["ID", machine.id]);
    table.add_row(row![
        "Row",
        machine
            .row_ordinal
            .map(|ordinal| ordinal.to_string())
            .unwrap_or_default()
    ]);
    table.add_row(row!["MAC", machine.mac]);
    table.add_row(row!["Name", machine.name]);
    table.add_row(row!["User", machine.assigned_user]);
    table.add_row(row!["Sector", machine.sector]);
    table.add_row(row!["Floor", machine.floor]);
    table.add_row(row!["IP", machine.ip]);
    table.add_row(row!["Port", machine.port]);
    table.add_row(row!["Comment", machine.comment]);
    table
}

fn events_table(events: &[HistoryEvent]) -> Table {
    let mut table = Table::new();
    table.set_titles(row!["When", "Event", "Responsible", "IP", "MAC"]);
    for event in events {
        table.add_row(row![
            event.created_at.format("%Y-%m-%d %H:%M:%S"),
            event.event,
            event.responsible,
            event.ip.as_deref().unwrap_or_default(),
            event.mac.as_deref().unwrap_or_default(),
        ]);
    }
    table
}
