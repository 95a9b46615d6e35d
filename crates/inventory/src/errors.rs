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
use db::DatabaseError;

use crate::config::ConfigError;

pub type InventoryResult<T> = Result<T, InventoryError>;

#[derive(thiserror::Error, Debug)]
pub enum InventoryError {
    #[error("Inventory source not found: {path}")]
    SourceNotFound { path: String },
    #[error("Could not read inventory source {path}: {source}")]
    SourceRead { path: String, source: csv::Error },
    #[error("Machine with MAC {mac:?} not found")]
    MachineNotFound { mac: String },
    #[error("Constraint violated by {context}: {source}")]
    ConstraintViolation {
        context: String,
        source: DatabaseError,
    },
    #[error("Storage failure for {context}: {source}")]
    Storage {
        context: String,
        source: DatabaseError,
    },
    #[error("Could not create database schema: {0}")]
    Schema(#[source] DatabaseError),
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl InventoryError {
    /// Wrap a storage error, singling out constraint rejections so callers can
    /// tell them apart from an unreachable or broken database. `context` names
    /// the row or MAC that was being read or written and is kept either way.
    pub fn from_database(error: DatabaseError, context: impl Into<String>) -> Self {
        if error.is_constraint_violation() {
            Self::ConstraintViolation {
                context: context.into(),
                source: error,
            }
        } else {
            Self::Storage {
                context: context.into(),
                source: error,
            }
        }
    }
}
