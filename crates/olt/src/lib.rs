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

//! OLT inventory projection and control: the in-memory cache, the fetch
//! orchestrator composing CLI sequences into snapshots, and the
//! bind/unbind controller.

mod bind;
mod commands;
pub mod error;
mod fetch;
pub mod inventory;
pub mod manager;

pub use error::{BindStage, OltError};
pub use inventory::{Inventory, InventoryCache};
pub use manager::{DEFAULT_REFRESH_INTERVAL, OltManager};
