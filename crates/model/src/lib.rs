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

//! Domain models shared across the photon workspace. Everything the OLT
//! reports is a projection rebuilt on refresh; only users, sessions and
//! connection credentials are durable.

pub mod credential;
pub mod olt_info;
pub mod onu;
pub mod port;
pub mod profile;
pub mod refresh;
pub mod session;
pub mod user;
pub mod vlan;
