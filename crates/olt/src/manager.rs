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

use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use chrono::Utc;
use futures::FutureExt;
use model::refresh::RefreshStatus;
use olt_shell::{ConnectParams, SessionState, ShellSession, Singleflight};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::OltError;
use crate::fetch;
use crate::inventory::{Inventory, InventoryCache};

/// Default cadence of the background refresh.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Owner of the single active OLT session and its projected state.
///
/// Exactly one device is active at a time: connecting tears down whatever
/// session came before. All cache mutations are serialized behind one
/// tokio mutex; readers take lock-free snapshots.
#[derive(Default)]
pub struct OltManager {
    shell: RwLock<Option<Arc<ShellSession>>>,
    pub(crate) cache: InventoryCache,
    refresh_status: Mutex<RefreshStatus>,
    refresh_flight: Singleflight<Result<(), String>>,
    data_flight: Singleflight<Result<(), String>>,
    pub(crate) mutation_lock: tokio::sync::Mutex<()>,
}

impl OltManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dial the device and make its session the active one. A previously
    /// active session is shut down after the new one is up.
    pub async fn connect(&self, params: &ConnectParams) -> Result<(), OltError> {
        let session = olt_shell::connect(params).await?;
        self.attach_session(session);
        Ok(())
    }

    /// Adopt an already-established session. The connect path and the
    /// scripted-device tests both enter here.
    pub fn attach_session(&self, session: ShellSession) {
        let previous = self
            .shell
            .write()
            .expect("BUG: shell lock poisoned")
            .replace(Arc::new(session));
        if let Some(previous) = previous {
            tracing::info!("replacing active OLT session");
            previous.shutdown();
        }
    }

    /// Drop the active session, if any. Queued commands resolve Cancelled.
    pub fn disconnect(&self) {
        if let Some(session) = self
            .shell
            .write()
            .expect("BUG: shell lock poisoned")
            .take()
        {
            session.shutdown();
        }
    }

    pub fn is_connected(&self) -> bool {
        self.shell
            .read()
            .expect("BUG: shell lock poisoned")
            .as_ref()
            .is_some_and(|s| s.is_connected())
    }

    /// Watch the active session's lifecycle, e.g. to flip a credential's
    /// `is_connected` flag when the shell drops.
    pub fn session_state(&self) -> Option<watch::Receiver<SessionState>> {
        self.shell
            .read()
            .expect("BUG: shell lock poisoned")
            .as_ref()
            .map(|s| s.state_receiver())
    }

    pub(crate) fn shell(&self) -> Result<Arc<ShellSession>, OltError> {
        self.shell
            .read()
            .expect("BUG: shell lock poisoned")
            .clone()
            .ok_or(OltError::NotConnected)
    }

    pub fn snapshot(&self) -> Arc<Inventory> {
        self.cache.snapshot()
    }

    /// Swap in a complete inventory. Used by the refresh paths and by tests
    /// seeding a known projection.
    pub async fn publish_inventory(&self, inventory: Inventory) {
        let _guard = self.mutation_lock.lock().await;
        self.cache.publish(inventory);
    }

    pub fn refresh_status(&self) -> RefreshStatus {
        self.refresh_status
            .lock()
            .expect("BUG: refresh status mutex poisoned")
            .clone()
    }

    /// Full projection rebuild. Concurrent callers coalesce onto the run
    /// already in flight; a failure leaves the previous snapshot intact and
    /// parks the message in [`RefreshStatus::error`] until the next success.
    pub async fn refresh_all(self: Arc<Self>) -> Result<(), OltError> {
        let this = self.clone();
        self.refresh_flight
            .run(|| {
                async move { this.run_refresh_all().await.map_err(|e| e.to_string()) }.boxed()
            })
            .await
            .map_err(OltError::Refresh)
    }

    async fn run_refresh_all(&self) -> Result<(), OltError> {
        let shell = self.shell()?;
        {
            let mut status = self
                .refresh_status
                .lock()
                .expect("BUG: refresh status mutex poisoned");
            status.in_progress = true;
        }
        tracing::info!("refreshing OLT inventory");

        let initial_vlan_capture = shell.take_initial_vlan_capture();
        let previous = self.cache.snapshot();
        let fetched = fetch::fetch_inventory(&shell, &previous, initial_vlan_capture).await;

        match fetched {
            Ok(inventory) => {
                {
                    let _guard = self.mutation_lock.lock().await;
                    self.cache.publish(inventory);
                }
                let mut status = self
                    .refresh_status
                    .lock()
                    .expect("BUG: refresh status mutex poisoned");
                status.in_progress = false;
                status.last_refreshed = Some(Utc::now());
                status.error = None;
                Ok(())
            }
            Err(error) => {
                tracing::warn!(%error, "OLT refresh failed, keeping previous inventory");
                let mut status = self
                    .refresh_status
                    .lock()
                    .expect("BUG: refresh status mutex poisoned");
                status.in_progress = false;
                status.error = Some(error.to_string());
                Err(error)
            }
        }
    }

    /// Refresh only the ONU collections (autofind + bound + optical),
    /// coalesced so concurrent callers cannot interleave interface-mode
    /// entry and exit. Returns the resulting snapshot.
    pub async fn get_all_onu_data(self: Arc<Self>) -> Result<Arc<Inventory>, OltError> {
        let this = self.clone();
        self.data_flight
            .run(|| {
                async move { this.run_onu_data_fetch().await.map_err(|e| e.to_string()) }.boxed()
            })
            .await
            .map_err(OltError::Refresh)?;
        Ok(self.cache.snapshot())
    }

    async fn run_onu_data_fetch(&self) -> Result<(), OltError> {
        let shell = self.shell()?;
        let previous = self.cache.snapshot();
        let ports = if previous.gpon_ports.is_empty() {
            fetch::default_gpon_ports()
        } else {
            previous.gpon_ports.clone()
        };
        let (unbound, bound) = fetch::fetch_gpon_data(&shell, &ports, &previous).await?;

        let mut inventory = (*previous).clone();
        inventory.replace_onus(unbound, bound);

        let _guard = self.mutation_lock.lock().await;
        self.cache.publish(inventory);
        Ok(())
    }

    /// Background refresh every `interval`, skipping ticks while no device
    /// is connected. One task per process; refreshes still coalesce with
    /// operator-triggered ones through the singleflight.
    pub fn spawn_periodic_refresh(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // The first tick fires immediately; the operator connecting
            // already triggers a refresh, so swallow it.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if !self.is_connected() {
                    continue;
                }
                if let Err(error) = self.clone().refresh_all().await {
                    tracing::warn!(%error, "periodic refresh failed");
                }
            }
        })
    }
}
