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

//! In-memory projection of the OLT's state.
//!
//! Readers get immutable snapshots; writers build a whole new [`Inventory`]
//! and swap it in, so nobody ever observes a half-applied refresh.

use std::collections::BTreeMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use model::olt_info::OltInfo;
use model::onu::{BoundOnu, MAX_ONU_ID, UnboundOnu};
use model::port::GponPort;
use model::profile::{LineProfile, ServiceProfile, Tr069Profile};
use model::vlan::Vlan;

/// One consistent view of the device. Invariants:
/// a serial number appears in at most one of the unbound/bound sets, and
/// each (port, onu id) pair maps to at most one bound ONU.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    pub olt_info: Option<OltInfo>,
    pub unbound_by_serial: BTreeMap<String, UnboundOnu>,
    pub bound_by_key: BTreeMap<(GponPort, u8), BoundOnu>,
    pub(crate) bound_serial_index: BTreeMap<String, (GponPort, u8)>,
    pub line_profiles: Vec<LineProfile>,
    pub service_profiles: Vec<ServiceProfile>,
    pub vlans: Vec<Vlan>,
    pub tr069_profiles: Vec<Tr069Profile>,
    pub gpon_ports: Vec<GponPort>,
}

impl Inventory {
    /// Insert a bound ONU, evicting any autofind entry with the same serial
    /// so the serial-uniqueness invariant holds.
    pub fn insert_bound(&mut self, onu: BoundOnu) {
        let serial = onu.serial_number.as_str().to_string();
        self.unbound_by_serial.remove(&serial);
        self.bound_serial_index.insert(serial, onu.key());
        self.bound_by_key.insert(onu.key(), onu);
    }

    /// Insert an autofind entry unless its serial is already bound.
    pub fn insert_unbound(&mut self, onu: UnboundOnu) {
        let serial = onu.serial_number.as_str().to_string();
        if self.bound_serial_index.contains_key(&serial) {
            return;
        }
        self.unbound_by_serial.insert(serial, onu);
    }

    pub fn remove_bound(&mut self, port: GponPort, onu_id: u8) -> Option<BoundOnu> {
        let onu = self.bound_by_key.remove(&(port, onu_id))?;
        self.bound_serial_index.remove(onu.serial_number.as_str());
        Some(onu)
    }

    pub fn bound_by_serial(&self, serial: &str) -> Option<&BoundOnu> {
        let key = self.bound_serial_index.get(serial)?;
        self.bound_by_key.get(key)
    }

    /// Replace both ONU collections, e.g. after a GPON-only data fetch.
    pub fn replace_onus(&mut self, unbound: Vec<UnboundOnu>, bound: Vec<BoundOnu>) {
        self.unbound_by_serial.clear();
        self.bound_by_key.clear();
        self.bound_serial_index.clear();
        for onu in bound {
            self.insert_bound(onu);
        }
        for onu in unbound {
            self.insert_unbound(onu);
        }
    }

    /// The lowest ONU id in 0..=127 unused on `port`.
    pub fn next_free_onu_id(&self, port: GponPort) -> Option<u8> {
        (0..=MAX_ONU_ID).find(|id| !self.bound_by_key.contains_key(&(port, *id)))
    }

    pub fn line_profile(&self, id: u16) -> Option<&LineProfile> {
        self.line_profiles.iter().find(|p| p.id == id)
    }

    pub fn service_profile(&self, id: u16) -> Option<&ServiceProfile> {
        self.service_profiles.iter().find(|p| p.id == id)
    }

    pub fn vlan(&self, id: u16) -> Option<&Vlan> {
        self.vlans.iter().find(|v| v.id == id)
    }

    pub fn tr069_profile_by_name(&self, name: &str) -> Option<&Tr069Profile> {
        self.tr069_profiles.iter().find(|p| p.name == name)
    }

    pub fn mark_vlan_in_use(&mut self, id: u16) {
        if let Some(vlan) = self.vlans.iter_mut().find(|v| v.id == id) {
            vlan.in_use = true;
        }
    }
}

/// Publication point: whole-structure swap, readers never block writers.
#[derive(Default)]
pub struct InventoryCache {
    current: ArcSwap<Inventory>,
}

impl InventoryCache {
    pub fn snapshot(&self) -> Arc<Inventory> {
        self.current.load_full()
    }

    pub fn publish(&self, inventory: Inventory) {
        self.current.store(Arc::new(inventory));
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use model::onu::{OnuConfigState, RunStatus};

    use super::*;

    fn port(s: &str) -> GponPort {
        s.parse().unwrap()
    }

    fn bound(port_s: &str, onu_id: u8, serial: &str) -> BoundOnu {
        let port = port(port_s);
        BoundOnu {
            id: BoundOnu::synthetic_id(port, onu_id),
            serial_number: serial.parse().unwrap(),
            port,
            onu_id,
            description: String::new(),
            line_profile_id: 10,
            service_profile_id: 20,
            run_status: RunStatus::Online,
            config_state: OnuConfigState::Normal,
            rx_power: None,
            tx_power: None,
            distance: None,
            vlan_id: None,
            management_vlan_id: None,
            gemport_id: None,
            bound_at: Utc::now(),
            pppoe: None,
            wifi: None,
            tr069_profile: None,
            onu_type: None,
        }
    }

    fn unbound(port_s: &str, serial: &str) -> UnboundOnu {
        UnboundOnu {
            serial_number: serial.parse().unwrap(),
            port: port(port_s),
            equipment_id: "HG8310M".to_string(),
            software_version: None,
            discovered_at: None,
            password: None,
        }
    }

    #[test]
    fn next_free_id_scans_from_zero() {
        let mut inventory = Inventory::default();
        let p = port("0/1/0");
        assert_eq!(inventory.next_free_onu_id(p), Some(0));

        for id in [0u8, 1, 3] {
            inventory.insert_bound(bound("0/1/0", id, &format!("485754430A1B2C{id:02X}")));
        }
        assert_eq!(inventory.next_free_onu_id(p), Some(2));

        // Ids on other ports do not count.
        assert_eq!(inventory.next_free_onu_id(port("0/1/1")), Some(0));
    }

    #[test]
    fn next_free_id_exhausts_at_128() {
        let mut inventory = Inventory::default();
        for id in 0..=MAX_ONU_ID {
            inventory.insert_bound(bound("0/1/0", id, &format!("48575443000000{id:02X}")));
        }
        assert_eq!(inventory.next_free_onu_id(port("0/1/0")), None);
    }

    #[test]
    fn serial_unique_across_bound_and_unbound() {
        let mut inventory = Inventory::default();
        inventory.insert_unbound(unbound("0/1/0", "485754430A1B2C3D"));
        assert!(inventory.unbound_by_serial.contains_key("485754430A1B2C3D"));

        inventory.insert_bound(bound("0/1/0", 0, "485754430A1B2C3D"));
        assert!(!inventory.unbound_by_serial.contains_key("485754430A1B2C3D"));
        assert!(inventory.bound_by_serial("485754430A1B2C3D").is_some());

        // While bound, a re-discovered serial is not readmitted.
        inventory.insert_unbound(unbound("0/1/0", "485754430A1B2C3D"));
        assert!(inventory.unbound_by_serial.is_empty());

        // After removal it is.
        inventory.remove_bound(port("0/1/0"), 0);
        assert!(inventory.bound_by_serial("485754430A1B2C3D").is_none());
        inventory.insert_unbound(unbound("0/1/0", "485754430A1B2C3D"));
        assert!(inventory.unbound_by_serial.contains_key("485754430A1B2C3D"));
    }

    #[test]
    fn snapshots_are_immutable_views() {
        let cache = InventoryCache::default();
        let before = cache.snapshot();

        let mut next = (*before).clone();
        next.insert_unbound(unbound("0/1/0", "485754430A1B2C3D"));
        cache.publish(next);

        assert!(before.unbound_by_serial.is_empty());
        assert_eq!(cache.snapshot().unbound_by_serial.len(), 1);
    }
}
