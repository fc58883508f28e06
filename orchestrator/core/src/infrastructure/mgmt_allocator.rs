// Copyright (c) 2026 AE3GIS Authors
// SPDX-License-Identifier: AGPL-3.0

//! Deterministic management-network naming and addressing for a topology
//! deploy attempt. Pure function of `(topology_id, attempt)`; the Lab
//! Driver calls this once per retry when the engine reports a subnet
//! overlap, advancing `attempt` each time.

const SLOT_COUNT: u32 = 64 * 256;
const SLOT_STRIDE: u32 = 9973;

/// The management network identity for one deploy attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagementNetwork {
    pub name: String,
    pub ipv4_subnet: String,
    pub ipv6_subnet: String,
}

/// First 8 hex characters of `topology_id`, interpreted as a base-16
/// integer. Non-hex topology ids hash to the same 32-bit space via their
/// UTF-8 bytes so the allocator never panics on an unexpected id shape.
fn id_seed(topology_id: &str) -> u32 {
    let hex8: String = topology_id.chars().filter(|c| c.is_ascii_hexdigit()).take(8).collect();
    if hex8.len() == 8 {
        u32::from_str_radix(&hex8, 16).unwrap_or_else(|_| fnv1a(topology_id))
    } else {
        fnv1a(topology_id)
    }
}

fn fnv1a(input: &str) -> u32 {
    let mut hash: u32 = 0x811c9dc5;
    for byte in input.bytes() {
        hash ^= u32::from(byte);
        hash = hash.wrapping_mul(0x0100_0193);
    }
    hash
}

fn id8(topology_id: &str) -> String {
    let hex8: String = topology_id.chars().filter(|c| c.is_ascii_hexdigit()).take(8).collect();
    if hex8.len() == 8 {
        hex8
    } else {
        format!("{:08x}", fnv1a(topology_id))
    }
}

/// Computes the management network for `topology_id` at retry `attempt`
/// (0-based). The slot advances by a fixed stride co-prime with the slot
/// count, so all `SLOT_COUNT` slots are visited before any repeat.
pub fn allocate(topology_id: &str, attempt: u32) -> ManagementNetwork {
    let seed = id_seed(topology_id);
    let base_slot = seed % SLOT_COUNT;
    let slot = (base_slot + attempt.wrapping_mul(SLOT_STRIDE)) % SLOT_COUNT;

    let second_octet = 64 + (slot / 256);
    let third_octet = slot % 256;

    ManagementNetwork {
        name: format!("ae3gis-mgmt-{}", id8(topology_id)),
        ipv4_subnet: format!("100.{second_octet}.{third_octet}.0/24"),
        ipv6_subnet: format!("3fff:100:{slot:04x}::/64"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_attempts_yield_four_distinct_v4_subnets() {
        let subnets: std::collections::HashSet<_> =
            (0..4).map(|attempt| allocate("deadbeef0123", attempt).ipv4_subnet).collect();
        assert_eq!(subnets.len(), 4);
    }

    #[test]
    fn every_subnet_falls_within_the_carrier_grade_nat_block() {
        for attempt in 0..4 {
            let net = allocate("deadbeef0123", attempt);
            let second_octet: u32 = net
                .ipv4_subnet
                .split('.')
                .nth(1)
                .unwrap()
                .parse()
                .unwrap();
            assert!((64..=127).contains(&second_octet), "second octet {second_octet} out of 100.64.0.0/10");
        }
    }

    #[test]
    fn allocation_is_deterministic() {
        assert_eq!(allocate("deadbeef0123", 2), allocate("deadbeef0123", 2));
    }

    #[test]
    fn network_name_uses_first_eight_hex_chars() {
        let net = allocate("deadbeef-0123-4567", 0);
        assert_eq!(net.name, "ae3gis-mgmt-deadbeef");
    }
}
