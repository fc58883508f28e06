// Copyright (c) 2026 AE3GIS Authors
// SPDX-License-Identifier: AGPL-3.0

//! Integration-level checks of the cross-cutting properties that hold for
//! any valid topology, rather than the literal-value scenarios already
//! pinned down by the compiler's own unit tests.

use ae3gis_orchestrator_core::domain::compiler::compile;
use ae3gis_orchestrator_core::domain::topology::{
    Connection, Container, ContainerType, EndpointRef, NodeId, Site, Subnet, Topology,
};
use ae3gis_orchestrator_core::infrastructure::mgmt_allocator;

/// A two-host LAN behind one router, one subnet-to-subnet PtP hop away from
/// a second LAN. Exercises gateway election, PtP addressing, and boot
/// command synthesis across two subnets in one site.
fn two_lan_topology() -> Topology {
    let lan_a = Subnet {
        id: NodeId::new("subnet-a"),
        name: "lan-a".to_string(),
        cidr: "10.0.0.0/24".to_string(),
        gateway: None,
        containers: vec![
            Container {
                id: NodeId::new("router-a"),
                name: "router-a".to_string(),
                container_type: ContainerType::Router,
                ip: Some("10.0.0.1".to_string()),
                image: None,
                persist_paths: Vec::new(),
            },
            Container {
                id: NodeId::new("host-a1"),
                name: "host-a1".to_string(),
                container_type: ContainerType::Workstation,
                ip: Some("10.0.0.10".to_string()),
                image: None,
                persist_paths: Vec::new(),
            },
        ],
        connections: vec![Connection {
            from: EndpointRef::Container(NodeId::new("router-a")),
            to: EndpointRef::Container(NodeId::new("host-a1")),
            label: None,
            from_interface: None,
            to_interface: None,
            from_container: None,
            to_container: None,
        }],
    };

    let lan_b = Subnet {
        id: NodeId::new("subnet-b"),
        name: "lan-b".to_string(),
        cidr: "10.0.1.0/24".to_string(),
        gateway: None,
        containers: vec![
            Container {
                id: NodeId::new("router-b"),
                name: "router-b".to_string(),
                container_type: ContainerType::Router,
                ip: Some("10.0.1.1".to_string()),
                image: None,
                persist_paths: Vec::new(),
            },
            Container {
                id: NodeId::new("host-b1"),
                name: "host-b1".to_string(),
                container_type: ContainerType::Workstation,
                ip: Some("10.0.1.10".to_string()),
                image: None,
                persist_paths: Vec::new(),
            },
        ],
        connections: vec![Connection {
            from: EndpointRef::Container(NodeId::new("router-b")),
            to: EndpointRef::Container(NodeId::new("host-b1")),
            label: None,
            from_interface: None,
            to_interface: None,
            from_container: None,
            to_container: None,
        }],
    };

    Topology {
        name: Some("two-lan".to_string()),
        sites: vec![Site {
            id: NodeId::new("site-1"),
            name: "site-1".to_string(),
            location: None,
            position: None,
            subnets: vec![lan_a, lan_b],
            subnet_connections: vec![Connection {
                from: EndpointRef::Subnet(NodeId::new("subnet-a")),
                to: EndpointRef::Subnet(NodeId::new("subnet-b")),
                label: None,
                from_interface: None,
                to_interface: None,
                from_container: None,
                to_container: None,
            }],
        }],
        site_connections: Vec::new(),
    }
}

/// Every link endpoint names a node id that actually exists in the
/// compiled node map.
#[test]
fn every_link_endpoint_resolves_to_a_known_node() {
    let topology = two_lan_topology();
    let output = compile(&topology, "inv-1");

    for link in &output.descriptor.topology.links {
        for endpoint in &link.endpoints {
            let node_id = endpoint.split(':').next().unwrap();
            assert!(
                output.descriptor.topology.nodes.contains_key(node_id),
                "link endpoint {endpoint} references unknown node {node_id}"
            );
        }
    }
}

/// Every interface a link names for a container shows up in that
/// container's boot commands, either as an address assignment or a bridge
/// enslavement.
#[test]
fn every_link_interface_is_configured_in_boot_commands() {
    let topology = two_lan_topology();
    let output = compile(&topology, "inv-2");

    for link in &output.descriptor.topology.links {
        for endpoint in &link.endpoints {
            let (node_id, iface) = endpoint.split_once(':').unwrap();
            let Some(node) = output.descriptor.topology.nodes.get(node_id) else {
                continue;
            };
            let mentions_iface = node.exec.iter().any(|cmd| cmd.contains(iface));
            assert!(mentions_iface, "node {node_id} never configures its {iface} interface: {:?}", node.exec);
        }
    }
}

/// Two routers bridging subnets each carry a `route add` for the other
/// side's CIDR via their shared point-to-point peer.
#[test]
fn gateways_carry_routes_to_each_others_subnet() {
    let topology = two_lan_topology();
    let output = compile(&topology, "inv-3");

    let router_a = &output.descriptor.topology.nodes["router-a"];
    let router_b = &output.descriptor.topology.nodes["router-b"];

    let has_route_to = |node: &ae3gis_orchestrator_core::domain::descriptor::NodeDescriptor, cidr: &str| {
        node.exec.iter().any(|cmd| cmd.contains("route add") && cmd.contains(cidr))
    };

    assert!(has_route_to(router_a, "10.0.1.0/24"), "router-a exec: {:?}", router_a.exec);
    assert!(has_route_to(router_b, "10.0.0.0/24"), "router-b exec: {:?}", router_b.exec);
}

/// Hosts in a subnet with an elected gateway finish their boot commands
/// with a default route through it.
#[test]
fn hosts_get_a_default_route_through_their_gateway() {
    let topology = two_lan_topology();
    let output = compile(&topology, "inv-4");

    let host_a1 = &output.descriptor.topology.nodes["host-a1"];
    assert_eq!(host_a1.exec.last().map(String::as_str), Some("ip route replace default via 10.0.0.1"));

    let host_b1 = &output.descriptor.topology.nodes["host-b1"];
    assert_eq!(host_b1.exec.last().map(String::as_str), Some("ip route replace default via 10.0.1.1"));
}

/// Compiling the same topology twice produces byte-identical YAML.
#[test]
fn compilation_is_byte_stable_across_invocations() {
    let topology = two_lan_topology();
    let first = compile(&topology, "inv-5").descriptor.to_yaml().unwrap();
    let second = compile(&topology, "inv-5").descriptor.to_yaml().unwrap();
    assert_eq!(first, second);
}

/// The management allocator visits four distinct /24s within the shared
/// address space across four consecutive overlap-retry attempts, the
/// sequence the Lab Driver walks on repeated overlap errors.
#[test]
fn management_allocator_yields_four_distinct_subnets_on_retry() {
    let topology_id = "deadbeefcafefeed";
    let subnets: Vec<String> =
        (0..4).map(|attempt| mgmt_allocator::allocate(topology_id, attempt).ipv4_subnet).collect();

    for subnet in &subnets {
        assert!(subnet.starts_with("100."), "management subnet {subnet} escapes 100.64.0.0/10");
    }

    let mut unique = subnets.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), 4, "expected four distinct subnets, got {subnets:?}");
}
