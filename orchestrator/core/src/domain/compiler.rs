// Copyright (c) 2026 AE3GIS Authors
// SPDX-License-Identifier: AGPL-3.0

//! The Topology Compiler: a pure function from an authored [`Topology`] to a
//! [`LabDescriptor`] ready for the Descriptor Writer.
//!
//! Containers are collected into a flat arena keyed by a dense index rather
//! than threaded through nested `HashMap<NodeId, _>` lookups — per-container
//! working state (claimed interfaces, assigned IPs, synthesized routes) is
//! stored in `Vec`s indexed by that arena position instead of keyed maps.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::descriptor::{
    CompileOutput, CompileSkip, LabDescriptor, LinkDescriptor, NodeDescriptor, TopologyBlock,
    IMAGE_HOST, IMAGE_ROUTER,
};
use super::topology::{Connection, ContainerType, EndpointRef, NodeId, Topology};

/// Point-to-point address pool for cross-subnet router links.
const PTP_POOL_BASE: [u8; 3] = [10, 255, 0];

/// A container entry in the compiler's arena, indexed by `ContainerIdx`.
#[derive(Debug, Clone)]
struct ContainerEntry {
    id: NodeId,
    container_type: ContainerType,
    ip: Option<String>,
    subnet_cidr: String,
    prefix_len: String,
    /// Effective gateway for this container's subnet (may be auto-assigned).
    gateway: String,
}

type ContainerIdx = usize;

struct Arena {
    entries: Vec<ContainerEntry>,
    index: HashMap<NodeId, ContainerIdx>,
}

impl Arena {
    fn get(&self, id: &NodeId) -> Option<ContainerIdx> {
        self.index.get(id).copied()
    }
}

/// Builds the container arena and per-subnet/site gateway-router maps in one
/// pass over the topology tree.
fn build_arena(topology: &Topology) -> (Arena, HashMap<NodeId, ContainerIdx>, HashMap<NodeId, ContainerIdx>) {
    let mut entries = Vec::new();
    let mut index = HashMap::new();

    // Subnet id -> indices of its containers, in document order.
    let mut subnet_containers: HashMap<NodeId, Vec<ContainerIdx>> = HashMap::new();
    // Site id -> subnet ids, in document order (for site gateway fallback).
    let mut site_subnets: HashMap<NodeId, Vec<NodeId>> = HashMap::new();

    for site in &topology.sites {
        let mut subnet_ids = Vec::with_capacity(site.subnets.len());
        for subnet in &site.subnets {
            subnet_ids.push(subnet.id.clone());
            let mut idxs = Vec::with_capacity(subnet.containers.len());
            for container in &subnet.containers {
                let idx = entries.len();
                entries.push(ContainerEntry {
                    id: container.id.clone(),
                    container_type: container.container_type,
                    ip: container.ip.clone(),
                    subnet_cidr: subnet.cidr.clone(),
                    prefix_len: subnet.prefix_len().to_string(),
                    gateway: String::new(),
                });
                index.insert(container.id.clone(), idx);
                idxs.push(idx);
            }
            subnet_containers.insert(subnet.id.clone(), idxs);
        }
        site_subnets.insert(site.id.clone(), subnet_ids);
    }

    let mut arena = Arena { entries, index };

    // Elect a gateway router per subnet and compute the effective gateway.
    let mut gateway_router_map: HashMap<NodeId, ContainerIdx> = HashMap::new();

    for site in &topology.sites {
        for subnet in &site.subnets {
            let idxs = subnet_containers.get(&subnet.id).cloned().unwrap_or_default();
            let elected = elect_gateway(&arena, &idxs, subnet.gateway.as_deref());

            let effective_gateway = match &subnet.gateway {
                Some(gw) if !gw.is_empty() => Some(gw.clone()),
                _ => elected.and_then(|idx| arena.entries[idx].ip.clone()),
            };

            if let Some(idx) = elected {
                gateway_router_map.insert(subnet.id.clone(), idx);
            }
            for &idx in &idxs {
                arena.entries[idx].gateway = effective_gateway.clone().unwrap_or_default();
            }
        }
    }

    // Site id -> gateway router: first subnet (in document order) with an
    // elected gateway.
    let mut site_gateway_router_map: HashMap<NodeId, ContainerIdx> = HashMap::new();
    for (site_id, subnet_ids) in &site_subnets {
        for sid in subnet_ids {
            if let Some(&idx) = gateway_router_map.get(sid) {
                site_gateway_router_map.insert(site_id.clone(), idx);
                break;
            }
        }
    }

    (arena, gateway_router_map, site_gateway_router_map)
}

/// Among `containers`, prefer the router/firewall whose IP matches the
/// subnet's declared gateway; otherwise the first router/firewall in
/// document order; otherwise `None`.
fn elect_gateway(arena: &Arena, containers: &[ContainerIdx], declared_gateway: Option<&str>) -> Option<ContainerIdx> {
    let mut fallback = None;
    for &idx in containers {
        let entry = &arena.entries[idx];
        if !entry.container_type.is_gateway_capable() {
            continue;
        }
        if fallback.is_none() {
            fallback = Some(idx);
        }
        if let (Some(gw), Some(ip)) = (declared_gateway, entry.ip.as_deref()) {
            if gw == ip {
                return Some(idx);
            }
        }
    }
    fallback
}

fn eth_index(iface: &str) -> u32 {
    iface.strip_prefix("eth").and_then(|n| n.parse().ok()).unwrap_or(0)
}

/// Resolves a raw `EndpointRef` to an existing container in the arena.
fn resolve_endpoint(
    endpoint: &EndpointRef,
    arena: &Arena,
    gateway_router_map: &HashMap<NodeId, ContainerIdx>,
    site_gateway_router_map: &HashMap<NodeId, ContainerIdx>,
) -> Result<ContainerIdx, CompileSkip> {
    match endpoint {
        EndpointRef::Container(id) => arena
            .get(id)
            .ok_or_else(|| CompileSkip::ForeignConnectionEndpoint { raw_id: id.0.clone() }),
        EndpointRef::Subnet(id) => gateway_router_map
            .get(id)
            .copied()
            .ok_or_else(|| CompileSkip::UnresolvedEndpoint { raw_id: id.0.clone() }),
        EndpointRef::Site(id) => site_gateway_router_map
            .get(id)
            .copied()
            .ok_or_else(|| CompileSkip::UnresolvedEndpoint { raw_id: id.0.clone() }),
    }
}

/// The endpoint a connection actually resolves through: an explicit
/// container-id override takes priority over the declared `from`/`to` ref.
fn effective_from(conn: &Connection) -> EndpointRef {
    conn.from_container
        .clone()
        .map(EndpointRef::Container)
        .unwrap_or_else(|| conn.from.clone())
}

fn effective_to(conn: &Connection) -> EndpointRef {
    conn.to_container
        .clone()
        .map(EndpointRef::Container)
        .unwrap_or_else(|| conn.to.clone())
}

/// Per-container compiler working state, arena-indexed.
struct WorkingState {
    high_water: Vec<u32>,
    claimed: Vec<BTreeSet<String>>,
    home_iface: Vec<Option<String>>,
    iface_ips: Vec<BTreeMap<String, (String, String)>>,
    ptp_routes: Vec<Vec<(String, String)>>,
}

impl WorkingState {
    fn new(n: usize) -> Self {
        Self {
            high_water: vec![0; n],
            claimed: vec![BTreeSet::new(); n],
            home_iface: vec![None; n],
            iface_ips: vec![BTreeMap::new(); n],
            ptp_routes: vec![Vec::new(); n],
        }
    }

    fn preregister(&mut self, idx: ContainerIdx, iface: &str) {
        self.high_water[idx] = self.high_water[idx].max(eth_index(iface));
        self.claimed[idx].insert(iface.to_string());
    }

    /// Either the connection's explicit interface name, or the next
    /// available `ethN` on this container.
    fn claim_or_allocate(&mut self, idx: ContainerIdx, explicit: Option<&str>) -> String {
        match explicit {
            Some(name) => {
                self.preregister(idx, name);
                name.to_string()
            }
            None => {
                self.high_water[idx] += 1;
                let name = format!("eth{}", self.high_water[idx]);
                self.claimed[idx].insert(name.clone());
                name
            }
        }
    }
}

struct LinkRegistryEntry {
    from_idx: ContainerIdx,
    from_if: String,
    to_idx: ContainerIdx,
    to_if: String,
}

/// Iterates every connection across the topology in allocation order:
/// intra-subnet, then inter-subnet (site-scoped), then inter-site. This
/// ordering is what makes a container's own-subnet links claim the lowest
/// interface indices before any cross-subnet or cross-site link can.
fn walk_connections<'a>(topology: &'a Topology) -> impl Iterator<Item = &'a Connection> {
    let intra_subnet = topology
        .sites
        .iter()
        .flat_map(|site| site.subnets.iter())
        .flat_map(|subnet| subnet.connections.iter());
    let inter_subnet = topology.sites.iter().flat_map(|site| site.subnet_connections.iter());
    let inter_site = topology.site_connections.iter();
    intra_subnet.chain(inter_subnet).chain(inter_site)
}

/// Compiles an authored topology into a container-lab descriptor. Pure: the
/// compiler never fails — malformed references are dropped and recorded in
/// `CompileOutput::skips` instead of aborting the compilation.
pub fn compile(topology: &Topology, _topology_id: &str) -> CompileOutput {
    let (arena, gateway_router_map, site_gateway_router_map) = build_arena(topology);
    let mut state = WorkingState::new(arena.entries.len());
    let mut skips = Vec::new();

    // Pass 1: pre-register every explicitly named interface so automatic
    // allocation never collides with it, regardless of which scope it was
    // declared in.
    for conn in walk_connections(topology) {
        if let Ok(idx) = resolve_endpoint(&effective_from(conn), &arena, &gateway_router_map, &site_gateway_router_map) {
            if let Some(iface) = &conn.from_interface {
                state.preregister(idx, iface);
            }
        }
        if let Ok(idx) = resolve_endpoint(&effective_to(conn), &arena, &gateway_router_map, &site_gateway_router_map) {
            if let Some(iface) = &conn.to_interface {
                state.preregister(idx, iface);
            }
        }
    }

    // Pass 2: resolve each connection and, if both endpoints land on real
    // containers, allocate interfaces and register the link.
    let mut link_registry = Vec::new();
    let mut links = Vec::new();

    for conn in walk_connections(topology) {
        let from_idx = match resolve_endpoint(&effective_from(conn), &arena, &gateway_router_map, &site_gateway_router_map) {
            Ok(idx) => idx,
            Err(skip) => {
                skips.push(skip);
                continue;
            }
        };
        let to_idx = match resolve_endpoint(&effective_to(conn), &arena, &gateway_router_map, &site_gateway_router_map) {
            Ok(idx) => idx,
            Err(skip) => {
                skips.push(skip);
                continue;
            }
        };

        let from_if = state.claim_or_allocate(from_idx, conn.from_interface.as_deref());
        let to_if = state.claim_or_allocate(to_idx, conn.to_interface.as_deref());

        let from_id = arena.entries[from_idx].id.clone();
        let to_id = arena.entries[to_idx].id.clone();
        links.push(LinkDescriptor::new(from_id.as_str(), &from_if, to_id.as_str(), &to_if));
        link_registry.push(LinkRegistryEntry { from_idx, from_if, to_idx, to_if });
    }

    materialize_ips(&arena, &mut state, &link_registry);
    let nodes = synthesize_nodes(topology, &arena, &state);

    CompileOutput {
        descriptor: LabDescriptor {
            name: topology.effective_name().to_string(),
            topology: TopologyBlock { nodes, links },
        },
        skips,
    }
}

/// Allocates a same-subnet home IP or a cross-subnet PtP pair for every
/// link, and synthesizes the paired static routes for PtP links.
fn materialize_ips(arena: &Arena, state: &mut WorkingState, link_registry: &[LinkRegistryEntry]) {
    let mut ptp_seq: u32 = 0;

    for link in link_registry {
        let f = &arena.entries[link.from_idx];
        let t = &arena.entries[link.to_idx];
        let cross_subnet_router_link = f.subnet_cidr != t.subnet_cidr
            && f.container_type.is_gateway_capable()
            && t.container_type.is_gateway_capable();

        if cross_subnet_router_link {
            let b = 4 * ptp_seq;
            ptp_seq += 1;
            let from_ptp = format!("{}.{}.{}.{}", PTP_POOL_BASE[0], PTP_POOL_BASE[1], PTP_POOL_BASE[2], b + 1);
            let to_ptp = format!("{}.{}.{}.{}", PTP_POOL_BASE[0], PTP_POOL_BASE[1], PTP_POOL_BASE[2], b + 2);

            state.iface_ips[link.from_idx].insert(link.from_if.clone(), (from_ptp.clone(), "30".to_string()));
            state.iface_ips[link.to_idx].insert(link.to_if.clone(), (to_ptp.clone(), "30".to_string()));

            if !t.subnet_cidr.is_empty() {
                state.ptp_routes[link.from_idx].push((t.subnet_cidr.clone(), to_ptp));
            }
            if !f.subnet_cidr.is_empty() {
                state.ptp_routes[link.to_idx].push((f.subnet_cidr.clone(), from_ptp));
            }
        } else {
            if state.home_iface[link.from_idx].is_none() {
                if let Some(ip) = f.ip.clone() {
                    state.home_iface[link.from_idx] = Some(link.from_if.clone());
                    state.iface_ips[link.from_idx].insert(link.from_if.clone(), (ip, f.prefix_len.clone()));
                }
            }
            if state.home_iface[link.to_idx].is_none() {
                if let Some(ip) = t.ip.clone() {
                    state.home_iface[link.to_idx] = Some(link.to_if.clone());
                    state.iface_ips[link.to_idx].insert(link.to_if.clone(), (ip, t.prefix_len.clone()));
                }
            }
        }
    }
}

fn image_for(container: &super::topology::Container, container_type: ContainerType) -> String {
    if let Some(image) = &container.image {
        return image.clone();
    }
    if container_type.is_gateway_capable() {
        IMAGE_ROUTER.to_string()
    } else {
        IMAGE_HOST.to_string()
    }
}

/// Synthesizes boot commands for every container in document order, one
/// strategy per container type.
fn synthesize_nodes(topology: &Topology, arena: &Arena, state: &WorkingState) -> BTreeMap<String, NodeDescriptor> {
    let mut nodes = BTreeMap::new();

    for container in topology.containers() {
        let idx = match arena.get(&container.id) {
            Some(idx) => idx,
            None => continue,
        };
        let entry = &arena.entries[idx];
        let mut ifaces: Vec<String> = state.claimed[idx].iter().cloned().collect();
        ifaces.sort_by_key(|s| eth_index(s));

        let mut exec = Vec::new();

        match entry.container_type {
            ContainerType::Switch => synth_switch(entry, &ifaces, &mut exec),
            ContainerType::Router | ContainerType::Firewall => {
                synth_router(entry, idx, &ifaces, state, &mut exec)
            }
            _ => synth_host(entry, idx, &ifaces, state, &mut exec),
        }

        let mut node = NodeDescriptor::new(image_for(container, entry.container_type));
        node.exec = exec;
        nodes.insert(container.id.0.clone(), node);
    }

    nodes
}

fn synth_switch(entry: &ContainerEntry, ifaces: &[String], exec: &mut Vec<String>) {
    if ifaces.is_empty() {
        return;
    }
    let iface_list = ifaces.join(" ");
    exec.push(format!(
        "sh -lc 'for i in {iface_list}; do ip link set \"$i\" up >/dev/null 2>&1 || true; done; \
         ip link show br0 >/dev/null 2>&1 || ip link add br0 type bridge || true; \
         for i in {iface_list}; do ip link set \"$i\" master br0 >/dev/null 2>&1 || true; done; \
         ip link set br0 up >/dev/null 2>&1 || true'"
    ));
    if let Some(ip) = &entry.ip {
        let first_iface = &ifaces[0];
        exec.push(format!(
            "sh -lc 'ip addr replace {ip}/{pfx} dev br0 >/dev/null 2>&1 || \
             ip addr replace {ip}/{pfx} dev {first_iface} >/dev/null 2>&1 || true'",
            pfx = entry.prefix_len,
        ));
    }
}

fn synth_router(entry: &ContainerEntry, idx: ContainerIdx, ifaces: &[String], state: &WorkingState, exec: &mut Vec<String>) {
    exec.push("sysctl -w net.ipv4.ip_forward=1".to_string());
    for iface in ifaces {
        if let Some((ip, pfx)) = state.iface_ips[idx].get(iface) {
            exec.push(format!("ip addr add {ip}/{pfx} dev {iface}"));
        }
    }
    for (dest_cidr, via_ip) in &state.ptp_routes[idx] {
        exec.push(format!("ip route add {dest_cidr} via {via_ip}"));
    }
    let _ = entry;
}

fn synth_host(entry: &ContainerEntry, idx: ContainerIdx, ifaces: &[String], state: &WorkingState, exec: &mut Vec<String>) {
    if let Some(ip) = &entry.ip {
        if !ifaces.is_empty() {
            let target_iface = state.home_iface[idx].clone().unwrap_or_else(|| ifaces[0].clone());
            exec.push(format!("ip addr add {ip}/{pfx} dev {target_iface}", pfx = entry.prefix_len));
        }
    }
    if !entry.gateway.is_empty() {
        exec.push(format!("ip route replace default via {}", entry.gateway));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::topology::{Container, Site, Subnet};

    fn container(id: &str, name: &str, ty: ContainerType, ip: &str) -> Container {
        Container {
            id: NodeId::new(id),
            name: name.to_string(),
            container_type: ty,
            ip: Some(ip.to_string()),
            image: None,
            persist_paths: Vec::new(),
        }
    }

    fn conn_containers(from: &str, to: &str) -> Connection {
        Connection {
            from: EndpointRef::Container(NodeId::new(from)),
            to: EndpointRef::Container(NodeId::new(to)),
            label: None,
            from_interface: None,
            to_interface: None,
            from_container: None,
            to_container: None,
        }
    }

    /// S1 — two hosts behind one router, fully auto-wired.
    #[test]
    fn s1_two_host_lan_one_router() {
        let topology = Topology {
            name: None,
            sites: vec![Site {
                id: NodeId::new("site1"),
                name: "Site".into(),
                location: None,
                position: None,
                subnets: vec![Subnet {
                    id: NodeId::new("subnet1"),
                    name: "LAN".into(),
                    cidr: "10.0.0.0/24".into(),
                    gateway: Some("10.0.0.1".into()),
                    containers: vec![
                        container("R", "router", ContainerType::Router, "10.0.0.1"),
                        container("A", "host-a", ContainerType::Workstation, "10.0.0.10"),
                        container("B", "host-b", ContainerType::Workstation, "10.0.0.11"),
                    ],
                    connections: vec![conn_containers("A", "R"), conn_containers("B", "R")],
                }],
                subnet_connections: vec![],
            }],
            site_connections: vec![],
        };

        let out = compile(&topology, "topo-1");
        assert!(out.skips.is_empty());

        let r = &out.descriptor.topology.nodes["R"];
        assert!(r.exec.contains(&"sysctl -w net.ipv4.ip_forward=1".to_string()));
        assert!(r.exec.contains(&"ip addr add 10.0.0.1/24 dev eth1".to_string()));

        let a = &out.descriptor.topology.nodes["A"];
        assert_eq!(
            a.exec,
            vec![
                "ip addr add 10.0.0.10/24 dev eth1".to_string(),
                "ip route replace default via 10.0.0.1".to_string(),
            ]
        );

        let b = &out.descriptor.topology.nodes["B"];
        assert_eq!(
            b.exec,
            vec![
                "ip addr add 10.0.0.11/24 dev eth1".to_string(),
                "ip route replace default via 10.0.0.1".to_string(),
            ]
        );

        assert_eq!(out.descriptor.topology.links.len(), 2);
    }

    /// S2 — cross-subnet via PtP, connected at site scope by subnet ids.
    #[test]
    fn s2_cross_subnet_via_ptp() {
        let topology = Topology {
            name: None,
            sites: vec![Site {
                id: NodeId::new("site1"),
                name: "Site".into(),
                location: None,
                position: None,
                subnets: vec![
                    Subnet {
                        id: NodeId::new("subnetA"),
                        name: "A".into(),
                        cidr: "10.0.0.0/24".into(),
                        gateway: Some("10.0.0.1".into()),
                        containers: vec![container("R1", "r1", ContainerType::Router, "10.0.0.1")],
                        connections: vec![],
                    },
                    Subnet {
                        id: NodeId::new("subnetB"),
                        name: "B".into(),
                        cidr: "10.1.0.0/24".into(),
                        gateway: Some("10.1.0.1".into()),
                        containers: vec![container("R2", "r2", ContainerType::Router, "10.1.0.1")],
                        connections: vec![],
                    },
                ],
                subnet_connections: vec![Connection {
                    from: EndpointRef::Subnet(NodeId::new("subnetA")),
                    to: EndpointRef::Subnet(NodeId::new("subnetB")),
                    label: None,
                    from_interface: None,
                    to_interface: None,
                    from_container: None,
                    to_container: None,
                }],
            }],
            site_connections: vec![],
        };

        let out = compile(&topology, "topo-2");
        assert!(out.skips.is_empty());

        let r1 = &out.descriptor.topology.nodes["R1"];
        assert_eq!(
            r1.exec,
            vec![
                "sysctl -w net.ipv4.ip_forward=1".to_string(),
                "ip addr add 10.255.0.1/30 dev eth1".to_string(),
                "ip route add 10.1.0.0/24 via 10.255.0.2".to_string(),
            ]
        );

        let r2 = &out.descriptor.topology.nodes["R2"];
        assert_eq!(
            r2.exec,
            vec![
                "sysctl -w net.ipv4.ip_forward=1".to_string(),
                "ip addr add 10.255.0.2/30 dev eth1".to_string(),
                "ip route add 10.0.0.0/24 via 10.255.0.1".to_string(),
            ]
        );

        assert_eq!(out.descriptor.topology.links[0].endpoints, ["R1:eth1".to_string(), "R2:eth1".to_string()]);
    }

    /// S3 — switch bridging three hosts, no default route (gateway unset).
    #[test]
    fn s3_switch_bridging_three_hosts() {
        let mut sw = container("SW", "switch", ContainerType::Switch, "");
        sw.ip = None;

        let topology = Topology {
            name: None,
            sites: vec![Site {
                id: NodeId::new("site1"),
                name: "Site".into(),
                location: None,
                position: None,
                subnets: vec![Subnet {
                    id: NodeId::new("subnet1"),
                    name: "LAN".into(),
                    cidr: "10.0.0.0/24".into(),
                    gateway: None,
                    containers: vec![
                        sw,
                        container("X", "x", ContainerType::Workstation, "10.0.0.10"),
                        container("Y", "y", ContainerType::Workstation, "10.0.0.11"),
                        container("Z", "z", ContainerType::Workstation, "10.0.0.12"),
                    ],
                    connections: vec![
                        conn_containers("X", "SW"),
                        conn_containers("Y", "SW"),
                        conn_containers("Z", "SW"),
                    ],
                }],
                subnet_connections: vec![],
            }],
            site_connections: vec![],
        };

        let out = compile(&topology, "topo-3");
        assert!(out.skips.is_empty());

        let sw = &out.descriptor.topology.nodes["SW"];
        assert_eq!(sw.exec.len(), 1);
        assert!(sw.exec[0].contains("br0"));
        assert!(sw.exec[0].contains("eth1 eth2 eth3"));

        let x = &out.descriptor.topology.nodes["X"];
        assert_eq!(x.exec, vec!["ip addr add 10.0.0.10/24 dev eth1".to_string()]);
    }

    #[test]
    fn compile_is_byte_stable() {
        let topology = Topology {
            name: Some("lab".into()),
            sites: vec![Site {
                id: NodeId::new("site1"),
                name: "Site".into(),
                location: None,
                position: None,
                subnets: vec![Subnet {
                    id: NodeId::new("subnet1"),
                    name: "LAN".into(),
                    cidr: "10.0.0.0/24".into(),
                    gateway: Some("10.0.0.1".into()),
                    containers: vec![
                        container("R", "router", ContainerType::Router, "10.0.0.1"),
                        container("A", "host-a", ContainerType::Workstation, "10.0.0.10"),
                    ],
                    connections: vec![conn_containers("A", "R")],
                }],
                subnet_connections: vec![],
            }],
            site_connections: vec![],
        };

        let first = compile(&topology, "topo-stable").descriptor.to_yaml().unwrap();
        let second = compile(&topology, "topo-stable").descriptor.to_yaml().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn unresolved_endpoint_is_skipped_not_fatal() {
        let topology = Topology {
            name: None,
            sites: vec![Site {
                id: NodeId::new("site1"),
                name: "Site".into(),
                location: None,
                position: None,
                subnets: vec![Subnet {
                    id: NodeId::new("subnet1"),
                    name: "LAN".into(),
                    cidr: "10.0.0.0/24".into(),
                    gateway: None,
                    containers: vec![container("A", "a", ContainerType::Workstation, "10.0.0.10")],
                    connections: vec![conn_containers("A", "ghost")],
                }],
                subnet_connections: vec![],
            }],
            site_connections: vec![],
        };

        let out = compile(&topology, "topo-4");
        assert_eq!(out.skips.len(), 1);
        assert!(out.descriptor.topology.links.is_empty());
        assert!(out.descriptor.topology.nodes.contains_key("A"));
    }
}
