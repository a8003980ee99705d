//! Best-effort address lookup for a node name
//!
//! Purely informational: the result never takes part in classification and
//! every failure is swallowed.

use std::net::{IpAddr, ToSocketAddrs};

use tracing::debug;

/// Resolve `node_name` through the system resolver, once.
///
/// Returns the distinct addresses in sorted order, or an empty list.
pub fn lookup_addresses(node_name: &str) -> Vec<IpAddr> {
    if node_name.is_empty() {
        return Vec::new();
    }

    match (node_name, 0).to_socket_addrs() {
        Ok(addrs) => {
            let mut ips: Vec<IpAddr> = addrs.map(|addr| addr.ip()).collect();
            ips.sort();
            ips.dedup();
            debug!(node = %node_name, addresses = ?ips, "Resolved node addresses");
            ips
        }
        Err(err) => {
            debug!(node = %node_name, error = %err, "Address lookup failed");
            Vec::new()
        }
    }
}
