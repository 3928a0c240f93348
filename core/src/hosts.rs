//! Hosts table rendering for node-to-node name resolution.
//!
//! Every node container receives the same table: one line per live node
//! followed by the standard loopback and link-local entries.

use crate::runtime::ContainerDetails;

/// Loopback and IPv6 link-local entries appended after the node lines.
pub const DEFAULT_HOSTS: &[&str] = &[
    "127.0.0.1       localhost",
    "::1     localhost ip6-localhost ip6-loopback",
    "fe00::0 ip6-localnet",
    "ff00::0 ip6-mcastprefix",
    "ff02::1 ip6-allnodes",
    "ff02::2 ip6-allrouters",
];

/// Path of the hosts file inside a container.
pub const HOSTS_PATH: &str = "/etc/hosts";

/// One `address name id` line of the hosts table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEntry {
    pub address: String,
    pub name: String,
    pub id: String,
}

impl HostEntry {
    /// Build an entry from inspected container details.
    ///
    /// Returns `None` when the container has no address on any network.
    pub fn from_details(details: &ContainerDetails) -> Option<Self> {
        let address = details.ip_address.as_deref().filter(|ip| !ip.is_empty())?;
        Some(Self {
            address: address.to_string(),
            name: details.name.clone(),
            id: details.id.clone(),
        })
    }
}

/// Generate /etc/hosts content for the given node entries.
pub fn generate_hosts_table(entries: &[HostEntry]) -> String {
    let mut lines: Vec<String> = entries
        .iter()
        .map(|e| format!("{} {} {}", e.address, e.name, e.id))
        .collect();
    lines.extend(DEFAULT_HOSTS.iter().map(|s| s.to_string()));
    lines.join("\n") + "\n"
}

/// Shell command that overwrites the hosts file with `table`.
///
/// The table is passed as a positional argument so no quoting of its
/// content is needed.
pub fn write_hosts_command(table: &str) -> Vec<String> {
    vec![
        "sh".to_string(),
        "-c".to_string(),
        format!("printf '%s' \"$1\" > {HOSTS_PATH}"),
        "nodestack".to_string(),
        table.to_string(),
    ]
}
