//! Device fingerprints derived from a caller's network address.
//!
//! The core only depends on [`FingerprintResolver`]; how an address becomes a
//! fingerprint is up to the implementation. On a local network the ARP table
//! is the practical source: it maps the caller's IP to its hardware address.

use async_trait::async_trait;
use regex::Regex;
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::LazyLock;
use tokio::process::Command;
use util::config;

static MAC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:[0-9A-Fa-f]{2}[:-]){5}[0-9A-Fa-f]{2}").expect("valid MAC regex")
});

#[async_trait]
pub trait FingerprintResolver: Send + Sync {
    /// `None` when the address cannot be tied to a device.
    async fn resolve(&self, ip: IpAddr) -> Option<String>;
}

/// IPv4-mapped IPv6 addresses (`::ffff:a.b.c.d`) become plain IPv4.
pub fn normalize_ip(ip: IpAddr) -> IpAddr {
    match ip {
        IpAddr::V6(v6) => v6
            .to_ipv4_mapped()
            .map(IpAddr::V4)
            .unwrap_or(IpAddr::V6(v6)),
        v4 => v4,
    }
}

/// Finds the hardware address on the `arp -a` line that mentions `ip`.
///
/// Handles both the BSD/Linux form `? (10.0.0.5) at aa:bb:...` and the
/// Windows table form `10.0.0.5   aa-bb-...   dynamic`.
pub fn parse_arp_output(output: &str, ip: &str) -> Option<String> {
    output
        .lines()
        .filter(|line| {
            line.split(|c: char| c.is_whitespace() || c == '(' || c == ')')
                .any(|tok| tok == ip)
        })
        .find_map(|line| MAC_RE.find(line).map(|m| m.as_str().to_owned()))
}

/// Resolves fingerprints from the host ARP table.
pub struct ArpFingerprintResolver {
    loopback_fingerprint: String,
}

impl ArpFingerprintResolver {
    pub fn new(loopback_fingerprint: impl Into<String>) -> Self {
        Self {
            loopback_fingerprint: loopback_fingerprint.into(),
        }
    }

    pub fn from_config() -> Self {
        Self::new(config::loopback_fingerprint())
    }
}

#[async_trait]
impl FingerprintResolver for ArpFingerprintResolver {
    async fn resolve(&self, ip: IpAddr) -> Option<String> {
        let ip = normalize_ip(ip);
        if ip.is_loopback() {
            return Some(self.loopback_fingerprint.clone());
        }

        let ip = ip.to_string();
        let output = match Command::new("arp").arg("-a").arg(&ip).output().await {
            Ok(out) => out,
            Err(e) => {
                tracing::warn!(%ip, "arp lookup failed: {e}");
                return None;
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let found = parse_arp_output(&stdout, &ip);
        if found.is_none() {
            tracing::debug!(%ip, "No ARP entry for address");
        }
        found
    }
}

/// Fixed address → fingerprint table. Useful for tests and for deployments
/// where devices are registered up front.
#[derive(Default, Clone)]
pub struct StaticFingerprintResolver {
    table: HashMap<IpAddr, String>,
    fallback: Option<String>,
}

impl StaticFingerprintResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, ip: IpAddr, fingerprint: impl Into<String>) -> Self {
        self.table.insert(normalize_ip(ip), fingerprint.into());
        self
    }

    /// Returned for any address not in the table.
    pub fn with_fallback(mut self, fingerprint: impl Into<String>) -> Self {
        self.fallback = Some(fingerprint.into());
        self
    }
}

#[async_trait]
impl FingerprintResolver for StaticFingerprintResolver {
    async fn resolve(&self, ip: IpAddr) -> Option<String> {
        self.table
            .get(&normalize_ip(ip))
            .cloned()
            .or_else(|| self.fallback.clone())
    }
}
