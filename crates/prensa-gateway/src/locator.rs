//! Backend Locator
//!
//! Maps the host portion of an inbound `Host` header to the base URL of the
//! article backend that should service the request. The same front-end
//! deployment works both from a private LAN (backend running on the same
//! private host) and from the public internet (tunneled public backend).

use std::net::Ipv4Addr;

/// Built-in public backend base, used when no override is configured
pub const DEFAULT_PUBLIC_API_URL: &str = "https://lanotadigital-api.loca.lt/api";

/// Backend base URL resolved for one inbound request.
///
/// Derived, never persisted: a pure function of the `Host` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendTarget {
    pub base_url: String,
}

/// Classification of an inbound hostname
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostClass {
    /// `localhost`, exactly `127.0.0.1`, or a missing/empty host
    Loopback,
    /// RFC 1918 private, link-local, or non-canonical loopback IPv4 address.
    /// Loopback aliases other than `127.0.0.1` keep their literal address so
    /// a backend bound to that alias is still reached.
    PrivateIp(Ipv4Addr),
    /// Anything else: public IP or DNS name
    Public,
}

/// Classify a hostname (port already stripped).
///
/// Range checks go through `Ipv4Addr` predicates, never substring matching,
/// so a public address that merely contains a private-looking digit group
/// (e.g. `8.10.0.1`) is not misclassified.
pub fn classify(host: &str) -> HostClass {
    if host.is_empty() || host.eq_ignore_ascii_case("localhost") {
        return HostClass::Loopback;
    }

    match host.parse::<Ipv4Addr>() {
        Ok(ip) if ip == Ipv4Addr::LOCALHOST => HostClass::Loopback,
        Ok(ip) if ip.is_loopback() || ip.is_private() || ip.is_link_local() => {
            HostClass::PrivateIp(ip)
        }
        _ => HostClass::Public,
    }
}

/// Resolves inbound hosts to backend base URLs
pub struct BackendLocator {
    local_api_port: u16,
    public_api_url: String,
}

impl BackendLocator {
    pub fn new(local_api_port: u16, public_api_url: Option<String>) -> Self {
        Self {
            local_api_port,
            public_api_url: public_api_url
                .unwrap_or_else(|| DEFAULT_PUBLIC_API_URL.to_string()),
        }
    }

    /// Resolve the raw `Host` header value to a backend target.
    ///
    /// Total: every input maps to some target, a missing header falls back
    /// to the local backend.
    pub fn resolve(&self, host_header: Option<&str>) -> BackendTarget {
        let host = strip_port(host_header.unwrap_or(""));

        let base_url = match classify(host) {
            HostClass::Loopback => {
                format!("http://localhost:{}/api", self.local_api_port)
            }
            // The backend is assumed to run on the same private host as the
            // inbound request, on its well-known port
            HostClass::PrivateIp(ip) => {
                format!("http://{}:{}/api", ip, self.local_api_port)
            }
            HostClass::Public => self.public_api_url.clone(),
        };

        BackendTarget { base_url }
    }
}

/// Strip an optional `:port` suffix from a `Host` header value
fn strip_port(host: &str) -> &str {
    host.split(':').next().unwrap_or("")
}
