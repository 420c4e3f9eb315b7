//! Detection of addresses that must never be sent to a geolocation provider.

use std::net::IpAddr;

/// Prefix of IPv6-mapped IPv4 addresses as reported by dual-stack sockets.
pub const IPV6_MAPPED_PREFIX: &str = "::ffff:";

/// Strips an IPv6-mapped IPv4 prefix (`::ffff:1.2.3.4` → `1.2.3.4`).
///
/// The prefix matches in any letter case. Anything else is returned unchanged;
/// this is also the cache key format.
pub fn normalize_ip(raw: &str) -> &str {
    match raw.get(..IPV6_MAPPED_PREFIX.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(IPV6_MAPPED_PREFIX) => {
            &raw[IPV6_MAPPED_PREFIX.len()..]
        }
        _ => raw,
    }
}

/// Returns `true` for loopback and RFC 1918 private addresses.
///
/// Covered: `localhost`, `127.0.0.0/8`, `::1`, `10.0.0.0/8`, `172.16.0.0/12`,
/// `192.168.0.0/16`. Malformed input returns `false`; the providers reject it.
pub fn is_private_ip(ip: &str) -> bool {
    if ip.eq_ignore_ascii_case("localhost") {
        return true;
    }

    match ip.parse::<IpAddr>() {
        Ok(IpAddr::V4(v4)) => v4.is_loopback() || v4.is_private(),
        Ok(IpAddr::V6(v6)) => {
            if v6.is_loopback() {
                return true;
            }
            v6.to_ipv4_mapped()
                .map(|v4| v4.is_loopback() || v4.is_private())
                .unwrap_or(false)
        }
        Err(_) => false,
    }
}
