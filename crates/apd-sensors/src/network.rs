//! Host IP address sensor.

use crate::sensor::Sensor;
use crate::{Error, Result};
use serde::Serialize;
use std::net::{IpAddr, ToSocketAddrs};
use tracing::debug;

/// Address family of a resolved address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AddressFamily {
    /// IPv4.
    Inet,
    /// IPv6.
    Inet6,
}

impl std::fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AddressFamily::Inet => write!(f, "AF_INET"),
            AddressFamily::Inet6 => write!(f, "AF_INET6"),
        }
    }
}

/// One address bound to the local hostname.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct HostAddress {
    pub family: AddressFamily,
    pub address: IpAddr,
}

impl From<IpAddr> for HostAddress {
    fn from(address: IpAddr) -> Self {
        let family = match address {
            IpAddr::V4(_) => AddressFamily::Inet,
            IpAddr::V6(_) => AddressFamily::Inet6,
        };
        Self { family, address }
    }
}

/// Hostname lookup and resolution.
pub trait HostResolver: Send + Sync {
    /// Returns the local hostname.
    fn hostname(&self) -> Result<String>;

    /// Resolves `host` into its addresses, in resolver order.
    fn resolve(&self, host: &str) -> Result<Vec<IpAddr>>;
}

/// Resolver backed by the OS (`gethostname` and the system resolver).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

impl HostResolver for SystemResolver {
    #[cfg(unix)]
    fn hostname(&self) -> Result<String> {
        let mut buf = [0u8; 256];

        // SAFETY: the buffer is valid for buf.len() bytes and gethostname
        // writes at most that many.
        let ret = unsafe { libc::gethostname(buf.as_mut_ptr() as *mut libc::c_char, buf.len()) };
        if ret != 0 {
            return Err(Error::Hostname(std::io::Error::last_os_error()));
        }

        // Truncated names are not guaranteed to be NUL-terminated.
        let len = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
        Ok(String::from_utf8_lossy(&buf[..len]).into_owned())
    }

    #[cfg(not(unix))]
    fn hostname(&self) -> Result<String> {
        std::env::var("COMPUTERNAME").map_err(|e| {
            Error::Hostname(std::io::Error::new(std::io::ErrorKind::NotFound, e))
        })
    }

    fn resolve(&self, host: &str) -> Result<Vec<IpAddr>> {
        let addrs = (host, 0).to_socket_addrs().map_err(|source| Error::Resolve {
            host: host.to_string(),
            source,
        })?;
        Ok(addrs.map(|addr| addr.ip()).collect())
    }
}

/// Addresses the local hostname resolves to.
///
/// Resolution failures are returned to the caller; there is no "unknown"
/// reading for this sensor.
pub struct IpAddresses {
    resolver: Box<dyn HostResolver>,
}

impl IpAddresses {
    /// Display name.
    pub const TITLE: &'static str = "IP Addresses";

    /// Creates an address sensor using `resolver`.
    pub fn new(resolver: Box<dyn HostResolver>) -> Self {
        Self { resolver }
    }
}

impl Default for IpAddresses {
    fn default() -> Self {
        Self::new(Box::new(SystemResolver))
    }
}

impl Sensor for IpAddresses {
    type Value = Vec<HostAddress>;

    fn title(&self) -> &str {
        Self::TITLE
    }

    fn value(&self) -> Result<Vec<HostAddress>> {
        let hostname = self.resolver.hostname()?;
        let addresses = self.resolver.resolve(&hostname)?;
        debug!("{} resolved to {} addresses", hostname, addresses.len());
        Ok(addresses.into_iter().map(HostAddress::from).collect())
    }

    fn format(&self, value: &Vec<HostAddress>) -> String {
        let pairs: Vec<String> = value
            .iter()
            .map(|a| format!("{}: {}", a.family, a.address))
            .collect();
        format!("{}: {}", Self::TITLE, pairs.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::net::{Ipv4Addr, Ipv6Addr};

    struct Loopback;

    impl HostResolver for Loopback {
        fn hostname(&self) -> Result<String> {
            Ok("testhost".to_string())
        }

        fn resolve(&self, host: &str) -> Result<Vec<IpAddr>> {
            assert_eq!(host, "testhost");
            Ok(vec![
                IpAddr::V4(Ipv4Addr::LOCALHOST),
                IpAddr::V6(Ipv6Addr::LOCALHOST),
            ])
        }
    }

    struct Unresolvable;

    impl HostResolver for Unresolvable {
        fn hostname(&self) -> Result<String> {
            Ok("nowhere.invalid".to_string())
        }

        fn resolve(&self, host: &str) -> Result<Vec<IpAddr>> {
            Err(Error::Resolve {
                host: host.to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "name or service not known"),
            })
        }
    }

    #[test]
    fn test_family_names() {
        assert_eq!(AddressFamily::Inet.to_string(), "AF_INET");
        assert_eq!(AddressFamily::Inet6.to_string(), "AF_INET6");
    }

    #[test]
    fn test_format() {
        let sensor = IpAddresses::new(Box::new(Loopback));
        let value = vec![
            HostAddress::from(IpAddr::V4(Ipv4Addr::LOCALHOST)),
            HostAddress::from(IpAddr::V6(Ipv6Addr::LOCALHOST)),
        ];
        assert_eq!(
            sensor.format(&value),
            "IP Addresses: AF_INET: 127.0.0.1, AF_INET6: ::1"
        );
        assert_eq!(sensor.format(&value), sensor.format(&value));
    }

    #[test]
    fn test_format_empty() {
        let sensor = IpAddresses::new(Box::new(Loopback));
        assert_eq!(sensor.format(&Vec::new()), "IP Addresses: ");
    }

    #[test]
    fn test_value_keeps_resolver_order() {
        let sensor = IpAddresses::new(Box::new(Loopback));
        let value = sensor.value().unwrap();
        assert_eq!(value.len(), 2);
        assert_eq!(value[0].family, AddressFamily::Inet);
        assert_eq!(value[1].family, AddressFamily::Inet6);
    }

    #[test]
    fn test_resolution_failure_propagates() {
        let sensor = IpAddresses::new(Box::new(Unresolvable));
        let err = sensor.describe().unwrap_err();
        assert!(matches!(err, Error::Resolve { ref host, .. } if host == "nowhere.invalid"));
    }

    #[test]
    fn test_system_hostname() {
        let hostname = SystemResolver.hostname().unwrap();
        assert!(!hostname.is_empty());
    }
}
