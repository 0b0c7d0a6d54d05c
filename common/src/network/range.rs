//! # Address Ranges
//!
//! CIDR ranges as they appear in firewall rules, and the classifier deciding whether
//! a range is reachable from the public Internet.
//!
//! Classification looks at the **base address** only: the range is private when its
//! network address falls inside one of [`PRIVATE_BLOCKS`]. A range that merely overlaps
//! a private block (e.g. `9.255.254.0/23`) is public, and a range wider than a private
//! block but based inside one is private.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use ipnet::{IpNet, Ipv4Net};

use crate::error::AddressRangeError;

/// RFC 1918 private-use blocks.
pub const PRIVATE_BLOCKS: [Ipv4Net; 3] = [
    Ipv4Net::new_assert(Ipv4Addr::new(10, 0, 0, 0), 8),
    Ipv4Net::new_assert(Ipv4Addr::new(172, 16, 0, 0), 12),
    Ipv4Net::new_assert(Ipv4Addr::new(192, 168, 0, 0), 16),
];

/// A network range in CIDR notation (base address + prefix length).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AddressRange(IpNet);

impl AddressRange {
    /// The network address of the range, host bits cleared.
    pub fn base_address(&self) -> IpAddr {
        self.0.network()
    }

    pub fn prefix_len(&self) -> u8 {
        self.0.prefix_len()
    }

    /// Returns `true` when the base address lies outside every private block.
    ///
    /// IPv6 ranges are always public: none of the private blocks can contain them.
    pub fn is_public(&self) -> bool {
        match self.base_address() {
            IpAddr::V4(base) => !PRIVATE_BLOCKS.iter().any(|block| block.contains(&base)),
            IpAddr::V6(_) => true,
        }
    }
}

impl FromStr for AddressRange {
    type Err = AddressRangeError;

    /// Parses `address/prefix`. A bare address without a prefix is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<IpNet>()
            .map(Self)
            .map_err(|err| AddressRangeError::Malformed {
                input: s.to_string(),
                reason: err.to_string(),
            })
    }
}

impl fmt::Display for AddressRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parses and classifies a CIDR string in one step.
pub fn is_public(range: &str) -> Result<bool, AddressRangeError> {
    Ok(range.parse::<AddressRange>()?.is_public())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
