//! Address cells, IPv4 networks, and `config firewall address` blocks.
//!
//! An address cell in a policy row is one of three things:
//!
//! - **`any`** — matched case-insensitively, referenced as written
//! - **Literal** — a dotted quad with an optional `/prefix`, referenced as written
//! - **Named** — anything else; needs an address object, built from the row's subnet
//!
//! Literal detection is purely lexical (four dot-separated digit groups). Octet
//! ranges are not checked since the firewall rejects bad literals on import.

use std::fmt::{self, Display, Formatter};
use std::net::Ipv4Addr;

use serde::Serialize;
use thiserror::Error;

use crate::quote::quoted;

/// Reasons a subnet string is not a usable IPv4 network.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CidrError {
    #[error("empty network")]
    Empty,
    #[error("IPv6 networks cannot be used in an IPv4 address object")]
    Ipv6Unsupported,
    #[error("'{0}' is not an IPv4 address")]
    InvalidAddress(String),
    #[error("'{0}' is not a prefix length between 0 and 32")]
    InvalidPrefix(String),
    #[error("netmask '{0}' is not contiguous")]
    NonContiguousMask(String),
}

/// An IPv4 network with host bits cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Ipv4Network {
    network: Ipv4Addr,
    prefix: u8,
}

impl Ipv4Network {
    /// Build a network from any address in it and a prefix length.
    pub fn new(address: Ipv4Addr, prefix: u8) -> Result<Self, CidrError> {
        if prefix > 32 {
            return Err(CidrError::InvalidPrefix(prefix.to_string()));
        }
        let network = Ipv4Addr::from(u32::from(address) & prefix_bits(prefix));
        Ok(Self { network, prefix })
    }

    /// Parse `a.b.c.d`, `a.b.c.d/len`, or `a.b.c.d/m.m.m.m`.
    ///
    /// Host bits in the address are accepted and cleared. A bare address is a /32.
    pub fn parse(value: &str) -> Result<Self, CidrError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(CidrError::Empty);
        }
        if value.contains(':') {
            return Err(CidrError::Ipv6Unsupported);
        }

        let (addr_part, prefix_part) = match value.split_once('/') {
            Some((addr, prefix)) => (addr.trim(), Some(prefix.trim())),
            None => (value, None),
        };
        let address: Ipv4Addr = addr_part
            .parse()
            .map_err(|_| CidrError::InvalidAddress(addr_part.to_string()))?;

        let prefix = match prefix_part {
            None => 32,
            Some(raw) if raw.contains('.') => mask_to_prefix(raw)?,
            Some(raw) => parse_prefix_len(raw)?,
        };

        Self::new(address, prefix)
    }

    pub fn network(&self) -> Ipv4Addr {
        self.network
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    /// Dotted-quad form of the prefix.
    pub fn netmask(&self) -> Ipv4Addr {
        Ipv4Addr::from(prefix_bits(self.prefix))
    }
}

impl Display for Ipv4Network {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix)
    }
}

/// Split a CIDR string into its network address and netmask.
pub fn cidr_to_netmask(cidr: &str) -> Result<(Ipv4Addr, Ipv4Addr), CidrError> {
    let net = Ipv4Network::parse(cidr)?;
    Ok((net.network(), net.netmask()))
}

fn prefix_bits(prefix: u8) -> u32 {
    u32::MAX.checked_shl(32 - u32::from(prefix)).unwrap_or(0)
}

fn parse_prefix_len(raw: &str) -> Result<u8, CidrError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CidrError::InvalidPrefix(raw.to_string()));
    }
    match raw.parse::<u8>() {
        Ok(prefix) if prefix <= 32 => Ok(prefix),
        _ => Err(CidrError::InvalidPrefix(raw.to_string())),
    }
}

fn mask_to_prefix(raw: &str) -> Result<u8, CidrError> {
    let mask: Ipv4Addr = raw
        .parse()
        .map_err(|_| CidrError::InvalidAddress(raw.to_string()))?;
    let bits = u32::from(mask);
    let ones = bits.leading_ones();
    if ones + bits.trailing_zeros() != 32 {
        return Err(CidrError::NonContiguousMask(raw.to_string()));
    }
    // leading_ones is at most 32
    Ok(ones as u8)
}

/// Classified address cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AddressRef {
    Any(String),
    Literal(String),
    Named(String),
}

impl AddressRef {
    pub fn classify(value: &str) -> Self {
        let value = value.trim();
        if value.eq_ignore_ascii_case("any") {
            AddressRef::Any(value.to_string())
        } else if is_ip_literal(value) {
            AddressRef::Literal(value.to_string())
        } else {
            AddressRef::Named(value.to_string())
        }
    }

    /// Text placed in the policy's `srcaddr`/`dstaddr` field.
    pub fn reference(&self) -> &str {
        match self {
            AddressRef::Any(v) | AddressRef::Literal(v) | AddressRef::Named(v) => v,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            AddressRef::Named(name) => Some(name),
            _ => None,
        }
    }
}

/// True for `d+.d+.d+.d+` optionally followed by `/d+`.
pub fn is_ip_literal(value: &str) -> bool {
    let (addr, prefix) = match value.split_once('/') {
        Some((addr, prefix)) => (addr, Some(prefix)),
        None => (value, None),
    };
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

    let octets: Vec<&str> = addr.split('.').collect();
    octets.len() == 4 && octets.iter().all(|&o| all_digits(o)) && prefix.map_or(true, all_digits)
}

/// A named address object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressObject {
    pub name: String,
    pub subnet: Ipv4Network,
}

impl AddressObject {
    pub fn render(&self) -> String {
        format!(
            "config firewall address\n    edit {}\n        set subnet {} {}\n    next\nend\n",
            quoted(&self.name),
            self.subnet.network(),
            self.subnet.netmask()
        )
    }
}
