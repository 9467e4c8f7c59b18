//! CIDR block type used for the cluster and service network ranges.
//!
//! # Responsibilities
//! - Parse `addr/prefix` notation at the flag and config-file boundary
//! - Answer containment and overlap questions for range sanity checks

use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

/// Errors produced while parsing a CIDR block.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CidrError {
    #[error("invalid CIDR {0:?}: expected <address>/<prefix>")]
    MissingPrefix(String),

    #[error("invalid CIDR {0:?}: bad IP address")]
    InvalidAddress(String),

    #[error("invalid CIDR {input:?}: prefix must be at most {max}")]
    InvalidPrefix { input: String, max: u8 },
}

/// An IP range expressed as a base address plus prefix length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct Cidr {
    addr: IpAddr,
    prefix: u8,
}

impl Cidr {
    /// Build a CIDR block, rejecting prefixes longer than the address family allows.
    pub fn new(addr: IpAddr, prefix: u8) -> Result<Self, CidrError> {
        let max = max_prefix(&addr);
        if prefix > max {
            return Err(CidrError::InvalidPrefix {
                input: format!("{}/{}", addr, prefix),
                max,
            });
        }
        Ok(Self { addr, prefix })
    }

    // Only for compile-time defaults where the prefix is known to be valid.
    pub(crate) const fn v4(addr: Ipv4Addr, prefix: u8) -> Self {
        Self {
            addr: IpAddr::V4(addr),
            prefix,
        }
    }

    /// Address as written by the operator (host bits preserved).
    pub fn addr(&self) -> IpAddr {
        self.addr
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    /// Base address of the block with host bits cleared.
    pub fn network(&self) -> IpAddr {
        match self.addr {
            IpAddr::V4(v4) => {
                let mask = if self.prefix == 0 {
                    0
                } else {
                    u32::MAX << (32 - u32::from(self.prefix))
                };
                IpAddr::V4((u32::from(v4) & mask).into())
            }
            IpAddr::V6(v6) => {
                let mask = if self.prefix == 0 {
                    0
                } else {
                    u128::MAX << (128 - u32::from(self.prefix))
                };
                IpAddr::V6((u128::from(v6) & mask).into())
            }
        }
    }

    /// True if `ip` falls inside this block. Mixed address families never match.
    pub fn contains(&self, ip: IpAddr) -> bool {
        if self.addr.is_ipv4() != ip.is_ipv4() {
            return false;
        }
        let other_net = Cidr {
            addr: ip,
            prefix: self.prefix,
        };
        other_net.network() == self.network()
    }

    /// True if the two blocks share at least one address.
    pub fn overlaps(&self, other: &Cidr) -> bool {
        self.contains(other.network()) || other.contains(self.network())
    }
}

fn max_prefix(addr: &IpAddr) -> u8 {
    match addr {
        IpAddr::V4(_) => 32,
        IpAddr::V6(_) => 128,
    }
}

impl FromStr for Cidr {
    type Err = CidrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr, prefix) = s
            .split_once('/')
            .ok_or_else(|| CidrError::MissingPrefix(s.to_string()))?;

        let addr: IpAddr = addr
            .parse()
            .map_err(|_| CidrError::InvalidAddress(s.to_string()))?;
        let max = max_prefix(&addr);
        let prefix: u8 = prefix.parse().map_err(|_| CidrError::InvalidPrefix {
            input: s.to_string(),
            max,
        })?;

        Cidr::new(addr, prefix).map_err(|_| CidrError::InvalidPrefix {
            input: s.to_string(),
            max,
        })
    }
}

impl TryFrom<String> for Cidr {
    type Error = CidrError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.prefix)
    }
}
