use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use crate::api::Primitive;
use crate::error::ValueError;

impl Primitive for IpAddr {
    const TYPE_NAME: &'static str = "ip";
    const SLICE_NAME: &'static str = "ipSlice";

    fn parse(raw: &str) -> Result<Self, ValueError> {
        IpAddr::from_str(raw.trim())
            .map_err(|_| ValueError::Message(format!("failed to parse IP: {raw:?}")))
    }

    fn format(&self) -> String {
        self.to_string()
    }
}

/// An IPv4 network mask, displayed as eight hex digits (ex: `ffffff00`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IpMask(pub [u8; 4]);

impl IpMask {
    /// The mask with the leading `ones` bits set.
    pub fn from_prefix(ones: u8) -> Self {
        let bits = match ones {
            0 => 0,
            n if n >= 32 => u32::MAX,
            n => u32::MAX << (32 - u32::from(n)),
        };
        Self(bits.to_be_bytes())
    }

    /// The number of leading set bits.
    pub fn ones(&self) -> u32 {
        u32::from_be_bytes(self.0).leading_ones()
    }
}

impl fmt::Display for IpMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }

        Ok(())
    }
}

impl FromStr for IpMask {
    type Err = ValueError;

    /// Accepts a dotted quad (`255.255.255.0`) or eight hex digits (`ffffff00`).
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();

        if let Ok(address) = Ipv4Addr::from_str(trimmed) {
            return Ok(Self(address.octets()));
        }

        if trimmed.len() == 8 && trimmed.chars().all(|c| c.is_ascii_hexdigit()) {
            let mut octets = [0u8; 4];

            for (i, octet) in octets.iter_mut().enumerate() {
                *octet = u8::from_str_radix(&trimmed[i * 2..i * 2 + 2], 16)
                    .map_err(|_| ValueError::syntax(Self::TYPE_NAME, raw))?;
            }

            return Ok(Self(octets));
        }

        Err(ValueError::Message(format!(
            "failed to parse IP mask: {raw:?}"
        )))
    }
}

impl Primitive for IpMask {
    const TYPE_NAME: &'static str = "ipMask";
    const SLICE_NAME: &'static str = "ipMaskSlice";

    fn parse(raw: &str) -> Result<Self, ValueError> {
        raw.parse()
    }

    fn format(&self) -> String {
        self.to_string()
    }
}

/// An IP network in CIDR form; the address is always the network address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IpNet {
    addr: IpAddr,
    prefix: u8,
}

impl IpNet {
    /// The network containing `addr` with a `prefix` bit mask.
    /// Returns `None` if the prefix is longer than the address.
    pub fn new(addr: IpAddr, prefix: u8) -> Option<Self> {
        let addr = match addr {
            IpAddr::V4(v4) => {
                if prefix > 32 {
                    return None;
                }
                let mask = if prefix == 0 {
                    0
                } else {
                    u32::MAX << (32 - u32::from(prefix))
                };
                IpAddr::V4(Ipv4Addr::from(u32::from(v4) & mask))
            }
            IpAddr::V6(v6) => {
                if prefix > 128 {
                    return None;
                }
                let mask = if prefix == 0 {
                    0
                } else {
                    u128::MAX << (128 - u32::from(prefix))
                };
                IpAddr::V6(Ipv6Addr::from(u128::from(v6) & mask))
            }
        };

        Some(Self { addr, prefix })
    }

    /// The network address.
    pub fn addr(&self) -> IpAddr {
        self.addr
    }

    /// The prefix length in bits.
    pub fn prefix(&self) -> u8 {
        self.prefix
    }
}

impl Default for IpNet {
    fn default() -> Self {
        Self {
            addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            prefix: 0,
        }
    }
}

impl fmt::Display for IpNet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.prefix)
    }
}

impl FromStr for IpNet {
    type Err = ValueError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || ValueError::Message(format!("invalid CIDR address: {raw}"));
        let (addr, prefix) = raw.trim().split_once('/').ok_or_else(invalid)?;
        let addr = IpAddr::from_str(addr).map_err(|_| invalid())?;

        if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let prefix: u8 = prefix.parse().map_err(|_| invalid())?;
        IpNet::new(addr, prefix).ok_or_else(invalid)
    }
}

impl Primitive for IpNet {
    const TYPE_NAME: &'static str = "ipNet";
    const SLICE_NAME: &'static str = "ipNetSlice";

    fn parse(raw: &str) -> Result<Self, ValueError> {
        raw.parse()
    }

    fn format(&self) -> String {
        self.to_string()
    }
}
