//! MAC address text codec.

use bitflags::bitflags;
use std::convert::Infallible;
use std::fmt;

/// Mask keeping the low 48 bits of a `u64`.
pub const MAC_MASK: u64 = 0xFFFF_FFFF_FFFF;

/// Number of hex digits in a MAC address.
const MAC_DIGITS: usize = 12;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

bitflags! {
    /// Properties encoded in the first octet of a MAC address.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AddressFlags: u8 {
        /// I/G bit: group (multicast) address.
        const MULTICAST = 0b00000001;
        /// U/L bit: locally administered, not vendor assigned.
        const LOCALLY_ADMINISTERED = 0b00000010;
    }
}

/// A 48-bit MAC address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct MacAddress(u64);

impl MacAddress {
    /// Build an address from the low 48 bits of `value`.
    pub fn new(value: u64) -> Self {
        Self(value & MAC_MASK)
    }

    /// Parse a MAC address from text.
    ///
    /// Parsing is lenient and never fails: up to 12 hex digits are consumed
    /// (case-insensitive), `:` is skipped wherever it appears, and parsing
    /// stops at the first other character. Missing digits are zero-filled
    /// from the right, so `"a1:b2"` parses as `a1:b2:00:00:00:00`.
    pub fn parse_text(text: &str) -> Self {
        let mut value = 0u64;
        let mut digits = 0;

        for c in text.bytes() {
            if digits == MAC_DIGITS {
                break;
            }
            let nibble = match c {
                b':' => continue,
                b'0'..=b'9' => c - b'0',
                b'a'..=b'f' => c - b'a' + 10,
                b'A'..=b'F' => c - b'A' + 10,
                _ => break,
            };
            value = (value << 4) | nibble as u64;
            digits += 1;
        }

        Self(value << (4 * (MAC_DIGITS - digits)))
    }

    /// Canonical colon-separated lowercase form, e.g. `a1:b2:c3:d4:e5:f6`.
    pub fn format(&self) -> String {
        let mut text = String::with_capacity(17);
        for (i, octet) in self.octets().iter().enumerate() {
            if i > 0 {
                text.push(':');
            }
            text.push(HEX_DIGITS[(octet >> 4) as usize] as char);
            text.push(HEX_DIGITS[(octet & 0xF) as usize] as char);
        }
        text
    }

    /// The raw 48-bit value.
    pub fn as_u64(self) -> u64 {
        self.0
    }

    /// The Organizationally Unique Identifier (top 24 bits).
    pub fn oui(self) -> u32 {
        (self.0 >> 24) as u32
    }

    /// The six octets, most significant first.
    pub fn octets(self) -> [u8; 6] {
        let bytes = self.0.to_be_bytes();
        [bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7]]
    }

    /// Multicast / locally administered bits of the first octet.
    pub fn flags(self) -> AddressFlags {
        AddressFlags::from_bits_truncate(self.octets()[0])
    }
}

impl From<u64> for MacAddress {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl From<[u8; 6]> for MacAddress {
    fn from(octets: [u8; 6]) -> Self {
        octets
            .iter()
            .fold(Self(0), |mac, octet| Self((mac.0 << 8) | *octet as u64))
    }
}

impl From<MacAddress> for u64 {
    fn from(mac: MacAddress) -> Self {
        mac.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

impl std::str::FromStr for MacAddress {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_text(s))
    }
}
