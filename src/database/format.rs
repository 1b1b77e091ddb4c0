//! Database layout constants and structures.

use std::fmt;

/// Size of a 16-bit index space.
pub const W16: usize = 1 << 16;

/// Number of entries in the OUI index (one per 24-bit OUI).
pub const OUI_COUNT: usize = 1 << 24;

/// Size of one bucket slot in bytes.
pub const BUCKET_SIZE: usize = 4;

/// Longest fragment a bucket can hold while keeping its terminator.
pub const MAX_FRAGMENT_LEN: usize = BUCKET_SIZE - 1;

pub const INDEX_OFFSET: u64 = 0;
pub const INDEX_LEN: usize = OUI_COUNT * 2;

pub const BUCKET_OFFSET: u64 = INDEX_OFFSET + INDEX_LEN as u64;
pub const BUCKET_LEN: usize = W16 * BUCKET_SIZE;

pub const SEQUENCE_OFFSET: u64 = BUCKET_OFFSET + BUCKET_LEN as u64;
pub const SEQUENCE_LEN: usize = W16 * 2;

pub const COUNT_OFFSET: u64 = SEQUENCE_OFFSET + SEQUENCE_LEN as u64;
pub const COUNT_LEN: usize = W16;

/// Total database file size.
pub const DB_SIZE: u64 = COUNT_OFFSET + COUNT_LEN as u64;

/// Default database file name.
pub const DEFAULT_DB_PATH: &str = "oui.db";

/// 16-bit company identifier. Also the first position of the company's
/// fragments in the sequence table.
pub type CompanyId = u16;

/// 16-bit index into the bucket table.
pub type BucketIndex = u16;

/// Company identifier meaning "no/unknown vendor".
pub const UNKNOWN_COMPANY: CompanyId = 0;

/// The four regions of the database file, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// OUI → company id (u16 × 2²⁴)
    Index,
    /// Deduplicated name fragments (4 bytes × 2¹⁶)
    Buckets,
    /// Bucket index per sequence position (u16 × 2¹⁶)
    Sequences,
    /// Fragment count per company (u8 × 2¹⁶)
    Counts,
}

impl Region {
    pub const ALL: [Region; 4] = [
        Region::Index,
        Region::Buckets,
        Region::Sequences,
        Region::Counts,
    ];

    /// Byte offset of the region within the file.
    pub fn offset(self) -> u64 {
        match self {
            Region::Index => INDEX_OFFSET,
            Region::Buckets => BUCKET_OFFSET,
            Region::Sequences => SEQUENCE_OFFSET,
            Region::Counts => COUNT_OFFSET,
        }
    }

    /// Length of the region in bytes.
    pub fn len(self) -> usize {
        match self {
            Region::Index => INDEX_LEN,
            Region::Buckets => BUCKET_LEN,
            Region::Sequences => SEQUENCE_LEN,
            Region::Counts => COUNT_LEN,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Index => "index",
            Region::Buckets => "bucket",
            Region::Sequences => "sequence",
            Region::Counts => "count",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One bucket slot: a bounded byte array plus the length of its text.
///
/// The length is the position of the first NUL byte, capped at the slot
/// size, so reading a fragment never looks past its own 4 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bucket {
    bytes: [u8; BUCKET_SIZE],
    len: u8,
}

impl Bucket {
    /// Decode a slot as stored on disk.
    pub fn from_slot(slot: [u8; BUCKET_SIZE]) -> Self {
        let len = slot.iter().position(|&b| b == 0).unwrap_or(BUCKET_SIZE);
        Self {
            bytes: slot,
            len: len as u8,
        }
    }

    /// Build a bucket from a fragment of at most 3 bytes.
    ///
    /// Returns `None` when the fragment would not leave room for the
    /// terminator or contains a NUL byte.
    pub fn from_fragment(fragment: &str) -> Option<Self> {
        let src = fragment.as_bytes();
        if src.len() > MAX_FRAGMENT_LEN || src.contains(&0) {
            return None;
        }
        let mut bytes = [0u8; BUCKET_SIZE];
        bytes[..src.len()].copy_from_slice(src);
        Some(Self {
            bytes,
            len: src.len() as u8,
        })
    }

    /// Length of the fragment text in bytes.
    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether a NUL terminator was found inside the slot.
    pub fn is_terminated(&self) -> bool {
        self.len() < BUCKET_SIZE
    }

    /// The fragment bytes, without terminator or padding.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len()]
    }

    /// The raw slot as written to disk.
    pub fn slot(&self) -> [u8; BUCKET_SIZE] {
        self.bytes
    }
}

/// Read the `i`-th native-endian u16 of a region.
pub(crate) fn read_u16(region: &[u8], i: usize) -> u16 {
    u16::from_ne_bytes([region[2 * i], region[2 * i + 1]])
}

/// Write the `i`-th native-endian u16 of a region.
pub(crate) fn write_u16(region: &mut [u8], i: usize, value: u16) {
    region[2 * i..2 * i + 2].copy_from_slice(&value.to_ne_bytes());
}

/// Read the `i`-th bucket slot of the bucket region.
pub(crate) fn read_slot(region: &[u8], i: usize) -> [u8; BUCKET_SIZE] {
    let start = i * BUCKET_SIZE;
    [
        region[start],
        region[start + 1],
        region[start + 2],
        region[start + 3],
    ]
}
