//! IEEE OUI registry parser.
//!
//! Reads the `oui.txt` listing published by the IEEE registration
//! authority. Only the `(hex)` lines are used:
//!
//! ```text
//! 00-17-F2   (hex)		Apple, Inc.
//! 0017F2     (base 16)		Apple, Inc.
//! 				1 Infinite Loop
//! ```

use flate2::read::GzDecoder;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::Result;

/// One OUI assignment from the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorRecord {
    /// 24-bit OUI
    pub oui: u32,
    /// Organization name as listed
    pub name: String,
}

/// `XX-XX-XX   (hex)   Organization`
static HEX_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([0-9A-Fa-f]{2})-([0-9A-Fa-f]{2})-([0-9A-Fa-f]{2})\s+\(hex\)\s*(.*)$").unwrap()
});

/// Parser for IEEE `oui.txt` listings.
pub struct RegistryParser;

impl RegistryParser {
    /// Parse records from a reader.
    ///
    /// Bytes that are not valid UTF-8 (older listings are Latin-1) are
    /// replaced with U+FFFD instead of failing the parse.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<VendorRecord>> {
        let mut buf_reader = BufReader::new(reader);
        let mut records = Vec::new();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if buf_reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&buf);
            if let Some(record) = parse_line(line.trim_end_matches(['\r', '\n'])) {
                records.push(record);
            }
        }

        log::debug!("Parsed {} registry records", records.len());
        Ok(records)
    }

    /// Parse a registry file, decompressing it first if it ends in `.gz`.
    pub fn parse_file(path: &Path) -> Result<Vec<VendorRecord>> {
        let file = File::open(path)?;

        let is_gzip = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("gz"))
            .unwrap_or(false);

        if is_gzip {
            Self::parse(GzDecoder::new(file))
        } else {
            Self::parse(file)
        }
    }
}

fn parse_line(line: &str) -> Option<VendorRecord> {
    let caps = HEX_LINE.captures(line)?;

    let hex = format!("{}{}{}", &caps[1], &caps[2], &caps[3]);
    let oui = u32::from_str_radix(&hex, 16).ok()?;

    let name = caps[4].trim();
    if name.is_empty() {
        log::warn!("Registry entry {} has no organization name", hex);
        return None;
    }

    Some(VendorRecord {
        oui,
        name: name.to_string(),
    })
}
