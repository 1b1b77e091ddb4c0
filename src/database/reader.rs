//! OUI database reader over the memory-mapped regions.

use serde::Serialize;
use std::path::Path;

use super::format::*;
use super::mapped::MappedFile;
use crate::mac::MacAddress;
use crate::{Error, Result};

/// Memory-mapped OUI → vendor database.
///
/// Lookups read straight from the mapped regions and take no locks; the
/// file is treated as immutable once built.
pub struct OuiDatabase {
    mapped: MappedFile,
}

/// Occupancy summary of a database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DatabaseStats {
    /// OUIs mapped to a known company
    pub assigned_ouis: usize,
    /// Distinct company ids referenced by the index
    pub companies: usize,
    /// Distinct buckets referenced by those companies
    pub buckets: usize,
}

impl OuiDatabase {
    /// Open (or create) a database file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mapped = MappedFile::open(path.as_ref())?;
        Ok(Self { mapped })
    }

    /// Unmap the regions and close the file.
    pub fn close(self) {
        self.mapped.close();
    }

    /// Path the database was opened from.
    pub fn path(&self) -> &Path {
        self.mapped.path()
    }

    /// Look up the company id for a MAC address.
    ///
    /// Only the OUI (top 24 bits) is used; the index spans the whole 24-bit
    /// domain so every address has an entry.
    pub fn lookup_company(&self, mac: MacAddress) -> CompanyId {
        read_u16(self.mapped.region(Region::Index), mac.oui() as usize)
    }

    /// Number of fragments in a company's name.
    pub fn word_count(&self, company: CompanyId) -> u8 {
        self.mapped.region(Region::Counts)[company as usize]
    }

    /// Bucket index stored at a position of the sequence table.
    pub fn sequence(&self, position: CompanyId) -> BucketIndex {
        read_u16(self.mapped.region(Region::Sequences), position as usize)
    }

    /// A bucket of the bucket table.
    pub fn bucket(&self, index: BucketIndex) -> Bucket {
        Bucket::from_slot(read_slot(self.mapped.region(Region::Buckets), index as usize))
    }

    /// Rebuild a company's name from its fragments.
    ///
    /// Fragments are joined with single spaces. The unknown company and
    /// companies with no fragments yield an empty string. Corrupt records
    /// (a sequence running off the table, an unterminated bucket or a
    /// non-UTF-8 fragment) are reported as errors.
    pub fn reconstruct_name(&self, company: CompanyId) -> Result<String> {
        if company == UNKNOWN_COMPANY {
            return Ok(String::new());
        }

        let count = self.word_count(company);
        if count == 0 {
            return Ok(String::new());
        }

        let start = company as usize;
        let end = start + count as usize;
        if end > W16 {
            return Err(Error::SequenceOutOfBounds { company, count });
        }

        // First pass: size the name exactly.
        let mut length = count as usize - 1;
        for position in start..end {
            let index = self.sequence(position as CompanyId);
            let bucket = self.bucket(index);
            if !bucket.is_terminated() {
                return Err(Error::UnterminatedBucket(index));
            }
            length += bucket.len();
        }

        // Second pass: fill it.
        let mut name = String::with_capacity(length);
        for position in start..end {
            if position > start {
                name.push(' ');
            }
            let index = self.sequence(position as CompanyId);
            let bucket = self.bucket(index);
            let fragment =
                std::str::from_utf8(bucket.as_bytes()).map_err(|_| Error::InvalidFragment(index))?;
            name.push_str(fragment);
        }

        Ok(name)
    }

    /// Look up the vendor name for a MAC address.
    ///
    /// Returns `None` when the OUI is not assigned or its company has no
    /// stored name.
    pub fn lookup(&self, mac: MacAddress) -> Result<Option<String>> {
        match self.lookup_company(mac) {
            UNKNOWN_COMPANY => Ok(None),
            company => {
                let name = self.reconstruct_name(company)?;
                Ok(Some(name).filter(|name| !name.is_empty()))
            }
        }
    }

    /// Parse a MAC address from text and look up its vendor name.
    pub fn lookup_text(&self, text: &str) -> Result<Option<String>> {
        self.lookup(MacAddress::parse_text(text))
    }

    /// Scan the index and report how much of the database is in use.
    ///
    /// Companies whose sequence would run past the table are counted but
    /// contribute no buckets.
    pub fn stats(&self) -> DatabaseStats {
        let index = self.mapped.region(Region::Index);
        let mut stats = DatabaseStats::default();
        let mut seen_company = vec![false; W16];
        let mut seen_bucket = vec![false; W16];

        for oui in 0..OUI_COUNT {
            let company = read_u16(index, oui);
            if company == UNKNOWN_COMPANY {
                continue;
            }
            stats.assigned_ouis += 1;

            if seen_company[company as usize] {
                continue;
            }
            seen_company[company as usize] = true;
            stats.companies += 1;

            let start = company as usize;
            let end = start + self.word_count(company) as usize;
            if end > W16 {
                continue;
            }
            for position in start..end {
                let bucket = self.sequence(position as CompanyId) as usize;
                if !seen_bucket[bucket] {
                    seen_bucket[bucket] = true;
                    stats.buckets += 1;
                }
            }
        }

        stats
    }

    /// Flush all regions to the file.
    pub fn flush(&self) -> Result<()> {
        self.mapped.flush()
    }

    pub(crate) fn mapped_mut(&mut self) -> &mut MappedFile {
        &mut self.mapped
    }
}
