//! OUI database writer.
//!
//! Vendor names are split into words, and words longer than
//! [`MAX_FRAGMENT_LEN`] bytes into several fragments, so every fragment fits
//! a NUL-terminated bucket. Fragments are deduplicated by exact byte match,
//! and vendors with identical names share one company id.

use ahash::AHashMap;
use std::path::Path;

use super::format::*;
use super::reader::OuiDatabase;
use crate::registry::VendorRecord;
use crate::{Error, Result};

/// Largest valid OUI.
const MAX_OUI: u32 = (OUI_COUNT - 1) as u32;

/// In-memory image of the database tables.
pub struct DatabaseWriter {
    /// Bucket table; slot 0 is reserved and stays empty.
    buckets: Vec<Bucket>,
    bucket_ids: AHashMap<String, BucketIndex>,
    /// Sequence table; position 0 belongs to the unknown company.
    sequences: Vec<BucketIndex>,
    counts: AHashMap<CompanyId, u8>,
    company_ids: AHashMap<String, CompanyId>,
    index: AHashMap<u32, CompanyId>,
}

impl DatabaseWriter {
    pub fn new() -> Self {
        Self {
            buckets: vec![Bucket::default()],
            bucket_ids: AHashMap::new(),
            sequences: vec![0],
            counts: AHashMap::new(),
            company_ids: AHashMap::new(),
            index: AHashMap::new(),
        }
    }

    /// Assign a vendor name to an OUI.
    ///
    /// Adding the same OUI again replaces its vendor.
    pub fn add_vendor(&mut self, oui: u32, name: &str) -> Result<CompanyId> {
        if oui > MAX_OUI {
            return Err(Error::OuiOutOfRange(oui));
        }

        let normalized = name.split_whitespace().collect::<Vec<_>>().join(" ");
        if normalized.is_empty() {
            return Err(Error::EmptyName(oui));
        }

        let company = match self.company_ids.get(&normalized) {
            Some(&company) => company,
            None => {
                let company = self.add_company(&normalized)?;
                self.company_ids.insert(normalized, company);
                company
            }
        };

        if let Some(previous) = self.index.insert(oui, company) {
            if previous != company {
                log::debug!("OUI {:06x} reassigned from company {} to {}", oui, previous, company);
            }
        }

        Ok(company)
    }

    /// Add a batch of registry records.
    ///
    /// Records that no longer fit once a table is full are skipped and the
    /// rest are still added; a record whose name is already stored always
    /// fits. Returns the number of skipped records.
    pub fn add_records(&mut self, records: &[VendorRecord]) -> Result<usize> {
        let mut skipped = 0;
        let mut first_cause = None;

        for record in records {
            match self.add_vendor(record.oui, &record.name) {
                Ok(_) => {}
                Err(Error::TableFull(table)) => {
                    log::debug!(
                        "Skipping OUI {:06x} ({:?}): {} table is full",
                        record.oui,
                        record.name,
                        table
                    );
                    first_cause.get_or_insert(table);
                    skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        if let Some(table) = first_cause {
            log::warn!(
                "{} table is full: skipped {} of {} registry records",
                table,
                skipped,
                records.len()
            );
        }
        Ok(skipped)
    }

    /// Number of OUIs assigned so far.
    pub fn vendor_count(&self) -> usize {
        self.index.len()
    }

    /// Number of distinct company names.
    pub fn company_count(&self) -> usize {
        self.company_ids.len()
    }

    /// Number of buckets in use, excluding the reserved slot.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len() - 1
    }

    fn add_company(&mut self, name: &str) -> Result<CompanyId> {
        let fragments: Vec<String> = name.split(' ').flat_map(split_word).collect();
        if fragments.len() > u8::MAX as usize {
            return Err(Error::TableFull("fragment count"));
        }
        if self.sequences.len() + fragments.len() > W16 {
            return Err(Error::TableFull("sequence"));
        }

        // Stage unseen fragments first so a full bucket table leaves nothing behind.
        let mut staged: Vec<(&str, Bucket)> = Vec::new();
        for fragment in &fragments {
            if self.bucket_ids.contains_key(fragment) || staged.iter().any(|(f, _)| *f == fragment.as_str()) {
                continue;
            }
            let bucket = Bucket::from_fragment(fragment)
                .ok_or_else(|| Error::FragmentTooLong(fragment.clone()))?;
            staged.push((fragment.as_str(), bucket));
        }
        if self.buckets.len() + staged.len() > W16 {
            return Err(Error::TableFull("bucket"));
        }

        for (fragment, bucket) in staged {
            self.bucket_ids
                .insert(fragment.to_string(), self.buckets.len() as BucketIndex);
            self.buckets.push(bucket);
        }

        let company = self.sequences.len() as CompanyId;
        for fragment in &fragments {
            self.sequences.push(self.bucket_ids[fragment]);
        }
        self.counts.insert(company, fragments.len() as u8);
        Ok(company)
    }

    /// Replace the contents of an open database with these tables.
    pub fn write_to(&self, db: &mut OuiDatabase) -> Result<()> {
        let mapped = db.mapped_mut();
        for region in Region::ALL {
            mapped.region_mut(region).fill(0);
        }

        let index = mapped.region_mut(Region::Index);
        for (&oui, &company) in &self.index {
            write_u16(index, oui as usize, company);
        }

        let buckets = mapped.region_mut(Region::Buckets);
        for (i, bucket) in self.buckets.iter().enumerate() {
            let start = i * BUCKET_SIZE;
            buckets[start..start + BUCKET_SIZE].copy_from_slice(&bucket.slot());
        }

        let sequences = mapped.region_mut(Region::Sequences);
        for (position, &bucket) in self.sequences.iter().enumerate() {
            write_u16(sequences, position, bucket);
        }

        let counts = mapped.region_mut(Region::Counts);
        for (&company, &count) in &self.counts {
            counts[company as usize] = count;
        }

        mapped.flush()?;
        log::info!(
            "Wrote {} OUIs, {} companies, {} buckets to {:?}",
            self.vendor_count(),
            self.company_count(),
            self.bucket_count(),
            mapped.path()
        );
        Ok(())
    }

    /// Open (or create) a database file and write these tables into it.
    pub fn build(&self, path: impl AsRef<Path>) -> Result<OuiDatabase> {
        let mut db = OuiDatabase::open(path)?;
        self.write_to(&mut db)?;
        Ok(db)
    }
}

impl Default for DatabaseWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Split a word into fragments of at most [`MAX_FRAGMENT_LEN`] bytes,
/// cutting only on char boundaries.
fn split_word(word: &str) -> Vec<String> {
    let mut fragments = Vec::new();
    let mut current = String::new();

    for c in word.chars() {
        // A 4-byte char can never share a bucket with its terminator.
        let c = if c.len_utf8() > MAX_FRAGMENT_LEN {
            char::REPLACEMENT_CHARACTER
        } else {
            c
        };
        let c = if c == '\0' { char::REPLACEMENT_CHARACTER } else { c };

        if current.len() + c.len_utf8() > MAX_FRAGMENT_LEN {
            fragments.push(std::mem::take(&mut current));
        }
        current.push(c);
    }

    if !current.is_empty() {
        fragments.push(current);
    }
    fragments
}
