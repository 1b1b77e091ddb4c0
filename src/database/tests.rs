//! Tests for the mapped database: layout, lookups and name reconstruction.
//!
//! Each test works on its own database file in a temp directory.

use std::path::PathBuf;
use tempfile::TempDir;

use super::format::*;
use super::reader::OuiDatabase;
use super::writer::DatabaseWriter;
use crate::registry::VendorRecord;
use crate::{Error, MacAddress, MAC_MASK};

/// Helper to open a fresh database in a temp directory
fn fresh_db() -> (TempDir, OuiDatabase) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db = OuiDatabase::open(dir.path().join("oui.db")).expect("Failed to open database");
    (dir, db)
}

/// Helper to write and reopen a database
fn write_and_open(writer: &DatabaseWriter) -> (TempDir, OuiDatabase) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("oui.db");
    writer.build(&path).expect("Failed to build database").close();
    let db = OuiDatabase::open(&path).expect("Failed to reopen database");
    (dir, db)
}

/// Place a raw company record: sequence entries starting at `company`
fn put_company(db: &mut OuiDatabase, company: CompanyId, buckets: &[BucketIndex]) {
    let mapped = db.mapped_mut();
    let sequences = mapped.region_mut(Region::Sequences);
    for (i, &bucket) in buckets.iter().enumerate() {
        write_u16(sequences, company as usize + i, bucket);
    }
    mapped.region_mut(Region::Counts)[company as usize] = buckets.len() as u8;
}

fn put_bucket(db: &mut OuiDatabase, index: BucketIndex, slot: [u8; 4]) {
    let start = index as usize * BUCKET_SIZE;
    db.mapped_mut().region_mut(Region::Buckets)[start..start + BUCKET_SIZE].copy_from_slice(&slot);
}

fn put_oui(db: &mut OuiDatabase, oui: u32, company: CompanyId) {
    write_u16(db.mapped_mut().region_mut(Region::Index), oui as usize, company);
}

// ============================================================================
// File Layout Tests
// ============================================================================

#[test]
fn test_file_size_is_exact() {
    let (dir, db) = fresh_db();
    let size = std::fs::metadata(dir.path().join("oui.db")).unwrap().len();
    assert_eq!(size, DB_SIZE);
    assert_eq!(size, (1 << 25) + 7 * 65536);
    db.close();
}

#[test]
fn test_reopen_keeps_size_and_data() {
    let (dir, mut db) = fresh_db();
    put_oui(&mut db, 0x123456, 42);
    db.flush().unwrap();
    db.close();

    let path: PathBuf = dir.path().join("oui.db");
    let db = OuiDatabase::open(&path).unwrap();
    assert_eq!(std::fs::metadata(&path).unwrap().len(), DB_SIZE);
    assert_eq!(db.lookup_company(MacAddress::new(0x123456_000000)), 42);
}

#[test]
fn test_index_is_stored_at_oui_offset() {
    let (dir, mut db) = fresh_db();
    put_oui(&mut db, 0x0017F2, 0x0102);
    db.flush().unwrap();
    db.close();

    let data = std::fs::read(dir.path().join("oui.db")).unwrap();
    let offset = INDEX_OFFSET as usize + 2 * 0x0017F2;
    assert_eq!(
        u16::from_ne_bytes([data[offset], data[offset + 1]]),
        0x0102
    );
}

// ============================================================================
// OUI Index Tests
// ============================================================================

#[test]
fn test_empty_database_is_all_unknown() {
    let (_dir, db) = fresh_db();
    assert_eq!(db.lookup_company(MacAddress::new(0)), UNKNOWN_COMPANY);
    assert_eq!(db.lookup(MacAddress::new(0x0017F2000001)).unwrap(), None);
}

#[test]
fn test_lookup_ignores_lower_24_bits() {
    let (_dir, mut db) = fresh_db();
    put_oui(&mut db, 0xA1B2C3, 7);

    for low in [0u64, 1, 0x123456, 0xFFFFFF] {
        let mac = MacAddress::new(0xA1B2C3_000000 | low);
        assert_eq!(db.lookup_company(mac), 7);
    }
    assert_eq!(db.lookup_company(MacAddress::new(0xA1B2C4_000000)), 0);
}

#[test]
fn test_lookup_company_without_name_is_none() {
    let (_dir, mut db) = fresh_db();
    // Assigned to company 77, whose count is still 0.
    put_oui(&mut db, 0x123456, 77);

    let mac = MacAddress::new(0x123456_ABCDEF);
    assert_eq!(db.lookup_company(mac), 77);
    assert_eq!(db.lookup(mac).unwrap(), None);
    assert_eq!(db.lookup_text("12:34:56:00:00:01").unwrap(), None);
}

#[test]
fn test_lookup_at_index_bounds() {
    let (_dir, mut db) = fresh_db();
    put_oui(&mut db, 0xFFFFFF, 0xFFFF);
    put_oui(&mut db, 0x000000, 1);

    assert_eq!(db.lookup_company(MacAddress::new(MAC_MASK)), 0xFFFF);
    assert_eq!(db.lookup_company(MacAddress::new(u64::MAX)), 0xFFFF);
    assert_eq!(db.lookup_company(MacAddress::new(0)), 1);
}

// ============================================================================
// Name Reconstruction Tests
// ============================================================================

#[test]
fn test_reconstruct_unknown_company_is_empty() {
    let (_dir, mut db) = fresh_db();
    // Even a populated count for id 0 must not be read.
    put_bucket(&mut db, 1, *b"Bad\0");
    put_company(&mut db, 0, &[1]);
    assert_eq!(db.reconstruct_name(UNKNOWN_COMPANY).unwrap(), "");
}

#[test]
fn test_reconstruct_zero_count_is_empty() {
    let (_dir, db) = fresh_db();
    assert_eq!(db.reconstruct_name(1234).unwrap(), "");
}

#[test]
fn test_reconstruct_joins_fragments() {
    let (_dir, mut db) = fresh_db();
    put_bucket(&mut db, 10, *b"AC\0\0");
    put_bucket(&mut db, 11, *b"Cor\0");
    put_bucket(&mut db, 12, *b"p.\0\0");
    put_company(&mut db, 100, &[10, 11, 12]);

    let name = db.reconstruct_name(100).unwrap();
    assert_eq!(name, "AC Cor p.");
    assert_eq!(name.len(), 2 + 1 + 3 + 1 + 2);
}

#[test]
fn test_reconstruct_single_fragment() {
    let (_dir, mut db) = fresh_db();
    put_bucket(&mut db, 3, *b"IGT\0");
    put_company(&mut db, 5, &[3]);
    assert_eq!(db.reconstruct_name(5).unwrap(), "IGT");
}

#[test]
fn test_reconstruct_reuses_buckets() {
    let (_dir, mut db) = fresh_db();
    put_bucket(&mut db, 1, *b"Inc\0");
    put_bucket(&mut db, 2, *b"Foo\0");
    put_bucket(&mut db, 3, *b"Bar\0");
    put_company(&mut db, 10, &[2, 1]);
    put_company(&mut db, 20, &[3, 1]);

    assert_eq!(db.reconstruct_name(10).unwrap(), "Foo Inc");
    assert_eq!(db.reconstruct_name(20).unwrap(), "Bar Inc");
}

#[test]
fn test_reconstruct_rejects_sequence_past_table() {
    let (_dir, mut db) = fresh_db();
    db.mapped_mut().region_mut(Region::Counts)[0xFFFF] = 2;

    assert!(matches!(
        db.reconstruct_name(0xFFFF),
        Err(Error::SequenceOutOfBounds {
            company: 0xFFFF,
            count: 2
        })
    ));
}

#[test]
fn test_reconstruct_last_sequence_slot() {
    let (_dir, mut db) = fresh_db();
    put_bucket(&mut db, 9, *b"End\0");
    put_company(&mut db, 0xFFFF, &[9]);
    assert_eq!(db.reconstruct_name(0xFFFF).unwrap(), "End");
}

#[test]
fn test_reconstruct_rejects_unterminated_bucket() {
    let (_dir, mut db) = fresh_db();
    put_bucket(&mut db, 4, *b"ACME");
    put_company(&mut db, 8, &[4]);

    assert!(matches!(
        db.reconstruct_name(8),
        Err(Error::UnterminatedBucket(4))
    ));
}

#[test]
fn test_reconstruct_rejects_invalid_utf8() {
    let (_dir, mut db) = fresh_db();
    put_bucket(&mut db, 6, [0xFF, 0xFE, 0, 0]);
    put_company(&mut db, 8, &[6]);

    assert!(matches!(
        db.reconstruct_name(8),
        Err(Error::InvalidFragment(6))
    ));
}

// ============================================================================
// Writer Round-Trip Tests
// ============================================================================

#[test]
fn test_writer_round_trip() {
    let mut writer = DatabaseWriter::new();
    writer.add_vendor(0x0017F2, "Apple Inc").unwrap();
    writer.add_vendor(0x00000C, "Cisco Systems Inc").unwrap();
    writer.add_vendor(0x080027, "PCS").unwrap();

    let (_dir, db) = write_and_open(&writer);

    assert_eq!(
        db.lookup_text("00:17:f2:aa:bb:cc").unwrap().as_deref(),
        Some("App le Inc")
    );
    assert_eq!(
        db.lookup_text("00:00:0C:01:02:03").unwrap().as_deref(),
        Some("Cis co Sys tem s Inc")
    );
    assert_eq!(
        db.lookup_text("080027000001").unwrap().as_deref(),
        Some("PCS")
    );
    assert_eq!(db.lookup_text("ff:ff:ff:ff:ff:ff").unwrap(), None);
}

#[test]
fn test_writer_shares_company_between_ouis() {
    let mut writer = DatabaseWriter::new();
    writer.add_vendor(0x000001, "Xerox").unwrap();
    writer.add_vendor(0x000002, "Xerox").unwrap();

    let (_dir, db) = write_and_open(&writer);

    let a = db.lookup_company(MacAddress::new(0x000001_000000));
    let b = db.lookup_company(MacAddress::new(0x000002_000000));
    assert_ne!(a, UNKNOWN_COMPANY);
    assert_eq!(a, b);
}

#[test]
fn test_writer_replaces_previous_contents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("oui.db");

    let mut first = DatabaseWriter::new();
    first.add_vendor(0x111111, "Old").unwrap();
    first.build(&path).unwrap().close();

    let mut second = DatabaseWriter::new();
    second.add_vendor(0x222222, "New").unwrap();
    let db = second.build(&path).unwrap();

    assert_eq!(db.lookup_text("11:11:11:00:00:00").unwrap(), None);
    assert_eq!(
        db.lookup_text("22:22:22:00:00:00").unwrap().as_deref(),
        Some("New")
    );
}

#[test]
fn test_writer_skips_records_past_capacity() {
    let records: Vec<VendorRecord> = (0..38_000u32)
        .map(|i| VendorRecord {
            oui: 0x100000 + i,
            name: format!("Vendor{} Networks Co., Ltd.", i),
        })
        .collect();

    let mut writer = DatabaseWriter::new();
    let skipped = writer.add_records(&records).unwrap();
    assert!(skipped > 0);

    let (_dir, db) = write_and_open(&writer);
    assert_eq!(
        db.lookup(MacAddress::new(0x100000_000001)).unwrap().as_deref(),
        Some("Ven dor 0 Net wor ks Co. , Ltd .")
    );
    let last = records.last().unwrap();
    assert_eq!(db.lookup(MacAddress::new((last.oui as u64) << 24)).unwrap(), None);
    assert_eq!(db.stats().assigned_ouis, records.len() - skipped);
}

#[test]
fn test_stats() {
    let mut writer = DatabaseWriter::new();
    writer.add_vendor(0x000001, "Foo Inc").unwrap();
    writer.add_vendor(0x000002, "Bar Inc").unwrap();
    writer.add_vendor(0x000003, "Foo Inc").unwrap();

    let (_dir, db) = write_and_open(&writer);
    let stats = db.stats();

    assert_eq!(stats.assigned_ouis, 3);
    assert_eq!(stats.companies, 2);
    assert_eq!(stats.buckets, 3);
}

// ============================================================================
// Shared Mapping Tests
// ============================================================================

#[test]
fn test_two_handles_see_same_values() {
    let mut writer = DatabaseWriter::new();
    writer.add_vendor(0xABCDEF, "Shared Vendor").unwrap();
    let (dir, first) = write_and_open(&writer);
    let second = OuiDatabase::open(dir.path().join("oui.db")).unwrap();

    for oui in [0u32, 0xABCDEF, 0xABCDEE, 0xFFFFFF] {
        let mac = MacAddress::new((oui as u64) << 24);
        assert_eq!(first.lookup_company(mac), second.lookup_company(mac));
        assert_eq!(first.lookup(mac).unwrap(), second.lookup(mac).unwrap());
    }
}

#[test]
fn test_writes_are_visible_through_other_handle() {
    let (dir, mut writer_handle) = fresh_db();
    let reader_handle = OuiDatabase::open(dir.path().join("oui.db")).unwrap();

    let mac = MacAddress::new(0x00AA00_112233);
    assert_eq!(reader_handle.lookup_company(mac), UNKNOWN_COMPANY);

    put_oui(&mut writer_handle, 0x00AA00, 99);
    assert_eq!(reader_handle.lookup_company(mac), 99);
}
