//! ouidb - A memory-mapped OUI to vendor name database.
//!
//! Maps the Organizationally Unique Identifier (the top 24 bits of a MAC
//! address) to the vendor's name. The database is a single fixed-layout file
//! mapped into memory, so a lookup is a couple of array reads with no parsing
//! or seeking.
//!
//! # Features
//!
//! - **O(1) lookups**: the OUI indexes a direct array of company ids
//! - **Compact names**: vendor names are stored as deduplicated 4-byte word
//!   fragments ("Inc.", "Corp." and friends are stored once)
//! - **Shared mappings**: every process mapping the file sees the same data
//! - **Lenient MAC parsing**: colons anywhere, any case, short input zero-padded
//!
//! # Quick Start
//!
//! ```ignore
//! use ouidb::{DatabaseWriter, MacAddress, OuiDatabase};
//!
//! // Build a database
//! let mut writer = DatabaseWriter::new();
//! writer.add_vendor(0x0017F2, "Apple, Inc.")?;
//! writer.build("oui.db")?.close();
//!
//! // Look up a vendor
//! let db = OuiDatabase::open("oui.db")?;
//! let name = db.lookup(MacAddress::parse_text("00:17:f2:01:02:03"))?;
//! assert_eq!(name.as_deref(), Some("App le, Inc ."));
//! db.close();
//! ```
//!
//! Words longer than three bytes are split across several buckets, and the
//! fragments are joined back with spaces, so reconstructed names are a
//! diagnostic rendering rather than the exact registry text.

mod error;
mod mac;

pub mod config;
pub mod database;
pub mod logging;
pub mod registry;

// Re-export core types
pub use error::{Error, Result};
pub use mac::{AddressFlags, MacAddress, MAC_MASK};

// Re-export database types
pub use database::{CompanyId, DatabaseStats, DatabaseWriter, MappedFile, OuiDatabase};

// Re-export configuration
pub use config::Config;
pub use registry::{RegistryParser, VendorRecord};
