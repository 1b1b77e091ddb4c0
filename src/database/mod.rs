//! Memory-mapped OUI database.
//!
//! The file is a raw image of four fixed-size arrays and has no header:
//!
//! ```text
//! +------------------------+  0
//! |  OUI INDEX             |  u16 company id per 24-bit OUI (32 MiB)
//! +------------------------+  32 MiB
//! |  BUCKETS               |  65536 x 4-byte NUL-terminated fragments
//! +------------------------+  +256 KiB
//! |  SEQUENCES             |  65536 x u16 bucket index
//! +------------------------+  +128 KiB
//! |  COUNTS                |  65536 x u8 fragment count per company
//! +------------------------+  +64 KiB
//! ```
//!
//! A company id doubles as its first position in the sequence table: the
//! name of company `c` is `buckets[sequences[c + i]]` for
//! `i in 0..counts[c]`, joined with spaces. Company id 0 is the unknown
//! vendor.

mod format;
mod mapped;
mod reader;
pub mod writer;

#[cfg(test)]
mod tests;

pub use format::*;
pub use mapped::MappedFile;
pub use reader::{DatabaseStats, OuiDatabase};
pub use writer::DatabaseWriter;
