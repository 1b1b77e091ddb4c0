//! Error types for ouidb.

use std::path::PathBuf;

use thiserror::Error;

use crate::database::Region;

/// Error type for ouidb operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The database file could not be opened or created
    #[error("unable to open/create OUI database {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Disk space for the database file could not be reserved
    #[error("unable to allocate space for database file {path:?}: {source}")]
    Allocate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A region of the database file could not be mapped
    #[error("unable to map {region} region into memory: {source}")]
    Map {
        region: Region,
        #[source]
        source: std::io::Error,
    },

    /// A company's fragment sequence runs past the end of the sequence table
    #[error("company {company} has {count} fragments, running past the sequence table")]
    SequenceOutOfBounds { company: u16, count: u8 },

    /// A bucket fills all 4 bytes without a terminator
    #[error("bucket {0} is not NUL-terminated")]
    UnterminatedBucket(u16),

    /// A bucket holds bytes that are not valid UTF-8
    #[error("bucket {0} holds an invalid UTF-8 fragment")]
    InvalidFragment(u16),

    /// The builder ran out of buckets or sequence slots
    #[error("{0} table is full")]
    TableFull(&'static str),

    /// A word fragment longer than a bucket can hold
    #[error("fragment does not fit a bucket: {0:?}")]
    FragmentTooLong(String),

    /// A vendor name with no words
    #[error("empty vendor name for OUI {0:06x}")]
    EmptyName(u32),

    /// An OUI wider than 24 bits
    #[error("OUI out of range: {0:#x}")]
    OuiOutOfRange(u32),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// A global logger is already installed
    #[error("logger initialization failed: {0}")]
    Logger(#[from] log::SetLoggerError),
}

/// Result type alias for ouidb operations.
pub type Result<T> = std::result::Result<T, Error>;
