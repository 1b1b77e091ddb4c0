//! Memory-mapped database file.
//!
//! The file is opened read/write (created if absent), pre-allocated to
//! [`DB_SIZE`] and mapped as four independent shared regions, so writes made
//! through one mapping are visible to every other process mapping the file.

use memmap2::{MmapMut, MmapOptions};
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use super::format::*;
use crate::{Error, Result};

/// Owner of the open database file and its four mapped regions.
///
/// Field order matters: the mappings are dropped before the file is closed.
pub struct MappedFile {
    index: MmapMut,
    buckets: MmapMut,
    sequences: MmapMut,
    counts: MmapMut,
    file: File,
    path: PathBuf,
}

impl MappedFile {
    /// Open (or create) the database file and map all regions.
    pub fn open(path: &Path) -> Result<Self> {
        let file = open_file(path).map_err(|source| {
            log::error!("Unable to open/create OUI DB file {:?}: {}", path, source);
            Error::Open {
                path: path.to_path_buf(),
                source,
            }
        })?;

        allocate(&file, DB_SIZE).map_err(|source| {
            log::error!("Unable to allocate space for database file {:?}: {}", path, source);
            Error::Allocate {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let mapped = Self {
            index: map_region(&file, Region::Index)?,
            buckets: map_region(&file, Region::Buckets)?,
            sequences: map_region(&file, Region::Sequences)?,
            counts: map_region(&file, Region::Counts)?,
            file,
            path: path.to_path_buf(),
        };

        log::debug!("Mapped OUI database {:?} ({} bytes)", path, DB_SIZE);
        Ok(mapped)
    }

    /// Path the database was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read-only view of a region.
    pub fn region(&self, region: Region) -> &[u8] {
        match region {
            Region::Index => &self.index[..],
            Region::Buckets => &self.buckets[..],
            Region::Sequences => &self.sequences[..],
            Region::Counts => &self.counts[..],
        }
    }

    /// Writable view of a region.
    pub fn region_mut(&mut self, region: Region) -> &mut [u8] {
        match region {
            Region::Index => &mut self.index[..],
            Region::Buckets => &mut self.buckets[..],
            Region::Sequences => &mut self.sequences[..],
            Region::Counts => &mut self.counts[..],
        }
    }

    /// Flush all regions to the file.
    pub fn flush(&self) -> Result<()> {
        self.index.flush()?;
        self.buckets.flush()?;
        self.sequences.flush()?;
        self.counts.flush()?;
        Ok(())
    }

    /// Unmap all regions, then close the file.
    ///
    /// Does not flush: persistence is whatever the OS guarantees for shared
    /// mappings. Use [`MappedFile::flush`] first when that matters.
    pub fn close(self) {
        let Self {
            index,
            buckets,
            sequences,
            counts,
            file,
            path,
        } = self;

        drop(index);
        drop(buckets);
        drop(sequences);
        drop(counts);
        drop(file);

        log::debug!("Closed OUI database {:?}", path);
    }
}

fn open_file(path: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.read(true).write(true).create(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o660);
    }

    options.open(path)
}

/// Make sure the file has real extents for the first `len` bytes.
#[cfg(any(target_os = "linux", target_os = "android", target_os = "freebsd"))]
fn allocate(file: &File, len: u64) -> io::Result<()> {
    use std::os::unix::io::AsRawFd;

    let err = unsafe { libc::posix_fallocate(file.as_raw_fd(), 0, len as libc::off_t) };
    match err {
        0 => Ok(()),
        // Filesystem can't preallocate; fall back to extending the file.
        libc::EOPNOTSUPP | libc::EINVAL => extend(file, len),
        _ => Err(io::Error::from_raw_os_error(err)),
    }
}

#[cfg(not(any(target_os = "linux", target_os = "android", target_os = "freebsd")))]
fn allocate(file: &File, len: u64) -> io::Result<()> {
    extend(file, len)
}

/// Grow the file to `len` bytes. Never shrinks.
fn extend(file: &File, len: u64) -> io::Result<()> {
    if file.metadata()?.len() < len {
        file.set_len(len)?;
    }
    Ok(())
}

fn map_region(file: &File, region: Region) -> Result<MmapMut> {
    let mmap = unsafe {
        MmapOptions::new()
            .offset(region.offset())
            .len(region.len())
            .map_mut(file)
    };

    mmap.map_err(|source| {
        log::error!("Unable to map {} region into memory: {}", region, source);
        Error::Map { region, source }
    })
}
