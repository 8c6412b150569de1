//! Filesystem storage medium.
//!
//! Implements [`StoragePort`] with `std::fs`, rooted at one directory.
//! On the device the root is the FAT mount point set up by
//! [`hw_init::mount_storage`](crate::drivers::hw_init::mount_storage);
//! on the host it is a plain directory.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::app::ports::{OpenMode, StorageError, StoragePort};

pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        if !self.root.is_dir() {
            return Err(StorageError::Unavailable);
        }
        Ok(self.root.join(path))
    }
}

fn map_io(e: &io::Error) -> StorageError {
    match e.kind() {
        io::ErrorKind::NotFound => StorageError::NotFound,
        io::ErrorKind::StorageFull => StorageError::Full,
        _ => StorageError::IoError,
    }
}

impl StoragePort for FsStorage {
    type Handle = File;

    fn open(&mut self, path: &str, mode: OpenMode) -> Result<File, StorageError> {
        let full = self.resolve(path)?;
        let mut options = OpenOptions::new();
        match mode {
            OpenMode::Read => options.read(true),
            OpenMode::Create => options.write(true).create(true).truncate(true),
            OpenMode::Append => options.append(true),
        };
        options.open(&full).map_err(|e| {
            debug!("fs: open {} ({:?}) failed: {}", full.display(), mode, e);
            map_io(&e)
        })
    }

    fn read(&mut self, handle: &mut File, buf: &mut [u8]) -> Result<usize, StorageError> {
        handle.read(buf).map_err(|e| map_io(&e))
    }

    fn write(&mut self, handle: &mut File, data: &[u8]) -> Result<(), StorageError> {
        handle.write_all(data).map_err(|e| map_io(&e))
    }

    fn flush(&mut self, handle: &mut File) -> Result<(), StorageError> {
        handle.flush().map_err(|e| map_io(&e))?;
        handle.sync_data().map_err(|e| map_io(&e))
    }

    fn close(&mut self, handle: File) -> Result<(), StorageError> {
        drop(handle);
        Ok(())
    }

    fn remove(&mut self, path: &str) -> Result<(), StorageError> {
        std::fs::remove_file(self.resolve(path)?).map_err(|e| map_io(&e))
    }
}
