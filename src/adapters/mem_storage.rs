//! In-memory storage medium.
//!
//! Implements [`StoragePort`] over a `HashMap` of paths to byte vectors.
//! Used by the host test-suite and anywhere a throwaway medium is
//! needed.  Faults can be injected: the whole medium can be made
//! unavailable, individual paths can be made to fail on open, and a
//! single open of a path in a given mode can be made to fail once.

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::app::ports::{OpenMode, StorageError, StoragePort};

/// Open-file handle for [`MemStorage`].
#[derive(Debug)]
pub struct MemHandle {
    path: String,
    pos: usize,
}

#[derive(Debug, Default)]
pub struct MemStorage {
    files: HashMap<String, Vec<u8>>,
    failing: HashSet<String>,
    fail_once: HashSet<(String, OpenMode)>,
    unavailable: bool,
    open_calls: usize,
}

impl MemStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Contents of `path`, if present.
    pub fn file(&self, path: &str) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }

    /// Replace (or create) `path` with `data`, bypassing the port.
    pub fn insert(&mut self, path: &str, data: &[u8]) {
        self.files.insert(path.to_owned(), data.to_vec());
    }

    /// Every open fails with [`StorageError::Unavailable`] while set.
    pub fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }

    /// Opens of `path` fail with [`StorageError::IoError`] until
    /// [`clear_faults`](Self::clear_faults).
    pub fn fail_path(&mut self, path: &str) {
        self.failing.insert(path.to_owned());
    }

    /// The next open of `path` in `mode` fails with
    /// [`StorageError::IoError`]; later opens behave normally.
    pub fn fail_next_open(&mut self, path: &str, mode: OpenMode) {
        self.fail_once.insert((path.to_owned(), mode));
    }

    pub fn clear_faults(&mut self) {
        self.failing.clear();
        self.fail_once.clear();
        self.unavailable = false;
    }

    /// Number of `open` calls so far, failed ones included.
    pub fn open_calls(&self) -> usize {
        self.open_calls
    }

    fn entry(&mut self, handle: &MemHandle) -> Result<&mut Vec<u8>, StorageError> {
        self.files.get_mut(&handle.path).ok_or(StorageError::NotFound)
    }
}

impl StoragePort for MemStorage {
    type Handle = MemHandle;

    fn open(&mut self, path: &str, mode: OpenMode) -> Result<MemHandle, StorageError> {
        self.open_calls += 1;
        if self.unavailable {
            return Err(StorageError::Unavailable);
        }
        if self.failing.contains(path) || self.fail_once.remove(&(path.to_owned(), mode)) {
            return Err(StorageError::IoError);
        }
        match mode {
            OpenMode::Read | OpenMode::Append if !self.files.contains_key(path) => {
                return Err(StorageError::NotFound);
            }
            OpenMode::Create => {
                self.files.insert(path.to_owned(), Vec::new());
            }
            _ => {}
        }
        debug!("mem: open {} ({:?})", path, mode);
        Ok(MemHandle {
            path: path.to_owned(),
            pos: 0,
        })
    }

    fn read(&mut self, handle: &mut MemHandle, buf: &mut [u8]) -> Result<usize, StorageError> {
        let data = self.entry(handle)?;
        let rest = data.get(handle.pos..).unwrap_or_default();
        let n = rest.len().min(buf.len());
        buf[..n].copy_from_slice(&rest[..n]);
        handle.pos += n;
        Ok(n)
    }

    fn write(&mut self, handle: &mut MemHandle, data: &[u8]) -> Result<(), StorageError> {
        if self.unavailable {
            return Err(StorageError::Unavailable);
        }
        self.entry(handle)?.extend_from_slice(data);
        Ok(())
    }

    fn flush(&mut self, _handle: &mut MemHandle) -> Result<(), StorageError> {
        if self.unavailable {
            return Err(StorageError::Unavailable);
        }
        Ok(())
    }

    fn close(&mut self, _handle: MemHandle) -> Result<(), StorageError> {
        Ok(())
    }

    fn remove(&mut self, path: &str) -> Result<(), StorageError> {
        self.files
            .remove(path)
            .map(|_| ())
            .ok_or(StorageError::NotFound)
    }
}
