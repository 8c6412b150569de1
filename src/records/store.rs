//! [`RecordStore`]: owns the storage medium and the three record files.
//!
//! All calls block for as long as the medium does.  The store is only
//! used from the control-loop thread, so no locking happens here.

use std::time::Duration;

use log::{debug, info, warn};

use super::field::{Line, LINE_CAP};
use super::telemetry::EXAMPLE_WARNING;
use super::{config_line, RecordError, RecordKind, TelemetryRecord, MARKER_PATH};
use crate::app::ports::{OpenMode, StorageError, StoragePort};
use crate::config::ControllerConfig;

/// Outcome of [`RecordStore::ensure_exists`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bootstrap {
    /// The file was already readable.
    Existing,
    /// The file was (re)created with its header and placeholder line.
    Created,
}

/// Where a loaded configuration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    Stored,
    CreatedWithDefaults,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigLoad {
    pub config: ControllerConfig,
    pub source: ConfigSource,
}

pub struct RecordStore<S: StoragePort> {
    storage: S,
    /// Seeds a new configuration file and supplies the fields the
    /// configuration line does not carry.
    defaults: ControllerConfig,
}

impl<S: StoragePort> RecordStore<S> {
    pub fn new(storage: S, defaults: ControllerConfig) -> Self {
        Self { storage, defaults }
    }

    pub fn defaults(&self) -> &ControllerConfig {
        &self.defaults
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    // ── Startup ───────────────────────────────────────────────

    /// Create and remove the readiness marker, retrying up to `attempts`
    /// times with `delay` in between.  Returns the last failure.
    pub fn probe_medium(&mut self, attempts: u32, delay: Duration) -> Result<(), StorageError> {
        let mut last = StorageError::Unavailable;
        for attempt in 1..=attempts {
            match self.write_marker() {
                Ok(()) => {
                    debug!("Storage ready after {} attempt(s)", attempt);
                    return Ok(());
                }
                Err(e) => {
                    warn!("Storage probe {}/{} failed: {}", attempt, attempts, e);
                    last = e;
                    if attempt < attempts {
                        std::thread::sleep(delay);
                    }
                }
            }
        }
        Err(last)
    }

    fn write_marker(&mut self) -> Result<(), StorageError> {
        let handle = self.storage.open(MARKER_PATH, OpenMode::Create)?;
        self.write_and_close(handle, &[b"ready"])?;
        self.storage.remove(MARKER_PATH)
    }

    /// Make sure `kind`'s file exists; if it is missing, create it with its
    /// header and placeholder line.  Any other open error is returned and
    /// the file is left untouched.
    pub fn ensure_exists(&mut self, kind: RecordKind) -> Result<Bootstrap, RecordError> {
        let file = kind.file();
        match self.storage.open(file.path, OpenMode::Read) {
            Ok(handle) => {
                if let Err(e) = self.storage.close(handle) {
                    debug!("{}: close after existence check failed: {}", file.path, e);
                }
                return Ok(Bootstrap::Existing);
            }
            Err(StorageError::NotFound) => info!("{}: missing, creating", file.path),
            // Anything else may be transient; the file could still hold data.
            Err(e) => return Err(e.into()),
        }

        let template = self.template(kind)?;
        let handle = self.storage.open(file.path, OpenMode::Create)?;
        self.write_and_close(handle, &[file.header.as_bytes(), template.as_bytes()])?;
        Ok(Bootstrap::Created)
    }

    /// [`ensure_exists`](Self::ensure_exists) for every kind, stopping at
    /// the first failure.
    pub fn ensure_all(&mut self) -> Result<(), (RecordKind, RecordError)> {
        for kind in RecordKind::ALL {
            self.ensure_exists(kind).map_err(|e| (kind, e))?;
        }
        Ok(())
    }

    /// Placeholder line written when a file is created.
    fn template(&self, kind: RecordKind) -> Result<Line, RecordError> {
        match kind {
            RecordKind::Configuration => config_line::encode(&self.defaults),
            RecordKind::Telemetry => TelemetryRecord::default().render(),
            RecordKind::Warning => TelemetryRecord::default().render_warning(EXAMPLE_WARNING),
        }
    }

    // ── Configuration ─────────────────────────────────────────

    /// Read the configuration record.  A missing file is created from the
    /// defaults and the defaults are returned.
    pub fn load_configuration(&mut self) -> Result<ConfigLoad, RecordError> {
        let path = RecordKind::Configuration.file().path;
        let mut handle = match self.storage.open(path, OpenMode::Read) {
            Ok(h) => h,
            Err(StorageError::NotFound) => {
                self.ensure_exists(RecordKind::Configuration)?;
                return Ok(ConfigLoad {
                    config: self.defaults,
                    source: ConfigSource::CreatedWithDefaults,
                });
            }
            Err(e) => return Err(e.into()),
        };

        let result = self.read_configuration(&mut handle);
        if let Err(e) = self.storage.close(handle) {
            debug!("{}: close after load failed: {}", path, e);
        }
        Ok(ConfigLoad {
            config: result?,
            source: ConfigSource::Stored,
        })
    }

    fn read_configuration(&mut self, handle: &mut S::Handle) -> Result<ControllerConfig, RecordError> {
        let file = RecordKind::Configuration.file();
        let mut buf = [0u8; LINE_CAP];

        let header_len = file.header.len();
        self.read_exact(handle, buf.get_mut(..header_len).ok_or(RecordError::LineTooLong)?)?;

        let line_len = file.layout.len();
        let line_buf = buf.get_mut(..line_len).ok_or(RecordError::LineTooLong)?;
        self.read_exact(handle, line_buf)?;

        let line = core::str::from_utf8(line_buf).map_err(|_| RecordError::Field {
            field: "configuration",
            problem: super::FieldProblem::Malformed,
        })?;
        let config = config_line::decode(line, &self.defaults)?;
        config.validate().map_err(RecordError::Rejected)?;
        Ok(config)
    }

    /// Fill `buf` completely.  Nothing at all is [`RecordError::EndOfFile`],
    /// a partial fill is [`RecordError::ReadLengthMismatch`].
    fn read_exact(&mut self, handle: &mut S::Handle, buf: &mut [u8]) -> Result<(), RecordError> {
        let mut filled = 0;
        while filled < buf.len() {
            let n = self.storage.read(handle, &mut buf[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        match filled {
            n if n == buf.len() => Ok(()),
            0 => Err(RecordError::EndOfFile),
            actual => Err(RecordError::ReadLengthMismatch {
                expected: buf.len(),
                actual,
            }),
        }
    }

    // ── Logs ──────────────────────────────────────────────────

    /// Append one telemetry line.  If the log cannot be opened for append
    /// it is recreated once before giving up.
    pub fn append_telemetry(&mut self, record: &TelemetryRecord) -> Result<(), RecordError> {
        let line = record.render()?;
        let path = RecordKind::Telemetry.file().path;
        let handle = match self.storage.open(path, OpenMode::Append) {
            Ok(h) => h,
            Err(e) => {
                warn!("{}: append open failed ({}), recreating", path, e);
                self.ensure_exists(RecordKind::Telemetry)?;
                self.storage.open(path, OpenMode::Append)?
            }
        };
        self.write_and_close(handle, &[line.as_bytes()])?;
        Ok(())
    }

    /// Warning lines are not persisted yet; always succeeds.
    pub fn append_warning(&mut self, _record: &TelemetryRecord, message: &str) -> Result<(), RecordError> {
        debug!("warning not persisted: {}", message);
        Ok(())
    }

    /// Write every chunk, flush, and always close the handle.
    fn write_and_close(&mut self, mut handle: S::Handle, chunks: &[&[u8]]) -> Result<(), StorageError> {
        let written = chunks
            .iter()
            .try_for_each(|chunk| self.storage.write(&mut handle, chunk))
            .and_then(|()| self.storage.flush(&mut handle));
        let closed = self.storage.close(handle);
        written.and(closed)
    }
}
