//! The store handle: one open container file.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::container::Group;
use crate::error::StoreError;
use crate::format::{self, Format};

/// How a container file is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Read an existing file. Changes are never written back.
    Read,
    /// Create the file, truncating any existing one.
    Write,
    /// Open an existing file for update, creating it if missing.
    Append,
}

impl Mode {
    pub fn is_writable(self) -> bool {
        !matches!(self, Mode::Read)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Read => write!(f, "read"),
            Mode::Write => write!(f, "write"),
            Mode::Append => write!(f, "append"),
        }
    }
}

/// An open container file.
///
/// The file is opened (and for [`Mode::Write`], created) on construction.
/// The tree is held in memory and written back on [`close`](Store::close)
/// or [`flush`](Store::flush). Dropping a writable store without closing it
/// flushes it; failures on that path are logged.
///
/// # Example
///
/// ```no_run
/// use guidata_store::{AttrValue, Mode, Store};
///
/// let mut store = Store::open("settings.gdc", Mode::Write).unwrap();
/// store.root_mut().set_attr("version", AttrValue::Int(1));
/// store.close().unwrap();
/// ```
pub struct Store {
    path: PathBuf,
    mode: Mode,
    format: Format,
    root: Group,
    closed: bool,
}

impl Store {
    /// Open `path` in `mode`, picking the payload format from the extension
    /// when a new file is created.
    pub fn open(path: impl AsRef<Path>, mode: Mode) -> Result<Self, StoreError> {
        let path = path.as_ref();
        Self::open_with_format(path, mode, Format::for_path(path))
    }

    /// Open `path` in `mode`. `format` is used for newly created files;
    /// existing files keep the format they were written in.
    pub fn open_with_format(
        path: impl AsRef<Path>,
        mode: Mode,
        format: Format,
    ) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let opened = match mode {
            Mode::Read => Self::load(path, mode),
            Mode::Append if path.exists() => Self::load(path, mode),
            Mode::Write | Mode::Append => Self::create(path, mode, format),
        };
        match opened {
            Ok(store) => {
                log::info!(
                    "Opened container {} ({} mode, {:?})",
                    path.display(),
                    mode,
                    store.format
                );
                Ok(store)
            }
            Err(source) => {
                log::error!(
                    "Error trying to load {} in {} mode: {source}",
                    path.display(),
                    mode
                );
                Err(StoreError::Open {
                    path: path.to_path_buf(),
                    mode,
                    source: Box::new(source),
                })
            }
        }
    }

    fn load(path: &Path, mode: Mode) -> Result<Self, StoreError> {
        let (root, format) = format::read_file(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            mode,
            format,
            root,
            closed: false,
        })
    }

    fn create(path: &Path, mode: Mode, format: Format) -> Result<Self, StoreError> {
        let root = Group::new();
        format::write_file(path, &root, format)?;
        Ok(Self {
            path: path.to_path_buf(),
            mode,
            format,
            root,
            closed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn format(&self) -> Format {
        self.format
    }

    /// The root group.
    pub fn root(&self) -> &Group {
        &self.root
    }

    /// The root group, for modification.
    ///
    /// Changes made to a [`Mode::Read`] store stay in memory.
    pub fn root_mut(&mut self) -> &mut Group {
        &mut self.root
    }

    /// Write the current tree back to disk. No-op in [`Mode::Read`].
    pub fn flush(&self) -> Result<(), StoreError> {
        if !self.mode.is_writable() {
            return Ok(());
        }
        format::write_file(&self.path, &self.root, self.format)?;
        log::debug!("Flushed container {}", self.path.display());
        Ok(())
    }

    /// Flush and release the file.
    pub fn close(mut self) -> Result<(), StoreError> {
        self.closed = true;
        self.flush()?;
        log::info!("Closed container {}", self.path.display());
        Ok(())
    }
}

impl Store {
    /// Release the file without writing the in-memory tree back.
    pub(crate) fn discard(mut self) {
        self.closed = true;
        if self.mode.is_writable() {
            log::warn!("Discarded unsaved changes to {}", self.path.display());
        }
    }
}

impl Drop for Store {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = self.flush() {
            log::warn!(
                "Failed to flush container {} on drop: {e}",
                self.path.display()
            );
        }
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("path", &self.path)
            .field("mode", &self.mode)
            .field("format", &self.format)
            .finish()
    }
}
