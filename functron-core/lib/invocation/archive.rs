//! The build context archive sent along with each invocation.
//!
//! Files are streamed into an uncompressed tar archive backed by a private temporary file. The
//! archive is sealed the first time its bytes are read, after which it can be read again but no
//! longer appended to.

use std::{
    fmt,
    fs::{self, File},
    io::{self, Write},
    path::Path,
};

use tar::Builder;
use tempfile::NamedTempFile;

use crate::{FunctronError, FunctronResult};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// An append-only tar archive of build context files.
///
/// The backing temporary file is removed when the archive is dropped, whether or not it was
/// ever sealed.
#[derive(Debug)]
pub struct BuildContext {
    // Declared before `file` so the writer is finished before the file is removed.
    state: ArchiveState,
    file: NamedTempFile,
}

/// Whether the archive still accepts entries.
enum ArchiveState {
    Unsealed(Builder<File>),
    Sealed,
    /// Writing the end-of-archive trailer failed, so the file on disk is truncated.
    Broken,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl BuildContext {
    /// Creates an empty archive backed by a new temporary file.
    pub fn new() -> FunctronResult<Self> {
        let file = NamedTempFile::new()?;
        let mut builder = Builder::new(file.reopen()?);
        builder.follow_symlinks(false);

        tracing::trace!("created build context archive at {}", file.path().display());

        Ok(Self {
            state: ArchiveState::Unsealed(builder),
            file,
        })
    }

    /// Appends a file, or a directory and everything below it, to the archive.
    ///
    /// The entry is stored as `archive_name`. When `archive_name` is empty, a directory's
    /// contents go to the root of the archive and a file keeps the last component of `path`.
    /// Symbolic links are stored as links.
    pub fn append(&mut self, path: impl AsRef<Path>, archive_name: &str) -> FunctronResult<()> {
        let path = path.as_ref();
        let builder = match &mut self.state {
            ArchiveState::Unsealed(builder) => builder,
            ArchiveState::Sealed => return Err(FunctronError::ArchiveSealed),
            ArchiveState::Broken => return Err(FunctronError::ArchiveIncomplete),
        };

        let metadata = fs::metadata(path)?;
        let name = match (archive_name.is_empty(), metadata.is_dir()) {
            (false, _) => Path::new(archive_name),
            (true, true) => Path::new(""),
            (true, false) => path.file_name().map(Path::new).ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("cannot derive an archive name from {}", path.display()),
                )
            })?,
        };

        if metadata.is_dir() {
            builder.append_dir_all(name, path)?;
        } else {
            builder.append_path_with_name(path, name)?;
        }

        tracing::debug!("added {} to build context as {}", path.display(), name.display());

        Ok(())
    }

    /// Whether the archive has been sealed.
    pub fn is_sealed(&self) -> bool {
        matches!(self.state, ArchiveState::Sealed)
    }

    /// Finishes the archive so no more entries can be added. Sealing twice is a no-op.
    ///
    /// If the trailer cannot be written the archive is left broken, and every later call fails
    /// with [`FunctronError::ArchiveIncomplete`] instead of handing out a truncated archive.
    pub fn seal(&mut self) -> FunctronResult<()> {
        let builder = match &mut self.state {
            ArchiveState::Unsealed(builder) => builder,
            ArchiveState::Sealed => return Ok(()),
            ArchiveState::Broken => return Err(FunctronError::ArchiveIncomplete),
        };

        let finished = builder.finish().and_then(|()| builder.get_mut().flush());
        if let Err(e) = finished {
            self.state = ArchiveState::Broken;
            return Err(e.into());
        }

        self.state = ArchiveState::Sealed;
        tracing::debug!("sealed build context archive at {}", self.file.path().display());

        Ok(())
    }

    /// Seals the archive if needed and reads its full contents.
    ///
    /// Repeated calls return the same bytes for as long as the archive lives.
    pub fn to_bytes(&mut self) -> FunctronResult<Vec<u8>> {
        self.seal()?;
        let bytes = fs::read(self.file.path())?;
        tracing::trace!("read {} bytes of build context archive", bytes.len());
        Ok(bytes)
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl fmt::Debug for ArchiveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArchiveState::Unsealed(_) => f.write_str("Unsealed"),
            ArchiveState::Sealed => f.write_str("Sealed"),
            ArchiveState::Broken => f.write_str("Broken"),
        }
    }
}

impl Drop for BuildContext {
    fn drop(&mut self) {
        if matches!(self.state, ArchiveState::Broken) {
            return;
        }

        if let Err(e) = self.seal() {
            tracing::warn!("failed to finish build context archive: {}", e);
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
