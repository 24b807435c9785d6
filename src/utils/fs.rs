//! File system utilities.

use crate::utils::hash;
use crate::Result;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;

/// Whether two paths name the same existing file or directory.
///
/// Handles case-only differences on case-insensitive filesystems and
/// symlinked parents.
pub fn same_path(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(ca), Ok(cb)) => ca == cb,
        _ => false,
    }
}

/// Move a file, never replacing an existing destination.
///
/// Tries an atomic rename first. Only when source and destination sit on
/// different filesystems does it fall back to copy, optional SHA-256
/// verification, then delete. A failed fallback removes its copy.
pub fn move_file(from: &Path, to: &Path, verify_checksum: bool) -> Result<()> {
    if !from.exists() {
        return Err(crate::Error::PathNotFound(from.display().to_string()));
    }
    if to.exists() && !same_path(from, to) {
        return Err(already_exists(to).into());
    }

    match fs::rename(from, to) {
        Ok(()) => {
            tracing::debug!("Moved (rename): {:?} -> {:?}", from, to);
            Ok(())
        }
        Err(e) if is_cross_device(&e) => {
            tracing::debug!("Cross-filesystem move detected, using copy+delete");
            copy_then_remove(from, to, verify_checksum, |p| fs::remove_file(p))
        }
        Err(e) => Err(e.into()),
    }
}

/// EXDEV on Unix, ERROR_NOT_SAME_DEVICE on Windows.
fn is_cross_device(err: &io::Error) -> bool {
    #[cfg(unix)]
    const CROSS_DEVICE: i32 = 18;
    #[cfg(windows)]
    const CROSS_DEVICE: i32 = 17;
    #[cfg(not(any(unix, windows)))]
    const CROSS_DEVICE: i32 = -1;

    err.raw_os_error() == Some(CROSS_DEVICE)
}

fn already_exists(to: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("destination already exists: {}", to.display()),
    )
}

/// Copy `from` into a newly created `to`, then remove the source.
///
/// `to` must not exist yet. If anything after its creation fails, the
/// copy is deleted again so the source stays the only file.
fn copy_then_remove(
    from: &Path,
    to: &Path,
    verify_checksum: bool,
    remove_source: impl FnOnce(&Path) -> io::Result<()>,
) -> Result<()> {
    let checksum = if verify_checksum {
        Some(hash::sha256_file(from)?)
    } else {
        None
    };

    let mut target = match OpenOptions::new().write(true).create_new(true).open(to) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Err(already_exists(to).into()),
        Err(e) => return Err(e.into()),
    };

    let result = (|| -> Result<()> {
        let mut source = File::open(from)?;
        io::copy(&mut source, &mut target)?;
        target.sync_all()?;

        if let Some(original) = checksum {
            let copied = hash::sha256_file(to)?;
            if original != copied {
                return Err(crate::Error::other(format!(
                    "Checksum mismatch after copying: {:?}",
                    to
                )));
            }
        }

        remove_source(from)?;
        Ok(())
    })();
    drop(target);

    if let Err(e) = result {
        if let Err(cleanup) = fs::remove_file(to) {
            tracing::error!("Failed to remove partial copy {:?}: {}", to, cleanup);
        }
        return Err(e);
    }

    tracing::debug!("Moved (copy+delete): {:?} -> {:?}", from, to);
    Ok(())
}
