//! Passthrough to the platform's own `opendir`, `readdir` and `closedir`.

use std::{
    ffi::{CStr, CString},
    io,
    mem::ManuallyDrop,
    os::unix::ffi::OsStrExt,
    path::Path,
    ptr::NonNull,
};

use errno::{Errno, errno, set_errno};

use crate::error::{Error, Result};

/// Owned wrapper around `DIR`.
pub(crate) struct RawDir {
    inner: NonNull<libc::DIR>,
}

impl RawDir {
    pub(crate) fn open(path: &Path) -> Result<RawDir> {
        Self::open_bytes(path.as_os_str().as_bytes())
    }

    /// Open a directory given as native path bytes.
    pub(crate) fn open_bytes(path: &[u8]) -> Result<RawDir> {
        let path = CString::new(path).map_err(|_| Error::InvalidArgument)?;

        // SAFETY: `path` is null-terminated
        let dir = unsafe { libc::opendir(path.as_ptr()) };

        match NonNull::new(dir) {
            Some(inner) => Ok(RawDir { inner }),
            None => Err(Error::from_errno(io::Error::last_os_error())),
        }
    }

    /// Advance to the next entry and copy its name into `name`.
    ///
    /// Returns `false` once there are no more entries.
    pub(crate) fn read(&mut self, name: &mut Vec<u8>) -> Result<bool> {
        // readdir returns NULL both at the end and on error.
        // To distinguish between these cases, clear errno first.
        set_errno(Errno(0));

        // SAFETY: `inner` is an open `DIR`
        let dirent = unsafe { libc::readdir(self.inner.as_ptr()) };

        if dirent.is_null() {
            let Errno(code) = errno();
            return if code == 0 {
                Ok(false)
            } else {
                Err(Error::from_errno(io::Error::from_raw_os_error(code)))
            };
        }

        // SAFETY: `dirent` stays valid until the next readdir, and d_name is null-terminated
        let d_name = unsafe { CStr::from_ptr((*dirent).d_name.as_ptr()) };
        name.clear();
        name.extend_from_slice(d_name.to_bytes());
        Ok(true)
    }

    pub(crate) fn close(self) -> Result<()> {
        let this = ManuallyDrop::new(self);
        // SAFETY: `inner` is an open `DIR` and is not used again
        if unsafe { libc::closedir(this.inner.as_ptr()) } != 0 {
            return Err(Error::Unsupported(io::Error::last_os_error()));
        }
        Ok(())
    }
}

impl Drop for RawDir {
    fn drop(&mut self) {
        // SAFETY: `inner` is an open `DIR`
        if unsafe { libc::closedir(self.inner.as_ptr()) } != 0 {
            log::warn!(
                "failed to close directory stream: {}",
                io::Error::last_os_error()
            );
        }
    }
}
