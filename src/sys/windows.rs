//! Directory enumeration using `FindFirstFileW`, `FindNextFileW` and `FindClose`.
//!
//! References:
//! * [Listing the Files in a Directory]
//!
//! [Listing the Files in a Directory]: https://learn.microsoft.com/en-us/windows/win32/fileio/listing-the-files-in-a-directory

use std::{io, mem::ManuallyDrop, path::Path};

use windows_sys::Win32::{
    Foundation::{
        ERROR_FILE_NOT_FOUND, ERROR_NO_MORE_FILES, ERROR_PATH_NOT_FOUND, HANDLE,
        INVALID_HANDLE_VALUE, MAX_PATH,
    },
    Storage::FileSystem::{FindClose, FindFirstFileW, FindNextFileW, WIN32_FIND_DATAW},
};

use crate::{
    error::{Error, Result},
    string, util,
};

/// Length of the `"\*"` suffix appended to a directory path.
const PATTERN_SUFFIX_LEN: usize = 2;

/// An open `FindFirstFileW` search over every entry of a directory.
pub(crate) struct RawDir {
    handle: HANDLE,
    /// Most recent result. Holds the first entry until the first `read`.
    data: WIN32_FIND_DATAW,
    iter_started: bool,
}

impl RawDir {
    pub(crate) fn open(path: &Path) -> Result<RawDir> {
        let dir = util::os_str_to_wide(path.as_os_str())?;
        Self::find_first(util::search_pattern(dir)?)
    }

    /// Open a directory given as a UTF-8 byte string.
    pub(crate) fn open_bytes(path: &[u8]) -> Result<RawDir> {
        if path.len() + PATTERN_SUFFIX_LEN >= MAX_PATH as usize {
            return Err(Error::NameTooLong);
        }
        let dir = string::utf8_to_wide(path, MAX_PATH as usize)?;
        Self::find_first(util::search_pattern(dir)?)
    }

    /// Start a search using [`FindFirstFileW`].
    ///
    /// [`FindFirstFileW`]: https://learn.microsoft.com/en-us/windows/win32/api/fileapi/nf-fileapi-findfirstfilew
    fn find_first(pattern: Vec<u16>) -> Result<RawDir> {
        let mut data = WIN32_FIND_DATAW::default();

        // SAFETY: `pattern` is null-terminated and `data` is a valid `WIN32_FIND_DATAW`
        let handle = unsafe { FindFirstFileW(pattern.as_ptr(), &mut data) };

        if handle == INVALID_HANDLE_VALUE {
            let err = io::Error::last_os_error();
            return Err(match err.raw_os_error().map(|code| code as u32) {
                Some(ERROR_FILE_NOT_FOUND | ERROR_PATH_NOT_FOUND) => Error::NotFound,
                _ => Error::Unsupported(err),
            });
        }

        Ok(RawDir {
            handle,
            data,
            iter_started: false,
        })
    }

    /// Advance to the next entry and write its UTF-8 name into `name`.
    ///
    /// Returns `false` once there are no more entries.
    pub(crate) fn read(&mut self, name: &mut Vec<u8>) -> Result<bool> {
        if self.iter_started {
            // SAFETY: The handle is open, and `data` points to a valid `WIN32_FIND_DATAW`
            if unsafe { FindNextFileW(self.handle, &mut self.data) } == 0 {
                let last_error = io::Error::last_os_error();

                return if last_error.raw_os_error().unwrap() as u32 == ERROR_NO_MORE_FILES {
                    Ok(false)
                } else {
                    Err(Error::Unsupported(last_error))
                };
            }
        } else {
            // The first entry was fetched by `FindFirstFileW`
            self.iter_started = true;
        }

        let file_name = &self.data.cFileName[..util::wide_len(&self.data.cFileName)];
        if let Err(err) = string::wide_to_utf8(file_name, name) {
            panic!("failed to convert native file name to UTF-8: {err}");
        }
        Ok(true)
    }

    /// Release the search handle using [`FindClose`].
    ///
    /// [`FindClose`]: https://learn.microsoft.com/en-us/windows/win32/api/fileapi/nf-fileapi-findclose
    pub(crate) fn close(self) -> Result<()> {
        let this = ManuallyDrop::new(self);
        // SAFETY: The handle is open and is not used again
        if unsafe { FindClose(this.handle) } == 0 {
            return Err(Error::Unsupported(io::Error::last_os_error()));
        }
        Ok(())
    }
}

impl Drop for RawDir {
    fn drop(&mut self) {
        // SAFETY: This is a valid search handle
        if unsafe { FindClose(self.handle) } == 0 {
            log::warn!(
                "failed to close directory search handle: {}",
                io::Error::last_os_error()
            );
        }
    }
}
