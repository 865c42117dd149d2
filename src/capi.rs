//! C-compatible `opendir`, `readdir` and `closedir`.
//!
//! These follow the POSIX contract: failures return `NULL` or `-1` and set `errno` as described
//! by [`Error::errno`]. Paths are UTF-8 and entry names are returned as UTF-8.
//!
//! Only Windows is covered. Other platforms already provide these functions in their C library.

use std::{
    ffi::{CStr, c_char, c_int},
    ptr,
};

use windows_sys::Win32::Foundation::MAX_PATH;

use crate::{dir::Dir, error::Error};

/// Capacity of [`dirent::d_name`] in bytes.
///
/// A file name is at most `MAX_PATH - 1` UTF-16 units, and each unit takes at most 3 bytes in
/// UTF-8, so every name fits together with its terminator.
pub const NAME_CAPACITY: usize = MAX_PATH as usize * 3;

/// A directory entry, as seen by C code.
#[allow(non_camel_case_types)]
#[repr(C)]
pub struct dirent {
    /// Null-terminated UTF-8 entry name.
    pub d_name: [c_char; NAME_CAPACITY],
}

/// An open directory stream, as seen by C code.
#[allow(clippy::upper_case_acronyms)]
pub struct DIR {
    dir: Dir,
    /// Allocated on the first `readdir` and reused afterwards.
    entry: Option<Box<dirent>>,
}

unsafe extern "C" {
    /// Location of the calling thread's C runtime `errno`, exported by both the UCRT and msvcrt.
    fn _errno() -> *mut c_int;
}

/// Set the C runtime `errno` seen by C callers.
///
/// This is not `SetLastError`: C code reads `errno` from the CRT.
fn set_errno(code: c_int) {
    // SAFETY: `_errno` returns a valid pointer to the thread's errno
    unsafe { *_errno() = code };
}

fn fail(err: Error) {
    set_errno(err.errno());
}

/// Open a directory stream.
///
/// # Safety
///
/// `dirpath` must be null or a valid null-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn opendir(dirpath: *const c_char) -> *mut DIR {
    if dirpath.is_null() {
        fail(Error::InvalidArgument);
        return ptr::null_mut();
    }

    // SAFETY: `dirpath` is a valid null-terminated string
    let path = unsafe { CStr::from_ptr(dirpath) };

    match Dir::open_bytes(path.to_bytes()) {
        Ok(dir) => Box::into_raw(Box::new(DIR { dir, entry: None })),
        Err(err) => {
            fail(err);
            ptr::null_mut()
        }
    }
}

/// Read the next entry of a directory stream.
///
/// Returns null at the end of the stream, leaving `errno` untouched, or on failure. The entry is
/// overwritten by the next call and freed by `closedir`.
///
/// # Safety
///
/// `dirp` must be null or a pointer returned by [`opendir`] that has not been closed.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn readdir(dirp: *mut DIR) -> *mut dirent {
    // SAFETY: `dirp` is null or a live stream owned by the caller
    let Some(dirp) = (unsafe { dirp.as_mut() }) else {
        fail(Error::InvalidArgument);
        return ptr::null_mut();
    };

    let name = match dirp.dir.read() {
        Ok(Some(entry)) => entry.as_bytes(),
        Ok(None) => return ptr::null_mut(),
        Err(err) => {
            fail(err);
            return ptr::null_mut();
        }
    };

    let entry = dirp.entry.get_or_insert_with(|| {
        Box::new(dirent {
            d_name: [0; NAME_CAPACITY],
        })
    });

    // Native names always fit, so this is an invariant violation rather than an error
    assert!(
        name.len() < entry.d_name.len(),
        "entry name of {} bytes does not fit in d_name",
        name.len()
    );

    entry.d_name.fill(0);
    for (dst, &src) in entry.d_name.iter_mut().zip(name) {
        *dst = src as c_char;
    }

    &mut **entry
}

/// Close a directory stream.
///
/// Returns `0` on success and `-1` on failure. The stream is freed either way.
///
/// # Safety
///
/// `dirp` must be null or a pointer returned by [`opendir`] that has not been closed.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn closedir(dirp: *mut DIR) -> c_int {
    if dirp.is_null() {
        fail(Error::InvalidArgument);
        return -1;
    }

    // SAFETY: `dirp` came from `Box::into_raw` in `opendir` and ownership returns here
    let DIR { dir, .. } = *unsafe { Box::from_raw(dirp) };

    match dir.close() {
        Ok(()) => 0,
        Err(err) => {
            fail(err);
            -1
        }
    }
}
