//! UTF-8 and UTF-16 conversion for paths and entry names

use std::{io, ptr};

use windows_sys::Win32::{
    Foundation::{
        ERROR_INSUFFICIENT_BUFFER, ERROR_INVALID_FLAGS, ERROR_INVALID_PARAMETER,
        ERROR_NO_UNICODE_TRANSLATION,
    },
    Globalization::{CP_UTF8, MB_ERR_INVALID_CHARS, MultiByteToWideChar, WideCharToMultiByte},
};

use crate::error::{Error, Result};

/// Convert the UTF-8 string `s` to UTF-16, producing at most `capacity` characters.
///
/// This corresponds to the [`MultiByteToWideChar`] Windows API function. Invalid UTF-8 is
/// rejected rather than replaced.
///
/// [`MultiByteToWideChar`]: https://learn.microsoft.com/en-us/windows/win32/api/stringapiset/nf-stringapiset-multibytetowidechar
pub fn utf8_to_wide(s: &[u8], capacity: usize) -> Result<Vec<u16>> {
    if s.is_empty() {
        return Ok(Vec::new());
    }

    let mb_size = i32::try_from(s.len()).map_err(|_| Error::NameTooLong)?;
    let wc_size = i32::try_from(capacity).map_err(|_| Error::NameTooLong)?;
    let mut wc_buffer = vec![0u16; capacity];

    // SAFETY: `s` is valid for `mb_size` bytes and `wc_buffer` can hold `wc_size` characters.
    let chars_written = unsafe {
        MultiByteToWideChar(
            CP_UTF8,
            MB_ERR_INVALID_CHARS,
            s.as_ptr(),
            mb_size,
            wc_buffer.as_mut_ptr(),
            wc_size,
        )
    };

    if chars_written == 0 {
        return Err(conversion_error(io::Error::last_os_error()));
    }

    wc_buffer.truncate(usize::try_from(chars_written).unwrap());
    Ok(wc_buffer)
}

/// Convert the UTF-16 string `s` to UTF-8, replacing the contents of `out`.
///
/// This corresponds to the [`WideCharToMultiByte`] Windows API function. `out` is grown as needed
/// and its allocation is reused between calls.
///
/// [`WideCharToMultiByte`]: https://learn.microsoft.com/en-us/windows/win32/api/stringapiset/nf-stringapiset-widechartomultibyte
pub fn wide_to_utf8(s: &[u16], out: &mut Vec<u8>) -> io::Result<()> {
    out.clear();
    if s.is_empty() {
        return Ok(());
    }

    let wc_size = i32::try_from(s.len()).map_err(|_| io::Error::from(Error::NameTooLong))?;

    // SAFETY: `s` is valid for `wc_size` characters. A null output buffer queries the size.
    let mb_size = unsafe {
        WideCharToMultiByte(
            CP_UTF8,
            0,
            s.as_ptr(),
            wc_size,
            ptr::null_mut(),
            0,
            ptr::null(),
            ptr::null_mut(),
        )
    };

    if mb_size == 0 {
        return Err(io::Error::last_os_error());
    }

    out.resize(usize::try_from(mb_size).unwrap(), 0);

    // SAFETY: `out` can contain exactly `mb_size` bytes.
    let bytes_written = unsafe {
        WideCharToMultiByte(
            CP_UTF8,
            0,
            s.as_ptr(),
            wc_size,
            out.as_mut_ptr(),
            mb_size,
            ptr::null(),
            ptr::null_mut(),
        )
    };

    if bytes_written == 0 {
        out.clear();
        return Err(io::Error::last_os_error());
    }

    out.truncate(usize::try_from(bytes_written).unwrap());
    Ok(())
}

fn conversion_error(err: io::Error) -> Error {
    match err.raw_os_error().map(|code| code as u32) {
        Some(ERROR_INSUFFICIENT_BUFFER) => Error::NameTooLong,
        Some(ERROR_INVALID_FLAGS | ERROR_INVALID_PARAMETER) => Error::InvalidArgument,
        Some(ERROR_NO_UNICODE_TRANSLATION) => Error::Encoding,
        _ => Error::Unsupported(err),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_utf8_to_wide() {
        // € = 0x20AC in UTF-16
        let converted = utf8_to_wide("€€".as_bytes(), 16).unwrap();
        assert_eq!(converted, [0x20AC, 0x20AC], "unexpected result {converted:?}");

        // boundary case
        let converted = utf8_to_wide(b"", 16).unwrap();
        assert!(converted.is_empty(), "unexpected result {converted:?}");
    }

    #[test]
    fn test_utf8_to_wide_errors() {
        let result = utf8_to_wide(b"caf\xe9", 16);
        assert!(matches!(result, Err(Error::Encoding)), "unexpected result {result:?}");

        let result = utf8_to_wide(b"abcdef", 4);
        assert!(matches!(result, Err(Error::NameTooLong)), "unexpected result {result:?}");
    }

    #[test]
    fn test_wide_to_utf8() {
        let mut out = Vec::new();

        let wide: Vec<u16> = "ascii.txt".encode_utf16().collect();
        wide_to_utf8(&wide, &mut out).unwrap();
        assert_eq!(out, b"ascii.txt");

        // names longer in UTF-8 than in UTF-16 are not truncated
        let name = "日本語".repeat(100);
        let wide: Vec<u16> = name.encode_utf16().collect();
        wide_to_utf8(&wide, &mut out).unwrap();
        assert_eq!(out, name.as_bytes());

        wide_to_utf8(&[], &mut out).unwrap();
        assert!(out.is_empty());
    }
}
