use std::{ffi::OsStr, os::windows::ffi::OsStrExt};

use windows_sys::Win32::Foundation::MAX_PATH;

use crate::error::{Error, Result};

const BACKSLASH: u16 = b'\\' as u16;
const ASTERISK: u16 = b'*' as u16;

/// Retrieve the length of `s`, a null-terminated UTF-16 string stored in a fixed buffer.
///
/// If no terminator is present, the whole buffer is the string.
pub fn wide_len(s: &[u16]) -> usize {
    s.iter().position(|&c| c == 0).unwrap_or(s.len())
}

/// Convert `s` into UTF-16 without a null terminator.
///
/// Fails if `s` contains an interior null, which would silently truncate the string.
pub fn os_str_to_wide(s: &OsStr) -> Result<Vec<u16>> {
    let wide: Vec<u16> = s.encode_wide().collect();
    if wide.contains(&0) {
        return Err(Error::InvalidArgument);
    }
    Ok(wide)
}

/// Turn a directory path into a null-terminated `FindFirstFileW` search pattern matching
/// every entry in the directory.
///
/// `\*` is always appended, even after a trailing separator, so the length limit only depends
/// on the length of `dir`.
pub fn search_pattern(mut dir: Vec<u16>) -> Result<Vec<u16>> {
    dir.extend([BACKSLASH, ASTERISK]);

    // Room for the terminator is required
    if dir.len() >= MAX_PATH as usize {
        return Err(Error::NameTooLong);
    }

    dir.push(0);
    Ok(dir)
}

#[cfg(test)]
mod test {
    use super::*;

    fn wide(s: &str) -> Vec<u16> {
        s.encode_utf16().collect()
    }

    #[test]
    fn test_search_pattern() {
        let pattern = search_pattern(wide(r"C:\Windows")).unwrap();
        assert_eq!(pattern, wide("C:\\Windows\\*\0"));

        // a trailing separator still gets the full suffix
        let pattern = search_pattern(wide(r"C:\")).unwrap();
        assert_eq!(pattern, wide("C:\\\\*\0"));
        let pattern = search_pattern(wide("dir/")).unwrap();
        assert_eq!(pattern, wide("dir/\\*\0"));
    }

    #[test]
    fn test_search_pattern_limit() {
        // 257 + "\*" = 259 characters, plus the terminator
        let longest = "a".repeat(MAX_PATH as usize - 3);
        assert!(search_pattern(wide(&longest)).is_ok());

        let too_long = "a".repeat(MAX_PATH as usize - 2);
        let result = search_pattern(wide(&too_long));
        assert!(matches!(result, Err(Error::NameTooLong)), "unexpected result {result:?}");

        // the same limit applies when the path ends in a separator
        let longest = format!("{}\\", "a".repeat(MAX_PATH as usize - 4));
        assert!(search_pattern(wide(&longest)).is_ok());

        let too_long = format!("{}\\", "a".repeat(MAX_PATH as usize - 3));
        let result = search_pattern(wide(&too_long));
        assert!(matches!(result, Err(Error::NameTooLong)), "unexpected result {result:?}");
    }

    #[test]
    fn test_interior_null() {
        let result = os_str_to_wide(OsStr::new("a\0b"));
        assert!(matches!(result, Err(Error::InvalidArgument)), "unexpected result {result:?}");
    }

    #[test]
    fn test_wide_len() {
        let mut buf = [0u16; 8];
        buf[..3].copy_from_slice(&wide("abc"));
        assert_eq!(wide_len(&buf), 3);
        assert_eq!(wide_len(&wide("full")), 4);
    }
}
