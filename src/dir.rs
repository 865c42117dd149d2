//! Directory streams
//!
//! # Examples
//!
//! Print every entry of a directory:
//!
//! ```no_run
//! use dirstream::Dir;
//!
//! let mut dir = Dir::open("C:\\Windows")?;
//! while let Some(entry) = dir.read()? {
//!     println!("{:?}", entry.file_name());
//! }
//! dir.close()?;
//! # Ok::<(), dirstream::Error>(())
//! ```
//!
//! Collect the names into owned strings:
//!
//! ```no_run
//! use dirstream::Dir;
//! use std::ffi::OsString;
//!
//! let mut dir = Dir::open(".")?;
//! let names = dir.names().collect::<Result<Vec<OsString>, _>>()?;
//! println!("{} entries", names.len());
//! # Ok::<(), dirstream::Error>(())
//! ```

use std::{
    ffi::{OsStr, OsString},
    fmt,
    iter::FusedIterator,
    path::Path,
    str,
};

use crate::{
    error::{Error, Result},
    sys::RawDir,
};

/// Open a directory stream.
///
/// See [`Dir::open`].
pub fn opendir(path: impl AsRef<Path>) -> Result<Dir> {
    Dir::open(path)
}

/// Read the next entry of a directory stream.
///
/// See [`Dir::read`].
pub fn readdir(dir: &mut Dir) -> Result<Option<Entry<'_>>> {
    dir.read()
}

/// Close a directory stream.
///
/// See [`Dir::close`].
pub fn closedir(dir: Dir) -> Result<()> {
    dir.close()
}

/// A stream of the entries in a directory.
///
/// On Windows this wraps a [`FindFirstFileW`] search. Elsewhere it wraps the platform's `DIR`.
/// The entries include `.` and `..` and come in whatever order the platform produces them.
///
/// The stream is closed when dropped. Use [`Dir::close`] to observe failures.
///
/// [`FindFirstFileW`]: https://learn.microsoft.com/en-us/windows/win32/api/fileapi/nf-fileapi-findfirstfilew
pub struct Dir {
    raw: RawDir,
    /// Name of the current entry, reused across reads.
    name: Vec<u8>,
    exhausted: bool,
}

impl Dir {
    /// Open the directory at `path`.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidArgument`] if `path` is empty or contains a null character.
    /// * [`Error::NameTooLong`] if the search pattern for `path` exceeds the platform limit.
    /// * [`Error::NotFound`] if `path` does not exist.
    /// * [`Error::Unsupported`] for any other failure.
    pub fn open(path: impl AsRef<Path>) -> Result<Dir> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(Error::InvalidArgument);
        }

        let raw = RawDir::open(path).inspect_err(|err| {
            log::debug!("failed to open directory {}: {err}", path.display());
        })?;
        log::trace!("opened directory {}", path.display());
        Ok(Dir::from_raw(raw))
    }

    /// Open a directory given as a byte string.
    ///
    /// On Windows the bytes must be UTF-8, and invalid sequences fail with [`Error::Encoding`].
    /// Elsewhere they are the native path bytes.
    ///
    /// Otherwise this behaves like [`Dir::open`].
    pub fn open_bytes(path: &[u8]) -> Result<Dir> {
        if path.is_empty() || path.contains(&0) {
            return Err(Error::InvalidArgument);
        }

        let raw = RawDir::open_bytes(path).inspect_err(|err| {
            log::debug!(
                "failed to open directory {}: {err}",
                String::from_utf8_lossy(path)
            );
        })?;
        log::trace!("opened directory {}", String::from_utf8_lossy(path));
        Ok(Dir::from_raw(raw))
    }

    fn from_raw(raw: RawDir) -> Dir {
        Dir {
            raw,
            name: Vec::new(),
            exhausted: false,
        }
    }

    /// Advance the stream and return the next entry, or `None` at the end.
    ///
    /// The returned entry borrows the stream and is overwritten by the next call.
    pub fn read(&mut self) -> Result<Option<Entry<'_>>> {
        if self.exhausted {
            return Ok(None);
        }

        if !self.raw.read(&mut self.name)? {
            log::trace!("directory stream exhausted");
            self.exhausted = true;
            return Ok(None);
        }

        Ok(Some(Entry { name: &self.name }))
    }

    /// Return an iterator over owned copies of the remaining entry names.
    pub fn names(&mut self) -> Names<'_> {
        Names {
            dir: self,
            done: false,
        }
    }

    /// Close the stream, releasing the native handle.
    ///
    /// The stream is freed even if this fails.
    pub fn close(self) -> Result<()> {
        let Dir { raw, .. } = self;
        raw.close()?;
        log::trace!("closed directory stream");
        Ok(())
    }
}

impl fmt::Debug for Dir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dir")
            .field("exhausted", &self.exhausted)
            .finish_non_exhaustive()
    }
}

/// A directory entry borrowed from a [`Dir`].
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Entry<'a> {
    name: &'a [u8],
}

impl<'a> Entry<'a> {
    /// Get the entry name as bytes.
    ///
    /// This is UTF-8 on Windows, and the native bytes elsewhere.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.name
    }

    /// Get the entry name
    pub fn file_name(&self) -> &'a OsStr {
        // SAFETY: On Windows the name is UTF-8, which is a valid OS string encoding. Elsewhere
        // OS strings are arbitrary bytes.
        unsafe { OsStr::from_encoded_bytes_unchecked(self.name) }
    }

    /// Get the entry name if it is valid UTF-8.
    pub fn to_str(&self) -> Option<&'a str> {
        str::from_utf8(self.name).ok()
    }

    /// Return whether this is the `.` or `..` entry.
    pub fn is_dot_or_dot_dot(&self) -> bool {
        matches!(self.name, b"." | b"..")
    }
}

impl fmt::Debug for Entry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Entry").field(&self.file_name()).finish()
    }
}

/// Iterator over owned entry names. See [`Dir::names`].
///
/// Iteration stops after the first error.
pub struct Names<'a> {
    dir: &'a mut Dir,
    done: bool,
}

impl Iterator for Names<'_> {
    type Item = Result<OsString>;

    fn next(&mut self) -> Option<Result<OsString>> {
        if self.done {
            return None;
        }

        match self.dir.read() {
            Ok(Some(entry)) => Some(Ok(entry.file_name().to_owned())),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl FusedIterator for Names<'_> {}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;

    fn read_all(dir: &mut Dir) -> Vec<String> {
        let mut names = Vec::new();
        while let Some(entry) = dir.read().unwrap() {
            names.push(entry.to_str().unwrap().to_owned());
        }
        names.sort();
        names
    }

    #[test]
    fn test_enumerate() {
        let tmp = tempfile::tempdir().unwrap();
        for name in ["a", "b", "c"] {
            fs::write(tmp.path().join(name), name).unwrap();
        }

        let mut dir = Dir::open(tmp.path()).unwrap();
        assert_eq!(read_all(&mut dir), [".", "..", "a", "b", "c"]);

        // end of stream is sticky
        assert!(dir.read().unwrap().is_none());
        assert!(dir.read().unwrap().is_none());

        dir.close().unwrap();
    }

    #[test]
    fn test_free_functions() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();

        let mut dir = opendir(tmp.path()).unwrap();
        let mut names = Vec::new();
        while let Some(entry) = readdir(&mut dir).unwrap() {
            if !entry.is_dot_or_dot_dot() {
                names.push(entry.file_name().to_owned());
            }
        }
        closedir(dir).unwrap();

        assert_eq!(names, [OsString::from("sub")]);
    }

    #[test]
    fn test_names() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("one.txt"), b"1").unwrap();
        fs::write(tmp.path().join("two.txt"), b"2").unwrap();

        let mut dir = Dir::open(tmp.path()).unwrap();
        let mut names = dir.names().collect::<Result<Vec<_>>>().unwrap();
        names.sort();
        assert_eq!(names, [".", "..", "one.txt", "two.txt"].map(OsString::from));

        assert!(dir.names().next().is_none());
    }

    #[test]
    fn test_ascii_name_unchanged() {
        let tmp = tempfile::tempdir().unwrap();
        let name = "Hello_World-123.tar.gz";
        fs::write(tmp.path().join(name), b"").unwrap();

        let mut dir = Dir::open(tmp.path()).unwrap();
        let mut found = false;
        while let Some(entry) = dir.read().unwrap() {
            if entry.is_dot_or_dot_dot() {
                continue;
            }
            assert_eq!(entry.as_bytes(), name.as_bytes());
            assert_eq!(entry.to_str(), Some(name));
            assert_eq!(entry.file_name(), OsStr::new(name));
            found = true;
        }
        assert!(found);
    }

    #[test]
    fn test_non_ascii_name() {
        let tmp = tempfile::tempdir().unwrap();
        let name = "ünïcødé €";
        fs::write(tmp.path().join(name), b"").unwrap();

        let mut dir = Dir::open(tmp.path()).unwrap();
        let names = read_all(&mut dir);
        assert!(names.iter().any(|n| n == name), "unexpected result {names:?}");
    }

    #[test]
    fn test_open_empty() {
        let result = Dir::open("");
        assert!(matches!(result, Err(Error::InvalidArgument)), "unexpected result {result:?}");

        let result = Dir::open_bytes(b"");
        assert!(matches!(result, Err(Error::InvalidArgument)), "unexpected result {result:?}");
    }

    #[test]
    fn test_open_interior_null() {
        let result = Dir::open_bytes(b"abc\0def");
        assert!(matches!(result, Err(Error::InvalidArgument)), "unexpected result {result:?}");
    }

    #[test]
    fn test_open_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("does-not-exist");

        let result = Dir::open(&missing);
        assert!(matches!(result, Err(Error::NotFound)), "unexpected result {result:?}");
    }

    #[test]
    fn test_open_name_too_long() {
        let tmp = tempfile::tempdir().unwrap();
        let long = tmp.path().join("x".repeat(300));

        let result = Dir::open(&long);
        assert!(matches!(result, Err(Error::NameTooLong)), "unexpected result {result:?}");
    }

    #[test]
    fn test_open_bytes() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("file"), b"").unwrap();

        let path = tmp.path().to_str().unwrap();
        let mut dir = Dir::open_bytes(path.as_bytes()).unwrap();
        assert_eq!(read_all(&mut dir), [".", "..", "file"]);
    }

    #[test]
    fn test_open_trailing_separator() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("file"), b"").unwrap();

        // joining an empty component appends a separator
        let mut dir = Dir::open(tmp.path().join("")).unwrap();
        assert_eq!(read_all(&mut dir), [".", "..", "file"]);
    }

    #[cfg(windows)]
    #[test]
    fn test_open_bytes_invalid_utf8() {
        let result = Dir::open_bytes(b"C:\\caf\xe9");
        assert!(matches!(result, Err(Error::Encoding)), "unexpected result {result:?}");
    }

    #[test]
    fn test_open_file() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("file");
        fs::write(&file, b"").unwrap();

        assert!(Dir::open(&file).is_err());
    }

    #[test]
    fn test_drop_without_close() {
        let tmp = tempfile::tempdir().unwrap();
        let mut dir = Dir::open(tmp.path()).unwrap();
        assert!(dir.read().unwrap().is_some());
        drop(dir);
    }
}
