//! POSIX directory streams for Windows
//!
//! This crate implements `opendir`, `readdir` and `closedir` on top of the Windows
//! [`FindFirstFileW`] family, so code written against the POSIX directory interface runs
//! unchanged on Windows. On other platforms the same API passes through to the C library.
//!
//! [`FindFirstFileW`]: https://learn.microsoft.com/en-us/windows/win32/api/fileapi/nf-fileapi-findfirstfilew
//!
//! # Features
//!
//! - `capi` - Export `opendir`, `readdir` and `closedir` with C linkage (Windows only)
//!
//! # Examples
//!
//! List a directory:
//!
//! ```no_run
//! use dirstream::{closedir, opendir, readdir};
//!
//! let mut dir = opendir("C:\\Users")?;
//! while let Some(entry) = readdir(&mut dir)? {
//!     if !entry.is_dot_or_dot_dot() {
//!         println!("{:?}", entry.file_name());
//!     }
//! }
//! closedir(dir)?;
//! # Ok::<(), dirstream::Error>(())
//! ```
//!
//! Errors convert into [`std::io::Error`]:
//!
//! ```no_run
//! use dirstream::Dir;
//!
//! fn count_entries(path: &str) -> std::io::Result<usize> {
//!     let mut dir = Dir::open(path)?;
//!     let mut count = 0;
//!     while dir.read()?.is_some() {
//!         count += 1;
//!     }
//!     Ok(count)
//! }
//! # count_entries(".")?;
//! # Ok::<(), std::io::Error>(())
//! ```
//!
//! See [dir].

pub mod dir;
pub mod error;
mod sys;

#[cfg(all(windows, feature = "capi"))]
pub mod capi;
#[cfg(windows)]
mod string;
#[cfg(windows)]
mod util;

pub use dir::{Dir, Entry, Names, closedir, opendir, readdir};
pub use error::{Error, Result};
