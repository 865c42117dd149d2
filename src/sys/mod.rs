//! Native directory enumeration backends.
//!
//! Each backend exposes a `RawDir` with the same shape:
//!
//! * `open(&Path)` and `open_bytes(&[u8])` start enumeration,
//! * `read(&mut Vec<u8>)` writes the next name into the buffer and returns `false` at the end,
//! * `close(self)` releases the native handle and reports failure, while `Drop` does so silently.

cfg_if::cfg_if! {
    if #[cfg(windows)] {
        mod windows;
        pub(crate) use self::windows::RawDir;
    } else if #[cfg(unix)] {
        mod unix;
        pub(crate) use self::unix::RawDir;
    } else {
        compile_error!("dirstream doesn't support this platform yet");
    }
}
