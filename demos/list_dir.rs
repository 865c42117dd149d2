//! Example showing how to list the entries of a directory using a directory stream.
//!
//! Run with `RUST_LOG=trace` to see the stream's log output.

use std::{env, io};

use dirstream::Dir;

pub fn main() -> Result<(), io::Error> {
    env_logger::init();

    let path = env::args().nth(1).unwrap_or_else(|| String::from("."));
    println!("Listing {path}:\n");

    let mut dir = Dir::open(&path)?;
    let mut count = 0;

    while let Some(entry) = dir.read()? {
        if entry.is_dot_or_dot_dot() {
            continue;
        }
        match entry.to_str() {
            Some(name) => println!("   {name}"),
            None => println!("   {:?}", entry.file_name()),
        }
        count += 1;
    }

    dir.close()?;
    println!("\n{count} entries");

    Ok(())
}
