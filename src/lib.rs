//! Content sniffing for tar archives
//!
//! This library answers one question about a local file: is it a tar archive,
//! either plain or wrapped in gzip? Only the bytes are consulted, never the
//! file name, so `layer` and `layer.tar.gz` are judged the same way.
//!
//! Detection reads the first two bytes to spot a gzip wrapper, then reads a
//! single 512-byte header block (decompressing it first if needed) and checks
//! its checksum. Nothing past the first header is ever read.
//!
//! Every failure, whether the file is missing, empty, truncated, corrupt or
//! simply something else, is reported the same way: as "not an archive".
//!
//! ```no_run
//! if tarsniff::is_local_tar_archive("context/base.tar.gz") {
//!     // unpack it
//! } else {
//!     // copy it as an opaque file
//! }
//! ```

#![deny(missing_docs)]

use std::io::{Error, ErrorKind, Read};
use std::path::Path;

pub use crate::compression::Compression;
pub use crate::header::{Header, BLOCK_SIZE};
pub use crate::sniffer::{ArchiveFormat, Sniffer};

mod compression;
mod error;
mod header;
mod sniffer;

/// Returns whether the file at `path` is a tar archive, compressed with gzip
/// or not.
///
/// The file is judged by content alone. A path that does not exist or cannot
/// be read yields `false`, exactly like a file that is not an archive.
pub fn is_local_tar_archive<P: AsRef<Path>>(path: P) -> bool {
    Sniffer::new().is_tar_archive(path)
}

/// Classifies the file at `path` with the default [`Sniffer`] settings.
pub fn sniff_path<P: AsRef<Path>>(path: P) -> Option<ArchiveFormat> {
    Sniffer::new().sniff_path(path)
}

/// Classifies the stream produced by `reader` with the default [`Sniffer`]
/// settings.
pub fn sniff<R: Read>(reader: R) -> Option<ArchiveFormat> {
    Sniffer::new().sniff(reader)
}

fn other(msg: &str) -> Error {
    Error::new(ErrorKind::Other, msg)
}

fn bad_archive() -> Error {
    other("invalid tar archive")
}
