use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use log::{debug, trace};

use crate::compression::{Compression, GZIP_MAGIC};
use crate::error::SniffError;
use crate::header::{Header, BLOCK_SIZE};
use crate::other;

/// What a successfully sniffed stream turned out to be.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ArchiveFormat {
    /// An uncompressed tar stream.
    Tar,
    /// A tar stream inside a gzip wrapper.
    GzipTar,
}

/// A configurable tar archive detector.
///
/// A `Sniffer` holds no state between calls; the same value can be used for
/// any number of files, from any number of threads.
///
/// # Examples
///
/// ```no_run
/// use tarsniff::Sniffer;
///
/// let mut sniffer = Sniffer::new();
/// sniffer.set_decompress_gzip(false);
/// assert!(!sniffer.is_tar_archive("layer.tar.gz"));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Sniffer {
    decompress_gzip: bool,
    accept_signed_cksum: bool,
}

impl Default for Sniffer {
    fn default() -> Sniffer {
        Sniffer::new()
    }
}

impl Sniffer {
    /// Creates a sniffer that looks through gzip wrappers and accepts both
    /// unsigned and signed header checksums.
    ///
    /// Accepting the signed sum is looser than the plain unsigned checksum
    /// rule; it matches GNU tar and Go's `archive/tar`. Use
    /// [`set_accept_signed_checksum`](Sniffer::set_accept_signed_checksum)
    /// to require the unsigned sum only.
    pub fn new() -> Sniffer {
        Sniffer {
            decompress_gzip: true,
            accept_signed_cksum: true,
        }
    }

    /// Indicate whether gzip-wrapped streams are decompressed and checked.
    ///
    /// When disabled, only uncompressed tar streams are recognized. This
    /// option defaults to `true`.
    pub fn set_decompress_gzip(&mut self, decompress: bool) {
        self.decompress_gzip = decompress;
    }

    /// Indicate whether a header checksum computed over signed bytes is
    /// accepted.
    ///
    /// Some historic tar writers summed the header as `i8` values, which
    /// only differs from the usual sum when the header holds bytes above
    /// 0x7f. This option defaults to `true`.
    pub fn set_accept_signed_checksum(&mut self, accept: bool) {
        self.accept_signed_cksum = accept;
    }

    /// Returns whether the file at `path` holds a tar archive, compressed
    /// with gzip or not.
    ///
    /// Any failure, including the file not existing, yields `false`.
    pub fn is_tar_archive<P: AsRef<Path>>(&self, path: P) -> bool {
        self.sniff_path(path).is_some()
    }

    /// Classifies the file at `path`, returning `None` if it is not a tar
    /// archive or cannot be read.
    pub fn sniff_path<P: AsRef<Path>>(&self, path: P) -> Option<ArchiveFormat> {
        let path = path.as_ref();
        collapse(self.probe_path(path), &path.display())
    }

    /// Classifies the bytes produced by `reader`.
    ///
    /// At most two bytes plus one header block of (decompressed) data are
    /// consumed.
    pub fn sniff<R: Read>(&self, reader: R) -> Option<ArchiveFormat> {
        collapse(self.probe(reader), &"stream")
    }

    fn probe_path(&self, path: &Path) -> io::Result<ArchiveFormat> {
        let file = File::open(path).map_err(|e| {
            SniffError::new(format!("failed to open `{}`", path.display()), e)
        })?;
        self.probe(file)
    }

    fn probe<R: Read>(&self, mut reader: R) -> io::Result<ArchiveFormat> {
        let mut magic = [0u8; GZIP_MAGIC.len()];
        let n = read_prefix(&mut reader, &mut magic)
            .map_err(|e| SniffError::new("failed to read stream prefix", e))?;

        // Replay the peeked bytes in front of the rest of the stream so the
        // next stage sees it from the start.
        let stream = (&magic[..n]).chain(reader);
        match Compression::detect(&magic[..n]) {
            Compression::None => {
                self.check_header(stream, "failed to read tar header block")?;
                Ok(ArchiveFormat::Tar)
            }
            Compression::Gzip if !self.decompress_gzip => {
                Err(other("gzip stream found but decompression is disabled"))
            }
            Compression::Gzip => {
                // A gzip file may hold several members; the header can span
                // them.
                let stream = MultiGzDecoder::new(stream);
                self.check_header(stream, "failed to decompress gzip stream")?;
                Ok(ArchiveFormat::GzipTar)
            }
        }
    }

    fn check_header<R: Read>(&self, mut stream: R, desc: &'static str) -> io::Result<()> {
        let mut block = [0u8; BLOCK_SIZE];
        stream
            .read_exact(&mut block)
            .map_err(|e| SniffError::new(desc, e))?;

        let header = Header::from_byte_slice(&block);
        self.validate(header)?;
        trace!("first entry in archive is {:?}", header);
        Ok(())
    }

    fn validate(&self, header: &Header) -> io::Result<()> {
        match header.validate() {
            Ok(()) => Ok(()),
            Err(_) if self.accept_signed_cksum && signed_cksum_matches(header) => Ok(()),
            Err(e) => Err(SniffError::new("invalid tar header", e).into()),
        }
    }
}

/// The only place a probe failure turns into "not an archive".
fn collapse(
    result: io::Result<ArchiveFormat>,
    source: &dyn fmt::Display,
) -> Option<ArchiveFormat> {
    match result {
        Ok(format) => {
            trace!("{} sniffed as {:?}", source, format);
            Some(format)
        }
        Err(e) => {
            debug!("{} is not a tar archive: {}", source, e);
            None
        }
    }
}

fn signed_cksum_matches(header: &Header) -> bool {
    match header.cksum() {
        Ok(cksum) => cksum as i64 == header.calculated_signed_cksum(),
        Err(_) => false,
    }
}

// Fills as much of `buf` as the reader allows, stopping early only at EOF.
fn read_prefix<R: Read>(r: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut read = 0;
    while read < buf.len() {
        match r.read(&mut buf[read..]) {
            Ok(0) => break,
            Ok(n) => read += n,
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(read)
}
