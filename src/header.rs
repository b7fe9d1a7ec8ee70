use std::borrow::Cow;
use std::fmt;
use std::io;
use std::mem;
use std::str;

use crate::{bad_archive, other};

/// Size of a tar header block, and of every block in a tar stream.
pub const BLOCK_SIZE: usize = 512;

/// Byte range of the checksum field within a header block.
const CKSUM_START: usize = 148;
const CKSUM_END: usize = 156;

/// Representation of the header of an entry in an archive
///
/// This is a read-only view over a raw 512-byte block. Nothing about the
/// block is trusted until the checksum has been checked, see
/// [`Header::cksum`] and [`Header::calculated_cksum`].
#[repr(C)]
#[allow(missing_docs)]
pub struct Header {
    pub name: [u8; 100],
    pub mode: [u8; 8],
    pub owner_id: [u8; 8],
    pub group_id: [u8; 8],
    pub size: [u8; 12],
    pub mtime: [u8; 12],
    pub cksum: [u8; 8],
    pub link: [u8; 1],
    pub linkname: [u8; 100],

    // UStar format
    pub ustar: [u8; 6],
    pub ustar_version: [u8; 2],
    pub owner_name: [u8; 32],
    pub group_name: [u8; 32],
    pub dev_major: [u8; 8],
    pub dev_minor: [u8; 8],
    pub prefix: [u8; 155],
    _rest: [u8; 12],
}

impl Header {
    /// Views a 512-byte block as a header.
    ///
    /// # Panics
    ///
    /// Panics if `bytes` is not exactly 512 bytes long.
    pub fn from_byte_slice(bytes: &[u8]) -> &Header {
        assert_eq!(bytes.len(), mem::size_of::<Header>());
        assert_eq!(mem::align_of_val(bytes), mem::align_of::<Header>());
        // SAFETY: `Header` is `repr(C)`, made only of byte arrays, and the
        // length was checked above.
        unsafe { &*(bytes.as_ptr() as *const Header) }
    }

    /// Returns a view into this header as a byte array.
    pub fn as_bytes(&self) -> &[u8; BLOCK_SIZE] {
        debug_assert_eq!(BLOCK_SIZE, mem::size_of_val(self));
        // SAFETY: same layout argument as `from_byte_slice`.
        unsafe { &*(self as *const _ as *const [u8; BLOCK_SIZE]) }
    }

    /// Whether the magic field marks this as a UStar (or GNU) header.
    pub fn is_ustar(&self) -> bool {
        &self.ustar[..5] == b"ustar"
    }

    /// Returns the file size this header represents.
    ///
    /// May return an error if the field is corrupted.
    pub fn size(&self) -> io::Result<u64> {
        numeric_from(&self.size)
    }

    /// Returns the pathname stored in this header as a byte array.
    ///
    /// For UStar headers with a non-empty prefix the prefix is joined to the
    /// name with a `/`.
    pub fn path_bytes(&self) -> Cow<'_, [u8]> {
        let prefix = truncate(&self.prefix);
        if !self.is_ustar() || prefix.is_empty() {
            Cow::Borrowed(truncate(&self.name))
        } else {
            let mut bytes = prefix.to_vec();
            bytes.push(b'/');
            bytes.extend_from_slice(truncate(&self.name));
            Cow::Owned(bytes)
        }
    }

    /// Returns the mode bits for this file
    ///
    /// May return an error if the field is corrupted.
    pub fn mode(&self) -> io::Result<u32> {
        octal_from(&self.mode).map(|u| u as u32)
    }

    /// Returns the last modification time in Unix time format
    pub fn mtime(&self) -> io::Result<u64> {
        numeric_from(&self.mtime)
    }

    /// Returns the checksum field of this header.
    ///
    /// May return an error if the field is corrupted.
    pub fn cksum(&self) -> io::Result<u32> {
        octal_from(&self.cksum).map(|u| u as u32)
    }

    /// Sums every byte of the block as unsigned, counting the checksum field
    /// as eight spaces.
    pub fn calculated_cksum(&self) -> u32 {
        let bytes = self.as_bytes();
        bytes[..CKSUM_START]
            .iter()
            .chain(&bytes[CKSUM_END..])
            .fold(0, |a, b| a + (*b as u32))
            + 32 * (CKSUM_END - CKSUM_START) as u32
    }

    /// Like `calculated_cksum` but sums the bytes as `i8`, the way some old
    /// Sun tar implementations did.
    pub fn calculated_signed_cksum(&self) -> i64 {
        let bytes = self.as_bytes();
        bytes[..CKSUM_START]
            .iter()
            .chain(&bytes[CKSUM_END..])
            .fold(0, |a, b| a + (*b as i8 as i64))
            + 32 * (CKSUM_END - CKSUM_START) as i64
    }

    /// Checks the stored checksum against the unsigned sum of the block.
    ///
    /// Fails if the checksum field is not an octal number or does not match.
    pub fn validate(&self) -> io::Result<()> {
        if self.cksum()? == self.calculated_cksum() {
            Ok(())
        } else {
            Err(other("archive header checksum mismatch"))
        }
    }
}

impl fmt::Debug for Header {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Header")
            .field("path", &String::from_utf8_lossy(&self.path_bytes()))
            .field("size", &self.size().ok())
            .field("cksum", &self.cksum().ok())
            .field("ustar", &self.is_ustar())
            .finish()
    }
}

// Numeric fields may use the GNU base-256 extension, flagged by the high bit
// of the first byte.
fn numeric_from(src: &[u8]) -> io::Result<u64> {
    if src[0] & 0x80 == 0 {
        return octal_from(src);
    }
    let mut n: u64 = 0;
    for (i, b) in src.iter().enumerate() {
        let b = if i == 0 { b & 0x7f } else { *b };
        n = n
            .checked_mul(256)
            .and_then(|n| n.checked_add(b as u64))
            .ok_or_else(bad_archive)?;
    }
    Ok(n)
}

fn octal_from(slice: &[u8]) -> io::Result<u64> {
    let num = match str::from_utf8(truncate(slice)) {
        Ok(n) => n,
        Err(_) => return Err(bad_archive()),
    };
    let num = num.trim_matches(' ');
    if num.is_empty() || !num.bytes().all(|b| (b'0'..=b'7').contains(&b)) {
        return Err(bad_archive());
    }
    match u64::from_str_radix(num, 8) {
        Ok(n) => Ok(n),
        Err(_) => Err(bad_archive()),
    }
}

fn truncate(slice: &[u8]) -> &[u8] {
    match slice.iter().position(|i| *i == 0) {
        Some(i) => &slice[..i],
        None => slice,
    }
}
