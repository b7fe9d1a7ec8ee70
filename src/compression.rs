/// Leading bytes of every gzip member.
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// The wrapper a byte stream arrives in, as told by its first bytes.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Compression {
    /// The stream starts with the gzip magic number.
    Gzip,
    /// Anything else, including streams too short to carry a magic number.
    None,
}

impl Compression {
    /// Classifies a stream from its leading bytes.
    ///
    /// Only the first two bytes are looked at; a shorter prefix is never
    /// compressed.
    pub fn detect(prefix: &[u8]) -> Compression {
        if prefix.starts_with(&GZIP_MAGIC) {
            Compression::Gzip
        } else {
            Compression::None
        }
    }
}
