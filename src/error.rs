use std::borrow::Cow;
use std::error;
use std::fmt;
use std::io::{self, Error};

/// An I/O error annotated with what the sniffer was doing when it failed.
#[derive(Debug)]
pub struct SniffError {
    desc: Cow<'static, str>,
    io: io::Error,
}

impl SniffError {
    pub fn new(desc: impl Into<Cow<'static, str>>, err: Error) -> SniffError {
        SniffError {
            desc: desc.into(),
            io: err,
        }
    }
}

impl error::Error for SniffError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        Some(&self.io)
    }
}

impl fmt::Display for SniffError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.desc, self.io)
    }
}

impl From<SniffError> for Error {
    fn from(t: SniffError) -> Error {
        Error::new(t.io.kind(), t)
    }
}
