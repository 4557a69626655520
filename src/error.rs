use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// `at` on a key the container does not hold.
    KeyNotFound,
    /// A position outside the container, such as erasing through a cursor
    /// parked past the end.
    OutOfRange,
    /// The global allocator refused to hand out a node.
    AllocationFailure,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::KeyNotFound => write!(f, "key not found"),
            Error::OutOfRange => write!(f, "position out of range"),
            Error::AllocationFailure => write!(f, "failed to allocate a tree node"),
        }
    }
}

impl std::error::Error for Error {}
