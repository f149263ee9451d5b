use std::{io, path::PathBuf};

use thiserror::Error;

/// Faults that stop the machine. A well-formed ROM never raises these.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum MachineError {
    #[error("access of {len} byte(s) at {addr:#05x} is outside the {capacity}-byte address space")]
    OutOfBounds {
        addr: usize,
        len: usize,
        capacity: usize,
    },
    #[error("return from subroutine with an empty call stack")]
    StackUnderflow,
    #[error("call stack overflow: more than {0} nested subroutine calls")]
    StackOverflow(usize),
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("unable to read ROM {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("ROM is {len} bytes but only {available} bytes fit after {start:#05x}")]
    OutOfSpace {
        len: usize,
        available: usize,
        start: usize,
    },
}
