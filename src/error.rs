use std::{io, result};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("not find: score={score} member={member:?}")]
    NotFound { score: f64, member: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("corruption: {0}")]
    Corruption(String),

    #[error("io error")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

pub type Result<T> = result::Result<T, Error>;
