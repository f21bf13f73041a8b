//! Error types for pgd_base
//! pgd_base 错误类型

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
  #[error("io: {0}")]
  Io(#[from] std::io::Error),

  #[error("control file too short: {0} bytes")]
  ControlShort(usize),

  #[error("db: {0}")]
  Db(Box<str>),
}

impl Error {
  #[inline]
  pub fn db(msg: impl Into<Box<str>>) -> Self {
    Self::Db(msg.into())
  }
}
