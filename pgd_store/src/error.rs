//! Error types for storage and codecs
//! 存储与编解码错误类型

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
  #[error("io: {0}")]
  Io(#[from] std::io::Error),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("lz4: {0}")]
  Lz4(#[from] lz4_flex::block::DecompressError),

  #[error("zstd: {0}")]
  Zstd(std::io::Error),
}
