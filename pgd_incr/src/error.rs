//! Error types for increment build / apply
//! 增量构建与应用的错误类型

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
  #[error("io: {0}")]
  Io(#[from] std::io::Error),

  /// Non-zero block whose header fails validation
  /// 页头校验失败的非零块
  #[error("invalid block {block}")]
  InvalidBlock { block: u32 },

  #[error("truncated increment: want {want} bytes, got {got}")]
  Truncated { want: u64, got: u64 },

  #[error("increment followed by {0} trailing bytes")]
  TrailingBytes(usize),

  #[error("corrupt increment: {0}")]
  Corrupt(&'static str),

  #[error("file too large for increment: {0} bytes")]
  TooLarge(u64),
}

impl Error {
  /// Caller should copy this file whole instead
  /// 调用方应改为整体复制此文件
  #[inline]
  pub fn is_fallback(&self) -> bool {
    matches!(self, Self::InvalidBlock { .. } | Self::TooLarge(_))
  }
}
