//! Error types for page header parsing
//! 页头解析错误类型

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
  /// Header is all zero: unwritten page or tail of a .partial segment
  /// 页头全零：未写入的页或 .partial 段的尾部
  #[error("page header contains only zeroes")]
  Zero,

  #[error("invalid page header")]
  Invalid,

  #[error("short page header: {0} bytes")]
  Short(usize),
}
