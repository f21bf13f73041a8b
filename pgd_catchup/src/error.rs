//! Error types for catchup
//! 追赶错误类型

use pgd_base::Lsn;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
  #[error("io: {0}")]
  Io(#[from] std::io::Error),

  #[error("increment: {0}")]
  Incr(#[from] pgd_incr::Error),

  #[error("{0}")]
  Base(#[from] pgd_base::Error),

  #[error("decode frame: {0}")]
  Decode(#[from] bitcode::Error),

  #[error("system identifiers do not match: local {local}, remote {remote}")]
  SystemIdMismatch { local: u64, remote: u64 },

  #[error("timeline mismatch: local {local}, remote {remote}")]
  TimelineMismatch { local: u32, remote: u32 },

  #[error("destination is already ahead: start {lsn:X} <= checkpoint {checkpoint:X}")]
  AlreadyAhead { lsn: Lsn, checkpoint: Lsn },

  #[error("short transfer of {path}: want {want} bytes, got {got}")]
  Short { path: String, want: u64, got: u64 },

  #[error("frame too large: {0} bytes")]
  FrameTooLarge(usize),

  #[error("bad path {0}")]
  BadPath(String),
}
