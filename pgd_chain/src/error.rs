//! Error types for backup chains
//! 备份链错误类型

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
  #[error("io: {0}")]
  Io(#[from] std::io::Error),

  #[error("increment: {0}")]
  Incr(#[from] pgd_incr::Error),

  #[error("store: {0}")]
  Store(#[from] pgd_store::Error),

  #[error("{0}")]
  Base(#[from] pgd_base::Error),

  #[error("sentinel json: {0}")]
  Json(#[from] sonic_rs::Error),

  #[error("LATEST backup not found")]
  NoBackupFound,

  #[error("backup '{0}' does not exist")]
  BackupNotExist(String),

  #[error("directory {0} for delta base must be empty")]
  NotEmpty(PathBuf),

  #[error("corrupt backup {0}: missing pg_control")]
  MissingControl(String),

  #[error("increment base missing for {0}")]
  MissingBase(String),

  #[error("delta chain loops back to {0}")]
  Cycle(String),

  #[error("bad sentinel {0}: lineage fields incomplete")]
  BadSentinel(String),

  #[error("bad member path {0}")]
  BadPath(String),

  /// Server promoted during the backup; no sentinel was written
  /// 备份期间服务器被提升；未写入哨兵
  #[error("timeline changed from {start} to {now} during backup")]
  TimelineChanged { start: u32, now: u32 },

  #[error("bad wal segment {name}: {source}")]
  BadWal {
    name: String,
    source: pgd_page::Error,
  },

  #[error("archive '{0}' does not exist")]
  WalNotExist(String),

  #[error("config: {0}")]
  Conf(String),
}
