//! Database collaborator: the non-exclusive backup calls
//! 数据库协作方：非独占备份调用

use std::future::Future;

use crate::{Lsn, error::Result};

/// Result of the start-backup call
/// 开始备份调用的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackupStart {
  pub lsn: Lsn,
  pub timeline: u32,
}

/// Result of the stop-backup call, kept in memory
/// 结束备份调用的结果，保存在内存中
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackupStop {
  pub label: Vec<u8>,
  pub tablespace_map: Vec<u8>,
}

/// Running server whose data directory is being copied
/// 正在复制其数据目录的运行中服务器
pub trait Db {
  fn start_backup(&mut self, label: &str) -> impl Future<Output = Result<BackupStart>>;

  fn stop_backup(&mut self) -> impl Future<Output = Result<BackupStop>>;

  /// Timeline the server runs on now; differs from
  /// [`BackupStart::timeline`] once the server has been promoted
  /// 服务器当前所在时间线；提升后与 [`BackupStart::timeline`] 不同
  fn timeline(&mut self) -> impl Future<Output = Result<u32>>;
}
