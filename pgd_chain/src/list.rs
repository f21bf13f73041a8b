//! Enumerate complete backups
//! 列举完整备份

use pgd_base::Lsn;
use pgd_store::Store;

use crate::{
  error::{Error, Result},
  layout::{BASE_PREFIX, SENTINEL_SUFFIX},
  sentinel::load,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupInfo {
  pub name: String,
  /// Sentinel modification time, nanoseconds
  /// 哨兵修改时间（纳秒）
  pub modified: u64,
  pub lsn: Option<Lsn>,
}

/// Names and sentinel times, oldest first
/// 名称与哨兵时间，最旧的在前
async fn names<S: Store>(store: &S) -> Result<Vec<(String, u64)>> {
  let mut li: Vec<_> = store
    .list(BASE_PREFIX, false)
    .await?
    .into_iter()
    .filter_map(|o| {
      let name = o.key.strip_prefix(BASE_PREFIX)?.strip_suffix(SENTINEL_SUFFIX)?;
      Some((name.to_owned(), o.modified))
    })
    .collect();
  li.sort_unstable_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
  Ok(li)
}

/// Every backup whose sentinel exists, oldest first
/// 所有存在哨兵的备份，最旧的在前
pub async fn list<S: Store>(store: &S) -> Result<Vec<BackupInfo>> {
  let mut li = Vec::new();
  for (name, modified) in names(store).await? {
    let lsn = load(store, &name).await?.lsn;
    li.push(BackupInfo {
      name,
      modified,
      lsn,
    });
  }
  Ok(li)
}

/// Name of the newest complete backup
/// 最新完整备份的名称
pub async fn latest<S: Store>(store: &S) -> Result<String> {
  names(store)
    .await?
    .pop()
    .map(|(name, _)| name)
    .ok_or(Error::NoBackupFound)
}
