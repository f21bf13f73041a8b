//! Backup sentinel: identity, lineage and file manifest
//! 备份哨兵：标识、谱系与文件清单

use std::collections::BTreeMap;

use pgd_base::Lsn;
use pgd_store::{Error as StoreError, ReadSrc, RemoteSrc, Store};
use serde::{Deserialize, Serialize};

use crate::{
  error::{Error, Result},
  layout::sentinel_key,
};

/// Per-file manifest entry
/// 单文件清单项
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDesc {
  /// Nanoseconds since epoch
  /// 修改时间（纳秒）
  #[serde(rename = "MTime")]
  pub mtime: u64,
  /// Unchanged since the diff base, nothing stored
  /// 自比较基础以来未变化，未存储
  #[serde(rename = "IsSkipped", default)]
  pub is_skipped: bool,
  #[serde(rename = "IsIncremented", default)]
  pub is_incremented: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentinel {
  #[serde(rename = "LSN", default, skip_serializing_if = "Option::is_none")]
  pub lsn: Option<Lsn>,
  #[serde(rename = "DeltaFromLSN", default, skip_serializing_if = "Option::is_none")]
  pub from_lsn: Option<Lsn>,
  #[serde(rename = "DeltaFrom", default, skip_serializing_if = "Option::is_none")]
  pub from: Option<String>,
  #[serde(rename = "DeltaFullName", default, skip_serializing_if = "Option::is_none")]
  pub full_name: Option<String>,
  #[serde(rename = "DeltaCount", default, skip_serializing_if = "Option::is_none")]
  pub count: Option<u32>,
  #[serde(rename = "Files", default)]
  pub files: BTreeMap<String, FileDesc>,
}

impl Sentinel {
  /// Has a parent backup
  /// 存在父备份
  #[inline]
  pub fn is_incremental(&self) -> bool {
    self.from_lsn.is_some()
  }

  /// Lineage fields are all set or all absent
  /// 谱系字段全部存在或全部缺失
  pub fn is_consistent(&self) -> bool {
    let set = [
      self.from_lsn.is_some(),
      self.from.is_some(),
      self.full_name.is_some(),
    ];
    set.iter().all(|&b| b) || set.iter().all(|&b| !b)
  }

  pub fn to_json(&self) -> Result<Vec<u8>> {
    Ok(sonic_rs::to_vec(self)?)
  }

  pub fn from_json(buf: &[u8]) -> Result<Self> {
    Ok(sonic_rs::from_slice(buf)?)
  }
}

/// Load and check the sentinel of backup `name`
/// 加载并检查备份 `name` 的哨兵
pub async fn load<S: Store>(store: &S, name: &str) -> Result<Sentinel> {
  let src = RemoteSrc::new(store, sentinel_key(name), "");
  let buf = match src.read().await {
    Ok(buf) => buf,
    Err(StoreError::NotFound(_)) => return Err(Error::BackupNotExist(name.to_owned())),
    Err(e) => return Err(e.into()),
  };
  let s = Sentinel::from_json(&buf)?;
  if !s.is_consistent() {
    return Err(Error::BadSentinel(name.to_owned()));
  }
  Ok(s)
}

/// Write the sentinel, marking the backup complete
/// 写入哨兵，标志备份完成
pub async fn save<S: Store>(store: &S, name: &str, s: &Sentinel) -> Result<()> {
  store.put(&sentinel_key(name), s.to_json()?).await?;
  Ok(())
}
