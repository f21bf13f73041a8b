//! Push-side policy: full or delta, and against what
//! 推送策略：全量还是增量，以及比较对象

use std::collections::BTreeMap;

use pgd_base::Lsn;
use pgd_store::Store;

use crate::{
  conf::{Cfg, Conf, Origin},
  error::{Error, Result},
  list::latest,
  sentinel::{FileDesc, load},
};

/// Diff base of a delta backup
/// 增量备份的比较基础
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Base {
  pub name: String,
  /// Checkpoint: pages at or below are already stored
  /// 检查点：不大于它的页已存储
  pub lsn: Lsn,
  /// Root full backup of the base's chain
  /// 基础所在链的根全量备份
  pub full_name: String,
  pub files: BTreeMap<String, FileDesc>,
}

/// Outcome of [`decide`]
/// [`decide`] 的结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
  /// `None` means full backup
  /// `None` 表示全量备份
  pub base: Option<Base>,
  /// Depth the new backup will record, 0 for full
  /// 新备份记录的深度，全量为 0
  pub count: u32,
}

impl Plan {
  #[inline]
  pub fn is_full(&self) -> bool {
    self.base.is_none()
  }
}

/// Decide the mode of the next push from configuration and the latest sentinel
/// 根据配置与最新哨兵决定下一次推送的模式
pub async fn decide<S: Store>(store: &S, conf: &[Conf]) -> Result<Plan> {
  let cfg = Cfg::new(conf);
  plan(store, &cfg).await
}

pub(crate) async fn plan<S: Store>(store: &S, cfg: &Cfg) -> Result<Plan> {
  if cfg.max_steps == 0 {
    return Ok(Plan::default());
  }
  let name = match latest(store).await {
    Ok(name) => name,
    Err(Error::NoBackupFound) => {
      log::info!("no previous backup, doing full backup");
      return Ok(Plan::default());
    }
    Err(e) => return Err(e),
  };

  let s = load(store, &name).await?;
  let count = s.count.unwrap_or(0) + 1;
  if count as usize > cfg.max_steps {
    log::info!("reached max delta steps ({}), doing full backup", cfg.max_steps);
    return Ok(Plan::default());
  }
  let Some(lsn) = s.lsn else {
    log::info!("latest backup {name} has no LSN, doing full backup");
    return Ok(Plan::default());
  };

  let base = match (cfg.origin, s.full_name) {
    (Origin::LatestFull, Some(full)) => {
      let fs = load(store, &full).await?;
      let Some(full_lsn) = fs.lsn else {
        log::info!("full backup {full} has no LSN, doing full backup");
        return Ok(Plan::default());
      };
      Base {
        name: full.clone(),
        lsn: full_lsn,
        full_name: full,
        files: fs.files,
      }
    }
    (_, full_name) => Base {
      full_name: full_name.unwrap_or_else(|| name.clone()),
      name,
      lsn,
      files: s.files,
    },
  };
  log::info!(
    "delta backup from {} at {:X} (full {}, count {count})",
    base.name,
    base.lsn,
    base.full_name
  );
  Ok(Plan {
    base: Some(base),
    count,
  })
}
