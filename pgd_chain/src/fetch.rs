//! Chain resolution and restore
//! 链解析与恢复

use std::{
  collections::HashSet,
  fs,
  path::{Path, PathBuf},
};

use pgd_base::{
  ControlData, Lsn,
  consts::{BUF_SIZE, PG_CONTROL},
  fs::{copy_n, create_trunc, is_empty_dir, is_safe_rel, move_mkdirs, read_all, write_file},
};
use pgd_incr::{apply, apply_bytes};
use pgd_store::{Codec, ReadSrc, RemoteSrc, Store};

use crate::{
  conf::{Cfg, Conf},
  error::{Error, Result},
  layout::{CONTROL, FULL_DIR, INCR_DIR, LATEST, member_dir},
  list::latest,
  sentinel::{Sentinel, load},
};

/// Upper bound on chain length
/// 链长度上限
pub const MAX_HOPS: usize = 4096;

/// How a stored member lands in the target
/// 存储成员落入目标的方式
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
  /// Whole file content
  /// 完整文件内容
  Full,
  /// Increment over the staged prior version
  /// 基于暂存旧版本的增量
  Incr,
}

/// Resolve `name` (or [`LATEST`]) to its chain, root full backup first
/// 将 `name`（或 [`LATEST`]）解析为备份链，根全量备份在前
pub async fn chain<S: Store>(store: &S, name: &str) -> Result<Vec<(String, Sentinel)>> {
  let mut cur = if name == LATEST {
    latest(store).await?
  } else {
    name.to_owned()
  };
  let mut seen = HashSet::new();
  let mut li = Vec::new();
  loop {
    if li.len() >= MAX_HOPS || !seen.insert(cur.clone()) {
      return Err(Error::Cycle(cur));
    }
    let s = load(store, &cur).await?;
    let parent = s.from.clone();
    li.push((cur, s));
    match parent {
      Some(p) => cur = p,
      None => break,
    }
  }
  li.reverse();
  Ok(li)
}

/// `.<target>.stage` next to `target`. A target without a final name
/// (`.`, `..`) is resolved first; the filesystem root is rejected.
/// 与 `target` 同级的 `.<target>.stage`；无末级名称的目标先解析，文件系统根目录被拒绝
pub fn default_stage(target: &Path) -> Result<PathBuf> {
  let abs = if target.file_name().is_some() {
    target.to_path_buf()
  } else {
    fs::canonicalize(target)?
  };
  let Some(name) = abs.file_name() else {
    return Err(Error::BadPath(target.display().to_string()));
  };
  let stage = format!(".{}.stage", name.to_string_lossy());
  Ok(abs.with_file_name(stage))
}

/// Restore backup `name` and all its ancestors into `target`, oldest first.
/// Returns the LSN of the restored backup.
/// 将备份 `name` 及其所有祖先按从旧到新恢复到 `target`，返回恢复后的 LSN
pub async fn fetch<S: Store>(store: &S, name: &str, target: &Path, conf: &[Conf]) -> Result<Lsn> {
  let cfg = Cfg::new(conf);
  let li = chain(store, name).await?;
  let stage = match cfg.stage {
    Some(stage) => stage,
    None => default_stage(target)?,
  };

  for (name, s) in &li {
    match &s.from {
      Some(from) => log::info!("fetch {name} over {from}"),
      None => log::info!("fetch {name}"),
    }
    unpack(store, name, s, target, &stage).await?;
  }

  if let Some(lsn) = li.last().and_then(|(_, s)| s.lsn) {
    return Ok(lsn);
  }
  Ok(ControlData::read(target.join(PG_CONTROL)).await?.checkpoint)
}

/// Materialize one backup over whatever `target` holds
/// 将一个备份覆盖到 `target` 现有内容之上
async fn unpack<S: Store>(
  store: &S,
  name: &str,
  s: &Sentinel,
  target: &Path,
  stage: &Path,
) -> Result<()> {
  if !s.is_incremental() {
    if !is_empty_dir(target)? {
      return Err(Error::NotEmpty(target.to_path_buf()));
    }
    fs::create_dir_all(target)?;
    return members(store, name, target, None).await;
  }

  if !is_empty_dir(stage)? {
    return Err(Error::NotEmpty(stage.to_path_buf()));
  }
  fs::create_dir_all(stage)?;
  defer_lite::defer! {
    if let Err(e) = fs::remove_dir_all(stage) {
      log::warn!("remove stage {}: {e}", stage.display());
    }
  }

  fs::create_dir_all(target)?;
  for item in fs::read_dir(target)? {
    let item = item?;
    fs::rename(item.path(), stage.join(item.file_name()))?;
  }

  for (rel, desc) in &s.files {
    if !desc.is_skipped {
      continue;
    }
    if !is_safe_rel(rel) {
      return Err(Error::BadPath(rel.clone()));
    }
    let from = stage.join(rel);
    if !from.is_file() {
      return Err(Error::MissingBase(rel.clone()));
    }
    move_mkdirs(&from, &target.join(rel))?;
  }

  members(store, name, target, Some(stage)).await
}

/// Extract every stored member of `name`, control file last
/// 解出 `name` 的所有存储成员，控制文件最后
async fn members<S: Store>(
  store: &S,
  name: &str,
  target: &Path,
  stage: Option<&Path>,
) -> Result<()> {
  let dir = member_dir(name);
  let mut control = None;
  for obj in store.list(&dir, true).await? {
    let src = RemoteSrc::new(store, obj.key, &dir);
    let path = src.path();
    if let Some(rel) = path.strip_prefix(FULL_DIR) {
      extract(&src, rel, Kind::Full, target, stage).await?;
    } else if let Some(rel) = path.strip_prefix(INCR_DIR) {
      extract(&src, rel, Kind::Incr, target, stage).await?;
    } else if path == CONTROL {
      control = Some(src);
    } else {
      log::warn!("unknown member {}", src.key());
    }
  }

  let Some(src) = control else {
    return Err(Error::MissingControl(name.to_owned()));
  };
  extract(&src, PG_CONTROL, Kind::Full, target, stage).await
}

/// Write one member to `target/rel`. [`Kind::Incr`] moves the prior version
/// out of `stage` first and applies the increment over it.
/// 将一个成员写到 `target/rel`；
/// [`Kind::Incr`] 先从暂存区移回旧版本再应用增量
pub async fn extract<R: ReadSrc>(
  src: &R,
  rel: &str,
  kind: Kind,
  target: &Path,
  stage: Option<&Path>,
) -> Result<()> {
  if !is_safe_rel(rel) {
    return Err(Error::BadPath(rel.to_owned()));
  }
  let dst = target.join(rel);
  if kind == Kind::Incr {
    let base = stage
      .map(|s| s.join(rel))
      .filter(|p| p.is_file())
      .ok_or_else(|| Error::MissingBase(rel.to_owned()))?;
    move_mkdirs(&base, &dst)?;
  }

  if src.codec() != Codec::None {
    let data = src.read().await?;
    match kind {
      Kind::Full => write_file(&dst, data).await?,
      Kind::Incr => apply_bytes(&dst, &data).await?,
    }
    return Ok(());
  }

  // Plain members stream from the store
  let mut r = src.open().await?;
  match kind {
    Kind::Full => {
      let mut file = create_trunc(&dst).await?;
      copy_n(&mut r, &mut file, u64::MAX, BUF_SIZE).await?;
      file.sync_all().await?;
    }
    Kind::Incr => {
      apply(&dst, &mut r).await?;
      let rest = read_all(&mut r).await?;
      if !rest.is_empty() {
        return Err(pgd_incr::Error::TrailingBytes(rest.len()).into());
      }
    }
  }
  Ok(())
}
