//! Backup push: full or delta copy of a running data directory
//! 备份推送：运行中数据目录的全量或增量复制

use std::{collections::BTreeMap, io, path::Path};

use pgd_base::{
  Db, is_paged,
  consts::{BACKUP_LABEL, PG_CONTROL, TABLESPACE_MAP},
  fs::read_file,
  name::backup_name,
  walk,
};
use pgd_incr::build;
use pgd_store::{Codec, Store};

use crate::{
  conf::{Cfg, Conf},
  error::{Error, Result},
  layout::{control_key, full_key, incr_key},
  plan::plan,
  sentinel::{FileDesc, Sentinel, save},
};

const LABEL: &str = "pgd backup";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PushStat {
  pub full: usize,
  pub incr: usize,
  pub skipped: usize,
  /// Paged files downgraded to a full copy
  /// 降级为全量复制的分页文件
  pub fallback: usize,
  /// Bytes before compression
  /// 压缩前字节数
  pub bytes: u64,
}

#[derive(Debug, Clone)]
pub struct Pushed {
  pub name: String,
  pub sentinel: Sentinel,
  pub stat: PushStat,
}

async fn put<S: Store>(store: &S, key: &str, codec: Codec, data: Vec<u8>) -> Result<()> {
  store.put(key, codec.enc(data)?).await?;
  Ok(())
}

/// Store a whole file; plain members are streamed by the store
/// 存储整个文件；不压缩的成员由存储流式写入
async fn put_file<S: Store>(
  store: &S,
  key: &str,
  codec: Codec,
  path: &Path,
) -> pgd_store::Result<u64> {
  if codec == Codec::None {
    return store.put_file(key, path).await;
  }
  let data = match read_file(path).await {
    Ok(data) => data,
    Err(e) if e.kind() == io::ErrorKind::NotFound => {
      return Err(pgd_store::Error::NotFound(path.display().to_string()));
    }
    Err(e) => return Err(e.into()),
  };
  let n = data.len() as u64;
  store.put(key, codec.enc(data)?).await?;
  Ok(n)
}

/// Push one backup of `dir`. The sentinel is written last, so an interrupted
/// push leaves no visible backup.
/// 推送 `dir` 的一次备份；哨兵最后写入，中断的推送不会留下可见备份
pub async fn push<S: Store, D: Db>(
  store: &S,
  db: &mut D,
  dir: &Path,
  conf: &[Conf],
) -> Result<Pushed> {
  let cfg = Cfg::new(conf);
  let plan = plan(store, &cfg).await?;
  let start = db.start_backup(LABEL).await?;
  let name = backup_name(start.timeline, start.lsn);
  let codec = cfg.codec;
  log::info!(
    "push {name} at {:X} ({})",
    start.lsn,
    if plan.is_full() { "full" } else { "delta" }
  );

  let mut stat = PushStat::default();
  let mut files = BTreeMap::new();

  for e in walk(dir, &cfg.exclude)? {
    if e.rel == PG_CONTROL {
      continue;
    }
    let mut desc = FileDesc {
      mtime: e.mtime,
      ..FileDesc::default()
    };
    let prior = plan
      .base
      .as_ref()
      .and_then(|b| b.files.get(&e.rel).map(|d| (b.lsn, d.mtime)));

    if let Some((lsn, mtime)) = prior {
      if mtime == e.mtime {
        log::debug!("skip unchanged {}", e.rel);
        desc.is_skipped = true;
        stat.skipped += 1;
        files.insert(e.rel, desc);
        continue;
      }
      if is_paged(&e.rel) {
        match build(&e.path, e.size, lsn).await {
          Ok((data, len)) => {
            put(store, &incr_key(&name, &e.rel, codec), codec, data).await?;
            desc.is_incremented = true;
            stat.incr += 1;
            stat.bytes += len;
            files.insert(e.rel, desc);
            continue;
          }
          Err(pgd_incr::Error::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
            log::debug!("{} removed during backup", e.rel);
            continue;
          }
          Err(err) if err.is_fallback() => {
            log::warn!("{}: {err}, copying whole file", e.rel);
            stat.fallback += 1;
          }
          Err(err) => return Err(err.into()),
        }
      }
    }

    match put_file(store, &full_key(&name, &e.rel, codec), codec, &e.path).await {
      Ok(n) => stat.bytes += n,
      Err(pgd_store::Error::NotFound(_)) => {
        log::debug!("{} removed during backup", e.rel);
        continue;
      }
      Err(err) => return Err(err.into()),
    }
    stat.full += 1;
    files.insert(e.rel, desc);
  }

  let control = read_file(dir.join(PG_CONTROL)).await?;
  put(store, &control_key(&name, codec), codec, control).await?;

  let stop = db.stop_backup().await?;
  put(store, &full_key(&name, BACKUP_LABEL, codec), codec, stop.label).await?;
  if !stop.tablespace_map.is_empty() {
    put(
      store,
      &full_key(&name, TABLESPACE_MAP, codec),
      codec,
      stop.tablespace_map,
    )
    .await?;
  }

  let now = db.timeline().await?;
  if now != start.timeline {
    log::warn!("{name}: timeline {} -> {now}, sentinel not written", start.timeline);
    return Err(Error::TimelineChanged {
      start: start.timeline,
      now,
    });
  }

  let mut sentinel = Sentinel {
    lsn: Some(start.lsn),
    files,
    ..Sentinel::default()
  };
  if let Some(base) = plan.base {
    sentinel.from_lsn = Some(base.lsn);
    sentinel.from = Some(base.name);
    sentinel.full_name = Some(base.full_name);
    sentinel.count = Some(plan.count);
  }
  save(store, &name, &sentinel).await?;

  log::info!(
    "pushed {name}: {} full, {} incr, {} skipped, {} fallback",
    stat.full,
    stat.incr,
    stat.skipped,
    stat.fallback
  );
  Ok(Pushed {
    name,
    sentinel,
    stat,
  })
}
