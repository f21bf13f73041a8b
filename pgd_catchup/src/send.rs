//! Sender: one pass over the primary's data directory
//! 发送方：对主库数据目录的单次遍历

use std::{collections::HashMap, io, path::Path};

use compio::io::{AsyncRead, AsyncWrite};
use pgd_base::{
  ControlData, Db, is_paged,
  consts::{BACKUP_LABEL, PG_CONTROL, TABLESPACE_MAP},
  fs::{open_read, read_file, send_file},
  walk,
};
use pgd_incr::scan;

use crate::{
  conf::{Cfg, Conf},
  error::{Error, Result},
  proto::{Cmd, Hello, read_frame, write_frame},
};

const LABEL: &str = "pgd catchup";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SendStat {
  pub full: usize,
  pub incr: usize,
  pub skipped: usize,
  /// Paged files downgraded to a full copy
  /// 降级为全量复制的分页文件
  pub fallback: usize,
  /// Payload bytes written
  /// 写出的数据字节数
  pub bytes: u64,
}

/// Check the receiver's control block against ours
/// 用本地控制数据校验接收方控制块
fn verify(local: &ControlData, hello: &Hello) -> Result<()> {
  let remote = &hello.control;
  if local.system_id != remote.system_id {
    return Err(Error::SystemIdMismatch {
      local: local.system_id,
      remote: remote.system_id,
    });
  }
  if local.timeline != remote.timeline {
    return Err(Error::TimelineMismatch {
      local: local.timeline,
      remote: remote.timeline,
    });
  }
  Ok(())
}

/// Stream `dir` to the receiver on the other end of `stream`.
/// Nothing is written to `stream` unless the handshake passes.
/// 将 `dir` 流式发送给 `stream` 另一端的接收方；握手通过前不写出任何内容
pub async fn send<S: AsyncRead + AsyncWrite, D: Db>(
  stream: &mut S,
  db: &mut D,
  dir: &Path,
  conf: &[Conf],
) -> Result<SendStat> {
  let cfg = Cfg::new(conf);
  let hello: Hello = read_frame(stream).await?;
  let local = ControlData::read(dir.join(PG_CONTROL)).await?;
  verify(&local, &hello)?;

  let checkpoint = hello.control.checkpoint;
  let start = db.start_backup(LABEL).await?;
  if start.lsn <= checkpoint {
    if let Err(e) = db.stop_backup().await {
      log::warn!("stop backup: {e}");
    }
    return Err(Error::AlreadyAhead {
      lsn: start.lsn,
      checkpoint,
    });
  }
  log::info!(
    "catchup from {:X} to {:X}, receiver holds {} files",
    checkpoint,
    start.lsn,
    hello.manifest.len()
  );

  let manifest: HashMap<String, u64> = hello.manifest.into_iter().collect();
  let mut stat = SendStat::default();

  for e in walk(dir, &cfg.exclude)? {
    if e.rel == PG_CONTROL {
      continue;
    }
    let known = manifest.get(&e.rel).copied();
    if known == Some(e.mtime) {
      log::debug!("skip unchanged {}", e.rel);
      stat.skipped += 1;
      continue;
    }

    let file = match open_read(&e.path).await {
      Ok(file) => file,
      Err(err) if err.kind() == io::ErrorKind::NotFound => {
        log::debug!("{} removed during catchup", e.rel);
        continue;
      }
      Err(err) => return Err(err.into()),
    };
    let size = file.metadata().await?.len();

    if known.is_some() && is_paged(&e.rel) {
      match scan(&file, size, checkpoint).await {
        Ok(head) => {
          let cmd = Cmd::Incr {
            path: e.rel,
            size: head.len(),
            mtime: e.mtime,
          };
          write_frame(stream, &cmd).await?;
          stat.bytes += head.write(&file, stream).await?;
          stat.incr += 1;
          continue;
        }
        Err(err) if err.is_fallback() => {
          log::warn!("{}: {err}, sending whole file", e.rel);
          stat.fallback += 1;
        }
        Err(err) => return Err(err.into()),
      }
    }

    let cmd = Cmd::Full {
      path: e.rel,
      size,
      mtime: e.mtime,
    };
    write_frame(stream, &cmd).await?;
    stat.bytes += send_file(&file, size, stream, cfg.buf_size).await?;
    stat.full += 1;
  }

  let stop = db.stop_backup().await?;
  let control = read_file(dir.join(PG_CONTROL)).await?;
  for (path, data) in [
    (BACKUP_LABEL, stop.label),
    (TABLESPACE_MAP, stop.tablespace_map),
    (PG_CONTROL, control),
  ] {
    let cmd = Cmd::Inline {
      path: path.to_owned(),
      data,
    };
    write_frame(stream, &cmd).await?;
  }
  write_frame(stream, &Cmd::Done).await?;
  stream.flush().await?;

  log::info!(
    "catchup sent: {} full, {} incr, {} skipped, {} fallback, {} bytes",
    stat.full,
    stat.incr,
    stat.skipped,
    stat.fallback,
    stat.bytes
  );
  Ok(stat)
}
