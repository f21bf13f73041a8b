//! Receiver: report position, then apply sender commands
//! 接收方：报告位置，然后应用发送方命令

use std::{
  fs,
  path::{Path, PathBuf},
  time::{Duration, UNIX_EPOCH},
};

use compio::io::{AsyncRead, AsyncWrite};
use pgd_base::{
  ControlData,
  consts::PG_CONTROL,
  fs::{copy_n, create_trunc, is_safe_rel, write_file},
  walk,
};
use pgd_incr::apply;

use crate::{
  conf::{Cfg, Conf},
  error::{Error, Result},
  proto::{Cmd, ControlBlock, Hello, read_frame, write_frame},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecvStat {
  pub full: usize,
  pub incr: usize,
  pub inline: usize,
  /// Payload bytes read
  /// 读取的数据字节数
  pub bytes: u64,
}

/// Control block and file manifest of `dir`
/// `dir` 的控制块与文件清单
pub async fn hello(dir: &Path, conf: &[Conf]) -> Result<Hello> {
  let cfg = Cfg::new(conf);
  let control = ControlData::read(dir.join(PG_CONTROL)).await?;
  let manifest = walk(dir, &cfg.exclude)?
    .into_iter()
    .filter(|e| e.rel != PG_CONTROL)
    .map(|e| (e.rel, e.mtime))
    .collect();
  Ok(Hello {
    control: ControlBlock::from(&control),
    manifest,
  })
}

fn target(dir: &Path, path: &str) -> Result<PathBuf> {
  if !is_safe_rel(path) {
    return Err(Error::BadPath(path.to_owned()));
  }
  Ok(dir.join(path))
}

/// Carry the sender's mtime so the next catchup can skip this file
/// 沿用发送方的修改时间，下次追赶可跳过此文件
fn set_mtime(path: &Path, mtime: u64) -> Result<()> {
  fs::File::options()
    .write(true)
    .open(path)?
    .set_modified(UNIX_EPOCH + Duration::from_nanos(mtime))?;
  Ok(())
}

/// Announce `dir` on `stream`, then apply commands until done
/// 在 `stream` 上通告 `dir`，然后应用命令直到结束
pub async fn receive<S: AsyncRead + AsyncWrite>(
  stream: &mut S,
  dir: &Path,
  conf: &[Conf],
) -> Result<RecvStat> {
  let cfg = Cfg::new(conf);
  let hello = hello(dir, conf).await?;
  log::info!(
    "catchup receive into {} at {:X}, {} files",
    dir.display(),
    hello.control.checkpoint,
    hello.manifest.len()
  );
  write_frame(stream, &hello).await?;
  stream.flush().await?;

  let mut stat = RecvStat::default();
  loop {
    let cmd: Cmd = read_frame(stream).await?;
    match cmd {
      Cmd::Full { path, size, mtime } => {
        let dst = target(dir, &path)?;
        let mut file = create_trunc(&dst).await?;
        let got = copy_n(stream, &mut file, size, cfg.buf_size).await?;
        if got != size {
          return Err(Error::Short {
            path,
            want: size,
            got,
          });
        }
        file.sync_all().await?;
        drop(file);
        set_mtime(&dst, mtime)?;
        stat.full += 1;
        stat.bytes += size;
      }
      Cmd::Incr { path, size, mtime } => {
        let dst = target(dir, &path)?;
        let got = apply(&dst, stream).await?;
        if got != size {
          return Err(Error::Short {
            path,
            want: size,
            got,
          });
        }
        set_mtime(&dst, mtime)?;
        stat.incr += 1;
        stat.bytes += size;
      }
      Cmd::Inline { path, data } => {
        let dst = target(dir, &path)?;
        write_file(&dst, data).await?;
        stat.inline += 1;
      }
      Cmd::Done => break,
    }
  }

  log::info!(
    "catchup received: {} full, {} incr, {} bytes",
    stat.full,
    stat.incr,
    stat.bytes
  );
  Ok(stat)
}
