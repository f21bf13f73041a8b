//! Async file helpers over compio
//! 基于 compio 的异步文件工具

use std::{fs, io, path::Path, time::UNIX_EPOCH};

use compio::{
  BufResult,
  buf::{IntoInner, IoBuf},
  io::{AsyncRead, AsyncReadAtExt, AsyncWrite, AsyncWriteAtExt, AsyncWriteExt},
};
use compio_fs::{File, OpenOptions};

use crate::consts::BUF_SIZE;

/// Open file for reading
/// 打开文件用于读取
#[inline]
pub async fn open_read(path: impl AsRef<Path>) -> io::Result<File> {
  OpenOptions::new().read(true).open(path).await
}

/// Open file for reading and writing, create if not exists
/// 打开文件用于读写，不存在则创建
pub async fn open_read_write_create(path: impl AsRef<Path>) -> io::Result<File> {
  let path = path.as_ref();
  mkdir_parent(path)?;
  OpenOptions::new()
    .read(true)
    .write(true)
    .create(true)
    .open(path)
    .await
}

/// Create or truncate file for writing, parents included
/// 创建或截断文件用于写入，包括父目录
pub async fn create_trunc(path: impl AsRef<Path>) -> io::Result<File> {
  let path = path.as_ref();
  mkdir_parent(path)?;
  OpenOptions::new()
    .write(true)
    .create(true)
    .truncate(true)
    .open(path)
    .await
}

/// Read entire file into Vec
/// 读取整个文件到 Vec
pub async fn read_file(path: impl AsRef<Path>) -> io::Result<Vec<u8>> {
  let file = open_read(path).await?;
  let len = file.metadata().await?.len() as usize;
  if len == 0 {
    return Ok(Vec::new());
  }
  let BufResult(res, buf) = file
    .read_exact_at(Vec::with_capacity(len).slice(0..len), 0)
    .await;
  res?;
  Ok(buf.into_inner())
}

/// Replace file content
/// 替换文件内容
pub async fn write_file(path: impl AsRef<Path>, data: Vec<u8>) -> io::Result<()> {
  let mut file = create_trunc(path).await?;
  if !data.is_empty() {
    file.write_all_at(data, 0).await.0?;
  }
  file.sync_all().await
}

/// Read a stream to its end
/// 读取流直到结束
pub async fn read_all<R: AsyncRead>(r: &mut R) -> io::Result<Vec<u8>> {
  let mut out = Vec::new();
  let mut buf = Vec::with_capacity(BUF_SIZE);
  loop {
    buf.clear();
    let BufResult(res, b) = r.read(buf).await;
    buf = b;
    let n = res?;
    if n == 0 {
      return Ok(out);
    }
    out.extend_from_slice(&buf[..n]);
  }
}

/// Copy up to `size` bytes from a stream into `file` at offset 0.
/// Returns bytes copied; less than `size` means the stream ended early.
/// 从流复制最多 `size` 字节到文件；返回值小于 `size` 表示流提前结束
pub async fn copy_n<R: AsyncRead>(
  r: &mut R,
  file: &mut File,
  size: u64,
  chunk: usize,
) -> io::Result<u64> {
  let mut buf = Vec::with_capacity(chunk);
  let mut got = 0u64;
  while got < size {
    let want = (size - got).min(chunk as u64) as usize;
    buf.clear();
    let BufResult(res, slice) = r.read(buf.slice(0..want)).await;
    buf = slice.into_inner();
    let n = res?;
    if n == 0 {
      break;
    }
    buf.truncate(n);
    let BufResult(res, b) = file.write_all_at(buf, got).await;
    buf = b;
    res?;
    got += n as u64;
  }
  Ok(got)
}

/// Stream the first `size` bytes of `file` into `w`. Bytes lost to a
/// concurrent truncation are sent as zeroes, so exactly `size` bytes go out.
/// 将文件前 `size` 字节写入流；被并发截断的部分以零填充，始终写出 `size` 字节
pub async fn send_file<W: AsyncWrite>(
  file: &File,
  size: u64,
  w: &mut W,
  chunk: usize,
) -> io::Result<u64> {
  let mut buf = Vec::with_capacity(chunk);
  let mut pos = 0u64;
  while pos < size {
    let want = (size - pos).min(chunk as u64) as usize;
    buf.clear();
    let BufResult(res, slice) = file.read_exact_at(buf.slice(0..want), pos).await;
    buf = slice.into_inner();
    match res {
      Ok(()) => {}
      Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
        log::debug!("file truncated at {pos} while sending {size} bytes");
        buf.clear();
        buf.resize(want, 0);
      }
      Err(e) => return Err(e),
    }
    let BufResult(res, b) = w.write_all(buf).await;
    buf = b;
    res?;
    pos += want as u64;
  }
  Ok(pos)
}

#[inline]
pub fn mkdir_parent(path: &Path) -> io::Result<()> {
  if let Some(dir) = path.parent() {
    fs::create_dir_all(dir)?;
  }
  Ok(())
}

/// Rename, creating the destination's parents
/// 重命名，并创建目标的父目录
pub fn move_mkdirs(from: &Path, to: &Path) -> io::Result<()> {
  mkdir_parent(to)?;
  fs::rename(from, to)
}

/// Missing directory counts as empty
/// 不存在的目录视为空
pub fn is_empty_dir(path: &Path) -> io::Result<bool> {
  match fs::read_dir(path) {
    Ok(mut it) => Ok(it.next().is_none()),
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(true),
    Err(e) => Err(e),
  }
}

/// Relative `/` separated path that stays inside its root
/// 停留在根目录内的相对路径
pub fn is_safe_rel(rel: &str) -> bool {
  !rel.is_empty()
    && !rel.starts_with('/')
    && rel
      .split('/')
      .all(|c| !c.is_empty() && c != "." && c != ".." && !c.contains('\\'))
}

/// Set file length
/// 设置文件长度
pub fn set_len(path: &Path, len: u64) -> io::Result<()> {
  fs::OpenOptions::new().write(true).open(path)?.set_len(len)
}

/// Modification time in nanoseconds since epoch, 0 if unavailable
/// 修改时间（纳秒），不可用时为 0
pub fn mtime(meta: &fs::Metadata) -> u64 {
  meta
    .modified()
    .ok()
    .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
    .map_or(0, |d| d.as_nanos() as u64)
}
