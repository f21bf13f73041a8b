//! Apply: write increment blocks over a base copy
//! 应用：将增量块写到基础副本上

use std::path::Path;

use compio::{
  BufResult,
  buf::{IntoInner, IoBuf},
  io::{AsyncRead, AsyncWriteAtExt},
};
use pgd_base::fs::{open_read_write_create, set_len};
use pgd_page::BLOCK_SIZE;
use zerocopy::FromBytes;

use crate::{
  error::{Error, Result},
  head::{FIXED_SIZE, Fixed, IncrHead, block_count},
};

/// Fill `buf` with exactly `n` bytes
/// 向 `buf` 读入恰好 `n` 字节
async fn read_n<R: AsyncRead>(r: &mut R, mut buf: Vec<u8>, n: usize) -> Result<Vec<u8>> {
  buf.clear();
  buf.reserve(n);
  while buf.len() < n {
    let have = buf.len();
    let BufResult(res, slice) = r.read(buf.slice(have..n)).await;
    buf = slice.into_inner();
    if res? == 0 {
      return Err(Error::Truncated {
        want: n as u64,
        got: have as u64,
      });
    }
  }
  Ok(buf)
}

/// Read an increment header from a stream
/// 从流读取增量头
async fn read_head<R: AsyncRead>(r: &mut R) -> Result<IncrHead> {
  let buf = read_n(r, Vec::new(), FIXED_SIZE).await?;
  let fixed = Fixed::read_from_bytes(&buf[..]).map_err(|_| Error::Corrupt("header"))?;
  let file_size = fixed.file_size.get();
  let count = fixed.count.get() as usize;
  if count as u64 > block_count(file_size) {
    return Err(Error::Corrupt("more blocks than file size allows"));
  }

  let buf = read_n(r, buf, count * 4).await?;
  let blocks = buf
    .chunks_exact(4)
    .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
    .collect();
  let head = IncrHead { file_size, blocks };
  head.check()?;
  Ok(head)
}

/// Apply one increment read from `r` onto the file at `path`.
///
/// Listed blocks are written at `block * BLOCK_SIZE`; unlisted regions keep
/// their bytes, so the target must already hold the base version. The file is
/// then cut to the declared size. Returns bytes consumed from `r`.
///
/// 将 `r` 中的增量应用到 `path`；未列出的区域保持不变，
/// 因此目标必须已是基础版本。最后按声明大小截断。返回从 `r` 消费的字节数
pub async fn apply<R: AsyncRead>(path: impl AsRef<Path>, r: &mut R) -> Result<u64> {
  let path = path.as_ref();
  let head = read_head(r).await?;
  let mut file = open_read_write_create(path).await?;

  let mut buf = Vec::with_capacity(BLOCK_SIZE);
  for &no in &head.blocks {
    buf = read_n(r, buf, BLOCK_SIZE).await?;
    let off = no as u64 * BLOCK_SIZE as u64;
    let BufResult(res, b) = file.write_all_at(buf, off).await;
    buf = b;
    res?;
  }

  set_len(path, head.file_size)?;
  file.sync_all().await?;
  log::debug!(
    "applied {} blocks to {} ({} bytes)",
    head.blocks.len(),
    path.display(),
    head.file_size
  );
  Ok(head.len())
}

/// Apply an increment held in memory; leftover bytes are an error
/// 应用内存中的增量；存在剩余字节即为错误
pub async fn apply_bytes(path: impl AsRef<Path>, data: &[u8]) -> Result<()> {
  let mut rest = data;
  apply(path, &mut rest).await?;
  if !rest.is_empty() {
    return Err(Error::TrailingBytes(rest.len()));
  }
  Ok(())
}
