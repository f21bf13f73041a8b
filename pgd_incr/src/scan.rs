//! Capture: find blocks changed after a checkpoint LSN
//! 捕获：查找检查点 LSN 之后变化的块

use std::path::Path;

use compio::{
  BufResult,
  buf::{IntoInner, IoBuf},
  io::AsyncReadAtExt,
};
use compio_fs::File;
use pgd_base::fs::open_read;
use pgd_page::{BLOCK_SIZE, Lsn, Verdict, check};

use crate::{
  error::{Error, Result},
  head::{IncrHead, block_count},
};

/// Blocks read per IO (1MB)
/// 每次 IO 读取的块数
const SCAN_BLOCKS: usize = 128;

/// Scan the first `size` bytes of `file`, or less if the file has since
/// shrunk; the returned `file_size` is what was actually scanned.
///
/// - zero header: changed (unwritten page)
/// - valid header, lsn > `lsn`: changed
/// - valid header, lsn <= `lsn`: unchanged
/// - anything else: [`Error::InvalidBlock`], copy the file whole
/// - trailing partial block: changed
///
/// 扫描文件前 `size` 字节（文件已缩短时以当前长度为准）：零页头视为变化；LSN 大于检查点视为变化；
/// 非零且无效的页头返回 [`Error::InvalidBlock`]；末尾不完整块视为变化
pub async fn scan(file: &File, size: u64, lsn: Lsn) -> Result<IncrHead> {
  let now = file.metadata().await?.len();
  if now < size {
    log::debug!("file shrank from {size} to {now} bytes before scan");
  }
  let size = size.min(now);
  let total = block_count(size);
  if total > u32::MAX as u64 {
    return Err(Error::TooLarge(size));
  }

  let mut blocks = Vec::new();
  let mut buf = Vec::with_capacity(SCAN_BLOCKS * BLOCK_SIZE);
  let mut off = 0u64;
  while off < size {
    let want = (size - off).min((SCAN_BLOCKS * BLOCK_SIZE) as u64) as usize;
    buf.clear();
    let BufResult(res, slice) = file.read_exact_at(buf.slice(0..want), off).await;
    buf = slice.into_inner();
    res?;

    let first = (off / BLOCK_SIZE as u64) as u32;
    for (i, block) in buf[..want].chunks(BLOCK_SIZE).enumerate() {
      let no = first + i as u32;
      if block.len() < BLOCK_SIZE {
        blocks.push(no);
        continue;
      }
      match check(block) {
        Verdict::Zero => blocks.push(no),
        Verdict::Valid(page_lsn) => {
          if page_lsn > lsn {
            blocks.push(no);
          }
        }
        Verdict::Invalid => return Err(Error::InvalidBlock { block: no }),
      }
    }
    off += want as u64;
  }

  Ok(IncrHead {
    file_size: size,
    blocks,
  })
}

/// Build a whole increment in memory, returns bytes and their length
/// 在内存中构建完整增量，返回字节及长度
pub async fn build(path: impl AsRef<Path>, size: u64, lsn: Lsn) -> Result<(Vec<u8>, u64)> {
  let file = open_read(path).await?;
  let head = scan(&file, size, lsn).await?;
  let mut out = Vec::with_capacity(head.len() as usize);
  let len = head.write(&file, &mut out).await?;
  Ok((out, len))
}
