//! Increment header
//! 增量头

use std::io;

use compio::{
  BufResult,
  buf::{IntoInner, IoBuf},
  io::{AsyncReadAtExt, AsyncWrite, AsyncWriteExt},
};
use compio_fs::File;
use pgd_page::BLOCK_SIZE;
use zerocopy::{
  FromBytes, Immutable, IntoBytes, KnownLayout,
  little_endian::{U32, U64},
};

use crate::error::{Error, Result};

/// Size of file_size + count
/// file_size + count 的大小
pub const FIXED_SIZE: usize = size_of::<Fixed>();

#[derive(FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub(crate) struct Fixed {
  pub file_size: U64,
  pub count: U32,
}

/// Increment header: source file size and changed block numbers
/// 增量头：源文件大小与变化的块号
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IncrHead {
  pub file_size: u64,
  pub blocks: Vec<u32>,
}

/// Number of blocks covering `size` bytes, the last one possibly partial
/// 覆盖 `size` 字节所需的块数，最后一块可能不完整
#[inline]
pub(crate) fn block_count(size: u64) -> u64 {
  size.div_ceil(BLOCK_SIZE as u64)
}

impl IncrHead {
  /// Bytes before the first block payload
  /// 第一个块数据之前的字节数
  #[inline]
  pub fn head_len(&self) -> u64 {
    (FIXED_SIZE + self.blocks.len() * 4) as u64
  }

  /// Total encoded length, header plus payload
  /// 编码后总长度（头 + 数据）
  #[inline]
  pub fn len(&self) -> u64 {
    self.head_len() + (self.blocks.len() * BLOCK_SIZE) as u64
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.blocks.is_empty()
  }

  pub fn encode(&self) -> Vec<u8> {
    let mut buf = Vec::with_capacity(self.head_len() as usize);
    let fixed = Fixed {
      file_size: U64::new(self.file_size),
      count: U32::new(self.blocks.len() as u32),
    };
    buf.extend_from_slice(fixed.as_bytes());
    for b in &self.blocks {
      buf.extend_from_slice(&b.to_le_bytes());
    }
    buf
  }

  /// Check block list against the declared size
  /// 按声明的大小校验块列表
  pub(crate) fn check(&self) -> Result<()> {
    if self.blocks.windows(2).any(|w| w[0] >= w[1]) {
      return Err(Error::Corrupt("block numbers not ascending"));
    }
    let count = block_count(self.file_size);
    if self.blocks.last().is_some_and(|&last| last as u64 >= count) {
      return Err(Error::Corrupt("block beyond file size"));
    }
    Ok(())
  }

  /// Stream header and blocks read from `file` into `w`.
  /// A trailing partial block is zero padded to one full block. A block cut
  /// off by truncation after the scan is sent as zeroes, so exactly
  /// [`Self::len`] bytes are always written.
  /// 将头与从 `file` 读取的块写入 `w`；末尾不完整块补零到整块；
  /// 扫描后被截断的块以全零发送，始终写出 [`Self::len`] 字节
  pub async fn write<W: AsyncWrite>(&self, file: &File, w: &mut W) -> Result<u64> {
    w.write_all(self.encode()).await.0?;

    let mut buf = Vec::with_capacity(BLOCK_SIZE);
    for &no in &self.blocks {
      let off = no as u64 * BLOCK_SIZE as u64;
      let want = (self.file_size - off).min(BLOCK_SIZE as u64) as usize;
      buf.clear();
      let BufResult(res, slice) = file.read_exact_at(buf.slice(0..want), off).await;
      buf = slice.into_inner();
      match res {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
          log::debug!("block {no} truncated after scan");
          buf.clear();
        }
        Err(e) => return Err(e.into()),
      }
      buf.resize(BLOCK_SIZE, 0);
      let BufResult(res, b) = w.write_all(buf).await;
      buf = b;
      res?;
    }
    Ok(self.len())
  }
}
