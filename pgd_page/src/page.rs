//! Relation page header (PageHeaderData)
//! 关系页页头
//!
//! Disk format / 磁盘格式:
//! lsn(8) + checksum(2) + flags(2) + lower(2) + upper(2) + special(2)
//! + pagesize_version(2) + prune_xid(4)

use zerocopy::{
  FromBytes, Immutable, KnownLayout,
  little_endian::{U16, U32},
};

use crate::{
  Lsn,
  consts::{BLOCK_SIZE, HEAD_SIZE, PD_VALID_FLAG_BITS},
  error::{Error, Result},
};

#[derive(FromBytes, KnownLayout, Immutable)]
#[repr(C)]
struct Disk {
  xlogid: U32,
  xrecoff: U32,
  checksum: U16,
  flags: U16,
  lower: U16,
  upper: U16,
  special: U16,
  pagesize_version: U16,
  prune_xid: U32,
}

/// Parsed page header
/// 解析后的页头
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageHead {
  pub lsn: Lsn,
  pub checksum: u16,
  pub flags: u16,
  pub lower: u16,
  pub upper: u16,
  pub special: u16,
  pub pagesize_version: u16,
  pub prune_xid: u32,
}

/// Verdict on one block, used by change detection
/// 单个块的判定结果，用于变更检测
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
  Zero,
  Valid(Lsn),
  Invalid,
}

impl PageHead {
  #[inline]
  pub fn is_zero(&self) -> bool {
    *self == Self::default()
  }

  /// Structural checks of bufpage.c PageIsVerified (without checksum).
  /// A non-zero header with lsn 0 was never WAL-logged and is invalid.
  /// bufpage.c 中 PageIsVerified 的结构检查（不含校验和）；lsn 为 0 的非零页头无效
  pub fn is_valid(&self) -> bool {
    let block = BLOCK_SIZE as u16;
    self.lsn != 0
      && self.flags & !PD_VALID_FLAG_BITS == 0
      && self.lower as usize >= HEAD_SIZE
      && self.lower <= self.upper
      && self.upper <= self.special
      && self.special <= block
      && self.pagesize_version & 0xFF00 == block
  }
}

impl From<&Disk> for PageHead {
  #[inline]
  fn from(d: &Disk) -> Self {
    Self {
      lsn: ((d.xlogid.get() as u64) << 32) | d.xrecoff.get() as u64,
      checksum: d.checksum.get(),
      flags: d.flags.get(),
      lower: d.lower.get(),
      upper: d.upper.get(),
      special: d.special.get(),
      pagesize_version: d.pagesize_version.get(),
      prune_xid: d.prune_xid.get(),
    }
  }
}

/// Parse the header at the start of a block
/// 解析块起始处的页头
pub fn parse(buf: &[u8]) -> Result<PageHead> {
  let Ok((disk, _)) = Disk::ref_from_prefix(buf) else {
    return Err(Error::Short(buf.len()));
  };
  let head = PageHead::from(disk);
  if head.is_zero() {
    return Err(Error::Zero);
  }
  if !head.is_valid() {
    return Err(Error::Invalid);
  }
  Ok(head)
}

/// Classify a block for diffing; a short buffer is invalid
/// 为差异计算分类块；过短的缓冲区视为无效
#[inline]
pub fn check(buf: &[u8]) -> Verdict {
  match parse(buf) {
    Ok(head) => Verdict::Valid(head.lsn),
    Err(Error::Zero) => Verdict::Zero,
    Err(_) => Verdict::Invalid,
  }
}
