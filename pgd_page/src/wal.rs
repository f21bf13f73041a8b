//! WAL page header (XLogPageHeaderData / XLogLongPageHeaderData)
//! WAL 页头（短 / 长两种）
//!
//! Short: magic(2) + info(2) + timeline(4) + pageaddr(8) + rem_len(4)
//! Long:  short + sysid(8) + seg_size(4) + xlog_blcksz(4)

use bytes::Buf;

use crate::{
  BLOCK_SIZE, Lsn,
  error::{Error, Result},
};

/// Continuation record flag
/// 续接记录标志
pub const XLP_FIRST_IS_CONTRECORD: u16 = 0x0001;
/// Long header flag
/// 长页头标志
pub const XLP_LONG_HEADER: u16 = 0x0002;
pub const XLP_BKP_REMOVABLE: u16 = 0x0004;
pub const XLP_FIRST_IS_OVERWRITE_CONTRECORD: u16 = 0x0008;
pub const XLP_ALL_FLAGS: u16 = 0x000F;

/// Bytes consumed by the short header fields
/// 短页头字段占用的字节数
pub const SHORT_FIELDS: usize = 20;
/// Bytes consumed by the long header extension
/// 长页头扩展字段占用的字节数
pub const LONG_FIELDS: usize = 16;

/// XLOG_PAGE_MAGIC of every supported server version falls in this range
/// 所有支持的服务端版本的 XLOG_PAGE_MAGIC 都在此范围内
const MAGIC_MIN: u16 = 0xD000;
const MAGIC_MAX: u16 = 0xD1FF;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WalHead {
  pub magic: u16,
  pub info: u16,
  pub timeline: u32,
  pub pageaddr: Lsn,
  pub rem_len: u32,
  pub long: Option<LongHead>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LongHead {
  pub sysid: u64,
  pub seg_size: u32,
  pub blcksz: u32,
}

impl WalHead {
  #[inline]
  pub fn is_long(&self) -> bool {
    self.info & XLP_LONG_HEADER != 0
  }

  #[inline]
  fn is_zero(&self) -> bool {
    self.magic == 0
      && self.info == 0
      && self.timeline == 0
      && self.pageaddr == 0
      && self.rem_len == 0
  }

  #[inline]
  pub fn is_valid(&self) -> bool {
    self.info & !XLP_ALL_FLAGS == 0 && (MAGIC_MIN..=MAGIC_MAX).contains(&self.magic)
  }
}

impl LongHead {
  #[inline]
  pub fn is_valid(&self) -> bool {
    self.seg_size.is_power_of_two() && self.blcksz as usize == BLOCK_SIZE
  }
}

/// Read a WAL page header, consuming the long extension when present
/// so the next read starts right after the header fields.
/// 读取 WAL 页头；存在长页头时一并消费，保证后续读取对齐
pub fn read(buf: &mut impl Buf) -> Result<WalHead> {
  if buf.remaining() < SHORT_FIELDS {
    return Err(Error::Short(buf.remaining()));
  }
  let mut head = WalHead {
    magic: buf.get_u16_le(),
    info: buf.get_u16_le(),
    timeline: buf.get_u32_le(),
    pageaddr: buf.get_u64_le(),
    rem_len: buf.get_u32_le(),
    long: None,
  };
  if head.is_zero() {
    return Err(Error::Zero);
  }
  if !head.is_valid() {
    return Err(Error::Invalid);
  }

  if head.is_long() {
    if buf.remaining() < LONG_FIELDS {
      return Err(Error::Short(SHORT_FIELDS + buf.remaining()));
    }
    let long = LongHead {
      sysid: buf.get_u64_le(),
      seg_size: buf.get_u32_le(),
      blcksz: buf.get_u32_le(),
    };
    if !long.is_valid() {
      return Err(Error::Invalid);
    }
    head.long = Some(long);
  }
  Ok(head)
}
