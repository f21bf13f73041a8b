//! WAL segment and backup names
//! WAL 段名与备份名

use crate::{Lsn, consts::SEG_SIZE};

const SEGS_PER_ID: u64 = 0x1_0000_0000 / SEG_SIZE;

/// 24 hex digit segment name containing `lsn`
/// 包含 `lsn` 的 24 位十六进制段名
pub fn wal_name(timeline: u32, lsn: Lsn) -> String {
  let seg = lsn / SEG_SIZE;
  format!(
    "{timeline:08X}{:08X}{:08X}",
    seg / SEGS_PER_ID,
    seg % SEGS_PER_ID
  )
}

/// Backup name, sorts by start position
/// 备份名，按起始位置排序
#[inline]
pub fn backup_name(timeline: u32, lsn: Lsn) -> String {
  format!("base_{}", wal_name(timeline, lsn))
}
