//! Control file (pg_control) fields used for catchup handshake
//! 追赶握手用到的控制文件字段
//!
//! Disk format (ControlFileData prefix):
//! system_id(8) + version(4) + catalog_version(4) + state(4) + pad(4) + time(8)
//! + checkpoint(8) + redo(8) + timeline(4) + prev_timeline(4)

use std::path::Path;

use zerocopy::{
  FromBytes, Immutable, IntoBytes, KnownLayout,
  little_endian::{I64, U32, U64},
};

use crate::{
  Lsn,
  consts::PG_CONTROL_SIZE,
  error::{Error, Result},
  fs::read_file,
};

#[derive(FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
struct Disk {
  system_id: U64,
  version: U32,
  catalog_version: U32,
  state: U32,
  _pad: U32,
  time: I64,
  checkpoint: U64,
  redo: U64,
  timeline: U32,
  prev_timeline: U32,
}

/// Identity and position of a cluster
/// 集群的标识与位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlData {
  pub system_id: u64,
  pub version: u32,
  /// Last checkpoint location
  /// 最后检查点位置
  pub checkpoint: Lsn,
  pub redo: Lsn,
  /// checkPointCopy.ThisTimeLineID
  pub timeline: u32,
}

impl ControlData {
  pub fn parse(buf: &[u8]) -> Result<Self> {
    let Ok((d, _)) = Disk::ref_from_prefix(buf) else {
      return Err(Error::ControlShort(buf.len()));
    };
    Ok(Self {
      system_id: d.system_id.get(),
      version: d.version.get(),
      checkpoint: d.checkpoint.get(),
      redo: d.redo.get(),
      timeline: d.timeline.get(),
    })
  }

  /// Read from `<data dir>/global/pg_control`
  /// 从数据目录读取
  pub async fn read(path: impl AsRef<Path>) -> Result<Self> {
    let buf = read_file(path).await?;
    Self::parse(&buf)
  }

  /// Full-size control file image with these fields set, rest zero
  /// 设置了这些字段、其余为零的完整控制文件映像
  pub fn to_bytes(&self) -> Vec<u8> {
    let d = Disk {
      system_id: U64::new(self.system_id),
      version: U32::new(self.version),
      catalog_version: U32::new(0),
      state: U32::new(0),
      _pad: U32::new(0),
      time: I64::new(0),
      checkpoint: U64::new(self.checkpoint),
      redo: U64::new(self.redo),
      timeline: U32::new(self.timeline),
      prev_timeline: U32::new(self.timeline),
    };
    let mut buf = vec![0u8; PG_CONTROL_SIZE];
    let bytes = d.as_bytes();
    buf[..bytes.len()].copy_from_slice(bytes);
    buf
  }
}
