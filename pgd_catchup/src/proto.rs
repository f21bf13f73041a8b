//! Wire messages: u32 little endian length + bitcode body
//! 线路消息：u32 小端长度 + bitcode 消息体
//!
//! ```text
//! receiver -> sender: Hello
//! sender -> receiver: (Full | Incr) + raw bytes, ..., Inline * 3, Done
//! ```

use bitcode::{Decode, Encode};
use compio::{
  BufResult,
  buf::{IntoInner, IoBuf},
  io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt},
};
use pgd_base::{ControlData, Lsn};

use crate::error::{Error, Result};

/// Largest frame accepted (64MB)
/// 接受的最大帧
pub const MAX_FRAME: usize = 64 << 20;

/// Receiver identity and position
/// 接收方标识与位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub struct ControlBlock {
  pub system_id: u64,
  pub timeline: u32,
  pub checkpoint: Lsn,
}

impl From<&ControlData> for ControlBlock {
  fn from(c: &ControlData) -> Self {
    Self {
      system_id: c.system_id,
      timeline: c.timeline,
      checkpoint: c.checkpoint,
    }
  }
}

/// First message, receiver to sender
/// 首条消息，接收方发往发送方
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct Hello {
  pub control: ControlBlock,
  /// (path, mtime) of every file the receiver holds
  /// 接收方持有的每个文件的 (路径, 修改时间)
  pub manifest: Vec<(String, u64)>,
}

/// Sender command
/// 发送方命令
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub enum Cmd {
  /// `size` raw file bytes follow
  /// 随后是 `size` 字节原始文件内容
  Full { path: String, size: u64, mtime: u64 },
  /// `size` increment bytes follow
  /// 随后是 `size` 字节增量
  Incr { path: String, size: u64, mtime: u64 },
  Inline { path: String, data: Vec<u8> },
  Done,
}

pub async fn write_frame<W: AsyncWrite, T: Encode>(w: &mut W, msg: &T) -> Result<()> {
  let body = bitcode::encode(msg);
  if body.len() > MAX_FRAME {
    return Err(Error::FrameTooLarge(body.len()));
  }
  let mut buf = Vec::with_capacity(4 + body.len());
  buf.extend_from_slice(&(body.len() as u32).to_le_bytes());
  buf.extend_from_slice(&body);
  w.write_all(buf).await.0?;
  Ok(())
}

async fn read_exact<R: AsyncRead>(r: &mut R, n: usize) -> Result<Vec<u8>> {
  let BufResult(res, slice) = r.read_exact(Vec::with_capacity(n).slice(0..n)).await;
  res?;
  Ok(slice.into_inner())
}

pub async fn read_frame<R: AsyncRead, T: for<'a> Decode<'a>>(r: &mut R) -> Result<T> {
  let head = read_exact(r, 4).await?;
  let len = u32::from_le_bytes([head[0], head[1], head[2], head[3]]) as usize;
  if len > MAX_FRAME {
    return Err(Error::FrameTooLarge(len));
  }
  let body = read_exact(r, len).await?;
  Ok(bitcode::decode(&body)?)
}
