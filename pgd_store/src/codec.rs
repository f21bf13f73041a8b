//! Compression selected by key extension
//! 按键扩展名选择的压缩

use std::io::Read;

use crate::error::{Error, Result};

const ZSTD_LEVEL: i32 = 3;

/// 压缩算法 Compression codec
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Codec {
  None,
  #[default]
  Lz4,
  Zstd,
}

impl Codec {
  /// Key suffix, empty for [`Codec::None`]
  /// 键后缀
  #[inline]
  pub fn ext(self) -> &'static str {
    match self {
      Self::None => "",
      Self::Lz4 => ".lz4",
      Self::Zstd => ".zst",
    }
  }

  /// Split a stored key into codec and logical key
  /// 将存储键拆分为编解码与逻辑键
  pub fn from_key(key: &str) -> (Self, &str) {
    for c in [Self::Lz4, Self::Zstd] {
      if let Some(base) = key.strip_suffix(c.ext()) {
        return (c, base);
      }
    }
    (Self::None, key)
  }

  /// Parse a configured name
  /// 解析配置名称
  pub fn from_name(name: &str) -> Option<Self> {
    match name.to_ascii_lowercase().as_str() {
      "none" | "" => Some(Self::None),
      "lz4" => Some(Self::Lz4),
      "zstd" | "zst" => Some(Self::Zstd),
      _ => None,
    }
  }

  /// 压缩 Compress
  pub fn enc(self, src: Vec<u8>) -> Result<Vec<u8>> {
    Ok(match self {
      Self::None => src,
      Self::Lz4 => lz4_flex::compress_prepend_size(&src),
      Self::Zstd => zstd::encode_all(&src[..], ZSTD_LEVEL).map_err(Error::Zstd)?,
    })
  }

  /// 解压 Decompress
  pub fn dec(self, src: Vec<u8>) -> Result<Vec<u8>> {
    Ok(match self {
      Self::None => src,
      Self::Lz4 => lz4_flex::decompress_size_prepended(&src)?,
      Self::Zstd => {
        let mut out = Vec::new();
        zstd::Decoder::new(&src[..])
          .and_then(|mut d| d.read_to_end(&mut out))
          .map_err(Error::Zstd)?;
        out
      }
    })
  }
}
