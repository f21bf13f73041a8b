//! Object store seam
//! 对象存储接口

use std::{future::Future, path::Path};

use compio::io::AsyncRead;
use pgd_base::fs::read_file;

use crate::error::{Error, Result};

/// Listed object
/// 列举出的对象
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Obj {
  pub key: String,
  /// Modification time, nanoseconds since epoch
  /// 修改时间（纳秒）
  pub modified: u64,
}

/// Object store: list / head / get / put by `/` separated keys.
/// Retries belong to the implementation.
/// 对象存储：以 `/` 分隔的键进行列举、检查、读取、写入；重试由实现负责
pub trait Store {
  type Reader: AsyncRead;

  /// Objects whose key starts with `prefix`. With `deep == false` only keys
  /// without a further `/` after the prefix's directory are returned.
  /// 键以 `prefix` 开头的对象；`deep == false` 时不进入子目录
  fn list(&self, prefix: &str, deep: bool) -> impl Future<Output = Result<Vec<Obj>>>;

  fn exists(&self, key: &str) -> impl Future<Output = Result<bool>>;

  /// Missing key is [`crate::Error::NotFound`]
  /// 不存在的键返回 [`crate::Error::NotFound`]
  fn get(&self, key: &str) -> impl Future<Output = Result<Self::Reader>>;

  fn put(&self, key: &str, data: Vec<u8>) -> impl Future<Output = Result<()>>;

  /// Store the content of a local file as is; returns bytes stored.
  /// A missing `src` is [`crate::Error::NotFound`].
  /// 原样存储本地文件内容，返回字节数；`src` 不存在时返回 [`crate::Error::NotFound`]
  fn put_file(&self, key: &str, src: &Path) -> impl Future<Output = Result<u64>> {
    async move {
      let data = match read_file(src).await {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
          return Err(Error::NotFound(src.display().to_string()));
        }
        Err(e) => return Err(e.into()),
      };
      let n = data.len() as u64;
      self.put(key, data).await?;
      Ok(n)
    }
  }
}
