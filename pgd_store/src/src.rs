//! Readable backup member: stored object or local file
//! 可读取的备份成员：存储对象或本地文件

use std::{future::Future, io::Cursor, path::PathBuf};

use compio::io::AsyncRead;
use compio_fs::File;
use pgd_base::fs::{open_read, read_all};

use crate::{codec::Codec, error::Result, store::Store};

/// Open for read, identify format, identify logical path
/// 打开读取、识别格式、识别逻辑路径
pub trait ReadSrc {
  type Reader: AsyncRead;

  /// Logical path, codec extension removed
  /// 逻辑路径（去掉编解码扩展名）
  fn path(&self) -> &str;

  fn codec(&self) -> Codec;

  /// Raw, still encoded stream
  /// 原始（仍编码的）流
  fn open(&self) -> impl Future<Output = Result<Self::Reader>>;

  /// Read everything and decode
  /// 读取全部并解码
  fn read(&self) -> impl Future<Output = Result<Vec<u8>>> {
    async move {
      let mut r = self.open().await?;
      let raw = read_all(&mut r).await?;
      self.codec().dec(raw)
    }
  }
}

/// Object in a [`Store`]
/// [`Store`] 中的对象
pub struct RemoteSrc<'a, S> {
  store: &'a S,
  key: String,
  path: String,
  codec: Codec,
}

impl<'a, S: Store> RemoteSrc<'a, S> {
  /// `path` is the key relative to `strip`, codec taken from the extension
  /// `path` 为相对 `strip` 的键，编解码取自扩展名
  pub fn new(store: &'a S, key: String, strip: &str) -> Self {
    let (codec, base) = Codec::from_key(&key);
    let path = base.strip_prefix(strip).unwrap_or(base).to_owned();
    Self {
      store,
      key,
      path,
      codec,
    }
  }

  #[inline]
  pub fn key(&self) -> &str {
    &self.key
  }
}

impl<S: Store> ReadSrc for RemoteSrc<'_, S> {
  type Reader = S::Reader;

  #[inline]
  fn path(&self) -> &str {
    &self.path
  }

  #[inline]
  fn codec(&self) -> Codec {
    self.codec
  }

  fn open(&self) -> impl Future<Output = Result<Self::Reader>> {
    self.store.get(&self.key)
  }
}

/// Member already on local disk
/// 已在本地磁盘上的成员
pub struct LocalSrc {
  file: PathBuf,
  path: String,
  codec: Codec,
}

impl LocalSrc {
  /// `path` is the logical path; codec from the file name extension
  /// `path` 为逻辑路径；编解码取自文件扩展名
  pub fn new(file: impl Into<PathBuf>, path: impl Into<String>) -> Self {
    let file = file.into();
    let codec = file
      .file_name()
      .and_then(|n| n.to_str())
      .map_or(Codec::None, |n| Codec::from_key(n).0);
    Self {
      file,
      path: path.into(),
      codec,
    }
  }
}

impl ReadSrc for LocalSrc {
  type Reader = Cursor<File>;

  #[inline]
  fn path(&self) -> &str {
    &self.path
  }

  #[inline]
  fn codec(&self) -> Codec {
    self.codec
  }

  async fn open(&self) -> Result<Self::Reader> {
    Ok(Cursor::new(open_read(&self.file).await?))
  }
}
