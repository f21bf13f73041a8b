//! Object store backed by a local directory
//! 基于本地目录的对象存储

use std::{
  fs,
  future::Future,
  io,
  io::Cursor,
  path::{Path, PathBuf},
};

use compio::io::AsyncWriteAtExt;
use compio_fs::File;
use pgd_base::{
  consts::BUF_SIZE,
  fs::{mkdir_parent, mtime, open_read, send_file},
};

use crate::{
  error::{Error, Result},
  store::{Obj, Store},
};

/// Keys map to files under `root`
/// 键映射为 `root` 下的文件
#[derive(Debug, Clone)]
pub struct DirStore {
  root: PathBuf,
}

impl DirStore {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  #[inline]
  pub fn root(&self) -> &Path {
    &self.root
  }

  #[inline]
  fn path(&self, key: &str) -> PathBuf {
    self.root.join(key)
  }

  /// Create `<key>.tmp`, fill it with `fill`, sync, then rename over `key`.
  /// The temp file is removed on failure.
  /// 创建临时文件并由 `fill` 写入，sync 后重命名；失败时删除临时文件
  async fn atomic<F, Fut, T>(&self, key: &str, fill: F) -> Result<T>
  where
    F: FnOnce(File) -> Fut,
    Fut: Future<Output = io::Result<(File, T)>>,
  {
    let path = self.path(key);
    mkdir_parent(&path)?;
    let tmp = PathBuf::from(format!("{}{TMP_EXT}", path.display()));

    defer_lite::defer! {
      match fs::remove_file(&tmp) {
        Ok(()) => log::warn!("removed unfinished {}", tmp.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => log::warn!("remove {}: {e}", tmp.display()),
      }
    }

    let file = File::create(&tmp).await?;
    let (file, r) = fill(file).await?;
    file.sync_all().await?;
    drop(file);

    compio::fs::rename(&tmp, &path).await?;
    Ok(r)
  }

  fn scan(
    &self,
    dir: &Path,
    key_dir: &str,
    name_prefix: &str,
    deep: bool,
    li: &mut Vec<Obj>,
  ) -> io::Result<()> {
    let it = match fs::read_dir(dir) {
      Ok(it) => it,
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
      Err(e) => return Err(e),
    };
    for item in it {
      let item = item?;
      let name = item.file_name();
      let Some(name) = name.to_str() else {
        continue;
      };
      if !name.starts_with(name_prefix) || name.ends_with(TMP_EXT) {
        continue;
      }
      let key = format!("{key_dir}{name}");
      let meta = item.metadata()?;
      if meta.is_dir() {
        if deep {
          self.scan(&item.path(), &format!("{key}/"), "", true, li)?;
        }
      } else {
        li.push(Obj {
          key,
          modified: mtime(&meta),
        });
      }
    }
    Ok(())
  }
}

const TMP_EXT: &str = ".tmp";

impl Store for DirStore {
  type Reader = Cursor<File>;

  async fn list(&self, prefix: &str, deep: bool) -> Result<Vec<Obj>> {
    let (key_dir, name_prefix) = match prefix.rfind('/') {
      Some(i) => prefix.split_at(i + 1),
      None => ("", prefix),
    };
    let mut li = Vec::new();
    self.scan(&self.path(key_dir), key_dir, name_prefix, deep, &mut li)?;
    li.sort_unstable_by(|a, b| a.key.cmp(&b.key));
    Ok(li)
  }

  async fn exists(&self, key: &str) -> Result<bool> {
    Ok(self.path(key).is_file())
  }

  async fn get(&self, key: &str) -> Result<Self::Reader> {
    match open_read(self.path(key)).await {
      Ok(file) => Ok(Cursor::new(file)),
      Err(e) if e.kind() == io::ErrorKind::NotFound => Err(Error::NotFound(key.to_owned())),
      Err(e) => Err(e.into()),
    }
  }

  /// Atomic write: write to temp file, sync, then rename
  /// 原子写入：写入临时文件，sync，然后重命名
  async fn put(&self, key: &str, data: Vec<u8>) -> Result<()> {
    self
      .atomic(key, |mut file| async move {
        if !data.is_empty() {
          file.write_all_at(data, 0).await.0?;
        }
        Ok::<_, io::Error>((file, ()))
      })
      .await
  }

  /// Copies in chunks, the source is never held whole in memory
  /// 分块复制，源文件不会整体读入内存
  async fn put_file(&self, key: &str, src: &Path) -> Result<u64> {
    let from = match open_read(src).await {
      Ok(f) => f,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        return Err(Error::NotFound(src.display().to_string()));
      }
      Err(e) => return Err(e.into()),
    };
    let size = from.metadata().await?.len();
    self
      .atomic(key, |file| async move {
        let mut w = Cursor::new(file);
        let n = send_file(&from, size, &mut w, BUF_SIZE).await?;
        Ok::<_, io::Error>((w.into_inner(), n))
      })
      .await
  }
}
