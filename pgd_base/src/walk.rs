//! Data directory walk
//! 数据目录遍历

use std::{
  collections::HashSet,
  fs, io,
  path::{Path, PathBuf},
};

use crate::{consts::EXCLUDE, fs::mtime};

/// Regular file found by [`walk`]
/// [`walk`] 找到的普通文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
  /// Path relative to the root, `/` separated
  /// 相对根目录的路径，以 `/` 分隔
  pub rel: String,
  pub path: PathBuf,
  pub size: u64,
  pub mtime: u64,
}

/// Names pruned from a walk, matched against each path component
/// 遍历时剪除的名称，与每个路径分量比较
#[derive(Debug, Clone)]
pub struct Exclude(HashSet<Box<str>>);

impl Default for Exclude {
  fn default() -> Self {
    Self(EXCLUDE.iter().map(|s| (*s).into()).collect())
  }
}

impl Exclude {
  #[inline]
  pub fn add(&mut self, name: impl Into<Box<str>>) {
    self.0.insert(name.into());
  }

  #[inline]
  pub fn hit(&self, name: &str) -> bool {
    self.0.contains(name)
  }
}

/// All regular files under `root`, sorted by relative path.
/// Symlinked directories (pg_tblspc) are followed.
/// `root` 下所有普通文件，按相对路径排序；跟随符号链接目录
pub fn walk(root: &Path, exclude: &Exclude) -> io::Result<Vec<Entry>> {
  let mut li = Vec::new();
  let mut stack = vec![(root.to_path_buf(), String::new())];

  while let Some((dir, prefix)) = stack.pop() {
    for item in fs::read_dir(&dir)? {
      let item = item?;
      let name = item.file_name();
      let Some(name) = name.to_str() else {
        log::warn!("skip non utf8 name in {}", dir.display());
        continue;
      };
      if exclude.hit(name) {
        continue;
      }
      let path = item.path();
      let rel = if prefix.is_empty() {
        name.to_owned()
      } else {
        format!("{prefix}/{name}")
      };
      let meta = fs::metadata(&path)?;
      if meta.is_dir() {
        stack.push((path, rel));
      } else if meta.is_file() {
        li.push(Entry {
          rel,
          path,
          size: meta.len(),
          mtime: mtime(&meta),
        });
      }
    }
  }

  li.sort_unstable_by(|a, b| a.rel.cmp(&b.rel));
  Ok(li)
}
