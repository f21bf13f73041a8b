//! WAL archive: one object per segment under `wal_005/`
//! WAL 归档：`wal_005/` 下每段一个对象

use std::path::Path;

use pgd_base::fs::{is_safe_rel, read_all, read_file, write_file};
use pgd_page::wal;
use pgd_store::{Codec, Store};

use crate::{
  conf::{Cfg, Conf},
  error::{Error, Result},
  layout::wal_key,
};

/// Segment left unfinished by a timeline switch
/// 因时间线切换而未写完的段
pub const PARTIAL_SUFFIX: &str = ".partial";

/// Hex digits in a segment file name
/// 段文件名的十六进制位数
const SEGMENT_LEN: usize = 24;

/// Stored codecs probed by [`wal_fetch`], in order
/// [`wal_fetch`] 依次探测的存储编解码
const FETCH_ORDER: [Codec; 3] = [Codec::Lz4, Codec::Zstd, Codec::None];

/// WAL segment name, `.partial` included. History and backup history files
/// are not segments.
/// 是否为 WAL 段名（含 `.partial`）；时间线历史与备份历史文件不是段
pub fn is_segment(name: &str) -> bool {
  let base = name.strip_suffix(PARTIAL_SUFFIX).unwrap_or(name);
  base.len() == SEGMENT_LEN && base.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Validate the first page header of segment `name`.
/// A zeroed first page is only accepted for a `.partial` segment.
/// 校验段首页头；全零首页仅允许出现在 `.partial` 段
pub fn check_segment(name: &str, data: &[u8]) -> Result<()> {
  let mut buf = data;
  match wal::read(&mut buf) {
    Ok(_) => Ok(()),
    Err(pgd_page::Error::Zero) if name.ends_with(PARTIAL_SUFFIX) => Ok(()),
    Err(source) => Err(Error::BadWal {
      name: name.to_owned(),
      source,
    }),
  }
}

#[inline]
fn plain_name(name: &str) -> Result<&str> {
  if is_safe_rel(name) && !name.contains('/') {
    Ok(name)
  } else {
    Err(Error::BadPath(name.to_owned()))
  }
}

/// Archive the WAL file at `path`, compressed per [`Conf::Codec`].
/// Returns the stored key.
/// 归档 `path` 处的 WAL 文件，按 [`Conf::Codec`] 压缩；返回存储键
pub async fn wal_push<S: Store>(store: &S, path: &Path, conf: &[Conf]) -> Result<String> {
  let cfg = Cfg::new(conf);
  let name = path
    .file_name()
    .and_then(|n| n.to_str())
    .ok_or_else(|| Error::BadPath(path.display().to_string()))?;
  let name = plain_name(name)?;

  let data = read_file(path).await?;
  if is_segment(name) {
    check_segment(name, &data)?;
  }
  let key = wal_key(name, cfg.codec);
  let len = data.len();
  store.put(&key, cfg.codec.enc(data)?).await?;
  log::info!("wal push {name}: {len} bytes as {key}");
  Ok(key)
}

/// Restore archived WAL file `name` into `dst`, whichever codec stored it
/// 将归档的 WAL 文件 `name` 恢复到 `dst`，不论其存储编解码
pub async fn wal_fetch<S: Store>(store: &S, name: &str, dst: &Path) -> Result<()> {
  let name = plain_name(name)?;
  for codec in FETCH_ORDER {
    let key = wal_key(name, codec);
    if !store.exists(&key).await? {
      continue;
    }
    let mut r = store.get(&key).await?;
    let data = codec.dec(read_all(&mut r).await?)?;
    write_file(dst, data).await?;
    log::info!("wal fetch {key} into {}", dst.display());
    return Ok(());
  }
  Err(Error::WalNotExist(name.to_owned()))
}
