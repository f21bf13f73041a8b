//! Storage key layout
//! 存储键布局
//!
//! ```text
//! basebackups_005/<name>_backup_stop_sentinel.json
//! basebackups_005/<name>/full/<rel>[.ext]
//! basebackups_005/<name>/incr/<rel>[.ext]
//! basebackups_005/<name>/pg_control[.ext]
//! wal_005/<segment>[.ext]
//! ```

use pgd_store::Codec;

pub const BASE_PREFIX: &str = "basebackups_005/";
pub const WAL_PREFIX: &str = "wal_005/";
pub const SENTINEL_SUFFIX: &str = "_backup_stop_sentinel.json";

/// Resolves to the newest complete backup
/// 解析为最新的完整备份
pub const LATEST: &str = "LATEST";

pub const FULL_DIR: &str = "full/";
pub const INCR_DIR: &str = "incr/";
pub const CONTROL: &str = "pg_control";

#[inline]
pub fn sentinel_key(name: &str) -> String {
  format!("{BASE_PREFIX}{name}{SENTINEL_SUFFIX}")
}

/// Prefix of every member of a backup
/// 备份所有成员的前缀
#[inline]
pub fn member_dir(name: &str) -> String {
  format!("{BASE_PREFIX}{name}/")
}

#[inline]
pub fn full_key(name: &str, rel: &str, codec: Codec) -> String {
  format!("{BASE_PREFIX}{name}/{FULL_DIR}{rel}{}", codec.ext())
}

#[inline]
pub fn incr_key(name: &str, rel: &str, codec: Codec) -> String {
  format!("{BASE_PREFIX}{name}/{INCR_DIR}{rel}{}", codec.ext())
}

#[inline]
pub fn control_key(name: &str, codec: Codec) -> String {
  format!("{BASE_PREFIX}{name}/{CONTROL}{}", codec.ext())
}

#[inline]
pub fn wal_key(name: &str, codec: Codec) -> String {
  format!("{WAL_PREFIX}{name}{}", codec.ext())
}
