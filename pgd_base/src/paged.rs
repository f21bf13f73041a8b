//! Classification of page-structured relation files
//! 页结构关系文件的分类

const PAGED_DIRS: &[&str] = &["base", "global", "pg_tblspc"];

/// `true` for relation segment files (`16384`, `16384.1`) under a tablespace
/// directory. Forks (`_fsm`, `_vm`) and other names are copied whole.
/// 表空间目录下的关系段文件返回 `true`；fork 与其他文件整体复制
pub fn is_paged(rel: &str) -> bool {
  let Some((first, _)) = rel.split_once('/') else {
    return false;
  };
  if !PAGED_DIRS.contains(&first) {
    return false;
  }
  let file = rel.rsplit_once('/').map_or(rel, |(_, f)| f);
  let (rel_id, seg) = match file.split_once('.') {
    Some((a, b)) => (a, Some(b)),
    None => (file, None),
  };
  let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
  digits(rel_id) && seg.is_none_or(digits)
}
