use pgd_base::{Exclude, consts::BUF_SIZE};

/// Catchup configuration, later entries win
/// 追赶配置，后出现的覆盖先出现的
#[derive(Clone, Debug)]
pub enum Conf {
  /// Extra name pruned from the directory walk
  /// 遍历目录时额外剪除的名称
  Exclude(String),
  /// Stream copy chunk
  /// 流复制块大小
  BufSize(usize),
}

#[derive(Debug)]
pub(crate) struct Cfg {
  pub exclude: Exclude,
  pub buf_size: usize,
}

impl Cfg {
  pub fn new(conf: &[Conf]) -> Self {
    let mut cfg = Self {
      exclude: Exclude::default(),
      buf_size: BUF_SIZE,
    };
    for c in conf {
      match c {
        Conf::Exclude(name) => cfg.exclude.add(name.as_str()),
        Conf::BufSize(n) => cfg.buf_size = (*n).max(1),
      }
    }
    cfg
  }
}
