//! Delta backup configuration
//! 增量备份配置

use std::{env, path::PathBuf, str::FromStr};

use pgd_base::Exclude;
use pgd_store::Codec;

use crate::error::{Error, Result};

pub const ENV_MAX_STEPS: &str = "PGD_DELTA_MAX_STEPS";
pub const ENV_ORIGIN: &str = "PGD_DELTA_ORIGIN";
pub const ENV_COMPRESSION: &str = "PGD_COMPRESSION";

/// What a delta backup diffs against
/// 增量备份的比较对象
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Origin {
  /// Most recent backup
  /// 最近一次备份
  #[default]
  Latest,
  /// Full backup at the root of the latest chain
  /// 最新链根部的全量备份
  LatestFull,
}

impl FromStr for Origin {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "LATEST" => Ok(Self::Latest),
      "LATEST_FULL" => Ok(Self::LatestFull),
      _ => Err(Error::Conf(format!("unknown {ENV_ORIGIN}: {s}"))),
    }
  }
}

/// Configuration, later entries win
/// 配置，后出现的覆盖先出现的
#[derive(Clone, Debug)]
pub enum Conf {
  /// Max deltas between full backups, 0 disables deltas
  /// 两次全量之间的最大增量数，0 表示禁用增量
  MaxSteps(usize),
  Origin(Origin),
  Codec(Codec),
  /// Staging directory for one restore, must be on the target's filesystem
  /// 单次恢复的暂存目录，须与目标位于同一文件系统
  Stage(PathBuf),
  /// Extra name to prune from the data directory walk
  /// 遍历数据目录时额外剪除的名称
  Exclude(String),
}

#[derive(Debug, Default)]
pub(crate) struct Cfg {
  pub max_steps: usize,
  pub origin: Origin,
  pub codec: Codec,
  pub stage: Option<PathBuf>,
  pub exclude: Exclude,
}

impl Cfg {
  pub fn new(conf: &[Conf]) -> Self {
    let mut cfg = Self::default();
    for c in conf {
      match c {
        Conf::MaxSteps(n) => cfg.max_steps = *n,
        Conf::Origin(o) => cfg.origin = *o,
        Conf::Codec(c) => cfg.codec = *c,
        Conf::Stage(p) => cfg.stage = Some(p.clone()),
        Conf::Exclude(name) => cfg.exclude.add(name.as_str()),
      }
    }
    cfg
  }
}

/// Read `PGD_DELTA_MAX_STEPS`, `PGD_DELTA_ORIGIN` and `PGD_COMPRESSION`
/// 读取环境变量配置
pub fn conf_from_env() -> Result<Vec<Conf>> {
  let mut li = Vec::new();
  if let Ok(steps) = env::var(ENV_MAX_STEPS) {
    let n = steps
      .trim()
      .parse()
      .map_err(|e| Error::Conf(format!("unable to parse {ENV_MAX_STEPS} {steps:?}: {e}")))?;
    li.push(Conf::MaxSteps(n));
  }
  if let Ok(origin) = env::var(ENV_ORIGIN) {
    li.push(Conf::Origin(origin.trim().parse()?));
  }
  if let Ok(name) = env::var(ENV_COMPRESSION) {
    let codec = Codec::from_name(name.trim())
      .ok_or_else(|| Error::Conf(format!("unknown {ENV_COMPRESSION}: {name}")))?;
    li.push(Conf::Codec(codec));
  }
  Ok(li)
}
