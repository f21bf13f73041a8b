#![cfg_attr(docsrs, feature(doc_cfg))]

//! pgd_chain - Delta backup chains over an object store
//! 基于对象存储的增量备份链
//!
//! A delta backup stores only pages changed since its parent and names the
//! parent in its sentinel. Restoring follows those names back to a full backup
//! and replays the chain oldest first.
//! 增量备份只存储自父备份以来变化的页，并在哨兵中记录父备份；
//! 恢复时沿父备份回溯到全量备份，再从旧到新重放

mod conf;
mod error;
mod fetch;
pub mod layout;
mod list;
mod plan;
mod push;
mod sentinel;
mod wal;

pub use conf::{Conf, ENV_COMPRESSION, ENV_MAX_STEPS, ENV_ORIGIN, Origin, conf_from_env};
pub use error::{Error, Result};
pub use fetch::{Kind, MAX_HOPS, chain, default_stage, extract, fetch};
pub use layout::LATEST;
pub use list::{BackupInfo, latest, list};
pub use plan::{Base, Plan, decide};
pub use push::{PushStat, Pushed, push};
pub use sentinel::{FileDesc, Sentinel, load, save};
pub use wal::{PARTIAL_SUFFIX, check_segment, is_segment, wal_fetch, wal_push};
