#![cfg_attr(docsrs, feature(doc_cfg))]

//! Page header parsing for PostgreSQL relation and WAL pages
//! PostgreSQL 关系页与 WAL 页的页头解析

mod consts;
mod error;
mod page;
pub mod wal;

pub use consts::{BLOCK_SIZE, HEAD_SIZE, PD_VALID_FLAG_BITS};
pub use error::{Error, Result};
pub use page::{PageHead, Verdict, check, parse};

/// Log sequence number
/// 日志序列号
pub type Lsn = u64;
