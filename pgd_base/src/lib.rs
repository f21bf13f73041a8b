#![cfg_attr(docsrs, feature(doc_cfg))]

//! pgd_base - Shared types for page-level backup and catchup
//! 页级备份与追赶的共享类型

pub mod consts;
pub mod control;
pub mod db;
mod error;
pub mod fs;
pub mod name;
pub mod paged;
pub mod walk;

pub use control::ControlData;
pub use db::{BackupStart, BackupStop, Db};
pub use error::{Error, Result};
pub use paged::is_paged;
pub use pgd_page::{BLOCK_SIZE, Lsn};
pub use walk::{Entry, Exclude, walk};
