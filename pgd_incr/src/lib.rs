#![cfg_attr(docsrs, feature(doc_cfg))]

//! Page-level increments: changed blocks of a relation file since a checkpoint LSN
//! 页级增量：自检查点 LSN 以来关系文件中变化的块
//!
//! Format: file_size(u64) + count(u32) + block_no(u32) * count + block(BLOCK_SIZE) * count
//! 格式：文件大小(u64) + 数量(u32) + 块号(u32) * 数量 + 块数据(BLOCK_SIZE) * 数量
//!
//! All integers little endian. Block numbers strictly ascending.
//! 所有整数均为小端。块号严格递增。

mod apply;
mod error;
mod head;
mod scan;

pub use apply::{apply, apply_bytes};
pub use error::{Error, Result};
pub use head::{FIXED_SIZE, IncrHead};
pub use scan::{build, scan};
