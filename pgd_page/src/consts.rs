//! Constants 常量

/// Relation block size
/// 关系文件块大小
pub const BLOCK_SIZE: usize = 8192;

/// Size of PageHeaderData
/// 页头大小
pub const HEAD_SIZE: usize = 24;

/// Allowed pd_flags bits (HAS_FREE_LINES | PAGE_FULL | ALL_VISIBLE)
/// 允许的 pd_flags 位
pub const PD_VALID_FLAG_BITS: u16 = 0x0007;
