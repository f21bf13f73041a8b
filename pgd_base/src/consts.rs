//! Constants 常量

/// WAL segment size
/// WAL 段大小
pub const SEG_SIZE: u64 = 16 << 20;

/// Control file, always transferred last
/// 控制文件，总是最后传输
pub const PG_CONTROL: &str = "global/pg_control";

/// Size of pg_control on disk
/// pg_control 磁盘大小
pub const PG_CONTROL_SIZE: usize = 8192;

pub const BACKUP_LABEL: &str = "backup_label";
pub const TABLESPACE_MAP: &str = "tablespace_map";

/// Stream copy chunk (1MB)
/// 流复制块大小
pub const BUF_SIZE: usize = 1 << 20;

/// Names never copied out of a data directory
/// 数据目录中从不复制的名称
pub const EXCLUDE: &[&str] = &[
  "pg_wal",
  "pg_xlog",
  "pg_log",
  "pg_replslot",
  "pg_dynshmem",
  "pg_notify",
  "pg_serial",
  "pg_snapshots",
  "pg_stat_tmp",
  "pg_subtrans",
  "pgsql_tmp",
  "postmaster.pid",
  "postmaster.opts",
  "recovery.conf",
  BACKUP_LABEL,
  TABLESPACE_MAP,
  "backup_label.old",
];
