#![cfg_attr(docsrs, feature(doc_cfg))]

//! pgd_catchup - Bring a standby up to date from a running primary
//! 让备库从运行中的主库追上进度
//!
//! The receiver reports its checkpoint and file manifest; the sender answers
//! with whole files or page increments for everything newer, then the backup
//! label, tablespace map and control file.
//! 接收方报告检查点与文件清单；发送方回以较新文件的整文件或页增量，
//! 最后是备份标签、表空间映射与控制文件

mod conf;
mod error;
mod net;
pub mod proto;
mod recv;
mod send;

pub use conf::Conf;
pub use error::{Error, Result};
pub use net::{listen, send_to, serve};
pub use proto::{Cmd, ControlBlock, Hello, MAX_FRAME};
pub use recv::{RecvStat, hello, receive};
pub use send::{SendStat, send};
