#![cfg_attr(docsrs, feature(doc_cfg))]

//! Storage and codec seams used by backup push / fetch
//! 备份推送与拉取使用的存储与编解码接口

pub mod codec;
mod dir;
mod error;
mod src;
mod store;

pub use codec::Codec;
pub use dir::DirStore;
pub use error::{Error, Result};
pub use src::{LocalSrc, ReadSrc, RemoteSrc};
pub use store::{Obj, Store};
