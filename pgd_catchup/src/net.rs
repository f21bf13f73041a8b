//! TCP entry points
//! TCP 入口

use std::path::Path;

use compio::net::{TcpListener, TcpStream, ToSocketAddrsAsync};
use pgd_base::Db;

use crate::{
  conf::Conf,
  error::Result,
  recv::{RecvStat, receive},
  send::{SendStat, send},
};

/// Connect to a listening receiver and send `dir`
/// 连接正在监听的接收方并发送 `dir`
pub async fn send_to<A: ToSocketAddrsAsync, D: Db>(
  addr: A,
  db: &mut D,
  dir: &Path,
  conf: &[Conf],
) -> Result<SendStat> {
  let mut stream = TcpStream::connect(addr).await?;
  send(&mut stream, db, dir, conf).await
}

/// Accept one connection on `listener` and receive into `dir`
/// 在 `listener` 上接受一个连接并接收到 `dir`
pub async fn serve(listener: &TcpListener, dir: &Path, conf: &[Conf]) -> Result<RecvStat> {
  let (mut stream, peer) = listener.accept().await?;
  log::info!("catchup connection from {peer}");
  receive(&mut stream, dir, conf).await
}

/// Bind `addr`, accept one connection and receive into `dir`
/// 绑定 `addr`，接受一个连接并接收到 `dir`
pub async fn listen<A: ToSocketAddrsAsync>(addr: A, dir: &Path, conf: &[Conf]) -> Result<RecvStat> {
  let listener = TcpListener::bind(addr).await?;
  serve(&listener, dir, conf).await
}
