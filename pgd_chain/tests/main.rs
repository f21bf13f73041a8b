//! Delta chain push / fetch tests
//! 增量链推送与拉取测试

use std::{
  cell::Cell,
  fs,
  path::{Path, PathBuf},
  time::{Duration, UNIX_EPOCH},
};

use aok::{OK, Void};
use pgd_base::{
  BLOCK_SIZE, BackupStart, BackupStop, ControlData, Db, Exclude, Lsn,
  fs::{read_file, set_len, write_file},
  walk,
};
use pgd_chain::{
  Conf, ENV_COMPRESSION, ENV_MAX_STEPS, ENV_ORIGIN, Error, FileDesc, LATEST, Origin,
  PARTIAL_SUFFIX, Sentinel, chain, conf_from_env, decide, default_stage, fetch, latest, list, push,
  save, wal_fetch, wal_push,
};
use pgd_store::{Codec, DirStore, Obj, Store};

#[static_init::constructor(0)]
extern "C" fn _log_init() {
  log_init::init();
}

const STEP: Lsn = 0x100_0000;

/// Each start_backup advances one WAL segment
/// 每次 start_backup 前进一个 WAL 段
struct FakeDb {
  lsn: Lsn,
}

impl Db for FakeDb {
  async fn start_backup(&mut self, _label: &str) -> pgd_base::Result<BackupStart> {
    self.lsn += STEP;
    Ok(BackupStart {
      lsn: self.lsn,
      timeline: 1,
    })
  }

  async fn stop_backup(&mut self) -> pgd_base::Result<BackupStop> {
    Ok(BackupStop {
      label: format!("START WAL LOCATION: {:X}\n", self.lsn).into_bytes(),
      tablespace_map: Vec::new(),
    })
  }

  async fn timeline(&mut self) -> pgd_base::Result<u32> {
    Ok(1)
  }
}

/// Promoted while the backup ran
/// 备份期间被提升
struct Promoted(FakeDb);

impl Db for Promoted {
  async fn start_backup(&mut self, label: &str) -> pgd_base::Result<BackupStart> {
    self.0.start_backup(label).await
  }

  async fn stop_backup(&mut self) -> pgd_base::Result<BackupStop> {
    self.0.stop_backup().await
  }

  async fn timeline(&mut self) -> pgd_base::Result<u32> {
    Ok(2)
  }
}

/// Once armed, truncates `victim` to two blocks when PG_VERSION is stored,
/// i.e. after the walk and before the relation is read
/// 启用后在存储 PG_VERSION 时将 `victim` 截断为两块，即遍历之后、读取关系之前
struct ShrinkStore {
  inner: DirStore,
  victim: PathBuf,
  armed: Cell<bool>,
}

impl Store for ShrinkStore {
  type Reader = <DirStore as Store>::Reader;

  async fn list(&self, prefix: &str, deep: bool) -> pgd_store::Result<Vec<Obj>> {
    self.inner.list(prefix, deep).await
  }

  async fn exists(&self, key: &str) -> pgd_store::Result<bool> {
    self.inner.exists(key).await
  }

  async fn get(&self, key: &str) -> pgd_store::Result<Self::Reader> {
    self.inner.get(key).await
  }

  async fn put(&self, key: &str, data: Vec<u8>) -> pgd_store::Result<()> {
    if self.armed.get() && key.contains("/full/PG_VERSION") {
      self.armed.set(false);
      set_len(&self.victim, 2 * BLOCK_SIZE as u64)?;
    }
    self.inner.put(key, data).await
  }
}

fn page(lsn: Lsn, fill: u8) -> Vec<u8> {
  let mut buf = vec![fill; BLOCK_SIZE];
  buf[..24].fill(0);
  buf[0..4].copy_from_slice(&((lsn >> 32) as u32).to_le_bytes());
  buf[4..8].copy_from_slice(&(lsn as u32).to_le_bytes());
  buf[12..14].copy_from_slice(&24u16.to_le_bytes());
  buf[14..16].copy_from_slice(&(BLOCK_SIZE as u16).to_le_bytes());
  buf[16..18].copy_from_slice(&(BLOCK_SIZE as u16).to_le_bytes());
  buf[18..20].copy_from_slice(&(BLOCK_SIZE as u16 | 4).to_le_bytes());
  buf
}

fn pages(li: &[(Lsn, u8)]) -> Vec<u8> {
  li.iter().flat_map(|&(lsn, fill)| page(lsn, fill)).collect()
}

/// Write a file with an explicit mtime, so change detection never depends on clock resolution
/// 以显式 mtime 写文件，使变化检测不依赖时钟精度
async fn put(root: &Path, rel: &str, data: Vec<u8>, secs: u64) -> Void {
  let path = root.join(rel);
  write_file(&path, data).await?;
  fs::File::options()
    .write(true)
    .open(&path)?
    .set_modified(UNIX_EPOCH + Duration::from_secs(secs))?;
  OK
}

async fn init_pgdata(root: &Path) -> Void {
  let control = ControlData {
    system_id: 7,
    timeline: 1,
    ..ControlData::default()
  };
  put(root, "global/pg_control", control.to_bytes(), 1).await?;
  put(root, "PG_VERSION", b"16\n".to_vec(), 1).await?;
  put(root, "base/1/1259", pages(&[(0x10, 1), (0x10, 2), (0x10, 3), (0x10, 4)]), 1).await?;
  put(root, "base/1/2600", pages(&[(0x20, 5), (0x20, 6)]), 1).await?;
  put(root, "pg_wal/000000010000000000000001", vec![9; 64], 1).await?;
  OK
}

/// Relative path and content of every non-excluded file
/// 所有未排除文件的相对路径与内容
async fn tree(root: &Path) -> std::io::Result<Vec<(String, Vec<u8>)>> {
  let mut li = Vec::new();
  for e in walk(root, &Exclude::default())? {
    let data = read_file(&e.path).await?;
    li.push((e.rel, data));
  }
  Ok(li)
}

#[compio::test]
async fn test_chain_restore() -> Void {
  let dir = tempfile::tempdir()?;
  let pg = dir.path().join("pg");
  let target = dir.path().join("restore");
  let store = DirStore::new(dir.path().join("store"));
  let mut db = FakeDb { lsn: 0 };
  let conf = [Conf::MaxSteps(3)];
  init_pgdata(&pg).await?;

  let full = push(&store, &mut db, &pg, &conf).await?;
  assert!(!full.sentinel.is_incremental());
  assert_eq!(full.stat.full, 3);

  // Δ1: one page of 1259 changes
  let mut rel = pages(&[(0x10, 1), (0x10, 2), (0x10, 3), (0x10, 4)]);
  rel[2 * BLOCK_SIZE..3 * BLOCK_SIZE].copy_from_slice(&page(STEP + 0x10, 30));
  put(&pg, "base/1/1259", rel.clone(), 2).await?;
  let d1 = push(&store, &mut db, &pg, &conf).await?;
  assert_eq!(d1.sentinel.from.as_deref(), Some(full.name.as_str()));
  assert_eq!(d1.sentinel.full_name.as_deref(), Some(full.name.as_str()));
  assert_eq!(d1.sentinel.from_lsn, Some(STEP));
  assert_eq!(d1.sentinel.count, Some(1));
  assert_eq!((d1.stat.incr, d1.stat.skipped, d1.stat.full), (1, 2, 0));
  assert!(d1.sentinel.files["base/1/1259"].is_incremented);
  assert!(d1.sentinel.files["PG_VERSION"].is_skipped);

  // Δ2: 2600 grows, a new relation appears
  put(&pg, "base/1/2600", pages(&[(0x20, 5), (0x20, 6), (2 * STEP + 1, 7)]), 3).await?;
  put(&pg, "base/1/16384", pages(&[(2 * STEP + 2, 8)]), 3).await?;
  let d2 = push(&store, &mut db, &pg, &conf).await?;
  assert_eq!(d2.sentinel.from.as_deref(), Some(d1.name.as_str()));
  assert_eq!(d2.sentinel.count, Some(2));
  assert_eq!((d2.stat.incr, d2.stat.full, d2.stat.skipped), (1, 1, 2));

  // Δ3: 1259 shrinks, 16384 dropped, PG_VERSION rewritten
  let mut rel = rel[..2 * BLOCK_SIZE].to_vec();
  rel[..BLOCK_SIZE].copy_from_slice(&page(3 * STEP + 5, 40));
  put(&pg, "base/1/1259", rel, 4).await?;
  fs::remove_file(pg.join("base/1/16384"))?;
  put(&pg, "PG_VERSION", b"17\n".to_vec(), 4).await?;
  let d3 = push(&store, &mut db, &pg, &conf).await?;
  assert_eq!(d3.sentinel.count, Some(3));
  assert_eq!(d3.sentinel.full_name.as_deref(), Some(full.name.as_str()));
  assert!(!d3.sentinel.files.contains_key("base/1/16384"));

  let li = chain(&store, LATEST).await?;
  let names: Vec<_> = li.iter().map(|(n, _)| n.clone()).collect();
  assert_eq!(names, [full.name, d1.name, d2.name, d3.name.clone()]);
  assert_eq!(latest(&store).await?, d3.name);
  assert_eq!(list(&store).await?.len(), 4);

  let lsn = fetch(&store, LATEST, &target, &conf).await?;
  assert_eq!(lsn, 4 * STEP);
  assert_eq!(tree(&target).await?, tree(&pg).await?);
  assert!(target.join("backup_label").is_file());
  assert!(!dir.path().join(".restore.stage").exists());
  OK
}

#[compio::test]
async fn test_max_steps() -> Void {
  let dir = tempfile::tempdir()?;
  let pg = dir.path().join("pg");
  let store = DirStore::new(dir.path().join("store"));
  let mut db = FakeDb { lsn: 0 };
  let conf = [Conf::MaxSteps(2)];
  init_pgdata(&pg).await?;

  assert!(decide(&store, &conf).await?.is_full());
  let mut counts = Vec::new();
  for _ in 0..5 {
    counts.push(push(&store, &mut db, &pg, &conf).await?.sentinel.count);
  }
  assert_eq!(counts, [None, Some(1), Some(2), None, Some(1)]);

  // Zero steps disables deltas
  let p = push(&store, &mut db, &pg, &[Conf::MaxSteps(2), Conf::MaxSteps(0)]).await?;
  assert!(!p.sentinel.is_incremental());
  OK
}

#[compio::test]
async fn test_latest_full_origin() -> Void {
  let dir = tempfile::tempdir()?;
  let pg = dir.path().join("pg");
  let target = dir.path().join("restore");
  let store = DirStore::new(dir.path().join("store"));
  let mut db = FakeDb { lsn: 0 };
  let conf = [
    Conf::MaxSteps(5),
    Conf::Origin(Origin::LatestFull),
    Conf::Codec(Codec::Zstd),
    Conf::Stage(dir.path().join("stage")),
  ];
  init_pgdata(&pg).await?;

  let full = push(&store, &mut db, &pg, &conf).await?;
  put(&pg, "base/1/2600", pages(&[(STEP + 1, 50), (0x20, 6)]), 2).await?;
  let d1 = push(&store, &mut db, &pg, &conf).await?;
  put(&pg, "base/1/1259", pages(&[(0x10, 1), (2 * STEP + 1, 60), (0x10, 3), (0x10, 4)]), 3).await?;
  let d2 = push(&store, &mut db, &pg, &conf).await?;

  assert_eq!(d1.sentinel.from.as_deref(), Some(full.name.as_str()));
  assert_eq!(d2.sentinel.from.as_deref(), Some(full.name.as_str()));
  assert_eq!(d2.sentinel.from_lsn, Some(STEP));
  assert_eq!(d2.sentinel.count, Some(2));
  // Both relations differ from the full backup
  assert_eq!(d2.stat.incr, 2);

  assert_eq!(chain(&store, &d2.name).await?.len(), 2);
  assert_eq!(fetch(&store, &d2.name, &target, &conf).await?, 3 * STEP);
  assert_eq!(tree(&target).await?, tree(&pg).await?);
  assert!(!dir.path().join("stage").exists());
  OK
}

#[compio::test]
async fn test_invalid_block_fallback() -> Void {
  let dir = tempfile::tempdir()?;
  let pg = dir.path().join("pg");
  let target = dir.path().join("restore");
  let store = DirStore::new(dir.path().join("store"));
  let mut db = FakeDb { lsn: 0 };
  let conf = [Conf::MaxSteps(1)];
  init_pgdata(&pg).await?;
  push(&store, &mut db, &pg, &conf).await?;

  let mut bad = pages(&[(0x10, 1), (0x10, 2), (0x10, 3), (0x10, 4)]);
  bad[BLOCK_SIZE + 10..BLOCK_SIZE + 12].copy_from_slice(&0xFFFFu16.to_le_bytes());
  put(&pg, "base/1/1259", bad, 2).await?;
  put(&pg, "base/1/2600", pages(&[(0x20, 5), (STEP + 9, 6)]), 2).await?;
  let d1 = push(&store, &mut db, &pg, &conf).await?;
  assert_eq!((d1.stat.fallback, d1.stat.full, d1.stat.incr), (1, 1, 1));
  assert_eq!(
    d1.sentinel.files["base/1/1259"],
    FileDesc {
      mtime: 2_000_000_000,
      is_skipped: false,
      is_incremented: false,
    }
  );

  fetch(&store, LATEST, &target, &conf).await?;
  assert_eq!(tree(&target).await?, tree(&pg).await?);
  OK
}

#[compio::test]
async fn test_relation_shrunk_during_push() -> Void {
  let dir = tempfile::tempdir()?;
  let pg = dir.path().join("pg");
  let target = dir.path().join("restore");
  let store = ShrinkStore {
    inner: DirStore::new(dir.path().join("store")),
    victim: pg.join("base/1/1259"),
    armed: Cell::new(false),
  };
  let mut db = FakeDb { lsn: 0 };
  let conf = [Conf::MaxSteps(1)];
  init_pgdata(&pg).await?;
  push(&store, &mut db, &pg, &conf).await?;

  put(&pg, "PG_VERSION", b"17\n".to_vec(), 2).await?;
  let rel = pages(&[(0x10, 1), (STEP + 1, 2), (0x10, 3), (STEP + 2, 4)]);
  put(&pg, "base/1/1259", rel, 2).await?;
  store.armed.set(true);
  let d1 = push(&store, &mut db, &pg, &conf).await?;
  assert!(!store.armed.get());
  assert_eq!((d1.stat.incr, d1.stat.full, d1.stat.skipped), (1, 1, 1));
  assert!(d1.sentinel.files["base/1/1259"].is_incremented);
  assert_eq!(fs::metadata(pg.join("base/1/1259"))?.len(), 2 * BLOCK_SIZE as u64);

  fetch(&store, LATEST, &target, &conf).await?;
  assert_eq!(tree(&target).await?, tree(&pg).await?);
  OK
}

#[compio::test]
async fn test_timeline_changed() -> Void {
  let dir = tempfile::tempdir()?;
  let pg = dir.path().join("pg");
  let store = DirStore::new(dir.path().join("store"));
  let mut db = Promoted(FakeDb { lsn: 0 });
  init_pgdata(&pg).await?;

  assert!(matches!(
    push(&store, &mut db, &pg, &[]).await,
    Err(Error::TimelineChanged { start: 1, now: 2 })
  ));
  // Members were uploaded but the backup never became visible
  assert!(!store.list("basebackups_005/", true).await?.is_empty());
  assert!(matches!(latest(&store).await, Err(Error::NoBackupFound)));
  OK
}

#[compio::test]
async fn test_plain_members() -> Void {
  let dir = tempfile::tempdir()?;
  let pg = dir.path().join("pg");
  let target = dir.path().join("restore");
  let store = DirStore::new(dir.path().join("store"));
  let mut db = FakeDb { lsn: 0 };
  let conf = [Conf::MaxSteps(2), Conf::Codec(Codec::None)];
  init_pgdata(&pg).await?;

  let full = push(&store, &mut db, &pg, &conf).await?;
  let root = store.root().join("basebackups_005");
  assert_eq!(
    fs::read(root.join(format!("{}/full/base/1/1259", full.name)))?,
    fs::read(pg.join("base/1/1259"))?
  );

  put(&pg, "base/1/2600", pages(&[(0x20, 5), (STEP + 3, 9)]), 2).await?;
  let d1 = push(&store, &mut db, &pg, &conf).await?;
  assert_eq!(d1.stat.incr, 1);
  fetch(&store, &d1.name, &target, &conf).await?;
  assert_eq!(tree(&target).await?, tree(&pg).await?);

  // Junk after a stored increment
  let incr = root.join(format!("{}/incr/base/1/2600", d1.name));
  let mut raw = fs::read(&incr)?;
  raw.extend_from_slice(b"junk");
  fs::write(&incr, raw)?;
  assert!(matches!(
    fetch(&store, &d1.name, &dir.path().join("again"), &conf).await,
    Err(Error::Incr(pgd_incr::Error::TrailingBytes(4)))
  ));
  OK
}

#[test]
fn test_default_stage() -> Void {
  let dir = tempfile::tempdir()?;
  let target = dir.path().join("restore");
  assert_eq!(default_stage(&target)?, dir.path().join(".restore.stage"));

  // `pg/..` names the temp dir itself; its stage must sit beside it
  let pg = dir.path().join("pg");
  fs::create_dir_all(&pg)?;
  let abs = fs::canonicalize(dir.path())?;
  let name = abs.file_name().map(|n| n.to_string_lossy().into_owned());
  let stage = default_stage(&pg.join(".."))?;
  assert_eq!(stage, abs.with_file_name(format!(".{}.stage", name.unwrap_or_default())));
  assert!(!stage.starts_with(&abs));

  assert!(matches!(default_stage(Path::new("/")), Err(Error::BadPath(_))));
  OK
}

/// First page of a segment, long header
/// 段的首页（长页头）
fn wal_page() -> Vec<u8> {
  let mut v = Vec::new();
  v.extend_from_slice(&0xD10Du16.to_le_bytes());
  v.extend_from_slice(&0x0002u16.to_le_bytes());
  v.extend_from_slice(&1u32.to_le_bytes());
  v.extend_from_slice(&0x0100_0000u64.to_le_bytes());
  v.extend_from_slice(&0u32.to_le_bytes());
  v.extend_from_slice(&7u64.to_le_bytes());
  v.extend_from_slice(&(16u32 << 20).to_le_bytes());
  v.extend_from_slice(&(BLOCK_SIZE as u32).to_le_bytes());
  v.resize(2 * BLOCK_SIZE, 0x33);
  v
}

#[compio::test]
async fn test_wal_archive() -> Void {
  let dir = tempfile::tempdir()?;
  let store = DirStore::new(dir.path().join("store"));
  let wal = dir.path().join("pg_wal");
  let out = dir.path().join("out");
  fs::create_dir_all(&wal)?;

  let seg = "000000010000000000000001";
  fs::write(wal.join(seg), wal_page())?;
  assert_eq!(wal_push(&store, &wal.join(seg), &[]).await?, format!("wal_005/{seg}.lz4"));

  let seg2 = "000000010000000000000002";
  fs::write(wal.join(seg2), wal_page())?;
  wal_push(&store, &wal.join(seg2), &[Conf::Codec(Codec::Zstd)]).await?;

  // Not a segment, stored without page checks
  let hist = "00000002.history";
  fs::write(wal.join(hist), b"1\t0/3000000\tno recovery target specified\n")?;
  wal_push(&store, &wal.join(hist), &[Conf::Codec(Codec::None)]).await?;

  for name in [seg, seg2, hist] {
    wal_fetch(&store, name, &out.join(name)).await?;
    assert_eq!(fs::read(out.join(name))?, fs::read(wal.join(name))?);
  }

  // A zeroed first page is only allowed on a .partial segment
  let zero = vec![0u8; BLOCK_SIZE];
  let partial = format!("{seg2}{PARTIAL_SUFFIX}");
  fs::write(wal.join(&partial), &zero)?;
  wal_push(&store, &wal.join(&partial), &[]).await?;

  let seg3 = "000000010000000000000003";
  fs::write(wal.join(seg3), &zero)?;
  assert!(matches!(
    wal_push(&store, &wal.join(seg3), &[]).await,
    Err(Error::BadWal {
      source: pgd_page::Error::Zero,
      ..
    })
  ));
  let mut bad = wal_page();
  bad[1] = 0;
  fs::write(wal.join(seg3), bad)?;
  assert!(matches!(
    wal_push(&store, &wal.join(seg3), &[]).await,
    Err(Error::BadWal {
      source: pgd_page::Error::Invalid,
      ..
    })
  ));

  assert!(matches!(
    wal_fetch(&store, seg3, &out.join(seg3)).await,
    Err(Error::WalNotExist(_))
  ));
  assert!(!out.join(seg3).exists());
  assert!(matches!(
    wal_fetch(&store, "../x", &out.join("x")).await,
    Err(Error::BadPath(_))
  ));
  OK
}

#[compio::test]
async fn test_fetch_errors() -> Void {
  let dir = tempfile::tempdir()?;
  let pg = dir.path().join("pg");
  let target = dir.path().join("restore");
  let store = DirStore::new(dir.path().join("store"));
  let mut db = FakeDb { lsn: 0 };

  assert!(matches!(
    fetch(&store, LATEST, &target, &[]).await,
    Err(Error::NoBackupFound)
  ));
  assert!(matches!(
    fetch(&store, "base_000000010000000000000009", &target, &[]).await,
    Err(Error::BackupNotExist(_))
  ));

  init_pgdata(&pg).await?;
  let full = push(&store, &mut db, &pg, &[]).await?;

  fs::create_dir_all(&target)?;
  fs::write(target.join("stray"), b"x")?;
  assert!(matches!(
    fetch(&store, &full.name, &target, &[]).await,
    Err(Error::NotEmpty(_))
  ));
  fs::remove_dir_all(&target)?;

  let control = store
    .root()
    .join(format!("basebackups_005/{}/pg_control.lz4", full.name));
  fs::remove_file(control)?;
  assert!(matches!(
    fetch(&store, &full.name, &target, &[]).await,
    Err(Error::MissingControl(_))
  ));
  OK
}

#[compio::test]
async fn test_cycle() -> Void {
  let dir = tempfile::tempdir()?;
  let store = DirStore::new(dir.path());
  let link = |from: &str, lsn| Sentinel {
    lsn: Some(lsn),
    from_lsn: Some(lsn - 1),
    from: Some(from.to_owned()),
    full_name: Some(from.to_owned()),
    count: Some(1),
    ..Sentinel::default()
  };
  save(&store, "base_a", &link("base_b", 10)).await?;
  save(&store, "base_b", &link("base_a", 20)).await?;
  assert!(matches!(chain(&store, "base_a").await, Err(Error::Cycle(n)) if n == "base_a"));

  // Lineage fields must come together
  let half = Sentinel {
    lsn: Some(5),
    from_lsn: Some(1),
    ..Sentinel::default()
  };
  save(&store, "base_c", &half).await?;
  assert!(matches!(chain(&store, "base_c").await, Err(Error::BadSentinel(_))));
  OK
}

#[test]
fn test_sentinel_json() -> Void {
  let mut s = Sentinel {
    lsn: Some(0x2000000),
    ..Sentinel::default()
  };
  s.files.insert(
    "base/1/1259".into(),
    FileDesc {
      mtime: 3,
      is_skipped: true,
      is_incremented: false,
    },
  );
  let json = String::from_utf8(s.to_json()?)?;
  assert!(json.contains("\"LSN\":33554432"));
  assert!(json.contains("\"IsSkipped\":true"));
  assert!(!json.contains("DeltaFrom"));
  assert_eq!(Sentinel::from_json(json.as_bytes())?, s);

  let raw = concat!(
    r#"{"LSN":10,"DeltaFromLSN":5,"DeltaFrom":"base_x","#,
    r#""DeltaFullName":"base_x","DeltaCount":1,"Files":{}}"#
  );
  let s = Sentinel::from_json(raw.as_bytes())?;
  assert!(s.is_incremental());
  assert_eq!(s.from.as_deref(), Some("base_x"));
  OK
}

#[test]
fn test_conf_from_env() -> Void {
  // Only test touching these variables
  unsafe {
    std::env::set_var(ENV_MAX_STEPS, "3");
    std::env::set_var(ENV_ORIGIN, "LATEST_FULL");
    std::env::set_var(ENV_COMPRESSION, "zstd");
  }
  let li = conf_from_env()?;
  assert!(matches!(
    li[..],
    [
      Conf::MaxSteps(3),
      Conf::Origin(Origin::LatestFull),
      Conf::Codec(Codec::Zstd)
    ]
  ));

  unsafe { std::env::set_var(ENV_MAX_STEPS, "-1") };
  assert!(matches!(conf_from_env(), Err(Error::Conf(_))));

  unsafe {
    std::env::set_var(ENV_MAX_STEPS, "3");
    std::env::set_var(ENV_ORIGIN, "OLDEST");
  }
  assert!(matches!(conf_from_env(), Err(Error::Conf(_))));

  unsafe {
    std::env::remove_var(ENV_MAX_STEPS);
    std::env::remove_var(ENV_ORIGIN);
    std::env::remove_var(ENV_COMPRESSION);
  }
  assert!(conf_from_env()?.is_empty());
  OK
}
