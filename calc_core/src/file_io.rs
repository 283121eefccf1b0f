//! # Workbook Files
//!
//! Workbooks live in `.rcw` files (pretty-printed JSON). Two things keep a
//! shared workbook from being corrupted:
//!
//! - saves go through a `.tmp` sibling that is synced and then renamed over the target
//! - a [`FileLock`] holds an OS lock on a `.rcw.lock` sidecar, which also records
//!   who holds it so other users can be told
//!
//! ## Example
//!
//! ```rust,no_run
//! use calc_core::file_io::{load_or_create_workbook, save_workbook, FileLock};
//! use std::path::Path;
//!
//! let path = Path::new("shop.rcw");
//! let _lock = FileLock::acquire(path, "ana")?;
//!
//! let mut workbook = load_or_create_workbook(path, "Ana", "Print Corner")?;
//! workbook.settings.currency = "USD".to_string();
//! save_workbook(&workbook, path)?;
//! # Ok::<(), calc_core::errors::CalcError>(())
//! ```

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::workbook::{Workbook, SCHEMA_VERSION};

/// Lock metadata older than this no longer blocks anyone
const STALE_AFTER_HOURS: i64 = 24;

/// Who holds a workbook, as recorded in its sidecar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockInfo {
    pub user_id: String,
    pub machine: String,
    pub pid: u32,
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    /// Metadata for the calling process.
    pub fn new(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: machine_name(),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }

    /// Left behind by a process that is gone, or simply too old to trust.
    ///
    /// Process liveness can only be judged on the machine that wrote it.
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        if self.machine == machine_name() && !pid_is_running(self.pid) {
            return true;
        }
        now - self.locked_at > Duration::hours(STALE_AFTER_HOURS)
    }

    fn holder(&self) -> String {
        format!("{} ({})", self.user_id, self.machine)
    }
}

fn machine_name() -> String {
    ["HOSTNAME", "HOST", "COMPUTERNAME"]
        .iter()
        .find_map(|key| std::env::var(key).ok())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(target_os = "linux")]
fn pid_is_running(pid: u32) -> bool {
    Path::new("/proc").join(pid.to_string()).exists()
}

// Without a cheap liveness check a lock only expires by age.
#[cfg(not(target_os = "linux"))]
fn pid_is_running(_pid: u32) -> bool {
    true
}

/// `shop.rcw` -> `shop.rcw.lock`
fn sidecar_path(workbook_path: &Path) -> PathBuf {
    let mut name = OsString::from(workbook_path.as_os_str());
    name.push(".lock");
    PathBuf::from(name)
}

/// Map an I/O failure on `path` into a `FileError`.
fn io_error<'a>(operation: &'a str, path: &'a Path) -> impl FnOnce(io::Error) -> CalcError + 'a {
    move |e| CalcError::file_error(operation, path.display().to_string(), e.to_string())
}

/// Parse whatever metadata a sidecar holds; empty or garbled content is `None`.
fn read_info(file: &mut File) -> Option<LockInfo> {
    let mut contents = String::new();
    file.seek(SeekFrom::Start(0)).ok()?;
    file.read_to_string(&mut contents).ok()?;
    serde_json::from_str(&contents).ok()
}

/// True when another open handle holds an OS lock on `file`.
fn os_lock_held(file: &File) -> bool {
    if file.try_lock_shared().is_err() {
        return true;
    }
    let _ = file.unlock();
    false
}

/// Exclusive hold on a workbook, released (and its sidecar removed) on drop.
pub struct FileLock {
    workbook_path: PathBuf,
    sidecar: PathBuf,
    // Owns the OS lock
    _file: File,
    pub info: LockInfo,
}

impl FileLock {
    /// Take the lock on `path` for `user_id`.
    ///
    /// The sidecar is opened without truncation and only rewritten once the
    /// OS lock is ours, so a losing attempt never disturbs the holder's
    /// metadata. Fresh metadata blocks even when the OS lock is free (OS
    /// locks may not reach across network shares); stale metadata is taken
    /// over.
    ///
    /// # Errors
    ///
    /// * `FileLocked` - someone else holds the workbook (recoverable; retry later)
    /// * `FileError` - the sidecar could not be created or written
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> CalcResult<Self> {
        let sidecar = sidecar_path(path);
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&sidecar)
            .map_err(io_error("open lock", &sidecar))?;

        if file.try_lock_exclusive().is_err() {
            let holder = read_info(&mut file)
                .map(|info| (info.holder(), info.locked_at.to_rfc3339()))
                .unwrap_or_else(|| ("another process".to_string(), "unknown".to_string()));
            return Err(CalcError::file_locked(path.display().to_string(), holder.0, holder.1));
        }

        if let Some(previous) = read_info(&mut file) {
            if !previous.is_stale(Utc::now()) {
                return Err(CalcError::file_locked(
                    path.display().to_string(),
                    previous.holder(),
                    previous.locked_at.to_rfc3339(),
                ));
            }
            log::warn!("taking over stale lock held by {}", previous.holder());
        }

        let info = LockInfo::new(user_id);
        let json = serde_json::to_string_pretty(&info).map_err(CalcError::serialization)?;
        file.set_len(0).map_err(io_error("truncate lock", &sidecar))?;
        file.seek(SeekFrom::Start(0)).map_err(io_error("write lock", &sidecar))?;
        file.write_all(json.as_bytes()).map_err(io_error("write lock", &sidecar))?;
        file.sync_all().map_err(io_error("sync lock", &sidecar))?;

        log::debug!("{} locked {}", info.user_id, path.display());
        Ok(FileLock {
            workbook_path: path.to_path_buf(),
            sidecar,
            _file: file,
            info,
        })
    }

    /// Who holds `path`, if anyone.
    ///
    /// A held OS lock always counts, however old its metadata; otherwise
    /// only fresh metadata does.
    pub fn check(path: &Path) -> Option<LockInfo> {
        let mut file = File::open(sidecar_path(path)).ok()?;
        let info = read_info(&mut file);
        if os_lock_held(&file) {
            return Some(info.unwrap_or_else(|| LockInfo {
                user_id: "another process".to_string(),
                machine: "unknown".to_string(),
                pid: 0,
                locked_at: Utc::now(),
            }));
        }
        info.filter(|info| !info.is_stale(Utc::now()))
    }

    pub fn workbook_path(&self) -> &Path {
        &self.workbook_path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.sidecar);
    }
}

/// Write `workbook` to `path` so readers see either the old or the new file.
pub fn save_workbook(workbook: &Workbook, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_vec_pretty(workbook).map_err(CalcError::serialization)?;

    let mut tmp_name = OsString::from(path.as_os_str());
    tmp_name.push(".tmp");
    let tmp = PathBuf::from(tmp_name);

    let written = File::create(&tmp)
        .and_then(|mut file| {
            file.write_all(&json)?;
            file.sync_all()
        })
        .map_err(io_error("write temp file", &tmp))
        .and_then(|()| fs::rename(&tmp, path).map_err(io_error("replace", path)));
    if written.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    written?;

    log::info!(
        "saved workbook to {} ({} projects)",
        path.display(),
        workbook.project_count()
    );
    Ok(())
}

/// Read a workbook and check its schema version.
///
/// # Errors
///
/// * `FileError` - the file cannot be read
/// * `SerializationError` - the file is not a workbook
/// * `VersionMismatch` - written by an incompatible version
pub fn load_workbook(path: &Path) -> CalcResult<Workbook> {
    let contents = fs::read_to_string(path).map_err(io_error("read", path))?;
    let workbook: Workbook = serde_json::from_str(&contents)
        .map_err(|e| CalcError::serialization(format!("{}: {e}", path.display())))?;
    check_version(&workbook.meta.version)?;

    log::info!("loaded workbook {} ({} projects)", path.display(), workbook.project_count());
    Ok(workbook)
}

/// Load a workbook, or start a new one if the file does not exist yet.
pub fn load_or_create_workbook(
    path: &Path,
    owner: impl Into<String>,
    company: impl Into<String>,
) -> CalcResult<Workbook> {
    if path.exists() {
        load_workbook(path)
    } else {
        log::info!("creating new workbook at {}", path.display());
        Ok(Workbook::new(owner, company))
    }
}

/// Load a workbook for reading, along with whoever currently holds its lock.
pub fn load_workbook_with_lock_check(path: &Path) -> CalcResult<(Workbook, Option<LockInfo>)> {
    Ok((load_workbook(path)?, FileLock::check(path)))
}

/// `major.minor` of a version string; a missing minor reads as 0.
fn major_minor(version: &str) -> Option<(u32, u32)> {
    let mut parts = version.split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = match parts.next() {
        Some(minor) => minor.parse().ok()?,
        None => 0,
    };
    Some((major, minor))
}

/// Same major, and while on 0.x, no newer minor than ours.
fn check_version(file_version: &str) -> CalcResult<()> {
    let compatible = match (major_minor(file_version), major_minor(SCHEMA_VERSION)) {
        (Some((file_major, file_minor)), Some((major, minor))) => {
            file_major == major && (major > 0 || file_minor <= minor)
        }
        _ => false,
    };
    if compatible {
        Ok(())
    } else {
        Err(CalcError::VersionMismatch {
            file_version: file_version.to_string(),
            expected_version: SCHEMA_VERSION.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::{Roll, Shape};
    use std::env::temp_dir;

    fn scratch(name: &str) -> PathBuf {
        let path = temp_dir().join(format!("rollcut_test_{name}.rcw"));
        let _ = fs::remove_file(&path);
        let _ = fs::remove_file(sidecar_path(&path));
        path
    }

    fn write_sidecar(path: &Path, info: &LockInfo) {
        fs::write(sidecar_path(path), serde_json::to_string(info).unwrap()).unwrap();
    }

    fn foreign_lock(hours_old: i64) -> LockInfo {
        LockInfo {
            user_id: "bia".to_string(),
            machine: "front-desk-pc".to_string(),
            pid: 4242,
            locked_at: Utc::now() - Duration::hours(hours_old),
        }
    }

    #[test]
    fn test_sidecar_path() {
        assert_eq!(
            sidecar_path(Path::new("/shared/shop.rcw")),
            Path::new("/shared/shop.rcw.lock")
        );
        assert_eq!(sidecar_path(Path::new("shop")), Path::new("shop.lock"));
    }

    #[test]
    fn test_lock_info_staleness() {
        let now = Utc::now();
        assert!(!foreign_lock(1).is_stale(now));
        assert!(foreign_lock(STALE_AFTER_HOURS + 1).is_stale(now));
        assert!(!LockInfo::new("ana").is_stale(now));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = scratch("roundtrip");

        let mut workbook = Workbook::new("Ana", "Print Corner");
        let roll_id = workbook.add_roll(Roll::new("Paper", 100.0, 50.0, 500.0)).unwrap();
        let mug_id = workbook.add_shape(Shape::new("Mug", 25.0, 10.0)).unwrap();
        let input = workbook.build_input(roll_id, &[(mug_id, 12)], None, None).unwrap();
        let project_id = workbook.save_project("Mugs", "ana", input).unwrap();
        save_workbook(&workbook, &path).unwrap();

        let loaded = load_workbook(&path).unwrap();
        assert_eq!(loaded.meta.company, "Print Corner");
        let project = loaded.get_project(&project_id).unwrap();
        assert_eq!(project.result.layout.per_item[0].shapes_across, 4);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let path = scratch("atomic");
        save_workbook(&Workbook::default(), &path).unwrap();

        assert!(path.exists());
        assert!(!temp_dir().join("rollcut_test_atomic.rcw.tmp").exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_or_create_missing_file() {
        let path = scratch("never_written");
        let workbook = load_or_create_workbook(&path, "Ana", "Print Corner").unwrap();
        assert_eq!(workbook.project_count(), 0);
        assert!(!path.exists());
    }

    #[test]
    fn test_load_rejects_non_workbook() {
        let path = scratch("not_json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_workbook(&path), Err(CalcError::SerializationError { .. })));

        assert!(matches!(
            load_workbook(&scratch("absent")),
            Err(CalcError::FileError { .. })
        ));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_lock_released_on_drop() {
        let path = scratch("release");

        let lock = FileLock::acquire(&path, "ana").unwrap();
        assert_eq!(lock.workbook_path(), path.as_path());
        assert_eq!(FileLock::check(&path).unwrap().user_id, "ana");

        drop(lock);
        assert!(!sidecar_path(&path).exists());
        assert!(FileLock::check(&path).is_none());
    }

    #[test]
    fn test_losing_acquire_keeps_holder_metadata() {
        let path = scratch("contended");
        let first = FileLock::acquire(&path, "ana").unwrap();

        // Old enough to be stale by age, but the OS lock is still held
        let mut aged = first.info.clone();
        aged.locked_at = Utc::now() - Duration::hours(48);
        write_sidecar(&path, &aged);

        let err = FileLock::acquire(&path, "bia").err().unwrap();
        assert!(err.is_recoverable());

        let recorded: LockInfo =
            serde_json::from_str(&fs::read_to_string(sidecar_path(&path)).unwrap()).unwrap();
        assert_eq!(recorded, aged);
        assert_eq!(FileLock::check(&path).unwrap().user_id, "ana");

        drop(first);
    }

    #[test]
    fn test_fresh_foreign_metadata_blocks() {
        let path = scratch("foreign_fresh");
        write_sidecar(&path, &foreign_lock(1));

        match FileLock::acquire(&path, "ana") {
            Err(CalcError::FileLocked { locked_by, .. }) => assert!(locked_by.starts_with("bia")),
            Err(other) => panic!("unexpected error: {other:?}"),
            Ok(_) => panic!("acquired a lock held by bia"),
        }
        assert_eq!(FileLock::check(&path).unwrap().user_id, "bia");

        let _ = fs::remove_file(sidecar_path(&path));
    }

    #[test]
    fn test_stale_metadata_taken_over() {
        let path = scratch("foreign_stale");
        write_sidecar(&path, &foreign_lock(STALE_AFTER_HOURS + 2));
        assert!(FileLock::check(&path).is_none());

        let lock = FileLock::acquire(&path, "ana").unwrap();
        assert_eq!(FileLock::check(&path).unwrap().user_id, "ana");
        drop(lock);
    }

    #[test]
    fn test_version_check() {
        assert!(check_version(SCHEMA_VERSION).is_ok());
        assert!(check_version("0.1.7").is_ok());
        assert!(check_version("0.0.3").is_ok());
        assert!(check_version("0.2.0").is_err());
        assert!(check_version("1.0.0").is_err());
        assert!(check_version("garbage").is_err());
    }

    #[test]
    fn test_load_with_lock_check() {
        let path = scratch("lock_check");
        save_workbook(&Workbook::new("Ana", "Print Corner"), &path).unwrap();

        let (_, holder) = load_workbook_with_lock_check(&path).unwrap();
        assert!(holder.is_none());

        let lock = FileLock::acquire(&path, "ana").unwrap();
        let (loaded, holder) = load_workbook_with_lock_check(&path).unwrap();
        assert_eq!(loaded.meta.owner, "Ana");
        assert_eq!(holder.unwrap().user_id, "ana");

        drop(lock);
        let _ = fs::remove_file(&path);
    }
}
