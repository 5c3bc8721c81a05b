//! Size-rotated log file that is always a well-formed JSON array once closed.
//!
//! Layout on disk:
//! - `<name>`: active file, `[` written, `]` pending
//! - `<name>.1`: most recent backup, closed
//! - `<name>.N`: oldest kept backup (`N == backup_count`)
//!
//! Framing: the opening bracket is written when a file is opened, every record
//! after the first is preceded by `,\n`, and the closing bracket is written on
//! rollover and on close. The rollover decision is made before the separator is
//! written so the separator never lands in the file being sealed.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const OPEN: &str = "[\n";
const SEPARATOR: &str = ",\n";
const CLOSE: &str = "\n]\n";

/// Rotation threshold and number of backups kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Rotate before a file would grow past this many bytes. `0` disables rotation.
    pub max_bytes: u64,
    /// Number of closed backups kept next to the active file.
    pub backup_count: usize,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_bytes: 1024 * 1024,
            backup_count: 5,
        }
    }
}

pub struct JsonArrayWriter {
    path: PathBuf,
    policy: RotationPolicy,
    file: File,
    written: u64,
    first_record: bool,
    /// `]` already written to `file`. Nothing more may go into it.
    sealed: bool,
    closed: bool,
}

impl JsonArrayWriter {
    /// Open `path` as a fresh JSON array. Existing non-empty content is rotated away first.
    pub fn open(path: impl AsRef<Path>, policy: RotationPolicy) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let existing = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        if existing > 0 {
            shift_backups(&path, policy.backup_count)?;
        }

        let file = start_file(&path)?;
        Ok(Self {
            path,
            policy,
            file,
            written: OPEN.len() as u64,
            first_record: true,
            sealed: false,
            closed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Append one serialized JSON object. Rolls over first if the record would overflow the file.
    pub fn append(&mut self, record: &str) -> io::Result<()> {
        if self.closed {
            return Err(io::Error::other("json log writer is closed"));
        }
        // A failed rollover leaves the active file sealed; finish it before writing.
        if self.sealed || self.should_rollover(record.len() as u64) {
            self.rollover()?;
        }

        let mut chunk = String::with_capacity(record.len() + SEPARATOR.len());
        if !self.first_record {
            chunk.push_str(SEPARATOR);
        }
        chunk.push_str(record);
        self.file.write_all(chunk.as_bytes())?;
        self.written += chunk.len() as u64;
        self.first_record = false;
        Ok(())
    }

    fn should_rollover(&self, record_len: u64) -> bool {
        if self.policy.max_bytes == 0 || self.first_record {
            // An empty file takes the record regardless of size, otherwise rollover would never end.
            return false;
        }
        let projected = self.written + SEPARATOR.len() as u64 + record_len + CLOSE.len() as u64;
        projected > self.policy.max_bytes
    }

    /// Seal the active file, shift backups and start a new array.
    ///
    /// If shifting or reopening fails the old file stays sealed and the next
    /// `append` retries from there, so the file on disk remains a valid array.
    pub fn rollover(&mut self) -> io::Result<()> {
        self.seal()?;
        // backup_count == 0: nowhere to keep it, start_file truncates in place
        if self.policy.backup_count > 0 && self.path.exists() {
            shift_backups(&self.path, self.policy.backup_count)?;
        }
        self.file = start_file(&self.path)?;
        self.written = OPEN.len() as u64;
        self.first_record = true;
        self.sealed = false;
        Ok(())
    }

    /// Write the closing bracket and flush. Idempotent.
    pub fn close(&mut self) -> io::Result<()> {
        if self.closed {
            return Ok(());
        }
        self.seal()?;
        self.closed = true;
        Ok(())
    }

    fn seal(&mut self) -> io::Result<()> {
        if self.sealed {
            return Ok(());
        }
        self.file.write_all(CLOSE.as_bytes())?;
        self.sealed = true;
        self.file.flush()?;
        self.file.sync_data()
    }
}

impl Drop for JsonArrayWriter {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

fn start_file(path: &Path) -> io::Result<File> {
    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;
    file.write_all(OPEN.as_bytes())?;
    Ok(file)
}

/// `<name>.{i}` -> `<name>.{i+1}` from the oldest down, then `<name>` -> `<name>.1`.
fn shift_backups(path: &Path, backup_count: usize) -> io::Result<()> {
    if backup_count == 0 {
        return fs::remove_file(path).or_else(ignore_not_found);
    }
    for i in (1..backup_count).rev() {
        let src = backup_path(path, i);
        if src.exists() {
            let dst = backup_path(path, i + 1);
            fs::remove_file(&dst).or_else(ignore_not_found)?;
            fs::rename(&src, &dst)?;
        }
    }
    let first = backup_path(path, 1);
    fs::remove_file(&first).or_else(ignore_not_found)?;
    fs::rename(path, &first)
}

/// Path of the `index`-th backup of `path`.
pub fn backup_path(path: &Path, index: usize) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(format!(".{index}"));
    PathBuf::from(name)
}

fn ignore_not_found(e: io::Error) -> io::Result<()> {
    if e.kind() == io::ErrorKind::NotFound {
        Ok(())
    } else {
        Err(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use tempfile::TempDir;

    fn read_array(path: &Path) -> Vec<Value> {
        let text = fs::read_to_string(path).unwrap();
        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Array(items)) => items,
            other => panic!("{} is not a JSON array: {other:?}\n{text}", path.display()),
        }
    }

    fn record(i: usize) -> String {
        json!({ "n": i, "message": format!("record number {i} with some padding text") }).to_string()
    }

    fn all_files(path: &Path, backups: usize) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = (1..=backups)
            .rev()
            .map(|i| backup_path(path, i))
            .filter(|p| p.exists())
            .collect();
        files.push(path.to_path_buf());
        files
    }

    #[test]
    fn empty_file_closes_as_empty_array() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("app.json");
        let mut w = JsonArrayWriter::open(&path, RotationPolicy::default()).unwrap();
        w.close().unwrap();
        assert!(read_array(&path).is_empty());
    }

    #[test]
    fn records_form_an_array_in_order() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("app.json");
        let mut w = JsonArrayWriter::open(&path, RotationPolicy::default()).unwrap();
        for i in 0..3 {
            w.append(&record(i)).unwrap();
        }
        w.close().unwrap();
        let items = read_array(&path);
        let ns: Vec<_> = items.iter().map(|v| v["n"].as_u64().unwrap()).collect();
        assert_eq!(ns, [0, 1, 2]);
    }

    #[test]
    fn drop_closes_the_array() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("app.json");
        {
            let mut w = JsonArrayWriter::open(&path, RotationPolicy::default()).unwrap();
            w.append(&record(0)).unwrap();
        }
        assert_eq!(read_array(&path).len(), 1);
    }

    #[test]
    fn close_is_idempotent_and_rejects_later_appends() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("app.json");
        let mut w = JsonArrayWriter::open(&path, RotationPolicy::default()).unwrap();
        w.append(&record(0)).unwrap();
        w.close().unwrap();
        w.close().unwrap();
        assert!(w.is_closed());
        assert!(w.append(&record(1)).is_err());
        drop(w);
        assert_eq!(read_array(&path).len(), 1);
    }

    #[test]
    fn rotation_keeps_every_file_valid_and_every_record() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("app.json");
        let policy = RotationPolicy { max_bytes: 256, backup_count: 50 };
        let n = 40;
        let mut w = JsonArrayWriter::open(&path, policy).unwrap();
        for i in 0..n {
            w.append(&record(i)).unwrap();
        }
        w.close().unwrap();

        let files = all_files(&path, policy.backup_count);
        assert!(files.len() >= 2, "expected rotation, got {files:?}");

        let mut seen = Vec::new();
        for f in &files {
            let len = fs::metadata(f).unwrap().len();
            assert!(len <= policy.max_bytes, "{} is {len} bytes", f.display());
            seen.extend(read_array(f).into_iter().map(|v| v["n"].as_u64().unwrap()));
        }
        // oldest backup first, active file last: global order is preserved
        assert_eq!(seen, (0..n as u64).collect::<Vec<_>>());
    }

    #[test]
    fn backups_are_bounded() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("app.json");
        let policy = RotationPolicy { max_bytes: 128, backup_count: 2 };
        let mut w = JsonArrayWriter::open(&path, policy).unwrap();
        for i in 0..30 {
            w.append(&record(i)).unwrap();
        }
        w.close().unwrap();

        assert!(backup_path(&path, 1).exists());
        assert!(backup_path(&path, 2).exists());
        assert!(!backup_path(&path, 3).exists());
        for f in all_files(&path, 2) {
            read_array(&f);
        }
        let last = read_array(&path);
        assert_eq!(last.last().unwrap()["n"], 29);
    }

    #[test]
    fn oversized_record_goes_into_its_own_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("app.json");
        let policy = RotationPolicy { max_bytes: 64, backup_count: 3 };
        let big = json!({ "blob": "x".repeat(500) }).to_string();
        let mut w = JsonArrayWriter::open(&path, policy).unwrap();
        w.append(&record(0)).unwrap();
        w.append(&big).unwrap();
        w.append(&big).unwrap();
        w.close().unwrap();

        let total: usize = all_files(&path, 3).iter().map(|f| read_array(f).len()).sum();
        assert_eq!(total, 3);
        assert_eq!(read_array(&path).len(), 1);
    }

    #[test]
    fn zero_backups_truncates_in_place() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("app.json");
        let policy = RotationPolicy { max_bytes: 128, backup_count: 0 };
        let mut w = JsonArrayWriter::open(&path, policy).unwrap();
        for i in 0..10 {
            w.append(&record(i)).unwrap();
        }
        w.close().unwrap();
        assert!(!backup_path(&path, 1).exists());
        let items = read_array(&path);
        assert_eq!(items.last().unwrap()["n"], 9);
    }

    #[test]
    fn existing_content_is_moved_to_first_backup() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("app.json");
        {
            let mut w = JsonArrayWriter::open(&path, RotationPolicy::default()).unwrap();
            w.append(&record(1)).unwrap();
        }
        let mut w = JsonArrayWriter::open(&path, RotationPolicy::default()).unwrap();
        w.append(&record(2)).unwrap();
        w.close().unwrap();

        assert_eq!(read_array(&backup_path(&path, 1))[0]["n"], 1);
        assert_eq!(read_array(&path)[0]["n"], 2);
    }

    #[test]
    fn explicit_rollover_on_empty_file_stays_valid() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("app.json");
        let mut w = JsonArrayWriter::open(&path, RotationPolicy::default()).unwrap();
        w.rollover().unwrap();
        w.append(&record(7)).unwrap();
        w.close().unwrap();
        assert!(read_array(&backup_path(&path, 1)).is_empty());
        assert_eq!(read_array(&path).len(), 1);
    }

    #[test]
    fn failed_rollover_keeps_the_file_valid_and_recovers() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("app.json");
        let policy = RotationPolicy { max_bytes: 64, backup_count: 1 };
        let rec = json!({ "m": "x".repeat(32) }).to_string();
        assert_eq!(rec.len(), 40);

        // a directory where the backup should go makes the rename fail
        let blocker = backup_path(&path, 1);
        fs::create_dir(&blocker).unwrap();

        let mut w = JsonArrayWriter::open(&path, policy).unwrap();
        w.append(&rec).unwrap();
        assert!(w.append(&rec).is_err());
        assert!(w.append(&rec).is_err());
        assert_eq!(read_array(&path).len(), 1);

        fs::remove_dir(&blocker).unwrap();
        w.append(&rec).unwrap();
        w.close().unwrap();

        assert_eq!(read_array(&backup_path(&path, 1)).len(), 1);
        assert_eq!(read_array(&path).len(), 1);
    }

    #[test]
    fn close_after_failed_rollover_does_not_seal_twice() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("app.json");
        let policy = RotationPolicy { max_bytes: 64, backup_count: 1 };
        let rec = json!({ "m": "x".repeat(32) }).to_string();
        fs::create_dir(backup_path(&path, 1)).unwrap();

        let mut w = JsonArrayWriter::open(&path, policy).unwrap();
        for _ in 0..3 {
            let _ = w.append(&rec);
        }
        w.close().unwrap();
        drop(w);

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.matches(']').count(), 1, "{text}");
        assert_eq!(read_array(&path).len(), 1);
    }
}
