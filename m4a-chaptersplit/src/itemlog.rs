use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

/// Per-item dual diagnostic sink: every line is echoed to the console
/// (via tracing) and appended to `logs/{base}.log` under the source
/// directory. The log is exclusively owned by one item's processing
/// and must be flushed via [ItemLog::finish] before the item boundary
/// is crossed, on every exit path.
///
/// Logs are written even on dry runs; they are the record a dry run
/// exists to produce.
pub struct ItemLog {
    path: PathBuf,
    file: BufWriter<File>,
}

impl ItemLog {
    /// Open `{dir}/logs/{base_name}.log`, creating the `logs/`
    /// directory if needed (an existing one is reused).
    pub fn open(dir: &Path, base_name: &str) -> io::Result<Self> {
        let logs_dir = dir.join("logs");
        fs::create_dir_all(&logs_dir)?;
        let path = logs_dir.join(format!("{base_name}.log"));
        let file = BufWriter::new(File::create(&path)?);
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Echo a line to the console and append it to the log file. A
    /// failed write is fatal to the item.
    pub fn say(&mut self, line: &str) -> io::Result<()> {
        info!("{line}");
        writeln!(self.file, "{line}")
    }

    /// Flush and close the log.
    pub fn finish(mut self) -> io::Result<()> {
        self.file.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_land_in_the_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = ItemLog::open(dir.path(), "Some Book").unwrap();
        log.say("first").unwrap();
        log.say("second").unwrap();
        let path = log.path().to_path_buf();
        log.finish().unwrap();

        assert_eq!(path, dir.path().join("logs").join("Some Book.log"));
        assert_eq!(fs::read_to_string(path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn reopening_the_logs_directory_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        ItemLog::open(dir.path(), "a").unwrap().finish().unwrap();
        ItemLog::open(dir.path(), "b").unwrap().finish().unwrap();
        assert!(dir.path().join("logs").join("a.log").is_file());
        assert!(dir.path().join("logs").join("b.log").is_file());
    }
}
