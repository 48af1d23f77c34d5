//! Where the CLI keeps its preference database and logs.

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use directories::ProjectDirs;

const LATEST_LOG: &str = "latest.log";
const PREFERENCES_DB: &str = "preferences.db";

/// Archived logs kept by [`AppDirs::rotate_logs`].
pub const KEEP_LOGS: usize = 25;

/// Resolved data and log directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDirs {
    data: PathBuf,
    logs: PathBuf,
}

impl AppDirs {
    /// Platform locations (`~/.local/share/tableview`, `~/.cache/tableview`
    /// on Linux), or everything under `root` when given.
    pub fn resolve(root: Option<PathBuf>) -> Option<Self> {
        if let Some(root) = root {
            return Some(Self {
                logs: root.join("logs"),
                data: root,
            });
        }
        let dirs = ProjectDirs::from("dev", "tableview", "tableview")?;
        Some(Self {
            data: dirs.data_dir().to_path_buf(),
            logs: dirs.cache_dir().to_path_buf(),
        })
    }

    pub fn preferences_db(&self) -> PathBuf {
        self.data.join(PREFERENCES_DB)
    }

    pub fn log_file(&self) -> PathBuf {
        self.logs.join(LATEST_LOG)
    }

    /// Archive the previous `latest.log` under a timestamp and prune
    /// archives beyond `keep`. Returns the number of files removed.
    pub fn rotate_logs(&self, keep: usize) -> io::Result<usize> {
        fs::create_dir_all(&self.logs)?;
        let latest = self.log_file();
        if latest.exists() {
            let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S%.3f");
            fs::rename(&latest, self.logs.join(format!("{}.log", stamp)))?;
        }
        prune_archives(&self.logs, keep)
    }
}

fn prune_archives(dir: &Path, keep: usize) -> io::Result<usize> {
    let mut archived: Vec<_> = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .filter(|entry| {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            name.ends_with(".log") && name != LATEST_LOG
        })
        .collect();
    if archived.len() <= keep {
        return Ok(0);
    }

    // Oldest first; name breaks ties since archive names sort by time
    archived.sort_by_key(|entry| (entry.metadata().and_then(|m| m.modified()).ok(), entry.file_name()));
    let excess = archived.len() - keep;
    for entry in &archived[..excess] {
        fs::remove_file(entry.path())?;
    }
    Ok(excess)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("tableview-paths-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_root_override() {
        let root = scratch("override");
        let dirs = AppDirs::resolve(Some(root.clone())).unwrap();
        assert_eq!(dirs.preferences_db(), root.join("preferences.db"));
        assert_eq!(dirs.log_file(), root.join("logs").join("latest.log"));
    }

    #[test]
    fn test_rotate_archives_latest() {
        let root = scratch("archive");
        let dirs = AppDirs::resolve(Some(root.clone())).unwrap();
        fs::create_dir_all(root.join("logs")).unwrap();
        fs::write(dirs.log_file(), "previous run").unwrap();

        assert_eq!(dirs.rotate_logs(KEEP_LOGS).unwrap(), 0);
        assert!(!dirs.log_file().exists());
        let archived = fs::read_dir(root.join("logs")).unwrap().count();
        assert_eq!(archived, 1);
        fs::remove_dir_all(root).unwrap();
    }

    #[test]
    fn test_rotate_prunes_to_keep() {
        let root = scratch("prune");
        let dirs = AppDirs::resolve(Some(root.clone())).unwrap();
        let logs = root.join("logs");
        fs::create_dir_all(&logs).unwrap();
        for i in 0..5 {
            fs::write(logs.join(format!("2026010{}_000000.log", i)), "").unwrap();
        }
        fs::write(logs.join("notes.txt"), "").unwrap();

        assert_eq!(dirs.rotate_logs(2).unwrap(), 3);
        let mut left: Vec<_> = fs::read_dir(&logs)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        left.sort();
        assert_eq!(left.len(), 3);
        assert!(left.contains(&"notes.txt".to_string()));
        fs::remove_dir_all(root).unwrap();
    }
}
