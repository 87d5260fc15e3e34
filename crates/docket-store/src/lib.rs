pub mod run_state;

pub use run_state::{load_state, save_state, RunState, StateError};

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Return the per-user store root: `<data_dir>/docket/`
/// Falls back to `~/.docket/`, then to `.docket-store` in the cwd.
pub fn store_root() -> PathBuf {
    if let Some(data_dir) = dirs::data_dir() {
        data_dir.join("docket")
    } else if let Some(home) = dirs::home_dir() {
        home.join(".docket")
    } else {
        PathBuf::from(".docket-store")
    }
}

/// Default run-state location: `store_root/state/last_run.json`
pub fn default_state_file() -> PathBuf {
    store_root().join("state").join("last_run.json")
}

/// Default report directory: `store_root/outputs/`
pub fn default_output_dir() -> PathBuf {
    store_root().join("outputs")
}

/// Expand a leading `~/` to the home directory. Other paths pass through.
pub fn expand_home(p: &Path) -> PathBuf {
    match p.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => p.to_path_buf(),
        },
        Err(_) => p.to_path_buf(),
    }
}

/// Absolute form of `p` without touching the filesystem.
pub fn absolute(p: &Path) -> PathBuf {
    std::path::absolute(p).unwrap_or_else(|_| p.to_path_buf())
}

/// Atomic write: write to temp file in same dir, then rename.
/// Readers see either the old content or the new content, never a mix.
/// On unix the file is created `0644` (less the umask), like a plain write.
pub fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(p) if p.as_os_str().is_empty() => Path::new("."),
        Some(p) => p,
        None => {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("no parent dir for {}", path.display()),
            ))
        }
    };
    fs::create_dir_all(parent)?;
    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o644));
    }
    let mut tmp = builder.tempfile_in(parent)?;
    tmp.write_all(data)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;
    Ok(())
}
