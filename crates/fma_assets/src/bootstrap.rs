//! Directory tree bootstrap.

use std::fs;
use std::path::Path;

use crate::error::AssetError;
use crate::layout::ASSET_DIRS;

/// Create every directory of the asset layout under `root`. Directories
/// that already exist are left untouched. Any refusal from the filesystem
/// (permissions, disk full) propagates; the game cannot run without this
/// structure.
pub fn ensure_directories(root: &Path) -> Result<(), AssetError> {
    for relative in ASSET_DIRS {
        let dir = root.join(relative);
        fs::create_dir_all(&dir).map_err(|e| AssetError::io(&dir, e))?;
    }
    log::info!(
        "Asset directories ensured under '{}' ({} entries)",
        root.display(),
        ASSET_DIRS.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn test_temp_root(hint: &str) -> PathBuf {
        use std::time::{SystemTime, UNIX_EPOCH};
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        std::env::temp_dir().join(format!("fma_bootstrap_test_{}_{}", hint, nanos))
    }

    #[test]
    fn creates_exactly_the_expected_directories() {
        let root = test_temp_root("fresh");
        ensure_directories(&root).expect("bootstrap");

        for relative in ASSET_DIRS {
            assert!(root.join(relative).is_dir(), "missing {relative}");
        }

        // Nothing but directories appears: bootstrap never writes files.
        let mut pending = vec![root.clone()];
        while let Some(dir) = pending.pop() {
            for entry in fs::read_dir(&dir).expect("read_dir") {
                let path = entry.expect("entry").path();
                assert!(path.is_dir(), "unexpected file {}", path.display());
                pending.push(path);
            }
        }

        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn second_run_is_a_no_op() {
        let root = test_temp_root("idempotent");
        ensure_directories(&root).expect("first run");
        // Drop a marker file; a second run must not disturb existing content.
        let marker = root.join("saves").join("slot0.dat");
        fs::write(&marker, b"progress").expect("marker");

        ensure_directories(&root).expect("second run");
        assert_eq!(fs::read(&marker).expect("marker survives"), b"progress");

        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn unwritable_root_is_fatal() {
        // A root that collides with an existing *file* makes create_dir_all
        // fail on every platform without needing permission tricks.
        let root = test_temp_root("collision");
        fs::write(&root, b"in the way").expect("blocker file");

        let err = ensure_directories(&root).expect_err("must fail");
        assert!(matches!(err, AssetError::Io { .. }));

        fs::remove_file(&root).ok();
    }
}
