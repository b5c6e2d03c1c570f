// Security: directory access validation before any rename is committed

use crate::error::RenameError;
use std::path::Path;

// Fails with AccessDenied unless entries in `dir` can be renamed
pub fn ensure_writable(dir: &Path) -> Result<(), RenameError> {
    let dir = if dir.as_os_str().is_empty() {
        Path::new(".")
    } else {
        dir
    };

    if can_write_to_directory(dir) {
        Ok(())
    } else {
        Err(RenameError::AccessDenied(dir.to_path_buf()))
    }
}

// Renaming needs write and search permission on the directory
#[cfg(unix)]
fn can_write_to_directory(dir: &Path) -> bool {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    if !dir.is_dir() {
        return false;
    }
    let Ok(c_path) = CString::new(dir.as_os_str().as_bytes()) else {
        return false;
    };
    // SAFETY: c_path is a valid NUL-terminated string for the duration of the call
    unsafe { libc::access(c_path.as_ptr(), libc::W_OK | libc::X_OK) == 0 }
}

// Tests write access by creating and removing a probe file
#[cfg(not(unix))]
fn can_write_to_directory(dir: &Path) -> bool {
    use std::fs;

    if !dir.is_dir() {
        return false;
    }
    let probe = dir.join(format!(".renby_write_test_{}", std::process::id()));
    match fs::File::create(&probe) {
        Ok(file) => {
            drop(file);
            let _ = fs::remove_file(&probe);
            true
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn accepts_writable_directory() {
        let dir = TempDir::new().unwrap();
        assert!(ensure_writable(dir.path()).is_ok());
    }

    #[test]
    fn rejects_missing_directory() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("gone");
        let err = ensure_writable(&missing).unwrap_err();
        assert!(matches!(err, RenameError::AccessDenied(path) if path == missing));
    }

    #[test]
    fn empty_path_means_current_directory() {
        assert_eq!(
            ensure_writable(Path::new("")).is_ok(),
            ensure_writable(Path::new(".")).is_ok()
        );
    }
}
