use std::path::{Path, PathBuf};

pub type Result<T> = std::result::Result<T, String>;

pub fn handle_error_and_exit(err: String) -> ! {
    log::error!("{}", err);
    std::process::exit(1);
}

/// Timestamp appended to backups written before a document is overwritten.
pub fn backup_timestamp() -> String {
    chrono::Local::now().format("%m.%d.%y_%H.%M").to_string()
}

/// `tree.svg` becomes `tree.svg.MM.DD.YY_HH.MM`.
pub fn backup_path(path: &Path, timestamp: &str) -> PathBuf {
    let mut file_name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    file_name.push(".");
    file_name.push(timestamp);
    path.with_file_name(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backup_path_appends_timestamp() {
        let path = Path::new("/data/project/tree.svg");
        assert_eq!(
            backup_path(path, "10.18.26_14.05"),
            PathBuf::from("/data/project/tree.svg.10.18.26_14.05")
        );
    }

    #[test]
    fn test_backup_timestamp_shape() {
        let stamp = backup_timestamp();
        assert_eq!(stamp.len(), "MM.DD.YY_HH.MM".len());
        assert_eq!(stamp.matches('.').count(), 3);
        assert!(stamp.contains('_'));
    }
}
