use std::env;
use std::fs;
use std::path::PathBuf;

const ROOT_ENV: &str = "C3_ROOT";
const DATA_DIR_ENV: &str = "C3_DATA_DIR";

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub project_root: PathBuf,
    pub user_data_dir: PathBuf,
    pub log_dir: PathBuf,
    pub secrets_path: PathBuf,
}

impl AppPaths {
    /// `C3_ROOT` (or the working directory) holds `config.yml`; `C3_DATA_DIR`
    /// moves secrets and logs elsewhere.
    pub fn new() -> Self {
        let (project_root, user_data_dir) = resolve_dirs(
            env::var_os(ROOT_ENV).map(PathBuf::from),
            env::var_os(DATA_DIR_ENV).map(PathBuf::from),
            env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        );
        Self::from_dirs(project_root, user_data_dir)
    }

    /// Paths rooted at a single directory (config, secrets and logs side by side).
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self::from_dirs(root.clone(), root)
    }

    fn from_dirs(project_root: PathBuf, user_data_dir: PathBuf) -> Self {
        let log_dir = user_data_dir.join("logs");
        let secrets_path = user_data_dir.join("secrets.yaml");

        for dir in [&user_data_dir, &log_dir] {
            let _ = fs::create_dir_all(dir);
        }

        AppPaths {
            project_root,
            user_data_dir,
            log_dir,
            secrets_path,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve_dirs(
    root: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    cwd: PathBuf,
) -> (PathBuf, PathBuf) {
    let project_root = root.unwrap_or(cwd);
    let user_data_dir = data_dir.unwrap_or_else(|| project_root.clone());
    (project_root, user_data_dir)
}
