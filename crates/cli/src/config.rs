use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Overrides the notes directory.
pub const PATH_ENV: &str = "MANAGER_NOTES_PATH";
/// Points at an alternative config file.
pub const CONFIG_ENV: &str = "MANAGER_NOTES_CONFIG";
pub const EDITOR_ENV: &str = "EDITOR";
pub const DEFAULT_LIST_LIMIT: usize = 50;

const APP_DIR: &str = "manager-notes";
const CONFIG_FILE: &str = "config.toml";

/// Resolved settings for one invocation.
#[derive(Clone, Debug, PartialEq)]
pub struct NotesConfig {
    pub notes_dir: PathBuf,
    pub editor: Option<String>,
    pub list_limit: usize,
}

/// Values given on the command line; they win over everything else.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub notes_dir: Option<PathBuf>,
    pub config_file: Option<PathBuf>,
    pub editor: Option<String>,
    pub list_limit: Option<usize>,
}

/// Snapshot of the process environment the config depends on.
#[derive(Clone, Debug, Default)]
pub struct ConfigEnv {
    pub notes_path: Option<String>,
    pub config_path: Option<String>,
    pub editor: Option<String>,
    pub home_dir: Option<PathBuf>,
    pub config_dir: Option<PathBuf>,
}

impl ConfigEnv {
    pub fn from_process() -> Self {
        Self {
            notes_path: non_empty_var(PATH_ENV),
            config_path: non_empty_var(CONFIG_ENV),
            editor: non_empty_var(EDITOR_ENV),
            home_dir: dirs::home_dir(),
            config_dir: dirs::config_dir(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    path: Option<PathBuf>,
    editor: Option<String>,
    list_limit: Option<usize>,
}

impl NotesConfig {
    /// Merge flags, environment, config file and defaults (in that order).
    pub fn resolve(overrides: ConfigOverrides, env: &ConfigEnv) -> Result<Self> {
        let file = Self::load_file(&overrides, env)?;
        let home = env.home_dir.as_deref();

        let notes_dir = overrides
            .notes_dir
            .or_else(|| env.notes_path.as_ref().map(PathBuf::from))
            .or(file.path)
            .map(|path| expand_home(&path, home))
            .unwrap_or_else(|| default_notes_dir(home));

        let editor = overrides
            .editor
            .or_else(|| env.editor.clone())
            .or(file.editor)
            .filter(|cmd| !cmd.trim().is_empty());

        let list_limit = overrides
            .list_limit
            .or(file.list_limit)
            .unwrap_or(DEFAULT_LIST_LIMIT);

        log::debug!(
            "Resolved config: notes_dir={}, editor={editor:?}, list_limit={list_limit}",
            notes_dir.display()
        );
        Ok(Self {
            notes_dir,
            editor,
            list_limit,
        })
    }

    fn load_file(overrides: &ConfigOverrides, env: &ConfigEnv) -> Result<ConfigFile> {
        let explicit = overrides
            .config_file
            .clone()
            .or_else(|| env.config_path.as_ref().map(PathBuf::from));

        let (path, required) = match explicit {
            Some(path) => (expand_home(&path, env.home_dir.as_deref()), true),
            None => match &env.config_dir {
                Some(dir) => (dir.join(APP_DIR).join(CONFIG_FILE), false),
                None => return Ok(ConfigFile::default()),
            },
        };

        if !required && !path.exists() {
            return Ok(ConfigFile::default());
        }

        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read config file {}", path.display()))?;
        let file: ConfigFile = toml::from_str(&raw)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        log::debug!("Loaded config file {}", path.display());
        Ok(file)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn default_notes_dir(home: Option<&Path>) -> PathBuf {
    home.map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("notes")
        .join("manager")
}

/// Expand a leading `~` component against `home`.
fn expand_home(path: &Path, home: Option<&Path>) -> PathBuf {
    match (path.strip_prefix("~"), home) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn env_with_home(home: &Path) -> ConfigEnv {
        ConfigEnv {
            home_dir: Some(home.to_path_buf()),
            ..ConfigEnv::default()
        }
    }

    #[test]
    fn defaults_to_notes_under_home() {
        let env = env_with_home(Path::new("/home/ada"));

        let cfg = NotesConfig::resolve(ConfigOverrides::default(), &env).unwrap();

        assert_eq!(
            cfg,
            NotesConfig {
                notes_dir: PathBuf::from("/home/ada/notes/manager"),
                editor: None,
                list_limit: DEFAULT_LIST_LIMIT,
            }
        );
    }

    #[test]
    fn flag_beats_environment_beats_file() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("config.toml");
        fs::write(&file, "path = \"/from/file\"\neditor = \"vim\"\nlist_limit = 5\n").unwrap();

        let mut env = env_with_home(Path::new("/home/ada"));
        env.config_path = Some(file.display().to_string());

        let from_file = NotesConfig::resolve(ConfigOverrides::default(), &env).unwrap();
        assert_eq!(from_file.notes_dir, PathBuf::from("/from/file"));
        assert_eq!(from_file.editor.as_deref(), Some("vim"));
        assert_eq!(from_file.list_limit, 5);

        env.notes_path = Some("/from/env".to_string());
        env.editor = Some("nano".to_string());
        let from_env = NotesConfig::resolve(ConfigOverrides::default(), &env).unwrap();
        assert_eq!(from_env.notes_dir, PathBuf::from("/from/env"));
        assert_eq!(from_env.editor.as_deref(), Some("nano"));

        let overrides = ConfigOverrides {
            notes_dir: Some(PathBuf::from("/from/flag")),
            editor: Some("hx".to_string()),
            list_limit: Some(7),
            ..ConfigOverrides::default()
        };
        let from_flag = NotesConfig::resolve(overrides, &env).unwrap();
        assert_eq!(from_flag.notes_dir, PathBuf::from("/from/flag"));
        assert_eq!(from_flag.editor.as_deref(), Some("hx"));
        assert_eq!(from_flag.list_limit, 7);
    }

    #[test]
    fn expands_tilde_against_home() {
        let mut env = env_with_home(Path::new("/home/ada"));
        env.notes_path = Some("~/work/notes".to_string());

        let cfg = NotesConfig::resolve(ConfigOverrides::default(), &env).unwrap();

        assert_eq!(cfg.notes_dir, PathBuf::from("/home/ada/work/notes"));
    }

    #[test]
    fn missing_default_config_file_is_ignored() {
        let temp = tempdir().unwrap();
        let mut env = env_with_home(Path::new("/home/ada"));
        env.config_dir = Some(temp.path().to_path_buf());

        assert!(NotesConfig::resolve(ConfigOverrides::default(), &env).is_ok());
    }

    #[test]
    fn default_config_file_is_read_from_config_dir() {
        let temp = tempdir().unwrap();
        let app_dir = temp.path().join(APP_DIR);
        fs::create_dir_all(&app_dir).unwrap();
        fs::write(app_dir.join(CONFIG_FILE), "list_limit = 3\n").unwrap();
        let mut env = env_with_home(Path::new("/home/ada"));
        env.config_dir = Some(temp.path().to_path_buf());

        let cfg = NotesConfig::resolve(ConfigOverrides::default(), &env).unwrap();

        assert_eq!(cfg.list_limit, 3);
    }

    #[test]
    fn explicit_config_file_must_exist_and_parse() {
        let temp = tempdir().unwrap();
        let env = env_with_home(Path::new("/home/ada"));

        let missing = ConfigOverrides {
            config_file: Some(temp.path().join("nope.toml")),
            ..ConfigOverrides::default()
        };
        assert!(NotesConfig::resolve(missing, &env).is_err());

        let bad = temp.path().join("bad.toml");
        fs::write(&bad, "colour = \"blue\"\n").unwrap();
        let unknown_key = ConfigOverrides {
            config_file: Some(bad),
            ..ConfigOverrides::default()
        };
        let err = NotesConfig::resolve(unknown_key, &env).unwrap_err();
        assert!(err.to_string().contains("Invalid config file"));
    }
}
