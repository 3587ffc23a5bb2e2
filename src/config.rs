// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Configuration loaded from TOML: naming patterns, solution layout, and archiver settings.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::Deserialize;

use crate::error::{PackError, PackResult};
use crate::utils::sanitize_component;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "SHEETPACK_CONFIG";

/// File name looked up in the root directory when no config is given.
pub const CONFIG_FILE_NAME: &str = "sheetpack.toml";

/// Placeholder in `archive_pattern` replaced by the escaped archive extension.
pub const EXTENSION_PLACEHOLDER: &str = "{ext}";

/// Which archiver implementation builds the output files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiverBackend {
    /// Spawn the external program (`jar` by default).
    #[default]
    Command,
    /// Write the ZIP in-process.
    Zip,
}

/// External archiver settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ArchiverConfig {
    pub backend: ArchiverBackend,
    pub program: String,
    /// Bundled create/verbose/file flags passed as the first argument.
    pub flags: String,
}

impl Default for ArchiverConfig {
    fn default() -> Self {
        Self {
            backend: ArchiverBackend::Command,
            program: "jar".to_string(),
            flags: "cvf".to_string(),
        }
    }
}

/// Raw configuration as written in `sheetpack.toml`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Matches exercise folder names; group 1 captures the exercise number.
    pub folder_pattern: String,
    /// Matches archive file names; group 1 captures the matriculation number.
    /// `{ext}` stands for `archive_extension`.
    pub archive_pattern: String,
    /// Subdirectory of each exercise folder whose contents are packed.
    pub solution_dir: PathBuf,
    /// Note appended to every archive. Relative paths resolve against the root.
    pub note_file: PathBuf,
    /// Archive name prefix used when no matriculation number is supplied.
    pub default_label: String,
    /// Extension of built archives, without the leading dot.
    pub archive_extension: String,
    /// Zero-padding width for exercise numbers in archive names.
    pub number_width: usize,
    pub archiver: ArchiverConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            folder_pattern: r"(?i)^exercise[_-]?(\d+)$".to_string(),
            archive_pattern: r"^(\d+)_\d+\.{ext}$".to_string(),
            solution_dir: PathBuf::from("solution"),
            note_file: PathBuf::from("note.txt"),
            default_label: "solution".to_string(),
            archive_extension: "zip".to_string(),
            number_width: 2,
            archiver: ArchiverConfig::default(),
        }
    }
}

impl Config {
    /// Parse a TOML document; missing keys fall back to the defaults.
    pub fn from_toml_str(content: &str) -> PackResult<Self> {
        toml::from_str(content).map_err(|err| PackError::Config(err.to_string()))
    }

    /// Read and parse a config file.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::PathNotFound`] for a missing file, [`PackError::Io`]
    /// when it cannot be read and [`PackError::Config`] for invalid TOML.
    pub fn load(path: &Path) -> PackResult<Self> {
        if !path.exists() {
            return Err(PackError::PathNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path).map_err(|err| PackError::io(path, err))?;
        Self::from_toml_str(&content).map_err(|err| match err {
            PackError::Config(msg) => PackError::Config(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    /// Resolve the config for a run.
    ///
    /// Lookup order: explicit path, `$SHEETPACK_CONFIG`, `<root>/sheetpack.toml`,
    /// then the built-in defaults.
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`] for whichever file is picked.
    pub fn discover(explicit: Option<&Path>, root: &Path) -> PackResult<Self> {
        Self::discover_with(explicit, std::env::var_os(CONFIG_ENV), root)
    }

    /// [`Config::discover`] with the environment value passed in.
    fn discover_with(
        explicit: Option<&Path>,
        env_path: Option<OsString>,
        root: &Path,
    ) -> PackResult<Self> {
        if let Some(path) = explicit {
            tracing::debug!(config = %path.display(), "loading config from argument");
            return Self::load(path);
        }
        if let Some(path) = env_path.filter(|v| !v.is_empty()) {
            let path = PathBuf::from(path);
            tracing::debug!(config = %path.display(), "loading config from {}", CONFIG_ENV);
            return Self::load(&path);
        }
        let local = root.join(CONFIG_FILE_NAME);
        if local.is_file() {
            tracing::debug!(config = %local.display(), "loading config from root");
            return Self::load(&local);
        }
        tracing::debug!("using built-in config");
        Ok(Self::default())
    }

    /// Compile the patterns and resolve paths against `root`.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::InvalidPattern`] when a pattern does not compile or
    /// has no capturing group, and [`PackError::Config`] for an empty archive
    /// extension or a non-relative solution directory.
    pub fn resolve(&self, root: &Path) -> PackResult<Settings> {
        let extension = self.archive_extension.trim_start_matches('.');
        if extension.is_empty() {
            return Err(PackError::Config(
                "archive_extension must not be empty".to_string(),
            ));
        }

        let folder_pattern = compile_pattern("folder_pattern", &self.folder_pattern)?;
        let archive_pattern = compile_pattern(
            "archive_pattern",
            &self
                .archive_pattern
                .replace(EXTENSION_PLACEHOLDER, &regex::escape(extension)),
        )?;
        if !self.archive_pattern.contains(EXTENSION_PLACEHOLDER)
            && !self.archive_pattern.contains(extension)
        {
            tracing::warn!(
                pattern = %self.archive_pattern,
                extension,
                "archive_pattern does not mention the archive extension; use {} to follow it",
                EXTENSION_PLACEHOLDER
            );
        }
        if self.solution_dir.as_os_str().is_empty() || self.solution_dir.is_absolute() {
            return Err(PackError::Config(format!(
                "solution_dir must be a relative path, got {:?}",
                self.solution_dir
            )));
        }

        let note_file = if self.note_file.is_absolute() {
            self.note_file.clone()
        } else {
            root.join(&self.note_file)
        };

        Ok(Settings {
            folder_pattern,
            archive_pattern,
            solution_dir: self.solution_dir.clone(),
            note_file,
            default_label: sanitize_component(&self.default_label),
            archive_extension: extension.to_string(),
            number_width: self.number_width,
            archiver: self.archiver.clone(),
        })
    }
}

/// Validated configuration with compiled patterns, ready for use by the core.
#[derive(Clone, Debug)]
pub struct Settings {
    pub folder_pattern: Regex,
    pub archive_pattern: Regex,
    pub solution_dir: PathBuf,
    pub note_file: PathBuf,
    pub default_label: String,
    pub archive_extension: String,
    pub number_width: usize,
    pub archiver: ArchiverConfig,
}

impl Settings {
    /// Defaults resolved against `root`.
    #[cfg(test)]
    pub fn defaults_for(root: &Path) -> PackResult<Self> {
        Config::default().resolve(root)
    }

    /// Glob excluding previously built archives.
    pub fn archive_glob(&self) -> String {
        format!("*.{}", self.archive_extension)
    }

    /// Zero-padded exercise number as used in archive names.
    pub fn padded(&self, number: u32) -> String {
        format!("{:0width$}", number, width = self.number_width)
    }
}

/// Compile `pattern` and require at least one capturing group.
fn compile_pattern(name: &'static str, pattern: &str) -> PackResult<Regex> {
    let regex = Regex::new(pattern).map_err(|err| PackError::InvalidPattern {
        name,
        pattern: pattern.to_string(),
        reason: err.to_string(),
    })?;
    // captures_len counts the implicit whole-match group.
    if regex.captures_len() < 2 {
        return Err(PackError::InvalidPattern {
            name,
            pattern: pattern.to_string(),
            reason: "pattern needs a capturing group".to_string(),
        });
    }
    Ok(regex)
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::{ArchiverBackend, Config};
    use crate::error::PackError;

    #[test]
    fn defaults_resolve_and_pad_to_two_digits() {
        let settings = Config::default().resolve(Path::new("/data")).unwrap();

        assert_eq!(settings.padded(3), "03");
        assert_eq!(settings.padded(12), "12");
        assert_eq!(settings.archive_glob(), "*.zip");
        assert_eq!(settings.note_file, PathBuf::from("/data/note.txt"));
        assert!(settings.folder_pattern.is_match("Exercise_07"));
    }

    // Partial files keep defaults for every key they leave out.
    #[test]
    fn partial_toml_keeps_remaining_defaults() {
        let config = Config::from_toml_str(
            r#"
            folder_pattern = '^blatt(\d+)$'
            number_width = 3

            [archiver]
            backend = "zip"
            "#,
        )
        .unwrap();

        assert_eq!(config.folder_pattern, r"^blatt(\d+)$");
        assert_eq!(config.number_width, 3);
        assert_eq!(config.archiver.backend, ArchiverBackend::Zip);
        assert_eq!(config.archiver.program, "jar");
        assert_eq!(config.solution_dir, PathBuf::from("solution"));
    }

    #[test]
    fn pattern_without_capture_group_is_rejected() {
        let config = Config {
            folder_pattern: r"^exercise_\d+$".into(),
            ..Config::default()
        };

        let err = config.resolve(Path::new("/data")).unwrap_err();
        assert!(matches!(
            err,
            PackError::InvalidPattern {
                name: "folder_pattern",
                ..
            }
        ));
    }

    #[test]
    fn malformed_pattern_is_rejected() {
        let config = Config {
            archive_pattern: r"^(\d+".into(),
            ..Config::default()
        };

        let err = config.resolve(Path::new("/data")).unwrap_err();
        assert!(matches!(
            err,
            PackError::InvalidPattern {
                name: "archive_pattern",
                ..
            }
        ));
    }

    #[test]
    fn absolute_solution_dir_is_rejected() {
        let config = Config {
            solution_dir: PathBuf::from("/abs/solution"),
            ..Config::default()
        };

        assert!(matches!(
            config.resolve(Path::new("/data")),
            Err(PackError::Config(_))
        ));
    }

    #[test]
    fn default_label_is_sanitized() {
        let config = Config {
            default_label: "Lösung Gruppe 4".into(),
            ..Config::default()
        };

        let settings = config.resolve(Path::new("/data")).unwrap();
        assert_eq!(settings.default_label, "Losung_Gruppe_4");
    }

    #[test]
    fn discover_prefers_config_in_root() {
        use tempfile::TempDir;

        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join(super::CONFIG_FILE_NAME),
            "default_label = \"abgabe\"\n",
        )
        .unwrap();

        let config = Config::discover_with(None, None, tmp.path()).unwrap();
        assert_eq!(config.default_label, "abgabe");
    }

    // An empty environment value counts as unset.
    #[test]
    fn discover_env_path_wins_over_root_file() {
        use tempfile::TempDir;

        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join(super::CONFIG_FILE_NAME),
            "default_label = \"root\"\n",
        )
        .unwrap();
        let env_file = tmp.path().join("env.toml");
        std::fs::write(&env_file, "default_label = \"env\"\n").unwrap();

        let from_env =
            Config::discover_with(None, Some(env_file.into_os_string()), tmp.path()).unwrap();
        let empty_env = Config::discover_with(None, Some("".into()), tmp.path()).unwrap();

        assert_eq!(from_env.default_label, "env");
        assert_eq!(empty_env.default_label, "root");
    }

    #[test]
    fn default_archive_pattern_follows_extension() {
        let config = Config {
            archive_extension: "jar".into(),
            ..Config::default()
        };

        let settings = config.resolve(Path::new("/data")).unwrap();
        assert!(settings.archive_pattern.is_match("4711_02.jar"));
        assert!(!settings.archive_pattern.is_match("4711_02.zip"));

        let zip = Config::default().resolve(Path::new("/data")).unwrap();
        let caps = zip.archive_pattern.captures("012345_03.zip").unwrap();
        assert_eq!(&caps[1], "012345");
        assert!(!zip.archive_pattern.is_match("4711_03xzip"));
    }

    #[test]
    fn load_missing_file_is_path_not_found() {
        let err = Config::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, PackError::PathNotFound(_)));
    }
}
