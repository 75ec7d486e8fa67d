//! Level loading: format detection (RON/JSON/TOML), deserialization and
//! validation.

use crate::schema::{LevelFile, LoadedLevel};
use pdogs_core::config::ConfigError;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur during data loading.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// The file parsed but describes an invalid level or configuration.
    #[error("invalid level in {file}: {source}")]
    Config {
        file: PathBuf,
        #[source]
        source: ConfigError,
    },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// Deserialization
// ===========================================================================

/// Deserialize `content` in the given format. `file` is only used for
/// error reporting.
pub fn deserialize_str<T: DeserializeOwned>(
    format: Format,
    content: &str,
    file: &Path,
) -> Result<T, DataLoadError> {
    let parse_error = |detail: String| DataLoadError::Parse {
        file: file.to_path_buf(),
        detail,
    };
    match format {
        Format::Ron => ron::from_str(content).map_err(|e| parse_error(e.to_string())),
        Format::Json => serde_json::from_str(content).map_err(|e| parse_error(e.to_string())),
        Format::Toml => toml::from_str(content).map_err(|e| parse_error(e.to_string())),
    }
}

/// Read a file and deserialize it according to its format (detected from extension).
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    deserialize_str(format, &content, path)
}

/// Load and validate a level file.
pub fn load_level(path: &Path) -> Result<LoadedLevel, DataLoadError> {
    let file: LevelFile = deserialize_file(path)?;
    file.validate().map_err(|source| DataLoadError::Config {
        file: path.to_path_buf(),
        source,
    })
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pdogs_core::config::{Level, SimConfig};
    use std::fs;

    /// Create a temporary directory with a unique name for test isolation.
    fn make_test_dir(suffix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "pdogs_data_test_{suffix}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Clean up a test directory.
    fn cleanup(dir: &Path) {
        let _ = fs::remove_dir_all(dir);
    }

    // -----------------------------------------------------------------------
    // detect_format
    // -----------------------------------------------------------------------

    #[test]
    fn detect_format_by_extension() {
        assert_eq!(detect_format(Path::new("l.ron")).unwrap(), Format::Ron);
        assert_eq!(detect_format(Path::new("l.toml")).unwrap(), Format::Toml);
        assert_eq!(detect_format(Path::new("l.json")).unwrap(), Format::Json);
    }

    #[test]
    fn detect_format_unsupported() {
        for name in ["level.yaml", "level"] {
            assert!(matches!(
                detect_format(Path::new(name)),
                Err(DataLoadError::UnsupportedFormat { .. })
            ));
        }
    }

    // -----------------------------------------------------------------------
    // load_level
    // -----------------------------------------------------------------------

    #[test]
    fn load_level_ron() {
        let dir = make_test_dir("ron");
        let path = dir.join("level.ron");
        fs::write(
            &path,
            r#"(
    name: "sevens",
    divisor: 7,
    seed: 42,
    config: (end_tick: 600, board: (width: 20, height: 12)),
)"#,
        )
        .unwrap();

        let loaded = load_level(&path).unwrap();
        assert_eq!(loaded.name, "sevens");
        assert_eq!(loaded.level, Level::new(7, 42));
        assert_eq!(loaded.config.end_tick, 600);
        assert_eq!(loaded.config.board.width, 20);
        assert_eq!(loaded.config.board.goal_size, 4);
        assert_eq!(loaded.config.action_interval, 3);

        cleanup(&dir);
    }

    #[test]
    fn load_level_toml() {
        let dir = make_test_dir("toml");
        let path = dir.join("level.toml");
        fs::write(
            &path,
            r#"
divisor = 3
seed = 20

[config]
action_interval = 6

[config.world]
wall_count = 0
"#,
        )
        .unwrap();

        let loaded = load_level(&path).unwrap();
        assert_eq!(loaded.name, "");
        assert_eq!(loaded.level, Level::new(3, 20));
        assert_eq!(loaded.config.action_interval, 6);
        assert_eq!(loaded.config.world.wall_count, 0);
        assert_eq!(loaded.config.board, SimConfig::default().board);

        cleanup(&dir);
    }

    #[test]
    fn load_level_json() {
        let dir = make_test_dir("json");
        let path = dir.join("level.json");
        fs::write(&path, r#"{"divisor": 2, "seed": 9}"#).unwrap();

        let loaded = load_level(&path).unwrap();
        assert_eq!(loaded.level, Level::new(2, 9));
        assert_eq!(loaded.config, SimConfig::default());

        cleanup(&dir);
    }

    #[test]
    fn load_level_parse_error() {
        let dir = make_test_dir("parse_err");
        let path = dir.join("bad.ron");
        fs::write(&path, "this is not valid RON {{{").unwrap();

        assert!(matches!(load_level(&path), Err(DataLoadError::Parse { .. })));

        cleanup(&dir);
    }

    #[test]
    fn load_level_missing_field() {
        let err = deserialize_str::<LevelFile>(Format::Json, r#"{"seed": 9}"#, Path::new("x.json"))
            .unwrap_err();
        assert!(matches!(err, DataLoadError::Parse { .. }));
    }

    #[test]
    fn load_level_invalid_config() {
        let dir = make_test_dir("invalid");
        let path = dir.join("odd.json");
        fs::write(
            &path,
            r#"{"divisor": 2, "seed": 9, "config": {"board": {"width": 61}}}"#,
        )
        .unwrap();

        match load_level(&path) {
            Err(DataLoadError::Config { source, .. }) => {
                assert_eq!(source, ConfigError::OddWidth(61));
            }
            other => panic!("expected config error, got {other:?}"),
        }

        cleanup(&dir);
    }

    #[test]
    fn load_level_missing_file() {
        let result = load_level(Path::new("/nonexistent/level.ron"));
        assert!(matches!(result, Err(DataLoadError::Io(_))));
    }

    #[test]
    fn unsupported_extension_is_checked_before_reading() {
        let result = load_level(Path::new("/nonexistent/level.yaml"));
        assert!(matches!(result, Err(DataLoadError::UnsupportedFormat { .. })));
    }

    #[test]
    fn error_display_messages() {
        let err = DataLoadError::Parse {
            file: PathBuf::from("level.ron"),
            detail: "unexpected token".into(),
        };
        assert_eq!(err.to_string(), "parse error in level.ron: unexpected token");

        let err = DataLoadError::Config {
            file: PathBuf::from("level.toml"),
            source: ConfigError::ZeroDivisor,
        };
        assert_eq!(
            err.to_string(),
            "invalid level in level.toml: scoring divisor must be non-zero"
        );
    }
}
