//! Tests for the logger module

use crate::logger::config::*;
use std::path::PathBuf;

mod config_tests {
    use super::*;

    fn console_only() -> LoggerConfig {
        LoggerConfig {
            console: ConsoleConfig::new(true, false),
            file: FileConfig {
                enabled: false,
                path: PathBuf::from("test.log"),
                append: true,
                format: LogFormat::Full,
            },
            level: "info".to_string(),
        }
    }

    #[test]
    fn test_default_config() {
        let config = LoggerConfig::default();
        assert!(config.console.enabled);
        assert!(config.console.colored);
        assert!(!config.file.enabled);
        assert_eq!(config.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_no_outputs_fails() {
        let mut config = console_only();
        assert!(config.validate().is_ok());

        config.console.enabled = false;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_path_fails_when_file_enabled() {
        let mut config = console_only();
        config.file.enabled = true;
        config.file.path = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("compact".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert_eq!(LogFormat::default(), LogFormat::Full);
        assert!("xml".parse::<LogFormat>().is_err());
    }
}

mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn property_valid_levels_parse(
            level in prop::sample::select(vec!["trace", "DEBUG", "Info", "warn", "error"])
        ) {
            let config = LoggerConfig {
                level: level.to_string(),
                ..LoggerConfig::default()
            };
            prop_assert!(config.validate().is_ok());
        }

        #[test]
        fn property_unknown_levels_fail(level in "[a-z]{6,10}") {
            prop_assume!(!["trace", "debug", "info", "warn", "error"].contains(&level.as_str()));
            let config = LoggerConfig {
                level,
                ..LoggerConfig::default()
            };
            prop_assert!(config.validate().is_err());
        }
    }
}

mod writer_tests {
    use super::*;
    use crate::logger::writer::open_log_file;
    use std::io::Write;
    use tempfile::tempdir;

    fn file_config(path: PathBuf, append: bool) -> FileConfig {
        FileConfig::new(true, path, append, LogFormat::Json).unwrap()
    }

    #[test]
    fn test_creates_missing_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("logs").join("app.log");

        let writer = open_log_file(&file_config(path.clone(), true)).unwrap();
        writer.lock().unwrap().write_all(b"line\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "line\n");
    }

    #[test]
    fn test_append_mode_keeps_existing_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        std::fs::write(&path, "first\n").unwrap();

        let writer = open_log_file(&file_config(path.clone(), true)).unwrap();
        writer.lock().unwrap().write_all(b"second\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn test_truncate_mode_replaces_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        std::fs::write(&path, "stale\n").unwrap();

        let writer = open_log_file(&file_config(path.clone(), false)).unwrap();
        writer.lock().unwrap().write_all(b"fresh\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "fresh\n");
    }
}
