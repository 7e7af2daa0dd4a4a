//! Config integration tests
//!
//! These tests exercise loading VM settings from files on disk.

mod settings_file_tests {
    use larum_config::{ConfigError, VmSettings, MAX_RAM_SIZE};
    use std::io::Write;

    #[test]
    fn test_load_full_settings_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "ram_size = 1024\ndata_stack_size = 16\nreturn_stack_size = 8\nmax_steps = 5000"
        )
        .unwrap();

        let settings = VmSettings::load(file.path()).unwrap();
        assert_eq!(
            settings,
            VmSettings {
                ram_size: 1024,
                data_stack_size: 16,
                return_stack_size: 8,
                max_steps: Some(5000),
            }
        );
    }

    #[test]
    fn test_empty_file_yields_defaults() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let settings = VmSettings::load(file.path()).unwrap();
        assert_eq!(settings, VmSettings::default());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = VmSettings::load(dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "ram_size = \"lots\"").unwrap();

        let result = VmSettings::load(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_oversized_memory_rejected() {
        let settings = VmSettings {
            ram_size: MAX_RAM_SIZE + 1,
            ..VmSettings::default()
        };
        assert!(matches!(settings.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_zero_step_limit_rejected() {
        let result = VmSettings::from_toml_str("max_steps = 0\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }
}
