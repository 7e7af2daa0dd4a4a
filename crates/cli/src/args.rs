use clap::{Parser, ValueEnum};
use larum_config::{ConfigResult, VmSettings};
use std::path::PathBuf;

/// Command-line arguments for the Larum runner
#[derive(Parser, Debug, Clone)]
#[command(
    name = "larum",
    version = env!("CARGO_PKG_VERSION"),
    about = "Larum - boots and runs a Larum VM image",
    long_about = "Loads a Larum boot image into memory, verifies its magic and checksum, runs it until a built-in halts the machine or it faults, and prints the final data stack."
)]
pub struct CliArgs {
    /// The boot image to run
    #[arg(value_name = "IMAGE")]
    pub image: PathBuf,

    /// Specifies a TOML settings file
    #[arg(short = 'c', long = "config", value_name = "FILE", env = "LARUM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Memory capacity in words
    #[arg(long = "ram-size", value_name = "WORDS")]
    pub ram_size: Option<usize>,

    /// Data stack capacity
    #[arg(long = "data-stack-size", value_name = "WORDS")]
    pub data_stack_size: Option<usize>,

    /// Return stack capacity
    #[arg(long = "return-stack-size", value_name = "WORDS")]
    pub return_stack_size: Option<usize>,

    /// Fault after this many executed opcodes
    #[arg(long = "max-steps", value_name = "COUNT")]
    pub max_steps: Option<u64>,

    /// Log level; overrides RUST_LOG
    #[arg(long = "log-level", value_enum)]
    pub log_level: Option<LogLevel>,
}

/// Log level enumeration
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Trace level logging
    Trace,
    /// Debug level logging
    Debug,
    /// Info level logging
    Info,
    /// Warning level logging
    Warn,
    /// Error level logging
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

impl CliArgs {
    /// Builds the VM settings: the config file (or defaults), then flags.
    pub fn settings(&self) -> ConfigResult<VmSettings> {
        let mut settings = match &self.config {
            Some(path) => VmSettings::load(path)?,
            None => VmSettings::default(),
        };

        if let Some(ram_size) = self.ram_size {
            settings.ram_size = ram_size;
        }
        if let Some(data_stack_size) = self.data_stack_size {
            settings.data_stack_size = data_stack_size;
        }
        if let Some(return_stack_size) = self.return_stack_size {
            settings.return_stack_size = return_stack_size;
        }
        if self.max_steps.is_some() {
            settings.max_steps = self.max_steps;
        }

        settings.validate()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use larum_config::{ConfigError, DEFAULT_DATA_STACK_SIZE, DEFAULT_RAM_SIZE};

    #[test]
    fn test_cli_args_default() {
        let args = CliArgs::parse_from(["larum", "boot.lrm"]);
        assert_eq!(args.image, PathBuf::from("boot.lrm"));
        assert_eq!(args.log_level, None);
        assert_eq!(args.ram_size, None);
        assert_eq!(args.max_steps, None);

        let settings = args.settings().unwrap();
        assert_eq!(settings.ram_size, DEFAULT_RAM_SIZE);
        assert_eq!(settings.data_stack_size, DEFAULT_DATA_STACK_SIZE);
    }

    #[test]
    fn test_flags_override_defaults() {
        let args = CliArgs::parse_from([
            "larum",
            "--ram-size",
            "64",
            "--return-stack-size",
            "8",
            "--max-steps",
            "1000",
            "--log-level",
            "debug",
            "boot.lrm",
        ]);

        assert_eq!(args.log_level, Some(LogLevel::Debug));
        let settings = args.settings().unwrap();
        assert_eq!(settings.ram_size, 64);
        assert_eq!(settings.return_stack_size, 8);
        assert_eq!(settings.max_steps, Some(1000));
    }

    #[test]
    fn test_invalid_override_rejected() {
        let args = CliArgs::parse_from(["larum", "--data-stack-size", "0", "boot.lrm"]);
        assert!(matches!(args.settings(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_image_is_required() {
        assert!(CliArgs::try_parse_from(["larum"]).is_err());
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(tracing::Level::from(LogLevel::Trace), tracing::Level::TRACE);
        assert_eq!(tracing::Level::from(LogLevel::Debug), tracing::Level::DEBUG);
        assert_eq!(tracing::Level::from(LogLevel::Info), tracing::Level::INFO);
        assert_eq!(tracing::Level::from(LogLevel::Warn), tracing::Level::WARN);
        assert_eq!(tracing::Level::from(LogLevel::Error), tracing::Level::ERROR);
    }
}
