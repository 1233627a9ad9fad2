//! CLI argument definitions for the MindWell server.
//!
//! Uses `clap` with derive macros for argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

use mindwell_core::UiVariant;

pub const ENV_CONFIG: &str = "MINDWELL_CONFIG";
pub const ENV_PORT: &str = "MINDWELL_PORT";
pub const ENV_SPEECH_API_KEY: &str = "MINDWELL_SPEECH_API_KEY";

const DEFAULT_PORT: u16 = 8501;

/// MindWell - a multilingual mental-health support chat server.
#[derive(Parser, Debug, Default)]
#[command(name = "mindwell", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// HTTP server port.
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,

    /// Address to bind, e.g. 0.0.0.0 to accept remote connections.
    #[arg(long = "host")]
    pub host: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Front end to serve: text or voice.
    #[arg(long = "variant")]
    pub variant: Option<UiVariant>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > MINDWELL_CONFIG env var > ./mindwell.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        self.resolve_config_path_with(env_var)
    }

    /// Resolve the server port.
    ///
    /// Priority: --port flag > MINDWELL_PORT env var > config file value > 8501.
    pub fn resolve_port(&self, config_port: u16) -> u16 {
        self.resolve_port_with(config_port, env_var)
    }

    /// Resolve the speech API key.
    ///
    /// Priority: MINDWELL_SPEECH_API_KEY env var > config file value.
    pub fn resolve_speech_api_key(&self, config_key: &str) -> String {
        self.resolve_speech_api_key_with(config_key, env_var)
    }

    /// Resolve the bind address. Priority: --host flag > config file value.
    pub fn resolve_host(&self, config_host: &str) -> String {
        self.host.clone().unwrap_or_else(|| config_host.to_string())
    }

    /// Resolve the log level. Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }

    /// Resolve the UI variant. Priority: --variant flag > config file value.
    pub fn resolve_variant(&self, config_variant: UiVariant) -> UiVariant {
        self.variant.unwrap_or(config_variant)
    }

    // -- Resolution against an explicit environment --

    fn resolve_config_path_with(&self, env: impl Fn(&str) -> Option<String>) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Some(p) = env(ENV_CONFIG) {
            return PathBuf::from(p);
        }
        PathBuf::from("mindwell.toml")
    }

    fn resolve_port_with(&self, config_port: u16, env: impl Fn(&str) -> Option<String>) -> u16 {
        if let Some(p) = self.port {
            return p;
        }
        if let Some(p) = env(ENV_PORT).and_then(|v| v.parse::<u16>().ok()) {
            return p;
        }
        if config_port != 0 {
            return config_port;
        }
        DEFAULT_PORT
    }

    fn resolve_speech_api_key_with(
        &self,
        config_key: &str,
        env: impl Fn(&str) -> Option<String>,
    ) -> String {
        env(ENV_SPEECH_API_KEY)
            .filter(|k| !k.trim().is_empty())
            .unwrap_or_else(|| config_key.to_string())
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn env_with(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |name: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_parse_flags() {
        let args = CliArgs::parse_from([
            "mindwell",
            "--config",
            "/etc/mindwell.toml",
            "--port",
            "9000",
            "--host",
            "0.0.0.0",
            "--log-level",
            "debug",
            "--variant",
            "voice",
        ]);
        assert_eq!(args.config, Some(PathBuf::from("/etc/mindwell.toml")));
        assert_eq!(args.port, Some(9000));
        assert_eq!(args.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert_eq!(args.variant, Some(UiVariant::Voice));
    }

    #[test]
    fn test_invalid_variant_is_rejected() {
        assert!(CliArgs::try_parse_from(["mindwell", "--variant", "video"]).is_err());
    }

    #[test]
    fn test_config_path_priority() {
        let env = env_with(&[(ENV_CONFIG, "/from/env.toml")]);

        let flag = CliArgs {
            config: Some(PathBuf::from("/from/flag.toml")),
            ..CliArgs::default()
        };
        assert_eq!(flag.resolve_config_path_with(&env), PathBuf::from("/from/flag.toml"));

        let bare = CliArgs::default();
        assert_eq!(bare.resolve_config_path_with(&env), PathBuf::from("/from/env.toml"));
        assert_eq!(bare.resolve_config_path_with(no_env), PathBuf::from("mindwell.toml"));
    }

    #[test]
    fn test_port_priority() {
        let env = env_with(&[(ENV_PORT, "7000")]);

        let flag = CliArgs {
            port: Some(9000),
            ..CliArgs::default()
        };
        assert_eq!(flag.resolve_port_with(8501, &env), 9000);

        let bare = CliArgs::default();
        assert_eq!(bare.resolve_port_with(8600, &env), 7000);
        assert_eq!(bare.resolve_port_with(8600, no_env), 8600);
        assert_eq!(bare.resolve_port_with(0, no_env), DEFAULT_PORT);
    }

    #[test]
    fn test_bad_port_env_falls_through() {
        let env = env_with(&[(ENV_PORT, "not-a-port")]);
        assert_eq!(CliArgs::default().resolve_port_with(8600, env), 8600);
    }

    #[test]
    fn test_speech_key_priority() {
        let bare = CliArgs::default();
        let env = env_with(&[(ENV_SPEECH_API_KEY, "env-key")]);
        assert_eq!(bare.resolve_speech_api_key_with("file-key", env), "env-key");
        assert_eq!(bare.resolve_speech_api_key_with("file-key", no_env), "file-key");

        let blank = env_with(&[(ENV_SPEECH_API_KEY, "  ")]);
        assert_eq!(bare.resolve_speech_api_key_with("file-key", blank), "file-key");
    }

    #[test]
    fn test_flag_only_settings() {
        let bare = CliArgs::default();
        assert_eq!(bare.resolve_host("127.0.0.1"), "127.0.0.1");
        assert_eq!(bare.resolve_log_level("info"), "info");
        assert_eq!(bare.resolve_variant(UiVariant::Text), UiVariant::Text);

        let args = CliArgs {
            host: Some("0.0.0.0".into()),
            log_level: Some("warn".into()),
            variant: Some(UiVariant::Voice),
            ..CliArgs::default()
        };
        assert_eq!(args.resolve_host("127.0.0.1"), "0.0.0.0");
        assert_eq!(args.resolve_log_level("info"), "warn");
        assert_eq!(args.resolve_variant(UiVariant::Text), UiVariant::Voice);
    }
}
