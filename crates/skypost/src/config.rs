//! Process configuration.
//!
//! Values come from command-line flags or environment variables (a `.env`
//! file is loaded first by `main`). Secrets are hidden from `--help`
//! output and redacted from `Debug`.

use std::fmt;
use std::time::Duration;

use clap::Parser;
use skypost_link::{LinkConfig, StationConfig};
use skypost_protocol::{DEFAULT_BASE_URL, parse_record};
use skypost_session::SessionConfig;
use skypost_transport::TransportConfig;

use crate::{SequencerConfig, SkypostError};

/// Default record posted when no message is configured.
pub const DEFAULT_MESSAGE: &str = r#"{"text": "Hello from ESP32!"}"#;

/// Post one record to a Bluesky PDS.
#[derive(Parser, Clone)]
#[command(name = "skypost")]
#[command(about = "Bring the link up, authenticate, and post one record")]
pub struct Args {
    /// Account handle, e.g. alice.bsky.social
    #[arg(long, env = "BSKY_HANDLE")]
    pub handle: String,

    /// App password for the account
    #[arg(long, env = "BSKY_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// XRPC base URL
    #[arg(long, env = "BSKY_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Record to post, as a JSON object
    #[arg(long, env = "SKYPOST_MESSAGE", default_value = DEFAULT_MESSAGE)]
    pub message: String,

    /// Wireless network name (ignored by the host driver)
    #[arg(long, env = "WIFI_SSID", default_value = "")]
    pub wifi_ssid: String,

    /// Wireless passphrase
    #[arg(long, env = "WIFI_PASSWORD", default_value = "", hide_env_values = true)]
    pub wifi_password: String,

    /// Disconnects tolerated during link bring-up
    #[arg(long, env = "WIFI_MAX_RETRY", default_value = "5")]
    pub wifi_max_retry: u32,

    /// HTTP request timeout in seconds
    #[arg(long, env = "HTTP_TIMEOUT_SECS", default_value = "30")]
    pub http_timeout_secs: u64,

    /// Delay between posting and link teardown, in milliseconds
    #[arg(long, env = "SKYPOST_LINGER_MS", default_value = "1000")]
    pub linger_ms: u64,

    /// Log level for skypost targets (overridden by RUST_LOG)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Rejects configuration that would fail later, before anything runs.
    pub fn validate(&self) -> Result<(), SkypostError> {
        if self.handle.trim().is_empty() {
            return Err(SkypostError::Config("BSKY_HANDLE is empty".into()));
        }
        if self.password.is_empty() {
            return Err(SkypostError::Config("BSKY_PASSWORD is empty".into()));
        }
        if self.http_timeout_secs == 0 {
            return Err(SkypostError::Config(
                "HTTP_TIMEOUT_SECS must be at least 1".into(),
            ));
        }
        parse_record(&self.message).map_err(|e| {
            SkypostError::Config(format!("SKYPOST_MESSAGE: {e}"))
        })?;
        self.station()
            .validate()
            .map_err(|e| SkypostError::Config(format!("WIFI: {e}")))?;
        Ok(())
    }

    fn station(&self) -> StationConfig {
        StationConfig::new(&self.wifi_ssid, &self.wifi_password)
    }

    pub fn link_config(&self) -> LinkConfig {
        LinkConfig {
            station: self.station(),
            max_retries: self.wifi_max_retry,
            ..LinkConfig::default()
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            base_url: self.base_url.clone(),
            ..SessionConfig::default()
        }
    }

    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            timeout: Duration::from_secs(self.http_timeout_secs),
            ..TransportConfig::default()
        }
    }

    pub fn sequencer_config(&self) -> SequencerConfig {
        SequencerConfig {
            linger: Duration::from_millis(self.linger_ms),
        }
    }
}

impl fmt::Debug for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Args")
            .field("handle", &self.handle)
            .field("password", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("message", &self.message)
            .field("wifi_ssid", &self.wifi_ssid)
            .field("wifi_password", &"<redacted>")
            .field("wifi_max_retry", &self.wifi_max_retry)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("linger_ms", &self.linger_ms)
            .field("log_level", &self.log_level)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec![
            "skypost",
            "--handle",
            "alice.bsky.social",
            "--password",
            "app-pw",
        ];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]);
        assert_eq!(args.base_url, "https://bsky.social/xrpc");
        assert_eq!(args.message, r#"{"text": "Hello from ESP32!"}"#);
        assert_eq!(args.wifi_max_retry, 5);
        assert_eq!(args.http_timeout_secs, 30);
        assert_eq!(args.linger_ms, 1000);
        assert_eq!(args.log_level, "info");
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_derived_configs() {
        let args = parse(&[
            "--wifi-ssid",
            "home",
            "--wifi-max-retry",
            "2",
            "--http-timeout-secs",
            "5",
            "--linger-ms",
            "0",
            "--base-url",
            "http://localhost:2583/xrpc",
        ]);

        let link = args.link_config();
        assert_eq!(link.station.ssid, "home");
        assert_eq!(link.max_retries, 2);
        assert_eq!(args.transport_config().timeout, Duration::from_secs(5));
        assert_eq!(args.session_config().base_url, "http://localhost:2583/xrpc");
        assert_eq!(args.sequencer_config().linger, Duration::ZERO);
    }

    #[test]
    fn test_validate_rejects_empty_handle() {
        let mut args = parse(&[]);
        args.handle = "  ".into();
        assert!(matches!(args.validate(), Err(SkypostError::Config(m)) if m.contains("BSKY_HANDLE")));
    }

    #[test]
    fn test_validate_rejects_empty_password() {
        let mut args = parse(&[]);
        args.password.clear();
        assert!(matches!(args.validate(), Err(SkypostError::Config(m)) if m.contains("BSKY_PASSWORD")));
    }

    #[test]
    fn test_validate_rejects_non_object_message() {
        let args = parse(&["--message", "not json"]);
        assert!(matches!(args.validate(), Err(SkypostError::Config(m)) if m.contains("SKYPOST_MESSAGE")));
        let args = parse(&["--message", "[1]"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_long_ssid() {
        let ssid = "s".repeat(33);
        let args = parse(&["--wifi-ssid", &ssid]);
        assert!(matches!(args.validate(), Err(SkypostError::Config(m)) if m.contains("ssid")));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let args = parse(&["--http-timeout-secs", "0"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_passwords() {
        let args = parse(&["--wifi-password", "wifi-secret"]);
        let dbg = format!("{args:?}");
        assert!(!dbg.contains("app-pw"));
        assert!(!dbg.contains("wifi-secret"));
        assert!(dbg.contains("alice.bsky.social"));
    }
}
