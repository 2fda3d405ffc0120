/// Configuration management
use crate::error::{ChatError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_DATA_DIR: &str = ".ripple";

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory for the persisted session (defaults to `.ripple`)
    pub data_dir: PathBuf,

    /// Delay before a sent message is marked delivered
    pub deliver_delay: Duration,

    /// Delay after delivery before the typing indicator appears
    pub typing_delay: Duration,

    /// How long the typing indicator runs before the reply lands
    pub reply_delay: Duration,

    /// OTP resend cooldown in seconds
    pub otp_resend_secs: u64,

    /// Disable the synthetic auto-reply after each sent message
    pub no_reply: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            deliver_delay: Duration::from_millis(800),
            typing_delay: Duration::from_millis(1000),
            reply_delay: Duration::from_millis(2000),
            otp_resend_secs: 30,
            no_reply: false,
        }
    }
}

impl Config {
    /// Create config from command line arguments
    pub fn from_args(args: &[String]) -> Result<Self> {
        let mut config = Self::default();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--data-dir" => {
                    let path = args.get(i + 1).ok_or_else(|| {
                        ChatError::Config("--data-dir requires a path argument".to_string())
                    })?;
                    config.data_dir = PathBuf::from(path);
                    i += 2;
                }
                "--deliver-ms" => {
                    config.deliver_delay = Duration::from_millis(parse_ms(args, i)?);
                    i += 2;
                }
                "--typing-ms" => {
                    config.typing_delay = Duration::from_millis(parse_ms(args, i)?);
                    i += 2;
                }
                "--reply-ms" => {
                    config.reply_delay = Duration::from_millis(parse_ms(args, i)?);
                    i += 2;
                }
                "--no-reply" => {
                    config.no_reply = true;
                    i += 1;
                }
                "--help" | "-h" => {
                    return Err(ChatError::Config(format!(
                        "Usage: {} [--data-dir <path>] [--deliver-ms <n>] [--typing-ms <n>] [--reply-ms <n>] [--no-reply]",
                        args.first().map(|s| s.as_str()).unwrap_or("ripple")
                    )));
                }
                other => {
                    return Err(ChatError::Config(format!("Unknown argument: {}", other)));
                }
            }
        }

        // Env overrides (nice for scripts)
        if let Ok(dir) = std::env::var("RIPPLE_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if std::env::var("RIPPLE_NO_REPLY").is_ok() {
            config.no_reply = true;
        }

        Ok(config)
    }
}

fn parse_ms(args: &[String], i: usize) -> Result<u64> {
    let flag = &args[i];
    let value = args.get(i + 1).ok_or_else(|| {
        ChatError::Config(format!("{} requires a millisecond argument", flag))
    })?;
    value
        .parse::<u64>()
        .map_err(|_| ChatError::Config(format!("{} must be a number of milliseconds", flag)))
}
