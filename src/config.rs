use clap::{Parser, ValueEnum};
use std::time::Duration;
use thiserror::Error;

use crate::rate_limit::MAX_WINDOW;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

// CLI argument structure, every flag can also come from the environment
#[derive(Parser, Debug, Clone)]
#[command(name = "venue-forms")]
#[command(about = "Contact and booking form gateway for the venue site")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    // Contact submissions allowed per client per window
    #[arg(long, env = "CONTACT_RATE_LIMIT", default_value_t = 5)]
    pub contact_rate_limit: u32,

    // Booking submissions allowed per client per window (stricter, bookings mean commitments)
    #[arg(long, env = "BOOKING_RATE_LIMIT", default_value_t = 3)]
    pub booking_rate_limit: u32,

    // Rate limit window in seconds
    #[arg(long, env = "RATE_WINDOW", default_value_t = 60)]
    pub rate_window: u64,

    // Simulated downstream work on an accepted submission
    #[arg(long, env = "PROCESSING_DELAY_MS", default_value_t = 500)]
    pub processing_delay_ms: u64,

    // Seconds between evictions of expired rate limit records
    #[arg(long, env = "SWEEP_INTERVAL", default_value_t = 60)]
    pub sweep_interval: u64,

    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("rate window must be at least one second")]
    ZeroRateWindow,

    #[error("rate window of {0} seconds exceeds the {max} second maximum", max = MAX_WINDOW.as_secs())]
    RateWindowTooLong(u64),

    #[error("sweep interval must be at least one second")]
    ZeroSweepInterval,
}

impl Args {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rate_window == 0 {
            return Err(ConfigError::ZeroRateWindow);
        }
        if self.rate_window() > MAX_WINDOW {
            return Err(ConfigError::RateWindowTooLong(self.rate_window));
        }
        if self.sweep_interval == 0 {
            return Err(ConfigError::ZeroSweepInterval);
        }
        Ok(())
    }

    pub fn rate_window(&self) -> Duration {
        Duration::from_secs(self.rate_window)
    }

    pub fn processing_delay(&self) -> Duration {
        Duration::from_millis(self.processing_delay_ms)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval)
    }
}
