//! Application configuration loaded via OrthoConfig.
//!
//! Every value is optional in the environment/CLI layer; accessors apply
//! the documented defaults. Sampling limits live here rather than at call
//! sites so the cap and default size stay configuration, not literals.

use std::path::PathBuf;
use std::time::Duration as StdDuration;

use chrono::Duration;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::domain::sampling_cache::SamplingConfig;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_PROFILE_API_URL: &str = "https://api.guildwars2.com";
const DEFAULT_PROFILE_TIMEOUT_SECS: u64 = 10;
const DEFAULT_PUBLIC_LIST_TTL_SECS: i64 = 300;
const DEFAULT_OF_THE_DAY_TTL_SECS: i64 = 86_400;
const DEFAULT_SAMPLE_SIZE: usize = 1;
const DEFAULT_MAX_SAMPLE_SIZE: usize = 10;
const DEFAULT_OF_THE_DAY_COUNT: usize = 1;
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";

/// Configuration values for the armory backend.
#[derive(Debug, Clone, Serialize, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ARMORY")]
pub struct AppConfig {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// Base URL of the external account API.
    pub profile_api_url: Option<String>,
    /// Timeout in seconds for profile fetches.
    pub profile_timeout_secs: Option<u64>,
    /// Seconds a cached public character list stays fresh.
    pub public_list_ttl_secs: Option<i64>,
    /// Seconds a cached of-the-day selection stays fresh.
    pub of_the_day_ttl_secs: Option<i64>,
    /// Sample size used when a caller does not pass one.
    pub default_sample_size: Option<usize>,
    /// Hard cap applied to requested sample sizes.
    pub max_sample_size: Option<usize>,
    /// Number of names selected for "characters of the day".
    pub of_the_day_count: Option<usize>,
    /// Path to the session signing key file.
    pub session_key_file: Option<PathBuf>,
    /// Whether the session cookie requires HTTPS.
    #[ortho_config(cli_default_as_absent = true)]
    pub session_cookie_secure: Option<bool>,
    /// Allow an ephemeral session key when the key file is missing.
    #[ortho_config(cli_default_as_absent = true)]
    pub session_allow_ephemeral: Option<bool>,
}

impl AppConfig {
    /// Socket address to bind, falling back to the default.
    pub fn bind_addr(&self) -> &str {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR)
    }

    /// External account API base URL, falling back to the default.
    pub fn profile_api_url(&self) -> &str {
        self.profile_api_url
            .as_deref()
            .unwrap_or(DEFAULT_PROFILE_API_URL)
    }

    /// Request timeout for profile fetches.
    pub fn profile_timeout(&self) -> StdDuration {
        StdDuration::from_secs(
            self.profile_timeout_secs
                .unwrap_or(DEFAULT_PROFILE_TIMEOUT_SECS),
        )
    }

    /// Path to the session signing key file.
    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }

    /// Whether the session cookie requires HTTPS. Defaults to true.
    pub fn session_cookie_secure(&self) -> bool {
        self.session_cookie_secure.unwrap_or(true)
    }

    /// Whether a missing key file may fall back to an ephemeral key.
    pub fn session_allow_ephemeral(&self) -> bool {
        self.session_allow_ephemeral.unwrap_or(false)
    }

    /// Sampling-cache tunables assembled from the configured values.
    pub fn sampling(&self) -> SamplingConfig {
        SamplingConfig {
            public_list_ttl: Duration::seconds(
                self.public_list_ttl_secs
                    .unwrap_or(DEFAULT_PUBLIC_LIST_TTL_SECS),
            ),
            of_the_day_ttl: Duration::seconds(
                self.of_the_day_ttl_secs
                    .unwrap_or(DEFAULT_OF_THE_DAY_TTL_SECS),
            ),
            default_sample_size: self.default_sample_size.unwrap_or(DEFAULT_SAMPLE_SIZE),
            max_sample_size: self.max_sample_size.unwrap_or(DEFAULT_MAX_SAMPLE_SIZE),
            of_the_day_count: self.of_the_day_count.unwrap_or(DEFAULT_OF_THE_DAY_COUNT),
        }
    }
}
