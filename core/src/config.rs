//! Client configuration.

use config::builder::DefaultState;
use config::ConfigBuilder;
use serde::Deserialize;

use crate::error::ApiError;

pub const DEFAULT_BASE_URL: &str = "https://api.stripe.com/v1";

const ENV_PREFIX: &str = "STRIPE";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// API root every descriptor path is joined to.
    pub base_url: String,
    /// Pinned API version, sent as `Stripe-Version` when set.
    pub api_version: Option<String>,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: None,
            user_agent: concat!("stripe-core/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Self::default()
        }
    }

    /// Load from `STRIPE_BASE_URL`, `STRIPE_API_VERSION` and
    /// `STRIPE_USER_AGENT`, falling back to defaults for unset variables.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::load(config::Config::builder().add_source(env_source(None)))
    }

    fn load(builder: ConfigBuilder<DefaultState>) -> Result<Self, ApiError> {
        Ok(builder.build()?.try_deserialize()?)
    }
}

/// `STRIPE_*` variables, read from `vars` instead of the process when given.
fn env_source(vars: Option<config::Map<String, String>>) -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX).source(vars)
}
