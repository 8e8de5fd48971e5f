use crate::error::{HarnessError, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Token used when the caller does not supply one.
pub const DEMO_SDK_TOKEN: &str = "demo_sdk_token";

/// Config-lookup endpoint hit by the CORS probe.
pub const DEFAULT_CONFIG_ENDPOINT: &str = "https://sandbox-api.payprobe.dev/v1/sdk/config";

/// Credentials supplied by the integrator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub publishable_key: String,
    pub business_id: String,
    pub sdk_token: Option<String>,
}

impl Config {
    pub fn new(publishable_key: impl Into<String>, business_id: impl Into<String>) -> Self {
        Self {
            publishable_key: publishable_key.into(),
            business_id: business_id.into(),
            sdk_token: None,
        }
    }

    pub fn with_sdk_token(mut self, sdk_token: impl Into<String>) -> Self {
        self.sdk_token = Some(sdk_token.into());
        self
    }

    /// Checks the required credentials. Blank values count as missing.
    pub fn validate(&self) -> Result<()> {
        if self.publishable_key.trim().is_empty() {
            return Err(HarnessError::Configuration("publishable key"));
        }
        if self.business_id.trim().is_empty() {
            return Err(HarnessError::Configuration("business ID"));
        }
        Ok(())
    }

    /// Token sent with requests, falling back to the demo placeholder.
    pub fn effective_sdk_token(&self) -> &str {
        match self.sdk_token.as_deref() {
            Some(token) if !token.trim().is_empty() => token,
            _ => DEMO_SDK_TOKEN,
        }
    }

    /// Validates and produces the configuration handed to the client factory.
    pub fn normalize(&self) -> Result<SdkConfig> {
        self.validate()?;
        Ok(SdkConfig {
            publishable_key: self.publishable_key.clone(),
            business_id: self.business_id.clone(),
            sdk_token: self.effective_sdk_token().to_string(),
            environment: Environment::Sandbox,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Sandbox,
}

/// Construction config for the underlying client.
///
/// Always targets [`Environment::Sandbox`]; the harness never talks to
/// production.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkConfig {
    pub publishable_key: String,
    pub business_id: String,
    pub sdk_token: String,
    pub environment: Environment,
}

/// Holds the config tuple every probe reads at invocation time.
///
/// Probes take a snapshot via [`ConfigStore::get`], so a config change never
/// affects a probe that is already in flight.
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    current: Arc<RwLock<Config>>,
}

impl ConfigStore {
    pub fn new(config: Config) -> Self {
        Self {
            current: Arc::new(RwLock::new(config)),
        }
    }

    pub fn get(&self) -> Config {
        self.current.read().clone()
    }

    pub fn set(&self, config: Config) {
        *self.current.write() = config;
    }
}

/// Settings for the harness itself, as opposed to the integrator credentials.
#[derive(Debug, Clone)]
pub struct HarnessSettings {
    pub config_endpoint: String,
    pub http_timeout: Duration,
}

impl Default for HarnessSettings {
    fn default() -> Self {
        Self {
            config_endpoint: DEFAULT_CONFIG_ENDPOINT.to_string(),
            http_timeout: Duration::from_secs(10),
        }
    }
}
