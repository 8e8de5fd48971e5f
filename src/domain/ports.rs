use super::config::SdkConfig;
use super::payment::{FormParams, IntentParams, PaymentIntent};
use super::widget::OutcomeCallbacks;
use crate::error::{ClientError, FetchFailure};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// The payment SDK as seen by an integrator.
///
/// Widget mounts resolve once the widget is visible and interactive. What the
/// end user then does is reported later, at most once, through the supplied
/// [`OutcomeCallbacks`].
#[async_trait]
pub trait PaymentClient: Send + Sync {
    async fn create_payment_intent(
        &self,
        params: IntentParams,
    ) -> Result<PaymentIntent, ClientError>;
    async fn mount_card_form(
        &self,
        params: FormParams,
        callbacks: OutcomeCallbacks,
    ) -> Result<(), ClientError>;
    async fn mount_token_form(
        &self,
        params: FormParams,
        callbacks: OutcomeCallbacks,
    ) -> Result<(), ClientError>;
}

pub type PaymentClientHandle = Arc<dyn PaymentClient>;

/// Constructs the underlying client. Construction errors leave the harness
/// in the `Failed` state.
#[async_trait]
pub trait ClientFactory: Send + Sync {
    async fn create(&self, config: &SdkConfig) -> Result<PaymentClientHandle, ClientError>;
}

pub type ClientFactoryBox = Box<dyn ClientFactory>;

/// Places widgets can be mounted into.
pub trait MountSurfaces: Send + Sync {
    fn exists(&self, target: &str) -> bool;
    fn show_notice(&self, target: &str, notice: &str);
    fn render_detail(&self, target: &str, detail: &Value);
    fn clear(&self, target: &str);
    fn clear_all(&self);
}

pub type MountSurfacesHandle = Arc<dyn MountSurfaces>;

/// A single config-lookup request made by the CORS probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLookup {
    pub business_id: String,
    pub publishable_key: String,
    pub sdk_token: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EndpointResponse {
    pub status: u16,
    pub body: Option<Value>,
}

impl EndpointResponse {
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Cross-origin config endpoint. Any response, whatever its status, is `Ok`;
/// `Err` means no response arrived at all.
#[async_trait]
pub trait ConfigEndpoint: Send + Sync {
    async fn fetch(&self, lookup: &ConfigLookup) -> Result<EndpointResponse, FetchFailure>;
}

pub type ConfigEndpointBox = Box<dyn ConfigEndpoint>;
