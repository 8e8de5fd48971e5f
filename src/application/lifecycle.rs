use crate::domain::config::Config;
use crate::domain::envelope::ResultEnvelope;
use crate::domain::ports::{ClientFactoryBox, PaymentClientHandle};
use crate::error::{HarnessError, Result};
use serde::Serialize;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientState {
    #[default]
    Uninitialized,
    Ready,
    Failed,
}

#[derive(Default)]
struct ClientSlot {
    state: ClientState,
    client: Option<PaymentClientHandle>,
}

/// Owns the single underlying client and its readiness state.
///
/// Re-initializing replaces the handle; last writer wins. Callers only ever
/// receive a clone of the handle through [`SdkLifecycleManager::ready_client`],
/// which is where the readiness gate lives.
pub struct SdkLifecycleManager {
    factory: ClientFactoryBox,
    slot: RwLock<ClientSlot>,
}

impl SdkLifecycleManager {
    pub fn new(factory: ClientFactoryBox) -> Self {
        Self {
            factory,
            slot: RwLock::new(ClientSlot::default()),
        }
    }

    /// Validates `config`, constructs the client and opens the gate.
    pub async fn initialize(&self, config: &Config) -> ResultEnvelope {
        match self.try_initialize(config).await {
            Ok(message) => ResultEnvelope::ok(message),
            Err(e) => e.into(),
        }
    }

    /// Same as [`initialize`](Self::initialize) but keeps the typed error.
    ///
    /// A configuration error returns before the factory is touched and leaves
    /// the current state as it was.
    pub async fn try_initialize(&self, config: &Config) -> Result<String> {
        let sdk_config = config.normalize()?;

        // Not holding the lock across construction keeps `is_ready` responsive.
        let created = self.factory.create(&sdk_config).await;

        let mut slot = self.slot.write().await;
        match created {
            Ok(client) => {
                slot.client = Some(client);
                slot.state = ClientState::Ready;
                tracing::debug!(business_id = %sdk_config.business_id, "client constructed");
                Ok("SDK initialized successfully".to_string())
            }
            Err(e) => {
                slot.client = None;
                slot.state = ClientState::Failed;
                tracing::debug!(error = %e, "client construction failed");
                Err(HarnessError::Underlying(e))
            }
        }
    }

    pub async fn is_ready(&self) -> bool {
        self.slot.read().await.state == ClientState::Ready
    }

    pub async fn state(&self) -> ClientState {
        self.slot.read().await.state
    }

    /// Drops the client handle. Calling it twice is harmless.
    pub async fn reset(&self) {
        let mut slot = self.slot.write().await;
        slot.client = None;
        slot.state = ClientState::Uninitialized;
    }

    /// Clone of the client handle, or [`HarnessError::Gate`] unless `Ready`.
    pub(crate) async fn ready_client(&self) -> Result<PaymentClientHandle> {
        let slot = self.slot.read().await;
        match (&slot.state, &slot.client) {
            (ClientState::Ready, Some(client)) => Ok(client.clone()),
            _ => Err(HarnessError::Gate),
        }
    }
}
