// ── Platform session facade ──
//
// Owns the single `PlatformClient` for a session and exposes the workflows
// plus the raw query/update primitives they are built from. Cheaply
// cloneable via `Arc<PlatformInner>`.

use std::future::Future;
use std::sync::Arc;

use heatly_api::{
    Envelope, FindHouseholdValveParams, FindMeterCurrentDataParams, FindNetEquipmentParams,
    HouseholdValveWire, PlatformClient, ProvisioningItem, TlsMode, TransportConfig,
};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::{PlatformConfig, TlsVerification};
use crate::error::CoreError;
use crate::model::{
    HouseholdValve, MeterStatus, NetEquipment, ResolvedDevice, WorkflowOutcome,
};
use crate::workflow::{self, RenameRequest};

/// A connected platform session.
#[derive(Clone)]
pub struct Platform {
    inner: Arc<PlatformInner>,
}

struct PlatformInner {
    config: PlatformConfig,
    client: PlatformClient,
}

impl Platform {
    /// Build the HTTP client for `config`. No request is made yet.
    pub fn connect(config: PlatformConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            tls: tls_to_transport(&config.tls),
            timeout: config.timeout,
        };
        let client = PlatformClient::from_token(config.url.as_str(), &config.token, &transport)?;
        debug!(url = %client.base_url(), "platform session opened");

        Ok(Self {
            inner: Arc::new(PlatformInner { config, client }),
        })
    }

    /// Scoped session: connect, run closure, release.
    ///
    /// The client is dropped on every path out, including when the closure
    /// fails.
    pub async fn scoped<F, Fut, T>(config: PlatformConfig, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(Platform) -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        let platform = Platform::connect(config)?;
        let result = f(platform.clone()).await;
        platform.close();
        result
    }

    /// Release this handle. The connection pool goes away with the last one.
    pub fn close(self) {
        if Arc::strong_count(&self.inner) == 1 {
            debug!("platform session closed");
        }
    }

    pub fn config(&self) -> &PlatformConfig {
        &self.inner.config
    }

    /// The underlying client, for calls this facade does not wrap.
    pub fn client(&self) -> &PlatformClient {
        &self.inner.client
    }

    // ── Workflows ────────────────────────────────────────────────

    /// Resolve serial numbers to guids and provision the resolved subset.
    pub async fn resolve_and_provision(&self, serials: &[String]) -> WorkflowOutcome {
        self.resolve_and_provision_until(serials, &CancellationToken::new())
            .await
    }

    /// As [`resolve_and_provision`](Self::resolve_and_provision), stopping
    /// before the next lookup once `cancel` fires.
    pub async fn resolve_and_provision_until(
        &self,
        serials: &[String],
        cancel: &CancellationToken,
    ) -> WorkflowOutcome {
        workflow::resolve_and_provision(
            self.client(),
            serials,
            self.inner.config.effective_concurrency(),
            cancel,
        )
        .await
    }

    /// Rename the valve at `address` from `current_serial` to `new_serial`.
    pub async fn rename_device(
        &self,
        current_serial: &str,
        address: &str,
        new_serial: &str,
    ) -> WorkflowOutcome {
        let request = RenameRequest {
            current_serial: current_serial.to_owned(),
            address: address.to_owned(),
            new_serial: new_serial.to_owned(),
        };
        workflow::rename_device(self.client(), &request).await
    }

    // ── Pass-through primitives ──────────────────────────────────

    pub async fn find_household_valves(
        &self,
        params: &FindHouseholdValveParams,
    ) -> Result<Vec<HouseholdValve>, CoreError> {
        let page = success(self.client().find_household_valves(params).await?)?;
        page.map(|p| p.data)
            .unwrap_or_default()
            .into_iter()
            .map(|w| HouseholdValve::try_from(w).map_err(CoreError::from))
            .collect()
    }

    /// Full-replace update. Returns the raw response for auditing.
    pub async fn update_household_valve(
        &self,
        valve: HouseholdValve,
    ) -> Result<Envelope<Value>, CoreError> {
        let wire = HouseholdValveWire::from(valve);
        Ok(self.client().update_household_valve(&wire).await?)
    }

    pub async fn find_net_equipment(
        &self,
        params: &FindNetEquipmentParams,
    ) -> Result<Vec<NetEquipment>, CoreError> {
        let page = success(self.client().find_net_equipment(params).await?)?;
        Ok(page
            .map(|p| p.data)
            .unwrap_or_default()
            .into_iter()
            .map(NetEquipment::from)
            .collect())
    }

    /// Submit a provisioning batch as-is. Returns the raw response.
    pub async fn update_control(
        &self,
        devices: Vec<ResolvedDevice>,
    ) -> Result<Envelope<Value>, CoreError> {
        let items: Vec<ProvisioningItem> = devices.into_iter().map(Into::into).collect();
        Ok(self.client().update_control(&items).await?)
    }

    pub async fn meter_status(&self, serial_no: &str) -> Result<Vec<MeterStatus>, CoreError> {
        let params = FindMeterCurrentDataParams::new(serial_no);
        let page = success(self.client().find_meter_current_data(&params).await?)?;
        Ok(page
            .map(|p| p.data)
            .unwrap_or_default()
            .into_iter()
            .map(MeterStatus::from)
            .collect())
    }
}

/// Unwrap a business-success envelope's payload.
fn success<T>(envelope: Envelope<T>) -> Result<Option<T>, CoreError> {
    if envelope.is_success() {
        Ok(envelope.data)
    } else {
        Err(CoreError::Rejected {
            message: envelope.message_or_code(),
        })
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}
