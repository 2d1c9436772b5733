// ── Batch dispatch ──

use heatly_api::{Envelope, PlatformClient, ProvisioningItem};
use serde_json::Value;
use tracing::{debug, info};

use super::{StepError, accept};
use crate::model::ResolvedDevice;

/// Submit resolved devices as one provisioning request.
///
/// An empty list is never sent: the platform answers an empty batch with a
/// success that means nothing. `Ok(None)` signals that nothing was submitted.
pub async fn submit(
    client: &PlatformClient,
    devices: &[ResolvedDevice],
) -> Result<Option<Envelope<Value>>, StepError> {
    if devices.is_empty() {
        debug!("empty provisioning batch; not submitting");
        return Ok(None);
    }

    let items: Vec<ProvisioningItem> = devices.iter().cloned().map(Into::into).collect();
    info!(count = items.len(), "submitting provisioning batch");

    accept(client.update_control(&items).await?).map(Some)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use heatly_api::TransportConfig;

    use super::*;

    #[test]
    fn empty_batch_is_not_sent() {
        // Nothing listens on this address; a request would fail.
        let http = TransportConfig::default().build_client().unwrap();
        let client = PlatformClient::from_reqwest("http://127.0.0.1:9", http).unwrap();

        let submitted = tokio_test::block_on(submit(&client, &[])).unwrap();
        assert!(submitted.is_none());
    }
}
