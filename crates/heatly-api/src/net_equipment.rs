// Network equipment endpoints
//
// Collectors ("network equipment") are looked up by serial number to obtain
// their guid, then submitted in one `updateControl` batch so the platform
// pushes archives to them.

use serde_json::Value;
use tracing::debug;

use crate::client::PlatformClient;
use crate::error::Error;
use crate::models::{Envelope, NetEquipmentWire, Page, ProvisioningItem};
use crate::params::FindNetEquipmentParams;

impl PlatformClient {
    /// Find network equipment.
    ///
    /// `GET /v4.0/maintain/netEquManage/findNetEqu`
    pub async fn find_net_equipment(
        &self,
        params: &FindNetEquipmentParams,
    ) -> Result<Envelope<Page<NetEquipmentWire>>, Error> {
        debug!(serial_no = %params.serial_no, page_size = params.page_size, "finding net equipment");
        self.get_with_params("maintain/netEquManage/findNetEqu", &params.to_query())
            .await
    }

    /// Issue a provisioning batch.
    ///
    /// `POST /v4.0/maintain/buildAiControl/updateControl` with a bare JSON
    /// array of `{serialNo, guid}`. The platform accepts or rejects the
    /// batch as a whole.
    pub async fn update_control(
        &self,
        items: &[ProvisioningItem],
    ) -> Result<Envelope<Value>, Error> {
        debug!(count = items.len(), "issuing provisioning batch");
        self.post("maintain/buildAiControl/updateControl", &items)
            .await
    }
}
