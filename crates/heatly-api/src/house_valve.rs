// Household valve endpoints
//
// `findHouseholdValve` is a paged read; `updateHouseholdValve` replaces the
// whole record, so callers must send back every field they read.

use serde_json::Value;
use tracing::debug;

use crate::client::PlatformClient;
use crate::error::Error;
use crate::models::{Envelope, HouseholdValveWire, Page};
use crate::params::FindHouseholdValveParams;

impl PlatformClient {
    /// Find household valves.
    ///
    /// `GET /v4.0/maintain/houseValve/findHouseholdValve`
    pub async fn find_household_valves(
        &self,
        params: &FindHouseholdValveParams,
    ) -> Result<Envelope<Page<HouseholdValveWire>>, Error> {
        debug!(serial_no = %params.serial_no, page_size = params.page_size, "finding household valves");
        self.get_with_params("maintain/houseValve/findHouseholdValve", &params.to_query())
            .await
    }

    /// Replace a household valve record.
    ///
    /// `PUT /v4.0/maintain/houseValve/updateHouseholdValve` with the full record.
    pub async fn update_household_valve(
        &self,
        record: &HouseholdValveWire,
    ) -> Result<Envelope<Value>, Error> {
        debug!(serial_no = %record.serial_no, "updating household valve");
        self.put("maintain/houseValve/updateHouseholdValve", record)
            .await
    }
}
