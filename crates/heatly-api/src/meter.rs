// Meter current-data endpoint

use tracing::debug;

use crate::client::PlatformClient;
use crate::error::Error;
use crate::models::{Envelope, MeterCurrentData, Page};
use crate::params::FindMeterCurrentDataParams;

impl PlatformClient {
    /// Current readings and communication status for one valve.
    ///
    /// `GET /v4.0/meter/heatMonitor/findHouseholdMeterCurrentDataAdvanced`
    pub async fn find_meter_current_data(
        &self,
        params: &FindMeterCurrentDataParams,
    ) -> Result<Envelope<Page<MeterCurrentData>>, Error> {
        debug!(serial_no = %params.serial_no, "finding meter current data");
        self.get_with_params(
            "meter/heatMonitor/findHouseholdMeterCurrentDataAdvanced",
            &params.to_query(),
        )
        .await
    }
}
