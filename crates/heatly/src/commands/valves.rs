//! Household valve query handlers.

use tabled::Tabled;

use heatly_core::{FindHouseholdValveParams, HouseholdValve, Platform, Scalar};

use crate::cli::{GlobalOpts, ValvesArgs, ValvesCommand};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ValveRow {
    #[tabled(rename = "Serial")]
    serial_no: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Unit")]
    unit: String,
    #[tabled(rename = "Collector")]
    collector: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Enabled")]
    enabled: String,
}

impl From<&HouseholdValve> for ValveRow {
    fn from(v: &HouseholdValve) -> Self {
        Self {
            serial_no: v.serial_no.clone(),
            address: output::cell(v.address.as_ref()),
            unit: output::cell(v.unit_name.as_ref()),
            collector: output::cell(v.net_equ_name.as_ref()),
            model: output::cell(v.model_name.as_ref()),
            enabled: v
                .enabled
                .as_ref()
                .and_then(Scalar::as_bool)
                .map(|e| e.to_string())
                .unwrap_or_default(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    platform: &Platform,
    args: ValvesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ValvesCommand::Find {
            serial,
            all_nodes,
            page_size,
        } => {
            let serial = serial.unwrap_or_default();
            let params = if all_nodes {
                FindHouseholdValveParams::by_serial_no_unscoped(serial, page_size)
            } else {
                FindHouseholdValveParams {
                    page_size,
                    ..FindHouseholdValveParams::by_serial_no(serial)
                }
            };

            let valves = platform.find_household_valves(&params).await?;
            let out = output::render_list(
                global.format(),
                &valves,
                |v| ValveRow::from(v),
                |v| v.serial_no.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
