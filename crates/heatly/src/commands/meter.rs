//! Meter status handler.

use tabled::Tabled;

use heatly_core::{MeterStatus, Platform};

use crate::cli::{GlobalOpts, MeterArgs, MeterCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct MeterRow {
    #[tabled(rename = "Serial")]
    serial_no: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Comm")]
    comm_status: String,
    #[tabled(rename = "Read at")]
    read_time: String,
}

impl From<&MeterStatus> for MeterRow {
    fn from(m: &MeterStatus) -> Self {
        Self {
            serial_no: m.serial_no.clone(),
            address: m.address.clone().unwrap_or_default(),
            comm_status: m.comm_status.clone().unwrap_or_default(),
            read_time: m.read_time.clone().unwrap_or_default(),
        }
    }
}

pub async fn handle(
    platform: &Platform,
    args: MeterArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        MeterCommand::Status { serial } => {
            let rows = platform.meter_status(&serial).await?;
            if rows.is_empty() {
                return Err(CliError::NotFound {
                    resource_type: "meter".into(),
                    identifier: serial,
                });
            }
            // The readings map only shows up in structured formats.
            let out = output::render_list(
                global.format(),
                &rows,
                |m| MeterRow::from(m),
                |m| m.serial_no.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
