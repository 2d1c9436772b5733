//! Network equipment query handlers.

use tabled::Tabled;

use heatly_core::{FindNetEquipmentParams, NetEquipment, Platform};

use crate::cli::{EquipmentArgs, EquipmentCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct EquipmentRow {
    #[tabled(rename = "Serial")]
    serial_no: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "GUID")]
    guid: String,
    #[tabled(rename = "Type")]
    equipment_type: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Address")]
    address: String,
}

impl From<&NetEquipment> for EquipmentRow {
    fn from(e: &NetEquipment) -> Self {
        Self {
            serial_no: e.serial_no.clone(),
            name: output::cell(e.name.as_ref()),
            guid: e.usable_guid().unwrap_or("-").to_owned(),
            equipment_type: output::cell(e.equipment_type_name.as_ref()),
            model: output::cell(e.model_name.as_ref()),
            address: output::cell(e.address.as_ref()),
        }
    }
}

pub async fn handle(
    platform: &Platform,
    args: EquipmentArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        EquipmentCommand::Find {
            serial,
            factory,
            model,
            page_size,
        } => {
            let params = FindNetEquipmentParams {
                serial_no: serial.unwrap_or_default(),
                factory_id: factory.unwrap_or_default(),
                model_id: model.unwrap_or_default(),
                page_size,
                ..FindNetEquipmentParams::default()
            };

            let equipment = platform.find_net_equipment(&params).await?;
            let out = output::render_list(
                global.format(),
                &equipment,
                |e| EquipmentRow::from(e),
                |e| e.serial_no.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
