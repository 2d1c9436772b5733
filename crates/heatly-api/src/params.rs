// Query parameter structs
//
// One struct per request kind, every field and its default stated in the
// `Default` impl. `to_query()` produces the platform's camelCase keys. The
// platform treats an empty string as "no filter", so unset optionals are
// sent as `""` rather than omitted.

/// Filters for `findHouseholdValve`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindHouseholdValveParams {
    pub page_index: u32,
    pub page_size: u32,
    pub sort_name: String,
    pub sort_type: String,
    pub tree_id: String,
    pub tree_level: u32,
    pub parent_level_id: String,
    pub factory_id: String,
    pub model_id: String,
    pub net_equ_name: String,
    pub serial_no: String,
    pub port: Option<String>,
    pub baud_rate: Option<String>,
    pub check_bit: Option<String>,
    pub index: Option<String>,
    pub communication_type: String,
    pub room_type: String,
    pub install_site: String,
    pub equipment_use: String,
}

impl Default for FindHouseholdValveParams {
    fn default() -> Self {
        Self {
            page_index: 1,
            page_size: 5000,
            sort_name: String::new(),
            sort_type: String::new(),
            tree_id: "001".into(),
            tree_level: 1,
            parent_level_id: String::new(),
            factory_id: String::new(),
            model_id: String::new(),
            net_equ_name: String::new(),
            serial_no: String::new(),
            port: None,
            baud_rate: None,
            check_bit: None,
            index: None,
            communication_type: String::new(),
            room_type: String::new(),
            install_site: String::new(),
            equipment_use: String::new(),
        }
    }
}

impl FindHouseholdValveParams {
    /// Default tree scope, filtered to one serial number.
    pub fn by_serial_no(serial_no: impl Into<String>) -> Self {
        Self {
            serial_no: serial_no.into(),
            ..Self::default()
        }
    }

    /// Search the whole tree rather than the default root node.
    ///
    /// The same serial number can be installed at several addresses, so
    /// the page is sized to hold every collision.
    pub fn by_serial_no_unscoped(serial_no: impl Into<String>, page_size: u32) -> Self {
        Self {
            serial_no: serial_no.into(),
            page_size,
            tree_id: String::new(),
            tree_level: 0,
            ..Self::default()
        }
    }

    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("pageIndex", self.page_index.to_string()),
            ("pageSize", self.page_size.to_string()),
            ("sortName", self.sort_name.clone()),
            ("sortType", self.sort_type.clone()),
            ("treeId", self.tree_id.clone()),
            ("treeLevel", self.tree_level.to_string()),
            ("parentLevelId", self.parent_level_id.clone()),
            ("factoryId", self.factory_id.clone()),
            ("modelId", self.model_id.clone()),
            ("netEquName", self.net_equ_name.clone()),
            ("serialNo", self.serial_no.clone()),
            ("port", self.port.clone().unwrap_or_default()),
            ("baudRate", self.baud_rate.clone().unwrap_or_default()),
            ("checkBit", self.check_bit.clone().unwrap_or_default()),
            ("index", self.index.clone().unwrap_or_default()),
            ("communicationType", self.communication_type.clone()),
            ("roomType", self.room_type.clone()),
            ("installSite", self.install_site.clone()),
            ("equipmentUse", self.equipment_use.clone()),
        ]
    }
}

/// Filters for `findNetEqu`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindNetEquipmentParams {
    pub equipment_type_id: String,
    pub factory_id: String,
    pub model_id: String,
    pub meter_no: String,
    pub serial_no: String,
    pub install_type: String,
    pub tree_id: String,
    pub tree_level: u32,
    pub parent_level_id: String,
    pub page_index: u32,
    pub page_size: u32,
    pub sort_name: String,
    pub sort_type: String,
}

impl Default for FindNetEquipmentParams {
    fn default() -> Self {
        Self {
            equipment_type_id: String::new(),
            factory_id: String::new(),
            model_id: String::new(),
            meter_no: String::new(),
            serial_no: String::new(),
            install_type: String::new(),
            tree_id: "001".into(),
            tree_level: 1,
            parent_level_id: String::new(),
            page_index: 1,
            page_size: 2000,
            sort_name: String::new(),
            sort_type: String::new(),
        }
    }
}

impl FindNetEquipmentParams {
    /// Single-record lookup used to resolve a serial number to its guid.
    pub fn by_serial_no(serial_no: impl Into<String>) -> Self {
        Self {
            serial_no: serial_no.into(),
            page_size: 1,
            ..Self::default()
        }
    }

    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("equipmentTypeId", self.equipment_type_id.clone()),
            ("factoryId", self.factory_id.clone()),
            ("modelId", self.model_id.clone()),
            ("meterNo", self.meter_no.clone()),
            ("serialNo", self.serial_no.clone()),
            ("installType", self.install_type.clone()),
            ("treeId", self.tree_id.clone()),
            ("treeLevel", self.tree_level.to_string()),
            ("parentLevelId", self.parent_level_id.clone()),
            ("pageIndex", self.page_index.to_string()),
            ("pageSize", self.page_size.to_string()),
            ("sortName", self.sort_name.clone()),
            ("sortType", self.sort_type.clone()),
        ]
    }
}

/// Filters for `findHouseholdMeterCurrentDataAdvanced`.
///
/// The serial number is not a plain query key on this endpoint; it is
/// embedded in the `advanceCondition` filter expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindMeterCurrentDataParams {
    pub serial_no: String,
    pub menu_id: String,
    pub tree_id: String,
    pub tree_level: u32,
    pub parent_level_id: String,
    pub flag: u32,
    pub page_index: u32,
    pub page_size: u32,
    pub sort_name: String,
    pub sort_type: String,
    pub unique_ids: String,
    pub save: bool,
    pub save_name: String,
    pub build_and_floors: String,
}

impl FindMeterCurrentDataParams {
    pub fn new(serial_no: impl Into<String>) -> Self {
        Self {
            serial_no: serial_no.into(),
            menu_id: "140207".into(),
            tree_id: "001".into(),
            tree_level: 1,
            parent_level_id: String::new(),
            flag: 1,
            page_index: 1,
            page_size: 200,
            sort_name: String::new(),
            sort_type: String::new(),
            unique_ids: String::new(),
            save: false,
            save_name: String::new(),
            build_and_floors: String::new(),
        }
    }

    /// `((oc_v.serialNo='X'))` with single quotes in X doubled.
    pub fn advance_condition(&self) -> String {
        format!("((oc_v.serialNo='{}'))", escape_quotes(&self.serial_no))
    }

    /// Human-readable label the platform stores alongside the condition.
    pub fn advance_name(&self) -> String {
        format!("(户阀编号='{}')", escape_quotes(&self.serial_no))
    }

    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("advanceCondition", self.advance_condition()),
            ("advanceName", self.advance_name()),
            ("uniqueIds", self.unique_ids.clone()),
            ("save", self.save.to_string()),
            ("saveName", self.save_name.clone()),
            ("menuId", self.menu_id.clone()),
            ("treeId", self.tree_id.clone()),
            ("treeLevel", self.tree_level.to_string()),
            ("parentLevelId", self.parent_level_id.clone()),
            ("flag", self.flag.to_string()),
            ("buildAndFloors", self.build_and_floors.clone()),
            ("sortName", self.sort_name.clone()),
            ("sortType", self.sort_type.clone()),
            ("pageSize", self.page_size.to_string()),
            ("pageIndex", self.page_index.to_string()),
        ]
    }
}

fn escape_quotes(raw: &str) -> String {
    raw.replace('\'', "''")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn value<'a>(query: &'a [(&'static str, String)], key: &str) -> &'a str {
        query
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
            .unwrap()
    }

    #[test]
    fn valve_defaults_page_everything_from_root() {
        let q = FindHouseholdValveParams::default().to_query();
        assert_eq!(value(&q, "pageIndex"), "1");
        assert_eq!(value(&q, "pageSize"), "5000");
        assert_eq!(value(&q, "treeId"), "001");
        assert_eq!(value(&q, "treeLevel"), "1");
        assert_eq!(value(&q, "port"), "");
    }

    #[test]
    fn unscoped_valve_search_clears_tree() {
        let q = FindHouseholdValveParams::by_serial_no_unscoped("25249851", 20).to_query();
        assert_eq!(value(&q, "serialNo"), "25249851");
        assert_eq!(value(&q, "pageSize"), "20");
        assert_eq!(value(&q, "treeId"), "");
        assert_eq!(value(&q, "treeLevel"), "0");
    }

    #[test]
    fn equipment_lookup_is_single_record() {
        let q = FindNetEquipmentParams::by_serial_no("25012508").to_query();
        assert_eq!(value(&q, "serialNo"), "25012508");
        assert_eq!(value(&q, "pageSize"), "1");
        assert_eq!(value(&q, "treeId"), "001");
    }

    #[test]
    fn meter_condition_embeds_serial() {
        let params = FindMeterCurrentDataParams::new("24818174");
        assert_eq!(params.advance_condition(), "((oc_v.serialNo='24818174'))");
        assert_eq!(params.advance_name(), "(户阀编号='24818174')");
        assert_eq!(value(&params.to_query(), "menuId"), "140207");
    }

    #[test]
    fn meter_condition_escapes_quotes() {
        let params = FindMeterCurrentDataParams::new("1' OR '1'='1");
        assert_eq!(
            params.advance_condition(),
            "((oc_v.serialNo='1'' OR ''1''=''1'))"
        );
    }
}
