/*!
 * Document builder: pure functions from device snapshots to Redfish
 * resource documents.
 *
 * Nothing here performs I/O. The request handler refreshes the device
 * exactly once and passes the resulting snapshot in, so a document never
 * mixes state from two refreshes. Collection member counts are computed
 * from the enumerated member list, never maintained separately.
 */
use serde_json::{json, Value};

use redstrip_device::{OutletSnapshot, StripSnapshot};

use crate::resource::{
    outlet_path, OutletAction, ResourceKind, CHASSIS_COLLECTION_PATH, CHASSIS_ID, CHASSIS_PATH,
    MANAGERS_PATH, MANAGER_PATH, OUTLET_ACTIONS, OUTLET_COLLECTION_PATH, OUTLET_GROUPS_PATH,
    OUTLET_GROUP_ALL_PATH, POWER_PATH, POWER_SUBSYSTEM_PATH, POWER_SUPPLIES_PATH,
    POWER_SUPPLY_PATH, SERVICE_ROOT_PATH, SESSIONS_PATH, SESSION_SERVICE_PATH, SYSTEMS_PATH,
};

/// Fixed service UUID, part of the service contract
const SERVICE_UUID: &str = "92384634-2938-2342-8820-489239905423";
/// Fixed manager UUID, part of the service contract
const MANAGER_UUID: &str = "92384634-2938-2342-8820-489239905424";

/// The version discovery document served at `/redfish`
pub fn redfish_version() -> Value {
    json!({"v1": SERVICE_ROOT_PATH})
}

/// The service root document
pub fn service_root() -> Value {
    json!({
        "@odata.context": ResourceKind::ServiceRoot.odata_context(),
        "@odata.id": SERVICE_ROOT_PATH,
        "@odata.type": ResourceKind::ServiceRoot.odata_type(),
        "Id": "RootService",
        "Name": "Root Service",
        "RedfishVersion": "1.6.0",
        "UUID": SERVICE_UUID,
        "Chassis": {"@odata.id": CHASSIS_COLLECTION_PATH},
        "Systems": {"@odata.id": SYSTEMS_PATH},
        "Managers": {"@odata.id": MANAGERS_PATH},
        "Links": {
            "Sessions": {"@odata.id": SESSIONS_PATH},
        },
    })
}

/// The fixed XML metadata stub served at `/redfish/v1/$metadata`
pub const METADATA_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<edmx:Edmx xmlns:edmx="http://docs.oasis-open.org/odata/ns/edmx" Version="4.0">
    <edmx:Reference Uri="http://redfish.dmtf.org/schemas/v1/ServiceRoot_v1.xml">
        <edmx:Include Namespace="ServiceRoot"/>
        <edmx:Include Namespace="ServiceRoot.v1_5_0"/>
    </edmx:Reference>
    <edmx:Reference Uri="http://redfish.dmtf.org/schemas/v1/Chassis_v1.xml">
        <edmx:Include Namespace="Chassis"/>
        <edmx:Include Namespace="Chassis.v1_10_0"/>
    </edmx:Reference>
    <edmx:DataServices>
        <Schema xmlns="http://docs.oasis-open.org/odata/ns/edm" Namespace="Service">
            <EntityContainer Name="Service" Extends="ServiceRoot.v1_5_0.ServiceContainer"/>
        </Schema>
    </edmx:DataServices>
</edmx:Edmx>"#;

/// The chassis collection document; exactly one chassis exists
pub fn chassis_collection() -> Value {
    let members = [json!({"@odata.id": CHASSIS_PATH})];
    json!({
        "@odata.context": ResourceKind::ChassisCollection.odata_context(),
        "@odata.id": CHASSIS_COLLECTION_PATH,
        "@odata.type": ResourceKind::ChassisCollection.odata_type(),
        "Name": "Chassis Collection",
        "Members@odata.count": members.len(),
        "Members": members,
    })
}

/// The power-strip chassis document
pub fn chassis(strip: &StripSnapshot) -> Value {
    json!({
        "@odata.context": ResourceKind::Chassis.odata_context(),
        "@odata.id": CHASSIS_PATH,
        "@odata.type": ResourceKind::Chassis.odata_type(),
        "Id": CHASSIS_ID,
        "Name": strip.alias,
        "ChassisType": "RackMount",
        "Manufacturer": strip.manufacturer,
        "Model": strip.model,
        "SerialNumber": strip.device_id,
        "PartNumber": "HS300",
        "Status": {"State": "Enabled", "Health": "OK"},
        "PowerState": "On",
        "Power": {"@odata.id": POWER_PATH},
        "PowerSubsystem": {"@odata.id": POWER_SUBSYSTEM_PATH},
        "Outlets": {"@odata.id": OUTLET_COLLECTION_PATH},
        "Links": {
            "ManagedBy": [{"@odata.id": MANAGER_PATH}],
        },
    })
}

/// The chassis power resource
///
/// One PowerControl member per outlet. The wattage figures are static
/// placeholders: the strip does not report consumption over this protocol,
/// and the capacity is the nominal 15 A * 120 V of the input circuit.
pub fn power(strip: &StripSnapshot) -> Value {
    let power_control: Vec<Value> = strip
        .outlets
        .iter()
        .map(|outlet| {
            json!({
                "@odata.id": format!("{}#/PowerControl/{}", POWER_PATH, outlet.index),
                "MemberId": outlet.index.to_string(),
                "Name": outlet.alias,
                "PowerConsumedWatts": 0,
                "PowerCapacityWatts": 1800,
                "Status": {
                    "State": if outlet.is_on { "Enabled" } else { "Disabled" },
                    "Health": "OK",
                },
            })
        })
        .collect();
    json!({
        "@odata.context": ResourceKind::Power.odata_context(),
        "@odata.id": POWER_PATH,
        "@odata.type": ResourceKind::Power.odata_type(),
        "Id": "Power",
        "Name": "Power",
        "PowerControl@odata.count": power_control.len(),
        "PowerControl": power_control,
    })
}

/// The power subsystem document
pub fn power_subsystem() -> Value {
    json!({
        "@odata.context": ResourceKind::PowerSubsystem.odata_context(),
        "@odata.id": POWER_SUBSYSTEM_PATH,
        "@odata.type": ResourceKind::PowerSubsystem.odata_type(),
        "Id": "PowerSubsystem",
        "Name": "Power Subsystem",
        "Status": {"State": "Enabled", "Health": "OK"},
        "PowerSupplies": {"@odata.id": POWER_SUPPLIES_PATH},
        "OutletGroups": {"@odata.id": OUTLET_GROUPS_PATH},
    })
}

/// The power-supply collection; the strip has one AC input
pub fn power_supplies_collection() -> Value {
    let members = [json!({"@odata.id": POWER_SUPPLY_PATH})];
    json!({
        "@odata.context": ResourceKind::PowerSupplyCollection.odata_context(),
        "@odata.id": POWER_SUPPLIES_PATH,
        "@odata.type": ResourceKind::PowerSupplyCollection.odata_type(),
        "Name": "Power Supply Collection",
        "Members@odata.count": members.len(),
        "Members": members,
    })
}

/// The AC input power supply document
pub fn power_supply(strip: &StripSnapshot) -> Value {
    json!({
        "@odata.context": ResourceKind::PowerSupply.odata_context(),
        "@odata.id": POWER_SUPPLY_PATH,
        "@odata.type": ResourceKind::PowerSupply.odata_type(),
        "Id": "0",
        "Name": "AC Input",
        "Status": {"State": "Enabled", "Health": "OK"},
        "PowerSupplyType": "AC",
        "LineInputVoltage": 120,
        "Model": strip.model,
        "Manufacturer": strip.manufacturer,
    })
}

/// The outlet-group collection; one group covering every outlet
pub fn outlet_groups_collection() -> Value {
    let members = [json!({"@odata.id": OUTLET_GROUP_ALL_PATH})];
    json!({
        "@odata.context": ResourceKind::OutletGroupCollection.odata_context(),
        "@odata.id": OUTLET_GROUPS_PATH,
        "@odata.type": ResourceKind::OutletGroupCollection.odata_type(),
        "Name": "Outlet Group Collection",
        "Members@odata.count": members.len(),
        "Members": members,
    })
}

/// The all-outlets group document
pub fn outlet_group(strip: &StripSnapshot) -> Value {
    let outlets: Vec<Value> = strip
        .outlets
        .iter()
        .map(|outlet| json!({"@odata.id": outlet_path(outlet.index)}))
        .collect();
    json!({
        "@odata.context": ResourceKind::OutletGroup.odata_context(),
        "@odata.id": OUTLET_GROUP_ALL_PATH,
        "@odata.type": ResourceKind::OutletGroup.odata_type(),
        "Id": "All",
        "Name": "All Outlets",
        "Status": {"State": "Enabled", "Health": "OK"},
        "CreatedBy": "System",
        "PowerEnabled": true,
        "PowerState": "On",
        "Links": {
            "Outlets@odata.count": outlets.len(),
            "Outlets": outlets,
        },
    })
}

/// The outlet collection document
///
/// Members are enumerated in ascending index order and the count is taken
/// from the built list.
pub fn outlet_collection(strip: &StripSnapshot) -> Value {
    let members: Vec<Value> = strip
        .outlets
        .iter()
        .map(|outlet| json!({"@odata.id": outlet_path(outlet.index)}))
        .collect();
    json!({
        "@odata.context": ResourceKind::OutletCollection.odata_context(),
        "@odata.id": OUTLET_COLLECTION_PATH,
        "@odata.type": ResourceKind::OutletCollection.odata_type(),
        "Name": "Outlet Collection",
        "Members@odata.count": members.len(),
        "Members": members,
    })
}

/// A single outlet document
///
/// The electrical characteristics (voltage type, rated current, nominal
/// voltage, voltage reading) are static placeholders: the HS300 does not
/// report them, so fixed NEMA 5-15R values are served instead of live
/// telemetry.
pub fn outlet(outlet: &OutletSnapshot) -> Value {
    let power_state = if outlet.is_on { "On" } else { "Off" };
    let mut actions = serde_json::Map::new();
    for action in OUTLET_ACTIONS {
        let mut entry = serde_json::Map::new();
        entry.insert("target".to_string(), json!(action.target(outlet.index)));
        if action == OutletAction::PowerControl {
            entry.insert(
                "PowerState@Redfish.AllowableValues".to_string(),
                json!(["On", "Off"]),
            );
        }
        actions.insert(format!("#{}", action.name()), Value::Object(entry));
    }

    json!({
        "@odata.context": ResourceKind::Outlet.odata_context(),
        "@odata.id": outlet_path(outlet.index),
        "@odata.type": ResourceKind::Outlet.odata_type(),
        "Id": outlet.index.to_string(),
        "Name": outlet.alias,
        "Status": {"State": "Enabled", "Health": "OK"},
        "PhaseWiringType": "OnePhase3Wire",
        "VoltageType": "AC",
        "OutletType": "NEMA_5_15R",
        "RatedCurrentAmps": 15,
        "NominalVoltage": "AC120V",
        "PowerEnabled": outlet.is_on,
        "PowerState": power_state,
        "PowerCycleDelaySeconds": 0,
        "PowerOnDelaySeconds": 0,
        "PowerOffDelaySeconds": 0,
        "PowerRestoreDelaySeconds": 0,
        "PowerRestorePolicy": "LastState",
        "Voltage": {
            "Reading": 120,
            "DataSourceUri": format!("{}/Sensors/Voltage", outlet_path(outlet.index)),
        },
        "Actions": actions,
        "Links": {
            "BranchCircuit": {"@odata.id": POWER_SUPPLY_PATH},
        },
    })
}

/// The computer-system collection placeholder (always empty)
pub fn systems_collection() -> Value {
    json!({
        "@odata.context": ResourceKind::SystemCollection.odata_context(),
        "@odata.id": SYSTEMS_PATH,
        "@odata.type": ResourceKind::SystemCollection.odata_type(),
        "Name": "Computer System Collection",
        "Members@odata.count": 0,
        "Members": [],
    })
}

/// The manager collection document
pub fn managers_collection() -> Value {
    let members = [json!({"@odata.id": MANAGER_PATH})];
    json!({
        "@odata.context": ResourceKind::ManagerCollection.odata_context(),
        "@odata.id": MANAGERS_PATH,
        "@odata.type": ResourceKind::ManagerCollection.odata_type(),
        "Name": "Manager Collection",
        "Members@odata.count": members.len(),
        "Members": members,
    })
}

/// The BMC manager document
pub fn manager() -> Value {
    json!({
        "@odata.context": ResourceKind::Manager.odata_context(),
        "@odata.id": MANAGER_PATH,
        "@odata.type": ResourceKind::Manager.odata_type(),
        "Id": "BMC",
        "Name": "redstrip Manager",
        "ManagerType": "BMC",
        "Status": {"State": "Enabled", "Health": "OK"},
        "UUID": MANAGER_UUID,
        "Model": "redstrip BMC",
        "FirmwareVersion": env!("CARGO_PKG_VERSION"),
        "Links": {
            "ManagerForChassis": [{"@odata.id": CHASSIS_PATH}],
        },
    })
}

/// The session service placeholder (sessions are not enforced)
pub fn session_service() -> Value {
    json!({
        "@odata.context": ResourceKind::SessionService.odata_context(),
        "@odata.id": SESSION_SERVICE_PATH,
        "@odata.type": ResourceKind::SessionService.odata_type(),
        "Id": "SessionService",
        "Name": "Session Service",
        "Description": "Session Service",
        "Status": {"State": "Enabled", "Health": "OK"},
        "ServiceEnabled": true,
        "SessionTimeout": 3600,
        "Sessions": {"@odata.id": SESSIONS_PATH},
    })
}

/// The session collection placeholder (always empty)
pub fn sessions_collection() -> Value {
    json!({
        "@odata.context": ResourceKind::SessionCollection.odata_context(),
        "@odata.id": SESSIONS_PATH,
        "@odata.type": ResourceKind::SessionCollection.odata_type(),
        "Name": "Session Collection",
        "Description": "Session Collection",
        "Members@odata.count": 0,
        "Members": [],
    })
}
