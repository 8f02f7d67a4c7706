/*!
 * The fixed Redfish resource tree.
 *
 * Every addressable resource kind is declared here with its schema identity
 * (odata context and type tags) and canonical path. These are contract
 * constants: they must not drift between requests, and the document builder
 * derives self-links and member links exclusively from this table.
 */
use crate::error::ApiError;

/// Id of the single chassis the service exposes
pub const CHASSIS_ID: &str = "PowerStrip";

/// Canonical path of the service root
pub const SERVICE_ROOT_PATH: &str = "/redfish/v1/";
/// Canonical path of the chassis collection
pub const CHASSIS_COLLECTION_PATH: &str = "/redfish/v1/Chassis";
/// Canonical path of the power-strip chassis
pub const CHASSIS_PATH: &str = "/redfish/v1/Chassis/PowerStrip";
/// Canonical path of the outlet collection
pub const OUTLET_COLLECTION_PATH: &str = "/redfish/v1/Chassis/PowerStrip/Outlets";
/// Canonical path of the chassis power resource
pub const POWER_PATH: &str = "/redfish/v1/Chassis/PowerStrip/Power";
/// Canonical path of the power subsystem
pub const POWER_SUBSYSTEM_PATH: &str = "/redfish/v1/Chassis/PowerStrip/PowerSubsystem";
/// Canonical path of the power-supply collection
pub const POWER_SUPPLIES_PATH: &str =
    "/redfish/v1/Chassis/PowerStrip/PowerSubsystem/PowerSupplies";
/// Canonical path of the AC input power supply
pub const POWER_SUPPLY_PATH: &str =
    "/redfish/v1/Chassis/PowerStrip/PowerSubsystem/PowerSupplies/0";
/// Canonical path of the outlet-group collection
pub const OUTLET_GROUPS_PATH: &str =
    "/redfish/v1/Chassis/PowerStrip/PowerSubsystem/OutletGroups";
/// Canonical path of the all-outlets group
pub const OUTLET_GROUP_ALL_PATH: &str =
    "/redfish/v1/Chassis/PowerStrip/PowerSubsystem/OutletGroups/All";
/// Canonical path of the systems collection
pub const SYSTEMS_PATH: &str = "/redfish/v1/Systems";
/// Canonical path of the manager collection
pub const MANAGERS_PATH: &str = "/redfish/v1/Managers";
/// Canonical path of the BMC manager
pub const MANAGER_PATH: &str = "/redfish/v1/Managers/BMC";
/// Canonical path of the session service
pub const SESSION_SERVICE_PATH: &str = "/redfish/v1/SessionService";
/// Canonical path of the session collection
pub const SESSIONS_PATH: &str = "/redfish/v1/SessionService/Sessions";

/// The closed set of resource kinds the service exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// The service root
    ServiceRoot,
    /// The chassis collection
    ChassisCollection,
    /// The power-strip chassis
    Chassis,
    /// The outlet collection
    OutletCollection,
    /// A single outlet
    Outlet,
    /// The chassis power resource
    Power,
    /// The power subsystem
    PowerSubsystem,
    /// The power-supply collection
    PowerSupplyCollection,
    /// The AC input power supply
    PowerSupply,
    /// The outlet-group collection
    OutletGroupCollection,
    /// The all-outlets group
    OutletGroup,
    /// The computer-system collection (static placeholder)
    SystemCollection,
    /// The manager collection (static placeholder)
    ManagerCollection,
    /// The BMC manager (static placeholder)
    Manager,
    /// The session service (static placeholder)
    SessionService,
    /// The session collection (static placeholder)
    SessionCollection,
}

impl ResourceKind {
    /// The odata context tag for this kind
    pub fn odata_context(&self) -> &'static str {
        match self {
            ResourceKind::ServiceRoot => "/redfish/v1/$metadata#ServiceRoot.ServiceRoot",
            ResourceKind::ChassisCollection => {
                "/redfish/v1/$metadata#ChassisCollection.ChassisCollection"
            }
            ResourceKind::Chassis => "/redfish/v1/$metadata#Chassis.Chassis",
            ResourceKind::OutletCollection => {
                "/redfish/v1/$metadata#OutletCollection.OutletCollection"
            }
            ResourceKind::Outlet => "/redfish/v1/$metadata#Outlet.Outlet",
            ResourceKind::Power => "/redfish/v1/$metadata#Power.Power",
            ResourceKind::PowerSubsystem => {
                "/redfish/v1/$metadata#PowerSubsystem.PowerSubsystem"
            }
            ResourceKind::PowerSupplyCollection => {
                "/redfish/v1/$metadata#PowerSupplyCollection.PowerSupplyCollection"
            }
            ResourceKind::PowerSupply => "/redfish/v1/$metadata#PowerSupply.PowerSupply",
            ResourceKind::OutletGroupCollection => {
                "/redfish/v1/$metadata#OutletGroupCollection.OutletGroupCollection"
            }
            ResourceKind::OutletGroup => "/redfish/v1/$metadata#OutletGroup.OutletGroup",
            ResourceKind::SystemCollection => {
                "/redfish/v1/$metadata#ComputerSystemCollection.ComputerSystemCollection"
            }
            ResourceKind::ManagerCollection => {
                "/redfish/v1/$metadata#ManagerCollection.ManagerCollection"
            }
            ResourceKind::Manager => "/redfish/v1/$metadata#Manager.Manager",
            ResourceKind::SessionService => {
                "/redfish/v1/$metadata#SessionService.SessionService"
            }
            ResourceKind::SessionCollection => {
                "/redfish/v1/$metadata#SessionCollection.SessionCollection"
            }
        }
    }

    /// The versioned odata type tag for this kind
    pub fn odata_type(&self) -> &'static str {
        match self {
            ResourceKind::ServiceRoot => "#ServiceRoot.v1_5_0.ServiceRoot",
            ResourceKind::ChassisCollection => "#ChassisCollection.ChassisCollection",
            ResourceKind::Chassis => "#Chassis.v1_10_0.Chassis",
            ResourceKind::OutletCollection => "#OutletCollection.OutletCollection",
            ResourceKind::Outlet => "#Outlet.v1_4_0.Outlet",
            ResourceKind::Power => "#Power.v1_7_0.Power",
            ResourceKind::PowerSubsystem => "#PowerSubsystem.v1_1_0.PowerSubsystem",
            ResourceKind::PowerSupplyCollection => {
                "#PowerSupplyCollection.PowerSupplyCollection"
            }
            ResourceKind::PowerSupply => "#PowerSupply.v1_5_0.PowerSupply",
            ResourceKind::OutletGroupCollection => {
                "#OutletGroupCollection.OutletGroupCollection"
            }
            ResourceKind::OutletGroup => "#OutletGroup.v1_1_0.OutletGroup",
            ResourceKind::SystemCollection => {
                "#ComputerSystemCollection.ComputerSystemCollection"
            }
            ResourceKind::ManagerCollection => "#ManagerCollection.ManagerCollection",
            ResourceKind::Manager => "#Manager.v1_5_0.Manager",
            ResourceKind::SessionService => "#SessionService.v1_1_7.SessionService",
            ResourceKind::SessionCollection => "#SessionCollection.SessionCollection",
        }
    }
}

/// The canonical path of outlet `index`
pub fn outlet_path(index: usize) -> String {
    format!("{}/{}", OUTLET_COLLECTION_PATH, index)
}

/// The closed set of actions an outlet supports
///
/// This enum drives both the actions advertised in outlet documents and the
/// actions the dispatcher accepts, so the two can never diverge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutletAction {
    /// Switch the outlet relay on or off
    PowerControl,
    /// Clear accumulated outlet metrics (acknowledged no-op on the HS300)
    ResetMetrics,
}

/// Every action an outlet advertises
pub const OUTLET_ACTIONS: [OutletAction; 2] =
    [OutletAction::PowerControl, OutletAction::ResetMetrics];

impl OutletAction {
    /// The action name as it appears in the URL and the actions sub-document
    pub fn name(&self) -> &'static str {
        match self {
            OutletAction::PowerControl => "Outlet.PowerControl",
            OutletAction::ResetMetrics => "Outlet.ResetMetrics",
        }
    }

    /// Resolve an action name from a request path
    ///
    /// The action namespace is closed; anything unknown is absent, not
    /// invalid.
    pub fn from_name(name: &str) -> Option<Self> {
        OUTLET_ACTIONS.iter().copied().find(|a| a.name() == name)
    }

    /// The canonical POST target of this action on outlet `index`
    pub fn target(&self, index: usize) -> String {
        format!("{}/Actions/{}", outlet_path(index), self.name())
    }
}

/// Check that a chassis id addresses the one chassis that exists
pub fn resolve_chassis(chassis_id: &str) -> Result<(), ApiError> {
    if chassis_id == CHASSIS_ID {
        Ok(())
    } else {
        Err(ApiError::not_found("Chassis not found"))
    }
}

/// Parse an outlet index path segment
///
/// A segment that is not a number at all is a malformed path, which is
/// distinct from a well-formed index that is out of range.
pub fn parse_outlet_index(segment: &str) -> Result<usize, ApiError> {
    segment
        .parse::<usize>()
        .map_err(|_| ApiError::invalid("Invalid outlet index"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outlet_paths() {
        assert_eq!(
            outlet_path(3),
            "/redfish/v1/Chassis/PowerStrip/Outlets/3"
        );
        assert_eq!(
            OutletAction::PowerControl.target(0),
            "/redfish/v1/Chassis/PowerStrip/Outlets/0/Actions/Outlet.PowerControl"
        );
    }

    #[test]
    fn test_action_namespace_is_closed() {
        assert_eq!(
            OutletAction::from_name("Outlet.PowerControl"),
            Some(OutletAction::PowerControl)
        );
        assert_eq!(
            OutletAction::from_name("Outlet.ResetMetrics"),
            Some(OutletAction::ResetMetrics)
        );
        assert_eq!(OutletAction::from_name("Outlet.SelfDestruct"), None);
        assert_eq!(OutletAction::from_name("powercontrol"), None);
    }

    #[test]
    fn test_resolve_chassis() {
        assert!(resolve_chassis("PowerStrip").is_ok());
        assert!(resolve_chassis("Rack42").is_err());
        assert!(resolve_chassis("powerstrip").is_err());
    }

    #[test]
    fn test_parse_outlet_index() {
        assert_eq!(parse_outlet_index("0").unwrap(), 0);
        assert_eq!(parse_outlet_index("12").unwrap(), 12);
        assert!(parse_outlet_index("two").is_err());
        assert!(parse_outlet_index("-1").is_err());
    }
}
