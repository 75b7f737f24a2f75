//! Request and response types for every gateway operation.
//!
//! Each request type carries the organization it targets and implements
//! [`Scoped`], which is what the organization guard compares against the
//! caller. Response types are plain serde values; composite ones such as
//! [`Cluster`] are assembled per request and never cached.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ValidationFailure;

#[allow(missing_docs)]
mod applications;
#[allow(missing_docs)]
mod clusters;
#[allow(missing_docs)]
mod devices;
#[allow(missing_docs)]
mod inventory;
#[allow(missing_docs)]
mod users;

pub use applications::{
    AddAppDescriptorRequest, AddConnectionRequest, AppDescriptor, AppDescriptorId,
    AppDescriptorList, AppInstance, AppInstanceId, AppInstanceList, ApplicationStatus,
    ConnectionInstance, ConnectionInstanceList, ConnectionState, DeployRequest,
    DeploymentResponse, DescriptorDocument, PortAccess, RemoveConnectionRequest, SecurityRule,
    Service, ServiceGroup, UpdateAppDescriptorRequest,
};
pub use clusters::{
    Cluster, ClusterId, ClusterInfo, ClusterList, ClusterType, InfraStatus, InstallRequest,
    InstallResponse, InstallState, Node, NodeList, UpdateClusterRequest, UpdateNodeRequest,
};
pub use devices::{
    AddDeviceGroupRequest, Device, DeviceGroup, DeviceGroupId, DeviceGroupList, DeviceId,
    DeviceLabelRequest, DeviceList, DeviceStatus, RegisterDeviceRequest, RegisteredDevice,
    UpdateDeviceGroupRequest, UpdateDeviceRequest,
};
pub use inventory::{
    AggregationType, AgentType, Asset, AssetId, AssetSelector, ConnectionStatus, EdgeController,
    EdgeControllerExtendedInfo, EdgeControllerId, InstallAgentRequest, InstallAgentResponse,
    InventoryDevice, InventoryDeviceId, InventoryList, InventoryLocation, InventorySummary,
    MetricSeries, MetricValue, QueryMetricsRequest, QueryMetricsResult, TimeRange,
    UpdateAssetRequest, UpdateDeviceLocationRequest, UpdateEdgeControllerRequest,
    UpdateGeolocationRequest,
};
pub use users::{
    AddUserRequest, AssignRoleRequest, ChangePasswordRequest, Role, RoleList,
    UpdateUserRequest, User, UserId, UserList,
};

/// Key/value labels attached to clusters, nodes, descriptors, devices and assets.
pub type Labels = BTreeMap<String, String>;

/// A request that names the organization it acts on.
pub trait Scoped {
    /// The organization the request targets. May be empty on malformed input.
    fn organization_id(&self) -> &str;
}

macro_rules! impl_scoped {
    ($($request:ty),+ $(,)?) => {
        $(
            impl $crate::entities::Scoped for $request {
                fn organization_id(&self) -> &str {
                    &self.organization_id
                }
            }
        )+
    };
}
pub(crate) use impl_scoped;

/// Identifies an organization. Used by every list and summary operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizationId {
    /// Organization identifier
    pub organization_id: String,
}

impl OrganizationId {
    /// Creates an organization id.
    pub fn new(organization_id: impl Into<String>) -> Self {
        Self {
            organization_id: organization_id.into(),
        }
    }
}

impl_scoped!(OrganizationId);

/// What a label-carrying update does with its `labels`.
///
/// Transports that expose the two historical booleans convert them with
/// [`LabelOp::from_flags`], which keeps their error message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelOp {
    /// Labels are left untouched
    #[default]
    Unset,
    /// `labels` are added to the resource
    Add,
    /// `labels` are removed from the resource
    Remove,
}

impl LabelOp {
    /// Converts an `add_labels`/`remove_labels` flag pair.
    ///
    /// # Errors
    ///
    /// Fails when both flags are set.
    ///
    /// # Examples
    ///
    /// ```
    /// use gateway_core::entities::LabelOp;
    ///
    /// assert_eq!(LabelOp::from_flags(true, false).unwrap(), LabelOp::Add);
    /// assert_eq!(LabelOp::from_flags(false, false).unwrap(), LabelOp::Unset);
    /// assert!(LabelOp::from_flags(true, true).is_err());
    /// ```
    pub fn from_flags(add: bool, remove: bool) -> Result<Self, ValidationFailure> {
        match (add, remove) {
            (true, true) => Err(ValidationFailure::rule(
                "add_labels and remove_labels cannot be set at the same time",
            )),
            (true, false) => Ok(LabelOp::Add),
            (false, true) => Ok(LabelOp::Remove),
            (false, false) => Ok(LabelOp::Unset),
        }
    }

    /// Returns true for `Add` and `Remove`.
    pub fn is_set(self) -> bool {
        self != LabelOp::Unset
    }
}

/// An optional change to a boolean setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Toggle {
    /// The setting is not changed
    #[default]
    Unset,
    /// The setting is switched on
    Enable,
    /// The setting is switched off
    Disable,
}

impl Toggle {
    /// Converts an enable/disable flag pair for the setting named `field`.
    ///
    /// # Errors
    ///
    /// Fails when both flags are set.
    pub fn from_flags(enable: bool, disable: bool, field: &'static str) -> Result<Self, ValidationFailure> {
        match (enable, disable) {
            (true, true) => Err(ValidationFailure::new(
                field,
                format!("{field} cannot be enabled and disabled at the same time"),
            )),
            (true, false) => Ok(Toggle::Enable),
            (false, true) => Ok(Toggle::Disable),
            (false, false) => Ok(Toggle::Unset),
        }
    }

    /// Returns true for `Enable` and `Disable`.
    pub fn is_set(self) -> bool {
        self != Toggle::Unset
    }

    /// The new value of the setting, if it changes.
    pub fn value(self) -> Option<bool> {
        match self {
            Toggle::Unset => None,
            Toggle::Enable => Some(true),
            Toggle::Disable => Some(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_flags_both_set_keep_historical_message() {
        let failure = LabelOp::from_flags(true, true).unwrap_err();
        assert_eq!(
            failure.message(),
            "add_labels and remove_labels cannot be set at the same time"
        );
    }

    #[test]
    fn label_op_deserializes_from_snake_case() {
        let op: LabelOp = serde_json::from_str("\"remove\"").expect("valid label op");
        assert_eq!(op, LabelOp::Remove);
        assert!(op.is_set());
        assert!(!LabelOp::default().is_set());
    }

    #[test]
    fn toggle_flags() {
        assert_eq!(Toggle::from_flags(true, false, "enabled").unwrap().value(), Some(true));
        assert_eq!(Toggle::from_flags(false, true, "enabled").unwrap().value(), Some(false));
        assert_eq!(Toggle::from_flags(false, false, "enabled").unwrap().value(), None);

        let failure = Toggle::from_flags(true, true, "enabled").unwrap_err();
        assert_eq!(failure.field(), Some("enabled"));
    }

    #[test]
    fn organization_id_is_scoped() {
        let request = OrganizationId::new("org-1");
        assert_eq!(Scoped::organization_id(&request), "org-1");
    }
}
