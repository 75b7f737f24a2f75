use serde::{Deserialize, Serialize};

use super::{impl_scoped, Labels, Toggle};
use crate::secret::Secret;

/// Identifies a device group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceGroupId {
    pub organization_id: String,
    pub device_group_id: String,
}

impl DeviceGroupId {
    /// Creates a device group id.
    pub fn new(organization_id: impl Into<String>, device_group_id: impl Into<String>) -> Self {
        Self {
            organization_id: organization_id.into(),
            device_group_id: device_group_id.into(),
        }
    }
}

/// Identifies a device inside its group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceId {
    pub organization_id: String,
    pub device_group_id: String,
    pub device_id: String,
}

impl DeviceId {
    /// Creates a device id.
    pub fn new(
        organization_id: impl Into<String>,
        device_group_id: impl Into<String>,
        device_id: impl Into<String>,
    ) -> Self {
        Self {
            organization_id: organization_id.into(),
            device_group_id: device_group_id.into(),
            device_id: device_id.into(),
        }
    }
}

/// Creates a device group.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AddDeviceGroupRequest {
    pub organization_id: String,
    pub name: String,
    pub enabled: bool,
    /// Whether devices joining the group may connect by default
    pub default_device_connectivity: bool,
    pub labels: Labels,
}

/// A group of devices sharing enablement and connectivity defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceGroup {
    pub organization_id: String,
    pub device_group_id: String,
    pub name: String,
    pub labels: Labels,
    pub enabled: bool,
    pub default_device_connectivity: bool,
}

/// Device groups of an organization.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeviceGroupList {
    pub groups: Vec<DeviceGroup>,
}

/// Changes enablement and/or default connectivity of a device group.
///
/// The two settings change independently; at least one must be set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateDeviceGroupRequest {
    pub organization_id: String,
    pub device_group_id: String,
    pub enabled: Toggle,
    pub default_device_connectivity: Toggle,
}

/// Adds labels to, or removes labels from, a device.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceLabelRequest {
    pub organization_id: String,
    pub device_group_id: String,
    pub device_id: String,
    pub labels: Labels,
}

/// Enables or disables a device.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateDeviceRequest {
    pub organization_id: String,
    pub device_group_id: String,
    pub device_id: String,
    pub enabled: bool,
}

/// Connection state of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceStatus {
    Online,
    #[default]
    Offline,
}

/// A registered device.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Device {
    pub organization_id: String,
    pub device_group_id: String,
    pub device_id: String,
    /// Unix seconds
    pub register_since: i64,
    pub labels: Labels,
    pub enabled: bool,
    pub device_status: DeviceStatus,
}

/// Devices of one group.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeviceList {
    pub devices: Vec<Device>,
}

/// Registers a device in a group, authenticated by the group's API key.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterDeviceRequest {
    pub organization_id: String,
    pub device_group_id: String,
    pub device_group_api_key: Secret<String>,
    pub device_id: String,
}

/// Answer to a device registration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisteredDevice {
    pub organization_id: String,
    pub device_group_id: String,
    pub device_id: String,
    /// Key the device presents from now on
    pub device_api_key: String,
}

impl_scoped!(
    RegisterDeviceRequest,
    DeviceGroupId,
    DeviceId,
    AddDeviceGroupRequest,
    UpdateDeviceGroupRequest,
    DeviceLabelRequest,
    UpdateDeviceRequest,
);
