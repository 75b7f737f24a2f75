use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{impl_scoped, LabelOp, Labels, Scoped};
use crate::secret::Secret;

/// Identifies an edge controller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeControllerId {
    pub organization_id: String,
    pub edge_controller_id: String,
}

impl EdgeControllerId {
    /// Creates an edge controller id.
    pub fn new(organization_id: impl Into<String>, edge_controller_id: impl Into<String>) -> Self {
        Self {
            organization_id: organization_id.into(),
            edge_controller_id: edge_controller_id.into(),
        }
    }
}

/// Identifies an asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetId {
    pub organization_id: String,
    pub asset_id: String,
}

impl AssetId {
    /// Creates an asset id.
    pub fn new(organization_id: impl Into<String>, asset_id: impl Into<String>) -> Self {
        Self {
            organization_id: organization_id.into(),
            asset_id: asset_id.into(),
        }
    }
}

/// Identifies a device as tracked by the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryDeviceId {
    pub organization_id: String,
    pub asset_device_id: String,
}

impl InventoryDeviceId {
    /// Creates an inventory device id.
    pub fn new(organization_id: impl Into<String>, asset_device_id: impl Into<String>) -> Self {
        Self {
            organization_id: organization_id.into(),
            asset_device_id: asset_device_id.into(),
        }
    }
}

/// Free-form physical location.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryLocation {
    pub geolocation: String,
}

/// Whether an agent or controller has checked in recently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    Online,
    #[default]
    Offline,
}

/// An edge controller managing assets on a site.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeController {
    pub organization_id: String,
    pub edge_controller_id: String,
    pub name: String,
    pub labels: Labels,
    pub location: Option<InventoryLocation>,
    pub status: ConnectionStatus,
    /// Unix seconds
    pub last_alive_timestamp: i64,
}

/// A host running an inventory agent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Asset {
    pub organization_id: String,
    pub edge_controller_id: String,
    pub asset_id: String,
    pub agent_id: String,
    pub labels: Labels,
    pub location: Option<InventoryLocation>,
    pub status: ConnectionStatus,
    /// Unix seconds
    pub last_alive_timestamp: i64,
}

/// A device as seen by the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryDevice {
    pub organization_id: String,
    pub device_group_id: String,
    pub device_id: String,
    pub asset_device_id: String,
    pub labels: Labels,
    pub location: Option<InventoryLocation>,
    pub enabled: bool,
}

/// Everything the inventory tracks for an organization.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryList {
    pub devices: Vec<InventoryDevice>,
    pub assets: Vec<Asset>,
    pub controllers: Vec<EdgeController>,
}

/// Aggregated capacity of an organization's assets.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InventorySummary {
    pub organization_id: String,
    pub total_num_cpu: u64,
    /// Bytes
    pub total_storage: u64,
    /// Bytes
    pub total_ram: u64,
}

/// An edge controller with the assets it manages.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeControllerExtendedInfo {
    pub controller: EdgeController,
    pub managed_assets: Vec<Asset>,
}

/// Changes the labels of an asset.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateAssetRequest {
    pub organization_id: String,
    pub asset_id: String,
    pub label_op: LabelOp,
    pub labels: Labels,
}

/// Changes the labels of an edge controller.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateEdgeControllerRequest {
    pub organization_id: String,
    pub edge_controller_id: String,
    pub label_op: LabelOp,
    pub labels: Labels,
}

/// Sets the location of an edge controller.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateGeolocationRequest {
    pub organization_id: String,
    pub edge_controller_id: String,
    pub geolocation: String,
}

/// Sets or clears the location of a device.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateDeviceLocationRequest {
    pub organization_id: String,
    pub asset_device_id: String,
    /// `None` clears the location
    pub location: Option<InventoryLocation>,
}

/// Kind of agent to install on a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentType {
    #[default]
    LinuxAmd64,
    LinuxArm32,
    LinuxArm64,
    WindowsAmd64,
}

/// Asks an edge controller to install an agent on a host.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct InstallAgentRequest {
    pub organization_id: String,
    pub edge_controller_id: String,
    pub agent_type: AgentType,
    /// Host address reachable from the edge controller
    pub target_host: String,
    pub username: String,
    pub password: Secret<String>,
    pub sudoer: bool,
}

/// Handle of a started agent install.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallAgentResponse {
    pub organization_id: String,
    pub edge_controller_id: String,
    pub operation_id: String,
}

/// Selects the assets a metrics query covers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetSelector {
    pub organization_id: String,
    /// Restrict to assets of this controller; empty means any
    pub edge_controller_id: String,
    pub asset_ids: Vec<String>,
    pub labels: Labels,
}

/// A point in time or a window of a metrics query. Zero means unset.
///
/// Either `timestamp` alone is set, or at least one of `time_start` and
/// `time_end` is set (optionally with `resolution`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeRange {
    /// Unix seconds
    pub timestamp: i64,
    /// Unix seconds
    pub time_start: i64,
    /// Unix seconds
    pub time_end: i64,
    /// Seconds between points
    pub resolution: i64,
}

impl TimeRange {
    /// A single point in time.
    pub fn at(timestamp: i64) -> Self {
        Self {
            timestamp,
            ..Self::default()
        }
    }

    /// A window with the given resolution.
    pub fn window(time_start: i64, time_end: i64, resolution: i64) -> Self {
        Self {
            timestamp: 0,
            time_start,
            time_end,
            resolution,
        }
    }
}

/// How values of several assets are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationType {
    /// One series per asset
    #[default]
    None,
    Sum,
    Avg,
}

/// Queries monitoring metrics of a set of assets.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryMetricsRequest {
    pub assets: Option<AssetSelector>,
    pub metrics: Vec<String>,
    /// A missing range is checked as an all-zero one
    pub time_range: Option<TimeRange>,
    pub aggregation: AggregationType,
}

impl Scoped for QueryMetricsRequest {
    /// The selector's organization, or empty without a selector.
    fn organization_id(&self) -> &str {
        self.assets
            .as_ref()
            .map_or("", |selector| selector.organization_id.as_str())
    }
}

/// One sample of a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MetricValue {
    /// Unix seconds
    pub timestamp: i64,
    pub value: i64,
}

/// Samples of one metric for one asset, or aggregated over several.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricSeries {
    /// Empty for aggregated series
    pub asset_id: String,
    pub aggregation: AggregationType,
    pub values: Vec<MetricValue>,
}

/// Metric series keyed by metric name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryMetricsResult {
    pub metrics: BTreeMap<String, Vec<MetricSeries>>,
}

impl_scoped!(
    EdgeControllerId,
    AssetId,
    InventoryDeviceId,
    UpdateAssetRequest,
    UpdateEdgeControllerRequest,
    UpdateGeolocationRequest,
    UpdateDeviceLocationRequest,
    InstallAgentRequest,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_request_is_scoped_by_its_selector() {
        let mut request = QueryMetricsRequest::default();
        assert_eq!(request.organization_id(), "");

        request.assets = Some(AssetSelector {
            organization_id: "org-1".to_string(),
            ..AssetSelector::default()
        });
        assert_eq!(request.organization_id(), "org-1");
    }

    #[test]
    fn install_agent_request_hides_password() {
        let request: InstallAgentRequest = serde_json::from_str(
            r#"{"organization_id":"org-1","edge_controller_id":"ec-1","target_host":"10.0.0.4","username":"root","password":"toor"}"#,
        )
        .expect("valid request");

        assert_eq!(request.password.expose_secret(), "toor");
        assert!(!format!("{request:?}").contains("toor"));
    }
}
