//! Capability set of the downstream services.
//!
//! One trait per backend domain. Implementations wrap whatever transport the
//! deployment uses (gRPC stubs, HTTP clients, in-process fakes) and report
//! failures as [`BackendError`]; the gateway never retries.
//!
//! Methods take their arguments by value so that calls can be moved onto
//! spawned tasks during fan-out.

#![allow(missing_docs)]

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::entities::{
    AddAppDescriptorRequest, AddConnectionRequest, AddDeviceGroupRequest, AddUserRequest,
    AppDescriptor, AppDescriptorId, AppInstance, AppInstanceId, AssetId, Asset,
    AssignRoleRequest, ChangePasswordRequest, ClusterId, ClusterInfo, ConnectionInstance,
    DeployRequest, DeploymentResponse, Device, DeviceGroup, DeviceGroupId, DeviceId,
    DeviceLabelRequest, EdgeController, RegisterDeviceRequest, RegisteredDevice,
    RemoveConnectionRequest,
    EdgeControllerExtendedInfo, EdgeControllerId, InstallAgentRequest, InstallAgentResponse,
    InstallRequest, InstallResponse, InventoryDevice, InventoryDeviceId, InventoryList,
    InventorySummary, Node, OrganizationId, QueryMetricsRequest, QueryMetricsResult, Role,
    UpdateAppDescriptorRequest, UpdateAssetRequest, UpdateClusterRequest,
    UpdateDeviceGroupRequest, UpdateDeviceLocationRequest, UpdateDeviceRequest,
    UpdateEdgeControllerRequest, UpdateGeolocationRequest, UpdateNodeRequest, UpdateUserRequest,
    User, UserId,
};
use crate::error::BackendError;

/// Result of a backend call.
pub type BackendResult<T> = Result<T, BackendError>;

/// Infrastructure manager: clusters.
#[async_trait]
pub trait ClustersClient: Send + Sync {
    async fn list_clusters(&self, organization: OrganizationId) -> BackendResult<Vec<ClusterInfo>>;
    async fn get_cluster(&self, cluster: ClusterId) -> BackendResult<ClusterInfo>;
    async fn update_cluster(&self, request: UpdateClusterRequest) -> BackendResult<()>;
    async fn install(&self, request: InstallRequest) -> BackendResult<InstallResponse>;
}

/// Infrastructure manager: nodes.
#[async_trait]
pub trait NodesClient: Send + Sync {
    async fn list_nodes(&self, cluster: ClusterId) -> BackendResult<Vec<Node>>;
    async fn update_node(&self, request: UpdateNodeRequest) -> BackendResult<Node>;
}

/// Application manager, including the application network.
#[async_trait]
pub trait ApplicationsClient: Send + Sync {
    async fn add_app_descriptor(
        &self,
        request: AddAppDescriptorRequest,
    ) -> BackendResult<AppDescriptor>;
    async fn list_app_descriptors(
        &self,
        organization: OrganizationId,
    ) -> BackendResult<Vec<AppDescriptor>>;
    async fn get_app_descriptor(&self, descriptor: AppDescriptorId) -> BackendResult<AppDescriptor>;
    async fn update_app_descriptor(
        &self,
        request: UpdateAppDescriptorRequest,
    ) -> BackendResult<AppDescriptor>;
    async fn remove_app_descriptor(&self, descriptor: AppDescriptorId) -> BackendResult<()>;
    async fn deploy(&self, request: DeployRequest) -> BackendResult<DeploymentResponse>;
    async fn undeploy(&self, instance: AppInstanceId) -> BackendResult<()>;
    async fn list_app_instances(&self, organization: OrganizationId) -> BackendResult<Vec<AppInstance>>;
    async fn get_app_instance(&self, instance: AppInstanceId) -> BackendResult<AppInstance>;
    async fn add_connection(&self, request: AddConnectionRequest) -> BackendResult<ConnectionInstance>;
    async fn remove_connection(&self, request: RemoveConnectionRequest) -> BackendResult<()>;
    async fn list_connections(
        &self,
        organization: OrganizationId,
    ) -> BackendResult<Vec<ConnectionInstance>>;
}

/// Device manager.
#[async_trait]
pub trait DevicesClient: Send + Sync {
    async fn add_device_group(&self, request: AddDeviceGroupRequest) -> BackendResult<DeviceGroup>;
    async fn list_device_groups(&self, organization: OrganizationId) -> BackendResult<Vec<DeviceGroup>>;
    async fn update_device_group(
        &self,
        request: UpdateDeviceGroupRequest,
    ) -> BackendResult<DeviceGroup>;
    async fn remove_device_group(&self, group: DeviceGroupId) -> BackendResult<()>;
    async fn list_devices(&self, group: DeviceGroupId) -> BackendResult<Vec<Device>>;
    async fn add_label_to_device(&self, request: DeviceLabelRequest) -> BackendResult<()>;
    async fn remove_label_from_device(&self, request: DeviceLabelRequest) -> BackendResult<()>;
    async fn update_device(&self, request: UpdateDeviceRequest) -> BackendResult<Device>;
    async fn remove_device(&self, device: DeviceId) -> BackendResult<()>;
    async fn register_device(&self, request: RegisterDeviceRequest) -> BackendResult<RegisteredDevice>;
}

/// User manager.
#[async_trait]
pub trait UsersClient: Send + Sync {
    async fn add_user(&self, request: AddUserRequest) -> BackendResult<User>;
    async fn get_user(&self, user: UserId) -> BackendResult<User>;
    async fn list_users(&self, organization: OrganizationId) -> BackendResult<Vec<User>>;
    async fn update_user(&self, request: UpdateUserRequest) -> BackendResult<()>;
    async fn remove_user(&self, user: UserId) -> BackendResult<()>;
    async fn change_password(&self, request: ChangePasswordRequest) -> BackendResult<()>;
    async fn assign_role(&self, request: AssignRoleRequest) -> BackendResult<User>;
    async fn list_roles(&self, organization: OrganizationId) -> BackendResult<Vec<Role>>;
}

/// Inventory manager.
#[async_trait]
pub trait InventoryClient: Send + Sync {
    async fn list(&self, organization: OrganizationId) -> BackendResult<InventoryList>;
    async fn summary(&self, organization: OrganizationId) -> BackendResult<InventorySummary>;
    async fn get_controller_extended_info(
        &self,
        controller: EdgeControllerId,
    ) -> BackendResult<EdgeControllerExtendedInfo>;
    async fn get_asset_info(&self, asset: AssetId) -> BackendResult<Asset>;
    async fn get_device_info(&self, device: InventoryDeviceId) -> BackendResult<InventoryDevice>;
    async fn update_asset(&self, request: UpdateAssetRequest) -> BackendResult<Asset>;
    async fn update_device_location(
        &self,
        request: UpdateDeviceLocationRequest,
    ) -> BackendResult<InventoryDevice>;
    async fn update_edge_controller(
        &self,
        request: UpdateEdgeControllerRequest,
    ) -> BackendResult<EdgeController>;
    async fn update_geolocation(
        &self,
        request: UpdateGeolocationRequest,
    ) -> BackendResult<EdgeController>;
    async fn install_agent(&self, request: InstallAgentRequest) -> BackendResult<InstallAgentResponse>;
    async fn query_metrics(&self, request: QueryMetricsRequest) -> BackendResult<QueryMetricsResult>;
}

/// Every backend client the gateway talks to.
///
/// Built once at startup and shared read-only by all handlers.
#[derive(Clone)]
pub struct BackendSet {
    pub clusters: Arc<dyn ClustersClient>,
    pub nodes: Arc<dyn NodesClient>,
    pub applications: Arc<dyn ApplicationsClient>,
    pub devices: Arc<dyn DevicesClient>,
    pub users: Arc<dyn UsersClient>,
    pub inventory: Arc<dyn InventoryClient>,
}

impl fmt::Debug for BackendSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendSet").finish_non_exhaustive()
    }
}
