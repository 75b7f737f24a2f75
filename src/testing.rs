//! In-memory backends for tests and local runs.
//!
//! [`StubBackends`] implements every backend trait over a fixed set of
//! clusters and users, records each call it receives, and can be told to fail
//! or stall specific operations. Responses to mutating calls echo the request.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::backend::{
    ApplicationsClient, BackendResult, BackendSet, ClustersClient, DevicesClient,
    InventoryClient, NodesClient, UsersClient,
};
use crate::entities::{
    AddAppDescriptorRequest, AddConnectionRequest, AddDeviceGroupRequest, AddUserRequest,
    AppDescriptor, AppDescriptorId, AppInstance, AppInstanceId, ApplicationStatus, Asset,
    AssetId, AssignRoleRequest, ChangePasswordRequest, ClusterId, ClusterInfo,
    ConnectionInstance, ConnectionState, ConnectionStatus, DeployRequest, DeploymentResponse,
    Device, DeviceGroup, DeviceGroupId, DeviceId, DeviceLabelRequest, EdgeController,
    EdgeControllerExtendedInfo, EdgeControllerId,
    InfraStatus, InstallAgentRequest, InstallAgentResponse, InstallRequest, InstallResponse,
    InstallState, InventoryDevice, InventoryDeviceId, InventoryList, InventoryLocation,
    InventorySummary, LabelOp, Labels, Node, OrganizationId, QueryMetricsRequest,
    QueryMetricsResult, RegisterDeviceRequest, RegisteredDevice, RemoveConnectionRequest, Role,
    UpdateAppDescriptorRequest, UpdateAssetRequest, UpdateClusterRequest,
    UpdateDeviceGroupRequest, UpdateDeviceLocationRequest, UpdateDeviceRequest,
    UpdateEdgeControllerRequest,
    UpdateGeolocationRequest, UpdateNodeRequest, UpdateUserRequest, User, UserId,
};
use crate::error::{BackendError, BackendErrorKind};

/// Call-counting fake of every downstream service.
///
/// Configure it with the builder methods, wrap it in an [`Arc`] and hand
/// [`StubBackends::backend_set`] to the gateway. The same `Arc` can then be
/// asked how often each operation was reached.
#[derive(Debug, Default)]
pub struct StubBackends {
    clusters: Vec<(ClusterInfo, Vec<Node>)>,
    users: Vec<User>,
    failures: HashMap<&'static str, BackendError>,
    node_failures: HashMap<String, BackendError>,
    latency: HashMap<&'static str, Duration>,
    calls: Mutex<Vec<&'static str>>,
}

impl StubBackends {
    /// Empty backends: every list is empty, every lookup is `NotFound`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a cluster and its nodes.
    pub fn with_cluster(mut self, info: ClusterInfo, nodes: Vec<Node>) -> Self {
        self.clusters.push((info, nodes));
        self
    }

    /// Adds a user.
    pub fn with_user(mut self, user: User) -> Self {
        self.users.push(user);
        self
    }

    /// Makes every call to `operation` fail with `error`.
    pub fn failing(mut self, operation: &'static str, error: BackendError) -> Self {
        self.failures.insert(operation, error);
        self
    }

    /// Makes `list_nodes` fail for one cluster only.
    pub fn failing_node_list(mut self, cluster_id: impl Into<String>, error: BackendError) -> Self {
        self.node_failures.insert(cluster_id.into(), error);
        self
    }

    /// Delays every call to `operation` by `delay`.
    pub fn with_latency(mut self, operation: &'static str, delay: Duration) -> Self {
        self.latency.insert(operation, delay);
        self
    }

    /// Exposes this stub as every backend client.
    pub fn backend_set(self: &Arc<Self>) -> BackendSet {
        let this: Arc<StubBackends> = Arc::clone(self);
        BackendSet {
            clusters: this.clone(),
            nodes: this.clone(),
            applications: this.clone(),
            devices: this.clone(),
            users: this.clone(),
            inventory: this,
        }
    }

    /// Number of calls received for `operation`.
    pub fn calls_to(&self, operation: &str) -> usize {
        self.recorded().iter().filter(|name| **name == operation).count()
    }

    /// Number of calls received in total.
    pub fn call_count(&self) -> usize {
        self.recorded().len()
    }

    fn recorded(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    async fn enter(&self, operation: &'static str) -> BackendResult<()> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(operation);

        if let Some(delay) = self.latency.get(operation) {
            tokio::time::sleep(*delay).await;
        }
        match self.failures.get(operation) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn cluster(&self, id: &ClusterId) -> BackendResult<&(ClusterInfo, Vec<Node>)> {
        self.clusters
            .iter()
            .find(|(info, _)| {
                info.organization_id == id.organization_id && info.cluster_id == id.cluster_id
            })
            .ok_or_else(|| BackendError::not_found(format!("cluster {}", id.cluster_id)))
    }

    fn user(&self, id: &UserId) -> BackendResult<&User> {
        self.users
            .iter()
            .find(|user| user.organization_id == id.organization_id && user.email == id.email)
            .ok_or_else(|| BackendError::not_found(format!("user {}", id.email)))
    }
}

/// A cluster record with no labels and status `Running`.
pub fn cluster_info(organization_id: &str, cluster_id: &str, name: &str) -> ClusterInfo {
    ClusterInfo {
        organization_id: organization_id.to_string(),
        cluster_id: cluster_id.to_string(),
        name: name.to_string(),
        status: InfraStatus::Running,
        ..ClusterInfo::default()
    }
}

/// `total` nodes of one cluster, the first `running` of them running.
pub fn nodes(organization_id: &str, cluster_id: &str, total: usize, running: usize) -> Vec<Node> {
    (0..total)
        .map(|index| Node {
            organization_id: organization_id.to_string(),
            cluster_id: cluster_id.to_string(),
            node_id: format!("{cluster_id}-n{index}"),
            ip: format!("10.0.0.{index}"),
            labels: Labels::new(),
            status: if index < running {
                InfraStatus::Running
            } else {
                InfraStatus::Error
            },
        })
        .collect()
}

/// A user with the given role name.
pub fn user(organization_id: &str, email: &str, role_name: &str) -> User {
    User {
        organization_id: organization_id.to_string(),
        email: email.to_string(),
        name: email.split('@').next().unwrap_or(email).to_string(),
        role_id: format!("role-{role_name}"),
        role_name: role_name.to_string(),
    }
}

#[async_trait]
impl ClustersClient for StubBackends {
    async fn list_clusters(&self, organization: OrganizationId) -> BackendResult<Vec<ClusterInfo>> {
        self.enter("list_clusters").await?;
        Ok(self
            .clusters
            .iter()
            .filter(|(info, _)| info.organization_id == organization.organization_id)
            .map(|(info, _)| info.clone())
            .collect())
    }

    async fn get_cluster(&self, cluster: ClusterId) -> BackendResult<ClusterInfo> {
        self.enter("get_cluster").await?;
        self.cluster(&cluster).map(|(info, _)| info.clone())
    }

    async fn update_cluster(&self, request: UpdateClusterRequest) -> BackendResult<()> {
        self.enter("update_cluster").await?;
        let id = ClusterId::new(request.organization_id, request.cluster_id);
        self.cluster(&id).map(|_| ())
    }

    async fn install(&self, request: InstallRequest) -> BackendResult<InstallResponse> {
        self.enter("install").await?;
        let cluster_id = if request.cluster_id.is_empty() {
            format!("cluster-{}", request.hostname)
        } else {
            request.cluster_id
        };
        Ok(InstallResponse {
            organization_id: request.organization_id,
            install_id: format!("install-{cluster_id}"),
            cluster_id,
            state: InstallState::Registered,
        })
    }
}

#[async_trait]
impl NodesClient for StubBackends {
    async fn list_nodes(&self, cluster: ClusterId) -> BackendResult<Vec<Node>> {
        self.enter("list_nodes").await?;
        if let Some(error) = self.node_failures.get(&cluster.cluster_id) {
            return Err(error.clone());
        }
        self.cluster(&cluster).map(|(_, nodes)| nodes.clone())
    }

    async fn update_node(&self, request: UpdateNodeRequest) -> BackendResult<Node> {
        self.enter("update_node").await?;
        let node = self
            .clusters
            .iter()
            .filter(|(info, _)| info.organization_id == request.organization_id)
            .flat_map(|(_, nodes)| nodes.iter())
            .find(|node| node.node_id == request.node_id)
            .ok_or_else(|| BackendError::not_found(format!("node {}", request.node_id)))?;

        let mut node = node.clone();
        match request.label_op {
            LabelOp::Add => node.labels.extend(request.labels),
            LabelOp::Remove => node.labels.retain(|key, _| !request.labels.contains_key(key)),
            LabelOp::Unset => {}
        }
        Ok(node)
    }
}

#[async_trait]
impl ApplicationsClient for StubBackends {
    async fn add_app_descriptor(
        &self,
        request: AddAppDescriptorRequest,
    ) -> BackendResult<AppDescriptor> {
        self.enter("add_app_descriptor").await?;
        Ok(AppDescriptor {
            organization_id: request.organization_id,
            app_descriptor_id: format!("descriptor-{}", request.name),
            name: request.name,
            labels: request.labels,
            rules: request.rules,
            groups: request.groups,
        })
    }

    async fn list_app_descriptors(
        &self,
        _organization: OrganizationId,
    ) -> BackendResult<Vec<AppDescriptor>> {
        self.enter("list_app_descriptors").await?;
        Ok(Vec::new())
    }

    async fn get_app_descriptor(&self, descriptor: AppDescriptorId) -> BackendResult<AppDescriptor> {
        self.enter("get_app_descriptor").await?;
        Err(BackendError::not_found(format!(
            "descriptor {}",
            descriptor.app_descriptor_id
        )))
    }

    async fn update_app_descriptor(
        &self,
        request: UpdateAppDescriptorRequest,
    ) -> BackendResult<AppDescriptor> {
        self.enter("update_app_descriptor").await?;
        Ok(AppDescriptor {
            organization_id: request.organization_id,
            app_descriptor_id: request.app_descriptor_id,
            labels: request.labels,
            ..AppDescriptor::default()
        })
    }

    async fn remove_app_descriptor(&self, _descriptor: AppDescriptorId) -> BackendResult<()> {
        self.enter("remove_app_descriptor").await
    }

    async fn deploy(&self, request: DeployRequest) -> BackendResult<DeploymentResponse> {
        self.enter("deploy").await?;
        Ok(DeploymentResponse {
            request_id: format!("deploy-{}", request.app_descriptor_id),
            app_instance_id: format!("instance-{}", request.name),
            status: ApplicationStatus::Queued,
        })
    }

    async fn undeploy(&self, _instance: AppInstanceId) -> BackendResult<()> {
        self.enter("undeploy").await
    }

    async fn list_app_instances(&self, _organization: OrganizationId) -> BackendResult<Vec<AppInstance>> {
        self.enter("list_app_instances").await?;
        Ok(Vec::new())
    }

    async fn get_app_instance(&self, instance: AppInstanceId) -> BackendResult<AppInstance> {
        self.enter("get_app_instance").await?;
        Err(BackendError::not_found(format!("instance {}", instance.app_instance_id)))
    }

    async fn add_connection(&self, request: AddConnectionRequest) -> BackendResult<ConnectionInstance> {
        self.enter("add_connection").await?;
        Ok(ConnectionInstance {
            connection_id: format!(
                "{}:{}->{}:{}",
                request.source_instance_id,
                request.outbound_name,
                request.target_instance_id,
                request.inbound_name
            ),
            organization_id: request.organization_id,
            source_instance_id: request.source_instance_id,
            outbound_name: request.outbound_name,
            target_instance_id: request.target_instance_id,
            inbound_name: request.inbound_name,
            state: ConnectionState::Waiting,
            ..ConnectionInstance::default()
        })
    }

    async fn remove_connection(&self, _request: RemoveConnectionRequest) -> BackendResult<()> {
        self.enter("remove_connection").await
    }

    async fn list_connections(
        &self,
        _organization: OrganizationId,
    ) -> BackendResult<Vec<ConnectionInstance>> {
        self.enter("list_connections").await?;
        Ok(Vec::new())
    }
}

#[async_trait]
impl DevicesClient for StubBackends {
    async fn add_device_group(&self, request: AddDeviceGroupRequest) -> BackendResult<DeviceGroup> {
        self.enter("add_device_group").await?;
        Ok(DeviceGroup {
            organization_id: request.organization_id,
            device_group_id: format!("group-{}", request.name),
            name: request.name,
            labels: request.labels,
            enabled: request.enabled,
            default_device_connectivity: request.default_device_connectivity,
        })
    }

    async fn list_device_groups(&self, _organization: OrganizationId) -> BackendResult<Vec<DeviceGroup>> {
        self.enter("list_device_groups").await?;
        Ok(Vec::new())
    }

    async fn update_device_group(
        &self,
        request: UpdateDeviceGroupRequest,
    ) -> BackendResult<DeviceGroup> {
        self.enter("update_device_group").await?;
        Ok(DeviceGroup {
            organization_id: request.organization_id,
            device_group_id: request.device_group_id,
            enabled: request.enabled.value().unwrap_or_default(),
            default_device_connectivity: request
                .default_device_connectivity
                .value()
                .unwrap_or_default(),
            ..DeviceGroup::default()
        })
    }

    async fn remove_device_group(&self, _group: DeviceGroupId) -> BackendResult<()> {
        self.enter("remove_device_group").await
    }

    async fn list_devices(&self, _group: DeviceGroupId) -> BackendResult<Vec<Device>> {
        self.enter("list_devices").await?;
        Ok(Vec::new())
    }

    async fn add_label_to_device(&self, _request: DeviceLabelRequest) -> BackendResult<()> {
        self.enter("add_label_to_device").await
    }

    async fn remove_label_from_device(&self, _request: DeviceLabelRequest) -> BackendResult<()> {
        self.enter("remove_label_from_device").await
    }

    async fn update_device(&self, request: UpdateDeviceRequest) -> BackendResult<Device> {
        self.enter("update_device").await?;
        Ok(Device {
            organization_id: request.organization_id,
            device_group_id: request.device_group_id,
            device_id: request.device_id,
            enabled: request.enabled,
            ..Device::default()
        })
    }

    async fn remove_device(&self, _device: DeviceId) -> BackendResult<()> {
        self.enter("remove_device").await
    }

    async fn register_device(&self, request: RegisterDeviceRequest) -> BackendResult<RegisteredDevice> {
        self.enter("register_device").await?;
        Ok(RegisteredDevice {
            device_api_key: format!("key-{}", request.device_id),
            organization_id: request.organization_id,
            device_group_id: request.device_group_id,
            device_id: request.device_id,
        })
    }
}

#[async_trait]
impl UsersClient for StubBackends {
    async fn add_user(&self, request: AddUserRequest) -> BackendResult<User> {
        self.enter("add_user").await?;
        if self.user(&UserId::new(&request.organization_id, &request.email)).is_ok() {
            return Err(BackendError::new(
                BackendErrorKind::AlreadyExists,
                format!("user {}", request.email),
            ));
        }
        Ok(User {
            role_id: format!("role-{}", request.role_name),
            organization_id: request.organization_id,
            email: request.email,
            name: request.name,
            role_name: request.role_name,
        })
    }

    async fn get_user(&self, user: UserId) -> BackendResult<User> {
        self.enter("get_user").await?;
        self.user(&user).cloned()
    }

    async fn list_users(&self, organization: OrganizationId) -> BackendResult<Vec<User>> {
        self.enter("list_users").await?;
        Ok(self
            .users
            .iter()
            .filter(|user| user.organization_id == organization.organization_id)
            .cloned()
            .collect())
    }

    async fn update_user(&self, request: UpdateUserRequest) -> BackendResult<()> {
        self.enter("update_user").await?;
        self.user(&UserId::new(request.organization_id, request.email)).map(|_| ())
    }

    async fn remove_user(&self, user: UserId) -> BackendResult<()> {
        self.enter("remove_user").await?;
        self.user(&user).map(|_| ())
    }

    async fn change_password(&self, request: ChangePasswordRequest) -> BackendResult<()> {
        self.enter("change_password").await?;
        self.user(&UserId::new(request.organization_id, request.email)).map(|_| ())
    }

    async fn assign_role(&self, request: AssignRoleRequest) -> BackendResult<User> {
        self.enter("assign_role").await?;
        let mut user = self
            .user(&UserId::new(&request.organization_id, &request.email))?
            .clone();
        user.role_name = request.role_id.trim_start_matches("role-").to_string();
        user.role_id = request.role_id;
        Ok(user)
    }

    async fn list_roles(&self, organization: OrganizationId) -> BackendResult<Vec<Role>> {
        self.enter("list_roles").await?;
        Ok(["Owner", "Operator"]
            .into_iter()
            .map(|name| Role {
                organization_id: organization.organization_id.clone(),
                role_id: format!("role-{name}"),
                name: name.to_string(),
                description: String::new(),
                internal: false,
            })
            .collect())
    }
}

#[async_trait]
impl InventoryClient for StubBackends {
    async fn list(&self, _organization: OrganizationId) -> BackendResult<InventoryList> {
        self.enter("list_inventory").await?;
        Ok(InventoryList::default())
    }

    async fn summary(&self, organization: OrganizationId) -> BackendResult<InventorySummary> {
        self.enter("inventory_summary").await?;
        Ok(InventorySummary {
            organization_id: organization.organization_id,
            ..InventorySummary::default()
        })
    }

    async fn get_controller_extended_info(
        &self,
        controller: EdgeControllerId,
    ) -> BackendResult<EdgeControllerExtendedInfo> {
        self.enter("get_controller_extended_info").await?;
        Ok(EdgeControllerExtendedInfo {
            controller: EdgeController {
                organization_id: controller.organization_id,
                edge_controller_id: controller.edge_controller_id,
                status: ConnectionStatus::Online,
                ..EdgeController::default()
            },
            managed_assets: Vec::new(),
        })
    }

    async fn get_asset_info(&self, asset: AssetId) -> BackendResult<Asset> {
        self.enter("get_asset_info").await?;
        Err(BackendError::not_found(format!("asset {}", asset.asset_id)))
    }

    async fn get_device_info(&self, device: InventoryDeviceId) -> BackendResult<InventoryDevice> {
        self.enter("get_device_info").await?;
        Err(BackendError::not_found(format!("device {}", device.asset_device_id)))
    }

    async fn update_asset(&self, request: UpdateAssetRequest) -> BackendResult<Asset> {
        self.enter("update_asset").await?;
        Ok(Asset {
            organization_id: request.organization_id,
            asset_id: request.asset_id,
            labels: request.labels,
            ..Asset::default()
        })
    }

    async fn update_device_location(
        &self,
        request: UpdateDeviceLocationRequest,
    ) -> BackendResult<InventoryDevice> {
        self.enter("update_device_location").await?;
        Ok(InventoryDevice {
            organization_id: request.organization_id,
            asset_device_id: request.asset_device_id,
            location: request.location,
            ..InventoryDevice::default()
        })
    }

    async fn update_edge_controller(
        &self,
        request: UpdateEdgeControllerRequest,
    ) -> BackendResult<EdgeController> {
        self.enter("update_edge_controller").await?;
        Ok(EdgeController {
            organization_id: request.organization_id,
            edge_controller_id: request.edge_controller_id,
            labels: request.labels,
            ..EdgeController::default()
        })
    }

    async fn update_geolocation(
        &self,
        request: UpdateGeolocationRequest,
    ) -> BackendResult<EdgeController> {
        self.enter("update_geolocation").await?;
        Ok(EdgeController {
            organization_id: request.organization_id,
            edge_controller_id: request.edge_controller_id,
            location: Some(InventoryLocation {
                geolocation: request.geolocation,
            }),
            ..EdgeController::default()
        })
    }

    async fn install_agent(&self, request: InstallAgentRequest) -> BackendResult<InstallAgentResponse> {
        self.enter("install_agent").await?;
        Ok(InstallAgentResponse {
            operation_id: format!("agent-{}", request.target_host),
            organization_id: request.organization_id,
            edge_controller_id: request.edge_controller_id,
        })
    }

    async fn query_metrics(&self, _request: QueryMetricsRequest) -> BackendResult<QueryMetricsResult> {
        self.enter("query_metrics").await?;
        Ok(QueryMetricsResult::default())
    }
}
