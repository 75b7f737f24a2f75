use crate::entities::{
    AddDeviceGroupRequest, Device, DeviceGroup, DeviceGroupId, DeviceGroupList, DeviceId,
    DeviceLabelRequest, DeviceList, OrganizationId, RegisterDeviceRequest, RegisteredDevice,
    UpdateDeviceGroupRequest, UpdateDeviceRequest,
};
use crate::error::GatewayError;
use crate::manager::DevicesManager;

use super::{Pipeline, RequestContext};

/// Device group and device endpoints.
#[derive(Clone)]
pub struct DevicesHandler {
    pipeline: Pipeline,
    manager: DevicesManager,
}

impl DevicesHandler {
    /// Creates the handler.
    pub fn new(pipeline: Pipeline, manager: DevicesManager) -> Self {
        Self { pipeline, manager }
    }

    /// Creates a device group.
    pub async fn add_group(
        &self,
        request: &RequestContext,
        group: AddDeviceGroupRequest,
    ) -> Result<DeviceGroup, GatewayError> {
        let (ctx, group) = self.pipeline.admit("devices.add_group", request, group)?;
        Ok(self.manager.add_group(&ctx, group).await?)
    }

    /// Lists the device groups of the caller's organization.
    pub async fn list_groups(
        &self,
        request: &RequestContext,
        organization: OrganizationId,
    ) -> Result<DeviceGroupList, GatewayError> {
        let (ctx, organization) = self.pipeline.admit("devices.list_groups", request, organization)?;
        Ok(self.manager.list_groups(&ctx, organization).await?)
    }

    /// Changes enablement and/or default connectivity of a group. At least
    /// one of the two must be set.
    pub async fn update_group(
        &self,
        request: &RequestContext,
        update: UpdateDeviceGroupRequest,
    ) -> Result<DeviceGroup, GatewayError> {
        let (ctx, update) = self.pipeline.admit("devices.update_group", request, update)?;
        Ok(self.manager.update_group(&ctx, update).await?)
    }

    /// Removes a device group.
    pub async fn remove_group(
        &self,
        request: &RequestContext,
        group: DeviceGroupId,
    ) -> Result<(), GatewayError> {
        let (ctx, group) = self.pipeline.admit("devices.remove_group", request, group)?;
        Ok(self.manager.remove_group(&ctx, group).await?)
    }

    /// Lists the devices of a group.
    pub async fn list_devices(
        &self,
        request: &RequestContext,
        group: DeviceGroupId,
    ) -> Result<DeviceList, GatewayError> {
        let (ctx, group) = self.pipeline.admit("devices.list_devices", request, group)?;
        Ok(self.manager.list_devices(&ctx, group).await?)
    }

    /// Adds labels to a device.
    pub async fn add_labels(
        &self,
        request: &RequestContext,
        labels: DeviceLabelRequest,
    ) -> Result<(), GatewayError> {
        let (ctx, labels) = self.pipeline.admit("devices.add_labels", request, labels)?;
        Ok(self.manager.add_labels(&ctx, labels).await?)
    }

    /// Removes labels from a device.
    pub async fn remove_labels(
        &self,
        request: &RequestContext,
        labels: DeviceLabelRequest,
    ) -> Result<(), GatewayError> {
        let (ctx, labels) = self.pipeline.admit("devices.remove_labels", request, labels)?;
        Ok(self.manager.remove_labels(&ctx, labels).await?)
    }

    /// Enables or disables a device.
    pub async fn update_device(
        &self,
        request: &RequestContext,
        update: UpdateDeviceRequest,
    ) -> Result<Device, GatewayError> {
        let (ctx, update) = self.pipeline.admit("devices.update_device", request, update)?;
        Ok(self.manager.update_device(&ctx, update).await?)
    }

    /// Removes a device.
    pub async fn remove_device(
        &self,
        request: &RequestContext,
        device: DeviceId,
    ) -> Result<(), GatewayError> {
        let (ctx, device) = self.pipeline.admit("devices.remove_device", request, device)?;
        Ok(self.manager.remove_device(&ctx, device).await?)
    }

    /// Registers a device in a group using the group's API key.
    pub async fn register(
        &self,
        request: &RequestContext,
        registration: RegisterDeviceRequest,
    ) -> Result<RegisteredDevice, GatewayError> {
        let (ctx, registration) = self.pipeline.admit("devices.register", request, registration)?;
        Ok(self.manager.register(&ctx, registration).await?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::entities::Toggle;
    use crate::error::ErrorCode;
    use crate::handler::MetadataIdentityResolver;
    use crate::testing::StubBackends;

    fn handler(stub: &Arc<StubBackends>) -> DevicesHandler {
        let pipeline = Pipeline::new(Arc::new(MetadataIdentityResolver::default()), None);
        DevicesHandler::new(pipeline, DevicesManager::new(stub.backend_set().devices))
    }

    fn caller() -> RequestContext {
        RequestContext::new("req-1")
            .with_metadata("organization_id", "org-1")
            .with_metadata("user_id", "alice@example.com")
    }

    fn group_update(enabled: Toggle, connectivity: Toggle) -> UpdateDeviceGroupRequest {
        UpdateDeviceGroupRequest {
            organization_id: "org-1".to_string(),
            device_group_id: "g1".to_string(),
            enabled,
            default_device_connectivity: connectivity,
        }
    }

    #[tokio::test]
    async fn group_update_needs_one_toggle() {
        let stub = Arc::new(StubBackends::new());

        let error = handler(&stub)
            .update_group(&caller(), group_update(Toggle::Unset, Toggle::Unset))
            .await
            .unwrap_err();

        assert_eq!(error.code(), ErrorCode::InvalidArgument);
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn group_update_with_connectivity_only_succeeds() {
        let stub = Arc::new(StubBackends::new());

        let group = handler(&stub)
            .update_group(&caller(), group_update(Toggle::Unset, Toggle::Enable))
            .await
            .expect("one toggle is enough");

        assert!(group.default_device_connectivity);
        assert_eq!(stub.calls_to("update_device_group"), 1);
    }

    fn registration(api_key: &str) -> RegisterDeviceRequest {
        RegisterDeviceRequest {
            organization_id: "org-1".to_string(),
            device_group_id: "g1".to_string(),
            device_group_api_key: api_key.to_string().into(),
            device_id: "sensor-7".to_string(),
        }
    }

    #[tokio::test]
    async fn device_registration_returns_device_key() {
        let stub = Arc::new(StubBackends::new());

        let registered = handler(&stub)
            .register(&caller(), registration("group-key"))
            .await
            .expect("registered");

        assert_eq!(registered.device_id, "sensor-7");
        assert_eq!(registered.device_api_key, "key-sensor-7");
        assert_eq!(stub.calls_to("register_device"), 1);
    }

    #[tokio::test]
    async fn registration_without_group_key_is_rejected() {
        let stub = Arc::new(StubBackends::new());

        let error = handler(&stub)
            .register(&caller(), registration(""))
            .await
            .unwrap_err();

        assert_eq!(error.code(), ErrorCode::InvalidArgument);
        assert_eq!(error.to_string(), "invalid request: device_group_api_key cannot be empty");
        assert_eq!(stub.call_count(), 0);
    }
}
