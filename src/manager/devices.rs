use std::sync::Arc;

use super::call;
use crate::backend::DevicesClient;
use crate::context::Ctx;
use crate::entities::{
    AddDeviceGroupRequest, Device, DeviceGroup, DeviceGroupId, DeviceGroupList, DeviceId,
    DeviceLabelRequest, DeviceList, OrganizationId, RegisterDeviceRequest, RegisteredDevice,
    UpdateDeviceGroupRequest, UpdateDeviceRequest,
};
use crate::error::BackendFailure;
use crate::verified::Verified;

/// Device group and device operations. All pass-through.
#[derive(Clone)]
pub struct DevicesManager {
    devices: Arc<dyn DevicesClient>,
}

impl DevicesManager {
    /// Creates a manager over the device manager client.
    pub fn new(devices: Arc<dyn DevicesClient>) -> Self {
        Self { devices }
    }

    /// Creates a device group.
    pub async fn add_group(
        &self,
        ctx: &Ctx,
        request: Verified<AddDeviceGroupRequest>,
    ) -> Result<DeviceGroup, BackendFailure> {
        call(ctx, "add_device_group", self.devices.add_device_group(request.into_inner())).await
    }

    /// Lists the device groups of an organization.
    pub async fn list_groups(
        &self,
        ctx: &Ctx,
        request: Verified<OrganizationId>,
    ) -> Result<DeviceGroupList, BackendFailure> {
        let request = request.into_inner();
        let groups = call(ctx, "list_device_groups", self.devices.list_device_groups(request)).await?;
        Ok(DeviceGroupList { groups })
    }

    /// Changes enablement and/or default connectivity of a group.
    pub async fn update_group(
        &self,
        ctx: &Ctx,
        request: Verified<UpdateDeviceGroupRequest>,
    ) -> Result<DeviceGroup, BackendFailure> {
        let request = request.into_inner();
        call(ctx, "update_device_group", self.devices.update_device_group(request)).await
    }

    /// Removes a device group.
    pub async fn remove_group(
        &self,
        ctx: &Ctx,
        request: Verified<DeviceGroupId>,
    ) -> Result<(), BackendFailure> {
        let request = request.into_inner();
        call(ctx, "remove_device_group", self.devices.remove_device_group(request)).await
    }

    /// Lists the devices of a group.
    pub async fn list_devices(
        &self,
        ctx: &Ctx,
        request: Verified<DeviceGroupId>,
    ) -> Result<DeviceList, BackendFailure> {
        let devices = call(ctx, "list_devices", self.devices.list_devices(request.into_inner())).await?;
        Ok(DeviceList { devices })
    }

    /// Adds labels to a device.
    pub async fn add_labels(
        &self,
        ctx: &Ctx,
        request: Verified<DeviceLabelRequest>,
    ) -> Result<(), BackendFailure> {
        let request = request.into_inner();
        call(ctx, "add_label_to_device", self.devices.add_label_to_device(request)).await
    }

    /// Removes labels from a device.
    pub async fn remove_labels(
        &self,
        ctx: &Ctx,
        request: Verified<DeviceLabelRequest>,
    ) -> Result<(), BackendFailure> {
        let request = request.into_inner();
        call(ctx, "remove_label_from_device", self.devices.remove_label_from_device(request)).await
    }

    /// Enables or disables a device.
    pub async fn update_device(
        &self,
        ctx: &Ctx,
        request: Verified<UpdateDeviceRequest>,
    ) -> Result<Device, BackendFailure> {
        call(ctx, "update_device", self.devices.update_device(request.into_inner())).await
    }

    /// Removes a device from its group.
    pub async fn remove_device(&self, ctx: &Ctx, request: Verified<DeviceId>) -> Result<(), BackendFailure> {
        call(ctx, "remove_device", self.devices.remove_device(request.into_inner())).await
    }

    /// Registers a device with its group's API key.
    pub async fn register(
        &self,
        ctx: &Ctx,
        request: Verified<RegisterDeviceRequest>,
    ) -> Result<RegisteredDevice, BackendFailure> {
        call(ctx, "register_device", self.devices.register_device(request.into_inner())).await
    }
}
