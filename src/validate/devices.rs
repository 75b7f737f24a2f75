use super::{require, require_labels, Validate};
use crate::entities::{
    AddDeviceGroupRequest, DeviceGroupId, DeviceId, DeviceLabelRequest, RegisterDeviceRequest,
    UpdateDeviceGroupRequest, UpdateDeviceRequest,
};
use crate::error::ValidationFailure;

impl Validate for DeviceGroupId {
    fn validate(&self) -> Result<(), ValidationFailure> {
        require(&self.organization_id, "organization_id")?;
        require(&self.device_group_id, "device_group_id")
    }
}

impl Validate for DeviceId {
    fn validate(&self) -> Result<(), ValidationFailure> {
        require(&self.organization_id, "organization_id")?;
        require(&self.device_group_id, "device_group_id")?;
        require(&self.device_id, "device_id")
    }
}

impl Validate for RegisterDeviceRequest {
    fn validate(&self) -> Result<(), ValidationFailure> {
        require(&self.organization_id, "organization_id")?;
        require(&self.device_group_id, "device_group_id")?;
        if self.device_group_api_key.is_empty() {
            return Err(ValidationFailure::missing("device_group_api_key"));
        }
        require(&self.device_id, "device_id")
    }
}

impl Validate for AddDeviceGroupRequest {
    fn validate(&self) -> Result<(), ValidationFailure> {
        require(&self.organization_id, "organization_id")?;
        require(&self.name, "name")
    }
}

impl Validate for UpdateDeviceGroupRequest {
    fn validate(&self) -> Result<(), ValidationFailure> {
        require(&self.organization_id, "organization_id")?;
        require(&self.device_group_id, "device_group_id")?;
        if !self.enabled.is_set() && !self.default_device_connectivity.is_set() {
            return Err(ValidationFailure::rule(
                "either update_enabled or update_device_connectivity must be set",
            ));
        }
        Ok(())
    }
}

impl Validate for DeviceLabelRequest {
    fn validate(&self) -> Result<(), ValidationFailure> {
        require(&self.organization_id, "organization_id")?;
        require(&self.device_group_id, "device_group_id")?;
        require(&self.device_id, "device_id")?;
        require_labels(&self.labels)
    }
}

impl Validate for UpdateDeviceRequest {
    fn validate(&self) -> Result<(), ValidationFailure> {
        require(&self.organization_id, "organization_id")?;
        require(&self.device_group_id, "device_group_id")?;
        require(&self.device_id, "device_id")
    }
}
