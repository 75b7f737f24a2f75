use serde::{Deserialize, Serialize};

use serde_json::Value;

use super::{impl_scoped, LabelOp, Labels, Scoped};
use crate::error::ValidationFailure;

/// Identifies an application descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppDescriptorId {
    pub organization_id: String,
    pub app_descriptor_id: String,
}

impl AppDescriptorId {
    /// Creates a descriptor id.
    pub fn new(organization_id: impl Into<String>, app_descriptor_id: impl Into<String>) -> Self {
        Self {
            organization_id: organization_id.into(),
            app_descriptor_id: app_descriptor_id.into(),
        }
    }
}

/// Identifies a deployed application instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppInstanceId {
    pub organization_id: String,
    pub app_instance_id: String,
}

impl AppInstanceId {
    /// Creates an instance id.
    pub fn new(organization_id: impl Into<String>, app_instance_id: impl Into<String>) -> Self {
        Self {
            organization_id: organization_id.into(),
            app_instance_id: app_instance_id.into(),
        }
    }
}

/// A container image run as part of a service group.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Service {
    pub name: String,
    pub image: String,
    pub replicas: u32,
    pub labels: Labels,
}

/// Services deployed and scaled together.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceGroup {
    pub name: String,
    pub services: Vec<Service>,
}

/// Who may reach a service port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortAccess {
    /// Every service of the application
    #[default]
    AllAppServices,
    /// The services listed in `auth_services`
    AppServices,
    /// Anyone
    Public,
    /// Devices of the groups in `device_group_ids`
    DeviceGroup,
}

/// A network access rule of an application descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityRule {
    pub name: String,
    pub target_service_group_name: String,
    pub target_service_name: String,
    pub target_port: u32,
    pub access: PortAccess,
    pub auth_service_group_name: String,
    pub auth_services: Vec<String>,
    /// Must be empty when a descriptor is added
    pub device_group_ids: Vec<String>,
}

/// Registers a new application descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AddAppDescriptorRequest {
    pub organization_id: String,
    pub name: String,
    pub labels: Labels,
    pub rules: Vec<SecurityRule>,
    pub groups: Vec<ServiceGroup>,
}

/// A descriptor received as raw JSON.
///
/// Keeps the parsed document next to the typed request so that validation
/// can check the document against the descriptor schema. Parsing does not
/// run the schema: that happens after the caller is identified and the
/// organization guard has passed.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptorDocument {
    document: Value,
    request: AddAppDescriptorRequest,
}

impl DescriptorDocument {
    /// Parses a descriptor payload.
    ///
    /// # Errors
    ///
    /// Fails if the payload is not JSON or does not map onto
    /// [`AddAppDescriptorRequest`].
    pub fn from_json(payload: &[u8]) -> Result<Self, ValidationFailure> {
        let document: Value = serde_json::from_slice(payload)
            .map_err(|error| ValidationFailure::rule(format!("invalid descriptor json: {error}")))?;
        let request = serde_json::from_value(document.clone())
            .map_err(|error| ValidationFailure::rule(format!("invalid descriptor: {error}")))?;
        Ok(Self { document, request })
    }

    /// The document as received.
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// The typed request.
    pub fn request(&self) -> &AddAppDescriptorRequest {
        &self.request
    }

    /// Drops the document and keeps the typed request.
    pub fn into_request(self) -> AddAppDescriptorRequest {
        self.request
    }
}

impl Scoped for DescriptorDocument {
    fn organization_id(&self) -> &str {
        &self.request.organization_id
    }
}

/// A registered application descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppDescriptor {
    pub organization_id: String,
    pub app_descriptor_id: String,
    pub name: String,
    pub labels: Labels,
    pub rules: Vec<SecurityRule>,
    pub groups: Vec<ServiceGroup>,
}

/// Descriptors of an organization.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AppDescriptorList {
    pub descriptors: Vec<AppDescriptor>,
}

/// Changes the labels of a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateAppDescriptorRequest {
    pub organization_id: String,
    pub app_descriptor_id: String,
    pub label_op: LabelOp,
    pub labels: Labels,
}

/// Deploys a descriptor as a new instance.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployRequest {
    pub organization_id: String,
    pub app_descriptor_id: String,
    /// Instance name
    pub name: String,
}

/// Lifecycle state of an application instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    Queued,
    Planning,
    Scheduled,
    Deploying,
    Running,
    Incomplete,
    Error,
}

/// Answer to a deploy request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploymentResponse {
    pub request_id: String,
    pub app_instance_id: String,
    pub status: ApplicationStatus,
}

/// A deployed application.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppInstance {
    pub organization_id: String,
    pub app_descriptor_id: String,
    pub app_instance_id: String,
    pub name: String,
    pub labels: Labels,
    pub status: ApplicationStatus,
}

/// Instances of an organization.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AppInstanceList {
    pub instances: Vec<AppInstance>,
}

/// Connects an outbound interface of one instance to an inbound interface
/// of another.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AddConnectionRequest {
    pub organization_id: String,
    pub source_instance_id: String,
    pub outbound_name: String,
    pub target_instance_id: String,
    pub inbound_name: String,
}

/// Removes a connection between two instances.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoveConnectionRequest {
    pub organization_id: String,
    pub source_instance_id: String,
    pub outbound_name: String,
    pub target_instance_id: String,
    pub inbound_name: String,
    /// Set when the user confirmed removing a connection whose outbound is
    /// required by the source instance.
    pub user_confirmation: bool,
}

/// State of a connection between two instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    #[default]
    Waiting,
    Established,
    Terminated,
    Failed,
}

/// A connection between two application instances.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionInstance {
    pub organization_id: String,
    pub connection_id: String,
    pub source_instance_id: String,
    pub source_instance_name: String,
    pub outbound_name: String,
    pub target_instance_id: String,
    pub target_instance_name: String,
    pub inbound_name: String,
    pub outbound_required: bool,
    pub state: ConnectionState,
}

/// Connections of an organization.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConnectionInstanceList {
    pub connections: Vec<ConnectionInstance>,
}

impl_scoped!(
    AppDescriptorId,
    AppInstanceId,
    AddAppDescriptorRequest,
    UpdateAppDescriptorRequest,
    DeployRequest,
    AddConnectionRequest,
    RemoveConnectionRequest,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_json_parses_valid_descriptor() {
        let payload = br#"{
            "organization_id": "org-1",
            "name": "web",
            "labels": {"team": "edge"},
            "groups": [{"name": "frontend", "services": [{"name": "nginx", "image": "nginx:1.25", "replicas": 2}]}]
        }"#;

        let document = DescriptorDocument::from_json(payload).expect("valid descriptor");
        assert_eq!(document.organization_id(), "org-1");
        assert_eq!(document.document()["name"], "web");

        let request = document.into_request();
        assert_eq!(request.groups.len(), 1);
        assert_eq!(request.groups[0].services[0].replicas, 2);
        assert_eq!(request.labels["team"], "edge");
    }

    #[test]
    fn from_json_leaves_schema_to_validation() {
        // No name: the schema rejects this, parsing does not.
        let payload = br#"{"organization_id": "org-2", "groups": []}"#;

        let document = DescriptorDocument::from_json(payload).expect("parses");
        assert_eq!(document.organization_id(), "org-2");
        assert!(document.request().name.is_empty());
    }

    #[test]
    fn from_json_rejects_garbage() {
        let failure = DescriptorDocument::from_json(b"{not json").unwrap_err();
        assert!(failure.message().starts_with("invalid descriptor json"));
    }

    #[test]
    fn from_json_rejects_mistyped_fields() {
        let failure = DescriptorDocument::from_json(br#"{"organization_id": 7}"#).unwrap_err();
        assert!(failure.message().starts_with("invalid descriptor:"));
    }
}
