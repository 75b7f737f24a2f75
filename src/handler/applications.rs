use crate::entities::{
    AddAppDescriptorRequest, AddConnectionRequest, AppDescriptor, AppDescriptorId,
    AppDescriptorList, AppInstance, AppInstanceId, AppInstanceList, ConnectionInstance,
    ConnectionInstanceList, DeployRequest, DeploymentResponse, DescriptorDocument,
    OrganizationId, RemoveConnectionRequest, UpdateAppDescriptorRequest,
};
use crate::error::GatewayError;
use crate::manager::ApplicationsManager;

use super::{Pipeline, RequestContext};

/// Application descriptor, instance and connection endpoints.
#[derive(Clone)]
pub struct ApplicationsHandler {
    pipeline: Pipeline,
    manager: ApplicationsManager,
}

impl ApplicationsHandler {
    /// Creates the handler.
    pub fn new(pipeline: Pipeline, manager: ApplicationsManager) -> Self {
        Self { pipeline, manager }
    }

    /// Registers a descriptor.
    pub async fn add_descriptor(
        &self,
        request: &RequestContext,
        descriptor: AddAppDescriptorRequest,
    ) -> Result<AppDescriptor, GatewayError> {
        let (ctx, descriptor) = self.pipeline.admit("applications.add_descriptor", request, descriptor)?;
        Ok(self.manager.add_descriptor(&ctx, descriptor).await?)
    }

    /// Registers a descriptor given as raw JSON.
    ///
    /// The payload is decoded only after the caller is identified. The
    /// descriptor schema is checked during validation, after the
    /// organization guard.
    pub async fn add_descriptor_json(
        &self,
        request: &RequestContext,
        payload: &[u8],
    ) -> Result<AppDescriptor, GatewayError> {
        let (ctx, document) = self.pipeline.admit_with("applications.add_descriptor", request, || {
            DescriptorDocument::from_json(payload)
        })?;
        Ok(self.manager.add_descriptor_document(&ctx, document).await?)
    }

    /// Lists the descriptors of the caller's organization.
    pub async fn list_descriptors(
        &self,
        request: &RequestContext,
        organization: OrganizationId,
    ) -> Result<AppDescriptorList, GatewayError> {
        let (ctx, organization) =
            self.pipeline.admit("applications.list_descriptors", request, organization)?;
        Ok(self.manager.list_descriptors(&ctx, organization).await?)
    }

    /// Returns one descriptor.
    pub async fn get_descriptor(
        &self,
        request: &RequestContext,
        descriptor: AppDescriptorId,
    ) -> Result<AppDescriptor, GatewayError> {
        let (ctx, descriptor) = self.pipeline.admit("applications.get_descriptor", request, descriptor)?;
        Ok(self.manager.get_descriptor(&ctx, descriptor).await?)
    }

    /// Adds or removes descriptor labels.
    pub async fn update_descriptor(
        &self,
        request: &RequestContext,
        update: UpdateAppDescriptorRequest,
    ) -> Result<AppDescriptor, GatewayError> {
        let (ctx, update) = self.pipeline.admit("applications.update_descriptor", request, update)?;
        Ok(self.manager.update_descriptor(&ctx, update).await?)
    }

    /// Removes a descriptor.
    pub async fn remove_descriptor(
        &self,
        request: &RequestContext,
        descriptor: AppDescriptorId,
    ) -> Result<(), GatewayError> {
        let (ctx, descriptor) =
            self.pipeline.admit("applications.remove_descriptor", request, descriptor)?;
        Ok(self.manager.remove_descriptor(&ctx, descriptor).await?)
    }

    /// Deploys a registered descriptor as a new instance.
    pub async fn deploy(
        &self,
        request: &RequestContext,
        deploy: DeployRequest,
    ) -> Result<DeploymentResponse, GatewayError> {
        let (ctx, deploy) = self.pipeline.admit("applications.deploy", request, deploy)?;
        Ok(self.manager.deploy(&ctx, deploy).await?)
    }

    /// Tears down an instance.
    pub async fn undeploy(
        &self,
        request: &RequestContext,
        instance: AppInstanceId,
    ) -> Result<(), GatewayError> {
        let (ctx, instance) = self.pipeline.admit("applications.undeploy", request, instance)?;
        Ok(self.manager.undeploy(&ctx, instance).await?)
    }

    /// Lists the instances of the caller's organization.
    pub async fn list_instances(
        &self,
        request: &RequestContext,
        organization: OrganizationId,
    ) -> Result<AppInstanceList, GatewayError> {
        let (ctx, organization) =
            self.pipeline.admit("applications.list_instances", request, organization)?;
        Ok(self.manager.list_instances(&ctx, organization).await?)
    }

    /// Returns one instance.
    pub async fn get_instance(
        &self,
        request: &RequestContext,
        instance: AppInstanceId,
    ) -> Result<AppInstance, GatewayError> {
        let (ctx, instance) = self.pipeline.admit("applications.get_instance", request, instance)?;
        Ok(self.manager.get_instance(&ctx, instance).await?)
    }

    /// Connects an outbound interface of one instance to an inbound
    /// interface of another.
    pub async fn add_connection(
        &self,
        request: &RequestContext,
        connection: AddConnectionRequest,
    ) -> Result<ConnectionInstance, GatewayError> {
        let (ctx, connection) =
            self.pipeline.admit("applications.add_connection", request, connection)?;
        Ok(self.manager.add_connection(&ctx, connection).await?)
    }

    /// Removes a connection. The backend refuses to drop a required outbound
    /// unless `user_confirmation` is set.
    pub async fn remove_connection(
        &self,
        request: &RequestContext,
        connection: RemoveConnectionRequest,
    ) -> Result<(), GatewayError> {
        let (ctx, connection) =
            self.pipeline.admit("applications.remove_connection", request, connection)?;
        Ok(self.manager.remove_connection(&ctx, connection).await?)
    }

    /// Lists the connections of the caller's organization.
    pub async fn list_connections(
        &self,
        request: &RequestContext,
        organization: OrganizationId,
    ) -> Result<ConnectionInstanceList, GatewayError> {
        let (ctx, organization) =
            self.pipeline.admit("applications.list_connections", request, organization)?;
        Ok(self.manager.list_connections(&ctx, organization).await?)
    }
}
