use std::sync::Arc;

use super::call;
use crate::backend::ApplicationsClient;
use crate::context::Ctx;
use crate::entities::{
    AddAppDescriptorRequest, AddConnectionRequest, AppDescriptor, AppDescriptorId,
    AppDescriptorList, AppInstance, AppInstanceId, AppInstanceList, ConnectionInstance,
    ConnectionInstanceList, DeployRequest, DeploymentResponse, DescriptorDocument,
    OrganizationId, RemoveConnectionRequest, UpdateAppDescriptorRequest,
};
use crate::error::BackendFailure;
use crate::verified::Verified;

/// Application descriptor, instance and connection operations. All
/// pass-through.
#[derive(Clone)]
pub struct ApplicationsManager {
    applications: Arc<dyn ApplicationsClient>,
}

impl ApplicationsManager {
    /// Creates a manager over the application manager client.
    pub fn new(applications: Arc<dyn ApplicationsClient>) -> Self {
        Self { applications }
    }

    /// Registers a descriptor.
    pub async fn add_descriptor(
        &self,
        ctx: &Ctx,
        request: Verified<AddAppDescriptorRequest>,
    ) -> Result<AppDescriptor, BackendFailure> {
        let request = request.into_inner();
        call(ctx, "add_app_descriptor", self.applications.add_app_descriptor(request)).await
    }

    /// Registers a descriptor that arrived as a JSON document.
    pub async fn add_descriptor_document(
        &self,
        ctx: &Ctx,
        document: Verified<DescriptorDocument>,
    ) -> Result<AppDescriptor, BackendFailure> {
        let request = document.into_inner().into_request();
        call(ctx, "add_app_descriptor", self.applications.add_app_descriptor(request)).await
    }

    /// Lists the descriptors of an organization.
    pub async fn list_descriptors(
        &self,
        ctx: &Ctx,
        request: Verified<OrganizationId>,
    ) -> Result<AppDescriptorList, BackendFailure> {
        let request = request.into_inner();
        let descriptors =
            call(ctx, "list_app_descriptors", self.applications.list_app_descriptors(request)).await?;
        Ok(AppDescriptorList { descriptors })
    }

    /// Returns one descriptor.
    pub async fn get_descriptor(
        &self,
        ctx: &Ctx,
        request: Verified<AppDescriptorId>,
    ) -> Result<AppDescriptor, BackendFailure> {
        let request = request.into_inner();
        call(ctx, "get_app_descriptor", self.applications.get_app_descriptor(request)).await
    }

    /// Changes the labels of a descriptor.
    pub async fn update_descriptor(
        &self,
        ctx: &Ctx,
        request: Verified<UpdateAppDescriptorRequest>,
    ) -> Result<AppDescriptor, BackendFailure> {
        let request = request.into_inner();
        call(ctx, "update_app_descriptor", self.applications.update_app_descriptor(request)).await
    }

    /// Removes a descriptor.
    pub async fn remove_descriptor(
        &self,
        ctx: &Ctx,
        request: Verified<AppDescriptorId>,
    ) -> Result<(), BackendFailure> {
        let request = request.into_inner();
        call(ctx, "remove_app_descriptor", self.applications.remove_app_descriptor(request)).await
    }

    /// Deploys a descriptor.
    pub async fn deploy(
        &self,
        ctx: &Ctx,
        request: Verified<DeployRequest>,
    ) -> Result<DeploymentResponse, BackendFailure> {
        call(ctx, "deploy", self.applications.deploy(request.into_inner())).await
    }

    /// Tears down a running instance.
    pub async fn undeploy(
        &self,
        ctx: &Ctx,
        request: Verified<AppInstanceId>,
    ) -> Result<(), BackendFailure> {
        call(ctx, "undeploy", self.applications.undeploy(request.into_inner())).await
    }

    /// Lists the instances of an organization.
    pub async fn list_instances(
        &self,
        ctx: &Ctx,
        request: Verified<OrganizationId>,
    ) -> Result<AppInstanceList, BackendFailure> {
        let request = request.into_inner();
        let instances =
            call(ctx, "list_app_instances", self.applications.list_app_instances(request)).await?;
        Ok(AppInstanceList { instances })
    }

    /// Returns one instance.
    pub async fn get_instance(
        &self,
        ctx: &Ctx,
        request: Verified<AppInstanceId>,
    ) -> Result<AppInstance, BackendFailure> {
        let request = request.into_inner();
        call(ctx, "get_app_instance", self.applications.get_app_instance(request)).await
    }

    /// Connects two instances.
    pub async fn add_connection(
        &self,
        ctx: &Ctx,
        request: Verified<AddConnectionRequest>,
    ) -> Result<ConnectionInstance, BackendFailure> {
        call(ctx, "add_connection", self.applications.add_connection(request.into_inner())).await
    }

    /// Removes a connection.
    pub async fn remove_connection(
        &self,
        ctx: &Ctx,
        request: Verified<RemoveConnectionRequest>,
    ) -> Result<(), BackendFailure> {
        let request = request.into_inner();
        call(ctx, "remove_connection", self.applications.remove_connection(request)).await
    }

    /// Lists the connections of an organization.
    pub async fn list_connections(
        &self,
        ctx: &Ctx,
        request: Verified<OrganizationId>,
    ) -> Result<ConnectionInstanceList, BackendFailure> {
        let request = request.into_inner();
        let connections =
            call(ctx, "list_connections", self.applications.list_connections(request)).await?;
        Ok(ConnectionInstanceList { connections })
    }
}
