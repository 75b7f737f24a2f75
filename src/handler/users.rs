use crate::entities::{
    AddUserRequest, AssignRoleRequest, ChangePasswordRequest, OrganizationId, RoleList,
    UpdateUserRequest, User, UserId, UserList,
};
use crate::error::GatewayError;
use crate::manager::UsersManager;

use super::{Pipeline, RequestContext};

/// User and role endpoints.
#[derive(Clone)]
pub struct UsersHandler {
    pipeline: Pipeline,
    manager: UsersManager,
}

impl UsersHandler {
    /// Creates the handler.
    pub fn new(pipeline: Pipeline, manager: UsersManager) -> Self {
        Self { pipeline, manager }
    }

    /// Creates a user.
    pub async fn add(&self, request: &RequestContext, user: AddUserRequest) -> Result<User, GatewayError> {
        let (ctx, user) = self.pipeline.admit("users.add", request, user)?;
        Ok(self.manager.add(&ctx, user).await?)
    }

    /// Returns one user.
    pub async fn info(&self, request: &RequestContext, user: UserId) -> Result<User, GatewayError> {
        let (ctx, user) = self.pipeline.admit("users.info", request, user)?;
        Ok(self.manager.info(&ctx, user).await?)
    }

    /// Lists the users of the caller's organization.
    pub async fn list(
        &self,
        request: &RequestContext,
        organization: OrganizationId,
    ) -> Result<UserList, GatewayError> {
        let (ctx, organization) = self.pipeline.admit("users.list", request, organization)?;
        Ok(self.manager.list(&ctx, organization).await?)
    }

    /// Changes name or location of a user.
    pub async fn update(
        &self,
        request: &RequestContext,
        update: UpdateUserRequest,
    ) -> Result<(), GatewayError> {
        let (ctx, update) = self.pipeline.admit("users.update", request, update)?;
        Ok(self.manager.update(&ctx, update).await?)
    }

    /// Removes a user.
    pub async fn remove(&self, request: &RequestContext, user: UserId) -> Result<(), GatewayError> {
        let (ctx, user) = self.pipeline.admit("users.remove", request, user)?;
        Ok(self.manager.remove(&ctx, user).await?)
    }

    /// Replaces the password of a user.
    pub async fn change_password(
        &self,
        request: &RequestContext,
        change: ChangePasswordRequest,
    ) -> Result<(), GatewayError> {
        let (ctx, change) = self.pipeline.admit("users.change_password", request, change)?;
        Ok(self.manager.change_password(&ctx, change).await?)
    }

    /// Assigns a role to a user.
    pub async fn assign_role(
        &self,
        request: &RequestContext,
        assignment: AssignRoleRequest,
    ) -> Result<User, GatewayError> {
        let (ctx, assignment) = self.pipeline.admit("users.assign_role", request, assignment)?;
        Ok(self.manager.assign_role(&ctx, assignment).await?)
    }

    /// Lists the roles of the caller's organization.
    pub async fn list_roles(
        &self,
        request: &RequestContext,
        organization: OrganizationId,
    ) -> Result<RoleList, GatewayError> {
        let (ctx, organization) = self.pipeline.admit("users.list_roles", request, organization)?;
        Ok(self.manager.list_roles(&ctx, organization).await?)
    }
}
