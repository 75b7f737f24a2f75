use std::sync::Arc;

use super::call;
use crate::backend::UsersClient;
use crate::context::Ctx;
use crate::entities::{
    AddUserRequest, AssignRoleRequest, ChangePasswordRequest, OrganizationId, RoleList,
    UpdateUserRequest, User, UserId, UserList,
};
use crate::error::BackendFailure;
use crate::verified::Verified;

/// User and role operations. All pass-through.
#[derive(Clone)]
pub struct UsersManager {
    users: Arc<dyn UsersClient>,
}

impl UsersManager {
    /// Creates a manager over the user manager client.
    pub fn new(users: Arc<dyn UsersClient>) -> Self {
        Self { users }
    }

    /// Creates a user.
    pub async fn add(&self, ctx: &Ctx, request: Verified<AddUserRequest>) -> Result<User, BackendFailure> {
        call(ctx, "add_user", self.users.add_user(request.into_inner())).await
    }

    /// Returns one user.
    pub async fn info(&self, ctx: &Ctx, request: Verified<UserId>) -> Result<User, BackendFailure> {
        call(ctx, "get_user", self.users.get_user(request.into_inner())).await
    }

    /// Lists the users of an organization.
    pub async fn list(
        &self,
        ctx: &Ctx,
        request: Verified<OrganizationId>,
    ) -> Result<UserList, BackendFailure> {
        let users = call(ctx, "list_users", self.users.list_users(request.into_inner())).await?;
        Ok(UserList { users })
    }

    /// Changes name or location of a user.
    pub async fn update(
        &self,
        ctx: &Ctx,
        request: Verified<UpdateUserRequest>,
    ) -> Result<(), BackendFailure> {
        call(ctx, "update_user", self.users.update_user(request.into_inner())).await
    }

    /// Removes a user.
    pub async fn remove(&self, ctx: &Ctx, request: Verified<UserId>) -> Result<(), BackendFailure> {
        call(ctx, "remove_user", self.users.remove_user(request.into_inner())).await
    }

    /// Replaces the password of a user.
    pub async fn change_password(
        &self,
        ctx: &Ctx,
        request: Verified<ChangePasswordRequest>,
    ) -> Result<(), BackendFailure> {
        call(ctx, "change_password", self.users.change_password(request.into_inner())).await
    }

    /// Assigns a role to a user.
    pub async fn assign_role(
        &self,
        ctx: &Ctx,
        request: Verified<AssignRoleRequest>,
    ) -> Result<User, BackendFailure> {
        call(ctx, "assign_role", self.users.assign_role(request.into_inner())).await
    }

    /// Lists the roles of an organization.
    pub async fn list_roles(
        &self,
        ctx: &Ctx,
        request: Verified<OrganizationId>,
    ) -> Result<RoleList, BackendFailure> {
        let roles = call(ctx, "list_roles", self.users.list_roles(request.into_inner())).await?;
        Ok(RoleList { roles })
    }
}
