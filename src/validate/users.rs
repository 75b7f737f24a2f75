use super::{require, Validate};
use crate::entities::{
    AddUserRequest, AssignRoleRequest, ChangePasswordRequest, UpdateUserRequest, UserId,
};
use crate::error::ValidationFailure;

impl Validate for UserId {
    fn validate(&self) -> Result<(), ValidationFailure> {
        require(&self.organization_id, "organization_id")?;
        require(&self.email, "email")
    }
}

impl Validate for AddUserRequest {
    fn validate(&self) -> Result<(), ValidationFailure> {
        require(&self.organization_id, "organization_id")?;
        require(&self.email, "email")?;
        if self.password.is_empty() {
            return Err(ValidationFailure::missing("password"));
        }
        require(&self.name, "name")?;
        require(&self.role_name, "role_name")
    }
}

impl Validate for UpdateUserRequest {
    fn validate(&self) -> Result<(), ValidationFailure> {
        require(&self.organization_id, "organization_id")?;
        require(&self.email, "email")
    }
}

impl Validate for ChangePasswordRequest {
    fn validate(&self) -> Result<(), ValidationFailure> {
        require(&self.organization_id, "organization_id")?;
        if self.password.is_empty() {
            return Err(ValidationFailure::missing("password"));
        }
        if self.new_password.is_empty() {
            return Err(ValidationFailure::new(
                "new_password",
                "new password cannot be empty",
            ));
        }
        require(&self.email, "email")
    }
}

impl Validate for AssignRoleRequest {
    fn validate(&self) -> Result<(), ValidationFailure> {
        require(&self.organization_id, "organization_id")?;
        require(&self.role_id, "role_id")?;
        require(&self.email, "email")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secret::Secret;

    fn add_user() -> AddUserRequest {
        AddUserRequest {
            organization_id: "org-1".to_string(),
            email: "bob@example.com".to_string(),
            password: Secret::new("s3cret".to_string()),
            name: "Bob".to_string(),
            role_name: "operator".to_string(),
        }
    }

    #[test]
    fn complete_add_user_passes() {
        assert!(add_user().validate().is_ok());
    }

    #[test]
    fn add_user_rule_order() {
        let mut request = add_user();
        request.password = Secret::new(String::new());
        request.name.clear();
        assert_eq!(request.validate().unwrap_err().message(), "password cannot be empty");

        let mut request = add_user();
        request.role_name.clear();
        assert_eq!(request.validate().unwrap_err().message(), "role_name cannot be empty");
    }

    #[test]
    fn change_password_checks_new_password_before_email() {
        let request = ChangePasswordRequest {
            organization_id: "org-1".to_string(),
            email: String::new(),
            password: Secret::new("old".to_string()),
            new_password: Secret::new(String::new()),
        };

        let failure = request.validate().unwrap_err();
        assert_eq!(failure.message(), "new password cannot be empty");
        assert_eq!(failure.field(), Some("new_password"));
    }

    #[test]
    fn assign_role_checks_role_before_email() {
        let request = AssignRoleRequest {
            organization_id: "org-1".to_string(),
            ..AssignRoleRequest::default()
        };
        assert_eq!(request.validate().unwrap_err().message(), "role_id cannot be empty");
    }
}
