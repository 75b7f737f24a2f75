//! Structural validation of request DTOs.
//!
//! Every request type implements [`Validate`]. Rules run in a fixed order
//! and the first violated one is reported; failures are never aggregated.
//! Rules are pure: validating the same request twice gives the same answer.
//!
//! [`validate`] is the only way to obtain a [`Verified`] request, which is
//! what the managers accept.

use crate::entities::{LabelOp, Labels, OrganizationId};
use crate::error::ValidationFailure;
use crate::verified::Verified;

mod applications;
mod clusters;
mod devices;
mod inventory;
pub mod schema;
mod users;

pub use schema::{validate_descriptor_format, warm_descriptor_schema};

/// Field presence and consistency rules of a request type.
pub trait Validate {
    /// Checks the request, reporting the first violated rule.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationFailure`] of the first rule that does not hold.
    fn validate(&self) -> Result<(), ValidationFailure>;
}

/// Validates `request` and wraps it as proof for the managers.
///
/// # Errors
///
/// Returns the first violated rule.
///
/// # Examples
///
/// ```
/// use gateway_core::entities::DeviceGroupId;
/// use gateway_core::validate::validate;
///
/// let failure = validate(DeviceGroupId::new("org-1", "")).unwrap_err();
/// assert_eq!(failure.message(), "device_group_id cannot be empty");
/// ```
pub fn validate<R: Validate>(request: R) -> Result<Verified<R>, ValidationFailure> {
    request.validate()?;
    Ok(Verified::new_unchecked(request))
}

/// Fails with "`<field>` cannot be empty" when `value` is empty.
pub(crate) fn require(value: &str, field: &'static str) -> Result<(), ValidationFailure> {
    if value.is_empty() {
        Err(ValidationFailure::missing(field))
    } else {
        Ok(())
    }
}

/// Labels must accompany an add or remove operation.
pub(crate) fn require_labels_for(op: LabelOp, labels: &Labels) -> Result<(), ValidationFailure> {
    if op.is_set() {
        require_labels(labels)
    } else {
        Ok(())
    }
}

pub(crate) fn require_labels(labels: &Labels) -> Result<(), ValidationFailure> {
    if labels.is_empty() {
        Err(ValidationFailure::missing("labels"))
    } else {
        Ok(())
    }
}

impl Validate for OrganizationId {
    fn validate(&self) -> Result<(), ValidationFailure> {
        require(&self.organization_id, "organization_id")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn organization_id_must_be_present() {
        let failure = validate(OrganizationId::new("")).unwrap_err();
        assert_eq!(failure.field(), Some("organization_id"));
        assert_eq!(failure.message(), "organization_id cannot be empty");

        let verified = validate(OrganizationId::new("org-1")).expect("valid");
        assert_eq!(verified.as_ref().organization_id, "org-1");
    }

    #[test]
    fn labels_only_required_with_an_operation() {
        let empty = Labels::new();
        assert!(require_labels_for(LabelOp::Unset, &empty).is_ok());

        let failure = require_labels_for(LabelOp::Add, &empty).unwrap_err();
        assert_eq!(failure.message(), "labels cannot be empty");
        assert!(require_labels_for(LabelOp::Remove, &empty).is_err());

        let labels = Labels::from([("env".to_string(), "prod".to_string())]);
        assert!(require_labels_for(LabelOp::Remove, &labels).is_ok());
    }
}
