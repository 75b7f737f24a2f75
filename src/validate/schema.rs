//! Structural schema for application descriptors.
//!
//! The schema is compiled once, on first use or at startup through
//! [`warm_descriptor_schema`], and shared read-only afterwards.

use jsonschema::JSONSchema;
use once_cell::sync::Lazy;
use serde_json::Value;

use crate::error::ValidationFailure;

static DESCRIPTOR_SCHEMA: Lazy<Result<JSONSchema, String>> = Lazy::new(|| {
    tracing::debug!("compiling application descriptor schema");
    let raw = include_str!("../../schemas/app_descriptor.json");
    let schema: Value = serde_json::from_str(raw)
        .map_err(|error| format!("descriptor schema is not valid json: {error}"))?;
    let compiled = JSONSchema::compile(&schema)
        .map_err(|error| format!("descriptor schema does not compile: {error}"));
    compiled
});

fn descriptor_schema() -> Result<&'static JSONSchema, ValidationFailure> {
    DESCRIPTOR_SCHEMA.as_ref().map_err(|reason| {
        tracing::error!(%reason, "application descriptor schema unavailable");
        ValidationFailure::rule("impossible to load json schema for application descriptors")
    })
}

/// Compiles the descriptor schema now instead of on the first request.
///
/// # Errors
///
/// Fails if the embedded schema cannot be compiled.
pub fn warm_descriptor_schema() -> Result<(), ValidationFailure> {
    descriptor_schema().map(|_| ())
}

/// Checks a descriptor payload against the schema.
///
/// # Errors
///
/// Returns the first schema violation as a rule failure.
///
/// # Examples
///
/// ```
/// use gateway_core::validate::validate_descriptor_format;
/// use serde_json::json;
///
/// let descriptor = json!({
///     "organization_id": "org-1",
///     "name": "web",
///     "groups": [{"name": "frontend", "services": [{"name": "nginx", "image": "nginx:1.25"}]}]
/// });
/// assert!(validate_descriptor_format(&descriptor).is_ok());
/// assert!(validate_descriptor_format(&json!({"name": "web"})).is_err());
/// ```
pub fn validate_descriptor_format(descriptor: &Value) -> Result<(), ValidationFailure> {
    let schema = descriptor_schema()?;
    if let Err(mut errors) = schema.validate(descriptor) {
        let message = errors
            .next()
            .map(|error| error.to_string())
            .unwrap_or_else(|| "descriptor does not match the schema".to_string());
        return Err(ValidationFailure::rule(message));
    }
    Ok(())
}
