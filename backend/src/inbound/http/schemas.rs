//! OpenAPI schema definitions for domain types.
//!
//! Domain types do not derive `ToSchema`; the wrappers here mirror them so
//! the documentation lives in the adapter layer.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// A required argument is missing or malformed.
    #[schema(rename = "invalid-argument")]
    InvalidArgument,
    /// The invocation carries no usable identity.
    #[schema(rename = "unauthenticated")]
    Unauthenticated,
    /// The caller lacks the required role.
    #[schema(rename = "permission-denied")]
    PermissionDenied,
    /// The addressed document does not exist.
    #[schema(rename = "not-found")]
    NotFound,
    /// A backing service could not be reached.
    #[schema(rename = "unavailable")]
    Unavailable,
    /// Unexpected server failure.
    #[schema(rename = "internal")]
    Internal,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "permission-denied")]
    code: ErrorCodeSchema,
    /// Human-readable message.
    #[schema(example = "Admin only")]
    message: String,
    /// Correlation identifier, also sent as the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary details.
    details: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use utoipa::PartialSchema;

    use super::*;

    #[test]
    fn error_schema_uses_camel_case_trace_id() {
        let schema = serde_json::to_value(ErrorSchema::schema()).expect("schema json");
        assert!(schema["properties"].get("traceId").is_some());
    }

    #[test]
    fn error_code_schema_lists_kebab_case_values() {
        let schema = serde_json::to_value(ErrorCodeSchema::schema()).expect("schema json");
        let values = schema["enum"].as_array().expect("enum values");
        assert!(values.contains(&serde_json::json!("permission-denied")));
        assert_eq!(values.len(), 6);
    }
}
