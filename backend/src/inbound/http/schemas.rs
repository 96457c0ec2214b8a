//! OpenAPI schema definitions for domain types.
//!
//! Domain types do not derive `ToSchema`; the wrappers here mirror their
//! wire shape and register under the domain type's name.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// Malformed input or failed validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Missing, malformed, expired or revoked bearer token.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated, but the role does not permit the operation.
    #[schema(rename = "forbidden")]
    Forbidden,
    #[schema(rename = "not_found")]
    NotFound,
    /// The resource already exists, for example a registered email.
    #[schema(rename = "conflict")]
    Conflict,
    /// A backing service could not be reached.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    #[schema(example = "Email, password, and full name are required")]
    message: String,
    /// Correlates the response with server logs; echoed in `trace-id`.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Machine-readable context such as `{ "field": "age", "code": "out_of_range" }`.
    details: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::PartialSchema;

    fn schema_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[rstest]
    #[case("invalid_request")]
    #[case("unauthorized")]
    #[case("forbidden")]
    #[case("not_found")]
    #[case("conflict")]
    #[case("service_unavailable")]
    #[case("internal_error")]
    fn every_error_code_is_documented(#[case] code: &str) {
        assert!(schema_json::<ErrorCodeSchema>().contains(code), "missing {code}");
    }

    #[rstest]
    fn error_schema_uses_wire_names() {
        assert_eq!(ErrorSchema::name(), "crate.domain.Error");
        let json = schema_json::<ErrorSchema>();
        assert!(json.contains("traceId"));
        assert!(json.contains("details"));
    }
}
