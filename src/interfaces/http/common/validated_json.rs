//! Validated JSON extractor for Axum
//!
//! `ValidatedJson<T>` deserializes like `axum::Json<T>` and then runs
//! `validator::Validate::validate()`. A body that is not JSON, or does not
//! fit the request type, answers 400; a body that fits but breaks a field
//! rule answers 422. Both use the `ApiResponse` envelope.

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use super::ApiResponse;

/// JSON body that has passed its `#[validate(...)]` rules.
pub struct ValidatedJson<T>(pub T);

pub enum ValidatedJsonRejection {
    /// Body is not JSON or does not match the request type.
    Malformed(JsonRejection),
    /// Body parsed but broke at least one field rule.
    Invalid(ValidationErrors),
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Malformed(rejection) => {
                tracing::debug!(reason = %rejection.body_text(), "Rejected malformed request body");
                let body = ApiResponse::<()>::error(format!(
                    "malformed request body: {}",
                    rejection.body_text()
                ));
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            Self::Invalid(errors) => {
                let messages = field_messages(&errors);
                tracing::debug!(errors = ?messages, "Rejected invalid request body");
                let message = if messages.is_empty() {
                    "validation failed".to_string()
                } else {
                    messages.join("; ")
                };
                let body = ApiResponse::<()>::error(message);
                (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
            }
        }
    }
}

/// One `path: message` line per broken rule, sorted by path.
///
/// Nested structs and lists are flattened to `outer.inner` / `items[2]`.
pub fn field_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut out = Vec::new();
    collect(String::new(), errors, &mut out);
    out.sort();
    out
}

fn collect(prefix: String, errors: &ValidationErrors, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };
        match kind {
            ValidationErrorsKind::Field(errs) => {
                out.extend(errs.iter().map(|e| format!("{}: {}", path, describe(e))));
            }
            ValidationErrorsKind::Struct(inner) => collect(path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect(format!("{}[{}]", path, index), inner, out);
                }
            }
        }
    }
}

fn describe(e: &ValidationError) -> String {
    match &e.message {
        Some(message) => message.to_string(),
        None => format!("failed `{}` check", e.code),
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(req: axum::extract::Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::Malformed)?;
        value.validate().map_err(ValidatedJsonRejection::Invalid)?;
        Ok(ValidatedJson(value))
    }
}
