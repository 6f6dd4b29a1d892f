//! Shared HTTP building blocks: response envelope, validated JSON, error mapping

mod errors;
mod response;
mod validated_json;

pub use errors::{error_response, status_for, ApiError};
pub use response::{ApiResponse, EmptyData};
pub use validated_json::{ValidatedJson, ValidatedJsonRejection};
