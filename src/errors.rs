//! Error types for dynamo-manager.
//!
//! This module maps AWS SDK errors to [`RegistryError`] variants.
//! Uses typed `SdkError` variant matching — no string parsing of debug output.

use aws_sdk_dynamodb::error::SdkError;
use thiserror::Error;

/// Failure talking to the table registry (list, describe, tags, update).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Table '{0}' not found")]
    NotFound(String),

    #[error("Table '{0}' is being created, updated or deleted")]
    InUse(String),

    #[error("Access denied to DynamoDB: {0}")]
    AccessDenied(String),

    #[error("{0}")]
    Credentials(String),

    #[error("DynamoDB request rate too high: {0}")]
    Throttled(String),

    #[error("DynamoDB rejected the request: {0}")]
    Validation(String),

    #[error("{0}")]
    Connection(String),

    #[error("Malformed DynamoDB response: {0}")]
    MalformedResponse(String),

    #[error("Failed to build request: {0}")]
    Request(String),

    #[error("DynamoDB error: {0}")]
    Service(String),
}

/// Top-level error returned by the search engine and the capacity planner.
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Invalid request: {0}")]
    Validation(String),
}

impl ManagerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ManagerError::Validation(msg.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ManagerError::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, ManagerError>;

// ========== TYPED ERROR MAPPING ==========

/// Map non-service `SdkError` variants (dispatch failures, timeouts, etc.).
///
/// Returns `None` for `ServiceError`, which needs the error code.
fn map_outer_sdk_error<E, R>(err: &SdkError<E, R>) -> Option<RegistryError>
where
    E: std::fmt::Debug,
    R: std::fmt::Debug,
{
    match err {
        SdkError::DispatchFailure(dispatch) => {
            let msg = if dispatch.is_timeout() {
                "Connection timed out to DynamoDB. Check your network or endpoint."
            } else if dispatch.is_io() {
                "Connection failed to DynamoDB (I/O error). Check if the endpoint is reachable."
            } else {
                "Connection failed to DynamoDB. Check if the endpoint is reachable."
            };
            Some(RegistryError::Connection(msg.to_string()))
        }
        SdkError::TimeoutError(_) => Some(RegistryError::Connection(
            "Connection timed out to DynamoDB. Check your network or endpoint.".to_string(),
        )),
        SdkError::ConstructionFailure(err) => {
            let msg = format!("{:?}", err);
            if msg.contains("credentials")
                || msg.contains("Credentials")
                || msg.contains("NoCredentialsError")
            {
                Some(RegistryError::Credentials(
                    "No AWS credentials found. Configure credentials via environment variables \
                    (AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY), AWS profile, or IAM role."
                        .to_string(),
                ))
            } else {
                Some(RegistryError::Request(msg))
            }
        }
        SdkError::ResponseError(err) => Some(RegistryError::MalformedResponse(format!(
            "{:?}",
            err
        ))),
        SdkError::ServiceError(_) => None,
        _ => Some(RegistryError::Service(format!("{:?}", err))),
    }
}

/// Map a DynamoDB service error code + message to a [`RegistryError`].
pub(crate) fn map_dynamodb_code(
    code: Option<&str>,
    message: Option<&str>,
    display: &str,
    table: Option<&str>,
) -> RegistryError {
    let detail = message.unwrap_or(display).to_string();

    match code {
        Some("UnrecognizedClientException") => RegistryError::Credentials(
            "Invalid AWS credentials. Check your access key and secret.".to_string(),
        ),
        Some("InvalidSignatureException") | Some("SignatureDoesNotMatch") => {
            RegistryError::Credentials(
                "AWS signature mismatch. Check your secret access key.".to_string(),
            )
        }
        Some("ExpiredTokenException") | Some("ExpiredToken") => RegistryError::Credentials(
            "AWS credentials have expired. Refresh your session token.".to_string(),
        ),
        Some("AccessDeniedException") => RegistryError::AccessDenied(
            message.unwrap_or("Check your IAM permissions.").to_string(),
        ),
        Some("ProvisionedThroughputExceededException")
        | Some("LimitExceededException")
        | Some("RequestLimitExceeded")
        | Some("ThrottlingException") => RegistryError::Throttled(detail),
        Some("ResourceNotFoundException") => {
            RegistryError::NotFound(table.unwrap_or("<unknown>").to_string())
        }
        Some("ResourceInUseException") => {
            RegistryError::InUse(table.unwrap_or("<unknown>").to_string())
        }
        Some("ValidationException") => RegistryError::Validation(detail),
        _ => RegistryError::Service(detail),
    }
}

/// Map DynamoDB errors using typed `SdkError` variants.
///
/// For `ServiceError`, uses `ProvideErrorMetadata` to get the error code and message
/// instead of parsing debug strings.
pub fn map_sdk_error<E, R>(err: SdkError<E, R>, table: Option<&str>) -> RegistryError
where
    E: aws_sdk_dynamodb::error::ProvideErrorMetadata + std::fmt::Debug + std::fmt::Display,
    R: std::fmt::Debug,
{
    if let Some(mapped) = map_outer_sdk_error(&err) {
        return mapped;
    }

    if let Some(service_err) = err.as_service_error() {
        let meta = aws_sdk_dynamodb::error::ProvideErrorMetadata::meta(service_err);
        let display = service_err.to_string();
        return map_dynamodb_code(meta.code(), meta.message(), &display, table);
    }

    RegistryError::Service(format!("Unexpected DynamoDB error: {:?}", err))
}
