use anyhow::anyhow;
use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
};
use campussync_core::AppError;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

fn format_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect();

    // Nested structs report under their parent field
    for (field, kind) in errors.errors() {
        if matches!(kind, validator::ValidationErrorsKind::Struct(_)) {
            messages.push(format!("{} is invalid", field));
        }
    }

    messages.sort();
    messages.join(", ")
}

fn missing_field_error(error_msg: &str) -> Option<AppError> {
    let field = error_msg
        .split("missing field `")
        .nth(1)
        .and_then(|s| s.split('`').next())?;
    Some(AppError::bad_request(anyhow!("{} is required", field)))
}

fn validated<T: Validate>(value: T) -> Result<T, AppError> {
    value.validate().map_err(|errors| {
        AppError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            anyhow!("{}", format_errors(&errors)),
        )
    })?;
    Ok(value)
}

/// Decodes and validates an action payload from a raw body.
///
/// Action bodies are read as bytes so the role check can run before the
/// payload is even looked at.
pub fn parse_payload<T>(body: &[u8]) -> Result<T, AppError>
where
    T: DeserializeOwned + Validate,
{
    let value: T = serde_json::from_slice(body).map_err(|e| {
        let message = e.to_string();
        missing_field_error(&message).unwrap_or_else(|| {
            if e.is_data() {
                AppError::bad_request(anyhow!("Invalid field type in request"))
            } else {
                AppError::bad_request(anyhow!("Invalid request body"))
            }
        })
    })?;
    validated(value)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                let error_msg = rejection.body_text();

                if let Some(err) = missing_field_error(&error_msg) {
                    return err;
                }

                if error_msg.contains("invalid type") {
                    return AppError::bad_request(anyhow!("Invalid field type in request"));
                }

                if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
                    return AppError::bad_request(anyhow!(
                        "Missing 'Content-Type: application/json' header"
                    ));
                }

                AppError::bad_request(anyhow!("Invalid request body"))
            })?;

        Ok(ValidatedJson(validated(value)?))
    }
}
