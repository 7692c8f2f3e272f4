use agro_application::error::AppError;
use agro_domain::error::DomainError;
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    App(#[from] AppError),

    #[error("missing x-user-id header")]
    Unauthenticated,

    #[error("{0}")]
    BadRequest(String),

    #[error("malformed payload: {0}")]
    MalformedPayload(#[from] JsonRejection),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::App(AppError::Domain(err))
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) | ApiError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            ApiError::App(err) => match err.as_domain() {
                Some(DomainError::NotFound { .. }) => StatusCode::NOT_FOUND,
                Some(DomainError::Conflict { .. }) => StatusCode::CONFLICT,
                Some(DomainError::InvalidValue { .. } | DomainError::Parse { .. }) => {
                    StatusCode::BAD_REQUEST
                }
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// 面向客户端的消息；内部错误不暴露细节
    fn message(&self) -> String {
        match self {
            ApiError::App(err) => match err.as_domain() {
                Some(DomainError::NotFound { reason }) => reason.clone(),
                Some(DomainError::Conflict { field, .. }) => {
                    format!("{} already exists", field_label(field))
                }
                Some(DomainError::InvalidValue { reason } | DomainError::Parse { reason }) => {
                    reason.clone()
                }
                _ => "Internal server error".to_string(),
            },
            other => other.to_string(),
        }
    }
}

/// 唯一字段在冲突消息中的显示名
fn field_label(field: &str) -> String {
    match field {
        "phone" => "Phone number".to_string(),
        "gst_no" => "GST number".to_string(),
        "machine_number" => "Machine".to_string(),
        "code" => "Code".to_string(),
        other => {
            let words = other.replace('_', " ");
            let mut chars = words.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => words,
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(err = %self, "request failed");
        } else {
            tracing::info!(err = %self, status = status.as_u16(), "request rejected");
        }

        let mut body = json!({
            "statusCode": status.as_u16(),
            "message": self.message(),
            "error": status.canonical_reason().unwrap_or("Error"),
        });
        if let ApiError::App(AppError::Domain(DomainError::Conflict { field, .. })) = &self {
            body["field"] = json!(field);
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let not_found: ApiError = DomainError::not_found("Agent", "x").into();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let conflict: ApiError = DomainError::Conflict {
            field: "phone".into(),
            value: "1".into(),
        }
        .into();
        assert_eq!(conflict.status(), StatusCode::CONFLICT);
        assert_eq!(conflict.message(), "Phone number already exists");

        let parse: ApiError = DomainError::CodeParse {
            prefix: "P".into(),
            code: "Pabc".into(),
            reason: "no digits".into(),
        }
        .into();
        assert_eq!(parse.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(parse.message(), "Internal server error");

        assert_eq!(ApiError::Unauthenticated.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn conflict_message_uses_readable_field_label() {
        let conflict = |field: &str| -> ApiError {
            DomainError::Conflict {
                field: field.into(),
                value: "1".into(),
            }
            .into()
        };
        assert_eq!(conflict("gst_no").message(), "GST number already exists");
        assert_eq!(conflict("machine_number").message(), "Machine already exists");
        assert_eq!(conflict("aadhar_no").message(), "Aadhar no already exists");
    }
}
