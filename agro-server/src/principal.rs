use agro_application::context::{AppContext, Principal, Role};
use agro_domain::record::OwnerId;
use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::ApiError;
use crate::middleware::RequestId;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// 由上游认证网关注入的请求头构造调用上下文
#[derive(Debug, Clone)]
pub struct Actor(pub AppContext);

impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = header(parts, USER_ID_HEADER).ok_or(ApiError::Unauthenticated)?;
        let role = header(parts, USER_ROLE_HEADER)
            .map(Role::parse)
            .unwrap_or_default();

        let ctx = AppContext::builder()
            .principal(
                Principal::builder()
                    .user_id(OwnerId::new(user_id.to_string()))
                    .role(role)
                    .build(),
            )
            .maybe_correlation_id(parts.extensions.get::<RequestId>().map(|id| id.0.clone()))
            .build();
        Ok(Actor(ctx))
    }
}
