use axum::{
    extract::{Request, State},
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{self, Header},
    typed_header::TypedHeaderRejection,
    TypedHeader,
};
use uuid::Uuid;

use crate::entities::user::{self, UserRole};
use crate::error::{AppError, AppResult};
use crate::AppState;

pub static X_API_KEY: HeaderName = HeaderName::from_static("x-api-key");

/// The static per-user token sent in `x-api-key`.
#[derive(Debug, Clone)]
pub struct ApiKey(pub String);

impl Header for ApiKey {
    fn name() -> &'static HeaderName {
        &X_API_KEY
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, headers::Error>
    where
        I: Iterator<Item = &'i HeaderValue>,
    {
        let value = values.next().ok_or_else(headers::Error::invalid)?;
        let token = value.to_str().map_err(|_| headers::Error::invalid())?;
        if token.is_empty() {
            return Err(headers::Error::invalid());
        }
        Ok(ApiKey(token.to_string()))
    }

    fn encode<E: Extend<HeaderValue>>(&self, values: &mut E) {
        if let Ok(value) = HeaderValue::from_str(&self.0) {
            values.extend(std::iter::once(value));
        }
    }
}

/// The authenticated user behind a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
    pub roles: Vec<UserRole>,
}

impl Principal {
    pub fn has_role(&self, role: UserRole) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(UserRole::Admin)
    }
}

impl From<&user::Model> for Principal {
    fn from(user: &user::Model) -> Self {
        Self {
            user_id: user.id,
            roles: user.roles.clone(),
        }
    }
}

/// Resolve the `x-api-key` token to a user and attach it as a [`Principal`].
pub async fn auth_middleware(
    State(state): State<AppState>,
    api_key: Result<TypedHeader<ApiKey>, TypedHeaderRejection>,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    let TypedHeader(ApiKey(token)) = api_key.map_err(|_| AppError::Unauthorized)?;

    let user = state
        .users
        .find_by_token(&token)
        .await?
        .ok_or(AppError::Unauthorized)?;

    tracing::debug!(user_id = %user.id, "Authenticated request");

    request.extensions_mut().insert(Principal::from(&user));
    Ok(next.run(request).await)
}
