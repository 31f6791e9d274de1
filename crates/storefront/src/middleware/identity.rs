//! Cart owner extraction.
//!
//! Cart endpoints act on the cart named by the `userId` query parameter.
//! When it is missing (or blank) the request either falls back to the shared
//! guest cart or is rejected, depending on [`IdentityMode`].

use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use bookstore_core::validation::IssueCode;
use bookstore_core::{UserId, ValidationErrors, ValidationIssue};
use serde::Deserialize;

use crate::config::IdentityMode;
use crate::error::AppError;
use crate::state::AppState;

/// Query parameter naming the cart owner.
pub const USER_ID_PARAM: &str = "userId";

#[derive(Debug, Deserialize)]
struct OwnerQuery {
    #[serde(rename = "userId")]
    user_id: Option<String>,
}

/// Extractor resolving the user whose cart a request acts on.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(CartOwner(user_id): CartOwner) -> impl IntoResponse {
///     format!("cart of {user_id}")
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartOwner(pub UserId);

impl CartOwner {
    /// Resolve the owner from an optional raw identifier.
    ///
    /// # Errors
    ///
    /// Returns a validation error if no identifier was given and `mode`
    /// requires one.
    pub fn resolve(raw: Option<String>, mode: IdentityMode) -> Result<Self, ValidationErrors> {
        match raw.filter(|id| !id.trim().is_empty()) {
            Some(id) => Ok(Self(UserId::new(id))),
            None => match mode {
                IdentityMode::SharedGuest => Ok(Self(UserId::guest())),
                IdentityMode::Required => Err(ValidationErrors::single(ValidationIssue::new(
                    USER_ID_PARAM,
                    IssueCode::Required,
                    "is required",
                ))),
            },
        }
    }
}

impl FromRequestParts<AppState> for CartOwner {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<OwnerQuery>::try_from_uri(&parts.uri)?;
        let owner = Self::resolve(query.user_id, state.config().identity)?;

        tracing::Span::current().record("user_id", owner.0.as_str());
        tracing::debug!(guest = owner.0.is_guest(), "Resolved cart owner");
        sentry::configure_scope(|scope| {
            scope.set_user(Some(sentry::User {
                id: Some(owner.0.to_string()),
                ..Default::default()
            }));
        });

        Ok(owner)
    }
}
