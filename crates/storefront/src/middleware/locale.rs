//! Locale prefix guard for `/{locale}/...` catalog routes.

use axum::{
    extract::{Path, Request},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;

use internal_war_core::variant::is_locale;

use crate::error::{AppError, Result};

/// The `{locale}` segment; other path parameters are ignored.
#[derive(Debug, Deserialize)]
pub struct LocaleParam {
    pub locale: String,
}

/// Rejects `/{locale}/...` requests whose first segment isn't a locale code,
/// so `/anything/products` doesn't render the catalog.
pub async fn require_locale(
    Path(LocaleParam { locale }): Path<LocaleParam>,
    request: Request,
    next: Next,
) -> Result<Response> {
    if !is_locale(&locale) {
        return Err(AppError::NotFound(format!("Unknown locale: {locale}")));
    }
    Ok(next.run(request).await)
}
