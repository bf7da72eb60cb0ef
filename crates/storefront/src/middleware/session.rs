//! Session middleware configuration.
//!
//! Sessions live in memory; they carry only the Shopify cart ID and the
//! visitor key into [`crate::services::CartSessions`].

use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};
use uuid::Uuid;

use crate::config::StorefrontConfig;
use crate::models::session_keys;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "iw_session";

/// Create the session layer with an in-memory store.
///
/// Sessions expire after the same inactivity period as cart sessions.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MemoryStore> {
    let is_secure = config.base_url.starts_with("https://");
    let idle_secs = i64::try_from(config.cart_idle.as_secs()).unwrap_or(i64::MAX);

    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(idle_secs),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// The visitor key for this session, assigned on first use.
///
/// # Errors
///
/// Returns an error if the session store can't be read or written.
pub async fn visitor_id(session: &Session) -> Result<Uuid, tower_sessions::session::Error> {
    if let Some(id) = session.get::<Uuid>(session_keys::VISITOR_ID).await? {
        return Ok(id);
    }
    let id = Uuid::new_v4();
    session.insert(session_keys::VISITOR_ID, id).await?;
    Ok(id)
}
