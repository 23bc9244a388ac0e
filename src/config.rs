use anyhow::{bail, Context, Result};
use sea_orm::Database;
use store::token::AuthKeys;

use crate::schemas::AppState;

/// Minimum length for the token-signing secret.
const MIN_SECRET_LEN: usize = 16;

/// Initialize application configuration and state
pub async fn initialize_app_state(database_url: &str, jwt_secret: &str) -> Result<AppState> {
    if jwt_secret.len() < MIN_SECRET_LEN {
        bail!("JWT_SECRET must be at least {MIN_SECRET_LEN} characters");
    }

    // Connect to database
    tracing::info!("Connecting to database: {}", database_url);
    let db = Database::connect(database_url)
        .await
        .with_context(|| format!("failed to connect to database '{database_url}'"))?;

    Ok(AppState {
        db,
        keys: AuthKeys::from_secret(jwt_secret.as_bytes()),
    })
}
