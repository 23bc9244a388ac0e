use anyhow::Result;
use tracing::info;

use super::{init_database, serve};

/// Run pending migrations, then hand off to the normal serve path.
pub async fn migrate_and_serve(
    database_url: &str,
    bind_address: &str,
    jwt_secret: &str,
) -> Result<()> {
    info!("Running migrations before starting the server");
    init_database(database_url).await?;
    serve(database_url, bind_address, jwt_secret).await
}
