use std::sync::Arc;

use anyhow::Result;
use diesel_migrations::{EmbeddedMigrations, embed_migrations};
use storefront_api::{
    app_state::AppState,
    auth::JwtManager,
    bootstrap::{self, bootstrap},
    config, db, routes,
    store::PgStore,
};

/// Migrations embedded into the binary which helps with streamlining image building process
const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[tokio::main]
async fn main() -> Result<()> {
    bootstrap::init_tracing();
    bootstrap::init_env();

    let config = config::load()?;

    tracing::info!("Running migrations...");
    let migrations_count = db::run_migrations_blocking(MIGRATIONS, &config.database.url).await?;
    tracing::info!("Run {} new migrations successfully", migrations_count);

    let pool = db::create_pool(&config.database).await?;
    let jwt = JwtManager::new(
        config.auth.jwt_secret.clone(),
        config.auth.admin_token_ttl_secs,
        config.auth.user_token_ttl_secs,
    );
    let state = AppState::new(Arc::new(PgStore::new(pool)), jwt);

    let app = routes::router(state);

    tracing::info!("Bootstrapping...");
    bootstrap("StorefrontAPI", app, &config.server, &config.cors).await?;
    Ok(())
}
