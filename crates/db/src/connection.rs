use homehaven_config::DatabaseSettings;
use mongodb::{Client, Database, options::ClientOptions};
use tracing::info;

/// Opens the pooled client described by the database settings and pings the
/// target database before handing it out, so a bad URL fails at startup
/// instead of on the first request.
pub async fn connect(settings: &DatabaseSettings) -> Result<Database, mongodb::error::Error> {
    let mut options = ClientOptions::parse(&settings.url).await?;
    options.app_name = Some("homehaven".to_string());
    options.max_pool_size = settings.max_pool_size;
    options.min_pool_size = settings.min_pool_size;

    let client = Client::with_options(options)?;
    let db = client.database(&settings.name);
    db.run_command(bson::doc! { "ping": 1 }).await?;

    info!(
        db = %settings.name,
        max_pool = ?settings.max_pool_size,
        min_pool = ?settings.min_pool_size,
        "Connected to MongoDB"
    );

    Ok(db)
}
