use migration::{Migrator, MigratorTrait};

mod settings;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "expense_tracker={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let db = connect_database(&settings.database.url)
        .await
        .inspect_err(|err| tracing::error!("failed to initialize database: {err}"))?;

    let engine = engine::Engine::builder()
        .database(db)
        .build()
        .await
        .inspect_err(|err| tracing::error!("failed to build engine from database: {err}"))?;

    let addr = format!("{}:{}", settings.server.bind, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .inspect_err(|err| tracing::error!("failed to bind server listener on {addr}: {err}"))?;

    server::run_with_listener(engine, listener)
        .await
        .inspect_err(|err| tracing::error!("server failed: {err}"))?;

    Ok(())
}

/// Connects and brings the schema up to date.
async fn connect_database(url: &str) -> Result<sea_orm::DatabaseConnection, BoxError> {
    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    tracing::info!("database ready");
    Ok(database)
}
