use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use casting_auth::{AuthGuard, AuthSwitch, KeyResolver, TokenVerifier};
use tracing::{error, info};

use casting_server::adapter::handler::{self, AppState};
use casting_server::adapter::repository::{
    ActorPostgresRepository, InMemoryCastingStore, MoviePostgresRepository,
    RolePostgresRepository,
};
use casting_server::domain::repository::{ActorRepository, MovieRepository, RoleRepository};
use casting_server::infrastructure::config::Config;
use casting_server::infrastructure::database;
use casting_server::infrastructure::logger::init_logger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Config
    let config_path =
        std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/config.yaml".to_string());
    let cfg = Config::load(&config_path)?;

    // Logging
    init_logger(&cfg.app.environment, &cfg.log.format);

    info!(
        app_name = %cfg.app.name,
        version = %cfg.app.version,
        environment = %cfg.app.environment,
        "starting casting server"
    );

    // Database
    let database_url = std::env::var("DATABASE_URL")
        .ok()
        .or_else(|| cfg.database.as_ref().map(|db| db.connection_url()));
    let (max_connections, connect_timeout) = cfg
        .database
        .as_ref()
        .map_or((25, 5), |db| (db.max_open_conns, db.connect_timeout_secs));

    let state = match database_url {
        Some(url) => {
            info!("connecting to database");
            let pool =
                database::connect(&url, max_connections, Duration::from_secs(connect_timeout))
                    .await?;
            info!("database connection pool established, migrations applied");

            build_state(
                &cfg,
                Arc::new(MoviePostgresRepository::new(pool.clone())),
                Arc::new(ActorPostgresRepository::new(pool.clone())),
                Arc::new(RolePostgresRepository::new(pool)),
            )?
        }
        None => {
            info!("no database configured, using in-memory store");
            let store = Arc::new(InMemoryCastingStore::new());
            build_state(&cfg, store.clone(), store.clone(), store)?
        }
    };

    let app = handler::router(state);

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!("REST server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("casting server stopped");
    Ok(())
}

fn build_state(
    cfg: &Config,
    movie_repo: Arc<dyn MovieRepository>,
    actor_repo: Arc<dyn ActorRepository>,
    role_repo: Arc<dyn RoleRepository>,
) -> anyhow::Result<AppState> {
    let resolver = KeyResolver::from_settings(&cfg.auth)?;
    info!(jwks_url = %resolver.jwks_url(), "signing keys will be fetched from identity provider");
    let verifier = TokenVerifier::new(&cfg.auth, Arc::new(resolver))?;
    let guard = AuthGuard::new(Arc::new(verifier), AuthSwitch::from_env());

    Ok(AppState::new(
        movie_repo,
        actor_repo,
        role_repo,
        guard,
        cfg.auth.clone(),
        cfg.web.clone(),
    ))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
