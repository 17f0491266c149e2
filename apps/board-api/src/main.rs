use board_api::{AppState, config::Config, create_app};
use core_lib::{
    Cache, IdeaRepository, TenantRepository,
    adapters::{
        InMemoryCache, InMemoryIdeaRepository, InMemoryTenantRepository, MIGRATOR, PostgresIdeaRepository,
        PostgresTenantRepository,
    },
    domain::{
        tenant::Tenant,
        user::{Role, User},
    },
};
use dotenvy::dotenv;
use i18n::LocaleStore;
use sqlx::postgres::PgPoolOptions;
use std::error::Error;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

type BoxError = Box<dyn Error + Send + Sync>;

// Postgres adapters when DATABASE_URL is set, in-memory ones otherwise
async fn build_repositories(
    config: &Config,
) -> Result<(Arc<dyn IdeaRepository>, Arc<dyn TenantRepository>), BoxError> {
    match &config.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new().max_connections(5).connect(url).await?;
            info!("Connected to Postgres");

            info!("Applying database migrations...");
            MIGRATOR.run(&pool).await?;
            info!("Migrations applied successfully.");

            Ok((
                Arc::new(PostgresIdeaRepository::new(pool.clone())),
                Arc::new(PostgresTenantRepository::new(pool)),
            ))
        }
        None => {
            warn!("DATABASE_URL not set, using in-memory storage");
            let ideas = InMemoryIdeaRepository::default();
            let tenants = InMemoryTenantRepository::default();
            seed_demo_tenant(&ideas, &tenants);
            Ok((Arc::new(ideas), Arc::new(tenants)))
        }
    }
}

fn seed_demo_tenant(ideas: &InMemoryIdeaRepository, tenants: &InMemoryTenantRepository) {
    let tenant = Tenant {
        id: 1,
        name: "Demonstration".to_string(),
        subdomain: "demo".to_string(),
        ..Default::default()
    };
    let admin = User {
        id: 1,
        name: "Jon Snow".to_string(),
        email: "jon.snow@got.com".to_string(),
        role: Role::Administrator,
        ..Default::default()
    };
    ideas.add_user(tenant.id, &admin);
    info!("Seeded in-memory tenant '{}'", tenant.subdomain);
    tenants.add(tenant);
}

async fn run() -> Result<(), BoxError> {
    let config = Config::from_env()?;
    info!("Environment: {:?}", config.environment);

    let locales = LocaleStore::new(&config.default_locale, config.is_production())?;
    locales.preload()?;

    let (ideas, tenants) = build_repositories(&config).await?;
    let sessions: Arc<dyn Cache> = Arc::new(InMemoryCache::new(10_000, config.session_ttl_seconds));

    let bind_addr = config.bind_addr;
    let app_state = AppState {
        ideas,
        tenants,
        sessions,
        locales: Arc::new(locales),
        config: Arc::new(config),
    };
    let app = create_app(app_state);

    let listener = TcpListener::bind(bind_addr).await?;
    info!("Board API listening on {}", bind_addr);
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    // Load environment (.env) if present
    dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to install tracing subscriber: {e}");
    }

    info!("Starting Board API v{}...", env!("CARGO_PKG_VERSION"));
    if let Err(e) = run().await {
        error!("Board API stopped: {}", e);
        std::process::exit(1);
    }
}
