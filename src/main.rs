use heater::api::router::create_router;
use heater::config::AppConfig;
use heater::db;
use heater::metrics::init_metrics;
use heater::nba::StatsClient;
use heater::services::board::run_board_refresher;
use heater::services::grading::run_grading_sweep;
use heater::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    let addr = format!("{}:{}", config.host, config.port);

    tracing::info!("Connecting to database...");
    let db = db::init_pool(&config.database_url).await?;
    tracing::info!("Database connected");

    sqlx::migrate!("./migrations").run(&db).await?;

    let metrics_handle = init_metrics();
    let stats = StatsClient::new(&config.stats_base_url);

    // --- Background: schedule + projections refresh ---
    if config.board_refresh_enabled {
        let pool = db.clone();
        let client = stats.clone();
        let cfg = config.clone();
        tokio::spawn(async move {
            run_board_refresher(pool, client, cfg).await;
        });
        tracing::info!(
            interval_secs = config.board_refresh_interval_secs,
            "Board refresher spawned"
        );
    } else {
        tracing::info!("Board refresher disabled (BOARD_REFRESH_ENABLED=false)");
    }

    // --- Background: grading sweep over completed games ---
    if config.grading_sweep_enabled {
        let pool = db.clone();
        let client = stats.clone();
        let interval_secs = config.grading_sweep_interval_secs;
        let rate_limit_ms = config.stats_rate_limit_ms;
        tokio::spawn(async move {
            run_grading_sweep(pool, client, interval_secs, rate_limit_ms).await;
        });
        tracing::info!(interval_secs, "Grading sweep spawned");
    } else {
        tracing::info!("Grading sweep disabled (GRADING_SWEEP_ENABLED=false)");
    }

    let state = AppState {
        db,
        config,
        stats,
        metrics_handle,
    };
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {addr}");
    axum::serve(listener, router).await?;

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();
}
