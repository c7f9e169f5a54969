use std::{env, net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes::{self, ServerState};
use service::{
    file::student_store::FileStudentRepository,
    runtime,
    student::{repo::seaorm::SeaOrmStudentRepository, repository::StudentRepository, service::StudentService},
};

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load the app config; fall back to defaults plus `SERVER_HOST`/`SERVER_PORT`
/// env vars when no config file is present.
fn load_config() -> Result<configs::AppConfig, StartupError> {
    let mut cfg = match configs::load_default() {
        Ok(cfg) => cfg,
        Err(_) => {
            let mut cfg = configs::AppConfig::default();
            if let Ok(host) = env::var("SERVER_HOST") {
                cfg.server.host = host;
            }
            if let Ok(port) = env::var("SERVER_PORT") {
                cfg.server.port = port
                    .parse::<u16>()
                    .map_err(|e| StartupError::InvalidConfig(format!("SERVER_PORT: {e}")))?;
            }
            cfg
        }
    };
    cfg.normalize_and_validate()
        .map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    Ok(cfg)
}

fn bind_addr(cfg: &configs::AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address: {e}")))
}

/// Pick the repository backend: Postgres when a database url is configured,
/// otherwise the JSON file store under the data dir.
async fn build_state(cfg: &configs::AppConfig) -> anyhow::Result<ServerState> {
    let repo: Arc<dyn StudentRepository> = if cfg.database.is_configured() {
        let db = models::db::connect_with(&cfg.database).await?;
        info!("student repository: postgres");
        Arc::new(SeaOrmStudentRepository { db })
    } else {
        let path = runtime::data_file(&cfg.storage.data_dir, "students.json");
        info!(path = %path.display(), "student repository: json file (no database configured)");
        FileStudentRepository::new(path).await?
    };
    Ok(ServerState { students: Arc::new(StudentService::new(repo)) })
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let cfg = load_config()?;
    runtime::ensure_env(&cfg.storage.frontend_dir, &cfg.storage.data_dir).await?;

    let state = build_state(&cfg).await?;

    let cors = build_cors();
    let app: Router = routes::build_router(cors, &cfg.storage.frontend_dir, state);

    let addr = bind_addr(&cfg)?;
    info!(%addr, "starting student management server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
