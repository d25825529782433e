use mimalloc::MiMalloc;
use question_bank::config::Config;
use question_bank::router::{BankState, bank_router, cookie_key};
use question_bank::{
    Connection, FirebaseVerifier, GoogleSheetsStore, IdentityVerifier, RecordStore,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.basic.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        listen_addr = %cfg.basic.listen_addr,
        proxy = %cfg.basic.proxy.as_ref().map(|u| u.as_str()).unwrap_or("<none>"),
        loglevel = %cfg.basic.loglevel,
        sheet_id = %cfg.sheets.sheet_id,
        worksheet = %cfg.sheets.worksheet,
    );

    let http = question_bank::google::http::build_client(cfg.basic.proxy.as_ref())?;

    let store: Connection<dyn RecordStore> = Connection::establish(
        "google sheets",
        GoogleSheetsStore::connect(&cfg.sheets, http.clone())
            .await
            .map(|s| Arc::new(s) as Arc<dyn RecordStore>),
    );
    let identity: Connection<dyn IdentityVerifier> = Connection::establish(
        "firebase auth",
        FirebaseVerifier::connect(&cfg.firebase, http)
            .map(|v| Arc::new(v) as Arc<dyn IdentityVerifier>),
    );

    let state = BankState::new(
        store,
        identity,
        cookie_key(&cfg.basic)?,
        !cfg.basic.insecure_cookie,
    );
    let app = bank_router(state);

    let listener = TcpListener::bind(cfg.basic.listen_addr.as_str()).await?;
    info!("HTTP server listening on {}", cfg.basic.listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await?;
    Ok(())
}
