// region:    --- Imports
use axum::extract::DefaultBodyLimit;
use gpu_marketplace::config::Config;
use gpu_marketplace::handlers::{self, AppState};
use gpu_marketplace::scheduler::SessionWatcher;
use gpu_marketplace::session::SessionRegistry;
use gpu_marketplace::store::HttpListingStore;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};
// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    // 설정 로드
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{:<12} --> 설정 로드 실패: {}", "Main", e);
            return Err(e.into());
        }
    };
    info!(
        "{:<12} --> 원격 저장소: {}, 세션 유효 시간: {}초",
        "Main",
        config.api_url,
        config.session_ttl.num_seconds()
    );

    // 원격 상품 저장소 클라이언트 생성
    let store = Arc::new(HttpListingStore::new(
        &config.api_url,
        config.request_timeout,
    )?);

    // 세션 저장소 및 만료 감시 시작
    let sessions = SessionRegistry::new(config.session_ttl);
    let watcher = SessionWatcher::new(sessions.clone(), config.session_check_interval);
    watcher.start();

    // 브라우저 클라이언트를 위한 cors 설정
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // 라우터 설정
    let routes_all = handlers::routes(AppState::new(store, sessions))
        .layer(cors)
        .layer(DefaultBodyLimit::max(1024 * 1024));

    // 리스너 생성
    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    // 서버 실행
    if let Err(err) = axum::serve(listener, routes_all.into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main
