//! # 타이핑 스니펫 서버 진입점
//!
//! 타이핑 연습용 스니펫 라이브러리 HTTP API 서버의 **시작점(entry point)**입니다.
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. SQLite 연결 풀 생성 + 마이그레이션 (`db::connect`)
//! 4. API 라우터 구성 (`routes::router`)
//! 5. HTTP 서버 시작

// ── 모듈 선언 ──
mod config;
mod db;
mod error;
mod models;
mod routes;
mod services;

use anyhow::Result; // main에서는 어떤 에러든 담을 수 있는 anyhow::Result를 사용
use config::Config;
use routes::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1단계: 환경변수 로딩 ──
    // .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    // ── 2단계: 로깅 초기화 ──
    // RUST_LOG가 없으면 이 크레이트와 tower_http, axum을 debug 레벨로 출력합니다.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "typing_snippets=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // ── 3단계: 설정 로딩 ──
    // DATABASE_URL이 없으면 여기서 에러로 종료합니다.
    let config = Config::from_env()?;
    tracing::info!(
        "Starting typing-snippets server on {}:{}",
        config.host,
        config.port
    );

    // ── 4단계: DB 연결 + 마이그레이션 ──
    let pool = db::connect(&config.database_url, config.max_connections).await?;

    // ── 5단계: 라우터 구성 ──
    let app = routes::router(AppState { pool });

    // ── 6단계: 서버 시작 ──
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
