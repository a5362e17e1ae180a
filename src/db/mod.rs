//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 데이터베이스와 직접 상호작용하는 함수들을 모아둔 모듈입니다.
//! 라우트 핸들러(routes/)에서 이 모듈의 함수를 호출하여 DB 작업을 수행합니다.
//!
//! 연결 풀은 전역 싱글턴이 아니라 `connect()`로 만들어 명시적으로 전달합니다.
//! 테스트는 `connect_in_memory()`로 서로 격리된 DB를 사용합니다.
//!
//! 각 하위 모듈:
//! - `categories`: 카테고리 CRUD와 이름 중복 검사
//! - `snippets`: 스니펫 CRUD (본문은 `parts`에 위임)
//! - `parts`: 본문 조각 저장/재조립/삭제
//! - `sessions`: 타이핑 세션 기록과 다음 시작 위치 계산

pub mod categories;
pub mod parts;
pub mod sessions;
pub mod snippets;

pub use categories::*;
pub use sessions::*;
pub use snippets::*;

use crate::error::AppError;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;

/// 데이터베이스에 연결하고 마이그레이션을 실행한 풀을 돌려줍니다.
///
/// - DB 파일이 없으면 새로 만듭니다.
/// - 외래키 제약을 켭니다 (스니펫 → 카테고리, 조각 → 스니펫).
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, AppError> {
    // DB 파일이 들어갈 디렉토리가 없으면 생성 (mkdir -p)
    if let Some(parent) = database_file(database_url).and_then(Path::parent) {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            tokio::fs::create_dir_all(parent).await?;
            tracing::info!("Created database directory: {}", parent.display());
        }
    }

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// `sqlite:data/app.db?mode=rwc` 같은 URL에서 파일 경로 부분만 꺼냅니다.
/// 인메모리 DB면 `None`입니다.
fn database_file(database_url: &str) -> Option<&Path> {
    let rest = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or(rest);
    if path.is_empty() || path.contains(":memory:") {
        return None;
    }
    Some(Path::new(path))
}

/// 테스트용 인메모리 DB. 연결마다 별도 DB가 되므로 연결을 하나로 고정합니다.
#[cfg(test)]
pub async fn connect_in_memory() -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    Ok(pool)
}
