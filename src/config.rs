//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수(`.env` 포함)에서 서버 설정값을 읽어옵니다.
//!
//! 설정 항목:
//! - `DATABASE_URL`: SQLite 데이터베이스 경로 (필수, 예: "sqlite:data/snippets.db")
//! - `HOST`: 서버 바인딩 주소 (기본값 "0.0.0.0")
//! - `PORT`: 서버 포트 번호 (기본값 3000)
//! - `DB_MAX_CONNECTIONS`: 연결 풀 최대 크기 (기본값 5)

use std::env;

/// 애플리케이션 전체 설정을 담는 구조체
///
/// 서버 시작 시 한 번 읽어 `main`에서 필요한 곳으로 전달합니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 데이터베이스 URL
    pub database_url: String,
    /// 서버가 바인딩할 호스트 주소
    pub host: String,
    /// 서버 포트 번호
    pub port: u16,
    /// SQLite 연결 풀의 최대 연결 수
    pub max_connections: u32,
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// # 에러
    /// `DATABASE_URL`이 없으면 `VarError`를 반환합니다.
    /// 숫자 항목은 파싱에 실패하면 기본값을 사용합니다.
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_or(env::var("PORT").ok(), 3000),
            max_connections: parse_or(env::var("DB_MAX_CONNECTIONS").ok(), 5),
        })
    }
}

/// 문자열을 숫자로 파싱하고, 없거나 잘못된 값이면 기본값을 돌려줍니다.
fn parse_or<T: std::str::FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}
