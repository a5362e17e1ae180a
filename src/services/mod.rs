//! # 서비스 모듈
//!
//! DB나 HTTP에 의존하지 않는 순수 도메인 로직입니다.
//! - `chunking`: 본문을 1000자 조각으로 나누기
//! - `metrics`: 타이핑 세션 지표 계산
//! - `validation`: 이름/본문 입력 검증

pub mod chunking;
pub mod metrics;
pub mod validation;
