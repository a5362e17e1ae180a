//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체들을 정의합니다.
//! - `category`: 카테고리와 요청 구조체
//! - `snippet`: 스니펫, 본문 조각(part), 요청 구조체
//! - `session`: 타이핑 연습 세션과 파생 지표
//!
//! `pub use X::*;`로 재공개하여 `crate::models::Snippet`처럼 짧게 접근합니다.

pub mod category;
pub mod session;
pub mod snippet;

pub use category::*;
pub use session::*;
pub use snippet::*;
