//! # 카테고리 모델 정의
//!
//! 카테고리는 스니펫을 묶는 최상위 분류입니다 (예: "Rust", "Quotes").
//! 이름은 전체 카테고리 중에서 유일해야 하며, 대소문자를 구분합니다.

use serde::{Deserialize, Serialize};

/// 카테고리 엔티티 — DB의 `categories` 테이블 한 행에 대응합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    /// 카테고리 고유 식별자 (UUIDv7)
    pub category_id: String,
    /// 카테고리 이름 (1~64자 ASCII, 앞뒤 공백 제거됨)
    pub category_name: String,
}

/// 카테고리 생성 요청 — `POST /api/v1/categories`
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub category_name: String,
}

/// 카테고리 이름 변경 요청 — `PATCH /api/v1/categories/{id}`
///
/// 이름 전체를 교체합니다. 다른 변경 가능한 필드는 없습니다.
#[derive(Debug, Deserialize)]
pub struct RenameCategoryRequest {
    pub category_name: String,
}
