//! # 스니펫 모델 정의
//!
//! 스니펫은 타이핑 연습에 쓰이는 텍스트입니다.
//! 본문은 `snippet_parts` 테이블에 1000자 단위로 나뉘어 저장되고,
//! 조회할 때 part_number 순서대로 이어 붙여 `content`로 돌려줍니다.
//!
//! ## 구조체 역할
//! - `SnippetRow`: `snippets` 테이블 한 행 (본문 없음)
//! - `Snippet`: API 응답용, 재조립된 본문 포함
//! - `SnippetPart`: 본문 조각 한 행
//! - `CreateSnippetRequest` / `UpdateSnippetRequest`: 요청 본문

use serde::{Deserialize, Serialize};

/// `snippets` 테이블 한 행
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct SnippetRow {
    pub snippet_id: String,
    pub category_id: String,
    pub snippet_name: String,
}

/// 본문까지 포함한 스니펫
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snippet {
    pub snippet_id: String,
    pub category_id: String,
    pub snippet_name: String,
    pub content: String,
}

impl Snippet {
    /// 행과 재조립된 본문을 합칩니다.
    pub fn from_row(row: SnippetRow, content: String) -> Self {
        Self {
            snippet_id: row.snippet_id,
            category_id: row.category_id,
            snippet_name: row.snippet_name,
            content,
        }
    }
}

/// 본문 조각 — `snippet_parts` 테이블 한 행
///
/// (snippet_id, part_number)가 기본키입니다. part_number는 1부터 빈틈없이 증가합니다.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct SnippetPart {
    pub snippet_id: String,
    pub part_number: i64,
    pub content: String,
}

/// 스니펫 생성 요청 — `POST /api/v1/snippets`
#[derive(Debug, Deserialize)]
pub struct CreateSnippetRequest {
    pub category_id: String,
    pub snippet_name: String,
    pub content: String,
}

/// 스니펫 수정 요청 — `PATCH /api/v1/snippets/{id}`
///
/// 보낸 필드만 바뀝니다. `content`가 있으면 기존 조각을 모두 지우고 새로 나눠 저장합니다.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateSnippetRequest {
    pub snippet_name: Option<String>,
    pub content: Option<String>,
}
