//! # 이름/본문 검증 서비스
//!
//! 카테고리 이름, 스니펫 이름, 스니펫 본문에 공통으로 적용되는 규칙입니다.
//!
//! - 이름: 앞뒤 공백 제거 후 비어 있으면 안 됨, 길이 제한, ASCII 전용,
//!   SQL 구문처럼 보이는 패턴 금지
//! - 본문: 공백만으로 이루어지면 안 됨, ASCII 전용 (공백 제거는 하지 않음)
//!
//! 검증에 통과한 이름은 정규화된(trim된) `String`으로 돌려줍니다.

use crate::error::AppError;

/// 카테고리 이름의 최대 길이 (문자 수)
pub const MAX_CATEGORY_NAME_LEN: usize = 64;
/// 스니펫 이름의 최대 길이 (문자 수)
pub const MAX_SNIPPET_NAME_LEN: usize = 128;

/// 이름 필드에 나타나면 거부하는 구두점 패턴
const FORBIDDEN_TOKENS: &[&str] = &[";", "--", "/*", "*/"];

/// 이름 필드에 나타나면 거부하는 키워드 연속열.
/// 공백을 하나로 합치고 소문자로 바꾼 뒤 단어 단위로 비교합니다.
const FORBIDDEN_PHRASES: &[&[&str]] = &[
    &["drop", "table"],
    &["drop", "database"],
    &["delete", "from"],
    &["insert", "into"],
    &["truncate", "table"],
    &["alter", "table"],
    &["union", "select"],
    &["or", "1=1"],
];

/// 카테고리 이름을 검증하고 정규화합니다.
pub fn validate_category_name(raw: &str) -> Result<String, AppError> {
    validate_name("category_name", raw, MAX_CATEGORY_NAME_LEN)
}

/// 스니펫 이름을 검증하고 정규화합니다.
pub fn validate_snippet_name(raw: &str) -> Result<String, AppError> {
    validate_name("snippet_name", raw, MAX_SNIPPET_NAME_LEN)
}

/// 스니펫 본문을 검증합니다.
///
/// 본문은 타이핑 연습 대상 그대로 저장해야 하므로 trim하지 않습니다.
pub fn validate_content(content: &str) -> Result<(), AppError> {
    if content.trim().is_empty() {
        return Err(AppError::validation("content", "content must not be blank"));
    }
    if !content.is_ascii() {
        return Err(AppError::validation(
            "content",
            "content must contain ASCII characters only",
        ));
    }
    Ok(())
}

fn validate_name(field: &'static str, raw: &str, max_len: usize) -> Result<String, AppError> {
    let name = raw.trim();

    if name.is_empty() {
        return Err(AppError::validation(field, "name must not be blank"));
    }
    if !name.is_ascii() {
        return Err(AppError::validation(
            field,
            "name must contain ASCII characters only",
        ));
    }
    // ASCII가 보장되었으므로 바이트 길이 == 문자 수
    if name.len() > max_len {
        return Err(AppError::validation(
            field,
            format!("name must be at most {} characters", max_len),
        ));
    }
    if looks_like_sql(name) {
        return Err(AppError::validation(
            field,
            "name contains a forbidden SQL-like pattern",
        ));
    }

    Ok(name.to_string())
}

/// 이름에 SQL 문장 조각처럼 보이는 패턴이 있는지 검사합니다.
fn looks_like_sql(name: &str) -> bool {
    if FORBIDDEN_TOKENS.iter().any(|token| name.contains(token)) {
        return true;
    }

    let lowered = name.to_ascii_lowercase();
    let words: Vec<&str> = lowered.split_whitespace().collect();

    let has_phrase = FORBIDDEN_PHRASES.iter().any(|phrase| {
        words.windows(phrase.len()).any(|window| {
            window
                .iter()
                .zip(phrase.iter())
                .all(|(word, keyword)| word == keyword)
        })
    });
    if has_phrase {
        return true;
    }

    // "select ... from", "update ... set" 처럼 사이에 다른 단어가 끼는 형태
    // 앞 키워드는 처음 위치, 뒤 키워드는 마지막 위치로 비교합니다.
    let first_at = |keyword: &str| words.iter().position(|w| *w == keyword);
    let last_at = |keyword: &str| words.iter().rposition(|w| *w == keyword);
    let ordered = |first: &str, second: &str| match (first_at(first), last_at(second)) {
        (Some(a), Some(b)) => a < b,
        _ => false,
    };
    ordered("select", "from") || ordered("update", "set")
}
