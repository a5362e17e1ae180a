//! # 본문 분할(Chunking) 서비스
//!
//! 길이에 제한이 없는 스니펫 본문을 최대 `CHUNK_SIZE`자 단위의 조각(part)으로
//! 나눕니다. 조각을 순서대로 이어 붙이면 원래 본문과 정확히 같아야 합니다.
//!
//! ```text
//! 2500자 본문 → [1000자, 1000자, 500자]
//! 2000자 본문 → [1000자, 1000자]      (빈 세 번째 조각 없음)
//!    0자 본문 → []                     (조각 없음)
//! ```
//!
//! 이 모듈은 순수 함수만 가집니다. DB에 조각을 저장/조회하는 쪽은 `db::parts`입니다.

/// 조각 하나의 최대 길이 (문자 수)
pub const CHUNK_SIZE: usize = 1000;

/// 첫 번째 조각의 part_number. 이후 조각은 1씩 증가합니다.
pub const FIRST_PART_NUMBER: i64 = 1;

/// 본문을 `CHUNK_SIZE`자 단위로 나눕니다.
///
/// 길이는 바이트가 아니라 문자(char) 단위로 셉니다.
/// 멀티바이트 문자가 섞여 있어도 문자 경계에서만 자르므로 패닉하지 않습니다.
pub fn split_content(content: &str) -> Vec<&str> {
    let mut chunks = Vec::with_capacity(content.len() / CHUNK_SIZE + 1);
    let mut rest = content;

    while !rest.is_empty() {
        // CHUNK_SIZE번째 문자의 바이트 위치. 남은 문자가 부족하면 끝까지.
        let cut = rest
            .char_indices()
            .nth(CHUNK_SIZE)
            .map(|(idx, _)| idx)
            .unwrap_or(rest.len());
        let (head, tail) = rest.split_at(cut);
        chunks.push(head);
        rest = tail;
    }

    chunks
}

/// 분할 결과에 part_number를 붙여 돌려줍니다.
pub fn numbered_parts(content: &str) -> impl Iterator<Item = (i64, &str)> {
    split_content(content)
        .into_iter()
        .zip(FIRST_PART_NUMBER..)
        .map(|(chunk, number)| (number, chunk))
}
