//! # 타이핑 연습 세션 모델
//!
//! 사용자가 스니펫의 일부 구간을 한 번 타이핑한 기록입니다.
//!
//! ## 세션 흐름
//! 1. 클라이언트가 `GET /snippets/{id}/next-index`로 이어서 칠 위치를 받음
//! 2. 연습을 마치면 `CreateSessionRequest`로 원시 카운터를 전송
//! 3. 서버는 `TypingSession::new`에서 한 번만 검증하고 저장
//! 4. 조회할 때마다 `SessionMetrics`(WPM, 정확도 등)를 다시 계산
//!
//! `TypingSession`의 필드는 비공개입니다. 생성자를 거치지 않고는 만들 수 없으므로,
//! 일단 만들어진 세션은 항상 불변식을 만족합니다:
//! - `snippet_index_start >= 0`, `snippet_index_end > snippet_index_start`
//! - `end_time >= start_time`
//! - `actual_chars >= 0`, `errors >= 0`
//! - `actual_chars > 0`이면 `content`가 비어 있지 않음

use crate::error::AppError;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// 검증을 통과한 타이핑 세션
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypingSession {
    session_id: String,
    snippet_id: String,
    snippet_index_start: i64,
    snippet_index_end: i64,
    content: String,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    actual_chars: i64,
    errors: i64,
}

/// 세션 기록 요청 — `POST /api/v1/snippets/{id}/sessions`의 요청 본문
///
/// 스니펫 ID는 URL 경로에서 가져옵니다.
/// 시각은 RFC 3339 문자열입니다 (예: "2026-03-01T12:00:00Z").
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSessionRequest {
    pub snippet_index_start: i64,
    pub snippet_index_end: i64,
    #[serde(default)]
    pub content: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub actual_chars: i64,
    pub errors: i64,
}

/// `practice_sessions` 테이블 한 행
///
/// 시각은 TEXT 컬럼이므로 문자열로 읽은 뒤 `TryFrom`에서 파싱합니다.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SessionRow {
    pub session_id: String,
    pub snippet_id: String,
    pub snippet_index_start: i64,
    pub snippet_index_end: i64,
    pub content: String,
    pub start_time: String,
    pub end_time: String,
    pub actual_chars: i64,
    pub errors: i64,
}

/// 세션 하나에서 계산한 파생 지표. 저장하지 않고 응답 때마다 계산합니다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SessionMetrics {
    pub expected_chars: i64,
    /// 초 단위
    pub total_time: f64,
    pub efficiency: f64,
    pub correctness: f64,
    pub accuracy: f64,
    pub session_cpm: f64,
    pub session_wpm: f64,
    pub ms_per_keystroke: f64,
}

/// API 응답용: 세션 원시 필드 + 파생 지표
#[derive(Debug, Clone, Serialize)]
pub struct SessionWithMetrics {
    #[serde(flatten)]
    pub session: TypingSession,
    pub metrics: SessionMetrics,
}

/// 스니펫 하나에 대한 세션 통계 요약
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnippetStats {
    pub snippet_id: String,
    pub session_count: usize,
    pub average_wpm: f64,
    pub average_cpm: f64,
    pub average_accuracy: f64,
    pub average_efficiency: f64,
}

/// 다음 연습 시작 위치 응답
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NextIndex {
    pub snippet_id: String,
    pub next_index: i64,
    pub content_length: i64,
}

impl TypingSession {
    /// 원시 값으로 세션을 만들고, 규칙을 어긴 첫 번째 필드를 에러로 보고합니다.
    ///
    /// 시각은 저장 형식과 같은 밀리초 정밀도로 잘라 둡니다.
    /// 그래야 생성 직후와 다시 읽은 뒤의 지표가 같습니다.
    pub fn new(
        session_id: String,
        snippet_id: String,
        req: CreateSessionRequest,
    ) -> Result<Self, AppError> {
        let start_time = req.start_time.trunc_subsecs(3);
        let end_time = req.end_time.trunc_subsecs(3);

        if req.snippet_index_start < 0 {
            return Err(AppError::validation(
                "snippet_index_start",
                "snippet_index_start must be >= 0",
            ));
        }
        if req.snippet_index_end <= req.snippet_index_start {
            return Err(AppError::validation(
                "snippet_index_end",
                "snippet_index_end must be greater than snippet_index_start",
            ));
        }
        if end_time < start_time {
            return Err(AppError::validation(
                "end_time",
                "end_time must not be before start_time",
            ));
        }
        if req.actual_chars < 0 {
            return Err(AppError::validation(
                "actual_chars",
                "actual_chars must be >= 0",
            ));
        }
        if req.errors < 0 {
            return Err(AppError::validation("errors", "errors must be >= 0"));
        }
        if req.actual_chars > 0 && req.content.is_empty() {
            return Err(AppError::validation(
                "content",
                "content is required when characters were typed",
            ));
        }

        Ok(Self {
            session_id,
            snippet_id,
            snippet_index_start: req.snippet_index_start,
            snippet_index_end: req.snippet_index_end,
            content: req.content,
            start_time,
            end_time,
            actual_chars: req.actual_chars,
            errors: req.errors,
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn snippet_id(&self) -> &str {
        &self.snippet_id
    }

    pub fn snippet_index_start(&self) -> i64 {
        self.snippet_index_start
    }

    pub fn snippet_index_end(&self) -> i64 {
        self.snippet_index_end
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    pub fn actual_chars(&self) -> i64 {
        self.actual_chars
    }

    pub fn errors(&self) -> i64 {
        self.errors
    }

    /// DB 저장용 시각 문자열. 밀리초 고정 형식이라 문자열 정렬이 시간 정렬과 같습니다.
    pub fn start_time_text(&self) -> String {
        self.start_time.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn end_time_text(&self) -> String {
        self.end_time.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// DB 행 → 세션. 저장된 값도 생성자와 같은 규칙으로 다시 검증합니다.
impl TryFrom<SessionRow> for TypingSession {
    type Error = AppError;

    fn try_from(row: SessionRow) -> Result<Self, Self::Error> {
        let parse = |field: &str, text: &str| {
            DateTime::parse_from_rfc3339(text)
                .map(|t| t.with_timezone(&Utc))
                .map_err(|e| {
                    AppError::Internal(format!(
                        "session {} has unreadable {}: {}",
                        row.session_id, field, e
                    ))
                })
        };
        let start_time = parse("start_time", &row.start_time)?;
        let end_time = parse("end_time", &row.end_time)?;

        TypingSession::new(
            row.session_id,
            row.snippet_id,
            CreateSessionRequest {
                snippet_index_start: row.snippet_index_start,
                snippet_index_end: row.snippet_index_end,
                content: row.content,
                start_time,
                end_time,
                actual_chars: row.actual_chars,
                errors: row.errors,
            },
        )
    }
}
