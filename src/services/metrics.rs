//! # 타이핑 지표 계산 서비스
//!
//! 검증된 `TypingSession`의 원시 카운터에서 파생 지표를 계산합니다.
//! 모든 함수는 부수효과가 없고, 어떤 유효한 세션에 대해서도 실패하지 않습니다.
//!
//! | 지표 | 공식 | 0 처리 |
//! |------|------|--------|
//! | expected_chars | end - start | 생성자에서 >= 1 보장 |
//! | total_time | end_time - start_time (초) | 0일 수 있음 |
//! | efficiency | min(1, actual / expected) | |
//! | correctness | max(0, (actual - errors) / actual) | actual == 0 → 0 |
//! | accuracy | max(0, (actual - errors) / expected) | |
//! | session_cpm | actual * 60 / total_time | total_time == 0 → 0 |
//! | session_wpm | (actual / 5) * 60 / total_time | total_time == 0 → 0 |
//! | ms_per_keystroke | total_time * 1000 / expected | 분모 0 → 0 |

use crate::models::{SessionMetrics, SnippetStats, TypingSession};

/// WPM 계산에서 단어 하나로 치는 문자 수
pub const CHARS_PER_WORD: f64 = 5.0;

pub fn expected_chars(session: &TypingSession) -> i64 {
    session.snippet_index_end() - session.snippet_index_start()
}

/// 세션 길이(초). 밀리초 정밀도입니다.
pub fn total_time(session: &TypingSession) -> f64 {
    let elapsed = session.end_time() - session.start_time();
    elapsed.num_milliseconds() as f64 / 1000.0
}

pub fn efficiency(session: &TypingSession) -> f64 {
    let expected = expected_chars(session);
    if expected <= 0 {
        return 0.0;
    }
    (session.actual_chars() as f64 / expected as f64).min(1.0)
}

pub fn correctness(session: &TypingSession) -> f64 {
    let actual = session.actual_chars();
    if actual == 0 {
        return 0.0;
    }
    ((actual - session.errors()) as f64 / actual as f64).max(0.0)
}

pub fn accuracy(session: &TypingSession) -> f64 {
    let expected = expected_chars(session);
    if expected <= 0 {
        return 0.0;
    }
    ((session.actual_chars() - session.errors()) as f64 / expected as f64).max(0.0)
}

/// 분당 타자 수 (characters per minute)
pub fn session_cpm(session: &TypingSession) -> f64 {
    let seconds = total_time(session);
    if seconds == 0.0 {
        return 0.0;
    }
    session.actual_chars() as f64 * 60.0 / seconds
}

/// 분당 단어 수 (5자 = 1단어)
pub fn session_wpm(session: &TypingSession) -> f64 {
    let seconds = total_time(session);
    if seconds == 0.0 {
        return 0.0;
    }
    (session.actual_chars() as f64 / CHARS_PER_WORD) * 60.0 / seconds
}

pub fn ms_per_keystroke(session: &TypingSession) -> f64 {
    let expected = expected_chars(session);
    let seconds = total_time(session);
    if expected == 0 || seconds == 0.0 {
        return 0.0;
    }
    seconds * 1000.0 / expected as f64
}

/// 모든 지표를 한 번에 계산합니다.
pub fn compute(session: &TypingSession) -> SessionMetrics {
    SessionMetrics {
        expected_chars: expected_chars(session),
        total_time: total_time(session),
        efficiency: efficiency(session),
        correctness: correctness(session),
        accuracy: accuracy(session),
        session_cpm: session_cpm(session),
        session_wpm: session_wpm(session),
        ms_per_keystroke: ms_per_keystroke(session),
    }
}

/// 스니펫의 모든 세션에 대한 평균 지표. 세션이 없으면 모두 0입니다.
pub fn summarize(snippet_id: &str, sessions: &[TypingSession]) -> SnippetStats {
    let count = sessions.len();
    let average = |metric: fn(&TypingSession) -> f64| {
        if count == 0 {
            0.0
        } else {
            sessions.iter().map(metric).sum::<f64>() / count as f64
        }
    };

    SnippetStats {
        snippet_id: snippet_id.to_string(),
        session_count: count,
        average_wpm: average(session_wpm),
        average_cpm: average(session_cpm),
        average_accuracy: average(accuracy),
        average_efficiency: average(efficiency),
    }
}
