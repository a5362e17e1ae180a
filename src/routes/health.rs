//! # 헬스체크(Health Check) 핸들러
//!
//! - `GET /api/v1/health` → `{ "status": "ok" }`

use axum::Json;
use serde_json::{json, Value};

/// `GET /health` — 서버 상태를 확인합니다. 실패하지 않습니다.
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok"
    }))
}
