/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// 当前 UTC 时间，ISO-8601 (RFC 3339) 字符串
pub fn now_iso8601() -> String {
    chrono::Utc::now().to_rfc3339()
}
