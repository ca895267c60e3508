use axum::http::HeaderMap;

pub const UNKNOWN_CLIENT: &str = "unknown";

// Rate limiter partition key: first x-forwarded-for entry, then x-real-ip, then "unknown".
// Entries are used as sent, an empty one falls through to the next source.
pub fn client_identifier(headers: &HeaderMap) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .filter(|first| !first.is_empty());

    if let Some(first) = forwarded {
        return first.to_string();
    }

    headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .filter(|ip| !ip.is_empty())
        .unwrap_or(UNKNOWN_CLIENT)
        .to_string()
}
