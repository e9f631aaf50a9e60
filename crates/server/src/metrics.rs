use axum::http::StatusCode;
use once_cell::sync::Lazy;
use prometheus::{register_int_counter, register_int_gauge, Encoder, IntCounter, IntGauge, TextEncoder};

// Prometheus metrics (default registry)
pub static USERS_CREATED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("presence_users_created_total", "Total user records created")
        .expect("register users_created_total")
});

pub static USERS_UPDATED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "presence_users_updated_total",
        "Total user record updates, toggles included"
    )
    .expect("register users_updated_total")
});

pub static USERS_DELETED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("presence_users_deleted_total", "Total user records deleted")
        .expect("register users_deleted_total")
});

pub static USERS_LIVE: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!("presence_users_live", "User records currently in the store")
        .expect("register users_live")
});

pub async fn metrics_handler() -> (StatusCode, String) {
    encode_metrics()
}

pub fn encode_metrics() -> (StatusCode, String) {
    // touch the statics so the families show up before the first write
    Lazy::force(&USERS_CREATED_TOTAL);
    Lazy::force(&USERS_UPDATED_TOTAL);
    Lazy::force(&USERS_DELETED_TOTAL);
    Lazy::force(&USERS_LIVE);

    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (StatusCode::INTERNAL_SERVER_ERROR, format!("metrics encode error: {e}"));
    }
    (StatusCode::OK, String::from_utf8(buffer).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exposition_lists_presence_families() {
        let (status, body) = encode_metrics();
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("presence_users_created_total"));
        assert!(body.contains("presence_users_live"));
    }
}
