use std::time::{SystemTime, UNIX_EPOCH};

/// Append a `_uiForceReload` query parameter carrying the current epoch
/// millisecond count, defeating any cached copy of the resource. The URL is
/// not validated.
pub fn force_reload(url: &str) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}_uiForceReload={}", url, separator, epoch_millis())
}

fn epoch_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or(0)
}
