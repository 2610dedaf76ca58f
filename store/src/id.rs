use chrono::DateTime;
use chrono::Utc;

/// Timestamp id (`YYYYMMDDhhmmss.nnnnnnnnn`), suffixed with `-N` while
/// `taken` reports a clash.
pub(crate) fn next_id(now: DateTime<Utc>, taken: impl Fn(&str) -> bool) -> String {
    let base = now.format("%Y%m%d%H%M%S%.9f").to_string();
    if !taken(&base) {
        return base;
    }
    let mut n: u64 = 1;
    loop {
        let candidate = format!("{base}-{n}");
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}
