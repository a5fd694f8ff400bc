//! Runtime switches, read from the environment.

use log::LevelFilter;
use std::sync::OnceLock;

/// Maximum log level, from `POSIXGLUE_LOG`. Defaults to `warn`.
pub fn log_level() -> LevelFilter {
    std::env::var("POSIXGLUE_LOG")
        .ok()
        .and_then(|x| x.parse().ok())
        .unwrap_or(LevelFilter::Warn)
}

/// Feature names forced unavailable, from the comma-separated `POSIXGLUE_DISABLE`.
pub fn disabled_features() -> Vec<String> {
    std::env::var("POSIXGLUE_DISABLE")
        .map(|x| {
            x.split(',')
                .map(str::trim)
                .filter(|x| !x.is_empty())
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

static STRICT: OnceLock<bool> = OnceLock::new();

/// Whether calling an unsupported wrapper aborts the process instead of returning an error.
///
/// `POSIXGLUE_STRICT` is read on the first call only.
pub fn strict_unsupported() -> bool {
    *STRICT.get_or_init(|| strict_flag(std::env::var("POSIXGLUE_STRICT").ok().as_deref()))
}

fn strict_flag(value: Option<&str>) -> bool {
    matches!(value, Some("1"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_switch() {
        assert!(strict_flag(Some("1")));
        assert!(!strict_flag(Some("yes")));
        assert!(!strict_flag(None));

        let first = strict_unsupported();
        assert_eq!(STRICT.get(), Some(&first));
        assert_eq!(strict_unsupported(), first);
    }
}
