//! Shared User-Agent string for every extractor request.

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/fierce/bible-extractor";

/// User-Agent sent by all extractors (no per-site name in the header).
#[must_use]
pub(crate) fn default_extractor_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("bible-extractor/{version} (scripture-research-tool; +{PROJECT_UA_URL})")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_carries_version_and_project_url() {
        let ua = default_extractor_user_agent();
        assert!(ua.contains(PROJECT_UA_URL), "UA must contain project URL: {ua}");
        assert_eq!(
            env!("CARGO_PKG_VERSION"),
            ua.strip_prefix("bible-extractor/")
                .and_then(|s| s.split(' ').next())
                .unwrap(),
            "UA must contain crate version"
        );
    }
}
