//! User-agent heuristic for automated traffic.

/// Case-insensitive fragments that mark a user agent as automated.
const AUTOMATION_MARKERS: &[&str] = &[
    "bot",
    "crawler",
    "spider",
    "scrapy",
    "curl",
    "wget",
    "python-requests",
    "httpclient",
    "headless",
];

/// Flags requests that look automated.
///
/// An explicitly empty user agent is suspicious; a missing one (no header
/// forwarded at all) is not, since internal callers often omit it.
#[derive(Debug, Clone, Default)]
pub struct BotDetector;

impl BotDetector {
    pub fn new() -> Self {
        Self
    }

    pub fn is_suspected(&self, user_agent: Option<&str>) -> bool {
        let Some(agent) = user_agent else {
            return false;
        };
        let agent = agent.trim();
        if agent.is_empty() {
            return true;
        }
        let agent = agent.to_ascii_lowercase();
        AUTOMATION_MARKERS.iter().any(|marker| agent.contains(marker))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn browser_agents_pass() {
        let detector = BotDetector::new();
        assert!(!detector.is_suspected(Some(
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_0) AppleWebKit/605.1.15 Safari/605.1.15"
        )));
    }

    #[test]
    fn tooling_agents_are_flagged() {
        let detector = BotDetector::new();
        for agent in ["curl/8.4.0", "Wget/1.21", "python-requests/2.31", "Googlebot/2.1", "HeadlessChrome/119"] {
            assert!(detector.is_suspected(Some(agent)), "{} should be flagged", agent);
        }
    }

    #[test]
    fn empty_agent_is_flagged_but_missing_is_not() {
        let detector = BotDetector::new();
        assert!(detector.is_suspected(Some("  ")));
        assert!(!detector.is_suspected(None));
    }
}
