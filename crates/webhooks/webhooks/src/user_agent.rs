//! Best-effort device and browser inference from a raw user-agent string.
//!
//! Structured payload fields always take precedence; this only fills gaps
//! and never fails.

/// Device and browser guessed from a user agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// `"mobile"` or `"desktop"`.
    pub device_type: &'static str,
    pub browser_name: Option<&'static str>,
}

// Order matters: Edge and Opera also carry "Chrome", Chrome also carries "Safari".
const BROWSER_TOKENS: &[(&str, &str)] = &[
    ("Edg", "Edge"),
    ("OPR", "Opera"),
    ("Opera", "Opera"),
    ("Firefox", "Firefox"),
    ("FxiOS", "Firefox"),
    ("CriOS", "Chrome"),
    ("Chrome", "Chrome"),
    ("Safari", "Safari"),
    ("Trident", "Internet Explorer"),
    ("MSIE", "Internet Explorer"),
];

/// Classifies a user-agent string.
pub fn classify(user_agent: &str) -> DeviceInfo {
    let device_type = if user_agent.contains("Mobile") {
        "mobile"
    } else {
        "desktop"
    };
    let browser_name = BROWSER_TOKENS
        .iter()
        .find(|(token, _)| user_agent.contains(token))
        .map(|(_, name)| *name);

    DeviceInfo {
        device_type,
        browser_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desktop_chrome() {
        let ua = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";
        let info = classify(ua);
        assert_eq!(info.device_type, "desktop");
        assert_eq!(info.browser_name, Some("Chrome"));
    }

    #[test]
    fn test_mobile_safari() {
        let ua = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
        let info = classify(ua);
        assert_eq!(info.device_type, "mobile");
        assert_eq!(info.browser_name, Some("Safari"));
    }

    #[test]
    fn test_edge_before_chrome() {
        let ua = "Mozilla/5.0 AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36 Edg/120.0";
        assert_eq!(classify(ua).browser_name, Some("Edge"));
    }

    #[test]
    fn test_unknown_agent() {
        let info = classify("curl/8.4.0");
        assert_eq!(info.device_type, "desktop");
        assert_eq!(info.browser_name, None);
    }
}
