//! Collector endpoint configuration.
//!
//! Beacons are posted to a per-application path under the collector base
//! URL. The same prefix with `/enabled` answers whether the application is
//! still allowed to report.

/// Collector used when none is configured
pub const DEFAULT_COLLECTOR_URL: &str = "https://iot-col.eum-appdynamics.com";

/// Path between the collector base URL and the application key
pub const APPLICATION_PATH: &str = "eumcollector/iot/v1/application/";

/// Suffix for beacon submission
pub const BEACONS_SUFFIX: &str = "/beacons";

/// Suffix for application status checks
pub const ENABLED_SUFFIX: &str = "/enabled";

/// Resolved collector URLs for one application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectorEndpoints {
    base: String,
    beacons: String,
    enabled: String,
}

impl CollectorEndpoints {
    /// Build endpoints from an optional base URL and an application key
    ///
    /// A missing or empty base URL resolves to [`DEFAULT_COLLECTOR_URL`].
    pub fn new(base_url: Option<&str>, app_key: &str) -> Self {
        let base_url = base_url
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_COLLECTOR_URL);
        let base = normalize_base_url(base_url);
        let application = format!("{}{}{}", base, APPLICATION_PATH, app_key);
        Self {
            beacons: format!("{}{}", application, BEACONS_SUFFIX),
            enabled: format!("{}{}", application, ENABLED_SUFFIX),
            base,
        }
    }

    /// Collector base URL, always ending in `/`
    #[inline]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// URL beacons are posted to
    #[inline]
    pub fn beacons(&self) -> &str {
        &self.beacons
    }

    /// URL queried for application status
    #[inline]
    pub fn enabled(&self) -> &str {
        &self.enabled
    }
}

/// Append a trailing `/` when missing
pub fn normalize_base_url(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{}/", url)
    }
}
