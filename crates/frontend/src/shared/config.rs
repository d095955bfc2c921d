/// Runtime settings for the match statistics pages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Prefix for `/api/...` requests, empty for same origin
    pub api_base: String,
    /// Route of the detail report, relative to the dashboard
    pub report_path: String,
    /// Window target used when opening the report
    pub report_target: String,
    /// How many validation errors / preview rows are displayed
    pub display_cap: usize,
}

/// `<meta name="match-stats-api-base" content="...">` overrides the API origin
const API_BASE_META: &str = "meta[name=\"match-stats-api-base\"]";

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            report_path: "report".to_string(),
            report_target: "_blank".to_string(),
            display_cap: 10,
        }
    }
}

impl DashboardConfig {
    /// Defaults, with the API origin taken from the page's meta tag if present
    pub fn from_window() -> Self {
        let mut config = Self::default();
        if let Some(base) = read_api_base_meta() {
            config.api_base = base;
        }
        config
    }
}

fn read_api_base_meta() -> Option<String> {
    let document = web_sys::window()?.document()?;
    let meta = document.query_selector(API_BASE_META).ok()??;
    meta.get_attribute("content")
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
}
