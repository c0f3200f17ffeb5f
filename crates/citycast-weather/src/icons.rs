//! Condition icon URLs: {base}/{icon_id}.png and {base}/{icon_id}@2x.png

pub const DEFAULT_ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconSet {
    base_url: String,
}

impl IconSet {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Standard-size icon, used in forecast rows.
    pub fn small(&self, icon_id: &str) -> String {
        format!("{}/{}.png", self.base_url, icon_id)
    }

    /// Double-size icon, used for current conditions.
    pub fn large(&self, icon_id: &str) -> String {
        format!("{}/{}@2x.png", self.base_url, icon_id)
    }
}

impl Default for IconSet {
    fn default() -> Self {
        Self::new(DEFAULT_ICON_BASE_URL)
    }
}
