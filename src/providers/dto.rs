use serde::Deserialize;

const MAX_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct ProviderQuery {
    pub category: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}

impl ProviderQuery {
    /// Limit clamped to `1..=100`, offset to `>= 0`, category lower-cased.
    pub fn normalized(self) -> (Option<String>, i64, i64) {
        let category = self
            .category
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty());
        (category, self.limit.clamp(1, MAX_LIMIT), self.offset.max(0))
    }
}
