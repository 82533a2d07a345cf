use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appendix {
    pub id: i64,
    pub report_id: i64,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendixInput {
    pub id: Option<i64>,
    pub content: Option<String>,
}

impl AppendixInput {
    pub fn content(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }
}
