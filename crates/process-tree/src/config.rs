use serde::{Deserialize, Serialize};

/// Row sizing used by [`process_height`](crate::process_height), in pixels.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct TreeConfig {
    pub node_base_height: u32,
    pub alert_detail_height: u32,
    pub alert_detail_padding: u32,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            node_base_height: 24,
            alert_detail_height: 32,
            alert_detail_padding: 8,
        }
    }
}
