use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl ModelInfo {
    /// Human-readable name, falling back to the identifier.
    pub fn label(&self) -> &str {
        if self.display_name.trim().is_empty() {
            &self.id
        } else {
            &self.display_name
        }
    }
}

/// Model listings arrive either wrapped in `data` or as a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ModelsPayload {
    Wrapped { data: Vec<ModelInfo> },
    Bare(Vec<ModelInfo>),
}

impl ModelsPayload {
    pub fn into_models(self) -> Vec<ModelInfo> {
        match self {
            ModelsPayload::Wrapped { data } => data,
            ModelsPayload::Bare(models) => models,
        }
    }
}
