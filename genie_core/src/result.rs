use std::borrow::Cow;

/// What `POST /api/v1/generate` sent back
#[derive(Clone, Debug, PartialEq)]
pub enum GenerationResult {
    Text(String),
    Json(serde_json::Value),
}

impl GenerationResult {
    /// Bodies that parse as JSON are kept structured, except for a bare JSON
    /// string which is unwrapped into text.
    pub fn from_body(body: String) -> Self {
        match serde_json::from_str(&body) {
            Ok(serde_json::Value::String(text)) => Self::Text(text),
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(body),
        }
    }

    /// Text verbatim, JSON pretty printed
    pub fn display(&self) -> Cow<'_, str> {
        match self {
            Self::Text(text) => Cow::from(text.as_str()),
            Self::Json(value) => Cow::from(format!("{value:#}")),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::Json(value) => value.is_null(),
        }
    }
}

impl std::fmt::Display for GenerationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}
