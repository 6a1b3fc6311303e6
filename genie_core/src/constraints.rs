use serde::Deserialize as _;

use crate::request::{DataType, OutputFormat};

type Extra = serde_json::Map<String, serde_json::Value>;

/// Metadata from `GET /api/v1/constraints`.
///
/// The server makes no promises about this shape, so everything is optional
/// and unknown keys are carried along in `extra`.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Constraints {
    #[serde(deserialize_with = "lenient")]
    pub data_types: Vec<String>,
    #[serde(deserialize_with = "lenient")]
    pub output_formats: Vec<String>,
    #[serde(deserialize_with = "lenient")]
    pub defaults: Defaults,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Constraints {
    /// An empty list from the server means it did not say, so everything is allowed
    pub fn supports_data_type(&self, data_type: DataType) -> bool {
        self.data_types.is_empty() || self.data_types.iter().any(|c| c == data_type.as_str())
    }

    pub fn supports_output_format(&self, format: OutputFormat) -> bool {
        self.output_formats.is_empty() || self.output_formats.iter().any(|c| c == format.as_str())
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Defaults {
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub array: Option<ArrayDefaults>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub string: Option<StringDefaults>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub matrix: Option<MatrixDefaults>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArrayDefaults {
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub min_value: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub max_value: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub allow_duplicates: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub is_sorted: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StringDefaults {
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub charset: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatrixDefaults {
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub rows: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub columns: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub min_value: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub max_value: Option<i32>,
}

/// A value that is `null` or the wrong shape reads as its default, so one odd
/// field does not throw away the rest of the document
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::de::DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_else(|err| {
        log::debug!("ignoring a constraints value: {err}");
        T::default()
    }))
}
