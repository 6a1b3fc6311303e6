use std::num::NonZeroU32;

use heck::ToShoutySnakeCase as _;

macro_rules! choice {
    ($(#[$meta:meta])* $ident:ident ($what:literal) {
        $($variant:ident: $wire:literal => $label:literal)*
    }) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $ident {
            $(
                #[serde(rename = $wire)]
                $variant,
            )*
        }

        impl $ident {
            pub const ALL: &'static [Self] = &[$(Self::$variant),*];

            /// the name used on the wire
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)*
                }
            }

            /// the name shown to a person
            pub const fn label(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)*
                }
            }

            pub fn choices() -> String {
                Self::ALL
                    .iter()
                    .map(Self::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        }

        impl std::fmt::Display for $ident {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $ident {
            type Err = anyhow::Error;
            fn from_str(input: &str) -> anyhow::Result<Self> {
                let key = input.trim().to_shouty_snake_case();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|c| c.as_str() == key || c.label().to_shouty_snake_case() == key)
                    .ok_or_else(|| {
                        anyhow::anyhow!(
                            "unknown {}: '{}' (expected one of {})",
                            $what,
                            input.trim(),
                            Self::choices()
                        )
                    })
            }
        }
    };
}

choice! {
    /// The shape of the test case
    DataType ("data type") {
        Array:  "ARRAY"  => "Array"
        String: "STRING" => "String"
        Matrix: "MATRIX" => "Matrix"
        Tree:   "TREE"   => "Tree"
    }
}

choice! {
    /// What an array is made of
    ElementType ("element type") {
        Number:    "NUMBER"    => "Numbers"
        Character: "CHARACTER" => "Characters"
        String:    "STRING"    => "Strings"
    }
}

choice! {
    CaseType ("case type") {
        Lower: "LOWER" => "Lowercase"
        Upper: "UPPER" => "Uppercase"
        Mixed: "MIXED" => "Mixed Case"
    }
}

choice! {
    /// How the server should format the generated test case
    OutputFormat ("output format") {
        Json:      "JSON"       => "JSON"
        Csv:       "CSV"        => "CSV"
        PlainText: "PLAIN_TEXT" => "Plain Text"
    }
}

impl OutputFormat {
    pub fn extension(&self) -> String {
        self.as_str().to_ascii_lowercase()
    }

    /// The default name for an exported result, e.g. `testcase.csv`
    pub fn file_name(&self) -> String {
        format!("testcase.{}", self.extension())
    }
}

/// The body of `POST /api/v1/generate`.
///
/// Fields that do not apply to the selected data type are `None` and are left
/// out of the serialized payload. Use [`RequestBuilder::snapshot`] to build one.
///
/// [`RequestBuilder::snapshot`]: crate::form::RequestBuilder::snapshot
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub data_type: DataType,
    pub size: NonZeroU32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_duplicates: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_sorted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<NonZeroU32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<NonZeroU32>,

    pub output_format: OutputFormat,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_type: Option<ElementType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_length: Option<NonZeroU32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_type: Option<CaseType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_special_chars: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_spaces: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_numbers: Option<bool>,
}
