use std::num::NonZeroU32;

use anyhow::Context;

use crate::{
    constraints::Constraints,
    request::{CaseType, DataType, ElementType, GenerationRequest, OutputFormat},
};

/// A single input on the generation form
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    DataType,
    Size,
    ElementType,
    MinValue,
    MaxValue,
    StringLength,
    AllowDuplicates,
    IsSorted,
    Rows,
    Columns,
    CaseType,
    AllowNumbers,
    AllowSpecialChars,
    AllowSpaces,
    Charset,
    OutputFormat,
}

impl Field {
    /// Every field, in the order the form presents them
    pub const ALL: [Self; 16] = [
        Self::DataType,
        Self::Size,
        Self::ElementType,
        Self::MinValue,
        Self::MaxValue,
        Self::StringLength,
        Self::AllowDuplicates,
        Self::IsSorted,
        Self::Rows,
        Self::Columns,
        Self::CaseType,
        Self::AllowNumbers,
        Self::AllowSpecialChars,
        Self::AllowSpaces,
        Self::Charset,
        Self::OutputFormat,
    ];

    pub const fn wire_name(&self) -> &'static str {
        match self {
            Self::DataType => "dataType",
            Self::Size => "size",
            Self::ElementType => "elementType",
            Self::MinValue => "minValue",
            Self::MaxValue => "maxValue",
            Self::StringLength => "stringLength",
            Self::AllowDuplicates => "allowDuplicates",
            Self::IsSorted => "isSorted",
            Self::Rows => "rows",
            Self::Columns => "columns",
            Self::CaseType => "caseType",
            Self::AllowNumbers => "allowNumbers",
            Self::AllowSpecialChars => "allowSpecialChars",
            Self::AllowSpaces => "allowSpaces",
            Self::Charset => "charset",
            Self::OutputFormat => "outputFormat",
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::DataType => "Data Type",
            Self::Size => "Size/Length",
            Self::ElementType => "Element Type",
            Self::MinValue => "Min Value",
            Self::MaxValue => "Max Value",
            Self::StringLength => "String Length",
            Self::AllowDuplicates => "Allow Duplicates",
            Self::IsSorted => "Sorted",
            Self::Rows => "Rows",
            Self::Columns => "Columns",
            Self::CaseType => "Case Type",
            Self::AllowNumbers => "Include Numbers (0-9)",
            Self::AllowSpecialChars => "Include Special Characters (!@#$%^&* etc.)",
            Self::AllowSpaces => "Allow Spaces",
            Self::Charset => "Custom Charset (Optional)",
            Self::OutputFormat => "Output Format",
        }
    }

    /// The accepted values, for fields that are a choice
    pub fn choices(&self) -> Option<String> {
        let choices = match self {
            Self::DataType => DataType::choices(),
            Self::ElementType => ElementType::choices(),
            Self::CaseType => CaseType::choices(),
            Self::OutputFormat => OutputFormat::choices(),
            _ => return None,
        };
        Some(choices)
    }

    pub const fn is_flag(&self) -> bool {
        matches!(
            self,
            Self::AllowDuplicates
                | Self::IsSorted
                | Self::AllowNumbers
                | Self::AllowSpecialChars
                | Self::AllowSpaces
        )
    }

    /// Whether this field is exposed for the given selection
    pub fn applies_to(&self, data_type: DataType, element_type: ElementType) -> bool {
        let array = data_type == DataType::Array;
        let textual = data_type == DataType::String
            || (array && matches!(element_type, ElementType::Character | ElementType::String));

        match self {
            Self::DataType | Self::Size | Self::OutputFormat => true,
            Self::ElementType | Self::AllowDuplicates | Self::IsSorted => array,
            Self::MinValue | Self::MaxValue => {
                (array && element_type == ElementType::Number) || data_type == DataType::Matrix
            }
            Self::StringLength => array && element_type == ElementType::String,
            Self::Rows | Self::Columns => data_type == DataType::Matrix,
            Self::CaseType
            | Self::AllowNumbers
            | Self::AllowSpecialChars
            | Self::AllowSpaces
            | Self::Charset => textual,
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The applicable fields for a selection, in form order
pub fn fields_for(data_type: DataType, element_type: ElementType) -> Vec<Field> {
    Field::ALL
        .into_iter()
        .filter(|field| field.applies_to(data_type, element_type))
        .collect()
}

/// Mutable form state for one session.
///
/// Every field keeps a value even while it is hidden, so switching the data
/// type back and forth does not lose what was typed. Only [`Self::snapshot`]
/// decides what is sent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestBuilder {
    data_type: DataType,
    size: NonZeroU32,
    min_value: i32,
    max_value: i32,
    allow_duplicates: bool,
    is_sorted: bool,
    charset: Option<String>,
    rows: NonZeroU32,
    columns: NonZeroU32,
    output_format: OutputFormat,
    element_type: ElementType,
    string_length: NonZeroU32,
    case_type: CaseType,
    allow_special_chars: bool,
    allow_spaces: bool,
    allow_numbers: bool,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self {
            data_type: DataType::Array,
            size: nz(10),
            min_value: -100,
            max_value: 100,
            allow_duplicates: true,
            is_sorted: false,
            charset: None,
            rows: nz(3),
            columns: nz(3),
            output_format: OutputFormat::Json,
            element_type: ElementType::Number,
            string_length: nz(5),
            case_type: CaseType::Lower,
            allow_special_chars: false,
            allow_spaces: false,
            allow_numbers: false,
        }
    }
}

const fn nz(n: u32) -> NonZeroU32 {
    match NonZeroU32::new(n) {
        Some(n) => n,
        None => panic!("zero"),
    }
}

impl RequestBuilder {
    pub const fn data_type(&self) -> DataType {
        self.data_type
    }

    pub const fn element_type(&self) -> ElementType {
        self.element_type
    }

    pub const fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    pub fn charset(&self) -> Option<&str> {
        self.charset.as_deref()
    }

    pub fn set_data_type(&mut self, data_type: DataType) -> &mut Self {
        self.data_type = data_type;
        self
    }

    pub fn set_element_type(&mut self, element_type: ElementType) -> &mut Self {
        self.element_type = element_type;
        self
    }

    pub fn set_output_format(&mut self, output_format: OutputFormat) -> &mut Self {
        self.output_format = output_format;
        self
    }

    pub fn set_case_type(&mut self, case_type: CaseType) -> &mut Self {
        self.case_type = case_type;
        self
    }

    pub fn set_size(&mut self, size: NonZeroU32) -> &mut Self {
        self.size = size;
        self
    }

    pub fn set_rows(&mut self, rows: NonZeroU32) -> &mut Self {
        self.rows = rows;
        self
    }

    pub fn set_columns(&mut self, columns: NonZeroU32) -> &mut Self {
        self.columns = columns;
        self
    }

    pub fn set_string_length(&mut self, string_length: NonZeroU32) -> &mut Self {
        self.string_length = string_length;
        self
    }

    pub fn set_range(&mut self, min_value: i32, max_value: i32) -> &mut Self {
        self.min_value = min_value;
        self.max_value = max_value;
        self
    }

    pub fn set_min_value(&mut self, min_value: i32) -> &mut Self {
        self.min_value = min_value;
        self
    }

    pub fn set_max_value(&mut self, max_value: i32) -> &mut Self {
        self.max_value = max_value;
        self
    }

    /// An empty charset clears it, so the server falls back to its default
    pub fn set_charset(&mut self, charset: impl Into<String>) -> &mut Self {
        let charset = charset.into();
        self.charset = (!charset.is_empty()).then_some(charset);
        self
    }

    pub fn set_flag(&mut self, field: Field, value: bool) -> &mut Self {
        match field {
            Field::AllowDuplicates => self.allow_duplicates = value,
            Field::IsSorted => self.is_sorted = value,
            Field::AllowNumbers => self.allow_numbers = value,
            Field::AllowSpecialChars => self.allow_special_chars = value,
            Field::AllowSpaces => self.allow_spaces = value,
            field => log::warn!("{field:?} is not a flag"),
        }
        self
    }

    /// Overwrites one field from user input
    pub fn set(&mut self, field: Field, input: &str) -> anyhow::Result<()> {
        let trimmed = input.trim();
        match field {
            Field::Charset => {
                self.set_charset(input);
            }
            Field::DataType => self.data_type = trimmed.parse()?,
            Field::ElementType => self.element_type = trimmed.parse()?,
            Field::CaseType => self.case_type = trimmed.parse()?,
            Field::OutputFormat => self.output_format = trimmed.parse()?,
            Field::Size => self.size = parse_positive(field, trimmed)?,
            Field::Rows => self.rows = parse_positive(field, trimmed)?,
            Field::Columns => self.columns = parse_positive(field, trimmed)?,
            Field::StringLength => self.string_length = parse_positive(field, trimmed)?,
            Field::MinValue => self.min_value = parse_integer(field, trimmed)?,
            Field::MaxValue => self.max_value = parse_integer(field, trimmed)?,
            Field::AllowDuplicates
            | Field::IsSorted
            | Field::AllowNumbers
            | Field::AllowSpecialChars
            | Field::AllowSpaces => {
                let value = parse_flag(field, trimmed)?;
                self.set_flag(field, value);
            }
        }
        Ok(())
    }

    /// The current value of a field, as the form shows it
    pub fn value(&self, field: Field) -> String {
        match field {
            Field::DataType => self.data_type.to_string(),
            Field::Size => self.size.to_string(),
            Field::ElementType => self.element_type.to_string(),
            Field::MinValue => self.min_value.to_string(),
            Field::MaxValue => self.max_value.to_string(),
            Field::StringLength => self.string_length.to_string(),
            Field::AllowDuplicates => yes_no(self.allow_duplicates),
            Field::IsSorted => yes_no(self.is_sorted),
            Field::Rows => self.rows.to_string(),
            Field::Columns => self.columns.to_string(),
            Field::CaseType => self.case_type.to_string(),
            Field::AllowNumbers => yes_no(self.allow_numbers),
            Field::AllowSpecialChars => yes_no(self.allow_special_chars),
            Field::AllowSpaces => yes_no(self.allow_spaces),
            Field::Charset => self.charset.clone().unwrap_or_default(),
            Field::OutputFormat => self.output_format.to_string(),
        }
    }

    /// The fields the current selection exposes
    pub fn fields(&self) -> Vec<Field> {
        fields_for(self.data_type, self.element_type)
    }

    pub fn is_applicable(&self, field: Field) -> bool {
        field.applies_to(self.data_type, self.element_type)
    }

    /// The request to send: exactly the applicable fields, nothing else
    pub fn snapshot(&self) -> GenerationRequest {
        let on = |field: Field| self.is_applicable(field);

        GenerationRequest {
            data_type: self.data_type,
            size: self.size,
            min_value: on(Field::MinValue).then_some(self.min_value),
            max_value: on(Field::MaxValue).then_some(self.max_value),
            allow_duplicates: on(Field::AllowDuplicates).then_some(self.allow_duplicates),
            is_sorted: on(Field::IsSorted).then_some(self.is_sorted),
            charset: self.charset.clone().filter(|_| on(Field::Charset)),
            rows: on(Field::Rows).then_some(self.rows),
            columns: on(Field::Columns).then_some(self.columns),
            output_format: self.output_format,
            element_type: on(Field::ElementType).then_some(self.element_type),
            string_length: on(Field::StringLength).then_some(self.string_length),
            case_type: on(Field::CaseType).then_some(self.case_type),
            allow_special_chars: on(Field::AllowSpecialChars).then_some(self.allow_special_chars),
            allow_spaces: on(Field::AllowSpaces).then_some(self.allow_spaces),
            allow_numbers: on(Field::AllowNumbers).then_some(self.allow_numbers),
        }
    }

    /// Seeds the values for the current data type from the server's defaults
    pub fn apply_constraints(&mut self, constraints: &Constraints) -> &mut Self {
        let defaults = &constraints.defaults;
        match self.data_type {
            DataType::Array => {
                if let Some(array) = &defaults.array {
                    apply(&mut self.size, array.size.and_then(NonZeroU32::new));
                    apply(&mut self.min_value, array.min_value);
                    apply(&mut self.max_value, array.max_value);
                    apply(&mut self.allow_duplicates, array.allow_duplicates);
                    apply(&mut self.is_sorted, array.is_sorted);
                }
            }
            DataType::String => {
                if let Some(string) = &defaults.string {
                    apply(&mut self.size, string.length.and_then(NonZeroU32::new));
                    if let Some(charset) = &string.charset {
                        self.set_charset(charset.as_str());
                    }
                }
            }
            DataType::Matrix => {
                if let Some(matrix) = &defaults.matrix {
                    apply(&mut self.rows, matrix.rows.and_then(NonZeroU32::new));
                    apply(&mut self.columns, matrix.columns.and_then(NonZeroU32::new));
                    apply(&mut self.min_value, matrix.min_value);
                    apply(&mut self.max_value, matrix.max_value);
                }
            }
            DataType::Tree => log::debug!("the server advertises no tree defaults"),
        }
        self
    }
}

fn apply<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value
    }
}

fn yes_no(value: bool) -> String {
    String::from(if value { "yes" } else { "no" })
}

fn parse_positive(field: Field, input: &str) -> anyhow::Result<NonZeroU32> {
    input
        .parse()
        .with_context(|| format!("{field} must be a positive whole number, not '{input}'"))
}

fn parse_integer(field: Field, input: &str) -> anyhow::Result<i32> {
    input
        .parse()
        .with_context(|| format!("{field} must be a whole number, not '{input}'"))
}

fn parse_flag(field: Field, input: &str) -> anyhow::Result<bool> {
    match &*input.to_ascii_lowercase() {
        "y" | "yes" | "true" | "1" => Ok(true),
        "n" | "no" | "false" | "0" => Ok(false),
        _ => anyhow::bail!("{field} must be yes or no, not '{input}'"),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn payload_keys(builder: &RequestBuilder) -> BTreeSet<String> {
        match serde_json::to_value(builder.snapshot()).unwrap() {
            serde_json::Value::Object(map) => map.keys().cloned().collect(),
            value => panic!("expected an object, got {value}"),
        }
    }

    #[test]
    fn payload_matches_applicable_fields() {
        for &data_type in DataType::ALL {
            for &element_type in ElementType::ALL {
                let mut builder = RequestBuilder::default();
                builder
                    .set_data_type(data_type)
                    .set_element_type(element_type)
                    .set_charset("xyz");

                let expected = builder
                    .fields()
                    .iter()
                    .map(|field| field.wire_name().to_string())
                    .collect::<BTreeSet<_>>();

                assert_eq!(
                    payload_keys(&builder),
                    expected,
                    "{data_type} with {element_type}"
                );
            }
        }
    }

    #[test]
    fn applicability_table() {
        let names = |data_type, element_type| {
            fields_for(data_type, element_type)
                .iter()
                .map(Field::wire_name)
                .collect::<Vec<_>>()
                .join(" ")
        };

        insta::assert_snapshot!(
            names(DataType::Array, ElementType::Number),
            @"dataType size elementType minValue maxValue allowDuplicates isSorted outputFormat"
        );
        insta::assert_snapshot!(
            names(DataType::Array, ElementType::Character),
            @"dataType size elementType allowDuplicates isSorted caseType allowNumbers allowSpecialChars allowSpaces charset outputFormat"
        );
        insta::assert_snapshot!(
            names(DataType::Array, ElementType::String),
            @"dataType size elementType stringLength allowDuplicates isSorted caseType allowNumbers allowSpecialChars allowSpaces charset outputFormat"
        );
        insta::assert_snapshot!(
            names(DataType::String, ElementType::Number),
            @"dataType size caseType allowNumbers allowSpecialChars allowSpaces charset outputFormat"
        );
        insta::assert_snapshot!(
            names(DataType::Matrix, ElementType::String),
            @"dataType size minValue maxValue rows columns outputFormat"
        );
        insta::assert_snapshot!(
            names(DataType::Tree, ElementType::Character),
            @"dataType size outputFormat"
        );
    }

    #[test]
    fn hidden_values_survive_a_switch() {
        let mut builder = RequestBuilder::default();
        builder.set_range(-5, 5).set_data_type(DataType::Tree);

        let request = builder.snapshot();
        assert_eq!(request.min_value, None);
        assert_eq!(request.element_type, None);

        builder.set_data_type(DataType::Array);
        let request = builder.snapshot();
        assert_eq!(request.min_value, Some(-5));
        assert_eq!(request.max_value, Some(5));
    }

    #[test]
    fn set_overwrites_from_text() {
        let mut builder = RequestBuilder::default();
        builder.set(Field::DataType, "string").unwrap();
        builder.set(Field::Size, " 42 ").unwrap();
        builder.set(Field::AllowSpaces, "Yes").unwrap();
        builder.set(Field::CaseType, "mixed").unwrap();
        builder.set(Field::OutputFormat, "plain text").unwrap();

        let request = builder.snapshot();
        assert_eq!(request.data_type, DataType::String);
        assert_eq!(request.size.get(), 42);
        assert_eq!(request.allow_spaces, Some(true));
        assert_eq!(request.case_type, Some(CaseType::Mixed));
        assert_eq!(request.output_format, OutputFormat::PlainText);
        assert_eq!(request.charset, None);
    }

    #[test]
    fn rejects_bad_input() {
        let mut builder = RequestBuilder::default();
        let before = builder.clone();

        let err = builder.set(Field::Size, "0").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Size/Length must be a positive whole number, not '0'"
        );
        assert!(builder.set(Field::Rows, "-3").is_err());
        assert!(builder.set(Field::MinValue, "ten").is_err());
        assert!(builder.set(Field::IsSorted, "maybe").is_err());
        assert!(builder.set(Field::DataType, "graph").is_err());

        assert_eq!(builder, before);
    }

    #[test]
    fn charset_keeps_spaces_and_clears_when_empty() {
        let mut builder = RequestBuilder::default();
        builder.set_data_type(DataType::String);

        builder.set(Field::Charset, "a b").unwrap();
        assert_eq!(builder.snapshot().charset.as_deref(), Some("a b"));

        builder.set(Field::Charset, "").unwrap();
        assert_eq!(builder.snapshot().charset, None);
    }

    #[test]
    fn constraints_seed_the_active_type() {
        let constraints: Constraints = serde_json::from_str(
            r#"{
                "defaults": {
                    "array": { "size": 7, "minValue": 0, "maxValue": 9, "isSorted": true },
                    "string": { "length": 12, "charset": "ab" },
                    "matrix": { "rows": 2, "columns": 4, "minValue": -1, "maxValue": 1 }
                }
            }"#,
        )
        .unwrap();

        let mut builder = RequestBuilder::default();
        let request = builder.apply_constraints(&constraints).snapshot();
        assert_eq!(request.size.get(), 7);
        assert_eq!((request.min_value, request.max_value), (Some(0), Some(9)));
        assert_eq!(request.is_sorted, Some(true));
        assert_eq!(request.allow_duplicates, Some(true));

        let mut builder = RequestBuilder::default();
        builder.set_data_type(DataType::Matrix);
        let request = builder.apply_constraints(&constraints).snapshot();
        assert_eq!(request.rows.map(NonZeroU32::get), Some(2));
        assert_eq!(request.columns.map(NonZeroU32::get), Some(4));
        assert_eq!((request.min_value, request.max_value), (Some(-1), Some(1)));

        let mut builder = RequestBuilder::default();
        builder.set_data_type(DataType::String);
        let request = builder.apply_constraints(&constraints).snapshot();
        assert_eq!(request.size.get(), 12);
        assert_eq!(request.charset.as_deref(), Some("ab"));
    }
}
