use std::{num::NonZeroU32, path::PathBuf};

use genie_core::prelude::*;

#[derive(Debug, gumdrop::Options)]
/// a terminal client for the TestGenie test case generator
pub struct Args {
    /// print this help message
    pub help: bool,

    /// base url of the api, overrides TESTGENIE_API_URL
    #[options(no_short, meta = "<url>")]
    pub api_url: Option<String>,

    #[options(command)]
    pub command: Option<Command>,
}

#[derive(Debug, gumdrop::Options)]
pub enum Command {
    /// print the constraints the server advertises
    Constraints(HelpOnly),
    /// generate a test case described by flags
    Generate(GenerateArgs),
    /// fill in the generation form interactively
    Form(FormArgs),
    /// send feedback or a bug report
    Feedback(FeedbackArgs),
    /// print build information
    Version(HelpOnly),
}

#[derive(Debug, gumdrop::Options)]
pub struct HelpOnly {
    /// print this help message
    pub help: bool,
}

#[derive(Debug, gumdrop::Options)]
pub struct FormArgs {
    /// print this help message
    pub help: bool,

    /// start from the defaults the server advertises
    #[options(no_short)]
    pub server_defaults: bool,
}

#[derive(Debug, gumdrop::Options)]
pub struct FeedbackArgs {
    /// print this help message
    pub help: bool,

    #[options(free)]
    pub message: Vec<String>,
}

impl FeedbackArgs {
    pub fn message(&self) -> Option<String> {
        let message = self.message.join(" ");
        (!message.trim().is_empty()).then_some(message)
    }
}

#[derive(Debug, gumdrop::Options)]
pub struct GenerateArgs {
    /// print this help message
    pub help: bool,

    /// ARRAY, STRING, MATRIX or TREE
    #[options(no_short, meta = "<type>")]
    pub data_type: Option<DataType>,

    /// number of elements, or characters for a string
    #[options(no_short, meta = "<n>")]
    pub size: Option<NonZeroU32>,

    /// NUMBER, CHARACTER or STRING, for arrays
    #[options(no_short, meta = "<type>")]
    pub element_type: Option<ElementType>,

    /// smallest value, for numbers and matrices
    #[options(no_short, meta = "<n>")]
    pub min: Option<i32>,

    /// largest value, for numbers and matrices
    #[options(no_short, meta = "<n>")]
    pub max: Option<i32>,

    /// characters to draw from
    #[options(no_short, meta = "<chars>")]
    pub charset: Option<String>,

    /// length of each string in an array of strings
    #[options(no_short, meta = "<n>")]
    pub string_length: Option<NonZeroU32>,

    /// LOWER, UPPER or MIXED
    #[options(no_short, meta = "<case>")]
    pub case: Option<CaseType>,

    /// include the digits 0-9
    #[options(no_short)]
    pub numbers: bool,

    /// include special characters
    #[options(no_short)]
    pub special: bool,

    /// allow spaces
    #[options(no_short)]
    pub spaces: bool,

    /// do not allow duplicate elements
    #[options(no_short)]
    pub unique: bool,

    /// sort the elements
    #[options(no_short)]
    pub sorted: bool,

    /// number of matrix rows
    #[options(no_short, meta = "<n>")]
    pub rows: Option<NonZeroU32>,

    /// number of matrix columns
    #[options(no_short, meta = "<n>")]
    pub columns: Option<NonZeroU32>,

    /// JSON, CSV or PLAIN_TEXT
    #[options(no_short, meta = "<format>")]
    pub format: Option<OutputFormat>,

    /// also write the result to testcase.<format>, or to --output
    #[options(no_short)]
    pub export: bool,

    /// write the result to this path, implies --export
    #[options(no_short, meta = "<path>")]
    pub output: Option<PathBuf>,

    /// start from the defaults the server advertises
    #[options(no_short)]
    pub server_defaults: bool,
}

impl GenerateArgs {
    pub fn wants_export(&self) -> bool {
        self.export || self.output.is_some()
    }

    /// Writes the flags that were given over the builder's values.
    ///
    /// The selection goes first so server defaults land on the right data type,
    /// and explicit flags always win over those defaults.
    pub fn apply(&self, builder: &mut RequestBuilder, constraints: Option<&Constraints>) {
        if let Some(data_type) = self.data_type {
            builder.set_data_type(data_type);
        }
        if let Some(element_type) = self.element_type {
            builder.set_element_type(element_type);
        }
        if let Some(constraints) = constraints {
            builder.apply_constraints(constraints);
        }

        if let Some(size) = self.size {
            builder.set_size(size);
        }
        if let Some(min) = self.min {
            builder.set_min_value(min);
        }
        if let Some(max) = self.max {
            builder.set_max_value(max);
        }
        if let Some(charset) = &self.charset {
            builder.set_charset(charset.as_str());
        }
        if let Some(string_length) = self.string_length {
            builder.set_string_length(string_length);
        }
        if let Some(case) = self.case {
            builder.set_case_type(case);
        }
        if let Some(rows) = self.rows {
            builder.set_rows(rows);
        }
        if let Some(columns) = self.columns {
            builder.set_columns(columns);
        }
        if let Some(format) = self.format {
            builder.set_output_format(format);
        }

        [
            (Field::AllowNumbers, self.numbers, true),
            (Field::AllowSpecialChars, self.special, true),
            (Field::AllowSpaces, self.spaces, true),
            (Field::AllowDuplicates, self.unique, false),
            (Field::IsSorted, self.sorted, true),
        ]
        .into_iter()
        .filter(|&(_, given, _)| given)
        .for_each(|(field, _, value)| {
            builder.set_flag(field, value);
        });
    }
}
