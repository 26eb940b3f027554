use crate::api::capture::{ArgumentField, Capturable, CaptureError, OptionField};
use crate::model::Arity;
use crate::parser::{
    ArgumentCapture, ArgumentRow, ArgumentSpec, OptionCapture, OptionRow, OptionSpec, TokenSink,
};

pub(crate) struct FieldBox<'a, T: 'a> {
    field: Box<dyn Capturable<'a, T> + 'a>,
}

impl<'a, T> FieldBox<'a, T> {
    pub(crate) fn bind(field: impl Capturable<'a, T> + 'a) -> Self {
        Self {
            field: Box::new(field),
        }
    }
}

impl<'a, T> TokenSink for FieldBox<'a, T> {
    fn matched(&mut self) {
        self.field.matched();
    }

    fn capture(&mut self, token: &str) -> Result<(), CaptureError> {
        self.field.capture(token)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ParamClass {
    Opt,
    Arg,
}

pub(super) struct ParamInner<'a, T> {
    class: ParamClass,
    field: FieldBox<'a, T>,
    arity: Arity,
    name: String,
    short: Option<char>,
    help: Option<String>,
}

impl<'a, T> ParamInner<'a, T> {
    pub(super) fn class(&self) -> ParamClass {
        self.class
    }
}

impl<'a, T> From<&ParamInner<'a, T>> for OptionSpec {
    fn from(value: &ParamInner<'a, T>) -> Self {
        OptionSpec::new(value.name.clone(), value.short, value.arity)
    }
}

impl<'a, T> From<ParamInner<'a, T>> for OptionCapture<'a> {
    fn from(value: ParamInner<'a, T>) -> Self {
        let spec = OptionSpec::from(&value);
        let ParamInner { field, .. } = value;
        (spec, Box::new(field))
    }
}

impl<'a, T> From<&ParamInner<'a, T>> for OptionRow {
    fn from(value: &ParamInner<'a, T>) -> Self {
        OptionRow::new(
            value.name.clone(),
            value.short,
            value.arity,
            value.help.clone(),
        )
    }
}

impl<'a, T> From<&ParamInner<'a, T>> for ArgumentSpec {
    fn from(value: &ParamInner<'a, T>) -> Self {
        ArgumentSpec::new(value.name.clone(), value.arity)
    }
}

impl<'a, T> From<ParamInner<'a, T>> for ArgumentCapture<'a> {
    fn from(value: ParamInner<'a, T>) -> Self {
        let spec = ArgumentSpec::from(&value);
        let ParamInner { field, .. } = value;
        (spec, Box::new(field))
    }
}

impl<'a, T> From<&ParamInner<'a, T>> for ArgumentRow {
    fn from(value: &ParamInner<'a, T>) -> Self {
        ArgumentRow::new(value.name.clone(), value.arity, value.help.clone())
    }
}

/// An argument/option parameter of the command line parser.
/// Used with [`CommandParser::add`](./struct.CommandParser.html#method.add).
pub struct Param<'a, T>(ParamInner<'a, T>);

impl<'a, T> Param<'a, T> {
    /// Create an option parameter: optional, specified via `--name` or `-s` syntax.
    ///
    /// ### Example
    /// ```
    /// use exarg::{CommandParser, Param, Value};
    ///
    /// let mut verbose: bool = false;
    /// let parser = CommandParser::new("program")
    ///     .add(Param::option(Value::new(&mut verbose), "verbose", Some('v')))
    ///     .build();
    ///
    /// parser.parse_tokens(vec!["--verbose", "true"].as_slice()).unwrap();
    /// assert!(verbose);
    /// ```
    pub fn option(
        field: impl Capturable<'a, T> + OptionField + 'a,
        name: &'static str,
        short: Option<char>,
    ) -> Self {
        let arity = field.arity();
        Self(ParamInner {
            class: ParamClass::Opt,
            field: FieldBox::bind(field),
            arity,
            name: name.to_string(),
            short,
            help: None,
        })
    }

    /// Create an argument parameter: required, specified positionally.
    ///
    /// ### Example
    /// ```
    /// use exarg::{CommandParser, Param, Value};
    ///
    /// let mut item: u32 = 0;
    /// let parser = CommandParser::new("program")
    ///     .add(Param::argument(Value::new(&mut item), "item"))
    ///     .build();
    ///
    /// parser.parse_tokens(vec!["17"].as_slice()).unwrap();
    /// assert_eq!(item, 17);
    /// ```
    pub fn argument(field: impl Capturable<'a, T> + ArgumentField + 'a, name: &'static str) -> Self {
        let arity = field.arity();
        Self(ParamInner {
            class: ParamClass::Arg,
            field: FieldBox::bind(field),
            arity,
            name: name.to_string(),
            short: None,
            help: None,
        })
    }

    /// Document the help message for this parameter.
    /// If repeated, only the final message will apply.
    pub fn help(mut self, description: impl Into<String>) -> Self {
        self.0.help.replace(description.into());
        self
    }

    pub(super) fn consume(self) -> ParamInner<'a, T> {
        self.0
    }
}
