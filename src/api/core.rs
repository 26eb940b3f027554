use std::collections::HashMap;

use crate::api::parameter::{Param, ParamClass};
use crate::constant::{DETAILED_HELP_MESSAGE, DETAILED_HELP_NAME, DETAILED_HELP_SHORT};
use crate::model::Arity;
use crate::parser::{
    ArgumentCapture, ArgumentRow, CommandUnit, ConfigError, ConsoleInterface, OptionCapture,
    OptionRow, Printer, ReadyParser, Scanner, SourceRow, UserInterface,
};

/// The base command line parser.
///
/// ### Example
/// ```
/// use exarg::CommandParser;
///
/// let parser = CommandParser::new("program")
///     // Configure with CommandParser::add and CommandParser::dispatch.
///     .build();
/// parser.parse_tokens(empty::slice()).unwrap();
/// ```
pub struct CommandParser<'a> {
    program: String,
    about: Option<String>,
    option_rows: Vec<OptionRow>,
    argument_rows: Vec<ArgumentRow>,
    option_captures: Vec<OptionCapture<'a>>,
    argument_captures: Vec<ArgumentCapture<'a>>,
}

impl<'a> CommandParser<'a> {
    /// Create a command line parser.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            about: None,
            option_rows: Vec::default(),
            argument_rows: Vec::default(),
            option_captures: Vec::default(),
            argument_captures: Vec::default(),
        }
    }

    /// Document the about message for this command line parser.
    /// If repeated, only the final message will apply.
    pub fn about(mut self, description: impl Into<String>) -> Self {
        self.about.replace(description.into());
        self
    }

    /// Add an argument/option to the command line parser.
    ///
    /// The order of argument parameters corresponds to their positional order during parsing.
    /// The order of option parameters does not affect the command parser semantics.
    ///
    /// ### Example
    /// ```
    /// use exarg::{CommandParser, Param, Value};
    ///
    /// let mut a: u32 = 0;
    /// let mut b: u32 = 0;
    /// let parser = CommandParser::new("program")
    ///     .add(Param::argument(Value::new(&mut a), "a"))
    ///     .add(Param::argument(Value::new(&mut b), "b"))
    ///     .build();
    ///
    /// parser.parse_tokens(vec!["1", "2"].as_slice()).unwrap();
    ///
    /// assert_eq!(a, 1);
    /// assert_eq!(b, 2);
    /// ```
    pub fn add<T>(mut self, parameter: Param<'a, T>) -> Self {
        let inner = parameter.consume();
        match inner.class() {
            ParamClass::Opt => {
                self.option_rows.push(OptionRow::from(&inner));
                self.option_captures.push(OptionCapture::from(inner));
            }
            ParamClass::Arg => {
                self.argument_rows.push(ArgumentRow::from(&inner));
                self.argument_captures.push(ArgumentCapture::from(inner));
            }
        }

        self
    }

    /// Branch into a source (sub-command) based command line parser.
    ///
    /// Any parameters added before the branch apply to the root parser; the first leftover
    /// positional token selects the source, and every token after it belongs to that source.
    /// `name` is the dispatch parameter's name, as surfaced in parse errors.
    ///
    /// ### Example
    /// ```
    /// use exarg::{CommandParser, Param, Value};
    ///
    /// let mut region: String = String::default();
    /// let parser = CommandParser::new("program")
    ///     .dispatch("source")
    ///     .source("quant", &["quantify"], |sub| {
    ///         sub.add(Param::argument(Value::new(&mut region), "region"))
    ///     })
    ///     .build();
    ///
    /// parser.parse_tokens(vec!["quantify", "chr1"].as_slice()).unwrap();
    ///
    /// assert_eq!(&region, "chr1");
    /// ```
    pub fn dispatch(self, name: &'static str) -> SourceParser<'a> {
        SourceParser::new(self, name)
    }

    fn build_with_interface(
        self,
        user_interface: Box<dyn UserInterface>,
    ) -> Result<ReadyParser<'a>, ConfigError> {
        let scanner = Scanner::new(self.option_captures, self.argument_captures, None, false)?;
        let printer = Printer::terminal(
            self.program,
            self.about,
            self.option_rows,
            self.argument_rows,
            Vec::default(),
        );
        Ok(ReadyParser::command(
            CommandUnit::new(scanner, printer),
            user_interface,
        ))
    }

    /// Build the command line parser as a Result.
    /// This finalizes the configuration and checks for errors (ex: a repeated parameter name).
    pub fn build_parser(self) -> Result<ReadyParser<'a>, ConfigError> {
        self.build_with_interface(Box::new(ConsoleInterface::default()))
    }

    /// Build the command line parser.
    /// This finalizes the configuration and checks for errors (ex: a repeated parameter name).
    /// If an error is encountered, exits with error code `1` (via [`std::process::exit`]).
    pub fn build(self) -> ReadyParser<'a> {
        match self.build_parser() {
            Ok(parser) => parser,
            Err(error) => {
                eprintln!("{error}");
                std::process::exit(1);
            }
        }
    }
}

/// The source (sub-command) based command line parser.
pub struct SourceParser<'a> {
    root: CommandParser<'a>,
    dispatch_name: String,
    commands: Vec<(String, CommandParser<'a>)>,
    aliases: HashMap<String, Vec<String>>,
    alias_index: HashMap<String, String>,
    selection: Option<Vec<String>>,
    deferred_error: Option<ConfigError>,
}

impl<'a> SourceParser<'a> {
    fn new(root: CommandParser<'a>, name: &'static str) -> Self {
        Self {
            root,
            dispatch_name: name.to_string(),
            commands: Vec::default(),
            aliases: HashMap::default(),
            alias_index: HashMap::default(),
            selection: None,
            deferred_error: None,
        }
    }

    /// Setup a source under its canonical `name`, reachable through any of its `aliases` as well.
    ///
    /// Sources appear on the help screen in registration order.
    /// Every spelling (canonical or alias) must be unique across the parser.
    ///
    /// ### Example
    /// ```
    /// use exarg::{CommandParser, Param, Value};
    ///
    /// let mut value_a: u32 = 0;
    /// let mut value_b: u32 = 0;
    /// let parser = CommandParser::new("program")
    ///     .dispatch("source")
    ///     .source("a", &[], |sub| sub.add(Param::argument(Value::new(&mut value_a), "value_a")))
    ///     .source("b", &[], |sub| {
    ///         sub.about("Description for the source 'b'.")
    ///             .add(Param::argument(Value::new(&mut value_b), "value_b"))
    ///     })
    ///     .build();
    ///
    /// parser.parse_tokens(vec!["a", "1"].as_slice()).unwrap();
    ///
    /// assert_eq!(value_a, 1);
    /// assert_eq!(value_b, 0);
    /// ```
    pub fn source(
        mut self,
        name: impl Into<String>,
        aliases: &[&str],
        setup_fn: impl FnOnce(SourceCommand<'a>) -> SourceCommand<'a>,
    ) -> Self {
        let name = name.into();

        for spelling in std::iter::once(name.as_str()).chain(aliases.iter().copied()) {
            if self
                .alias_index
                .insert(spelling.to_string(), name.clone())
                .is_some()
            {
                self.deferred_error.replace(ConfigError(format!(
                    "source spelling '{spelling}' is already registered."
                )));
            }
        }

        self.aliases.insert(
            name.clone(),
            aliases.iter().map(|alias| alias.to_string()).collect(),
        );
        let inner = CommandParser::new(name.clone());
        let source_command = setup_fn(SourceCommand { inner });
        self.commands.push((name, source_command.inner));
        self
    }

    /// Register the detailed help switch (`-d`, `--detailed-help`).
    ///
    /// When the switch is present on the command line, the parser prints the top-level
    /// help followed by each source of `selection` (in the given order) under an
    /// `Input source '<name> (<aliases>)':` header, then exits successfully without
    /// parsing anything else.
    ///
    /// Every selected name must be registered via [`SourceParser::source`] by parse time.
    ///
    /// ### Example
    /// ```
    /// use exarg::CommandParser;
    ///
    /// let parser = CommandParser::new("program")
    ///     .dispatch("source")
    ///     .source("quant", &["quantify"], |sub| sub.about("Quantify the reads."))
    ///     .source("plot", &[], |sub| sub)
    ///     .detailed_help(&["quant", "plot"])
    ///     .build();
    ///
    /// assert_eq!(parser.parse_tokens(vec!["--detailed-help"].as_slice()), Err(0));
    /// ```
    pub fn detailed_help(mut self, selection: &[&str]) -> Self {
        self.selection
            .replace(selection.iter().map(|name| name.to_string()).collect());
        self
    }

    fn build_with_interface(
        self,
        user_interface: Box<dyn UserInterface>,
    ) -> Result<ReadyParser<'a>, ConfigError> {
        if let Some(error) = self.deferred_error {
            return Err(error);
        }

        let mut sources = HashMap::default();
        let mut source_rows = Vec::default();

        for (name, command) in self.commands {
            let scanner = Scanner::new(command.option_captures, command.argument_captures, None, false)?;
            let printer = Printer::terminal(
                format!("{program} {name}", program = self.root.program),
                command.about.clone(),
                command.option_rows,
                command.argument_rows,
                Vec::default(),
            );
            source_rows.push(SourceRow::new(
                name.clone(),
                self.aliases.get(&name).cloned().unwrap_or_default(),
                command.about,
            ));
            sources.insert(name, CommandUnit::new(scanner, printer));
        }

        let detailed = self.selection.is_some();
        let mut option_rows = self.root.option_rows;

        if detailed {
            option_rows.push(OptionRow::new(
                DETAILED_HELP_NAME.to_string(),
                Some(DETAILED_HELP_SHORT),
                Arity::Exactly(0),
                Some(DETAILED_HELP_MESSAGE.to_string()),
            ));
        }

        let scanner = Scanner::new(
            self.root.option_captures,
            self.root.argument_captures,
            Some(self.dispatch_name),
            detailed,
        )?;
        let printer = Printer::terminal(
            self.root.program,
            self.root.about,
            option_rows,
            self.root.argument_rows,
            source_rows,
        );
        Ok(ReadyParser::source_command(
            CommandUnit::new(scanner, printer),
            sources,
            self.aliases,
            self.alias_index,
            self.selection.unwrap_or_default(),
            user_interface,
        ))
    }

    /// Build the source based command line parser as a Result.
    /// This finalizes the configuration and checks for errors (ex: a repeated source spelling).
    pub fn build_parser(self) -> Result<ReadyParser<'a>, ConfigError> {
        self.build_with_interface(Box::new(ConsoleInterface::default()))
    }

    /// Build the source based command line parser.
    /// This finalizes the configuration and checks for errors (ex: a repeated source spelling).
    /// If an error is encountered, exits with error code `1` (via [`std::process::exit`]).
    pub fn build(self) -> ReadyParser<'a> {
        match self.build_parser() {
            Ok(parser) => parser,
            Err(error) => {
                eprintln!("{error}");
                std::process::exit(1);
            }
        }
    }
}

/// A single source's command line parser.
///
/// Used with [`SourceParser::source`].
pub struct SourceCommand<'a> {
    inner: CommandParser<'a>,
}

impl<'a> SourceCommand<'a> {
    /// *Available using 'unit_test' crate feature only.*</br></br>
    /// Build a [`SourceCommand`] for use in testing.
    ///
    /// ### Example
    /// ```
    /// use exarg::{Param, SourceCommand, Value};
    ///
    /// // Function under test.
    /// // We want to make sure the setup_fn is wired up correctly.
    /// pub fn setup_fn<'a>(value: &'a mut u32) -> impl FnOnce(SourceCommand<'a>) -> SourceCommand<'a> {
    ///     |sub| sub.add(Param::argument(Value::new(value), "value"))
    /// }
    ///
    /// let mut x: u32 = 1;
    /// let parser = setup_fn(&mut x)(SourceCommand::test_dummy()).build_parser().unwrap();
    /// parser.parse_tokens(vec!["2"].as_slice()).unwrap();
    /// assert_eq!(x, 2);
    /// ```
    #[cfg(feature = "unit_test")]
    pub fn test_dummy() -> Self {
        SourceCommand {
            inner: CommandParser::new("test-dummy"),
        }
    }

    /// *Available using 'unit_test' crate feature only.*</br></br>
    /// Build a [`ReadyParser`] for testing.
    /// See [`SourceCommand::test_dummy`] for an example.
    #[cfg(feature = "unit_test")]
    pub fn build_parser(self) -> Result<ReadyParser<'a>, ConfigError> {
        self.inner
            .build_with_interface(Box::new(ConsoleInterface::default()))
    }

    /// Document the about message for this source.
    /// The message doubles as the source's description on the top-level help screen.
    /// If repeated, only the final message will apply.
    pub fn about(mut self, description: impl Into<String>) -> Self {
        self.inner = self.inner.about(description);
        self
    }

    /// Add an argument/option to this source.
    /// Behaves as [`CommandParser::add`].
    pub fn add<T>(mut self, parameter: Param<'a, T>) -> Self {
        self.inner = self.inner.add(parameter);
        self
    }
}
