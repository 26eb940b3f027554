use std::collections::HashMap;
use std::env;

use crate::parser::base::{Action, ParseError, Scanner};
use crate::parser::composer::compose_detailed_help;
use crate::parser::interface::{ErrorContext, UserInterface};
use crate::parser::printer::Printer;

/// One command's scanner paired with its help printer.
pub(crate) struct CommandUnit<'a> {
    scanner: Scanner<'a>,
    printer: Printer,
}

impl<'a> CommandUnit<'a> {
    pub(crate) fn new(scanner: Scanner<'a>, printer: Printer) -> Self {
        Self { scanner, printer }
    }

    #[cfg(test)]
    pub(crate) fn with_program(program: &str) -> CommandUnit<'static> {
        CommandUnit::new(
            Scanner::new(Vec::default(), Vec::default(), None, false)
                .expect("internal error - empty scanner must be valid"),
            Printer::new(
                program,
                None,
                Vec::default(),
                Vec::default(),
                Vec::default(),
                Some(80),
            ),
        )
    }

    #[cfg(test)]
    pub(crate) fn empty() -> CommandUnit<'static> {
        CommandUnit::with_program("program")
    }

    pub(crate) fn printer(&self) -> &Printer {
        &self.printer
    }

    fn invoke(
        self,
        tokens: &[&str],
        user_interface: &(impl UserInterface + ?Sized),
    ) -> Result<(), i32> {
        let CommandUnit { scanner, printer } = self;

        match scanner.consume(tokens) {
            Ok(Action::Complete) => Ok(()),
            Ok(Action::PrintHelp) => {
                printer.print_help(user_interface);
                Err(0)
            }
            Ok(Action::PrintDetailedHelp) | Ok(Action::Dispatch { .. }) => {
                unreachable!("internal error - source parse must complete/exit.")
            }
            Err((offset, error)) => {
                user_interface.print_error(error);
                user_interface.print_error_context(ErrorContext::new(offset, tokens));
                Err(1)
            }
        }
    }
}

/// The configured command line parser.
/// Built via `CommandParser::build` or `SourceParser::build`.
pub struct ReadyParser<'a> {
    root: CommandUnit<'a>,
    sources: HashMap<String, CommandUnit<'a>>,
    aliases: HashMap<String, Vec<String>>,
    alias_index: HashMap<String, String>,
    selection: Vec<String>,
    user_interface: Box<dyn UserInterface>,
}

impl<'a> std::fmt::Debug for ReadyParser<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadyParser{..}").finish()
    }
}

impl<'a> ReadyParser<'a> {
    pub(crate) fn command(root: CommandUnit<'a>, user_interface: Box<dyn UserInterface>) -> Self {
        Self {
            root,
            sources: HashMap::default(),
            aliases: HashMap::default(),
            alias_index: HashMap::default(),
            selection: Vec::default(),
            user_interface,
        }
    }

    pub(crate) fn source_command(
        root: CommandUnit<'a>,
        sources: HashMap<String, CommandUnit<'a>>,
        aliases: HashMap<String, Vec<String>>,
        alias_index: HashMap<String, String>,
        selection: Vec<String>,
        user_interface: Box<dyn UserInterface>,
    ) -> Self {
        Self {
            root,
            sources,
            aliases,
            alias_index,
            selection,
            user_interface,
        }
    }

    /// Run the command line parser against the input tokens.
    ///
    /// Parsing happens in two phases:
    /// 1. Token matching aligns the tokens to arguments and options.
    /// 2. Token capturing parses the tokens by their respective field types.
    /// This phase will actually mutate your program variables.
    ///
    /// If the parser encounters an error (ex: un-matched token, un-capturable token, etc), it will return with `Err(1)`.
    ///
    /// If the help switch (`-h` or `--help`) is encountered, the parser will display the help message and return with `Err(0)`.
    /// If the detailed help switch (`-d` or `--detailed-help`) is registered and encountered, the parser will display the
    /// top-level help followed by each selected source's help, and return with `Err(0)`.
    /// Both switches short-circuit the scan; phase #2 capturing never runs.
    ///
    /// In the case of a source based command line parser, this process is repeated twice.
    /// Once for the root command line parser, and a second time for the matched source (resolved through its aliases).
    pub fn parse_tokens(self, tokens: &[&str]) -> Result<(), i32> {
        let ReadyParser {
            root,
            mut sources,
            aliases,
            alias_index,
            selection,
            user_interface,
        } = self;
        let CommandUnit { scanner, printer } = root;

        match scanner.consume(tokens) {
            Ok(Action::Complete) => Ok(()),
            Ok(Action::PrintHelp) => {
                printer.print_help(&*user_interface);
                Err(0)
            }
            Ok(Action::PrintDetailedHelp) => {
                compose_detailed_help(&printer, &selection, &sources, &aliases, &*user_interface);
                Err(0)
            }
            Ok(Action::Dispatch {
                offset,
                token,
                remaining,
            }) => match alias_index.get(&token) {
                Some(canonical) => {
                    let unit = sources
                        .remove(canonical)
                        .expect("internal error - alias index must map to a registered source");
                    unit.invoke(
                        remaining
                            .iter()
                            .map(AsRef::as_ref)
                            .collect::<Vec<&str>>()
                            .as_slice(),
                        &*user_interface,
                    )
                }
                None => {
                    user_interface.print_error(ParseError(format!("Unknown source '{token}'.")));
                    user_interface.print_error_context(ErrorContext::new(offset, tokens));
                    Err(1)
                }
            },
            Err((offset, error)) => {
                user_interface.print_error(error);
                user_interface.print_error_context(ErrorContext::new(offset, tokens));
                Err(1)
            }
        }
    }

    /// Run the command line parser against the Cli [`env::args`].
    ///
    /// Behaves as [`ReadyParser::parse_tokens`], except that any `Err` outcome terminates
    /// the process with that exit code (via [`std::process::exit`]).
    /// In particular, the help switches print and exit with code `0`, short-circuiting
    /// any further argument parsing.
    pub fn parse(self) {
        let command_input: Vec<String> = env::args().skip(1).collect();
        match self.parse_tokens(
            command_input
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<&str>>()
                .as_slice(),
        ) {
            Ok(()) => {}
            Err(exit_code) => {
                std::process::exit(exit_code);
            }
        };
    }
}
