use std::collections::VecDeque;

use thiserror::Error;

use crate::api::CaptureError;
use crate::constant::{DETAILED_HELP_NAME, DETAILED_HELP_SHORT, HELP_NAME, HELP_SHORT};
use crate::model::Arity;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// Error during parser construction.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Config error: {0}")]
pub struct ConfigError(pub(crate) String);

/// Error during token parsing.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Parse error: {0}")]
pub struct ParseError(pub(crate) String);

/// Behaviour to accept matched tokens, without knowledge of the underlying field type.
pub(crate) trait TokenSink {
    fn matched(&mut self);
    fn capture(&mut self, token: &str) -> Result<(), CaptureError>;
}

#[derive(Debug, Clone)]
pub(crate) struct OptionSpec {
    name: String,
    short: Option<char>,
    arity: Arity,
}

impl OptionSpec {
    pub(crate) fn new(name: impl Into<String>, short: Option<char>, arity: Arity) -> Self {
        Self {
            name: name.into(),
            short,
            arity,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ArgumentSpec {
    name: String,
    arity: Arity,
}

impl ArgumentSpec {
    pub(crate) fn new(name: impl Into<String>, arity: Arity) -> Self {
        Self {
            name: name.into(),
            arity,
        }
    }
}

pub(crate) type OptionCapture<'a> = (OptionSpec, Box<dyn TokenSink + 'a>);
pub(crate) type ArgumentCapture<'a> = (ArgumentSpec, Box<dyn TokenSink + 'a>);

/// The outcome of scanning (and, when applicable, capturing) one command's tokens.
#[derive(Debug)]
pub(crate) enum Action {
    Complete,
    Dispatch {
        offset: usize,
        token: String,
        remaining: Vec<String>,
    },
    PrintHelp,
    PrintDetailedHelp,
}

/// A single command's token matcher.
///
/// Scanning happens in two phases: token matching aligns the tokens to options/arguments
/// (help flags short-circuit here), then token capturing feeds the aligned values through
/// the sinks, mutating the caller's variables.
pub(crate) struct Scanner<'a> {
    options: Vec<OptionCapture<'a>>,
    arguments: Vec<ArgumentCapture<'a>>,
    dispatch: Option<String>,
    detailed: bool,
}

impl<'a> std::fmt::Debug for Scanner<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scanner{..}").finish()
    }
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(
        options: Vec<OptionCapture<'a>>,
        arguments: Vec<ArgumentCapture<'a>>,
        dispatch: Option<String>,
        detailed: bool,
    ) -> Result<Self, ConfigError> {
        let mut names: Vec<&str> = vec![HELP_NAME];
        let mut shorts: Vec<char> = vec![HELP_SHORT];

        if detailed {
            names.push(DETAILED_HELP_NAME);
            shorts.push(DETAILED_HELP_SHORT);
        }

        for (spec, _) in &options {
            if names.contains(&spec.name.as_str()) {
                return Err(ConfigError(format!(
                    "option '--{name}' is already registered.",
                    name = spec.name,
                )));
            }

            names.push(spec.name.as_str());

            if let Some(short) = spec.short {
                if shorts.contains(&short) {
                    return Err(ConfigError(format!(
                        "option '-{short}' is already registered."
                    )));
                }

                shorts.push(short);
            }
        }

        for (spec, _) in &arguments {
            if dispatch.is_some() && spec.arity.maximum().is_none() {
                return Err(ConfigError(format!(
                    "cannot combine the variable arity argument '{name}' with source dispatch.",
                    name = spec.name,
                )));
            }
        }

        Ok(Self {
            options,
            arguments,
            dispatch,
            detailed,
        })
    }

    /// Run both scanning phases over `tokens`.
    /// Errors carry the character offset into the space-joined token stream.
    pub(crate) fn consume(mut self, tokens: &[&str]) -> Result<Action, (usize, ParseError)> {
        let mut offsets = Vec::with_capacity(tokens.len());
        let mut cursor = 0;

        for token in tokens {
            offsets.push(cursor);
            cursor += token.len() + 1;
        }

        let end_offset = cursor.saturating_sub(1);
        let arguments_capacity: usize = self
            .arguments
            .iter()
            .map(|(spec, _)| spec.arity.minimum())
            .sum();
        let mut option_values: Vec<Vec<(usize, String)>> = Vec::default();
        let mut option_matched: Vec<Option<usize>> = Vec::default();
        option_values.resize_with(self.options.len(), Vec::default);
        option_matched.resize(self.options.len(), None);
        let mut positionals: VecDeque<(usize, String)> = VecDeque::default();
        let mut open: Option<usize> = None;
        let mut dispatch_hit: Option<(usize, String, Vec<String>)> = None;
        let help_long = format!("--{HELP_NAME}");
        let help_short = format!("-{HELP_SHORT}");
        let detailed_long = format!("--{DETAILED_HELP_NAME}");
        let detailed_short = format!("-{DETAILED_HELP_SHORT}");

        for (i, token) in tokens.iter().enumerate() {
            let offset = offsets[i];

            if *token == help_long || *token == help_short {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Help flag at offset {offset}; short-circuiting the scan.");
                }

                return Ok(Action::PrintHelp);
            }

            if self.detailed && (*token == detailed_long || *token == detailed_short) {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Detailed help flag at offset {offset}; short-circuiting the scan.");
                }

                return Ok(Action::PrintDetailedHelp);
            }

            if let Some(rest) = token.strip_prefix("--") {
                let (name, inline) = match rest.split_once('=') {
                    Some((name, value)) => (name, Some(value)),
                    None => (rest, None),
                };
                let index = self.lookup_name(name).ok_or_else(|| {
                    (offset, ParseError(format!("Unknown option '--{name}'.")))
                })?;
                open = self.begin_option(index, offset, inline, &mut option_values, &mut option_matched)?;
            } else if option_like(token) {
                let index = token
                    .chars()
                    .nth(1)
                    .filter(|_| token.len() == 2)
                    .and_then(|short| self.lookup_short(short))
                    .ok_or_else(|| (offset, ParseError(format!("Unknown option '{token}'."))))?;
                open = self.begin_option(index, offset, None, &mut option_values, &mut option_matched)?;
            } else if let Some(index) =
                open.filter(|index| self.wants_more(*index, option_values[*index].len()))
            {
                option_values[index].push((offset, token.to_string()));
            } else if self.dispatch.is_some() && positionals.len() == arguments_capacity {
                // The source token; everything after it is handed to the source's own scanner.
                dispatch_hit = Some((
                    offset,
                    token.to_string(),
                    tokens[i + 1..].iter().map(|t| t.to_string()).collect(),
                ));
                break;
            } else {
                open = None;
                positionals.push_back((offset, token.to_string()));
            }
        }

        // Align the positional pool to the argument specs before any capture runs.
        let mut assignments: Vec<Vec<(usize, String)>> = Vec::with_capacity(self.arguments.len());

        for (spec, _) in &self.arguments {
            let mut assigned = Vec::default();

            while positionals.front().is_some()
                && spec
                    .arity
                    .maximum()
                    .map(|maximum| assigned.len() < maximum)
                    .unwrap_or(true)
            {
                assigned.push(positionals.pop_front().expect("internal error - front was present"));
            }

            if assigned.len() < spec.arity.minimum() {
                return Err((
                    end_offset,
                    ParseError(format!(
                        "Not enough tokens provided to parameter '{name}'.",
                        name = spec.name.to_ascii_uppercase(),
                    )),
                ));
            }

            assignments.push(assigned);
        }

        if let Some((offset, token)) = positionals.pop_front() {
            return Err((offset, ParseError(format!("Unmatched token '{token}'."))));
        }

        if let Some(name) = &self.dispatch {
            if dispatch_hit.is_none() {
                return Err((
                    end_offset,
                    ParseError(format!(
                        "Not enough tokens provided to parameter '{name}'.",
                        name = name.to_ascii_uppercase(),
                    )),
                ));
            }
        }

        // Capture phase.
        for (index, (spec, sink)) in self.options.iter_mut().enumerate() {
            let Some(first_offset) = option_matched[index] else {
                continue;
            };

            if option_values[index].len() < spec.arity.minimum() {
                return Err((
                    first_offset,
                    ParseError(format!(
                        "too few values provided for '--{name}' (provided={provided}, expected={expected}).",
                        name = spec.name,
                        provided = option_values[index].len(),
                        expected = spec.arity.minimum(),
                    )),
                ));
            }

            sink.matched();

            for (offset, value) in &option_values[index] {
                sink.capture(value)
                    .map_err(|error| (*offset, ParseError(error.to_string())))?;
            }
        }

        for (assigned, (_, sink)) in assignments.iter().zip(self.arguments.iter_mut()) {
            if assigned.is_empty() {
                continue;
            }

            sink.matched();

            for (offset, value) in assigned {
                sink.capture(value)
                    .map_err(|error| (*offset, ParseError(error.to_string())))?;
            }
        }

        match dispatch_hit {
            Some((offset, token, remaining)) => Ok(Action::Dispatch {
                offset,
                token,
                remaining,
            }),
            None => Ok(Action::Complete),
        }
    }

    fn begin_option(
        &self,
        index: usize,
        offset: usize,
        inline: Option<&str>,
        option_values: &mut [Vec<(usize, String)>],
        option_matched: &mut [Option<usize>],
    ) -> Result<Option<usize>, (usize, ParseError)> {
        let (spec, _) = &self.options[index];
        option_matched[index].get_or_insert(offset);

        if spec.arity.maximum() == Some(0) {
            if inline.is_some() {
                return Err((
                    offset,
                    ParseError(format!("Option '--{name}' takes no value.", name = spec.name)),
                ));
            }

            return Ok(None);
        }

        if let Some(value) = inline {
            option_values[index].push((offset, value.to_string()));
        }

        Ok(Some(index))
    }

    fn wants_more(&self, index: usize, provided: usize) -> bool {
        let (spec, _) = &self.options[index];
        spec.arity
            .maximum()
            .map(|maximum| provided < maximum)
            .unwrap_or(true)
    }

    fn lookup_name(&self, name: &str) -> Option<usize> {
        self.options.iter().position(|(spec, _)| spec.name == name)
    }

    fn lookup_short(&self, short: char) -> Option<usize> {
        self.options
            .iter()
            .position(|(spec, _)| spec.short == Some(short))
    }
}

// An option-like token leads with `-` but not a digit, so negative numbers stay values.
fn option_like(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-') && !token.as_bytes()[1].is_ascii_digit()
}


#[cfg(test)]
mod tests {
    use super::test::BlackHole;
    use super::*;
    use crate::api::{FieldBox, Gather, Value};
    use rstest::rstest;

    fn spec_only<'a>(
        options: Vec<OptionSpec>,
        arguments: Vec<ArgumentSpec>,
        dispatch: Option<String>,
        detailed: bool,
    ) -> Scanner<'a> {
        Scanner::new(
            options
                .into_iter()
                .map(|spec| (spec, Box::new(BlackHole::default()) as Box<dyn TokenSink>))
                .collect(),
            arguments
                .into_iter()
                .map(|spec| (spec, Box::new(BlackHole::default()) as Box<dyn TokenSink>))
                .collect(),
            dispatch,
            detailed,
        )
        .unwrap()
    }

    #[rstest]
    #[case(vec!["--help"])]
    #[case(vec!["-h"])]
    #[case(vec!["5", "-h"])]
    #[case(vec!["--flag", "-h"])]
    fn consume_help(#[case] tokens: Vec<&str>) {
        let scanner = spec_only(
            vec![OptionSpec::new("flag", None, Arity::Exactly(0))],
            vec![ArgumentSpec::new("item", Arity::Exactly(1))],
            None,
            false,
        );

        assert_matches!(scanner.consume(tokens.as_slice()), Ok(Action::PrintHelp));
    }

    #[rstest]
    #[case(vec!["--detailed-help"])]
    #[case(vec!["-d"])]
    #[case(vec!["-d", "source"])]
    fn consume_detailed_help(#[case] tokens: Vec<&str>) {
        let scanner = spec_only(vec![], vec![], Some("source".to_string()), true);

        assert_matches!(
            scanner.consume(tokens.as_slice()),
            Ok(Action::PrintDetailedHelp)
        );
    }

    #[test]
    fn consume_detailed_help_unregistered() {
        let scanner = spec_only(vec![], vec![], None, false);

        let (offset, error) = scanner.consume(vec!["-d"].as_slice()).unwrap_err();
        assert_eq!(offset, 0);
        assert_eq!(error.to_string(), "Parse error: Unknown option '-d'.");
    }

    #[test]
    fn consume_argument_capture() {
        let mut variable: u32 = 0;
        let scanner = Scanner::new(
            vec![],
            vec![(
                ArgumentSpec::new("item", Arity::Exactly(1)),
                Box::new(FieldBox::bind(Value::new(&mut variable))),
            )],
            None,
            false,
        )
        .unwrap();

        assert_matches!(scanner.consume(vec!["5"].as_slice()), Ok(Action::Complete));
        assert_eq!(variable, 5);
    }

    #[rstest]
    #[case(vec!["--flag", "1"])]
    #[case(vec!["--flag=1"])]
    #[case(vec!["-f", "1"])]
    fn consume_option_capture(#[case] tokens: Vec<&str>) {
        let mut variable: u32 = 0;
        let scanner = Scanner::new(
            vec![(
                OptionSpec::new("flag", Some('f'), Arity::Exactly(1)),
                Box::new(FieldBox::bind(Value::new(&mut variable))),
            )],
            vec![],
            None,
            false,
        )
        .unwrap();

        assert_matches!(scanner.consume(tokens.as_slice()), Ok(Action::Complete));
        assert_eq!(variable, 1);
    }

    #[test]
    fn consume_gather_any() {
        let mut variable: Vec<i64> = Vec::default();
        let scanner = Scanner::new(
            vec![],
            vec![(
                ArgumentSpec::new("items", Arity::Any),
                Box::new(FieldBox::bind(Gather::new(&mut variable, Arity::Any))),
            )],
            None,
            false,
        )
        .unwrap();

        assert_matches!(
            scanner.consume(vec!["3", "-1", "2"].as_slice()),
            Ok(Action::Complete)
        );
        assert_eq!(variable, vec![3, -1, 2]);
    }

    #[test]
    fn consume_inconvertable() {
        let mut variable: u32 = 0;
        let scanner = Scanner::new(
            vec![],
            vec![(
                ArgumentSpec::new("item", Arity::Exactly(1)),
                Box::new(FieldBox::bind(Value::new(&mut variable))),
            )],
            None,
            false,
        )
        .unwrap();

        let (offset, error) = scanner.consume(vec!["not-u32"].as_slice()).unwrap_err();
        assert_eq!(offset, 0);
        assert_eq!(
            error.to_string(),
            "Parse error: cannot convert 'not-u32' to u32."
        );
        assert_eq!(variable, 0);
    }

    #[rstest]
    #[case(vec!["--nope"], 0, "Parse error: Unknown option '--nope'.")]
    #[case(vec!["5", "--nope"], 2, "Parse error: Unknown option '--nope'.")]
    #[case(vec!["-x"], 0, "Parse error: Unknown option '-x'.")]
    #[case(vec!["-xy"], 0, "Parse error: Unknown option '-xy'.")]
    fn consume_unknown_option(
        #[case] tokens: Vec<&str>,
        #[case] expected_offset: usize,
        #[case] expected_error: &str,
    ) {
        let scanner = spec_only(
            vec![],
            vec![ArgumentSpec::new("item", Arity::Exactly(1))],
            None,
            false,
        );

        let (offset, error) = scanner.consume(tokens.as_slice()).unwrap_err();
        assert_eq!(offset, expected_offset);
        assert_eq!(error.to_string(), expected_error);
    }

    #[test]
    fn consume_not_enough_tokens() {
        let scanner = spec_only(
            vec![],
            vec![ArgumentSpec::new("item", Arity::Exactly(1))],
            None,
            false,
        );

        let (_, error) = scanner.consume(empty::slice()).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Parse error: Not enough tokens provided to parameter 'ITEM'."
        );
    }

    #[test]
    fn consume_unmatched_token() {
        let scanner = spec_only(
            vec![],
            vec![ArgumentSpec::new("item", Arity::Exactly(1))],
            None,
            false,
        );

        let (offset, error) = scanner.consume(vec!["1", "2"].as_slice()).unwrap_err();
        assert_eq!(offset, 2);
        assert_eq!(error.to_string(), "Parse error: Unmatched token '2'.");
    }

    #[test]
    fn consume_too_few_option_values() {
        let scanner = spec_only(
            vec![OptionSpec::new("pair", None, Arity::Exactly(2))],
            vec![],
            None,
            false,
        );

        let (offset, error) = scanner.consume(vec!["--pair", "1"].as_slice()).unwrap_err();
        assert_eq!(offset, 0);
        assert_eq!(
            error.to_string(),
            "Parse error: too few values provided for '--pair' (provided=1, expected=2)."
        );
    }

    #[test]
    fn consume_toggle_with_value() {
        let scanner = spec_only(
            vec![OptionSpec::new("flag", None, Arity::Exactly(0))],
            vec![],
            None,
            false,
        );

        let (_, error) = scanner.consume(vec!["--flag=1"].as_slice()).unwrap_err();
        assert_eq!(error.to_string(), "Parse error: Option '--flag' takes no value.");
    }

    #[rstest]
    #[case(vec!["src"], 0, "src", vec![])]
    #[case(vec!["src", "a"], 0, "src", vec!["a"])]
    #[case(vec!["--flag", "src", "a", "--abc=123"], 7, "src", vec!["a", "--abc=123"])]
    fn consume_dispatch(
        #[case] tokens: Vec<&str>,
        #[case] expected_offset: usize,
        #[case] expected_token: &str,
        #[case] expected_remaining: Vec<&str>,
    ) {
        let scanner = spec_only(
            vec![OptionSpec::new("flag", None, Arity::Exactly(0))],
            vec![],
            Some("source".to_string()),
            false,
        );

        match scanner.consume(tokens.as_slice()).unwrap() {
            Action::Dispatch {
                offset,
                token,
                remaining,
            } => {
                assert_eq!(offset, expected_offset);
                assert_eq!(token, expected_token);
                assert_eq!(
                    remaining,
                    expected_remaining
                        .into_iter()
                        .map(|t| t.to_string())
                        .collect::<Vec<String>>()
                );
            }
            other => panic!("expected a dispatch, got {other:?}"),
        }
    }

    #[test]
    fn consume_dispatch_after_arguments() {
        let mut variable: u32 = 0;
        let scanner = Scanner::new(
            vec![],
            vec![(
                ArgumentSpec::new("item", Arity::Exactly(1)),
                Box::new(FieldBox::bind(Value::new(&mut variable))),
            )],
            Some("source".to_string()),
            false,
        )
        .unwrap();

        match scanner.consume(vec!["7", "src", "rest"].as_slice()).unwrap() {
            Action::Dispatch { token, remaining, .. } => {
                assert_eq!(token, "src");
                assert_eq!(remaining, vec!["rest".to_string()]);
            }
            other => panic!("expected a dispatch, got {other:?}"),
        }

        assert_eq!(variable, 7);
    }

    #[test]
    fn consume_dispatch_missing() {
        let scanner = spec_only(vec![], vec![], Some("source".to_string()), false);

        let (_, error) = scanner.consume(empty::slice()).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Parse error: Not enough tokens provided to parameter 'SOURCE'."
        );
    }

    #[test]
    fn scanner_rejects_variable_arity_with_dispatch() {
        let result = Scanner::new(
            vec![],
            vec![(
                ArgumentSpec::new("items", Arity::Any),
                Box::new(BlackHole::default()) as Box<dyn TokenSink>,
            )],
            Some("source".to_string()),
            false,
        );

        assert_matches!(result, Err(ConfigError(_)));
    }

    #[rstest]
    #[case(OptionSpec::new("help", None, Arity::Exactly(0)))]
    #[case(OptionSpec::new("flag", Some('h'), Arity::Exactly(0)))]
    fn scanner_rejects_reserved(#[case] spec: OptionSpec) {
        let result = Scanner::new(
            vec![(spec, Box::new(BlackHole::default()) as Box<dyn TokenSink>)],
            vec![],
            None,
            false,
        );

        assert_matches!(result, Err(ConfigError(_)));
    }

    #[test]
    fn scanner_rejects_duplicates() {
        let result = Scanner::new(
            vec![
                (
                    OptionSpec::new("flag", None, Arity::Exactly(0)),
                    Box::new(BlackHole::default()) as Box<dyn TokenSink>,
                ),
                (
                    OptionSpec::new("flag", Some('f'), Arity::Exactly(0)),
                    Box::new(BlackHole::default()) as Box<dyn TokenSink>,
                ),
            ],
            vec![],
            None,
            false,
        );

        assert_matches!(result, Err(ConfigError(_)));
    }
}
