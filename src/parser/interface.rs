use crate::parser::base::ParseError;

/// Output seam for the parser runtime.
/// Keeps the help/error printing testable without touching the process streams.
pub(crate) trait UserInterface {
    fn print(&self, message: String);
    fn print_error(&self, error: ParseError);
    fn print_error_context(&self, error_context: ErrorContext);
}

#[derive(Default)]
pub(crate) struct ConsoleInterface {}

impl UserInterface for ConsoleInterface {
    fn print(&self, message: String) {
        println!("{message}");
    }

    fn print_error(&self, error: ParseError) {
        eprintln!("{error}");
    }

    fn print_error_context(&self, error_context: ErrorContext) {
        eprintln!("{error_context}");
    }
}

/// The token stream around a parse error, rendered with a caret under the offending offset.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct ErrorContext {
    offset: usize,
    tokens: Vec<String>,
}

impl ErrorContext {
    pub(crate) fn new(offset: usize, tokens: &[&str]) -> Self {
        Self {
            offset,
            tokens: tokens.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl std::fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let projection = self.tokens.join(" ");
        // Offsets are relative to the space-joined tokens; clamp to keep the caret on the line.
        let width = std::cmp::min(self.offset, projection.len().saturating_sub(1));

        write!(f, "{projection}\n{:width$}^", "")
    }
}

#[cfg(test)]
pub(crate) mod util {
    use super::*;
    use std::cell::RefCell;
    use std::sync::mpsc;

    /// Records everything the parser prints, for direct assertions.
    #[derive(Default)]
    pub(crate) struct InMemoryInterface {
        recording: RefCell<Recording>,
    }

    #[derive(Default)]
    struct Recording {
        lines: Vec<String>,
        error: Option<String>,
        error_context: Option<ErrorContext>,
    }

    impl UserInterface for InMemoryInterface {
        fn print(&self, message: String) {
            self.recording.borrow_mut().lines.push(message);
        }

        fn print_error(&self, error: ParseError) {
            let replaced = self.recording.borrow_mut().error.replace(error.to_string());
            assert!(replaced.is_none(), "print_error must only be called once");
        }

        fn print_error_context(&self, error_context: ErrorContext) {
            let replaced = self
                .recording
                .borrow_mut()
                .error_context
                .replace(error_context);
            assert!(
                replaced.is_none(),
                "print_error_context must only be called once"
            );
        }
    }

    impl InMemoryInterface {
        pub(crate) fn consume(self) -> (Option<String>, Option<String>, Option<ErrorContext>) {
            let recording = self.recording.into_inner();
            (
                join_non_empty(recording.lines),
                recording.error,
                recording.error_context,
            )
        }

        pub(crate) fn consume_message(self) -> String {
            let (message, error, error_context) = self.consume();
            assert_eq!(error, None);
            assert_eq!(error_context, None);
            message.unwrap()
        }
    }

    enum Output {
        Line(String),
        Error(String),
        Context(ErrorContext),
    }

    /// Build a connected sender/receiver pair.
    /// The parser takes ownership of the sender half; the test keeps the receiver and reads
    /// everything back once the parser (and with it the sender) has been dropped.
    pub(crate) fn channel_interface() -> (SenderInterface, ReceiverInterface) {
        let (tx, rx) = mpsc::channel();
        (SenderInterface { tx }, ReceiverInterface { rx })
    }

    pub(crate) struct SenderInterface {
        tx: mpsc::Sender<Output>,
    }

    impl UserInterface for SenderInterface {
        fn print(&self, message: String) {
            self.tx.send(Output::Line(message)).unwrap();
        }

        fn print_error(&self, error: ParseError) {
            self.tx.send(Output::Error(error.to_string())).unwrap();
        }

        fn print_error_context(&self, error_context: ErrorContext) {
            self.tx.send(Output::Context(error_context)).unwrap();
        }
    }

    pub(crate) struct ReceiverInterface {
        rx: mpsc::Receiver<Output>,
    }

    impl ReceiverInterface {
        /// Drains the channel; the iteration ends when the sender half disconnects.
        pub(crate) fn consume(self) -> (Option<String>, Option<String>, Option<ErrorContext>) {
            let mut lines: Vec<String> = Vec::default();
            let mut errors: Vec<String> = Vec::default();
            let mut error_context: Option<ErrorContext> = None;

            for output in self.rx.iter() {
                match output {
                    Output::Line(line) => lines.push(line),
                    Output::Error(error) => errors.push(error),
                    // Keeps the first if multiple were sent.
                    Output::Context(context) => {
                        error_context.get_or_insert(context);
                    }
                }
            }

            (join_non_empty(lines), join_non_empty(errors), error_context)
        }

        pub(crate) fn consume_message(self) -> String {
            let (message, error, error_context) = self.consume();
            assert_eq!(error, None);
            assert_eq!(error_context, None);
            message.unwrap()
        }
    }

    fn join_non_empty(values: Vec<String>) -> Option<String> {
        if values.is_empty() {
            None
        } else {
            Some(values.join("\n"))
        }
    }
}
