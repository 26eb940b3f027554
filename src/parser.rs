mod base;
mod composer;
mod interface;
mod middleware;
mod printer;

pub use base::{ConfigError, ParseError};
pub use middleware::ReadyParser;

pub(crate) use base::{
    ArgumentCapture, ArgumentSpec, OptionCapture, OptionSpec, Scanner, TokenSink,
};
pub(crate) use interface::{ConsoleInterface, UserInterface};
pub(crate) use middleware::CommandUnit;
pub(crate) use printer::{ArgumentRow, OptionRow, Printer, SourceRow};

#[cfg(test)]
pub(crate) use interface::util;
