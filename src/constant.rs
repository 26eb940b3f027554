pub(crate) const HELP_NAME: &str = "help";
pub(crate) const HELP_SHORT: char = 'h';
pub(crate) const HELP_MESSAGE: &str = "Show this help message and exit.";

pub(crate) const DETAILED_HELP_NAME: &str = "detailed-help";
pub(crate) const DETAILED_HELP_SHORT: char = 'd';
pub(crate) const DETAILED_HELP_MESSAGE: &str =
    "Show this help message, followed by the help for each source, and exit.";
