use terminal_size::{terminal_size, Width};

use crate::constant::{HELP_MESSAGE, HELP_NAME, HELP_SHORT};
use crate::model::Arity;
use crate::parser::composer::alias_label;
use crate::parser::interface::UserInterface;

pub(crate) struct OptionRow {
    name: String,
    short: Option<char>,
    arity: Arity,
    help: Option<String>,
}

impl OptionRow {
    pub(crate) fn new(name: String, short: Option<char>, arity: Arity, help: Option<String>) -> Self {
        Self {
            name,
            short,
            arity,
            help,
        }
    }
}

pub(crate) struct ArgumentRow {
    name: String,
    arity: Arity,
    help: Option<String>,
}

impl ArgumentRow {
    pub(crate) fn new(name: String, arity: Arity, help: Option<String>) -> Self {
        Self { name, arity, help }
    }
}

pub(crate) struct SourceRow {
    name: String,
    aliases: Vec<String>,
    help: Option<String>,
}

impl SourceRow {
    pub(crate) fn new(name: String, aliases: Vec<String>, help: Option<String>) -> Self {
        Self {
            name,
            aliases,
            help,
        }
    }
}

const PADDING_WIDTH: usize = 3;
const MAIN_INDENT: usize = 1;
// Let's assume the average word length is 5.
// Then 17 is a good minimum, because it allows precisely 3 words with a space between them.
const MINIMUM_TEXT_WIDTH: usize = 17;
// We'll target 95% of the total width, to ensure the printer doesn't literally use the full space.
const TARGET_TOTAL_FACTOR: f64 = 0.95;

/// Renders one command's help text through a [`UserInterface`].
pub(crate) struct Printer {
    program: String,
    about: Option<String>,
    options: Vec<OptionRow>,
    arguments: Vec<ArgumentRow>,
    sources: Vec<SourceRow>,
    terminal_width: Option<usize>,
}

impl Printer {
    pub(crate) fn terminal(
        program: impl Into<String>,
        about: Option<String>,
        options: Vec<OptionRow>,
        arguments: Vec<ArgumentRow>,
        sources: Vec<SourceRow>,
    ) -> Self {
        let terminal_width = if let Some((Width(terminal_width), _)) = terminal_size() {
            Some(terminal_width as usize)
        } else {
            None
        };

        Self::new(program, about, options, arguments, sources, terminal_width)
    }

    pub(crate) fn new(
        program: impl Into<String>,
        about: Option<String>,
        mut options: Vec<OptionRow>,
        arguments: Vec<ArgumentRow>,
        sources: Vec<SourceRow>,
        terminal_width: Option<usize>,
    ) -> Self {
        options.sort_by(|a, b| a.name.cmp(&b.name));
        Self {
            program: program.into(),
            about,
            options,
            arguments,
            sources,
            terminal_width,
        }
    }

    #[cfg(test)]
    pub(crate) fn empty() -> Self {
        Self::new("program", None, Vec::default(), Vec::default(), Vec::default(), Some(80))
    }

    pub(crate) fn print_help(&self, user_interface: &(impl UserInterface + ?Sized)) {
        let help_flags = format!("-{HELP_SHORT}, --{HELP_NAME}");
        let mut summary = vec![format!("[-{HELP_SHORT}]")];
        let mut left_width = help_flags.len();
        let mut text_width = HELP_MESSAGE.len();
        let mut option_rows: Vec<(String, String)> = Vec::default();
        let mut argument_rows: Vec<(String, String)> = Vec::default();
        let mut source_rows: Vec<(String, String)> = Vec::default();

        for OptionRow {
            name,
            short,
            arity,
            help,
        } in &self.options
        {
            let grammar = grammar(name, arity);
            let suffix = if grammar.is_empty() {
                String::default()
            } else {
                format!(" {grammar}")
            };
            let left = match short {
                Some(s) => {
                    summary.push(format!("[-{s}{suffix}]"));
                    format!("-{s}{suffix}, --{name}{suffix}")
                }
                None => {
                    summary.push(format!("[--{name}{suffix}]"));
                    format!("--{name}{suffix}")
                }
            };
            let text = help.clone().unwrap_or_default();
            left_width = std::cmp::max(left_width, left.len());
            text_width = std::cmp::max(text_width, text.len());
            option_rows.push((left, text));
        }

        for ArgumentRow { name, arity, help } in &self.arguments {
            let grammar = grammar(name, arity);
            summary.push(grammar.clone());
            let text = help.clone().unwrap_or_default();
            left_width = std::cmp::max(left_width, grammar.len());
            text_width = std::cmp::max(text_width, text.len());
            argument_rows.push((grammar, text));
        }

        if !self.sources.is_empty() {
            let spellings: Vec<&str> = self
                .sources
                .iter()
                .flat_map(|row| {
                    std::iter::once(row.name.as_str())
                        .chain(row.aliases.iter().map(String::as_str))
                })
                .collect();
            summary.push(format!("{{{}}} ...", spellings.join(",")));

            for SourceRow {
                name,
                aliases,
                help,
            } in &self.sources
            {
                let left = alias_label(name, aliases);
                let text = help.clone().unwrap_or_default();
                left_width = std::cmp::max(left_width, left.len());
                text_width = std::cmp::max(text_width, text.len());
                source_rows.push((left, text));
            }
        }

        let layout = Layout::guided(left_width, text_width, self.terminal_width);

        user_interface.print(format!(
            "usage: {p} {s}",
            p = self.program,
            s = summary.join(" ")
        ));

        if let Some(about) = &self.about {
            user_interface.print(String::default());

            for line in wrap(about, layout.span()) {
                user_interface.print(line);
            }
        }

        if !argument_rows.is_empty() {
            user_interface.print(String::default());
            user_interface.print("positional arguments:".to_string());

            for (left, text) in &argument_rows {
                for line in layout.render(MAIN_INDENT, left, text) {
                    user_interface.print(line);
                }
            }
        }

        if !source_rows.is_empty() {
            user_interface.print(String::default());
            user_interface.print("sources:".to_string());

            for (left, text) in &source_rows {
                for line in layout.render(MAIN_INDENT, left, text) {
                    user_interface.print(line);
                }
            }
        }

        user_interface.print(String::default());
        user_interface.print("options:".to_string());

        for line in layout.render(MAIN_INDENT, &help_flags, HELP_MESSAGE) {
            user_interface.print(line);
        }

        for (left, text) in &option_rows {
            for line in layout.render(MAIN_INDENT, left, text) {
                user_interface.print(line);
            }
        }
    }
}

fn grammar(name: &str, arity: &Arity) -> String {
    let example = name.to_ascii_uppercase().replace('-', "_");

    match arity {
        Arity::Exactly(0) => String::default(),
        Arity::Exactly(n) => (0..*n)
            .map(|_| example.clone())
            .collect::<Vec<String>>()
            .join(" "),
        Arity::Any => format!("[{example} ...]"),
        Arity::AtLeastOne => format!("{example} [...]"),
    }
}

struct Layout {
    left: usize,
    text: usize,
}

impl Layout {
    /// Choose the text column width from the terminal, when one is available.
    fn guided(left: usize, text: usize, terminal_width: Option<usize>) -> Self {
        let text = match terminal_width {
            Some(total) => {
                let target = (total as f64 * TARGET_TOTAL_FACTOR) as usize;
                let non_text = MAIN_INDENT + left + PADDING_WIDTH;

                if text + non_text <= target {
                    text
                } else if non_text < target {
                    std::cmp::max(target - non_text, MINIMUM_TEXT_WIDTH)
                } else {
                    MINIMUM_TEXT_WIDTH
                }
            }
            None => std::cmp::min(text, MINIMUM_TEXT_WIDTH),
        };

        Self { left, text }
    }

    fn span(&self) -> usize {
        MAIN_INDENT + self.left + PADDING_WIDTH + self.text
    }

    fn render(&self, indent: usize, left: &str, text: &str) -> Vec<String> {
        let left_width = self.left;
        let padding = PADDING_WIDTH;
        let parts = wrap(text, self.text);
        let mut out = Vec::default();

        if parts.is_empty() {
            out.push(format!("{:indent$}{left}", ""));
        }

        for (i, part) in parts.iter().enumerate() {
            if i == 0 {
                out.push(format!("{:indent$}{left:<left_width$}{:padding$}{part}", "", ""));
            } else {
                out.push(format!("{:indent$}{:left_width$}{:padding$}{part}", "", "", ""));
            }
        }

        out
    }
}

fn wrap(paragraph: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::default();
    let mut current = String::default();

    for word in paragraph.split_whitespace() {
        let mut word = word;

        // Hard-split any word that cannot fit on a line of its own.
        while word.len() > width && width > 1 {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            let (head, tail) = word.split_at(width - 1);
            lines.push(format!("{head}-"));
            word = tail;
        }

        if current.is_empty() {
            current.push_str(word);
        } else if current.len() + 1 + word.len() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::interface::util::InMemoryInterface;
    use crate::test::assert_contains;

    #[test]
    fn wrap_words() {
        assert_eq!(wrap("", 10), Vec::<String>::new());
        assert_eq!(wrap("  something  ", 10), vec!["something".to_string()]);
        assert_eq!(
            wrap("something pieces full more stuff", 23),
            vec!["something pieces full".to_string(), "more stuff".to_string()]
        );
    }

    #[test]
    fn wrap_hyphenates() {
        assert_eq!(
            wrap("somethingxpieces", 10),
            vec!["something-".to_string(), "xpieces".to_string()]
        );
        assert_eq!(
            wrap("somethingxpiecesxfullermore", 10),
            vec![
                "something-".to_string(),
                "xpiecesxf-".to_string(),
                "ullermore".to_string(),
            ]
        );
    }

    #[test]
    fn render_rows() {
        let layout = Layout { left: 5, text: 23 };

        assert_eq!(
            layout.render(0, "abc", "something"),
            vec!["abc     something".to_string()]
        );
        assert_eq!(
            layout.render(1, "abc", "something"),
            vec![" abc     something".to_string()]
        );
        assert_eq!(
            layout.render(0, "abc", "something pieces full more stuff"),
            vec![
                "abc     something pieces full".to_string(),
                "        more stuff".to_string(),
            ]
        );
        assert_eq!(layout.render(0, "abc", ""), vec!["abc".to_string()]);
    }

    #[test]
    fn layout_guided() {
        // Plenty of terminal: the needed width is kept.
        let layout = Layout::guided(10, 40, Some(120));
        assert_eq!(layout.text, 40);

        // Narrow terminal: squeeze down to the target, bottoming out at the minimum.
        let layout = Layout::guided(10, 80, Some(60));
        assert_eq!(layout.text, 57 - 14);

        let layout = Layout::guided(10, 80, Some(20));
        assert_eq!(layout.text, MINIMUM_TEXT_WIDTH);

        // No terminal: cap at the minimum.
        let layout = Layout::guided(10, 80, None);
        assert_eq!(layout.text, MINIMUM_TEXT_WIDTH);
        let layout = Layout::guided(10, 8, None);
        assert_eq!(layout.text, 8);
    }

    #[test]
    fn print_help_empty() {
        let printer = Printer::empty();
        let interface = InMemoryInterface::default();

        printer.print_help(&interface);

        let message = interface.consume_message();
        assert_eq!(
            message,
            "usage: program [-h]\n\noptions:\n -h, --help   Show this help message and exit."
        );
    }

    #[test]
    fn print_help_parameters() {
        let printer = Printer::new(
            "program",
            Some("Does the thing.".to_string()),
            vec![
                OptionRow::new("verbose".to_string(), Some('v'), Arity::Exactly(0), None),
                OptionRow::new(
                    "span".to_string(),
                    None,
                    Arity::Exactly(2),
                    Some("The span to process.".to_string()),
                ),
            ],
            vec![ArgumentRow::new(
                "item".to_string(),
                Arity::Exactly(1),
                Some("The item.".to_string()),
            )],
            Vec::default(),
            Some(100),
        );
        let interface = InMemoryInterface::default();

        printer.print_help(&interface);

        let message = interface.consume_message();
        assert_contains!(message, "usage: program [-h] [--span SPAN SPAN] [-v] ITEM");
        assert_contains!(message, "Does the thing.");
        assert_contains!(message, "positional arguments:");
        assert_contains!(message, "ITEM");
        assert_contains!(message, "The item.");
        assert_contains!(message, "options:");
        assert_contains!(message, "-h, --help");
        assert_contains!(message, "--span SPAN SPAN");
        assert_contains!(message, "-v, --verbose");
    }

    #[test]
    fn print_help_sources() {
        let printer = Printer::new(
            "program",
            None,
            Vec::default(),
            Vec::default(),
            vec![
                SourceRow::new(
                    "quant".to_string(),
                    vec!["quantify".to_string()],
                    Some("Quantify the reads.".to_string()),
                ),
                SourceRow::new("plot".to_string(), Vec::default(), None),
            ],
            Some(100),
        );
        let interface = InMemoryInterface::default();

        printer.print_help(&interface);

        let message = interface.consume_message();
        assert_contains!(message, "usage: program [-h] {quant,quantify,plot} ...");
        assert_contains!(message, "sources:");
        assert_contains!(message, "quant (quantify)   Quantify the reads.");
        assert_contains!(message, "plot");
    }
}
