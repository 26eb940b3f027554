use std::collections::HashMap;

use crate::parser::interface::UserInterface;
use crate::parser::middleware::CommandUnit;
use crate::parser::printer::Printer;

/// Render a source name with its alias annotation: `name (alias1, alias2)`,
/// or the bare name when there are no aliases.
pub(crate) fn alias_label(name: &str, aliases: &[String]) -> String {
    if aliases.is_empty() {
        name.to_string()
    } else {
        format!("{name} ({aliases})", aliases = aliases.join(", "))
    }
}

fn source_header(name: &str, aliases: Option<&Vec<String>>) -> String {
    let label = match aliases {
        Some(list) => alias_label(name, list),
        // An absent registry entry reads as "no aliases", never an error.
        None => name.to_string(),
    };

    format!("Input source '{label}':")
}

/// Print the top-level help, followed by each selected source's help under an
/// `Input source '..':` header annotated with the source's aliases.
///
/// A selected name without a registered source is a caller misconfiguration; the
/// lookup panics rather than printing a partial screen.
pub(crate) fn compose_detailed_help(
    root: &Printer,
    selection: &[String],
    sources: &HashMap<String, CommandUnit<'_>>,
    aliases: &HashMap<String, Vec<String>>,
    user_interface: &(impl UserInterface + ?Sized),
) {
    root.print_help(user_interface);

    for (i, name) in selection.iter().enumerate() {
        let unit = sources.get(name).unwrap_or_else(|| {
            panic!("internal error - selected source '{name}' is not registered")
        });

        user_interface.print(String::default());
        user_interface.print(source_header(name, aliases.get(name)));
        user_interface.print(String::default());
        unit.printer().print_help(user_interface);

        if i + 1 < selection.len() {
            user_interface.print(String::default());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::interface::util::InMemoryInterface;
    use crate::test::assert_contains;

    fn unit(program: &str) -> CommandUnit<'static> {
        CommandUnit::with_program(program)
    }

    #[test]
    fn alias_labels() {
        assert_eq!(alias_label("quant", &[]), "quant");
        assert_eq!(
            alias_label("quant", &["quantify".to_string(), "q".to_string()]),
            "quant (quantify, q)"
        );
    }

    #[test]
    fn source_headers() {
        assert_eq!(
            source_header("A", Some(&vec!["longer_A".to_string(), "pretty_A".to_string()])),
            "Input source 'A (longer_A, pretty_A)':"
        );
        assert_eq!(source_header("C", Some(&vec![])), "Input source 'C':");
        // No registry entry at all is treated as "no aliases".
        assert_eq!(source_header("C", None), "Input source 'C':");
    }

    #[test]
    fn compose() {
        let root = Printer::empty();
        let sources = HashMap::from([
            ("A".to_string(), unit("program A")),
            ("C".to_string(), unit("program C")),
        ]);
        let aliases = HashMap::from([
            (
                "A".to_string(),
                vec!["longer_A".to_string(), "pretty_A".to_string()],
            ),
            ("C".to_string(), Vec::default()),
        ]);
        let selection = vec!["A".to_string(), "C".to_string()];
        let interface = InMemoryInterface::default();

        compose_detailed_help(&root, &selection, &sources, &aliases, &interface);

        let message = interface.consume_message();
        assert_contains!(message, "usage: program [-h]");
        assert_contains!(
            message,
            "\n\nInput source 'A (longer_A, pretty_A)':\n\nusage: program A [-h]"
        );
        assert_contains!(message, "\n\nInput source 'C':\n\nusage: program C [-h]");

        let a = message
            .find("Input source 'A (longer_A, pretty_A)':")
            .unwrap();
        let c = message.find("Input source 'C':").unwrap();
        assert!(a < c, "selection order must be preserved");
    }

    #[test]
    fn compose_empty_selection() {
        let root = Printer::empty();
        let interface = InMemoryInterface::default();

        compose_detailed_help(
            &root,
            &[],
            &HashMap::default(),
            &HashMap::default(),
            &interface,
        );

        let message = interface.consume_message();
        assert_contains!(message, "usage: program [-h]");
        assert!(!message.contains("Input source"));
    }

    #[test]
    #[should_panic]
    fn compose_unregistered_selection() {
        let root = Printer::empty();
        let interface = InMemoryInterface::default();

        compose_detailed_help(
            &root,
            &["missing".to_string()],
            &HashMap::default(),
            &HashMap::default(),
            &interface,
        );
    }
}
