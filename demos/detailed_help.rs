use exarg::{CommandParser, Param, Value};

fn main() {
    let mut region: String = String::default();

    // Try: detailed_help --detailed-help
    // Or:  detailed_help pretty_A chr1
    let parser = CommandParser::new("sources")
        .about("Demonstrates the composed detailed help screen.")
        .dispatch("source")
        .source("A", &["longer_A", "pretty_A"], |sub| {
            sub.about("A is good.")
                .add(Param::argument(Value::new(&mut region), "region"))
        })
        .source("B", &["longer_B", "pretty_B"], |sub| sub.about("B is better."))
        .source("C", &["bad_alias"], |sub| sub.about("C is not so good."))
        .source("D", &["better_D"], |sub| sub.about("D could be useful."))
        .detailed_help(&["A", "B", "D"])
        .build();

    parser.parse();

    println!("Parsed a source selection (region: '{region}').");
}
