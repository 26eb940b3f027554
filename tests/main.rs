use exarg::{CommandParser, Param, Value};

#[test]
fn builder_compiles() {
    CommandParser::new("organization");
}

#[test]
fn parse_mutates_variables() {
    let mut item: u32 = 0;
    let parser = CommandParser::new("program")
        .add(Param::argument(Value::new(&mut item), "item"))
        .build_parser()
        .unwrap();

    parser.parse_tokens(vec!["3"].as_slice()).unwrap();

    assert_eq!(item, 3);
}
