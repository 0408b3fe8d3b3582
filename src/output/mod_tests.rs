use super::*;

#[test]
fn output_format_from_str() {
    assert_eq!("text".parse::<OutputFormat>(), Ok(OutputFormat::Text));
    assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
}

#[test]
fn output_format_rejects_unknown() {
    let err = "sarif".parse::<OutputFormat>().unwrap_err();
    assert_eq!(err, "Unknown output format: sarif");
}

#[test]
fn output_format_default_is_text() {
    assert_eq!(OutputFormat::default(), OutputFormat::Text);
}

#[test]
fn formatters_usable_as_trait_objects() {
    let formatters: Vec<Box<dyn OutputFormatter>> = vec![
        Box::new(TextFormatter::new(ColorMode::Never)),
        Box::new(JsonFormatter),
    ];
    for formatter in formatters {
        assert!(formatter.format(&Evaluation::default()).is_ok());
    }
}
