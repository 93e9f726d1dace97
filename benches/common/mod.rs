#![allow(dead_code)]
use std::path::Path;

use mylang::parser::ast::Compound;
use mylang::{lexer, parser};
use test_support::{load_cases, to_crlf};

/// Fixture programs marked `bench: true`, as `(label, source)` pairs.
pub fn workloads() -> Vec<(String, String)> {
    let cases = load_cases(Path::new("tests/programs")).unwrap_or_else(|err| panic!("{err:#}"));
    cases
        .into_iter()
        .filter(|case| case.spec.bench)
        .map(|case| {
            let source = case
                .read_program()
                .unwrap_or_else(|err| panic!("read {}: {err:#}", case.name));
            (case.name, to_crlf(&source))
        })
        .collect()
}

pub fn load_program(source: &str) -> Compound {
    let tokens = lexer::tokenize(source).unwrap_or_else(|err| panic!("tokenize: {err}"));
    parser::parse_tokens(tokens).unwrap_or_else(|err| panic!("parse: {err}"))
}
