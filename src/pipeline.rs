use anyhow::{Context, Result};

use crate::error::CompileResult;
use crate::io::{Sink, SourceProvider};
use crate::transpiler::{TranspileOptions, Transpiler};
use crate::{lexer, parser};

/// Runs lexer, parser and transpiler over one source unit.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pipeline {
    options: TranspileOptions,
}

impl Pipeline {
    pub fn new(options: TranspileOptions) -> Self {
        Self { options }
    }

    pub fn translate(&self, source: &str) -> CompileResult<String> {
        let tokens = lexer::tokenize(source)?;
        let program = parser::parse_tokens(tokens)?;
        let output = Transpiler::with_options(self.options).transpile(&program)?;
        Ok(output)
    }

    /// Reads `source`, translates it and hands the result to every sink in
    /// order. Sinks see nothing if any stage fails.
    pub fn run(&self, source: &dyn SourceProvider, sinks: &mut [&mut dyn Sink]) -> Result<String> {
        let name = source.name();
        let text = source.read_source()?;
        let output = self
            .translate(&text)
            .with_context(|| format!("Translating {name}"))?;
        for sink in sinks.iter_mut() {
            log::debug!("writing {} bytes to {} sink", output.len(), sink.name());
            sink.write_output(&output)?;
        }
        log::info!("translated {name}");
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompileError;
    use crate::io::{MemorySink, StringSource};

    #[test]
    fn feeds_every_sink() {
        let source = StringSource::new("inline", "{ var x = 'a'; print x; }");
        let mut first = MemorySink::default();
        let mut second = MemorySink::default();
        let output = Pipeline::default()
            .run(&source, &mut [&mut first, &mut second])
            .expect("pipeline failed");
        assert_eq!(output, "x = \"a\"\nprint(x)\n");
        assert_eq!(first.contents.as_deref(), Some(output.as_str()));
        assert_eq!(second.contents.as_deref(), Some(output.as_str()));
    }

    #[test]
    fn writes_nothing_on_failure() {
        let source = StringSource::new("inline", "{ print y; }");
        let mut sink = MemorySink::default();
        let err = Pipeline::default()
            .run(&source, &mut [&mut sink])
            .expect_err("undeclared identifier");
        assert!(sink.contents.is_none());
        assert!(err.to_string().contains("Translating inline"));
        assert!(matches!(
            err.downcast_ref::<CompileError>(),
            Some(CompileError::Transpile(_))
        ));
    }

    #[test]
    fn passes_options_to_the_transpiler() {
        let pipeline = Pipeline::new(TranspileOptions {
            check_callees: false,
            ..TranspileOptions::default()
        });
        assert_eq!(
            pipeline.translate("{ external(); }"),
            Ok("external()\n".to_string())
        );
    }
}
