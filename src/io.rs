//! Where source text comes from and where emitted text goes.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Supplies the full text of one translation unit.
pub trait SourceProvider {
    /// Label used in diagnostics, e.g. the file path.
    fn name(&self) -> String;
    fn read_source(&self) -> Result<String>;
}

/// Receives the emitted program once every stage has succeeded.
pub trait Sink {
    fn name(&self) -> &'static str;
    fn write_output(&mut self, text: &str) -> Result<()>;
}

pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SourceProvider for FileSource {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn read_source(&self) -> Result<String> {
        fs::read_to_string(&self.path).with_context(|| format!("Reading {}", self.path.display()))
    }
}

/// In-memory source, mostly for tests and embedding.
pub struct StringSource {
    name: String,
    text: String,
}

impl StringSource {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

impl SourceProvider for StringSource {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn read_source(&self) -> Result<String> {
        Ok(self.text.clone())
    }
}

pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Sink for FileSink {
    fn name(&self) -> &'static str {
        "file"
    }

    fn write_output(&mut self, text: &str) -> Result<()> {
        fs::write(&self.path, text).with_context(|| format!("Writing {}", self.path.display()))
    }
}

/// Echoes the emitted program to stdout.
pub struct ConsoleSink;

impl Sink for ConsoleSink {
    fn name(&self) -> &'static str {
        "console"
    }

    fn write_output(&mut self, text: &str) -> Result<()> {
        if !text.is_empty() {
            print!("{text}");
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemorySink {
    pub contents: Option<String>,
}

impl Sink for MemorySink {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn write_output(&mut self, text: &str) -> Result<()> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}
