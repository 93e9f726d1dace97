use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, ensure};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CaseClass {
    Translated,
    LexicalError,
    SyntaxError,
    SemanticError,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExpectedOutcome {
    /// Generated Python, compared exactly.
    pub output_file: Option<String>,
    /// stdout of the generated Python when run by an interpreter.
    pub stdout_file: Option<String>,
    /// Text the error message must contain.
    pub error_contains_file: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CaseSpec {
    pub class: CaseClass,
    /// Run the generated Python and compare its stdout.
    #[serde(default)]
    pub parity: bool,
    /// Include the program in benchmark workloads.
    #[serde(default)]
    pub bench: bool,
    pub expected: ExpectedOutcome,
}

#[derive(Debug, Clone)]
pub struct Case {
    pub name: String,
    pub dir: PathBuf,
    pub program_path: PathBuf,
    pub spec: CaseSpec,
}

impl Case {
    pub fn read_text(&self, relative_path: &str) -> Result<String> {
        fs::read_to_string(self.dir.join(relative_path))
            .with_context(|| format!("Reading {} fixture file {}", self.name, relative_path))
    }

    pub fn read_program(&self) -> Result<String> {
        fs::read_to_string(&self.program_path)
            .with_context(|| format!("Reading program for {}", self.name))
    }
}

pub fn load_cases(programs_dir: &Path) -> Result<Vec<Case>> {
    let mut cases = Vec::new();

    for entry in
        fs::read_dir(programs_dir).with_context(|| format!("Reading {}", programs_dir.display()))?
    {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }

        let case_path = path.join("case.yaml");
        if !case_path.exists() {
            continue;
        }

        let program_path = path.join("program.mylang");
        ensure!(
            program_path.exists(),
            "Missing program.mylang for case {}",
            path.display()
        );

        let case_name = path
            .file_name()
            .and_then(|value| value.to_str())
            .map(str::to_string)
            .with_context(|| format!("Invalid case directory name {}", path.display()))?;
        let case_raw = fs::read_to_string(&case_path)
            .with_context(|| format!("Reading {}", case_path.display()))?;
        let spec: CaseSpec = serde_yaml::from_str(&case_raw)
            .with_context(|| format!("Parsing {}", case_path.display()))?;

        cases.push(Case {
            name: case_name,
            dir: path,
            program_path,
            spec,
        });
    }

    ensure!(
        !cases.is_empty(),
        "No test cases found in {}",
        programs_dir.display()
    );
    cases.sort_by(|left, right| left.name.cmp(&right.name));
    Ok(cases)
}

/// Fixture sources are stored with `\n` line endings; the language only
/// accepts `\r\n`.
pub fn to_crlf(source: &str) -> String {
    source.replace("\r\n", "\n").replace('\n', "\r\n")
}

pub fn normalize_output(output: &str) -> String {
    output.replace("\r\n", "\n").trim_end().to_string()
}

pub fn detect_python_interpreter() -> Option<String> {
    if let Ok(python) = std::env::var("PYTHON")
        && run_python_startup(&python).is_ok()
    {
        return Some(python);
    }

    ["python3", "python"]
        .into_iter()
        .find(|candidate| run_python_startup(candidate).is_ok())
        .map(str::to_string)
}

pub fn run_python_source(interpreter: &str, source: &str) -> Result<String> {
    let output = Command::new(interpreter)
        .arg("-c")
        .arg(source)
        .output()
        .with_context(|| format!("Running '{interpreter} -c'"))?;
    ensure!(
        output.status.success(),
        "python failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

pub fn run_python_startup(interpreter: &str) -> Result<()> {
    let output = Command::new(interpreter)
        .arg("-c")
        .arg("pass")
        .output()
        .with_context(|| format!("Running '{interpreter} -c pass'"))?;
    ensure!(output.status.success(), "python startup command failed");
    Ok(())
}
