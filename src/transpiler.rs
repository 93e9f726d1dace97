//! Python code generation.
//!
//! A depth-first walk over the tree that emits one indented line per
//! statement and enforces the language's only semantic rule: a name must be
//! bound by `var`, `function` or a parameter list before it is read or
//! reassigned.
//!
//! Bindings live in a single flat set for the whole run. Names declared inside
//! a function body stay visible after the body ends, including in sibling
//! functions and the enclosing block.
//!
//! Python keywords cannot be bound or called; `var None = 1;` is rejected
//! rather than emitted as invalid Python.

use std::collections::HashSet;

use crate::parser::ast::{Compound, Condition, Expression, FunctionCall, Identifier, Statement};

pub mod error;

pub use error::{TranspileError, TranspileResult};

const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranspileOptions {
    /// Spaces per nesting level.
    pub indent_width: usize,
    /// Reject calls to functions that have not been defined yet.
    pub check_callees: bool,
}

impl Default for TranspileOptions {
    fn default() -> Self {
        Self {
            indent_width: 4,
            check_callees: true,
        }
    }
}

#[derive(Debug, Default)]
pub struct Transpiler {
    options: TranspileOptions,
    declared: HashSet<String>,
}

impl Transpiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: TranspileOptions) -> Self {
        Self {
            options,
            declared: HashSet::new(),
        }
    }

    /// Emits Python source for `program`. The declared set starts empty on
    /// every call; on error nothing is returned.
    pub fn transpile(&mut self, program: &Compound) -> TranspileResult<String> {
        self.declared.clear();
        let mut output = String::new();
        self.emit_block(program, 0, &mut output)?;
        log::debug!(
            "emitted {} bytes, {} names declared",
            output.len(),
            self.declared.len()
        );
        Ok(output)
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.declared.contains(name)
    }

    /// Names bound during the last run, sorted.
    pub fn declared_names(&self) -> Vec<&str> {
        let mut names = self.declared.iter().map(String::as_str).collect::<Vec<_>>();
        names.sort_unstable();
        names
    }

    fn emit_block(
        &mut self,
        block: &Compound,
        indent: usize,
        output: &mut String,
    ) -> TranspileResult<()> {
        if block.statements.is_empty() {
            self.push_line(output, indent, "pass");
            return Ok(());
        }
        for statement in &block.statements {
            self.emit_statement(statement, indent, output)?;
        }
        Ok(())
    }

    fn emit_statement(
        &mut self,
        statement: &Statement,
        indent: usize,
        output: &mut String,
    ) -> TranspileResult<()> {
        match statement {
            Statement::Call(call) => {
                let call = self.emit_call(call)?;
                self.push_line(output, indent, &call);
            }
            Statement::Declaration { target, value } => {
                // Bound before the initializer is emitted, so `var x = x;` passes.
                self.declare(target)?;
                let value = self.emit_expression(value)?;
                self.push_line(output, indent, &format!("{} = {value}", target.name));
            }
            Statement::Assignment { target, value } => {
                let target = self.emit_identifier(target)?;
                let value = self.emit_expression(value)?;
                self.push_line(output, indent, &format!("{target} = {value}"));
            }
            Statement::Print(value) => {
                let value = self.emit_expression(value)?;
                self.push_line(output, indent, &format!("print({value})"));
            }
            Statement::Return(value) => {
                let value = self.emit_expression(value)?;
                self.push_line(output, indent, &format!("return {value}"));
            }
            Statement::If { condition, body } => {
                let condition = self.emit_condition(condition)?;
                self.push_line(output, indent, &format!("if {condition}:"));
                self.emit_block(body, indent + 1, output)?;
            }
            Statement::While { condition, body } => {
                let condition = self.emit_condition(condition)?;
                self.push_line(output, indent, &format!("while {condition}:"));
                self.emit_block(body, indent + 1, output)?;
            }
            Statement::FunctionDefinition { name, params, body } => {
                self.declare(name)?;
                let mut rendered = Vec::with_capacity(params.names.len());
                for param in &params.names {
                    self.declare(param)?;
                    rendered.push(param.name.as_str());
                }
                self.push_line(
                    output,
                    indent,
                    &format!("def {}({}):", name.name, rendered.join(", ")),
                );
                self.emit_block(body, indent + 1, output)?;
            }
        }
        Ok(())
    }

    fn emit_condition(&self, condition: &Condition) -> TranspileResult<String> {
        let left = self.emit_expression(&condition.left)?;
        let right = self.emit_expression(&condition.right)?;
        Ok(format!("({left} {} {right})", condition.op))
    }

    fn emit_expression(&self, expr: &Expression) -> TranspileResult<String> {
        match expr {
            Expression::Number(text) => Ok(text.clone()),
            Expression::String(text) => Ok(format!("\"{}\"", escape_python_string(text))),
            Expression::Boolean(value) => Ok(String::from(if *value { "True" } else { "False" })),
            Expression::Identifier(identifier) => self.emit_identifier(identifier),
            Expression::Call(call) => self.emit_call(call),
            Expression::BinaryOperation { op, left, right } => {
                let left = self.emit_operand(left, op, false)?;
                let right = self.emit_operand(right, op, true)?;
                Ok(format!("{left} {op} {right}"))
            }
        }
    }

    fn emit_operand(
        &self,
        operand: &Expression,
        parent_op: &str,
        is_right: bool,
    ) -> TranspileResult<String> {
        let rendered = self.emit_expression(operand)?;
        if operand.needs_parens(parent_op, is_right) {
            Ok(format!("({rendered})"))
        } else {
            Ok(rendered)
        }
    }

    fn emit_call(&self, call: &FunctionCall) -> TranspileResult<String> {
        let name = &call.callee.name;
        ensure_not_reserved(name)?;
        if self.options.check_callees && !self.is_declared(name) {
            return Err(TranspileError::UndeclaredFunction {
                name: name.to_string(),
            });
        }
        let mut rendered_args = Vec::with_capacity(call.args.len());
        for arg in &call.args {
            rendered_args.push(self.emit_expression(arg)?);
        }
        Ok(format!("{name}({})", rendered_args.join(", ")))
    }

    fn emit_identifier(&self, identifier: &Identifier) -> TranspileResult<String> {
        if !self.is_declared(&identifier.name) {
            return Err(TranspileError::UndeclaredIdentifier {
                name: identifier.name.clone(),
            });
        }
        Ok(identifier.name.clone())
    }

    fn declare(&mut self, identifier: &Identifier) -> TranspileResult<()> {
        ensure_not_reserved(&identifier.name)?;
        self.declared.insert(identifier.name.clone());
        Ok(())
    }

    fn push_line(&self, output: &mut String, indent: usize, line: &str) {
        log::trace!("emit [{indent}] {line}");
        output.push_str(&" ".repeat(indent * self.options.indent_width));
        output.push_str(line);
        output.push('\n');
    }
}

fn ensure_not_reserved(name: &str) -> TranspileResult<()> {
    if PYTHON_KEYWORDS.contains(&name) {
        return Err(TranspileError::ReservedName {
            name: name.to_string(),
        });
    }
    Ok(())
}

fn escape_python_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
