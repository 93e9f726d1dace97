//! Renders a syntax tree back into mylang source.
//!
//! The output is accepted by the parser again and yields an identical tree.
//! Lines are separated by `\r\n`, the only line break the lexer recognises.

use super::ast::{Compound, Condition, Expression, FunctionCall, Statement};

const INDENT: &str = "    ";
const NEWLINE: &str = "\r\n";

pub fn print_program(program: &Compound) -> String {
    let mut output = String::new();
    print_block(program, 0, &mut output);
    output
}

fn print_block(block: &Compound, indent: usize, output: &mut String) {
    output.push('{');
    output.push_str(NEWLINE);
    for statement in &block.statements {
        print_statement(statement, indent + 1, output);
    }
    push_indent(output, indent);
    output.push('}');
}

fn print_statement(statement: &Statement, indent: usize, output: &mut String) {
    push_indent(output, indent);
    match statement {
        Statement::Call(call) => {
            output.push_str(&print_call(call));
            output.push(';');
        }
        Statement::Declaration { target, value } => {
            output.push_str(&format!("var {} = {};", target.name, print_assignable(value)));
        }
        Statement::Assignment { target, value } => {
            output.push_str(&format!("{} = {};", target.name, print_assignable(value)));
        }
        Statement::Print(value) => {
            output.push_str(&format!("print {};", print_assignable(value)));
        }
        Statement::Return(value) => {
            output.push_str(&format!("return {};", print_expression(value)));
        }
        Statement::If { condition, body } => {
            output.push_str(&format!("if {} ", print_condition(condition)));
            print_block(body, indent, output);
        }
        Statement::While { condition, body } => {
            output.push_str(&format!("while {} ", print_condition(condition)));
            print_block(body, indent, output);
        }
        Statement::FunctionDefinition { name, params, body } => {
            let params = params
                .names
                .iter()
                .map(|param| param.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            output.push_str(&format!("function {}({params}) ", name.name));
            print_block(body, indent, output);
        }
    }
    output.push_str(NEWLINE);
}

fn print_condition(condition: &Condition) -> String {
    format!(
        "({} {} {})",
        print_expression(&condition.left),
        condition.op,
        print_expression(&condition.right)
    )
}

fn print_expression(expr: &Expression) -> String {
    match expr {
        Expression::Number(text) => text.clone(),
        Expression::String(text) => format!("'{text}'"),
        Expression::Boolean(value) => value.to_string(),
        Expression::Identifier(identifier) => identifier.name.clone(),
        Expression::Call(call) => print_call(call),
        Expression::BinaryOperation { op, left, right } => format!(
            "{} {op} {}",
            print_operand(left, op, false),
            print_operand(right, op, true)
        ),
    }
}

/// Prints an expression in `Assignable` position, where a leading string or
/// boolean literal would end the expression early.
fn print_assignable(expr: &Expression) -> String {
    let rendered = print_expression(expr);
    if matches!(expr, Expression::BinaryOperation { .. }) && starts_with_literal(expr) {
        format!("({rendered})")
    } else {
        rendered
    }
}

fn starts_with_literal(expr: &Expression) -> bool {
    match expr {
        Expression::BinaryOperation { left, .. } => starts_with_literal(left),
        Expression::String(_) | Expression::Boolean(_) => true,
        _ => false,
    }
}

fn print_operand(operand: &Expression, parent_op: &str, is_right: bool) -> String {
    let rendered = print_expression(operand);
    if operand.needs_parens(parent_op, is_right) {
        format!("({rendered})")
    } else {
        rendered
    }
}

fn print_call(call: &FunctionCall) -> String {
    let args = call
        .args
        .iter()
        .map(print_assignable)
        .collect::<Vec<_>>()
        .join(", ");
    format!("{}({args})", call.callee.name)
}

fn push_indent(output: &mut String, indent: usize) {
    for _ in 0..indent {
        output.push_str(INDENT);
    }
}
