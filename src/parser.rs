//! Recursive-descent parser producing the program's root `Compound`.
//!
//! Grammar:
//!
//! ```text
//! Program      := Compound EndOfInput
//! Compound     := '{' Statement* '}'
//! Statement    := FunctionCall ';'
//!               | Identifier '=' Assignable ';'
//!               | 'var' Identifier '=' Assignable ';'
//!               | 'print' Assignable ';'
//!               | 'if' Condition Compound
//!               | 'while' Condition Compound
//!               | 'function' Identifier '(' Params ')' Compound
//!               | 'return' Expression ';'
//! Condition    := '(' Expression BINOP Expression ')'
//! Assignable   := Boolean | String | Expression
//! Expression   := Term (('+' | '-') Term)*
//! Term         := Factor (('*' | '/') Factor)*
//! Factor       := Number | Identifier | FunctionCall | '(' Expression ')' | Boolean | String
//! FunctionCall := Identifier '(' Args ')'
//! ```
//!
//! The first violation aborts parsing; no partial tree is returned.
//!
//! Nesting is capped at `MAX_NESTING_DEPTH`. Blocks, parenthesized groups,
//! call arguments and operator chains all count toward it, which also bounds
//! the recursion of every later walk over the tree.

use crate::lexer::{Span, Token, TokenKind};

pub mod ast;
pub mod error;
pub mod printer;

use ast::{Compound, Condition, Expression, FunctionCall, Identifier, Identifiers, Statement};
pub use error::{ParseError, ParseResult};

pub const MAX_NESTING_DEPTH: usize = 256;

pub struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    position: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(mut tokens: Vec<Token<'a>>) -> Self {
        // Lookahead past the end must land on an end-of-input marker.
        if tokens.last().map(|token| token.kind) != Some(TokenKind::EndOfInput) {
            let span = tokens
                .last()
                .map(|token| Span {
                    start: token.span.end,
                    end: token.span.end,
                    line: token.span.line,
                    column: token.span.column + token.text.chars().count(),
                })
                .unwrap_or_default();
            tokens.push(Token::new(TokenKind::EndOfInput, "", span));
        }
        Self {
            tokens,
            position: 0,
            depth: 0,
        }
    }

    pub fn parse_program(mut self) -> ParseResult<Compound> {
        let root = self.parse_compound()?;
        if self.current().kind != TokenKind::EndOfInput {
            return Err(self.unexpected(TokenKind::EndOfInput));
        }
        log::debug!(
            "parsed program with {} top-level statements",
            root.statements.len()
        );
        Ok(root)
    }

    fn parse_compound(&mut self) -> ParseResult<Compound> {
        self.enter()?;
        self.expect(TokenKind::LBrace)?;
        let mut statements = Vec::new();
        while self.current().kind != TokenKind::RBrace {
            statements.push(self.parse_statement()?);
        }
        self.expect(TokenKind::RBrace)?;
        self.depth -= 1;
        Ok(Compound { statements })
    }

    fn parse_statement(&mut self) -> ParseResult<Statement> {
        match self.current().kind {
            TokenKind::Identifier if self.peek().kind == TokenKind::LParen => {
                let call = self.parse_function_call()?;
                self.expect(TokenKind::EndOfStatement)?;
                Ok(Statement::Call(call))
            }
            TokenKind::Identifier => self.parse_assignment(),
            TokenKind::Variable => self.parse_declaration(),
            TokenKind::Print => {
                self.expect(TokenKind::Print)?;
                let value = self.parse_assignable()?;
                self.expect(TokenKind::EndOfStatement)?;
                Ok(Statement::Print(value))
            }
            TokenKind::If => {
                self.expect(TokenKind::If)?;
                let condition = self.parse_condition()?;
                let body = self.parse_compound()?;
                Ok(Statement::If { condition, body })
            }
            TokenKind::While => {
                self.expect(TokenKind::While)?;
                let condition = self.parse_condition()?;
                let body = self.parse_compound()?;
                Ok(Statement::While { condition, body })
            }
            TokenKind::Function => self.parse_function_definition(),
            TokenKind::Return => {
                self.expect(TokenKind::Return)?;
                let value = self.parse_expression()?;
                self.expect(TokenKind::EndOfStatement)?;
                Ok(Statement::Return(value))
            }
            _ => {
                let token = self.current();
                Err(ParseError::ExpectedStatement {
                    found_kind: token.kind,
                    found: token.text.to_string(),
                    line: token.span.line + 1,
                    column: token.span.column + 1,
                })
            }
        }
    }

    fn parse_assignment(&mut self) -> ParseResult<Statement> {
        let target = self.parse_identifier()?;
        self.expect(TokenKind::Assign)?;
        let value = self.parse_assignable()?;
        self.expect(TokenKind::EndOfStatement)?;
        Ok(Statement::Assignment { target, value })
    }

    fn parse_declaration(&mut self) -> ParseResult<Statement> {
        self.expect(TokenKind::Variable)?;
        let target = self.parse_identifier()?;
        self.expect(TokenKind::Assign)?;
        let value = self.parse_assignable()?;
        self.expect(TokenKind::EndOfStatement)?;
        Ok(Statement::Declaration { target, value })
    }

    fn parse_function_definition(&mut self) -> ParseResult<Statement> {
        self.expect(TokenKind::Function)?;
        let name = self.parse_identifier()?;
        let params = self.parse_params()?;
        let body = self.parse_compound()?;
        Ok(Statement::FunctionDefinition { name, params, body })
    }

    fn parse_params(&mut self) -> ParseResult<Identifiers> {
        self.expect(TokenKind::LParen)?;
        let mut names = Vec::new();
        while self.current().kind == TokenKind::Identifier {
            names.push(self.parse_identifier()?);
            if self.current().kind == TokenKind::Comma {
                self.expect(TokenKind::Comma)?;
            } else {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(Identifiers { names })
    }

    fn parse_condition(&mut self) -> ParseResult<Condition> {
        self.expect(TokenKind::LParen)?;
        let left = self.parse_expression()?;
        let op = self.expect(TokenKind::BinaryOperator)?.text.to_string();
        let right = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;
        Ok(Condition { op, left, right })
    }

    fn parse_assignable(&mut self) -> ParseResult<Expression> {
        match self.current().kind {
            TokenKind::Boolean => self.parse_boolean(),
            TokenKind::String => self.parse_string(),
            _ => self.parse_expression(),
        }
    }

    fn parse_expression(&mut self) -> ParseResult<Expression> {
        self.enter()?;
        let mut expr = self.parse_term()?;
        while self.current().is_operator(&["+", "-"]) {
            let op = self.expect(TokenKind::BinaryOperator)?;
            let right = self.parse_term()?;
            expr = self.binary(op, expr, right)?;
        }
        self.depth -= 1;
        Ok(expr)
    }

    fn parse_term(&mut self) -> ParseResult<Expression> {
        let mut expr = self.parse_factor()?;
        while self.current().is_operator(&["*", "/"]) {
            let op = self.expect(TokenKind::BinaryOperator)?;
            let right = self.parse_factor()?;
            expr = self.binary(op, expr, right)?;
        }
        Ok(expr)
    }

    /// Joins two operands, rejecting chains that would make the tree deeper
    /// than the nesting limit allows at this point.
    fn binary(
        &self,
        op: Token<'a>,
        left: Expression,
        right: Expression,
    ) -> ParseResult<Expression> {
        let expr = Expression::binary(op.text, left, right);
        if self.depth + expr.height() > MAX_NESTING_DEPTH {
            return Err(self.too_deep(op));
        }
        Ok(expr)
    }

    fn parse_factor(&mut self) -> ParseResult<Expression> {
        let token = self.current();
        match token.kind {
            TokenKind::Number => {
                self.expect(TokenKind::Number)?;
                Ok(Expression::Number(token.text.to_string()))
            }
            TokenKind::Identifier if self.peek().kind == TokenKind::LParen => {
                Ok(Expression::Call(self.parse_function_call()?))
            }
            TokenKind::Identifier => Ok(Expression::Identifier(self.parse_identifier()?)),
            TokenKind::LParen => {
                self.expect(TokenKind::LParen)?;
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }
            TokenKind::Boolean => self.parse_boolean(),
            TokenKind::String => self.parse_string(),
            _ => Err(ParseError::ExpectedFactor {
                found_kind: token.kind,
                found: token.text.to_string(),
                line: token.span.line + 1,
                column: token.span.column + 1,
            }),
        }
    }

    fn parse_function_call(&mut self) -> ParseResult<FunctionCall> {
        let callee = self.parse_identifier()?;
        self.expect(TokenKind::LParen)?;
        let mut args = Vec::new();
        while self.current().kind != TokenKind::RParen {
            args.push(self.parse_assignable()?);
            if self.current().kind == TokenKind::Comma {
                self.expect(TokenKind::Comma)?;
            } else {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(FunctionCall { callee, args })
    }

    fn parse_boolean(&mut self) -> ParseResult<Expression> {
        let token = self.expect(TokenKind::Boolean)?;
        Ok(Expression::Boolean(token.text == "true"))
    }

    fn parse_string(&mut self) -> ParseResult<Expression> {
        let token = self.expect(TokenKind::String)?;
        Ok(Expression::String(token.text.to_string()))
    }

    fn parse_identifier(&mut self) -> ParseResult<Identifier> {
        let token = self.expect(TokenKind::Identifier)?;
        Ok(Identifier::new(token.text))
    }

    // Errors abort the whole parse, so depth is only unwound on success.
    fn enter(&mut self) -> ParseResult<()> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.too_deep(self.current()));
        }
        self.depth += 1;
        Ok(())
    }

    /// Consumes the current token if it has the `expected` kind.
    fn expect(&mut self, expected: TokenKind) -> ParseResult<Token<'a>> {
        let token = self.current();
        if token.kind != expected {
            return Err(self.unexpected(expected));
        }
        if self.position + 1 < self.tokens.len() {
            self.position += 1;
        }
        Ok(token)
    }

    fn current(&self) -> Token<'a> {
        self.token_at(self.position)
    }

    fn peek(&self) -> Token<'a> {
        self.token_at(self.position + 1)
    }

    fn token_at(&self, index: usize) -> Token<'a> {
        // `new` guarantees a trailing end-of-input token.
        let last = self.tokens.len() - 1;
        self.tokens[index.min(last)]
    }

    fn too_deep(&self, token: Token<'a>) -> ParseError {
        ParseError::NestingTooDeep {
            limit: MAX_NESTING_DEPTH,
            line: token.span.line + 1,
            column: token.span.column + 1,
        }
    }

    fn unexpected(&self, expected: TokenKind) -> ParseError {
        let token = self.current();
        ParseError::UnexpectedToken {
            expected,
            found_kind: token.kind,
            found: token.text.to_string(),
            line: token.span.line + 1,
            column: token.span.column + 1,
        }
    }
}

pub fn parse_tokens(tokens: Vec<Token<'_>>) -> ParseResult<Compound> {
    Parser::new(tokens).parse_program()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use indoc::indoc;

    fn parse(input: &str) -> ParseResult<Compound> {
        parse_tokens(tokenize(input).expect("tokenize should succeed"))
    }

    fn num(text: &str) -> Expression {
        Expression::Number(text.to_string())
    }

    #[test]
    fn parses_declaration_and_print() {
        let program = parse("{ var x = 1; print x; }").expect("parse failed");
        let expected = Compound {
            statements: vec![
                Statement::Declaration {
                    target: Identifier::new("x"),
                    value: num("1"),
                },
                Statement::Print(Expression::identifier("x")),
            ],
        };
        assert_eq!(program, expected);
    }

    #[test]
    fn parses_function_definition() {
        let program = parse("{ function f(a,b) { return a+b; } }").expect("parse failed");
        let expected = Compound {
            statements: vec![Statement::FunctionDefinition {
                name: Identifier::new("f"),
                params: Identifiers {
                    names: vec![Identifier::new("a"), Identifier::new("b")],
                },
                body: Compound {
                    statements: vec![Statement::Return(Expression::binary(
                        "+",
                        Expression::identifier("a"),
                        Expression::identifier("b"),
                    ))],
                },
            }],
        };
        assert_eq!(program, expected);
    }

    #[test]
    fn respects_operator_precedence_and_grouping() {
        let program = parse("{ x = 1 + 2 * 3 - (4 - 5) / 6; }").expect("parse failed");
        let expected = Expression::binary(
            "-",
            Expression::binary("+", num("1"), Expression::binary("*", num("2"), num("3"))),
            Expression::binary("/", Expression::binary("-", num("4"), num("5")), num("6")),
        );
        assert_eq!(
            program.statements,
            vec![Statement::Assignment {
                target: Identifier::new("x"),
                value: expected,
            }]
        );
    }

    #[test]
    fn distinguishes_calls_from_assignments() {
        let program = parse(indoc! {"
            {\r
              f(1, 'two', true);\r
              y = g() * 2;\r
            }"})
        .expect("parse failed");
        let expected = vec![
            Statement::Call(FunctionCall {
                callee: Identifier::new("f"),
                args: vec![
                    num("1"),
                    Expression::String("two".to_string()),
                    Expression::Boolean(true),
                ],
            }),
            Statement::Assignment {
                target: Identifier::new("y"),
                value: Expression::binary(
                    "*",
                    Expression::Call(FunctionCall {
                        callee: Identifier::new("g"),
                        args: vec![],
                    }),
                    num("2"),
                ),
            },
        ];
        assert_eq!(program.statements, expected);
    }

    #[test]
    fn parses_conditions_with_any_operator() {
        let program =
            parse("{ while (i <= n - 1) { i = i + 1; } if (a == b) { } }").expect("parse failed");
        let expected = vec![
            Statement::While {
                condition: Condition {
                    op: "<=".to_string(),
                    left: Expression::identifier("i"),
                    right: Expression::binary("-", Expression::identifier("n"), num("1")),
                },
                body: Compound {
                    statements: vec![Statement::Assignment {
                        target: Identifier::new("i"),
                        value: Expression::binary("+", Expression::identifier("i"), num("1")),
                    }],
                },
            },
            Statement::If {
                condition: Condition {
                    op: "==".to_string(),
                    left: Expression::identifier("a"),
                    right: Expression::identifier("b"),
                },
                body: Compound::default(),
            },
        ];
        assert_eq!(program.statements, expected);
    }

    #[test]
    fn assignable_literal_does_not_continue_into_arithmetic() {
        let err = parse("{ var x = true + 1; }").expect_err("expected parse failure");
        assert_eq!(
            err,
            ParseError::UnexpectedToken {
                expected: TokenKind::EndOfStatement,
                found_kind: TokenKind::BinaryOperator,
                found: "+".to_string(),
                line: 1,
                column: 16,
            }
        );
    }

    #[test]
    fn compound_operator_is_not_arithmetic() {
        let err = parse("{ x = a += 1; }").expect_err("expected parse failure");
        assert!(matches!(
            err,
            ParseError::UnexpectedToken {
                expected: TokenKind::EndOfStatement,
                ..
            }
        ));
    }

    #[test]
    fn reports_missing_statement_terminator() {
        let err = parse("{ var x = 1 }").expect_err("expected parse failure");
        assert_eq!(
            err,
            ParseError::UnexpectedToken {
                expected: TokenKind::EndOfStatement,
                found_kind: TokenKind::RBrace,
                found: "}".to_string(),
                line: 1,
                column: 13,
            }
        );
        assert_eq!(
            err.to_string(),
            "Expected EndOfStatement, but found \"}\" at line 1, column 13"
        );
    }

    #[test]
    fn reports_only_the_first_error() {
        let err = parse("{\r\n  var a = 1\r\n  var b = ;\r\n}").expect_err("expected parse failure");
        assert_eq!(
            err,
            ParseError::UnexpectedToken {
                expected: TokenKind::EndOfStatement,
                found_kind: TokenKind::Variable,
                found: "var".to_string(),
                line: 3,
                column: 3,
            }
        );
    }

    #[test]
    fn rejects_trailing_input() {
        let err = parse("{ } x").expect_err("expected parse failure");
        assert_eq!(
            err,
            ParseError::UnexpectedToken {
                expected: TokenKind::EndOfInput,
                found_kind: TokenKind::Identifier,
                found: "x".to_string(),
                line: 1,
                column: 5,
            }
        );
    }

    #[test]
    fn rejects_unclosed_block() {
        let err = parse("{ print 1;").expect_err("expected parse failure");
        assert!(matches!(
            err,
            ParseError::ExpectedStatement {
                found_kind: TokenKind::EndOfInput,
                ..
            }
        ));
        assert!(err.to_string().contains("found end of input"));
    }

    #[test]
    fn rejects_non_statement_tokens() {
        let err = parse("{ 42; }").expect_err("expected parse failure");
        assert_eq!(
            err,
            ParseError::ExpectedStatement {
                found_kind: TokenKind::Number,
                found: "42".to_string(),
                line: 1,
                column: 3,
            }
        );
    }

    #[test]
    fn rejects_missing_operand() {
        let err = parse("{ print 1 + ; }").expect_err("expected parse failure");
        assert!(matches!(err, ParseError::ExpectedFactor { column: 13, .. }));
    }

    #[test]
    fn rejects_parentheses_nested_too_deeply() {
        let err = parse(&format!("{{ print {}1; }}", "(".repeat(10_000)))
            .expect_err("expected parse failure");
        assert!(matches!(
            err,
            ParseError::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
                line: 1,
                ..
            }
        ));
        assert!(err.to_string().starts_with("Nesting deeper than 256 levels"));
    }

    #[test]
    fn rejects_blocks_nested_too_deeply() {
        let source = format!(
            "{{ {}{} }}",
            "while (a < b) { ".repeat(1_000),
            "}".repeat(1_000)
        );
        let err = parse(&source).expect_err("expected parse failure");
        assert!(matches!(err, ParseError::NestingTooDeep { line: 1, .. }));
    }

    #[test]
    fn rejects_operator_chains_taller_than_the_limit() {
        let err = parse(&format!("{{ print 1{}; }}", " + 1".repeat(5_000)))
            .expect_err("expected parse failure");
        assert!(matches!(err, ParseError::NestingTooDeep { .. }));

        let err = parse(&format!("{{ print f({}1{}); }}", "g(".repeat(1_000), ")".repeat(1_000)))
            .expect_err("expected parse failure");
        assert!(matches!(err, ParseError::NestingTooDeep { .. }));
    }

    #[test]
    fn accepts_nesting_within_the_limit() {
        let depth = 100;
        let source = format!("{{ print {}1{}; }}", "(".repeat(depth), ")".repeat(depth));
        assert_eq!(
            parse(&source).expect("parse failed").statements,
            vec![Statement::Print(num("1"))]
        );
        assert!(parse(&format!("{{ print 1{}; }}", " + 1".repeat(200))).is_ok());
    }

    #[test]
    fn tolerates_token_streams_without_end_marker() {
        let mut tokens = tokenize("{ }").expect("tokenize should succeed");
        tokens.pop();
        assert_eq!(parse_tokens(tokens), Ok(Compound::default()));

        let err = parse_tokens(Vec::new()).expect_err("empty stream is not a program");
        assert!(matches!(
            err,
            ParseError::UnexpectedToken {
                expected: TokenKind::LBrace,
                found_kind: TokenKind::EndOfInput,
                ..
            }
        ));
    }
}
