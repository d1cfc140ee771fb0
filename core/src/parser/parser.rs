//! Recursive-descent, precedence-climbing parser.
//!
//! One function per precedence level, loosest first. Left-associative levels
//! loop; right-associative levels (`=`, `?:`, `??`, `**`) recurse into
//! themselves for the right operand.

use bumpalo::Bump;

use super::error::{ParseError, ParseErrorKind};
use super::parsed_expr::{Argument, ArrayElement, CastType, Expr, ParsedExpr};
use crate::api::ParseOptions;
use crate::lexer::{Token, TokenKind, TokenStream, tokenize};
use crate::stack::ensure_sufficient_stack;

use TokenKind::*;

type ParseResult<'a> = Result<&'a Expr<'a>, ParseError>;

/// Parse a complete expression with default options.
pub fn parse<'a>(arena: &'a Bump, source: &'a str) -> Result<ParsedExpr<'a>, ParseError> {
    parse_with_options(arena, source, &ParseOptions::default())
}

/// Parse a complete expression; trailing tokens are an error.
pub fn parse_with_options<'a>(
    arena: &'a Bump,
    source: &'a str,
    options: &ParseOptions,
) -> Result<ParsedExpr<'a>, ParseError> {
    let tokens = TokenStream::new(tokenize(source)?);
    let expr = parse_token_stream(arena, tokens, options)?;
    Ok(ParsedExpr { expr, source })
}

/// Parse one expression from an already tokenized stream, which must be
/// consumed entirely.
pub fn parse_token_stream<'a>(
    arena: &'a Bump,
    tokens: TokenStream<'a>,
    options: &ParseOptions,
) -> ParseResult<'a> {
    let mut parser = Parser {
        arena,
        tokens,
        depth: 0,
        max_depth: options.max_depth,
    };
    let expr = parser.parse_expression()?;
    if !parser.tokens.is_at_end() {
        return Err(parser.tokens.error_expected("end of input"));
    }
    Ok(expr)
}

struct Parser<'a> {
    arena: &'a Bump,
    tokens: TokenStream<'a>,
    depth: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    fn alloc(&self, expr: Expr<'a>) -> &'a Expr<'a> {
        self.arena.alloc(expr)
    }

    /// Count one more nesting level, failing once `max_depth` is reached.
    fn descend(&mut self) -> Result<(), ParseError> {
        if self.depth >= self.max_depth {
            let token = self.tokens.current();
            return Err(ParseError::new(
                ParseErrorKind::MaxDepthExceeded {
                    found: token.text.to_string(),
                    max_depth: self.max_depth,
                },
                token.location,
            ));
        }
        self.depth += 1;
        Ok(())
    }

    /// Run `f` one nesting level deeper.
    fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        self.descend()?;
        let result = ensure_sufficient_stack(|| f(self));
        self.depth -= 1;
        result
    }

    /// Run a loop that builds a left-nested tree. Each node the loop wraps
    /// around the previous one counts as a level, so the evaluator never
    /// recurses deeper than the parser allowed.
    fn left_nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        let outer = self.depth;
        let result = f(self);
        self.depth = outer;
        result
    }

    fn parse_expression(&mut self) -> ParseResult<'a> {
        self.nested(|p| p.parse_assignment())
    }

    fn parse_assignment(&mut self) -> ParseResult<'a> {
        let target = self.parse_word_or()?;
        if let Some(op) = self.tokens.match_any(&[Assign]) {
            let value = self.nested(|p| p.parse_assignment())?;
            return Ok(self.alloc(Expr::Assign { target, op, value }));
        }
        Ok(target)
    }

    /// Left-associative chain of `ops` over operands parsed by `next`.
    fn binary_chain(
        &mut self,
        ops: &[TokenKind],
        next: fn(&mut Self) -> ParseResult<'a>,
    ) -> ParseResult<'a> {
        self.left_nested(|p| {
            let mut left = next(p)?;
            while let Some(op) = p.tokens.match_any(ops) {
                p.descend()?;
                let right = next(p)?;
                left = p.alloc(Expr::Binary { left, op, right });
            }
            Ok(left)
        })
    }

    fn parse_word_or(&mut self) -> ParseResult<'a> {
        self.binary_chain(&[Or], Self::parse_xor)
    }

    fn parse_xor(&mut self) -> ParseResult<'a> {
        self.binary_chain(&[Xor], Self::parse_word_and)
    }

    fn parse_word_and(&mut self) -> ParseResult<'a> {
        self.binary_chain(&[And], Self::parse_ternary)
    }

    fn parse_ternary(&mut self) -> ParseResult<'a> {
        let condition = self.parse_coalesce()?;
        let Some(question) = self.tokens.match_any(&[Question]) else {
            return Ok(condition);
        };
        let then_branch = self.nested(|p| p.parse_ternary())?;
        self.tokens.expect(Colon, "':'")?;
        let else_branch = self.nested(|p| p.parse_ternary())?;
        Ok(self.alloc(Expr::Ternary {
            condition,
            question,
            then_branch,
            else_branch,
        }))
    }

    fn parse_coalesce(&mut self) -> ParseResult<'a> {
        let left = self.parse_symbol_or()?;
        if let Some(op) = self.tokens.match_any(&[Coalesce]) {
            let right = self.nested(|p| p.parse_coalesce())?;
            return Ok(self.alloc(Expr::Binary { left, op, right }));
        }
        Ok(left)
    }

    fn parse_symbol_or(&mut self) -> ParseResult<'a> {
        self.binary_chain(&[OrOr], Self::parse_symbol_and)
    }

    fn parse_symbol_and(&mut self) -> ParseResult<'a> {
        self.binary_chain(&[AndAnd], Self::parse_equality)
    }

    fn parse_equality(&mut self) -> ParseResult<'a> {
        self.binary_chain(
            &[Equal, NotEqual, Identical, NotIdentical, Spaceship],
            Self::parse_relational,
        )
    }

    fn parse_relational(&mut self) -> ParseResult<'a> {
        self.binary_chain(
            &[Less, LessEqual, Greater, GreaterEqual],
            Self::parse_concatenation,
        )
    }

    fn parse_concatenation(&mut self) -> ParseResult<'a> {
        self.binary_chain(&[Dot], Self::parse_additive)
    }

    fn parse_additive(&mut self) -> ParseResult<'a> {
        self.binary_chain(&[Plus, Minus], Self::parse_multiplicative)
    }

    fn parse_multiplicative(&mut self) -> ParseResult<'a> {
        self.binary_chain(&[Star, Slash, Percent], Self::parse_power)
    }

    fn parse_power(&mut self) -> ParseResult<'a> {
        let left = self.parse_unary()?;
        if let Some(op) = self.tokens.match_any(&[StarStar]) {
            let right = self.nested(|p| p.parse_power())?;
            return Ok(self.alloc(Expr::Binary { left, op, right }));
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> ParseResult<'a> {
        if let Some(op) = self.tokens.match_any(&[Minus, Plus, Bang]) {
            let operand = self.nested(|p| p.parse_unary())?;
            return Ok(self.alloc(Expr::Unary { op, operand }));
        }
        if let Some(op) = self.tokens.match_any(&[Cast]) {
            let ty = CastType::from_cast_text(op.text).ok_or_else(|| {
                ParseError::new(
                    ParseErrorKind::UnexpectedToken {
                        found: op.text.to_string(),
                        expected: "cast type".to_string(),
                    },
                    op.location,
                )
            })?;
            let operand = self.nested(|p| p.parse_unary())?;
            return Ok(self.alloc(Expr::Cast { op, ty, operand }));
        }
        self.parse_instanceof()
    }

    fn parse_instanceof(&mut self) -> ParseResult<'a> {
        self.left_nested(|p| {
            let mut value = p.parse_postfix()?;
            while let Some(op) = p.tokens.match_any(&[InstanceOf]) {
                p.descend()?;
                let class = match p.tokens.match_any(&[Identifier]) {
                    Some(name) => p.alloc(Expr::Literal(name)),
                    None => p.parse_postfix()?,
                };
                value = p.alloc(Expr::InstanceOf { value, op, class });
            }
            Ok(value)
        })
    }

    fn parse_postfix(&mut self) -> ParseResult<'a> {
        self.left_nested(|p| p.parse_postfix_chain())
    }

    fn parse_postfix_chain(&mut self) -> ParseResult<'a> {
        let mut expr = self.parse_primary()?;
        loop {
            if [DoubleColon, Arrow, LBracket, LParen]
                .iter()
                .any(|&kind| self.tokens.check(kind))
            {
                self.descend()?;
            }
            if let Some(op) = self.tokens.match_any(&[DoubleColon]) {
                let name = self.parse_member_name(op, true)?;
                expr = self.member(expr, op, name, true)?;
            } else if let Some(op) = self.tokens.match_any(&[Arrow]) {
                let name = self.parse_member_name(op, false)?;
                expr = self.member(expr, op, name, false)?;
            } else if let Some(bracket) = self.tokens.match_any(&[LBracket]) {
                let offset = self.parse_expression()?;
                self.tokens.expect(RBracket, "']'")?;
                expr = self.alloc(Expr::ArrayAccess {
                    target: expr,
                    bracket,
                    offset,
                });
            } else if let Some(paren) = self.tokens.match_any(&[LParen]) {
                let args = self.parse_arguments()?;
                expr = self.alloc(Expr::FunctionCall {
                    name: expr,
                    paren,
                    args,
                });
            } else {
                return Ok(expr);
            }
        }
    }

    /// Name after `->` or `::`: a bare word, or (instance access only) a
    /// `$variable` or `{expression}` computed at evaluation.
    fn parse_member_name(&mut self, op: Token<'a>, is_static: bool) -> ParseResult<'a> {
        let token = self.tokens.current();
        if token.kind.is_word() {
            self.tokens.advance();
            return Ok(self.alloc(Expr::Literal(token)));
        }
        if !is_static {
            if let Some(var) = self.tokens.match_any(&[Variable]) {
                return Ok(self.alloc(Expr::Variable(var)));
            }
            if self.tokens.match_any(&[LBrace]).is_some() {
                let name = self.parse_expression()?;
                self.tokens.expect(RBrace, "'}'")?;
                return Ok(name);
            }
        }
        Err(self
            .tokens
            .error_expected(&format!("identifier after '{}'", op.text)))
    }

    /// Property access, or a method call when an argument list follows.
    fn member(
        &mut self,
        target: &'a Expr<'a>,
        op: Token<'a>,
        name: &'a Expr<'a>,
        is_static: bool,
    ) -> ParseResult<'a> {
        if self.tokens.match_any(&[LParen]).is_some() {
            let args = self.parse_arguments()?;
            return Ok(self.alloc(Expr::MethodCall {
                target,
                op,
                name,
                args,
                is_static,
            }));
        }
        Ok(self.alloc(Expr::PropertyAccess {
            target,
            op,
            name,
            is_static,
        }))
    }

    /// Arguments after an opening `(`, through the closing `)`.
    fn parse_arguments(&mut self) -> Result<&'a [Argument<'a>], ParseError> {
        let mut args = Vec::new();
        while !self.tokens.check(RParen) {
            let by_ref = self.tokens.match_any(&[Ampersand]).is_some();
            let value = self.parse_expression()?;
            args.push(Argument { value, by_ref });
            if self.tokens.match_any(&[Comma]).is_none() {
                break;
            }
        }
        self.tokens.expect(RParen, "',' or ')'")?;
        Ok(self.arena.alloc_slice_copy(&args))
    }

    fn parse_primary(&mut self) -> ParseResult<'a> {
        let token = self.tokens.current();
        match token.kind {
            Integer | Float | String | Bool | Null => {
                self.tokens.advance();
                Ok(self.alloc(Expr::Literal(token)))
            }
            Variable => {
                self.tokens.advance();
                Ok(self.alloc(Expr::Variable(token)))
            }
            LParen => {
                self.tokens.advance();
                let expr = self.parse_expression()?;
                self.tokens.expect(RParen, "')'")?;
                Ok(expr)
            }
            Quote => {
                self.tokens.advance();
                self.parse_interpolation(token)
            }
            LBracket => {
                self.tokens.advance();
                let elements = self.parse_array_elements(RBracket, "',' or ']'")?;
                Ok(self.alloc(Expr::Array {
                    open: token,
                    elements,
                }))
            }
            Array => {
                self.tokens.advance();
                self.tokens.expect(LParen, "'(' after 'array'")?;
                let elements = self.parse_array_elements(RParen, "',' or ')'")?;
                Ok(self.alloc(Expr::Array {
                    open: token,
                    elements,
                }))
            }
            Identifier => {
                // A bare name is only meaningful as a callee or a class.
                self.tokens.advance();
                if self.tokens.check(LParen) || self.tokens.check(DoubleColon) {
                    Ok(self.alloc(Expr::Literal(token)))
                } else {
                    Err(self.tokens.error_expected(&format!(
                        "'(' or '::' after name '{}'",
                        token.text
                    )))
                }
            }
            _ => Err(self.tokens.error_expected("expression")),
        }
    }

    /// Elements through the closing token. The opening token is consumed.
    fn parse_array_elements(
        &mut self,
        close: TokenKind,
        expected: &str,
    ) -> Result<&'a [ArrayElement<'a>], ParseError> {
        let mut elements = Vec::new();
        while !self.tokens.check(close) {
            let first = self.parse_expression()?;
            let element = if self.tokens.match_any(&[DoubleArrow]).is_some() {
                ArrayElement {
                    key: Some(first),
                    value: self.parse_expression()?,
                }
            } else {
                ArrayElement {
                    key: None,
                    value: first,
                }
            };
            elements.push(element);
            if self.tokens.match_any(&[Comma]).is_none() {
                break;
            }
        }
        self.tokens.expect(close, expected)?;
        Ok(self.arena.alloc_slice_copy(&elements))
    }

    /// Parts of an interpolated string, after the opening quote.
    fn parse_interpolation(&mut self, open: Token<'a>) -> ParseResult<'a> {
        let mut parts = Vec::new();
        loop {
            let token = self.tokens.current();
            match token.kind {
                Quote => {
                    self.tokens.advance();
                    break;
                }
                StringFragment => {
                    self.tokens.advance();
                    parts.push(self.alloc(Expr::Literal(token)));
                }
                Variable => {
                    self.tokens.advance();
                    let part = self.parse_simple_interpolation(token)?;
                    parts.push(part);
                }
                LBrace => {
                    self.tokens.advance();
                    let part = self.parse_expression()?;
                    self.tokens.expect(RBrace, "'}'")?;
                    parts.push(part);
                }
                _ => return Err(self.tokens.error_expected("closing '\"'")),
            }
        }
        Ok(self.alloc(Expr::StringInterpolation {
            open,
            parts: self.arena.alloc_slice_copy(&parts),
        }))
    }

    /// `$name`, `$name[offset]` or `$name->prop` inside a double-quoted string.
    fn parse_simple_interpolation(&mut self, var: Token<'a>) -> ParseResult<'a> {
        let target = self.alloc(Expr::Variable(var));

        if let Some(bracket) = self.tokens.match_any(&[LBracket]) {
            let token = self.tokens.advance();
            let offset = match token.kind {
                Minus => {
                    let digits = self.tokens.expect(Integer, "integer")?;
                    let operand = self.alloc(Expr::Literal(digits));
                    self.alloc(Expr::Unary { op: token, operand })
                }
                Integer | StringFragment => self.alloc(Expr::Literal(token)),
                Variable => self.alloc(Expr::Variable(token)),
                _ => {
                    return Err(ParseError::new(
                        ParseErrorKind::UnexpectedToken {
                            found: token.text.to_string(),
                            expected: "array offset".to_string(),
                        },
                        token.location,
                    ));
                }
            };
            self.tokens.expect(RBracket, "']'")?;
            return Ok(self.alloc(Expr::ArrayAccess {
                target,
                bracket,
                offset,
            }));
        }

        if let Some(op) = self.tokens.match_any(&[Arrow]) {
            let name = self.tokens.expect(Identifier, "property name")?;
            let name = self.alloc(Expr::Literal(name));
            return Ok(self.alloc(Expr::PropertyAccess {
                target,
                op,
                name,
                is_static: false,
            }));
        }

        Ok(target)
    }
}
