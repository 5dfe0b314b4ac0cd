//! Recursive-descent parser.
//!
//! Precedence, loosest first:
//!
//! ```text
//! assignment   x = e              (right)
//! comparison   == != < <= > >=    (left)
//! additive     + -                (left)
//! term         * /                (left)
//! power        ^                  (right)
//! unary        ! -
//! ```
//!
//! Unary minus is sugar for `0 - x`.

use lil_ir::{
    BinaryOp, ExprArena, ExprId, ExprKind, ExprRange, Param, ParamRange, Program, Span,
    StringInterner, TypeAnnot,
};
use lil_lexer::{lex, Token, TokenKind};
use lil_stack::ensure_sufficient_stack;
use tracing::debug;

use crate::ParseError;

/// Parse a complete program.
pub fn parse(source: &str, interner: &StringInterner) -> Result<Program, ParseError> {
    let tokens = lex(source, interner)?;
    debug!(tokens = tokens.len(), "lexed");
    let mut parser = Parser {
        tokens,
        pos: 0,
        arena: ExprArena::new(),
        fn_depth: 0,
    };
    let body = parser.parse_program()?;
    let span = Span::from_range(0..source.len());
    Ok(Program {
        arena: parser.arena,
        body,
        span,
    })
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    arena: ExprArena,
    /// Number of enclosing function bodies; declarations at depth > 0 are local.
    fn_depth: usize,
}

impl Parser {
    // -- Cursor --

    fn current(&self) -> Token {
        // `lex` always appends Eof, and `advance` never moves past it.
        self.tokens[self.pos]
    }

    fn peek_kind(&self) -> TokenKind {
        self.current().kind
    }

    fn lookahead(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.pos + n)
            .map_or(TokenKind::Eof, |t| t.kind)
    }

    fn advance(&mut self) -> Token {
        let token = self.current();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn previous_end(&self) -> u32 {
        self.pos
            .checked_sub(1)
            .map_or(0, |i| self.tokens[i].span.end)
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.peek_kind() == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<Token, ParseError> {
        if self.peek_kind() == kind {
            Ok(self.advance())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn expect_ident(&mut self) -> Result<(lil_ir::Name, Span), ParseError> {
        let token = self.current();
        match token.kind {
            TokenKind::Ident(name) => {
                self.advance();
                Ok((name, token.span))
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    fn unexpected(&self, expected: &'static str) -> ParseError {
        let token = self.current();
        ParseError::Unexpected {
            expected,
            found: token.kind,
            span: token.span,
        }
    }

    fn alloc(&mut self, kind: ExprKind, start: u32) -> ExprId {
        let span = Span::new(start, self.previous_end());
        self.arena.alloc(kind, span)
    }

    // -- Statements --

    fn parse_program(&mut self) -> Result<ExprRange, ParseError> {
        let mut stmts = Vec::new();
        while self.peek_kind() != TokenKind::Eof {
            stmts.push(self.parse_stmt()?);
        }
        Ok(self.arena.alloc_list(stmts))
    }

    fn parse_stmt(&mut self) -> Result<ExprId, ParseError> {
        ensure_sufficient_stack(|| {
            let stmt = match self.peek_kind() {
                TokenKind::Extern => self.parse_extern()?,
                TokenKind::Fn => {
                    let start = self.advance().span.start;
                    let ty_span = self.current().span;
                    let ret = self.parse_type()?;
                    if ret == TypeAnnot::Infer {
                        return Err(ParseError::VarInSignature { span: ty_span });
                    }
                    let (name, _) = self.expect_ident()?;
                    self.parse_function(start, ret, name)?
                }
                kind if kind.is_type() && matches!(self.lookahead(1), TokenKind::Ident(_)) => {
                    self.parse_declaration()?
                }
                TokenKind::Return => {
                    let start = self.advance().span.start;
                    let value = self.parse_expr()?;
                    self.alloc(ExprKind::Return(value), start)
                }
                _ => {
                    let start = self.current().span.start;
                    let expr = self.parse_expr()?;
                    self.alloc(ExprKind::ExprStmt(expr), start)
                }
            };
            self.eat(TokenKind::Semicolon);
            Ok(stmt)
        })
    }

    fn parse_type(&mut self) -> Result<TypeAnnot, ParseError> {
        let ty = match self.peek_kind() {
            TokenKind::IntType => TypeAnnot::Int,
            TokenKind::DoubleType => TypeAnnot::Double,
            TokenKind::BoolType => TypeAnnot::Bool,
            TokenKind::VoidType => TypeAnnot::Void,
            TokenKind::Var => TypeAnnot::Infer,
            _ => return Err(self.unexpected("type")),
        };
        self.advance();
        Ok(ty)
    }

    /// `type name = init`, `type name`, or `type name(params) { body }`.
    fn parse_declaration(&mut self) -> Result<ExprId, ParseError> {
        let start = self.current().span.start;
        let ty_span = self.current().span;
        let ty = self.parse_type()?;
        let (name, _) = self.expect_ident()?;

        if self.peek_kind() == TokenKind::LParen {
            if ty == TypeAnnot::Infer {
                return Err(ParseError::VarInSignature { span: ty_span });
            }
            return self.parse_function(start, ty, name);
        }

        let init = if self.eat(TokenKind::Assign) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        if ty == TypeAnnot::Infer && init.is_none() {
            return Err(ParseError::VarWithoutInit {
                span: Span::new(start, self.previous_end()),
            });
        }
        Ok(self.alloc(ExprKind::VarDef { ty, name, init }, start))
    }

    fn parse_function(
        &mut self,
        start: u32,
        ret: TypeAnnot,
        name: lil_ir::Name,
    ) -> Result<ExprId, ParseError> {
        let params = self.parse_params()?;
        let local = self.fn_depth > 0;

        self.fn_depth += 1;
        let body = self.parse_block();
        self.fn_depth -= 1;
        let body = body?;

        Ok(self.alloc(
            ExprKind::Function {
                ret,
                name,
                params,
                body,
                local,
            },
            start,
        ))
    }

    fn parse_extern(&mut self) -> Result<ExprId, ParseError> {
        let start = self.advance().span.start;
        let ty_span = self.current().span;
        let ret = self.parse_type()?;
        if ret == TypeAnnot::Infer {
            return Err(ParseError::VarInSignature { span: ty_span });
        }
        let (name, _) = self.expect_ident()?;
        let params = self.parse_params()?;
        Ok(self.alloc(ExprKind::Extern { ret, name, params }, start))
    }

    fn parse_params(&mut self) -> Result<ParamRange, ParseError> {
        self.expect(TokenKind::LParen, "`(`")?;
        let mut params = Vec::new();
        if self.peek_kind() != TokenKind::RParen {
            loop {
                let ty_span = self.current().span;
                let ty = self.parse_type()?;
                if ty == TypeAnnot::Infer {
                    return Err(ParseError::VarInSignature { span: ty_span });
                }
                let (name, name_span) = self.expect_ident()?;
                params.push(Param {
                    ty,
                    name,
                    span: ty_span.to(name_span),
                });
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "`)`")?;
        Ok(self.arena.alloc_params(params))
    }

    fn parse_block(&mut self) -> Result<ExprId, ParseError> {
        let start = self.expect(TokenKind::LBrace, "`{`")?.span.start;
        let mut stmts = Vec::new();
        while !matches!(self.peek_kind(), TokenKind::RBrace | TokenKind::Eof) {
            stmts.push(self.parse_stmt()?);
        }
        self.expect(TokenKind::RBrace, "`}`")?;
        let range = self.arena.alloc_list(stmts);
        Ok(self.alloc(ExprKind::Block(range), start))
    }

    // -- Expressions --

    fn parse_expr(&mut self) -> Result<ExprId, ParseError> {
        ensure_sufficient_stack(|| {
            if let (TokenKind::Ident(target), TokenKind::Assign) =
                (self.peek_kind(), self.lookahead(1))
            {
                let start = self.advance().span.start;
                self.advance();
                let value = self.parse_expr()?;
                return Ok(self.alloc(ExprKind::Assign { target, value }, start));
            }
            self.parse_comparison()
        })
    }

    fn parse_comparison(&mut self) -> Result<ExprId, ParseError> {
        let start = self.current().span.start;
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::EqEq => BinaryOp::Eq,
                TokenKind::NotEq => BinaryOp::NotEq,
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::LtEq => BinaryOp::LtEq,
                TokenKind::Gt => BinaryOp::Gt,
                TokenKind::GtEq => BinaryOp::GtEq,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_additive()?;
            left = self.alloc(ExprKind::Binary { op, left, right }, start);
        }
    }

    fn parse_additive(&mut self) -> Result<ExprId, ParseError> {
        let start = self.current().span.start;
        let mut left = self.parse_term()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_term()?;
            left = self.alloc(ExprKind::Binary { op, left, right }, start);
        }
    }

    fn parse_term(&mut self) -> Result<ExprId, ParseError> {
        let start = self.current().span.start;
        let mut left = self.parse_power()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_power()?;
            left = self.alloc(ExprKind::Binary { op, left, right }, start);
        }
    }

    fn parse_power(&mut self) -> Result<ExprId, ParseError> {
        let start = self.current().span.start;
        let base = self.parse_unary()?;
        if !self.eat(TokenKind::Caret) {
            return Ok(base);
        }
        let exponent = ensure_sufficient_stack(|| self.parse_power())?;
        Ok(self.alloc(
            ExprKind::Binary {
                op: BinaryOp::Pow,
                left: base,
                right: exponent,
            },
            start,
        ))
    }

    fn parse_unary(&mut self) -> Result<ExprId, ParseError> {
        ensure_sufficient_stack(|| {
            let token = self.current();
            match token.kind {
                TokenKind::Bang => {
                    self.advance();
                    let operand = self.parse_unary()?;
                    Ok(self.alloc(ExprKind::Not(operand), token.span.start))
                }
                TokenKind::Minus => {
                    self.advance();
                    let zero = self.arena.alloc(ExprKind::Int(0), token.span);
                    let operand = self.parse_unary()?;
                    Ok(self.alloc(
                        ExprKind::Binary {
                            op: BinaryOp::Sub,
                            left: zero,
                            right: operand,
                        },
                        token.span.start,
                    ))
                }
                _ => self.parse_primary(),
            }
        })
    }

    fn parse_primary(&mut self) -> Result<ExprId, ParseError> {
        let token = self.current();
        let start = token.span.start;
        match token.kind {
            TokenKind::Int(value) => {
                self.advance();
                Ok(self.alloc(ExprKind::Int(value), start))
            }
            TokenKind::Double(value) => {
                self.advance();
                Ok(self.alloc(ExprKind::Double(value), start))
            }
            TokenKind::True | TokenKind::False => {
                self.advance();
                Ok(self.alloc(ExprKind::Bool(token.kind == TokenKind::True), start))
            }
            TokenKind::Ident(name) => {
                self.advance();
                if self.eat(TokenKind::LParen) {
                    let args = self.parse_args()?;
                    return Ok(self.alloc(ExprKind::Call { func: name, args }, start));
                }
                Ok(self.alloc(ExprKind::Ident(name), start))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen, "`)`")?;
                Ok(inner)
            }
            TokenKind::LBrace => self.parse_block(),
            TokenKind::If => self.parse_if(),
            TokenKind::While => {
                self.advance();
                let cond = self.parse_expr()?;
                let body = self.parse_block()?;
                Ok(self.alloc(ExprKind::While { cond, body }, start))
            }
            _ => Err(self.unexpected("expression")),
        }
    }

    /// Arguments after the opening `(`.
    fn parse_args(&mut self) -> Result<ExprRange, ParseError> {
        let mut args = Vec::new();
        if self.peek_kind() != TokenKind::RParen {
            loop {
                args.push(self.parse_expr()?);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "`)`")?;
        Ok(self.arena.alloc_list(args))
    }

    /// `if cond then { .. } else { .. }`, with `else if` chains.
    fn parse_if(&mut self) -> Result<ExprId, ParseError> {
        let start = self.expect(TokenKind::If, "`if`")?.span.start;
        let cond = self.parse_expr()?;
        self.expect(TokenKind::Then, "`then`")?;
        let then_branch = self.parse_block()?;
        self.expect(TokenKind::Else, "`else`")?;
        let else_branch = if self.peek_kind() == TokenKind::If {
            ensure_sufficient_stack(|| self.parse_if())?
        } else {
            self.parse_block()?
        };
        Ok(self.alloc(
            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            },
            start,
        ))
    }
}
