use crate::ast::*;
use crate::lexer::{self, LexError, Token};

pub struct Parser<'src> {
    source: &'src str,
    tokens: Vec<(Token, Span)>,
    pos: usize,
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("Parse error at token {position}: {message}")]
pub struct ParseError {
    pub code: &'static str,
    pub position: usize,
    pub span: Span,
    pub message: String,
}

type Result<T> = std::result::Result<T, ParseError>;

/// One entry of a parenthesised or bracketed field list before Go's
/// named/unnamed grouping rules are applied.
enum ListEntry {
    /// A bare identifier: a name if any entry is named, a type otherwise.
    Lone(String),
    Named(String, TypeExpr),
    Typed(TypeExpr),
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, tokens: Vec<(Token, Span)>) -> Self {
        Parser { source, tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn peek_span(&self) -> Span {
        self.tokens
            .get(self.pos)
            .map(|(_, s)| *s)
            .unwrap_or(Span { start: self.source.len(), end: self.source.len() })
    }

    fn advance(&mut self) -> Option<&Token> {
        let tok = self.tokens.get(self.pos).map(|(t, _)| t);
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<Span> {
        match self.peek() {
            Some(tok) if tok == expected => {
                let span = self.peek_span();
                self.advance();
                Ok(span)
            }
            Some(tok) => Err(self.error("GGT-P002", format!("expected {:?}, got {:?}", expected, tok))),
            None => Err(self.error("GGT-P002", format!("expected {:?}, got EOF", expected))),
        }
    }

    fn expect_ident(&mut self) -> Result<String> {
        match self.peek().cloned() {
            Some(Token::Ident(name)) => {
                self.advance();
                Ok(name)
            }
            Some(tok) => Err(self.error("GGT-P003", format!("expected identifier, got {:?}", tok))),
            None => Err(self.error("GGT-P003", "expected identifier, got EOF".into())),
        }
    }

    fn error(&self, code: &'static str, message: String) -> ParseError {
        ParseError {
            code,
            position: self.pos,
            span: self.peek_span(),
            message,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn token_at(&self, idx: usize) -> Option<&Token> {
        self.tokens.get(idx).map(|(t, _)| t)
    }

    fn prev_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].1
        } else {
            Span::UNKNOWN
        }
    }

    fn skip_semis(&mut self) {
        while self.eat(&Token::Semi) {}
    }

    /// A declaration ends at `;`, at EOF, or right before the `)` closing a group.
    fn expect_terminator(&mut self) -> Result<()> {
        match self.peek() {
            None | Some(Token::RParen) => Ok(()),
            Some(Token::Semi) => {
                self.advance();
                Ok(())
            }
            Some(tok) => Err(self.error("GGT-P002", format!("expected ';' or newline, got {:?}", tok))),
        }
    }

    // ---- Top-level parsing ----

    pub fn parse_file(&mut self) -> (SourceFile, Vec<ParseError>) {
        let mut errors: Vec<ParseError> = Vec::new();
        const MAX_ERRORS: usize = 20;

        self.skip_semis();
        let package = match self.parse_package_clause() {
            Ok(name) => name,
            Err(e) => {
                let empty = SourceFile {
                    package: Spanned::unknown(String::new()),
                    imports: Vec::new(),
                    decls: Vec::new(),
                };
                return (empty, vec![e]);
            }
        };

        let mut imports = Vec::new();
        let mut decls = Vec::new();

        while !self.at_end() {
            if errors.len() >= MAX_ERRORS {
                break;
            }
            self.skip_semis();
            if self.at_end() {
                break;
            }
            let result = match self.peek() {
                Some(Token::Import) => self.parse_import_decl().map(|specs| {
                    imports.extend(specs);
                    Vec::new()
                }),
                _ => self.parse_decl(),
            };
            match result {
                Ok(parsed) => decls.extend(parsed),
                Err(e) => {
                    let err_span = e.span;
                    errors.push(e);
                    let end_span = self.sync_to_decl_boundary();
                    decls.push(Decl::Error { span: err_span.merge(end_span) });
                }
            }
        }

        (SourceFile { package, imports, decls }, errors)
    }

    fn parse_package_clause(&mut self) -> Result<Spanned<String>> {
        if self.peek() != Some(&Token::Package) {
            return Err(self.error("GGT-P006", "expected 'package' clause at start of file".into()));
        }
        self.advance();
        let span = self.peek_span();
        let name = self.expect_ident()?;
        self.expect_terminator()?;
        Ok(Spanned::new(name, span))
    }

    /// Advance past tokens until the next top-level declaration keyword (or EOF).
    /// Returns the span of the last token consumed. Tracks nesting so keywords
    /// inside `{…}` and `(…)` are skipped.
    fn sync_to_decl_boundary(&mut self) -> Span {
        let mut depth: usize = 0;
        let mut last_span = self.peek_span();

        loop {
            match self.peek() {
                None => break,
                Some(Token::LBrace) | Some(Token::LParen) => depth += 1,
                Some(Token::RBrace) | Some(Token::RParen) => depth = depth.saturating_sub(1),
                Some(Token::Func | Token::Type | Token::Var | Token::Const | Token::Import)
                    if depth == 0 && matches!(self.token_at(self.pos.wrapping_sub(1)), Some(Token::Semi)) =>
                {
                    break;
                }
                _ => {}
            }
            last_span = self.peek_span();
            self.advance();
        }

        last_span
    }

    fn parse_decl(&mut self) -> Result<Vec<Decl>> {
        match self.peek() {
            Some(Token::Func) => Ok(vec![Decl::Func(self.parse_func_decl()?)]),
            Some(Token::Type) => self.parse_type_decl(),
            Some(Token::Var) | Some(Token::Const) => {
                self.skip_value_decl()?;
                Ok(Vec::new())
            }
            Some(tok) => Err(self.error("GGT-P001", format!("expected declaration, got {:?}", tok))),
            None => Err(self.error("GGT-P001", "expected declaration, got EOF".into())),
        }
    }

    // ---- Imports ----

    /// `import "fmt"` or `import ( alias "path"; ... )`
    fn parse_import_decl(&mut self) -> Result<Vec<ImportSpec>> {
        self.expect(&Token::Import)?;
        let mut specs = Vec::new();
        if self.eat(&Token::LParen) {
            loop {
                self.skip_semis();
                if self.peek() == Some(&Token::RParen) {
                    break;
                }
                specs.push(self.parse_import_spec()?);
                self.expect_terminator()?;
            }
            self.expect(&Token::RParen)?;
        } else {
            specs.push(self.parse_import_spec()?);
        }
        self.expect_terminator()?;
        Ok(specs)
    }

    fn parse_import_spec(&mut self) -> Result<ImportSpec> {
        let start = self.peek_span();
        let alias = match self.peek().cloned() {
            Some(Token::Ident(name)) => {
                self.advance();
                Some(name)
            }
            Some(Token::Dot) => {
                self.advance();
                Some(".".to_string())
            }
            _ => None,
        };
        match self.peek().cloned() {
            Some(Token::Str(path)) => {
                self.advance();
                Ok(ImportSpec { alias, path, span: start.merge(self.prev_span()) })
            }
            Some(tok) => Err(self.error("GGT-P007", format!("expected import path, got {:?}", tok))),
            None => Err(self.error("GGT-P007", "expected import path, got EOF".into())),
        }
    }

    // ---- Functions ----

    /// `func (recv) Name[T any](params) results { ... }`
    fn parse_func_decl(&mut self) -> Result<FuncDecl> {
        let start = self.peek_span();
        self.expect(&Token::Func)?;

        let recv = if self.peek() == Some(&Token::LParen) {
            let recv_span = self.peek_span();
            let mut fields = self.parse_parameters()?;
            if fields.len() != 1 {
                return Err(ParseError {
                    code: "GGT-P010",
                    position: self.pos,
                    span: recv_span.merge(self.prev_span()),
                    message: format!("method must have exactly one receiver, found {}", fields.len()),
                });
            }
            fields.pop()
        } else {
            None
        };

        let name = self.expect_ident()?;
        let type_params = if self.peek() == Some(&Token::LBracket) {
            self.parse_type_params()?
        } else {
            Vec::new()
        };
        let sig = self.parse_signature()?;

        let has_body = self.peek() == Some(&Token::LBrace);
        if has_body {
            self.skip_block()?;
        }
        let end = self.prev_span();
        self.expect_terminator()?;

        Ok(FuncDecl {
            name,
            recv,
            type_params,
            sig,
            has_body,
            span: start.merge(end),
        })
    }

    fn parse_signature(&mut self) -> Result<Signature> {
        let params = self.parse_parameters()?;
        let results = match self.peek() {
            Some(Token::LParen) => self.parse_parameters()?,
            Some(tok) if starts_type(tok) => vec![Field::unnamed(self.parse_type()?)],
            _ => Vec::new(),
        };
        Ok(Signature { params, results })
    }

    fn parse_parameters(&mut self) -> Result<Vec<Field>> {
        self.parse_field_list(Token::LParen, Token::RParen, Self::parse_param_type)
    }

    fn parse_type_params(&mut self) -> Result<Vec<Field>> {
        let start = self.peek_span();
        let fields = self.parse_field_list(Token::LBracket, Token::RBracket, Self::parse_constraint)?;
        if fields.is_empty() || fields.iter().any(|f| f.names.is_empty()) {
            return Err(ParseError {
                code: "GGT-P008",
                position: self.pos,
                span: start.merge(self.prev_span()),
                message: "type parameters need a constraint, e.g. [T any]".into(),
            });
        }
        Ok(fields)
    }

    /// Parse `open entry, entry, ... close` and group names the way go/parser
    /// does: `a, b int` shares one type, `int, string` is a list of unnamed
    /// types, and mixing the two forms is an error.
    fn parse_field_list(
        &mut self,
        open: Token,
        close: Token,
        parse_elem: fn(&mut Self) -> Result<TypeExpr>,
    ) -> Result<Vec<Field>> {
        let start = self.expect(&open)?;
        let mut entries = Vec::new();

        while self.peek() != Some(&close) {
            entries.push(self.parse_list_entry(&close, parse_elem)?);
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        self.expect(&close)?;

        if !entries.iter().any(|e| matches!(e, ListEntry::Named(..))) {
            return Ok(entries
                .into_iter()
                .map(|e| match e {
                    ListEntry::Lone(name) => Field::unnamed(TypeExpr::named(name)),
                    ListEntry::Typed(ty) | ListEntry::Named(_, ty) => Field::unnamed(ty),
                })
                .collect());
        }

        let mixed = || ParseError {
            code: "GGT-P005",
            position: self.pos,
            span: start.merge(self.prev_span()),
            message: "mixed named and unnamed parameters".into(),
        };
        let mut fields = Vec::new();
        let mut pending: Vec<String> = Vec::new();
        for entry in entries {
            match entry {
                ListEntry::Lone(name) => pending.push(name),
                ListEntry::Named(name, ty) => {
                    pending.push(name);
                    fields.push(Field { names: std::mem::take(&mut pending), ty, tag: None });
                }
                ListEntry::Typed(_) => return Err(mixed()),
            }
        }
        if !pending.is_empty() {
            return Err(mixed());
        }
        Ok(fields)
    }

    fn parse_list_entry(
        &mut self,
        close: &Token,
        parse_elem: fn(&mut Self) -> Result<TypeExpr>,
    ) -> Result<ListEntry> {
        let Some(Token::Ident(name)) = self.peek().cloned() else {
            return Ok(ListEntry::Typed(parse_elem(self)?));
        };
        match self.token_at(self.pos + 1).cloned() {
            Some(Token::Comma) => {
                self.advance();
                Ok(ListEntry::Lone(name))
            }
            Some(ref tok) if tok == close => {
                self.advance();
                Ok(ListEntry::Lone(name))
            }
            Some(Token::Dot) => Ok(ListEntry::Typed(parse_elem(self)?)),
            Some(Token::LBracket)
                if self.brackets_are_type_args(self.pos + 1, |t| {
                    matches!(t, Some(Token::Comma)) || t == Some(close)
                }) =>
            {
                Ok(ListEntry::Typed(parse_elem(self)?))
            }
            _ => {
                self.advance();
                Ok(ListEntry::Named(name, parse_elem(self)?))
            }
        }
    }

    /// With `[` at `open`, decide between `Name[Args]` (the bracket closes type
    /// arguments, followed by one of `follow`) and `name [N]T` / `name []T`.
    fn brackets_are_type_args(&self, open: usize, follow: impl Fn(Option<&Token>) -> bool) -> bool {
        if self.token_at(open + 1) == Some(&Token::RBracket) {
            return false;
        }
        let mut depth = 0usize;
        let mut idx = open;
        while let Some(tok) = self.token_at(idx) {
            match tok {
                Token::LBracket => depth += 1,
                Token::RBracket => {
                    depth -= 1;
                    if depth == 0 {
                        return follow(self.token_at(idx + 1));
                    }
                }
                _ => {}
            }
            idx += 1;
        }
        false
    }

    /// Skip a `{ ... }` body by brace matching.
    fn skip_block(&mut self) -> Result<()> {
        let start = self.expect(&Token::LBrace)?;
        let mut depth = 1usize;
        while depth > 0 {
            match self.advance() {
                Some(Token::LBrace) => depth += 1,
                Some(Token::RBrace) => depth -= 1,
                Some(_) => {}
                None => {
                    return Err(ParseError {
                        code: "GGT-P009",
                        position: self.pos,
                        span: start,
                        message: "unterminated block: missing '}'".into(),
                    });
                }
            }
        }
        Ok(())
    }

    // ---- Type declarations ----

    /// `type Name T` or `type ( Name T; ... )`
    fn parse_type_decl(&mut self) -> Result<Vec<Decl>> {
        self.expect(&Token::Type)?;
        let mut decls = Vec::new();
        if self.eat(&Token::LParen) {
            loop {
                self.skip_semis();
                if self.peek() == Some(&Token::RParen) {
                    break;
                }
                decls.push(Decl::Type(self.parse_type_spec()?));
                self.expect_terminator()?;
            }
            self.expect(&Token::RParen)?;
        } else {
            decls.push(Decl::Type(self.parse_type_spec()?));
        }
        self.expect_terminator()?;
        Ok(decls)
    }

    fn parse_type_spec(&mut self) -> Result<TypeSpec> {
        let start = self.peek_span();
        let name = self.expect_ident()?;
        let type_params = if self.is_type_param_list() {
            self.parse_type_params()?
        } else {
            Vec::new()
        };
        let alias = self.eat(&Token::Assign);
        let ty = self.parse_type()?;
        Ok(TypeSpec { name, type_params, alias, ty, span: start.merge(self.prev_span()) })
    }

    /// `type T[P any] ...` versus the array type in `type A [N]int`.
    ///
    /// `[P *C]` reads as the array length `P * C` unless the constraint is
    /// clearly a type (`[P *[]int]`) or a comma follows (`[P *C,]`), the
    /// same rule go/parser applies.
    fn is_type_param_list(&self) -> bool {
        if self.peek() != Some(&Token::LBracket) {
            return false;
        }
        if !matches!(self.token_at(self.pos + 1), Some(Token::Ident(_))) {
            return false;
        }
        match self.token_at(self.pos + 2) {
            Some(Token::Star) => {
                matches!(
                    self.token_at(self.pos + 3),
                    Some(
                        Token::LBracket
                            | Token::Map
                            | Token::Chan
                            | Token::Func
                            | Token::Struct
                            | Token::Interface
                            | Token::Arrow
                    )
                ) || self.bracket_has_top_level_comma()
            }
            Some(
                Token::Ident(_)
                | Token::Comma
                | Token::Tilde
                | Token::LBracket
                | Token::Map
                | Token::Chan
                | Token::Func
                | Token::Struct
                | Token::Interface
                | Token::Arrow,
            ) => true,
            _ => false,
        }
    }

    /// Whether the bracket opening at the current token holds a comma
    /// outside any nested brackets, parentheses or braces.
    fn bracket_has_top_level_comma(&self) -> bool {
        let mut depth = 0usize;
        let mut i = self.pos + 1;
        while let Some(tok) = self.token_at(i) {
            match tok {
                Token::LBracket | Token::LParen | Token::LBrace => depth += 1,
                Token::RBracket if depth == 0 => return false,
                Token::RBracket | Token::RParen | Token::RBrace => depth = depth.saturating_sub(1),
                Token::Comma if depth == 0 => return true,
                _ => {}
            }
            i += 1;
        }
        false
    }

    /// `var`/`const` declarations carry nothing the generator needs.
    fn skip_value_decl(&mut self) -> Result<()> {
        let start = self.peek_span();
        self.advance();
        let mut depth = 0usize;
        loop {
            match self.peek() {
                None if depth == 0 => return Ok(()),
                None => {
                    return Err(ParseError {
                        code: "GGT-P009",
                        position: self.pos,
                        span: start,
                        message: "unterminated declaration".into(),
                    });
                }
                Some(Token::Semi) if depth == 0 => {
                    self.advance();
                    return Ok(());
                }
                Some(Token::LParen | Token::LBrace | Token::LBracket) => depth += 1,
                Some(Token::RParen | Token::RBrace | Token::RBracket) => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.advance();
        }
    }

    // ---- Types ----

    fn parse_type(&mut self) -> Result<TypeExpr> {
        match self.peek() {
            Some(Token::Ident(_)) => self.parse_type_name(),
            Some(Token::Star) => {
                self.advance();
                Ok(TypeExpr::Pointer(Box::new(self.parse_type()?)))
            }
            Some(Token::LBracket) => {
                self.advance();
                if self.eat(&Token::RBracket) {
                    return Ok(TypeExpr::Slice(Box::new(self.parse_type()?)));
                }
                let len = self.parse_array_len()?;
                self.expect(&Token::RBracket)?;
                Ok(TypeExpr::Array { len, elem: Box::new(self.parse_type()?) })
            }
            Some(Token::Map) => {
                self.advance();
                self.expect(&Token::LBracket)?;
                let key = self.parse_type()?;
                self.expect(&Token::RBracket)?;
                let value = self.parse_type()?;
                Ok(TypeExpr::Map { key: Box::new(key), value: Box::new(value) })
            }
            Some(Token::Chan) => {
                self.advance();
                let dir = if self.eat(&Token::Arrow) { ChanDir::Send } else { ChanDir::Both };
                Ok(TypeExpr::Chan { dir, elem: Box::new(self.parse_type()?) })
            }
            Some(Token::Arrow) => {
                self.advance();
                self.expect(&Token::Chan)?;
                Ok(TypeExpr::Chan { dir: ChanDir::Recv, elem: Box::new(self.parse_type()?) })
            }
            Some(Token::Func) => {
                self.advance();
                Ok(TypeExpr::Func(self.parse_signature()?))
            }
            Some(Token::Struct) => self.parse_struct_type(),
            Some(Token::Interface) => self.parse_interface_type(),
            Some(Token::LParen) => {
                self.advance();
                let inner = self.parse_type()?;
                self.expect(&Token::RParen)?;
                Ok(TypeExpr::Paren(Box::new(inner)))
            }
            Some(tok) => Err(self.error("GGT-P004", format!("expected type, got {:?}", tok))),
            None => Err(self.error("GGT-P004", "expected type, got EOF".into())),
        }
    }

    /// `T`, `pkg.T`, `T[A, B]`
    fn parse_type_name(&mut self) -> Result<TypeExpr> {
        let first = self.expect_ident()?;
        let (pkg, name) = if self.eat(&Token::Dot) {
            (Some(first), self.expect_ident()?)
        } else {
            (None, first)
        };
        let mut args = Vec::new();
        if self.eat(&Token::LBracket) {
            loop {
                args.push(self.parse_type()?);
                if !self.eat(&Token::Comma) || self.peek() == Some(&Token::RBracket) {
                    break;
                }
            }
            self.expect(&Token::RBracket)?;
        }
        Ok(TypeExpr::Named { pkg, name, args })
    }

    /// Source text of an array length expression, up to the closing `]`.
    fn parse_array_len(&mut self) -> Result<String> {
        let start = self.peek_span().start;
        let mut depth = 0usize;
        loop {
            match self.peek() {
                None => return Err(self.error("GGT-P002", "expected ']', got EOF".into())),
                Some(Token::RBracket) if depth == 0 => break,
                Some(Token::LBracket | Token::LParen) => depth += 1,
                Some(Token::RBracket | Token::RParen) => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.advance();
        }
        let end = self.prev_span().end.max(start);
        Ok(self.source[start..end].trim().to_string())
    }

    /// Parameter type; the final parameter may be variadic.
    fn parse_param_type(&mut self) -> Result<TypeExpr> {
        if self.eat(&Token::Ellipsis) {
            return Ok(TypeExpr::Variadic(Box::new(self.parse_type()?)));
        }
        self.parse_type()
    }

    /// Type constraint: `any`, `~int | ~string`, `interface{ ... }`
    fn parse_constraint(&mut self) -> Result<TypeExpr> {
        let mut terms = Vec::new();
        loop {
            let term = if self.eat(&Token::Tilde) {
                TypeExpr::Tilde(Box::new(self.parse_type()?))
            } else {
                self.parse_type()?
            };
            terms.push(term);
            if !self.eat(&Token::Pipe) {
                break;
            }
        }
        if terms.len() == 1 {
            Ok(terms.remove(0))
        } else {
            Ok(TypeExpr::Union(terms))
        }
    }

    fn parse_struct_type(&mut self) -> Result<TypeExpr> {
        self.expect(&Token::Struct)?;
        self.expect(&Token::LBrace)?;
        let mut fields = Vec::new();
        loop {
            self.skip_semis();
            if self.peek() == Some(&Token::RBrace) {
                break;
            }
            fields.push(self.parse_struct_field()?);
            if self.peek() != Some(&Token::RBrace) {
                self.expect(&Token::Semi)?;
            }
        }
        self.expect(&Token::RBrace)?;
        Ok(TypeExpr::Struct(fields))
    }

    /// `a, b T "tag"`, or an embedded `T`, `*T`, `pkg.T`, `Base[T]`.
    fn parse_struct_field(&mut self) -> Result<Field> {
        let ends_embedded = |t: Option<&Token>| matches!(t, Some(Token::Semi | Token::RBrace | Token::Str(_)));

        let (names, ty) = match self.peek().cloned() {
            Some(Token::Star) => (Vec::new(), self.parse_type()?),
            Some(Token::Ident(name)) => match self.token_at(self.pos + 1).cloned() {
                Some(Token::Comma) => {
                    let mut names = vec![name];
                    self.advance();
                    while self.eat(&Token::Comma) {
                        names.push(self.expect_ident()?);
                    }
                    (names, self.parse_type()?)
                }
                Some(Token::Dot) => (Vec::new(), self.parse_type()?),
                ref next if ends_embedded(next.as_ref()) => (Vec::new(), self.parse_type()?),
                Some(Token::LBracket) if self.brackets_are_type_args(self.pos + 1, ends_embedded) => {
                    (Vec::new(), self.parse_type()?)
                }
                _ => {
                    self.advance();
                    (vec![name], self.parse_type()?)
                }
            },
            Some(tok) => return Err(self.error("GGT-P003", format!("expected field name, got {:?}", tok))),
            None => return Err(self.error("GGT-P003", "expected field name, got EOF".into())),
        };

        let tag = match self.peek().cloned() {
            Some(Token::Str(tag)) => {
                self.advance();
                Some(tag)
            }
            _ => None,
        };
        Ok(Field { names, ty, tag })
    }

    fn parse_interface_type(&mut self) -> Result<TypeExpr> {
        self.expect(&Token::Interface)?;
        self.expect(&Token::LBrace)?;
        let mut elems = Vec::new();
        loop {
            self.skip_semis();
            if self.peek() == Some(&Token::RBrace) {
                break;
            }
            let is_method = matches!(self.peek(), Some(Token::Ident(_)))
                && self.token_at(self.pos + 1) == Some(&Token::LParen);
            if is_method {
                let name = self.expect_ident()?;
                elems.push(InterfaceElem::Method { name, sig: self.parse_signature()? });
            } else {
                elems.push(InterfaceElem::Embed(self.parse_constraint()?));
            }
            if self.peek() != Some(&Token::RBrace) {
                self.expect(&Token::Semi)?;
            }
        }
        self.expect(&Token::RBrace)?;
        Ok(TypeExpr::Interface(elems))
    }
}

/// Tokens that can begin a type, used to tell a bare result type from a body.
fn starts_type(tok: &Token) -> bool {
    matches!(
        tok,
        Token::Ident(_)
            | Token::Star
            | Token::LBracket
            | Token::Map
            | Token::Chan
            | Token::Arrow
            | Token::Func
            | Token::Struct
            | Token::Interface
    )
}

/// Parse a token stream into a source file.
///
/// Returns the file (with `Decl::Error` nodes for declarations that failed)
/// and all errors encountered.
pub fn parse(source: &str, tokens: Vec<(Token, Span)>) -> (SourceFile, Vec<ParseError>) {
    let mut parser = Parser::new(source, tokens);
    parser.parse_file()
}

#[derive(Debug, thiserror::Error)]
pub enum SyntaxError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(
        "{} parse error(s), first: {}",
        .0.len(),
        .0.first().map(ToString::to_string).unwrap_or_default()
    )]
    Parse(Vec<ParseError>),
}

/// Lex and parse `source`; any error makes the whole unit unusable.
pub fn parse_source(source: &str) -> std::result::Result<SourceFile, SyntaxError> {
    let tokens = lexer::lex(source)?;
    let (file, errors) = parse(source, tokens);
    if errors.is_empty() { Ok(file) } else { Err(SyntaxError::Parse(errors)) }
}
