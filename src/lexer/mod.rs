use logos::Logos;

use crate::ast::Span;

#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(skip r"[ \t\r\f]+")]
#[logos(skip(r"//[^\n]*", allow_greedy = true))]
pub enum Token {
    // Keywords the declaration parser cares about. Statement keywords
    // (`return`, `if`, ...) only appear inside skipped bodies and lex as idents.
    #[token("package")]
    Package,
    #[token("import")]
    Import,
    #[token("func")]
    Func,
    #[token("type")]
    Type,
    #[token("var")]
    Var,
    #[token("const")]
    Const,
    #[token("struct")]
    Struct,
    #[token("interface")]
    Interface,
    #[token("map")]
    Map,
    #[token("chan")]
    Chan,

    // Punctuation
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,
    #[token(".")]
    Dot,
    #[token("...")]
    Ellipsis,
    #[token("*")]
    Star,
    #[token("~")]
    Tilde,
    #[token("|", priority = 5)]
    Pipe,
    #[token("<-")]
    Arrow,
    #[token("=", priority = 5)]
    Assign,

    // Everything else Go calls an operator. `*` and `~` are kept out of the
    // class so `**T` and `|~T` split into separate tokens.
    #[regex(r"[-+/%&|^<>=!:]+", |lex| lex.slice().to_string())]
    #[token("*=", |lex| lex.slice().to_string())]
    Op(String),

    // Literals
    #[regex(r"[0-9][0-9a-zA-Z_]*(\.[0-9a-zA-Z_]*)?")]
    #[regex(r"\.[0-9][0-9a-zA-Z_]*")]
    Number,

    #[regex(r#""([^"\\\n]|\\.)*""#, |lex| lex.slice().to_string())]
    #[regex(r"`[^`]*`", |lex| lex.slice().to_string())]
    Str(String),

    #[regex(r"'([^'\\\n]|\\.)*'")]
    Rune,

    #[regex(r"[\p{L}_][\p{L}\p{Nd}_]*", |lex| lex.slice().to_string())]
    Ident(String),

    /// Block comment; `true` when it spans a line break.
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/", |lex| lex.slice().contains('\n'))]
    BlockComment(bool),

    #[token("\n")]
    Newline,
}

impl Token {
    /// Tokens after which a line break terminates the statement.
    fn ends_statement(&self) -> bool {
        match self {
            Token::Ident(_)
            | Token::Number
            | Token::Str(_)
            | Token::Rune
            | Token::RParen
            | Token::RBracket
            | Token::RBrace => true,
            Token::Op(op) => op == "++" || op == "--",
            _ => false,
        }
    }
}

const BOM: char = '\u{feff}';

/// Lex Go source into a stream of tokens with positions.
///
/// Line breaks are resolved here: a newline becomes `;` when the previous
/// token could end a statement and is dropped otherwise, so the parser never
/// sees `Token::Newline` or `Token::BlockComment`.
pub fn lex(source: &str) -> Result<Vec<(Token, Span)>, LexError> {
    let mut lexer = Token::lexer(source);
    if source.starts_with(BOM) {
        lexer.bump(BOM.len_utf8());
    }
    let mut tokens: Vec<(Token, Span)> = Vec::new();

    while let Some(result) = lexer.next() {
        let range = lexer.span();
        let span = Span { start: range.start, end: range.end };
        match result {
            Ok(Token::BlockComment(false)) => {}
            Ok(Token::Newline) | Ok(Token::BlockComment(true)) => insert_semi(&mut tokens, span),
            Ok(token) => tokens.push((token, span)),
            Err(()) => {
                return Err(LexError {
                    position: range.start,
                    snippet: source[range].to_string(),
                });
            }
        }
    }

    let eof = Span { start: source.len(), end: source.len() };
    insert_semi(&mut tokens, eof);
    Ok(tokens)
}

fn insert_semi(tokens: &mut Vec<(Token, Span)>, at: Span) {
    if tokens.last().is_some_and(|(t, _)| t.ends_statement()) {
        tokens.push((Token::Semi, Span { start: at.start, end: at.start }));
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Lex error at position {position}: unexpected '{snippet}'")]
pub struct LexError {
    pub position: usize,
    pub snippet: String,
}
