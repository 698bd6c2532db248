//! Pull-based lexical analysis.
//!
//! [`Lexer::lex`] returns the next token on demand, skipping whitespace and
//! comments transparently and updating the lexer's "current token" slot
//! (spec §4.2). A [`Lexer::checkpoint`]/[`Lexer::restore`] pair lets the
//! parser rewind across a token it over-read (used for the top-level
//! declaration-vs-function-definition lookahead, spec §4.3).

mod keywords;
mod token;

pub use keywords::lookup_keyword;
pub use token::{Keyword, Punctuator, Token, TokenKind};

use crate::source::{Diagnostic, Loc, SourceManager, Span};

/// A saved lexer position, opaque to callers besides [`Lexer::restore`].
#[derive(Debug, Clone, Copy)]
pub struct Checkpoint {
    pos: Loc,
}

pub struct Lexer<'a> {
    source: &'a mut SourceManager,
    current: Token,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a mut SourceManager) -> Self {
        let mut lexer = Self {
            source,
            current: Token::new(TokenKind::Eof, Span::new(0, 0)),
        };
        lexer.current = lexer.scan();
        lexer
    }

    /// The most recently produced token, without consuming another.
    pub fn current(&self) -> &Token {
        &self.current
    }

    /// Consume and return the current token, scanning the next one into
    /// its place.
    pub fn lex(&mut self) -> Token {
        let token = self.current.clone();
        self.current = self.scan();
        token
    }

    /// Forward a diagnostic to the underlying source manager, honouring
    /// whichever instant/queued mode it was constructed with. Exposed so
    /// the parser can report errors without needing its own handle to the
    /// source manager (the lexer already owns the only one).
    pub fn raise(&mut self, diagnostic: Diagnostic) {
        self.source.raise(diagnostic);
    }

    /// Map a byte location to `(line, column)`, for diagnostics raised
    /// with just a span and no direct source manager access.
    pub fn loc_to_line_col(&self, loc: Loc) -> (usize, usize) {
        self.source.loc_to_line_col(loc)
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos: self.source.pos(),
        }
    }

    /// Rewind the underlying cursor to `point` and re-derive the current
    /// token, undoing any `lex()` calls made since the checkpoint.
    pub fn restore(&mut self, point: Checkpoint) {
        self.source.set_pos(point.pos);
        self.current = self.scan();
    }

    fn scan(&mut self) -> Token {
        self.eat_whitespace_and_comments();

        let start = self.source.pos();
        let Some(byte) = self.source.peek() else {
            return Token::new(TokenKind::Eof, Span::new(start, start));
        };

        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'_' => self.scan_alphanumeric(start),
            b'0'..=b'9' => self.scan_number(start),
            b'"' => self.scan_string(start),
            _ => self.scan_operator(start),
        }
    }

    fn eat_whitespace_and_comments(&mut self) {
        loop {
            match self.source.peek() {
                Some(b) if b.is_ascii_whitespace() => {
                    self.source.get();
                }
                Some(b'/') if self.source.peek_at(1) == Some(b'/') => {
                    while !matches!(self.source.peek(), Some(b'\n') | None) {
                        self.source.get();
                    }
                }
                Some(b'/') if self.source.peek_at(1) == Some(b'*') => {
                    self.eat_block_comment();
                }
                _ => return,
            }
        }
    }

    /// Block comments do not nest; a nested `/*` inside one emits a warning
    /// but is consumed along with everything up to the next `*/`.
    fn eat_block_comment(&mut self) {
        let start = self.source.pos();
        self.source.get();
        self.source.get();

        loop {
            match (self.source.peek(), self.source.peek_at(1)) {
                (Some(b'*'), Some(b'/')) => {
                    self.source.get();
                    self.source.get();
                    return;
                }
                (Some(b'/'), Some(b'*')) => {
                    self.source.raise(Diagnostic::warning(
                        self.source.pos(),
                        "nested '/*' inside block comment is not supported",
                    ));
                    self.source.get();
                }
                (Some(_), _) => {
                    self.source.get();
                }
                (None, _) => {
                    self.source.raise(Diagnostic::error(
                        start,
                        "unterminated block comment",
                    ));
                    return;
                }
            }
        }
    }

    fn scan_alphanumeric(&mut self, start: Loc) -> Token {
        let mut text = String::new();
        while let Some(b) = self.source.peek() {
            if b.is_ascii_alphanumeric() || b == b'_' {
                text.push(b as char);
                self.source.get();
            } else {
                break;
            }
        }

        if text.ends_with('_') {
            self.source.raise(Diagnostic::warning(
                start,
                format!("identifier '{text}' has a trailing underscore"),
            ));
        }

        let end = self.source.pos();
        let span = Span::new(start, end);

        if let Some(keyword) = lookup_keyword(&text) {
            return Token::new(TokenKind::Keyword(keyword), span);
        }
        if text == "true" {
            return Token::new(TokenKind::Boolean(true), span);
        }
        if text == "false" {
            return Token::new(TokenKind::Boolean(false), span);
        }
        Token::new(TokenKind::Identifier(text), span)
    }

    fn scan_number(&mut self, start: Loc) -> Token {
        if self.source.peek() == Some(b'0')
            && matches!(self.source.peek_at(1), Some(b'x') | Some(b'X'))
        {
            return self.scan_hex(start);
        }

        let mut digits = String::new();
        while let Some(b) = self.source.peek() {
            if b.is_ascii_digit() {
                digits.push(b as char);
                self.source.get();
            } else {
                break;
            }
        }

        if self.source.peek() == Some(b'.') && self.source.peek_at(1).is_some_and(|b| b.is_ascii_digit()) {
            self.source.get();
            let mut frac = String::new();
            while let Some(b) = self.source.peek() {
                if b.is_ascii_digit() {
                    frac.push(b as char);
                    self.source.get();
                } else {
                    break;
                }
            }
            let scale = 10f64.powi(frac.len() as i32);
            let int_part: f64 = digits.parse().unwrap_or(0.0);
            let frac_part: f64 = frac.parse().unwrap_or(0.0);
            let value = int_part + frac_part / scale;
            return Token::new(TokenKind::Double(value), Span::new(start, self.source.pos()));
        }

        let value = digits.parse::<i64>().unwrap_or(i64::MAX) as i32;
        Token::new(TokenKind::Integer(value), Span::new(start, self.source.pos()))
    }

    fn scan_hex(&mut self, start: Loc) -> Token {
        self.source.get();
        self.source.get();

        let mut digits = String::new();
        while let Some(b) = self.source.peek() {
            if b.is_ascii_hexdigit() {
                digits.push(b as char);
                self.source.get();
            } else {
                break;
            }
        }

        if digits.is_empty() {
            self.source
                .raise(Diagnostic::error(start, "expected hex digits after '0x'"));
            return Token::new(
                TokenKind::Error("malformed hex literal".into()),
                Span::new(start, self.source.pos()),
            );
        }

        let value = u32::from_str_radix(&digits, 16).unwrap_or(u32::MAX) as i32;
        Token::new(TokenKind::Integer(value), Span::new(start, self.source.pos()))
    }

    fn scan_string(&mut self, start: Loc) -> Token {
        self.source.get();
        let mut value = String::new();

        loop {
            match self.source.get() {
                None => {
                    self.source
                        .raise(Diagnostic::error(start, "unterminated string literal"));
                    return Token::new(
                        TokenKind::Error("unterminated string literal".into()),
                        Span::new(start, self.source.pos()),
                    );
                }
                Some(b'"') => break,
                Some(b'\\') => {
                    let escaped = self.source.get();
                    match escaped {
                        Some(b'a') => value.push('\u{07}'),
                        Some(b'b') => value.push('\u{08}'),
                        Some(b'f') => value.push('\u{0C}'),
                        Some(b'n') => value.push('\n'),
                        Some(b'r') => value.push('\r'),
                        Some(b't') => value.push('\t'),
                        Some(b'v') => value.push('\u{0B}'),
                        Some(b'?') => value.push('?'),
                        Some(b'0') => value.push('\0'),
                        Some(b'\\') => value.push('\\'),
                        Some(b'\'') => value.push('\''),
                        Some(b'"') => value.push('"'),
                        Some(other) => {
                            value.push('\\');
                            value.push(other as char);
                        }
                        None => {
                            self.source.raise(Diagnostic::error(
                                start,
                                "unterminated string literal",
                            ));
                            break;
                        }
                    }
                }
                Some(b) => value.push(b as char),
            }
        }

        Token::new(TokenKind::String(value), Span::new(start, self.source.pos()))
    }

    /// Brackets, comma and semicolon are always single-character and never
    /// absorbed into an operator run.
    fn scan_operator(&mut self, start: Loc) -> Token {
        use Punctuator::*;

        let first = self.source.peek().unwrap();
        let bracket = match first {
            b'(' => Some(LParen),
            b')' => Some(RParen),
            b'{' => Some(LBrace),
            b'}' => Some(RBrace),
            b'[' => Some(LBracket),
            b']' => Some(RBracket),
            b',' => Some(Comma),
            b';' => Some(Semicolon),
            _ => None,
        };
        if let Some(punct) = bracket {
            self.source.get();
            return Token::new(TokenKind::Punctuator(punct), Span::new(start, self.source.pos()));
        }

        if !is_infix_char(first) {
            self.source.get();
            self.source.raise(Diagnostic::error(
                start,
                format!("unexpected character '{}'", first as char),
            ));
            return Token::new(
                TokenKind::Error(format!("unexpected character '{}'", first as char)),
                Span::new(start, self.source.pos()),
            );
        }

        self.scan_infix_run(start)
    }

    /// Greedily consume a maximal run of operator-punctuation characters,
    /// then classify it: an exact match against one of the nine built-in
    /// operator spellings becomes that `Punctuator`; anything else — of
    /// any length, including one character — is a user-definable infix
    /// symbol (spec §4.2/§4.3). This means disambiguating two adjacent
    /// built-ins from one longer custom symbol (`a+ +b` vs. a hypothetical
    /// `a++b`) is the source's job, not the lexer's: it always takes the
    /// longest run.
    fn scan_infix_run(&mut self, start: Loc) -> Token {
        use Punctuator::*;

        let mut run = String::new();
        while let Some(b) = self.source.peek() {
            if is_infix_char(b) {
                run.push(b as char);
                self.source.get();
            } else {
                break;
            }
        }

        let span = Span::new(start, self.source.pos());
        let builtin = match run.as_str() {
            "==" => Some(Eq),
            "!=" => Some(NotEq),
            "<=" => Some(LessEq),
            ">=" => Some(GreaterEq),
            "<<" => Some(Shl),
            ">>" => Some(Shr),
            "&&" => Some(AndAnd),
            "||" => Some(OrOr),
            "=" => Some(Assign),
            "!" => Some(Bang),
            "<" => Some(Less),
            ">" => Some(Greater),
            "+" => Some(Plus),
            "-" => Some(Minus),
            "*" => Some(Star),
            "/" => Some(Slash),
            "%" => Some(Percent),
            "&" => Some(Amp),
            "|" => Some(Pipe),
            "^" => Some(Caret),
            "~" => Some(Tilde),
            _ => None,
        };

        match builtin {
            Some(punct) => Token::new(TokenKind::Punctuator(punct), span),
            None => Token::new(TokenKind::InfixOp(run), span),
        }
    }
}

fn is_infix_char(b: u8) -> bool {
    matches!(
        b,
        b'+' | b'-'
            | b'*'
            | b'/'
            | b'%'
            | b'='
            | b'<'
            | b'>'
            | b'!'
            | b'&'
            | b'|'
            | b'^'
            | b'~'
            | b':'
            | b'?'
            | b'.'
            | b'@'
            | b'$'
            | b'\\'
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::DiagnosticMode;

    fn lex_all(text: &str) -> Vec<TokenKind> {
        let mut source = SourceManager::from_bytes("t".into(), text.as_bytes().to_vec(), DiagnosticMode::Queued);
        let mut lexer = Lexer::new(&mut source);
        let mut out = vec![];
        loop {
            let token = lexer.lex();
            let is_eof = token.is_eof();
            out.push(token.kind);
            if is_eof {
                break;
            }
        }
        out
    }

    #[test]
    fn lexes_integer_and_keyword() {
        let kinds = lex_all("int x = 42;");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Keyword(Keyword::Int),
                TokenKind::Identifier("x".into()),
                TokenKind::Punctuator(Punctuator::Assign),
                TokenKind::Integer(42),
                TokenKind::Punctuator(Punctuator::Semicolon),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lexes_hex_integer_max() {
        let kinds = lex_all("0x7FFFFFFF");
        assert_eq!(kinds, vec![TokenKind::Integer(i32::MAX), TokenKind::Eof]);
    }

    #[test]
    fn lexes_double_literal() {
        let kinds = lex_all("3.25");
        assert_eq!(kinds, vec![TokenKind::Double(3.25), TokenKind::Eof]);
    }

    #[test]
    fn lexes_two_char_operators() {
        let kinds = lex_all("== != <= >= && || << >>");
        use Punctuator::*;
        assert_eq!(
            kinds,
            vec![
                TokenKind::Punctuator(Eq),
                TokenKind::Punctuator(NotEq),
                TokenKind::Punctuator(LessEq),
                TokenKind::Punctuator(GreaterEq),
                TokenKind::Punctuator(AndAnd),
                TokenKind::Punctuator(OrOr),
                TokenKind::Punctuator(Shl),
                TokenKind::Punctuator(Shr),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lexes_string_escapes_and_unknown_escape_fallback() {
        let kinds = lex_all(r#""a\nb\q""#);
        assert_eq!(kinds, vec![TokenKind::String("a\nb\\q".into()), TokenKind::Eof]);
    }

    #[test]
    fn lexes_custom_infix_symbol() {
        let kinds = lex_all("a <-> b");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Identifier("a".into()),
                TokenKind::InfixOp("<->".into()),
                TokenKind::Identifier("b".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn skips_line_and_block_comments() {
        let kinds = lex_all("1 // comment\n/* block */ 2");
        assert_eq!(kinds, vec![TokenKind::Integer(1), TokenKind::Integer(2), TokenKind::Eof]);
    }

    #[test]
    fn checkpoint_and_restore_rewind_the_cursor() {
        let mut source = SourceManager::from_bytes(
            "t".into(),
            "foo (".as_bytes().to_vec(),
            DiagnosticMode::Queued,
        );
        let mut lexer = Lexer::new(&mut source);
        let checkpoint = lexer.checkpoint();
        let first = lexer.lex();
        assert_eq!(first.kind, TokenKind::Identifier("foo".into()));
        lexer.restore(checkpoint);
        let replayed = lexer.lex();
        assert_eq!(replayed.kind, TokenKind::Identifier("foo".into()));
    }
}
