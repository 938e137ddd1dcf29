//! Token source (component A). A hand-rolled scanner built on `regex`,
//! in the spirit of `RegexMatcher`/`SkipMatcher` (see `matcher.rs`): patterns
//! are tried in a fixed priority order and the scanner advances past
//! whichever one matches, mirroring the priority PLY gives function rules
//! over string rules in the program this crate's semantics are drawn from.

use regex::Regex;

use crate::error::LexicalError;
use crate::symbols::SymbolTable;
use crate::token::{Attr, Location, Token, TokenKind};

const MAX_INT: i64 = 32767;
const MAX_FLOAT: f64 = 117_549_436.0;
const MAX_STR_LEN: usize = 64;

lazy_static! {
    static ref RE_FLOATCONST: Regex = Regex::new(r"\A-?\d+\.\d+").unwrap();
    static ref RE_INTCONST: Regex = Regex::new(r"\A\d+").unwrap();
    static ref RE_STR: Regex = Regex::new(r"\A'([^\\\n]|(\\.))*?'").unwrap();
    static ref RE_ID: Regex = Regex::new(r"\A[A-Za-z_][A-Za-z_0-9]*").unwrap();
    static ref RE_COMMENT: Regex = Regex::new(r"\A//[^\n]*").unwrap();
    static ref RE_NEWLINES: Regex = Regex::new(r"\A\n+").unwrap();
    static ref RE_WHITESPACE: Regex = Regex::new(r"\A[ \t]+").unwrap();
    static ref RE_PLUSEQ: Regex = Regex::new(r"\A\+=").unwrap();
    static ref RE_AND: Regex = Regex::new(r"\A&&").unwrap();
    static ref RE_EQ: Regex = Regex::new(r"\A=").unwrap();
    static ref RE_COMMA: Regex = Regex::new(r"\A,").unwrap();
    static ref RE_SEMICOLON: Regex = Regex::new(r"\A;").unwrap();
    static ref RE_OPPAR: Regex = Regex::new(r"\A\(").unwrap();
    static ref RE_CLPAR: Regex = Regex::new(r"\A\)").unwrap();
    static ref RE_OPBRA: Regex = Regex::new(r"\A\{").unwrap();
    static ref RE_CLBRA: Regex = Regex::new(r"\A\}").unwrap();
    static ref RE_SUM: Regex = Regex::new(r"\A\+").unwrap();
    static ref RE_MINORTHAN: Regex = Regex::new(r"\A<").unwrap();
}

fn reserved_word(lowered: &str) -> Option<TokenKind> {
    use TokenKind::*;
    Some(match lowered {
        "boolean" => Boolean,
        "else" => Else,
        "float" => Float,
        "function" => Function,
        "if" => If,
        "int" => Int,
        "let" => Let,
        "read" => Read,
        "return" => Return,
        "string" => StringKw,
        "void" => Void,
        "write" => Write,
        "false" => False,
        "true" => True,
        _ => return None,
    })
}

/// Scans one MyJS source file into a stream of [`Token`]s, interning
/// identifiers into the shared [`SymbolTable`] as it goes and routing
/// bounds/illegal-character violations through [`LexicalError`].
pub struct Lexer<'a> {
    text: &'a str,
    pos: usize,
    line: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0, line: 1 }
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn advance(&mut self, n: usize) {
        self.line += self.text[self.pos..self.pos + n].matches('\n').count() as u32;
        self.pos += n;
    }

    /// Skips whitespace, newlines and `//` comments. Returns the number of
    /// bytes skipped (0 means the cursor sits on real content or EOF).
    fn skip_trivia(&mut self) -> usize {
        let mut skipped = 0;
        loop {
            let rest = self.rest();
            if let Some(m) = RE_WHITESPACE.find(rest) {
                self.advance(m.end());
                skipped += m.end();
            } else if let Some(m) = RE_NEWLINES.find(rest) {
                self.advance(m.end());
                skipped += m.end();
            } else if let Some(m) = RE_COMMENT.find(rest) {
                self.advance(m.end());
                skipped += m.end();
            } else {
                break;
            }
        }
        skipped
    }

    /// Returns the next token, interning identifiers via `symbols` and
    /// recording lexical errors via `errors`. Bounds-violating literals are
    /// dropped silently from the returned stream (but recorded as errors);
    /// this method loops internally until it has a token to return.
    pub fn next_token(
        &mut self,
        symbols: &mut SymbolTable,
        errors: &mut Vec<LexicalError>,
    ) -> Token {
        loop {
            self.skip_trivia();
            let rest = self.rest();
            if rest.is_empty() {
                return Token::eof(self.line);
            }
            let line = self.line;

            if let Some(m) = RE_FLOATCONST.find(rest) {
                let text = m.as_str();
                self.advance(m.end());
                let value: f64 = text.parse().unwrap_or(f64::NAN);
                if value.is_nan() {
                    errors.push(LexicalError::new(line, format!("Invalid real value: {}", text)));
                    continue;
                }
                if value > MAX_FLOAT {
                    errors.push(LexicalError::new(
                        line,
                        format!("Real number out of range: {}", value),
                    ));
                    continue;
                }
                return Token {
                    kind: TokenKind::FloatConst,
                    attr: Attr::Float(value),
                    location: Location { line },
                };
            }

            if let Some(m) = RE_INTCONST.find(rest) {
                let text = m.as_str();
                self.advance(m.end());
                match text.parse::<i64>() {
                    Ok(value) if value <= MAX_INT => {
                        return Token {
                            kind: TokenKind::IntConst,
                            attr: Attr::Int(value as i32),
                            location: Location { line },
                        };
                    }
                    Ok(value) => {
                        errors.push(LexicalError::new(
                            line,
                            format!("Integer out of range (max 32767): {}", value),
                        ));
                        continue;
                    }
                    Err(_) => {
                        errors.push(LexicalError::new(line, format!("Invalid integer value: {}", text)));
                        continue;
                    }
                }
            }

            if let Some(m) = RE_STR.find(rest) {
                let raw = m.as_str();
                self.advance(m.end());
                let inner = &raw[1..raw.len() - 1];
                if inner.len() > MAX_STR_LEN {
                    let preview: String = inner.chars().take(20).collect();
                    errors.push(LexicalError::new(
                        line,
                        format!("String too long (max 64 chars): '{}...'", preview),
                    ));
                    continue;
                }
                return Token {
                    kind: TokenKind::Str,
                    attr: Attr::Str(inner.to_string()),
                    location: Location { line },
                };
            }

            if let Some(m) = RE_ID.find(rest) {
                let text = m.as_str();
                self.advance(m.end());
                let lowered = text.to_lowercase();
                if let Some(kind) = reserved_word(&lowered) {
                    return Token {
                        kind,
                        attr: Attr::None,
                        location: Location { line },
                    };
                }
                let pos = symbols.intern(text);
                return Token {
                    kind: TokenKind::Id,
                    attr: Attr::Handle(pos),
                    location: Location { line },
                };
            }

            macro_rules! literal_op {
                ($re:expr, $kind:expr) => {
                    if let Some(m) = $re.find(rest) {
                        self.advance(m.end());
                        return Token {
                            kind: $kind,
                            attr: Attr::None,
                            location: Location { line },
                        };
                    }
                };
            }
            literal_op!(RE_PLUSEQ, TokenKind::PlusEq);
            literal_op!(RE_AND, TokenKind::And);
            literal_op!(RE_EQ, TokenKind::Eq);
            literal_op!(RE_COMMA, TokenKind::Comma);
            literal_op!(RE_SEMICOLON, TokenKind::Semicolon);
            literal_op!(RE_OPPAR, TokenKind::OpPar);
            literal_op!(RE_CLPAR, TokenKind::ClPar);
            literal_op!(RE_OPBRA, TokenKind::OpBra);
            literal_op!(RE_CLBRA, TokenKind::ClBra);
            literal_op!(RE_SUM, TokenKind::Sum);
            literal_op!(RE_MINORTHAN, TokenKind::MinorThan);

            let bad = rest.chars().next().unwrap();
            errors.push(LexicalError::new(line, format!("Illegal character: '{}'", bad)));
            self.advance(bad.len_utf8());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scans_keywords_and_identifiers() {
        let mut symbols = SymbolTable::new();
        let mut errors = Vec::new();
        let mut lexer = Lexer::new("let x = 3;");
        let t1 = lexer.next_token(&mut symbols, &mut errors);
        assert_eq!(t1.kind, TokenKind::Let);
        let t2 = lexer.next_token(&mut symbols, &mut errors);
        assert_eq!(t2.kind, TokenKind::Id);
        assert!(matches!(t2.attr, Attr::Handle(_)));
        let t3 = lexer.next_token(&mut symbols, &mut errors);
        assert_eq!(t3.kind, TokenKind::Eq);
        let t4 = lexer.next_token(&mut symbols, &mut errors);
        assert_eq!(t4.kind, TokenKind::IntConst);
        assert_eq!(t4.attr, Attr::Int(3));
        let t5 = lexer.next_token(&mut symbols, &mut errors);
        assert_eq!(t5.kind, TokenKind::Semicolon);
        let t6 = lexer.next_token(&mut symbols, &mut errors);
        assert_eq!(t6.kind, TokenKind::Eof);
        assert!(errors.is_empty());
    }

    #[test]
    fn drops_out_of_range_integer_and_records_error() {
        let mut symbols = SymbolTable::new();
        let mut errors = Vec::new();
        let mut lexer = Lexer::new("40000 1");
        let t = lexer.next_token(&mut symbols, &mut errors);
        assert_eq!(t.kind, TokenKind::IntConst);
        assert_eq!(t.attr, Attr::Int(1));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn reinterns_same_identifier_to_same_handle() {
        let mut symbols = SymbolTable::new();
        let mut errors = Vec::new();
        let mut lexer = Lexer::new("foo foo");
        let t1 = lexer.next_token(&mut symbols, &mut errors);
        let t2 = lexer.next_token(&mut symbols, &mut errors);
        assert_eq!(t1.attr.as_handle(), t2.attr.as_handle());
    }

    #[test]
    fn skips_comments_and_counts_lines() {
        let mut symbols = SymbolTable::new();
        let mut errors = Vec::new();
        let mut lexer = Lexer::new("// a comment\nlet");
        let t = lexer.next_token(&mut symbols, &mut errors);
        assert_eq!(t.kind, TokenKind::Let);
        assert_eq!(t.location.line, 2);
    }
}
