//! Native signature notation.
//!
//! Natives are declared with a small type notation:
//!
//! ```text
//! sig  := atom ('->' sig)?
//! atom := ident ('(' sig (',' sig)* ')')?
//!       | '(' sig ')'
//! ```
//!
//! Arrows associate to the right. A leading `'` on an identifier is accepted
//! and dropped, so `'a -> 'a` reads the same as `a -> a`. Whether a bare
//! identifier is a constructor or a type variable is decided when the
//! signature is lowered, not here.

use crate::error::SignatureFault;
use std::fmt;
use std::str::FromStr;

/// Parsed native signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Signature {
    /// A bare identifier: a type variable or a nullary constructor.
    Name(String),

    /// A constructor applied to arguments: `list(a)`.
    App(String, Vec<Signature>),

    /// A function: `from -> to`.
    Arrow(Box<Signature>, Box<Signature>),
}

impl Signature {
    /// Parse signature text.
    ///
    /// ```
    /// use rill_typecheck::Signature;
    ///
    /// let sig = Signature::parse("a -> a -> list(a)").unwrap();
    /// assert_eq!(sig.to_string(), "a -> a -> list(a)");
    ///
    /// let sig = Signature::parse("(number -> text) -> step(number)").unwrap();
    /// assert_eq!(sig.params().len(), 1);
    /// ```
    pub fn parse(text: &str) -> Result<Signature, SignatureFault> {
        let tokens = tokenize(text)?;
        let mut parser = Parser {
            tokens,
            pos: 0,
            end: text.len(),
        };

        let sig = parser.parse_sig()?;
        match parser.peek() {
            None => Ok(sig),
            Some(token) => Err(SignatureFault::Syntax {
                message: format!("unexpected {}", token.kind),
                offset: token.offset,
            }),
        }
    }

    /// `Name` shorthand.
    pub fn name(name: impl Into<String>) -> Signature {
        Signature::Name(name.into())
    }

    /// `App` shorthand.
    pub fn app(name: impl Into<String>, args: Vec<Signature>) -> Signature {
        Signature::App(name.into(), args)
    }

    /// `Arrow` shorthand.
    pub fn arrow(from: Signature, to: Signature) -> Signature {
        Signature::Arrow(Box::new(from), Box::new(to))
    }

    /// Parameters along the right spine of arrows.
    pub fn params(&self) -> Vec<&Signature> {
        let mut params = Vec::new();
        let mut cur = self;
        while let Signature::Arrow(from, to) = cur {
            params.push(from.as_ref());
            cur = to;
        }
        params
    }
}

impl FromStr for Signature {
    type Err = SignatureFault;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Signature::parse(s)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signature::Name(name) => f.write_str(name),
            Signature::App(name, args) => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            Signature::Arrow(from, to) => match from.as_ref() {
                Signature::Arrow(..) => write!(f, "({}) -> {}", from, to),
                _ => write!(f, "{} -> {}", from, to),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TokenKind {
    Ident(String),
    Arrow,
    LParen,
    RParen,
    Comma,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Ident(name) => write!(f, "identifier `{}`", name),
            TokenKind::Arrow => write!(f, "`->`"),
            TokenKind::LParen => write!(f, "`(`"),
            TokenKind::RParen => write!(f, "`)`"),
            TokenKind::Comma => write!(f, "`,`"),
        }
    }
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    offset: usize,
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn tokenize(text: &str) -> Result<Vec<Token>, SignatureFault> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        let kind = match c {
            c if c.is_whitespace() => continue,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ',' => TokenKind::Comma,
            '-' => match chars.next() {
                Some((_, '>')) => TokenKind::Arrow,
                _ => {
                    return Err(SignatureFault::Syntax {
                        message: "expected `->`".to_string(),
                        offset,
                    });
                }
            },
            '\'' | 'a'..='z' | 'A'..='Z' | '_' => {
                let mut name = String::new();
                if c != '\'' {
                    name.push(c);
                }
                while let Some(&(_, next)) = chars.peek() {
                    if !is_ident_continue(next) {
                        break;
                    }
                    name.push(next);
                    chars.next();
                }
                if !name.starts_with(is_ident_start) {
                    return Err(SignatureFault::Syntax {
                        message: "expected identifier after `'`".to_string(),
                        offset,
                    });
                }
                TokenKind::Ident(name)
            }
            other => {
                return Err(SignatureFault::Syntax {
                    message: format!("unexpected character `{}`", other),
                    offset,
                });
            }
        };
        tokens.push(Token { kind, offset });
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Offset reported for errors at end of input
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.peek().is_some_and(|token| &token.kind == kind)
    }

    fn error_here(&self, expected: &str) -> SignatureFault {
        match self.peek() {
            Some(token) => SignatureFault::Syntax {
                message: format!("expected {}, found {}", expected, token.kind),
                offset: token.offset,
            },
            None => SignatureFault::Syntax {
                message: format!("expected {}, found end of input", expected),
                offset: self.end,
            },
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<(), SignatureFault> {
        if self.check(&kind) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error_here(expected))
        }
    }

    fn parse_sig(&mut self) -> Result<Signature, SignatureFault> {
        let from = self.parse_atom()?;
        if self.check(&TokenKind::Arrow) {
            self.bump();
            let to = self.parse_sig()?;
            return Ok(Signature::arrow(from, to));
        }
        Ok(from)
    }

    fn parse_atom(&mut self) -> Result<Signature, SignatureFault> {
        if self.check(&TokenKind::LParen) {
            self.bump();
            let inner = self.parse_sig()?;
            self.expect(TokenKind::RParen, "`)`")?;
            return Ok(inner);
        }

        let name = match self.peek() {
            Some(Token {
                kind: TokenKind::Ident(name),
                ..
            }) => name.clone(),
            _ => return Err(self.error_here("a type")),
        };
        self.bump();

        if !self.check(&TokenKind::LParen) {
            return Ok(Signature::Name(name));
        }
        self.bump();

        let mut args = vec![self.parse_sig()?];
        while self.check(&TokenKind::Comma) {
            self.bump();
            args.push(self.parse_sig()?);
        }
        self.expect(TokenKind::RParen, "`,` or `)`")?;

        Ok(Signature::App(name, args))
    }
}
