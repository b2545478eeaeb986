//! Boolean expressions over the level 1b quality flags.
//!
//! Grammar, loosest binding first:
//!
//! ```text
//! or      := and  (("or"  | "||") and)*
//! and     := unary (("and" | "&&") unary)*
//! unary   := ("not" | "!") unary | primary
//! primary := "(" or ")" | "true" | "false" | <band>.<FLAG>
//! ```
//!
//! Keywords and flag names are case-insensitive; the band name must be the flag band.

use crate::config::ConfigError;
use crate::sat_bands::{FLAG_BAND_NAME, SatBands};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Const(bool),
    Flag(u32),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Parse `source`. An empty expression accepts every pixel.
    pub fn parse(source: &str, bands: &SatBands) -> Result<Self, ConfigError> {
        let fail = |reason: String| ConfigError::IncompatibleExpression {
            expression: source.to_string(),
            reason,
        };

        let tokens = tokenize(source).map_err(fail)?;
        if tokens.is_empty() {
            return Ok(Expr::Const(true));
        }

        let mut parser = Parser {
            tokens: &tokens,
            pos: 0,
            bands,
        };
        let expr = parser.or().map_err(fail)?;
        if let Some(token) = parser.peek() {
            return Err(fail(format!("unexpected '{token}'")));
        }
        Ok(expr)
    }

    pub fn eval(&self, flags: u32) -> bool {
        match self {
            Expr::Const(value) => *value,
            Expr::Flag(mask) => flags & mask != 0,
            Expr::Not(inner) => !inner.eval(flags),
            Expr::And(a, b) => a.eval(flags) && b.eval(flags),
            Expr::Or(a, b) => a.eval(flags) || b.eval(flags),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    LParen,
    RParen,
    Not,
    And,
    Or,
    Ident(String),
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Not => write!(f, "not"),
            Token::And => write!(f, "and"),
            Token::Or => write!(f, "or"),
            Token::Ident(name) => write!(f, "{name}"),
        }
    }
}

fn tokenize(source: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '!' => {
                chars.next();
                tokens.push(Token::Not);
            }
            '&' | '|' => {
                chars.next();
                if chars.next_if(|&(_, next)| next == c).is_none() {
                    return Err(format!("single '{c}' at offset {start}"));
                }
                tokens.push(if c == '&' { Token::And } else { Token::Or });
            }
            c if c.is_alphanumeric() || c == '_' => {
                let mut word = String::new();
                while let Some((_, c)) =
                    chars.next_if(|&(_, c)| c.is_alphanumeric() || c == '_' || c == '.')
                {
                    word.push(c);
                }
                tokens.push(match word.to_ascii_lowercase().as_str() {
                    "not" => Token::Not,
                    "and" => Token::And,
                    "or" => Token::Or,
                    _ => Token::Ident(word),
                });
            }
            other => return Err(format!("unexpected character '{other}' at offset {start}")),
        }
    }

    Ok(tokens)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    bands: &'a SatBands,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.pos);
        self.pos += 1;
        token
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn or(&mut self) -> Result<Expr, String> {
        let mut expr = self.and()?;
        while self.eat(&Token::Or) {
            expr = Expr::Or(Box::new(expr), Box::new(self.and()?));
        }
        Ok(expr)
    }

    fn and(&mut self) -> Result<Expr, String> {
        let mut expr = self.unary()?;
        while self.eat(&Token::And) {
            expr = Expr::And(Box::new(expr), Box::new(self.unary()?));
        }
        Ok(expr)
    }

    fn unary(&mut self) -> Result<Expr, String> {
        if self.eat(&Token::Not) {
            return Ok(Expr::Not(Box::new(self.unary()?)));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr, String> {
        match self.next().cloned() {
            Some(Token::LParen) => {
                let expr = self.or()?;
                if !self.eat(&Token::RParen) {
                    return Err("missing ')'".to_string());
                }
                Ok(expr)
            }
            Some(Token::Ident(name)) => self.term(&name),
            Some(token) => Err(format!("unexpected '{token}'")),
            None => Err("unexpected end of expression".to_string()),
        }
    }

    fn term(&self, name: &str) -> Result<Expr, String> {
        if name.eq_ignore_ascii_case("true") {
            return Ok(Expr::Const(true));
        }
        if name.eq_ignore_ascii_case("false") {
            return Ok(Expr::Const(false));
        }

        let Some((band, flag)) = name.split_once('.') else {
            return Err(format!("unknown symbol '{name}'"));
        };
        if !band.eq_ignore_ascii_case(FLAG_BAND_NAME) {
            return Err(format!("unknown band '{band}'"));
        }
        self.bands
            .flag_value(flag)
            .map(Expr::Flag)
            .ok_or_else(|| format!("unknown flag '{name}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_VALID_PIXEL_EXPRESSION;

    const GLINT_RISK: u32 = 0x04;
    const SUSPECT: u32 = 0x08;
    const BRIGHT: u32 = 0x20;
    const INVALID: u32 = 0x80;

    fn parse(source: &str) -> Result<Expr, ConfigError> {
        Expr::parse(source, &SatBands::default())
    }

    #[test]
    fn test_default_expression() {
        let expr = parse(DEFAULT_VALID_PIXEL_EXPRESSION).unwrap();
        assert!(expr.eval(0));
        assert!(expr.eval(0x01 | 0x10));
        for flag in [GLINT_RISK, SUSPECT, BRIGHT, INVALID] {
            assert!(!expr.eval(flag), "flag {flag:#x}");
        }
    }

    #[test]
    fn test_precedence_and_symbols() {
        // and binds tighter than or
        let expr = parse("l1_flags.BRIGHT or l1_flags.INVALID && l1_flags.SUSPECT").unwrap();
        assert!(expr.eval(BRIGHT));
        assert!(!expr.eval(INVALID));
        assert!(expr.eval(INVALID | SUSPECT));

        let grouped = parse("(l1_flags.BRIGHT || l1_flags.INVALID) and !l1_flags.suspect").unwrap();
        assert!(grouped.eval(INVALID));
        assert!(!grouped.eval(INVALID | SUSPECT));

        assert!(parse("NOT false").unwrap().eval(0));
        assert!(!parse("not not false").unwrap().eval(0));
    }

    #[test]
    fn test_empty_expression_accepts_everything() {
        assert_eq!(parse("").unwrap(), Expr::Const(true));
        assert_eq!(parse("   ").unwrap(), Expr::Const(true));
    }

    #[test]
    fn test_incompatible_expressions() {
        for source in [
            "not l1_flags.CLOUD",
            "not cloud_flags.BRIGHT",
            "radiance_1",
            "l1_flags.BRIGHT and",
            "(l1_flags.BRIGHT",
            "l1_flags.BRIGHT)",
            "l1_flags.BRIGHT & l1_flags.INVALID",
            "radiance_1 > 3",
        ] {
            let err = parse(source).unwrap_err();
            assert!(
                matches!(&err, ConfigError::IncompatibleExpression { expression, .. } if expression == source),
                "{source}: {err}"
            );
        }
    }
}
