// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Type expressions written in fixtures.
//!
//! ```text
//! type     := name ('<' argument (',' argument)* '>')? '[]'* '?'?
//! argument := '*' | 'out' type | 'in' type | type
//! ```

use crate::error::CliError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeExpr {
    pub name: String,
    pub arguments: Vec<ArgumentExpr>,
    pub array_depth: usize,
    pub nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentExpr {
    Star,
    Out(TypeExpr),
    In(TypeExpr),
    Invariant(TypeExpr),
}

pub fn parse(text: &str) -> Result<TypeExpr, CliError> {
    let mut parser = Parser { text, pos: 0 };
    let ty = parser.ty()?;
    parser.skip_whitespace();
    if parser.pos != text.len() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(ty)
}

struct Parser<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn error(&self, message: &str) -> CliError {
        CliError::Type {
            text: self.text.to_string(),
            position: self.pos,
            message: message.to_string(),
        }
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn eat(&mut self, token: &str) -> bool {
        self.skip_whitespace();
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    /// A keyword followed by whitespace.
    fn eat_keyword(&mut self, keyword: &str) -> bool {
        self.skip_whitespace();
        let rest = self.rest();
        let followed_by_space = rest
            .strip_prefix(keyword)
            .and_then(|after| after.chars().next())
            .is_some_and(char::is_whitespace);
        if followed_by_space {
            self.pos += keyword.len();
        }
        followed_by_space
    }

    fn name(&mut self) -> Result<String, CliError> {
        self.skip_whitespace();
        let rest = self.rest();
        let len = rest
            .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '.' || c == '$'))
            .unwrap_or(rest.len());
        if len == 0 {
            return Err(self.error("expected a type name"));
        }
        self.pos += len;
        Ok(rest[..len].to_string())
    }

    fn ty(&mut self) -> Result<TypeExpr, CliError> {
        let name = self.name()?;
        let mut arguments = Vec::new();
        if self.eat("<") {
            loop {
                arguments.push(self.argument()?);
                if self.eat(">") {
                    break;
                }
                if !self.eat(",") {
                    return Err(self.error("expected `,` or `>`"));
                }
            }
        }
        let mut array_depth = 0;
        while self.eat("[]") {
            array_depth += 1;
        }
        let nullable = self.eat("?");
        Ok(TypeExpr {
            name,
            arguments,
            array_depth,
            nullable,
        })
    }

    fn argument(&mut self) -> Result<ArgumentExpr, CliError> {
        if self.eat("*") {
            Ok(ArgumentExpr::Star)
        } else if self.eat_keyword("out") {
            Ok(ArgumentExpr::Out(self.ty()?))
        } else if self.eat_keyword("in") {
            Ok(ArgumentExpr::In(self.ty()?))
        } else {
            Ok(ArgumentExpr::Invariant(self.ty()?))
        }
    }
}
