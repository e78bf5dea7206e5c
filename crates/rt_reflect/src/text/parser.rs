use alloc::string::{String, ToString};
use alloc::vec::Vec;

use thiserror::Error;

use crate::tree::{NodeId, NodeValue, Scalar, SourceLocation, Tree};

/// Maximum nesting of objects and sequences accepted by the [`Parser`].
pub const MAX_DEPTH: usize = 32;

// -----------------------------------------------------------------------------
// Errors

/// What went wrong while parsing text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseErrorKind {
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("unexpected character `{0}`")]
    UnexpectedCharacter(char),
    #[error("malformed number `{0}`")]
    BadNumber(String),
    #[error("malformed string: {0}")]
    BadString(&'static str),
    #[error("`{0}` is not a valid key")]
    BadIdentifier(String),
    #[error("nesting deeper than {MAX_DEPTH} levels")]
    StackOverflow,
    #[error("`{found}` does not close `{open}`")]
    MismatchBracket { open: char, found: char },
}

/// A [`ParseErrorKind`] with the position it was detected at.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{}:{line}:{column}: {kind}", .file.as_deref().unwrap_or("<text>"))]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub file: Option<String>,
    pub line: u32,
    pub column: u32,
}

// -----------------------------------------------------------------------------
// Parser

#[derive(Debug, Clone, Copy)]
struct Cursor {
    pos: usize,
    line: u32,
    column: u32,
}

/// Parses the text format into a [`Tree`].
///
/// # Syntax
///
/// - Objects: `{ key = value }`, `:` may replace `=`. Keys are identifiers
///   or quoted strings. Members may be separated by `,` or `;`.
/// - Sequences: `[ a, b, c ]`, commas are optional.
/// - Quoted strings with the escapes `\n \t \r \0 \\ \" \' \/ \b \f \uXXXX`.
/// - Numbers, `true`, `false`, and bare identifiers, which are read as strings.
/// - `// line` and `/* block */` comments.
///
/// A document starting with `key =` is an implicit root object, so the
/// outer braces may be omitted. Empty input is an empty object.
///
/// # Examples
///
/// ```
/// use rt_reflect::text::Parser;
///
/// let text = "
///     // camera settings
///     name = main
///     fov = 70
///     clip = [ 0.1 1000 ]
/// ";
/// let (tree, root) = Parser::new(text).with_file("camera.son").parse().unwrap();
///
/// assert_eq!(tree.as_str(tree.member(root, "name").unwrap()), Some("main"));
/// let fov = tree.member(root, "fov").unwrap();
/// assert_eq!(tree.location(fov).unwrap().line, 4);
/// ```
pub struct Parser<'a> {
    source: &'a str,
    cursor: Cursor,
    file: Option<String>,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            cursor: Cursor {
                pos: 0,
                line: 1,
                column: 1,
            },
            file: None,
            depth: 0,
        }
    }

    /// Names the source in locations and errors.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Sets the line number of the first line, `1` by default.
    pub fn with_line(mut self, line: u32) -> Self {
        self.cursor.line = line.max(1);
        self
    }

    /// Parses the whole source into a new tree.
    pub fn parse(self) -> Result<(Tree, NodeId), ParseError> {
        let mut tree = match &self.file {
            Some(file) => Tree::with_file(file.clone()),
            None => Tree::new(),
        };
        let root = self.parse_into(&mut tree)?;
        Ok((tree, root))
    }

    /// Parses the whole source, appending the nodes to `tree`.
    pub fn parse_into(mut self, tree: &mut Tree) -> Result<NodeId, ParseError> {
        self.skip_trivia()?;
        let root = if self.peek().is_none() || self.at_member_start() {
            let location = self.location();
            let members = self.parse_members(tree, None)?;
            tree.push_located(NodeValue::Object(members), Some(location))
        } else {
            self.parse_value(tree)?
        };

        self.skip_trivia()?;
        match self.peek() {
            None => Ok(root),
            Some(c) => Err(self.error(ParseErrorKind::UnexpectedCharacter(c))),
        }
    }

    // -------------------------------------------------------------------------
    // Cursor

    #[inline]
    fn rest(&self) -> &'a str {
        &self.source[self.cursor.pos..]
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    #[inline]
    fn peek_second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.cursor.pos += c.len_utf8();
        if c == '\n' {
            self.cursor.line += 1;
            self.cursor.column = 1;
        } else {
            self.cursor.column += 1;
        }
        Some(c)
    }

    #[inline]
    fn location(&self) -> SourceLocation {
        SourceLocation {
            line: self.cursor.line,
            column: self.cursor.column,
        }
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        self.error_at(kind, self.cursor)
    }

    fn error_at(&self, kind: ParseErrorKind, at: Cursor) -> ParseError {
        ParseError {
            kind,
            file: self.file.clone(),
            line: at.line,
            column: at.column,
        }
    }

    fn skip_trivia(&mut self) -> Result<(), ParseError> {
        while let Some(c) = self.peek() {
            match c {
                c if c.is_whitespace() => {
                    self.bump();
                }
                '/' if self.peek_second() == Some('/') => {
                    while let Some(c) = self.bump() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                '/' if self.peek_second() == Some('*') => {
                    let start = self.cursor;
                    self.bump();
                    self.bump();
                    loop {
                        match self.bump() {
                            Some('*') if self.peek() == Some('/') => {
                                self.bump();
                                break;
                            }
                            Some(_) => {}
                            None => return Err(self.error_at(ParseErrorKind::UnexpectedEnd, start)),
                        }
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    fn skip_separator(&mut self) {
        if matches!(self.peek(), Some(',' | ';')) {
            self.bump();
        }
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error(ParseErrorKind::StackOverflow));
        }
        self.depth += 1;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Grammar

    // Looks ahead for `key =` or `key :` without consuming anything.
    fn at_member_start(&mut self) -> bool {
        let saved = self.cursor;
        let found = match self.peek() {
            Some('"') => self.parse_string().is_ok(),
            Some(c) if is_identifier_start(c) => {
                self.read_identifier();
                true
            }
            _ => false,
        } && self.skip_trivia().is_ok()
            && matches!(self.peek(), Some('=' | ':'));
        self.cursor = saved;
        found
    }

    fn parse_members(
        &mut self,
        tree: &mut Tree,
        close: Option<char>,
    ) -> Result<Vec<(String, NodeId)>, ParseError> {
        let mut members = Vec::new();
        loop {
            self.skip_trivia()?;
            match self.peek() {
                None if close.is_none() => return Ok(members),
                None => return Err(self.error(ParseErrorKind::UnexpectedEnd)),
                Some(c) if Some(c) == close => {
                    self.bump();
                    return Ok(members);
                }
                Some(c @ ('}' | ']')) => {
                    let kind = match close {
                        Some(_) => ParseErrorKind::MismatchBracket { open: '{', found: c },
                        None => ParseErrorKind::UnexpectedCharacter(c),
                    };
                    return Err(self.error(kind));
                }
                Some(_) => {
                    let name = self.parse_key()?;
                    self.skip_trivia()?;
                    match self.peek() {
                        Some('=' | ':') => {
                            self.bump();
                        }
                        Some(c) => return Err(self.error(ParseErrorKind::UnexpectedCharacter(c))),
                        None => return Err(self.error(ParseErrorKind::UnexpectedEnd)),
                    }
                    self.skip_trivia()?;
                    let value = self.parse_value(tree)?;
                    members.push((name, value));
                    self.skip_trivia()?;
                    self.skip_separator();
                }
            }
        }
    }

    fn parse_items(&mut self, tree: &mut Tree) -> Result<Vec<NodeId>, ParseError> {
        let mut items = Vec::new();
        loop {
            self.skip_trivia()?;
            match self.peek() {
                None => return Err(self.error(ParseErrorKind::UnexpectedEnd)),
                Some(']') => {
                    self.bump();
                    return Ok(items);
                }
                Some(c @ '}') => {
                    return Err(self.error(ParseErrorKind::MismatchBracket { open: '[', found: c }));
                }
                Some(_) => {
                    items.push(self.parse_value(tree)?);
                    self.skip_trivia()?;
                    self.skip_separator();
                }
            }
        }
    }

    fn parse_key(&mut self) -> Result<String, ParseError> {
        match self.peek() {
            Some('"') => self.parse_string(),
            Some(c) if is_identifier_start(c) => Ok(self.read_identifier().to_string()),
            _ => {
                let start = self.cursor;
                let token = self.read_token();
                Err(self.error_at(ParseErrorKind::BadIdentifier(token.to_string()), start))
            }
        }
    }

    fn parse_value(&mut self, tree: &mut Tree) -> Result<NodeId, ParseError> {
        let location = Some(self.location());
        let value = match self.peek() {
            None => return Err(self.error(ParseErrorKind::UnexpectedEnd)),
            Some('{') => {
                self.enter()?;
                self.bump();
                let members = self.parse_members(tree, Some('}'))?;
                self.depth -= 1;
                NodeValue::Object(members)
            }
            Some('[') => {
                self.enter()?;
                self.bump();
                let items = self.parse_items(tree)?;
                self.depth -= 1;
                NodeValue::Sequence(items)
            }
            Some('"') => NodeValue::Scalar(Scalar::Str(self.parse_string()?)),
            Some(c) if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') => {
                NodeValue::Scalar(Scalar::Number(self.parse_number()?))
            }
            Some(c) if is_identifier_start(c) => match self.read_identifier() {
                "true" => NodeValue::Scalar(Scalar::Bool(true)),
                "false" => NodeValue::Scalar(Scalar::Bool(false)),
                "nan" => NodeValue::Scalar(Scalar::Number(f64::NAN)),
                "inf" => NodeValue::Scalar(Scalar::Number(f64::INFINITY)),
                word => NodeValue::Scalar(Scalar::Str(word.to_string())),
            },
            Some(c) => return Err(self.error(ParseErrorKind::UnexpectedCharacter(c))),
        };
        Ok(tree.push_located(value, location))
    }

    fn parse_string(&mut self) -> Result<String, ParseError> {
        let start = self.cursor;
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error_at(ParseErrorKind::UnexpectedEnd, start)),
                Some('"') => return Ok(out),
                Some('\\') => {
                    let c = match self.bump() {
                        None => return Err(self.error_at(ParseErrorKind::UnexpectedEnd, start)),
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some('0') => '\0',
                        Some('b') => '\u{8}',
                        Some('f') => '\u{c}',
                        Some(c @ ('\\' | '"' | '\'' | '/')) => c,
                        Some('u') => self.parse_unicode_escape()?,
                        Some(_) => {
                            return Err(self.error(ParseErrorKind::BadString("unknown escape sequence")));
                        }
                    };
                    out.push(c);
                }
                Some(c) => out.push(c),
            }
        }
    }

    fn parse_unicode_escape(&mut self) -> Result<char, ParseError> {
        let start = self.cursor;
        let mut code = 0_u32;
        for _ in 0..4 {
            let digit = self.bump().and_then(|c| c.to_digit(16));
            let Some(digit) = digit else {
                return Err(self.error_at(ParseErrorKind::BadString("invalid unicode escape"), start));
            };
            code = code * 16 + digit;
        }
        char::from_u32(code)
            .ok_or_else(|| self.error_at(ParseErrorKind::BadString("invalid unicode escape"), start))
    }

    fn parse_number(&mut self) -> Result<f64, ParseError> {
        let start = self.cursor;
        let token = self.read_token();
        token
            .parse::<f64>()
            .map_err(|_| self.error_at(ParseErrorKind::BadNumber(token.to_string()), start))
    }

    fn read_identifier(&mut self) -> &'a str {
        let begin = self.cursor.pos;
        while self.peek().is_some_and(is_identifier_char) {
            self.bump();
        }
        &self.source[begin..self.cursor.pos]
    }

    // Reads up to the next whitespace or delimiter, at least one character.
    fn read_token(&mut self) -> &'a str {
        let begin = self.cursor.pos;
        self.bump();
        while self
            .peek()
            .is_some_and(|c| !c.is_whitespace() && !is_delimiter(c))
        {
            self.bump();
        }
        &self.source[begin..self.cursor.pos]
    }
}

#[inline]
pub(crate) fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

#[inline]
pub(crate) fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '.')
}

#[inline]
fn is_delimiter(c: char) -> bool {
    matches!(c, '{' | '}' | '[' | ']' | '=' | ':' | ',' | ';' | '"' | '/')
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{MAX_DEPTH, ParseErrorKind, Parser};
    use crate::tree::{NodeValue, SourceLocation};
    use alloc::string::String;

    fn kind(text: &str) -> ParseErrorKind {
        Parser::new(text).parse().unwrap_err().kind
    }

    #[test]
    fn implicit_root_object() {
        let (tree, root) = Parser::new("a = 1\nb: \"two\", c = [x, y z]; d = { e = true }")
            .parse()
            .unwrap();

        assert_eq!(tree.as_number(tree.member(root, "a").unwrap()), Some(1.0));
        assert_eq!(tree.as_str(tree.member(root, "b").unwrap()), Some("two"));
        let c = tree.member(root, "c").unwrap();
        assert_eq!(tree.items(c).unwrap().len(), 3);
        let d = tree.member(root, "d").unwrap();
        assert_eq!(tree.as_bool(tree.member(d, "e").unwrap()), Some(true));
    }

    #[test]
    fn explicit_root_and_scalars() {
        let (tree, root) = Parser::new("{ \"quoted key\" = -1.5e2 }").parse().unwrap();
        assert_eq!(tree.as_number(tree.member(root, "quoted key").unwrap()), Some(-150.0));

        let (tree, root) = Parser::new("[ 1 2 3 ]").parse().unwrap();
        assert_eq!(tree.items(root).unwrap().len(), 3);

        let (tree, root) = Parser::new("bare_word").parse().unwrap();
        assert_eq!(tree.as_str(root), Some("bare_word"));

        let (tree, root) = Parser::new("   ").parse().unwrap();
        assert_eq!(tree.members(root).unwrap().len(), 0);
    }

    #[test]
    fn comments_and_escapes() {
        let text = "/* header\n comment */ s = \"a\\tb\\u0041\\\"\" // trailing\n n = 2";
        let (tree, root) = Parser::new(text).parse().unwrap();
        assert_eq!(tree.as_str(tree.member(root, "s").unwrap()), Some("a\tbA\""));
        assert_eq!(tree.as_number(tree.member(root, "n").unwrap()), Some(2.0));
    }

    #[test]
    fn locations_follow_starting_line() {
        let (tree, root) = Parser::new("a = 1\n  b = [\n 2 ]")
            .with_file("level.son")
            .with_line(10)
            .parse()
            .unwrap();
        assert_eq!(tree.file(), Some("level.son"));
        let b = tree.member(root, "b").unwrap();
        assert_eq!(tree.location(b), Some(SourceLocation { line: 11, column: 7 }));
        let two = tree.items(b).unwrap()[0];
        assert_eq!(tree.location(two), Some(SourceLocation { line: 12, column: 2 }));
    }

    #[test]
    fn errors() {
        assert_eq!(kind("a = "), ParseErrorKind::UnexpectedEnd);
        assert_eq!(kind("a = { b = 1"), ParseErrorKind::UnexpectedEnd);
        assert_eq!(kind("a = \"open"), ParseErrorKind::UnexpectedEnd);
        assert_eq!(kind("a = 1.2.3"), ParseErrorKind::BadNumber(String::from("1.2.3")));
        assert_eq!(kind("a = \"\\q\""), ParseErrorKind::BadString("unknown escape sequence"));
        assert_eq!(kind("a = 1 12 = 3"), ParseErrorKind::BadIdentifier(String::from("12")));
        assert_eq!(kind("a = [ 1 }"), ParseErrorKind::MismatchBracket { open: '[', found: '}' });
        assert_eq!(kind("a = { b = 1 ]"), ParseErrorKind::MismatchBracket { open: '{', found: ']' });
        assert_eq!(kind("a = @"), ParseErrorKind::UnexpectedCharacter('@'));
        assert_eq!(kind("a = 1 }"), ParseErrorKind::UnexpectedCharacter('}'));
        assert_eq!(kind("/* never closed"), ParseErrorKind::UnexpectedEnd);
    }

    #[test]
    fn nesting_limit() {
        let mut ok = String::new();
        for _ in 0..MAX_DEPTH {
            ok.push('[');
        }
        for _ in 0..MAX_DEPTH {
            ok.push(']');
        }
        let (tree, root) = Parser::new(&ok).parse().unwrap();
        assert!(matches!(tree.value(root), Some(NodeValue::Sequence(_))));

        let deep = alloc::format!("[{ok}]");
        assert_eq!(kind(&deep), ParseErrorKind::StackOverflow);
    }

    #[test]
    fn error_display() {
        let err = Parser::new("a = @").with_file("x.son").parse().unwrap_err();
        assert_eq!(err.to_string(), "x.son:1:5: unexpected character `@`");
    }
}
