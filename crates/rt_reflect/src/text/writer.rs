use alloc::string::String;
use core::fmt::{self, Write};

use crate::text::parser::{is_identifier_char, is_identifier_start};
use crate::tree::{NodeId, NodeValue, Scalar, Tree, as_whole_number};

/// Layout options of the [`TextWriter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterOptions {
    /// Write the braces of a root object.
    ///
    /// The parser accepts both forms, so this only affects layout.
    pub wrap_root_in_braces: bool,
    /// One level of indentation.
    pub indent: String,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            wrap_root_in_braces: false,
            indent: String::from("\t"),
        }
    }
}

/// Writes a [`Tree`] in the text format read by [`Parser`](crate::text::Parser).
///
/// - Strings are always quoted, keys only when they are not identifiers.
/// - Whole numbers are written without a fractional part.
/// - Sequences of scalars are written on one line.
///
/// # Examples
///
/// ```
/// use rt_reflect::text::{TextWriter, WriterOptions};
/// use rt_reflect::tree::Tree;
///
/// let mut tree = Tree::new();
/// let x = tree.number(1.0);
/// let y = tree.number(2.5);
/// let list = tree.sequence(vec![x, y]);
/// let root = tree.object(vec![("x".into(), x), ("list".into(), list)]);
///
/// let options = WriterOptions::default();
/// let text = TextWriter::new(&tree, &options).to_string(root);
/// assert_eq!(text, "x = 1\nlist = [ 1, 2.5 ]\n");
/// ```
pub struct TextWriter<'a> {
    tree: &'a Tree,
    options: &'a WriterOptions,
}

impl<'a> TextWriter<'a> {
    #[inline]
    pub const fn new(tree: &'a Tree, options: &'a WriterOptions) -> Self {
        Self { tree, options }
    }

    /// Writes the node `root` and everything below it to a new string.
    pub fn to_string(&self, root: NodeId) -> String {
        let mut out = String::new();
        // Writing to a `String` cannot fail.
        let _ = self.write(root, &mut out);
        out
    }

    /// Writes the node `root` and everything below it to `out`.
    pub fn write<W: Write>(&self, root: NodeId, out: &mut W) -> fmt::Result {
        match self.tree.value(root) {
            Some(NodeValue::Object(members)) if !self.options.wrap_root_in_braces => {
                for (name, child) in members {
                    self.write_member(name, *child, 0, out)?;
                }
                Ok(())
            }
            _ => {
                self.write_value(root, 0, out)?;
                out.write_char('\n')
            }
        }
    }

    fn write_indent<W: Write>(&self, level: usize, out: &mut W) -> fmt::Result {
        for _ in 0..level {
            out.write_str(&self.options.indent)?;
        }
        Ok(())
    }

    fn write_member<W: Write>(&self, name: &str, id: NodeId, level: usize, out: &mut W) -> fmt::Result {
        self.write_indent(level, out)?;
        if is_identifier(name) {
            out.write_str(name)?;
        } else {
            write_quoted(name, out)?;
        }
        out.write_str(" = ")?;
        self.write_value(id, level, out)?;
        out.write_char('\n')
    }

    fn write_value<W: Write>(&self, id: NodeId, level: usize, out: &mut W) -> fmt::Result {
        let Some(value) = self.tree.value(id) else {
            log::error!("node {} does not belong to the written tree", id.index());
            return out.write_str("{}");
        };

        match value {
            NodeValue::Scalar(scalar) => write_scalar(scalar, out),
            NodeValue::Sequence(items) if items.is_empty() => out.write_str("[]"),
            NodeValue::Sequence(items) if items.iter().all(|item| self.is_scalar(*item)) => {
                out.write_str("[ ")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        out.write_str(", ")?;
                    }
                    self.write_value(*item, level, out)?;
                }
                out.write_str(" ]")
            }
            NodeValue::Sequence(items) => {
                out.write_str("[\n")?;
                for item in items {
                    self.write_indent(level + 1, out)?;
                    self.write_value(*item, level + 1, out)?;
                    out.write_char('\n')?;
                }
                self.write_indent(level, out)?;
                out.write_char(']')
            }
            NodeValue::Object(members) if members.is_empty() => out.write_str("{}"),
            NodeValue::Object(members) => {
                out.write_str("{\n")?;
                for (name, child) in members {
                    self.write_member(name, *child, level + 1, out)?;
                }
                self.write_indent(level, out)?;
                out.write_char('}')
            }
        }
    }

    fn is_scalar(&self, id: NodeId) -> bool {
        matches!(self.tree.value(id), Some(NodeValue::Scalar(_)))
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if is_identifier_start(c) => chars.all(is_identifier_char),
        _ => false,
    }
}

fn write_scalar<W: Write>(scalar: &Scalar, out: &mut W) -> fmt::Result {
    match scalar {
        Scalar::Str(value) => write_quoted(value, out),
        Scalar::Bool(value) => write!(out, "{value}"),
        Scalar::Number(value) => match as_whole_number(*value) {
            Some(whole) => write!(out, "{whole}"),
            None if value.is_nan() => out.write_str("nan"),
            None if value.is_infinite() && *value > 0.0 => out.write_str("inf"),
            None => write!(out, "{value}"),
        },
    }
}

fn write_quoted<W: Write>(value: &str, out: &mut W) -> fmt::Result {
    out.write_char('"')?;
    for c in value.chars() {
        match c {
            '"' => out.write_str("\\\"")?,
            '\\' => out.write_str("\\\\")?,
            '\n' => out.write_str("\\n")?,
            '\t' => out.write_str("\\t")?,
            '\r' => out.write_str("\\r")?,
            '\0' => out.write_str("\\0")?,
            c if c.is_control() => write!(out, "\\u{:04x}", c as u32)?,
            c => out.write_char(c)?,
        }
    }
    out.write_char('"')
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{TextWriter, WriterOptions};
    use crate::text::Parser;
    use crate::tree::Tree;
    use alloc::string::String;
    use alloc::vec;

    fn sample() -> (Tree, crate::tree::NodeId) {
        let mut tree = Tree::new();
        let name = tree.string("say \"hi\"\n");
        let ratio = tree.number(0.25);
        let on = tree.boolean(false);
        let a = tree.number(1.0);
        let inner = tree.object(vec![("on".into(), on)]);
        let nested = tree.sequence(vec![inner]);
        let empty = tree.sequence(vec![]);
        let list = tree.sequence(vec![a, ratio]);
        let root = tree.object(vec![
            ("name".into(), name),
            ("odd key".into(), ratio),
            ("list".into(), list),
            ("nested".into(), nested),
            ("empty".into(), empty),
        ]);
        (tree, root)
    }

    #[test]
    fn layout() {
        let (tree, root) = sample();
        let options = WriterOptions {
            indent: String::from("  "),
            ..Default::default()
        };
        let text = TextWriter::new(&tree, &options).to_string(root);
        let expected = "\
name = \"say \\\"hi\\\"\\n\"
\"odd key\" = 0.25
list = [ 1, 0.25 ]
nested = [
  {
    on = false
  }
]
empty = []
";
        assert_eq!(text, expected);
    }

    #[test]
    fn wrapped_root() {
        let mut tree = Tree::new();
        let one = tree.number(1.0);
        let root = tree.object(vec![("a".into(), one)]);
        let options = WriterOptions {
            wrap_root_in_braces: true,
            ..Default::default()
        };
        let text = TextWriter::new(&tree, &options).to_string(root);
        assert_eq!(text, "{\n\ta = 1\n}\n");
    }

    #[test]
    fn parse_back() {
        let (tree, root) = sample();
        for wrap in [false, true] {
            let options = WriterOptions {
                wrap_root_in_braces: wrap,
                ..Default::default()
            };
            let text = TextWriter::new(&tree, &options).to_string(root);
            let (parsed, parsed_root) = Parser::new(&text).parse().unwrap();
            let again = TextWriter::new(&parsed, &options).to_string(parsed_root);
            assert_eq!(text, again);
            let name = parsed.member(parsed_root, "name").unwrap();
            assert_eq!(parsed.as_str(name), Some("say \"hi\"\n"));
        }
    }

    #[test]
    fn special_numbers() {
        let mut tree = Tree::new();
        let items = vec![tree.number(f64::NAN), tree.number(f64::NEG_INFINITY), tree.number(-3.0)];
        let root = tree.sequence(items);
        let text = TextWriter::new(&tree, &WriterOptions::default()).to_string(root);
        assert_eq!(text, "[ nan, -inf, -3 ]\n");
    }
}
