use std::path::Path;

use crate::text::{ParseError, Parser, TextError};
use crate::tree::{NodeId, NodeValue, Scalar, Tree};

/// A parsed key/value configuration file.
///
/// Lookups search the members of the root object and return the first
/// match. A key whose value has the wrong shape is reported as missing.
///
/// # Examples
///
/// ```
/// use rt_reflect::text::TextConfig;
///
/// let config = TextConfig::parse("
///     window_title = \"Viewer\"
///     width = 1280
///     gamma = 2.2
///     vsync = true
/// ").unwrap();
///
/// assert_eq!(config.find_string("window_title"), Some("Viewer"));
/// assert_eq!(config.find_integer("width"), Some(1280));
/// assert_eq!(config.find_float("gamma"), Some(2.2));
/// assert_eq!(config.find_boolean("vsync"), Some(true));
/// assert_eq!(config.find_integer("height"), None);
/// ```
#[derive(Debug, Clone)]
pub struct TextConfig {
    tree: Tree,
    root: NodeId,
}

impl TextConfig {
    /// Parses `source`.
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        let (tree, root) = Parser::new(source).parse()?;
        Ok(Self { tree, root })
    }

    /// Reads and parses the file at `path`.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, TextError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let (tree, root) = Parser::new(&source)
            .with_file(path.display().to_string())
            .parse()?;
        Ok(Self { tree, root })
    }

    /// The parsed tree.
    #[inline]
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    fn find(&self, key: &str) -> Option<&NodeValue> {
        self.tree.value(self.tree.member(self.root, key)?)
    }

    pub fn find_string(&self, key: &str) -> Option<&str> {
        match self.find(key)? {
            NodeValue::Scalar(Scalar::Str(value)) => Some(value),
            _ => None,
        }
    }

    /// A number truncated toward zero.
    pub fn find_integer(&self, key: &str) -> Option<i64> {
        match self.find(key)? {
            NodeValue::Scalar(Scalar::Number(value)) => Some(*value as i64),
            _ => None,
        }
    }

    pub fn find_float(&self, key: &str) -> Option<f64> {
        match self.find(key)? {
            NodeValue::Scalar(Scalar::Number(value)) => Some(*value),
            _ => None,
        }
    }

    /// A boolean, or a number where anything but zero is `true`.
    pub fn find_boolean(&self, key: &str) -> Option<bool> {
        match self.find(key)? {
            NodeValue::Scalar(Scalar::Bool(value)) => Some(*value),
            NodeValue::Scalar(Scalar::Number(value)) => Some(*value != 0.0),
            _ => None,
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::TextConfig;

    #[test]
    fn lookups() {
        let config = TextConfig::parse("a = 2.9\nb = -2.9\nflag = 0\nname = x\nname = y").unwrap();
        assert_eq!(config.find_integer("a"), Some(2));
        assert_eq!(config.find_integer("b"), Some(-2));
        assert_eq!(config.find_boolean("flag"), Some(false));
        assert_eq!(config.find_string("name"), Some("x"));
        assert_eq!(config.find_string("a"), None);
        assert_eq!(config.find_float("name"), None);
    }

    #[test]
    fn load_from_file() {
        let path = std::env::temp_dir().join("rt_reflect_text_config_test.son");
        std::fs::write(&path, "threads = 4\n").unwrap();
        let config = TextConfig::load_from_file(&path).unwrap();
        assert_eq!(config.find_integer("threads"), Some(4));
        std::fs::remove_file(&path).unwrap();

        assert!(TextConfig::load_from_file(&path).is_err());
    }
}
