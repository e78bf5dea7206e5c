use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{self, Write};

/// One step of a [`FieldPath`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSegment {
    Field(&'static str),
    Index(usize),
}

/// The trail of fields and indices leading to the value being processed.
///
/// Rendered as `a.b[2].c`.
#[derive(Debug, Clone, Default)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    #[inline]
    pub const fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    #[inline]
    pub fn push(&mut self, segment: PathSegment) {
        self.segments.push(segment);
    }

    #[inline]
    pub fn pop(&mut self) {
        self.segments.pop();
    }

    #[inline]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Renders the path, empty for the root value.
    pub fn render(&self) -> String {
        let mut out = String::new();
        // Writing to a `String` cannot fail.
        let _ = write!(out, "{self}");
        out
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Field(name) if index == 0 => f.write_str(name)?,
                PathSegment::Field(name) => write!(f, ".{name}")?,
                PathSegment::Index(i) => write!(f, "[{i}]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldPath, PathSegment};

    #[test]
    fn render() {
        let mut path = FieldPath::new();
        assert_eq!(path.render(), "");
        path.push(PathSegment::Field("a"));
        path.push(PathSegment::Field("b"));
        path.push(PathSegment::Index(2));
        path.push(PathSegment::Field("c"));
        assert_eq!(path.render(), "a.b[2].c");
        path.pop();
        path.pop();
        assert_eq!(path.render(), "a.b");

        let mut list = FieldPath::new();
        list.push(PathSegment::Index(0));
        list.push(PathSegment::Field("x"));
        assert_eq!(list.render(), "[0].x");
    }
}
