use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{self, Formatter};

use serde_core::de::{self, DeserializeSeed, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_core::ser::{self, Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::tree::{NodeId, NodeValue, Scalar, Tree};

// -----------------------------------------------------------------------------
// NodeRef

/// A [`Serialize`] view of a node and everything below it.
///
/// Whole numbers in `i64` range are serialized as integers, objects as maps
/// (duplicated member names are passed through as they are).
///
/// # Examples
///
/// ```
/// use rt_reflect::tree::{NodeRef, Tree};
///
/// let mut tree = Tree::new();
/// let x = tree.number(1.0);
/// let y = tree.number(0.5);
/// let root = tree.object(vec![("x".into(), x), ("y".into(), y)]);
///
/// let json = serde_json::to_string(&NodeRef::new(&tree, root)).unwrap();
/// assert_eq!(json, r#"{"x":1,"y":0.5}"#);
/// ```
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a Tree,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    #[inline]
    pub const fn new(tree: &'a Tree, id: NodeId) -> Self {
        Self { tree, id }
    }

    #[inline]
    fn child(&self, id: NodeId) -> Self {
        Self::new(self.tree, id)
    }
}

/// Returns `Some` if `value` is an integer that survives the conversion to `i64`.
pub(crate) fn as_whole_number(value: f64) -> Option<i64> {
    const LIMIT: f64 = 9_007_199_254_740_992.0; // 2^53
    if value.fract() == 0.0 && value.abs() <= LIMIT {
        Some(value as i64)
    } else {
        None
    }
}

impl Serialize for NodeRef<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let Some(value) = self.tree.value(self.id) else {
            return Err(<S::Error as ser::Error>::custom(format_args!(
                "node {} does not belong to this tree",
                self.id.index()
            )));
        };

        match value {
            NodeValue::Scalar(Scalar::Str(value)) => serializer.serialize_str(value),
            NodeValue::Scalar(Scalar::Bool(value)) => serializer.serialize_bool(*value),
            NodeValue::Scalar(Scalar::Number(value)) => match as_whole_number(*value) {
                Some(whole) => serializer.serialize_i64(whole),
                None => serializer.serialize_f64(*value),
            },
            NodeValue::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(&self.child(*item))?;
                }
                seq.end()
            }
            NodeValue::Object(members) => {
                let mut map = serializer.serialize_map(Some(members.len()))?;
                for (name, child) in members {
                    map.serialize_entry(name, &self.child(*child))?;
                }
                map.end()
            }
        }
    }
}

// -----------------------------------------------------------------------------
// TreeSeed

/// A [`DeserializeSeed`] appending the input to a [`Tree`].
///
/// Works with any self-describing format. The produced value is the id of
/// the new root node. Null values have no tree representation and are
/// rejected, `Some(x)` is stored as `x`.
///
/// # Examples
///
/// ```
/// use rt_reflect::tree::{Tree, TreeSeed};
/// use serde_core::de::DeserializeSeed;
///
/// let mut tree = Tree::new();
/// let mut input = serde_json::Deserializer::from_str(r#"{"tags":["a","b"],"on":true}"#);
/// let root = TreeSeed::new(&mut tree).deserialize(&mut input).unwrap();
///
/// let tags = tree.member(root, "tags").unwrap();
/// assert_eq!(tree.items(tags).unwrap().len(), 2);
/// assert_eq!(tree.as_bool(tree.member(root, "on").unwrap()), Some(true));
/// ```
pub struct TreeSeed<'a> {
    tree: &'a mut Tree,
}

impl<'a> TreeSeed<'a> {
    #[inline]
    pub fn new(tree: &'a mut Tree) -> Self {
        Self { tree }
    }
}

impl<'de> DeserializeSeed<'de> for TreeSeed<'_> {
    type Value = NodeId;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(TreeVisitor { tree: self.tree })
    }
}

struct TreeVisitor<'a> {
    tree: &'a mut Tree,
}

impl<'de> Visitor<'de> for TreeVisitor<'_> {
    type Value = NodeId;

    fn expecting(&self, formatter: &mut Formatter) -> fmt::Result {
        formatter.write_str("a string, number, boolean, sequence or map")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(self.tree.boolean(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(self.tree.number(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(self.tree.number(v as f64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(self.tree.number(v))
    }

    fn visit_char<E: de::Error>(self, v: char) -> Result<Self::Value, E> {
        let mut buf = [0_u8; 4];
        Ok(self.tree.string(&*v.encode_utf8(&mut buf)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(self.tree.string(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(self.tree.string(v))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Err(E::custom("null values have no tree representation"))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Err(E::custom("null values have no tree representation"))
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        TreeSeed::new(self.tree).deserialize(deserializer)
    }

    fn visit_newtype_struct<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        TreeSeed::new(self.tree).deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or_default());
        while let Some(item) = seq.next_element_seed(TreeSeed::new(&mut *self.tree))? {
            items.push(item);
        }
        Ok(self.tree.sequence(items))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut members = Vec::with_capacity(map.size_hint().unwrap_or_default());
        while let Some(name) = map.next_key::<String>()? {
            let value = map.next_value_seed(TreeSeed::new(&mut *self.tree))?;
            members.push((name, value));
        }
        Ok(self.tree.object(members))
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{NodeRef, TreeSeed};
    use crate::tree::Tree;
    use serde_core::de::DeserializeSeed;

    #[test]
    fn json_round_trip() {
        let text = r#"{"name":"crate","size":3,"ratio":0.25,"tags":["a","b"],"nested":{"on":false}}"#;

        let mut tree = Tree::new();
        let mut input = serde_json::Deserializer::from_str(text);
        let root = TreeSeed::new(&mut tree).deserialize(&mut input).unwrap();

        let output = serde_json::to_string(&NodeRef::new(&tree, root)).unwrap();
        assert_eq!(output, text);
    }

    #[test]
    fn json_null_is_rejected() {
        let mut tree = Tree::new();
        let mut input = serde_json::Deserializer::from_str(r#"{"a":null}"#);
        let err = TreeSeed::new(&mut tree).deserialize(&mut input).unwrap_err();
        assert!(err.to_string().contains("null values"));
    }

    #[test]
    fn ron_input() {
        let mut tree = Tree::new();
        let root = ron::Options::default()
            .from_str_seed(r#"{"x": 1, "labels": ["left", "right"]}"#, TreeSeed::new(&mut tree))
            .unwrap();

        assert_eq!(tree.as_number(tree.member(root, "x").unwrap()), Some(1.0));
        let labels = tree.member(root, "labels").unwrap();
        let items = tree.items(labels).unwrap();
        assert_eq!(tree.as_str(items[1]), Some("right"));
    }

    #[test]
    fn ron_output() {
        let mut tree = Tree::new();
        let a = tree.number(2.0);
        let b = tree.string("two");
        let root = tree.sequence(alloc::vec![a, b]);
        let text = ron::to_string(&NodeRef::new(&tree, root)).unwrap();
        assert_eq!(text, r#"[2,"two"]"#);
    }
}
