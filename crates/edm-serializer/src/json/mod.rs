//! Renders a [`MultiTree`] as JSON text.
//!
//! The node passed in becomes an object. Interior children become nested
//! objects and leaf children are rendered by a caller-supplied stringifier.
//! Members are written as `"name":value` separated by `", "`; names are
//! emitted as-is, without escaping.

use std::fmt;

use tracing::warn;

use crate::error::{EncodeError, TreeError};
use crate::limits::MEMBER_SEPARATOR;
use crate::tree::MultiTree;

/// Encodes `tree` into `dest`, rendering leaf values with `to_string`.
///
/// Each leaf is rendered into a scratch buffer first, so a failing
/// stringifier never leaves part of its own output in `dest`. Output from
/// members rendered before the failure is not rolled back.
pub fn encode_tree<V, W, F, E>(
    tree: &MultiTree<V>,
    dest: &mut W,
    mut to_string: F,
) -> Result<(), EncodeError>
where
    W: fmt::Write + ?Sized,
    F: FnMut(&mut String, &V) -> Result<(), E>,
    E: fmt::Display,
{
    encode_node(tree, dest, &mut to_string)
}

/// Encodes `tree` into a new string.
pub fn to_json_string<V, F, E>(tree: &MultiTree<V>, to_string: F) -> Result<String, EncodeError>
where
    F: FnMut(&mut String, &V) -> Result<(), E>,
    E: fmt::Display,
{
    let mut out = String::new();
    encode_tree(tree, &mut out, to_string)?;
    Ok(out)
}

fn encode_node<V, W, F, E>(
    node: &MultiTree<V>,
    dest: &mut W,
    to_string: &mut F,
) -> Result<(), EncodeError>
where
    W: fmt::Write + ?Sized,
    F: FnMut(&mut String, &V) -> Result<(), E>,
    E: fmt::Display,
{
    dest.write_char('{')?;
    for (index, child) in node.children().enumerate() {
        if index > 0 {
            dest.write_str(MEMBER_SEPARATOR)?;
        }
        let name = child.name().ok_or(TreeError::EmptyChildName)?;
        dest.write_char('"')?;
        dest.write_str(name)?;
        dest.write_str("\":")?;

        if child.child_count() > 0 {
            encode_node(child, dest, to_string)?;
        } else {
            let value = child.value().ok_or(TreeError::EmptyValue)?;
            let mut rendered = String::new();
            if let Err(err) = to_string(&mut rendered, value) {
                warn!(name, error = %err, "leaf stringifier failed");
                return Err(EncodeError::ToStringFunction {
                    name: name.to_string(),
                    reason: err.to_string(),
                });
            }
            dest.write_str(&rendered)?;
        }
    }
    dest.write_char('}')?;
    Ok(())
}

/// Stringifier for leaves that already hold rendered JSON text.
pub fn write_raw<S: AsRef<str>>(dest: &mut String, value: &S) -> fmt::Result {
    fmt::Write::write_str(dest, value.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_two_children_literal() {
        let mut tree = MultiTree::new();
        tree.add_leaf("child1", "\"value1\"").unwrap();
        tree.add_leaf("child2", "\"value2\"").unwrap();

        let json = to_json_string(&tree, write_raw).unwrap();
        assert_eq!(json, r#"{"child1":"value1", "child2":"value2"}"#);
    }

    #[test]
    fn test_empty_root() {
        let tree: MultiTree<String> = MultiTree::new();
        assert_eq!(to_json_string(&tree, write_raw).unwrap(), "{}");
    }

    #[test]
    fn test_nested_objects() {
        let mut tree = MultiTree::new();
        tree.add_leaf("a/b", "1".to_string()).unwrap();
        tree.add_leaf("a/c/d", "2".to_string()).unwrap();
        tree.add_leaf("e", "3".to_string()).unwrap();

        let json = to_json_string(&tree, write_raw).unwrap();
        assert_eq!(json, r#"{"a":{"b":1, "c":{"d":2}}, "e":3}"#);
    }

    #[test]
    fn test_names_are_not_escaped() {
        let mut tree = MultiTree::new();
        tree.add_leaf("we\"ird", "0").unwrap();
        assert_eq!(to_json_string(&tree, write_raw).unwrap(), "{\"we\"ird\":0}");
    }

    #[test]
    fn test_stringifier_failure_short_circuits() {
        let mut tree = MultiTree::new();
        tree.add_leaf("ok", 1).unwrap();
        tree.add_leaf("bad", -1).unwrap();
        tree.add_leaf("never", 2).unwrap();

        let mut calls = 0;
        let result = to_json_string(&tree, |out: &mut String, v: &i32| {
            calls += 1;
            if *v < 0 {
                return Err("negative");
            }
            out.push_str(&v.to_string());
            Ok(())
        });

        let err = result.unwrap_err();
        assert_eq!(
            err,
            EncodeError::ToStringFunction { name: "bad".into(), reason: "negative".into() }
        );
        assert_eq!(err.kind(), ErrorKind::Error);
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_valueless_leaf_is_tree_error() {
        let mut tree: MultiTree<&str> = MultiTree::new();
        tree.add_child("empty").unwrap();
        assert_eq!(
            to_json_string(&tree, write_raw).unwrap_err(),
            EncodeError::MultiTree(TreeError::EmptyValue)
        );
    }

    #[test]
    fn test_encoding_is_idempotent() {
        let mut tree = MultiTree::new();
        tree.add_leaf("x/y", "true").unwrap();
        tree.add_leaf("z", "null").unwrap();

        let first = to_json_string(&tree, write_raw).unwrap();
        let second = to_json_string(&tree, write_raw).unwrap();
        assert_eq!(first, second);
    }

    struct FailingSink;

    impl fmt::Write for FailingSink {
        fn write_str(&mut self, _: &str) -> fmt::Result {
            Err(fmt::Error)
        }
    }

    #[test]
    fn test_sink_failure_is_error() {
        let mut tree = MultiTree::new();
        tree.add_leaf("a", "1").unwrap();
        let result = encode_tree(&tree, &mut FailingSink, write_raw);
        assert_eq!(result, Err(EncodeError::Write));
    }
}
