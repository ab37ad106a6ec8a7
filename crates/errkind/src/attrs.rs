//! Diagnostic attribute trees for structured logging.
//!
//! ```text
//! <group>
//! ├── error       = "open failed: permission denied"   (include_text only)
//! ├── stack
//! │   ├── 0       = "app::load src/app.rs:31"
//! │   └── 1       = "app::main src/main.rs:8"
//! ├── values
//! │   └── path    = "/etc/app.toml"                    (sorted by key)
//! └── last_error                                        (innermost occurrence,
//!     ├── error   = ...                                  when it is not the
//!     ├── stack                                          node itself)
//!     └── values
//! ```
//!
//! The tree renders with `Display` as `group={error="...", stack={...}}`, which
//! is what the demo binary hands to `tracing`.

use std::fmt;

use crate::chain;
use crate::occurrence::Occurrence;
use crate::value::ValueAccess;

/// Key of the rendered text attribute.
pub const TEXT_KEY: &str = "error";
/// Group holding the captured frames.
pub const STACK_GROUP: &str = "stack";
/// Group holding the value store.
pub const VALUES_GROUP: &str = "values";
/// Group holding the innermost occurrence of the chain.
pub const LAST_ERROR_GROUP: &str = "last_error";

/// One node of an attribute tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Attr {
    pub key: String,
    pub value: AttrValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Text(String),
    Group(Vec<Attr>),
}

impl Attr {
    pub fn text(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: AttrValue::Text(value.into()),
        }
    }

    pub fn group(key: impl Into<String>, attrs: Vec<Attr>) -> Self {
        Self {
            key: key.into(),
            value: AttrValue::Group(attrs),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            AttrValue::Text(s) => Some(s),
            AttrValue::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&[Attr]> {
        match &self.value {
            AttrValue::Group(attrs) => Some(attrs),
            AttrValue::Text(_) => None,
        }
    }

    /// Direct child named `key`.
    pub fn child(&self, key: &str) -> Option<&Attr> {
        self.as_group()?.iter().find(|a| a.key == key)
    }
}

impl fmt::Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=", self.key)?;
        match &self.value {
            AttrValue::Text(s) => write!(f, "{:?}", s),
            AttrValue::Group(attrs) => {
                f.write_str("{")?;
                for (i, attr) in attrs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", attr)?;
                }
                f.write_str("}")
            }
        }
    }
}

/// Project `occ` into a tree under `group`.
///
/// Recurses once: the nested `last_error` node never carries its own
/// `last_error`, since [`chain::last`] already resolves the far end.
pub(crate) fn project(occ: &Occurrence, group: &str, include_text: bool) -> Attr {
    let mut attrs = node_attrs(occ, include_text);

    if let Some(last) = chain::last(occ) {
        if !std::ptr::eq(last, occ) {
            attrs.push(Attr::group(LAST_ERROR_GROUP, node_attrs(last, include_text)));
        }
    }

    Attr::group(group, attrs)
}

fn node_attrs(occ: &Occurrence, include_text: bool) -> Vec<Attr> {
    let mut attrs = Vec::with_capacity(3);
    if include_text {
        attrs.push(Attr::text(TEXT_KEY, occ.to_string()));
    }

    let stack = occ
        .frames()
        .iter()
        .enumerate()
        .map(|(i, frame)| Attr::text(i.to_string(), frame.to_string()))
        .collect();
    attrs.push(Attr::group(STACK_GROUP, stack));

    let values = occ
        .values()
        .sorted()
        .into_iter()
        .map(|(k, v)| Attr::text(k, v.to_string()))
        .collect();
    attrs.push(Attr::group(VALUES_GROUP, values));

    attrs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Template;

    #[test]
    fn tree_layout() {
        let err = Template::new("values error").set("key", "value").set("key2", 42);
        let attrs = err.attributes("test", true);
        assert_eq!(attrs.key, "test");

        let group = attrs.as_group().unwrap();
        assert_eq!(group.len(), 3);

        assert_eq!(group[0].key, "error");
        assert_eq!(group[0].as_text(), Some("values error"));

        assert_eq!(group[1].key, "stack");
        let stack = group[1].as_group().unwrap();
        assert_eq!(stack.len(), err.frames().len());
        assert_eq!(stack[0].key, "0");
        assert_eq!(stack[0].as_text(), Some(err.frames()[0].to_string().as_str()));

        assert_eq!(group[2].key, "values");
        let values = group[2].as_group().unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0], Attr::text("key", "value"));
        assert_eq!(values[1], Attr::text("key2", "42"));
    }

    #[test]
    fn text_optional() {
        let err = Template::new("quiet").instantiate();
        let attrs = err.attributes("e", false);
        assert!(attrs.child(TEXT_KEY).is_none());
        assert!(attrs.child(STACK_GROUP).is_some());
        assert!(attrs.child(VALUES_GROUP).is_some());
    }

    #[test]
    fn nests_innermost_occurrence() {
        let inner = Template::new("jerr2").set("jerr", 2);
        let outer = Template::new("jerr1").set("jerr", 1).wrap(inner);

        let attrs = outer.attributes("test", true);
        let values = attrs.child(VALUES_GROUP).unwrap().as_group().unwrap();
        assert_eq!(values, [Attr::text("jerr", "1")]);

        let last = attrs.child("last_error").unwrap();
        assert_eq!(last.key, LAST_ERROR_GROUP);
        assert_eq!(last.child(TEXT_KEY).and_then(Attr::as_text), Some("jerr2"));
        let values = last.child(VALUES_GROUP).unwrap().as_group().unwrap();
        assert_eq!(values, [Attr::text("jerr", "2")]);
        assert!(last.child(LAST_ERROR_GROUP).is_none());
    }

    #[test]
    fn skips_self_as_last() {
        let err = Template::new("alone").wrap(std::io::Error::new(std::io::ErrorKind::Other, "io"));
        assert!(err.attributes("g", true).child(LAST_ERROR_GROUP).is_none());
    }

    #[test]
    fn display_rendering() {
        let attr = Attr::group(
            "err",
            vec![Attr::text("error", "boom"), Attr::group("values", vec![Attr::text("k", "v")])],
        );
        assert_eq!(attr.to_string(), r#"err={error="boom", values={k="v"}}"#);
    }
}
