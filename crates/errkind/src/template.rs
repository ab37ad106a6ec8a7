//! Error templates: a message pattern plus inherited base values.
//!
//! A template is the *kind* of an error. It is created once, never mutated,
//! and shared freely between threads. Every builder call on a template
//! promotes it to a fresh [`Occurrence`] first, so chains that start from a
//! shared template never touch the template itself:
//!
//! ```
//! use errkind::{Template, ValueAccess};
//!
//! let not_found = Template::new("user %d not found");
//! let err = not_found.args([42]).set("retry", false);
//!
//! assert_eq!(err.to_string(), "user 42 not found");
//! assert!(err.is_instance_of(&not_found));
//! assert_eq!(not_found.get("retry"), None);
//! ```

use std::borrow::Cow;
use std::error::Error;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::hint::black_box;
use std::sync::Arc;

use crate::occurrence::{Cause, Occurrence};
use crate::throttle::{self, Throttle};
use crate::value::{Value, ValueAccess, Values};

/// Identity of a template, derived from its shared allocation.
///
/// Two occurrences have the same `TemplateId` iff they were instantiated
/// (directly or through another occurrence) from the same template.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct TemplateId(usize);

impl TemplateId {
    /// Raw address value.
    #[inline]
    pub const fn raw(&self) -> usize {
        self.0
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tmpl:{:#x}", self.0)
    }
}

impl fmt::Debug for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

struct TemplateInner {
    message: Cow<'static, str>,
    values: Values,
}

/// An immutable error kind.
///
/// Cloning a `Template` is cheap and keeps its identity: clones compare
/// equal and produce occurrences of the same kind.
#[derive(Clone)]
pub struct Template {
    inner: Arc<TemplateInner>,
}

impl Template {
    /// A template with no base values.
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self::with_values(message, Values::new())
    }

    /// A template whose occurrences each start with a private copy of
    /// `values`.
    pub fn with_values(message: impl Into<Cow<'static, str>>, values: Values) -> Self {
        Self {
            inner: Arc::new(TemplateInner {
                message: message.into(),
                values,
            }),
        }
    }

    #[inline]
    pub fn id(&self) -> TemplateId {
        TemplateId(Arc::as_ptr(&self.inner) as *const () as usize)
    }

    /// The message pattern, before argument substitution.
    pub fn message(&self) -> &str {
        &self.inner.message
    }

    /// True iff both handles refer to the same template.
    #[inline]
    pub fn same(&self, other: &Template) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// True if any node in `err`'s chain is an occurrence of this template.
    pub fn matches(&self, err: &(dyn Error + 'static)) -> bool {
        crate::chain::matches(self, err)
    }

    // ── Promotion ─────────────────────────────────────────────
    //
    // Every entry point below is `#[inline(never)]` and calls
    // `Occurrence::spawn` directly: frame capture skips exactly the entry
    // point and `spawn`, so the first frame is the caller's call site.
    // `black_box` keeps a bare `spawn` out of tail position, where it could
    // become a sibling call and take this frame off the stack.

    /// A fresh occurrence, consulting the process-wide throttle.
    #[inline(never)]
    pub fn instantiate(&self) -> Occurrence {
        black_box(Occurrence::spawn(self, self.message().to_string(), self.inner.values.clone(), throttle::global()))
    }

    /// A fresh occurrence, consulting `throttle` instead of the global one.
    #[inline(never)]
    pub fn instantiate_with(&self, throttle: &Throttle) -> Occurrence {
        black_box(Occurrence::spawn(self, self.message().to_string(), self.inner.values.clone(), throttle))
    }

    /// A fresh occurrence with `args` substituted into the message.
    #[inline(never)]
    pub fn args<I>(&self, args: I) -> Occurrence
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Occurrence::spawn(self, self.message().to_string(), self.inner.values.clone(), throttle::global())
            .args(args)
    }

    /// A fresh occurrence wrapping `cause`.
    #[inline(never)]
    pub fn wrap<E>(&self, cause: E) -> Occurrence
    where
        E: Error + Send + Sync + 'static,
    {
        Occurrence::spawn(self, self.message().to_string(), self.inner.values.clone(), throttle::global())
            .wrap(cause)
    }

    /// A fresh occurrence wrapping an already shared cause.
    #[inline(never)]
    pub fn wrap_shared(&self, cause: Cause) -> Occurrence {
        Occurrence::spawn(self, self.message().to_string(), self.inner.values.clone(), throttle::global())
            .wrap_shared(cause)
    }

    /// A fresh occurrence with `key` set.
    #[inline(never)]
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> Occurrence {
        Occurrence::spawn(self, self.message().to_string(), self.inner.values.clone(), throttle::global())
            .set(key, value)
    }
}

impl ValueAccess for Template {
    /// The base store every occurrence inherits.
    fn values(&self) -> &Values {
        &self.inner.values
    }
}

impl PartialEq for Template {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl Eq for Template {}

impl Hash for Template {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("id", &self.id())
            .field("message", &self.message())
            .field("values", &self.inner.values)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_is_pattern() {
        let t = Template::new("args: %s, %v");
        assert_eq!(t.message(), "args: %s, %v");
        assert_eq!(t.to_string(), "args: %s, %v");
    }

    #[test]
    fn identity_by_allocation() {
        let a = Template::new("same text");
        let b = Template::new("same text");
        assert_eq!(a, a.clone());
        assert_eq!(a.id(), a.clone().id());
        assert_ne!(a, b);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn base_values_readable() {
        let t = Template::with_values("test", Values::new().with("foo", "bar").with("baz", "qux"));
        assert_eq!(t.get_str("foo"), Some("bar"));
        assert_eq!(t.values().len(), 2);
    }

    #[test]
    fn builders_never_touch_template() {
        let t = Template::with_values("test %d", Values::new().with("foo", "bar"));
        let err = t.set("foo", "baz").args([1]);
        assert_eq!(err.get_str("foo"), Some("baz"));
        assert_eq!(err.message(), "test 1");
        assert_eq!(t.get_str("foo"), Some("bar"));
        assert_eq!(t.message(), "test %d");
    }

    #[test]
    fn every_builder_promotes() {
        let t = Template::new("kind");
        let io = std::io::Error::new(std::io::ErrorKind::Other, "io");
        for occ in [t.instantiate(), t.args([1]), t.wrap(io), t.set("k", 1)] {
            assert!(occ.is_instance_of(&t));
        }
    }

    #[test]
    fn display_id() {
        let t = Template::new("x");
        assert!(t.id().to_string().starts_with("tmpl:0x"));
        assert_eq!(format!("{:?}", t.id()), t.id().to_string());
    }
}
