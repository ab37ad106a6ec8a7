//! Error occurrences: one concrete instance of a template.
//!
//! An occurrence carries:
//!
//! - the (possibly argument-substituted) message
//! - its template, which is its identity and is never reassigned
//! - an optional wrapped cause, any `Error + Send + Sync`
//! - a private [`Values`] copy of the template's base values
//! - the frames captured at the creating call site (empty when throttled)
//!
//! Builder methods take `self` by value and hand it back, so an occurrence
//! can only be modified while its creator still owns it. Once shared
//! behind a reference it is read-only.

use std::error::Error;
use std::fmt;
use std::hint::black_box;
use std::sync::Arc;

use crate::attrs::{self, Attr};
use crate::config;
use crate::format;
use crate::frame::{self, Frame, Frames};
use crate::template::Template;
use crate::throttle::{self, Throttle};
use crate::value::{Value, ValueAccess, Values};

/// A wrapped cause, shared so that it can be recovered by reference.
pub type Cause = Arc<dyn Error + Send + Sync + 'static>;

/// Text placed between an occurrence's message and its cause's text.
pub const CAUSE_SEPARATOR: &str = ": ";

/// Frames to skip above `frame::capture`: `Occurrence::spawn` and the
/// public entry point that called it.
const SPAWN_SKIP: usize = 2;

/// One concrete error.
#[derive(Clone)]
pub struct Occurrence {
    template: Template,
    message: String,
    cause: Option<Cause>,
    values: Values,
    frames: Frames,
}

// ── Construction ──────────────────────────────────────────────────

impl Occurrence {
    /// Shared instantiation path. Callers must be public entry points
    /// marked `#[inline(never)]` so that [`SPAWN_SKIP`] holds.
    #[inline(never)]
    pub(crate) fn spawn(template: &Template, message: String, values: Values, throttle: &Throttle) -> Self {
        let capture = config::current();
        let frames = if capture.enabled && throttle.try_consume() {
            frame::capture(SPAWN_SKIP, capture.depth)
        } else {
            Frames::empty()
        };

        Self {
            template: template.clone(),
            message,
            cause: None,
            values,
            frames,
        }
    }

    /// A fresh occurrence using this one as its template.
    ///
    /// The new occurrence keeps the *original* template's identity, copies
    /// this occurrence's message and values, has no cause, and captures its
    /// own frames.
    #[inline(never)]
    pub fn instantiate(&self) -> Occurrence {
        black_box(Occurrence::spawn(&self.template, self.message.clone(), self.values.clone(), throttle::global()))
    }

    /// Replace the frames with a capture taken at the caller's site.
    ///
    /// Not subject to the throttle.
    #[inline(never)]
    pub fn with_stack(mut self) -> Self {
        self.frames = frame::capture(1, config::current().depth);
        self
    }
}

// ── Builders ──────────────────────────────────────────────────────

impl Occurrence {
    /// Substitute `args` into the message (printf-style verbs).
    pub fn args<I>(mut self, args: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let args: Vec<Value> = args.into_iter().map(Into::into).collect();
        self.message = format::substitute(&self.message, &args);
        self
    }

    /// Wrap `cause`, replacing any previous cause.
    pub fn wrap<E>(self, cause: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        self.wrap_shared(Arc::new(cause))
    }

    /// Wrap a boxed error.
    pub fn wrap_boxed(self, cause: Box<dyn Error + Send + Sync + 'static>) -> Self {
        self.wrap_shared(Arc::from(cause))
    }

    /// Wrap an already shared cause; [`Occurrence::cause`] returns the same
    /// allocation.
    pub fn wrap_shared(mut self, cause: Cause) -> Self {
        self.cause = Some(cause);
        self
    }

    /// Set `key`, overwriting any inherited or earlier value.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key, value);
        self
    }

    /// In-place variant of [`Occurrence::set`].
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key, value)
    }
}

// ── Accessors ─────────────────────────────────────────────────────

impl Occurrence {
    /// The template this occurrence was instantiated from.
    #[inline]
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// This node's own message, without the cause's text.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Message followed by the cause chain's text. Same as `to_string()`.
    pub fn full_text(&self) -> String {
        self.to_string()
    }

    /// The wrapped cause, if any.
    pub fn cause(&self) -> Option<&Cause> {
        self.cause.as_ref()
    }

    /// Captured frames, empty when capture was throttled or disabled.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// True iff both were instantiated from the same template.
    #[inline]
    pub fn same_kind(&self, other: &Occurrence) -> bool {
        self.template.same(&other.template)
    }

    /// True iff this occurrence was instantiated from `template`.
    #[inline]
    pub fn is_instance_of(&self, template: &Template) -> bool {
        self.template.same(template)
    }

    /// True iff `other` is an occurrence of the same template.
    ///
    /// Only `other` itself is inspected; use [`crate::matches`] to search a
    /// whole chain.
    pub fn is(&self, other: &(dyn Error + 'static)) -> bool {
        other
            .downcast_ref::<Occurrence>()
            .is_some_and(|occ| self.same_kind(occ))
    }

    /// Structured diagnostic tree for logging; see [`crate::attrs`].
    pub fn attributes(&self, group: &str, include_text: bool) -> Attr {
        attrs::project(self, group, include_text)
    }
}

impl ValueAccess for Occurrence {
    fn values(&self) -> &Values {
        &self.values
    }
}

// ── std::error::Error ─────────────────────────────────────────────

impl Error for Occurrence {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause.as_deref().map(|e| e as &(dyn Error + 'static))
    }
}

impl fmt::Display for Occurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if let Some(cause) = &self.cause {
            write!(f, "{}{}", CAUSE_SEPARATOR, cause)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Occurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("Occurrence");
        d.field("template", &self.template.id());
        d.field("message", &self.message);
        if !self.values.is_empty() {
            d.field("values", &self.values);
        }
        if !self.frames.is_empty() {
            d.field("frames", &self.frames);
        }
        if let Some(cause) = &self.cause {
            d.field("cause", &cause.to_string());
        }
        d.finish()
    }
}
