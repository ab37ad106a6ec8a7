//! Walking causal chains.
//!
//! A chain is `err`, `err.source()`, `err.source().source()`, ... and may mix
//! occurrences with arbitrary foreign errors. Occurrences are recognised by
//! downcasting; kinds are compared by template identity, never by message
//! text or structure.

use std::error::Error;
use std::iter::FusedIterator;

use crate::occurrence::Occurrence;
use crate::template::Template;

/// Iterator over an error and its transitive sources, outermost first.
#[derive(Clone)]
pub struct Chain<'a> {
    next: Option<&'a (dyn Error + 'static)>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a (dyn Error + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.source();
        Some(current)
    }
}

impl FusedIterator for Chain<'_> {}

/// Iterate `err` and every error it wraps.
pub fn chain<'a>(err: &'a (dyn Error + 'static)) -> Chain<'a> {
    Chain { next: Some(err) }
}

/// Occurrences in `err`'s chain, outermost first.
pub fn occurrences<'a>(err: &'a (dyn Error + 'static)) -> impl Iterator<Item = &'a Occurrence> {
    chain(err).filter_map(|e| e.downcast_ref::<Occurrence>())
}

/// The outermost occurrence in the chain, starting with `err` itself.
pub fn first<'a>(err: &'a (dyn Error + 'static)) -> Option<&'a Occurrence> {
    occurrences(err).next()
}

/// The innermost occurrence in the chain, closest to the root cause.
pub fn last<'a>(err: &'a (dyn Error + 'static)) -> Option<&'a Occurrence> {
    occurrences(err).last()
}

/// True if any occurrence in the chain was instantiated from `template`.
pub fn matches(template: &Template, err: &(dyn Error + 'static)) -> bool {
    occurrences(err).any(|occ| occ.is_instance_of(template))
}

/// Extract the first occurrence in `err`'s chain whose kind matches the
/// occurrence currently held in `slot`.
///
/// On a match the slot is overwritten with that node and `true` is
/// returned. An empty slot fails immediately without walking `err`; a miss
/// leaves the slot untouched.
///
/// ```
/// use errkind::{extract, Template, ValueAccess};
///
/// let open_failed = Template::new("open failed");
/// let request_failed = Template::new("request failed");
///
/// let err = request_failed.wrap(open_failed.set("path", "/etc/app.toml"));
///
/// let mut slot = Some(open_failed.instantiate());
/// assert!(extract(&err, &mut slot));
/// assert_eq!(slot.unwrap().get_str("path"), Some("/etc/app.toml"));
/// ```
pub fn extract(err: &(dyn Error + 'static), slot: &mut Option<Occurrence>) -> bool {
    let Some(target) = slot.as_ref() else {
        return false;
    };

    match occurrences(err).find(|occ| occ.same_kind(target)) {
        Some(found) => {
            *slot = Some(found.clone());
            true
        }
        None => false,
    }
}
