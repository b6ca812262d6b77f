//! Contains names via the [`Name`] type.

use std::cmp::Ordering;
use std::fmt::{Debug, Display, Formatter};
use std::ops::Deref;
use std::sync::{Arc, Mutex};

lazy_static::lazy_static! {
    /// Deduplicates the backing string of every [`Name`] built at runtime.
    static ref INTERNED_NAMES: Mutex<Vec<Arc<String>>> = Mutex::new(Vec::default());
}

/// Any PDDL name: a letter followed by letters, digits, hyphens and
/// underscores. Names are interned, so cloning one is cheap no matter how
/// often the same identifier occurs in a domain.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Default)]
pub struct Name(NameVariant);

#[derive(Clone, PartialEq, Eq, Hash)]
enum NameVariant {
    Interned(Arc<String>),
    Static(&'static str),
}

impl Name {
    /// Constructs a new [`Name`], deduplicating the backing string.
    #[inline(always)]
    pub fn new<S: Into<String> + AsRef<str>>(name: S) -> Self {
        if name.as_ref() == well_known::OBJECT {
            return Self::new_static(well_known::OBJECT);
        }

        let mut guard = INTERNED_NAMES.lock().expect("name table poisoned");
        let name_ref = name.as_ref();
        let pos = match guard.binary_search_by(|interned| interned.as_str().cmp(name_ref)) {
            Ok(pos) => pos,
            Err(pos) => {
                guard.insert(pos, Arc::new(name.into()));
                pos
            }
        };

        Self(NameVariant::Interned(guard[pos].clone()))
    }

    /// Like [`Name::new`] but `const`; the string is not interned.
    #[inline(always)]
    pub const fn new_static(name: &'static str) -> Self {
        Self(NameVariant::Static(name))
    }

    #[inline(always)]
    pub fn as_str(&self) -> &str {
        self
    }

    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }

    pub fn len(&self) -> usize {
        self.as_str().len()
    }
}

/// Well-known names kept out of the interning table.
mod well_known {
    pub static OBJECT: &str = "object";
}

impl<T> From<T> for Name
where
    T: Into<String> + AsRef<str>,
{
    #[inline(always)]
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl AsRef<str> for Name {
    #[inline(always)]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for Name {
    type Target = str;

    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl PartialEq<str> for Name {
    #[inline(always)]
    fn eq(&self, other: &str) -> bool {
        self.as_str().eq(other)
    }
}

impl PartialEq<&str> for Name {
    #[inline(always)]
    fn eq(&self, other: &&str) -> bool {
        self.as_str().eq(*other)
    }
}

impl PartialEq<String> for Name {
    #[inline(always)]
    fn eq(&self, other: &String) -> bool {
        self.as_str().eq(other.as_str())
    }
}

impl PartialOrd for Name {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Name {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Default for NameVariant {
    fn default() -> Self {
        Self::Static("")
    }
}

impl Deref for NameVariant {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        match self {
            NameVariant::Interned(str) => str.as_str(),
            NameVariant::Static(str) => str,
        }
    }
}

impl Debug for NameVariant {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", &**self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_deduplicates() {
        let a = Name::new(String::from("some-block"));
        let b = Name::new("some-block");
        assert_eq!(a, b);
        assert_eq!(a, "some-block");
    }

    #[test]
    fn object_maps_to_static() {
        assert_eq!(Name::new("object"), Name::new_static("object"));
    }

    #[test]
    fn names_order_like_strings() {
        assert!(Name::new("clear") < Name::new("on"));
    }
}
