//! Scene paths.
//!
//! A [`ScenePath`] is an absolute, slash-delimited prim path such as
//! `/Office_set/Desk_Assembly`, optionally followed by a property part
//! (`/Office_set.collection:Erasers`). `/` is the pseudo-root.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Error, Result};

/// Absolute path to a prim or a prim property.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ScenePath {
    inner: String,
}

impl ScenePath {
    /// Parse and validate a path string.
    pub fn new(path: &str) -> Result<Self> {
        if path.is_empty() {
            return Err(Error::invalid_path("empty path"));
        }
        if !path.starts_with('/') {
            return Err(Error::invalid_path(format!("{path}: path must be absolute")));
        }
        if path == "/" {
            return Ok(Self::pseudo_root());
        }

        let (prim_part, property) = match path.find('.') {
            Some(dot) => (&path[..dot], Some(&path[dot + 1..])),
            None => (path, None),
        };

        for component in prim_part[1..].split('/') {
            validate_prim_name(component)
                .map_err(|_| Error::invalid_path(format!("{path}: bad component {component:?}")))?;
        }
        if let Some(property) = property {
            validate_property_name(property)
                .map_err(|_| Error::invalid_path(format!("{path}: bad property {property:?}")))?;
        }

        Ok(Self { inner: path.to_string() })
    }

    /// The pseudo-root path `/`.
    pub fn pseudo_root() -> Self {
        Self { inner: "/".to_string() }
    }

    /// The path as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// True for `/`.
    #[inline]
    pub fn is_pseudo_root(&self) -> bool {
        self.inner == "/"
    }

    /// True if the path names a property rather than a prim.
    #[inline]
    pub fn is_property_path(&self) -> bool {
        self.inner.contains('.')
    }

    /// The prim part of this path (the path itself for prim paths).
    pub fn prim_path(&self) -> ScenePath {
        match self.inner.find('.') {
            Some(dot) => Self { inner: self.inner[..dot].to_string() },
            None => self.clone(),
        }
    }

    /// The property part, if this is a property path.
    pub fn property_name(&self) -> Option<&str> {
        self.inner.find('.').map(|dot| &self.inner[dot + 1..])
    }

    /// Last element: the property name for property paths, the prim name
    /// otherwise, and `""` for the pseudo-root.
    pub fn name(&self) -> &str {
        if let Some(property) = self.property_name() {
            return property;
        }
        match self.inner.rfind('/') {
            Some(slash) => &self.inner[slash + 1..],
            None => "",
        }
    }

    /// Parent path. Property paths have their owning prim as parent; the
    /// pseudo-root has none.
    pub fn parent(&self) -> Option<ScenePath> {
        if self.is_pseudo_root() {
            return None;
        }
        if self.is_property_path() {
            return Some(self.prim_path());
        }
        let slash = self.inner.rfind('/')?;
        if slash == 0 {
            Some(Self::pseudo_root())
        } else {
            Some(Self { inner: self.inner[..slash].to_string() })
        }
    }

    /// Iterate over this prim path and its ancestors, nearest first,
    /// stopping before the pseudo-root. Property paths start at their prim.
    pub fn ancestors(&self) -> Ancestors {
        let start = self.prim_path();
        Ancestors {
            next: (!start.is_pseudo_root()).then_some(start),
        }
    }

    /// True if `prefix` equals this path or is one of its ancestors.
    pub fn has_prefix(&self, prefix: &ScenePath) -> bool {
        if prefix.is_pseudo_root() {
            return true;
        }
        match self.inner.strip_prefix(prefix.as_str()) {
            Some("") => true,
            Some(rest) => {
                // A property prefix only matches itself
                !prefix.is_property_path() && (rest.starts_with('/') || rest.starts_with('.'))
            }
            None => false,
        }
    }

    /// Path of a child prim.
    pub fn append_child(&self, name: &str) -> Result<ScenePath> {
        if self.is_property_path() {
            return Err(Error::invalid_path(format!("{self}: cannot add a child to a property path")));
        }
        validate_prim_name(name)?;
        let inner = if self.is_pseudo_root() {
            format!("/{name}")
        } else {
            format!("{}/{name}", self.inner)
        };
        Ok(Self { inner })
    }

    /// Path of a property on this prim.
    pub fn append_property(&self, name: &str) -> Result<ScenePath> {
        if self.is_property_path() || self.is_pseudo_root() {
            return Err(Error::invalid_path(format!("{self}: cannot hold properties")));
        }
        validate_property_name(name)?;
        Ok(Self { inner: format!("{}.{name}", self.inner) })
    }
}

/// Iterator returned by [`ScenePath::ancestors`].
pub struct Ancestors {
    next: Option<ScenePath>,
}

impl Iterator for Ancestors {
    type Item = ScenePath;

    fn next(&mut self) -> Option<ScenePath> {
        let current = self.next.take()?;
        self.next = current.parent().filter(|p| !p.is_pseudo_root());
        Some(current)
    }
}

/// Check that `name` is usable as a single prim path component.
pub fn validate_prim_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(Error::invalid_path(format!("invalid prim name {name:?}")))
    }
}

fn validate_property_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && !name.starts_with(':')
        && !name.ends_with(':')
        && !name.contains("::")
        && name.chars().all(|c| c.is_alphanumeric() || c == '_' || c == ':');
    if valid {
        Ok(())
    } else {
        Err(Error::invalid_path(format!("invalid property name {name:?}")))
    }
}

impl FromStr for ScenePath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for ScenePath {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::new(&s)
    }
}

impl From<ScenePath> for String {
    fn from(path: ScenePath) -> Self {
        path.inner
    }
}

impl AsRef<str> for ScenePath {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl fmt::Display for ScenePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner)
    }
}

impl fmt::Debug for ScenePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> ScenePath {
        ScenePath::new(s).unwrap()
    }

    #[test]
    fn test_parse_valid() {
        assert!(p("/").is_pseudo_root());
        assert_eq!(p("/A/B").as_str(), "/A/B");
        assert_eq!(p("/A/B.collection:Erasers").property_name(), Some("collection:Erasers"));
    }

    #[test]
    fn test_parse_invalid() {
        for bad in ["", "A/B", "/A//B", "/A/B/", "/A.b.c", "/A/B.", "/A b", "/A.:x"] {
            assert!(ScenePath::new(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_name_and_parent() {
        let path = p("/Office_set/Desk_Assembly/Cup_grp");
        assert_eq!(path.name(), "Cup_grp");
        assert_eq!(path.parent(), Some(p("/Office_set/Desk_Assembly")));
        assert_eq!(p("/A").parent(), Some(ScenePath::pseudo_root()));
        assert_eq!(ScenePath::pseudo_root().parent(), None);
        assert_eq!(ScenePath::pseudo_root().name(), "");

        let prop = p("/A/B.collection:Shafts");
        assert_eq!(prop.name(), "collection:Shafts");
        assert_eq!(prop.parent(), Some(p("/A/B")));
    }

    #[test]
    fn test_ancestors() {
        let chain: Vec<String> = p("/A/B/C").ancestors().map(String::from).collect();
        assert_eq!(chain, vec!["/A/B/C", "/A/B", "/A"]);
        assert_eq!(ScenePath::pseudo_root().ancestors().count(), 0);
        assert_eq!(p("/A.collection:x").ancestors().next(), Some(p("/A")));
    }

    #[test]
    fn test_has_prefix() {
        let path = p("/A/B/C");
        assert!(path.has_prefix(&p("/")));
        assert!(path.has_prefix(&p("/A")));
        assert!(path.has_prefix(&p("/A/B/C")));
        assert!(!path.has_prefix(&p("/A/BB")));
        assert!(!p("/A/BB").has_prefix(&p("/A/B")));
        assert!(p("/A/B.rel").has_prefix(&p("/A/B")));
        assert!(!p("/A/B").has_prefix(&p("/A/B.rel")));
    }

    #[test]
    fn test_append() {
        assert_eq!(ScenePath::pseudo_root().append_child("A").unwrap(), p("/A"));
        assert_eq!(p("/A").append_child("B").unwrap(), p("/A/B"));
        assert_eq!(p("/A").append_property("collection:X").unwrap(), p("/A.collection:X"));
        assert!(p("/A").append_child("x/y").is_err());
        assert!(ScenePath::pseudo_root().append_property("x").is_err());
    }
}
