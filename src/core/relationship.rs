//! Relationships: named, ordered lists of target paths on a prim.

use crate::util::ScenePath;
use super::MetaData;

/// A relationship authored on a prim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Relationship {
    name: String,
    targets: Vec<ScenePath>,
    metadata: MetaData,
}

impl Relationship {
    /// Create a relationship with no targets.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            targets: Vec::new(),
            metadata: MetaData::new(),
        }
    }

    /// Create a relationship with targets.
    pub fn with_targets(name: impl Into<String>, targets: Vec<ScenePath>) -> Self {
        Self {
            targets,
            ..Self::new(name)
        }
    }

    /// Relationship name, e.g. `material:binding:full`.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Targets in authored order.
    #[inline]
    pub fn targets(&self) -> &[ScenePath] {
        &self.targets
    }

    /// First target, if any.
    pub fn first_target(&self) -> Option<&ScenePath> {
        self.targets.first()
    }

    /// Replace all targets.
    pub fn set_targets(&mut self, targets: Vec<ScenePath>) {
        self.targets = targets;
    }

    /// Append a target.
    pub fn add_target(&mut self, target: ScenePath) {
        self.targets.push(target);
    }

    /// Relationship metadata.
    #[inline]
    pub fn metadata(&self) -> &MetaData {
        &self.metadata
    }

    /// Mutable relationship metadata.
    #[inline]
    pub fn metadata_mut(&mut self) -> &mut MetaData {
        &mut self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relationship_targets() {
        let mut rel = Relationship::new("material:binding");
        assert!(rel.first_target().is_none());

        rel.add_target(ScenePath::new("/Looks/Red").unwrap());
        rel.add_target(ScenePath::new("/Looks/Blue").unwrap());
        assert_eq!(rel.targets().len(), 2);
        assert_eq!(rel.first_target().map(|p| p.as_str()), Some("/Looks/Red"));
    }
}
