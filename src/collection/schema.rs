//! Collection schema implementation.
//!
//! A collection is owned by a prim and addressed as a property of it:
//! `/Office_set.collection:Erasers`.

use crate::core::SceneReader;
use crate::util::{Result, ScenePath};
use super::{MembershipQuery, COLLECTION_NAMESPACE};

/// How include paths expand to their descendants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ExpansionRule {
    /// Only the listed paths are members.
    ExplicitOnly,
    /// Listed paths and all descendant prims are members.
    #[default]
    ExpandPrims,
    /// Listed paths, descendant prims and their properties are members.
    ExpandPrimsAndProperties,
}

impl ExpansionRule {
    /// Parse expansion rule from its token. Unknown tokens fall back to the default.
    pub fn from_token(token: &str) -> Self {
        match token {
            "explicitOnly" => ExpansionRule::ExplicitOnly,
            "expandPrimsAndProperties" => ExpansionRule::ExpandPrimsAndProperties,
            _ => ExpansionRule::ExpandPrims,
        }
    }

    /// Token spelling.
    pub fn as_token(&self) -> &'static str {
        match self {
            ExpansionRule::ExplicitOnly => "explicitOnly",
            ExpansionRule::ExpandPrims => "expandPrims",
            ExpansionRule::ExpandPrimsAndProperties => "expandPrimsAndProperties",
        }
    }
}

/// A named set of paths, described by include/exclude rules.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Collection {
    name: String,
    includes: Vec<ScenePath>,
    excludes: Vec<ScenePath>,
    expansion_rule: ExpansionRule,
    include_root: bool,
}

impl Collection {
    /// Create an empty collection.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Collection name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add an include path. May be another collection's path.
    pub fn include(&mut self, path: ScenePath) {
        self.includes.push(path);
    }

    /// Add an exclude path.
    pub fn exclude(&mut self, path: ScenePath) {
        self.excludes.push(path);
    }

    /// Builder: set the expansion rule.
    pub fn with_expansion_rule(mut self, rule: ExpansionRule) -> Self {
        self.expansion_rule = rule;
        self
    }

    /// Builder: include the pseudo-root.
    pub fn with_include_root(mut self, include_root: bool) -> Self {
        self.include_root = include_root;
        self
    }

    /// Include paths in authored order.
    #[inline]
    pub fn includes(&self) -> &[ScenePath] {
        &self.includes
    }

    /// Exclude paths in authored order.
    #[inline]
    pub fn excludes(&self) -> &[ScenePath] {
        &self.excludes
    }

    /// Expansion rule.
    #[inline]
    pub fn expansion_rule(&self) -> ExpansionRule {
        self.expansion_rule
    }

    /// Whether `/` is included.
    #[inline]
    pub fn include_root(&self) -> bool {
        self.include_root
    }

    /// True when nothing can be a member.
    pub fn is_empty(&self) -> bool {
        self.includes.is_empty() && !self.include_root
    }

    /// Build the membership query for this collection as owned by `owner`.
    pub fn membership_query(&self, scene: &dyn SceneReader, owner: &ScenePath) -> Result<MembershipQuery> {
        MembershipQuery::compute(scene, owner, self)
    }
}

// ============================================================================
// Collection Utilities
// ============================================================================

/// Build the path of the collection `name` owned by `owner`.
pub fn collection_path(owner: &ScenePath, name: &str) -> Result<ScenePath> {
    owner.append_property(&format!("{COLLECTION_NAMESPACE}:{name}"))
}

/// Split a collection path into owner prim path and collection name.
///
/// Returns None if `path` does not name a collection.
pub fn parse_collection_path(path: &ScenePath) -> Option<(ScenePath, &str)> {
    let property = path.property_name()?;
    let name = property
        .strip_prefix(COLLECTION_NAMESPACE)?
        .strip_prefix(':')?;
    if name.is_empty() {
        return None;
    }
    Some((path.prim_path(), name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> ScenePath {
        ScenePath::new(s).unwrap()
    }

    #[test]
    fn test_collection_basic() {
        let mut coll = Collection::new("render_objects");
        assert!(coll.is_empty());

        coll.include(p("/root/mesh1"));
        coll.include(p("/root/mesh2"));
        coll.exclude(p("/root/mesh2/hidden"));

        assert!(!coll.is_empty());
        assert_eq!(coll.includes().len(), 2);
        assert_eq!(coll.excludes().len(), 1);
        assert_eq!(coll.expansion_rule(), ExpansionRule::ExpandPrims);

        let root_only = Collection::new("everything").with_include_root(true);
        assert!(!root_only.is_empty());
    }

    #[test]
    fn test_expansion_rule_tokens() {
        for rule in [
            ExpansionRule::ExplicitOnly,
            ExpansionRule::ExpandPrims,
            ExpansionRule::ExpandPrimsAndProperties,
        ] {
            assert_eq!(ExpansionRule::from_token(rule.as_token()), rule);
        }
        assert_eq!(ExpansionRule::from_token("bogus"), ExpansionRule::ExpandPrims);
    }

    #[test]
    fn test_collection_path_roundtrip() {
        let path = collection_path(&p("/Office_set"), "Erasers").unwrap();
        assert_eq!(path.as_str(), "/Office_set.collection:Erasers");

        let (owner, name) = parse_collection_path(&path).unwrap();
        assert_eq!(owner, p("/Office_set"));
        assert_eq!(name, "Erasers");

        assert!(parse_collection_path(&p("/Office_set")).is_none());
        assert!(parse_collection_path(&p("/Office_set.material:binding")).is_none());
    }
}
