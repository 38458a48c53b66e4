//! Collection membership queries.
//!
//! A [`MembershipQuery`] flattens a collection (and any collections it
//! includes) into a map from path to rule. Membership of a path is decided by
//! the nearest entry found at the path or above it.

use std::collections::HashMap;

use crate::core::SceneReader;
use crate::util::{Error, Result, ScenePath};
use super::{collection_path, parse_collection_path, Collection, ExpansionRule};

/// Rule recorded for a single path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Rule {
    Include(ExpansionRule),
    Exclude,
}

/// Flattened include/exclude rules of a collection.
#[derive(Clone, Debug, Default)]
pub struct MembershipQuery {
    rules: HashMap<ScenePath, Rule>,
}

impl MembershipQuery {
    /// Flatten `collection`, owned by the prim at `owner`.
    ///
    /// Include targets that name other collections pull in those collections'
    /// rules. Fails with [`Error::CollectionCycle`] if a collection ends up
    /// including itself.
    pub fn compute(scene: &dyn SceneReader, owner: &ScenePath, collection: &Collection) -> Result<Self> {
        let mut query = Self::default();
        let mut stack = Vec::new();
        let path = collection_path(owner, collection.name())?;
        query.flatten(scene, &path, collection, &mut stack)?;
        Ok(query)
    }

    fn flatten(
        &mut self,
        scene: &dyn SceneReader,
        path: &ScenePath,
        collection: &Collection,
        stack: &mut Vec<ScenePath>,
    ) -> Result<()> {
        if stack.contains(path) {
            return Err(Error::CollectionCycle(path.to_string()));
        }
        stack.push(path.clone());

        let rule = Rule::Include(collection.expansion_rule());
        if collection.include_root() {
            self.rules.insert(ScenePath::pseudo_root(), rule);
        }

        for include in collection.includes() {
            if parse_collection_path(include).is_some() {
                match scene.collection_at(include) {
                    Some(nested) => self.flatten(scene, include, nested, stack)?,
                    None => tracing::trace!(%include, "included collection not found"),
                }
            } else {
                self.rules.insert(include.clone(), rule);
            }
        }

        // Excludes are applied last so they win over includes of the same path
        for exclude in collection.excludes() {
            self.rules.insert(exclude.clone(), Rule::Exclude);
        }

        stack.pop();
        Ok(())
    }

    /// Check whether `path` is a member.
    pub fn is_path_included(&self, path: &ScenePath) -> bool {
        if let Some(rule) = self.rules.get(path) {
            return matches!(rule, Rule::Include(_));
        }

        let mut current = path.parent();
        while let Some(ancestor) = current {
            if let Some(rule) = self.rules.get(&ancestor) {
                return match rule {
                    Rule::Exclude => false,
                    Rule::Include(ExpansionRule::ExplicitOnly) => false,
                    Rule::Include(ExpansionRule::ExpandPrims) => !path.is_property_path(),
                    Rule::Include(ExpansionRule::ExpandPrimsAndProperties) => true,
                };
            }
            current = ancestor.parent();
        }

        false
    }

    /// True if no rules were recorded.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Number of recorded rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }
}
