//! Prim handles.

use std::fmt;

use crate::collection::Collection;
use crate::core::{Relationship, SceneReader};
use crate::util::ScenePath;

/// A lightweight handle to a location on a scene.
///
/// Handles are cheap to clone and never mutate the scene. A handle may point
/// at a path where no prim exists; check [`Prim::is_valid`].
#[derive(Clone)]
pub struct Prim<'a> {
    scene: &'a dyn SceneReader,
    path: ScenePath,
}

impl<'a> Prim<'a> {
    /// Create a handle for `path` on `scene`.
    pub fn new(scene: &'a dyn SceneReader, path: ScenePath) -> Self {
        Self { scene, path }
    }

    /// The scene this prim belongs to.
    #[inline]
    pub fn scene(&self) -> &'a dyn SceneReader {
        self.scene
    }

    /// Full path.
    #[inline]
    pub fn path(&self) -> &ScenePath {
        &self.path
    }

    /// Prim name (last path component).
    #[inline]
    pub fn name(&self) -> &str {
        self.path.name()
    }

    /// True if a prim exists at this path.
    pub fn is_valid(&self) -> bool {
        !self.path.is_property_path() && self.scene.has_prim(&self.path)
    }

    /// True for the pseudo-root.
    #[inline]
    pub fn is_pseudo_root(&self) -> bool {
        self.path.is_pseudo_root()
    }

    /// Parent prim. None for the pseudo-root.
    pub fn parent(&self) -> Option<Prim<'a>> {
        self.path.parent().map(|path| Prim::new(self.scene, path))
    }

    /// Child prims in authored order.
    pub fn children(&self) -> Vec<Prim<'a>> {
        self.scene
            .children(&self.path)
            .into_iter()
            .map(|path| Prim::new(self.scene, path))
            .collect()
    }

    /// Look up another prim on the same scene.
    pub fn prim_at_path(&self, path: &ScenePath) -> Prim<'a> {
        Prim::new(self.scene, path.clone())
    }

    /// Relationships in authored order.
    pub fn relationships(&self) -> &'a [Relationship] {
        self.scene.relationships(&self.path)
    }

    /// Get a relationship by name.
    pub fn relationship(&self, name: &str) -> Option<&'a Relationship> {
        self.scene.relationship(&self.path, name)
    }

    /// Collections owned by this prim.
    pub fn collections(&self) -> &'a [Collection] {
        self.scene.collections(&self.path)
    }

    /// Get a collection by name.
    pub fn collection(&self, name: &str) -> Option<&'a Collection> {
        self.scene.collection(&self.path, name)
    }
}

impl fmt::Debug for Prim<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Prim({})", self.path)
    }
}

impl PartialEq for Prim<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path && std::ptr::addr_eq(self.scene, other.scene)
    }
}

#[cfg(test)]
mod tests {
    use crate::scene::Stage;
    use crate::util::ScenePath;

    fn p(s: &str) -> ScenePath {
        ScenePath::new(s).unwrap()
    }

    #[test]
    fn test_prim_navigation() {
        let mut stage = Stage::new();
        stage.define_prim(&p("/A/B")).unwrap();
        stage.define_prim(&p("/A/C")).unwrap();

        let b = stage.prim_at_path(&p("/A/B"));
        assert!(b.is_valid());
        assert_eq!(b.name(), "B");

        let a = b.parent().unwrap();
        assert_eq!(a.path(), &p("/A"));
        let names: Vec<String> = a.children().iter().map(|c| c.name().to_string()).collect();
        assert_eq!(names, vec!["B", "C"]);

        let root = a.parent().unwrap();
        assert!(root.is_pseudo_root());
        assert!(root.is_valid());
        assert!(root.parent().is_none());
    }

    #[test]
    fn test_invalid_prim() {
        let stage = Stage::new();
        let missing = stage.prim_at_path(&p("/Missing"));
        assert!(!missing.is_valid());
        assert!(missing.relationships().is_empty());
        assert!(missing.children().is_empty());

        let property = stage.prim_at_path(&p("/Missing.rel"));
        assert!(!property.is_valid());
    }

    #[test]
    fn test_prim_equality() {
        let mut stage = Stage::new();
        stage.define_prim(&p("/A")).unwrap();
        let other = Stage::new();

        assert_eq!(stage.prim_at_path(&p("/A")), stage.prim_at_path(&p("/A")));
        assert_ne!(stage.prim_at_path(&p("/A")), other.prim_at_path(&p("/A")));
    }
}
