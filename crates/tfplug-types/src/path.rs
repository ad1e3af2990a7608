//! Attribute paths
//!
//! A path addresses one value inside an attribute tree so diagnostics can
//! point at a specific list index, map key or set member instead of the
//! whole attribute.

use crate::attr::AttrValue;
use std::fmt;

/// One step of an attribute path
#[derive(Debug, Clone, PartialEq)]
pub enum PathStep {
    /// Named attribute
    AttributeName(String),
    /// Position in a list
    ListIndex(usize),
    /// Key of a map
    MapKey(String),
    /// Member of a set, addressed by its typed value
    SetValue(AttrValue),
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStep::AttributeName(name) => write!(f, "{}", name),
            PathStep::ListIndex(index) => write!(f, "[{}]", index),
            PathStep::MapKey(key) => write!(f, "[{:?}]", key),
            PathStep::SetValue(value) => write!(f, "[Value({})]", value),
        }
    }
}

/// An ordered sequence of path steps
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    steps: Vec<PathStep>,
}

impl Path {
    /// The empty path, addressing the whole value
    pub fn empty() -> Self {
        Path::default()
    }

    /// A path starting at a named attribute
    pub fn root(name: impl Into<String>) -> Self {
        Path::empty().at_name(name)
    }

    fn with(&self, step: PathStep) -> Self {
        let mut steps = self.steps.clone();
        steps.push(step);
        Path { steps }
    }

    /// Extend with a named attribute
    pub fn at_name(&self, name: impl Into<String>) -> Self {
        self.with(PathStep::AttributeName(name.into()))
    }

    /// Extend with a list index
    pub fn at_list_index(&self, index: usize) -> Self {
        self.with(PathStep::ListIndex(index))
    }

    /// Extend with a map key
    pub fn at_map_key(&self, key: impl Into<String>) -> Self {
        self.with(PathStep::MapKey(key.into()))
    }

    /// Extend with a set member
    pub fn at_set_value(&self, value: AttrValue) -> Self {
        self.with(PathStep::SetValue(value))
    }

    /// Steps from the root
    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    /// Final step, if any
    pub fn last_step(&self) -> Option<&PathStep> {
        self.steps.last()
    }

    /// The path without its final step
    pub fn parent(&self) -> Option<Path> {
        let (_, rest) = self.steps.split_last()?;
        Some(Path {
            steps: rest.to_vec(),
        })
    }

    /// Whether the path has no steps
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 && matches!(step, PathStep::AttributeName(_)) {
                write!(f, ".")?;
            }
            write!(f, "{}", step)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let path = Path::root("rule")
            .at_list_index(0)
            .at_name("ports")
            .at_map_key("http");
        assert_eq!(path.to_string(), r#"rule[0].ports["http"]"#);

        let set_path = Path::root("tags").at_set_value(AttrValue::string("a"));
        assert_eq!(set_path.to_string(), r#"tags[Value("a")]"#);
    }

    #[test]
    fn test_extension_does_not_mutate() {
        let base = Path::root("tags");
        let child = base.at_list_index(3);

        assert_eq!(base.steps().len(), 1);
        assert_eq!(child.last_step(), Some(&PathStep::ListIndex(3)));
        assert_eq!(child.parent(), Some(base));
        assert_eq!(Path::empty().parent(), None);
    }
}
