//! Type definitions for tree paths.

use std::borrow::Cow;
use std::fmt;

/// One selector in a tree path.
///
/// A record field is addressed by name, a list element by position and a
/// dictionary entry by key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathStep {
    Field(String),
    Index(usize),
    Key(String),
}

impl PathStep {
    /// The raw pointer component for this step (unescaped).
    pub fn component(&self) -> Cow<'_, str> {
        match self {
            PathStep::Field(name) => Cow::Borrowed(name),
            PathStep::Index(idx) => Cow::Owned(idx.to_string()),
            PathStep::Key(key) => Cow::Borrowed(key),
        }
    }

    /// Returns `true` when the step would match the raw pointer component.
    pub fn matches(&self, component: &str) -> bool {
        match self {
            PathStep::Field(name) => name == component,
            PathStep::Index(idx) => {
                crate::is_valid_index(component)
                    && component.parse::<usize>().is_ok_and(|c| c == *idx)
            }
            PathStep::Key(key) => key == component,
        }
    }
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStep::Field(name) => write!(f, ".{name}"),
            PathStep::Index(idx) => write!(f, "[{idx}]"),
            PathStep::Key(key) => write!(f, "[{key}]"),
        }
    }
}

/// An ordered sequence of selectors from the tree root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path(Vec<PathStep>);

impl Path {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a new path with `step` appended.
    pub fn join(&self, step: PathStep) -> Self {
        let mut steps = self.0.clone();
        steps.push(step);
        Self(steps)
    }

    /// Pointer form of this path, e.g. `/cars/0/price`.
    pub fn to_pointer(&self) -> String {
        crate::format_path(&self.0)
    }
}

impl From<Vec<PathStep>> for Path {
    fn from(steps: Vec<PathStep>) -> Self {
        Self(steps)
    }
}

/// Dotted display form, e.g. `cars[0].price`.
impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.0.iter().enumerate() {
            match step {
                PathStep::Field(name) if i == 0 => write!(f, "{name}")?,
                other => write!(f, "{other}")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_dotted() {
        let path: Path = vec![
            PathStep::Field("cars".into()),
            PathStep::Index(0),
            PathStep::Field("price".into()),
        ]
        .into();
        assert_eq!(path.to_string(), "cars[0].price");
    }

    #[test]
    fn test_display_dict_key() {
        let path: Path = vec![
            PathStep::Field("properties".into()),
            PathStep::Key("seats".into()),
        ]
        .into();
        assert_eq!(path.to_string(), "properties[seats]");
    }

    #[test]
    fn test_step_matches() {
        assert!(PathStep::Index(3).matches("3"));
        assert!(!PathStep::Index(3).matches("03"));
        assert!(PathStep::Key("a/b".into()).matches("a/b"));
        assert!(!PathStep::Field("price".into()).matches("mpg"));
    }

    #[test]
    fn test_join_does_not_mutate() {
        let base = Path::root();
        let child = base.join(PathStep::Field("engine".into()));
        assert!(base.is_empty());
        assert_eq!(child.len(), 1);
    }
}
