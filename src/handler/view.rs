//! Views and the navigation links between them.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;

use super::action::Action;
use crate::object::ObjectId;
use crate::overlay::{Direction, DirectionSet};

/// Name of a view.
///
/// A view's camera pose comes from the scene markers `<name>_camera` and
/// `<name>_lookat`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewName(pub(crate) String);

impl ViewName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ViewName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ViewName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ViewName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&ViewName> for ViewName {
    fn from(name: &ViewName) -> Self {
        name.clone()
    }
}

impl Borrow<str> for ViewName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Outgoing navigation links of one view, at most one per direction.
///
/// # Example
///
/// ```
/// use escape_room::{Direction, Links};
///
/// let links = Links::new().left("door").right("window");
/// assert_eq!(links.get(Direction::Left).unwrap().as_str(), "door");
/// assert!(links.get(Direction::Top).is_none());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Links {
    targets: [Option<ViewName>; 4],
}

impl Links {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn left(self, target: impl Into<ViewName>) -> Self {
        self.with(Direction::Left, target)
    }

    pub fn right(self, target: impl Into<ViewName>) -> Self {
        self.with(Direction::Right, target)
    }

    pub fn top(self, target: impl Into<ViewName>) -> Self {
        self.with(Direction::Top, target)
    }

    pub fn bottom(self, target: impl Into<ViewName>) -> Self {
        self.with(Direction::Bottom, target)
    }

    pub fn with(mut self, direction: Direction, target: impl Into<ViewName>) -> Self {
        self.set(direction, target);
        self
    }

    pub fn set(&mut self, direction: Direction, target: impl Into<ViewName>) {
        self.targets[direction as usize] = Some(target.into());
    }

    pub fn get(&self, direction: Direction) -> Option<&ViewName> {
        self.targets[direction as usize].as_ref()
    }

    /// Directions that have a link; exactly the buttons shown in this view.
    pub fn directions(&self) -> DirectionSet {
        Direction::ALL
            .into_iter()
            .filter(|d| self.get(*d).is_some())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Direction, &ViewName)> {
        Direction::ALL
            .into_iter()
            .filter_map(|d| self.get(d).map(|target| (d, target)))
    }
}

impl<V: Into<ViewName>> FromIterator<(Direction, V)> for Links {
    fn from_iter<I: IntoIterator<Item = (Direction, V)>>(iter: I) -> Self {
        let mut links = Links::new();
        for (direction, target) in iter {
            links.set(direction, target);
        }
        links
    }
}

/// A registered view: its links and the actions of its objects.
pub struct View {
    name: ViewName,
    pub(crate) links: Links,
    pub(crate) actions: HashMap<ObjectId, Action>,
}

impl View {
    pub(crate) fn new(name: ViewName) -> Self {
        Self {
            name,
            links: Links::new(),
            actions: HashMap::new(),
        }
    }

    pub fn name(&self) -> &ViewName {
        &self.name
    }

    pub fn links(&self) -> &Links {
        &self.links
    }

    pub fn action(&self, object: ObjectId) -> Option<&Action> {
        self.actions.get(&object)
    }

    pub fn actions(&self) -> impl Iterator<Item = (ObjectId, &Action)> {
        self.actions.iter().map(|(id, action)| (*id, action))
    }
}
