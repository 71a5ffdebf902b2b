//! Author-declared reactions to clicking an object.

use std::fmt;

use super::view::ViewName;
use crate::object::{ObjectId, ObjectMut, ObjectRef, ReadOnlyObjectView, Stage};

/// Signature of a computed tooltip: view, hovered object, dependencies.
pub type MessageFn = dyn Fn(&ViewName, &dyn ReadOnlyObjectView, &[ObjectRef<'_>]) -> String;

/// Signature of an action callback.
pub type ActionCallback = dyn Fn(&mut ActionContext<'_>);

/// Tooltip text of an action.
pub enum Message {
    Text(String),
    /// Computed each time the tooltip is shown, from read-only views only.
    Dynamic(Box<MessageFn>),
}

impl Message {
    /// A tooltip computed from the current state of the object and its dependencies.
    ///
    /// ```
    /// use escape_room::{Message, ReadOnlyObjectView};
    ///
    /// let message = Message::dynamic(|_view, _door, deps| {
    ///     if deps.iter().any(|key| key.is_selected()) {
    ///         "Use the key".to_string()
    ///     } else {
    ///         "A locked door".to_string()
    ///     }
    /// });
    /// # let _ = message;
    /// ```
    pub fn dynamic<F>(f: F) -> Self
    where
        F: Fn(&ViewName, &dyn ReadOnlyObjectView, &[ObjectRef<'_>]) -> String + 'static,
    {
        Message::Dynamic(Box::new(f))
    }

    pub(crate) fn render(
        &self,
        view: &ViewName,
        object: &dyn ReadOnlyObjectView,
        dependencies: &[ObjectRef<'_>],
    ) -> String {
        match self {
            Message::Text(text) => text.clone(),
            Message::Dynamic(f) => f(view, object, dependencies),
        }
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Message::Text(text.to_string())
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Message::Text(text)
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Message::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// The reaction bound to one object in one view.
pub struct Action {
    pub(crate) message: Message,
    pub(crate) dependencies: Vec<ObjectId>,
    pub(crate) callback: Box<ActionCallback>,
}

impl Action {
    pub fn message(&self) -> &Message {
        &self.message
    }

    pub fn dependencies(&self) -> &[ObjectId] {
        &self.dependencies
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("message", &self.message)
            .field("dependencies", &self.dependencies)
            .finish_non_exhaustive()
    }
}

/// What an action callback may ask of the game itself.
pub trait NavigationCapability {
    /// Move to another view, regardless of the link graph.
    fn switch_view(&mut self, view: &str);
    /// End the game with a final message. Nothing reacts afterwards.
    fn finish_game(&mut self, message: &str);
    /// Show a short-lived message.
    fn show_message(&mut self, text: &str);
}

/// Navigation requested by a callback, applied once it returns.
#[derive(Debug, Default)]
pub struct NavigationRequests {
    pub(crate) switch_to: Option<ViewName>,
    pub(crate) finish: Option<String>,
    pub(crate) messages: Vec<String>,
}

impl NavigationRequests {
    pub fn is_empty(&self) -> bool {
        self.switch_to.is_none() && self.finish.is_none() && self.messages.is_empty()
    }
}

impl NavigationCapability for NavigationRequests {
    fn switch_view(&mut self, view: &str) {
        self.switch_to = Some(ViewName::from(view));
    }

    fn finish_game(&mut self, message: &str) {
        self.finish = Some(message.to_string());
    }

    fn show_message(&mut self, text: &str) {
        self.messages.push(text.to_string());
    }
}

/// Everything an action callback gets: the view it fired in, the clicked
/// object and its declared dependencies, and the navigation capability.
///
/// The context implements [`NavigationCapability`] itself, so callbacks can
/// write `ctx.switch_view("hall")`.
pub struct ActionContext<'a> {
    view: &'a ViewName,
    object: ObjectId,
    dependencies: &'a [ObjectId],
    stage: &'a mut Stage,
    navigation: &'a mut NavigationRequests,
}

impl<'a> ActionContext<'a> {
    pub(crate) fn new(
        view: &'a ViewName,
        object: ObjectId,
        dependencies: &'a [ObjectId],
        stage: &'a mut Stage,
        navigation: &'a mut NavigationRequests,
    ) -> Self {
        Self {
            view,
            object,
            dependencies,
            stage,
            navigation,
        }
    }

    pub fn view(&self) -> &ViewName {
        self.view
    }

    pub fn object_id(&self) -> ObjectId {
        self.object
    }

    /// The clicked object.
    pub fn object(&mut self) -> ObjectMut<'_> {
        self.stage.object_mut(self.object)
    }

    pub fn dependency_ids(&self) -> &[ObjectId] {
        self.dependencies
    }

    /// The `index`-th declared dependency.
    pub fn dependency(&mut self, index: usize) -> Option<ObjectMut<'_>> {
        let id = *self.dependencies.get(index)?;
        Some(self.stage.object_mut(id))
    }

    /// Read-only view of any declared dependency or the object itself.
    pub fn peek(&self, id: ObjectId) -> ObjectRef<'_> {
        self.stage.object(id)
    }

    pub fn navigation(&mut self) -> &mut dyn NavigationCapability {
        self.navigation
    }
}

impl NavigationCapability for ActionContext<'_> {
    fn switch_view(&mut self, view: &str) {
        self.navigation.switch_view(view);
    }

    fn finish_game(&mut self, message: &str) {
        self.navigation.finish_game(message);
    }

    fn show_message(&mut self, text: &str) {
        self.navigation.show_message(text);
    }
}
