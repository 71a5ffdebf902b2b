//! The view-navigation state machine and the authoring API.
//!
//! A [`GameHandler`] owns the set of views, which one is current and the
//! [`Action`]s bound to objects. Scenario code registers everything up
//! front; afterwards the handler is driven by pointer events and by the
//! world reporting the end of a camera transition.
//!
//! ```text
//!            button click / switch_view
//!   Idle(v) ---------------------------> Transitioning(t)
//!      ^                                        |
//!      +------------ camera arrived ------------+
//!
//!   Idle(v) --finish_game--> Finished(v)   (terminal)
//! ```

mod action;
mod view;

pub use action::{
    Action, ActionCallback, ActionContext, Message, MessageFn, NavigationCapability,
    NavigationRequests,
};
pub use view::{Links, View, ViewName};

use std::collections::HashMap;
use std::fmt::Write as _;

use glam::Vec2;

use crate::compositor::pixel_to_ndc;
use crate::error::{Error, Result};
use crate::object::{MutableObjectView, ObjectId, ObjectRef, Stage};
use crate::overlay::{DirectionSet, Overlay};
use crate::picking::Picker;
use crate::scene_index::SceneIndex;
use crate::world::World;

/// Where the handler is in the navigation cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HandlerState {
    /// Resting at a view; buttons, tooltips and clicks are live.
    Idle(ViewName),
    /// The camera is moving to the named view; all interaction is off.
    Transitioning(ViewName),
    /// The game is over. The view is the one the player ended in.
    Finished(ViewName),
}

/// The parts of the game a handler call may touch, borrowed for one call.
pub struct Systems<'a> {
    pub world: &'a mut World,
    pub overlay: &'a mut Overlay,
    pub stage: &'a mut Stage,
    pub picker: &'a dyn Picker,
}

/// Text shown when a take action finds the inventory full.
pub const INVENTORY_FULL_MESSAGE: &str = "You can't carry any more.";

#[derive(Default)]
pub struct GameHandler {
    views: HashMap<ViewName, View>,
    initial: Option<ViewName>,
    state: Option<HandlerState>,
    /// Last pointer position inside the primary region, in pixels.
    pointer: Option<Vec2>,
}

impl GameHandler {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- authoring ------------------------------------------------------

    /// Set the view the game starts in. Registers the view if needed.
    pub fn set_initial_view(&mut self, view: impl Into<ViewName>) {
        let view = view.into();
        if let Some(previous) = &self.initial {
            tracing::warn!("initial view changed from '{}' to '{}'", previous, view);
        }
        self.view_entry(&view);
        self.initial = Some(view);
    }

    /// Register a view with no links and no actions yet.
    pub fn add_view(&mut self, view: impl Into<ViewName>) {
        let view = view.into();
        self.view_entry(&view);
    }

    /// Replace the navigation links of `view`, registering it if needed.
    ///
    /// Targets are not checked here; a link to an unknown view is reported
    /// when it is followed.
    pub fn set_view_links(&mut self, view: impl Into<ViewName>, links: Links) {
        let view = view.into();
        self.view_entry(&view).links = links;
    }

    /// Bind an action to `object` in `view`.
    ///
    /// `dependencies` name further objects the message and callback get
    /// access to, in order. A second action for the same pair replaces the
    /// first.
    pub fn set_action<F>(
        &mut self,
        scene: &SceneIndex,
        view: impl Into<ViewName>,
        object: &str,
        dependencies: &[&str],
        message: impl Into<Message>,
        callback: F,
    ) -> Result<()>
    where
        F: Fn(&mut ActionContext<'_>) + 'static,
    {
        let view = view.into();
        let id = scene.resolve(object)?;
        let dependencies = dependencies
            .iter()
            .map(|name| scene.resolve(name))
            .collect::<Result<Vec<_>>>()?;

        let action = Action {
            message: message.into(),
            dependencies,
            callback: Box::new(callback),
        };
        if self.view_entry(&view).actions.insert(id, action).is_some() {
            tracing::debug!("action for '{}' in '{}' replaced", object, view);
        }
        Ok(())
    }

    /// An action that moves the camera to `target` when `object` is clicked.
    pub fn set_switch_view_action(
        &mut self,
        scene: &SceneIndex,
        view: impl Into<ViewName>,
        object: &str,
        target: impl Into<ViewName>,
        message: impl Into<Message>,
    ) -> Result<()> {
        let target = target.into();
        self.set_action(scene, view, object, &[], message, move |ctx| {
            ctx.switch_view(target.as_str());
        })
    }

    /// An action that puts `object` into the inventory when clicked.
    pub fn set_take_object_action(
        &mut self,
        scene: &SceneIndex,
        view: impl Into<ViewName>,
        object: &str,
        message: impl Into<Message>,
    ) -> Result<()> {
        self.set_action(scene, view, object, &[], message, |ctx| {
            let taken = ctx.object().put_in_inventory();
            match taken {
                Ok(()) => {}
                Err(Error::InventoryFull { .. }) => ctx.show_message(INVENTORY_FULL_MESSAGE),
                Err(err) => tracing::warn!("take action: {}", err),
            }
        })
    }

    /// Human-readable listing of every view and its links.
    pub fn dump_views(&self) -> String {
        let mut out = String::new();
        for name in self.sorted_view_names() {
            let view = &self.views[name];
            let marker = if self.initial.as_ref() == Some(name) { " (initial)" } else { "" };
            let _ = writeln!(out, "{}{}", name, marker);
            for (direction, target) in view.links.iter() {
                let dangling = if self.views.contains_key(target) { "" } else { " (unknown)" };
                let _ = writeln!(out, "  {:<6} -> {}{}", direction.as_str(), target, dangling);
            }
        }
        tracing::debug!("views:\n{}", out);
        out
    }

    /// Human-readable listing of every action, by view.
    pub fn dump_actions(&self, scene: &SceneIndex) -> String {
        let mut out = String::new();
        for name in self.sorted_view_names() {
            let view = &self.views[name];
            if view.actions.is_empty() {
                continue;
            }
            let _ = writeln!(out, "{}", name);
            let mut actions: Vec<_> = view.actions().collect();
            actions.sort_by_key(|(id, _)| *id);
            for (id, action) in actions {
                let deps: Vec<&str> = action
                    .dependencies
                    .iter()
                    .map(|dep| scene.object(*dep).name())
                    .collect();
                let message = match &action.message {
                    Message::Text(text) => format!("{:?}", text),
                    Message::Dynamic(_) => "<dynamic>".to_string(),
                };
                let _ = writeln!(
                    out,
                    "  {} [{}] {}",
                    scene.object(id).name(),
                    deps.join(", "),
                    message
                );
            }
        }
        tracing::debug!("actions:\n{}", out);
        out
    }

    // ---- queries --------------------------------------------------------

    pub fn state(&self) -> Option<&HandlerState> {
        self.state.as_ref()
    }

    /// The view the player is resting at, `None` while moving or before start.
    pub fn current_view(&self) -> Option<&ViewName> {
        match self.state.as_ref()? {
            HandlerState::Idle(view) | HandlerState::Finished(view) => Some(view),
            HandlerState::Transitioning(_) => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, Some(HandlerState::Idle(_)))
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, Some(HandlerState::Finished(_)))
    }

    pub fn initial_view(&self) -> Option<&ViewName> {
        self.initial.as_ref()
    }

    pub fn view(&self, name: &str) -> Option<&View> {
        self.views.get(name)
    }

    pub fn views(&self) -> impl Iterator<Item = &View> {
        self.views.values()
    }

    // ---- runtime --------------------------------------------------------

    /// Place the camera at the initial view and enter `Idle`.
    pub fn start(&mut self, sys: &mut Systems<'_>) -> Result<()> {
        let initial = self.initial.clone().ok_or(Error::NoInitialView)?;
        let pose = sys.stage.scene.pose(initial.as_str())?;
        sys.world.jump_to(pose);
        tracing::info!("starting in view '{}'", initial);
        self.enter_idle(initial, sys);
        Ok(())
    }

    /// The pointer moved to `position` inside the primary region.
    pub fn pointer_moved(&mut self, position: Vec2, sys: &mut Systems<'_>) {
        self.pointer = Some(position);
        self.refresh_hover(sys);
    }

    /// The pointer left the primary region.
    pub fn pointer_left(&mut self, sys: &mut Systems<'_>) {
        self.pointer = None;
        self.clear_hover(sys);
    }

    /// A click at `position` inside the primary region.
    pub fn click(&mut self, position: Vec2, sys: &mut Systems<'_>) {
        self.pointer = Some(position);
        let Some(HandlerState::Idle(view)) = &self.state else {
            tracing::trace!("click ignored outside idle state");
            return;
        };
        let view = view.clone();

        if let Some(direction) = sys.overlay.button_at(position) {
            let target = self
                .views
                .get(&view)
                .and_then(|v| v.links.get(direction))
                .cloned();
            if let Some(target) = target {
                tracing::debug!("'{}' -> {} -> '{}'", view, direction, target);
                self.begin_transition(target, sys);
            }
            return;
        }

        if let Some(id) = self.action_target(&view, position, sys) {
            self.run_action(&view, id, sys);
        }
    }

    /// Start moving to `target`, bypassing the link graph.
    ///
    /// Unknown views and views without a camera pose are logged and ignored.
    pub fn switch_view(&mut self, target: impl Into<ViewName>, sys: &mut Systems<'_>) {
        self.begin_transition(target.into(), sys);
    }

    /// The camera reached `view`.
    pub fn complete_transition(&mut self, view: ViewName, sys: &mut Systems<'_>) {
        match &self.state {
            Some(HandlerState::Transitioning(target)) if *target == view => {
                tracing::debug!("arrived at '{}'", view);
                self.enter_idle(view, sys);
            }
            Some(HandlerState::Finished(_)) => {}
            other => tracing::warn!("unexpected arrival at '{}' in state {:?}", view, other),
        }
    }

    /// End the game with `message`.
    pub fn finish(&mut self, message: &str, sys: &mut Systems<'_>) {
        let view = match self.state.take() {
            Some(HandlerState::Idle(v))
            | Some(HandlerState::Transitioning(v))
            | Some(HandlerState::Finished(v)) => v,
            None => self.initial.clone().unwrap_or_else(|| ViewName::from("")),
        };
        tracing::info!("game finished in '{}': {}", view, message);
        self.state = Some(HandlerState::Finished(view));
        sys.world.set_highlight(None);
        sys.overlay.freeze(message);
    }

    /// Recompute tooltip and highlight under the last pointer position.
    pub fn refresh_hover(&mut self, sys: &mut Systems<'_>) {
        let Some(HandlerState::Idle(view)) = &self.state else {
            return;
        };
        let Some(position) = self.pointer else {
            self.clear_hover(sys);
            return;
        };

        if sys.overlay.hover(position).is_some() {
            sys.overlay.set_tooltip(None, position);
            sys.world.set_highlight(None);
            return;
        }

        let view = view.clone();
        match self.action_target(&view, position, sys) {
            Some(id) => {
                let text = self.tooltip_for(&view, id, sys.stage);
                sys.overlay.set_tooltip(text, position);
                sys.world.set_highlight(Some(id));
            }
            None => {
                sys.overlay.set_tooltip(None, position);
                sys.world.set_highlight(None);
            }
        }
    }

    fn clear_hover(&self, sys: &mut Systems<'_>) {
        sys.overlay.clear_interaction();
        sys.world.set_highlight(None);
    }

    fn view_entry(&mut self, view: &ViewName) -> &mut View {
        self.views
            .entry(view.clone())
            .or_insert_with(|| View::new(view.clone()))
    }

    fn sorted_view_names(&self) -> Vec<&ViewName> {
        let mut names: Vec<_> = self.views.keys().collect();
        names.sort();
        names
    }

    fn enter_idle(&mut self, view: ViewName, sys: &mut Systems<'_>) {
        let buttons = self
            .views
            .get(&view)
            .map(|v| v.links.directions())
            .unwrap_or(DirectionSet::EMPTY);
        sys.overlay.set_active_buttons(buttons);
        self.state = Some(HandlerState::Idle(view));
        self.refresh_hover(sys);
    }

    fn begin_transition(&mut self, target: ViewName, sys: &mut Systems<'_>) {
        if self.is_finished() {
            return;
        }
        if !self.views.contains_key(&target) {
            tracing::error!("cannot switch to unknown view '{}'", target);
            return;
        }
        let pose = match sys.stage.scene.pose(target.as_str()) {
            Ok(pose) => pose,
            Err(err) => {
                tracing::error!("cannot switch to '{}': {}", target, err);
                return;
            }
        };

        sys.overlay.set_active_buttons(DirectionSet::EMPTY);
        self.clear_hover(sys);
        sys.world.move_to(pose, target.clone());
        self.state = Some(HandlerState::Transitioning(target));
    }

    /// The object under `position` if it has an action in `view`.
    fn action_target(&self, view: &ViewName, position: Vec2, sys: &Systems<'_>) -> Option<ObjectId> {
        let ndc = pixel_to_ndc(position, sys.overlay.size());
        let id = sys.world.pick(&sys.stage.scene, sys.picker, ndc)?;
        self.views.get(view)?.actions.contains_key(&id).then_some(id)
    }

    fn tooltip_for(&self, view: &ViewName, id: ObjectId, stage: &Stage) -> Option<String> {
        let action = self.views.get(view)?.actions.get(&id)?;
        let object = stage.object(id);
        let dependencies: Vec<ObjectRef<'_>> =
            action.dependencies.iter().map(|dep| stage.object(*dep)).collect();
        Some(action.message.render(view, &object, &dependencies))
    }

    fn run_action(&mut self, view: &ViewName, id: ObjectId, sys: &mut Systems<'_>) {
        let Some(action) = self.views.get(view).and_then(|v| v.actions.get(&id)) else {
            return;
        };
        tracing::debug!("action on '{}' in '{}'", sys.stage.scene.object(id).name(), view);

        let mut requests = NavigationRequests::default();
        {
            let mut ctx =
                ActionContext::new(view, id, &action.dependencies, sys.stage, &mut requests);
            (action.callback)(&mut ctx);
        }
        self.apply_requests(requests, sys);

        // The action may have hidden or revealed what is under the pointer.
        self.refresh_hover(sys);
    }

    fn apply_requests(&mut self, requests: NavigationRequests, sys: &mut Systems<'_>) {
        for message in requests.messages {
            sys.overlay.show_message(message);
        }
        if let Some(target) = requests.switch_to {
            self.begin_transition(target, sys);
        }
        if let Some(message) = requests.finish {
            self.finish(&message, sys);
        }
    }
}
