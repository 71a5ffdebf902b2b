//! A running game: every component wired together behind one tick function.

use glam::Vec2;

use crate::compositor::{Region, RenderBackend, RenderCompositor};
use crate::config::GameConfig;
use crate::error::Result;
use crate::handler::{GameHandler, Systems, ViewName};
use crate::inventory::Inventory;
use crate::object::Stage;
use crate::overlay::Overlay;
use crate::picking::{ColliderPicker, Picker};
use crate::scene_index::SceneIndex;
use crate::world::World;

/// Auxiliary per-tick callback; receives the tick number, starting at 1.
pub type TickHook = Box<dyn FnMut(u64)>;

/// Owns the handler, the world, the overlay, the stage and the compositor.
///
/// Pointer positions are window pixels; the game routes them to the
/// inventory or the primary region itself.
///
/// # Example
///
/// ```
/// use escape_room::{Game, GameConfig, Links, SceneEntity, SceneIndex, Vec3};
///
/// let scene = SceneIndex::from_entities(vec![
///     SceneEntity::marker("desk_camera", Vec3::new(0.0, 1.5, 4.0)),
///     SceneEntity::marker("desk_lookat", Vec3::ZERO),
///     SceneEntity::object("key", Vec3::ZERO, Vec3::new(0.3, 0.05, 0.1)),
/// ])?;
///
/// let mut game = Game::new(GameConfig::default(), scene);
/// game.author(|handler, scene| {
///     handler.set_initial_view("desk");
///     handler.set_view_links("desk", Links::new());
///     handler.set_take_object_action(scene, "desk", "key", "A small brass key")
/// })?;
/// game.start()?;
/// assert_eq!(game.current_view().map(|v| v.as_str()), Some("desk"));
/// # Ok::<(), escape_room::Error>(())
/// ```
pub struct Game {
    config: GameConfig,
    handler: GameHandler,
    world: World,
    overlay: Overlay,
    stage: Stage,
    compositor: RenderCompositor,
    picker: Box<dyn Picker>,
    tick_hooks: Vec<TickHook>,
    ticks: u64,
}

impl Game {
    pub fn new(config: GameConfig, scene: SceneIndex) -> Self {
        let compositor = RenderCompositor::new(&config);
        let primary = compositor.primary();
        let mut overlay = Overlay::new(&config);
        overlay.resize(primary.size());

        Self {
            handler: GameHandler::new(),
            world: World::new(config.transition_steps, primary.aspect()),
            overlay,
            stage: Stage::new(scene, Inventory::new(&config)),
            compositor,
            picker: Box::new(ColliderPicker),
            tick_hooks: Vec::new(),
            ticks: 0,
            config,
        }
    }

    /// Replace the default ray-cast picker.
    pub fn with_picker(mut self, picker: impl Picker + 'static) -> Self {
        self.picker = Box::new(picker);
        self
    }

    /// Run scenario setup against the handler and the loaded scene.
    pub fn author<F>(&mut self, setup: F) -> Result<()>
    where
        F: FnOnce(&mut GameHandler, &SceneIndex) -> Result<()>,
    {
        setup(&mut self.handler, &self.stage.scene)
    }

    /// Enter the initial view.
    pub fn start(&mut self) -> Result<()> {
        let (handler, mut sys) = self.split();
        handler.start(&mut sys)
    }

    /// Register an auxiliary callback run once per tick, before rendering.
    pub fn on_tick(&mut self, hook: impl FnMut(u64) + 'static) {
        self.tick_hooks.push(Box::new(hook));
    }

    /// Follow a change of the output surface size, in pixels.
    pub fn resize(&mut self, size: Vec2) {
        self.compositor.resize(size);
        let primary = self.compositor.primary();
        self.overlay.resize(primary.size());
        self.world.set_aspect(primary.aspect());

        let aspect = self.compositor.inventory().aspect();
        let Stage { scene, inventory } = &mut self.stage;
        inventory.resize(scene, aspect);

        let (handler, mut sys) = self.split();
        handler.refresh_hover(&mut sys);
    }

    pub fn pointer_moved(&mut self, position: Vec2) {
        let primary = self.compositor.primary();
        let region = self.compositor.region_at(position);
        let (handler, mut sys) = self.split();
        match region {
            Some(Region::Primary) => handler.pointer_moved(primary.to_local(position), &mut sys),
            Some(Region::Inventory) | None => handler.pointer_left(&mut sys),
        }
    }

    /// The pointer left the window.
    pub fn pointer_left(&mut self) {
        let (handler, mut sys) = self.split();
        handler.pointer_left(&mut sys);
    }

    /// A primary-button press at `position`.
    pub fn pointer_pressed(&mut self, position: Vec2) {
        if self.handler.is_finished() {
            return;
        }
        match self.compositor.region_at(position) {
            Some(Region::Inventory) => {
                let ndc = self.compositor.inventory().to_ndc(position);
                let Stage { scene, inventory } = &mut self.stage;
                if let Some(id) = inventory.pointer_hit(scene, self.picker.as_ref(), ndc) {
                    tracing::debug!(
                        "inventory click on '{}', selected: {:?}",
                        scene.object(id).name(),
                        inventory.selected().map(|s| scene.object(s).name())
                    );
                }
            }
            Some(Region::Primary) => {
                let local = self.compositor.primary().to_local(position);
                let (handler, mut sys) = self.split();
                handler.click(local, &mut sys);
            }
            None => {}
        }
    }

    /// Start moving to `view` from outside an action.
    pub fn switch_view(&mut self, view: impl Into<ViewName>) {
        let (handler, mut sys) = self.split();
        handler.switch_view(view, &mut sys);
    }

    /// Advance one frame and render it.
    ///
    /// Order: camera transition step, overlay countdown, tick hooks, render.
    pub fn tick(&mut self, backend: &mut dyn RenderBackend) {
        self.ticks += 1;

        if let Some(view) = self.world.advance() {
            let (handler, mut sys) = self.split();
            handler.complete_transition(view, &mut sys);
        }

        self.overlay.tick();

        for hook in &mut self.tick_hooks {
            hook(self.ticks);
        }

        self.overlay.redraw();
        self.compositor
            .render(backend, &self.world, &self.stage, &self.overlay);
    }

    fn split(&mut self) -> (&mut GameHandler, Systems<'_>) {
        (
            &mut self.handler,
            Systems {
                world: &mut self.world,
                overlay: &mut self.overlay,
                stage: &mut self.stage,
                picker: self.picker.as_ref(),
            },
        )
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn handler(&self) -> &GameHandler {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut GameHandler {
        &mut self.handler
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    pub fn scene(&self) -> &SceneIndex {
        self.stage.scene()
    }

    pub fn inventory(&self) -> &Inventory {
        self.stage.inventory()
    }

    pub fn compositor(&self) -> &RenderCompositor {
        &self.compositor
    }

    pub fn current_view(&self) -> Option<&ViewName> {
        self.handler.current_view()
    }

    pub fn is_finished(&self) -> bool {
        self.handler.is_finished()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::{Viewport, WorldPass};
    use crate::draw2d::{Canvas, Color};
    use crate::scene_index::SceneEntity;
    use glam::Vec3;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder(Rc<RefCell<Vec<String>>>);

    impl RenderBackend for Recorder {
        fn begin_frame(&mut self, _size: Vec2, _background: Color) {
            self.0.borrow_mut().push("begin".into());
        }

        fn render_world(&mut self, pass: &WorldPass<'_>) {
            self.0
                .borrow_mut()
                .push(format!("world:{:?}", pass.viewport.region));
        }

        fn composite_overlay(&mut self, _viewport: &Viewport, _canvas: &Canvas) {
            self.0.borrow_mut().push("overlay".into());
        }

        fn end_frame(&mut self) {
            self.0.borrow_mut().push("end".into());
        }
    }

    fn game() -> Game {
        let scene = SceneIndex::from_entities(vec![
            SceneEntity::marker("a_camera", Vec3::new(0.0, 0.0, 4.0)),
            SceneEntity::marker("a_lookat", Vec3::ZERO),
        ])
        .unwrap();
        let mut game = Game::new(GameConfig::new().size(800, 600), scene);
        game.author(|handler, _| {
            handler.set_initial_view("a");
            Ok(())
        })
        .unwrap();
        game.start().unwrap();
        game
    }

    #[test]
    fn tick_runs_hooks_before_render() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut game = game();
        let hook_log = Rc::clone(&log);
        game.on_tick(move |tick| hook_log.borrow_mut().push(format!("hook:{tick}")));

        let mut backend = Recorder(Rc::clone(&log));
        game.tick(&mut backend);
        game.tick(&mut backend);

        let expected = [
            "hook:1",
            "begin",
            "world:Primary",
            "overlay",
            "world:Inventory",
            "end",
        ];
        let log = log.borrow();
        assert_eq!(log[..6], expected);
        assert_eq!(log[6], "hook:2");
        assert_eq!(game.ticks(), 2);
    }

    #[test]
    fn resize_updates_regions() {
        let mut game = game();
        game.resize(Vec2::new(1200.0, 400.0));
        let primary = game.compositor().primary();
        assert_eq!(game.overlay().size(), primary.size());
        assert_eq!(game.world().aspect(), primary.aspect());
        assert_eq!(
            game.inventory().aspect(),
            game.compositor().inventory().aspect()
        );
    }
}
