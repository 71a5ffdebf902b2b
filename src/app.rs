//! Window and event loop around a [`Game`].

use std::sync::Arc;

use glam::Vec2;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::backend::WgpuBackend;
use crate::config::GameConfig;
use crate::error::{Error, Result};
use crate::game::Game;
use crate::input::{PointerEvent, PointerInput};
use crate::scene_index::SceneIndex;

/// Build a game from `scene`, let `setup` author it, and run it in a window.
///
/// Returns when the window is closed, or with the first setup, window or
/// GPU error.
///
/// # Example
/// ```no_run
/// use escape_room::{GameConfig, Links, NavigationCapability, SceneEntity, SceneIndex, Vec3};
///
/// let scene = SceneIndex::from_entities(vec![
///     SceneEntity::marker("cell_camera", Vec3::new(0.0, 1.6, 3.0)),
///     SceneEntity::marker("cell_lookat", Vec3::new(0.0, 1.0, 0.0)),
///     SceneEntity::object("door", Vec3::new(0.0, 1.0, -1.0), Vec3::new(1.0, 2.0, 0.1)),
/// ])?;
///
/// escape_room::run(GameConfig::new().title("Cell"), scene, |game| {
///     game.author(|handler, scene| {
///         handler.set_initial_view("cell");
///         handler.set_view_links("cell", Links::new());
///         handler.set_action(scene, "cell", "door", &[], "The way out", |ctx| {
///             ctx.finish_game("You escaped!")
///         })
///     })
/// })?;
/// # Ok::<(), escape_room::Error>(())
/// ```
pub fn run<S>(config: GameConfig, scene: SceneIndex, setup: S) -> Result<()>
where
    S: FnOnce(&mut Game) -> Result<()>,
{
    let mut game = Game::new(config, scene);
    setup(&mut game)?;
    game.start()?;
    run_game(game)
}

/// Run an already authored and started game in a window.
pub fn run_game(game: Game) -> Result<()> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = EscapeRoomApp {
        game,
        input: PointerInput::new(),
        window: None,
        backend: None,
        error: None,
    };
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct EscapeRoomApp {
    game: Game,
    input: PointerInput,
    window: Option<Arc<Window>>,
    backend: Option<WgpuBackend>,
    error: Option<Error>,
}

impl EscapeRoomApp {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: Error) {
        tracing::error!("{}", err);
        self.error = Some(err);
        event_loop.exit();
    }

    fn apply_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Moved(position) => self.game.pointer_moved(position),
            PointerEvent::Pressed(position) => self.game.pointer_pressed(position),
            PointerEvent::Left => self.game.pointer_left(),
        }
    }
}

impl ApplicationHandler for EscapeRoomApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let config = self.game.config();
        let window_attrs = WindowAttributes::default()
            .with_title(&config.title)
            .with_inner_size(winit::dpi::PhysicalSize::new(config.width, config.height));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(err) => return self.fail(event_loop, Error::Window(err.to_string())),
        };
        let backend = match WgpuBackend::new(window.clone()) {
            Ok(backend) => backend,
            Err(err) => return self.fail(event_loop, err),
        };

        let size = window.inner_size();
        self.game
            .resize(Vec2::new(size.width as f32, size.height as f32));
        tracing::info!("window ready at {}x{}", size.width, size.height);

        window.request_redraw();
        self.window = Some(window);
        self.backend = Some(backend);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(pointer) = self.input.handle_event(&event) {
            self.apply_pointer(pointer);
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed
                    && event.physical_key == PhysicalKey::Code(KeyCode::Escape)
                {
                    event_loop.exit();
                }
            }
            WindowEvent::Resized(size) => {
                if let Some(backend) = &mut self.backend {
                    backend.resize(size.width, size.height);
                }
                self.game
                    .resize(Vec2::new(size.width as f32, size.height as f32));
            }
            WindowEvent::RedrawRequested => {
                if let Some(backend) = &mut self.backend {
                    self.game.tick(backend);
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}
