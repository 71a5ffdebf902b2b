use std::cell::RefCell;
use std::rc::Rc;

use escape_room::{
    Camera, Canvas, Color, Direction, Error, Game, GameConfig, INVENTORY_FULL_MESSAGE, Links,
    Message, MutableObjectView, NavigationCapability, ObjectId, Picker, ReadOnlyObjectView, Region,
    RenderBackend, SceneEntity, SceneIndex, Vec2, Vec3, Viewport, WorldPass,
};

const STEPS: usize = 3;
/// Middle of the primary region (1000x500).
const CENTER: Vec2 = Vec2::new(500.0, 250.0);
const LEFT_BUTTON: Vec2 = Vec2::new(50.0, 250.0);
const RIGHT_BUTTON: Vec2 = Vec2::new(950.0, 250.0);
/// Middle of the inventory strip, where a single held item sits.
const INVENTORY_CENTER: Vec2 = Vec2::new(1100.0, 250.0);

#[derive(Debug, Clone, PartialEq)]
enum Pass {
    Begin,
    World(Region, Vec<ObjectId>),
    Overlay(Region, Vec<String>),
    End,
}

#[derive(Default, Clone)]
struct RecordingBackend(Rc<RefCell<Vec<Pass>>>);

impl RecordingBackend {
    fn take(&self) -> Vec<Pass> {
        std::mem::take(&mut *self.0.borrow_mut())
    }
}

impl RenderBackend for RecordingBackend {
    fn begin_frame(&mut self, _size: Vec2, _background: Color) {
        self.0.borrow_mut().push(Pass::Begin);
    }

    fn render_world(&mut self, pass: &WorldPass<'_>) {
        self.0
            .borrow_mut()
            .push(Pass::World(pass.viewport.region, pass.highlight.to_vec()));
    }

    fn composite_overlay(&mut self, viewport: &Viewport, canvas: &Canvas) {
        let text = canvas.text_content().into_iter().map(String::from).collect();
        self.0
            .borrow_mut()
            .push(Pass::Overlay(viewport.region, text));
    }

    fn end_frame(&mut self) {
        self.0.borrow_mut().push(Pass::End);
    }
}

fn scene() -> SceneIndex {
    SceneIndex::from_entities(vec![
        SceneEntity::marker("a_camera", Vec3::new(0.0, 0.0, 4.0)),
        SceneEntity::marker("a_lookat", Vec3::ZERO),
        SceneEntity::marker("b_camera", Vec3::new(20.0, 0.0, 4.0)),
        SceneEntity::marker("b_lookat", Vec3::new(20.0, 0.0, 0.0)),
        SceneEntity::object("key", Vec3::ZERO, Vec3::ONE),
        SceneEntity::object("door", Vec3::new(20.0, 0.0, 0.0), Vec3::ONE),
    ])
    .unwrap()
}

fn config() -> GameConfig {
    GameConfig::new()
        .size(1200, 500)
        .inventory_width(200.0)
        .transition_steps(STEPS)
}

/// Two views side by side, linked both ways, with whatever actions `setup` adds.
fn game_with<F>(config: GameConfig, setup: F) -> Game
where
    F: FnOnce(&mut escape_room::GameHandler, &SceneIndex) -> escape_room::Result<()>,
{
    let mut game = Game::new(config, scene());
    game.author(|handler, scene| {
        handler.set_initial_view("a");
        handler.set_view_links("a", Links::new().right("b"));
        handler.set_view_links("b", Links::new().left("a"));
        setup(handler, scene)
    })
    .unwrap();
    game.start().unwrap();
    game
}

fn run_ticks(game: &mut Game, backend: &mut RecordingBackend, ticks: usize) {
    for _ in 0..ticks {
        game.tick(backend);
    }
}

fn id(game: &Game, name: &str) -> ObjectId {
    game.scene().resolve(name).unwrap()
}

#[test]
fn navigates_to_a_linked_view_and_back() {
    let mut game = game_with(config(), |_, _| Ok(()));
    let mut backend = RecordingBackend::default();
    assert_eq!(game.current_view().unwrap().as_str(), "a");
    assert!(game.overlay().active_buttons().contains(Direction::Right));
    assert!(!game.overlay().active_buttons().contains(Direction::Left));

    game.pointer_pressed(RIGHT_BUTTON);
    assert!(game.current_view().is_none());
    assert!(game.overlay().active_buttons().is_empty());

    run_ticks(&mut game, &mut backend, STEPS - 1);
    assert!(game.current_view().is_none());
    game.tick(&mut backend);
    assert_eq!(game.current_view().unwrap().as_str(), "b");
    assert_eq!(game.world().camera().pose().position, Vec3::new(20.0, 0.0, 4.0));

    let buttons = game.overlay().active_buttons();
    assert_eq!(buttons.len(), 1);
    assert!(buttons.contains(Direction::Left));

    game.pointer_pressed(LEFT_BUTTON);
    run_ticks(&mut game, &mut backend, STEPS);
    assert_eq!(game.current_view().unwrap().as_str(), "a");
}

#[test]
fn clicks_during_a_transition_do_nothing() {
    let mut game = game_with(config(), |handler, scene| {
        handler.set_take_object_action(scene, "a", "key", "A key")
    });
    let mut backend = RecordingBackend::default();

    game.pointer_pressed(RIGHT_BUTTON);
    game.tick(&mut backend);
    game.pointer_pressed(CENTER);
    game.pointer_pressed(RIGHT_BUTTON);

    assert!(game.inventory().is_empty());
    run_ticks(&mut game, &mut backend, STEPS - 1);
    assert_eq!(game.current_view().unwrap().as_str(), "b");
}

#[test]
fn taking_an_object_moves_it_into_the_inventory() {
    let mut game = game_with(config(), |handler, scene| {
        handler.set_take_object_action(scene, "a", "key", "A key")
    });
    let key = id(&game, "key");

    game.pointer_moved(CENTER);
    assert_eq!(game.overlay().tooltip(), Some("A key"));
    assert_eq!(game.world().highlight(), Some(key));

    game.pointer_pressed(CENTER);
    assert!(game.stage().object(key).is_held());
    assert!(!game.stage().object(key).is_visible());
    assert!(game.scene().world_drawables().iter().all(|d| d.object != Some(key)));
    assert_eq!(game.scene().inventory_drawables().len(), 1);

    // Nothing left under the pointer.
    assert_eq!(game.overlay().tooltip(), None);
    assert_eq!(game.world().highlight(), None);
}

#[test]
fn objects_without_an_action_are_inert() {
    let mut game = game_with(config(), |_, _| Ok(()));
    let key = id(&game, "key");

    game.pointer_moved(CENTER);
    assert_eq!(game.overlay().tooltip(), None);
    assert_eq!(game.world().highlight(), None);

    game.pointer_pressed(CENTER);
    assert!(game.inventory().is_empty());
    assert!(game.stage().object(key).is_visible());
    assert_eq!(game.current_view().unwrap().as_str(), "a");
}

#[test]
fn frame_draws_primary_then_overlay_then_inventory() {
    let mut game = game_with(config(), |handler, scene| {
        handler.set_action(scene, "a", "key", &[], "Hover me", |_| {})
    });
    let mut backend = RecordingBackend::default();
    let key = id(&game, "key");

    game.pointer_moved(CENTER);
    game.tick(&mut backend);

    let frame = backend.take();
    assert_eq!(frame.len(), 5);
    assert_eq!(frame[0], Pass::Begin);
    assert_eq!(frame[1], Pass::World(Region::Primary, vec![key]));
    match &frame[2] {
        Pass::Overlay(Region::Primary, text) => {
            assert!(text.iter().any(|t| t == "Hover me"));
        }
        other => panic!("expected the overlay pass, got {other:?}"),
    }
    assert_eq!(frame[3], Pass::World(Region::Inventory, vec![]));
    assert_eq!(frame[4], Pass::End);
}

#[test]
fn inventory_clicks_toggle_the_selection() {
    let mut game = game_with(config(), |handler, scene| {
        handler.set_take_object_action(scene, "a", "key", "A key")
    });
    let mut backend = RecordingBackend::default();
    let key = id(&game, "key");

    game.pointer_pressed(CENTER);
    game.pointer_pressed(INVENTORY_CENTER);
    assert_eq!(game.inventory().selected(), Some(key));

    game.tick(&mut backend);
    let frame = backend.take();
    assert_eq!(frame[3], Pass::World(Region::Inventory, vec![key]));

    game.pointer_pressed(INVENTORY_CENTER);
    assert_eq!(game.inventory().selected(), None);
}

#[test]
fn dependency_selection_changes_tooltip_and_outcome() {
    let mut game = game_with(config(), |handler, scene| {
        handler.set_take_object_action(scene, "a", "key", "A key")?;
        handler.set_action(
            scene,
            "b",
            "door",
            &["key"],
            Message::dynamic(|_, _, deps| {
                if deps[0].is_selected() {
                    "Unlock".to_string()
                } else {
                    "Locked".to_string()
                }
            }),
            |ctx| {
                let opened = match ctx.dependency(0) {
                    Some(mut key) if key.is_selected() => key.drop_from_inventory().is_ok(),
                    _ => false,
                };
                if opened {
                    ctx.finish_game("Free!");
                } else {
                    ctx.show_message("Still locked");
                }
            },
        )
    });
    let mut backend = RecordingBackend::default();
    let key = id(&game, "key");

    game.pointer_pressed(CENTER);
    game.pointer_pressed(RIGHT_BUTTON);
    run_ticks(&mut game, &mut backend, STEPS);

    game.pointer_moved(CENTER);
    assert_eq!(game.overlay().tooltip(), Some("Locked"));
    game.pointer_pressed(CENTER);
    assert_eq!(game.overlay().message(), Some("Still locked"));
    assert!(!game.is_finished());

    game.pointer_pressed(INVENTORY_CENTER);
    game.pointer_moved(CENTER);
    assert_eq!(game.overlay().tooltip(), Some("Unlock"));

    game.pointer_pressed(CENTER);
    assert!(game.is_finished());
    assert!(game.stage().object(key).is_dropped());
    assert!(game.inventory().is_empty());
    assert_eq!(game.overlay().final_message(), Some("Free!"));
}

#[test]
fn finishing_freezes_the_game() {
    let mut game = game_with(config(), |handler, scene| {
        handler.set_action(scene, "a", "key", &[], "The exit", |ctx| {
            ctx.finish_game("You escaped");
        })
    });
    let mut backend = RecordingBackend::default();

    game.pointer_pressed(CENTER);
    assert!(game.is_finished());
    assert!(game.overlay().is_frozen());
    assert!(game.overlay().active_buttons().is_empty());
    assert_eq!(game.current_view().unwrap().as_str(), "a");

    game.pointer_pressed(RIGHT_BUTTON);
    game.switch_view("b");
    game.pointer_moved(CENTER);
    run_ticks(&mut game, &mut backend, STEPS);
    assert_eq!(game.current_view().unwrap().as_str(), "a");
    assert_eq!(game.overlay().tooltip(), None);
    assert_eq!(game.overlay().final_message(), Some("You escaped"));
}

#[test]
fn full_inventory_rejects_with_a_message() {
    let mut game = game_with(config().inventory_capacity(1), |handler, scene| {
        handler.set_take_object_action(scene, "a", "key", "A key")?;
        handler.set_take_object_action(scene, "b", "door", "A portable door")
    });
    let mut backend = RecordingBackend::default();
    let door = id(&game, "door");

    game.pointer_pressed(CENTER);
    game.pointer_pressed(RIGHT_BUTTON);
    run_ticks(&mut game, &mut backend, STEPS);
    game.pointer_pressed(CENTER);

    assert_eq!(game.overlay().message(), Some(INVENTORY_FULL_MESSAGE));
    assert!(game.stage().object(door).is_visible());
    assert_eq!(game.inventory().len(), 1);
}

#[test]
fn finish_wins_over_a_switch_requested_in_the_same_action() {
    let mut game = game_with(config(), |handler, scene| {
        handler.set_action(scene, "a", "key", &[], "The exit", |ctx| {
            ctx.finish_game("You escaped");
            ctx.switch_view("b");
        })
    });
    let mut backend = RecordingBackend::default();

    game.pointer_pressed(CENTER);
    assert!(game.is_finished());
    run_ticks(&mut game, &mut backend, STEPS + 1);
    assert!(game.is_finished());
    assert_eq!(game.overlay().final_message(), Some("You escaped"));
}

#[test]
fn dropped_objects_never_return() {
    let mut game = game_with(config(), |_, _| Ok(()));
    let key = id(&game, "key");
    let stage = game.stage_mut();

    stage.object_mut(key).put_in_inventory().unwrap();
    stage.object_mut(key).drop_from_inventory().unwrap();
    assert!(matches!(
        stage.object_mut(key).put_in_inventory(),
        Err(Error::Dropped(_))
    ));
    stage.object_mut(key).show();
    assert!(!stage.object(key).is_visible());
    assert!(matches!(
        stage.object_mut(key).drop_from_inventory(),
        Err(Error::NotHeld(_))
    ));
}

#[test]
fn switching_to_an_unknown_view_is_ignored() {
    let mut game = game_with(config(), |handler, scene| {
        handler.set_switch_view_action(scene, "a", "key", "cellar", "Trapdoor")
    });
    let mut backend = RecordingBackend::default();

    game.pointer_pressed(CENTER);
    assert_eq!(game.current_view().unwrap().as_str(), "a");
    game.switch_view("cellar");
    run_ticks(&mut game, &mut backend, STEPS);
    assert_eq!(game.current_view().unwrap().as_str(), "a");
}

#[test]
fn arrival_refreshes_hover_under_a_resting_pointer() {
    let mut game = game_with(config(), |handler, scene| {
        handler.set_action(scene, "b", "door", &[], "A door", |_| {})
    });
    let mut backend = RecordingBackend::default();
    let door = id(&game, "door");

    game.pointer_pressed(RIGHT_BUTTON);
    game.pointer_moved(CENTER);
    assert_eq!(game.overlay().tooltip(), None);
    assert_eq!(game.world().highlight(), None);

    run_ticks(&mut game, &mut backend, STEPS);
    assert_eq!(game.current_view().unwrap().as_str(), "b");
    assert_eq!(game.overlay().tooltip(), Some("A door"));
    assert_eq!(game.world().highlight(), Some(door));
}

/// Reports one fixed object wherever the pointer is in the primary region.
struct FixedPicker(ObjectId);

impl Picker for FixedPicker {
    fn pick(
        &self,
        _scene: &SceneIndex,
        region: Region,
        _camera: &Camera,
        _ndc: Vec2,
        _aspect: f32,
    ) -> Option<ObjectId> {
        (region == Region::Primary).then_some(self.0)
    }
}

#[test]
fn custom_picker_decides_what_is_under_the_pointer() {
    let scene = scene();
    let key = scene.resolve("key").unwrap();
    let mut game = Game::new(config(), scene).with_picker(FixedPicker(key));
    game.author(|handler, scene| {
        handler.set_initial_view("a");
        handler.set_take_object_action(scene, "a", "key", "A key")
    })
    .unwrap();
    game.start().unwrap();

    // Far from the key on screen, but the picker says otherwise.
    let corner = Vec2::new(200.0, 400.0);
    game.pointer_moved(corner);
    assert_eq!(game.overlay().tooltip(), Some("A key"));

    game.pointer_pressed(corner);
    assert!(game.stage().object(key).is_held());
}
