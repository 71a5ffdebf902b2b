use escape_room::{
    Color, GameConfig, Links, Message, MutableObjectView, NavigationCapability, ReadOnlyObjectView,
    Result, SceneEntity, SceneIndex, Vec3, init_logging,
};

fn study() -> Result<SceneIndex> {
    SceneIndex::from_entities(vec![
        // Viewpoints
        SceneEntity::marker("desk_camera", Vec3::new(0.0, 1.6, 3.0)),
        SceneEntity::marker("desk_lookat", Vec3::new(0.0, 0.8, 0.0)),
        SceneEntity::marker("shelf_camera", Vec3::new(0.0, 1.6, 0.5)),
        SceneEntity::marker("shelf_lookat", Vec3::new(3.0, 1.4, 0.5)),
        SceneEntity::marker("door_camera", Vec3::new(0.0, 1.6, 0.5)),
        SceneEntity::marker("door_lookat", Vec3::new(-3.0, 1.2, 0.5)),
        // Furniture
        SceneEntity::prop("floor", Vec3::new(0.0, -0.05, 0.0), Vec3::new(8.0, 0.1, 8.0))
            .color(Color::rgb(0.35, 0.25, 0.18)),
        SceneEntity::prop("desk", Vec3::new(0.0, 0.4, 0.0), Vec3::new(1.6, 0.8, 0.8))
            .color(Color::rgb(0.45, 0.3, 0.2)),
        SceneEntity::prop("shelf", Vec3::new(3.0, 1.0, 0.5), Vec3::new(0.4, 2.0, 1.6))
            .color(Color::rgb(0.4, 0.28, 0.2)),
        // Interactive objects
        SceneEntity::object("lamp", Vec3::new(0.5, 1.0, 0.0), Vec3::new(0.2, 0.4, 0.2))
            .color(Color::rgb(0.9, 0.85, 0.5)),
        SceneEntity::object("book", Vec3::new(2.8, 1.5, 0.3), Vec3::new(0.2, 0.3, 0.1))
            .color(Color::rgb(0.6, 0.1, 0.1)),
        SceneEntity::object("key", Vec3::new(2.7, 1.1, 0.6), Vec3::new(0.15, 0.03, 0.06))
            .color(Color::rgb(0.85, 0.7, 0.2)),
        SceneEntity::object("door", Vec3::new(-3.0, 1.0, 0.5), Vec3::new(0.1, 2.0, 1.0))
            .color(Color::rgb(0.3, 0.3, 0.35)),
    ])
}

fn run_demo() -> Result<()> {
    let config = GameConfig::new()
        .title("The Study")
        .size(1280, 720)
        .inventory_capacity(3)
        .transition_steps(45);

    escape_room::run(config, study()?, |game| {
        game.author(|handler, scene| {
            handler.set_initial_view("desk");
            handler.set_view_links("desk", Links::new().left("door").right("shelf"));
            handler.set_view_links("shelf", Links::new().left("desk"));
            handler.set_view_links("door", Links::new().right("desk"));

            handler.set_action(scene, "desk", "lamp", &[], "A dusty lamp", |ctx| {
                ctx.show_message("It flickers, but stays on.");
            })?;

            handler.set_action(
                scene,
                "shelf",
                "book",
                &["key"],
                "A heavy red book",
                |ctx| {
                    let revealed = ctx.dependency(0).map(|mut key| {
                        let hidden = !key.is_visible() && !key.is_held();
                        key.show();
                        hidden
                    });
                    if revealed == Some(true) {
                        ctx.show_message("Something slips out of the pages.");
                    }
                },
            )?;
            handler.set_take_object_action(scene, "shelf", "key", "A small brass key")?;

            handler.set_action(
                scene,
                "door",
                "door",
                &["key"],
                Message::dynamic(|_view, _door, deps| {
                    if deps.iter().any(|key| key.is_selected()) {
                        "Unlock the door".to_string()
                    } else {
                        "A locked door".to_string()
                    }
                }),
                |ctx| {
                    let unlocked = match ctx.dependency(0) {
                        Some(mut key) if key.is_selected() => key.drop_from_inventory().is_ok(),
                        _ => false,
                    };
                    if unlocked {
                        ctx.finish_game("The lock turns. You are free!");
                    } else {
                        ctx.show_message("It's locked.");
                    }
                },
            )?;

            handler.dump_views();
            handler.dump_actions(scene);
            Ok(())
        })?;

        // The key only appears once the book has been opened.
        let key = game.scene().resolve("key")?;
        game.stage_mut().object_mut(key).hide();

        game.on_tick(|tick| {
            if tick % 600 == 0 {
                tracing::debug!("tick {}", tick);
            }
        });
        Ok(())
    })
}

fn main() {
    init_logging();

    if let Err(err) = run_demo() {
        tracing::error!("{}", err);
        std::process::exit(1);
    }
}
