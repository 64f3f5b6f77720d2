//! Headless симуляция HOLDFAST
//!
//! Скриптованный прогон контроллера без рендера: ходьба, спринт до
//! усталости, прыжок, захват и бросок ящика. Переходы пишутся в лог.
//!
//! Usage: `holdfast_simulation [tuning.toml]`

use bevy::prelude::*;
use holdfast_simulation::*;

fn main() {
    let tuning = match std::env::args().nth(1) {
        Some(path) => match PlayerTuning::load(&path) {
            Ok(tuning) => tuning,
            Err(err) => {
                eprintln!("Failed to load tuning {}: {}", path, err);
                std::process::exit(1);
            }
        },
        None => PlayerTuning::default(),
    };

    println!("Starting HOLDFAST headless simulation");

    let mut app = create_headless_app();
    let player = spawn_player(&mut app.world_mut().commands(), Vec3::ZERO, &tuning);
    let crate_entity = spawn_grabbable(
        &mut app.world_mut().commands(),
        Vec3::new(0.0, 0.25, -1.5),
        BodyShape::Cuboid {
            half_extents: Vec3::splat(0.25),
        },
        tuning.grabbable,
    );
    app.world_mut().flush();
    app.update();

    let mut script = Script::new(player);

    // Ходьба
    script.run(&mut app, 100, |input| input.move_input = Vec2::Y);
    report(&app, player, "walked");

    // Спринт до усталости
    let mut ticks = 0;
    while ticks < 1000 && app.world().get::<Fatigued>(player).is_none() {
        script.run(&mut app, 1, |input| {
            input.move_input = Vec2::Y;
            input.run = true;
        });
        ticks += 1;
    }
    report(&app, player, "sprinted");

    // Отдышаться и прыгнуть
    script.run(&mut app, 300, |_| {});
    script.run(&mut app, 1, |input| {
        input.jump_pressed = true;
        input.jump_held = true;
    });
    script.run(&mut app, 20, |input| input.jump_held = true);
    script.run(&mut app, 80, |_| {});
    report(&app, player, "jumped");

    // Вернуться к ящику и посмотреть на него
    let player_position = app.world().get::<Transform>(player).map(|t| t.translation).unwrap_or_default();
    let crate_position = app.world().get::<Transform>(crate_entity).map(|t| t.translation).unwrap_or_default();
    if let Some(mut transform) = app.world_mut().get_mut::<Transform>(player) {
        transform.translation = crate_position + Vec3::new(0.0, -crate_position.y, 1.5);
    }
    println!("Teleported player {:?} → next to the crate", player_position);
    aim_down(&mut app, player);

    script.run(&mut app, 1, |_| {});
    script.run(&mut app, 1, |input| input.interact_pressed = true);
    script.run(&mut app, 30, |input| input.look_delta = Vec2::new(0.0, 3.0));
    report_crate(&app, crate_entity, "held");

    script.run(&mut app, 1, |input| input.secondary_pressed = true);
    script.run(&mut app, 100, |_| {});
    report_crate(&app, crate_entity, "thrown");

    println!("Simulation complete! ({} ticks)", script.ticks);
}

/// Пошаговый прогон с input'ом на каждый кадр
struct Script {
    player: Entity,
    ticks: u64,
}

impl Script {
    fn new(player: Entity) -> Self {
        Self { player, ticks: 0 }
    }

    fn run(&mut self, app: &mut App, frames: u32, input: impl Fn(&mut ViewerInput)) {
        for _ in 0..frames {
            if let Some(mut viewer_input) = app.world_mut().get_mut::<ViewerInput>(self.player) {
                viewer_input.move_input = Vec2::ZERO;
                viewer_input.run = false;
                viewer_input.jump_held = false;
                input(&mut viewer_input);
            }
            app.update();
            self.ticks += 1;

            if self.ticks % 100 == 0 {
                println!("Tick {}: {} entities", self.ticks, app.world().entities().len());
            }
        }
    }
}

fn aim_down(app: &mut App, player: Entity) {
    if let Some(mut viewer) = app.world_mut().get_mut::<Viewer>(player) {
        viewer.yaw = 0.0;
        viewer.pitch = -(1.45f32 / 1.5).atan();
    }
}

fn report(app: &App, player: Entity, label: &str) {
    let world = app.world();
    let (Some(transform), Some(stamina)) = (world.get::<Transform>(player), world.get::<Stamina>(player)) else {
        return;
    };
    println!(
        "[{}] position {:.2?}, stamina {:.1}/{:.1}, fatigued {}",
        label,
        transform.translation,
        stamina.current(),
        stamina.max(),
        stamina.is_fatigued()
    );
}

fn report_crate(app: &App, crate_entity: Entity, label: &str) {
    let world = app.world();
    let (Some(transform), Some(grabbable)) =
        (world.get::<Transform>(crate_entity), world.get::<GrabbableEntity>(crate_entity))
    else {
        return;
    };
    println!(
        "[{}] crate at {:.2?}, phase {:?}",
        label,
        transform.translation,
        grabbable.phase()
    );
}
