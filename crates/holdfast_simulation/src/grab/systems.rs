//! Grab systems
//!
//! Fixed step (порядок важен):
//! 1. record_grab_samples - позиция в историю ДО любого чтения скорости
//! 2. process_grab_commands - start / release / forward throw
//! 3. release_orphaned_grabs - holder пропал
//! 4. update_grab_anchors - anchor за взглядом + safety valve
//! 5. solve_grab_joints - пружина тянет к anchor'у (headless; под Rapier
//!    joint решает `physics::rapier_joint`)
//!
//! Frame step: adjust_grab_distance (прокрутка).

use bevy::prelude::*;

use super::components::{GrabCommand, GrabRequest, GrabbableEntity, Grabber};
use super::events::{GrabEnded, GrabExit, GrabRejected, GrabStarted};
use crate::camera::Viewer;
use crate::input::ViewerInput;
use crate::logger;
use crate::physics::PhysicsBody;

pub fn record_grab_samples(mut query: Query<(&mut GrabbableEntity, &Transform)>) {
    for (mut grabbable, transform) in query.iter_mut() {
        grabbable.record_sample(transform.translation);
    }
}

/// Система: исполнить команды, накопленные за кадр
pub fn process_grab_commands(
    mut grabbers: Query<(Entity, &mut Grabber, &Viewer, &Transform)>,
    mut grabbables: Query<(&mut GrabbableEntity, &mut PhysicsBody, &Transform)>,
    mut started: EventWriter<GrabStarted>,
    mut rejected: EventWriter<GrabRejected>,
    mut ended: EventWriter<GrabEnded>,
    time: Res<Time<Fixed>>,
) {
    let fixed_step = time.timestep().as_secs_f32();

    for (grabber_entity, mut grabber, viewer, transform) in grabbers.iter_mut() {
        for command in grabber.take_commands() {
            match command {
                GrabCommand::Start { target, hit_point } => {
                    if grabber.is_holding() {
                        continue;
                    }
                    let Ok((mut grabbable, mut body, target_transform)) = grabbables.get_mut(target) else {
                        continue;
                    };

                    let origin = viewer.origin(transform);
                    let reach = origin.distance(hit_point);
                    let distance = reach.clamp(grabber.config.min_grab_distance, grabber.config.max_grab_distance);
                    let request = GrabRequest {
                        holder: grabber_entity,
                        anchor: origin + *viewer.forward() * distance,
                        view_rotation: viewer.rotation(),
                        reach,
                        grab_range: grabber.config.grab_range,
                    };

                    match grabbable.start_grab(&request, &mut body, target_transform.rotation) {
                        Ok(()) => {
                            grabber.attach(target, reach);
                            started.write(GrabStarted {
                                grabber: grabber_entity,
                                target,
                            });
                            logger::log(&format!(
                                "{:?} grabbed {:?} at {:.2}m (mass {:.1})",
                                grabber_entity, target, reach, body.mass
                            ));
                        }
                        Err(reason) => {
                            rejected.write(GrabRejected {
                                grabber: grabber_entity,
                                target,
                                reason,
                            });
                            logger::log(&format!("{:?} grab of {:?} rejected: {:?}", grabber_entity, target, reason));
                        }
                    }
                }
                GrabCommand::Release => {
                    let Some(target) = grabber.held() else {
                        continue;
                    };
                    grabber.clear_held();

                    let Ok((mut grabbable, mut body, _)) = grabbables.get_mut(target) else {
                        continue;
                    };
                    if let Some(velocity) = grabbable.end_grab(&mut body, fixed_step) {
                        ended.write(GrabEnded {
                            grabber: grabber_entity,
                            target,
                            exit: GrabExit::Released,
                            velocity,
                        });
                        logger::log(&format!("{:?} released {:?} with velocity {:?}", grabber_entity, target, velocity));
                    }
                }
                GrabCommand::ForwardThrow => {
                    let Some(target) = grabber.held() else {
                        continue;
                    };
                    grabber.clear_held();

                    let Ok((mut grabbable, mut body, _)) = grabbables.get_mut(target) else {
                        continue;
                    };
                    if let Some(velocity) = grabbable.forward_throw(&mut body, *viewer.forward()) {
                        ended.write(GrabEnded {
                            grabber: grabber_entity,
                            target,
                            exit: GrabExit::Thrown,
                            velocity,
                        });
                        logger::log(&format!("{:?} threw {:?} with velocity {:?}", grabber_entity, target, velocity));
                    }
                }
            }
        }
    }
}

/// Система: объект, чей holder исчез или больше его не держит, отпускается
pub fn release_orphaned_grabs(
    mut grabbables: Query<(Entity, &mut GrabbableEntity, &mut PhysicsBody)>,
    grabbers: Query<&Grabber>,
    mut ended: EventWriter<GrabEnded>,
    time: Res<Time<Fixed>>,
) {
    let fixed_step = time.timestep().as_secs_f32();

    for (entity, mut grabbable, mut body) in grabbables.iter_mut() {
        let Some(holder) = grabbable.held_by() else {
            continue;
        };

        let still_held = grabbers
            .get(holder)
            .is_ok_and(|grabber| grabber.held() == Some(entity));
        if still_held {
            continue;
        }

        if let Some(velocity) = grabbable.end_grab(&mut body, fixed_step) {
            ended.write(GrabEnded {
                grabber: holder,
                target: entity,
                exit: GrabExit::ForcedRelease,
                velocity,
            });
            logger::log_warning(&format!("{:?} lost its holder {:?}, released", entity, holder));
        }
    }
}

/// Система: anchor = глаза + forward × дистанция, safety valve
pub fn update_grab_anchors(
    mut grabbers: Query<(Entity, &mut Grabber, &Viewer, &Transform)>,
    mut grabbables: Query<(&mut GrabbableEntity, &mut PhysicsBody, &Transform)>,
    mut ended: EventWriter<GrabEnded>,
    time: Res<Time<Fixed>>,
) {
    let fixed_step = time.timestep().as_secs_f32();

    for (grabber_entity, mut grabber, viewer, transform) in grabbers.iter_mut() {
        let Some(target) = grabber.held() else {
            continue;
        };

        let Ok((mut grabbable, mut body, target_transform)) = grabbables.get_mut(target) else {
            // Объект удалён из мира
            grabber.clear_held();
            continue;
        };

        let anchor = viewer.origin(transform) + *viewer.forward() * grabber.grab_distance();
        let view_rotation = grabber.config.track_view_rotation.then(|| viewer.rotation());
        grabbable.set_anchor(anchor, view_rotation);

        if grabbable.exceeds_safety_limit(target_transform.translation, grabber.config.max_grab_distance) {
            grabber.clear_held();
            if let Some(velocity) = grabbable.end_grab(&mut body, fixed_step) {
                ended.write(GrabEnded {
                    grabber: grabber_entity,
                    target,
                    exit: GrabExit::ForcedRelease,
                    velocity,
                });
                logger::log_warning(&format!(
                    "{:?} too far from anchor ({:.2}m), force released",
                    target,
                    target_transform.translation.distance(anchor)
                ));
            }
        }
    }
}

pub fn solve_grab_joints(
    mut query: Query<(&GrabbableEntity, &mut PhysicsBody, &mut Transform)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (grabbable, mut body, mut transform) in query.iter_mut() {
        if grabbable.held_by().is_some() {
            grabbable.solve_joint(&mut body, &mut transform, delta);
        }
    }
}

/// Система: колесо мыши двигает anchor ближе/дальше
pub fn adjust_grab_distance(mut query: Query<(&ViewerInput, &mut Grabber)>) {
    for (input, mut grabber) in query.iter_mut() {
        if grabber.is_holding() {
            grabber.scroll(input.scroll);
        }
    }
}
