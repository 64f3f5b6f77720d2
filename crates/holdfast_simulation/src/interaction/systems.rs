//! Interaction systems (frame step)
//!
//! confirm_grab_interactions → scan_interaction_focus → handle_interact_input
//! → update_crosshair

use bevy::prelude::*;

use super::components::{Crosshair, CrosshairCursor, Highlighted, Interactable, InteractionFocus, InteractionKind};
use super::events::{CrosshairChanged, FocusGained, FocusLost, Interacted};
use crate::camera::Viewer;
use crate::grab::{GrabStarted, GrabbableEntity, Grabber};
use crate::input::ViewerInput;
use crate::logger;
use crate::physics::{BackendRaycaster, RayFilter, SceneRaycaster};

/// Система: луч из глаз → фокус
///
/// Пока grabber занят (держит или собирается взять), фокус заморожен.
pub fn scan_interaction_focus(
    mut commands: Commands,
    mut viewers: Query<(Entity, &Viewer, &Transform, &mut InteractionFocus, Option<&Grabber>)>,
    mut interactables: Query<(&mut Interactable, Option<&GrabbableEntity>)>,
    raycaster: BackendRaycaster,
    mut gained: EventWriter<FocusGained>,
    mut lost: EventWriter<FocusLost>,
) {
    for (viewer_entity, viewer, transform, mut focus, grabber) in viewers.iter_mut() {
        if grabber.is_some_and(Grabber::is_busy) {
            continue;
        }

        let filter = RayFilter {
            mask: focus.config.layer_mask,
            exclude: Some(viewer_entity),
        };
        let hit = raycaster.cast_ray(
            viewer.origin(transform),
            viewer.forward(),
            focus.config.interaction_range,
            &filter,
        );

        // Ближайшее попадание должно быть доступным interactable'ом
        let candidate = hit.and_then(|hit| {
            let (interactable, grabbable) = interactables.get(hit.entity).ok()?;
            interactable
                .can_interact(grabbable)
                .then_some((hit.entity, interactable.kind, hit.point))
        });

        let Some((target, kind, point)) = candidate else {
            if let Some(old) = focus.clear() {
                lose_focus(&mut commands, &mut interactables, &mut lost, viewer_entity, old);
            }
            continue;
        };

        if focus.target() == Some(target) {
            focus.set(target, kind, point);
            continue;
        }

        if let Some(old) = focus.clear() {
            lose_focus(&mut commands, &mut interactables, &mut lost, viewer_entity, old);
        }

        focus.set(target, kind, point);
        if let Ok((mut interactable, _)) = interactables.get_mut(target) {
            interactable.on_focus();
        }
        commands.entity(target).try_insert(Highlighted);
        gained.write(FocusGained {
            viewer: viewer_entity,
            target,
            kind,
        });
        logger::log(&format!("{:?} focused {:?} ({:?})", viewer_entity, target, kind));
    }
}

fn lose_focus(
    commands: &mut Commands,
    interactables: &mut Query<(&mut Interactable, Option<&GrabbableEntity>)>,
    lost: &mut EventWriter<FocusLost>,
    viewer: Entity,
    target: Entity,
) {
    if let Ok((mut interactable, _)) = interactables.get_mut(target) {
        interactable.on_lose_focus();
    }
    commands.entity(target).try_remove::<Highlighted>();
    lost.write(FocusLost { viewer, target });
}

/// Система: interact / release / secondary → dispatch по kind
///
/// Grab только ставит запрос в очередь grabber'а: `Interacted` для него
/// шлёт `confirm_grab_interactions`, когда захват реально начался.
pub fn handle_interact_input(
    mut players: Query<(Entity, &ViewerInput, &InteractionFocus, Option<&mut Grabber>)>,
    mut interactables: Query<(&mut Interactable, Option<&GrabbableEntity>)>,
    mut interacted: EventWriter<Interacted>,
) {
    for (player, input, focus, mut grabber) in players.iter_mut() {
        if input.interact_pressed {
            if let Some(target) = focus.target() {
                if let Ok((mut interactable, grabbable)) = interactables.get_mut(target) {
                    if interactable.can_interact(grabbable) {
                        match interactable.kind {
                            InteractionKind::Grab => {
                                if let Some(grabber) = grabber.as_mut().filter(|grabber| !grabber.is_busy()) {
                                    grabber.request_grab(target, focus.hit_point());
                                }
                            }
                            InteractionKind::None => {}
                            kind @ (InteractionKind::Interact | InteractionKind::Examine) => {
                                record_interaction(&mut interactable, &mut interacted, player, target, kind);
                            }
                        }
                    }
                }
            }
        }

        let Some(grabber) = grabber.as_mut() else {
            continue;
        };

        if input.secondary_pressed && grabber.is_busy() {
            grabber.request_forward_throw();
        }

        if input.interact_released && grabber.is_busy() {
            grabber.request_release();
        }
    }
}

/// Система: исполненный захват засчитывается как взаимодействие
///
/// Отклонённый запрос (вне дистанции, уже удерживается) - no-op.
pub fn confirm_grab_interactions(
    mut started: EventReader<GrabStarted>,
    mut interactables: Query<&mut Interactable>,
    mut interacted: EventWriter<Interacted>,
) {
    for event in started.read() {
        if let Ok(mut interactable) = interactables.get_mut(event.target) {
            record_interaction(
                &mut interactable,
                &mut interacted,
                event.grabber,
                event.target,
                InteractionKind::Grab,
            );
        }
    }
}

fn record_interaction(
    interactable: &mut Interactable,
    interacted: &mut EventWriter<Interacted>,
    viewer: Entity,
    target: Entity,
    kind: InteractionKind,
) {
    interactable.on_interact();
    interacted.write(Interacted { viewer, target, kind });
    logger::log(&format!("{:?} interacted with {:?} ({:?})", viewer, target, kind));
}

/// Система: курсор из фокуса и состояния захвата
pub fn update_crosshair(
    mut query: Query<(Entity, &InteractionFocus, Option<&Grabber>, &mut Crosshair)>,
    mut changed: EventWriter<CrosshairChanged>,
) {
    for (viewer, focus, grabber, mut crosshair) in query.iter_mut() {
        let holding = grabber.is_some_and(Grabber::is_busy);
        let cursor = CrosshairCursor::resolve(focus.kind(), holding);

        if crosshair.cursor != cursor {
            crosshair.cursor = cursor;
            changed.write(CrosshairChanged { viewer, cursor });
        }
    }
}
