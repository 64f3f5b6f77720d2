//! Stamina systems (frame step)

use bevy::prelude::*;

use super::components::{Fatigued, Stamina, StaminaSignal};
use super::events::{FatigueEntered, FatigueExited, StaminaChanged};
use crate::logger;

/// Система: passive regen + сброс jump multiplier'а
pub fn tick_stamina(mut query: Query<&mut Stamina>, time: Res<Time>) {
    let delta = time.delta_secs();

    for mut stamina in query.iter_mut() {
        stamina.tick(delta);
    }
}

/// Система: сигналы ресурса → events + Fatigued marker
///
/// Запускается после всех потребителей stamina в кадре (movement, tick),
/// поэтому events одного кадра приходят пачкой в порядке изменений.
pub fn publish_stamina_signals(
    mut commands: Commands,
    mut query: Query<(Entity, &mut Stamina)>,
    mut changed: EventWriter<StaminaChanged>,
    mut entered: EventWriter<FatigueEntered>,
    mut exited: EventWriter<FatigueExited>,
) {
    for (entity, mut stamina) in query.iter_mut() {
        let signals = stamina.drain_signals();
        if signals.is_empty() {
            continue;
        }

        let max = stamina.max();
        for signal in signals {
            match signal {
                StaminaSignal::Changed(value) => {
                    let percentage = if max > 0.0 { value / max } else { 0.0 };
                    changed.write(StaminaChanged {
                        entity,
                        value,
                        percentage,
                    });
                }
                StaminaSignal::FatigueEntered => {
                    commands.entity(entity).insert(Fatigued {
                        movement_penalty: stamina.config().fatigue_movement_penalty,
                    });
                    entered.write(FatigueEntered { entity });
                    logger::log_info(&format!(
                        "{:?} fatigued (stamina {:.1}/{:.0})",
                        entity,
                        stamina.current(),
                        max
                    ));
                }
                StaminaSignal::FatigueExited => {
                    commands.entity(entity).remove::<Fatigued>();
                    exited.write(FatigueExited { entity });
                    logger::log_info(&format!(
                        "{:?} recovered from fatigue (stamina {:.1}/{:.0})",
                        entity,
                        stamina.current(),
                        max
                    ));
                }
            }
        }
    }
}
