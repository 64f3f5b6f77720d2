//! Grab / throw module
//!
//! State machine `Idle → Held → {Released, Thrown}` поверх spring joint'а.
//! Пока объект Held, его joint и gravity flag принадлежат только ему;
//! forced release идёт тем же путём, что и обычный.

pub mod components;
pub mod events;
pub mod history;
pub mod systems;


use bevy::prelude::*;

pub use components::{
    GrabCommand, GrabPhase, GrabRejection, GrabRequest, GrabbableConfig, GrabbableEntity, Grabber, GrabberConfig,
};
pub use events::{GrabEnded, GrabExit, GrabRejected, GrabStarted};
pub use history::VelocityHistory;
pub use systems::{
    adjust_grab_distance, process_grab_commands, record_grab_samples, release_orphaned_grabs, solve_grab_joints,
    update_grab_anchors,
};

use crate::physics::PhysicsBackend;
use crate::{FixedSet, FrameSet};

pub struct GrabPlugin;

impl Plugin for GrabPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<GrabStarted>()
            .add_event::<GrabRejected>()
            .add_event::<GrabEnded>();

        app.add_systems(
            FixedUpdate,
            (
                record_grab_samples,
                process_grab_commands,
                release_orphaned_grabs,
                update_grab_anchors,
                // Под Rapier joint решает его солвер
                solve_grab_joints.run_if(resource_equals(PhysicsBackend::Headless)),
            )
                .chain()
                .in_set(FixedSet::Grab),
        );

        app.add_systems(Update, adjust_grab_distance.in_set(FrameSet::Interaction));
    }
}
