pub mod frame;
pub mod patch;
pub mod profile;

pub use frame::{
    Frame, MAX_FLOW, MAX_PRESSURE, MAX_TEMP, MIN_FLOW, MIN_PRESSURE, MIN_TEMP, Measure, Target,
    Trigger, TriggerOperator,
};
pub use patch::{FramePatch, FrameUpdate, TargetPatch, TriggerFields, TriggerPatch};
pub use profile::{Profile, ProfileError, parse_profile};
