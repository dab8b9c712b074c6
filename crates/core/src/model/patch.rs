//! Partial frame updates and the deep merge that applies them.
//!
//! A [`FramePatch`] mirrors [`Frame`] with every field optional. Merging
//! overrides the fields a patch names, recurses into `target` and
//! `trigger`, and leaves everything else untouched. Patches also combine
//! with each other so that applying `a` then `b` is the same as applying
//! `a.combine(b)` once.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::frame::{Frame, Measure, Target, Trigger, TriggerOperator};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FramePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<TargetPatch>,
    /// `None` leaves the trigger alone; `null` on the wire clears it.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_trigger"
    )]
    pub trigger: Option<TriggerPatch>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetPatch {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<Measure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpolate: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TriggerFields {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<Measure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<TriggerOperator>,
}

/// Change to a frame's optional trigger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TriggerPatch {
    /// Remove the trigger (`null` on the wire).
    Clear,
    /// Merge fields into the trigger. A frame without a trigger merges into
    /// [`Trigger::default`].
    Merge(TriggerFields),
}

/// A patch addressed to one frame of a profile.
///
/// Serializes flat, `{ "index": n, ...patch }`. Deserialization also
/// accepts the nested form `{ "index": n, "frame": { ...patch } }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "FrameUpdateWire")]
pub struct FrameUpdate {
    pub index: usize,
    #[serde(flatten)]
    pub patch: FramePatch,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FrameUpdateWire {
    Nested {
        index: usize,
        frame: FramePatch,
    },
    Flat {
        index: usize,
        #[serde(flatten)]
        patch: FramePatch,
    },
}

impl From<FrameUpdateWire> for FrameUpdate {
    fn from(wire: FrameUpdateWire) -> Self {
        match wire {
            FrameUpdateWire::Nested { index, frame } => FrameUpdate {
                index,
                patch: frame,
            },
            FrameUpdateWire::Flat { index, patch } => FrameUpdate { index, patch },
        }
    }
}

impl FrameUpdate {
    pub fn new(index: usize, patch: FramePatch) -> Self {
        Self { index, patch }
    }
}

impl FramePatch {
    pub fn is_empty(&self) -> bool {
        *self == FramePatch::default()
    }

    /// Return `frame` with this patch merged in.
    pub fn apply_to(&self, frame: &Frame) -> Frame {
        Frame {
            name: self.name.clone().unwrap_or_else(|| frame.name.clone()),
            temp: self.temp.unwrap_or(frame.temp),
            duration: self.duration.unwrap_or(frame.duration),
            target: self
                .target
                .map_or(frame.target, |t| t.apply_to(&frame.target)),
            trigger: match self.trigger {
                Some(t) => t.apply_to(frame.trigger.as_ref()),
                None => frame.trigger,
            },
        }
    }

    /// Combine two patches; fields in `later` win, nested fields merge.
    pub fn combine(self, later: FramePatch) -> FramePatch {
        FramePatch {
            name: later.name.or(self.name),
            temp: later.temp.or(self.temp),
            duration: later.duration.or(self.duration),
            target: match (self.target, later.target) {
                (Some(a), Some(b)) => Some(a.combine(b)),
                (a, b) => b.or(a),
            },
            trigger: match (self.trigger, later.trigger) {
                (Some(a), Some(b)) => Some(a.combine(b)),
                (a, b) => b.or(a),
            },
        }
    }
}

impl TargetPatch {
    pub fn apply_to(&self, target: &Target) -> Target {
        Target {
            kind: self.kind.unwrap_or(target.kind),
            value: self.value.unwrap_or(target.value),
            interpolate: self.interpolate.unwrap_or(target.interpolate),
        }
    }

    pub fn combine(self, later: TargetPatch) -> TargetPatch {
        TargetPatch {
            kind: later.kind.or(self.kind),
            value: later.value.or(self.value),
            interpolate: later.interpolate.or(self.interpolate),
        }
    }
}

impl TriggerFields {
    pub fn apply_to(&self, trigger: &Trigger) -> Trigger {
        Trigger {
            kind: self.kind.unwrap_or(trigger.kind),
            value: self.value.unwrap_or(trigger.value),
            operator: self.operator.unwrap_or(trigger.operator),
        }
    }

    pub fn combine(self, later: TriggerFields) -> TriggerFields {
        TriggerFields {
            kind: later.kind.or(self.kind),
            value: later.value.or(self.value),
            operator: later.operator.or(self.operator),
        }
    }
}

impl From<Trigger> for TriggerFields {
    fn from(t: Trigger) -> Self {
        Self {
            kind: Some(t.kind),
            value: Some(t.value),
            operator: Some(t.operator),
        }
    }
}

impl TriggerPatch {
    pub fn apply_to(&self, current: Option<&Trigger>) -> Option<Trigger> {
        match self {
            TriggerPatch::Clear => None,
            TriggerPatch::Merge(fields) => {
                Some(fields.apply_to(&current.copied().unwrap_or_default()))
            }
        }
    }

    pub fn combine(self, later: TriggerPatch) -> TriggerPatch {
        match (self, later) {
            (_, TriggerPatch::Clear) => TriggerPatch::Clear,
            // After a clear, later fields land on the default trigger no
            // matter what the frame had before.
            (TriggerPatch::Clear, TriggerPatch::Merge(b)) => {
                TriggerPatch::Merge(b.apply_to(&Trigger::default()).into())
            }
            (TriggerPatch::Merge(a), TriggerPatch::Merge(b)) => TriggerPatch::Merge(a.combine(b)),
        }
    }
}

impl Serialize for TriggerPatch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TriggerPatch::Clear => serializer.serialize_none(),
            TriggerPatch::Merge(fields) => serializer.serialize_some(fields),
        }
    }
}

impl<'de> Deserialize<'de> for TriggerPatch {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<TriggerFields>::deserialize(deserializer)? {
            Some(fields) => TriggerPatch::Merge(fields),
            None => TriggerPatch::Clear,
        })
    }
}

/// `Option<T>` would swallow `null` as "absent"; a present key always
/// yields `Some`.
fn present_trigger<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<TriggerPatch>, D::Error> {
    TriggerPatch::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn frame_with_trigger() -> Frame {
        Frame {
            trigger: Some(Trigger {
                kind: Measure::Pressure,
                value: 6.0,
                operator: TriggerOperator::LessThan,
            }),
            ..Frame::with_defaults("Infuse")
        }
    }

    fn parse(json: &str) -> FrameUpdate {
        serde_json::from_str(json).expect("update parses")
    }

    #[test]
    fn empty_patch_is_identity() {
        let frame = frame_with_trigger();
        assert!(FramePatch::default().is_empty());
        assert_eq!(FramePatch::default().apply_to(&frame), frame);
    }

    #[test]
    fn nested_merge_keeps_siblings() {
        let frame = frame_with_trigger();
        let patch = FramePatch {
            target: Some(TargetPatch {
                value: Some(8.0),
                ..TargetPatch::default()
            }),
            trigger: Some(TriggerPatch::Merge(TriggerFields {
                value: Some(7.0),
                ..TriggerFields::default()
            })),
            ..FramePatch::default()
        };
        let merged = patch.apply_to(&frame);
        assert_eq!(merged.target.value, 8.0);
        assert_eq!(merged.target.kind, frame.target.kind);
        assert_eq!(merged.target.interpolate, frame.target.interpolate);
        let trigger = merged.trigger.expect("trigger kept");
        assert_eq!(trigger.value, 7.0);
        assert_eq!(trigger.kind, Measure::Pressure);
        assert_eq!(trigger.operator, TriggerOperator::LessThan);
        assert_eq!(merged.name, frame.name);
        assert_eq!(merged.temp, frame.temp);
    }

    #[test]
    fn clear_removes_trigger_and_merge_fills_defaults() {
        let frame = frame_with_trigger();
        let cleared = FramePatch {
            trigger: Some(TriggerPatch::Clear),
            ..FramePatch::default()
        }
        .apply_to(&frame);
        assert_eq!(cleared.trigger, None);

        let revived = FramePatch {
            trigger: Some(TriggerPatch::Merge(TriggerFields {
                value: Some(2.0),
                ..TriggerFields::default()
            })),
            ..FramePatch::default()
        }
        .apply_to(&cleared);
        assert_eq!(
            revived.trigger,
            Some(Trigger {
                value: 2.0,
                ..Trigger::default()
            })
        );
    }

    #[test]
    fn sequential_application_equals_combined_patch() {
        let frame = frame_with_trigger();
        let a = FramePatch {
            temp: Some(93.0),
            trigger: Some(TriggerPatch::Clear),
            ..FramePatch::default()
        };
        let b = FramePatch {
            duration: Some(12.0),
            target: Some(TargetPatch {
                interpolate: Some(true),
                ..TargetPatch::default()
            }),
            trigger: Some(TriggerPatch::Merge(TriggerFields {
                operator: Some(TriggerOperator::LessThan),
                ..TriggerFields::default()
            })),
            ..FramePatch::default()
        };
        let c = FramePatch {
            temp: Some(88.0),
            target: Some(TargetPatch {
                kind: Some(Measure::Pressure),
                ..TargetPatch::default()
            }),
            ..FramePatch::default()
        };

        let stepwise = c.apply_to(&b.apply_to(&a.apply_to(&frame)));
        let left = a.clone().combine(b.clone()).combine(c.clone());
        let right = a.combine(b.combine(c));
        assert_eq!(left.apply_to(&frame), stepwise);
        assert_eq!(right.apply_to(&frame), stepwise);
        assert_eq!(left, right);
    }

    #[test]
    fn flat_wire_format() {
        let update = parse(r#"{"index": 2, "temp": 95, "target": {"interpolate": true}}"#);
        assert_eq!(update.index, 2);
        assert_eq!(update.patch.temp, Some(95.0));
        assert_eq!(
            update.patch.target,
            Some(TargetPatch {
                interpolate: Some(true),
                ..TargetPatch::default()
            })
        );
        assert_eq!(update.patch.trigger, None);
    }

    #[test]
    fn nested_wire_format() {
        let update = parse(r#"{"index": 0, "frame": {"duration": 15, "trigger": null}}"#);
        assert_eq!(update.index, 0);
        assert_eq!(update.patch.duration, Some(15.0));
        assert_eq!(update.patch.trigger, Some(TriggerPatch::Clear));
    }

    #[test]
    fn null_trigger_survives_serialization() {
        let update = FrameUpdate::new(
            1,
            FramePatch {
                trigger: Some(TriggerPatch::Clear),
                ..FramePatch::default()
            },
        );
        let json = serde_json::to_value(&update).expect("update serializes");
        assert_eq!(json, serde_json::json!({"index": 1, "trigger": null}));
        assert_eq!(parse(&json.to_string()), update);
    }
}
