//! Frame editor: a read-only view over one frame that turns user actions
//! into [`FrameUpdate`] intents. It never mutates the frame it shows.

use crema_protocol::ThemeToken;

use crate::model::{
    Frame, FramePatch, FrameUpdate, Measure, TargetPatch, Trigger, TriggerFields, TriggerPatch,
};

/// Amount a single stepper click adds or removes.
pub const STEP: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub enum FrameAction {
    IncrementTemp,
    DecrementTemp,
    IncrementDuration,
    DecrementDuration,
    IncrementTarget,
    DecrementTarget,
    IncrementTrigger,
    DecrementTrigger,
    ToggleTargetKind,
    ToggleInterpolate,
    ToggleTrigger,
    ToggleTriggerKind,
    ToggleTriggerOperator,
    Rename(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerVisibility {
    Hidden,
    Shown,
}

/// What a control block shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    Duration,
    Temp,
    TargetKind,
    TargetValue,
    Interpolate,
    TriggerNone,
    TriggerKind,
    TriggerOperator,
    TriggerValue,
    TriggerOff,
}

/// One block of the editor, independent of how it is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Control {
    pub kind: ControlKind,
    pub text: String,
    pub unit: Option<&'static str>,
    pub color: ThemeToken,
    /// Action for a click on the block itself.
    pub click: Option<FrameAction>,
    /// Up/down stepper actions.
    pub step: Option<(FrameAction, FrameAction)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameEditor {
    index: usize,
    frame: Frame,
}

impl FrameEditor {
    pub fn new(index: usize, frame: Frame) -> Self {
        Self { index, frame }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn trigger_visibility(&self) -> TriggerVisibility {
        if self.frame.trigger.is_some() {
            TriggerVisibility::Shown
        } else {
            TriggerVisibility::Hidden
        }
    }

    /// The update `action` asks for, or `None` when the action has nothing
    /// to act on (trigger controls while the trigger is hidden).
    pub fn apply(&self, action: FrameAction) -> Option<FrameUpdate> {
        let frame = &self.frame;
        let patch = match action {
            FrameAction::IncrementTemp => FramePatch {
                temp: Some(frame.temp + STEP),
                ..FramePatch::default()
            },
            FrameAction::DecrementTemp => FramePatch {
                temp: Some(frame.temp - STEP),
                ..FramePatch::default()
            },
            FrameAction::IncrementDuration => FramePatch {
                duration: Some(frame.duration + STEP),
                ..FramePatch::default()
            },
            FrameAction::DecrementDuration => FramePatch {
                duration: Some(frame.duration - STEP),
                ..FramePatch::default()
            },
            FrameAction::IncrementTarget => target_patch(TargetPatch {
                value: Some(frame.target.value + STEP),
                ..TargetPatch::default()
            }),
            FrameAction::DecrementTarget => target_patch(TargetPatch {
                value: Some(frame.target.value - STEP),
                ..TargetPatch::default()
            }),
            FrameAction::ToggleTargetKind => target_patch(TargetPatch {
                kind: Some(frame.target.kind.toggled()),
                ..TargetPatch::default()
            }),
            FrameAction::ToggleInterpolate => target_patch(TargetPatch {
                interpolate: Some(!frame.target.interpolate),
                ..TargetPatch::default()
            }),
            FrameAction::ToggleTrigger => match self.trigger_visibility() {
                TriggerVisibility::Hidden => {
                    trigger_patch(TriggerPatch::Merge(Trigger::default().into()))
                }
                TriggerVisibility::Shown => trigger_patch(TriggerPatch::Clear),
            },
            FrameAction::IncrementTrigger => {
                let trigger = frame.trigger?;
                trigger_fields(TriggerFields {
                    value: Some(trigger.value + STEP),
                    ..TriggerFields::default()
                })
            }
            FrameAction::DecrementTrigger => {
                let trigger = frame.trigger?;
                trigger_fields(TriggerFields {
                    value: Some(trigger.value - STEP),
                    ..TriggerFields::default()
                })
            }
            FrameAction::ToggleTriggerKind => {
                let trigger = frame.trigger?;
                trigger_fields(TriggerFields {
                    kind: Some(trigger.kind.toggled()),
                    ..TriggerFields::default()
                })
            }
            FrameAction::ToggleTriggerOperator => {
                let trigger = frame.trigger?;
                trigger_fields(TriggerFields {
                    operator: Some(trigger.operator.toggled()),
                    ..TriggerFields::default()
                })
            }
            FrameAction::Rename(name) => FramePatch {
                name: Some(name),
                ..FramePatch::default()
            },
        };
        Some(FrameUpdate::new(self.index, patch))
    }

    /// Blocks in display order: duration, temperature, target, trigger.
    pub fn controls(&self) -> Vec<Control> {
        let frame = &self.frame;
        let target_color = block_token(frame.target.kind);
        let mut controls = vec![
            Control {
                kind: ControlKind::Duration,
                text: format!("{}s", format_number(frame.duration)),
                unit: None,
                color: ThemeToken::DurationBlock,
                click: None,
                step: Some((FrameAction::IncrementDuration, FrameAction::DecrementDuration)),
            },
            Control {
                kind: ControlKind::Temp,
                text: format!("{}°C", format_number(frame.temp)),
                unit: None,
                color: ThemeToken::TempBlock,
                click: None,
                step: Some((FrameAction::IncrementTemp, FrameAction::DecrementTemp)),
            },
            Control {
                kind: ControlKind::TargetKind,
                text: frame.target.kind.label().into(),
                unit: None,
                color: target_color,
                click: Some(FrameAction::ToggleTargetKind),
                step: None,
            },
            Control {
                kind: ControlKind::TargetValue,
                text: format_number(frame.target.value),
                unit: Some(frame.target.kind.unit()),
                color: target_color,
                click: None,
                step: Some((FrameAction::IncrementTarget, FrameAction::DecrementTarget)),
            },
            Control {
                kind: ControlKind::Interpolate,
                text: if frame.target.interpolate { "slow" } else { "fast" }.into(),
                unit: None,
                color: target_color,
                click: Some(FrameAction::ToggleInterpolate),
                step: None,
            },
        ];

        let Some(trigger) = frame.trigger else {
            controls.push(Control {
                kind: ControlKind::TriggerNone,
                text: "no trigger".into(),
                unit: None,
                color: ThemeToken::TriggerNoneBlock,
                click: Some(FrameAction::ToggleTrigger),
                step: None,
            });
            return controls;
        };

        controls.extend([
            Control {
                kind: ControlKind::TriggerKind,
                text: trigger.kind.label().into(),
                unit: None,
                color: ThemeToken::TriggerBlock,
                click: Some(FrameAction::ToggleTriggerKind),
                step: None,
            },
            Control {
                kind: ControlKind::TriggerOperator,
                text: trigger.operator.symbol().into(),
                unit: None,
                color: ThemeToken::TriggerBlock,
                click: Some(FrameAction::ToggleTriggerOperator),
                step: None,
            },
            Control {
                kind: ControlKind::TriggerValue,
                text: format_number(trigger.value),
                unit: Some(trigger.kind.unit()),
                color: ThemeToken::TriggerBlock,
                click: None,
                step: Some((FrameAction::IncrementTrigger, FrameAction::DecrementTrigger)),
            },
            Control {
                kind: ControlKind::TriggerOff,
                text: "off".into(),
                unit: None,
                color: ThemeToken::TriggerNoneBlock,
                click: Some(FrameAction::ToggleTrigger),
                step: None,
            },
        ]);
        controls
    }
}

fn target_patch(target: TargetPatch) -> FramePatch {
    FramePatch {
        target: Some(target),
        ..FramePatch::default()
    }
}

fn trigger_patch(trigger: TriggerPatch) -> FramePatch {
    FramePatch {
        trigger: Some(trigger),
        ..FramePatch::default()
    }
}

fn trigger_fields(fields: TriggerFields) -> FramePatch {
    trigger_patch(TriggerPatch::Merge(fields))
}

pub fn block_token(kind: Measure) -> ThemeToken {
    match kind {
        Measure::Flow => ThemeToken::FlowBlock,
        Measure::Pressure => ThemeToken::PressureBlock,
    }
}

/// Up to two decimals, without trailing zeros: `7`, `2.5`, `12.13`.
pub fn format_number(value: f64) -> String {
    let s = format!("{value:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".into() } else { s.into() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TriggerOperator;
    use pretty_assertions::assert_eq;

    fn editor(frame: Frame) -> FrameEditor {
        FrameEditor::new(3, frame)
    }

    fn patch(editor: &FrameEditor, action: FrameAction) -> FramePatch {
        editor.apply(action).expect("action emits an update").patch
    }

    #[test]
    fn steppers_emit_absolute_values() {
        let ed = editor(Frame::with_defaults("Infuse"));
        let update = ed.apply(FrameAction::IncrementTemp);
        assert_eq!(update.as_ref().map(|u| u.index), Some(3));
        assert_eq!(update.and_then(|u| u.patch.temp), Some(91.0));
        assert_eq!(patch(&ed, FrameAction::DecrementDuration).duration, Some(9.0));
        assert_eq!(
            patch(&ed, FrameAction::IncrementTarget).target,
            Some(TargetPatch {
                value: Some(8.0),
                ..TargetPatch::default()
            })
        );
    }

    #[test]
    fn toggles_flip_target_fields() {
        let ed = editor(Frame::with_defaults("Infuse"));
        let kind = patch(&ed, FrameAction::ToggleTargetKind).target;
        assert_eq!(kind.and_then(|t| t.kind), Some(Measure::Pressure));
        let interp = patch(&ed, FrameAction::ToggleInterpolate).target;
        assert_eq!(interp.and_then(|t| t.interpolate), Some(true));
        assert_eq!(interp.and_then(|t| t.value), None);
    }

    #[test]
    fn trigger_toggle_cycles_between_default_and_null() {
        let hidden = editor(Frame::with_defaults("Infuse"));
        assert_eq!(hidden.trigger_visibility(), TriggerVisibility::Hidden);
        let on = hidden
            .apply(FrameAction::ToggleTrigger)
            .expect("toggle always emits");
        let json = serde_json::to_value(&on).expect("update serializes");
        assert_eq!(
            json,
            serde_json::json!({
                "index": 3,
                "trigger": {"type": "flow", "value": 4.0, "operator": "greater_than"}
            })
        );

        let shown_frame = on.patch.apply_to(hidden.frame());
        let shown = editor(shown_frame);
        assert_eq!(shown.trigger_visibility(), TriggerVisibility::Shown);
        let off = shown
            .apply(FrameAction::ToggleTrigger)
            .expect("toggle always emits");
        let json = serde_json::to_value(&off).expect("update serializes");
        assert_eq!(json, serde_json::json!({"index": 3, "trigger": null}));
    }

    #[test]
    fn trigger_actions_need_a_trigger() {
        let ed = editor(Frame::with_defaults("Infuse"));
        assert_eq!(ed.apply(FrameAction::IncrementTrigger), None);
        assert_eq!(ed.apply(FrameAction::DecrementTrigger), None);
        assert_eq!(ed.apply(FrameAction::ToggleTriggerKind), None);
        assert_eq!(ed.apply(FrameAction::ToggleTriggerOperator), None);
    }

    #[test]
    fn trigger_decrement_lowers_value() {
        let ed = editor(Frame {
            trigger: Some(Trigger::default()),
            ..Frame::with_defaults("Infuse")
        });
        let p = patch(&ed, FrameAction::DecrementTrigger);
        assert_eq!(
            p.trigger,
            Some(TriggerPatch::Merge(TriggerFields {
                value: Some(3.0),
                ..TriggerFields::default()
            }))
        );
        let op = patch(&ed, FrameAction::ToggleTriggerOperator);
        assert_eq!(
            op.trigger,
            Some(TriggerPatch::Merge(TriggerFields {
                operator: Some(TriggerOperator::LessThan),
                ..TriggerFields::default()
            }))
        );
    }

    #[test]
    fn rename_patches_name_only() {
        let ed = editor(Frame::with_defaults("Infuse"));
        let p = patch(&ed, FrameAction::Rename("Preinfuse".into()));
        assert_eq!(
            p,
            FramePatch {
                name: Some("Preinfuse".into()),
                ..FramePatch::default()
            }
        );
    }

    #[test]
    fn controls_reflect_trigger_state() {
        let ed = editor(Frame::with_defaults("Infuse"));
        let kinds: Vec<ControlKind> = ed.controls().iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ControlKind::Duration,
                ControlKind::Temp,
                ControlKind::TargetKind,
                ControlKind::TargetValue,
                ControlKind::Interpolate,
                ControlKind::TriggerNone,
            ]
        );
        let texts: Vec<String> = ed.controls().into_iter().map(|c| c.text).collect();
        assert_eq!(texts[0], "10s");
        assert_eq!(texts[1], "90°C");
        assert_eq!(texts[4], "fast");

        let with_trigger = editor(Frame {
            trigger: Some(Trigger::default()),
            ..Frame::with_defaults("Infuse")
        });
        let controls = with_trigger.controls();
        assert_eq!(controls.len(), 9);
        assert_eq!(controls[6].text, ">");
        assert_eq!(controls[7].unit, Some("ml/s"));
    }

    #[test]
    fn number_formatting() {
        assert_eq!(format_number(7.0), "7");
        assert_eq!(format_number(10.0), "10");
        assert_eq!(format_number(12.13), "12.13");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(-0.0), "0");
    }
}
