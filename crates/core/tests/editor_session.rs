//! Integration test: load a profile from JSON, drive it through frame
//! editor actions and wire-format updates, and check the chart and the
//! debug dump follow along.

use crema_core::model::{Measure, TriggerOperator, parse_profile};
use crema_core::svg::render_svg;
use crema_core::views::{ChartConfig, FrameAction};
use crema_core::{EditError, EditorCommand, ProfileEditor};
use crema_protocol::{Rect, RenderCommand, ThemeToken};

const CONFIG: ChartConfig = ChartConfig {
    width: 600.0,
    height: 390.0,
};

fn load() -> ProfileEditor {
    let data = include_bytes!("fixtures/blooming.json");
    let profile = parse_profile(data).expect("fixture should parse");
    ProfileEditor::with_profile(profile, CONFIG).expect("fixture should validate")
}

fn highlight_rect(commands: &[RenderCommand]) -> Option<Rect> {
    commands.iter().find_map(|c| match c {
        RenderCommand::DrawRect {
            rect,
            color: ThemeToken::HighlightFill,
            ..
        } => Some(*rect),
        _ => None,
    })
}

#[test]
fn edit_profile_through_widgets() {
    let mut editor = load();
    assert_eq!(editor.profile().frames.len(), 4);
    assert_eq!(editor.chart().scales().total_duration, 60.0);
    assert_eq!(editor.chart().scales().x_scale, 10.0);
    assert_eq!(highlight_rect(&editor.render_chart()), None);

    // Lengthen the bloom from its widget: selects frame 1.
    let bloom = editor.frame_editor(1).expect("frame 1 exists");
    let update = bloom
        .apply(FrameAction::IncrementDuration)
        .expect("duration step always emits");
    editor.dispatch(update);
    assert!(editor.drain().is_empty());

    let scales = editor.chart().scales();
    assert_eq!(scales.total_duration, 61.0);
    assert_eq!(editor.highlight(), Some(1));
    let rect = highlight_rect(&editor.render_chart()).expect("frame 1 highlighted");
    assert_eq!(rect.x, 5.0 * scales.x_scale);
    assert_eq!(rect.w, 16.0 * scales.x_scale);

    // Turn the fill trigger off and on again: values reset to the default.
    let fill = editor.frame_editor(0).expect("frame 0 exists");
    let off = fill.apply(FrameAction::ToggleTrigger).expect("trigger shown");
    editor.dispatch(off);
    assert!(editor.drain().is_empty());
    assert_eq!(editor.profile().frames[0].trigger, None);

    let fill = editor.frame_editor(0).expect("frame 0 exists");
    let on = fill.apply(FrameAction::ToggleTrigger).expect("trigger hidden");
    editor.dispatch(on);
    assert!(editor.drain().is_empty());
    let trigger = editor.profile().frames[0].trigger.expect("trigger restored");
    assert_eq!(trigger.kind, Measure::Flow);
    assert_eq!(trigger.value, 4.0);
    assert_eq!(trigger.operator, TriggerOperator::GreaterThan);
    assert_eq!(editor.profile().frames[0].target.value, 6.0);
}

#[test]
fn wire_updates_from_both_event_shapes() {
    let mut editor = load();

    let flat = serde_json::from_str(r#"{"index": 3, "temp": 86, "target": {"value": 1.5}}"#)
        .expect("flat update parses");
    let nested = serde_json::from_str(r#"{"index": 3, "frame": {"trigger": {"operator": "greater_than"}}}"#)
        .expect("nested update parses");
    editor.dispatch(EditorCommand::UpdateFrame(flat));
    editor.dispatch(EditorCommand::UpdateFrame(nested));
    assert!(editor.drain().is_empty());

    let decline = &editor.profile().frames[3];
    assert_eq!(decline.temp, 86.0);
    assert_eq!(decline.target.value, 1.5);
    assert_eq!(decline.target.kind, Measure::Flow);
    assert!(decline.target.interpolate);
    let trigger = decline.trigger.expect("trigger kept");
    assert_eq!(trigger.value, 3.5);
    assert_eq!(trigger.operator, TriggerOperator::GreaterThan);
}

#[test]
fn rejected_updates_leave_profile_untouched() {
    let mut editor = load();
    let before = editor.profile().clone();

    let shrink = serde_json::from_str(r#"{"index": 0, "duration": -5}"#).expect("parses");
    let missing = serde_json::from_str(r#"{"index": 12, "temp": 90}"#).expect("parses");
    editor.dispatch(EditorCommand::UpdateFrame(shrink));
    editor.dispatch(EditorCommand::UpdateFrame(missing));
    let errors = editor.drain();

    assert_eq!(errors.len(), 2);
    assert!(matches!(errors[0], EditError::Invalid(_)));
    assert!(matches!(errors[1], EditError::FrameOutOfRange { index: 12, len: 4 }));
    assert_eq!(editor.profile(), &before);
    assert_eq!(editor.highlight(), None);
}

#[test]
fn add_frame_then_export() {
    let mut editor = load();
    editor.dispatch(EditorCommand::AddFrame);
    editor.dispatch(EditorCommand::RenameProfile("Blooming + Brew".into()));
    assert!(editor.drain().is_empty());
    assert_eq!(editor.highlight(), Some(4));

    let json = editor.to_json_pretty().expect("profile serializes");
    let reloaded = parse_profile(json.as_bytes()).expect("dump parses back");
    assert_eq!(&reloaded, editor.profile());
    assert_eq!(reloaded.frames[4].name, "Brew");

    let svg = render_svg(&editor.render_chart(), CONFIG.width, CONFIG.height, false);
    assert_eq!(svg.matches("<g id=\"frame-").count(), 5);
}

#[test]
fn very_long_profile_renders_sparse_grid() {
    let data = br#"{
        "name": "Marathon",
        "frames": [{"name": "Soak", "temp": 92, "duration": 10000000,
                    "target": {"type": "pressure", "value": 3, "interpolate": false}}]
    }"#;
    let profile = parse_profile(data).expect("valid profile");
    let editor = ProfileEditor::with_profile(profile, ChartConfig::default())
        .expect("long frames are valid");

    let commands = editor.render_chart();
    assert!(commands.len() < 64, "{} commands", commands.len());
    let svg = render_svg(&commands, 800.0, 400.0, true);
    assert!(svg.contains("<g id=\"frame-0\"><title>Soak</title>"));
}
