//! Profile editor: the single owner of the profile.
//!
//! Widgets never touch the profile. They hand [`EditorCommand`]s to
//! [`ProfileEditor::dispatch`]; [`ProfileEditor::drain`] applies them in
//! order on the caller's thread and refreshes the chart after each one.

use std::collections::VecDeque;

use crema_protocol::RenderCommand;
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::{Frame, FrameUpdate, Profile, ProfileError};
use crate::views::{ChartConfig, FrameEditor, ProfileChart};

#[derive(Debug, Error)]
pub enum EditError {
    #[error("frame index {index} out of range ({len} frames)")]
    FrameOutOfRange { index: usize, len: usize },
    #[error("update rejected: {0}")]
    Invalid(#[from] ProfileError),
    #[error("profile name must not be empty")]
    EmptyName,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditorCommand {
    UpdateFrame(FrameUpdate),
    AddFrame,
    Select(Option<usize>),
    RenameProfile(String),
    SetDescription(Option<String>),
    SetAuthor(Option<String>),
}

impl From<FrameUpdate> for EditorCommand {
    fn from(update: FrameUpdate) -> Self {
        EditorCommand::UpdateFrame(update)
    }
}

#[derive(Debug, Clone)]
pub struct ProfileEditor {
    profile: Profile,
    current_frame: Option<usize>,
    chart: ProfileChart,
    pending: VecDeque<EditorCommand>,
}

impl Default for ProfileEditor {
    fn default() -> Self {
        Self::from_valid(Profile::default(), ChartConfig::default())
    }
}

impl ProfileEditor {
    /// Editor over the built-in starter profile.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(profile: Profile, config: ChartConfig) -> Result<Self, ProfileError> {
        profile.validate()?;
        Ok(Self::from_valid(profile, config))
    }

    fn from_valid(profile: Profile, config: ChartConfig) -> Self {
        Self {
            chart: ProfileChart::new(profile.clone(), config),
            profile,
            current_frame: None,
            pending: VecDeque::new(),
        }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn chart(&self) -> &ProfileChart {
        &self.chart
    }

    /// Resize the chart canvas.
    pub fn set_chart_size(&mut self, width: f64, height: f64) {
        self.chart.set_size(width, height);
    }

    /// The last edited or selected frame, whether or not it still exists.
    pub fn current_frame(&self) -> Option<usize> {
        self.current_frame
    }

    /// The current frame if it is within the profile.
    pub fn highlight(&self) -> Option<usize> {
        self.current_frame.filter(|&i| i < self.profile.frames.len())
    }

    /// One read-only frame editor per frame, in profile order.
    pub fn frame_editors(&self) -> Vec<FrameEditor> {
        self.profile
            .frames
            .iter()
            .enumerate()
            .map(|(i, f)| FrameEditor::new(i, f.clone()))
            .collect()
    }

    pub fn frame_editor(&self, index: usize) -> Option<FrameEditor> {
        self.profile
            .frames
            .get(index)
            .map(|f| FrameEditor::new(index, f.clone()))
    }

    pub fn render_chart(&self) -> Vec<RenderCommand> {
        self.chart.render()
    }

    /// Pretty-printed JSON of the profile, for display and debugging.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.profile)
    }

    /// Queue a command for the next [`drain`](Self::drain).
    pub fn dispatch(&mut self, command: impl Into<EditorCommand>) {
        self.pending.push_back(command.into());
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Apply every queued command in order. A failing command is skipped
    /// and the rest still run; the errors are returned in queue order.
    pub fn drain(&mut self) -> Vec<EditError> {
        let mut errors = Vec::new();
        while let Some(command) = self.pending.pop_front() {
            if let Err(e) = self.execute(command) {
                errors.push(e);
            }
        }
        errors
    }

    pub fn execute(&mut self, command: EditorCommand) -> Result<(), EditError> {
        match command {
            EditorCommand::UpdateFrame(update) => self.apply_update(update).map(|_| ()),
            EditorCommand::AddFrame => {
                self.add_frame();
                Ok(())
            }
            EditorCommand::Select(index) => {
                self.select(index);
                Ok(())
            }
            EditorCommand::RenameProfile(name) => self.rename(&name),
            EditorCommand::SetDescription(description) => {
                self.profile.description = description.filter(|d| !d.is_empty());
                self.refresh();
                Ok(())
            }
            EditorCommand::SetAuthor(author) => {
                self.profile.author = author.filter(|a| !a.is_empty());
                self.refresh();
                Ok(())
            }
        }
    }

    /// Deep-merge `update.patch` into `frames[update.index]` and make that
    /// frame current. The frame is replaced only if the merged result is
    /// valid.
    pub fn apply_update(&mut self, update: FrameUpdate) -> Result<&Frame, EditError> {
        let len = self.profile.frames.len();
        let Some(frame) = self.profile.frames.get(update.index) else {
            warn!(index = update.index, len, "update for missing frame");
            return Err(EditError::FrameOutOfRange {
                index: update.index,
                len,
            });
        };

        let merged = update.patch.apply_to(frame);
        if let Err(e) = merged.validate(update.index) {
            warn!(index = update.index, error = %e, "rejected frame update");
            return Err(e.into());
        }

        debug!(index = update.index, patch = ?update.patch, "applied frame update");
        self.profile.frames[update.index] = merged;
        self.current_frame = Some(update.index);
        self.refresh();
        Ok(&self.profile.frames[update.index])
    }

    /// Append a default "Brew" frame and make it current. Returns its index.
    pub fn add_frame(&mut self) -> usize {
        self.profile.frames.push(Frame::with_defaults("Brew"));
        let index = self.profile.frames.len() - 1;
        debug!(index, "added frame");
        self.current_frame = Some(index);
        self.refresh();
        index
    }

    pub fn select(&mut self, index: Option<usize>) {
        self.current_frame = index;
        self.chart.set_highlight(self.highlight());
    }

    pub fn rename(&mut self, name: &str) -> Result<(), EditError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EditError::EmptyName);
        }
        self.profile.name = name.to_string();
        self.refresh();
        Ok(())
    }

    /// Hand the chart the new profile so its scales are recomputed before
    /// the next render.
    fn refresh(&mut self) {
        self.chart.set_profile(self.profile.clone());
        self.chart.set_highlight(self.highlight());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FramePatch, TargetPatch};
    use crate::views::FrameAction;
    use pretty_assertions::assert_eq;

    #[test]
    fn starts_with_default_profile() {
        let editor = ProfileEditor::new();
        assert_eq!(editor.profile(), &Profile::default());
        assert_eq!(editor.current_frame(), None);
        assert_eq!(editor.chart().scales().x_scale, 80.0);
    }

    #[test]
    fn update_merges_and_selects() {
        let mut editor = ProfileEditor::new();
        editor.add_frame();
        editor.select(None);
        let update = FrameUpdate::new(
            0,
            FramePatch {
                target: Some(TargetPatch {
                    value: Some(5.0),
                    ..TargetPatch::default()
                }),
                ..FramePatch::default()
            },
        );
        let frame = editor.apply_update(update).expect("valid update").clone();
        assert_eq!(frame.target.value, 5.0);
        assert_eq!(frame.name, "Infuse");
        assert_eq!(frame.temp, 90.0);
        assert_eq!(editor.highlight(), Some(0));
        assert_eq!(editor.chart().highlight(), Some(0));
    }

    #[test]
    fn empty_update_changes_nothing_but_selection() {
        let mut editor = ProfileEditor::new();
        let before = editor.profile().clone();
        assert!(editor.apply_update(FrameUpdate::new(0, FramePatch::default())).is_ok());
        assert_eq!(editor.profile(), &before);
        assert_eq!(editor.current_frame(), Some(0));
    }

    #[test]
    fn out_of_range_update_is_rejected() {
        let mut editor = ProfileEditor::new();
        let err = editor.apply_update(FrameUpdate::new(4, FramePatch::default()));
        assert!(matches!(
            err,
            Err(EditError::FrameOutOfRange { index: 4, len: 1 })
        ));
        assert_eq!(editor.current_frame(), None);
    }

    #[test]
    fn zero_duration_is_rejected_and_frame_kept() {
        let mut editor = ProfileEditor::new();
        let before = editor.profile().clone();
        let update = FrameUpdate::new(
            0,
            FramePatch {
                duration: Some(0.0),
                ..FramePatch::default()
            },
        );
        assert!(matches!(
            editor.apply_update(update),
            Err(EditError::Invalid(ProfileError::NonPositiveDuration { .. }))
        ));
        assert_eq!(editor.profile(), &before);
        assert!(editor.chart().scales().x_scale.is_finite());
    }

    #[test]
    fn add_frame_appends_brew_and_rescales() {
        let mut editor = ProfileEditor::new();
        assert_eq!(editor.add_frame(), 1);
        assert_eq!(editor.profile().frames[1].name, "Brew");
        assert_eq!(editor.highlight(), Some(1));
        assert_eq!(editor.chart().scales().total_duration, 20.0);
        assert_eq!(editor.chart().scales().x_scale, 40.0);
    }

    #[test]
    fn queued_commands_drain_in_order() {
        let mut editor = ProfileEditor::new();
        editor.dispatch(EditorCommand::AddFrame);
        let widget = FrameEditor::new(1, Frame::with_defaults("Brew"));
        let update = widget
            .apply(FrameAction::IncrementDuration)
            .expect("duration step always emits");
        editor.dispatch(update);
        editor.dispatch(FrameUpdate::new(9, FramePatch::default()));
        editor.dispatch(EditorCommand::RenameProfile("  Turbo  ".into()));
        assert!(editor.has_pending());

        let errors = editor.drain();
        assert!(!editor.has_pending());
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], EditError::FrameOutOfRange { index: 9, .. }));
        assert_eq!(editor.profile().frames[1].duration, 11.0);
        assert_eq!(editor.profile().name, "Turbo");
        assert_eq!(editor.highlight(), Some(1));
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut editor = ProfileEditor::new();
        assert!(matches!(
            editor.execute(EditorCommand::RenameProfile("   ".into())),
            Err(EditError::EmptyName)
        ));
        assert_eq!(editor.profile().name, "New Profile");
    }

    #[test]
    fn metadata_setters_drop_empty_values() {
        let mut editor = ProfileEditor::new();
        assert!(editor.execute(EditorCommand::SetAuthor(Some(String::new()))).is_ok());
        assert_eq!(editor.profile().author, None);
        assert!(
            editor
                .execute(EditorCommand::SetDescription(Some("Slow bloom".into())))
                .is_ok()
        );
        assert_eq!(editor.profile().description.as_deref(), Some("Slow bloom"));
    }

    #[test]
    fn json_dump_is_pretty() {
        let editor = ProfileEditor::new();
        let json = editor.to_json_pretty().expect("profile serializes");
        assert!(json.starts_with("{\n  \"name\": \"New Profile\""));
        assert!(json.contains("\"type\": \"flow\""));
    }
}
