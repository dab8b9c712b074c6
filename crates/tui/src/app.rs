use std::path::PathBuf;

use crema_core::model::FrameUpdate;
use crema_core::views::{Control, EditableText, FrameAction};
use crema_core::{EditorCommand, ProfileEditor};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{info, warn};

/// What an in-progress rename applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameTarget {
    Profile,
    Frame(usize),
}

pub struct App {
    editor: ProfileEditor,
    /// Frame the editor row shows.
    selected: usize,
    /// Control block under the cursor.
    control: usize,
    rename: Option<(NameTarget, EditableText)>,
    status: Option<String>,
    save_path: PathBuf,
    quit: bool,
}

impl App {
    pub fn new(editor: ProfileEditor, save_path: PathBuf) -> Self {
        Self {
            editor,
            selected: 0,
            control: 0,
            rename: None,
            status: None,
            save_path,
            quit: false,
        }
    }

    pub fn editor(&self) -> &ProfileEditor {
        &self.editor
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn control(&self) -> usize {
        self.control
    }

    pub fn rename(&self) -> Option<&(NameTarget, EditableText)> {
        self.rename.as_ref()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Control blocks of the selected frame.
    pub fn controls(&self) -> Vec<Control> {
        self.editor
            .frame_editor(self.selected)
            .map(|w| w.controls())
            .unwrap_or_default()
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.rename.is_some() {
            self.handle_rename_key(key);
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit = true;
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.select(self.selected.saturating_sub(1)),
            KeyCode::Down | KeyCode::Char('j') => self.select(self.selected + 1),
            KeyCode::Left | KeyCode::Char('h') => self.control = self.control.saturating_sub(1),
            KeyCode::Right | KeyCode::Char('l') => {
                self.control = (self.control + 1).min(self.controls().len().saturating_sub(1));
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                if let Some((up, _)) = self.current_control().and_then(|c| c.step) {
                    self.frame_action(up);
                }
            }
            KeyCode::Char('-') | KeyCode::Char('_') => {
                if let Some((_, down)) = self.current_control().and_then(|c| c.step) {
                    self.frame_action(down);
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(click) = self.current_control().and_then(|c| c.click) {
                    self.frame_action(click);
                }
            }
            KeyCode::Char('t') => self.frame_action(FrameAction::ToggleTrigger),
            KeyCode::Char('a') => {
                self.editor.dispatch(EditorCommand::AddFrame);
                self.flush();
                if let Some(i) = self.editor.highlight() {
                    self.selected = i;
                }
            }
            KeyCode::Char('r') => {
                if let Some(frame) = self.editor.profile().frame(self.selected) {
                    self.begin_rename(NameTarget::Frame(self.selected), frame.name.clone());
                }
            }
            KeyCode::Char('R') => {
                let name = self.editor.profile().name.clone();
                self.begin_rename(NameTarget::Profile, name);
            }
            KeyCode::Char('w') => self.save(),
            _ => {}
        }
    }

    fn handle_rename_key(&mut self, key: KeyEvent) {
        let Some((target, text)) = self.rename.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => {
                text.cancel();
                self.rename = None;
            }
            KeyCode::Enter => {
                let target = *target;
                let committed = text.commit();
                self.rename = None;
                if let Some(name) = committed {
                    self.commit_name(target, name);
                }
            }
            KeyCode::Backspace => {
                if let Some(draft) = text.draft_mut() {
                    draft.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(draft) = text.draft_mut() {
                    draft.push(c);
                }
            }
            _ => {}
        }
    }

    fn begin_rename(&mut self, target: NameTarget, current: String) {
        let mut text = EditableText::new(current);
        text.begin_edit();
        self.rename = Some((target, text));
    }

    fn commit_name(&mut self, target: NameTarget, name: String) {
        match target {
            NameTarget::Profile => self.editor.dispatch(EditorCommand::RenameProfile(name)),
            NameTarget::Frame(index) => {
                if let Some(update) = self
                    .editor
                    .frame_editor(index)
                    .and_then(|w| w.apply(FrameAction::Rename(name)))
                {
                    self.editor.dispatch(update);
                }
            }
        }
        self.flush();
    }

    fn select(&mut self, index: usize) {
        let last = self.editor.profile().frames.len().saturating_sub(1);
        self.selected = index.min(last);
        self.editor.select(Some(self.selected));
        self.clamp_control();
    }

    fn current_control(&self) -> Option<Control> {
        self.controls().into_iter().nth(self.control)
    }

    fn frame_action(&mut self, action: FrameAction) {
        let update: Option<FrameUpdate> = self
            .editor
            .frame_editor(self.selected)
            .and_then(|w| w.apply(action));
        match update {
            Some(update) => {
                self.editor.dispatch(update);
                self.flush();
            }
            None => self.status = Some("no trigger on this frame".into()),
        }
    }

    /// Run queued edits and report the last failure, if any.
    fn flush(&mut self) {
        let errors = self.editor.drain();
        for e in &errors {
            warn!(error = %e, "edit rejected");
        }
        self.status = errors.last().map(ToString::to_string);
        self.clamp_control();
    }

    fn clamp_control(&mut self) {
        self.control = self.control.min(self.controls().len().saturating_sub(1));
    }

    fn save(&mut self) {
        let result = self
            .editor
            .to_json_pretty()
            .map_err(anyhow::Error::from)
            .and_then(|json| std::fs::write(&self.save_path, json).map_err(anyhow::Error::from));
        self.status = Some(match result {
            Ok(()) => {
                info!(path = %self.save_path.display(), "saved profile");
                format!("saved {}", self.save_path.display())
            }
            Err(e) => format!("save failed: {e}"),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(ProfileEditor::new(), PathBuf::from("unused.json"))
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::from(code));
    }

    #[test]
    fn steppers_edit_the_selected_frame() {
        let mut app = app();
        press(&mut app, KeyCode::Char('+'));
        assert_eq!(app.editor().profile().frames[0].duration, 11.0);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Char('-'));
        assert_eq!(app.editor().profile().frames[0].temp, 89.0);
        assert_eq!(app.editor().highlight(), Some(0));
    }

    #[test]
    fn shrinking_to_zero_reports_error() {
        let mut app = app();
        for _ in 0..10 {
            press(&mut app, KeyCode::Char('-'));
        }
        assert_eq!(app.editor().profile().frames[0].duration, 1.0);
        assert!(app.status().is_some_and(|s| s.contains("duration")));
    }

    #[test]
    fn add_frame_selects_it() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.selected(), 1);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.selected(), 0);
        assert_eq!(app.editor().highlight(), Some(0));
    }

    #[test]
    fn rename_frame_with_keyboard() {
        let mut app = app();
        press(&mut app, KeyCode::Char('r'));
        for _ in 0.."Infuse".len() {
            press(&mut app, KeyCode::Backspace);
        }
        for c in "Bloom".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);
        assert!(app.rename().is_none());
        assert_eq!(app.editor().profile().frames[0].name, "Bloom");
    }

    #[test]
    fn trigger_toggle_and_operator() {
        let mut app = app();
        press(&mut app, KeyCode::Char('t'));
        assert!(app.editor().profile().frames[0].trigger.is_some());
        // duration, temp, kind, value, interpolate, trigger kind, operator
        for _ in 0..6 {
            press(&mut app, KeyCode::Right);
        }
        press(&mut app, KeyCode::Enter);
        let op = app.editor().profile().frames[0].trigger.map(|t| t.operator.symbol());
        assert_eq!(op, Some("<"));
        press(&mut app, KeyCode::Char('t'));
        assert!(app.editor().profile().frames[0].trigger.is_none());
    }
}
