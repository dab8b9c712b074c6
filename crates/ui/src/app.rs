use crema_core::model::parse_profile;
use crema_core::views::{ChartConfig, Control, EditableText, FrameAction, FrameEditor};
use crema_core::{EditorCommand, ProfileEditor};
use crema_protocol::ThemeToken;
use eframe::egui;

use crate::renderer;
use crate::theme::{self, ThemeMode};

/// Height reserved for the frame editor strip.
const EDITOR_STRIP_HEIGHT: f32 = 150.0;
const BLOCK_WIDTH: f32 = 72.0;

/// Main application state.
pub struct CremaApp {
    editor: ProfileEditor,
    theme_mode: ThemeMode,
    name: EditableText,
    description: EditableText,
    author: EditableText,
    /// Frame whose name is being edited.
    frame_rename: Option<(usize, EditableText)>,
    show_json: bool,
    /// Last error or notice shown in the status bar.
    status: Option<String>,
}

impl CremaApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let theme_mode = ThemeMode::default();
        cc.egui_ctx.set_visuals(theme_mode.visuals());
        Self::with_editor(ProfileEditor::new(), theme_mode)
    }

    fn with_editor(editor: ProfileEditor, theme_mode: ThemeMode) -> Self {
        let profile = editor.profile();
        Self {
            name: EditableText::new(profile.name.clone()),
            description: EditableText::new(profile.description.clone().unwrap_or_default()),
            author: EditableText::new(profile.author.clone().unwrap_or_default()),
            editor,
            theme_mode,
            frame_rename: None,
            show_json: false,
            status: None,
        }
    }

    fn load_profile(&mut self, data: &[u8]) {
        let chart = self.editor.chart();
        let config = ChartConfig {
            width: chart.width(),
            height: chart.height(),
        };
        let loaded = parse_profile(data).and_then(|p| ProfileEditor::with_profile(p, config));
        match loaded {
            Ok(editor) => {
                log_info(&format!(
                    "loaded profile '{}' ({} frames)",
                    editor.profile().name,
                    editor.profile().frames.len()
                ));
                *self = Self::with_editor(editor, self.theme_mode);
            }
            Err(e) => {
                log_warn(&format!("failed to load profile: {e}"));
                self.status = Some(format!("Failed to load profile: {e}"));
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn open_dialog(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Profile", &["json"])
            .pick_file()
        else {
            return;
        };
        match std::fs::read(&path) {
            Ok(data) => self.load_profile(&data),
            Err(e) => self.status = Some(format!("Failed to read file: {e}")),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn save_dialog(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Profile", &["json"])
            .set_file_name("profile.json")
            .save_file()
        else {
            return;
        };
        let result = self
            .editor
            .to_json_pretty()
            .map_err(anyhow::Error::from)
            .and_then(|json| std::fs::write(&path, json).map_err(anyhow::Error::from));
        self.status = Some(match result {
            Ok(()) => format!("Saved {}", path.display()),
            Err(e) => format!("Failed to save: {e}"),
        });
    }

    /// Run queued edits and pick up the model's values in the metadata
    /// fields that are not being edited.
    fn flush(&mut self) {
        let errors = self.editor.drain();
        for e in &errors {
            log_warn(&format!("edit rejected: {e}"));
        }
        if let Some(e) = errors.last() {
            self.status = Some(e.to_string());
        }

        let profile = self.editor.profile();
        self.name.sync(&profile.name);
        self.description
            .sync(profile.description.as_deref().unwrap_or_default());
        self.author.sync(profile.author.as_deref().unwrap_or_default());
    }

    fn frame_action(&mut self, widget: &FrameEditor, action: FrameAction) {
        if let Some(update) = widget.apply(action) {
            self.editor.dispatch(update);
        }
    }

    fn toolbar(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("crema");
            ui.separator();

            #[cfg(not(target_arch = "wasm32"))]
            {
                if ui.button("Open").clicked() {
                    self.open_dialog();
                }
                if ui.button("Save").clicked() {
                    self.save_dialog();
                }
                ui.separator();
            }

            if ui.button("Add frame").clicked() {
                self.editor.dispatch(EditorCommand::AddFrame);
            }
            ui.toggle_value(&mut self.show_json, "JSON");

            let theme_label = match self.theme_mode {
                ThemeMode::Dark => "Dark",
                ThemeMode::Light => "Light",
            };
            if ui.button(theme_label).clicked() {
                self.theme_mode = self.theme_mode.toggled();
                ctx.set_visuals(self.theme_mode.visuals());
            }
        });
    }

    fn metadata_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Profile");
        ui.add_space(4.0);
        if let Some(name) = editable_row(ui, "Name", &mut self.name) {
            self.editor.dispatch(EditorCommand::RenameProfile(name));
        }
        if let Some(description) = editable_row(ui, "Description", &mut self.description) {
            self.editor
                .dispatch(EditorCommand::SetDescription(Some(description)));
        }
        if let Some(author) = editable_row(ui, "Author", &mut self.author) {
            self.editor.dispatch(EditorCommand::SetAuthor(Some(author)));
        }

        ui.separator();
        let profile = self.editor.profile();
        ui.label(format!("{} frames", profile.frames.len()));
        ui.label(format!("{}s total", profile.total_duration()));
    }

    fn frame_strip(&mut self, ui: &mut egui::Ui) {
        let highlight = self.editor.highlight();
        egui::ScrollArea::horizontal().show(ui, |ui| {
            ui.horizontal_top(|ui| {
                for widget in self.editor.frame_editors() {
                    let selected = highlight == Some(widget.index());
                    egui::Frame::group(ui.style())
                        .stroke(if selected {
                            ui.visuals().selection.stroke
                        } else {
                            ui.visuals().widgets.noninteractive.bg_stroke
                        })
                        .show(ui, |ui| {
                            ui.vertical(|ui| {
                                self.frame_header(ui, &widget);
                                ui.horizontal_wrapped(|ui| {
                                    for control in widget.controls() {
                                        self.control_block(ui, &widget, &control);
                                    }
                                });
                            });
                        });
                }
            });
        });
    }

    fn frame_header(&mut self, ui: &mut egui::Ui, widget: &FrameEditor) {
        let index = widget.index();
        match &mut self.frame_rename {
            Some((i, text)) if *i == index => {
                let mut done = None;
                ui.horizontal(|ui| {
                    if let Some(draft) = text.draft_mut() {
                        let response = ui.text_edit_singleline(draft);
                        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                            done = Some(true);
                        }
                    }
                    if ui.small_button("ok").clicked() {
                        done = Some(true);
                    }
                    if ui.small_button("cancel").clicked() {
                        done = Some(false);
                    }
                });
                match done {
                    Some(true) => {
                        let name = text.commit();
                        self.frame_rename = None;
                        if let Some(name) = name {
                            self.frame_action(widget, FrameAction::Rename(name));
                        }
                    }
                    Some(false) => self.frame_rename = None,
                    None => {}
                }
            }
            _ => {
                let title = egui::RichText::new(&widget.frame().name).strong();
                let response = ui
                    .add(egui::Label::new(title).sense(egui::Sense::click()))
                    .on_hover_text("Double-click to rename");
                if response.clicked() {
                    self.editor.dispatch(EditorCommand::Select(Some(index)));
                }
                if response.double_clicked() {
                    let mut text = EditableText::new(widget.frame().name.clone());
                    text.begin_edit();
                    self.frame_rename = Some((index, text));
                }
            }
        }
    }

    fn control_block(&mut self, ui: &mut egui::Ui, widget: &FrameEditor, control: &Control) {
        let fill = theme::resolve(control.color, self.theme_mode);
        let text_color = theme::resolve(ThemeToken::BlockText, self.theme_mode);
        let label = match control.unit {
            Some(unit) => format!("{} {unit}", control.text),
            None => control.text.clone(),
        };

        ui.vertical(|ui| {
            ui.set_width(BLOCK_WIDTH);
            let button = egui::Button::new(egui::RichText::new(label).color(text_color))
                .fill(fill)
                .min_size(egui::vec2(BLOCK_WIDTH, 28.0));
            if ui.add(button).clicked() {
                if let Some(action) = control.click.clone() {
                    self.frame_action(widget, action);
                }
            }
            if let Some((up, down)) = &control.step {
                ui.horizontal(|ui| {
                    if ui.small_button("-").clicked() {
                        self.frame_action(widget, down.clone());
                    }
                    if ui.small_button("+").clicked() {
                        self.frame_action(widget, up.clone());
                    }
                });
            }
        });
    }

    fn chart(&mut self, ui: &mut egui::Ui) {
        let available = ui.available_rect_before_wrap();
        let (width, height) = (f64::from(available.width()), f64::from(available.height()));
        let chart = self.editor.chart();
        if chart.width() != width || chart.height() != height {
            self.editor.set_chart_size(width, height);
        }

        let response = ui.allocate_rect(available, egui::Sense::click());
        let painter = ui.painter_at(available);
        renderer::render_commands(
            &painter,
            &self.editor.render_chart(),
            available.min,
            self.theme_mode,
        );

        let chart = self.editor.chart();
        let frame_under = |pos: egui::Pos2| chart.frame_at(f64::from(pos.x - available.left()));
        let clicked = if response.clicked() {
            response.interact_pointer_pos().and_then(frame_under)
        } else {
            None
        };
        let hovered = response.hover_pos().and_then(frame_under);

        if let Some(frame) = hovered.and_then(|i| self.editor.profile().frame(i)) {
            response.on_hover_text_at_pointer(format!(
                "{}: {}s, {}°C",
                frame.name, frame.duration, frame.temp
            ));
        }
        if let Some(index) = clicked {
            self.editor.dispatch(EditorCommand::Select(Some(index)));
        }
    }

    fn json_window(&mut self, ctx: &egui::Context) {
        let json = match self.editor.to_json_pretty() {
            Ok(json) => json,
            Err(e) => format!("failed to serialize: {e}"),
        };
        let mut open = self.show_json;
        egui::Window::new("Profile JSON")
            .open(&mut open)
            .default_width(360.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.monospace(json);
                });
            });
        self.show_json = open;
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped: Option<Vec<u8>> = ctx.input(|i| {
            i.raw
                .dropped_files
                .first()
                .and_then(|f| f.bytes.as_ref())
                .map(|bytes| bytes.to_vec())
        });
        if let Some(data) = dropped {
            self.load_profile(&data);
        }
    }
}

impl eframe::App for CremaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.toolbar(ctx, ui));

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| match &self.status {
                Some(status) => {
                    ui.colored_label(ui.visuals().warn_fg_color, status);
                    if ui.small_button("x").clicked() {
                        self.status = None;
                    }
                }
                None => {
                    ui.label("Click the chart to select a frame, or drop a profile JSON file.");
                }
            });
        });

        egui::TopBottomPanel::bottom("frames")
            .exact_height(EDITOR_STRIP_HEIGHT)
            .show(ctx, |ui| self.frame_strip(ui));

        egui::SidePanel::right("metadata")
            .default_width(220.0)
            .show(ctx, |ui| self.metadata_panel(ui));

        egui::CentralPanel::default().show(ctx, |ui| self.chart(ui));

        if self.show_json {
            self.json_window(ctx);
        }

        self.flush();
    }
}

/// Label plus inline editor. Returns the committed text when it changed.
fn editable_row(ui: &mut egui::Ui, label: &str, text: &mut EditableText) -> Option<String> {
    let mut committed = None;
    ui.label(egui::RichText::new(label).small());
    ui.horizontal(|ui| {
        if text.is_editing() {
            if let Some(draft) = text.draft_mut() {
                ui.text_edit_singleline(draft);
            }
            let ok = ui.small_button("ok").clicked();
            let cancel = ui.small_button("cancel").clicked();
            if ok {
                committed = text.commit();
            } else if cancel {
                text.cancel();
            }
        } else {
            ui.label(text.text());
            if ui.small_button("edit").clicked() {
                text.begin_edit();
            }
        }
    });
    committed
}

fn log_info(message: &str) {
    tracing::info!("{message}");
    #[cfg(target_arch = "wasm32")]
    web_sys::console::log_1(&format!("crema: {message}").into());
}

fn log_warn(message: &str) {
    tracing::warn!("{message}");
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&format!("crema: {message}").into());
}
