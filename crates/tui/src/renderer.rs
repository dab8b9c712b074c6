use std::io::stdout;

use anyhow::Result;
use crema_protocol::{RenderCommand, ThemeToken};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line as TextLine, Span},
    widgets::{
        Block, Borders, List, ListItem, ListState, Paragraph,
        canvas::{Canvas, Context, Line, Rectangle},
    },
};

use crate::app::App;

/// Cubic segments are drawn as this many straight pieces.
const CURVE_STEPS: usize = 12;

fn theme_to_color(token: ThemeToken) -> Color {
    match token {
        ThemeToken::Background => Color::Black,
        ThemeToken::GridLine => Color::Rgb(60, 60, 60),
        ThemeToken::AxisLabel => Color::Gray,
        ThemeToken::HighlightFill => Color::Rgb(70, 70, 110),
        ThemeToken::FlowTrace => Color::Rgb(90, 160, 250),
        ThemeToken::PressureTrace => Color::Rgb(120, 200, 120),
        ThemeToken::TemperatureTrace => Color::Rgb(230, 90, 80),
        ThemeToken::TempBlock => Color::Red,
        ThemeToken::DurationBlock => Color::Yellow,
        ThemeToken::FlowBlock => Color::Blue,
        ThemeToken::PressureBlock => Color::Green,
        ThemeToken::TriggerBlock => Color::Magenta,
        ThemeToken::TriggerNoneBlock => Color::DarkGray,
        ThemeToken::TextPrimary => Color::White,
        ThemeToken::TextMuted => Color::DarkGray,
        ThemeToken::BlockText => Color::Black,
    }
}

pub fn run(app: &mut App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    while !app.should_quit() {
        terminal.draw(|frame| draw(frame, app))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }
    }
    Ok(())
}

fn draw(frame: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(10),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let profile = app.editor().profile();
    let header = Paragraph::new(format!(
        " crema | {} | {} frames, {}s | a add  r rename  R rename profile  w save  q quit ",
        profile.name,
        profile.frames.len(),
        profile.total_duration()
    ))
    .style(Style::default().fg(Color::White).bg(Color::DarkGray));
    frame.render_widget(header, rows[0]);

    draw_chart(frame, rows[1], app);

    let editor_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(24), Constraint::Min(10)])
        .split(rows[2]);
    draw_frame_list(frame, editor_row[0], app);
    draw_controls(frame, editor_row[1], app);
    draw_status(frame, rows[3], app);
}

fn draw_chart(frame: &mut Frame, area: Rect, app: &App) {
    let chart = app.editor().chart();
    let (width, height) = (chart.width(), chart.height());
    let commands = app.editor().render_chart();

    let canvas = Canvas::default()
        .block(Block::default().borders(Borders::ALL).title(" profile "))
        .marker(Marker::Braille)
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .paint(move |ctx| paint_commands(ctx, &commands, height));
    frame.render_widget(canvas, area);
}

/// Chart coordinates grow downwards; the canvas grows upwards.
fn paint_commands(ctx: &mut Context<'_>, commands: &[RenderCommand], height: f64) {
    let flip = |y: f64| height - y;
    for cmd in commands {
        match cmd {
            RenderCommand::DrawRect { rect, color, .. } => {
                if *color == ThemeToken::Background {
                    continue;
                }
                ctx.draw(&Rectangle {
                    x: rect.x,
                    y: flip(rect.bottom()),
                    width: rect.w,
                    height: rect.h,
                    color: theme_to_color(*color),
                });
            }
            RenderCommand::DrawPath { path, color, .. } => {
                let color = theme_to_color(*color);
                for polyline in path.flatten(CURVE_STEPS) {
                    for pair in polyline.windows(2) {
                        ctx.draw(&Line::new(
                            pair[0].x,
                            flip(pair[0].y),
                            pair[1].x,
                            flip(pair[1].y),
                            color,
                        ));
                    }
                }
            }
            RenderCommand::DrawText {
                position,
                text,
                color,
                ..
            } => {
                ctx.print(
                    position.x,
                    flip(position.y),
                    Span::styled(text.clone(), Style::default().fg(theme_to_color(*color))),
                );
            }
            RenderCommand::BeginGroup { .. } => {}
            RenderCommand::EndGroup => ctx.layer(),
        }
    }
}

fn draw_frame_list(frame: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = app
        .editor()
        .profile()
        .frames
        .iter()
        .enumerate()
        .map(|(i, f)| ListItem::new(format!("{i}: {}", f.name)))
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" frames "))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = ListState::default().with_selected(Some(app.selected()));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_controls(frame: &mut Frame, area: Rect, app: &App) {
    let controls = app.controls();
    if controls.is_empty() {
        return;
    }
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(controls.iter().map(|_| Constraint::Fill(1)))
        .split(area);

    for (i, (control, cell)) in controls.iter().zip(cells.iter()).enumerate() {
        let mut text = control.text.clone();
        if let Some(unit) = control.unit {
            text = format!("{text} {unit}");
        }
        let mut style = Style::default()
            .fg(theme_to_color(ThemeToken::BlockText))
            .bg(theme_to_color(control.color));
        if i == app.control() {
            style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
        }
        let hint = match (&control.step, &control.click) {
            (Some(_), _) => "+/-",
            (None, Some(_)) => "enter",
            (None, None) => "",
        };
        let paragraph = Paragraph::new(vec![TextLine::from(text), TextLine::from(hint)])
            .block(Block::default().borders(Borders::ALL))
            .style(style);
        frame.render_widget(paragraph, *cell);
    }
}

fn draw_status(frame: &mut Frame, area: Rect, app: &App) {
    let line = match app.rename() {
        Some((_, text)) => format!(" rename: {}_  (enter to save, esc to cancel)", text.draft().unwrap_or_default()),
        None => format!(" {}", app.status().unwrap_or("ready")),
    };
    frame.render_widget(
        Paragraph::new(line).style(Style::default().fg(Color::Gray)),
        area,
    );
}
