// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Blockroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Blockroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI.
//!
//! Interactive scene editor (ratatui + crossterm): drag obstacles and place the endpoints with the
//! mouse, and watch the route update after every change.

use std::{
    error::Error,
    io,
    time::{Duration, Instant},
};

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::model::fixtures::{demo_scene, random_scene, DEFAULT_RANDOM_OBSTACLES};
use crate::model::{ObstacleId, Point, Scene};
use crate::render::{
    canvas_lines, render_scene_canvas, Viewport, DEFAULT_CELL_HEIGHT, DEFAULT_CELL_WIDTH,
};
use crate::routing::{plan_route, RouteConfig, RoutePlan};
use crate::store::SceneFile;
use crate::ui::{SharedScene, SharedSceneHandle};

const OBSTACLE_COLOR: Color = Color::Gray;
const SELECTED_COLOR: Color = Color::LightGreen;
const ROUTE_COLOR: Color = Color::Cyan;
const GRAPH_COLOR: Color = Color::DarkGray;
const ENDPOINT_COLOR: Color = Color::Yellow;
const FOOTER_LABEL_COLOR: Color = Color::Gray;
const FOOTER_KEY_COLOR: Color = Color::Cyan;
const TICK: Duration = Duration::from_millis(250);
const TOAST_TTL: Duration = Duration::from_secs(2);

/// Runs the TUI on the built-in demo scene.
pub fn run() -> Result<(), Box<dyn Error>> {
    run_with_shared_scene(SharedScene::new(demo_scene()).into_handle(), None)
}

/// Runs the TUI against a scene shared with other components (the MCP server).
///
/// Must be called from a blocking context: the shared state is locked with `blocking_lock`.
pub fn run_with_shared_scene(
    shared: SharedSceneHandle,
    scene_file: Option<SceneFile>,
) -> Result<(), Box<dyn Error>> {
    let mut app = App::with_shared(shared);
    app.scene_file = scene_file;

    let mut terminal = TerminalSession::new()?;
    while !app.should_quit {
        app.sync_from_shared();
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(TICK)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }
    }

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Drag {
    id: ObstacleId,
    /// Cursor position relative to the obstacle's top-left corner when the drag started.
    grab_dx: i32,
    grab_dy: i32,
}

struct Toast {
    message: String,
    expires_at: Instant,
}

struct App {
    scene: Scene,
    route_config: RouteConfig,
    plan: RoutePlan,
    show_graph: bool,
    selected: Option<ObstacleId>,
    drag: Option<Drag>,
    cell_width: i32,
    cell_height: i32,
    /// Screen rect and viewport of the scene pane from the last draw; mouse input maps through it.
    scene_area: Rect,
    viewport: Option<Viewport>,
    shared: Option<SharedSceneHandle>,
    shared_rev: u64,
    scene_file: Option<SceneFile>,
    toast: Option<Toast>,
    should_quit: bool,
}

impl App {
    fn new(scene: Scene) -> Self {
        let route_config = RouteConfig::default();
        let plan = plan_route(&scene, &route_config);
        Self {
            scene,
            route_config,
            plan,
            show_graph: false,
            selected: None,
            drag: None,
            cell_width: DEFAULT_CELL_WIDTH,
            cell_height: DEFAULT_CELL_HEIGHT,
            scene_area: Rect::default(),
            viewport: None,
            shared: None,
            shared_rev: 0,
            scene_file: None,
            toast: None,
            should_quit: false,
        }
    }

    fn with_shared(shared: SharedSceneHandle) -> Self {
        let snapshot = shared.blocking_lock().clone();
        let mut app = Self::new(snapshot.scene().clone());
        app.route_config = snapshot.route_config();
        app.selected = snapshot.selected();
        app.shared_rev = snapshot.rev();
        app.shared = Some(shared);
        app.replan();
        app
    }

    fn replan(&mut self) {
        self.plan = plan_route(&self.scene, &self.route_config);
        tracing::debug!(
            nodes = self.plan.graph.node_count(),
            edges = self.plan.graph.edge_count(),
            route_len = self.plan.route.len(),
            "replanned"
        );
    }

    /// Applies a local scene edit, replans and publishes the new scene.
    fn mutate<R>(&mut self, edit: impl FnOnce(&mut Scene) -> R) -> R {
        let out = edit(&mut self.scene);
        if self
            .selected
            .is_some_and(|id| self.scene.obstacle(id).is_none())
        {
            self.selected = None;
        }
        self.replan();
        self.publish();
        out
    }

    fn publish(&mut self) {
        let Some(shared) = self.shared.as_ref() else {
            return;
        };
        let mut shared = shared.blocking_lock();
        if shared.rev() != self.shared_rev {
            // Someone else changed the scene since our last sync; the local edit wins.
            tracing::debug!(local = self.shared_rev, shared = shared.rev(), "overwriting shared scene");
        }
        if shared.scene() != &self.scene {
            shared.replace_scene(self.scene.clone());
        }
        shared.set_route_config(self.route_config);
        shared.set_selected(self.selected);
        self.shared_rev = shared.rev();
    }

    fn sync_from_shared(&mut self) {
        let Some(shared) = self.shared.as_ref() else {
            return;
        };
        let snapshot = {
            let shared = shared.blocking_lock();
            if shared.rev() == self.shared_rev {
                return;
            }
            shared.clone()
        };

        self.shared_rev = snapshot.rev();
        let scene_changed = snapshot.scene() != &self.scene;
        let config_changed = snapshot.route_config() != self.route_config;
        self.selected = snapshot.selected();
        if scene_changed || config_changed {
            self.scene = snapshot.scene().clone();
            self.route_config = snapshot.route_config();
            // An external edit may have removed the obstacle being dragged.
            self.drag = self
                .drag
                .filter(|drag| self.scene.obstacle(drag.id).is_some());
            self.replan();
        }
    }

    fn set_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            expires_at: Instant::now() + TOAST_TTL,
        });
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.handle_key_code(key.code) {
            self.should_quit = true;
        }
    }

    /// Returns `true` when the key asks to quit.
    fn handle_key_code(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('d') => {
                self.show_graph = !self.show_graph;
            }
            KeyCode::Char('b') => self.toggle_bend_penalty(),
            KeyCode::Char('r') => self.randomize(rand::random()),
            KeyCode::Char('s') => self.save(),
            KeyCode::Tab => self.select_next(),
            KeyCode::Left => self.nudge_selected(-self.cell_width, 0),
            KeyCode::Right => self.nudge_selected(self.cell_width, 0),
            KeyCode::Up => self.nudge_selected(0, -self.cell_height),
            KeyCode::Down => self.nudge_selected(0, self.cell_height),
            _ => {}
        }
        false
    }

    fn toggle_bend_penalty(&mut self) {
        self.route_config = if self.route_config.bend_penalty > 0 {
            RouteConfig::without_bend_penalty()
        } else {
            RouteConfig::default()
        };
        self.replan();
        self.publish();
        self.set_toast(if self.route_config.bend_penalty > 0 {
            "Bend penalty on"
        } else {
            "Bend penalty off"
        });
    }

    fn randomize(&mut self, seed: u64) {
        let (start, end) = (self.scene.start(), self.scene.end());
        let scene = random_scene(
            self.scene.width(),
            self.scene.height(),
            DEFAULT_RANDOM_OBSTACLES,
            seed,
        )
        .with_endpoints(start, end);
        self.drag = None;
        self.selected = None;
        self.mutate(|current| *current = scene);
        self.set_toast(format!("Random scene (seed {seed})"));
    }

    fn save(&mut self) {
        let Some(scene_file) = self.scene_file.as_ref() else {
            self.set_toast("No scene file configured");
            return;
        };
        match scene_file.save(&self.scene) {
            Ok(()) => {
                let message = format!("Saved {}", scene_file.path().display());
                self.set_toast(message);
            }
            Err(err) => {
                tracing::warn!(error = %err, "saving scene failed");
                self.set_toast(format!("Save failed: {err}"));
            }
        }
    }

    fn select_next(&mut self) {
        let len = self.scene.obstacles().len();
        self.selected = match (self.selected, len) {
            (_, 0) => None,
            (None, _) => Some(ObstacleId::new(0)),
            (Some(id), len) => Some(ObstacleId::new((id.index() + 1) % len)),
        };
        self.publish();
    }

    fn nudge_selected(&mut self, dx: i32, dy: i32) {
        let Some(id) = self.selected else {
            return;
        };
        if let Err(err) = self.mutate(|scene| scene.translate_obstacle(id, dx, dy)) {
            tracing::warn!(error = %err, "nudge failed");
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        self.handle_mouse_at(mouse.kind, mouse.column, mouse.row);
    }

    fn handle_mouse_at(&mut self, kind: MouseEventKind, column: u16, row: u16) {
        let point = self.scene_point_at(column, row);

        match kind {
            // Either button grabs an obstacle; on empty space left places the start, right the end.
            MouseEventKind::Down(button @ (MouseButton::Left | MouseButton::Right)) => {
                let Some(point) = point else {
                    return;
                };
                match self.scene.obstacle_at(point) {
                    Some(id) => {
                        let top_left = self
                            .scene
                            .obstacle(id)
                            .map(|obstacle| obstacle.top_left())
                            .unwrap_or(point);
                        self.drag = Some(Drag {
                            id,
                            grab_dx: point.x().saturating_sub(top_left.x()),
                            grab_dy: point.y().saturating_sub(top_left.y()),
                        });
                        self.selected = Some(id);
                        self.publish();
                    }
                    None if button == MouseButton::Left => {
                        self.mutate(|scene| scene.set_start(point));
                    }
                    None => {
                        self.mutate(|scene| scene.set_end(point));
                    }
                }
            }
            MouseEventKind::Drag(MouseButton::Left | MouseButton::Right) => {
                let (Some(drag), Some(point)) = (self.drag, point) else {
                    return;
                };
                let top_left = point.offset(-drag.grab_dx, -drag.grab_dy);
                if let Err(err) = self.mutate(|scene| scene.move_obstacle(drag.id, top_left)) {
                    tracing::warn!(error = %err, "drag target vanished");
                    self.drag = None;
                }
            }
            MouseEventKind::Up(_) => {
                self.drag = None;
            }
            _ => {}
        }
    }

    /// Maps a terminal cell to scene coordinates through the last drawn viewport.
    fn scene_point_at(&self, column: u16, row: u16) -> Option<Point> {
        let viewport = self.viewport?;
        let area = self.scene_area;
        if column < area.x
            || row < area.y
            || column >= area.x.saturating_add(area.width)
            || row >= area.y.saturating_add(area.height)
        {
            return None;
        }
        Some(viewport.scene_point(
            usize::from(column - area.x),
            usize::from(row - area.y),
        ))
    }

    fn layout_scene_area(&mut self, area: Rect) {
        self.scene_area = area;
        self.viewport = Viewport::new(
            Point::default(),
            self.cell_width,
            self.cell_height,
            usize::from(area.width),
            usize::from(area.height),
        )
        .ok();
    }

    fn status_line(&self) -> String {
        let route = &self.plan.route;
        let route_part = if route.is_empty() {
            "no route".to_owned()
        } else {
            format!("length {} · bends {}", route.length(), route.bends())
        };
        let penalty = if self.route_config.bend_penalty > 0 { "on" } else { "off" };
        let selected = self
            .selected
            .map_or_else(|| "-".to_owned(), |id| id.to_string());
        format!(
            "{route_part} · nodes {} · edges {} · penalty {penalty} · selected {selected}",
            self.plan.graph.node_count(),
            self.plan.graph.edge_count(),
        )
    }
}

fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" blockroute ");
    let inner = block.inner(layout[0]);
    app.layout_scene_area(inner);

    let lines = match app.viewport.as_ref() {
        Some(viewport) => {
            match render_scene_canvas(&app.scene, &app.plan, viewport, app.show_graph) {
                Ok(canvas) => styled_scene_lines(&canvas_lines(&canvas), viewport, app),
                Err(err) => vec![Line::from(format!("render failed: {err}"))],
            }
        }
        None => Vec::new(),
    };
    frame.render_widget(Paragraph::new(lines).block(block), layout[0]);

    if app
        .toast
        .as_ref()
        .is_some_and(|toast| Instant::now() >= toast.expires_at)
    {
        app.toast = None;
    }
    let status = match app.toast.as_ref() {
        Some(toast) => Line::from(Span::styled(
            toast.message.clone(),
            Style::default().fg(SELECTED_COLOR),
        )),
        None => Line::from(app.status_line()),
    };
    frame.render_widget(Paragraph::new(status), layout[1]);
    frame.render_widget(Paragraph::new(footer_help_line()), layout[2]);
}

fn style_for_cell(ch: char, in_selected: bool) -> Style {
    match ch {
        '█' if in_selected => Style::default().fg(SELECTED_COLOR),
        '█' => Style::default().fg(OBSTACLE_COLOR),
        '·' => Style::default().fg(GRAPH_COLOR),
        'S' | 'E' => Style::default()
            .fg(ENDPOINT_COLOR)
            .add_modifier(Modifier::BOLD),
        ' ' => Style::default(),
        _ => Style::default().fg(ROUTE_COLOR),
    }
}

/// Splits rendered rows into spans of equally styled cells.
fn styled_scene_lines(rows: &[String], viewport: &Viewport, app: &App) -> Vec<Line<'static>> {
    let selected = app.selected.and_then(|id| app.scene.obstacle(id)).copied();

    rows.iter()
        .enumerate()
        .map(|(y, row)| {
            let mut spans = Vec::<Span<'static>>::new();
            let mut run = String::new();
            let mut run_style = Style::default();
            for (x, ch) in row.chars().enumerate() {
                let in_selected = selected
                    .is_some_and(|obstacle| obstacle.contains(viewport.scene_point(x, y)));
                let style = style_for_cell(ch, in_selected);
                if style != run_style && !run.is_empty() {
                    spans.push(Span::styled(std::mem::take(&mut run), run_style));
                }
                run_style = style;
                run.push(ch);
            }
            if !run.is_empty() {
                spans.push(Span::styled(run, run_style));
            }
            Line::from(spans)
        })
        .collect()
}

fn footer_help_line() -> Line<'static> {
    let keys = [
        ("LMB", "start/drag"),
        ("RMB", "end/drag"),
        ("Tab", "select"),
        ("←↑→↓", "move"),
        ("d", "graph"),
        ("b", "bends"),
        ("r", "random"),
        ("s", "save"),
        ("q", "quit"),
    ];
    let mut spans = Vec::<Span<'static>>::new();
    for (idx, (key, label)) in keys.into_iter().enumerate() {
        if idx > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(key, Style::default().fg(FOOTER_KEY_COLOR)));
        spans.push(Span::styled(
            format!(" {label}"),
            Style::default().fg(FOOTER_LABEL_COLOR),
        ));
    }
    Line::from(spans)
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, DisableMouseCapture, LeaveAlternateScreen);
}
