use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::{
    io::stdout,
    time::{Duration, Instant},
};

use blockfall::{
    App, AppCommand, AppState, Cell, Command, Coord, GameSession, Phase, Piece, PieceKind,
    SessionOutcome, Tuning, HEIGHT, WIDTH,
};

// ============================================================================
// Visual Constants
// ============================================================================

const CELL_WIDTH: u16 = 2;
const BLOCK_CHAR: &str = "██";
const EMPTY_CHAR: &str = "  ";

/// One engine frame. Gravity counts these, so the fall tables are in units
/// of this duration.
const FRAME_MS: u64 = 16;

// ============================================================================
// Color Mapping
// ============================================================================

fn kind_color(kind: PieceKind) -> Color {
    match kind {
        PieceKind::I => Color::Cyan,
        PieceKind::O => Color::Yellow,
        PieceKind::T => Color::Magenta,
        PieceKind::S => Color::Green,
        PieceKind::Z => Color::Red,
        PieceKind::J => Color::Blue,
        PieceKind::L => Color::Rgb(255, 165, 0),
    }
}

// ============================================================================
// Rendering
// ============================================================================

fn render(frame: &mut Frame, app: &App) {
    let area = frame.size();
    match (app.state(), app.session()) {
        (AppState::Menu, _) => render_menu(frame, area),
        (AppState::Playing, Some(session)) => render_session(frame, session, area),
        (AppState::SessionEnded(outcome), Some(session)) => {
            render_session(frame, session, area);
            render_ended(frame, session, outcome, area);
        }
        // A session is always present outside the menu; render nothing
        // rather than panic if that ever breaks.
        _ => {}
    }
}

fn render_menu(frame: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "B L O C K F A L L",
            Style::default().fg(Color::Cyan),
        )),
        Line::from(""),
        Line::from("Stack the falling pieces,"),
        Line::from("clear rows, reach level 10."),
        Line::from(""),
        Line::from(Span::styled(
            "Enter: play   Q/ESC: quit",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Blockfall ")
            .title_alignment(Alignment::Center),
    );
    frame.render_widget(paragraph, centered_rect(34, 11, area));
}

fn render_session(frame: &mut Frame, session: &GameSession, area: Rect) {
    let grid_display_width = (WIDTH as u16 * CELL_WIDTH) + 2;
    let grid_display_height = HEIGHT as u16 + 2;
    let side_width = 14;
    let total_width = grid_display_width + side_width + 2;
    let total_height = grid_display_height + 3;

    let main_area = centered_rect(total_width, total_height, area);

    let vertical = Layout::vertical([
        Constraint::Length(grid_display_height),
        Constraint::Fill(1),
    ])
    .split(main_area);
    let game_row = vertical[0];

    let horizontal = Layout::horizontal([
        Constraint::Length(grid_display_width),
        Constraint::Length(side_width),
    ])
    .split(game_row);

    render_grid(frame, session, horizontal[0]);
    render_side_panel(frame, session, horizontal[1]);

    let controls_area = Rect {
        x: area.x,
        y: game_row.y + game_row.height,
        width: area.width,
        height: 2,
    };
    if controls_area.y + 1 < area.height {
        let controls = Paragraph::new(vec![Line::from(
            "A/D or Left/Right: Move | W: Rotate | S: Drop | Q/ESC: Quit",
        )])
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(controls, controls_area);
    }
}

/// Board cells with the falling piece painted on top. The engine keeps the
/// two apart; the overlay happens only here, at the edge.
fn visual_grid(session: &GameSession) -> [[Cell; WIDTH]; HEIGHT] {
    let mut grid = [[None; WIDTH]; HEIGHT];
    for (y, row) in grid.iter_mut().enumerate() {
        for (x, cell) in row.iter_mut().enumerate() {
            *cell = session.board().cell(x, y);
        }
    }
    let active = session.active();
    for c in active.cells() {
        if c.x >= 0 && c.x < WIDTH as i16 && c.y >= 0 && c.y < HEIGHT as i16 {
            grid[c.y as usize][c.x as usize] = Some(active.kind);
        }
    }
    grid
}

fn render_grid(frame: &mut Frame, session: &GameSession, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Blockfall ")
        .title_alignment(Alignment::Center);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let grid = visual_grid(session);
    let mut lines: Vec<Line> = Vec::new();
    for row in &grid {
        let spans: Vec<Span> = row
            .iter()
            .map(|cell| match cell {
                None => Span::raw(EMPTY_CHAR),
                Some(kind) => Span::styled(BLOCK_CHAR, Style::default().fg(kind_color(*kind))),
            })
            .collect();
        lines.push(Line::from(spans));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_side_panel(frame: &mut Frame, session: &GameSession, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Next ")
        .title_alignment(Alignment::Center);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = preview_lines(session.next_piece());
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Score",
        Style::default().fg(Color::Yellow),
    )));
    lines.push(Line::from(format!("{}", session.score())));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Level",
        Style::default().fg(Color::Green),
    )));
    lines.push(Line::from(format!("{}", session.level())));

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

/// Draw a piece on its own small canvas, shifted so every cell lands on it.
fn preview_lines(piece: &Piece) -> Vec<Line<'static>> {
    let color = kind_color(piece.kind);
    let cells = piece.cells();
    let min_x = cells.iter().map(|c| c.x).min().unwrap_or(0);
    let min_y = cells.iter().map(|c| c.y).min().unwrap_or(0);
    let max_y = cells.iter().map(|c| c.y).max().unwrap_or(0);

    let mut lines = vec![Line::from("")];
    for y in min_y..=max_y {
        let mut spans: Vec<Span> = Vec::new();
        for x in min_x..min_x + 4 {
            if cells.contains(&Coord::new(x, y)) {
                spans.push(Span::styled(BLOCK_CHAR, Style::default().fg(color)));
            } else {
                spans.push(Span::raw(EMPTY_CHAR));
            }
        }
        lines.push(Line::from(spans));
    }
    lines
}

fn render_ended(frame: &mut Frame, session: &GameSession, outcome: SessionOutcome, area: Rect) {
    let (title, headline, color) = match outcome {
        SessionOutcome::Won => (" You Win ", "LEVEL 10 REACHED", Color::Green),
        SessionOutcome::Lost => (" Game Over ", "GAME OVER", Color::Red),
        SessionOutcome::Aborted => (" Quit ", "SESSION ENDED", Color::Yellow),
    };

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(headline, Style::default().fg(color))),
        Line::from(""),
        Line::from(format!("Score: {}", session.score())),
        Line::from(format!("Level: {}", session.level())),
        Line::from(""),
        Line::from(Span::styled(
            "Enter: again  M: menu  Q: quit",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .title_alignment(Alignment::Center)
            .style(Style::default().bg(Color::Black)),
    );
    frame.render_widget(paragraph, centered_rect(32, 11, area));
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let horizontal = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width.min(area.width)),
        Constraint::Fill(1),
    ])
    .split(area);

    let vertical = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height.min(area.height)),
        Constraint::Fill(1),
    ])
    .split(horizontal[1]);

    vertical[1]
}

// ============================================================================
// Input Mapping
// ============================================================================

/// Translate a keypress into a shell command for the current screen.
/// `None` means the key has no binding here; quitting the whole program
/// from a non-game screen is handled in the main loop.
fn map_key(state: AppState, code: KeyCode) -> Option<AppCommand> {
    match state {
        AppState::Menu => match code {
            KeyCode::Enter => Some(AppCommand::Start),
            _ => None,
        },
        AppState::Playing => {
            let cmd = match code {
                KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Command::Left,
                KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Command::Right,
                KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Command::SoftDrop,
                KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Command::RotateCw,
                KeyCode::Char('z') | KeyCode::Char('Z') => Command::RotateCcw,
                KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Command::Quit,
                _ => return None,
            };
            Some(AppCommand::Game(cmd))
        }
        AppState::SessionEnded(_) => match code {
            KeyCode::Enter => Some(AppCommand::Start),
            KeyCode::Char('m') | KeyCode::Char('M') => Some(AppCommand::Back),
            _ => None,
        },
    }
}

// ============================================================================
// Main Loop
// ============================================================================

fn main() -> anyhow::Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal);

    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    result
}

fn run(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> anyhow::Result<()> {
    let mut app = App::new(Tuning::default());
    let frame_duration = Duration::from_millis(FRAME_MS);
    let mut last_frame = Instant::now();
    let mut dirty = true;

    loop {
        if dirty {
            terminal.draw(|frame| render(frame, &app))?;
            dirty = false;
        }

        let timeout = frame_duration.saturating_sub(last_frame.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    let on_game_screen = app.state() == AppState::Playing;
                    if !on_game_screen
                        && matches!(
                            key.code,
                            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q')
                        )
                    {
                        break;
                    }
                    if let Some(command) = map_key(app.state(), key.code) {
                        app.handle(command)?;
                        dirty = true;
                    }
                }
            }
        }

        // Idle ticks drive gravity; the engine decides when the piece
        // actually falls.
        if last_frame.elapsed() >= frame_duration {
            if app.state() == AppState::Playing {
                if let Some(summary) = app.handle(AppCommand::Game(Command::None))? {
                    if summary.redraw_needed() || summary.phase != Phase::Running {
                        dirty = true;
                    }
                }
            }
            last_frame = Instant::now();
        }
    }

    Ok(())
}
