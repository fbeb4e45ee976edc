//! Layout and drawing: one or two boards, each with a sidebar, plus pause and game-over overlays.

use crate::app::Screen;
use crate::game::{Session, SessionState};
use crate::playfield::CellKind;
use crate::theme::Theme;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

/// Each grid cell is two terminal columns wide so cells look square.
const CELL_WIDTH: u16 = 2;
const SIDEBAR_WIDTH: u16 = 22;
/// Gap between the two players' panels in versus.
const PANEL_GAP: u16 = 4;

const ORDINARY_GLYPH: &str = "██";
const SEED_GLYPH: &str = "▓▓";
const EMPTY_GLYPH: &str = " ·";

/// One player's view: name, keys hint and their session.
pub struct PlayerView<'a> {
    pub name: &'a str,
    pub keys: &'a str,
    pub session: &'a Session,
}

/// Board size in terminal cells including the border.
fn board_size(session: &Session) -> (u16, u16) {
    let pf = session.playfield();
    let side = |n: usize, scale: u16| {
        u16::try_from(n)
            .unwrap_or(u16::MAX)
            .saturating_mul(scale)
            .saturating_add(2)
    };
    (side(pf.width, CELL_WIDTH), side(pf.height, 1))
}

/// Draw the current screen. `banner` is the game-over headline when `screen` is `GameOver`.
pub fn draw(frame: &mut Frame, screen: Screen, players: &[PlayerView<'_>], theme: &Theme, banner: Option<&str>) {
    let area = frame.area();
    draw_game(frame, players, theme, area);
    match screen {
        Screen::Playing => {}
        Screen::Paused => draw_pause_overlay(frame, theme, area),
        Screen::GameOver => draw_game_over(frame, players, theme, area, banner.unwrap_or("Game Over")),
    }
}

/// Center every player's panel (board + sidebar) side by side.
fn draw_game(frame: &mut Frame, players: &[PlayerView<'_>], theme: &Theme, area: Rect) {
    let Some(first) = players.first() else {
        return;
    };
    let (bw, bh) = board_size(first.session);
    let panel_w = bw.saturating_add(SIDEBAR_WIDTH);
    let count = players.len() as u16;
    let total_w = panel_w
        .saturating_mul(count)
        .saturating_add(PANEL_GAP * count.saturating_sub(1));

    let horiz = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(total_w),
            Constraint::Fill(1),
        ])
        .split(area);
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Fill(1), Constraint::Length(bh), Constraint::Fill(1)])
        .split(horiz[1]);
    let active = vert[1];

    let mut constraints = Vec::with_capacity(players.len() * 2);
    for i in 0..players.len() {
        if i > 0 {
            constraints.push(Constraint::Length(PANEL_GAP));
        }
        constraints.push(Constraint::Length(panel_w));
    }
    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(active);

    for (player, panel) in players.iter().zip(panels.iter().step_by(2)) {
        let inner = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(bw), Constraint::Length(SIDEBAR_WIDTH)])
            .split(*panel);
        draw_board(frame, player, theme, inner[0]);
        draw_sidebar(frame, player, theme, inner[1]);
    }
}

fn draw_board(frame: &mut Frame, player: &PlayerView<'_>, theme: &Theme, area: Rect) {
    let session = player.session;
    let pf = session.playfield();
    let border = if session.is_terminal() {
        theme.inactive_fg
    } else {
        theme.div_line
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border).bg(theme.bg))
        .style(Style::default().bg(theme.bg))
        .title(Span::styled(format!(" {} ", player.name), Style::default().fg(theme.title)));
    let inner = block.inner(area);
    block.render(area, frame.buffer_mut());

    let pair_cells = session.pair().map(|p| *p.cells());
    let empty_style = Style::default().fg(theme.div_line).bg(theme.bg);

    let lines: Vec<Line> = (0..pf.height)
        .map(|y| {
            let spans: Vec<Span> = (0..pf.width)
                .map(|x| {
                    let falling = pair_cells.and_then(|cells| {
                        cells
                            .into_iter()
                            .find(|c| c.x == x as i32 && c.y == y as i32)
                    });
                    if let Some(c) = falling {
                        let style = Style::default().fg(theme.cell_color(c.color)).bg(theme.bg);
                        return Span::styled(ORDINARY_GLYPH, style);
                    }
                    match pf.get(x, y) {
                        Some(cell) => {
                            let style = Style::default().fg(theme.cell_color(cell.color)).bg(theme.bg);
                            match cell.kind {
                                CellKind::Ordinary => Span::styled(ORDINARY_GLYPH, style),
                                CellKind::Seed => {
                                    Span::styled(SEED_GLYPH, style.add_modifier(Modifier::BOLD))
                                }
                            }
                        }
                        None => Span::styled(EMPTY_GLYPH, empty_style),
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();
    Paragraph::new(lines).render(inner, frame.buffer_mut());

    if session.state() == SessionState::LevelCleared {
        let msg = format!(" Level {} clear! ", session.level());
        draw_centered_label(frame, theme, inner, &msg, Color::Black, theme.title);
    }
}

fn state_label(session: &Session) -> &'static str {
    match session.state() {
        SessionState::Active => "Playing",
        SessionState::LevelCleared => "Level clear",
        SessionState::ToppedOut => "Topped out",
        SessionState::GameComplete => "All clear!",
    }
}

fn draw_sidebar(frame: &mut Frame, player: &PlayerView<'_>, theme: &Theme, area: Rect) {
    let s = player.session;
    let fg = Style::default().fg(theme.main_fg);
    let label = Style::default().fg(theme.title);
    let row = |name: &str, value: String| {
        Line::from(vec![
            Span::styled(format!(" {name:<8}"), label),
            Span::styled(value, fg),
        ])
    };
    let mut lines = vec![
        Line::from(""),
        row("Score", s.score().to_string()),
        row("Level", format!("{} / {}", s.level(), s.max_level())),
        row("Seeds", s.remaining_seed_count().to_string()),
        row("State", state_label(s).to_string()),
        Line::from(""),
    ];
    let swatches: Vec<Span> = theme
        .cells
        .iter()
        .map(|&c| Span::styled(ORDINARY_GLYPH, Style::default().fg(c)))
        .collect();
    lines.push(Line::from([vec![Span::raw(" ")], swatches].concat()));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(format!(" {}", player.keys), fg)));
    lines.push(Line::from(Span::styled(" p pause  q quit", fg)));

    Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.div_line)),
        )
        .render(area, frame.buffer_mut());
}

fn draw_centered_label(frame: &mut Frame, theme: &Theme, area: Rect, text: &str, fg: Color, bg: Color) {
    let w = (text.chars().count() as u16).min(area.width);
    let rect = Rect {
        x: area.x + area.width.saturating_sub(w) / 2,
        y: area.y + area.height / 2,
        width: w,
        height: 1u16.min(area.height),
    };
    Paragraph::new(Line::from(Span::styled(text.to_string(), Style::default().fg(fg).bg(bg))))
        .style(Style::default().bg(theme.bg))
        .render(rect, frame.buffer_mut());
}

fn popup_rect(area: Rect, w: u16, h: u16) -> Rect {
    Rect {
        x: area.x + area.width.saturating_sub(w) / 2,
        y: area.y + area.height.saturating_sub(h) / 2,
        width: w.min(area.width),
        height: h.min(area.height),
    }
}

fn draw_pause_overlay(frame: &mut Frame, theme: &Theme, area: Rect) {
    let popup = popup_rect(area, 28, 5);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Paused ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(Span::styled(
            " P resume    Q quit ",
            Style::default().fg(theme.main_fg),
        )),
    ];
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.div_line).bg(theme.bg)),
        )
        .render(popup, frame.buffer_mut());
}

fn draw_game_over(frame: &mut Frame, players: &[PlayerView<'_>], theme: &Theme, area: Rect, banner: &str) {
    let popup = popup_rect(area, 44, 6 + players.len() as u16);
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!(" {banner} "),
            Style::default().fg(Color::White).bg(Color::Red),
        )),
        Line::from(""),
    ];
    for p in players {
        lines.push(Line::from(Span::styled(
            format!(" {}: {} pts, level {} ", p.name, p.session.score(), p.session.level()),
            Style::default().fg(theme.main_fg),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " R restart    Q quit ",
        Style::default().fg(theme.main_fg),
    )));
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
                .title(Span::styled(" capsuletui ", Style::default().fg(theme.title))),
        )
        .render(popup, frame.buffer_mut());
}
