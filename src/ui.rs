//! Layout and drawing: title menu, top-down pit view, sidebar, overlays, clear flash.

use crate::app::{MenuState, MenuTab, PitPreset, QuitOption};
use crate::game::{GameState, Phase};
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph};
use std::collections::HashMap;
use std::time::Instant;
use tachyonfx::{Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx};

/// Each pit cell renders as two terminal columns.
const CELL_WIDTH: u16 = 2;
const SIDEBAR_WIDTH: u16 = 26;

/// Duration of the plane-clear flash (TachyonFX fade over the board).
pub const CLEAR_FLASH_MS: u32 = 400;

/// Board rect (incl. border) for the current pit, centered with the sidebar.
fn board_outer_rect(area: Rect, state: &GameState) -> Rect {
    let bw = u16::from(state.pit.width) * CELL_WIDTH + 2;
    let bh = u16::from(state.pit.depth) + 2;
    let total_w = bw + SIDEBAR_WIDTH;
    Rect {
        x: area.x + area.width.saturating_sub(total_w) / 2,
        y: area.y + area.height.saturating_sub(bh) / 2,
        width: bw.min(area.width),
        height: bh.min(area.height),
    }
}

fn centered(area: Rect, w: u16, h: u16) -> Rect {
    Rect {
        x: area.x + area.width.saturating_sub(w) / 2,
        y: area.y + area.height.saturating_sub(h) / 2,
        width: w.min(area.width),
        height: h.min(area.height),
    }
}

/// Darken a cube colour by pit depth: level 0 is full strength, the floor is dimmest.
fn depth_shade(color: Color, level: u8, height: u8) -> Color {
    let t = f32::from(level) / f32::from(height.max(1));
    let factor = 1.0 - 0.65 * t;
    let (r, g, b) = match color {
        Color::Rgb(r, g, b) => (r, g, b),
        Color::Red => (255, 0, 0),
        Color::Green => (0, 255, 0),
        Color::Yellow => (255, 255, 0),
        Color::Blue => (0, 0, 255),
        Color::Magenta => (255, 0, 255),
        Color::Cyan => (0, 255, 255),
        Color::White => (255, 255, 255),
        _ => (128, 128, 128),
    };
    Color::Rgb(
        (f32::from(r) * factor) as u8,
        (f32::from(g) * factor) as u8,
        (f32::from(b) * factor) as u8,
    )
}

/// Draw the current phase: title menu, game (with overlays), or game over.
pub fn draw(
    frame: &mut Frame,
    state: &GameState,
    demo_active: bool,
    paused: bool,
    quit_selected: Option<QuitOption>,
    menu_state: &MenuState,
    game_start: Instant,
    now: Instant,
    no_animation: bool,
    clear_effect: &mut Option<Effect>,
    clear_effect_process_time: &mut Option<Instant>,
) {
    let area = frame.area();
    match state.phase {
        Phase::Title => draw_menu(frame, state, menu_state, area, now),
        Phase::Playing | Phase::Animating | Phase::FastDrop => {
            draw_game(frame, state, area, demo_active, game_start, now);
            if !no_animation {
                apply_clear_flash(frame, state, area, now, clear_effect, clear_effect_process_time);
            }
            if demo_active {
                draw_demo_banner(frame, state, area, game_start, now);
            }
            if paused {
                draw_center_popup(
                    frame,
                    state,
                    area,
                    vec![
                        Line::from(""),
                        Line::from(Span::styled(" PAUSED ", Style::default().fg(state.theme.title).bold())),
                        Line::from(""),
                        Line::from(" p resume   q quit "),
                        Line::from(""),
                    ],
                );
            }
            if let Some(opt) = quit_selected {
                draw_quit_menu(frame, state, area, opt);
            }
        }
        Phase::GameOver => {
            draw_game(frame, state, area, demo_active, game_start, now);
            draw_center_popup(
                frame,
                state,
                area,
                vec![
                    Line::from(""),
                    Line::from(Span::styled(
                        " PIT OVERFLOW ",
                        Style::default().fg(Color::Rgb(255, 80, 80)).bold(),
                    )),
                    Line::from(""),
                    Line::from(format!(" score {} ", state.score)),
                    Line::from(""),
                    Line::from(" r restart   q title "),
                    Line::from(""),
                ],
            );
        }
    }
}

fn draw_menu(frame: &mut Frame, state: &GameState, menu_state: &MenuState, area: Rect, now: Instant) {
    let popup = centered(area, 46, 18);

    let title = Line::from(vec![
        Span::styled(" Pitrix ", Style::default().fg(Color::Rgb(120, 180, 255)).bold()),
        Span::styled(" tui ", Style::default().fg(state.theme.main_fg).bold()),
    ]);

    let highlight_style = Style::default()
        .fg(Color::Black)
        .bg(state.theme.cube_color(1))
        .bold();
    let selected_style = Style::default().fg(state.theme.cube_color(1)).bold();
    let normal_style = Style::default().fg(state.theme.main_fg);

    let pit_tab = |preset: PitPreset| {
        let current = menu_state.current_tab == MenuTab::PitSize && menu_state.pit_preset == preset;
        let style = if current {
            highlight_style
        } else if menu_state.pit_preset == preset {
            selected_style
        } else {
            normal_style
        };
        let (w, d, h) = preset.dims();
        Span::styled(format!(" {}×{}×{} ", w, d, h), style)
    };

    let start_btn = if menu_state.current_tab == MenuTab::Start {
        Span::styled(" [ DESCEND ] ", highlight_style)
    } else {
        Span::styled(" [ DESCEND ] ", normal_style)
    };

    let lines = vec![
        Line::from(""),
        title,
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            " ─ PIT SIZE ─ ",
            Style::default().fg(state.theme.div_line),
        )),
        Line::from(vec![
            pit_tab(PitPreset::Compact),
            Span::from("  "),
            pit_tab(PitPreset::Classic),
            Span::from("  "),
            pit_tab(PitPreset::Grand),
        ]),
        Line::from(""),
        Line::from(""),
        Line::from(start_btn),
        Line::from(""),
        Line::from(""),
        Line::from(vec![
            Span::styled(" ↕ ", Style::default().fg(state.theme.cube_color(3))),
            Span::from("NAVIGATE   "),
            Span::styled(" ↔ ", Style::default().fg(state.theme.cube_color(3))),
            Span::from("CHANGE   "),
            Span::styled(" ENTER ", Style::default().fg(state.theme.cube_color(3))),
            Span::from("START"),
        ]),
        Line::from(Span::styled(
            " sit idle and the pit plays itself ",
            Style::default().fg(state.theme.inactive_fg).italic(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            " ⌁ [Q] LEAVE ",
            Style::default().fg(Color::Rgb(255, 80, 80)),
        )),
    ];

    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(state.theme.div_line).bg(state.theme.bg)),
    );

    // Startup animation: slide in from bottom, ease-out cubic.
    let elapsed = now.duration_since(menu_state.animation_start).as_millis() as u32;
    let t = (elapsed as f32 / 500.0).min(1.0);
    let offset_t = 1.0 - (1.0 - t).powi(3);
    let mut anim_popup = popup;
    anim_popup.y += ((1.0 - offset_t) * 10.0) as u16;

    frame.render_widget(p, anim_popup);
}

fn draw_game(
    frame: &mut Frame,
    state: &GameState,
    area: Rect,
    demo_active: bool,
    _game_start: Instant,
    _now: Instant,
) {
    let outer = board_outer_rect(area, state);

    // Topmost piece cell per column, drawn bright over the settled stack.
    let mut piece_tops: HashMap<(i8, i8), i8> = HashMap::new();
    let piece_color = state.piece.as_ref().map(|p| p.kind.color_index());
    if let Some(piece) = &state.piece {
        for (x, y, z) in piece.cells() {
            piece_tops
                .entry((x, y))
                .and_modify(|t| *t = (*t).min(z))
                .or_insert(z);
        }
    }

    let mut rows: Vec<Line> = Vec::with_capacity(state.pit.depth as usize);
    for y in 0..state.pit.depth {
        let mut spans: Vec<Span> = Vec::with_capacity(state.pit.width as usize);
        for x in 0..state.pit.width {
            let span = if let Some(&z) = piece_tops.get(&(x as i8, y as i8)) {
                let color = state.theme.cube_color(piece_color.unwrap_or(0));
                Span::styled("▓▓", Style::default().fg(depth_shade(color, z.max(0) as u8, state.pit.height)).bg(state.theme.bg))
            } else if let Some((level, c)) = state.top_view(y, x) {
                let color = depth_shade(state.theme.cube_color(c), level, state.pit.height);
                Span::styled("██", Style::default().fg(color).bg(state.theme.bg))
            } else {
                Span::styled("· ", Style::default().fg(state.theme.div_line).bg(state.theme.bg))
            };
            spans.push(span);
        }
        rows.push(Line::from(spans));
    }

    let board = Paragraph::new(rows).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(state.theme.div_line).bg(state.theme.bg)),
    );
    frame.render_widget(board, outer);

    // Sidebar: may run taller than a shallow board, clamped to the frame.
    let side_h = (area.y + area.height).saturating_sub(outer.y).min(14);
    let side = Rect {
        x: (outer.x + outer.width).min(area.x + area.width),
        y: outer.y,
        width: SIDEBAR_WIDTH.min(area.width.saturating_sub(outer.x + outer.width - area.x)),
        height: side_h,
    };
    if side.width < 10 || side.height == 0 {
        return;
    }

    let mode = if demo_active { "ATTRACT" } else { "MANUAL" };
    let mut lines = vec![
        Line::from(Span::styled(" PITRIX ", Style::default().fg(state.theme.title).bold())),
        Line::from(format!(" score  {}", state.score)),
        Line::from(format!(" level  {}", state.level())),
        Line::from(format!(" planes {}", state.lines_cleared)),
        Line::from(format!(" pieces {}", state.pieces_played)),
        Line::from(format!(
            " pit    {}×{}×{}",
            state.pit.width, state.pit.depth, state.pit.height
        )),
        Line::from(Span::styled(
            format!(" {mode} "),
            Style::default().fg(state.theme.inactive_fg),
        )),
    ];
    if !demo_active {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            " ←→↑↓ slide  zxc spin ",
            Style::default().fg(state.theme.inactive_fg),
        )));
        lines.push(Line::from(Span::styled(
            " space drop  p pause ",
            Style::default().fg(state.theme.inactive_fg),
        )));
    }
    let sidebar = Paragraph::new(lines);
    frame.render_widget(sidebar, side);

    // Fill gauge: how close the stack is to the safety threshold.
    if side.height >= 12 {
        let gauge_area = Rect {
            x: side.x + 1,
            y: side.y + 11,
            width: side.width.saturating_sub(3),
            height: 1,
        };
        let occupied = state.pit.occupied_levels();
        let ratio = f64::from(occupied) / f64::from(state.pit.height.max(1));
        let gauge = Gauge::default()
            .ratio(ratio.clamp(0.0, 1.0))
            .label(format!("{occupied}/{}", state.pit.height))
            .gauge_style(Style::default().fg(state.theme.cube_color(2)).bg(state.theme.bg));
        if gauge_area.width > 0 {
            frame.render_widget(gauge, gauge_area);
        }
    }
}

/// Blinking banner while the attract mode is driving.
fn draw_demo_banner(
    frame: &mut Frame,
    state: &GameState,
    area: Rect,
    game_start: Instant,
    now: Instant,
) {
    let blink_on = now.duration_since(game_start).as_millis() / 600 % 2 == 0;
    if !blink_on {
        return;
    }
    let outer = board_outer_rect(area, state);
    let banner = Rect {
        x: outer.x,
        y: outer.y.saturating_sub(1),
        width: outer.width,
        height: 1,
    };
    let line = Line::from(Span::styled(
        " DEMO — PRESS ANY KEY ",
        Style::default().fg(Color::Black).bg(state.theme.title).bold(),
    ));
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), banner);
}

/// Create/update the plane-clear flash (TachyonFX fade over the board) and process it.
fn apply_clear_flash(
    frame: &mut Frame,
    state: &GameState,
    area: Rect,
    now: Instant,
    clear_effect: &mut Option<Effect>,
    clear_effect_process_time: &mut Option<Instant>,
) {
    let Some((_levels, at)) = &state.last_clear else {
        return;
    };
    if at.elapsed().as_millis() as u32 > CLEAR_FLASH_MS {
        *clear_effect = None;
        *clear_effect_process_time = None;
        return;
    }
    let board = board_outer_rect(area, state);
    let delta = clear_effect_process_time
        .map(|t| now.saturating_duration_since(t))
        .unwrap_or(std::time::Duration::ZERO);
    let tfx_delta = TfxDuration::from_millis(delta.as_millis().min(u128::from(u32::MAX)) as u32);
    *clear_effect_process_time = Some(now);

    if clear_effect.is_none() {
        let bg = state.theme.bg;
        let effect = fx::fade_to(bg, bg, (CLEAR_FLASH_MS, Interpolation::Linear)).with_area(board);
        *clear_effect = Some(effect);
    }
    if let Some(effect) = clear_effect {
        frame.render_effect(effect, board, tfx_delta);
    }
}

fn draw_center_popup(frame: &mut Frame, state: &GameState, area: Rect, lines: Vec<Line>) {
    let h = lines.len() as u16 + 2;
    let w = lines
        .iter()
        .map(|l| l.width() as u16)
        .max()
        .unwrap_or(20)
        .max(24)
        + 4;
    let popup = centered(area, w, h);
    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(state.theme.div_line).bg(state.theme.bg)),
    );
    frame.render_widget(p, popup);
}

fn draw_quit_menu(frame: &mut Frame, state: &GameState, area: Rect, selected: QuitOption) {
    let entry = |label: &str, opt: QuitOption| {
        let style = if selected == opt {
            Style::default().fg(Color::Black).bg(state.theme.cube_color(1)).bold()
        } else {
            Style::default().fg(state.theme.main_fg)
        };
        Line::from(Span::styled(format!(" {label} "), style))
    };
    draw_center_popup(
        frame,
        state,
        area,
        vec![
            Line::from(""),
            Line::from(Span::styled(" LEAVE? ", Style::default().fg(state.theme.title).bold())),
            Line::from(""),
            entry("RESUME", QuitOption::Resume),
            entry("TITLE SCREEN", QuitOption::Title),
            entry("EXIT", QuitOption::Exit),
            Line::from(""),
        ],
    );
}
