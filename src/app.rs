//! App: terminal init, frame loop, key handling, attract-mode wiring.

use crate::demo::Demo;
use crate::game::{GameState, Phase, RotAxis};
use crate::input::{Action, key_to_action};
use crate::theme::Theme;
use crate::{Args, GameConfig};
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tachyonfx::Effect;

/// Target frame budget: one game/demo tick per ~16 ms (≈60 fps).
const FRAME_MS: u64 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuTab {
    PitSize,
    Start,
}

/// Pit dimension presets offered on the title menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PitPreset {
    Compact,
    Classic,
    Grand,
}

impl PitPreset {
    pub fn dims(self) -> (u8, u8, u8) {
        match self {
            Self::Compact => (3, 3, 10),
            Self::Classic => (5, 5, 12),
            Self::Grand => (7, 7, 15),
        }
    }

    fn next(self) -> Self {
        match self {
            Self::Compact => Self::Classic,
            Self::Classic => Self::Grand,
            Self::Grand => Self::Compact,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Compact => Self::Grand,
            Self::Classic => Self::Compact,
            Self::Grand => Self::Classic,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuitOption {
    Resume,
    Title,
    Exit,
}

#[derive(Debug, Clone)]
pub struct MenuState {
    pub current_tab: MenuTab,
    pub pit_preset: PitPreset,
    pub animation_start: Instant,
}

impl Default for MenuState {
    fn default() -> Self {
        Self {
            current_tab: MenuTab::PitSize,
            pit_preset: PitPreset::Classic,
            animation_start: Instant::now(),
        }
    }
}

pub struct App {
    config: GameConfig,
    state: GameState,
    demo: Demo,
    paused: bool,
    quit_menu: Option<QuitOption>,
    menu_state: MenuState,
    game_start: Instant,
    /// TachyonFX flash for plane clears (created when a clear lands).
    clear_effect: Option<Effect>,
    clear_effect_process_time: Option<Instant>,
}

impl App {
    pub fn new(args: &Args, config: GameConfig, theme: Theme) -> Result<Self> {
        let seed = config.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.subsec_nanos())
                .unwrap_or(0x1234_5678)
        });
        let state = GameState::new(theme, args.width, args.depth, args.height, seed);
        Ok(Self {
            config,
            state,
            demo: Demo::new(seed ^ 0xA511_E9B3),
            paused: false,
            quit_menu: None,
            menu_state: MenuState::default(),
            game_start: Instant::now(),
            clear_effect: None,
            clear_effect_process_time: None,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let mut terminal =
            ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;

        if self.config.no_menu {
            self.start_human_game();
        }

        let result = self.run_loop(&mut terminal);

        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result
    }

    fn start_human_game(&mut self) {
        self.state.apply_selected_pit_size();
        self.state.reset_game_state();
        self.state.spawn_new_piece();
        self.state.change_phase(Phase::Playing);
        self.paused = false;
        self.quit_menu = None;
        self.game_start = Instant::now();
    }

    fn back_to_title(&mut self) {
        self.state.change_phase(Phase::Title);
        self.state.request_full_redraw();
        self.paused = false;
        self.quit_menu = None;
        self.menu_state.animation_start = Instant::now();
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        loop {
            let frame_start = Instant::now();

            if self.state.full_redraw_pending {
                terminal.clear()?;
                self.state.full_redraw_pending = false;
            }
            self.state.refresh_static_view();

            let now = Instant::now();
            terminal.draw(|f| {
                crate::ui::draw(
                    f,
                    &self.state,
                    self.demo.is_active(),
                    self.paused,
                    self.quit_menu,
                    &self.menu_state,
                    self.game_start,
                    now,
                    self.config.no_animation,
                    &mut self.clear_effect,
                    &mut self.clear_effect_process_time,
                );
            })?;

            let mut input_seen = false;
            let timeout = Duration::from_millis(FRAME_MS).saturating_sub(frame_start.elapsed());
            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    if let Event::Key(key) = event::read()? {
                        if key.kind != KeyEventKind::Press {
                            continue;
                        }
                        input_seen = true;
                        if self.handle_key(key.code, key_to_action(key)) {
                            return Ok(());
                        }
                    }
                }
            }

            // Demo scheduling: one idle or play tick per frame.
            if self.demo.is_active() {
                self.demo.tick(&mut self.state);
            } else if !self.config.no_attract {
                let is_title = self.state.phase == Phase::Title;
                self.demo.idle_tick(&mut self.state, is_title, input_seen);
            }

            if !self.paused && self.quit_menu.is_none() {
                self.state.tick_frame();
            }
        }
    }

    /// Handle one key press. Returns true when the app should exit.
    fn handle_key(&mut self, code: KeyCode, action: Action) -> bool {
        // Any key while the demo is driving hands the game back, swallowed.
        if self.demo.is_active() {
            self.demo.stop(&mut self.state);
            self.back_to_title();
            return false;
        }

        match self.state.phase {
            Phase::Title => {
                self.demo.notify_input();
                return self.handle_menu_key(action);
            }
            Phase::GameOver => {
                if action == Action::Quit {
                    self.back_to_title();
                } else if code == KeyCode::Char('r') || code == KeyCode::Char('R') {
                    self.start_human_game();
                }
            }
            Phase::Playing | Phase::Animating | Phase::FastDrop => {
                if let Some(selected) = self.quit_menu {
                    return self.handle_quit_menu_key(action, selected);
                } else if self.paused {
                    match action {
                        Action::Pause => self.paused = false,
                        Action::Quit => self.quit_menu = Some(QuitOption::Resume),
                        _ => {}
                    }
                } else {
                    match action {
                        Action::MoveLeft => self.state.move_piece(-1, 0),
                        Action::MoveRight => self.state.move_piece(1, 0),
                        Action::MoveFront => self.state.move_piece(0, 1),
                        Action::MoveBack => self.state.move_piece(0, -1),
                        Action::RotateX => {
                            self.state.rotate_piece(RotAxis::X);
                        }
                        Action::RotateY => {
                            self.state.rotate_piece(RotAxis::Y);
                        }
                        Action::RotateZ => {
                            self.state.rotate_piece(RotAxis::Z);
                        }
                        Action::Drop => self.state.start_fast_drop(),
                        Action::Pause => self.paused = true,
                        Action::Quit => self.quit_menu = Some(QuitOption::Resume),
                        Action::None => {}
                    }
                }
            }
        }
        false
    }

    /// Title-menu navigation. Returns true when the app should exit.
    fn handle_menu_key(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => return true,
            Action::MoveLeft if self.menu_state.current_tab == MenuTab::PitSize => {
                self.menu_state.pit_preset = self.menu_state.pit_preset.prev();
                let (w, d, h) = self.menu_state.pit_preset.dims();
                self.state.select_dims(w, d, h);
            }
            Action::MoveRight if self.menu_state.current_tab == MenuTab::PitSize => {
                self.menu_state.pit_preset = self.menu_state.pit_preset.next();
                let (w, d, h) = self.menu_state.pit_preset.dims();
                self.state.select_dims(w, d, h);
            }
            Action::MoveFront | Action::MoveBack => {
                self.menu_state.current_tab = match self.menu_state.current_tab {
                    MenuTab::PitSize => MenuTab::Start,
                    MenuTab::Start => MenuTab::PitSize,
                };
            }
            Action::Drop => {
                if self.menu_state.current_tab == MenuTab::Start {
                    self.start_human_game();
                } else {
                    self.menu_state.current_tab = MenuTab::Start;
                }
            }
            _ => {}
        }
        false
    }

    /// Quit-menu navigation. Returns true when the app should exit.
    fn handle_quit_menu_key(&mut self, action: Action, selected: QuitOption) -> bool {
        match action {
            Action::MoveFront | Action::MoveRight => {
                self.quit_menu = Some(match selected {
                    QuitOption::Resume => QuitOption::Title,
                    QuitOption::Title => QuitOption::Exit,
                    QuitOption::Exit => QuitOption::Resume,
                });
            }
            Action::MoveBack | Action::MoveLeft => {
                self.quit_menu = Some(match selected {
                    QuitOption::Resume => QuitOption::Exit,
                    QuitOption::Title => QuitOption::Resume,
                    QuitOption::Exit => QuitOption::Title,
                });
            }
            Action::Drop => match selected {
                QuitOption::Resume => self.quit_menu = None,
                QuitOption::Title => self.back_to_title(),
                QuitOption::Exit => return true,
            },
            Action::Pause | Action::Quit => self.quit_menu = None,
            _ => {}
        }
        false
    }
}
