//! Pitrixtui — Blockout-style 3D falling-block puzzle in the terminal.

mod app;
mod demo;
mod game;
mod input;
mod theme;
mod ui;

use anyhow::Result;
use app::App;
use clap::{Parser, ValueEnum};

/// Options derived from CLI that affect runtime behaviour (animation, attract mode, seeding).
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub no_animation: bool,
    pub no_attract: bool,
    pub no_menu: bool,
    pub seed: Option<u32>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let theme = theme::Theme::load(args.theme.as_deref(), args.palette).unwrap_or_default();
    let config = GameConfig {
        no_animation: args.no_animation,
        no_attract: args.no_attract,
        no_menu: args.no_menu,
        seed: args.seed,
    };
    let mut app = App::new(&args, config, theme)?;
    app.run()?;
    Ok(())
}

/// Blockout-style 3D pit puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "pitrixtui",
    version,
    about = "Blockout-style 3D falling-block puzzle in the terminal. Fill whole planes at the bottom of the pit to clear them.",
    long_about = "Pitrixtui is a terminal puzzle game in the spirit of Blockout.\n\n\
        Polycube pieces fall into a three-dimensional pit seen from above. Slide them \
        across the pit mouth, spin them about all three axes, and drop them; completely \
        filled planes vanish and everything above settles down a level.\n\n\
        CONTROLS (normal):\n  Arrows      Slide    z / x / c  Spin about X/Y/Z\n  Enter/Space Drop     P          Pause      Q / Esc    Quit\n\n\
        CONTROLS (vim):\n  h/l         Slide    j/k        Slide front/back\n  u/i/o       Spin     Space      Drop       q          Quit\n\n\
        Leave the title screen idle for ten seconds and the game starts playing itself; \
        press any key to take the controls back. Use --theme to load a btop-style theme \
        (e.g. onedark.theme)."
)]
pub struct Args {
    /// Pit width in cells (left-right).
    #[arg(long, default_value = "5", value_parser = clap::value_parser!(u8).range(3..=9), value_name = "COLS")]
    pub width: u8,

    /// Pit depth in cells (front-back).
    #[arg(long, default_value = "5", value_parser = clap::value_parser!(u8).range(3..=9), value_name = "ROWS")]
    pub depth: u8,

    /// Pit height in levels (how deep pieces fall).
    #[arg(long, default_value = "12", value_parser = clap::value_parser!(u8).range(6..=20), value_name = "LEVELS")]
    pub height: u8,

    /// Path to theme file (btop-style theme[key]=\"value\"). Uses One Dark if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<std::path::PathBuf>,

    /// Colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Disable the plane-clear flash animation.
    #[arg(long)]
    pub no_animation: bool,

    /// Skip the title menu and start a game immediately.
    #[arg(long)]
    pub no_menu: bool,

    /// Never hand the title screen over to the attract mode.
    #[arg(long)]
    pub no_attract: bool,

    /// Seed for shape order and the attract mode's planning (random if not set).
    #[arg(long, value_name = "N")]
    pub seed: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}
