//! Rendering backend that draws scenes as text on a terminal.

use std::io::Write;

use anyhow::Result;
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{self, Color as TermColor, Stylize},
    terminal::{Clear, ClearType, SetTitle},
};
use gene_link_core::{RoundPhase, MAX_MISTAKES};
use gene_link_rendering::{
    category_theme, BoardScene, Color, DetailCard, Presentation, RenderingBackend, Scene,
    SceneTile, TileState, ToneCue, ACCENT, EMPTY_BANK, FOREGROUND, MANUAL_INTRO, MANUAL_REVEAL,
    MISTAKE, MUTED,
};

use crate::audio;

const CELL_TEXT_WIDTH: usize = 20;

fn term_color(color: Color) -> TermColor {
    let [r, g, b] = color.to_rgb_u8();
    TermColor::Rgb { r, g, b }
}

/// Rendering backend writing to any byte sink.
#[derive(Debug)]
pub(crate) struct TerminalBackend<W> {
    out: W,
    colors: bool,
    sound: bool,
}

impl<W: Write> TerminalBackend<W> {
    /// Creates a backend writing plain text to the provided sink.
    pub(crate) fn new(out: W) -> Self {
        Self {
            out,
            colors: false,
            sound: false,
        }
    }

    /// Enables colors, screen clearing and the window title.
    #[must_use]
    pub(crate) fn with_colors(mut self, enabled: bool) -> Self {
        self.colors = enabled;
        self
    }

    /// Enables the terminal bell for tone cues.
    #[must_use]
    pub(crate) fn with_sound(mut self, enabled: bool) -> Self {
        self.sound = enabled;
        self
    }

    fn paint(&self, text: &str, foreground: Color) -> String {
        if !self.colors {
            return text.to_owned();
        }
        style::style(text).with(term_color(foreground)).to_string()
    }

    fn fill(&self, text: &str, background: Color) -> String {
        if !self.colors {
            return text.to_owned();
        }
        style::style(text)
            .with(term_color(FOREGROUND))
            .on(term_color(background))
            .to_string()
    }

    fn render(&self, presentation: &Presentation) -> String {
        let mut lines = Vec::new();
        match &presentation.scene {
            Scene::Landing { title, tagline } => {
                lines.push(self.paint(title, FOREGROUND));
                lines.push(self.paint(&tagline.to_uppercase(), MUTED));
                lines.push(String::new());
                lines.push("  start   START SESSION".to_owned());
                lines.push("  how     HOW TO PLAY".to_owned());
                lines.push("  bank    STUDY BANK".to_owned());
                lines.push("  quit".to_owned());
            }
            Scene::Manual { legend } => {
                lines.push(self.paint("MANUAL", FOREGROUND));
                lines.push(MANUAL_INTRO.to_owned());
                lines.push(String::new());
                for category in legend {
                    let swatch = self.fill("  ", category_theme(*category).base);
                    lines.push(format!("  {swatch} {}", category.label().to_uppercase()));
                }
                lines.push(String::new());
                lines.push(MANUAL_REVEAL.to_owned());
                lines.push(self.paint("back", MUTED));
            }
            Scene::StudyBank { entries } => {
                lines.push(self.paint("STUDY BANK", FOREGROUND));
                if entries.is_empty() {
                    lines.push(self.paint(EMPTY_BANK, MUTED));
                }
                for entry in entries {
                    lines.push(String::new());
                    lines.push(entry.name.to_uppercase());
                    for clue in &entry.clues {
                        lines.push(self.paint(&format!("  {}", clue.compact()), MUTED));
                    }
                }
                lines.push(String::new());
                lines.push(self.paint("back", MUTED));
            }
            Scene::Board(scene) => self.render_board(scene, &mut lines),
        }

        if let Some(notice) = &presentation.notice {
            lines.push(self.paint(&format!("! {notice}"), MISTAKE));
        }

        let mut text = lines.join("\n");
        text.push_str("\n> ");
        text
    }

    fn render_board(&self, scene: &BoardScene, lines: &mut Vec<String>) {
        let markers: String = scene
            .mistake_markers()
            .iter()
            .map(|filled| {
                if *filled {
                    self.paint("●", MISTAKE)
                } else {
                    self.paint("○", MUTED)
                }
            })
            .collect();
        lines.push(format!(
            "{}  mistakes {markers} {}/{MAX_MISTAKES}",
            self.paint("abort", MUTED),
            scene.mistakes
        ));
        if !scene.decoded.is_empty() {
            lines.push(self.paint(&format!("decoded: {}", scene.decoded.join(", ")), ACCENT));
        }
        lines.push(String::new());

        for row in &scene.rows {
            if let Some(label) = &row.label {
                lines.push(self.paint(&label.to_uppercase(), MUTED));
            }
            let cells: Vec<String> = row.tiles.iter().map(|tile| self.tile_cell(tile)).collect();
            lines.push(cells.join(" "));
        }
        lines.push(String::new());

        if let Some(status) = scene.status {
            lines.push(self.paint(status.text(), ACCENT));
        }
        let hint = match scene.phase {
            RoundPhase::Won | RoundPhase::Lost => "restart: RESTART PROTOCOL",
            _ if scene.can_submit => "go: SEQUENCE   clear: CLEAR BUFFER   1-16: toggle",
            _ => "1-16: toggle   clear: CLEAR BUFFER",
        };
        lines.push(self.paint(hint, MUTED));

        if let Some(card) = &scene.detail {
            self.render_detail(card, lines);
        }
    }

    fn render_detail(&self, card: &DetailCard, lines: &mut Vec<String>) {
        lines.push(String::new());
        lines.push(self.paint(DetailCard::HEADING, ACCENT));
        lines.push(card.name.to_uppercase());
        for clue in &card.clues {
            let swatch = self.fill(" ", category_theme(clue.category).base);
            lines.push(format!(
                "  {swatch} {:<12} {}",
                clue.category.label().to_uppercase(),
                clue.text
            ));
        }
        lines.push(self.paint("ok: CONFIRM", MUTED));
    }

    fn tile_cell(&self, tile: &SceneTile) -> String {
        let marker = match tile.state {
            TileState::Selected => '*',
            TileState::Found => '#',
            TileState::Idle | TileState::Revealed => ' ',
        };
        let text: String = tile.text.chars().take(CELL_TEXT_WIDTH).collect();
        let cell = format!(
            "{:>2}{marker}{text:<width$}",
            tile.number(),
            width = CELL_TEXT_WIDTH
        );
        self.fill(&cell, tile.fill())
    }
}

impl<W: Write> RenderingBackend for TerminalBackend<W> {
    fn present(&mut self, presentation: &Presentation) -> Result<()> {
        let text = self.render(presentation);
        if self.colors {
            queue!(
                self.out,
                Clear(ClearType::All),
                MoveTo(0, 0),
                SetTitle(&presentation.window_title)
            )?;
        } else {
            writeln!(self.out)?;
        }
        self.out.write_all(text.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }

    fn play(&mut self, cue: ToneCue) -> Result<()> {
        if self.sound {
            audio::bell().ring(cue)?;
        }
        Ok(())
    }
}
