#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Gene-Link adapters.

use anyhow::Result as AnyResult;
use gene_link_core::{
    Category, Diagnosis, Event, RoundPhase, SelectionError, TileId, MAX_MISTAKES, TAGLINE,
    WELCOME_BANNER,
};
use std::time::Duration;

/// RGBA color used when presenting scenes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }

    /// Returns a new color darkened towards black by the provided amount.
    #[must_use]
    pub fn darken(self, amount: f32) -> Self {
        let keep = 1.0 - amount.clamp(0.0, 1.0);

        Self {
            red: self.red * keep,
            green: self.green * keep,
            blue: self.blue * keep,
            alpha: self.alpha,
        }
    }

    /// Byte RGB channels, ignoring alpha.
    #[must_use]
    pub fn to_rgb_u8(self) -> [u8; 3] {
        [self.red, self.green, self.blue]
            .map(|channel| (channel.clamp(0.0, 1.0) * 255.0).round() as u8)
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Backdrop behind every screen.
pub const BACKGROUND: Color = Color::from_rgb_u8(0x02, 0x06, 0x17);

/// Primary text color.
pub const FOREGROUND: Color = Color::from_rgb_u8(0xf8, 0xfa, 0xfc);

/// Muted text used for secondary labels.
pub const MUTED: Color = Color::from_rgb_u8(0x64, 0x74, 0x8b);

/// Status line and success accents.
pub const ACCENT: Color = Color::from_rgb_u8(0x34, 0xd3, 0x99);

/// Filled mistake marker.
pub const MISTAKE: Color = Color::from_rgb_u8(0xf4, 0x3f, 0x5e);

/// Colors associated with a clue category.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CategoryTheme {
    /// Fill of an idle tile.
    pub base: Color,
    /// Fill of a selected tile.
    pub selected: Color,
}

/// Theme colors for the provided category.
#[must_use]
pub const fn category_theme(category: Category) -> CategoryTheme {
    match category {
        Category::Gene => CategoryTheme {
            base: Color::from_rgb_u8(0xe1, 0x1d, 0x48),
            selected: Color::from_rgb_u8(0xf4, 0x3f, 0x5e),
        },
        Category::Mechanism => CategoryTheme {
            base: Color::from_rgb_u8(0x25, 0x63, 0xeb),
            selected: Color::from_rgb_u8(0x3b, 0x82, 0xf6),
        },
        Category::Inheritance => CategoryTheme {
            base: Color::from_rgb_u8(0x93, 0x33, 0xea),
            selected: Color::from_rgb_u8(0xa8, 0x55, 0xf7),
        },
        Category::Symptom => CategoryTheme {
            base: Color::from_rgb_u8(0x05, 0x96, 0x69),
            selected: Color::from_rgb_u8(0x10, 0xb9, 0x81),
        },
    }
}

/// Oscillator shape of a feedback tone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Waveform {
    /// Pure sine wave.
    Sine,
    /// Triangle wave.
    Triangle,
    /// Sawtooth wave.
    Sawtooth,
}

/// Short feedback tone requested by the presentation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToneCue {
    /// Oscillator frequency in hertz.
    pub frequency_hz: f32,
    /// Oscillator shape.
    pub waveform: Waveform,
    /// Time until the tone has faded out.
    pub duration: Duration,
}

impl ToneCue {
    /// Creates a new tone cue.
    #[must_use]
    pub const fn new(frequency_hz: f32, waveform: Waveform, duration: Duration) -> Self {
        Self {
            frequency_hz,
            waveform,
            duration,
        }
    }
}

/// Played when a round is dealt.
pub const START_TONE: ToneCue = ToneCue::new(660.0, Waveform::Sine, Duration::from_millis(100));

/// Played when the player touches a selectable tile.
pub const SELECT_TONE: ToneCue =
    ToneCue::new(440.0, Waveform::Triangle, Duration::from_millis(50));

/// Played when a group is decoded.
pub const CORRECT_TONE: ToneCue = ToneCue::new(880.0, Waveform::Sine, Duration::from_millis(200));

/// Played when a submission misses.
pub const WRONG_TONE: ToneCue =
    ToneCue::new(150.0, Waveform::Sawtooth, Duration::from_millis(300));

/// Tone accompanying a world event, if any.
///
/// A toggle refused only because the selection is full still sounds, since the
/// tile itself was selectable.
#[must_use]
pub fn tone_for(event: &Event) -> Option<ToneCue> {
    match event {
        Event::RoundStarted => Some(START_TONE),
        Event::TileSelected { .. }
        | Event::TileDeselected { .. }
        | Event::SelectionRejected {
            reason: SelectionError::SelectionFull,
            ..
        } => Some(SELECT_TONE),
        Event::GroupFound { .. } => Some(CORRECT_TONE),
        Event::SubmissionMissed { .. } => Some(WRONG_TONE),
        _ => None,
    }
}

/// One-line status shown beneath the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatusLine {
    /// A fresh round is ready.
    SystemReady,
    /// The last submission decoded a group.
    SequenceVerified,
    /// The last submission missed.
    DecodingError,
}

impl StatusLine {
    /// Text displayed for the status.
    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            Self::SystemReady => "SYSTEM READY",
            Self::SequenceVerified => "SEQUENCE VERIFIED",
            Self::DecodingError => "DECODING ERROR",
        }
    }
}

/// Status line replacing the current one after an event, if any.
#[must_use]
pub fn status_for(event: &Event) -> Option<StatusLine> {
    match event {
        Event::RoundStarted => Some(StatusLine::SystemReady),
        Event::GroupFound { .. } => Some(StatusLine::SequenceVerified),
        Event::SubmissionMissed { .. } => Some(StatusLine::DecodingError),
        _ => None,
    }
}

/// Visual state of a tile on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileState {
    /// Selectable and not selected.
    Idle,
    /// Part of the current selection.
    Selected,
    /// Belongs to a decoded group.
    Found,
    /// Shown grouped after the round was lost.
    Revealed,
}

/// Immutable snapshot describing a tile within the board scene.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SceneTile {
    /// Stable identifier of the tile on the board.
    pub id: TileId,
    /// Clue text printed on the tile.
    pub text: String,
    /// Category driving the tile color.
    pub category: Category,
    /// Visual state of the tile.
    pub state: TileState,
}

impl SceneTile {
    /// Creates a new scene tile descriptor.
    #[must_use]
    pub fn new(id: TileId, text: impl Into<String>, category: Category, state: TileState) -> Self {
        Self {
            id,
            text: text.into(),
            category,
            state,
        }
    }

    /// One-based number the player uses to pick the tile.
    #[must_use]
    pub fn number(&self) -> usize {
        self.id.get() + 1
    }

    /// Fill color of the tile given its state.
    #[must_use]
    pub fn fill(&self) -> Color {
        let theme = category_theme(self.category);
        match self.state {
            TileState::Idle => theme.base,
            TileState::Selected => theme.selected.lighten(0.15),
            TileState::Found => theme.base.darken(0.7),
            TileState::Revealed => theme.base.darken(0.35),
        }
    }
}

/// Row of four tiles, optionally headed by a revealed diagnosis name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SceneRow {
    /// Diagnosis name printed above the row.
    pub label: Option<String>,
    /// Tiles in display order.
    pub tiles: Vec<SceneTile>,
}

/// Snapshot of the round screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardScene {
    /// Board rows in display order.
    pub rows: Vec<SceneRow>,
    /// Names of decoded diagnoses, in the order they were decoded.
    pub decoded: Vec<String>,
    /// Mistakes made so far.
    pub mistakes: u32,
    /// Current round phase.
    pub phase: RoundPhase,
    /// Latest status line.
    pub status: Option<StatusLine>,
    /// Whether a submission would be accepted.
    pub can_submit: bool,
    /// Card shown over the board after a successful submission.
    pub detail: Option<DetailCard>,
}

impl BoardScene {
    /// Mistake markers, `true` for each mistake already made.
    #[must_use]
    pub fn mistake_markers(&self) -> [bool; MAX_MISTAKES as usize] {
        let mut markers = [false; MAX_MISTAKES as usize];
        for (index, marker) in markers.iter_mut().enumerate() {
            *marker = (index as u32) < self.mistakes;
        }
        markers
    }
}

/// Clue line shown on cards and in the study bank.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClueLine {
    /// Category of the clue.
    pub category: Category,
    /// Clue text.
    pub text: String,
}

impl ClueLine {
    /// Compact `category: text` rendering used by the study bank.
    #[must_use]
    pub fn compact(&self) -> String {
        format!("{}: {}", self.category, self.text)
    }
}

/// Full record of a decoded diagnosis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetailCard {
    /// Diagnosis name.
    pub name: String,
    /// Every clue of the diagnosis.
    pub clues: Vec<ClueLine>,
}

impl DetailCard {
    /// Heading shown above a freshly decoded diagnosis.
    pub const HEADING: &'static str = "DECODING SUCCESSFUL";

    /// Builds the card for a diagnosis.
    #[must_use]
    pub fn from_diagnosis(diagnosis: &Diagnosis) -> Self {
        Self {
            name: diagnosis.name().to_owned(),
            clues: diagnosis
                .clues()
                .iter()
                .map(|clue| ClueLine {
                    category: clue.category(),
                    text: clue.text().to_owned(),
                })
                .collect(),
        }
    }
}

/// Instructions shown on the manual screen.
pub const MANUAL_INTRO: &str = "Link 4 markers to identify a specific diagnosis.";

/// Closing note of the manual screen.
pub const MANUAL_REVEAL: &str =
    "If you fail 4 times, the system will group the correct sequences for your review.";

/// Placeholder shown by an empty study bank.
pub const EMPTY_BANK: &str = "Decode conditions to unlock data.";

/// Screen currently presented to the player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Scene {
    /// Title screen.
    Landing {
        /// Banner text.
        title: &'static str,
        /// Subtitle under the banner.
        tagline: &'static str,
    },
    /// How-to-play screen listing the category legend.
    Manual {
        /// Categories in legend order.
        legend: [Category; 4],
    },
    /// Every unlocked diagnosis.
    StudyBank {
        /// Unlocked diagnoses in unlock order.
        entries: Vec<DetailCard>,
    },
    /// Active or finished round.
    Board(BoardScene),
}

impl Scene {
    /// Title screen scene.
    #[must_use]
    pub const fn landing() -> Self {
        Self::Landing {
            title: WELCOME_BANNER,
            tagline: TAGLINE,
        }
    }

    /// Manual scene.
    #[must_use]
    pub const fn manual() -> Self {
        Self::Manual {
            legend: Category::ALL,
        }
    }

    /// Study bank scene listing the provided diagnoses.
    #[must_use]
    pub fn study_bank<'a>(unlocked: impl IntoIterator<Item = &'a Diagnosis>) -> Self {
        Self::StudyBank {
            entries: unlocked.into_iter().map(DetailCard::from_diagnosis).collect(),
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title of the window or terminal session.
    pub window_title: String,
    /// Solid color used behind every scene.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
    /// One-off message shown beneath the scene, such as a rejected input.
    pub notice: Option<String>,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
            notice: None,
        }
    }

    /// Attaches a one-off notice to the presentation.
    #[must_use]
    pub fn with_notice(mut self, notice: Option<String>) -> Self {
        self.notice = notice;
        self
    }
}

/// Rendering backend capable of presenting Gene-Link scenes.
pub trait RenderingBackend {
    /// Draws the presentation, replacing whatever was shown before.
    fn present(&mut self, presentation: &Presentation) -> AnyResult<()>;

    /// Plays a feedback tone. Backends without audio may ignore the cue.
    fn play(&mut self, cue: ToneCue) -> AnyResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use gene_link_core::{Clue, GroupId, SubmissionError};

    fn marfan() -> Diagnosis {
        Diagnosis::new(
            "Marfan syndrome",
            [
                Clue::new("FBN1", Category::Gene),
                Clue::new("Fibrillin-1 defect", Category::Mechanism),
                Clue::new("Autosomal dominant", Category::Inheritance),
                Clue::new("Lens dislocation", Category::Symptom),
            ],
        )
    }

    #[test]
    fn category_themes_are_distinct() {
        for (index, first) in Category::ALL.iter().enumerate() {
            for second in &Category::ALL[index + 1..] {
                assert_ne!(category_theme(*first).base, category_theme(*second).base);
            }
        }
        assert_eq!(
            category_theme(Category::Gene).base.to_rgb_u8(),
            [0xe1, 0x1d, 0x48]
        );
    }

    #[test]
    fn lighten_and_darken_stay_within_range() {
        let color = Color::from_rgb_u8(100, 150, 200);

        assert_eq!(color.lighten(1.0).to_rgb_u8(), [255, 255, 255]);
        assert_eq!(color.darken(1.0).to_rgb_u8(), [0, 0, 0]);
        assert_eq!(color.lighten(-3.0), color);
    }

    #[test]
    fn feedback_tones_follow_events() {
        let tile = TileId::new(3);

        assert_eq!(tone_for(&Event::RoundStarted), Some(START_TONE));
        assert_eq!(tone_for(&Event::TileDeselected { tile }), Some(SELECT_TONE));
        assert_eq!(
            tone_for(&Event::SelectionRejected {
                tile,
                reason: SelectionError::SelectionFull
            }),
            Some(SELECT_TONE)
        );
        assert_eq!(
            tone_for(&Event::SelectionRejected {
                tile,
                reason: SelectionError::AlreadyFound
            }),
            None
        );
        assert_eq!(
            tone_for(&Event::SubmissionMissed { mistakes: 2 }),
            Some(WRONG_TONE)
        );
        assert_eq!(
            tone_for(&Event::SubmissionRejected {
                reason: SubmissionError::IncompleteSelection { selected: 2 }
            }),
            None
        );
        assert_eq!(WRONG_TONE.waveform, Waveform::Sawtooth);
        assert_eq!(SELECT_TONE.duration, Duration::from_millis(50));
    }

    #[test]
    fn status_lines_follow_outcomes() {
        let found = Event::GroupFound {
            group: GroupId::ALL[1],
            tiles: [0, 1, 2, 3].map(TileId::new),
            diagnosis: marfan(),
        };

        assert_eq!(status_for(&found), Some(StatusLine::SequenceVerified));
        assert_eq!(
            status_for(&Event::SubmissionMissed { mistakes: 1 }).map(StatusLine::text),
            Some("DECODING ERROR")
        );
        assert_eq!(status_for(&Event::RoundWon), None);
    }

    #[test]
    fn detail_card_lists_every_clue() {
        let card = DetailCard::from_diagnosis(&marfan());

        assert_eq!(card.name, "Marfan syndrome");
        assert_eq!(card.clues.len(), 4);
        assert_eq!(card.clues[2].compact(), "inheritance: Autosomal dominant");
    }

    #[test]
    fn mistake_markers_fill_from_the_left() {
        let scene = BoardScene {
            rows: Vec::new(),
            decoded: Vec::new(),
            mistakes: 2,
            phase: RoundPhase::Playing,
            status: None,
            can_submit: false,
            detail: None,
        };

        assert_eq!(scene.mistake_markers(), [true, true, false, false]);
    }

    #[test]
    fn scene_tiles_are_numbered_from_one() {
        let tile = SceneTile::new(TileId::new(15), "FBN1", Category::Gene, TileState::Idle);

        assert_eq!(tile.number(), 16);
        assert_eq!(tile.fill(), category_theme(Category::Gene).base);
    }
}
