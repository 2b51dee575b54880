//! Interactive session tying the world and systems to the screens.

use gene_link_core::{
    Command, ContentPool, Event, RoundPhase, SelectionAfterMiss, SelectionError,
    SubmissionError, TileId, CLUES_PER_DIAGNOSIS, WELCOME_BANNER,
};
use gene_link_rendering::{
    status_for, tone_for, BoardScene, DetailCard, Presentation, Scene, SceneRow, SceneTile,
    StatusLine, TileState, ToneCue, BACKGROUND,
};
use gene_link_system_dealer::Dealer;
use gene_link_system_unlocks::{UnlockStore, Unlocks};
use gene_link_world::{self as world, query, World};
use rand::Rng;

use crate::input::Action;

/// Screen currently shown to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Screen {
    Landing,
    Manual,
    StudyBank,
    Board,
}

/// Whether the input loop keeps running after an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Quit,
}

/// Owns the world and the systems for one process run.
#[derive(Debug)]
pub(crate) struct Session<R, S> {
    world: World,
    dealer: Dealer<R>,
    unlocks: Unlocks<S>,
    pool: ContentPool,
    screen: Screen,
    status: Option<StatusLine>,
    detail: Option<DetailCard>,
    notice: Option<String>,
    cues: Vec<ToneCue>,
}

impl<R: Rng, S: UnlockStore> Session<R, S> {
    /// Creates a session on the landing screen.
    pub(crate) fn new(
        pool: ContentPool,
        dealer: Dealer<R>,
        unlocks: Unlocks<S>,
        selection_after_miss: SelectionAfterMiss,
    ) -> Self {
        let mut session = Self {
            world: World::new(),
            dealer,
            unlocks,
            pool,
            screen: Screen::Landing,
            status: None,
            detail: None,
            notice: None,
            cues: Vec::new(),
        };
        session.execute(vec![Command::ConfigureRules {
            selection_after_miss,
        }]);
        session
    }

    /// Applies a player action.
    pub(crate) fn handle(&mut self, action: Action) -> Flow {
        self.notice = None;

        match action {
            Action::Quit => return Flow::Quit,
            Action::Start => self.execute(vec![Command::RequestRound]),
            Action::Manual => self.screen = Screen::Manual,
            Action::Bank => self.screen = Screen::StudyBank,
            Action::Back | Action::Abort => self.leave_screen(),
            Action::Confirm => {
                if self.detail.take().is_none() {
                    self.notify("nothing to confirm");
                }
            }
            Action::Toggle(numbers) => {
                if self.board_accepts_input() {
                    let commands = numbers
                        .into_iter()
                        .map(|number| Command::SelectTile {
                            tile: TileId::new(number - 1),
                        })
                        .collect();
                    self.execute(commands);
                }
            }
            Action::Submit => {
                if self.board_accepts_input() {
                    self.execute(vec![Command::SubmitSelection]);
                }
            }
            Action::Clear => {
                if self.board_accepts_input() {
                    self.execute(vec![Command::ClearSelection]);
                }
            }
        }

        Flow::Continue
    }

    /// Replaces the notice shown with the next presentation.
    pub(crate) fn notify(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    /// Drains tone cues produced since the last call.
    pub(crate) fn take_cues(&mut self) -> Vec<ToneCue> {
        std::mem::take(&mut self.cues)
    }

    /// Builds the presentation of the current screen.
    pub(crate) fn presentation(&self) -> Presentation {
        let scene = match self.screen {
            Screen::Landing => Scene::landing(),
            Screen::Manual => Scene::manual(),
            Screen::StudyBank => Scene::study_bank(self.unlocks.collection().iter()),
            Screen::Board => self
                .board_scene()
                .map_or_else(Scene::landing, Scene::Board),
        };
        Presentation::new(WELCOME_BANNER, BACKGROUND, scene).with_notice(self.notice.clone())
    }

    fn leave_screen(&mut self) {
        if self.screen == Screen::Board {
            self.execute(vec![Command::AbandonRound]);
        }
        self.screen = Screen::Landing;
    }

    fn board_accepts_input(&mut self) -> bool {
        if self.screen != Screen::Board {
            self.notify("start a round first");
            return false;
        }
        if self.detail.is_some() {
            self.notify("type `ok` to dismiss the decoded diagnosis");
            return false;
        }
        true
    }

    /// Runs commands through the dealer and the world, then lets the
    /// unlocks system react to the resulting events.
    fn execute(&mut self, mut commands: Vec<Command>) {
        let mut events = Vec::new();
        while !commands.is_empty() {
            let mut follow_up = Vec::new();
            self.dealer.handle(&commands, &self.pool, &mut follow_up);
            for command in commands {
                world::apply(&mut self.world, command, &mut events);
            }
            commands = follow_up;
        }

        let mut unlocked = Vec::new();
        self.unlocks.handle(&events, &mut unlocked);
        events.extend(unlocked);

        for event in &events {
            self.observe(event);
        }
    }

    fn observe(&mut self, event: &Event) {
        if let Some(cue) = tone_for(event) {
            self.cues.push(cue);
        }
        if let Some(status) = status_for(event) {
            self.status = Some(status);
        }

        match event {
            Event::RoundStarted => {
                self.screen = Screen::Board;
                self.detail = None;
            }
            Event::GroupFound { diagnosis, .. } => {
                self.detail = Some(DetailCard::from_diagnosis(diagnosis));
            }
            Event::RoundAbandoned => {
                self.status = None;
                self.detail = None;
            }
            Event::SelectionRejected { tile, reason } => {
                let notice = match reason {
                    SelectionError::UnknownTile => format!("there is no tile {}", tile.get() + 1),
                    SelectionError::AlreadyFound => {
                        format!("tile {} is already decoded", tile.get() + 1)
                    }
                    SelectionError::SelectionFull => {
                        format!("only {CLUES_PER_DIAGNOSIS} tiles can be selected")
                    }
                    SelectionError::RoundOver => "the round is over; type `restart`".to_owned(),
                    SelectionError::NoRound => "start a round first".to_owned(),
                };
                self.notify(notice);
            }
            Event::SubmissionRejected { reason } => {
                let notice = match reason {
                    SubmissionError::IncompleteSelection { selected } => {
                        format!("select {CLUES_PER_DIAGNOSIS} tiles to sequence ({selected} selected)")
                    }
                    SubmissionError::RoundOver => "the round is over; type `restart`".to_owned(),
                    SubmissionError::NoRound => "start a round first".to_owned(),
                };
                self.notify(notice);
            }
            Event::DiagnosisUnlocked { name } => {
                self.notify(format!("{name} added to the study bank"));
            }
            _ => {}
        }
    }

    fn board_scene(&self) -> Option<BoardScene> {
        let board = query::board(&self.world)?;
        let view = query::reveal_view(&self.world)?;
        let phase = query::phase(&self.world);
        let lost = phase == RoundPhase::Lost;

        let rows = view
            .order()
            .chunks(CLUES_PER_DIAGNOSIS)
            .map(|chunk| {
                let tiles = chunk
                    .iter()
                    .filter_map(|&tile| {
                        let entry = board.tile(tile)?;
                        let state = if query::is_found(&self.world, tile) {
                            TileState::Found
                        } else if query::is_selected(&self.world, tile) {
                            TileState::Selected
                        } else if lost {
                            TileState::Revealed
                        } else {
                            TileState::Idle
                        };
                        Some(SceneTile::new(tile, entry.text(), entry.category(), state))
                    })
                    .collect();
                let label = if lost {
                    chunk
                        .first()
                        .and_then(|&tile| board.group_of(tile))
                        .and_then(|group| view.label_for(group))
                        .map(str::to_owned)
                } else {
                    None
                };
                SceneRow { label, tiles }
            })
            .collect();

        let decoded = query::found_groups(&self.world)
            .iter()
            .filter_map(|found| view.label_for(found.group()))
            .map(str::to_owned)
            .collect();

        Some(BoardScene {
            rows,
            decoded,
            mistakes: query::mistakes(&self.world),
            phase,
            status: self.status,
            can_submit: query::can_submit(&self.world),
            detail: self.detail.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gene_link_core::{Category, Clue, Diagnosis, GroupId, MAX_MISTAKES};
    use gene_link_rendering::{CORRECT_TONE, SELECT_TONE, START_TONE, WRONG_TONE};
    use gene_link_system_unlocks::MemoryStore;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    type TestSession = Session<ChaCha8Rng, MemoryStore>;

    fn pool() -> ContentPool {
        let diagnoses = (0..6)
            .map(|index| {
                let name = format!("Condition {index}");
                Diagnosis::new(
                    name.clone(),
                    Category::ALL.map(|category| Clue::new(format!("{name} {category}"), category)),
                )
            })
            .collect();
        ContentPool::new(diagnoses).expect("synthetic pool is valid")
    }

    fn session(policy: SelectionAfterMiss) -> TestSession {
        Session::new(
            pool(),
            Dealer::new(ChaCha8Rng::seed_from_u64(17)),
            Unlocks::load(MemoryStore::new()),
            policy,
        )
    }

    fn started() -> TestSession {
        let mut session = session(SelectionAfterMiss::Retain);
        assert_eq!(session.handle(Action::Start), Flow::Continue);
        session
    }

    fn numbers_of(session: &TestSession, group: usize) -> Vec<usize> {
        query::board(&session.world)
            .expect("round in progress")
            .tiles_of(GroupId::ALL[group])
            .into_iter()
            .map(|tile| tile.get() + 1)
            .collect()
    }

    fn mixed_numbers(session: &TestSession) -> Vec<usize> {
        let mut numbers: Vec<usize> = numbers_of(session, 0).into_iter().take(3).collect();
        numbers.push(numbers_of(session, 1)[0]);
        numbers
    }

    fn board_scene(session: &TestSession) -> BoardScene {
        match session.presentation().scene {
            Scene::Board(scene) => scene,
            other => panic!("expected board scene, got {other:?}"),
        }
    }

    #[test]
    fn session_opens_on_landing_screen() {
        let session = session(SelectionAfterMiss::Retain);

        assert_eq!(session.presentation().scene, Scene::landing());
        assert_eq!(query::phase(&session.world), RoundPhase::Idle);
    }

    #[test]
    fn starting_deals_a_board_and_plays_start_tone() {
        let mut session = started();

        let scene = board_scene(&session);
        assert_eq!(scene.rows.len(), 4);
        assert!(scene.rows.iter().all(|row| row.tiles.len() == 4));
        assert!(scene.rows.iter().all(|row| row.label.is_none()));
        assert_eq!(scene.status, Some(StatusLine::SystemReady));
        assert_eq!(session.take_cues(), vec![START_TONE]);
        assert!(session.take_cues().is_empty());
    }

    #[test]
    fn decoding_a_group_opens_detail_card_and_unlocks() {
        let mut session = started();
        let numbers = numbers_of(&session, 2);
        let _ = session.take_cues();

        let _ = session.handle(Action::Toggle(numbers));
        let _ = session.handle(Action::Submit);

        let name = query::board(&session.world)
            .expect("round in progress")
            .diagnosis(GroupId::ALL[2])
            .name()
            .to_owned();
        let scene = board_scene(&session);
        assert_eq!(scene.status, Some(StatusLine::SequenceVerified));
        assert_eq!(scene.decoded, vec![name.clone()]);
        assert_eq!(scene.detail.as_ref().map(|card| card.name.as_str()), Some(name.as_str()));
        assert!(session.unlocks.collection().contains(&name));
        assert_eq!(session.unlocks.store().save_count(), 1);

        let cues = session.take_cues();
        assert_eq!(cues.last(), Some(&CORRECT_TONE));
        assert_eq!(cues.iter().filter(|cue| **cue == SELECT_TONE).count(), 4);
    }

    #[test]
    fn detail_card_blocks_board_input_until_confirmed() {
        let mut session = started();
        let numbers = numbers_of(&session, 0);
        let _ = session.handle(Action::Toggle(numbers));
        let _ = session.handle(Action::Submit);

        let next = numbers_of(&session, 1);
        let _ = session.handle(Action::Toggle(next.clone()));
        assert!(query::selection(&session.world).is_empty());
        assert!(session.presentation().notice.is_some());

        let _ = session.handle(Action::Confirm);
        let _ = session.handle(Action::Toggle(next));
        assert_eq!(query::selection(&session.world).len(), 4);
        assert!(board_scene(&session).detail.is_none());
    }

    #[test]
    fn miss_reports_decoding_error_and_keeps_selection() {
        let mut session = started();
        let numbers = mixed_numbers(&session);
        let _ = session.handle(Action::Toggle(numbers));
        let _ = session.take_cues();

        let _ = session.handle(Action::Submit);

        let scene = board_scene(&session);
        assert_eq!(scene.status, Some(StatusLine::DecodingError));
        assert_eq!(scene.mistakes, 1);
        assert_eq!(session.take_cues(), vec![WRONG_TONE]);
        let selected = scene
            .rows
            .iter()
            .flat_map(|row| &row.tiles)
            .filter(|tile| tile.state == TileState::Selected)
            .count();
        assert_eq!(selected, 4);
    }

    #[test]
    fn clear_policy_empties_selection_after_miss() {
        let mut session = session(SelectionAfterMiss::Clear);
        let _ = session.handle(Action::Start);
        let numbers = mixed_numbers(&session);
        let _ = session.handle(Action::Toggle(numbers));

        let _ = session.handle(Action::Submit);

        assert!(query::selection(&session.world).is_empty());
        assert_eq!(query::mistakes(&session.world), 1);
    }

    #[test]
    fn lost_round_groups_rows_under_their_names() {
        let mut session = started();
        let numbers = mixed_numbers(&session);
        let _ = session.handle(Action::Toggle(numbers));
        for _ in 0..MAX_MISTAKES {
            let _ = session.handle(Action::Submit);
        }

        let board = query::board(&session.world).expect("round kept after loss");
        let scene = board_scene(&session);
        assert_eq!(scene.phase, RoundPhase::Lost);
        for (row, group) in scene.rows.iter().zip(GroupId::ALL) {
            assert_eq!(row.label.as_deref(), Some(board.diagnosis(group).name()));
            assert!(row
                .tiles
                .iter()
                .all(|tile| board.group_of(tile.id) == Some(group)));
        }
        assert_eq!(scene.mistake_markers(), [true; 4]);
    }

    #[test]
    fn abort_returns_to_landing_and_idles_the_world() {
        let mut session = started();

        let _ = session.handle(Action::Abort);

        assert_eq!(session.presentation().scene, Scene::landing());
        assert_eq!(query::phase(&session.world), RoundPhase::Idle);

        let _ = session.handle(Action::Submit);
        assert_eq!(
            session.presentation().notice.as_deref(),
            Some("start a round first")
        );
    }

    #[test]
    fn study_bank_lists_unlocked_diagnoses() {
        let mut session = started();
        let numbers = numbers_of(&session, 1);
        let _ = session.handle(Action::Toggle(numbers));
        let _ = session.handle(Action::Submit);
        let _ = session.handle(Action::Confirm);
        let _ = session.handle(Action::Abort);

        let _ = session.handle(Action::Bank);

        let Scene::StudyBank { entries } = session.presentation().scene else {
            panic!("expected study bank scene");
        };
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].clues.len(), 4);
    }

    #[test]
    fn unknown_tile_numbers_are_reported() {
        let mut session = started();

        let _ = session.handle(Action::Toggle(vec![17]));

        assert_eq!(
            session.presentation().notice.as_deref(),
            Some("there is no tile 17")
        );
        assert!(session.take_cues().iter().all(|cue| *cue == START_TONE));
    }

    #[test]
    fn quit_stops_the_loop() {
        let mut session = session(SelectionAfterMiss::Retain);

        assert_eq!(session.handle(Action::Quit), Flow::Quit);
    }
}
