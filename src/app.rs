use std::path::PathBuf;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::Result;
use rand::SeedableRng;
use rand::rngs::SmallRng;

#[cfg(feature = "sound")]
use crate::audio::PcmPlayback;
use crate::audio::{AssetDir, AudioPlayback, SilentPlayback};
use crate::catalog::{Catalog, LetterCase, Section, TargetId};
use crate::config::Config;
use crate::engine::aliases::AliasTable;
use crate::session::controller::{self, SessionController};
use crate::session::state::{Celebration, Mode, Phase, Session};
use crate::speech::{
    KeyboardMic, KeyboardRecognizer, SpeechBackend, SpeechRecognizer, UnavailableRecognizer,
};
use crate::ui::components::menu::{Menu, MenuAction};
use crate::ui::theme::Theme;

/// How long the "Great job!" sparkle stays up after a correct answer.
const FLASH_DURATION: Duration = Duration::from_millis(1200);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Home,
    Explore,
    Detail,
    Quiz,
    Speech,
}

pub fn grid_columns(section: Section) -> usize {
    match section {
        Section::Alphabet => 7,
        Section::Numbers => 5,
    }
}

pub struct App {
    pub screen: AppScreen,
    pub menu: Menu<'static>,
    pub theme: &'static Theme,
    pub config: Config,
    pub letter_case: LetterCase,
    pub controller: SessionController<SmallRng>,
    pub grid_selected: usize,
    pub option_cursor: usize,
    pub should_quit: bool,
    flash_since: Option<Instant>,
    celebrations: mpsc::Receiver<Celebration>,
    mic: Option<KeyboardMic>,
    aliases: AliasTable,
    config_file: Option<PathBuf>,
    shown_target: Option<TargetId>,
}

impl App {
    /// `config_file` is where letter-case changes are saved; `None` keeps
    /// them for this run only.
    pub fn new(
        config: Config,
        theme: &'static Theme,
        section: Section,
        config_file: Option<PathBuf>,
    ) -> Result<Self> {
        let aliases = AliasTable::load(config.alias_path().as_deref())?;
        let letter_case = config.letter_case();
        let (controller, mic, celebrations) = build_controller(&config, section, &aliases)?;

        Ok(Self {
            screen: AppScreen::Home,
            menu: Menu::new(theme, section, letter_case),
            theme,
            config,
            letter_case,
            controller,
            grid_selected: 0,
            option_cursor: 0,
            should_quit: false,
            flash_since: None,
            celebrations,
            mic,
            aliases,
            config_file,
            shown_target: None,
        })
    }

    pub fn session(&self) -> &Session {
        self.controller.session()
    }

    pub fn catalog(&self) -> &Catalog {
        self.controller.session().catalog()
    }

    pub fn section(&self) -> Section {
        self.controller.section()
    }

    pub fn speech_available(&self) -> bool {
        self.controller.speech_available()
    }

    pub fn run_menu_action(&mut self, action: MenuAction, now: Instant) -> Result<()> {
        match action {
            MenuAction::Explore => self.open_explore(now),
            MenuAction::Quiz => self.start_quiz(now),
            MenuAction::Speech => self.start_speech(now),
            MenuAction::SwitchSection => self.switch_section(now)?,
            MenuAction::ToggleCase => self.toggle_case(),
            MenuAction::Quit => self.should_quit = true,
        }
        Ok(())
    }

    pub fn go_home(&mut self, now: Instant) {
        self.controller.teardown(now);
        self.flash_since = None;
        self.screen = AppScreen::Home;
    }

    pub fn switch_section(&mut self, now: Instant) -> Result<()> {
        self.controller.teardown(now);
        let section = self.section().toggled();
        let (controller, mic, celebrations) = build_controller(&self.config, section, &self.aliases)?;
        self.controller = controller;
        self.mic = mic;
        self.celebrations = celebrations;
        self.grid_selected = 0;
        self.menu.refresh(section, self.letter_case);
        log::info!("switched to {}", section.as_str());
        Ok(())
    }

    pub fn toggle_case(&mut self) {
        self.letter_case = self.letter_case.toggled();
        self.config.set_letter_case(self.letter_case);
        self.menu.refresh(self.section(), self.letter_case);
        if let Some(path) = &self.config_file {
            // Re-read the file so one-run command-line overrides are not saved.
            let mut stored = Config::load_from(path).unwrap_or_default();
            stored.set_letter_case(self.letter_case);
            if let Err(e) = stored.save_to(path) {
                log::warn!("failed to save config: {e:#}");
            }
        }
    }

    // Explore

    pub fn open_explore(&mut self, now: Instant) {
        self.controller.teardown(now);
        self.grid_selected = self.grid_selected.min(self.catalog().len().saturating_sub(1));
        self.screen = AppScreen::Explore;
    }

    pub fn grid_move(&mut self, dx: isize, dy: isize) {
        let len = self.catalog().len() as isize;
        let columns = grid_columns(self.section()) as isize;
        let next = self.grid_selected as isize + dx + dy * columns;
        if (0..len).contains(&next) {
            self.grid_selected = next as usize;
        }
    }

    pub fn selected_target(&self) -> Option<TargetId> {
        self.catalog().targets().get(self.grid_selected).map(|t| t.id)
    }

    pub fn open_detail(&mut self) {
        if let Some(id) = self.selected_target() {
            self.controller.preview(id);
            self.screen = AppScreen::Detail;
        }
    }

    /// Flip to the neighbouring card and say it.
    pub fn detail_step(&mut self, delta: isize) {
        let len = self.catalog().len() as isize;
        if len == 0 {
            return;
        }
        self.grid_selected = (self.grid_selected as isize + delta).rem_euclid(len) as usize;
        self.replay_detail();
    }

    pub fn replay_detail(&mut self) {
        if let Some(id) = self.selected_target() {
            self.controller.preview(id);
        }
    }

    pub fn dismiss_win(&mut self, now: Instant) {
        self.controller.dismiss_win(now);
    }

    // Quiz

    pub fn start_quiz(&mut self, now: Instant) {
        self.controller.start_quiz(now);
        self.option_cursor = 0;
        self.flash_since = None;
        self.screen = AppScreen::Quiz;
    }

    pub fn quiz_move(&mut self, delta: isize) {
        let len = self.session().options().len() as isize;
        if len > 0 {
            self.option_cursor = (self.option_cursor as isize + delta).rem_euclid(len) as usize;
        }
    }

    pub fn quiz_pick(&mut self, index: usize, now: Instant) {
        if let Some(choice) = self.session().options().get(index).copied() {
            self.option_cursor = index;
            self.controller.submit_choice(choice, now);
        }
    }

    pub fn quiz_submit(&mut self, now: Instant) {
        self.quiz_pick(self.option_cursor, now);
    }

    pub fn replay_cue(&mut self, now: Instant) {
        self.controller.replay_cue(now);
    }

    // Speech

    pub fn start_speech(&mut self, now: Instant) {
        self.controller.start_speech_challenge(now);
        self.flash_since = None;
        self.screen = AppScreen::Speech;
    }

    /// Enter on the speech screen: open the microphone, or close it and
    /// hand over what was said.
    pub fn talk(&mut self, now: Instant) {
        if self.session().is_listening() {
            self.controller.stop_listening(now);
        } else {
            self.controller.start_listening(now);
        }
    }

    pub fn cancel_listening(&mut self, now: Instant) {
        self.controller.cancel_listening(now);
    }

    pub fn toggle_hint(&mut self, now: Instant) {
        self.controller.toggle_hint(now);
    }

    pub fn speak_char(&self, ch: char) {
        if let Some(mic) = &self.mic {
            mic.type_char(ch);
        }
    }

    pub fn speak_backspace(&self) {
        if let Some(mic) = &self.mic {
            mic.backspace();
        }
    }

    pub fn on_tick(&mut self, now: Instant) {
        self.controller.tick(now);

        while let Ok(celebration) = self.celebrations.try_recv() {
            match celebration {
                Celebration::Correct => self.flash_since = Some(now),
                Celebration::Win { message } => log::debug!("celebrating win: {message}"),
            }
        }

        if self.flash_since.is_some_and(|since| now.duration_since(since) >= FLASH_DURATION) {
            self.flash_since = None;
        }

        let current = self.session().current();
        if current != self.shown_target {
            self.shown_target = current;
            self.option_cursor = 0;
        }

        let won = self.session().phase() == Phase::Won;
        if won && matches!(self.screen, AppScreen::Quiz | AppScreen::Speech) {
            self.screen = AppScreen::Explore;
            self.grid_selected = 0;
            self.flash_since = None;
        }
    }

    pub fn flash_active(&self) -> bool {
        self.flash_since.is_some()
    }

    pub fn mode_label(&self) -> &'static str {
        match (self.screen, self.session().mode()) {
            (AppScreen::Home, _) => "Home",
            (_, Mode::Quiz) => "Listen & Choose",
            (_, Mode::Speech) => "Say It!",
            (_, Mode::Explore) => "Explore",
        }
    }
}

type BuiltController = (
    SessionController<SmallRng>,
    Option<KeyboardMic>,
    mpsc::Receiver<Celebration>,
);

fn build_controller(config: &Config, section: Section, aliases: &AliasTable) -> Result<BuiltController> {
    let catalog = Catalog::load(section)?;
    let session = Session::new(catalog, aliases.clone(), config.feedback_delays());
    let (speech, mic) = build_recognizer(config.speech_backend());
    let (notifier, celebrations) = controller::channel();

    let controller = SessionController::new(
        session,
        build_playback(config),
        speech,
        Box::new(notifier),
        SmallRng::from_entropy(),
    );
    Ok((controller, mic, celebrations))
}

fn build_recognizer(backend: SpeechBackend) -> (Box<dyn SpeechRecognizer>, Option<KeyboardMic>) {
    match backend {
        SpeechBackend::Keyboard => {
            let recognizer = KeyboardRecognizer::new();
            let mic = recognizer.mic();
            (Box::new(recognizer), Some(mic))
        }
        SpeechBackend::None => (Box::new(UnavailableRecognizer), None),
    }
}

#[cfg(feature = "sound")]
fn build_playback(config: &Config) -> Box<dyn AudioPlayback> {
    let assets = AssetDir::new(config.asset_path());
    if config.sound_enabled {
        Box::new(PcmPlayback::new(assets))
    } else {
        Box::new(SilentPlayback::new(assets))
    }
}

#[cfg(not(feature = "sound"))]
fn build_playback(config: &Config) -> Box<dyn AudioPlayback> {
    if config.sound_enabled {
        log::info!("built without the `sound` feature; audio cues are silent");
    }
    Box::new(SilentPlayback::new(AssetDir::new(config.asset_path())))
}
