mod app;
mod audio;
mod catalog;
mod config;
mod engine;
mod event;
mod logging;
mod session;
mod speech;
mod ui;

use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use app::{App, AppScreen};
use catalog::{LetterCase, Section};
use config::Config;
use event::{AppEvent, EventHandler};
use session::state::{Feedback, Phase};
use speech::SpeechBackend;
use ui::components::choice_board::ChoiceBoard;
use ui::components::progress_bar::ProgressBar;
use ui::components::speech_panel::SpeechPanel;
use ui::components::target_card::TargetCard;
use ui::components::target_grid::TargetGrid;
use ui::components::win_banner::WinBanner;
use ui::layout::{AppLayout, centered_rect, pack_hint_lines, with_progress};
use ui::theme::Theme;

#[derive(Parser)]
#[command(
    name = "letterpop",
    version,
    about = "Terminal alphabet and number tutor for young children"
)]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, value_parser = parse_section, help = "Section to start in (alphabet, numbers)")]
    section: Option<Section>,

    #[arg(long, help = "Show lowercase letters")]
    lowercase: bool,

    #[arg(long, help = "Do not play audio cues")]
    no_sound: bool,

    #[arg(long, value_parser = parse_backend, help = "Speech backend (keyboard, none)")]
    speech_backend: Option<SpeechBackend>,
}

fn parse_section(name: &str) -> Result<Section, String> {
    Section::from_name(name).ok_or_else(|| format!("unknown section {name:?}; try alphabet or numbers"))
}

fn parse_backend(name: &str) -> Result<SpeechBackend, String> {
    SpeechBackend::from_name(name).ok_or_else(|| format!("unknown speech backend {name:?}; try keyboard or none"))
}

/// Command-line flags win over the config file for this run only.
fn apply_cli(config: &mut Config, cli: &Cli) {
    if let Some(theme) = &cli.theme {
        config.theme = theme.clone();
    }
    if cli.lowercase {
        config.set_letter_case(LetterCase::Lower);
    }
    if cli.no_sound {
        config.sound_enabled = false;
    }
    if let Some(backend) = cli.speech_backend {
        config.speech_backend = backend.as_str().to_string();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (mut config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    apply_cli(&mut config, &cli);

    if let Err(e) = logging::init(&config::data_dir(), &config.log_level) {
        eprintln!("letterpop: logging disabled: {e:#}");
    }
    if let Some(e) = config_error {
        log::warn!("config unreadable, using defaults: {e:#}");
    }

    let theme = Theme::load(&config.theme).unwrap_or_else(|| {
        log::warn!("theme {:?} not found, using default", config.theme);
        Theme::default()
    });
    let theme: &'static Theme = Box::leak(Box::new(theme));

    let section = cli.section.unwrap_or(Section::Alphabet);
    let mut app = App::new(config, theme, section, Some(Config::config_path()))?;
    log::info!("letterpop starting in {}", section.as_str());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(50));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        log::error!("exiting on error: {err:#}");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key, Instant::now())?,
            AppEvent::Tick | AppEvent::Resize => {}
        }
        app.on_tick(Instant::now());

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent, now: Instant) -> Result<()> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return Ok(());
    }

    match app.screen {
        AppScreen::Home => handle_home_key(app, key, now)?,
        AppScreen::Explore => handle_explore_key(app, key, now),
        AppScreen::Detail => handle_detail_key(app, key),
        AppScreen::Quiz => handle_quiz_key(app, key, now),
        AppScreen::Speech => handle_speech_key(app, key, now),
    }
    Ok(())
}

fn handle_home_key(app: &mut App, key: KeyEvent, now: Instant) -> Result<()> {
    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Enter => {
            let action = app.menu.selected_action();
            app.run_menu_action(action, now)?;
        }
        KeyCode::Char(ch) => {
            if let Some(action) = app.menu.action_for_key(ch) {
                app.run_menu_action(action, now)?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn handle_explore_key(app: &mut App, key: KeyEvent, now: Instant) {
    // Any key closes the win banner first.
    if app.session().phase() == Phase::Won {
        app.dismiss_win(now);
        return;
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_home(now),
        KeyCode::Left | KeyCode::Char('h') => app.grid_move(-1, 0),
        KeyCode::Right | KeyCode::Char('l') => app.grid_move(1, 0),
        KeyCode::Up | KeyCode::Char('k') => app.grid_move(0, -1),
        KeyCode::Down | KeyCode::Char('j') => app.grid_move(0, 1),
        KeyCode::Enter | KeyCode::Char(' ') => app.open_detail(),
        _ => {}
    }
}

fn handle_detail_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('q') => app.screen = AppScreen::Explore,
        KeyCode::Left | KeyCode::Char('h') => app.detail_step(-1),
        KeyCode::Right | KeyCode::Char('l') => app.detail_step(1),
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('r') => app.replay_detail(),
        _ => {}
    }
}

fn handle_quiz_key(app: &mut App, key: KeyEvent, now: Instant) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_home(now),
        KeyCode::Left | KeyCode::Char('h') => app.quiz_move(-1),
        KeyCode::Right | KeyCode::Char('l') => app.quiz_move(1),
        KeyCode::Enter | KeyCode::Char(' ') => app.quiz_submit(now),
        KeyCode::Char('r') => app.replay_cue(now),
        KeyCode::Char(ch @ '1'..='9') => {
            let index = ch as usize - '1' as usize;
            app.quiz_pick(index, now);
        }
        _ => {}
    }
}

fn handle_speech_key(app: &mut App, key: KeyEvent, now: Instant) {
    if app.session().is_listening() {
        match key.code {
            KeyCode::Enter => app.talk(now),
            KeyCode::Esc => app.cancel_listening(now),
            KeyCode::Backspace => app.speak_backspace(),
            KeyCode::Char(ch) => app.speak_char(ch),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_home(now),
        KeyCode::Enter | KeyCode::Char(' ') => app.talk(now),
        KeyCode::Tab => app.toggle_hint(now),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    let layout = AppLayout::new(area);
    render_header(frame, app, layout.header);

    let hints: &[&str] = match app.screen {
        AppScreen::Home => {
            let menu_area = centered_rect(50, 90, layout.main);
            frame.render_widget(&app.menu, menu_area);
            &["[1-3] Play", "[s] Switch section", "[c] Letter case", "[q] Quit"]
        }
        AppScreen::Explore => {
            render_explore(frame, app, layout.main);
            &["[Arrows] Move", "[Enter] Look closer", "[Esc] Back"]
        }
        AppScreen::Detail => {
            render_detail(frame, app, layout.main);
            &["[Enter] Hear again", "[Left/Right] Next card", "[Esc] Back"]
        }
        AppScreen::Quiz => {
            render_quiz(frame, app, layout.main);
            &["[1-4] Pick", "[Enter] Choose", "[r] Hear again", "[Esc] Stop"]
        }
        AppScreen::Speech => {
            render_speech(frame, app, layout.main);
            if app.session().is_listening() {
                &["Type what you say", "[Enter] Done", "[Esc] Cancel"]
            } else {
                &["[Enter] Talk", "[Tab] Hint", "[Esc] Stop"]
            }
        }
    };
    render_footer(frame, app, layout.footer, hints);
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let colors = &app.theme.colors;
    let base = Style::default().fg(colors.header_fg()).bg(colors.header_bg());

    let mut spans = vec![
        Span::styled(" letterpop ", base.add_modifier(Modifier::BOLD)),
        Span::styled(
            format!("| {} | {} ", app.section().label(), app.mode_label()),
            base,
        ),
    ];
    if app.session().is_active() {
        spans.push(Span::styled(format!("| Score {} ", app.session().score()), base));
    }
    if app.flash_active() {
        spans.push(Span::styled(
            " * Great job! * ",
            Style::default()
                .fg(colors.correct())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ));
    }

    let header = Paragraph::new(vec![Line::from(""), Line::from(spans)])
        .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn render_footer(frame: &mut ratatui::Frame, app: &App, area: Rect, hints: &[&str]) {
    let colors = &app.theme.colors;
    let lines: Vec<Line> = pack_hint_lines(hints, area.width as usize)
        .into_iter()
        .map(|line| Line::from(Span::styled(line, Style::default().fg(colors.text_dim()))))
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_explore(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let columns = app::grid_columns(app.section());
    frame.render_widget(
        TargetGrid::new(app.catalog(), app.grid_selected, columns, app.letter_case, app.theme),
        area,
    );

    if let Some(message) = app.session().win_message() {
        frame.render_widget(WinBanner::new(message, app.session().score(), app.theme), area);
    }
}

fn render_detail(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let Some(target) = app.selected_target().and_then(|id| app.catalog().get(id)) else {
        return;
    };
    let card_area = centered_rect(60, 70, area);
    frame.render_widget(TargetCard::new(target, app.letter_case, app.theme), card_area);
}

fn render_quiz(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let session = app.session();
    let (progress_area, board_area) = with_progress(area);
    let (done, total) = session.progress();
    frame.render_widget(ProgressBar::new(done, total, app.theme), progress_area);

    let board = ChoiceBoard::new(session.options(), app.option_cursor, app.letter_case, app.theme)
        .verdict(session.last_selection(), session.feedback());
    frame.render_widget(board, board_area);
}

fn render_speech(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let colors = &app.theme.colors;
    let session = app.session();
    let (progress_area, rest) = with_progress(area);
    let (done, total) = session.progress();
    frame.render_widget(ProgressBar::new(done, total, app.theme), progress_area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(7), Constraint::Length(5)])
        .split(rest);

    if let Some(target) = session.current_target() {
        let reveal = session.hint_shown() || session.feedback() == Some(Feedback::Correct);
        let frame_color = match session.feedback() {
            Some(Feedback::Correct) => Some(colors.correct()),
            Some(Feedback::Wrong) => Some(colors.wrong()),
            None => None,
        };
        let card = TargetCard::new(target, app.letter_case, app.theme)
            .reveal_word(reveal)
            .frame(frame_color);
        frame.render_widget(card, centered_rect(50, 100, parts[0]));
    }

    let panel = SpeechPanel::new(
        session.transcript(),
        session.is_listening(),
        app.speech_available(),
        app.theme,
    )
    .feedback(session.feedback());
    frame.render_widget(panel, parts[1]);
}
