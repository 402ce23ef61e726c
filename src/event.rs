use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

pub enum AppEvent {
    Key(KeyEvent),
    /// No input for one tick; drives timers and the recogniser.
    Tick,
    Resize,
}

/// Only key presses matter to the tutor; repeats and releases are dropped so
/// a held key cannot answer twice.
fn translate(event: Event) -> Option<AppEvent> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key)),
        Event::Resize(_, _) => Some(AppEvent::Resize),
        _ => None,
    }
}

pub struct EventHandler {
    rx: mpsc::Receiver<AppEvent>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            loop {
                let next = match event::poll(tick_rate) {
                    Ok(true) => match event::read() {
                        Ok(event) => translate(event),
                        Err(e) => {
                            log::warn!("failed to read terminal event: {e}");
                            None
                        }
                    },
                    Ok(false) => Some(AppEvent::Tick),
                    Err(e) => {
                        log::warn!("failed to poll terminal: {e}");
                        Some(AppEvent::Tick)
                    }
                };
                if let Some(app_event) = next
                    && tx.send(app_event).is_err()
                {
                    return;
                }
            }
        });

        Self { rx }
    }

    pub fn next(&self) -> anyhow::Result<AppEvent> {
        Ok(self.rx.recv()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    #[test]
    fn only_presses_become_keys() {
        let press = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        assert!(matches!(translate(Event::Key(press)), Some(AppEvent::Key(_))));

        let mut release = press;
        release.kind = KeyEventKind::Release;
        assert!(translate(Event::Key(release)).is_none());

        let mut repeat = press;
        repeat.kind = KeyEventKind::Repeat;
        assert!(translate(Event::Key(repeat)).is_none());
    }

    #[test]
    fn resize_passes_through() {
        assert!(matches!(translate(Event::Resize(80, 24)), Some(AppEvent::Resize)));
        assert!(translate(Event::FocusGained).is_none());
    }
}
