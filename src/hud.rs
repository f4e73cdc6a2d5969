use crate::round::GameEvent;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Screen {
    Start,
    GameOver,
    Victory,
}

impl Screen {
    #[allow(dead_code)]
    pub fn element_id(self) -> &'static str {
        match self {
            Screen::Start => "startScreen",
            Screen::GameOver => "gameOverScreen",
            Screen::Victory => "victoryScreen",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Track {
    Gameplay,
    Menu,
}

impl Track {
    #[allow(dead_code)]
    pub fn element_id(self) -> &'static str {
        match self {
            Track::Gameplay => "bgMusic",
            Track::Menu => "musicStart",
        }
    }
}

/// Player-triggered round commands (start/reset buttons).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostCommand {
    Start,
    Reset,
}

/// Overlay screens and music owned by the host page or window.
pub trait Frontend {
    fn set_screen_visible(&mut self, screen: Screen, visible: bool);
    fn play(&mut self, track: Track);
    fn pause(&mut self, track: Track);
}

pub fn present(frontend: &mut impl Frontend, event: GameEvent) {
    match event {
        GameEvent::RoundStarted => {
            frontend.set_screen_visible(Screen::Start, false);
            frontend.play(Track::Gameplay);
        }
        GameEvent::Victory => {
            frontend.set_screen_visible(Screen::Victory, true);
            frontend.play(Track::Menu);
            frontend.pause(Track::Gameplay);
        }
        GameEvent::GameOver => {
            frontend.set_screen_visible(Screen::GameOver, true);
            frontend.play(Track::Menu);
            frontend.pause(Track::Gameplay);
        }
        GameEvent::RoundReset => {
            frontend.set_screen_visible(Screen::GameOver, false);
            frontend.set_screen_visible(Screen::Victory, false);
            frontend.play(Track::Gameplay);
            frontend.pause(Track::Menu);
        }
    }
}

/// Desktop stand-in: the visible screen becomes the window title and music
/// changes are logged.
#[cfg(not(target_arch = "wasm32"))]
pub struct WindowFrontend {
    window: std::sync::Arc<winit::window::Window>,
    visible: Option<Screen>,
}

#[cfg(not(target_arch = "wasm32"))]
impl WindowFrontend {
    pub fn new(window: std::sync::Arc<winit::window::Window>) -> Self {
        let mut frontend = Self {
            window,
            visible: None,
        };
        frontend.set_screen_visible(Screen::Start, true);
        frontend
    }

    fn refresh_title(&self) {
        let title = match self.visible {
            Some(Screen::Start) => "Ducky Chase - press Enter to play",
            Some(Screen::GameOver) => "Ducky Chase - caught! press R to retry",
            Some(Screen::Victory) => "Ducky Chase - you escaped! press R to play again",
            None => "Ducky Chase",
        };
        self.window.set_title(title);
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Frontend for WindowFrontend {
    fn set_screen_visible(&mut self, screen: Screen, visible: bool) {
        if visible {
            self.visible = Some(screen);
        } else if self.visible == Some(screen) {
            self.visible = None;
        }
        self.refresh_title();
    }

    fn play(&mut self, track: Track) {
        log::info!("Music: {:?} playing", track);
    }

    fn pause(&mut self, track: Track) {
        log::debug!("Music: {:?} paused", track);
    }
}

#[cfg(target_arch = "wasm32")]
pub use dom::{DomFrontend, bind_buttons};

#[cfg(target_arch = "wasm32")]
mod dom {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::closure::Closure;
    use web_sys::{Document, HtmlAudioElement, HtmlElement};

    use super::{Frontend, HostCommand, Screen, Track};

    fn document() -> Option<Document> {
        web_sys::window().and_then(|w| w.document())
    }

    /// Overlay panels and `<audio>` elements of the host page, by element id.
    pub struct DomFrontend;

    impl Frontend for DomFrontend {
        fn set_screen_visible(&mut self, screen: Screen, visible: bool) {
            let Some(panel) = document()
                .and_then(|d| d.get_element_by_id(screen.element_id()))
                .and_then(|e| e.dyn_into::<HtmlElement>().ok())
            else {
                log::warn!("No overlay #{}", screen.element_id());
                return;
            };
            let display = if visible { "flex" } else { "none" };
            if let Err(e) = panel.style().set_property("display", display) {
                log::warn!("Could not toggle #{}: {:?}", screen.element_id(), e);
            }
        }

        fn play(&mut self, track: Track) {
            if let Some(audio) = audio_element(track) {
                // Autoplay may be refused until the first click
                if let Err(e) = audio.play() {
                    log::warn!("Could not play #{}: {:?}", track.element_id(), e);
                }
            }
        }

        fn pause(&mut self, track: Track) {
            if let Some(audio) = audio_element(track) {
                if let Err(e) = audio.pause() {
                    log::warn!("Could not pause #{}: {:?}", track.element_id(), e);
                }
            }
        }
    }

    fn audio_element(track: Track) -> Option<HtmlAudioElement> {
        document()
            .and_then(|d| d.get_element_by_id(track.element_id()))
            .and_then(|e| e.dyn_into::<HtmlAudioElement>().ok())
    }

    /// Wires the page's play/reset buttons to a command queue drained by the
    /// frame loop.
    pub fn bind_buttons(queue: Rc<RefCell<Vec<HostCommand>>>) {
        let bindings = [
            ("playBtn", HostCommand::Start),
            ("resetBtn", HostCommand::Reset),
            ("victoryResetBtn", HostCommand::Reset),
        ];
        for (id, command) in bindings {
            let Some(button) = document().and_then(|d| d.get_element_by_id(id)) else {
                log::warn!("No button #{}", id);
                continue;
            };
            let queue = queue.clone();
            let on_click = Closure::<dyn FnMut()>::new(move || {
                queue.borrow_mut().push(command);
            });
            if let Err(e) =
                button.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())
            {
                log::error!("Failed to bind #{}: {:?}", id, e);
            }
            on_click.forget();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[derive(Default)]
    struct Recorder {
        visible: HashSet<Screen>,
        playing: HashSet<Track>,
    }

    impl Frontend for Recorder {
        fn set_screen_visible(&mut self, screen: Screen, visible: bool) {
            if visible {
                self.visible.insert(screen);
            } else {
                self.visible.remove(&screen);
            }
        }

        fn play(&mut self, track: Track) {
            self.playing.insert(track);
        }

        fn pause(&mut self, track: Track) {
            self.playing.remove(&track);
        }
    }

    #[test]
    fn start_hides_menu_and_plays_music() {
        let mut ui = Recorder::default();
        ui.visible.insert(Screen::Start);
        present(&mut ui, GameEvent::RoundStarted);
        assert!(ui.visible.is_empty());
        assert_eq!(ui.playing, HashSet::from([Track::Gameplay]));
    }

    #[test]
    fn round_end_swaps_tracks() {
        for (event, screen) in [
            (GameEvent::Victory, Screen::Victory),
            (GameEvent::GameOver, Screen::GameOver),
        ] {
            let mut ui = Recorder::default();
            present(&mut ui, GameEvent::RoundStarted);
            present(&mut ui, event);
            assert_eq!(ui.visible, HashSet::from([screen]));
            assert_eq!(ui.playing, HashSet::from([Track::Menu]));
        }
    }

    #[test]
    fn reset_hides_end_screens_and_resumes_music() {
        let mut ui = Recorder::default();
        present(&mut ui, GameEvent::RoundStarted);
        present(&mut ui, GameEvent::Victory);
        present(&mut ui, GameEvent::RoundReset);
        assert!(ui.visible.is_empty());
        assert_eq!(ui.playing, HashSet::from([Track::Gameplay]));
    }
}
