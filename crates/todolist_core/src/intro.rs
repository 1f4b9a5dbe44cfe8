/// Static copy shown on the welcome screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntroScreen {
    pub title: &'static str,
    pub tagline: &'static str,
    pub call_to_action: &'static str,
    pub footer: &'static str,
}

pub const INTRO_SCREEN: IntroScreen = IntroScreen {
    title: "To-Do List",
    tagline: "Stay organized, track tasks, and boost your productivity!",
    call_to_action: "Get Started",
    footer: "Designed to keep you on track!",
};

/// Welcome screen that hands control to its owner through `on_start`.
pub struct IntroGate<F: FnMut()> {
    on_start: F,
}

impl<F: FnMut()> IntroGate<F> {
    pub fn new(on_start: F) -> Self {
        Self { on_start }
    }

    pub fn screen(&self) -> &'static IntroScreen {
        &INTRO_SCREEN
    }

    pub fn activate(&mut self) {
        tracing::debug!("intro activated");
        (self.on_start)();
    }
}
