//! Applies shell commands to the screen and produces what to print.

use personas_core::{CommitOutcome, FetchOutcome, PersonasScreen, Transport};

use crate::command::{Command, HELP};
use crate::render;

/// Screens reachable from the shell. The registry list is the only one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Personas,
}

impl Route {
    pub const INITIAL: Route = Route::Personas;

    pub fn title(self) -> &'static str {
        match self {
            Route::Personas => "Lista de Personas",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue(String),
    Quit,
}

pub struct Shell<T> {
    route: Route,
    screen: PersonasScreen,
    transport: T,
}

impl<T: Transport> Shell<T> {
    pub fn new(screen: PersonasScreen, transport: T) -> Self {
        Self {
            route: Route::INITIAL,
            screen,
            transport,
        }
    }

    pub fn screen(&self) -> &PersonasScreen {
        &self.screen
    }

    /// Initial load and first render.
    pub fn mount(&mut self) -> String {
        let outcome = self.screen.mount(&mut self.transport);
        self.render_with(fetch_note(&outcome))
    }

    pub fn apply(&mut self, command: Command) -> Flow {
        let note = match command {
            Command::Quit => return Flow::Quit,
            Command::Help => return Flow::Continue(HELP.to_string()),
            Command::Show => None,
            Command::More => {
                let last = self.screen.displayed_len().saturating_sub(1);
                let outcome = self.screen.on_scroll(&mut self.transport, last);
                fetch_note(&outcome)
            }
            Command::Scroll(row) => {
                let outcome = self.screen.on_scroll(&mut self.transport, row.saturating_sub(1));
                fetch_note(&outcome)
            }
            Command::ToggleRuc => {
                self.screen.toggle_ruc_filter();
                None
            }
            Command::ToggleVerified => {
                self.screen.toggle_verified_filter();
                None
            }
            Command::Edit(row) => {
                if row.checked_sub(1).is_some_and(|index| self.screen.open_row(index)) {
                    None
                } else {
                    Some(format!("no row {row}"))
                }
            }
            Command::Set { field, value } => match self.screen.set_field_by_name(&field, value) {
                Ok(()) => None,
                Err(err) => Some(err.to_string()),
            },
            Command::Save => match self.screen.commit(&mut self.transport) {
                CommitOutcome::Replaced(_) => Some("saved".to_string()),
                CommitOutcome::Unmatched => Some("saved; record is not in the loaded list".to_string()),
                CommitOutcome::Failed(err) => Some(format!("save failed: {err}")),
            },
            Command::Close => {
                self.screen.cancel_edit();
                None
            }
        };
        Flow::Continue(self.render_with(note))
    }

    fn render_with(&self, note: Option<String>) -> String {
        let mut out = format!("== {} ==\n{}", self.route.title(), render::screen(&self.screen));
        if let Some(modal) = render::modal(&self.screen) {
            out.push('\n');
            out.push_str(&modal);
        }
        if let Some(note) = note {
            out.push('\n');
            out.push_str(&note);
        }
        out
    }
}

fn fetch_note(outcome: &FetchOutcome) -> Option<String> {
    match outcome {
        FetchOutcome::Appended(_) | FetchOutcome::Skipped => None,
        FetchOutcome::Exhausted => Some("no more personas".to_string()),
        FetchOutcome::Failed(err) => Some(format!("could not load personas: {err}")),
    }
}
