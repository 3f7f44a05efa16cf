//! Dynamic menu navigation engine.
//!
//! A [`Menu`] turns a caller-built list of (action, label, arguments)
//! entries into a numbered prompt, validates the selection and dispatches
//! exactly one action before handing its result back. Actions may open
//! further menus; each nested [`Menu::run`] is an independent level that
//! `back` unwinds one at a time, while `quit` unwinds all of them.

mod choice;
mod entry;

use anyhow::Result;
use tracing::debug;

use crate::console::Console;

pub use choice::{parse_choice, read_choice, Choice, InvalidChoice, CHOICE_PROMPT, INVALID_CHOICE};
pub use entry::{Action, Command, MenuEntry, EXIT_LABEL, EXIT_POSITION};

/// Line printed after the numbered entries.
pub const NAVIGATION_HINT: &str = "type \"back\" or \"b\" to go back, \"quit\" or \"q\" to exit";

/// Context types the engine can run against.
pub trait MenuHost {
    /// Console used for rendering, reading choices and termination.
    fn console(&mut self) -> &mut Console;
}

impl MenuHost for Console {
    fn console(&mut self) -> &mut Console {
        self
    }
}

/// An ordered registry of entries, built fresh for each invocation.
pub struct Menu<C, A, R> {
    entries: Vec<MenuEntry<C, A, R>>,
}

impl<C, A, R> Default for Menu<C, A, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, A, R> Menu<C, A, R> {
    /// A menu holding only the implicit exit entry.
    pub fn new() -> Self {
        Self {
            entries: vec![MenuEntry::exit()],
        }
    }

    /// Append an entry at the next free position.
    pub fn entry(mut self, action: Action<C, A, R>, label: impl Into<String>, args: A) -> Self {
        let position = self.entries.len();
        self.entries.push(MenuEntry {
            position,
            label: label.into(),
            command: Command::Invoke { action, args },
        });
        self
    }

    /// Entries in render order, exit first.
    pub fn entries(&self) -> &[MenuEntry<C, A, R>] {
        &self.entries
    }

    /// Positions a choice may select.
    pub fn positions(&self) -> Vec<usize> {
        self.entries.iter().map(|entry| entry.position).collect()
    }
}

impl<C: MenuHost, A: Clone, R> Menu<C, A, R> {
    /// Show the menu and run the selected action.
    ///
    /// Returns `Ok(None)` when the user goes back and `Ok(Some(result))`
    /// after one dispatched action. Quit, directly or through the exit
    /// entry, yields the error from [`Console::terminate`]. Action errors
    /// pass through untouched.
    pub fn run(&self, ctx: &mut C) -> Result<Option<R>> {
        let positions = self.positions();
        let console = ctx.console();
        render(console, &self.entries)?;
        match read_choice(console, &positions)? {
            Choice::Back => Ok(None),
            Choice::Quit => Err(console.terminate(None).into()),
            Choice::Number(position) => self.dispatch(ctx, position).map(Some),
        }
    }

    /// Invoke the entry at `position` with its bound arguments.
    pub fn dispatch(&self, ctx: &mut C, position: usize) -> Result<R> {
        let Some(entry) = self.entries.iter().find(|entry| entry.position == position) else {
            anyhow::bail!("no menu entry at position {position}");
        };
        debug!(position, label = %entry.label, "dispatching menu entry");
        ctx.console().blank()?;
        match &entry.command {
            Command::Exit => Err(ctx.console().terminate(None).into()),
            Command::Invoke { action, args } => action(ctx, args.clone()),
        }
    }
}

/// Print one line per entry followed by the navigation hint.
pub fn render<C, A, R>(console: &mut Console, entries: &[MenuEntry<C, A, R>]) -> Result<()> {
    for entry in entries {
        console.line(format_args!("select {} to {}", entry.position, entry.label))?;
    }
    console.line(NAVIGATION_HINT)?;
    Ok(())
}
