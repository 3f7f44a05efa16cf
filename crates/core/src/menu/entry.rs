use std::fmt;

use anyhow::Result;

/// Position reserved for the implicit exit entry.
pub const EXIT_POSITION: usize = 0;
/// Label shown for the implicit exit entry.
pub const EXIT_LABEL: &str = "exit";

/// Callable unit bound into a menu entry.
///
/// `C` is the application context handed to every action, `A` the argument
/// bundle captured when the menu was built and `R` the value returned to
/// whoever opened the menu.
pub type Action<C, A, R> = fn(&mut C, A) -> Result<R>;

/// What selecting an entry does.
pub enum Command<C, A, R> {
    /// End the process through the console's termination collaborator.
    Exit,
    /// Call `action` with a copy of `args`.
    Invoke {
        /// Function to call.
        action: Action<C, A, R>,
        /// Arguments bound when the menu was built.
        args: A,
    },
}

/// One numbered line of a menu.
pub struct MenuEntry<C, A, R> {
    /// Number the user types to select the entry.
    pub position: usize,
    /// Text shown after "select N to".
    pub label: String,
    /// Behaviour on selection.
    pub command: Command<C, A, R>,
}

impl<C, A, R> MenuEntry<C, A, R> {
    /// The implicit exit entry at position 0.
    pub fn exit() -> Self {
        Self {
            position: EXIT_POSITION,
            label: EXIT_LABEL.to_string(),
            command: Command::Exit,
        }
    }

    /// Whether this is the implicit exit entry.
    pub fn is_exit(&self) -> bool {
        matches!(self.command, Command::Exit)
    }
}

impl<C, A: fmt::Debug, R> fmt::Debug for MenuEntry<C, A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("MenuEntry");
        debug.field("position", &self.position).field("label", &self.label);
        match &self.command {
            Command::Exit => debug.field("command", &"exit"),
            Command::Invoke { args, .. } => debug.field("args", args),
        };
        debug.finish()
    }
}
