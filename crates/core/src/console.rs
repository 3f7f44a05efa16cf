//! Line-oriented terminal I/O shared by the menu engine and every action.
//!
//! The console owns its input, output and exit hook so that flows can be
//! driven from a script in tests instead of a live terminal.

use std::{
    fmt::Display,
    io::{self, BufRead, Write},
};

use tracing::info;

use crate::error::TrackerError;

/// Default border character for framed output.
pub const DEFAULT_FRAME_SYMBOL: char = '-';
/// Default border width for framed output.
pub const DEFAULT_FRAME_WIDTH: usize = 70;

/// Final step of the termination collaborator.
pub trait ExitHook {
    /// End the process. Production hooks never return.
    fn exit(&mut self);
}

/// Exit hook that ends the process with status 0.
#[derive(Debug, Default)]
pub struct ProcessExit;

impl ExitHook for ProcessExit {
    fn exit(&mut self) {
        std::process::exit(0);
    }
}

/// Border drawn above and below bracketed output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Character repeated to build the separator.
    pub symbol: char,
    /// Number of repetitions.
    pub width: usize,
}

impl Frame {
    /// Build a frame from a symbol and width.
    pub fn new(symbol: char, width: usize) -> Self {
        Self { symbol, width }
    }

    /// Render the separator line.
    pub fn separator(&self) -> String {
        std::iter::repeat(self.symbol).take(self.width).collect()
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_SYMBOL, DEFAULT_FRAME_WIDTH)
    }
}

/// Interactive text session over an injected input and output.
pub struct Console {
    input: Box<dyn BufRead>,
    output: Box<dyn Write>,
    exit_hook: Box<dyn ExitHook>,
    frame: Frame,
}

impl Console {
    /// Build a console from explicit parts.
    pub fn new(
        input: Box<dyn BufRead>,
        output: Box<dyn Write>,
        exit_hook: Box<dyn ExitHook>,
    ) -> Self {
        Self {
            input,
            output,
            exit_hook,
            frame: Frame::default(),
        }
    }

    /// Console bound to the process stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(
            Box::new(io::BufReader::new(io::stdin())),
            Box::new(io::stdout()),
            Box::new(ProcessExit),
        )
    }

    /// Replace the border used for bracketed output.
    pub fn with_frame(mut self, frame: Frame) -> Self {
        self.frame = frame;
        self
    }

    /// Write one line.
    pub fn line(&mut self, text: impl Display) -> Result<(), TrackerError> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    /// Write an empty line.
    pub fn blank(&mut self) -> Result<(), TrackerError> {
        writeln!(self.output)?;
        Ok(())
    }

    /// Write the frame separator on its own line.
    pub fn separator(&mut self) -> Result<(), TrackerError> {
        let separator = self.frame.separator();
        self.line(separator)
    }

    /// Write `lines` between two separators.
    pub fn encased<I>(&mut self, lines: I) -> Result<(), TrackerError>
    where
        I: IntoIterator,
        I::Item: Display,
    {
        self.separator()?;
        for line in lines {
            self.line(line)?;
        }
        self.separator()
    }

    /// Show `text` and read one line of input without its line terminator.
    pub fn prompt(&mut self, text: &str) -> Result<String, TrackerError> {
        write!(self.output, "{text}")?;
        self.output.flush()?;

        // Bytes that are not UTF-8 are replaced so the line still reaches the
        // caller's validation instead of failing the read.
        let mut buffer = Vec::new();
        if self.input.read_until(b'\n', &mut buffer)? == 0 {
            return Err(TrackerError::InputClosed);
        }
        let line = String::from_utf8_lossy(&buffer);
        Ok(line.trim_end_matches(['\n', '\r']).to_string())
    }

    /// Print the farewell, wait for acknowledgment and run the exit hook.
    ///
    /// Returns the quit signal for hooks that do come back, so callers can
    /// unwind with `Err(console.terminate(..).into())`.
    pub fn terminate(&mut self, reason: Option<&str>) -> TrackerError {
        info!(reason = reason.unwrap_or("user request"), "terminating session");
        if let Err(err) = self.farewell(reason) {
            tracing::warn!("failed to print farewell: {err}");
        }
        self.exit_hook.exit();
        TrackerError::Terminated
    }

    fn farewell(&mut self, reason: Option<&str>) -> Result<(), TrackerError> {
        self.line("The program has ended.")?;
        if let Some(reason) = reason {
            self.line("This was for the following reason:")?;
            self.line(reason)?;
            self.blank()?;
        }
        match self.prompt("Press Enter to exit...") {
            Ok(_) | Err(TrackerError::InputClosed) => Ok(()),
            Err(err) => Err(err),
        }
    }
}

/// Scripted consoles for exercising interactive flows.
#[cfg(any(test, feature = "test-support"))]
pub mod testing {
    use std::{
        cell::{Cell, RefCell},
        io::{self, Cursor, Write},
        rc::Rc,
    };

    use super::{Console, ExitHook};

    /// Output buffer that stays readable after the console takes ownership.
    #[derive(Debug, Clone, Default)]
    pub struct Transcript(Rc<RefCell<Vec<u8>>>);

    impl Transcript {
        /// Everything written so far.
        pub fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.borrow()).into_owned()
        }

        /// Number of non-overlapping occurrences of `needle`.
        pub fn count(&self, needle: &str) -> usize {
            self.contents().matches(needle).count()
        }

        /// Whether `needle` was written.
        pub fn contains(&self, needle: &str) -> bool {
            self.contents().contains(needle)
        }
    }

    impl Write for Transcript {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Exit hook that only counts invocations.
    #[derive(Debug, Clone, Default)]
    pub struct ExitCounter(Rc<Cell<usize>>);

    impl ExitCounter {
        /// How many times the hook ran.
        pub fn count(&self) -> usize {
            self.0.get()
        }
    }

    impl ExitHook for ExitCounter {
        fn exit(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    /// Console fed from `lines`, one entry per input line.
    pub fn scripted(lines: &[&str]) -> (Console, Transcript, ExitCounter) {
        let mut input = String::new();
        for line in lines {
            input.push_str(line);
            input.push('\n');
        }
        scripted_bytes(input.into_bytes())
    }

    /// Console fed from raw input bytes.
    pub fn scripted_bytes(input: Vec<u8>) -> (Console, Transcript, ExitCounter) {
        let transcript = Transcript::default();
        let exits = ExitCounter::default();
        let console = Console::new(
            Box::new(Cursor::new(input)),
            Box::new(transcript.clone()),
            Box::new(exits.clone()),
        );
        (console, transcript, exits)
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{self, scripted};
    use super::*;

    #[test]
    fn encased_frames_each_line() -> anyhow::Result<()> {
        let (mut console, transcript, _) = scripted(&[]);
        console.encased(["first", "second"])?;
        let separator = "-".repeat(70);
        assert_eq!(
            transcript.contents(),
            format!("{separator}\nfirst\nsecond\n{separator}\n")
        );
        Ok(())
    }

    #[test]
    fn encased_without_lines_writes_two_separators() -> anyhow::Result<()> {
        let (console, transcript, _) = scripted(&[]);
        let mut console = console.with_frame(Frame::new('=', 5));
        console.encased(std::iter::empty::<&str>())?;
        assert_eq!(transcript.contents(), "=====\n=====\n");
        Ok(())
    }

    #[test]
    fn prompt_strips_line_terminator() -> anyhow::Result<()> {
        let (mut console, transcript, _) = scripted(&["  hello  "]);
        let answer = console.prompt("Name: ")?;
        assert_eq!(answer, "  hello  ");
        assert_eq!(transcript.contents(), "Name: ");
        Ok(())
    }

    #[test]
    fn prompt_replaces_invalid_utf8() -> anyhow::Result<()> {
        let (mut console, _, _) = testing::scripted_bytes(vec![b'a', 0xff, b'b', b'\r', b'\n', b'c']);
        assert_eq!(console.prompt("> ")?, "a\u{fffd}b");
        assert_eq!(console.prompt("> ")?, "c");
        Ok(())
    }

    #[test]
    fn prompt_reports_closed_input() {
        let (mut console, _, _) = scripted(&[]);
        assert!(matches!(
            console.prompt("Name: "),
            Err(TrackerError::InputClosed)
        ));
    }

    #[test]
    fn terminate_prints_reason_and_waits_once() {
        let (mut console, transcript, exits) = scripted(&[""]);
        let signal = console.terminate(Some("Too many unsuccessful login attempts"));
        assert!(signal.is_terminated());
        assert_eq!(exits.count(), 1);
        let output = transcript.contents();
        assert!(output.starts_with("The program has ended.\nThis was for the following reason:\n"));
        assert!(output.contains("Too many unsuccessful login attempts"));
        assert!(output.ends_with("Press Enter to exit..."));
    }

    #[test]
    fn terminate_tolerates_closed_input() {
        let (mut console, transcript, exits) = scripted(&[]);
        console.terminate(None);
        assert_eq!(exits.count(), 1);
        assert!(!transcript.contains("following reason"));
    }
}
