//! The operator boundary.
//!
//! The session never touches stdin/stdout directly. It talks to a
//! [`ReviewPort`], which is the terminal in production and a scripted
//! responder in tests.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::path::Path;

use editfx_models::VideoId;

/// What the operator chose to do with a flagged record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Skip,
    Quit,
    Edit,
}

/// Context shown before the skip/quit/edit decision.
#[derive(Debug, Clone, Copy)]
pub struct ReviewPrompt<'a> {
    pub video_id: &'a VideoId,
    /// 1-based position in the queue
    pub position: usize,
    pub total: usize,
    pub reason: &'a str,
    pub media: Option<&'a Path>,
}

/// Synchronous request/response channel to the human reviewer.
pub trait ReviewPort {
    /// Show an informational line.
    fn notice(&mut self, message: &str);

    /// Present a record and wait for a decision.
    fn decide(&mut self, prompt: &ReviewPrompt<'_>) -> io::Result<Decision>;

    /// Ask for one field value. An empty answer means "keep current".
    fn ask(&mut self, prompt: &str) -> io::Result<String>;
}

/// Launch the platform viewer for a media file without waiting on it.
pub fn open_external(path: &Path) -> io::Result<()> {
    open::that_detached(path)
}

/// Line-oriented port over a reader and writer.
pub struct TerminalPort<R, W> {
    input: R,
    output: W,
    open_media: bool,
}

impl TerminalPort<io::StdinLock<'static>, io::Stdout> {
    /// Port over the process's stdin and stdout.
    pub fn stdio(open_media: bool) -> Self {
        Self::new(io::stdin().lock(), io::stdout(), open_media)
    }
}

impl<R: BufRead, W: Write> TerminalPort<R, W> {
    pub fn new(input: R, output: W, open_media: bool) -> Self {
        Self {
            input,
            output,
            open_media,
        }
    }

    /// Returns `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

impl<R: BufRead, W: Write> ReviewPort for TerminalPort<R, W> {
    fn notice(&mut self, message: &str) {
        // Output failures must not abort a review.
        let _ = writeln!(self.output, "{}", message);
    }

    fn decide(&mut self, prompt: &ReviewPrompt<'_>) -> io::Result<Decision> {
        writeln!(self.output, "\n{}", "=".repeat(80))?;
        writeln!(
            self.output,
            "[{}/{}] Reviewing Video ID: {}",
            prompt.position, prompt.total, prompt.video_id
        )?;
        if !prompt.reason.is_empty() {
            writeln!(self.output, "[Anomaly] {}", prompt.reason)?;
        }

        match prompt.media {
            Some(path) => {
                writeln!(self.output, "Opening video: {}", path.display())?;
                if self.open_media {
                    if let Err(e) = open_external(path) {
                        writeln!(self.output, "Could not open video: {}", e)?;
                    }
                }
            }
            None => writeln!(self.output, "(No video file found for this ID.)")?,
        }

        write!(
            self.output,
            "Press 'c' to skip this row, 'q' to quit, or Enter to proceed to editing prompts: "
        )?;
        self.output.flush()?;

        let decision = match self.read_line()?.map(|s| s.to_lowercase()) {
            None => Decision::Quit,
            Some(s) if s == "c" => Decision::Skip,
            Some(s) if s == "q" => Decision::Quit,
            Some(_) => Decision::Edit,
        };
        Ok(decision)
    }

    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        Ok(self.read_line()?.unwrap_or_default())
    }
}

/// Replays canned decisions and answers.
///
/// Once exhausted, decisions default to [`Decision::Quit`] and answers to
/// the empty string.
#[derive(Debug, Default, Clone)]
pub struct ScriptedPort {
    decisions: VecDeque<Decision>,
    answers: VecDeque<String>,
    /// Every notice shown, in order
    pub notices: Vec<String>,
    /// Every field prompt asked, in order
    pub prompts: Vec<String>,
    /// Media paths offered at decision time
    pub media_seen: Vec<Option<String>>,
}

impl ScriptedPort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_decisions(mut self, decisions: impl IntoIterator<Item = Decision>) -> Self {
        self.decisions.extend(decisions);
        self
    }

    pub fn with_answers<S: Into<String>>(mut self, answers: impl IntoIterator<Item = S>) -> Self {
        self.answers.extend(answers.into_iter().map(Into::into));
        self
    }

    /// Answers not yet consumed.
    pub fn remaining_answers(&self) -> usize {
        self.answers.len()
    }
}

impl ReviewPort for ScriptedPort {
    fn notice(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }

    fn decide(&mut self, prompt: &ReviewPrompt<'_>) -> io::Result<Decision> {
        self.media_seen
            .push(prompt.media.map(|p| p.to_string_lossy().into_owned()));
        Ok(self.decisions.pop_front().unwrap_or(Decision::Quit))
    }

    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        self.prompts.push(prompt.to_string());
        Ok(self.answers.pop_front().unwrap_or_default())
    }
}
