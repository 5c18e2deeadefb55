//! Interactive questions and their validation loops.
//!
//! A [`Prompt`] asks one question and returns one line of input, or `None`
//! once input is exhausted. The `ask_*` functions wrap a prompt in a loop
//! that re-asks until the answer is valid, writing a short complaint to the
//! output between attempts. End of input always surfaces as `Ok(None)` so a
//! session can stop cleanly instead of spinning.

use std::collections::{BTreeSet, VecDeque};
use std::io::{self, BufRead, Write};

use crate::duplicates::SortOrder;
use crate::selection::{parse_selection, SelectionError};

/// Source of answers for the interactive session.
pub trait Prompt {
    /// Show `question` and read one line of input.
    ///
    /// Returns `Ok(None)` at end of input. The line ending is stripped.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors from the underlying streams.
    fn ask(&mut self, question: &str) -> io::Result<Option<String>>;
}

/// Prompt over any line reader and writer.
#[derive(Debug)]
pub struct LinePrompt<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    /// Create a prompt reading from `reader` and echoing questions to `writer`.
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }
}

impl<R: BufRead, W: Write> Prompt for LinePrompt<R, W> {
    fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        writeln!(self.writer, "{question}")?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}

/// Prompt bound to the process's standard streams.
pub type StdinPrompt = LinePrompt<io::StdinLock<'static>, io::Stdout>;

impl StdinPrompt {
    /// Prompt on stdin/stdout.
    #[must_use]
    pub fn stdio() -> Self {
        LinePrompt::new(io::stdin().lock(), io::stdout())
    }
}

/// Prompt that replays canned answers, recording the questions asked.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
    /// Every question asked so far, in order.
    pub asked: Vec<String>,
}

impl ScriptedPrompt {
    /// Create a prompt that answers with `answers` in order, then ends.
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    /// Answers not consumed yet.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Prompt for ScriptedPrompt {
    fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        self.asked.push(question.to_string());
        Ok(self.answers.pop_front())
    }
}

/// Ask which file-name suffix to scan for. Any answer is accepted.
///
/// # Errors
///
/// Propagates prompt I/O errors.
pub fn ask_suffix<P: Prompt + ?Sized>(prompt: &mut P) -> io::Result<Option<String>> {
    Ok(prompt
        .ask("Enter file format:")?
        .map(|answer| answer.trim().to_string()))
}

/// Ask for the size sort direction: `1` descending, `2` ascending.
///
/// # Errors
///
/// Propagates prompt and output I/O errors.
pub fn ask_sort_order<P: Prompt + ?Sized, W: Write>(
    prompt: &mut P,
    out: &mut W,
) -> io::Result<Option<SortOrder>> {
    writeln!(out, "Size sorting options:")?;
    writeln!(out, "1. Descending")?;
    writeln!(out, "2. Ascending")?;
    writeln!(out)?;
    loop {
        let Some(answer) = prompt.ask("Enter a sorting option:")? else {
            return Ok(None);
        };
        match answer.trim() {
            "1" => return Ok(Some(SortOrder::Descending)),
            "2" => return Ok(Some(SortOrder::Ascending)),
            _ => {
                writeln!(out)?;
                writeln!(out, "Wrong option")?;
                writeln!(out)?;
            }
        }
    }
}

/// Ask a yes/no question. Accepts `y`, `yes`, `n`, `no` in any case.
///
/// # Errors
///
/// Propagates prompt and output I/O errors.
pub fn ask_yes_no<P: Prompt + ?Sized, W: Write>(
    prompt: &mut P,
    out: &mut W,
    question: &str,
) -> io::Result<Option<bool>> {
    writeln!(out)?;
    loop {
        let Some(answer) = prompt.ask(question)? else {
            return Ok(None);
        };
        match answer.trim().to_lowercase().as_str() {
            "y" | "yes" => return Ok(Some(true)),
            "n" | "no" => return Ok(Some(false)),
            _ => {
                writeln!(out)?;
                writeln!(out, "Wrong option (Enter y/n)")?;
                writeln!(out)?;
            }
        }
    }
}

/// Ask which of `count` listed files to delete.
///
/// Returns 0-based indices.
///
/// # Errors
///
/// Propagates prompt and output I/O errors.
pub fn ask_selection<P: Prompt + ?Sized, W: Write>(
    prompt: &mut P,
    out: &mut W,
    count: usize,
) -> io::Result<Option<BTreeSet<usize>>> {
    writeln!(out)?;
    loop {
        let Some(answer) = prompt.ask("Enter file numbers to delete:")? else {
            return Ok(None);
        };
        match parse_selection(&answer, count) {
            Ok(selection) => return Ok(Some(selection)),
            Err(e) => {
                log::debug!("Rejected selection {:?}: {}", answer, e);
                writeln!(out)?;
                match e {
                    SelectionError::Empty => writeln!(out, "Wrong option")?,
                    SelectionError::InvalidToken { .. } => writeln!(out, "Wrong option: {e}")?,
                }
                writeln!(out)?;
            }
        }
    }
}
