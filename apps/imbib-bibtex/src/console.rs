//! Terminal interaction: picking, confirming and printing
//!
//! Commands talk to the user through the [`Console`] trait so that the
//! integration tests can script the answers.

use std::io::{self, BufRead, Stderr, Stdout, Write};

pub trait Console {
    /// Let the user choose one of `items`; `None` when cancelled
    fn pick(&mut self, prompt: &str, items: &[String]) -> io::Result<Option<usize>>;

    /// Ask a yes/no question; an empty answer gives `default`
    fn confirm(&mut self, question: &str, default: bool) -> io::Result<bool>;

    /// Write command output, followed by a newline unless it ends with one
    fn print(&mut self, text: &str) -> io::Result<()>;
}

/// A line-based console
///
/// Prompts and menus go to `prompt`, command output goes to `output`, so
/// that piping the output of `export` or `ref` stays clean.
pub struct Terminal<R, P, O> {
    input: R,
    prompt: P,
    output: O,
}

impl Terminal<io::StdinLock<'static>, Stderr, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr(), io::stdout())
    }
}

impl<R: BufRead, P: Write, O: Write> Terminal<R, P, O> {
    pub fn new(input: R, prompt: P, output: O) -> Self {
        Self {
            input,
            prompt,
            output,
        }
    }

    pub fn into_parts(self) -> (R, P, O) {
        (self.input, self.prompt, self.output)
    }

    /// Read one trimmed line; `None` at end of input
    fn read_answer(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

impl<R: BufRead, P: Write, O: Write> Console for Terminal<R, P, O> {
    fn pick(&mut self, prompt: &str, items: &[String]) -> io::Result<Option<usize>> {
        match items.len() {
            0 => return Ok(None),
            1 => return Ok(Some(0)),
            _ => {}
        }

        let width = items.len().to_string().len();
        for (index, item) in items.iter().enumerate() {
            writeln!(self.prompt, "{:>width$}. {}", index + 1, item)?;
        }

        loop {
            write!(self.prompt, "{prompt} [1-{}, q to cancel]: ", items.len())?;
            self.prompt.flush()?;

            let Some(answer) = self.read_answer()? else {
                return Ok(None);
            };
            if answer.is_empty() || answer.eq_ignore_ascii_case("q") {
                return Ok(None);
            }
            match answer.parse::<usize>() {
                Ok(n) if (1..=items.len()).contains(&n) => return Ok(Some(n - 1)),
                _ => writeln!(self.prompt, "Please enter a number between 1 and {}", items.len())?,
            }
        }
    }

    fn confirm(&mut self, question: &str, default: bool) -> io::Result<bool> {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        loop {
            write!(self.prompt, "{question} {hint} ")?;
            self.prompt.flush()?;

            let Some(answer) = self.read_answer()? else {
                return Ok(false);
            };
            match answer.to_lowercase().as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => writeln!(self.prompt, "Please answer y or n")?,
            }
        }
    }

    fn print(&mut self, text: &str) -> io::Result<()> {
        self.output.write_all(text.as_bytes())?;
        if !text.ends_with('\n') {
            self.output.write_all(b"\n")?;
        }
        self.output.flush()
    }
}
