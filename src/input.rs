//! Line input for the terminal prompter: interactive, recorded, or replayed.
//!
//! Recording writes every answered line to a file; replaying feeds those lines
//! back in order, so a resolution session can be reproduced exactly.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Where prompt answers come from.
pub struct InputManager {
    mode: InputMode,
}

enum InputMode {
    /// Read from stdin.
    Interactive,
    /// Read from stdin and append each line to a file.
    Record { file: BufWriter<File> },
    /// Read from a prepared list of lines.
    Replay { lines: Vec<String>, index: usize },
}

impl InputManager {
    pub fn interactive() -> Self {
        Self {
            mode: InputMode::Interactive,
        }
    }

    pub fn record(path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            mode: InputMode::Record {
                file: BufWriter::new(file),
            },
        })
    }

    /// Replay answers from a file. Lines starting with `#` are comments;
    /// empty lines are kept since an empty answer commits a prompt.
    pub fn replay(path: &Path) -> io::Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let mut lines = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if !line.trim().starts_with('#') {
                lines.push(line);
            }
        }
        Ok(Self::from_lines(lines))
    }

    /// Replay answers held in memory.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            mode: InputMode::Replay {
                lines: lines.into_iter().map(Into::into).collect(),
                index: 0,
            },
        }
    }

    /// Read one line without its trailing newline.
    pub fn read_line(&mut self) -> io::Result<String> {
        match &mut self.mode {
            InputMode::Interactive => read_stdin_line(),
            InputMode::Record { file } => {
                let input = read_stdin_line()?;
                writeln!(file, "{}", input)?;
                file.flush()?;
                Ok(input)
            }
            InputMode::Replay { lines, index } => match lines.get(*index) {
                Some(line) => {
                    *index += 1;
                    Ok(line.clone())
                }
                None => Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "replay inputs exhausted",
                )),
            },
        }
    }

    /// Whether answers come from a replay rather than a live operator.
    pub fn is_replaying(&self) -> bool {
        matches!(self.mode, InputMode::Replay { .. })
    }
}

fn read_stdin_line() -> io::Result<String> {
    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "standard input closed",
        ));
    }
    Ok(input.trim_end_matches(['\r', '\n']).to_string())
}
