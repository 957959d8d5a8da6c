use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::{BufRead, Write};

/// Result of asking for one more line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Line(String),
    /// The user abandoned the current line (Ctrl-C).
    Interrupted,
    Eof,
}

/// Source of command lines for the read-eval-print loop.
pub trait LineReader {
    /// Shows `prompt` and reads one line, without its line terminator.
    ///
    /// Readers that do not draw their own prompt write it to `out`.
    fn read_line(&mut self, prompt: &str, out: &mut dyn Write) -> anyhow::Result<ReadOutcome>;
}

/// Line editor with history, used when standard input is a terminal.
pub struct EditorReader {
    editor: DefaultEditor,
}

impl EditorReader {
    pub fn new() -> rustyline::Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl LineReader for EditorReader {
    fn read_line(&mut self, prompt: &str, _out: &mut dyn Write) -> anyhow::Result<ReadOutcome> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    self.editor.add_history_entry(line.as_str())?;
                }
                Ok(ReadOutcome::Line(line))
            }
            Err(ReadlineError::Interrupted) => Ok(ReadOutcome::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadOutcome::Eof),
            Err(err) => Err(err.into()),
        }
    }
}

/// Plain buffered reader, used for pipes, files and tests.
pub struct PlainReader<R> {
    input: R,
}

impl<R: BufRead> PlainReader<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }
}

impl<R: BufRead> LineReader for PlainReader<R> {
    fn read_line(&mut self, prompt: &str, out: &mut dyn Write) -> anyhow::Result<ReadOutcome> {
        write!(out, "{prompt}")?;
        out.flush()?;

        // Bytes that are not UTF-8 become U+FFFD instead of ending the session.
        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            return Ok(ReadOutcome::Eof);
        }
        let line = buf.strip_suffix(b"\n").unwrap_or(&buf[..]);
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        Ok(ReadOutcome::Line(String::from_utf8_lossy(line).into_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn plain_reader_writes_prompt_and_strips_terminator() {
        let mut reader = PlainReader::new(Cursor::new("echo 'a '\r\nlast"));
        let mut out = Vec::new();

        assert_eq!(
            reader.read_line("$ ", &mut out).unwrap(),
            ReadOutcome::Line("echo 'a '".into())
        );
        assert_eq!(
            reader.read_line("$ ", &mut out).unwrap(),
            ReadOutcome::Line("last".into())
        );
        assert_eq!(reader.read_line("$ ", &mut out).unwrap(), ReadOutcome::Eof);
        assert_eq!(String::from_utf8(out).unwrap(), "$ $ $ ");
    }

    #[test]
    fn plain_reader_replaces_invalid_utf8() {
        let mut reader = PlainReader::new(Cursor::new(b"echo \xff\nnext\n".to_vec()));
        let mut out = Vec::new();

        assert_eq!(
            reader.read_line("$ ", &mut out).unwrap(),
            ReadOutcome::Line("echo \u{FFFD}".into())
        );
        assert_eq!(
            reader.read_line("$ ", &mut out).unwrap(),
            ReadOutcome::Line("next".into())
        );
    }
}
