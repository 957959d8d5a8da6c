//! Lexical analysis of a single input line into an argument vector.
//!
//! Quoting follows a simplified POSIX model: backslash escapes outside quotes,
//! literal single quotes, and double quotes with a small set of escapable
//! characters. An unterminated quote is not an error; whatever was collected
//! up to the end of the line becomes the last word.

/// Quoting context of the character currently being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexState {
    Unquoted,
    SingleQuoted,
    DoubleQuoted,
}

/// Full state of the lexing machine between two characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexingState {
    pub quote: LexState,
    /// The previous character was a backslash whose meaning depends on the next one.
    pub pending_escape: bool,
}

impl LexingState {
    pub const START: LexingState = LexingState {
        quote: LexState::Unquoted,
        pending_escape: false,
    };

    fn new(quote: LexState) -> Self {
        Self {
            quote,
            pending_escape: false,
        }
    }

    fn escaping(quote: LexState) -> Self {
        Self {
            quote,
            pending_escape: true,
        }
    }
}

/// Effect of a single transition on the word being accumulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emit {
    Nothing,
    Push(char),
    /// A backslash kept literally, followed by the character after it.
    PushPair(char, char),
    /// Unquoted whitespace: the current word, if any, is complete.
    EndWord,
}

/// Characters a backslash can escape inside double quotes.
const DOUBLE_QUOTE_ESCAPABLE: [char; 4] = ['\\', '$', '"', '\n'];

/// The transition function of the lexer.
///
/// Pure in `state` and `ch`; the caller owns the word buffer and applies the
/// returned [`Emit`] to it.
pub fn step(state: LexingState, ch: char) -> (LexingState, Emit) {
    use LexState::*;

    match (state.quote, state.pending_escape) {
        (Unquoted, true) => (LexingState::new(Unquoted), Emit::Push(ch)),
        (Unquoted, false) => match ch {
            '\\' => (LexingState::escaping(Unquoted), Emit::Nothing),
            '\'' => (LexingState::new(SingleQuoted), Emit::Nothing),
            '"' => (LexingState::new(DoubleQuoted), Emit::Nothing),
            c if c.is_whitespace() => (state, Emit::EndWord),
            c => (state, Emit::Push(c)),
        },
        (SingleQuoted, _) => match ch {
            '\'' => (LexingState::new(Unquoted), Emit::Nothing),
            c => (state, Emit::Push(c)),
        },
        (DoubleQuoted, true) if DOUBLE_QUOTE_ESCAPABLE.contains(&ch) => {
            (LexingState::new(DoubleQuoted), Emit::Push(ch))
        }
        (DoubleQuoted, true) => (LexingState::new(DoubleQuoted), Emit::PushPair('\\', ch)),
        (DoubleQuoted, false) => match ch {
            '"' => (LexingState::new(Unquoted), Emit::Nothing),
            '\\' => (LexingState::escaping(DoubleQuoted), Emit::Nothing),
            c => (state, Emit::Push(c)),
        },
    }
}

/// A completed word and the byte offset just past its last character.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Word {
    text: String,
    end: usize,
}

struct LexingFSM<'a> {
    input: &'a str,
    state: LexingState,
    buffer: String,
}

impl<'a> LexingFSM<'a> {
    fn new(input: &'a str) -> Self {
        LexingFSM {
            input,
            state: LexingState::START,
            buffer: String::new(),
        }
    }

    /// Runs the machine over the whole input, stopping early once `limit` words are complete.
    fn make_words(mut self, limit: Option<usize>) -> (Vec<Word>, LexingState) {
        let mut out = Vec::new();

        for (pos, ch) in self.input.char_indices() {
            let (next, emit) = step(self.state, ch);
            self.state = next;
            match emit {
                Emit::Nothing => {}
                Emit::Push(c) => self.buffer.push(c),
                Emit::PushPair(a, b) => {
                    self.buffer.push(a);
                    self.buffer.push(b);
                }
                Emit::EndWord => {
                    if !self.buffer.is_empty() {
                        out.push(Word {
                            text: std::mem::take(&mut self.buffer),
                            end: pos,
                        });
                        if limit.is_some_and(|n| out.len() >= n) {
                            return (out, self.state);
                        }
                    }
                }
            }
        }

        // A dangling backslash inside double quotes has nothing to escape.
        if self.state == LexingState::escaping(LexState::DoubleQuoted) {
            self.buffer.push('\\');
        }
        if !self.buffer.is_empty() {
            out.push(Word {
                text: std::mem::take(&mut self.buffer),
                end: self.input.len(),
            });
        }

        (out, self.state)
    }
}

/// Splits `line` into its argument vector.
///
/// An empty or all-whitespace line yields an empty vector.
pub fn tokenize(line: &str) -> Vec<String> {
    tokenize_with_state(line).0
}

/// Like [`tokenize`], also returning the state the machine ended in.
///
/// A final state other than [`LexState::Unquoted`] means the line ended inside
/// an unterminated quote, which is tolerated.
pub fn tokenize_with_state(line: &str) -> (Vec<String>, LexingState) {
    let (words, state) = LexingFSM::new(line).make_words(None);
    (words.into_iter().map(|w| w.text).collect(), state)
}

/// Splits off the first word of `line`, returning it with the raw, unlexed rest of the line.
///
/// Returns `None` when the line holds no words at all.
pub fn split_command(line: &str) -> Option<(String, &str)> {
    let (mut words, _) = LexingFSM::new(line).make_words(Some(1));
    if words.is_empty() {
        return None;
    }
    let Word { text, end } = words.swap_remove(0);
    Some((text, &line[end..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_quotes_keep_spaces() {
        assert_eq!(tokenize("echo 'a b' c"), vec!["echo", "a b", "c"]);
    }

    #[test]
    fn escaped_quote_inside_double_quotes() {
        assert_eq!(tokenize(r#""a\"b""#), vec![r#"a"b"#]);
    }

    #[test]
    fn adjacent_spans_concatenate() {
        assert_eq!(tokenize("a'b'c"), vec!["abc"]);
        assert_eq!(tokenize(r#"'x'"y"z"#), vec!["xyz"]);
    }

    #[test]
    fn empty_and_blank_lines_have_no_tokens() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t  ").is_empty());
    }

    #[test]
    fn whitespace_runs_collapse() {
        assert_eq!(tokenize("  a   b\tc  "), vec!["a", "b", "c"]);
    }

    #[test]
    fn backslash_outside_quotes_escapes_anything() {
        assert_eq!(tokenize(r"a\ b"), vec!["a b"]);
        assert_eq!(tokenize(r"\'x\'"), vec!["'x'"]);
        assert_eq!(tokenize(r"\\n"), vec![r"\n"]);
        assert_eq!(tokenize(r"world\n"), vec!["worldn"]);
    }

    #[test]
    fn trailing_backslash_outside_quotes_is_dropped() {
        assert_eq!(tokenize("abc\\"), vec!["abc"]);
    }

    #[test]
    fn backslash_is_literal_in_single_quotes() {
        assert_eq!(tokenize(r"'a\nb'"), vec![r"a\nb"]);
        assert_eq!(tokenize(r"'a\'"), vec![r"a\"]);
    }

    #[test]
    fn double_quote_escapes_only_special_characters() {
        assert_eq!(tokenize(r#""a\\b""#), vec![r"a\b"]);
        assert_eq!(tokenize(r#""\$HOME""#), vec!["$HOME"]);
        assert_eq!(tokenize(r#""a\nb""#), vec![r"a\nb"]);
        assert_eq!(tokenize("\"a\\\nb\""), vec!["a\nb"]);
    }

    #[test]
    fn quotes_of_the_other_kind_are_literal() {
        assert_eq!(tokenize(r#"'say "hi"'"#), vec![r#"say "hi""#]);
        assert_eq!(tokenize(r#""it's""#), vec!["it's"]);
    }

    #[test]
    fn empty_quotes_produce_no_token() {
        assert_eq!(tokenize("a '' b"), vec!["a", "b"]);
    }

    #[test]
    fn unterminated_quotes_are_tolerated() {
        let (tokens, state) = tokenize_with_state("echo 'abc def");
        assert_eq!(tokens, vec!["echo", "abc def"]);
        assert_eq!(state.quote, LexState::SingleQuoted);

        let (tokens, state) = tokenize_with_state(r#"x "a\"#);
        assert_eq!(tokens, vec!["x", r"a\"]);
        assert_eq!(state.quote, LexState::DoubleQuoted);
    }

    #[test]
    fn step_is_a_pure_transition() {
        let s = LexingState::START;
        assert_eq!(step(s, ' '), (s, Emit::EndWord));
        assert_eq!(
            step(s, '\\'),
            (LexingState::escaping(LexState::Unquoted), Emit::Nothing)
        );
        assert_eq!(
            step(LexingState::escaping(LexState::Unquoted), ' '),
            (s, Emit::Push(' '))
        );
        assert_eq!(
            step(LexingState::escaping(LexState::DoubleQuoted), 'q'),
            (LexingState::new(LexState::DoubleQuoted), Emit::PushPair('\\', 'q'))
        );
    }

    #[test]
    fn split_command_returns_raw_rest() {
        let (name, rest) = split_command("  echo   'a  b'  c").unwrap();
        assert_eq!(name, "echo");
        assert_eq!(rest, "   'a  b'  c");
        assert_eq!(tokenize(rest), vec!["a  b", "c"]);
    }

    #[test]
    fn split_command_on_quoted_name() {
        let (name, rest) = split_command("'my prog' x").unwrap();
        assert_eq!(name, "my prog");
        assert_eq!(rest, " x");

        let (name, rest) = split_command("pwd").unwrap();
        assert_eq!(name, "pwd");
        assert_eq!(rest, "");

        assert!(split_command("   ").is_none());
    }
}
