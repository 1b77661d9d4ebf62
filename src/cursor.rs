//! Cursor-based tokenizer over an apk version string.
//!
//! The comparison algorithm never materializes a token sequence; it pulls one
//! token at a time from a cursor that owns nothing but a byte view of the
//! version string and an offset into it.

/// Classification of the substring a cursor produces next.
///
/// The order is load-bearing: [`Token::rank`] follows declaration order and
/// the comparator uses it to resolve two version strings that diverge in
/// structure rather than in value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Token {
    Invalid,
    DigitOrZero,
    Digit,
    Letter,
    Suffix,
    SuffixNo,
    RevisionNo,
    End,
}

impl Token {
    pub(crate) fn rank(self) -> i8 {
        match self {
            Token::Invalid => -1,
            Token::DigitOrZero => 0,
            Token::Digit => 1,
            Token::Letter => 2,
            Token::Suffix => 3,
            Token::SuffixNo => 4,
            Token::RevisionNo => 5,
            Token::End => 6,
        }
    }

    /// `End` and `Invalid` terminate a token stream; neither carries a value.
    pub(crate) fn is_terminal(self) -> bool {
        matches!(self, Token::End | Token::Invalid)
    }
}

/// Transitions `(current, next)` where a rank decrease is a legal refinement
/// of an already-started run instead of ill-formed input: a digit run after a
/// `.`, a numbered suffix word, and a digit run after a letter.
const RANK_DECREASE_ALLOWED: [(Token, Token); 3] = [
    (Token::Digit, Token::DigitOrZero),
    (Token::SuffixNo, Token::Suffix),
    (Token::Letter, Token::Digit),
];

/// Recognized suffix words, each list in fixed priority order. Pre-release
/// words encode as `index - list_len` (always negative), post-release words
/// as `index` (never negative), so plain integer comparison of suffix values
/// sorts pre-release before release before post-release.
const PRE_RELEASE: [&[u8]; 4] = [b"alpha", b"beta", b"pre", b"rc"];
const POST_RELEASE: [&[u8]; 5] = [b"cvs", b"svn", b"git", b"hg", b"p"];

/// Longest digit run that is still extracted as a number. 18 decimal digits
/// always fit in an `i64`; longer runs degrade to `Token::Invalid` so the
/// ordering stays total and identical on every platform.
const MAX_DIGIT_RUN: usize = 18;

/// A read position into an immutable version string.
///
/// Advancing past the end of the string is an internal logic defect and
/// panics; ill-formed *input* never panics, it surfaces as `Token::Invalid`.
pub(crate) struct Cursor<'a> {
    version: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(version: &'a str) -> Cursor<'a> {
        Cursor {
            version: version.as_bytes(),
            pos: 0,
        }
    }

    fn remaining(&self) -> usize {
        self.version.len() - self.pos
    }

    fn is_eof(&self) -> bool {
        self.pos == self.version.len()
    }

    fn peek(&self) -> u8 {
        self.version[self.pos]
    }

    fn peek_at(&self, offset: usize) -> u8 {
        self.version[self.pos + offset]
    }

    fn peek_run(&self, n: usize) -> &[u8] {
        &self.version[self.pos..self.pos + n]
    }

    fn skip(&mut self, n: usize) {
        self.pos += n;
        assert!(
            self.pos <= self.version.len(),
            "cursor advanced past the end of the version string"
        );
    }

    fn bump(&mut self) -> u8 {
        let c = self.version[self.pos];
        self.pos += 1;
        c
    }

    fn starts_with(&self, word: &[u8]) -> bool {
        word.len() <= self.remaining() && self.peek_run(word.len()) == word
    }

    /// Decide the type of the upcoming token from the type of the token just
    /// produced plus at most one byte of lookahead. Consumes only separator
    /// characters (`.`, `_`, `-r`).
    pub(crate) fn next_token(&mut self, current: Token) -> Token {
        let next = if self.is_eof() {
            Token::End
        } else if matches!(current, Token::Digit | Token::DigitOrZero)
            && self.peek().is_ascii_lowercase()
        {
            Token::Letter
        } else if current == Token::Letter && self.peek().is_ascii_digit() {
            Token::Digit
        } else if current == Token::Suffix && self.peek().is_ascii_digit() {
            Token::SuffixNo
        } else {
            match self.bump() {
                b'.' => Token::DigitOrZero,
                b'_' => Token::Suffix,
                b'-' if self.remaining() > 0 && self.peek() == b'r' => {
                    self.bump();
                    Token::RevisionNo
                }
                _ => Token::Invalid,
            }
        };

        // A token may never rank below its predecessor, except for the three
        // allow-listed refinements.
        if next.rank() < current.rank() && !RANK_DECREASE_ALLOWED.contains(&(current, next)) {
            return Token::Invalid;
        }
        next
    }

    /// Extract the value of the current token and decide the next token's
    /// type, advancing past the consumed characters.
    ///
    /// At end of input this is a no-op returning `(End, 0)`. Extraction
    /// failures return `(Invalid, -1)` without advancing.
    pub(crate) fn token(&mut self, current: Token) -> (Token, i64) {
        if self.is_eof() {
            return (Token::End, 0);
        }

        let mut next = Token::Invalid;
        let mut len = 0;
        let mut value: i64 = 0;

        match current {
            Token::DigitOrZero if self.peek() == b'0' => {
                while len < self.remaining() && self.peek_at(len) == b'0' {
                    len += 1;
                }
                // Leading zeros sort below everything else in the component.
                // Only the zeros are consumed; any digits left over form a
                // plain digit run on the next call.
                next = Token::Digit;
                value = -(len as i64);
            }
            Token::DigitOrZero | Token::Digit | Token::SuffixNo | Token::RevisionNo => {
                while len < self.remaining() && self.peek_at(len).is_ascii_digit() {
                    len += 1;
                }
                if len > MAX_DIGIT_RUN {
                    return (Token::Invalid, -1);
                }
                for i in 0..len {
                    value = value * 10 + i64::from(self.peek_at(i) - b'0');
                }
            }
            Token::Letter => {
                value = i64::from(self.peek());
                len = 1;
            }
            Token::Suffix => match self.match_suffix() {
                Some((suffix_value, word_len)) => {
                    value = suffix_value;
                    len = word_len;
                }
                None => return (Token::Invalid, -1),
            },
            Token::Invalid | Token::End => return (Token::Invalid, -1),
        }

        self.skip(len);
        if self.is_eof() {
            next = Token::End;
        } else if next == Token::Invalid {
            next = self.next_token(current);
        }
        (next, value)
    }

    /// Try each suffix word in priority order for an exact prefix match at
    /// the cursor, pre-release words first.
    fn match_suffix(&self) -> Option<(i64, usize)> {
        for (index, word) in PRE_RELEASE.iter().enumerate() {
            if self.starts_with(word) {
                return Some((index as i64 - PRE_RELEASE.len() as i64, word.len()));
            }
        }
        for (index, word) in POST_RELEASE.iter().enumerate() {
            if self.starts_with(word) {
                return Some((index as i64, word.len()));
            }
        }
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;

    /// Pull tokens until the stream terminates. Each entry pairs the value
    /// extracted in that step with the type decided for the following step.
    fn tokenize(input: &str) -> Vec<(Token, i64)> {
        let mut cursor = Cursor::new(input);
        let mut current = Token::Digit;
        let mut stream = Vec::new();
        loop {
            let (next, value) = cursor.token(current);
            stream.push((next, value));
            if next.is_terminal() {
                return stream;
            }
            current = next;
        }
    }

    #[test]
    fn plain_numeric_components() {
        assert_eq!(
            tokenize("1.2.3"),
            vec![
                (Token::DigitOrZero, 1),
                (Token::DigitOrZero, 2),
                (Token::End, 3),
            ]
        );
    }

    #[test]
    fn empty_input_is_end() {
        assert_eq!(tokenize(""), vec![(Token::End, 0)]);
    }

    #[test]
    fn leading_zeros_negate_their_count() {
        // one zero consumed with value -1, then the component ends
        assert_eq!(
            tokenize("1.0"),
            vec![(Token::DigitOrZero, 1), (Token::End, -1)]
        );
        // two zeros consumed with value -2, the 7 re-scans as a digit run
        assert_eq!(
            tokenize("1.007"),
            vec![
                (Token::DigitOrZero, 1),
                (Token::Digit, -2),
                (Token::End, 7),
            ]
        );
    }

    #[test]
    fn letter_follows_digit_run() {
        assert_eq!(
            tokenize("1.0b3"),
            vec![
                (Token::DigitOrZero, 1),
                (Token::Digit, -1),
                (Token::Letter, 0),
                (Token::Digit, 98),
                (Token::End, 3),
            ]
        );
    }

    #[test]
    fn pre_release_suffix_is_negative() {
        // alpha is index 0 of 4 pre-release words, so it encodes as -4
        assert_eq!(
            tokenize("1.0_alpha1"),
            vec![
                (Token::DigitOrZero, 1),
                (Token::Digit, -1),
                (Token::Suffix, 0),
                (Token::SuffixNo, -4),
                (Token::End, 1),
            ]
        );
    }

    #[test]
    fn post_release_suffix_is_non_negative() {
        // git is index 2 of the post-release list
        assert_eq!(
            tokenize("2_git"),
            vec![(Token::Suffix, 2), (Token::End, 2)]
        );
    }

    #[test]
    fn unknown_suffix_word_is_invalid() {
        assert_eq!(
            tokenize("1_foo"),
            vec![(Token::Suffix, 1), (Token::Invalid, -1)]
        );
    }

    #[test]
    fn revision_marker() {
        assert_eq!(
            tokenize("1.0-r2"),
            vec![
                (Token::DigitOrZero, 1),
                (Token::Digit, -1),
                (Token::RevisionNo, 0),
                (Token::End, 2),
            ]
        );
    }

    #[test]
    fn bare_dash_without_r_is_invalid() {
        assert_eq!(
            tokenize("1-2"),
            vec![(Token::Invalid, 1)]
        );
    }

    #[test]
    fn garbage_separator_is_invalid() {
        assert_eq!(
            tokenize("1!2"),
            vec![(Token::Invalid, 1)]
        );
    }

    #[test]
    fn rank_decrease_after_suffix_is_invalid() {
        // a fresh dotted component may not follow a suffix word
        assert_eq!(
            tokenize("1.0_alpha.1"),
            vec![
                (Token::DigitOrZero, 1),
                (Token::Digit, -1),
                (Token::Suffix, 0),
                (Token::Invalid, -4),
            ]
        );
    }

    #[test]
    fn digit_run_length_limit() {
        // 18 digits extract numerically, 19 degrade to Invalid
        assert_eq!(
            tokenize("123456789012345678"),
            vec![(Token::End, 123456789012345678)]
        );
        assert_eq!(
            tokenize("1234567890123456789"),
            vec![(Token::Invalid, -1)]
        );
    }

    #[test]
    fn token_at_eof_is_a_noop() {
        let mut cursor = Cursor::new("");
        assert_eq!(cursor.token(Token::Digit), (Token::End, 0));
        assert_eq!(cursor.token(Token::End), (Token::End, 0));
    }
}
