//! Splits preprocessed shader text into a flat list of [`Token`]s.
//!
//! Macro expansion is expected to have happened already. Comments and any leftover
//! `#` directive lines (`#version`, `#extension`, ...) are dropped here.

use core::iter::Peekable;
use core::str::CharIndices;

/// One token of shader source together with the line it started on.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Token {
    /// The token text.
    pub text: String,
    /// 1-based source line.
    pub line: usize,
}

impl Token {
    /// Make a new `Token`.
    #[inline]
    #[expect(clippy::impl_trait_in_params, reason = "just a struct new")]
    pub fn new(text: impl Into<String>, line: usize) -> Self {
        Self {
            text: text.into(),
            line,
        }
    }
}

/// Operators that are kept together as one token.
const TWO_CHAR_OPERATORS: [&str; 19] = [
    "==", "!=", "<=", ">=", "&&", "||", "^^", "++", "--", "+=", "-=", "*=", "/=", "%=", "&=",
    "|=", "^=", "<<", ">>",
];

/// Tokenizes `source`.
#[inline]
#[must_use]
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).run()
}

/// Scanner state.
struct Lexer<'src> {
    /// Full source, tokens are sliced out of it.
    source: &'src str,
    /// Character cursor.
    chars: Peekable<CharIndices<'src>>,
    /// Current line.
    line: usize,
    /// Whether only whitespace has been seen on the current line.
    at_line_start: bool,
    /// Collected output.
    tokens: Vec<Token>,
}

impl<'src> Lexer<'src> {
    /// Make a new `Lexer`.
    fn new(source: &'src str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            line: 1,
            at_line_start: true,
            tokens: Vec::new(),
        }
    }

    /// Consumes the whole input.
    fn run(mut self) -> Vec<Token> {
        while let Some(&(start, ch)) = self.chars.peek() {
            if ch.is_whitespace() {
                self.bump();
                continue;
            }
            if ch == '#' && self.at_line_start {
                self.skip_directive();
                continue;
            }
            self.at_line_start = false;
            if ch == '/' && self.skip_comment(start) {
                continue;
            }
            let line = self.line;
            let end = if ch == '$' || ch == '_' || ch.is_alphabetic() {
                self.bump();
                self.eat_while(|next| next == '_' || next.is_alphanumeric())
            } else if ch.is_ascii_digit() || (ch == '.' && self.next_is_digit(start)) {
                self.number()
            } else {
                self.punctuation(start)
            };
            if let Some(text) = self.source.get(start..end) {
                self.tokens.push(Token::new(text, line));
            }
        }
        self.tokens
    }

    /// Advances by one character, tracking lines.
    fn bump(&mut self) -> Option<char> {
        let (_, ch) = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.at_line_start = true;
        }
        Some(ch)
    }

    /// Byte offset of the next unread character.
    fn offset(&mut self) -> usize {
        self.chars
            .peek()
            .map_or(self.source.len(), |&(index, _)| index)
    }

    /// Consumes characters matching `accept`, returning the end offset.
    fn eat_while(&mut self, accept: impl Fn(char) -> bool) -> usize {
        while let Some(&(_, ch)) = self.chars.peek() {
            if !accept(ch) {
                break;
            }
            self.bump();
        }
        self.offset()
    }

    /// Whether the character after `start` is a decimal digit.
    fn next_is_digit(&self, start: usize) -> bool {
        self.source
            .get(start + 1..)
            .and_then(|rest| rest.chars().next())
            .is_some_and(|ch| ch.is_ascii_digit())
    }

    /// Consumes a numeric literal including suffixes and exponents.
    fn number(&mut self) -> usize {
        let mut previous = '\0';
        while let Some(&(_, ch)) = self.chars.peek() {
            let exponent_sign = (ch == '+' || ch == '-') && (previous == 'e' || previous == 'E');
            if !(ch.is_alphanumeric() || ch == '.' || exponent_sign) {
                break;
            }
            previous = ch;
            self.bump();
        }
        self.offset()
    }

    /// Consumes one operator or punctuation character.
    fn punctuation(&mut self, start: usize) -> usize {
        let rest = self.source.get(start..).unwrap_or_default();
        let width = if rest.starts_with("<<=") || rest.starts_with(">>=") {
            3
        } else if TWO_CHAR_OPERATORS.iter().any(|op| rest.starts_with(op)) {
            2
        } else {
            1
        };
        for _ in 0..width {
            self.bump();
        }
        self.offset()
    }

    /// Skips a `//` or `/* */` comment starting at `start`. Returns `false` if there is none.
    fn skip_comment(&mut self, start: usize) -> bool {
        let rest = self.source.get(start..).unwrap_or_default();
        if rest.starts_with("//") {
            self.eat_while(|ch| ch != '\n');
            true
        } else if rest.starts_with("/*") {
            self.bump();
            self.bump();
            let mut previous = '\0';
            while let Some(ch) = self.bump() {
                if previous == '*' && ch == '/' {
                    break;
                }
                previous = ch;
            }
            true
        } else {
            false
        }
    }

    /// Skips a preprocessor directive line, honouring `\` continuations.
    fn skip_directive(&mut self) {
        let mut previous = '\0';
        while let Some(&(_, ch)) = self.chars.peek() {
            if ch == '\n' && previous != '\\' {
                break;
            }
            if ch != '\r' {
                previous = ch;
            }
            self.bump();
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn texts(source: &str) -> Vec<String> {
        tokenize(source).into_iter().map(|token| token.text).collect()
    }

    #[test_log::test]
    fn splits_declarations() {
        assert_eq!(
            texts("uniform vec3 u_color[4];"),
            ["uniform", "vec3", "u_color", "[", "4", "]", ";"]
        );
    }

    #[test_log::test]
    fn keeps_directive_sigils() {
        assert_eq!(texts("$in vec3 a_pos;"), ["$in", "vec3", "a_pos", ";"]);
        assert_eq!(texts("$out vec4 o_color;"), ["$out", "vec4", "o_color", ";"]);
    }

    #[test_log::test]
    fn layout_tokens() {
        assert_eq!(
            texts("layout(location=1, std140)"),
            ["layout", "(", "location", "=", "1", ",", "std140", ")"]
        );
    }

    #[test_log::test]
    fn skips_comments_and_directives() {
        let source = "#version 330\n// a comment\nuniform /* inline */ float a;\n#define X \\\n 1\nfloat b;";
        assert_eq!(
            texts(source),
            ["uniform", "float", "a", ";", "float", "b", ";"]
        );
    }

    #[test_log::test]
    fn tracks_lines() {
        let tokens = tokenize("uniform float a;\n\n/* x\ny */\nuniform int b;");
        assert_eq!(tokens.first().map(|token| token.line), Some(1));
        assert_eq!(tokens.get(4), Some(&Token::new("uniform", 5)));
    }

    #[test_log::test]
    fn numbers_and_operators() {
        assert_eq!(
            texts("a = 1.5e-3 + .5f; b <<= 2u; c == d;"),
            [
                "a", "=", "1.5e-3", "+", ".5f", ";", "b", "<<=", "2u", ";", "c", "==", "d", ";"
            ]
        );
    }
}
