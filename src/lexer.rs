//! # Chord Lexer
//!
//! Recognizes chord symbols in free text with an explicit character-level
//! state machine instead of one large pattern.
//!
//! ## Chord Grammar
//! ```text
//! symbol  := root quality* bass?
//! root    := [A-G] ('#' | 'b')?
//! quality := "maj" | "min" | "dim" | "aug"
//!          | "sus" digit* | "add" digit*
//!          | digit+ ("sus" digit*)?
//!          | 'm' | 'M' | '+' | '-' | 'o' | 'Δ'
//! bass    := '/' [A-G] ('#' | 'b')?
//! ```
//!
//! A symbol must not be glued to surrounding words: the character before the
//! root and the character after the symbol (if any) must not be a letter,
//! digit or underscore. When the longest reading is glued to a following
//! word, shorter readings ending at a quality marker are tried, so `C-G`
//! yields `C` followed by the literal `-` and the chord `G`. The root
//! accidental is never given back: `C#x` is not a chord.
//!
//! ## Two Modes
//! - [`parse_chord_symbol()`] - whole-token mode: the entire token must be one
//!   symbol (used for whitespace-separated chord lists)
//! - [`ChordLexer`] - inline mode: scans prose and returns chord and literal
//!   segments covering every byte of the input (used for full charts)
//!
//! Symbols whose root is syntactically valid but not in the pitch-class table
//! (`Cb`, `E#`, `B#/D`) are never chords; in inline mode the whole match is
//! kept as literal text.
//!
//! ## Example
//! ```rust
//! use chordshift::lexer::{parse_chord_symbol, ChordLexer, Segment};
//!
//! let chord = parse_chord_symbol("Bbm7/F").unwrap();
//! assert_eq!(chord.root_spelling, "Bb");
//! assert_eq!(chord.quality, "m7");
//! assert_eq!(chord.suffix(), "m7/F");
//!
//! let segments = ChordLexer::new("Am  Be still").tokenize();
//! assert!(matches!(segments[0].segment, Segment::Chord(_)));
//! assert_eq!(segments[1].segment, Segment::Literal("  Be still"));
//! ```

use crate::pitch::{index_of, PitchClass};

/// Fixed-width quality markers, longest first where prefixes overlap.
const WORD_QUALITIES: [&str; 4] = ["maj", "min", "dim", "aug"];

/// Quality markers that take an optional number (`sus4`, `add9`).
const NUMBERED_QUALITIES: [&str; 2] = ["sus", "add"];

/// Slash bass note of a chord
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BassNote<'a> {
    /// `None` when the spelling is syntactically a note but not in the table.
    pub pitch: Option<PitchClass>,
    pub spelling: &'a str,
}

/// A chord symbol split into its parts
///
/// All string fields borrow from the input. `text` is the full symbol;
/// the other fields are consecutive slices of it:
/// `text == root_spelling + quality + ("/" + bass.spelling)?`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChordSymbol<'a> {
    pub text: &'a str,
    pub root: PitchClass,
    pub root_spelling: &'a str,
    pub quality: &'a str,
    pub bass: Option<BassNote<'a>>,
}

impl<'a> ChordSymbol<'a> {
    /// Everything after the root, including any slash bass marker.
    pub fn suffix(&self) -> &'a str {
        &self.text[self.root_spelling.len()..]
    }
}

/// Byte ranges of one syntactic match, before the root is resolved
#[derive(Debug, Clone, Copy)]
struct RawSymbol {
    start: usize,
    root_end: usize,
    quality_end: usize,
    bass_start: Option<usize>,
    end: usize,
}

impl RawSymbol {
    /// Resolve against the pitch-class table. `None` if the root is not a note.
    fn resolve(self, input: &str) -> Option<ChordSymbol<'_>> {
        let root_spelling = &input[self.start..self.root_end];
        let root = index_of(root_spelling)?;
        let bass = self.bass_start.map(|bass_start| {
            let spelling = &input[bass_start..self.end];
            BassNote {
                pitch: index_of(spelling),
                spelling,
            }
        });
        Some(ChordSymbol {
            text: &input[self.start..self.end],
            root,
            root_spelling,
            quality: &input[self.root_end..self.quality_end],
            bass,
        })
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_root_letter(c: char) -> bool {
    matches!(c, 'A'..='G')
}

/// Length in bytes of a root (`[A-G]`, optional `#`/`b`) at the start of `s`.
fn root_len(s: &str) -> Option<usize> {
    let mut chars = s.chars();
    if !chars.next().is_some_and(is_root_letter) {
        return None;
    }
    match chars.next() {
        Some('#' | 'b') => Some(2),
        _ => Some(1),
    }
}

fn digits_len(s: &str) -> usize {
    s.bytes().take_while(u8::is_ascii_digit).count()
}

/// Length in bytes of one quality marker at the start of `s`, or 0.
fn quality_len(s: &str) -> usize {
    if let Some(marker) = WORD_QUALITIES.iter().find(|m| s.starts_with(**m)) {
        return marker.len();
    }
    if let Some(marker) = NUMBERED_QUALITIES.iter().find(|m| s.starts_with(**m)) {
        return marker.len() + digits_len(&s[marker.len()..]);
    }

    let digits = digits_len(s);
    if digits > 0 {
        let rest = &s[digits..];
        return match rest.strip_prefix("sus") {
            Some(after) => digits + 3 + digits_len(after),
            None => digits,
        };
    }

    match s.chars().next() {
        Some(c @ ('m' | 'M' | '+' | '-' | 'o' | 'Δ')) => c.len_utf8(),
        _ => 0,
    }
}

/// Match the chord grammar at byte offset `start`.
///
/// Returns every acceptable end position, shortest first: just the root,
/// after each quality marker, and after the bass marker.
fn scan_symbol(input: &str, start: usize) -> Option<(RawSymbol, Vec<usize>)> {
    let root_end = start + root_len(&input[start..])?;

    let mut ends = vec![root_end];
    let mut position = root_end;
    loop {
        let len = quality_len(&input[position..]);
        if len == 0 {
            break;
        }
        position += len;
        ends.push(position);
    }
    let quality_end = position;

    let mut bass_start = None;
    if let Some(after_slash) = input[position..].strip_prefix('/') {
        if let Some(len) = root_len(after_slash) {
            bass_start = Some(position + 1);
            position += 1 + len;
            ends.push(position);
        }
    }

    let raw = RawSymbol {
        start,
        root_end,
        quality_end,
        bass_start,
        end: position,
    };
    Some((raw, ends))
}

/// Trim a raw match so it ends at `end`, dropping the bass or trailing
/// quality markers that fall past it.
fn truncate(raw: RawSymbol, end: usize) -> RawSymbol {
    if end == raw.end {
        return raw;
    }
    RawSymbol {
        quality_end: raw.quality_end.min(end),
        bass_start: None,
        end,
        ..raw
    }
}

/// Whole-token mode: parse `token` as a single chord symbol.
///
/// Returns `None` unless the grammar covers the entire token and the root is
/// in the pitch-class table.
///
/// ```rust
/// use chordshift::lexer::parse_chord_symbol;
/// use chordshift::PitchClass;
///
/// assert_eq!(parse_chord_symbol("F#m7b5"), None); // "b5" is not a quality marker
/// assert_eq!(parse_chord_symbol("Dsus4").unwrap().root, PitchClass::D);
/// assert_eq!(parse_chord_symbol("Hello"), None);
/// ```
pub fn parse_chord_symbol(token: &str) -> Option<ChordSymbol<'_>> {
    let (raw, _) = scan_symbol(token, 0)?;
    if raw.end != token.len() {
        return None;
    }
    raw.resolve(token)
}

/// Split text into alternating runs of whitespace and non-whitespace.
///
/// Concatenating the returned slices reproduces the input exactly.
/// The flag is `true` for whitespace runs.
pub fn split_keeping_whitespace(input: &str) -> Vec<(&str, bool)> {
    let mut runs = Vec::new();
    let mut run_start = 0;
    let mut run_is_space = None;

    for (i, c) in input.char_indices() {
        let is_space = c.is_whitespace();
        match run_is_space {
            Some(current) if current != is_space => {
                runs.push((&input[run_start..i], current));
                run_start = i;
                run_is_space = Some(is_space);
            }
            None => run_is_space = Some(is_space),
            _ => {}
        }
    }
    if let Some(current) = run_is_space {
        runs.push((&input[run_start..], current));
    }
    runs
}

/// A piece of scanned text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Chord(ChordSymbol<'a>),
    Literal(&'a str),
}

impl<'a> Segment<'a> {
    pub fn text(&self) -> &'a str {
        match self {
            Segment::Chord(chord) => chord.text,
            Segment::Literal(text) => text,
        }
    }
}

/// A segment with its position in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocatedSegment<'a> {
    pub segment: Segment<'a>,
    /// Byte offset of the first character
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

/// Inline-mode scanner over a whole chart
pub struct ChordLexer<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
    position: usize,
    previous: Option<char>,
}

impl<'a> ChordLexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().peekable(),
            line: 1,
            column: 1,
            position: 0,
            previous: None,
        }
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.position += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.previous = Some(c);
        Some(c)
    }

    fn advance_to(&mut self, end: usize) {
        while self.position < end && self.advance().is_some() {}
    }

    fn peek(&mut self) -> Option<&char> {
        self.chars.peek()
    }

    /// A chord can start here. A letter right after `/` belongs to a slash
    /// bass that did not match, never to a chord of its own.
    fn at_word_start(&self) -> bool {
        !self.previous.is_some_and(|c| is_word_char(c) || c == '/')
    }

    /// Longest match at the current position that is not glued to a
    /// following word.
    fn match_here(&self) -> Option<RawSymbol> {
        let (raw, ends) = scan_symbol(self.input, self.position)?;
        let end = ends.into_iter().rev().find(|&end| {
            !self.input[end..].chars().next().is_some_and(is_word_char)
        })?;
        Some(truncate(raw, end))
    }

    /// Scan the whole input into chord and literal segments.
    ///
    /// Literal segments are maximal: two literals are never adjacent, and the
    /// segments' texts concatenate to the input.
    pub fn tokenize(&mut self) -> Vec<LocatedSegment<'a>> {
        let mut segments = Vec::new();
        let mut literal: Option<(usize, usize, usize)> = None;

        while let Some(&c) = self.peek() {
            let found = if is_root_letter(c) && self.at_word_start() {
                self.match_here()
            } else {
                None
            };

            let Some(raw) = found else {
                literal.get_or_insert((self.position, self.line, self.column));
                self.advance();
                continue;
            };

            match raw.resolve(self.input) {
                Some(chord) => {
                    if let Some((offset, line, column)) = literal.take() {
                        segments.push(LocatedSegment {
                            segment: Segment::Literal(&self.input[offset..self.position]),
                            offset,
                            line,
                            column,
                        });
                    }
                    segments.push(LocatedSegment {
                        segment: Segment::Chord(chord),
                        offset: self.position,
                        line: self.line,
                        column: self.column,
                    });
                }
                None => {
                    // Unknown root: the whole match stays literal text.
                    literal.get_or_insert((self.position, self.line, self.column));
                }
            }
            self.advance_to(raw.end);
        }

        if let Some((offset, line, column)) = literal {
            segments.push(LocatedSegment {
                segment: Segment::Literal(&self.input[offset..]),
                offset,
                line,
                column,
            });
        }
        segments
    }
}
