use std::{borrow::Cow, fmt, iter::Peekable, str::Chars};

pub const BOLD: char = '\x02';
pub const COLOR: char = '\x03';

const ITALIC: char = '\x1d';
const UNDERLINE: char = '\x1f';
const REVERSE: char = '\x16';
const RESET: char = '\x0f';

/// An mIRC color index
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Color(pub u8);

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{COLOR}{:02}", self.0)
    }
}

/// Splits a leading color marker off of a nick.
///
/// Nicks decorated by the client look like `\x0322yakbot`. A marker without
/// any digits is not a color, so the nick is returned untouched.
pub fn split_nick(nick: &str) -> (Option<Color>, &str) {
    let Some(tail) = nick.strip_prefix(COLOR) else {
        return (None, nick);
    };

    let digits = tail
        .bytes()
        .take(2)
        .take_while(u8::is_ascii_digit)
        .count();

    if digits == 0 {
        return (None, nick);
    }

    let (head, tail) = tail.split_at(digits);
    match head.parse() {
        Ok(color) => (Some(Color(color)), tail),
        Err(_) => (None, nick),
    }
}

/// Removes mIRC formatting codes, colors included
pub fn strip(input: &str) -> Cow<'_, str> {
    const CODES: &[char] = &[BOLD, COLOR, ITALIC, UNDERLINE, REVERSE, RESET];

    fn skip_digits(chars: &mut Peekable<Chars<'_>>) -> usize {
        let mut seen = 0;
        while seen < 2 && chars.next_if(char::is_ascii_digit).is_some() {
            seen += 1;
        }
        seen
    }

    if !input.contains(CODES) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            COLOR if skip_digits(&mut chars) > 0 => {
                let mut ahead = chars.clone();
                if ahead.next() == Some(',') && ahead.peek().map_or(false, char::is_ascii_digit) {
                    chars.next();
                    skip_digits(&mut chars);
                }
            }
            ch if CODES.contains(&ch) => {}
            ch => out.push(ch),
        }
    }
    Cow::Owned(out)
}

/// Colors used when rendering the collected lines
#[derive(Copy, Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Palette {
    pub my_nick: Color,
    pub my_action: Color,
    pub highlight: Color,
    pub action: Color,
    pub action_highlight: Color,
    pub tab: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            my_nick: Color(15),
            my_action: Color(2),
            highlight: Color(4),
            action: Color(2),
            action_highlight: Color(4),
            tab: Color(3),
        }
    }
}
