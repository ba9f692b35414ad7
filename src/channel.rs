use std::collections::HashMap;

use crate::{color, Color, Flags, Formatter, Message, Ring};

/// What a channel wants shown in its highlight window after an append
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emission {
    /// The buffered context, oldest first, ending with the highlight itself
    Highlight(Vec<Message>),
    /// A line that followed a highlight closely enough to be shown right away
    Reveal(Message),
}

/// Recent history, nick colors and the reveal countdown for a single channel
#[derive(Debug, Clone)]
pub struct ChannelState {
    channel: String,
    history: Ring<Message>,
    nick_colors: HashMap<String, Color>,
    reveal: usize,
}

impl ChannelState {
    pub const DEFAULT_HISTORY_LENGTH: usize = 4;

    pub fn new(channel: impl Into<String>) -> Self {
        Self::with_capacity(channel, Self::DEFAULT_HISTORY_LENGTH)
    }

    pub fn with_capacity(channel: impl Into<String>, capacity: usize) -> Self {
        Self {
            channel: channel.into(),
            history: Ring::with_capacity(capacity),
            nick_colors: HashMap::new(),
            reveal: 0,
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub const fn capacity(&self) -> usize {
        self.history.capacity()
    }

    pub const fn reveal(&self) -> usize {
        self.reveal
    }

    /// Buffered lines, oldest first
    pub fn history(&self) -> impl Iterator<Item = &Message> + ExactSizeIterator {
        self.history.iter()
    }

    pub fn nick_color(&self, nick: &str) -> Option<Color> {
        self.nick_colors.get(nick).copied()
    }

    pub fn append(&mut self, nick: &str, text: &str, flags: Flags) -> Option<Emission> {
        let (color, nick) = color::split_nick(nick);
        if let Some(color) = color {
            self.nick_colors.insert(nick.to_string(), color);
        }

        self.history.push(Message::new(nick, text, flags));

        if flags.highlight {
            self.reveal = self.capacity();
            return Some(Emission::Highlight(self.history.drain().collect()));
        }

        if self.reveal == 0 {
            return None;
        }

        self.reveal -= 1;
        self.history.pop_newest().map(Emission::Reveal)
    }

    pub fn format_line(&self, formatter: &Formatter, msg: &Message) -> String {
        formatter.line(msg, &self.nick_colors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EventKind;

    const PLAIN: Flags = EventKind::ChannelMessage.flags();
    const HIGHLIGHT: Flags = EventKind::ChannelMessageHighlight.flags();

    fn texts<'a>(msgs: impl IntoIterator<Item = &'a Message>) -> Vec<&'a str> {
        msgs.into_iter().map(|msg| &*msg.text).collect()
    }

    #[test]
    fn history_keeps_the_most_recent() {
        let mut state = ChannelState::with_capacity("#rust", 3);
        for text in ["a", "b", "c", "d", "e"] {
            assert_eq!(state.append("bob", text, PLAIN), None);
        }
        assert_eq!(state.history().len(), 3);
        assert_eq!(texts(state.history()), vec!["c", "d", "e"]);
        assert_eq!(state.reveal(), 0);
    }

    #[test]
    fn highlight_flushes_everything_in_order() {
        let mut state = ChannelState::new("#rust");
        for text in ["A", "B", "C"] {
            state.append("bob", text, PLAIN);
        }

        let Some(Emission::Highlight(lines)) = state.append("alice", "D me", HIGHLIGHT) else {
            panic!("expected a highlight")
        };
        assert_eq!(texts(&lines), vec!["A", "B", "C", "D me"]);
        assert!(lines[3].highlight);
        assert_eq!(state.history().len(), 0);
        assert_eq!(state.reveal(), 4);

        let emitted = state.append("bob", "E", PLAIN);
        assert_eq!(emitted, Some(Emission::Reveal(Message::new("bob", "E", PLAIN))));
        assert_eq!(state.reveal(), 3);
        assert_eq!(state.history().len(), 0);
    }

    #[test]
    fn highlight_on_a_full_ring_drops_the_oldest() {
        let mut state = ChannelState::with_capacity("#rust", 2);
        state.append("bob", "a", PLAIN);
        state.append("bob", "b", PLAIN);

        let Some(Emission::Highlight(lines)) = state.append("bob", "c", HIGHLIGHT) else {
            panic!("expected a highlight")
        };
        assert_eq!(texts(&lines), vec!["b", "c"]);
    }

    #[test]
    fn reveal_counts_down_to_zero() {
        let mut state = ChannelState::with_capacity("#rust", 3);
        state.append("bob", "hey me", HIGHLIGHT);

        for expected in [2, 1, 0] {
            assert!(matches!(
                state.append("bob", "more", PLAIN),
                Some(Emission::Reveal(..))
            ));
            assert_eq!(state.reveal(), expected);
            assert_eq!(state.history().len(), 0);
        }

        assert_eq!(state.append("bob", "quiet", PLAIN), None);
        assert_eq!(state.reveal(), 0);
        assert_eq!(texts(state.history()), vec!["quiet"]);
    }

    #[test]
    fn second_highlight_resets_the_countdown() {
        let mut state = ChannelState::with_capacity("#rust", 4);
        state.append("bob", "hey me", HIGHLIGHT);
        state.append("bob", "one", PLAIN);
        state.append("bob", "two", PLAIN);
        assert_eq!(state.reveal(), 2);

        let Some(Emission::Highlight(lines)) = state.append("bob", "me again", HIGHLIGHT) else {
            panic!("expected a highlight")
        };
        assert_eq!(texts(&lines), vec!["me again"]);
        assert_eq!(state.reveal(), 4);
    }

    #[test]
    fn own_lines_are_revealed_too() {
        let mut state = ChannelState::new("#rust");
        state.append("bob", "hey me", HIGHLIGHT);

        let own = EventKind::YourMessage.flags();
        let Some(Emission::Reveal(msg)) = state.append("me", "yes?", own) else {
            panic!("expected a reveal")
        };
        assert!(msg.me);
    }

    #[test]
    fn nick_colors_are_remembered() {
        let mut state = ChannelState::new("#rust");
        state.append("\x0322yakbot", "yo, homie", PLAIN);
        state.append("bob", "hi", PLAIN);

        assert_eq!(state.nick_color("yakbot"), Some(Color(22)));
        assert_eq!(state.nick_color("bob"), None);
        assert_eq!(state.history().next().map(|m| &*m.nick), Some("yakbot"));

        let fmt = Formatter::default();
        let later = Message::new("yakbot", "again", PLAIN);
        assert_eq!(state.format_line(&fmt, &later), "\x03<\x0322yakbot\x03>\tagain\x03");

        let never = Message::new("bob", "again", PLAIN);
        assert_eq!(state.format_line(&fmt, &never), "\x03<bob\x03>\tagain\x03");
    }

    #[test]
    fn remembered_colors_skip_highlights_and_own_lines() {
        let mut state = ChannelState::new("#rust");
        state.append("\x0322yakbot", "yo", PLAIN);

        let fmt = Formatter::default();
        let highlight = Message::new("yakbot", "yo me", HIGHLIGHT);
        assert_eq!(state.format_line(&fmt, &highlight), "\x0304<\x02yakbot\x02>\tyo me\x03");

        state.append("\x0309me", "hi", PLAIN);
        let own = Message::new("me", "hi", EventKind::YourMessage.flags());
        assert_eq!(state.format_line(&fmt, &own), "\x03<\x0315me\x03>\thi\x03");
    }

    #[test]
    fn malformed_color_markers_are_kept_in_the_nick() {
        let mut state = ChannelState::new("#rust");
        state.append("\x03bob", "hi", PLAIN);
        assert_eq!(state.nick_color("bob"), None);
        assert_eq!(state.history().next().map(|m| &*m.nick), Some("\x03bob"));
    }
}
