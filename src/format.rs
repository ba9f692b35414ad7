use std::collections::HashMap;

use crate::{
    color::{BOLD, COLOR},
    Color, Message, Palette,
};

/// Prefixes the collector's own status lines
pub const LOG_TAG: &str = "\x02\x0306<\x0307<\x0308<\x0304HIGHLIGHT\x0308>\x0307>\x0306>\x0301\t";

#[derive(Copy, Clone, Debug, Default)]
pub struct Formatter {
    pub palette: Palette,
}

impl Formatter {
    pub const fn new(palette: Palette) -> Self {
        Self { palette }
    }

    pub fn header(&self, ts: time::OffsetDateTime) -> String {
        static FORMAT: &[time::format_description::FormatItem<'static>] =
            time::macros::format_description!("[year]/[month]/[day] [hour]:[minute]:[second]");

        let ts = ts.format(&FORMAT).unwrap_or_default();
        format!("{BOLD}### At {ts}")
    }

    pub fn loaded(&self) -> String {
        format!("{LOG_TAG}Yak's Highlight Collector loaded! :D")
    }

    pub fn unloaded(&self) -> String {
        format!("{LOG_TAG}Yak's Highlight Collector unloaded :(")
    }

    pub fn line(&self, msg: &Message, nick_colors: &HashMap<String, Color>) -> String {
        let Palette {
            my_nick,
            my_action,
            highlight,
            action,
            action_highlight,
            ..
        } = self.palette;

        let nick = match nick_colors.get(&msg.nick) {
            _ if msg.me => {
                let color = if msg.action { my_action } else { my_nick };
                format!("{color}{}", msg.nick)
            }
            Some(color) if !msg.highlight => format!("{color}{}", msg.nick),
            _ => msg.nick.clone(),
        };

        let text = &msg.text;
        match (msg.action, msg.highlight) {
            (true, true) => format!("{action_highlight}*{COLOR}\t{nick} {text}"),
            (true, false) => format!("{action}*{COLOR}\t{nick} {COLOR}{text}"),
            (false, true) => format!("{highlight}<{BOLD}{nick}{BOLD}>\t{text}{COLOR}"),
            (false, false) => format!("{COLOR}<{nick}{COLOR}>\t{text}{COLOR}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EventKind;

    fn colors(pairs: &[(&str, u8)]) -> HashMap<String, Color> {
        pairs
            .iter()
            .map(|&(nick, color)| (nick.to_string(), Color(color)))
            .collect()
    }

    fn msg(nick: &str, text: &str, kind: EventKind) -> Message {
        Message::new(nick, text, kind.flags())
    }

    #[test]
    fn plain_message_with_remembered_color() {
        let fmt = Formatter::default();
        let line = fmt.line(
            &msg("yakbot", "yo, homie", EventKind::ChannelMessage),
            &colors(&[("yakbot", 22)]),
        );
        assert_eq!(line, "\x03<\x0322yakbot\x03>\tyo, homie\x03");
    }

    #[test]
    fn plain_message_without_remembered_color() {
        let fmt = Formatter::default();
        let line = fmt.line(&msg("bob", "hi", EventKind::ChannelMessage), &colors(&[]));
        assert_eq!(line, "\x03<bob\x03>\thi\x03");
    }

    #[test]
    fn highlight_ignores_remembered_color() {
        let fmt = Formatter::default();
        let line = fmt.line(
            &msg("yakbot", "yo they4kman", EventKind::ChannelMessageHighlight),
            &colors(&[("yakbot", 22)]),
        );
        assert_eq!(line, "\x0304<\x02yakbot\x02>\tyo they4kman\x03");
    }

    #[test]
    fn own_lines_use_self_colors() {
        let fmt = Formatter::default();
        let remembered = colors(&[("me", 22)]);

        let line = fmt.line(&msg("me", "hello", EventKind::YourMessage), &remembered);
        assert_eq!(line, "\x03<\x0315me\x03>\thello\x03");

        let line = fmt.line(&msg("me", "waves", EventKind::YourAction), &remembered);
        assert_eq!(line, "\x0302*\x03\t\x0302me \x03waves");
    }

    #[test]
    fn actions_render_with_an_asterisk() {
        let fmt = Formatter::default();
        let line = fmt.line(
            &msg("bob", "dances", EventKind::ChannelAction),
            &colors(&[("bob", 7)]),
        );
        assert_eq!(line, "\x0302*\x03\t\x0307bob \x03dances");

        let line = fmt.line(
            &msg("bob", "pokes me", EventKind::ChannelActionHighlight),
            &colors(&[("bob", 7)]),
        );
        assert_eq!(line, "\x0304*\x03\tbob pokes me");
    }

    #[test]
    fn custom_palette() {
        let fmt = Formatter::new(Palette {
            highlight: Color(13),
            ..Palette::default()
        });
        let line = fmt.line(
            &msg("bob", "hey me", EventKind::ChannelMessageHighlight),
            &colors(&[]),
        );
        assert!(line.starts_with("\x0313<"));
    }

    #[test]
    fn header_has_a_timestamp() {
        let ts = time::macros::datetime!(2024-03-09 07:05:01 UTC);
        assert_eq!(Formatter::default().header(ts), "\x02### At 2024/03/09 07:05:01");
    }

    #[test]
    fn status_lines_are_tagged() {
        let fmt = Formatter::default();
        assert!(fmt.loaded().starts_with(LOG_TAG));
        assert!(fmt.unloaded().ends_with("unloaded :("));
    }
}
