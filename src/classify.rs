use regex::Regex;

use crate::{irc::Privmsg, util::ChannelExt as _, ChatEvent, Color, Event, EventKind};

/// Colors picked for nicks, the same set graphical clients tend to cycle through
const NICK_COLORS: [u8; 9] = [19, 20, 22, 24, 25, 26, 27, 28, 29];

/// The color a client would decorate `nick` with
pub fn nick_color(nick: &str) -> Color {
    let sum = nick.bytes().map(usize::from).sum::<usize>();
    Color(NICK_COLORS[sum % NICK_COLORS.len()])
}

/// Splits a CTCP `ACTION` off of a message.
///
/// Returns `None` for any other CTCP request.
pub fn split_action(data: &str) -> Option<(bool, &str)> {
    let Some(ctcp) = data.strip_prefix('\x01') else {
        return Some((false, data));
    };

    let ctcp = ctcp.strip_suffix('\x01').unwrap_or(ctcp);
    match ctcp.split_once(' ') {
        Some(("ACTION", text)) => Some((true, text)),
        None if ctcp == "ACTION" => Some((true, "")),
        _ => None,
    }
}

/// Turns chat lines into events, from the point of view of our nick
#[derive(Debug, Clone)]
pub struct Classifier {
    network: String,
    nick: String,
    mention: Regex,
}

impl Classifier {
    pub fn new(network: impl Into<String>, nick: &str) -> Self {
        Self {
            network: network.into(),
            nick: nick.to_string(),
            mention: Self::mention(nick),
        }
    }

    fn mention(nick: &str) -> Regex {
        // nicks may contain []\`^{}|- so \b isn't good enough
        const NICK_CHARS: &str = r"A-Za-z0-9_\-\[\]\\`^{}|";
        let pattern = format!(
            r"(?i)(?:^|[^{NICK_CHARS}]){nick}(?:$|[^{NICK_CHARS}])",
            nick = regex::escape(nick)
        );
        Regex::new(&pattern).expect("escaped nick is a valid pattern")
    }

    pub fn nick(&self) -> &str {
        &self.nick
    }

    pub fn network(&self) -> &str {
        &self.network
    }

    pub fn set_nick(&mut self, nick: &str) {
        if self.nick == nick {
            return;
        }
        tracing::debug!(old = %self.nick, new = %nick, "our nick changed");
        self.nick = nick.to_string();
        self.mention = Self::mention(nick);
    }

    pub fn is_me(&self, nick: &str) -> bool {
        self.nick.eq_ignore_ascii_case(nick)
    }

    pub fn is_mention(&self, text: &str) -> bool {
        self.mention.is_match(text)
    }

    /// Classifies a line someone sent to a channel we're in.
    ///
    /// Private messages and CTCP requests other than actions produce nothing.
    pub fn incoming(&self, pm: &Privmsg) -> Option<ChatEvent> {
        if !pm.target.as_str().is_channel() {
            return None;
        }

        let (action, text) = split_action(&pm.data)?;
        let me = self.is_me(&pm.sender);
        let highlight = !me && self.is_mention(text);

        let kind = match (action, highlight, me) {
            (false, _, true) => EventKind::YourMessage,
            (true, _, true) => EventKind::YourAction,
            (false, true, _) => EventKind::ChannelMessageHighlight,
            (true, true, _) => EventKind::ChannelActionHighlight,
            (false, false, _) => EventKind::ChannelMessage,
            (true, false, _) => EventKind::ChannelAction,
        };

        // clients only decorate ordinary lines from other people
        let nick = if highlight || me {
            pm.sender.clone()
        } else {
            format!("{}{}", nick_color(&pm.sender), pm.sender)
        };

        Some(ChatEvent {
            network: self.network.clone(),
            channel: pm.target.clone(),
            kind,
            event: Event::new(nick, text),
        })
    }

    /// An event for a line we sent ourselves
    pub fn outgoing(&self, channel: &str, text: &str, action: bool) -> ChatEvent {
        ChatEvent {
            network: self.network.clone(),
            channel: channel.to_string(),
            kind: if action {
                EventKind::YourAction
            } else {
                EventKind::YourMessage
            },
            event: Event::new(&*self.nick, text),
        }
    }
}
