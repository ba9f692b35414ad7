/// How a line relates to the local user
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Flags {
    pub highlight: bool,
    pub action: bool,
    pub me: bool,
}

/// The kinds of chat lines the collector listens for
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
pub enum EventKind {
    ChannelMessage,
    ChannelMessageHighlight,
    ChannelAction,
    ChannelActionHighlight,
    YourMessage,
    YourAction,
}

impl EventKind {
    pub const ALL: [Self; 6] = [
        Self::ChannelMessage,
        Self::ChannelMessageHighlight,
        Self::ChannelAction,
        Self::ChannelActionHighlight,
        Self::YourMessage,
        Self::YourAction,
    ];

    pub const fn flags(&self) -> Flags {
        let (highlight, action, me) = match self {
            Self::ChannelMessage => (false, false, false),
            Self::ChannelMessageHighlight => (true, false, false),
            Self::ChannelAction => (false, true, false),
            Self::ChannelActionHighlight => (true, true, false),
            Self::YourMessage => (false, false, true),
            Self::YourAction => (false, true, true),
        };
        Flags {
            highlight,
            action,
            me,
        }
    }

    pub const fn stringify(&self) -> &'static str {
        match self {
            Self::ChannelMessage => "Channel Message",
            Self::ChannelMessageHighlight => "Channel Msg Hilight",
            Self::ChannelAction => "Channel Action",
            Self::ChannelActionHighlight => "Channel Action Hilight",
            Self::YourMessage => "Your Message",
            Self::YourAction => "Your Action",
        }
    }
}

/// The payload of a chat line, as the client hands it over
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    /// Possibly prefixed with a color marker, e.g. `\x0322yakbot`
    pub nick: String,
    pub text: String,
    /// The sender's channel mode, e.g. `@` or `+`
    pub mode: Option<char>,
}

impl Event {
    pub fn new(nick: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            nick: nick.into(),
            text: text.into(),
            mode: None,
        }
    }

    pub fn with_mode(mut self, mode: char) -> Self {
        self.mode.replace(mode);
        self
    }
}

/// A chat line along with where it was seen
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatEvent {
    pub network: String,
    pub channel: String,
    pub kind: EventKind,
    pub event: Event,
}

/// Something that produces chat events, one at a time.
///
/// `subscribe` hands every event to `handler`, in order, until the source
/// runs dry.
pub trait EventSource {
    fn subscribe(self, handler: impl FnMut(ChatEvent));
}

impl<I> EventSource for I
where
    I: IntoIterator<Item = ChatEvent>,
{
    fn subscribe(self, handler: impl FnMut(ChatEvent)) {
        self.into_iter().for_each(handler)
    }
}

/// A recorded line. The nick has had its color marker removed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub nick: String,
    pub text: String,
    pub highlight: bool,
    pub action: bool,
    pub me: bool,
}

impl Message {
    pub fn new(nick: impl Into<String>, text: impl Into<String>, flags: Flags) -> Self {
        let Flags {
            highlight,
            action,
            me,
        } = flags;
        Self {
            nick: nick.into(),
            text: text.into(),
            highlight,
            action,
            me,
        }
    }

    pub const fn flags(&self) -> Flags {
        Flags {
            highlight: self.highlight,
            action: self.action,
            me: self.me,
        }
    }
}
