use time::OffsetDateTime;

use crate::{ChatEvent, Emission, EventSource, Formatter, Registry, Scope, Sink, Target};

/// The prefix of the collector's own windows
pub const HIGHLIGHT_CHANNEL_PREFIX: &str = "!@";

/// Feeds chat events into their channel's state and writes whatever they emit
/// to the channel's highlight window.
pub struct Router<S> {
    registry: Registry,
    sink: S,
    formatter: Formatter,
    prefix: String,
    clock: fn() -> OffsetDateTime,
}

impl<S: Sink> Router<S> {
    pub fn new(sink: S, registry: Registry, formatter: Formatter) -> Self {
        Self {
            registry,
            sink,
            formatter,
            prefix: HIGHLIGHT_CHANNEL_PREFIX.to_string(),
            clock: local_now,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_clock(mut self, clock: fn() -> OffsetDateTime) -> Self {
        self.clock = clock;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The highlight window for a channel
    pub fn highlight_window(&self, network: &str, channel: &str) -> Target {
        Target::new(network, format!("{}{channel}", self.prefix))
    }

    /// Routes everything `source` produces
    pub fn attach(&mut self, source: impl EventSource) {
        source.subscribe(|event| self.handle(event))
    }

    pub fn handle(&mut self, event: ChatEvent) {
        let ChatEvent {
            network,
            channel,
            kind,
            event,
        } = event;

        tracing::trace!(%network, %channel, kind = kind.stringify(), "event");

        // we print into our own windows, so ignore anything seen there
        if channel.starts_with(&*self.prefix) {
            tracing::trace!(%network, %channel, "ignoring our own window");
            return;
        }

        let state = self.registry.get_or_create(&network, &channel);
        let Some(emission) = state.append(&event.nick, &event.text, kind.flags()) else {
            return;
        };

        let state = &*state;
        let target = Target::new(&*network, format!("{}{channel}", self.prefix));

        match emission {
            Emission::Highlight(lines) => {
                tracing::debug!(%target, lines = lines.len(), "flushing highlight");
                {
                    let mut scope = Scope::enter(&mut self.sink, target.clone());
                    scope.print(&self.formatter.header((self.clock)()));
                    for msg in &lines {
                        scope.print(&state.format_line(&self.formatter, msg));
                    }
                }
                self.sink.mark(&target, self.formatter.palette.tab);
            }
            Emission::Reveal(msg) => {
                tracing::trace!(%target, remaining = state.reveal(), "revealing line");
                let line = state.format_line(&self.formatter, &msg);
                Scope::enter(&mut self.sink, target).print(&line);
            }
        }
    }

    pub fn loaded(&mut self) {
        self.status(self.formatter.loaded())
    }

    pub fn unloaded(&mut self) {
        self.status(self.formatter.unloaded())
    }

    fn status(&mut self, line: String) {
        match self.sink.current() {
            Some(current) => self.sink.print(&current, &line),
            None => tracing::info!("{}", crate::color::strip(&line)),
        }
    }
}

fn local_now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}
