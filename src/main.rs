use std::{collections::BTreeSet, io::Write};

use hilite::{
    classify,
    irc::{self, IrcMessage},
    runtime,
    util::ChannelExt as _,
    Classifier, Config, Formatter, Registry, Router, Sink as _, Target, Terminal,
};

enum Input {
    Irc(IrcMessage),
    Line(String),
    Closed,
}

struct Session<W: Write> {
    router: Router<Terminal<W>>,
    classifier: Classifier,
    writer: irc::IrcWriter,
    /// Joined again after every (re)connect
    wanted: BTreeSet<String>,
    joined: BTreeSet<String>,
    active: Option<String>,
}

impl<W: Write> Session<W> {
    const STATUS: &'static str = "*status*";

    fn window(&self, name: &str) -> Target {
        Target::new(self.classifier.network(), name)
    }

    fn look_at(&mut self, name: &str) {
        let target = self.window(name);
        self.router.sink_mut().look_at(target);
    }

    fn show(&mut self, name: &str, line: &str) {
        let target = self.window(name);
        self.router.sink_mut().print(&target, line);
    }

    fn handle_irc(&mut self, msg: IrcMessage) {
        match msg {
            IrcMessage::Connecting => tracing::info!("connecting"),
            IrcMessage::Disconnected => {
                tracing::warn!("disconnected");
                self.joined.clear();
                self.active.take();
                self.look_at(Self::STATUS);
            }

            IrcMessage::Ready(nick) => {
                tracing::info!(%nick, "connected");
                self.classifier.set_nick(&nick);
                for channel in &self.wanted {
                    self.writer.join(channel);
                }
            }

            IrcMessage::Join { nick, channel } if self.classifier.is_me(&nick) => {
                tracing::info!(%channel, "joined");
                self.wanted.insert(channel.clone());
                self.joined.insert(channel.clone());
                if self.active.is_none() {
                    self.look_at(&channel);
                    self.active.replace(channel);
                }
            }

            IrcMessage::Part { nick, channel } if self.classifier.is_me(&nick) => {
                tracing::info!(%channel, "left");
                self.wanted.remove(&channel);
                self.joined.remove(&channel);
                if self.active.as_deref() == Some(&*channel) {
                    self.active = self.joined.iter().next().cloned();
                    let name = self.active.clone().unwrap_or_else(|| Self::STATUS.to_string());
                    self.look_at(&name);
                }
            }

            IrcMessage::Nick { old, new } if self.classifier.is_me(&old) => {
                self.classifier.set_nick(&new);
            }

            IrcMessage::Privmsg(pm) => {
                let Some(event) = self.classifier.incoming(&pm) else {
                    return;
                };

                let line = match classify::split_action(&pm.data) {
                    Some((true, text)) => format!("* {} {text}", pm.sender),
                    _ => format!("<{}> {}", pm.sender, pm.data),
                };
                self.show(&pm.target, &line);
                self.router.attach(Some(event));
            }

            IrcMessage::Join { .. } | IrcMessage::Part { .. } | IrcMessage::Nick { .. } => {}
        }
    }

    /// Returns `false` once the user asked to quit
    fn handle_line(&mut self, line: &str) -> bool {
        let line = line.trim_end();
        if line.is_empty() {
            return true;
        }

        let (command, args) = match line.strip_prefix('/') {
            Some(rest) => rest.split_once(' ').unwrap_or((rest, "")),
            None => ("say", line),
        };
        let args = args.trim();

        match command {
            "quit" => {
                self.writer.quit(if args.is_empty() { "bye" } else { args });
                return false;
            }
            "join" if !args.is_empty() => self.writer.join(args),
            "part" => match (args, self.active.as_deref()) {
                ("", Some(active)) => self.writer.part(active),
                ("", None) => tracing::warn!("not in a channel"),
                (channel, _) => self.writer.part(channel),
            },
            "switch" if self.joined.contains(args) => {
                self.active.replace(args.to_string());
                self.look_at(args);
            }
            "switch" => tracing::warn!(channel = args, "not on that channel"),
            "me" | "say" => self.say(args, command == "me"),
            _ => tracing::warn!(command, "unknown command"),
        }
        true
    }

    fn say(&mut self, text: &str, action: bool) {
        let Some(channel) = self.active.clone() else {
            tracing::warn!("not in a channel");
            return;
        };

        if action {
            self.writer.action(&channel, text);
            self.show(&channel, &format!("* {} {text}", self.classifier.nick()));
        } else {
            self.writer.privmsg(&channel, text);
            self.show(&channel, &format!("<{}> {text}", self.classifier.nick()));
        }

        // servers don't echo our own lines back
        let event = self.classifier.outgoing(&channel, text, action);
        self.router.attach(Some(event));
    }
}

fn connect(config: &Config) -> anyhow::Result<(irc::IrcWriter, flume::Receiver<IrcMessage>)> {
    let (writer, recv) = irc::IrcWriter::new();
    let (tx, rx) = flume::unbounded();

    let addr = config.server.clone();
    let registration = irc::Registration {
        nick: config.nick.clone(),
        user: config.user.clone(),
        password: config.password.clone(),
    };

    runtime::spawn(async move {
        irc::run(&addr, registration, tx, recv).await;
        tracing::info!("connection task finished");
    })?;
    Ok((writer, rx))
}

fn read_stdin() -> flume::Receiver<String> {
    let (tx, rx) = flume::unbounded();
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn main() -> anyhow::Result<()> {
    simple_env_load::load_env_from([".dev.env", ".secrets.env"]);
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    let wait = runtime::start()?;

    let network = config.network().to_string();
    let (writer, irc) = connect(&config)?;
    let stdin = read_stdin();

    let router = Router::new(
        Terminal::new(std::io::stdout()),
        Registry::new(config.history_length),
        Formatter::new(config.palette),
    )
    .with_prefix(&*config.prefix);

    let mut session = Session {
        router,
        classifier: Classifier::new(network, &config.nick),
        writer,
        wanted: config
            .channels
            .iter()
            .map(|channel| channel.as_str().with_octo().into_owned())
            .collect(),
        joined: BTreeSet::new(),
        active: None,
    };

    session.look_at(Session::<std::io::Stdout>::STATUS);
    session.router.loaded();

    loop {
        let input = flume::Selector::new()
            .recv(&irc, |msg| msg.map_or(Input::Closed, Input::Irc))
            .recv(&stdin, |line| line.map_or(Input::Closed, Input::Line))
            .wait();

        match input {
            Input::Irc(msg) => session.handle_irc(msg),
            Input::Line(line) if session.handle_line(&line) => {}
            Input::Line(..) => break,
            Input::Closed => {
                session.handle_line("/quit");
                break;
            }
        }
    }

    session.router.unloaded();
    drop(session);

    wait();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hilite::irc::Privmsg;

    fn session(channels: &[&str]) -> (Session<Vec<u8>>, flume::Receiver<String>) {
        let (writer, sent) = irc::IrcWriter::new();
        let router = Router::new(
            Terminal::new(Vec::new()),
            Registry::default(),
            Formatter::default(),
        );
        let session = Session {
            router,
            classifier: Classifier::new("libera", "yak"),
            writer,
            wanted: channels.iter().map(|c| c.to_string()).collect(),
            joined: BTreeSet::new(),
            active: None,
        };
        (session, sent)
    }

    fn join(nick: &str, channel: &str) -> IrcMessage {
        IrcMessage::Join {
            nick: nick.into(),
            channel: channel.into(),
        }
    }

    #[test]
    fn ready_joins_configured_channels() {
        let (mut session, sent) = session(&["#rust"]);
        session.handle_irc(IrcMessage::Ready("yak".into()));
        assert_eq!(sent.drain().collect::<Vec<_>>(), vec!["JOIN #rust\r\n"]);
    }

    #[test]
    fn reconnect_rejoins_channels_joined_by_hand() {
        let (mut session, sent) = session(&["#rust"]);
        session.handle_irc(IrcMessage::Ready("yak".into()));
        assert!(session.handle_line("/join #extra"));
        session.handle_irc(join("yak", "#rust"));
        session.handle_irc(join("yak", "#extra"));
        sent.drain().for_each(drop);

        session.handle_irc(IrcMessage::Disconnected);
        assert!(session.joined.is_empty());
        assert_eq!(session.active, None);

        session.handle_irc(IrcMessage::Ready("yak".into()));
        assert_eq!(
            sent.drain().collect::<Vec<_>>(),
            vec!["JOIN #extra\r\n", "JOIN #rust\r\n"]
        );
    }

    #[test]
    fn parted_channels_are_not_rejoined() {
        let (mut session, sent) = session(&["#rust", "#extra"]);
        session.handle_irc(join("yak", "#rust"));
        session.handle_irc(join("yak", "#extra"));
        session.handle_irc(IrcMessage::Part {
            nick: "yak".into(),
            channel: "#extra".into(),
        });

        session.handle_irc(IrcMessage::Disconnected);
        session.handle_irc(IrcMessage::Ready("yak".into()));
        assert_eq!(sent.drain().collect::<Vec<_>>(), vec!["JOIN #rust\r\n"]);
    }

    #[test]
    fn other_users_joining_are_not_tracked() {
        let (mut session, _sent) = session(&[]);
        session.handle_irc(join("bob", "#rust"));
        assert!(session.wanted.is_empty());
        assert!(session.joined.is_empty());
    }

    #[test]
    fn highlights_reach_the_side_window() {
        let (mut session, _sent) = session(&[]);
        session.handle_irc(join("yak", "#rust"));
        session.handle_irc(IrcMessage::Privmsg(Privmsg {
            sender: "bob".into(),
            target: "#rust".into(),
            data: "hi yak".into(),
        }));

        let out = std::str::from_utf8(session.router.sink().get_ref()).unwrap();
        assert!(out.contains("[libera/#rust] <bob> hi yak\n"));
        assert!(out.contains("[libera/!@#rust] <bob> hi yak\n"));
    }
}
