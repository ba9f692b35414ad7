use std::time::Duration;

use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::TcpStream,
};
use tokio_stream::StreamExt as _;

use crate::util::ChannelExt as _;

pub struct IrcWriter {
    sender: flume::Sender<String>,
}

impl IrcWriter {
    pub fn new() -> (Self, flume::Receiver<String>) {
        let (tx, rx) = flume::unbounded();
        (Self { sender: tx }, rx)
    }

    pub fn join(&self, channel: &str) {
        let channel = channel.with_octo();
        let _ = self.sender.send(format!("JOIN {channel}\r\n"));
    }

    pub fn part(&self, channel: &str) {
        let channel = channel.with_octo();
        let _ = self.sender.send(format!("PART {channel}\r\n"));
    }

    pub fn privmsg(&self, target: &str, data: &str) {
        let _ = self.sender.send(format!("PRIVMSG {target} :{data}\r\n"));
    }

    pub fn action(&self, target: &str, data: &str) {
        self.privmsg(target, &format!("\x01ACTION {data}\x01"))
    }

    pub fn quit(&self, reason: &str) {
        let _ = self.sender.send(format!("QUIT :{reason}\r\n"));
    }
}

pub struct Registration {
    pub nick: String,
    pub user: String,
    pub password: Option<String>,
}

pub async fn run(
    addr: &str,
    reg: Registration,
    sink: flume::Sender<IrcMessage>,
    recv: flume::Receiver<String>,
) {
    enum MaybeDisconnect<T> {
        Ok(T),
        Break,
        Continue,
    }

    async fn check_error<T, E>(
        result: Result<T, E>,
        sink: &flume::Sender<IrcMessage>,
    ) -> MaybeDisconnect<T>
    where
        T: Send,
        E: std::fmt::Display + Send,
    {
        match result {
            Ok(val) => MaybeDisconnect::Ok(val),
            Err(err) => {
                tracing::warn!(%err, "connection error");
                if sink.send(IrcMessage::Disconnected).is_err() {
                    return MaybeDisconnect::Break;
                }
                tokio::time::sleep(RECONNECT_DELAY).await;
                MaybeDisconnect::Continue
            }
        }
    }

    let mut outgoing = recv.into_stream();

    'main: loop {
        tracing::debug!("start of main loop");

        macro_rules! check {
            ($expr:expr) => {
                match check_error($expr, &sink).await {
                    MaybeDisconnect::Ok(val) => val,
                    MaybeDisconnect::Break => break 'main,
                    MaybeDisconnect::Continue => continue 'main,
                }
            };
        }

        if sink.send(IrcMessage::Connecting).is_err() {
            break;
        }

        tracing::info!(addr, "connecting");
        let mut stream = check!(TcpStream::connect(addr).await);

        let Registration {
            nick,
            user,
            password,
        } = &reg;

        tracing::debug!(%nick, "sending registration");
        let pass = password.iter().map(|pass| format!("PASS {pass}\r\n"));
        for line in pass.chain([
            format!("NICK {nick}\r\n"),
            format!("USER {user} 0 * :{user}\r\n"),
        ]) {
            check!(stream.write_all(line.as_bytes()).await);
        }
        check!(stream.flush().await);

        let (read, mut write) = stream.into_split();
        let mut lines = BufReader::new(read).lines();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = check!(line) else {
                        tracing::info!("connection closed");
                        if sink.send(IrcMessage::Disconnected).is_err() {
                            break 'main;
                        }
                        tokio::time::sleep(RECONNECT_DELAY).await;
                        continue 'main;
                    };
                    let Some(msg) = RawMessage::parse(&line) else { continue };

                    tracing::debug!("<- {}", msg.raw.escape_debug());
                    match msg.command {
                        Command::Ping => {
                            let token = msg.data.as_deref().or(msg.args.first().map(|s| &**s)).unwrap_or_default();
                            check!(write.write_all(format!("PONG :{token}\r\n").as_bytes()).await);
                            check!(write.flush().await);
                        }

                        Command::Welcome => {
                            let nick = msg.args.first().cloned().unwrap_or_else(|| nick.clone());
                            let _ = sink.send(IrcMessage::Ready(nick));
                        }

                        Command::Join => {
                            if let (Some(nick), Some(channel)) = (msg.nick(), msg.args.first().or(msg.data.as_ref())) {
                                let _ = sink.send(IrcMessage::Join { nick: nick.to_string(), channel: channel.clone() });
                            }
                        }

                        Command::Part => {
                            if let (Some(nick), Some(channel)) = (msg.nick(), msg.args.first()) {
                                let _ = sink.send(IrcMessage::Part { nick: nick.to_string(), channel: channel.clone() });
                            }
                        }

                        Command::Nick => {
                            if let (Some(old), Some(new)) = (msg.nick(), msg.data.as_ref().or(msg.args.first())) {
                                let _ = sink.send(IrcMessage::Nick { old: old.to_string(), new: new.clone() });
                            }
                        }

                        Command::Privmsg => {
                            if let Some(pm) = msg.as_privmsg() {
                                let _ = sink.send(IrcMessage::Privmsg(pm));
                            }
                        }

                        Command::Error => {
                            tracing::warn!(reason = msg.data.as_deref().unwrap_or_default(), "server error");
                            if sink.send(IrcMessage::Disconnected).is_err() {
                                break 'main;
                            }
                            tokio::time::sleep(RECONNECT_DELAY).await;
                            continue 'main;
                        }

                        Command::Other => {}
                    }
                }

                data = outgoing.next() => {
                    let Some(data) = data else {
                        tracing::debug!("writer dropped, closing the connection");
                        break 'main;
                    };
                    tracing::debug!("-> {}", data.escape_debug());
                    check!(write.write_all(data.as_bytes()).await);
                    check!(write.flush().await);
                }
            }
        }
    }
}

const RECONNECT_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IrcMessage {
    Connecting,
    Disconnected,

    /// Registration finished, with the nick the server gave us
    Ready(String),

    Join { nick: String, channel: String },
    Part { nick: String, channel: String },
    Nick { old: String, new: String },

    Privmsg(Privmsg),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Privmsg {
    pub sender: String,
    pub target: String,
    pub data: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Welcome,
    Ping,
    Join,
    Part,
    Nick,
    Privmsg,
    Error,
    Other,
}

impl Command {
    fn parse(input: &mut &str) -> Self {
        let (head, tail) = input.split_at(input.find(' ').unwrap_or(input.len()));
        *input = tail;
        match head {
            "001" => Self::Welcome,
            "PING" => Self::Ping,
            "JOIN" => Self::Join,
            "PART" => Self::Part,
            "NICK" => Self::Nick,
            "PRIVMSG" => Self::Privmsg,
            "ERROR" => Self::Error,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RawMessage {
    pub prefix: Option<String>,
    pub command: Command,
    pub args: Vec<String>,
    pub data: Option<String>,
    pub raw: String,
}

impl RawMessage {
    /// The nick part of a `nick!user@host` prefix
    pub fn nick(&self) -> Option<&str> {
        let prefix = self.prefix.as_deref()?;
        let (nick, _) = prefix.split_once('!').unwrap_or((prefix, ""));
        Some(nick).filter(|s| !s.is_empty())
    }

    fn as_privmsg(&self) -> Option<Privmsg> {
        if !matches!(self.command, Command::Privmsg) {
            return None;
        }

        Some(Privmsg {
            sender: self.nick()?.to_string(),
            target: self.args.first()?.clone(),
            data: self.data.clone()?,
        })
    }

    pub fn parse(input: &str) -> Option<Self> {
        let raw = input;

        let input = &mut input.trim();
        if input.is_empty() {
            return None;
        }

        // tags are never requested, but skip them if a server sends them anyway
        if input.starts_with('@') {
            let (_, tail) = input.split_once(' ')?;
            *input = tail.trim_start();
        }

        let prefix = match input.strip_prefix(':') {
            Some(tail) => {
                let (head, tail) = tail.split_once(' ')?;
                *input = tail.trim_start();
                Some(head.to_string())
            }
            None => None,
        };

        let command = Command::parse(input);
        let (head, tail) = match input.find(" :") {
            Some(pos) => input.split_at(pos + 1),
            None => (*input, ""),
        };

        let args = head
            .split_ascii_whitespace()
            .map(ToString::to_string)
            .collect();

        let data = tail.strip_prefix(':').map(ToString::to_string);

        Some(Self {
            prefix,
            command,
            args,
            data,
            raw: raw.to_string(),
        })
    }
}
