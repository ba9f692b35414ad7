//! Collects the lines around a highlight into a window of their own.

mod ring;
pub use ring::Ring;

pub mod color;
pub use color::{Color, Palette};

mod event;
pub use event::{ChatEvent, Event, EventKind, EventSource, Flags, Message};

mod format;
pub use format::{Formatter, LOG_TAG};

mod channel;
pub use channel::{ChannelState, Emission};

mod registry;
pub use registry::Registry;

pub mod sink;
pub use sink::{Scope, Sink, Target};

pub mod router;
pub use router::Router;

pub mod classify;
pub use classify::Classifier;

pub mod config;
pub use config::Config;

pub mod irc;

mod term;
pub use term::Terminal;

pub mod runtime;

pub mod util;
