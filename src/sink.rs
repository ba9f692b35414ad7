use std::fmt;

use crate::Color;

/// A window of the chat client
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct Target {
    pub network: String,
    pub name: String,
}

impl Target {
    pub fn new(network: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            network: network.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.name)
    }
}

/// Where formatted lines end up. Failures are the client's to report.
pub trait Sink {
    /// The window the user is currently looking at
    fn current(&self) -> Option<Target>;
    /// Finds the window, creating it if it doesn't exist yet
    fn open(&mut self, target: &Target);
    fn switch(&mut self, target: &Target);
    fn print(&mut self, target: &Target, line: &str);
    /// Asks for the user's attention
    fn mark(&mut self, target: &Target, color: Color);
    fn focus(&mut self, target: &Target);
}

/// Temporarily makes a window current.
///
/// The previous window is switched back to and focused when this is dropped,
/// including while unwinding.
pub struct Scope<'a, S: Sink + ?Sized> {
    sink: &'a mut S,
    target: Target,
    previous: Option<Target>,
}

impl<'a, S: Sink + ?Sized> Scope<'a, S> {
    pub fn enter(sink: &'a mut S, target: Target) -> Self {
        let previous = sink.current();
        sink.open(&target);
        sink.switch(&target);
        Self {
            sink,
            target,
            previous,
        }
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn print(&mut self, line: &str) {
        self.sink.print(&self.target, line)
    }
}

impl<'a, S: Sink + ?Sized> Drop for Scope<'a, S> {
    fn drop(&mut self) {
        let Some(previous) = self.previous.take() else { return };
        self.sink.switch(&previous);
        self.sink.focus(&previous);
    }
}
