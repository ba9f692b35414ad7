use std::{collections::HashSet, io::Write};

use crate::{color, Color, Sink, Target};

/// Prints every window to a single writer, one `[network/window] line` per line
#[derive(Debug)]
pub struct Terminal<W> {
    out: W,
    current: Option<Target>,
    focused: Option<Target>,
    windows: HashSet<Target>,
}

impl<W: Write> Terminal<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            current: None,
            focused: None,
            windows: HashSet::new(),
        }
    }

    /// Makes `target` the window the user is looking at
    pub fn look_at(&mut self, target: Target) {
        self.windows.insert(target.clone());
        self.focused.replace(target.clone());
        self.current.replace(target);
    }

    pub fn focused(&self) -> Option<&Target> {
        self.focused.as_ref()
    }

    pub fn has_window(&self, target: &Target) -> bool {
        self.windows.contains(target)
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Sink for Terminal<W> {
    fn current(&self) -> Option<Target> {
        self.current.clone()
    }

    fn open(&mut self, target: &Target) {
        if self.windows.insert(target.clone()) {
            tracing::info!(%target, "opened window");
        }
    }

    fn switch(&mut self, target: &Target) {
        self.current.replace(target.clone());
    }

    fn print(&mut self, target: &Target, line: &str) {
        let line = color::strip(line).replace('\t', " ");
        if let Err(err) = writeln!(self.out, "[{target}] {line}").and_then(|_| self.out.flush()) {
            tracing::warn!(%target, %err, "cannot print");
        }
    }

    fn mark(&mut self, target: &Target, color: Color) {
        tracing::info!(%target, color = color.0, "window wants attention");
        if let Err(err) = write!(self.out, "\x07").and_then(|_| self.out.flush()) {
            tracing::warn!(%target, %err, "cannot ring the bell");
        }
    }

    fn focus(&mut self, target: &Target) {
        tracing::trace!(%target, "focus");
        self.focused.replace(target.clone());
    }
}
