use std::collections::HashMap;

use crate::ChannelState;

/// Every channel seen so far, grouped by network.
///
/// States are created on first use and live as long as the registry.
#[derive(Debug)]
pub struct Registry {
    capacity: usize,
    networks: HashMap<String, HashMap<String, ChannelState>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(ChannelState::DEFAULT_HISTORY_LENGTH)
    }
}

impl Registry {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "history length cannot be zero");
        Self {
            capacity,
            networks: HashMap::new(),
        }
    }

    pub fn get_or_create(&mut self, network: &str, channel: &str) -> &mut ChannelState {
        let capacity = self.capacity;
        self.networks
            .entry(network.to_string())
            .or_default()
            .entry(channel.to_string())
            .or_insert_with(|| {
                tracing::debug!(network, channel, capacity, "tracking channel");
                ChannelState::with_capacity(channel, capacity)
            })
    }

    pub fn get(&self, network: &str, channel: &str) -> Option<&ChannelState> {
        self.networks.get(network)?.get(channel)
    }

    pub fn networks(&self) -> impl Iterator<Item = &str> {
        self.networks.keys().map(|s| &**s)
    }

    pub fn len(&self) -> usize {
        self.networks.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
