use std::borrow::Cow;

pub trait ChannelExt<'a> {
    fn with_octo(self) -> Cow<'a, str>
    where
        Self: Sized + 'a;

    fn is_channel(&self) -> bool;
}

impl<'a> ChannelExt<'a> for &'a str {
    fn with_octo(self) -> Cow<'a, str>
    where
        Self: Sized,
    {
        if self.is_channel() {
            return Cow::Borrowed(self);
        }

        Cow::from(format!("#{self}"))
    }

    fn is_channel(&self) -> bool {
        self.starts_with(&['#', '&'][..])
    }
}

/// The host part of a `host:port` address
pub fn host_of(addr: &str) -> &str {
    addr.rsplit_once(':')
        .filter(|(_, port)| port.bytes().all(|c| c.is_ascii_digit()))
        .map_or(addr, |(host, _)| host)
}
