/// Identifies one issued lookup request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Hands out increasing tickets; only the most recent one is current.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: u64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> RequestTicket {
        self.latest += 1;
        RequestTicket(self.latest)
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.latest
    }

    pub fn latest(&self) -> Option<RequestTicket> {
        (self.latest > 0).then_some(RequestTicket(self.latest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tickets_increase() {
        let mut seq = RequestSequencer::new();
        assert_eq!(seq.latest(), None);
        let a = seq.issue();
        let b = seq.issue();
        assert!(b > a);
        assert_eq!(seq.latest(), Some(b));
    }

    #[test]
    fn test_only_latest_is_current() {
        let mut seq = RequestSequencer::new();
        let first = seq.issue();
        assert!(seq.is_current(first));

        let second = seq.issue();
        assert!(!seq.is_current(first));
        assert!(seq.is_current(second));
    }
}
