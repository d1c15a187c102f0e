use serde::Serialize;

/// Generation counter for one kind of in-flight request.
///
/// Every request takes a ticket; only the response holding the most recent
/// ticket may be applied. Earlier responses are stale and must be dropped.
#[derive(Debug, Clone, Default)]
pub struct FetchGuard {
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

impl FetchGuard {
    pub fn issue(&mut self) -> FetchTicket {
        self.generation += 1;
        FetchTicket(self.generation)
    }

    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket.0 == self.generation
    }

    /// Invalidates every outstanding ticket.
    pub fn cancel(&mut self) {
        self.generation += 1;
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_latest_ticket_is_current() {
        let mut guard = FetchGuard::default();
        let first = guard.issue();
        let second = guard.issue();
        assert!(!guard.is_current(first));
        assert!(guard.is_current(second));

        guard.cancel();
        assert!(!guard.is_current(second));
    }
}
