//! Traversal phases for one start URL

use crate::HarvestError;
use std::fmt;

/// Where a start URL's traversal currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Fetching the current list page
    ListFetch,

    /// Walking the candidates discovered on the current list page
    LinkProcessing,

    /// Pagination finished, was aborted, or the run stopped
    Done,
}

impl CrawlPhase {
    /// Returns true if no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Checks whether moving to `next` is a valid transition
    ///
    /// ListFetch and LinkProcessing alternate; any phase may end in Done.
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        match (self, next) {
            (Self::Done, _) => false,
            (_, Self::Done) => true,
            (Self::ListFetch, Self::LinkProcessing) => true,
            (Self::LinkProcessing, Self::ListFetch) => true,
            _ => false,
        }
    }

    /// Moves to `next`, rejecting invalid transitions
    pub fn transition(&mut self, next: CrawlPhase) -> Result<(), HarvestError> {
        if !self.can_transition_to(next) {
            return Err(HarvestError::InvalidTransition {
                from: *self,
                to: next,
            });
        }
        *self = next;
        Ok(())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ListFetch => "list_fetch",
            Self::LinkProcessing => "link_processing",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
