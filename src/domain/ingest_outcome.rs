//! Result of ingesting a candidate click.

use crate::domain::entities::Click;

/// Which of the two follow-up behaviors a caller should pick.
///
/// Callers branch on the variant: a redirect-only flow for [`Existing`],
/// a redirect-and-log flow for [`Created`].
///
/// [`Existing`]: IngestOutcome::Existing
/// [`Created`]: IngestOutcome::Created
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// A new click was persisted by this call.
    Created(Click),
    /// A click with the same dedup key was already stored; it is returned
    /// unchanged, including its original `param2`.
    Existing(Click),
}

impl IngestOutcome {
    pub fn id(&self) -> &str {
        &self.click().id
    }

    pub fn was_existing(&self) -> bool {
        matches!(self, IngestOutcome::Existing(_))
    }

    pub fn click(&self) -> &Click {
        match self {
            IngestOutcome::Created(click) | IngestOutcome::Existing(click) => click,
        }
    }

    pub fn into_click(self) -> Click {
        match self {
            IngestOutcome::Created(click) | IngestOutcome::Existing(click) => click,
        }
    }
}
