use crate::rr::RecordSet;

/// One planned difference between current and desired zone state.
///
/// Changes arrive already ordered from the caller's diffing step and are
/// consumed once per apply cycle; nothing here retries or reorders them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// The record set does not exist yet and should be added.
    Create(RecordSet),
    /// The record set exists with different contents; the stored values
    /// are replaced wholesale with the desired ones.
    Update {
        existing: RecordSet,
        desired: RecordSet,
    },
    /// The record set exists and should be removed entirely.
    Delete(RecordSet),
}

impl Change {
    /// The record set this change is about: the desired state for
    /// creates and updates, the existing state for deletes.
    pub fn record(&self) -> &RecordSet {
        match self {
            Change::Create(set) => set,
            Change::Update { desired, .. } => desired,
            Change::Delete(set) => set,
        }
    }

    /// The record set that describes desired state, if any survives
    /// this change. Deletes contribute nothing to desired state.
    pub fn desired(&self) -> Option<&RecordSet> {
        match self {
            Change::Create(set) => Some(set),
            Change::Update { desired, .. } => Some(desired),
            Change::Delete(_) => None,
        }
    }
}
