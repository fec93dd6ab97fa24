//! Pagination parameters shared by every collection listing.

use crate::form::{self, wire, Field, ToWire, WirePair};

/// Optional page size and cursors for a listing of resources identified by
/// `Id`. Cursors only accept ids of the listed resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams<Id> {
    pub limit: Option<u32>,
    pub starting_after: Option<Id>,
    pub ending_before: Option<Id>,
}

impl<Id> Default for ListParams<Id> {
    fn default() -> Self {
        Self {
            limit: None,
            starting_after: None,
            ending_before: None,
        }
    }
}

impl<Id> ListParams<Id> {
    pub fn limit(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn starting_after(mut self, id: Id) -> Self {
        self.starting_after = Some(id);
        self
    }

    pub fn ending_before(mut self, id: Id) -> Self {
        self.ending_before = Some(id);
        self
    }
}

impl<Id: ToWire> ListParams<Id> {
    fn fields() -> [Field<Self>; 3] {
        [
            Field::scalar("limit", |p: &Self| wire(p.limit.as_ref())),
            Field::scalar("starting_after", |p: &Self| wire(p.starting_after.as_ref())),
            Field::scalar("ending_before", |p: &Self| wire(p.ending_before.as_ref())),
        ]
    }

    pub(crate) fn to_pairs(&self) -> Vec<WirePair> {
        form::build(&Self::fields(), self)
    }
}
