//! Subscription plans.

use serde::{Deserialize, Serialize};

use crate::form::{self, entries, wire, Field, Metadata, ToWire};
use crate::list::ListParams;
use crate::request::{collection_path, item_path, RequestDescriptor};
use crate::types::{Amount, Currency, Deleted, Interval, List, PlanId};

const COLLECTION: &str = "plans";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: PlanId,
    pub amount: Amount,
    pub currency: Currency,
    pub interval: Interval,
    #[serde(default = "single_interval")]
    pub interval_count: u32,
    pub name: String,
    #[serde(default)]
    pub trial_period_days: Option<u32>,
    #[serde(default)]
    pub statement_description: Option<String>,
    #[serde(default)]
    pub livemode: bool,
    #[serde(default)]
    pub metadata: Metadata,
}

fn single_interval() -> u32 {
    1
}

/// Every field accepted when creating a plan. The id is chosen by the
/// caller and sent in the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePlan {
    pub id: PlanId,
    pub amount: Amount,
    pub currency: Currency,
    pub interval: Interval,
    pub name: String,
    pub interval_count: Option<u32>,
    pub trial_period_days: Option<u32>,
    pub statement_description: Option<String>,
    pub metadata: Option<Metadata>,
}

impl CreatePlan {
    pub fn new(id: PlanId, amount: Amount, currency: Currency, interval: Interval, name: &str) -> Self {
        Self {
            id,
            amount,
            currency,
            interval,
            name: name.to_string(),
            interval_count: None,
            trial_period_days: None,
            statement_description: None,
            metadata: None,
        }
    }
}

const CREATE_FIELDS: &[Field<CreatePlan>] = &[
    Field::scalar("id", |p: &CreatePlan| Some(p.id.to_wire())),
    Field::scalar("amount", |p: &CreatePlan| Some(p.amount.to_wire())),
    Field::scalar("currency", |p: &CreatePlan| Some(p.currency.to_wire())),
    Field::scalar("interval", |p: &CreatePlan| Some(p.interval.to_wire())),
    Field::scalar("name", |p: &CreatePlan| Some(p.name.to_wire())),
    Field::scalar("interval_count", |p: &CreatePlan| wire(p.interval_count.as_ref())),
    Field::scalar("trial_period_days", |p: &CreatePlan| wire(p.trial_period_days.as_ref())),
    Field::scalar("statement_description", |p: &CreatePlan| {
        wire(p.statement_description.as_deref())
    }),
    Field::nested("metadata", |p: &CreatePlan| entries(p.metadata.as_ref())),
];

/// Changes to an existing plan. Price and interval are immutable
/// server-side, so only descriptive fields appear here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdatePlan {
    pub name: Option<String>,
    pub statement_description: Option<String>,
    pub metadata: Option<Metadata>,
}

const UPDATE_FIELDS: &[Field<UpdatePlan>] = &[
    Field::scalar("name", |p: &UpdatePlan| wire(p.name.as_deref())),
    Field::scalar("statement_description", |p: &UpdatePlan| {
        wire(p.statement_description.as_deref())
    }),
    Field::nested("metadata", |p: &UpdatePlan| entries(p.metadata.as_ref())),
];

pub fn create_base(params: &CreatePlan) -> RequestDescriptor<Plan> {
    RequestDescriptor::post(collection_path(COLLECTION), form::build(CREATE_FIELDS, params))
}

pub fn create(
    id: PlanId,
    amount: Amount,
    currency: Currency,
    interval: Interval,
    name: &str,
) -> RequestDescriptor<Plan> {
    create_base(&CreatePlan::new(id, amount, currency, interval, name))
}

pub fn create_with_trial(
    id: PlanId,
    amount: Amount,
    currency: Currency,
    interval: Interval,
    name: &str,
    trial_period_days: u32,
) -> RequestDescriptor<Plan> {
    create_base(&CreatePlan {
        trial_period_days: Some(trial_period_days),
        ..CreatePlan::new(id, amount, currency, interval, name)
    })
}

pub fn get(id: &PlanId) -> RequestDescriptor<Plan> {
    RequestDescriptor::get(item_path(COLLECTION, id), Vec::new())
}

pub fn list(params: &ListParams<PlanId>) -> RequestDescriptor<List<Plan>> {
    RequestDescriptor::get(collection_path(COLLECTION), params.to_pairs())
}

pub fn update_base(id: &PlanId, params: &UpdatePlan) -> RequestDescriptor<Plan> {
    RequestDescriptor::post(item_path(COLLECTION, id), form::build(UPDATE_FIELDS, params))
}

pub fn update_name(id: &PlanId, name: &str) -> RequestDescriptor<Plan> {
    update_base(
        id,
        &UpdatePlan {
            name: Some(name.to_string()),
            ..UpdatePlan::default()
        },
    )
}

pub fn update_statement_description(id: &PlanId, description: &str) -> RequestDescriptor<Plan> {
    update_base(
        id,
        &UpdatePlan {
            statement_description: Some(description.to_string()),
            ..UpdatePlan::default()
        },
    )
}

pub fn update_metadata(id: &PlanId, metadata: Metadata) -> RequestDescriptor<Plan> {
    update_base(
        id,
        &UpdatePlan {
            metadata: Some(metadata),
            ..UpdatePlan::default()
        },
    )
}

pub fn delete(id: &PlanId) -> RequestDescriptor<Deleted<PlanId>> {
    RequestDescriptor::delete(item_path(COLLECTION, id))
}
