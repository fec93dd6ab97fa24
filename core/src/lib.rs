//! Typed, I/O-free client core for a form-encoded payment API.
//!
//! # Overview
//! Resource modules (`recipient`, `plan`) build `RequestDescriptor`s from
//! strongly typed inputs. `StripeClient` renders descriptors into
//! `HttpRequest`s and parses `HttpResponse`s into the declared entity type.
//! The caller executes the actual HTTP round-trip, directly or through the
//! `Transport` trait.
//!
//! # Design
//! - Each write operation has a static field table (`form::Field`) over a
//!   parameter struct whose optional fields are `Option`s. `form::build`
//!   emits wire pairs for present fields only, in table order.
//! - A `*_base` function per operation takes the full parameter struct;
//!   named presets fill one slice of it and delegate.
//! - Absence on update means "leave unchanged" and is never sent.
//! - Identifiers are distinct newtypes per resource.

pub mod client;
pub mod config;
pub mod error;
pub mod form;
pub mod http;
pub mod list;
pub mod plan;
pub mod recipient;
pub mod request;
pub mod types;

pub use client::StripeClient;
pub use crate::config::ClientConfig;
pub use error::ApiError;
pub use form::{Metadata, WirePair};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
pub use list::ListParams;
pub use plan::{CreatePlan, Plan, UpdatePlan};
pub use recipient::{CardSource, CreateRecipient, PersonName, Recipient, UpdateRecipient};
pub use request::RequestDescriptor;
pub use types::{
    Amount, BankAccount, Card, CardId, Currency, Deleted, Interval, List, PlanId, RecipientId,
    RecipientType, TokenId,
};
