//! Shared value types: identifiers, enumerations and composite inputs.
//!
//! # Design
//! Every resource gets its own identifier newtype so a recipient id can never
//! be passed where a plan id is expected, even though both are plain strings
//! on the wire. Enumerations derive their canonical wire spelling through
//! `strum` and `serde` so encoding and decoding agree.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::form::{Composite, ToWire};

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl ToWire for $name {
            fn to_wire(&self) -> String {
                self.0.clone()
            }
        }
    };
}

id_type!(
    /// Identifier of a transfer recipient (`rp_...`).
    RecipientId
);
id_type!(
    /// Identifier of a subscription plan. Chosen by the caller at creation.
    PlanId
);
id_type!(
    /// Identifier of a card attached to a recipient (`card_...`).
    CardId
);
id_type!(
    /// Single-use token standing in for card or bank details (`tok_...`).
    TokenId
);

/// Whether a recipient is a person or a company.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RecipientType {
    Individual,
    Corporation,
}

/// Billing period of a plan.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Interval {
    Day,
    Week,
    Month,
    Year,
}

/// ISO 4217 currency, sent lowercase.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Currency {
    Usd,
    Eur,
    Gbp,
    Cad,
    Aud,
    Jpy,
    Chf,
    Sek,
    Nok,
    Dkk,
}

macro_rules! display_to_wire {
    ($($ty:ty),*) => {
        $(
            impl ToWire for $ty {
                fn to_wire(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

display_to_wire!(RecipientType, Interval, Currency);

/// Amount in the currency's smallest unit (cents for USD).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(pub u64);

impl ToWire for Amount {
    fn to_wire(&self) -> String {
        self.0.to_wire()
    }
}

/// Bank account details sent as `bank_account[...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankAccount {
    /// Two-letter ISO country code.
    pub country: String,
    pub routing_number: String,
    pub account_number: String,
}

impl Composite for BankAccount {
    fn sub_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("country", self.country.clone()),
            ("routing_number", self.routing_number.clone()),
            ("account_number", self.account_number.clone()),
        ]
    }
}

/// Debit card details sent as `card[...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub number: String,
    pub exp_month: u8,
    pub exp_year: u16,
    pub cvc: String,
}

impl Composite for Card {
    fn sub_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("number", self.number.clone()),
            ("exp_month", self.exp_month.to_wire()),
            ("exp_year", self.exp_year.to_wire()),
            ("cvc", self.cvc.clone()),
        ]
    }
}

/// Acknowledgment returned by delete operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deleted<Id> {
    pub deleted: bool,
    pub id: Id,
}

/// One page of a collection listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub url: String,
}
