//! Transfer recipients: people or companies that receive payouts.
//!
//! # Design
//! `CreateRecipient` and `UpdateRecipient` are the sparse value sets for
//! the two write operations; each has a static field table and a
//! `*_base` function that encodes it. The named `create_*` / `update_*`
//! functions are presets that fill in one slice of the parameter struct
//! and leave the rest absent.
//!
//! The recipient's display name travels as a single `name` pair. On update
//! it is only sent when both first and last name are supplied, so a partial
//! name never overwrites the stored one.

use serde::{Deserialize, Serialize};

use crate::form::{self, entries, join_name, parts, wire, Field, Metadata, ToWire};
use crate::list::ListParams;
use crate::request::{collection_path, item_path, RequestDescriptor};
use crate::types::{BankAccount, Card, CardId, Deleted, List, RecipientId, RecipientType, TokenId};

const COLLECTION: &str = "recipients";

/// A recipient as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipient {
    pub id: RecipientId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub recipient_type: RecipientType,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub active_account: Option<AccountSummary>,
    #[serde(default)]
    pub default_card: Option<CardId>,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub livemode: bool,
    #[serde(default)]
    pub created: Option<i64>,
    #[serde(default)]
    pub metadata: Metadata,
}

/// Masked view of the bank account a recipient is paid into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub country: String,
    pub last4: String,
    #[serde(default)]
    pub bank_name: Option<String>,
}

/// A person's name as first, optional middle initial, and last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName {
    pub first: String,
    pub middle_initial: Option<char>,
    pub last: String,
}

impl PersonName {
    pub fn new(first: impl Into<String>, middle_initial: Option<char>, last: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            middle_initial,
            last: last.into(),
        }
    }
}

impl ToWire for PersonName {
    fn to_wire(&self) -> String {
        join_name(&self.first, self.middle_initial, &self.last)
    }
}

/// Where payouts to a card go: raw card details or a card token. Both are
/// sent under the `card` key, so only one may be given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardSource {
    Details(Card),
    Token(TokenId),
}

impl CardSource {
    fn details(&self) -> Option<&Card> {
        match self {
            CardSource::Details(card) => Some(card),
            CardSource::Token(_) => None,
        }
    }

    fn token(&self) -> Option<&TokenId> {
        match self {
            CardSource::Token(token) => Some(token),
            CardSource::Details(_) => None,
        }
    }
}

/// Every field accepted when creating a recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRecipient {
    pub name: PersonName,
    pub recipient_type: RecipientType,
    pub tax_id: Option<String>,
    pub bank_account: Option<BankAccount>,
    pub card: Option<CardSource>,
    pub email: Option<String>,
    pub description: Option<String>,
    pub metadata: Option<Metadata>,
}

impl CreateRecipient {
    /// Only the required fields.
    pub fn new(name: PersonName, recipient_type: RecipientType) -> Self {
        Self {
            name,
            recipient_type,
            tax_id: None,
            bank_account: None,
            card: None,
            email: None,
            description: None,
            metadata: None,
        }
    }

    pub fn with_card(name: PersonName, recipient_type: RecipientType, card: Card) -> Self {
        Self {
            card: Some(CardSource::Details(card)),
            ..Self::new(name, recipient_type)
        }
    }

    pub fn with_token(name: PersonName, recipient_type: RecipientType, token: TokenId) -> Self {
        Self {
            card: Some(CardSource::Token(token)),
            ..Self::new(name, recipient_type)
        }
    }

    pub fn with_bank_account(
        name: PersonName,
        recipient_type: RecipientType,
        bank_account: BankAccount,
    ) -> Self {
        Self {
            bank_account: Some(bank_account),
            ..Self::new(name, recipient_type)
        }
    }
}

const CREATE_FIELDS: &[Field<CreateRecipient>] = &[
    Field::scalar("name", |p: &CreateRecipient| Some(p.name.to_wire())),
    Field::scalar("type", |p: &CreateRecipient| Some(p.recipient_type.to_wire())),
    Field::scalar("tax_id", |p: &CreateRecipient| wire(p.tax_id.as_deref())),
    Field::composite("bank_account", |p: &CreateRecipient| {
        parts(p.bank_account.as_ref())
    }),
    Field::composite("card", |p: &CreateRecipient| {
        parts(p.card.as_ref().and_then(CardSource::details))
    }),
    Field::scalar("card", |p: &CreateRecipient| {
        wire(p.card.as_ref().and_then(CardSource::token))
    }),
    Field::scalar("email", |p: &CreateRecipient| wire(p.email.as_deref())),
    Field::scalar("description", |p: &CreateRecipient| wire(p.description.as_deref())),
    Field::nested("metadata", |p: &CreateRecipient| entries(p.metadata.as_ref())),
];

/// Changes to an existing recipient. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateRecipient {
    pub first_name: Option<String>,
    pub middle_initial: Option<char>,
    pub last_name: Option<String>,
    pub tax_id: Option<String>,
    pub bank_account: Option<BankAccount>,
    pub card: Option<CardSource>,
    pub default_card: Option<CardId>,
    pub email: Option<String>,
    pub description: Option<String>,
    pub metadata: Option<Metadata>,
}

impl UpdateRecipient {
    /// The full name to send, if both halves are present.
    fn name(&self) -> Option<String> {
        let first = self.first_name.as_deref()?;
        let last = self.last_name.as_deref()?;
        Some(join_name(first, self.middle_initial, last))
    }
}

const UPDATE_FIELDS: &[Field<UpdateRecipient>] = &[
    Field::scalar("name", UpdateRecipient::name),
    Field::scalar("tax_id", |p: &UpdateRecipient| wire(p.tax_id.as_deref())),
    Field::composite("bank_account", |p: &UpdateRecipient| {
        parts(p.bank_account.as_ref())
    }),
    Field::composite("card", |p: &UpdateRecipient| {
        parts(p.card.as_ref().and_then(CardSource::details))
    }),
    Field::scalar("card", |p: &UpdateRecipient| {
        wire(p.card.as_ref().and_then(CardSource::token))
    }),
    Field::scalar("default_card", |p: &UpdateRecipient| wire(p.default_card.as_ref())),
    Field::scalar("email", |p: &UpdateRecipient| wire(p.email.as_deref())),
    Field::scalar("description", |p: &UpdateRecipient| wire(p.description.as_deref())),
    Field::nested("metadata", |p: &UpdateRecipient| entries(p.metadata.as_ref())),
];

pub fn create_base(params: &CreateRecipient) -> RequestDescriptor<Recipient> {
    RequestDescriptor::post(collection_path(COLLECTION), form::build(CREATE_FIELDS, params))
}

pub fn create(
    first: &str,
    middle_initial: Option<char>,
    last: &str,
    recipient_type: RecipientType,
) -> RequestDescriptor<Recipient> {
    create_base(&CreateRecipient::new(
        PersonName::new(first, middle_initial, last),
        recipient_type,
    ))
}

pub fn create_with_card(
    first: &str,
    middle_initial: Option<char>,
    last: &str,
    recipient_type: RecipientType,
    card: Card,
) -> RequestDescriptor<Recipient> {
    create_base(&CreateRecipient::with_card(
        PersonName::new(first, middle_initial, last),
        recipient_type,
        card,
    ))
}

pub fn create_with_token(
    first: &str,
    middle_initial: Option<char>,
    last: &str,
    recipient_type: RecipientType,
    token: TokenId,
) -> RequestDescriptor<Recipient> {
    create_base(&CreateRecipient::with_token(
        PersonName::new(first, middle_initial, last),
        recipient_type,
        token,
    ))
}

pub fn create_with_bank_account(
    first: &str,
    middle_initial: Option<char>,
    last: &str,
    recipient_type: RecipientType,
    bank_account: BankAccount,
) -> RequestDescriptor<Recipient> {
    create_base(&CreateRecipient::with_bank_account(
        PersonName::new(first, middle_initial, last),
        recipient_type,
        bank_account,
    ))
}

pub fn get(id: &RecipientId) -> RequestDescriptor<Recipient> {
    RequestDescriptor::get(item_path(COLLECTION, id), Vec::new())
}

pub fn list(params: &ListParams<RecipientId>) -> RequestDescriptor<List<Recipient>> {
    RequestDescriptor::get(collection_path(COLLECTION), params.to_pairs())
}

pub fn update_base(id: &RecipientId, params: &UpdateRecipient) -> RequestDescriptor<Recipient> {
    RequestDescriptor::post(item_path(COLLECTION, id), form::build(UPDATE_FIELDS, params))
}

pub fn update_name(
    id: &RecipientId,
    first: &str,
    middle_initial: Option<char>,
    last: &str,
) -> RequestDescriptor<Recipient> {
    update_base(
        id,
        &UpdateRecipient {
            first_name: Some(first.to_string()),
            middle_initial,
            last_name: Some(last.to_string()),
            ..UpdateRecipient::default()
        },
    )
}

pub fn update_tax_id(id: &RecipientId, tax_id: &str) -> RequestDescriptor<Recipient> {
    update_base(
        id,
        &UpdateRecipient {
            tax_id: Some(tax_id.to_string()),
            ..UpdateRecipient::default()
        },
    )
}

pub fn update_bank_account(id: &RecipientId, bank_account: BankAccount) -> RequestDescriptor<Recipient> {
    update_base(
        id,
        &UpdateRecipient {
            bank_account: Some(bank_account),
            ..UpdateRecipient::default()
        },
    )
}

pub fn update_card(id: &RecipientId, card: Card) -> RequestDescriptor<Recipient> {
    update_base(
        id,
        &UpdateRecipient {
            card: Some(CardSource::Details(card)),
            ..UpdateRecipient::default()
        },
    )
}

pub fn update_token(id: &RecipientId, token: TokenId) -> RequestDescriptor<Recipient> {
    update_base(
        id,
        &UpdateRecipient {
            card: Some(CardSource::Token(token)),
            ..UpdateRecipient::default()
        },
    )
}

pub fn update_default_card(id: &RecipientId, card: CardId) -> RequestDescriptor<Recipient> {
    update_base(
        id,
        &UpdateRecipient {
            default_card: Some(card),
            ..UpdateRecipient::default()
        },
    )
}

pub fn update_email(id: &RecipientId, email: &str) -> RequestDescriptor<Recipient> {
    update_base(
        id,
        &UpdateRecipient {
            email: Some(email.to_string()),
            ..UpdateRecipient::default()
        },
    )
}

pub fn update_description(id: &RecipientId, description: &str) -> RequestDescriptor<Recipient> {
    update_base(
        id,
        &UpdateRecipient {
            description: Some(description.to_string()),
            ..UpdateRecipient::default()
        },
    )
}

pub fn update_metadata(id: &RecipientId, metadata: Metadata) -> RequestDescriptor<Recipient> {
    update_base(
        id,
        &UpdateRecipient {
            metadata: Some(metadata),
            ..UpdateRecipient::default()
        },
    )
}

pub fn delete(id: &RecipientId) -> RequestDescriptor<Deleted<RecipientId>> {
    RequestDescriptor::delete(item_path(COLLECTION, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;

    fn bank_account() -> BankAccount {
        BankAccount {
            country: "US".to_string(),
            routing_number: "110000000".to_string(),
            account_number: "000123456789".to_string(),
        }
    }

    fn card() -> Card {
        Card {
            number: "4000056655665556".to_string(),
            exp_month: 12,
            exp_year: 2030,
            cvc: "123".to_string(),
        }
    }

    fn id() -> RecipientId {
        RecipientId::new("rp_1")
    }

    #[test]
    fn create_with_required_fields_only() {
        let req = create("Jane", None, "Doe", RecipientType::Individual);
        assert_eq!(req.method(), HttpMethod::Post);
        assert_eq!(req.path(), "recipients");
        assert_eq!(req.pairs(), [("name", "Jane Doe"), ("type", "individual")]);
    }

    #[test]
    fn create_with_middle_initial() {
        let req = create("Jane", Some('Q'), "Doe", RecipientType::Corporation);
        assert_eq!(req.pairs(), [("name", "Jane Q Doe"), ("type", "corporation")]);
    }

    #[test]
    fn create_with_bank_account_expands_sub_keys() {
        let req = create_with_bank_account("Jane", None, "Doe", RecipientType::Individual, bank_account());
        assert_eq!(
            req.pairs(),
            [
                ("name", "Jane Doe"),
                ("type", "individual"),
                ("bank_account[country]", "US"),
                ("bank_account[routing_number]", "110000000"),
                ("bank_account[account_number]", "000123456789"),
            ]
        );
    }

    #[test]
    fn create_with_card_expands_sub_keys() {
        let req = create_with_card("Jane", None, "Doe", RecipientType::Individual, card());
        assert_eq!(
            req.pairs()[2..],
            [
                ("card[number]", "4000056655665556"),
                ("card[exp_month]", "12"),
                ("card[exp_year]", "2030"),
                ("card[cvc]", "123"),
            ]
        );
    }

    #[test]
    fn create_with_token_sends_flat_card_key() {
        let req = create_with_token("Jane", None, "Doe", RecipientType::Individual, TokenId::new("tok_1"));
        assert_eq!(
            req.pairs(),
            [("name", "Jane Doe"), ("type", "individual"), ("card", "tok_1")]
        );
    }

    #[test]
    fn create_base_keeps_table_order() {
        let params = CreateRecipient {
            metadata: Some(Metadata::new().insert("ref", "42")),
            email: Some("jane@example.com".to_string()),
            tax_id: Some("000000000".to_string()),
            description: Some("contractor".to_string()),
            ..CreateRecipient::new(PersonName::new("Jane", None, "Doe"), RecipientType::Individual)
        };
        let base = create_base(&params);
        let keys: Vec<&str> = base.pairs().iter().map(|p| p.key.as_str()).collect();
        assert_eq!(
            keys,
            ["name", "type", "tax_id", "email", "description", "metadata[ref]"]
        );
    }

    #[test]
    fn get_has_item_path_and_no_pairs() {
        let req = get(&id());
        assert_eq!(req.method(), HttpMethod::Get);
        assert_eq!(req.path(), "recipients/rp_1");
        assert!(req.pairs().is_empty());
    }

    #[test]
    fn list_with_limit_only() {
        let req = list(&ListParams::limit(10));
        assert_eq!(req.method(), HttpMethod::Get);
        assert_eq!(req.path(), "recipients");
        assert_eq!(req.pairs(), [("limit", "10")]);
    }

    #[test]
    fn list_cursor_takes_recipient_ids() {
        let req = list(&ListParams::default().ending_before(RecipientId::new("rp_9")));
        assert_eq!(req.pairs(), [("ending_before", "rp_9")]);
    }

    #[test]
    fn update_name_joins_parts() {
        let req = update_name(&id(), "Jane", None, "Doe");
        assert_eq!(req.method(), HttpMethod::Post);
        assert_eq!(req.path(), "recipients/rp_1");
        assert_eq!(req.pairs(), [("name", "Jane Doe")]);

        let req = update_name(&id(), "Jane", Some('Q'), "Doe");
        assert_eq!(req.pairs(), [("name", "Jane Q Doe")]);
    }

    #[test]
    fn update_omits_name_when_first_is_absent() {
        let params = UpdateRecipient {
            last_name: Some("Doe".to_string()),
            middle_initial: Some('Q'),
            email: Some("jane@example.com".to_string()),
            ..UpdateRecipient::default()
        };
        let req = update_base(&id(), &params);
        assert_eq!(req.pairs(), [("email", "jane@example.com")]);
    }

    #[test]
    fn update_omits_name_when_last_is_absent() {
        let params = UpdateRecipient {
            first_name: Some("Jane".to_string()),
            ..UpdateRecipient::default()
        };
        assert!(update_base(&id(), &params).pairs().is_empty());
    }

    #[test]
    fn empty_update_sends_nothing() {
        let req = update_base(&id(), &UpdateRecipient::default());
        assert_eq!(req.path(), "recipients/rp_1");
        assert!(req.pairs().is_empty());
    }

    #[test]
    fn each_update_preset_sets_only_its_field() {
        assert_eq!(update_tax_id(&id(), "123").pairs(), [("tax_id", "123")]);
        assert_eq!(update_email(&id(), "a@b.c").pairs(), [("email", "a@b.c")]);
        assert_eq!(update_description(&id(), "vip").pairs(), [("description", "vip")]);
        assert_eq!(update_token(&id(), TokenId::new("tok_2")).pairs(), [("card", "tok_2")]);
        assert_eq!(
            update_default_card(&id(), CardId::new("card_7")).pairs(),
            [("default_card", "card_7")]
        );
        assert_eq!(
            update_metadata(&id(), Metadata::new().insert("k", "v")).pairs(),
            [("metadata[k]", "v")]
        );
        assert_eq!(update_bank_account(&id(), bank_account()).pairs().len(), 3);
        assert_eq!(update_card(&id(), card()).pairs().len(), 4);
    }

    #[test]
    fn delete_targets_item_path() {
        let req = delete(&RecipientId::new("rp_42"));
        assert_eq!(req.method(), HttpMethod::Delete);
        assert_eq!(req.path(), "recipients/rp_42");
        assert!(req.pairs().is_empty());
        assert!(req.response_type().contains("Deleted"));
    }

    #[test]
    fn recipient_decodes_api_shape() {
        let json = r#"{
            "id": "rp_1",
            "object": "recipient",
            "name": "Jane Doe",
            "type": "individual",
            "email": null,
            "active_account": {"country": "US", "last4": "6789", "bank_name": "STRIPE TEST BANK"},
            "default_card": null,
            "verified": false,
            "livemode": false,
            "created": 1400000000,
            "metadata": {"ref": "42"}
        }"#;
        let recipient: Recipient = serde_json::from_str(json).unwrap();
        assert_eq!(recipient.id, RecipientId::new("rp_1"));
        assert_eq!(recipient.recipient_type, RecipientType::Individual);
        assert_eq!(recipient.active_account.unwrap().last4, "6789");
        assert_eq!(recipient.metadata, Metadata::new().insert("ref", "42"));
    }
}
