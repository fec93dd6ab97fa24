use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub country: String,
    pub last4: String,
    pub bank_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recipient {
    pub id: String,
    pub object: String,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub recipient_type: String,
    pub tax_id_provided: bool,
    pub email: Option<String>,
    pub description: Option<String>,
    pub active_account: Option<AccountSummary>,
    pub default_card: Option<String>,
    pub verified: bool,
    pub livemode: bool,
    pub created: i64,
    pub metadata: BTreeMap<String, String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: String,
    pub object: String,
    pub amount: u64,
    pub currency: String,
    pub interval: String,
    pub interval_count: u32,
    pub name: String,
    pub trial_period_days: Option<u32>,
    pub statement_description: Option<String>,
    pub livemode: bool,
    pub metadata: BTreeMap<String, String>,
}

/// In-memory state, kept in creation order so cursors are stable.
#[derive(Default)]
pub struct Store {
    recipients: Vec<Recipient>,
    plans: Vec<Plan>,
    next_id: u64,
}

impl Store {
    fn next(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}_{}", self.next_id)
    }
}

pub type Db = Arc<RwLock<Store>>;

type ApiResult = Result<Json<Value>, (StatusCode, Json<Value>)>;

/// Form pairs as sent, in order. Later duplicates win.
struct Params(Vec<(String, String)>);

impl Params {
    fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn require(&self, key: &str) -> Result<&str, (StatusCode, Json<Value>)> {
        self.get(key)
            .ok_or_else(|| invalid_request(&format!("Missing required param: {key}."), Some(key)))
    }

    fn has_prefix(&self, prefix: &str) -> bool {
        self.0.iter().any(|(k, _)| k.starts_with(&format!("{prefix}[")))
    }

    /// Entries of a bracketed namespace, e.g. `metadata[k]=v`.
    fn nested(&self, prefix: &str) -> BTreeMap<String, String> {
        let open = format!("{prefix}[");
        self.0
            .iter()
            .filter_map(|(k, v)| {
                k.strip_prefix(&open)
                    .and_then(|rest| rest.strip_suffix(']'))
                    .map(|inner| (inner.to_string(), v.clone()))
            })
            .collect()
    }
}

fn invalid_request(message: &str, param: Option<&str>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": {
                "type": "invalid_request_error",
                "message": message,
                "param": param,
            }
        })),
    )
}

fn not_found(kind: &str, id: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": {
                "type": "invalid_request_error",
                "message": format!("No such {kind}: {id}"),
                "param": "id",
            }
        })),
    )
}

fn internal_error(e: serde_json::Error) -> (StatusCode, Json<Value>) {
    tracing::error!(error = %e, "response serialization failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": { "type": "api_error", "message": e.to_string() } })),
    )
}

fn to_json<T: Serialize>(value: &T) -> ApiResult {
    serde_json::to_value(value).map(Json).map_err(internal_error)
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/v1/recipients", get(list_recipients).post(create_recipient))
        .route(
            "/v1/recipients/{id}",
            get(get_recipient).post(update_recipient).delete(delete_recipient),
        )
        .route("/v1/plans", get(list_plans).post(create_plan))
        .route("/v1/plans/{id}", get(get_plan).post(update_plan).delete(delete_plan))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Slice a creation-ordered collection by `limit`, `starting_after` and
/// `ending_before`, returning the page and whether more items follow.
fn paginate<'a, T>(
    items: &'a [T],
    id_of: impl Fn(&T) -> &str,
    query: &Params,
) -> Result<(&'a [T], bool), (StatusCode, Json<Value>)> {
    let limit = match query.get("limit") {
        Some(raw) => raw
            .parse::<usize>()
            .ok()
            .filter(|n| (1..=100).contains(n))
            .ok_or_else(|| invalid_request("Invalid integer: limit", Some("limit")))?,
        None => 10,
    };
    let position = |cursor: &str| items.iter().position(|item| id_of(item) == cursor);

    if let Some(cursor) = query.get("starting_after") {
        let start = position(cursor).ok_or_else(|| invalid_request("Invalid cursor", Some("starting_after")))? + 1;
        let end = (start + limit).min(items.len());
        return Ok((&items[start..end], end < items.len()));
    }
    if let Some(cursor) = query.get("ending_before") {
        let end = position(cursor).ok_or_else(|| invalid_request("Invalid cursor", Some("ending_before")))?;
        let start = end.saturating_sub(limit);
        return Ok((&items[start..end], start > 0));
    }
    let end = limit.min(items.len());
    Ok((&items[..end], end < items.len()))
}

fn list_envelope<T: Serialize>(url: &str, page: &[T], has_more: bool) -> ApiResult {
    let data = serde_json::to_value(page).map_err(internal_error)?;
    Ok(Json(json!({
        "object": "list",
        "url": url,
        "has_more": has_more,
        "data": data,
    })))
}

fn apply_account(recipient: &mut Recipient, params: &Params) {
    if params.has_prefix("bank_account") {
        let account = params.get("bank_account[account_number]").unwrap_or_default();
        let last4 = account
            .char_indices()
            .rev()
            .nth(3)
            .map_or(account, |(i, _)| &account[i..]);
        recipient.active_account = Some(AccountSummary {
            country: params.get("bank_account[country]").unwrap_or("US").to_string(),
            last4: last4.to_string(),
            bank_name: Some("STRIPE TEST BANK".to_string()),
        });
    }
}

fn apply_card(store: &mut Store, recipient: &mut Recipient, params: &Params) {
    if params.has_prefix("card") || params.get("card").is_some() {
        recipient.default_card = Some(store.next("card"));
    }
}

async fn list_recipients(State(db): State<Db>, Query(query): Query<Vec<(String, String)>>) -> ApiResult {
    let store = db.read().await;
    let (page, has_more) = paginate(store.recipients.as_slice(), |r| r.id.as_str(), &Params(query))?;
    list_envelope("/v1/recipients", page, has_more)
}

async fn create_recipient(State(db): State<Db>, Form(form): Form<Vec<(String, String)>>) -> ApiResult {
    let params = Params(form);
    let name = params.require("name")?.to_string();
    let recipient_type = params.require("type")?;
    if recipient_type != "individual" && recipient_type != "corporation" {
        return Err(invalid_request("Invalid type", Some("type")));
    }

    let mut store = db.write().await;
    let id = store.next("rp");
    let created = store.next_id as i64;
    let mut recipient = Recipient {
        id,
        object: "recipient".to_string(),
        name: Some(name),
        recipient_type: recipient_type.to_string(),
        tax_id_provided: params.get("tax_id").is_some(),
        email: params.get("email").map(str::to_string),
        description: params.get("description").map(str::to_string),
        active_account: None,
        default_card: None,
        verified: false,
        livemode: false,
        created,
        metadata: params.nested("metadata"),
    };
    apply_account(&mut recipient, &params);
    apply_card(&mut store, &mut recipient, &params);
    tracing::debug!(id = %recipient.id, "created recipient");
    store.recipients.push(recipient.clone());
    to_json(&recipient)
}

async fn get_recipient(State(db): State<Db>, Path(id): Path<String>) -> ApiResult {
    let store = db.read().await;
    let recipient = store
        .recipients
        .iter()
        .find(|r| r.id == id)
        .ok_or_else(|| not_found("recipient", &id))?;
    to_json(recipient)
}

async fn update_recipient(
    State(db): State<Db>,
    Path(id): Path<String>,
    Form(form): Form<Vec<(String, String)>>,
) -> ApiResult {
    let params = Params(form);
    let mut store = db.write().await;
    let index = store
        .recipients
        .iter()
        .position(|r| r.id == id)
        .ok_or_else(|| not_found("recipient", &id))?;
    let mut recipient = store.recipients[index].clone();

    if let Some(name) = params.get("name") {
        recipient.name = Some(name.to_string());
    }
    if params.get("tax_id").is_some() {
        recipient.tax_id_provided = true;
    }
    if let Some(email) = params.get("email") {
        recipient.email = Some(email.to_string());
    }
    if let Some(description) = params.get("description") {
        recipient.description = Some(description.to_string());
    }
    if let Some(card) = params.get("default_card") {
        recipient.default_card = Some(card.to_string());
    }
    recipient.metadata.extend(params.nested("metadata"));
    apply_account(&mut recipient, &params);
    apply_card(&mut store, &mut recipient, &params);

    store.recipients[index] = recipient.clone();
    to_json(&recipient)
}

async fn delete_recipient(State(db): State<Db>, Path(id): Path<String>) -> ApiResult {
    let mut store = db.write().await;
    let index = store
        .recipients
        .iter()
        .position(|r| r.id == id)
        .ok_or_else(|| not_found("recipient", &id))?;
    store.recipients.remove(index);
    Ok(Json(json!({ "deleted": true, "id": id })))
}

async fn list_plans(State(db): State<Db>, Query(query): Query<Vec<(String, String)>>) -> ApiResult {
    let store = db.read().await;
    let (page, has_more) = paginate(store.plans.as_slice(), |p| p.id.as_str(), &Params(query))?;
    list_envelope("/v1/plans", page, has_more)
}

fn parse_number<T: std::str::FromStr>(params: &Params, key: &str) -> Result<Option<T>, (StatusCode, Json<Value>)> {
    params
        .get(key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|_| invalid_request(&format!("Invalid integer: {raw}"), Some(key)))
        })
        .transpose()
}

async fn create_plan(State(db): State<Db>, Form(form): Form<Vec<(String, String)>>) -> ApiResult {
    let params = Params(form);
    let id = params.require("id")?.to_string();
    params.require("amount")?;
    let amount = parse_number::<u64>(&params, "amount")?.unwrap_or_default();
    let currency = params.require("currency")?.to_string();
    let interval = params.require("interval")?;
    if !["day", "week", "month", "year"].contains(&interval) {
        return Err(invalid_request("Invalid interval", Some("interval")));
    }
    let name = params.require("name")?.to_string();

    let mut store = db.write().await;
    if store.plans.iter().any(|p| p.id == id) {
        return Err(invalid_request("Plan already exists.", Some("id")));
    }
    let plan = Plan {
        id,
        object: "plan".to_string(),
        amount,
        currency,
        interval: interval.to_string(),
        interval_count: parse_number(&params, "interval_count")?.unwrap_or(1),
        name,
        trial_period_days: parse_number(&params, "trial_period_days")?,
        statement_description: params.get("statement_description").map(str::to_string),
        livemode: false,
        metadata: params.nested("metadata"),
    };
    tracing::debug!(id = %plan.id, "created plan");
    store.plans.push(plan.clone());
    to_json(&plan)
}

async fn get_plan(State(db): State<Db>, Path(id): Path<String>) -> ApiResult {
    let store = db.read().await;
    let plan = store
        .plans
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| not_found("plan", &id))?;
    to_json(plan)
}

async fn update_plan(
    State(db): State<Db>,
    Path(id): Path<String>,
    Form(form): Form<Vec<(String, String)>>,
) -> ApiResult {
    let params = Params(form);
    let mut store = db.write().await;
    let plan = store
        .plans
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or_else(|| not_found("plan", &id))?;
    for immutable in ["amount", "currency", "interval"] {
        if params.get(immutable).is_some() {
            return Err(invalid_request(&format!("Received unknown parameter: {immutable}"), Some(immutable)));
        }
    }
    if let Some(name) = params.get("name") {
        plan.name = name.to_string();
    }
    if let Some(description) = params.get("statement_description") {
        plan.statement_description = Some(description.to_string());
    }
    plan.metadata.extend(params.nested("metadata"));
    to_json(plan)
}

async fn delete_plan(State(db): State<Db>, Path(id): Path<String>) -> ApiResult {
    let mut store = db.write().await;
    let index = store
        .plans
        .iter()
        .position(|p| p.id == id)
        .ok_or_else(|| not_found("plan", &id))?;
    store.plans.remove(index);
    Ok(Json(json!({ "deleted": true, "id": id })))
}
