//! Full recipient and plan lifecycles against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then exercises every resource
//! operation over real HTTP through a ureq-backed `Transport`. Validates that
//! descriptors render to requests the server understands and that responses
//! decode into the declared types.

use stripe_core::{
    plan, recipient, Amount, ApiError, BankAccount, Currency, HttpMethod, HttpRequest, HttpResponse,
    Interval, ListParams, PlanId, RecipientType, StripeClient, TokenId, Transport, TransportError,
    UpdateRecipient,
};

/// Executes `HttpRequest`s with ureq.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data rather than `Err`, letting the core
/// client handle status interpretation.
struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn send(&self, req: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let result = match req.method {
            HttpMethod::Get => {
                let mut builder = self.agent.get(&req.url);
                for (name, value) in &req.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
            HttpMethod::Delete => {
                let mut builder = self.agent.delete(&req.url);
                for (name, value) in &req.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
            HttpMethod::Post => {
                let mut builder = self.agent.post(&req.url);
                for (name, value) in &req.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.send(req.body.as_deref().unwrap_or_default().as_bytes())
            }
        };
        let mut response = result.map_err(|e| TransportError::new(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string().unwrap_or_default();

        Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body,
        })
    }
}

/// Start the mock server on a random port and return a client for it.
fn start_server() -> StripeClient {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    StripeClient::new(&format!("http://{addr}/v1"))
}

#[test]
fn recipient_lifecycle() {
    let client = start_server();
    let transport = UreqTransport::new();

    // Step 1: list — should be empty.
    let page = client
        .execute(&transport, recipient::list(&ListParams::default()))
        .unwrap();
    assert!(page.data.is_empty(), "expected empty list");
    assert!(!page.has_more);

    // Step 2: create with a bank account.
    let bank_account = BankAccount {
        country: "US".to_string(),
        routing_number: "110000000".to_string(),
        account_number: "000123456789".to_string(),
    };
    let created = client
        .execute(
            &transport,
            recipient::create_with_bank_account("Jane", None, "Doe", RecipientType::Individual, bank_account),
        )
        .unwrap();
    assert_eq!(created.name.as_deref(), Some("Jane Doe"));
    assert_eq!(created.recipient_type, RecipientType::Individual);
    assert_eq!(created.active_account.as_ref().unwrap().last4, "6789");
    let id = created.id.clone();

    // Step 3: get the created recipient.
    let fetched = client.execute(&transport, recipient::get(&id)).unwrap();
    assert_eq!(fetched, created);

    // Step 4: update the full name with a middle initial.
    let updated = client
        .execute(&transport, recipient::update_name(&id, "Jane", Some('Q'), "Doe"))
        .unwrap();
    assert_eq!(updated.name.as_deref(), Some("Jane Q Doe"));

    // Step 5: a partial name is not sent, so the stored name survives.
    let partial = UpdateRecipient {
        last_name: Some("Smith".to_string()),
        email: Some("jane@example.com".to_string()),
        ..UpdateRecipient::default()
    };
    let updated = client
        .execute(&transport, recipient::update_base(&id, &partial))
        .unwrap();
    assert_eq!(updated.name.as_deref(), Some("Jane Q Doe"));
    assert_eq!(updated.email.as_deref(), Some("jane@example.com"));

    // Step 6: attach a card token.
    let updated = client
        .execute(&transport, recipient::update_token(&id, TokenId::new("tok_visa_debit")))
        .unwrap();
    assert!(updated.default_card.is_some());

    // Step 7: list — should have one item.
    let page = client
        .execute(&transport, recipient::list(&ListParams::limit(10)))
        .unwrap();
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].id, id);

    // Step 8: delete.
    let ack = client.execute(&transport, recipient::delete(&id)).unwrap();
    assert!(ack.deleted);
    assert_eq!(ack.id, id);

    // Step 9: get after delete — should be NotFound.
    let err = client.execute(&transport, recipient::get(&id)).unwrap_err();
    assert!(matches!(err, ApiError::NotFound));

    // Step 10: delete again — should be NotFound.
    let err = client.execute(&transport, recipient::delete(&id)).unwrap_err();
    assert!(matches!(err, ApiError::NotFound));
}

#[test]
fn plan_lifecycle() {
    let client = start_server();
    let transport = UreqTransport::new();

    // Step 1: create two plans.
    let basic = client
        .execute(
            &transport,
            plan::create(PlanId::new("basic"), Amount(500), Currency::Usd, Interval::Month, "Basic"),
        )
        .unwrap();
    assert_eq!(basic.amount, Amount(500));
    assert_eq!(basic.interval_count, 1);

    let gold = client
        .execute(
            &transport,
            plan::create_with_trial(PlanId::new("gold"), Amount(2000), Currency::Usd, Interval::Year, "Gold", 14),
        )
        .unwrap();
    assert_eq!(gold.trial_period_days, Some(14));

    // Step 2: a duplicate id is rejected with a structured error.
    let err = client
        .execute(
            &transport,
            plan::create(PlanId::new("gold"), Amount(1), Currency::Usd, Interval::Day, "Again"),
        )
        .unwrap_err();
    match err {
        ApiError::Api { status, param, .. } => {
            assert_eq!(status, 400);
            assert_eq!(param.as_deref(), Some("id"));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    // Step 3: page through with a cursor of the plan id type.
    let page = client
        .execute(&transport, plan::list(&ListParams::limit(1)))
        .unwrap();
    assert_eq!(page.data.len(), 1);
    assert!(page.has_more);
    let page = client
        .execute(
            &transport,
            plan::list(&ListParams::limit(1).starting_after(page.data[0].id.clone())),
        )
        .unwrap();
    assert_eq!(page.data[0].id, PlanId::new("gold"));
    assert!(!page.has_more);

    // Step 4: update only the name.
    let updated = client
        .execute(&transport, plan::update_name(&gold.id, "Gold Plus"))
        .unwrap();
    assert_eq!(updated.name, "Gold Plus");
    assert_eq!(updated.amount, Amount(2000));

    // Step 5: delete and confirm.
    let ack = client.execute(&transport, plan::delete(&basic.id)).unwrap();
    assert!(ack.deleted);
    assert_eq!(ack.id, basic.id);
    let err = client.execute(&transport, plan::get(&basic.id)).unwrap_err();
    assert!(matches!(err, ApiError::NotFound));
}

#[test]
fn unreachable_host_surfaces_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = StripeClient::new(&format!("http://{addr}/v1"));
    let err = client
        .execute(&UreqTransport::new(), plan::get(&PlanId::new("gold")))
        .unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

#[test]
fn plan_id_with_reserved_characters_round_trips() {
    let client = start_server();
    let transport = UreqTransport::new();
    let id = PlanId::new("gold plan/annual?v=2");

    let created = client
        .execute(
            &transport,
            plan::create(id.clone(), Amount(900), Currency::Usd, Interval::Year, "Gold annual"),
        )
        .unwrap();
    assert_eq!(created.id, id);

    let fetched = client.execute(&transport, plan::get(&id)).unwrap();
    assert_eq!(fetched.id, id);

    let ack = client.execute(&transport, plan::delete(&id)).unwrap();
    assert_eq!(ack.id, id);
}
