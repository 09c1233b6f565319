//! Drives the build/parse contract from a blocking host.
//!
//! # Design
//! Starts the mock server on its own thread, then executes every request with
//! ureq instead of the async transport. Proves the contract needs nothing
//! from the crate's own I/O: any host that can speak HTTP can use it.

use momentum_core::{
    AlarmRequest, ApiClient, ApiError, HttpMethod, HttpRequest, HttpResponse, LoginRequest,
    RegisterRequest, ToggleAlarmRequest,
};

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data rather than `Err`, letting the client
/// handle status interpretation.
fn execute(req: HttpRequest, token: Option<&str>) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();
    let auth = token.filter(|_| req.with_session).unwrap_or_default();

    let mut response = match (req.method, req.body) {
        (HttpMethod::Get, _) => agent.get(&req.url).header("authorization", auth).call(),
        (HttpMethod::Delete, _) => agent.delete(&req.url).header("authorization", auth).call(),
        (HttpMethod::Post, Some(body)) => agent
            .post(&req.url)
            .header("authorization", auth)
            .content_type("application/json")
            .send(body.as_bytes()),
        (HttpMethod::Post, None) => agent.post(&req.url).header("authorization", auth).send_empty(),
        (HttpMethod::Patch, Some(body)) => agent
            .patch(&req.url)
            .header("authorization", auth)
            .content_type("application/json")
            .send(body.as_bytes()),
        (HttpMethod::Patch, None) => agent.patch(&req.url).header("authorization", auth).send_empty(),
    }
    .expect("HTTP transport error");

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();

    HttpResponse {
        status,
        headers: Vec::new(),
        body,
    }
}

#[test]
fn alarm_lifecycle_over_blocking_host() {
    // Step 1: start mock server on a random port.
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

    let client = ApiClient::new(&format!("http://{addr}"));

    // Step 2: register and log in.
    let req = client
        .build_register(&RegisterRequest {
            username: "host".to_string(),
            email: "host@momentum.io".to_string(),
            password: "pw".to_string(),
        })
        .unwrap();
    client.parse_register(execute(req, None)).unwrap();

    let req = client
        .build_login(&LoginRequest {
            email: "host@momentum.io".to_string(),
            password: "pw".to_string(),
        })
        .unwrap();
    let user = client.parse_login(execute(req, None)).unwrap().data;
    let token = user.token.expect("login returns a token");

    // Step 3: list — empty.
    let alarms = client
        .parse_get_alarms(execute(client.build_get_alarms(), Some(&token)))
        .unwrap();
    assert!(alarms.data.is_empty());

    // Step 4: create.
    let req = client
        .build_create_alarm(&AlarmRequest::new(5, 45, "fajr", vec![true; 7]))
        .unwrap();
    let created = client.parse_create_alarm(execute(req, Some(&token))).unwrap().data;
    assert_eq!(created.days_label(), "Every day");

    // Step 5: toggle off.
    let req = client
        .build_toggle_alarm(&created.id, &ToggleAlarmRequest { is_active: false })
        .unwrap();
    let toggled = client.parse_toggle_alarm(execute(req, Some(&token))).unwrap().data;
    assert!(!toggled.is_active);

    // Step 6: delete, then delete again — NotFound.
    let req = client.build_delete_alarm(&created.id).unwrap();
    client.parse_delete_alarm(execute(req, Some(&token))).unwrap();
    let req = client.build_delete_alarm(&created.id).unwrap();
    let err = client.parse_delete_alarm(execute(req, Some(&token))).unwrap_err();
    assert!(matches!(err, ApiError::NotFound { .. }));

    // Step 7: without a token the server refuses.
    let err = client
        .parse_get_alarms(execute(client.build_get_alarms(), None))
        .unwrap_err();
    assert!(matches!(err, ApiError::Business { status: 401, .. }));
}
