//! Behaviour tests for provisioning and worker identification.
//!
//! Each scenario drives the `/api/v1` route table over a fresh in-memory
//! deployment. Requests run on a Tokio runtime owned by the world because
//! step definitions are synchronous.

use std::io::Cursor;
use std::sync::Arc;

use actix_web::http::header::{AUTHORIZATION, CONTENT_TYPE};
use actix_web::{App, test::{self}, web};
use image::{GrayImage, ImageFormat, Luma};
use medicare_backend::Trace;
use medicare_backend::inbound::http::configure_api;
use medicare_backend::inbound::http::state::HttpState;
use medicare_backend::test_support::memory_http_state;
use mockable::DefaultClock;
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};
use serde_json::{Value, json};
use tokio::runtime::Runtime;

#[derive(Clone)]
struct RuntimeHandle(Arc<Runtime>);

#[derive(Clone)]
struct Reply {
    status: u16,
    body: Value,
}

enum Payload {
    Empty,
    Json(Value),
    Png(Vec<u8>),
}

#[derive(Default, ScenarioState)]
struct MedicareWorld {
    runtime: Slot<RuntimeHandle>,
    state: Slot<web::Data<HttpState>>,
    admin_token: Slot<String>,
    doctor_token: Slot<String>,
    worker: Slot<Value>,
    last_reply: Slot<Reply>,
}

impl MedicareWorld {
    fn start(&self) {
        let runtime = Runtime::new().expect("create runtime");
        self.runtime.set(RuntimeHandle(Arc::new(runtime)));
        self.state
            .set(web::Data::new(memory_http_state(Arc::new(DefaultClock))));
    }

    fn send(&self, method: &str, path: &str, token: Option<&str>, payload: Payload) -> Reply {
        let runtime = self.runtime.get().expect("deployment started");
        let state = self.state.get().expect("deployment started");
        let mut request = match method {
            "GET" => test::TestRequest::get(),
            _ => test::TestRequest::post(),
        }
        .uri(path);
        if let Some(token) = token {
            request = request.insert_header((AUTHORIZATION, format!("Bearer {token}")));
        }
        request = match payload {
            Payload::Empty => request,
            Payload::Json(body) => request.set_json(body),
            Payload::Png(bytes) => request
                .insert_header((CONTENT_TYPE, "image/png"))
                .set_payload(bytes),
        };

        runtime.0.block_on(async move {
            let app = test::init_service(
                App::new()
                    .app_data(state)
                    .wrap(Trace)
                    .configure(configure_api),
            )
            .await;
            let res = test::call_service(&app, request.to_request()).await;
            let status = res.status().as_u16();
            let bytes = test::read_body(res).await;
            let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
            Reply { status, body }
        })
    }

    fn record(&self, reply: Reply) {
        self.last_reply.set(reply);
    }

    fn last(&self) -> Reply {
        self.last_reply.get().expect("a request was sent")
    }

    fn sign_in(&self, email: &str, password: &str) -> String {
        let reply = self.send(
            "POST",
            "/api/v1/auth/login",
            None,
            Payload::Json(json!({ "email": email, "password": password })),
        );
        assert_eq!(reply.status, 200, "login failed: {}", reply.body);
        reply.body["accessToken"]
            .as_str()
            .expect("access token")
            .to_owned()
    }

    fn create_doctor(&self, token: Option<&str>, email: &str) {
        let reply = self.send(
            "POST",
            "/api/v1/functions/create-doctor",
            token,
            Payload::Json(json!({
                "email": email,
                "password": "clinic-pass",
                "fullName": "Dr. Test Physician"
            })),
        );
        self.record(reply);
    }

    fn registered_worker_id(&self) -> String {
        let worker = self.worker.get().expect("worker registered");
        worker["workerId"].as_str().expect("worker id").to_owned()
    }

    fn scan_manually(&self, token: &str, worker_id: &str) {
        let reply = self.send(
            "POST",
            "/api/v1/scans/manual",
            Some(token),
            Payload::Json(json!({ "workerId": worker_id })),
        );
        self.record(reply);
    }
}

#[fixture]
fn world() -> MedicareWorld {
    MedicareWorld::default()
}

fn blank_png() -> Vec<u8> {
    let image = GrayImage::from_pixel(96, 96, Luma([255]));
    let mut bytes = Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, ImageFormat::Png)
        .expect("encode blank png");
    bytes.into_inner()
}

// -----------------------------------------------------------------------------
// Given Steps
// -----------------------------------------------------------------------------

#[given("an empty medicare deployment")]
fn an_empty_medicare_deployment(world: &MedicareWorld) {
    world.start();
}

#[given("the demo accounts have been created")]
fn the_demo_accounts_have_been_created(world: &MedicareWorld) {
    let reply = world.send(
        "POST",
        "/api/v1/functions/create-demo-accounts",
        None,
        Payload::Empty,
    );
    assert_eq!(reply.status, 200, "seeding failed: {}", reply.body);
}

#[given("the admin is signed in")]
fn the_admin_is_signed_in(world: &MedicareWorld) {
    let token = world.sign_in("admin@medicare.demo", "admin123");
    world.admin_token.set(token);
}

#[given("the doctor is signed in")]
fn the_doctor_is_signed_in(world: &MedicareWorld) {
    let token = world.sign_in("doctor1@medicare.demo", "doctor123");
    world.doctor_token.set(token);
}

#[given("the admin has registered a worker")]
fn the_admin_has_registered_a_worker(world: &MedicareWorld) {
    let token = world.admin_token.get().expect("admin signed in");
    let reply = world.send(
        "POST",
        "/api/v1/workers",
        Some(&token),
        Payload::Json(json!({ "fullName": "Tomasz Nowak", "age": 41, "gender": "male" })),
    );
    assert_eq!(reply.status, 201, "registration failed: {}", reply.body);
    world.worker.set(reply.body);
}

// -----------------------------------------------------------------------------
// When Steps
// -----------------------------------------------------------------------------

#[when("the demo accounts are requested again")]
fn the_demo_accounts_are_requested_again(world: &MedicareWorld) {
    let reply = world.send(
        "POST",
        "/api/v1/functions/create-demo-accounts",
        None,
        Payload::Empty,
    );
    world.record(reply);
}

#[when("the admin creates the doctor account {email}")]
fn the_admin_creates_the_doctor_account(world: &MedicareWorld, email: String) {
    let token = world.admin_token.get().expect("admin signed in");
    world.create_doctor(Some(&token), &email);
}

#[when("the doctor creates the doctor account {email}")]
fn the_doctor_creates_the_doctor_account(world: &MedicareWorld, email: String) {
    let token = world.doctor_token.get().expect("doctor signed in");
    world.create_doctor(Some(&token), &email);
}

#[when("an anonymous caller creates the doctor account {email}")]
fn an_anonymous_caller_creates_the_doctor_account(world: &MedicareWorld, email: String) {
    world.create_doctor(None, &email);
}

#[when("the doctor enters the worker identifier manually")]
fn the_doctor_enters_the_worker_identifier_manually(world: &MedicareWorld) {
    let token = world.doctor_token.get().expect("doctor signed in");
    world.scan_manually(&token, &world.registered_worker_id());
}

#[when("the admin enters the worker identifier manually")]
fn the_admin_enters_the_worker_identifier_manually(world: &MedicareWorld) {
    let token = world.admin_token.get().expect("admin signed in");
    world.scan_manually(&token, &world.registered_worker_id());
}

#[when("the doctor enters a blank identifier")]
fn the_doctor_enters_a_blank_identifier(world: &MedicareWorld) {
    let token = world.doctor_token.get().expect("doctor signed in");
    world.scan_manually(&token, "   ");
}

#[when("the doctor uploads the worker's QR code")]
fn the_doctor_uploads_the_workers_qr_code(world: &MedicareWorld) {
    let worker_id = world.registered_worker_id();
    let admin = world.admin_token.get().expect("admin signed in");
    let doctor = world.doctor_token.get().expect("doctor signed in");
    let runtime = world.runtime.get().expect("deployment started");
    let state = world.state.get().expect("deployment started");

    let png = runtime.0.block_on(async move {
        let app = test::init_service(App::new().app_data(state).configure(configure_api)).await;
        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/workers/{worker_id}/qr.png"))
            .insert_header((AUTHORIZATION, format!("Bearer {admin}")))
            .to_request();
        test::call_and_read_body(&app, req).await.to_vec()
    });

    let reply = world.send("POST", "/api/v1/scans/image", Some(&doctor), Payload::Png(png));
    world.record(reply);
}

#[when("the doctor uploads an image without a QR code")]
fn the_doctor_uploads_an_image_without_a_qr_code(world: &MedicareWorld) {
    let token = world.doctor_token.get().expect("doctor signed in");
    let reply = world.send(
        "POST",
        "/api/v1/scans/image",
        Some(&token),
        Payload::Png(blank_png()),
    );
    world.record(reply);
}

// -----------------------------------------------------------------------------
// Then Steps
// -----------------------------------------------------------------------------

#[then("the response status is {status}")]
fn the_response_status_is(world: &MedicareWorld, status: u16) {
    let reply = world.last();
    assert_eq!(reply.status, status, "body: {}", reply.body);
}

#[then("the error reason is {reason}")]
fn the_error_reason_is(world: &MedicareWorld, reason: String) {
    let reply = world.last();
    assert_eq!(reply.body["details"]["code"], json!(reason));
}

#[then("{email} can sign in as a doctor")]
fn can_sign_in_as_a_doctor(world: &MedicareWorld, email: String) {
    let token = world.sign_in(&email, "clinic-pass");
    let reply = world.send("GET", "/api/v1/auth/me", Some(&token), Payload::Empty);
    assert_eq!(reply.status, 200);
    assert_eq!(reply.body["role"], json!("doctor"));
}

#[then("the scanned worker matches the registered worker")]
fn the_scanned_worker_matches_the_registered_worker(world: &MedicareWorld) {
    let reply = world.last();
    assert_eq!(reply.body["workerId"], json!(world.registered_worker_id()));
    assert_eq!(reply.body["fullName"], json!("Tomasz Nowak"));
}

// -----------------------------------------------------------------------------
// Scenario Bindings
// -----------------------------------------------------------------------------

#[scenario(
    path = "tests/features/provisioning.feature",
    name = "Demo accounts are created only once"
)]
fn demo_accounts_are_created_only_once(world: MedicareWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/provisioning.feature",
    name = "An admin creates a doctor who can then sign in"
)]
fn an_admin_creates_a_doctor(world: MedicareWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/provisioning.feature",
    name = "A doctor cannot create doctor accounts"
)]
fn a_doctor_cannot_create_doctor_accounts(world: MedicareWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/provisioning.feature",
    name = "Creating a doctor requires a bearer token"
)]
fn creating_a_doctor_requires_a_bearer_token(world: MedicareWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/worker_scanning.feature",
    name = "Manual entry finds a registered worker"
)]
fn manual_entry_finds_a_registered_worker(world: MedicareWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/worker_scanning.feature",
    name = "Manual entry rejects a blank identifier"
)]
fn manual_entry_rejects_a_blank_identifier(world: MedicareWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/worker_scanning.feature",
    name = "Uploading the exported QR code finds the worker"
)]
fn uploading_the_exported_qr_code_finds_the_worker(world: MedicareWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/worker_scanning.feature",
    name = "An image without a QR code is rejected"
)]
fn an_image_without_a_qr_code_is_rejected(world: MedicareWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/worker_scanning.feature",
    name = "Admins cannot use the scanner"
)]
fn admins_cannot_use_the_scanner(world: MedicareWorld) {
    let _ = world;
}
