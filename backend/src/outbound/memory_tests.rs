//! Behavioural coverage for the in-memory adapters.

use chrono::{NaiveDate, TimeDelta, TimeZone};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::{AccessToken, Age, Gender, VisitDraft, WorkerRegistration};
use crate::test_support::MutableClock;

#[fixture]
fn clock() -> Arc<MutableClock> {
    let start = Utc
        .with_ymd_and_hms(2026, 4, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp");
    Arc::new(MutableClock::new(start))
}

fn store(clock: &Arc<MutableClock>) -> InMemoryStore {
    InMemoryStore::new(PasswordHasher::new(8), Arc::clone(clock) as Arc<dyn Clock>)
}

fn email(raw: &str) -> Email {
    Email::new(raw).expect("valid email")
}

fn password(raw: &str) -> Password {
    Password::new(raw).expect("valid password")
}

async fn doctor(store: &InMemoryStore, address: &str, name: &str) -> AccountId {
    let id = store
        .create_identity(&email(address), &password("doctor123"))
        .await
        .expect("identity");
    store
        .insert_profile(&id, &FullName::new(name).expect("name"))
        .await
        .expect("profile");
    store.assign_role(&id, Role::Doctor).await.expect("role");
    id
}

async fn register(store: &InMemoryStore, name: &str, by: AccountId) -> Worker {
    let identifier = store.next_identifier().await.expect("identifier");
    WorkerRepository::insert(
        store,
        &NewWorker {
            identifier,
            registration: WorkerRegistration {
                full_name: FullName::new(name).expect("name"),
                age: Age::new(30).expect("age"),
                gender: Gender::Other,
            },
            registered_by: by,
        },
    )
    .await
    .expect("worker")
}

async fn record(
    store: &InMemoryStore,
    worker: &Worker,
    author: AccountId,
    day: u32,
    diagnosis: &str,
) -> Visit {
    let visit_date = NaiveDate::from_ymd_opt(2026, 4, day).expect("date");
    let draft = VisitDraft::new(
        Some(visit_date),
        Some("cough".into()),
        Some(diagnosis.into()),
        None,
        visit_date,
    )
    .expect("draft");
    VisitRepository::insert(
        store,
        &NewVisit {
            worker_id: worker.id,
            doctor_id: author,
            draft,
        },
    )
    .await
    .expect("visit")
}

#[rstest]
#[tokio::test]
async fn duplicate_email_is_rejected(clock: Arc<MutableClock>) {
    let store = store(&clock);
    doctor(&store, "lee@clinic.test", "Dr Lee").await;

    let err = store
        .create_identity(&email("LEE@clinic.test"), &password("another1"))
        .await
        .expect_err("duplicate");
    assert!(matches!(err, AccountRepositoryError::DuplicateEmail { .. }));
}

#[rstest]
#[tokio::test]
async fn credentials_verify_against_stored_hash(clock: Arc<MutableClock>) {
    let store = store(&clock);
    let id = doctor(&store, "lee@clinic.test", "Dr Lee").await;

    let good = LoginCredentials::try_from_parts("lee@clinic.test", "doctor123").expect("creds");
    let bad = LoginCredentials::try_from_parts("lee@clinic.test", "doctor999").expect("creds");
    assert_eq!(store.verify_credentials(&good).await.expect("query"), Some(id));
    assert_eq!(store.verify_credentials(&bad).await.expect("query"), None);
}

#[rstest]
#[tokio::test]
async fn second_role_assignment_fails(clock: Arc<MutableClock>) {
    let store = store(&clock);
    let id = doctor(&store, "lee@clinic.test", "Dr Lee").await;
    assert!(store.assign_role(&id, Role::Admin).await.is_err());
    assert_eq!(store.role_of(&id).await.expect("role"), Some(Role::Doctor));
}

#[rstest]
#[tokio::test]
async fn tokens_expire_with_the_clock(clock: Arc<MutableClock>) {
    let store = store(&clock);
    let id = doctor(&store, "lee@clinic.test", "Dr Lee").await;
    let digest = AccessToken::generate().digest();
    store
        .store(&digest, &id, clock.utc() + TimeDelta::minutes(30))
        .await
        .expect("stored");

    assert_eq!(store.resolve(&digest, clock.utc()).await.expect("resolve"), Some(id));
    clock.advance_minutes(31);
    assert_eq!(store.resolve(&digest, clock.utc()).await.expect("resolve"), None);
}

#[rstest]
#[tokio::test]
async fn deleting_a_worker_cascades_to_visits(clock: Arc<MutableClock>) {
    let store = store(&clock);
    let author = doctor(&store, "lee@clinic.test", "Dr Lee").await;
    let worker = register(&store, "Ana Silva", author).await;
    record(&store, &worker, author, 2, "flu").await;

    assert!(store.delete(&worker.identifier).await.expect("delete"));
    assert_eq!(
        VisitRepository::count(&store, VisitScope::All, None)
            .await
            .expect("count"),
        0
    );
    assert!(!store.delete(&worker.identifier).await.expect("second delete"));
}

#[rstest]
#[tokio::test]
async fn revoked_doctor_shows_as_unknown_author(clock: Arc<MutableClock>) {
    let store = store(&clock);
    let author = doctor(&store, "lee@clinic.test", "Dr Lee").await;
    let worker = register(&store, "Ana Silva", author).await;
    record(&store, &worker, author, 3, "sprain").await;

    assert!(store.revoke_role(&author, Role::Doctor).await.expect("revoke"));
    assert!(!store.revoke_role(&author, Role::Doctor).await.expect("again"));

    let history = store.list_for_worker(worker.id).await.expect("history");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].doctor_name_or_unknown(), "Unknown");
}

#[rstest]
#[tokio::test]
async fn worker_identifiers_follow_the_sequence(clock: Arc<MutableClock>) {
    let store = store(&clock);
    let admin = AccountId::random();
    let first = register(&store, "Ana Silva", admin).await;
    let second = register(&store, "Bo Chen", admin).await;
    assert_eq!(first.identifier.as_str(), "WKR-000001");
    assert_eq!(second.identifier.as_str(), "WKR-000002");
}

#[rstest]
#[case("silva", 1)]
#[case("WKR-00000", 2)]
#[case("nobody", 0)]
#[tokio::test]
async fn worker_search_matches_name_or_identifier(
    clock: Arc<MutableClock>,
    #[case] term: &str,
    #[case] expected: usize,
) {
    let store = store(&clock);
    let admin = AccountId::random();
    register(&store, "Ana Silva", admin).await;
    register(&store, "Bo Chen", admin).await;

    let listed = store
        .list(SearchTerm::parse(Some(term)))
        .await
        .expect("list");
    assert_eq!(listed.len(), expected);
}

#[rstest]
#[tokio::test]
async fn authored_visits_search_covers_diagnosis(clock: Arc<MutableClock>) {
    let store = store(&clock);
    let author = doctor(&store, "lee@clinic.test", "Dr Lee").await;
    let other = doctor(&store, "kim@clinic.test", "Dr Kim").await;
    let ana = register(&store, "Ana Silva", author).await;
    let bo = register(&store, "Bo Chen", author).await;
    record(&store, &ana, author, 2, "influenza").await;
    record(&store, &bo, author, 5, "dermatitis").await;
    record(&store, &bo, other, 6, "influenza").await;

    let all = store.list_authored(&author, None).await.expect("list");
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].worker.full_name, "Bo Chen");

    let flu = store
        .list_authored(&author, SearchTerm::parse(Some("INFLU")))
        .await
        .expect("list");
    assert_eq!(flu.len(), 1);
    assert_eq!(flu[0].worker.full_name, "Ana Silva");
}

#[rstest]
#[tokio::test]
async fn counts_respect_scope_and_date(clock: Arc<MutableClock>) {
    let store = store(&clock);
    let author = doctor(&store, "lee@clinic.test", "Dr Lee").await;
    let worker = register(&store, "Ana Silva", author).await;
    record(&store, &worker, author, 1, "a").await;
    record(&store, &worker, author, 9, "b").await;
    record(&store, &worker, AccountId::random(), 9, "c").await;

    let mine = VisitScope::AuthoredBy(author);
    let since = NaiveDate::from_ymd_opt(2026, 4, 9);
    assert_eq!(VisitRepository::count(&store, mine, None).await.expect("count"), 2);
    assert_eq!(VisitRepository::count(&store, mine, since).await.expect("count"), 1);
    assert_eq!(
        VisitRepository::count(&store, VisitScope::All, since)
            .await
            .expect("count"),
        2
    );
}

#[rstest]
#[tokio::test]
async fn visits_for_missing_workers_are_rejected(clock: Arc<MutableClock>) {
    let store = store(&clock);
    let visit_date = NaiveDate::from_ymd_opt(2026, 4, 1).expect("date");
    let draft = VisitDraft::new(None, Some("x".into()), Some("y".into()), None, visit_date)
        .expect("draft");
    let err = VisitRepository::insert(
        &store,
        &NewVisit {
            worker_id: Uuid::new_v4(),
            doctor_id: AccountId::random(),
            draft,
        },
    )
    .await
    .expect_err("no worker");
    assert!(matches!(err, VisitRepositoryError::MissingWorker { .. }));
}
