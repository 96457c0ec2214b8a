//! Tests for the bearer-token authentication service.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    AccountRepositoryError, MockAccountRepository, MockTokenStore, TokenStoreError,
};
use crate::domain::{AccountId, Email, ErrorCode, FullName, Role};
use crate::test_support::MutableClock;

#[fixture]
fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn profile(id: AccountId, role: Option<Role>, now: DateTime<Utc>) -> AccountProfile {
    AccountProfile {
        id,
        email: Email::new("doctor1@medicare.demo").expect("email"),
        full_name: FullName::new("Dr. Demo Doctor").expect("name"),
        role,
        created_at: now,
    }
}

fn service(
    accounts: MockAccountRepository,
    tokens: MockTokenStore,
    now: DateTime<Utc>,
) -> TokenAuthService<MockAccountRepository, MockTokenStore> {
    TokenAuthService::new(
        Arc::new(accounts),
        Arc::new(tokens),
        Arc::new(MutableClock::new(now)),
        DEFAULT_TOKEN_TTL,
    )
}

fn credentials() -> LoginCredentials {
    LoginCredentials::try_from_parts("doctor1@medicare.demo", "doctor123").expect("credentials")
}

#[rstest]
#[tokio::test]
async fn login_issues_token_with_expiry(now: DateTime<Utc>) {
    let id = AccountId::random();
    let mut accounts = MockAccountRepository::new();
    accounts
        .expect_verify_credentials()
        .return_once(move |_| Ok(Some(id)));
    accounts
        .expect_find_profile()
        .return_once(move |_| Ok(Some(profile(id, Some(Role::Doctor), now))));
    let mut tokens = MockTokenStore::new();
    tokens
        .expect_store()
        .withf(move |_, account, expires_at| {
            account == &id && *expires_at == now + DEFAULT_TOKEN_TTL
        })
        .times(1)
        .return_once(|_, _, _| Ok(()));

    let session = service(accounts, tokens, now)
        .login(&credentials())
        .await
        .expect("login succeeds");

    assert_eq!(session.expires_at, now + DEFAULT_TOKEN_TTL);
    assert_eq!(session.profile.role, Some(Role::Doctor));
}

#[rstest]
#[tokio::test]
async fn login_rejects_wrong_password(now: DateTime<Utc>) {
    let mut accounts = MockAccountRepository::new();
    accounts
        .expect_verify_credentials()
        .return_once(|_| Ok(None));
    let mut tokens = MockTokenStore::new();
    tokens.expect_store().times(0);

    let err = service(accounts, tokens, now)
        .login(&credentials())
        .await
        .expect_err("wrong password");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn login_rejects_account_without_role(now: DateTime<Utc>) {
    let id = AccountId::random();
    let mut accounts = MockAccountRepository::new();
    accounts
        .expect_verify_credentials()
        .return_once(move |_| Ok(Some(id)));
    accounts
        .expect_find_profile()
        .return_once(move |_| Ok(Some(profile(id, None, now))));

    let err = service(accounts, MockTokenStore::new(), now)
        .login(&credentials())
        .await
        .expect_err("no role");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn authenticate_reads_role_from_storage(now: DateTime<Utc>) {
    let id = AccountId::random();
    let mut tokens = MockTokenStore::new();
    tokens
        .expect_resolve()
        .withf(move |_, at| *at == now)
        .return_once(move |_, _| Ok(Some(id)));
    let mut accounts = MockAccountRepository::new();
    accounts
        .expect_role_of()
        .return_once(|_| Ok(Some(Role::Admin)));

    let actor = service(accounts, tokens, now)
        .authenticate(&AccessToken::generate())
        .await
        .expect("token resolves");
    assert_eq!(actor.role(), Role::Admin);
    assert_eq!(actor.account_id(), &id);
}

#[rstest]
#[tokio::test]
async fn authenticate_rejects_unknown_token(now: DateTime<Utc>) {
    let mut tokens = MockTokenStore::new();
    tokens.expect_resolve().return_once(|_, _| Ok(None));
    let mut accounts = MockAccountRepository::new();
    accounts.expect_role_of().times(0);

    let err = service(accounts, tokens, now)
        .authenticate(&AccessToken::generate())
        .await
        .expect_err("unknown token");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn authenticate_rejects_revoked_role(now: DateTime<Utc>) {
    let id = AccountId::random();
    let mut tokens = MockTokenStore::new();
    tokens
        .expect_resolve()
        .return_once(move |_, _| Ok(Some(id)));
    let mut accounts = MockAccountRepository::new();
    accounts.expect_role_of().return_once(|_| Ok(None));

    let err = service(accounts, tokens, now)
        .authenticate(&AccessToken::generate())
        .await
        .expect_err("role revoked");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn store_outage_maps_to_service_unavailable(now: DateTime<Utc>) {
    let mut tokens = MockTokenStore::new();
    tokens
        .expect_resolve()
        .return_once(|_, _| Err(TokenStoreError::connection("refused")));

    let err = service(MockAccountRepository::new(), tokens, now)
        .authenticate(&AccessToken::generate())
        .await
        .expect_err("store down");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn current_account_maps_query_failures(now: DateTime<Utc>) {
    let mut accounts = MockAccountRepository::new();
    accounts
        .expect_find_profile()
        .return_once(|_| Err(AccountRepositoryError::query("boom")));

    let actor = Actor::new(AccountId::random(), Role::Doctor);
    let err = service(accounts, MockTokenStore::new(), now)
        .current_account(&actor)
        .await
        .expect_err("query failure");
    assert_eq!(err.code(), ErrorCode::InternalError);
}
