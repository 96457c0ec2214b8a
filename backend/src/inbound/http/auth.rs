//! Bearer-token extractors.
//!
//! [`BearerToken`] only parses the `Authorization` header. [`CurrentActor`]
//! also resolves the token through the [`AuthService`](crate::domain::ports::AuthService),
//! so a handler taking it never runs for an anonymous or role-less caller.

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::{LocalBoxFuture, Ready, ready};

use crate::domain::{AccessToken, Actor, Error};

use super::state::HttpState;

const BEARER_PREFIX: &str = "bearer ";

fn bearer_from(req: &HttpRequest) -> Option<AccessToken> {
    let raw = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = raw.split_at_checked(BEARER_PREFIX.len())?;
    if !scheme.eq_ignore_ascii_case(BEARER_PREFIX) {
        return None;
    }
    AccessToken::parse(token).ok()
}

/// Optional bearer credential; `None` when absent or malformed.
pub struct BearerToken(pub Option<AccessToken>);

impl BearerToken {
    pub fn into_inner(self) -> Option<AccessToken> {
        self.0
    }
}

impl FromRequest for BearerToken {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Ok(Self(bearer_from(req))))
    }
}

/// Authenticated caller together with the token it presented.
pub struct CurrentActor {
    pub actor: Actor,
    pub token: AccessToken,
}

impl FromRequest for CurrentActor {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let token = bearer_from(req);
        Box::pin(async move {
            let state =
                state.ok_or_else(|| Error::internal("HTTP state is not registered"))?;
            let token = token.ok_or_else(|| Error::unauthorized("Unauthorized"))?;
            let actor = state.auth.authenticate(&token).await?;
            Ok(Self { actor, token })
        })
    }
}
