//! Shared test doubles for service and adapter tests.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::DEFAULT_TOKEN_TTL;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::InMemoryStore;
use crate::outbound::password::PasswordHasher;

/// Clock frozen at a chosen instant until advanced.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance_minutes(&self, minutes: i64) {
        *self.lock_clock() += TimeDelta::minutes(minutes);
    }

    fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Low iteration count so tests hashing passwords stay fast.
pub const TEST_PASSWORD_ITERATIONS: u32 = 8;

/// HTTP state over a fresh in-memory store reading time from `clock`.
pub fn memory_http_state(clock: Arc<dyn Clock>) -> HttpState {
    let store = Arc::new(InMemoryStore::new(
        PasswordHasher::new(TEST_PASSWORD_ITERATIONS),
        Arc::clone(&clock),
    ));
    HttpState::new(HttpStatePorts::from_repositories(
        Arc::clone(&store),
        Arc::clone(&store),
        Arc::clone(&store),
        store,
        clock,
        DEFAULT_TOKEN_TTL,
    ))
}
