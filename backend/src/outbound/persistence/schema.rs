//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations under `backend/migrations`
//! exactly. Regenerate with `diesel print-schema` after changing them.

diesel::table! {
    /// Login identities. Only the password hash is stored.
    accounts (id) {
        id -> Uuid,
        /// Lower-cased, unique.
        email -> Varchar,
        password_hash -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Display profile, one per account. Cascades with the account.
    profiles (user_id) {
        user_id -> Uuid,
        full_name -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Role assignment, at most one per account (`admin` or `doctor`).
    user_roles (user_id) {
        user_id -> Uuid,
        role -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// SHA-256 digests of issued bearer tokens.
    access_tokens (digest) {
        digest -> Bytea,
        account_id -> Uuid,
        expires_at -> Timestamptz,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Registered workers. `worker_id` is the QR payload.
    workers (id) {
        id -> Uuid,
        worker_id -> Varchar,
        full_name -> Varchar,
        age -> Int2,
        gender -> Varchar,
        registered_by -> Nullable<Uuid>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only visit records. Cascades with the worker.
    medical_visits (id) {
        id -> Uuid,
        worker_id -> Uuid,
        doctor_id -> Uuid,
        visit_date -> Date,
        symptoms -> Text,
        diagnosis -> Text,
        notes -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(profiles -> accounts (user_id));
diesel::joinable!(user_roles -> accounts (user_id));
diesel::joinable!(access_tokens -> accounts (account_id));
diesel::joinable!(medical_visits -> workers (worker_id));

diesel::allow_tables_to_appear_in_same_query!(
    accounts,
    profiles,
    user_roles,
    access_tokens,
    workers,
    medical_visits,
);
