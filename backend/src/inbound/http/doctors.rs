//! Doctor directory handlers for administrators.
//!
//! ```text
//! GET    /api/v1/doctors?search=
//! DELETE /api/v1/doctors/{id}
//! ```

use actix_web::{HttpResponse, delete, get, web};

use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::CurrentActor;
use crate::inbound::http::dto::{AccountResponse, SearchQuery};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_account_id};

/// Doctors newest first, optionally filtered by name or email.
#[utoipa::path(
    get,
    path = "/api/v1/doctors",
    params(SearchQuery),
    responses(
        (status = 200, description = "Doctors", body = [AccountResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Caller is not an admin", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["doctors"],
    operation_id = "listDoctors"
)]
#[get("/doctors")]
pub async fn list_doctors(
    state: web::Data<HttpState>,
    current: CurrentActor,
    query: web::Query<SearchQuery>,
) -> ApiResult<web::Json<Vec<AccountResponse>>> {
    let doctors = state
        .doctors
        .list_doctors(&current.actor, query.term())
        .await?;
    Ok(web::Json(doctors.into_iter().map(Into::into).collect()))
}

/// Remove a doctor's role, profile and sessions. Their visits remain.
#[utoipa::path(
    delete,
    path = "/api/v1/doctors/{id}",
    params(("id" = String, Path, description = "Doctor account id")),
    responses(
        (status = 204, description = "Doctor removed"),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Caller is not an admin", body = ErrorSchema),
        (status = 404, description = "No such doctor", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["doctors"],
    operation_id = "removeDoctor"
)]
#[delete("/doctors/{id}")]
pub async fn remove_doctor(
    state: web::Data<HttpState>,
    current: CurrentActor,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let doctor = parse_account_id(&path.into_inner(), FieldName::new("id"))?;
    state.doctors.remove_doctor(&current.actor, &doctor).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};

    use crate::inbound::http::test_utils::{admin_token, bearer, doctor_token, seeded_state};

    macro_rules! app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state))
                    .service(list_doctors)
                    .service(remove_doctor),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn admins_list_and_remove_doctors() {
        let state = seeded_state().await;
        let admin = admin_token(&state).await;
        let app = app!(state);

        let req = test::TestRequest::get()
            .uri("/doctors?search=demo")
            .insert_header(bearer(&admin))
            .to_request();
        let doctors: Vec<AccountResponse> = test::call_and_read_body_json(&app, req).await;
        let [doctor] = doctors.as_slice() else {
            panic!("expected exactly one doctor, got {doctors:?}");
        };
        assert_eq!(doctor.role.as_deref(), Some("doctor"));

        let req = test::TestRequest::delete()
            .uri(&format!("/doctors/{}", doctor.id))
            .insert_header(bearer(&admin))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

        let req = test::TestRequest::get()
            .uri("/doctors")
            .insert_header(bearer(&admin))
            .to_request();
        let doctors: Vec<AccountResponse> = test::call_and_read_body_json(&app, req).await;
        assert!(doctors.is_empty());
    }

    #[actix_web::test]
    async fn search_without_matches_is_empty() {
        let state = seeded_state().await;
        let admin = admin_token(&state).await;
        let app = app!(state);

        let req = test::TestRequest::get()
            .uri("/doctors?search=nobody")
            .insert_header(bearer(&admin))
            .to_request();
        let doctors: Vec<AccountResponse> = test::call_and_read_body_json(&app, req).await;
        assert!(doctors.is_empty());
    }

    #[actix_web::test]
    async fn doctors_cannot_manage_the_directory() {
        let state = seeded_state().await;
        let doctor = doctor_token(&state).await;
        let app = app!(state);

        let req = test::TestRequest::get()
            .uri("/doctors")
            .insert_header(bearer(&doctor))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn malformed_ids_are_rejected() {
        let state = seeded_state().await;
        let admin = admin_token(&state).await;
        let app = app!(state);

        let req = test::TestRequest::delete()
            .uri("/doctors/not-a-uuid")
            .insert_header(bearer(&admin))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }
}
