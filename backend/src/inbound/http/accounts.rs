//! Registration, login, and logout handlers.

use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;

use crate::domain::{ErrorCode, LoginCredentials};
use crate::inbound::http::ApiResult;
use crate::inbound::http::redirect;
use crate::inbound::http::session::{FlashNotice, SessionContext};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::pages;

/// Credentials submitted by the login and registration forms.
#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    pub nom_utilisateur: String,
    pub mot_de_passe: String,
}

impl CredentialsForm {
    fn credentials(&self) -> Result<LoginCredentials, crate::domain::LoginValidationError> {
        LoginCredentials::try_from_parts(&self.nom_utilisateur, &self.mot_de_passe)
    }
}

/// `GET /login`: render the login form.
#[get("/login")]
pub async fn login_form(session: SessionContext) -> ApiResult<HttpResponse> {
    let notices = session.take_notices()?;
    Ok(pages::html(pages::login_page(&notices)))
}

/// `POST /login`: authenticate and establish the session.
#[post("/login")]
pub async fn login_submit(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<CredentialsForm>,
) -> ApiResult<HttpResponse> {
    let credentials = match form.credentials() {
        Ok(credentials) => credentials,
        Err(_) => {
            session.push_notice(FlashNotice::error("Identifiants incorrects ❌"))?;
            return Ok(redirect::to_login());
        }
    };

    match state.accounts.authenticate(&credentials).await {
        Ok(user) => {
            session.persist_identity(&user)?;
            session.push_notice(FlashNotice::success("Connecté ✅"))?;
            Ok(redirect::to("/"))
        }
        Err(err) if err.code() == ErrorCode::Unauthorized => {
            session.push_notice(FlashNotice::error("Identifiants incorrects ❌"))?;
            Ok(redirect::to_login())
        }
        Err(err) => Err(err),
    }
}

/// `GET /inscription`: render the registration form.
#[get("/inscription")]
pub async fn register_form(session: SessionContext) -> ApiResult<HttpResponse> {
    let notices = session.take_notices()?;
    Ok(pages::html(pages::register_page(&notices)))
}

/// `POST /inscription`: create the account and send the user to login.
#[post("/inscription")]
pub async fn register_submit(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<CredentialsForm>,
) -> ApiResult<HttpResponse> {
    let credentials = match form.credentials() {
        Ok(credentials) => credentials,
        Err(err) => {
            session.push_notice(FlashNotice::error(err.to_string()))?;
            return Ok(redirect::to("/inscription"));
        }
    };

    match state.accounts.register(&credentials).await {
        Ok(_) => {
            session.push_notice(FlashNotice::success(
                "Compte créé ✅ Vous pouvez vous connecter.",
            ))?;
            Ok(redirect::to_login())
        }
        Err(err) if err.code() == ErrorCode::InvalidRequest => {
            session.push_notice(FlashNotice::error(err.message().to_owned()))?;
            Ok(redirect::to("/inscription"))
        }
        Err(err) => Err(err),
    }
}

/// `GET /logout`: clear all session state.
#[get("/logout")]
pub async fn logout(session: SessionContext) -> ApiResult<HttpResponse> {
    session.clear();
    session.push_notice(FlashNotice::success("Déconnecté avec succès ✅"))?;
    Ok(redirect::to_login())
}

#[cfg(test)]
mod tests {
    use crate::inbound::http::test_utils::{empty_state, login_as, registered_state, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test;

    fn form(username: &str, password: &str) -> [(&'static str, String); 2] {
        [
            ("nom_utilisateur", username.to_owned()),
            ("mot_de_passe", password.to_owned()),
        ]
    }

    #[actix_web::test]
    async fn register_then_login_establishes_a_session() {
        let harness = empty_state();
        let app = test::init_service(test_app(&harness)).await;

        let register = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/inscription")
                .set_form(form("ada", "s3cret"))
                .to_request(),
        )
        .await;
        assert_eq!(register.status(), StatusCode::FOUND);
        assert_eq!(
            register.headers().get("location").map(|v| v.as_bytes()),
            Some(b"/login".as_slice()),
        );

        let login = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/login")
                .set_form(form("ada", "s3cret"))
                .to_request(),
        )
        .await;
        assert_eq!(login.status(), StatusCode::FOUND);
        assert_eq!(
            login.headers().get("location").map(|v| v.as_bytes()),
            Some(b"/".as_slice()),
        );
        assert!(
            login
                .response()
                .cookies()
                .any(|cookie| cookie.name() == "session"),
            "login must set the session cookie",
        );
    }

    #[actix_web::test]
    async fn login_with_a_wrong_password_bounces_back_to_login() {
        let harness = registered_state("ada", "s3cret").await;
        let app = test::init_service(test_app(&harness)).await;

        let login = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/login")
                .set_form(form("ada", "wrong"))
                .to_request(),
        )
        .await;
        assert_eq!(login.status(), StatusCode::FOUND);
        assert_eq!(
            login.headers().get("location").map(|v| v.as_bytes()),
            Some(b"/login".as_slice()),
        );
    }

    #[actix_web::test]
    async fn the_failure_notice_shows_on_the_next_login_page() {
        let harness = registered_state("ada", "s3cret").await;
        let app = test::init_service(test_app(&harness)).await;

        let login = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/login")
                .set_form(form("ghost", "nope"))
                .to_request(),
        )
        .await;
        let cookie = login
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie")
            .into_owned();

        let page = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/login")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let body = test::read_body(page).await;
        let body = std::str::from_utf8(&body).expect("utf8 body");
        assert!(body.contains("Identifiants incorrects"));
    }

    #[actix_web::test]
    async fn logout_clears_the_session_so_index_redirects_to_login() {
        let harness = registered_state("ada", "s3cret").await;
        let app = test::init_service(test_app(&harness)).await;
        let cookie = login_as(&app, "ada", "s3cret").await;

        let logout = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/logout")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(logout.status(), StatusCode::FOUND);
        let cleared = logout
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie")
            .into_owned();

        let index = test::call_service(
            &app,
            test::TestRequest::get().uri("/").cookie(cleared).to_request(),
        )
        .await;
        assert_eq!(index.status(), StatusCode::FOUND);
        assert_eq!(
            index.headers().get("location").map(|v| v.as_bytes()),
            Some(b"/login".as_slice()),
        );
    }

    #[actix_web::test]
    async fn registration_with_an_invalid_name_bounces_back_with_a_notice() {
        let harness = empty_state();
        let app = test::init_service(test_app(&harness)).await;

        let register = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/inscription")
                .set_form(form("a<script>", "pw"))
                .to_request(),
        )
        .await;
        assert_eq!(register.status(), StatusCode::FOUND);
        assert_eq!(
            register.headers().get("location").map(|v| v.as_bytes()),
            Some(b"/inscription".as_slice()),
        );
    }
}
