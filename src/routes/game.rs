use axum::{
    Extension, Form, Router,
    body::Body,
    extract::{State, rejection::FormRejection},
    http::Request,
    middleware::{self, Next},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use tracing::debug;
use validator::Validate;

use crate::{
    dao::models::UserId,
    dto::{game::CheckForm, page},
    error::AppError,
    services::game_service,
    state::{SharedState, session::CheckOutcome},
};

/// Quiz pages, all behind the sign-in check.
pub fn router(state: SharedState) -> Router<SharedState> {
    Router::new()
        .route("/game", get(game_page))
        .route("/check", post(check_answer))
        .route("/skip", post(skip_question))
        .route("/score", get(score_page))
        .route("/logout", post(logout))
        .route_layer(middleware::from_fn_with_state(state, require_player))
}

/// Serve the next question of the player's round.
#[utoipa::path(
    get,
    path = "/game",
    tag = "game",
    params(("X-User-Id" = i64, Header, description = "Player id set by the sign-in layer")),
    responses(
        (status = 200, description = "Question page, or upload guidance when the album is too small", body = String, content_type = "text/html"),
        (status = 303, description = "Not signed in; redirect to the sign-in page"),
        (status = 503, description = "Photos could not be retrieved", body = String, content_type = "text/html")
    )
)]
pub async fn game_page(
    State(state): State<SharedState>,
    Extension(player): Extension<UserId>,
) -> Result<Html<String>, AppError> {
    let question = game_service::serve_question(&state, player).await?;
    Ok(Html(page::question_page(&question)))
}

/// Check the picture the player picked for the displayed question.
#[utoipa::path(
    post,
    path = "/check",
    tag = "game",
    params(("X-User-Id" = i64, Header, description = "Player id set by the sign-in layer")),
    request_body(content = CheckForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Redirect to /game while the round continues, to /score once it is over"),
        (status = 404, description = "Unknown photo", body = String, content_type = "text/html"),
        (status = 409, description = "No question is displayed", body = String, content_type = "text/html")
    )
)]
pub async fn check_answer(
    State(state): State<SharedState>,
    Extension(player): Extension<UserId>,
    form: Result<Form<CheckForm>, FormRejection>,
) -> Result<Redirect, AppError> {
    let Form(form) = form.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    form.validate()?;

    let outcome = game_service::check_answer(&state, player, form.guess).await?;
    Ok(match outcome {
        CheckOutcome::Continue { .. } => Redirect::to("/game"),
        CheckOutcome::Finished { .. } => Redirect::to("/score"),
    })
}

/// Skip the displayed question; it comes back before any new one.
#[utoipa::path(
    post,
    path = "/skip",
    tag = "game",
    params(("X-User-Id" = i64, Header, description = "Player id set by the sign-in layer")),
    responses(
        (status = 303, description = "Redirect to /game"),
        (status = 409, description = "No question is displayed", body = String, content_type = "text/html")
    )
)]
pub async fn skip_question(
    State(state): State<SharedState>,
    Extension(player): Extension<UserId>,
) -> Result<Redirect, AppError> {
    game_service::skip_question(&state, player).await?;
    Ok(Redirect::to("/game"))
}

/// Show the current or final score with a link back into the game.
#[utoipa::path(
    get,
    path = "/score",
    tag = "game",
    params(("X-User-Id" = i64, Header, description = "Player id set by the sign-in layer")),
    responses((status = 200, description = "Score page", body = String, content_type = "text/html"))
)]
pub async fn score_page(
    State(state): State<SharedState>,
    Extension(player): Extension<UserId>,
) -> Html<String> {
    let report = game_service::score(&state, player);
    Html(page::score_page(&report))
}

/// Dispose of the player's session and hand over to the sign-in layer.
#[utoipa::path(
    post,
    path = "/logout",
    tag = "game",
    params(("X-User-Id" = i64, Header, description = "Player id set by the sign-in layer")),
    responses((status = 303, description = "Redirect to the sign-in page"))
)]
pub async fn logout(
    State(state): State<SharedState>,
    Extension(player): Extension<UserId>,
) -> Redirect {
    game_service::end_session(&state, player);
    Redirect::to(&state.config().auth.signin_path)
}

/// Resolve the player from the header set by the sign-in layer, redirecting anonymous requests.
async fn require_player(State(state): State<SharedState>, mut req: Request<Body>, next: Next) -> Response {
    let auth = &state.config().auth;
    let player = req
        .headers()
        .get(auth.user_header.as_str())
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<i64>().ok())
        .map(UserId);

    match player {
        Some(player) => {
            req.extensions_mut().insert(player);
            next.run(req).await
        }
        None => {
            debug!(path = %req.uri().path(), "unauthenticated request; redirecting to sign-in");
            Redirect::to(&auth.signin_path).into_response()
        }
    }
}
