use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::Deserialize;

use crate::error::AppError;

use super::classifier::Classifier;
use super::domain::{ApplicantInput, LoanApplication, LoanInput};
use super::encoding::EncodingError;
use super::page::render_page;
use super::service::{LoanPredictionService, PredictionServiceError, Session};
use super::session::{session_cookie, session_from_cookie_header, SessionId, SessionStore};

/// Flat form body posted by the applicant tab.
#[derive(Debug, Clone, Deserialize)]
pub struct LoanApplicationForm {
    pub age: f64,
    pub income: f64,
    pub emp_exp: f64,
    pub credit_score: f64,
    pub cred_hist_len: f64,
    pub gender: String,
    pub education: String,
    pub ownership: String,
    pub loan_amt: f64,
    pub int_rate: f64,
    pub percent_income: f64,
    pub purpose: String,
    pub previous_loan_default: String,
}

impl LoanApplicationForm {
    pub fn into_application(self) -> Result<LoanApplication, EncodingError> {
        Ok(LoanApplication {
            applicant: ApplicantInput {
                age: self.age,
                income: self.income,
                employment_experience_years: self.emp_exp,
                credit_score: self.credit_score,
                credit_history_years: self.cred_hist_len,
                gender: self.gender.parse()?,
                education: self.education.parse()?,
                home_ownership: self.ownership.parse()?,
            },
            loan: LoanInput {
                amount: self.loan_amt,
                interest_rate_pct: self.int_rate,
                percent_of_income: self.percent_income,
                purpose: self.purpose.parse()?,
                previous_default: self.previous_loan_default.parse()?,
            },
        })
    }
}

pub(crate) struct LoanRouterState<C, S> {
    service: Arc<LoanPredictionService<C, S>>,
    secure_cookies: bool,
}

/// Router builder exposing the form pages and the JSON scoring endpoint.
pub fn loan_router<C, S>(service: Arc<LoanPredictionService<C, S>>, secure_cookies: bool) -> Router
where
    C: Classifier + 'static,
    S: SessionStore + 'static,
{
    let state = Arc::new(LoanRouterState {
        service,
        secure_cookies,
    });

    Router::new()
        .route("/", get(page_handler::<C, S>))
        .route("/start", post(start_handler::<C, S>))
        .route("/predict", post(predict_handler::<C, S>))
        .route("/api/v1/loan/predict", post(api_predict_handler::<C, S>))
        .with_state(state)
}

pub(crate) async fn page_handler<C, S>(
    State(state): State<Arc<LoanRouterState<C, S>>>,
    headers: HeaderMap,
) -> Response
where
    C: Classifier + 'static,
    S: SessionStore + 'static,
{
    let session = match state.service.open_session(requested_session(&headers)) {
        Ok(session) => session,
        Err(err) => return failure_response(err),
    };

    match state.service.view(&session) {
        Ok(view) => {
            let response = Html(render_page(&view)).into_response();
            with_session_cookie(response, &session, state.secure_cookies)
        }
        Err(err) => failure_response(err),
    }
}

pub(crate) async fn start_handler<C, S>(
    State(state): State<Arc<LoanRouterState<C, S>>>,
    headers: HeaderMap,
) -> Response
where
    C: Classifier + 'static,
    S: SessionStore + 'static,
{
    let mut session = match state.service.open_session(requested_session(&headers)) {
        Ok(session) => session,
        Err(err) => return failure_response(err),
    };

    match state.service.start(&mut session) {
        Ok(()) => {
            let response = Redirect::to("/").into_response();
            with_session_cookie(response, &session, state.secure_cookies)
        }
        Err(err) => failure_response(err),
    }
}

pub(crate) async fn predict_handler<C, S>(
    State(state): State<Arc<LoanRouterState<C, S>>>,
    headers: HeaderMap,
    form: Result<Form<LoanApplicationForm>, FormRejection>,
) -> Response
where
    C: Classifier + 'static,
    S: SessionStore + 'static,
{
    let mut session = match state.service.open_session(requested_session(&headers)) {
        Ok(session) => session,
        Err(err) => return failure_response(err),
    };
    if !session.record.flow.started() {
        return Redirect::to("/").into_response();
    }

    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => return rejected_form(&state, &session, None, rejection.body_text()),
    };
    let application = match form.into_application() {
        Ok(application) => application,
        Err(err) => return rejected_form(&state, &session, None, err.to_string()),
    };

    match state.service.submit(&mut session, application.clone()) {
        Ok(_) => Redirect::to("/").into_response(),
        Err(err) if err.is_client_error() => {
            rejected_form(&state, &session, Some(application), err.to_string())
        }
        Err(err) => failure_response(err),
    }
}

pub(crate) async fn api_predict_handler<C, S>(
    State(state): State<Arc<LoanRouterState<C, S>>>,
    Json(application): Json<LoanApplication>,
) -> Response
where
    C: Classifier + 'static,
    S: SessionStore + 'static,
{
    match state.service.evaluate(&application) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(err) => failure_response(err),
    }
}

/// Re-render the applicant tab with the submitted values and the reason
/// they were refused.
fn rejected_form<C, S>(
    state: &LoanRouterState<C, S>,
    session: &Session,
    submitted: Option<LoanApplication>,
    notice: String,
) -> Response
where
    C: Classifier + 'static,
    S: SessionStore + 'static,
{
    let mut view = match state.service.view(session) {
        Ok(view) => view,
        Err(other) => return failure_response(other),
    };
    if let Some(application) = submitted {
        view.form = application;
    }
    view.notice = Some(notice);

    let response = (StatusCode::UNPROCESSABLE_ENTITY, Html(render_page(&view))).into_response();
    with_session_cookie(response, session, state.secure_cookies)
}

fn failure_response(err: PredictionServiceError) -> Response {
    AppError::from(err).into_response()
}

fn requested_session(headers: &HeaderMap) -> Option<SessionId> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(session_from_cookie_header)
}

/// Bind the browser to sessions persisted during this request.
fn with_session_cookie(mut response: Response, session: &Session, secure: bool) -> Response {
    if session.created && session.record.flow.started() {
        if let Ok(value) = HeaderValue::from_str(&session_cookie(session.id, secure)) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }
    response
}
