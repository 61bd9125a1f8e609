use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, Request, Response};

use crate::workflows::loan::classifier::{ApprovalLabel, Classifier, ClassifierError};
use crate::workflows::loan::domain::{
    ApplicantInput, Education, Gender, HomeOwnership, LoanApplication, LoanInput, LoanPurpose,
    PreviousDefault,
};
use crate::workflows::loan::features::FeatureVector;
use crate::workflows::loan::session::{SessionError, SessionId, SessionRecord, SessionStore};
use crate::workflows::loan::{loan_router, LoanPredictionService};

/// The worked example from the product brief.
pub(super) fn scenario_application() -> LoanApplication {
    LoanApplication {
        applicant: ApplicantInput {
            age: 30.0,
            income: 500000.0,
            employment_experience_years: 5.0,
            credit_score: 720.0,
            credit_history_years: 4.0,
            gender: Gender::Male,
            education: Education::Bachelor,
            home_ownership: HomeOwnership::Rent,
        },
        loan: LoanInput {
            amount: 100000.0,
            interest_rate_pct: 10.5,
            percent_of_income: 20.0,
            purpose: LoanPurpose::Personal,
            previous_default: PreviousDefault::No,
        },
    }
}

pub(super) const SCENARIO_FORM: &str = "age=30&income=500000&emp_exp=5&credit_score=720&cred_hist_len=4&gender=Male&education=Bachelor&ownership=RENT&loan_amt=100000&int_rate=10.5&percent_income=20&purpose=PERSONAL&previous_loan_default=No";

/// Classifier returning a fixed label and recording every row it scores.
#[derive(Default)]
pub(super) struct FixedClassifier {
    label: Option<ApprovalLabel>,
    seen: Mutex<Vec<FeatureVector>>,
}

impl FixedClassifier {
    pub(super) fn approving() -> Self {
        Self {
            label: Some(ApprovalLabel::Approved),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn rejecting() -> Self {
        Self {
            label: Some(ApprovalLabel::Rejected),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// A classifier that always fails, for exercising server errors.
    pub(super) fn broken() -> Self {
        Self::default()
    }

    pub(super) fn seen(&self) -> Vec<FeatureVector> {
        self.seen.lock().expect("classifier mutex poisoned").clone()
    }
}

impl Classifier for FixedClassifier {
    fn predict(&self, features: &FeatureVector) -> Result<ApprovalLabel, ClassifierError> {
        self.seen
            .lock()
            .expect("classifier mutex poisoned")
            .push(*features);
        self.label
            .ok_or_else(|| ClassifierError::Unavailable("offline".to_string()))
    }
}

#[derive(Default)]
pub(super) struct MemorySessions {
    records: Mutex<HashMap<SessionId, SessionRecord>>,
}

impl MemorySessions {
    pub(super) fn get(&self, id: &SessionId) -> Option<SessionRecord> {
        self.records
            .lock()
            .expect("session mutex poisoned")
            .get(id)
            .cloned()
    }

    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("session mutex poisoned").len()
    }
}

impl SessionStore for MemorySessions {
    fn load(&self, id: &SessionId) -> Result<Option<SessionRecord>, SessionError> {
        Ok(self.get(id))
    }

    fn save(&self, id: SessionId, record: SessionRecord) -> Result<(), SessionError> {
        self.records
            .lock()
            .expect("session mutex poisoned")
            .insert(id, record);
        Ok(())
    }
}

pub(super) struct UnavailableSessions;

impl SessionStore for UnavailableSessions {
    fn load(&self, _id: &SessionId) -> Result<Option<SessionRecord>, SessionError> {
        Err(SessionError::Unavailable("offline".to_string()))
    }

    fn save(&self, _id: SessionId, _record: SessionRecord) -> Result<(), SessionError> {
        Err(SessionError::Unavailable("offline".to_string()))
    }
}

pub(super) type TestService = LoanPredictionService<FixedClassifier, MemorySessions>;

pub(super) fn build_service(
    classifier: FixedClassifier,
) -> (Arc<TestService>, Arc<FixedClassifier>, Arc<MemorySessions>) {
    let classifier = Arc::new(classifier);
    let sessions = Arc::new(MemorySessions::default());
    let service = Arc::new(LoanPredictionService::new(
        classifier.clone(),
        sessions.clone(),
    ));
    (service, classifier, sessions)
}

pub(super) fn router_for(service: Arc<TestService>) -> axum::Router {
    loan_router(service, false)
}

pub(super) fn cookie_from(response: &Response<Body>) -> String {
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("session cookie issued")
        .to_str()
        .expect("ascii cookie");
    set_cookie
        .split(';')
        .next()
        .expect("name=value pair")
        .to_string()
}

pub(super) fn get_page(cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::get("/");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).expect("request builds")
}

pub(super) fn post_form(path: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::post(path)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

pub(super) async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}
