use std::sync::Arc;

use tracing::{debug, info, warn};

use super::classifier::{Classifier, ClassifierError};
use super::domain::{InputError, LoanApplication};
use super::encoding::EncodingError;
use super::features::FeatureVector;
use super::flow::{FlowError, UiFlowState};
use super::report::PredictionReport;
use super::session::{SessionError, SessionId, SessionRecord, SessionStore};

/// A session resolved for the current request.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: SessionId,
    pub record: SessionRecord,
    /// True when the request carried no usable id; such sessions are stored
    /// only once started.
    pub created: bool,
}

/// Inputs for rendering one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    pub flow: UiFlowState,
    /// Values to prefill the form with.
    pub form: LoanApplication,
    pub report: Option<PredictionReport>,
    pub notice: Option<String>,
}

/// Service composing the injected classifier with per-session flow state.
pub struct LoanPredictionService<C, S> {
    classifier: Arc<C>,
    sessions: Arc<S>,
}

impl<C, S> LoanPredictionService<C, S>
where
    C: Classifier + 'static,
    S: SessionStore + 'static,
{
    pub fn new(classifier: Arc<C>, sessions: Arc<S>) -> Self {
        Self {
            classifier,
            sessions,
        }
    }

    /// Resolve `requested` to a stored session, or begin a fresh one.
    ///
    /// Fresh sessions are not persisted until [`start`](Self::start).
    pub fn open_session(
        &self,
        requested: Option<SessionId>,
    ) -> Result<Session, PredictionServiceError> {
        if let Some(id) = requested {
            if let Some(record) = self.sessions.load(&id)? {
                return Ok(Session {
                    id,
                    record,
                    created: false,
                });
            }
        }

        Ok(Session {
            id: SessionId::generate(),
            record: SessionRecord::default(),
            created: true,
        })
    }

    pub fn start(&self, session: &mut Session) -> Result<(), PredictionServiceError> {
        session.record.flow.start();
        self.sessions.save(session.id, session.record.clone())?;
        if session.created {
            info!(session = %session.id, "session created");
        }
        Ok(())
    }

    /// Score a submitted form and remember it for the result tab.
    pub fn submit(
        &self,
        session: &mut Session,
        application: LoanApplication,
    ) -> Result<PredictionReport, PredictionServiceError> {
        if !session.record.flow.started() {
            return Err(FlowError::NotStarted.into());
        }

        let report = self.evaluate(&application).inspect_err(|err| {
            warn!(session = %session.id, error = %err, "loan application rejected at intake");
        })?;

        session.record.flow.record_prediction()?;
        session.record.application = Some(application);
        self.sessions.save(session.id, session.record.clone())?;

        info!(
            session = %session.id,
            verdict = report.verdict.as_str(),
            "loan application scored"
        );
        Ok(report)
    }

    /// Build the page for the session's current state.
    ///
    /// The result tab is re-derived from the stored form on every call.
    pub fn view(&self, session: &Session) -> Result<PageView, PredictionServiceError> {
        let flow = session.record.flow.clone();
        let form = session.record.application.clone().unwrap_or_default();

        let report = match (&session.record.application, flow.predict_clicked()) {
            (Some(application), true) => Some(self.evaluate(application)?),
            _ => None,
        };

        Ok(PageView {
            flow,
            form,
            report,
            notice: None,
        })
    }

    /// Score an application without touching any session.
    pub fn evaluate(
        &self,
        application: &LoanApplication,
    ) -> Result<PredictionReport, PredictionServiceError> {
        score_application(self.classifier.as_ref(), application)
    }
}

/// Validate, assemble, and score one application against `classifier`.
pub fn score_application<C: Classifier + ?Sized>(
    classifier: &C,
    application: &LoanApplication,
) -> Result<PredictionReport, PredictionServiceError> {
    application.validate()?;
    let features = FeatureVector::from_application(application);
    let label = classifier.predict(&features)?;
    debug!(label = label.code(), "classifier scored feature vector");
    Ok(PredictionReport::build(label, application))
}

/// Error raised by the prediction service.
#[derive(Debug, thiserror::Error)]
pub enum PredictionServiceError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    #[error(transparent)]
    Flow(#[from] FlowError),
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl PredictionServiceError {
    /// Whether the caller supplied something the form would never produce.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PredictionServiceError::Input(_) | PredictionServiceError::Encoding(_)
        )
    }
}
