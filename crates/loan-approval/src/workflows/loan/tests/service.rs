use std::sync::Arc;

use super::common::*;
use crate::workflows::loan::classifier::ApprovalLabel;
use crate::workflows::loan::domain::{Education, Gender, LoanApplication, PreviousDefault};
use crate::workflows::loan::flow::{ActiveTab, FlowError};
use crate::workflows::loan::report::{Verdict, APPROVED_SUGGESTION, REJECTED_SUGGESTION};
use crate::workflows::loan::service::{
    score_application, LoanPredictionService, PredictionServiceError,
};
use crate::workflows::loan::session::SessionId;

#[test]
fn scenario_vector_reaches_classifier_in_trained_order() {
    let (service, classifier, _) = build_service(FixedClassifier::approving());

    let report = service
        .evaluate(&scenario_application())
        .expect("scenario scores");

    let seen = classifier.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(
        seen[0].values(),
        &[30.0, 500000.0, 5.0, 100000.0, 10.5, 20.0, 4.0, 720.0, 1.0, 2.0, 4.0, 3.0, 0.0]
    );
    assert_eq!(report.label, ApprovalLabel::Approved);
    assert_eq!(report.verdict, Verdict::Approved);
    assert_eq!(report.suggestion, APPROVED_SUGGESTION);
    assert_eq!(report.credit.message, "Your credit score of 720.0 is considered Good.");
}

#[test]
fn verdict_and_suggestion_follow_only_the_label() {
    let (approving, _, _) = build_service(FixedClassifier::approving());
    let (rejecting, _, _) = build_service(FixedClassifier::rejecting());

    let mut strong = scenario_application();
    strong.applicant.credit_score = 880.0;
    let mut weak = scenario_application();
    weak.applicant.credit_score = 310.0;
    weak.loan.previous_default = PreviousDefault::Yes;

    for application in [&strong, &weak] {
        let approved = approving.evaluate(application).expect("scores");
        assert_eq!(approved.banner, "Loan Approved");
        assert_eq!(approved.suggestion, APPROVED_SUGGESTION);

        let rejected = rejecting.evaluate(application).expect("scores");
        assert_eq!(rejected.banner, "Loan Rejected");
        assert_eq!(rejected.suggestion, REJECTED_SUGGESTION);
    }
}

#[test]
fn sessions_persist_only_once_started() {
    let (service, _, sessions) = build_service(FixedClassifier::approving());

    let mut created = service.open_session(None).expect("session opens");
    assert!(created.created);
    assert!(!created.record.flow.started());
    assert_eq!(sessions.len(), 0);

    let fresh = service
        .open_session(Some(created.id))
        .expect("unsaved ids start fresh");
    assert!(fresh.created);
    assert_ne!(fresh.id, created.id);

    service.start(&mut created).expect("start");
    assert_eq!(sessions.len(), 1);

    let reopened = service
        .open_session(Some(created.id))
        .expect("session reopens");
    assert!(!reopened.created);
    assert_eq!(reopened.id, created.id);
    assert!(reopened.record.flow.started());
    assert_eq!(sessions.len(), 1);
}

#[test]
fn submit_before_start_is_refused() {
    let (service, classifier, _) = build_service(FixedClassifier::approving());
    let mut session = service.open_session(None).expect("session opens");

    let err = service
        .submit(&mut session, scenario_application())
        .expect_err("not started");
    assert!(matches!(
        err,
        PredictionServiceError::Flow(FlowError::NotStarted)
    ));
    assert!(classifier.seen().is_empty());
}

#[test]
fn submit_records_prediction_and_application() {
    let (service, _, sessions) = build_service(FixedClassifier::rejecting());
    let mut session = service.open_session(None).expect("session opens");
    service.start(&mut session).expect("start");

    let report = service
        .submit(&mut session, scenario_application())
        .expect("submission scores");
    assert_eq!(report.verdict, Verdict::Rejected);

    let stored = sessions.get(&session.id).expect("session persisted");
    assert!(stored.flow.started());
    assert!(stored.flow.predict_clicked());
    assert_eq!(stored.flow.active_tab(), ActiveTab::Result);
    assert_eq!(stored.application, Some(scenario_application()));
}

#[test]
fn invalid_submission_leaves_session_untouched() {
    let (service, classifier, sessions) = build_service(FixedClassifier::approving());
    let mut session = service.open_session(None).expect("session opens");
    service.start(&mut session).expect("start");

    let mut application = scenario_application();
    application.applicant.credit_score = 950.0;
    let err = service
        .submit(&mut session, application)
        .expect_err("score above range");

    assert!(err.is_client_error());
    assert!(classifier.seen().is_empty());
    let stored = sessions.get(&session.id).expect("session persisted");
    assert!(!stored.flow.predict_clicked());
    assert_eq!(stored.application, None);
}

#[test]
fn view_is_idempotent_for_unchanged_state() {
    let (service, _, _) = build_service(FixedClassifier::approving());
    let mut session = service.open_session(None).expect("session opens");
    service.start(&mut session).expect("start");
    service
        .submit(&mut session, scenario_application())
        .expect("scores");

    let first = service.view(&session).expect("view renders");
    let second = service.view(&session).expect("view renders");
    assert_eq!(first, second);
    assert_eq!(
        crate::workflows::loan::page::render_page(&first),
        crate::workflows::loan::page::render_page(&second)
    );
    assert!(first.report.is_some());
    assert_eq!(first.form, scenario_application());
}

#[test]
fn view_without_prediction_prefills_defaults() {
    let (service, classifier, _) = build_service(FixedClassifier::approving());
    let mut session = service.open_session(None).expect("session opens");
    service.start(&mut session).expect("start");

    let view = service.view(&session).expect("view renders");
    assert!(view.report.is_none());
    assert_eq!(view.form, LoanApplication::default());
    assert_eq!(view.form.applicant.gender, Gender::Male);
    assert_eq!(view.form.applicant.education, Education::Master);
    assert!(classifier.seen().is_empty());
}

#[test]
fn score_application_needs_no_session_store() {
    let classifier = FixedClassifier::rejecting();
    let report = score_application(&classifier, &scenario_application()).expect("scores");
    assert_eq!(report.verdict, Verdict::Rejected);
    assert_eq!(classifier.seen().len(), 1);
}

#[test]
fn classifier_failures_surface_as_server_errors() {
    let (service, _, _) = build_service(FixedClassifier::broken());
    let err = service
        .evaluate(&scenario_application())
        .expect_err("classifier offline");
    assert!(matches!(err, PredictionServiceError::Classifier(_)));
    assert!(!err.is_client_error());
}

#[test]
fn session_store_failures_propagate() {
    let service = LoanPredictionService::new(
        Arc::new(FixedClassifier::approving()),
        Arc::new(UnavailableSessions),
    );
    let mut session = service
        .open_session(None)
        .expect("fresh sessions need no store");
    let err = service.start(&mut session).expect_err("store offline");
    assert!(matches!(err, PredictionServiceError::Session(_)));

    let err = service
        .open_session(Some(session.id))
        .expect_err("store offline");
    assert!(matches!(err, PredictionServiceError::Session(_)));
}
