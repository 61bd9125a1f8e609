//! HTML rendering for the welcome screen and the two-tab workspace.
//!
//! Rendering is a pure function of [`PageView`]; the same view always yields
//! the same markup.

use super::domain::{AGE_MIN, CREDIT_SCORE_MAX, CREDIT_SCORE_MIN};
use super::encoding::Categorical;
use super::flow::{ActiveTab, Screen};
use super::report::{PredictionReport, Verdict};
use super::service::PageView;

pub fn render_page(view: &PageView) -> String {
    match view.flow.screen() {
        Screen::Welcome => render_welcome(),
        Screen::Workspace { show_result } => render_workspace(view, show_result),
    }
}

pub fn render_welcome() -> String {
    let mut html = render_head();
    html.push_str("<body>\n<main class=\"container\">\n");
    html.push_str(
        r#"<h1>🏦 Loan Approval Prediction</h1>
<h2 class="welcome">Welcome to Loan Approval Prediction</h2>
<p class="tagline">Check your loan eligibility in seconds using our smart prediction system.</p>
<form method="post" action="/start" class="centered-button">
    <button type="submit">🚀 Start</button>
</form>
"#,
    );
    html.push_str("</main>\n</body>\n</html>");
    html
}

fn render_workspace(view: &PageView, show_result: bool) -> String {
    let active = view.flow.active_tab();
    let mut html = render_head();
    html.push_str(&format!(
        "<body>\n<main class=\"container\" data-active-tab=\"{}\">\n",
        active.as_str()
    ));
    html.push_str(&render_tab_headers(active));

    html.push_str("<section id=\"applicant\" class=\"tab-panel\">\n");
    html.push_str("<h2>Enter Applicant Information</h2>\n");
    if let Some(notice) = &view.notice {
        html.push_str(&format!(
            "<div class=\"alert error\" role=\"alert\">{}</div>\n",
            html_escape(notice)
        ));
    }
    html.push_str(&render_form(view));
    html.push_str("</section>\n");

    html.push_str("<section id=\"result\" class=\"tab-panel\">\n");
    html.push_str("<h2>Prediction Result</h2>\n");
    if show_result {
        if let Some(report) = &view.report {
            html.push_str(&render_report(report));
        }
    }
    html.push_str("</section>\n");

    html.push_str("</main>\n</body>\n</html>");
    html
}

fn render_tab_headers(active: ActiveTab) -> String {
    let class_for = |tab: ActiveTab| if tab == active { "tab active" } else { "tab" };
    format!(
        "<nav class=\"tabs\">\n    <a class=\"{}\" href=\"#applicant\">📝 Applicant Info</a>\n    <a class=\"{}\" href=\"#result\">📊 Loan Result</a>\n</nav>\n",
        class_for(ActiveTab::Applicant),
        class_for(ActiveTab::Result)
    )
}

fn render_form(view: &PageView) -> String {
    let applicant = &view.form.applicant;
    let loan = &view.form.loan;

    let mut html = String::from("<form method=\"post\" action=\"/predict\">\n");

    html.push_str("<fieldset>\n<legend>🧍 Personal Information</legend>\n");
    html.push_str(&number_input("age", "Age", applicant.age, AGE_MIN, None, "1"));
    html.push_str(&number_input(
        "income",
        "Income (Rs)",
        applicant.income,
        0.0,
        None,
        "0.01",
    ));
    html.push_str(&number_input(
        "emp_exp",
        "Employment Experience (years)",
        applicant.employment_experience_years,
        0.0,
        None,
        "0.1",
    ));
    html.push_str(&number_input(
        "credit_score",
        "Credit Score",
        applicant.credit_score,
        CREDIT_SCORE_MIN,
        Some(CREDIT_SCORE_MAX),
        "1",
    ));
    html.push_str(&number_input(
        "cred_hist_len",
        "Credit History Length (years)",
        applicant.credit_history_years,
        0.0,
        None,
        "0.1",
    ));
    html.push_str(&select_input("gender", "Gender", applicant.gender));
    html.push_str(&select_input(
        "education",
        "Education Level",
        applicant.education,
    ));
    html.push_str(&select_input(
        "ownership",
        "Home Ownership",
        applicant.home_ownership,
    ));
    html.push_str("</fieldset>\n");

    html.push_str("<fieldset>\n<legend>💸 Loan Details</legend>\n");
    html.push_str(&number_input(
        "loan_amt",
        "Loan Amount Requested (Rs)",
        loan.amount,
        0.0,
        None,
        "0.01",
    ));
    html.push_str(&number_input(
        "int_rate",
        "Interest Rate (%)",
        loan.interest_rate_pct,
        0.0,
        None,
        "0.01",
    ));
    html.push_str(&number_input(
        "percent_income",
        "Loan as % of Income",
        loan.percent_of_income,
        0.0,
        None,
        "0.01",
    ));
    html.push_str(&select_input("purpose", "Loan Purpose", loan.purpose));
    html.push_str(&select_input(
        "previous_loan_default",
        "Previous Loan Defaults",
        loan.previous_default,
    ));
    html.push_str("</fieldset>\n");

    html.push_str("<button type=\"submit\">🚀 Predict Loan Approval</button>\n</form>\n");
    html
}

fn number_input(
    name: &str,
    label: &str,
    value: f64,
    min: f64,
    max: Option<f64>,
    step: &str,
) -> String {
    let max_attr = max
        .map(|max| format!(" max=\"{max}\""))
        .unwrap_or_default();
    format!(
        "<label for=\"{name}\">{label}</label>\n<input type=\"number\" id=\"{name}\" name=\"{name}\" value=\"{value}\" min=\"{min}\"{max_attr} step=\"{step}\" required>\n"
    )
}

fn select_input<T: Categorical + PartialEq>(name: &str, label: &str, selected: T) -> String {
    let mut html = format!("<label for=\"{name}\">{label}</label>\n<select id=\"{name}\" name=\"{name}\">\n");
    for choice in T::UI_ORDER {
        let marker = if *choice == selected { " selected" } else { "" };
        html.push_str(&format!(
            "    <option value=\"{0}\"{marker}>{0}</option>\n",
            html_escape(choice.label())
        ));
    }
    html.push_str("</select>\n");
    html
}

fn render_report(report: &PredictionReport) -> String {
    let mut html = String::from("<hr>\n");

    let banner_class = match report.verdict {
        Verdict::Approved => "alert success",
        Verdict::Rejected => "alert error",
    };
    let icon = match report.verdict {
        Verdict::Approved => "✅",
        Verdict::Rejected => "❌",
    };
    html.push_str(&format!(
        "<div class=\"{banner_class}\" data-verdict=\"{}\"><strong>{icon} {}</strong></div>\n",
        report.verdict.as_str(),
        report.banner
    ));

    html.push_str("<details open>\n<summary>📋 Applicant Summary</summary>\n<dl>\n");
    for (label, value) in report.applicant.entries() {
        html.push_str(&definition(label, value));
    }
    html.push_str("</dl>\n</details>\n");

    html.push_str("<details open>\n<summary>💼 Loan Summary</summary>\n<dl>\n");
    for (label, value) in report.loan.entries() {
        html.push_str(&definition(label, value));
    }
    html.push_str("</dl>\n</details>\n");

    html.push_str(&format!(
        "<details>\n<summary>🔍 Credit Score Analysis</summary>\n<div class=\"alert info\">{}</div>\n</details>\n",
        html_escape(&report.credit.message)
    ));

    html.push_str(&format!(
        "<details>\n<summary>📉 Loan-to-Income Visualization</summary>\n<figure>{}</figure>\n</details>\n",
        report.chart.to_svg()
    ));

    let suggestion_class = match report.verdict {
        Verdict::Approved => "alert success",
        Verdict::Rejected => "alert warning",
    };
    html.push_str(&format!(
        "<details>\n<summary>💡 Suggestion</summary>\n<div class=\"{suggestion_class}\">{}</div>\n</details>\n",
        html_escape(report.suggestion)
    ));

    html
}

fn definition(label: &str, value: &str) -> String {
    format!(
        "<dt>{}</dt><dd>{}</dd>\n",
        html_escape(label),
        html_escape(value)
    )
}

fn render_head() -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Loan Prediction</title>
    <style>
{CSS}
    </style>
</head>
"#
    )
}

pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

const CSS: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; background: #f8fafc; color: #1e293b; }
.container { max-width: 960px; margin: 0 auto; padding: 2rem; }
h2.welcome { text-align: center; color: #4CAF50; }
p.tagline { text-align: center; }
.centered-button button, form button {
    display: block;
    margin: 2rem auto;
    padding: 0.6rem 2rem;
    font-size: 18px;
    background-color: #4CAF50;
    color: white;
    border: none;
    border-radius: 8px;
    cursor: pointer;
}
.tabs { display: flex; gap: 1rem; border-bottom: 2px solid #e2e8f0; margin-bottom: 1.5rem; }
.tab { padding: 0.5rem 1rem; text-decoration: none; color: #475569; }
.tab.active { border-bottom: 3px solid #4CAF50; color: #1e293b; font-weight: 600; }
fieldset { border: 1px solid #e2e8f0; border-radius: 8px; margin-bottom: 1rem; padding: 1rem; }
label { display: block; margin-top: 0.75rem; font-weight: 500; }
input, select { width: 100%; padding: 0.4rem; box-sizing: border-box; }
.alert { padding: 0.75rem 1rem; border-radius: 6px; margin: 1rem 0; }
.alert.success { background: #dcfce7; color: #166534; }
.alert.error { background: #fee2e2; color: #991b1b; }
.alert.warning { background: #fef9c3; color: #854d0e; }
.alert.info { background: #dbeafe; color: #1e40af; }
details { margin: 0.75rem 0; background: white; border: 1px solid #e2e8f0; border-radius: 8px; padding: 0.5rem 1rem; }
dl { display: grid; grid-template-columns: max-content 1fr; gap: 0.25rem 1rem; }
dt { font-weight: 600; }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::loan::classifier::ApprovalLabel;
    use crate::workflows::loan::domain::{Education, LoanApplication};
    use crate::workflows::loan::flow::UiFlowState;

    fn view(flow: UiFlowState, report: Option<PredictionReport>) -> PageView {
        PageView {
            flow,
            form: LoanApplication::default(),
            report,
            notice: None,
        }
    }

    #[test]
    fn welcome_screen_offers_only_start() {
        let html = render_page(&view(UiFlowState::new(), None));
        assert!(html.contains("Welcome to Loan Approval Prediction"));
        assert!(html.contains("action=\"/start\""));
        assert!(!html.contains("action=\"/predict\""));
    }

    #[test]
    fn workspace_renders_both_tabs_before_prediction() {
        let mut flow = UiFlowState::new();
        flow.start();
        let html = render_page(&view(flow, None));

        assert!(html.contains("id=\"applicant\""));
        assert!(html.contains("id=\"result\""));
        assert!(html.contains("data-active-tab=\"Applicant\""));
        assert!(html.contains("Prediction Result"));
        assert!(!html.contains("data-verdict"));
        for name in [
            "age",
            "income",
            "emp_exp",
            "credit_score",
            "cred_hist_len",
            "gender",
            "education",
            "ownership",
            "loan_amt",
            "int_rate",
            "percent_income",
            "purpose",
            "previous_loan_default",
        ] {
            assert!(html.contains(&format!("name=\"{name}\"")), "missing {name}");
        }
        assert!(html.contains("min=\"300\" max=\"900\""));
    }

    #[test]
    fn select_lists_choices_in_form_order() {
        let html = select_input("education", "Education Level", Education::Bachelor);
        let master = html.find("Master").expect("master option");
        let high_school = html.find("High School").expect("high school option");
        let doctorate = html.find("Doctorate").expect("doctorate option");
        assert!(master < high_school && high_school < doctorate);
        assert!(html.contains("<option value=\"Bachelor\" selected>"));
    }

    #[test]
    fn result_panel_shows_report_after_prediction() {
        let mut flow = UiFlowState::new();
        flow.start();
        flow.record_prediction().expect("started");
        let report = PredictionReport::build(ApprovalLabel::Approved, &LoanApplication::default());
        let html = render_page(&view(flow, Some(report)));

        assert!(html.contains("data-active-tab=\"Result\""));
        assert!(html.contains("data-verdict=\"Approved\""));
        assert!(html.contains("Loan Approved"));
        assert!(html.contains("Your profile looks strong for this loan request."));
        assert!(html.contains("<svg"));
        assert!(html.contains("id=\"applicant\""));
    }

    #[test]
    fn notices_are_escaped() {
        let mut flow = UiFlowState::new();
        flow.start();
        let mut page = view(flow, None);
        page.notice = Some("<script>alert(1)</script>".to_string());
        let html = render_page(&page);
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }
}
