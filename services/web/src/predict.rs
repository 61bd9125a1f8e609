use clap::Args;
use loan_approval::config::AppConfig;
use loan_approval::error::AppError;
use loan_approval::telemetry;
use loan_approval::workflows::loan::{
    score_application, ApplicantInput, Education, Gender, GradientBoostedModel, HomeOwnership,
    LoanApplication, LoanInput, LoanPurpose, PredictionReport, PreviousDefault,
};
use std::fmt::Write;
use tracing::debug;

#[derive(Args, Debug, Clone)]
pub(crate) struct PredictArgs {
    /// Applicant age in years (18 or older)
    #[arg(long)]
    pub(crate) age: f64,
    /// Income in rupees
    #[arg(long)]
    pub(crate) income: f64,
    /// Employment experience in years
    #[arg(long)]
    pub(crate) emp_exp: f64,
    /// Credit score between 300 and 900
    #[arg(long)]
    pub(crate) credit_score: f64,
    /// Credit history length in years
    #[arg(long)]
    pub(crate) cred_hist_len: f64,
    /// Male or Female
    #[arg(long)]
    pub(crate) gender: Gender,
    /// Master, High School, Bachelor, Associate or Doctorate
    #[arg(long)]
    pub(crate) education: Education,
    /// RENT, OWN, MORTGAGE or OTHER
    #[arg(long)]
    pub(crate) ownership: HomeOwnership,
    /// Requested loan amount in rupees
    #[arg(long)]
    pub(crate) loan_amt: f64,
    /// Interest rate in percent
    #[arg(long)]
    pub(crate) int_rate: f64,
    /// Loan amount as a percentage of income
    #[arg(long)]
    pub(crate) percent_income: f64,
    /// PERSONAL, EDUCATION, MEDICAL, VENTURE, HOMEIMPROVEMENT or DEBTCONSOLIDATION
    #[arg(long)]
    pub(crate) purpose: LoanPurpose,
    /// Yes or No
    #[arg(long)]
    pub(crate) previous_loan_default: PreviousDefault,
}

impl PredictArgs {
    pub(crate) fn into_application(self) -> LoanApplication {
        LoanApplication {
            applicant: ApplicantInput {
                age: self.age,
                income: self.income,
                employment_experience_years: self.emp_exp,
                credit_score: self.credit_score,
                credit_history_years: self.cred_hist_len,
                gender: self.gender,
                education: self.education,
                home_ownership: self.ownership,
            },
            loan: LoanInput {
                amount: self.loan_amt,
                interest_rate_pct: self.int_rate,
                percent_of_income: self.percent_income,
                purpose: self.purpose,
                previous_default: self.previous_loan_default,
            },
        }
    }
}

pub(crate) fn run_predict(args: PredictArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let classifier = GradientBoostedModel::load_default()?;
    let application = args.into_application();
    let report = score_application(&classifier, &application)?;
    debug!(verdict = report.verdict.as_str(), "command line prediction scored");

    print!("{}", render_prediction_report(&report));
    Ok(())
}

pub(crate) fn render_prediction_report(report: &PredictionReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Loan approval prediction");
    let _ = writeln!(out, "Decision: {}", report.banner);

    let _ = writeln!(out, "\nApplicant summary");
    for (label, value) in report.applicant.entries() {
        let _ = writeln!(out, "- {label}: {value}");
    }

    let _ = writeln!(out, "\nLoan summary");
    for (label, value) in report.loan.entries() {
        let _ = writeln!(out, "- {label}: {value}");
    }

    let _ = writeln!(out, "\nCredit analysis");
    let _ = writeln!(out, "- {}", report.credit.message);

    let _ = writeln!(out, "\n{} ({})", report.chart.title, report.chart.x_label);
    for bar in &report.chart.bars {
        let _ = writeln!(out, "- {}: {:.2}", bar.label, bar.value);
    }

    let _ = writeln!(out, "\nSuggestion: {}", report.suggestion);
    out
}
