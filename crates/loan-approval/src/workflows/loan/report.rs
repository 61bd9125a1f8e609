//! Derived presentation data for a scored application.

use serde::Serialize;

use super::classifier::ApprovalLabel;
use super::domain::LoanApplication;
use super::encoding::Categorical;

pub const APPROVED_SUGGESTION: &str = "Your profile looks strong for this loan request.";
pub const REJECTED_SUGGESTION: &str =
    "Consider reducing the loan amount or improving your credit score to increase approval chances.";

const CHART_WIDTH: u32 = 480;
const CHART_LEFT_MARGIN: u32 = 120;
const CHART_RIGHT_MARGIN: u32 = 24;
const CHART_TOP_MARGIN: u32 = 40;
const CHART_BAR_HEIGHT: u32 = 26;
const CHART_BAR_GAP: u32 = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Approved,
    Rejected,
}

impl Verdict {
    pub fn from_label(label: ApprovalLabel) -> Self {
        match label {
            ApprovalLabel::Approved => Verdict::Approved,
            ApprovalLabel::Rejected => Verdict::Rejected,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Approved => "Approved",
            Verdict::Rejected => "Rejected",
        }
    }

    pub fn banner(self) -> &'static str {
        match self {
            Verdict::Approved => "Loan Approved",
            Verdict::Rejected => "Loan Rejected",
        }
    }

    /// Advice depends on the verdict alone, never on feature magnitudes.
    pub fn suggestion(self) -> &'static str {
        match self {
            Verdict::Approved => APPROVED_SUGGESTION,
            Verdict::Rejected => REJECTED_SUGGESTION,
        }
    }
}

/// Qualitative credit bucket; each lower bound is inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditLevel {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl CreditLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 750.0 {
            CreditLevel::Excellent
        } else if score >= 700.0 {
            CreditLevel::Good
        } else if score >= 650.0 {
            CreditLevel::Fair
        } else {
            CreditLevel::Poor
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CreditLevel::Poor => "Poor",
            CreditLevel::Fair => "Fair",
            CreditLevel::Good => "Good",
            CreditLevel::Excellent => "Excellent",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreditAnalysis {
    pub score: f64,
    pub level: CreditLevel,
    pub message: String,
}

impl CreditAnalysis {
    pub fn new(score: f64) -> Self {
        let level = CreditLevel::from_score(score);
        Self {
            score,
            level,
            message: format!(
                "Your credit score of {} is considered {}.",
                display_number(score),
                level.label()
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicantSummary {
    pub gender: String,
    pub education: String,
    pub home_ownership: String,
    pub credit_score: String,
    pub experience: String,
    pub credit_history: String,
    pub previous_defaults: String,
}

impl ApplicantSummary {
    pub fn entries(&self) -> [(&'static str, &str); 7] {
        [
            ("Gender", self.gender.as_str()),
            ("Education", self.education.as_str()),
            ("Home Ownership", self.home_ownership.as_str()),
            ("Credit Score", self.credit_score.as_str()),
            ("Experience", self.experience.as_str()),
            ("Credit History", self.credit_history.as_str()),
            ("Previous Defaults", self.previous_defaults.as_str()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoanSummary {
    pub loan_amount: String,
    pub income: String,
    pub interest_rate: String,
    pub percent_of_income: String,
    pub purpose: String,
}

impl LoanSummary {
    pub fn entries(&self) -> [(&'static str, &str); 5] {
        [
            ("Loan Amount", self.loan_amount.as_str()),
            ("Income", self.income.as_str()),
            ("Interest Rate", self.interest_rate.as_str()),
            ("Loan % of Income", self.percent_of_income.as_str()),
            ("Purpose", self.purpose.as_str()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartBar {
    pub label: &'static str,
    pub value: f64,
    pub color: &'static str,
}

/// Horizontal two-bar comparison of the requested amount against income.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanIncomeChart {
    pub title: &'static str,
    pub x_label: &'static str,
    pub bars: [ChartBar; 2],
}

impl LoanIncomeChart {
    pub fn new(loan_amount: f64, income: f64) -> Self {
        Self {
            title: "Loan vs Income Comparison",
            x_label: "Amount (Rs)",
            bars: [
                ChartBar {
                    label: "Loan Amount",
                    value: loan_amount,
                    color: "orange",
                },
                ChartBar {
                    label: "Monthly Income",
                    value: income,
                    color: "green",
                },
            ],
        }
    }

    /// Bar lengths are scaled to the drawing width; labels show raw values.
    pub fn to_svg(&self) -> String {
        let row_height = CHART_BAR_HEIGHT + CHART_BAR_GAP;
        let axis_y = CHART_TOP_MARGIN + row_height * self.bars.len() as u32;
        let height = axis_y + 40;
        let available = f64::from(CHART_WIDTH - CHART_LEFT_MARGIN - CHART_RIGHT_MARGIN);
        let max_value = self
            .bars
            .iter()
            .map(|bar| bar.value)
            .fold(0.0_f64, f64::max);

        let mut svg = String::new();
        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{CHART_WIDTH}\" height=\"{height}\" viewBox=\"0 0 {CHART_WIDTH} {height}\" role=\"img\">"
        ));
        svg.push_str(&format!(
            "<text x=\"{}\" y=\"22\" text-anchor=\"middle\" font-size=\"14\">{}</text>",
            CHART_WIDTH / 2,
            self.title
        ));

        for (index, bar) in self.bars.iter().enumerate() {
            let y = CHART_TOP_MARGIN + row_height * index as u32;
            let width = if max_value > 0.0 {
                (bar.value / max_value * available).round()
            } else {
                0.0
            };
            svg.push_str(&format!(
                "<text x=\"{}\" y=\"{}\" text-anchor=\"end\" font-size=\"12\">{}</text>",
                CHART_LEFT_MARGIN - 8,
                y + CHART_BAR_HEIGHT / 2 + 4,
                bar.label
            ));
            svg.push_str(&format!(
                "<rect x=\"{CHART_LEFT_MARGIN}\" y=\"{y}\" width=\"{width}\" height=\"{CHART_BAR_HEIGHT}\" fill=\"{}\"><title>{}: {}</title></rect>",
                bar.color,
                bar.label,
                format_rupees(bar.value)
            ));
        }

        svg.push_str(&format!(
            "<line x1=\"{CHART_LEFT_MARGIN}\" y1=\"{axis_y}\" x2=\"{}\" y2=\"{axis_y}\" stroke=\"#333\"/>",
            CHART_WIDTH - CHART_RIGHT_MARGIN
        ));
        svg.push_str(&format!(
            "<text x=\"{}\" y=\"{}\" text-anchor=\"middle\" font-size=\"12\">{}</text>",
            CHART_LEFT_MARGIN + (CHART_WIDTH - CHART_LEFT_MARGIN - CHART_RIGHT_MARGIN) / 2,
            axis_y + 28,
            self.x_label
        ));
        svg.push_str("</svg>");
        svg
    }
}

/// Everything the result tab shows for one scored application.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionReport {
    pub label: ApprovalLabel,
    pub verdict: Verdict,
    pub banner: &'static str,
    pub applicant: ApplicantSummary,
    pub loan: LoanSummary,
    pub credit: CreditAnalysis,
    pub chart: LoanIncomeChart,
    pub suggestion: &'static str,
}

impl PredictionReport {
    pub fn build(label: ApprovalLabel, application: &LoanApplication) -> Self {
        let applicant = &application.applicant;
        let loan = &application.loan;
        let verdict = Verdict::from_label(label);

        Self {
            label,
            verdict,
            banner: verdict.banner(),
            applicant: ApplicantSummary {
                gender: applicant.gender.label().to_string(),
                education: applicant.education.label().to_string(),
                home_ownership: applicant.home_ownership.label().to_string(),
                credit_score: display_number(applicant.credit_score),
                experience: format!(
                    "{} years",
                    display_number(applicant.employment_experience_years)
                ),
                credit_history: format!(
                    "{} years",
                    display_number(applicant.credit_history_years)
                ),
                previous_defaults: loan.previous_default.label().to_string(),
            },
            loan: LoanSummary {
                loan_amount: format_rupees(loan.amount),
                income: format_rupees(applicant.income),
                interest_rate: format!("{:.2}%", loan.interest_rate_pct),
                percent_of_income: format!("{:.2}%", loan.percent_of_income),
                purpose: title_case(loan.purpose.label()),
            },
            credit: CreditAnalysis::new(applicant.credit_score),
            chart: LoanIncomeChart::new(loan.amount, applicant.income),
            suggestion: verdict.suggestion(),
        }
    }
}

/// Format with a thousands separator and two decimals, e.g. `₹1,234.50`.
pub fn format_rupees(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}₹{grouped}.{fraction}")
}

/// Whole numbers keep a trailing `.0` so `720` reads as `720.0`.
pub fn display_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// Capitalise the first letter of each alphabetic run, lowercasing the rest.
pub fn title_case(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());
    let mut previous_alpha = false;
    for ch in raw.chars() {
        if ch.is_alphabetic() {
            if previous_alpha {
                result.extend(ch.to_lowercase());
            } else {
                result.extend(ch.to_uppercase());
            }
            previous_alpha = true;
        } else {
            result.push(ch);
            previous_alpha = false;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::loan::domain::LoanPurpose;

    #[test]
    fn credit_levels_respect_inclusive_lower_bounds() {
        let cases = [
            (900.0, CreditLevel::Excellent),
            (750.0, CreditLevel::Excellent),
            (749.0, CreditLevel::Good),
            (700.0, CreditLevel::Good),
            (699.0, CreditLevel::Fair),
            (650.0, CreditLevel::Fair),
            (649.0, CreditLevel::Poor),
            (300.0, CreditLevel::Poor),
        ];
        for (score, expected) in cases {
            assert_eq!(CreditLevel::from_score(score), expected, "score {score}");
        }
        assert_eq!(CreditLevel::from_score(749.99), CreditLevel::Good);
    }

    #[test]
    fn credit_analysis_message_mentions_score_and_level() {
        let analysis = CreditAnalysis::new(720.0);
        assert_eq!(
            analysis.message,
            "Your credit score of 720.0 is considered Good."
        );
    }

    #[test]
    fn verdict_drives_banner_and_suggestion() {
        let approved = Verdict::from_label(ApprovalLabel::Approved);
        assert_eq!(approved.banner(), "Loan Approved");
        assert_eq!(approved.suggestion(), APPROVED_SUGGESTION);

        let rejected = Verdict::from_label(ApprovalLabel::Rejected);
        assert_eq!(rejected.as_str(), "Rejected");
        assert_eq!(rejected.suggestion(), REJECTED_SUGGESTION);
    }

    #[test]
    fn report_formats_loan_summary() {
        let mut application = LoanApplication::default();
        application.applicant.income = 500000.0;
        application.loan.amount = 1234567.891;
        application.loan.interest_rate_pct = 10.5;
        application.loan.percent_of_income = 20.0;
        application.loan.purpose = LoanPurpose::DebtConsolidation;

        let report = PredictionReport::build(ApprovalLabel::Rejected, &application);

        assert_eq!(report.loan.loan_amount, "₹1,234,567.89");
        assert_eq!(report.loan.income, "₹500,000.00");
        assert_eq!(report.loan.interest_rate, "10.50%");
        assert_eq!(report.loan.percent_of_income, "20.00%");
        assert_eq!(report.loan.purpose, "Debtconsolidation");
        assert_eq!(report.applicant.experience, "0.0 years");
        assert_eq!(report.banner, "Loan Rejected");
    }

    #[test]
    fn chart_passes_values_through_unscaled() {
        let chart = LoanIncomeChart::new(100000.0, 500000.0);
        assert_eq!(chart.bars[0].label, "Loan Amount");
        assert_eq!(chart.bars[0].value, 100000.0);
        assert_eq!(chart.bars[1].label, "Monthly Income");
        assert_eq!(chart.bars[1].value, 500000.0);

        let svg = chart.to_svg();
        assert!(svg.starts_with("<svg") && svg.ends_with("</svg>"));
        assert!(svg.contains("width=\"336\""));
        assert!(svg.contains("width=\"67\""));
        assert!(svg.contains("Loan vs Income Comparison"));
        assert!(svg.contains("Amount (Rs)"));
    }

    #[test]
    fn chart_with_zero_values_draws_empty_bars() {
        let svg = LoanIncomeChart::new(0.0, 0.0).to_svg();
        assert_eq!(svg.matches("width=\"0\"").count(), 2);
    }

    #[test]
    fn number_helpers_match_display_conventions() {
        assert_eq!(format_rupees(0.0), "₹0.00");
        assert_eq!(format_rupees(999.999), "₹1,000.00");
        assert_eq!(format_rupees(100.5), "₹100.50");
        assert_eq!(display_number(5.0), "5.0");
        assert_eq!(display_number(10.5), "10.5");
        assert_eq!(title_case("HOMEIMPROVEMENT"), "Homeimprovement");
        assert_eq!(title_case("high school"), "High School");
    }
}
