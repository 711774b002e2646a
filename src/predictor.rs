//! Financial planning computations
//!
//! Three pure functions over a profile field mapping:
//! - Retirement projection (corpus target + required monthly SIP)
//! - Asset allocation recommendation (equity/debt/gold split)
//! - Financial risk assessment (additive 0-100 score)
//!
//! Deterministic, no I/O, no hidden state. Missing fields fall back to
//! documented defaults, so callers may pass partial mappings.

use serde_json::{Map, Value};

use crate::error::FinanceError;
use crate::models::{
    AllocationPlan, AssetAllocation, ExpectedReturns, PredictionResult, RetirementPlan,
    RiskAssessment, UserProfile,
};
use crate::Result;

/// Fixed annual return assumptions per asset class.
const EQUITY_RETURN: f64 = 0.12;
const DEBT_RETURN: f64 = 0.07;
const GOLD_RETURN: f64 = 0.08;

/// Nominal annual rate assumed for the SIP annuity calculation.
const SIP_ANNUAL_RATE: f64 = 0.12;

/// Nobody retires after 60, regardless of the stated timeline.
const MAX_RETIREMENT_AGE: i64 = 60;

/// =============================
/// Profile Field Mapping
/// =============================

/// Mapping view of profile fields consumed by the prediction functions.
///
/// Tolerates missing keys: every accessor carries the default the formulas
/// assume. Built either from a validated [`UserProfile`] or from a raw JSON
/// object.
#[derive(Debug, Clone)]
pub struct ProfileFields(Map<String, Value>);

impl ProfileFields {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn from_profile(profile: &UserProfile) -> Result<Self> {
        match serde_json::to_value(profile)? {
            Value::Object(map) => Ok(Self(map)),
            other => Err(FinanceError::Validation(format!(
                "profile serialized to non-object JSON: {}",
                other
            ))),
        }
    }

    fn int_or(&self, key: &str, default: i64) -> i64 {
        self.0.get(key).and_then(Value::as_i64).unwrap_or(default)
    }

    fn num_or(&self, key: &str, default: f64) -> f64 {
        self.0.get(key).and_then(Value::as_f64).unwrap_or(default)
    }

    fn str_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.0.get(key).and_then(Value::as_str).unwrap_or(default)
    }
}

/// =============================
/// Dispatch
/// =============================

/// Dispatch a prediction by selector string.
///
/// Accepts exactly "retirement", "investment" and "risk_assessment"; any
/// other selector is an invalid-argument failure, never a silent default.
pub fn predict(profile: &ProfileFields, prediction_type: &str) -> Result<PredictionResult> {
    match prediction_type {
        "retirement" => Ok(PredictionResult::Retirement(project_retirement(profile))),
        "investment" => Ok(PredictionResult::Allocation(recommend_allocation(profile))),
        "risk_assessment" => Ok(PredictionResult::Risk(assess_financial_risk(profile))),
        other => Err(FinanceError::InvalidPredictionType(other.to_string())),
    }
}

/// =============================
/// Retirement Projection
/// =============================

/// Project the retirement corpus target and the monthly SIP that funds it.
pub fn project_retirement(profile: &ProfileFields) -> RetirementPlan {
    let age = profile.int_or("age", 30);
    let annual_income = profile.num_or("annual_income", 500_000.0);
    // Accepted but unused in the formula.
    let _monthly_surplus = profile.num_or("monthly_surplus", 20_000.0);
    let goal_timeline_years = profile.int_or("goal_timeline_years", 30);

    let retirement_age = (age + goal_timeline_years).min(MAX_RETIREMENT_AGE);
    let years_to_retirement = (retirement_age - age).max(0);

    // 25x of post-retirement annual expenses, assumed at 70% of income.
    let annual_expenses = annual_income * 0.7;
    let corpus_needed = annual_expenses * 25.0;

    let monthly_sip = if years_to_retirement > 0 {
        // Future value of annuity at a fixed 12%/year, compounded monthly.
        let r = SIP_ANNUAL_RATE / 12.0;
        let n = (years_to_retirement * 12) as f64;
        corpus_needed / (((1.0 + r).powf(n) - 1.0) / r)
    } else {
        // No horizon left: lump sum.
        corpus_needed
    };

    let recommendations = vec![
        format!(
            "Start investing ₹{} monthly for retirement",
            group_thousands(monthly_sip as i64)
        ),
        "Consider increasing SIP by 10% annually".to_string(),
        "Diversify across equity and debt instruments".to_string(),
        "Review and rebalance portfolio annually".to_string(),
    ];

    RetirementPlan {
        corpus_needed: corpus_needed as i64,
        monthly_sip: monthly_sip as i64,
        years_to_retirement,
        recommendations,
    }
}

/// =============================
/// Asset Allocation
/// =============================

/// Recommend an equity/debt/gold split from age and risk tier.
pub fn recommend_allocation(profile: &ProfileFields) -> AllocationPlan {
    let age = profile.int_or("age", 30);
    let risk_ability = profile.str_or("risk_taking_ability", "Moderate").to_string();
    // Accepted but not consulted by the branch logic.
    let _horizon = profile.str_or("preferred_investment_horizon", "Medium");

    let (equity, debt, gold): (i64, i64, i64) = if risk_ability == "High" && age < 35 {
        (80, 15, 5)
    } else if risk_ability == "Moderate" {
        // Age-based split; intentionally unclamped before normalization.
        (100 - age, age - 10, 10)
    } else {
        // Low risk, and High risk at 35+.
        ((60 - age).max(30), (40 + age).min(60), 10)
    };

    // Scale to exactly 100: truncate equity and debt, gold absorbs the
    // rounding remainder.
    let total = (equity + debt + gold) as f64;
    let equity_percent = ((equity as f64 / total) * 100.0) as i64;
    let debt_percent = ((debt as f64 / total) * 100.0) as i64;
    let gold_percent = 100 - equity_percent - debt_percent;

    let expected_annual_return = (equity_percent as f64 * EQUITY_RETURN
        + debt_percent as f64 * DEBT_RETURN
        + gold_percent as f64 * GOLD_RETURN)
        / 100.0;

    let recommendations = vec![
        format!("Allocate {}% to equity for growth", equity_percent),
        format!("Keep {}% in debt for stability", debt_percent),
        format!("Maintain {}% in gold for inflation hedge", gold_percent),
        "Rebalance portfolio quarterly".to_string(),
        "Consider tax-saving instruments".to_string(),
    ];

    AllocationPlan {
        allocation: AssetAllocation {
            equity: equity_percent,
            debt: debt_percent,
            gold: gold_percent,
        },
        expected_returns: ExpectedReturns {
            annual_return_percent: round2(expected_annual_return * 100.0),
            risk_adjusted_return: round2(expected_annual_return * 0.9 * 100.0),
        },
        risk_level: risk_ability,
        recommendations,
    }
}

/// =============================
/// Risk Assessment
/// =============================

/// Score financial risk on [0, 100] from income, debt and coverage ratios.
pub fn assess_financial_risk(profile: &ProfileFields) -> RiskAssessment {
    let monthly_income = profile.num_or("monthly_income", 50_000.0);
    let monthly_expenses = profile.num_or("monthly_expenses", 30_000.0);
    let loan = profile.num_or("loan", 0.0);
    let dependents = profile.int_or("number_of_dependents", 0);
    let insurance = profile.num_or("insurance", 0.0);

    // Zero income is maximally risky on the expense axis only.
    let (expense_ratio, debt_to_income, insurance_coverage) = if monthly_income > 0.0 {
        (
            monthly_expenses / monthly_income,
            (loan / 12.0) / monthly_income,
            insurance / (monthly_income * 12.0),
        )
    } else {
        (1.0, 0.0, 0.0)
    };

    let mut risk_score: u32 = 0;
    let mut risk_factors = Vec::new();

    if expense_ratio > 0.8 {
        risk_score += 30;
        risk_factors.push("High expense-to-income ratio".to_string());
    }

    if debt_to_income > 0.4 {
        risk_score += 25;
        risk_factors.push("High debt burden".to_string());
    }

    // Less than 5x annual income.
    if insurance_coverage < 5.0 {
        risk_score += 20;
        risk_factors.push("Insufficient insurance coverage".to_string());
    }

    if dependents > 2 {
        risk_score += 15;
        risk_factors.push("Multiple dependents".to_string());
    }

    if monthly_income - monthly_expenses < 10_000.0 {
        risk_score += 10;
        risk_factors.push("Low savings capacity".to_string());
    }

    let risk_score = risk_score.min(100);

    let risk_category = if risk_score < 20 {
        "Low Risk"
    } else if risk_score < 50 {
        "Moderate Risk"
    } else {
        "High Risk"
    };

    // Fixed list, not tailored to the triggered factors.
    let mitigation_strategies = vec![
        "Build emergency fund of 6-12 months expenses".to_string(),
        "Increase insurance coverage to 10x annual income".to_string(),
        "Reduce unnecessary expenses".to_string(),
        "Consider additional income sources".to_string(),
        "Pay down high-interest debt first".to_string(),
    ];

    RiskAssessment {
        risk_score,
        risk_category: risk_category.to_string(),
        risk_factors,
        mitigation_strategies,
    }
}

/// =============================
/// Helpers
/// =============================

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Format an integer with comma thousand separators, e.g. 6008 → "6,008".
fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    if value < 0 {
        format!("-{}", out)
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> ProfileFields {
        match value {
            Value::Object(map) => ProfileFields::new(map),
            _ => panic!("expected JSON object"),
        }
    }

    #[test]
    fn test_retirement_worked_scenario() {
        let profile = fields(json!({
            "age": 30,
            "annual_income": 1_200_000,
            "goal_timeline_years": 30
        }));

        let plan = project_retirement(&profile);

        assert_eq!(plan.years_to_retirement, 30);
        assert_eq!(plan.corpus_needed, 21_000_000);

        // Annuity factor at 1% monthly over 360 months.
        let r: f64 = 0.01;
        let factor = ((1.0 + r).powf(360.0) - 1.0) / r;
        let expected_sip = 21_000_000.0 / factor;
        assert!((plan.monthly_sip as f64 - expected_sip).abs() < 1.0);

        assert_eq!(plan.recommendations.len(), 4);
        assert!(plan.recommendations[0].contains("monthly for retirement"));
    }

    #[test]
    fn test_retirement_zero_horizon_is_lump_sum() {
        let profile = fields(json!({
            "age": 60,
            "annual_income": 1_000_000,
            "goal_timeline_years": 10
        }));

        let plan = project_retirement(&profile);

        assert_eq!(plan.years_to_retirement, 0);
        // No horizon left: SIP equals the full corpus.
        assert_eq!(plan.monthly_sip, plan.corpus_needed);
    }

    #[test]
    fn test_retirement_bounds_for_adult_ages() {
        for age in 30..=80 {
            for timeline in 0..=50 {
                let profile = fields(json!({
                    "age": age,
                    "goal_timeline_years": timeline
                }));
                let plan = project_retirement(&profile);

                assert!(
                    (0..=30).contains(&plan.years_to_retirement),
                    "age={} timeline={} => years={}",
                    age,
                    timeline,
                    plan.years_to_retirement
                );
                assert!(
                    age as i64 + plan.years_to_retirement <= 60
                        || plan.years_to_retirement == 0
                );
            }
        }
    }

    #[test]
    fn test_retirement_defaults_for_empty_mapping() {
        let plan = project_retirement(&fields(json!({})));

        // age=30, annual_income=500000, timeline=30.
        assert_eq!(plan.years_to_retirement, 30);
        assert_eq!(plan.corpus_needed, 8_750_000);
    }

    #[test]
    fn test_allocation_moderate_scenario() {
        let profile = fields(json!({
            "age": 30,
            "risk_taking_ability": "Moderate"
        }));

        let plan = recommend_allocation(&profile);

        assert_eq!(plan.allocation.equity, 70);
        assert_eq!(plan.allocation.debt, 20);
        assert_eq!(plan.allocation.gold, 10);
        assert_eq!(plan.expected_returns.annual_return_percent, 10.6);
        assert_eq!(plan.expected_returns.risk_adjusted_return, 9.54);
        assert_eq!(plan.risk_level, "Moderate");
        assert_eq!(plan.recommendations.len(), 5);
    }

    #[test]
    fn test_allocation_high_risk_young() {
        let profile = fields(json!({
            "age": 28,
            "risk_taking_ability": "High"
        }));

        let plan = recommend_allocation(&profile);
        assert_eq!(plan.allocation.equity, 80);
        assert_eq!(plan.allocation.debt, 15);
        assert_eq!(plan.allocation.gold, 5);
    }

    #[test]
    fn test_allocation_high_risk_older_falls_to_conservative_branch() {
        let profile = fields(json!({
            "age": 40,
            "risk_taking_ability": "High"
        }));

        let plan = recommend_allocation(&profile);
        // max(30, 60-40)=30, min(60, 40+40)=60, gold=10.
        assert_eq!(plan.allocation.equity, 30);
        assert_eq!(plan.allocation.debt, 60);
        assert_eq!(plan.allocation.gold, 10);
    }

    #[test]
    fn test_allocation_always_sums_to_100() {
        for age in 0..=100 {
            for risk in ["Low", "Moderate", "High"] {
                let profile = fields(json!({
                    "age": age,
                    "risk_taking_ability": risk
                }));
                let plan = recommend_allocation(&profile);
                let sum = plan.allocation.equity + plan.allocation.debt + plan.allocation.gold;
                assert_eq!(sum, 100, "age={} risk={} => {:?}", age, risk, plan.allocation);
            }
        }
    }

    #[test]
    fn test_risk_worked_scenario_scores_75() {
        let profile = fields(json!({
            "monthly_income": 50_000,
            "monthly_expenses": 45_000,
            "loan": 240_000,
            "number_of_dependents": 3,
            "insurance": 0
        }));

        let assessment = assess_financial_risk(&profile);

        // +30 expense ratio, +20 insurance, +15 dependents, +10 surplus;
        // debt_to_income is exactly 0.4 and does not trigger.
        assert_eq!(assessment.risk_score, 75);
        assert_eq!(assessment.risk_category, "High Risk");
        assert_eq!(assessment.risk_factors.len(), 4);
        assert!(!assessment
            .risk_factors
            .contains(&"High debt burden".to_string()));
        assert_eq!(assessment.mitigation_strategies.len(), 5);
    }

    #[test]
    fn test_risk_score_is_clamped_to_100() {
        let profile = fields(json!({
            "monthly_income": 10_000,
            "monthly_expenses": 9_900,
            "loan": 1_000_000,
            "number_of_dependents": 5,
            "insurance": 0
        }));

        let assessment = assess_financial_risk(&profile);
        assert!(assessment.risk_score <= 100);
        assert_eq!(assessment.risk_factors.len(), 5);
        assert_eq!(assessment.risk_score, 100);
    }

    #[test]
    fn test_risk_zero_income_guard() {
        let profile = fields(json!({
            "monthly_income": 0,
            "monthly_expenses": 30_000,
            "loan": 500_000,
            "insurance": 0
        }));

        let assessment = assess_financial_risk(&profile);

        // expense_ratio=1 (+30), debt_to_income=0, coverage=0 (+20),
        // surplus negative (+10). No division by zero.
        assert_eq!(assessment.risk_score, 60);
        assert_eq!(assessment.risk_category, "High Risk");
    }

    #[test]
    fn test_risk_defaults() {
        let assessment = assess_financial_risk(&fields(json!({})));

        // income=50000, expenses=30000: only the insurance factor triggers.
        assert_eq!(assessment.risk_score, 20);
        assert_eq!(assessment.risk_category, "Moderate Risk");
    }

    #[test]
    fn test_predict_dispatch() {
        let profile = fields(json!({ "age": 30 }));

        assert!(matches!(
            predict(&profile, "retirement").unwrap(),
            PredictionResult::Retirement(_)
        ));
        assert!(matches!(
            predict(&profile, "investment").unwrap(),
            PredictionResult::Allocation(_)
        ));
        assert!(matches!(
            predict(&profile, "risk_assessment").unwrap(),
            PredictionResult::Risk(_)
        ));
    }

    #[test]
    fn test_predict_unknown_type_fails() {
        let profile = fields(json!({}));
        let err = predict(&profile, "astrology").unwrap_err();
        assert!(matches!(err, FinanceError::InvalidPredictionType(_)));
        assert!(err.to_string().contains("astrology"));
    }

    #[test]
    fn test_predictions_are_idempotent() {
        let profile = ProfileFields::from_profile(&crate::models::sample_profile()).unwrap();

        assert_eq!(project_retirement(&profile), project_retirement(&profile));
        assert_eq!(recommend_allocation(&profile), recommend_allocation(&profile));
        assert_eq!(
            assess_financial_risk(&profile),
            assess_financial_risk(&profile)
        );
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(6_008), "6,008");
        assert_eq!(group_thousands(21_000_000), "21,000,000");
        assert_eq!(group_thousands(-1_234), "-1,234");
    }
}
