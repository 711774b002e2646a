//! Core data models for the finance planner

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::FinanceError;
use crate::Result;

//
// ================= Enums =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RiskTakingAbility {
    Low,
    Moderate,
    High,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum InvestmentHorizon {
    Short,
    Medium,
    Long,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
    Investment,
}

//
// ================= User Profile =================
//

/// A user's financial profile as submitted by the client.
///
/// Field aliases accept the camelCase spellings used by the frontend forms.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub occupation: String,
    #[serde(alias = "maritalStatus")]
    pub marital_status: String,
    #[serde(alias = "numberOfDependents")]
    pub number_of_dependents: u32,
    #[serde(alias = "annualIncome")]
    pub annual_income: u64,
    #[serde(alias = "monthlyIncome")]
    pub monthly_income: u64,
    #[serde(alias = "monthlyExpenses")]
    pub monthly_expenses: u64,
    #[serde(alias = "currentNetWorth")]
    pub current_net_worth: u64,
    #[serde(alias = "investedAsset")]
    pub invested_asset: u64,
    #[serde(alias = "riskTakingAbility")]
    pub risk_taking_ability: RiskTakingAbility,
    #[serde(alias = "preferredInvestmentHorizon")]
    pub preferred_investment_horizon: InvestmentHorizon,
    #[serde(alias = "primaryFinancialGoal")]
    pub primary_financial_goal: String,
    #[serde(alias = "goalTimelineYears")]
    pub goal_timeline_years: u32,
    #[serde(alias = "monthlySurplus")]
    pub monthly_surplus: u64,
    #[serde(alias = "startingPrincipal")]
    pub starting_principal: u64,
    #[serde(alias = "liquidityPreference")]
    pub liquidity_preference: String,
    pub loan: u64,
    pub insurance: u64,
}

impl UserProfile {
    /// Check invariants serde cannot express. Monetary fields are already
    /// non-negative by type.
    pub fn validate(&self) -> Result<()> {
        if self.age == 0 {
            return Err(FinanceError::Validation("age must be greater than 0".to_string()));
        }
        Ok(())
    }
}

/// A profile as stored: the submitted fields plus identity and timestamps
/// stamped by the API layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfileDocument {
    pub user_id: String,
    #[serde(flatten)]
    pub profile: UserProfile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//
// ================= Finance Record =================
//

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinanceRecord {
    pub user_id: String,
    pub transaction_type: TransactionType,
    pub amount: f64,
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    pub date: DateTime<Utc>,
}

impl FinanceRecord {
    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(FinanceError::Validation(
                "amount must be a non-negative number".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinanceRecordDocument {
    pub id: Uuid,
    #[serde(flatten)]
    pub record: FinanceRecord,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

//
// ================= Prediction =================
//

#[derive(Debug, Clone, Deserialize)]
pub struct PredictionRequest {
    pub user_profile: UserProfile,
    pub prediction_type: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RetirementPlan {
    pub corpus_needed: i64,
    pub monthly_sip: i64,
    pub years_to_retirement: i64,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct AssetAllocation {
    pub equity: i64,
    pub debt: i64,
    pub gold: i64,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct ExpectedReturns {
    pub annual_return_percent: f64,
    pub risk_adjusted_return: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AllocationPlan {
    pub allocation: AssetAllocation,
    pub expected_returns: ExpectedReturns,
    pub risk_level: String,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RiskAssessment {
    pub risk_score: u32,
    pub risk_category: String,
    pub risk_factors: Vec<String>,
    pub mitigation_strategies: Vec<String>,
}

/// Transient result of one prediction call. Never persisted; owned by the
/// request/response cycle only.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum PredictionResult {
    Retirement(RetirementPlan),
    Allocation(AllocationPlan),
    Risk(RiskAssessment),
}

impl PredictionResult {
    pub fn prediction_type(&self) -> &'static str {
        match self {
            PredictionResult::Retirement(_) => "retirement",
            PredictionResult::Allocation(_) => "investment",
            PredictionResult::Risk(_) => "risk_assessment",
        }
    }
}

impl fmt::Display for RiskTakingAbility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskTakingAbility::Low => "Low",
            RiskTakingAbility::Moderate => "Moderate",
            RiskTakingAbility::High => "High",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for InvestmentHorizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InvestmentHorizon::Short => "Short",
            InvestmentHorizon::Medium => "Medium",
            InvestmentHorizon::Long => "Long",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
            TransactionType::Investment => "investment",
        };
        write!(f, "{}", s)
    }
}

/// A fully-populated profile for tests across the crate.
#[cfg(test)]
pub(crate) fn sample_profile() -> UserProfile {
    UserProfile {
        name: "Asha".to_string(),
        age: 30,
        gender: "female".to_string(),
        occupation: "engineer".to_string(),
        marital_status: "single".to_string(),
        number_of_dependents: 0,
        annual_income: 1_200_000,
        monthly_income: 100_000,
        monthly_expenses: 40_000,
        current_net_worth: 2_000_000,
        invested_asset: 500_000,
        risk_taking_ability: RiskTakingAbility::Moderate,
        preferred_investment_horizon: InvestmentHorizon::Long,
        primary_financial_goal: "retirement".to_string(),
        goal_timeline_years: 30,
        monthly_surplus: 60_000,
        starting_principal: 100_000,
        liquidity_preference: "medium".to_string(),
        loan: 0,
        insurance: 5_000_000,
    }
}
