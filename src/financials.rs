use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::{fmt, str::FromStr};
use strum::EnumIter;

/// Filing cadence. Determines which duration contexts count as a full
/// reporting period (≈365 days for annual, ≈90 for quarterly).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilingType {
    Annual,
    Quarterly,
}

impl fmt::Display for FilingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilingType::Annual => write!(f, "10-K"),
            FilingType::Quarterly => write!(f, "10-Q"),
        }
    }
}

impl FromStr for FilingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "10-K" | "20-F" | "ANNUAL" => Ok(FilingType::Annual),
            "10-Q" | "QUARTERLY" => Ok(FilingType::Quarterly),
            other => Err(format!("Unknown filing type: {}", other)),
        }
    }
}

impl FilingType {
    /// Expected period length in days, with tolerance.
    pub fn expected_duration(&self) -> (i64, i64) {
        match self {
            FilingType::Annual => (365, 30),
            FilingType::Quarterly => (90, 15),
        }
    }
}

/// The fixed set of financial-statement line items this core extracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum CanonicalField {
    Revenue,
    CostOfRevenue,
    GrossProfit,
    OperatingExpenses,
    SgaExpense,
    ResearchDevelopment,
    DepreciationAmortization,
    OperatingIncome,
    InterestExpense,
    IncomeTaxExpense,
    NetIncome,
    TotalAssets,
    TotalCurrentAssets,
    AccountsReceivable,
    Inventory,
    PropertyPlantEquipment,
    TotalLiabilities,
    TotalCurrentLiabilities,
    AccountsPayable,
    ShortTermDebt,
    LongTermDebt,
    TotalDebt,
    TotalEquity,
    RetainedEarnings,
    CashAndEquivalents,
    SharesOutstandingBasic,
    SharesOutstandingDiluted,
    CapitalExpenditures,
    OperatingCashFlow,
    FreeCashFlow,
    PriorYearRevenue,
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CanonicalField::Revenue => write!(f, "revenue"),
            CanonicalField::CostOfRevenue => write!(f, "costOfRevenue"),
            CanonicalField::GrossProfit => write!(f, "grossProfit"),
            CanonicalField::OperatingExpenses => write!(f, "operatingExpenses"),
            CanonicalField::SgaExpense => write!(f, "sgaExpense"),
            CanonicalField::ResearchDevelopment => write!(f, "researchDevelopment"),
            CanonicalField::DepreciationAmortization => write!(f, "depreciationAmortization"),
            CanonicalField::OperatingIncome => write!(f, "operatingIncome"),
            CanonicalField::InterestExpense => write!(f, "interestExpense"),
            CanonicalField::IncomeTaxExpense => write!(f, "incomeTaxExpense"),
            CanonicalField::NetIncome => write!(f, "netIncome"),
            CanonicalField::TotalAssets => write!(f, "totalAssets"),
            CanonicalField::TotalCurrentAssets => write!(f, "totalCurrentAssets"),
            CanonicalField::AccountsReceivable => write!(f, "accountsReceivable"),
            CanonicalField::Inventory => write!(f, "inventory"),
            CanonicalField::PropertyPlantEquipment => write!(f, "propertyPlantEquipment"),
            CanonicalField::TotalLiabilities => write!(f, "totalLiabilities"),
            CanonicalField::TotalCurrentLiabilities => write!(f, "totalCurrentLiabilities"),
            CanonicalField::AccountsPayable => write!(f, "accountsPayable"),
            CanonicalField::ShortTermDebt => write!(f, "shortTermDebt"),
            CanonicalField::LongTermDebt => write!(f, "longTermDebt"),
            CanonicalField::TotalDebt => write!(f, "totalDebt"),
            CanonicalField::TotalEquity => write!(f, "totalEquity"),
            CanonicalField::RetainedEarnings => write!(f, "retainedEarnings"),
            CanonicalField::CashAndEquivalents => write!(f, "cashAndEquivalents"),
            CanonicalField::SharesOutstandingBasic => write!(f, "sharesOutstandingBasic"),
            CanonicalField::SharesOutstandingDiluted => write!(f, "sharesOutstandingDiluted"),
            CanonicalField::CapitalExpenditures => write!(f, "capitalExpenditures"),
            CanonicalField::OperatingCashFlow => write!(f, "operatingCashFlow"),
            CanonicalField::FreeCashFlow => write!(f, "freeCashFlow"),
            CanonicalField::PriorYearRevenue => write!(f, "priorYearRevenue"),
        }
    }
}

impl CanonicalField {
    /// Which statement the field belongs to, hence which resolved context its
    /// facts are read from.
    pub fn statement(&self) -> Statement {
        use CanonicalField::*;
        match self {
            Revenue | CostOfRevenue | GrossProfit | OperatingExpenses | SgaExpense
            | ResearchDevelopment | DepreciationAmortization | OperatingIncome
            | InterestExpense | IncomeTaxExpense | NetIncome | CapitalExpenditures
            | OperatingCashFlow | FreeCashFlow | SharesOutstandingBasic
            | SharesOutstandingDiluted => Statement::Duration,
            TotalAssets | TotalCurrentAssets | AccountsReceivable | Inventory
            | PropertyPlantEquipment | TotalLiabilities | TotalCurrentLiabilities
            | AccountsPayable | ShortTermDebt | LongTermDebt | TotalDebt | TotalEquity
            | RetainedEarnings | CashAndEquivalents => Statement::Instant,
            PriorYearRevenue => Statement::PriorDuration,
        }
    }

    /// Fields whose absence most degrades a downstream valuation.
    pub const CRITICAL: [CanonicalField; 5] = [
        CanonicalField::Revenue,
        CanonicalField::NetIncome,
        CanonicalField::TotalAssets,
        CanonicalField::TotalLiabilities,
        CanonicalField::TotalEquity,
    ];
}

/// Context a field's facts are scanned from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statement {
    /// Current reporting period (income statement, cash flow).
    Duration,
    /// Balance-sheet date.
    Instant,
    /// Prior comparable period (year-over-year fields).
    PriorDuration,
}

/// Which source supplied a field's final value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Xbrl,
    Ai,
    Derived,
}

/// Source tag for the whole record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordSource {
    Xbrl,
    Ai,
    Hybrid,
}

/// The canonical financial record, built up incrementally. `None` means the
/// field was never populated; a reported zero stays `Some(0.0)` so the two
/// cases are distinguishable downstream.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Financials {
    pub revenue: Option<f64>,
    pub cost_of_revenue: Option<f64>,
    pub gross_profit: Option<f64>,
    pub operating_expenses: Option<f64>,
    pub sga_expense: Option<f64>,
    pub research_development: Option<f64>,
    pub depreciation_amortization: Option<f64>,
    pub operating_income: Option<f64>,
    pub interest_expense: Option<f64>,
    pub income_tax_expense: Option<f64>,
    pub net_income: Option<f64>,
    pub total_assets: Option<f64>,
    pub total_current_assets: Option<f64>,
    pub accounts_receivable: Option<f64>,
    pub inventory: Option<f64>,
    pub property_plant_equipment: Option<f64>,
    pub total_liabilities: Option<f64>,
    pub total_current_liabilities: Option<f64>,
    pub accounts_payable: Option<f64>,
    pub short_term_debt: Option<f64>,
    pub long_term_debt: Option<f64>,
    pub total_debt: Option<f64>,
    pub total_equity: Option<f64>,
    pub retained_earnings: Option<f64>,
    pub cash_and_equivalents: Option<f64>,
    pub shares_outstanding_basic: Option<f64>,
    pub shares_outstanding_diluted: Option<f64>,
    pub capital_expenditures: Option<f64>,
    pub operating_cash_flow: Option<f64>,
    pub free_cash_flow: Option<f64>,
    pub prior_year_revenue: Option<f64>,
    pub company_name: Option<String>,
    pub ticker: Option<String>,
    pub fiscal_year: Option<String>,
    pub fiscal_period: Option<String>,
}

impl Financials {
    pub fn get(&self, field: CanonicalField) -> Option<f64> {
        use CanonicalField::*;
        match field {
            Revenue => self.revenue,
            CostOfRevenue => self.cost_of_revenue,
            GrossProfit => self.gross_profit,
            OperatingExpenses => self.operating_expenses,
            SgaExpense => self.sga_expense,
            ResearchDevelopment => self.research_development,
            DepreciationAmortization => self.depreciation_amortization,
            OperatingIncome => self.operating_income,
            InterestExpense => self.interest_expense,
            IncomeTaxExpense => self.income_tax_expense,
            NetIncome => self.net_income,
            TotalAssets => self.total_assets,
            TotalCurrentAssets => self.total_current_assets,
            AccountsReceivable => self.accounts_receivable,
            Inventory => self.inventory,
            PropertyPlantEquipment => self.property_plant_equipment,
            TotalLiabilities => self.total_liabilities,
            TotalCurrentLiabilities => self.total_current_liabilities,
            AccountsPayable => self.accounts_payable,
            ShortTermDebt => self.short_term_debt,
            LongTermDebt => self.long_term_debt,
            TotalDebt => self.total_debt,
            TotalEquity => self.total_equity,
            RetainedEarnings => self.retained_earnings,
            CashAndEquivalents => self.cash_and_equivalents,
            SharesOutstandingBasic => self.shares_outstanding_basic,
            SharesOutstandingDiluted => self.shares_outstanding_diluted,
            CapitalExpenditures => self.capital_expenditures,
            OperatingCashFlow => self.operating_cash_flow,
            FreeCashFlow => self.free_cash_flow,
            PriorYearRevenue => self.prior_year_revenue,
        }
    }

    pub fn set(&mut self, field: CanonicalField, value: f64) {
        use CanonicalField::*;
        let slot = match field {
            Revenue => &mut self.revenue,
            CostOfRevenue => &mut self.cost_of_revenue,
            GrossProfit => &mut self.gross_profit,
            OperatingExpenses => &mut self.operating_expenses,
            SgaExpense => &mut self.sga_expense,
            ResearchDevelopment => &mut self.research_development,
            DepreciationAmortization => &mut self.depreciation_amortization,
            OperatingIncome => &mut self.operating_income,
            InterestExpense => &mut self.interest_expense,
            IncomeTaxExpense => &mut self.income_tax_expense,
            NetIncome => &mut self.net_income,
            TotalAssets => &mut self.total_assets,
            TotalCurrentAssets => &mut self.total_current_assets,
            AccountsReceivable => &mut self.accounts_receivable,
            Inventory => &mut self.inventory,
            PropertyPlantEquipment => &mut self.property_plant_equipment,
            TotalLiabilities => &mut self.total_liabilities,
            TotalCurrentLiabilities => &mut self.total_current_liabilities,
            AccountsPayable => &mut self.accounts_payable,
            ShortTermDebt => &mut self.short_term_debt,
            LongTermDebt => &mut self.long_term_debt,
            TotalDebt => &mut self.total_debt,
            TotalEquity => &mut self.total_equity,
            RetainedEarnings => &mut self.retained_earnings,
            CashAndEquivalents => &mut self.cash_and_equivalents,
            SharesOutstandingBasic => &mut self.shares_outstanding_basic,
            SharesOutstandingDiluted => &mut self.shares_outstanding_diluted,
            CapitalExpenditures => &mut self.capital_expenditures,
            OperatingCashFlow => &mut self.operating_cash_flow,
            FreeCashFlow => &mut self.free_cash_flow,
            PriorYearRevenue => &mut self.prior_year_revenue,
        };
        *slot = Some(value);
    }

    pub fn is_set(&self, field: CanonicalField) -> bool {
        self.get(field).is_some()
    }
}

/// Output of the Concept Mapper: a partial record plus coverage bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingResult {
    pub financials: Financials,
    pub fields_found: Vec<CanonicalField>,
    pub fields_missing: Vec<CanonicalField>,
    pub provenance: HashMap<CanonicalField, Provenance>,
    /// Coverage confidence in [0,1].
    pub confidence: f64,
    pub current_context: Option<String>,
    pub instant_context: Option<String>,
    pub prior_context: Option<String>,
    /// Malformed context/fact blocks skipped during parsing.
    pub parse_errors: usize,
}

/// Per-field confidence in [0,1], plus the record-level aggregate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldConfidence {
    pub fields: HashMap<CanonicalField, f64>,
    pub overall: f64,
}

impl FieldConfidence {
    pub fn get(&self, field: CanonicalField) -> f64 {
        self.fields.get(&field).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, field: CanonicalField, value: f64) {
        self.fields.insert(field, value.clamp(0.0, 1.0));
    }
}

/// The final validated record handed to downstream consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergedRecord {
    pub financials: Financials,
    pub confidence: FieldConfidence,
    pub provenance: HashMap<CanonicalField, Provenance>,
    pub source: RecordSource,
    pub warnings: Vec<String>,
    pub scale_findings: Vec<crate::validation::scale::ScaleFinding>,
}
