use crate::financials::CanonicalField;

/// Ordered concept-alias table: taxonomy local names mapped onto canonical
/// fields. Pure data, evaluated top to bottom; entries for a field are listed
/// most-reliable first and the first fact match wins, so ORDER IS LOAD-BEARING.
/// Matching is case-insensitive against the fact's local name.
pub const CONCEPT_ALIASES: &[(&str, CanonicalField)] = &[
    // Revenue. Post-ASC-606 filers tag the contract-revenue concepts, older
    // filings still use Revenues / SalesRevenueNet.
    ("RevenueFromContractWithCustomerExcludingAssessedTax", CanonicalField::Revenue),
    ("RevenueFromContractWithCustomerIncludingAssessedTax", CanonicalField::Revenue),
    ("Revenues", CanonicalField::Revenue),
    ("SalesRevenueNet", CanonicalField::Revenue),
    ("SalesRevenueGoodsNet", CanonicalField::Revenue),
    // Cost of revenue
    ("CostOfRevenue", CanonicalField::CostOfRevenue),
    ("CostOfGoodsAndServicesSold", CanonicalField::CostOfRevenue),
    ("CostOfGoodsSold", CanonicalField::CostOfRevenue),
    ("CostOfServices", CanonicalField::CostOfRevenue),
    ("CostOfSalesExcludingDepreciationDepletionAndAmortization", CanonicalField::CostOfRevenue),
    ("GrossProfit", CanonicalField::GrossProfit),
    ("OperatingExpenses", CanonicalField::OperatingExpenses),
    ("CostsAndExpenses", CanonicalField::OperatingExpenses),
    ("SellingGeneralAndAdministrativeExpense", CanonicalField::SgaExpense),
    ("GeneralAndAdministrativeExpense", CanonicalField::SgaExpense),
    ("SellingAndMarketingExpense", CanonicalField::SgaExpense),
    ("ResearchAndDevelopmentExpense", CanonicalField::ResearchDevelopment),
    ("DepreciationDepletionAndAmortization", CanonicalField::DepreciationAmortization),
    ("DepreciationAndAmortization", CanonicalField::DepreciationAmortization),
    ("DepreciationAmortizationAndAccretionNet", CanonicalField::DepreciationAmortization),
    ("Depreciation", CanonicalField::DepreciationAmortization),
    ("OperatingIncomeLoss", CanonicalField::OperatingIncome),
    ("InterestExpense", CanonicalField::InterestExpense),
    ("InterestExpenseDebt", CanonicalField::InterestExpense),
    ("InterestIncomeExpenseNet", CanonicalField::InterestExpense),
    ("IncomeTaxExpenseBenefit", CanonicalField::IncomeTaxExpense),
    ("NetIncomeLoss", CanonicalField::NetIncome),
    ("ProfitLoss", CanonicalField::NetIncome),
    ("NetIncomeLossAvailableToCommonStockholdersBasic", CanonicalField::NetIncome),
    // Balance sheet
    ("Assets", CanonicalField::TotalAssets),
    ("AssetsCurrent", CanonicalField::TotalCurrentAssets),
    ("AccountsReceivableNetCurrent", CanonicalField::AccountsReceivable),
    ("ReceivablesNetCurrent", CanonicalField::AccountsReceivable),
    ("AccountsNotesAndLoansReceivableNetCurrent", CanonicalField::AccountsReceivable),
    ("InventoryNet", CanonicalField::Inventory),
    ("PropertyPlantAndEquipmentNet", CanonicalField::PropertyPlantEquipment),
    ("PropertyPlantAndEquipmentGross", CanonicalField::PropertyPlantEquipment),
    ("Liabilities", CanonicalField::TotalLiabilities),
    ("LiabilitiesCurrent", CanonicalField::TotalCurrentLiabilities),
    ("AccountsPayableCurrent", CanonicalField::AccountsPayable),
    ("AccountsPayableAndAccruedLiabilitiesCurrent", CanonicalField::AccountsPayable),
    ("LongTermDebtCurrent", CanonicalField::ShortTermDebt),
    ("ShortTermBorrowings", CanonicalField::ShortTermDebt),
    ("DebtCurrent", CanonicalField::ShortTermDebt),
    ("LongTermDebtNoncurrent", CanonicalField::LongTermDebt),
    ("LongTermDebt", CanonicalField::LongTermDebt),
    ("DebtLongtermAndShorttermCombinedAmount", CanonicalField::TotalDebt),
    ("StockholdersEquity", CanonicalField::TotalEquity),
    (
        "StockholdersEquityIncludingPortionAttributableToNoncontrollingInterest",
        CanonicalField::TotalEquity,
    ),
    ("RetainedEarningsAccumulatedDeficit", CanonicalField::RetainedEarnings),
    ("CashAndCashEquivalentsAtCarryingValue", CanonicalField::CashAndEquivalents),
    (
        "CashCashEquivalentsRestrictedCashAndRestrictedCashEquivalents",
        CanonicalField::CashAndEquivalents,
    ),
    // Share counts (weighted-average, reported for the period)
    ("WeightedAverageNumberOfSharesOutstandingBasic", CanonicalField::SharesOutstandingBasic),
    ("WeightedAverageNumberOfSharesIssuedBasic", CanonicalField::SharesOutstandingBasic),
    ("WeightedAverageNumberOfDilutedSharesOutstanding", CanonicalField::SharesOutstandingDiluted),
    // Cash flow
    ("PaymentsToAcquirePropertyPlantAndEquipment", CanonicalField::CapitalExpenditures),
    ("PaymentsToAcquireProductiveAssets", CanonicalField::CapitalExpenditures),
    ("NetCashProvidedByUsedInOperatingActivities", CanonicalField::OperatingCashFlow),
    (
        "NetCashProvidedByUsedInOperatingActivitiesContinuingOperations",
        CanonicalField::OperatingCashFlow,
    ),
    // Year-over-year: the revenue aliases again, read from the prior-period
    // context by the mapper's statement routing.
    ("RevenueFromContractWithCustomerExcludingAssessedTax", CanonicalField::PriorYearRevenue),
    ("RevenueFromContractWithCustomerIncludingAssessedTax", CanonicalField::PriorYearRevenue),
    ("Revenues", CanonicalField::PriorYearRevenue),
    ("SalesRevenueNet", CanonicalField::PriorYearRevenue),
    ("SalesRevenueGoodsNet", CanonicalField::PriorYearRevenue),
];
