use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::metrics::{compute_metrics, per_month};
use crate::property::PropertyInput;
use crate::time_value::ratio_pct;
use crate::types::{Money, Rate};

/// Totals and averages across a set of properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioStatistics {
    pub total_acquisition_cost: Money,
    pub total_equity: Money,
    pub total_debt: Money,
    pub total_annual_rent: Money,
    pub total_cash_flow: Money,
    pub total_after_tax_cash_flow: Money,
    pub total_monthly_cash_flow: Money,
    pub total_monthly_after_tax_cash_flow: Money,
    /// Arithmetic means of the per-property figures
    pub average_gross_yield: Rate,
    pub average_net_yield: Rate,
    pub average_equity_yield: Rate,
    pub average_after_tax_equity_yield: Rate,
    pub average_dscr: Decimal,
    /// Total cash flow / total equity, percent
    pub portfolio_yield: Rate,
    /// Total after-tax cash flow / total equity, percent
    pub portfolio_after_tax_yield: Rate,
    /// Total equity / total acquisition cost, percent
    pub equity_ratio: Rate,
    pub property_count: usize,
}

/// Aggregate metrics over `properties`. Empty input gives all zeros.
pub fn aggregate_portfolio(properties: &[PropertyInput]) -> PortfolioStatistics {
    if properties.is_empty() {
        return PortfolioStatistics::default();
    }

    let mut stats = PortfolioStatistics {
        property_count: properties.len(),
        ..Default::default()
    };
    let mut sum_gross_yield = Decimal::ZERO;
    let mut sum_net_yield = Decimal::ZERO;
    let mut sum_equity_yield = Decimal::ZERO;
    let mut sum_after_tax_equity_yield = Decimal::ZERO;
    let mut sum_dscr = Decimal::ZERO;

    for property in properties {
        let m = compute_metrics(property);

        stats.total_acquisition_cost =
            stats.total_acquisition_cost.saturating_add(m.acquisition_cost);
        stats.total_equity = stats.total_equity.saturating_add(m.equity);
        stats.total_debt = stats.total_debt.saturating_add(m.debt_capital);
        stats.total_annual_rent = stats.total_annual_rent.saturating_add(m.annual_gross_rent);
        stats.total_cash_flow = stats.total_cash_flow.saturating_add(m.cash_flow);
        stats.total_after_tax_cash_flow =
            stats.total_after_tax_cash_flow.saturating_add(m.after_tax_cash_flow);

        sum_gross_yield = sum_gross_yield.saturating_add(m.gross_yield);
        sum_net_yield = sum_net_yield.saturating_add(m.net_yield);
        sum_equity_yield = sum_equity_yield.saturating_add(m.equity_yield);
        sum_after_tax_equity_yield =
            sum_after_tax_equity_yield.saturating_add(m.after_tax_equity_yield);
        sum_dscr = sum_dscr.saturating_add(m.dscr);
    }

    let count = Decimal::from(properties.len());
    stats.total_monthly_cash_flow = per_month(stats.total_cash_flow);
    stats.total_monthly_after_tax_cash_flow = per_month(stats.total_after_tax_cash_flow);
    stats.average_gross_yield = sum_gross_yield / count;
    stats.average_net_yield = sum_net_yield / count;
    stats.average_equity_yield = sum_equity_yield / count;
    stats.average_after_tax_equity_yield = sum_after_tax_equity_yield / count;
    stats.average_dscr = sum_dscr / count;
    stats.portfolio_yield = ratio_pct(stats.total_cash_flow, stats.total_equity);
    stats.portfolio_after_tax_yield = ratio_pct(stats.total_after_tax_cash_flow, stats.total_equity);
    stats.equity_ratio = ratio_pct(stats.total_equity, stats.total_acquisition_cost);

    debug!(
        "aggregated {} properties: cash flow {}, equity {}",
        stats.property_count, stats.total_cash_flow, stats.total_equity
    );

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::FinancialField;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn simple(price: Decimal, equity: Decimal, rent: Decimal) -> PropertyInput {
        let mut p = PropertyInput::new("simple");
        p.financials.set(FinancialField::PurchasePrice, price);
        p.financials.set(FinancialField::Equity, equity);
        p.financials.set(FinancialField::AnnualGrossRent, rent);
        p
    }

    #[test]
    fn test_empty_portfolio_is_all_zero() {
        let stats = aggregate_portfolio(&[]);
        assert_eq!(stats, PortfolioStatistics::default());
        assert_eq!(stats.property_count, 0);
        assert_eq!(stats.portfolio_yield, Decimal::ZERO);
    }

    #[test]
    fn test_totals_and_averages() {
        // Fully equity financed: cash flow = rent
        let a = simple(dec!(400000), dec!(400000), dec!(20000));
        let b = simple(dec!(600000), dec!(600000), dec!(18000));
        let stats = aggregate_portfolio(&[a, b]);

        assert_eq!(stats.property_count, 2);
        assert_eq!(stats.total_acquisition_cost, dec!(1000000));
        assert_eq!(stats.total_equity, dec!(1000000));
        assert_eq!(stats.total_debt, Decimal::ZERO);
        assert_eq!(stats.total_annual_rent, dec!(38000));
        assert_eq!(stats.total_cash_flow, dec!(38000));
        // gross yields 5% and 3% → mean 4%
        assert_eq!(stats.average_gross_yield, dec!(4));
        // aggregate yield is computed on totals, not averaged
        assert_eq!(stats.portfolio_yield, dec!(3.8));
        assert_eq!(stats.equity_ratio, dec!(100));
        assert_eq!(stats.average_dscr, Decimal::ZERO);
    }

    #[test]
    fn test_zero_equity_portfolio() {
        let stats = aggregate_portfolio(&[simple(dec!(500000), dec!(0), dec!(20000))]);
        assert_eq!(stats.portfolio_yield, Decimal::ZERO);
        assert_eq!(stats.equity_ratio, Decimal::ZERO);
        assert_eq!(stats.total_debt, dec!(500000));
    }

    #[test]
    fn test_totals_saturate_instead_of_overflowing() {
        let big = simple(dec!(50000000000000000000000000000), dec!(0), dec!(0));
        let stats = aggregate_portfolio(&[big.clone(), big]);

        assert_eq!(stats.property_count, 2);
        assert_eq!(stats.total_acquisition_cost, Decimal::MAX);
        assert_eq!(stats.total_debt, Decimal::MAX);
        assert_eq!(stats.equity_ratio, Decimal::ZERO);
    }
}
