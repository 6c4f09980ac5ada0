use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::ImmoCalcError;
use crate::format::{format_decimal, format_percent};
use crate::metrics::MetricsSnapshot;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Headline figures with a rating scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    GrossYield,
    NetYield,
    EquityYield,
    AfterTaxEquityYield,
    Dscr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Poor,
    Medium,
    Good,
    /// DSCR below 1: income does not cover debt service
    Critical,
    Marginal,
    /// Metric has no rating scale
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualHint {
    Red,
    Yellow,
    Green,
    Gray,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub tier: Tier,
    pub visual_hint: VisualHint,
}

/// One rated figure from a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricAssessment {
    pub metric: Metric,
    pub value: Decimal,
    pub display: String,
    pub tier: Tier,
    pub visual_hint: VisualHint,
}

/// Ascending thresholds: below `low` is the bottom tier, below `high` the
/// middle tier, anything else good.
struct Scale {
    low: Decimal,
    high: Decimal,
    bottom: Tier,
    middle: Tier,
}

// ---------------------------------------------------------------------------
// Metric
// ---------------------------------------------------------------------------

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::GrossYield,
        Metric::NetYield,
        Metric::EquityYield,
        Metric::AfterTaxEquityYield,
        Metric::Dscr,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::GrossYield => "gross_yield",
            Metric::NetYield => "net_yield",
            Metric::EquityYield => "equity_yield",
            Metric::AfterTaxEquityYield => "after_tax_equity_yield",
            Metric::Dscr => "dscr",
        }
    }

    fn scale(&self) -> Scale {
        let (low, high, bottom, middle) = match self {
            Metric::GrossYield => (dec!(3.0), dec!(4.5), Tier::Poor, Tier::Medium),
            Metric::NetYield => (dec!(2.0), dec!(3.0), Tier::Poor, Tier::Medium),
            Metric::EquityYield => (dec!(3.0), dec!(6.0), Tier::Poor, Tier::Medium),
            Metric::AfterTaxEquityYield => (dec!(2.5), dec!(5.0), Tier::Poor, Tier::Medium),
            Metric::Dscr => (dec!(1.0), dec!(1.2), Tier::Critical, Tier::Marginal),
        };
        Scale {
            low,
            high,
            bottom,
            middle,
        }
    }

    fn value_in(&self, snapshot: &MetricsSnapshot) -> Decimal {
        match self {
            Metric::GrossYield => snapshot.gross_yield,
            Metric::NetYield => snapshot.net_yield,
            Metric::EquityYield => snapshot.equity_yield,
            Metric::AfterTaxEquityYield => snapshot.after_tax_equity_yield,
            Metric::Dscr => snapshot.dscr,
        }
    }

    fn display(&self, value: Decimal) -> String {
        match self {
            Metric::Dscr => format_decimal(value, 2),
            _ => format_percent(value, 2),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = ImmoCalcError;

    /// Accepts snake_case, camelCase and upper-case `DSCR`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "grossyield" => Ok(Metric::GrossYield),
            "netyield" => Ok(Metric::NetYield),
            "equityyield" => Ok(Metric::EquityYield),
            "aftertaxequityyield" => Ok(Metric::AfterTaxEquityYield),
            "dscr" => Ok(Metric::Dscr),
            _ => Err(ImmoCalcError::InvalidInput {
                field: "metric".into(),
                reason: format!("unknown metric '{s}'"),
            }),
        }
    }
}

impl Tier {
    pub fn visual_hint(&self) -> VisualHint {
        match self {
            Tier::Poor | Tier::Critical => VisualHint::Red,
            Tier::Medium | Tier::Marginal => VisualHint::Yellow,
            Tier::Good => VisualHint::Green,
            Tier::Neutral => VisualHint::Gray,
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Rate `value` for the metric called `metric_name`; unknown names are neutral.
pub fn evaluate(metric_name: &str, value: Decimal) -> Evaluation {
    match metric_name.parse::<Metric>() {
        Ok(metric) => evaluate_metric(metric, value),
        Err(_) => Evaluation {
            tier: Tier::Neutral,
            visual_hint: VisualHint::Gray,
        },
    }
}

pub fn evaluate_metric(metric: Metric, value: Decimal) -> Evaluation {
    let scale = metric.scale();
    let tier = if value < scale.low {
        scale.bottom
    } else if value < scale.high {
        scale.middle
    } else {
        Tier::Good
    };
    Evaluation {
        tier,
        visual_hint: tier.visual_hint(),
    }
}

/// Rate every headline figure of a snapshot.
pub fn evaluate_snapshot(snapshot: &MetricsSnapshot) -> Vec<MetricAssessment> {
    Metric::ALL
        .iter()
        .map(|&metric| {
            let value = metric.value_in(snapshot);
            let evaluation = evaluate_metric(metric, value);
            MetricAssessment {
                metric,
                value,
                display: metric.display(value),
                tier: evaluation.tier,
                visual_hint: evaluation.visual_hint,
            }
        })
        .collect()
}
