// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub type Predicate<T> = fn(&T) -> bool;
pub type NumericField<T> = fn(&T) -> Option<i64>;

pub enum Aggregation<T> {
    Total,
    Count(Predicate<T>),
    /// Missing values contribute zero.
    Sum(NumericField<T>),
    /// Percentage of items matching, rounded; zero for an empty list.
    Ratio(Predicate<T>),
    /// `sum(field) / total`, rounded; zero for an empty list.
    Average(NumericField<T>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KpiUnit {
    Count,
    Pence,
    Percent,
    Score,
    Days,
    Hours,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendDirection {
    Up,
    Down,
    Flat,
}

/// Trend marker shown next to a KPI. Configured per card, not derived from
/// history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trend {
    pub direction: TrendDirection,
    pub label: &'static str,
}

impl Trend {
    pub const fn up(label: &'static str) -> Self {
        Self {
            direction: TrendDirection::Up,
            label,
        }
    }

    pub const fn down(label: &'static str) -> Self {
        Self {
            direction: TrendDirection::Down,
            label,
        }
    }

    pub const fn flat(label: &'static str) -> Self {
        Self {
            direction: TrendDirection::Flat,
            label,
        }
    }
}

pub struct KpiDef<T> {
    pub label: &'static str,
    pub aggregation: Aggregation<T>,
    pub unit: KpiUnit,
    pub trend: Option<Trend>,
}

impl<T> KpiDef<T> {
    pub fn new(label: &'static str, aggregation: Aggregation<T>, unit: KpiUnit) -> Self {
        Self {
            label,
            aggregation,
            unit,
            trend: None,
        }
    }

    pub fn with_trend(mut self, trend: Trend) -> Self {
        self.trend = Some(trend);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kpi {
    pub label: &'static str,
    pub value: i64,
    pub unit: KpiUnit,
    pub trend: Option<Trend>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KpiScope {
    /// KPIs summarise the rows left after filtering.
    #[default]
    Filtered,
    /// KPIs summarise everything loaded, regardless of filters.
    Loaded,
}

pub fn aggregate<T>(items: &[&T], defs: &[KpiDef<T>]) -> Vec<Kpi> {
    defs.iter()
        .map(|def| Kpi {
            label: def.label,
            value: evaluate(items, &def.aggregation),
            unit: def.unit,
            trend: def.trend,
        })
        .collect()
}

fn evaluate<T>(items: &[&T], aggregation: &Aggregation<T>) -> i64 {
    let total = items.len();
    match aggregation {
        Aggregation::Total => count_to_i64(total),
        Aggregation::Count(predicate) => count_to_i64(count_matching(items, *predicate)),
        Aggregation::Sum(field) => clamp_to_i64(sum_field(items, *field)),
        Aggregation::Ratio(predicate) => {
            let matching = count_matching(items, *predicate);
            rounded_quotient(count_to_i128(matching) * 100, total)
        }
        Aggregation::Average(field) => rounded_quotient(sum_field(items, *field), total),
    }
}

fn count_matching<T>(items: &[&T], predicate: Predicate<T>) -> usize {
    items.iter().filter(|item| predicate(item)).count()
}

/// Exact total in i128; only the reported value is clamped.
fn sum_field<T>(items: &[&T], field: NumericField<T>) -> i128 {
    items
        .iter()
        .map(|item| i128::from(field(item).unwrap_or(0)))
        .fold(0_i128, i128::saturating_add)
}

fn count_to_i64(count: usize) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}

fn count_to_i128(count: usize) -> i128 {
    i128::try_from(count).unwrap_or(i128::MAX)
}

fn clamp_to_i64(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(if value < 0 { i64::MIN } else { i64::MAX })
}

/// Nearest-integer quotient, halves away from zero. Zero when `total` is zero.
fn rounded_quotient(numerator: i128, total: usize) -> i64 {
    if total == 0 {
        return 0;
    }
    let total = count_to_i128(total);
    let quotient = numerator / total;
    let remainder = numerator % total;
    let rounded = if remainder.unsigned_abs() * 2 >= total.unsigned_abs() {
        quotient + numerator.signum()
    } else {
        quotient
    };
    clamp_to_i64(rounded)
}

#[cfg(test)]
mod tests {
    use super::{Aggregation, KpiDef, KpiUnit, Trend, TrendDirection, aggregate};

    struct Row {
        status: &'static str,
        amount: Option<i64>,
    }

    fn is_pending(row: &Row) -> bool {
        row.status == "pending"
    }

    fn is_approved(row: &Row) -> bool {
        row.status == "approved"
    }

    fn amount(row: &Row) -> Option<i64> {
        row.amount
    }

    fn defs() -> Vec<KpiDef<Row>> {
        vec![
            KpiDef::new("total", Aggregation::Total, KpiUnit::Count),
            KpiDef::new("pending", Aggregation::Count(is_pending), KpiUnit::Count),
            KpiDef::new("amount", Aggregation::Sum(amount), KpiUnit::Pence),
            KpiDef::new("approved", Aggregation::Ratio(is_approved), KpiUnit::Percent),
            KpiDef::new("average", Aggregation::Average(amount), KpiUnit::Pence)
                .with_trend(Trend::up("+4%")),
        ]
    }

    fn values(rows: &[Row]) -> Vec<i64> {
        let refs = rows.iter().collect::<Vec<_>>();
        aggregate(&refs, &defs())
            .into_iter()
            .map(|kpi| kpi.value)
            .collect()
    }

    #[test]
    fn count_and_sum_over_two_items() {
        let rows = vec![
            Row {
                status: "approved",
                amount: Some(100),
            },
            Row {
                status: "pending",
                amount: Some(50),
            },
        ];
        assert_eq!(values(&rows), vec![2, 1, 150, 50, 75]);
    }

    #[test]
    fn empty_list_yields_zero_for_ratio_and_average() {
        assert_eq!(values(&[]), vec![0, 0, 0, 0, 0]);
    }

    #[test]
    fn ratio_and_average_round_to_nearest() {
        let rows = vec![
            Row {
                status: "approved",
                amount: Some(1),
            },
            Row {
                status: "pending",
                amount: None,
            },
            Row {
                status: "pending",
                amount: Some(1),
            },
        ];
        // 1/3 approved -> 33%; (1 + 0 + 1) / 3 -> 0.67 -> 1
        let computed = values(&rows);
        assert_eq!(computed[3], 33);
        assert_eq!(computed[4], 1);

        let two_of_three = vec![
            Row {
                status: "approved",
                amount: Some(0),
            },
            Row {
                status: "approved",
                amount: Some(0),
            },
            Row {
                status: "pending",
                amount: Some(0),
            },
        ];
        assert_eq!(values(&two_of_three)[3], 67);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let rows = vec![
            Row {
                status: "approved",
                amount: Some(9),
            },
            Row {
                status: "void",
                amount: Some(-4),
            },
        ];
        let refs = rows.iter().collect::<Vec<_>>();
        let first = aggregate(&refs, &defs());
        let second = aggregate(&refs, &defs());
        assert_eq!(first, second);
    }

    #[test]
    fn trend_is_carried_verbatim() {
        let refs: Vec<&Row> = Vec::new();
        let kpis = aggregate(&refs, &defs());
        let trend = kpis[4].trend.expect("configured trend");
        assert_eq!(trend.direction, TrendDirection::Up);
        assert_eq!(trend.label, "+4%");
        assert!(kpis[0].trend.is_none());
    }

    #[test]
    fn sum_saturates_instead_of_overflowing() {
        let rows = vec![
            Row {
                status: "pending",
                amount: Some(i64::MAX),
            },
            Row {
                status: "pending",
                amount: Some(10),
            },
        ];
        assert_eq!(values(&rows)[2], i64::MAX);
    }

    #[test]
    fn sum_below_zero_saturates_at_min() {
        let rows = vec![
            Row {
                status: "void",
                amount: Some(i64::MIN),
            },
            Row {
                status: "void",
                amount: Some(-10),
            },
        ];
        assert_eq!(values(&rows)[2], i64::MIN);
    }

    #[test]
    fn average_of_large_amounts_is_exact() {
        let big = 9_007_199_254_740_993;
        let rows = vec![
            Row {
                status: "pending",
                amount: Some(big),
            },
            Row {
                status: "pending",
                amount: Some(big),
            },
        ];
        assert_eq!(values(&rows)[4], big);

        let maxed = vec![
            Row {
                status: "pending",
                amount: Some(i64::MAX),
            },
            Row {
                status: "pending",
                amount: Some(i64::MAX),
            },
        ];
        assert_eq!(values(&maxed)[4], i64::MAX);
    }

    #[test]
    fn negative_halves_round_away_from_zero() {
        let rows = vec![
            Row {
                status: "void",
                amount: Some(-3),
            },
            Row {
                status: "void",
                amount: Some(0),
            },
        ];
        // -3 / 2 -> -1.5 -> -2
        assert_eq!(values(&rows)[4], -2);
    }
}
