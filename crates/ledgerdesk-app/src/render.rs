// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::cmp::Ordering;
use std::ops::Range;
use time::Date;

use crate::badge::{Badge, BadgeStatus};
use crate::filter::{FilterState, match_span};
use crate::kpi::{Kpi, KpiUnit, TrendDirection};
use crate::model::SortDirection;
use crate::view::{ListItem, ViewConfig};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Number(Option<i64>),
    Money(Option<i64>),
    Date(Option<Date>),
    Badge(Badge),
}

impl Cell {
    pub fn text(value: &str) -> Self {
        Self::Text(value.to_owned())
    }

    pub fn display(&self) -> String {
        match self {
            Self::Text(value) => value.clone(),
            Self::Number(Some(value)) => value.to_string(),
            Self::Money(Some(pence)) => format_money(*pence),
            Self::Date(Some(date)) => date.to_string(),
            Self::Number(None) | Self::Money(None) | Self::Date(None) => String::new(),
            Self::Badge(badge) => badge.label.to_owned(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Number(None) | Self::Money(None) | Self::Date(None))
    }

    pub fn cmp_value(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(left), Self::Number(right)) => left.cmp(right),
            (Self::Money(left), Self::Money(right)) => left.cmp(right),
            (Self::Date(left), Self::Date(right)) => left.cmp(right),
            (Self::Badge(left), Self::Badge(right)) => left.label.cmp(right.label),
            (Self::Text(left), Self::Text(right)) => left.to_lowercase().cmp(&right.to_lowercase()),
            _ => self
                .display()
                .to_lowercase()
                .cmp(&other.display().to_lowercase()),
        }
    }
}

pub struct Column<T> {
    pub label: &'static str,
    pub cell: fn(&T) -> Cell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowAction {
    View,
    Edit,
    Approve,
    Reject,
    Escalate,
    Remind,
    Archive,
}

impl RowAction {
    pub const ALL: [Self; 7] = [
        Self::View,
        Self::Edit,
        Self::Approve,
        Self::Reject,
        Self::Escalate,
        Self::Remind,
        Self::Archive,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Edit => "edit",
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Escalate => "escalate",
            Self::Remind => "remind",
            Self::Archive => "archive",
        }
    }

    pub const fn key(self) -> char {
        match self {
            Self::View => 'v',
            Self::Edit => 'e',
            Self::Approve => 'a',
            Self::Reject => 'x',
            Self::Escalate => 'E',
            Self::Remind => 'm',
            Self::Archive => 'z',
        }
    }

    pub fn for_key(key: char) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.key() == key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    pub column: usize,
    pub span: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRow {
    pub key: i64,
    pub badge: Badge,
    pub cells: Vec<Cell>,
    pub actions: Vec<RowAction>,
    pub highlight: Option<Highlight>,
}

impl RenderedRow {
    pub fn allows(&self, action: RowAction) -> bool {
        self.actions.contains(&action)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub column: usize,
    pub direction: SortDirection,
}

/// Renders one item. Depends only on the item, the view configuration, and
/// the filter state passed in.
pub fn render_row<T: ListItem>(
    item: &T,
    config: &ViewConfig<T>,
    filter: &FilterState,
) -> RenderedRow {
    let cells = config
        .columns
        .iter()
        .map(|column| (column.cell)(item))
        .collect::<Vec<_>>();
    let needle = filter.query.to_lowercase();
    let highlight = cells.iter().enumerate().find_map(|(column, cell)| match cell {
        Cell::Text(text) => match_span(text, &needle).map(|span| Highlight { column, span }),
        _ => None,
    });

    RenderedRow {
        key: item.key(),
        badge: item.status().badge(),
        cells,
        actions: (config.actions)(item),
        highlight,
    }
}

/// Stable sort by one column. Empty cells sort last in both directions.
pub fn sort_rows(rows: &mut [RenderedRow], sort: SortSpec) {
    rows.sort_by(|left, right| {
        let left_value = left.cells.get(sort.column);
        let right_value = right.cells.get(sort.column);
        let left_null = left_value.is_none_or(Cell::is_null);
        let right_null = right_value.is_none_or(Cell::is_null);
        match (left_null, right_null) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => match (left_value, right_value) {
                (Some(left), Some(right)) => match sort.direction {
                    SortDirection::Asc => left.cmp_value(right),
                    SortDirection::Desc => left.cmp_value(right).reverse(),
                },
                _ => Ordering::Equal,
            },
        }
    });
}

/// Pounds with thousands separators, e.g. `£12,345.60`.
pub fn format_money(pence: i64) -> String {
    let sign = if pence < 0 { "-" } else { "" };
    let absolute = pence.unsigned_abs();
    let pounds = group_thousands(absolute / 100);
    let remainder = absolute % 100;
    format!("{sign}£{pounds}.{remainder:02}")
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    out
}

pub fn format_kpi_value(kpi: &Kpi) -> String {
    match kpi.unit {
        KpiUnit::Count | KpiUnit::Score => kpi.value.to_string(),
        KpiUnit::Pence => format_money(kpi.value),
        KpiUnit::Percent => format!("{}%", kpi.value),
        KpiUnit::Days => format!("{}d", kpi.value),
        KpiUnit::Hours => format!("{}h", kpi.value),
    }
}

pub fn format_kpi(kpi: &Kpi) -> String {
    let mut out = format!("{} {}", kpi.label, format_kpi_value(kpi));
    if let Some(trend) = kpi.trend {
        let arrow = match trend.direction {
            TrendDirection::Up => "↑",
            TrendDirection::Down => "↓",
            TrendDirection::Flat => "→",
        };
        out.push(' ');
        out.push_str(arrow);
        out.push_str(trend.label);
    }
    out
}
