// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::fmt;
use tracing::{debug, warn};

use crate::badge::BadgeStatus;
use crate::error::FetchError;
use crate::filter::{Facet, FacetChoice, FilterState, TextField, filter};
use crate::kpi::{
    Aggregation, Kpi, KpiDef, KpiScope, KpiUnit, NumericField, Predicate, Trend, aggregate,
};
use crate::model::{ScreenKind, ScreenRows, SortDirection};
use crate::render::{Cell, Column, RenderedRow, RowAction, SortSpec, render_row, sort_rows};

/// A record shown on a list screen.
pub trait ListItem: Clone + fmt::Debug + 'static {
    type Status: BadgeStatus;

    const SCREEN: ScreenKind;

    fn key(&self) -> i64;
    fn status(&self) -> Self::Status;
    fn from_rows(rows: ScreenRows) -> Option<Vec<Self>>;
    fn into_rows(items: Vec<Self>) -> ScreenRows;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    Live,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Loaded(Provenance),
    Failed(String),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn provenance(&self) -> Option<Provenance> {
        match self {
            Self::Loaded(provenance) => Some(*provenance),
            Self::Loading | Self::Failed(_) => None,
        }
    }
}

/// What to show when a fetch fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// Load the screen's fallback dataset and mark it as sample data.
    #[default]
    Substitute,
    /// Show the failure instead of any data.
    Surface,
}

impl FallbackPolicy {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Substitute => "substitute",
            Self::Surface => "surface",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "substitute" => Some(Self::Substitute),
            "surface" => Some(Self::Surface),
            _ => None,
        }
    }
}

/// Turns a fetch result into the collection to display and its load state.
pub fn resolve_fetch<T>(
    screen: ScreenKind,
    result: Result<Vec<T>, FetchError>,
    fallback: fn() -> Vec<T>,
    policy: FallbackPolicy,
) -> (Vec<T>, LoadState) {
    match result {
        Ok(items) => {
            debug!(screen = screen.as_str(), rows = items.len(), "fetch succeeded");
            (items, LoadState::Loaded(Provenance::Live))
        }
        Err(error) => match policy {
            FallbackPolicy::Substitute => {
                let items = fallback();
                warn!(
                    screen = screen.as_str(),
                    %error,
                    rows = items.len(),
                    "fetch failed; showing fallback dataset"
                );
                (items, LoadState::Loaded(Provenance::Fallback))
            }
            FallbackPolicy::Surface => {
                warn!(screen = screen.as_str(), %error, "fetch failed");
                (Vec::new(), LoadState::Failed(error.to_string()))
            }
        },
    }
}

/// Everything that makes one screen different from another.
pub struct ViewConfig<T> {
    pub search_fields: Vec<TextField<T>>,
    pub facets: Vec<Facet<T>>,
    pub columns: Vec<Column<T>>,
    pub kpis: Vec<KpiDef<T>>,
    pub kpi_scope: KpiScope,
    pub actions: fn(&T) -> Vec<RowAction>,
    pub fallback: fn() -> Vec<T>,
}

impl<T: ListItem> ViewConfig<T> {
    pub fn new(fallback: fn() -> Vec<T>, actions: fn(&T) -> Vec<RowAction>) -> Self {
        Self {
            search_fields: Vec::new(),
            facets: Vec::new(),
            columns: Vec::new(),
            kpis: Vec::new(),
            kpi_scope: KpiScope::default(),
            actions,
            fallback,
        }
    }

    pub fn search(mut self, field: TextField<T>) -> Self {
        self.search_fields.push(field);
        self
    }

    pub fn facet(
        mut self,
        key: &'static str,
        values: &'static [&'static str],
        field: fn(&T) -> &'static str,
    ) -> Self {
        self.facets
            .push(Facet::new(key, key, values.iter().copied(), field));
        self
    }

    pub fn column(mut self, label: &'static str, cell: fn(&T) -> Cell) -> Self {
        self.columns.push(Column { label, cell });
        self
    }

    pub fn scope(mut self, scope: KpiScope) -> Self {
        self.kpi_scope = scope;
        self
    }

    pub fn total(mut self, label: &'static str) -> Self {
        self.kpis.push(KpiDef::new(label, Aggregation::Total, KpiUnit::Count));
        self
    }

    pub fn count(mut self, label: &'static str, predicate: Predicate<T>) -> Self {
        self.kpis.push(KpiDef::new(label, Aggregation::Count(predicate), KpiUnit::Count));
        self
    }

    pub fn sum(mut self, label: &'static str, field: NumericField<T>, unit: KpiUnit) -> Self {
        self.kpis.push(KpiDef::new(label, Aggregation::Sum(field), unit));
        self
    }

    pub fn ratio(mut self, label: &'static str, predicate: Predicate<T>) -> Self {
        self.kpis.push(KpiDef::new(label, Aggregation::Ratio(predicate), KpiUnit::Percent));
        self
    }

    pub fn average(mut self, label: &'static str, field: NumericField<T>, unit: KpiUnit) -> Self {
        self.kpis.push(KpiDef::new(label, Aggregation::Average(field), unit));
        self
    }

    /// Attaches a trend marker to the most recently added KPI.
    pub fn trend(mut self, trend: Trend) -> Self {
        if let Some(last) = self.kpis.pop() {
            self.kpis.push(last.with_trend(trend));
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetSummary {
    pub key: &'static str,
    pub label: &'static str,
    pub choice: FacetChoice,
}

/// Type-erased handle the renderer drives. Implemented once, by [`ListView`].
pub trait ScreenView {
    fn screen(&self) -> ScreenKind;
    fn load_state(&self) -> &LoadState;
    fn begin_load(&mut self);
    fn apply_outcome(&mut self, outcome: Result<ScreenRows, FetchError>, policy: FallbackPolicy);
    fn filter_state(&self) -> &FilterState;
    fn set_query(&mut self, query: &str);
    fn cycle_facet(&mut self, index: usize) -> Option<FacetSummary>;
    fn clear_filters(&mut self);
    fn sort(&self) -> Option<SortSpec>;
    fn cycle_sort(&mut self, column: usize) -> Option<SortSpec>;
    fn column_labels(&self) -> Vec<&'static str>;
    fn facet_summaries(&self) -> Vec<FacetSummary>;
    fn rows(&self) -> Vec<RenderedRow>;
    fn kpis(&self) -> Vec<Kpi>;
    fn loaded_len(&self) -> usize;
}

pub struct ListView<T: ListItem> {
    config: ViewConfig<T>,
    items: Vec<T>,
    load: LoadState,
    filter: FilterState,
    sort: Option<SortSpec>,
}

impl<T: ListItem> ListView<T> {
    pub fn new(config: ViewConfig<T>) -> Self {
        Self {
            config,
            items: Vec::new(),
            load: LoadState::Loading,
            filter: FilterState::default(),
            sort: None,
        }
    }

    pub fn apply_fetch(&mut self, result: Result<Vec<T>, FetchError>, policy: FallbackPolicy) {
        let (items, load) = resolve_fetch(T::SCREEN, result, self.config.fallback, policy);
        self.items = items;
        self.load = load;
    }

    pub fn visible(&self) -> Vec<&T> {
        filter(
            &self.items,
            &self.filter,
            &self.config.search_fields,
            &self.config.facets,
        )
    }
}

impl<T: ListItem> ScreenView for ListView<T> {
    fn screen(&self) -> ScreenKind {
        T::SCREEN
    }

    fn load_state(&self) -> &LoadState {
        &self.load
    }

    fn begin_load(&mut self) {
        self.load = LoadState::Loading;
    }

    fn apply_outcome(&mut self, outcome: Result<ScreenRows, FetchError>, policy: FallbackPolicy) {
        let result = outcome.and_then(|rows| {
            let delivered = rows.kind();
            T::from_rows(rows).ok_or(FetchError::WrongScreen {
                expected: T::SCREEN.as_str(),
                delivered: delivered.as_str(),
            })
        });
        self.apply_fetch(result, policy);
    }

    fn filter_state(&self) -> &FilterState {
        &self.filter
    }

    fn set_query(&mut self, query: &str) {
        self.filter.query = query.to_owned();
    }

    fn cycle_facet(&mut self, index: usize) -> Option<FacetSummary> {
        let facet = self.config.facets.get(index)?;
        let next = facet.next_choice(self.filter.choice(facet.key));
        self.filter.set_facet(facet.key, next.clone());
        Some(FacetSummary {
            key: facet.key,
            label: facet.label,
            choice: next,
        })
    }

    fn clear_filters(&mut self) {
        self.filter.clear();
    }

    fn sort(&self) -> Option<SortSpec> {
        self.sort
    }

    fn cycle_sort(&mut self, column: usize) -> Option<SortSpec> {
        if column >= self.config.columns.len() {
            return self.sort;
        }
        self.sort = match self.sort {
            Some(current) if current.column == column => match current.direction {
                SortDirection::Asc => Some(SortSpec {
                    column,
                    direction: SortDirection::Desc,
                }),
                SortDirection::Desc => None,
            },
            _ => Some(SortSpec {
                column,
                direction: SortDirection::Asc,
            }),
        };
        self.sort
    }

    fn column_labels(&self) -> Vec<&'static str> {
        self.config.columns.iter().map(|column| column.label).collect()
    }

    fn facet_summaries(&self) -> Vec<FacetSummary> {
        self.config
            .facets
            .iter()
            .map(|facet| FacetSummary {
                key: facet.key,
                label: facet.label,
                choice: self.filter.choice(facet.key).clone(),
            })
            .collect()
    }

    fn rows(&self) -> Vec<RenderedRow> {
        let mut rows = self
            .visible()
            .into_iter()
            .map(|item| render_row(item, &self.config, &self.filter))
            .collect::<Vec<_>>();
        if let Some(sort) = self.sort {
            sort_rows(&mut rows, sort);
        }
        rows
    }

    fn kpis(&self) -> Vec<Kpi> {
        match self.config.kpi_scope {
            KpiScope::Filtered => aggregate(&self.visible(), &self.config.kpis),
            KpiScope::Loaded => {
                let all = self.items.iter().collect::<Vec<_>>();
                aggregate(&all, &self.config.kpis)
            }
        }
    }

    fn loaded_len(&self) -> usize {
        self.items.len()
    }
}
