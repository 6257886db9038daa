// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Per-screen wiring of the list view: which fields are searchable, which
//! facets exist, what the columns and KPI cards show, and which row actions
//! each status allows.

use crate::badge::BadgeStatus;
use crate::fallback;
use crate::kpi::{KpiScope, KpiUnit, Trend};
use crate::model::*;
use crate::render::{Cell, RowAction};
use crate::view::{ListItem, ListView, ScreenView, ViewConfig};

/// A fresh, still-loading view for `screen`.
pub fn open(screen: ScreenKind) -> Box<dyn ScreenView> {
    match screen {
        ScreenKind::AmlCases => Box::new(ListView::new(aml_cases())),
        ScreenKind::Clients => Box::new(ListView::new(clients())),
        ScreenKind::Invoices => Box::new(ListView::new(invoices())),
        ScreenKind::Tasks => Box::new(ListView::new(tasks())),
        ScreenKind::QualityReviews => Box::new(ListView::new(quality_reviews())),
        ScreenKind::Templates => Box::new(ListView::new(templates())),
    }
}

impl ListItem for AmlCase {
    type Status = CaseStatus;

    const SCREEN: ScreenKind = ScreenKind::AmlCases;

    fn key(&self) -> i64 {
        self.id.get()
    }

    fn status(&self) -> CaseStatus {
        self.status
    }

    fn from_rows(rows: ScreenRows) -> Option<Vec<Self>> {
        match rows {
            ScreenRows::AmlCases(rows) => Some(rows),
            _ => None,
        }
    }

    fn into_rows(items: Vec<Self>) -> ScreenRows {
        ScreenRows::AmlCases(items)
    }
}

fn case_actions(case: &AmlCase) -> Vec<RowAction> {
    let mut actions = vec![RowAction::View];
    match case.status {
        CaseStatus::Pending => actions.extend([RowAction::Approve, RowAction::Reject]),
        CaseStatus::InReview => {
            actions.extend([RowAction::Approve, RowAction::Reject, RowAction::Escalate]);
        }
        CaseStatus::Approved
        | CaseStatus::Rejected
        | CaseStatus::Escalated
        | CaseStatus::Unknown => {}
    }
    actions
}

pub fn aml_cases() -> ViewConfig<AmlCase> {
    ViewConfig::new(fallback::aml_cases, case_actions)
        .search(|case| case.reference.as_str())
        .search(|case| case.client_name.as_str())
        .search(|case| case.assigned_to.as_str())
        .facet("status", CaseStatus::WIRE, |case| case.status.as_str())
        .facet("risk", RiskLevel::WIRE, |case| case.risk.as_str())
        .facet("type", CaseType::WIRE, |case| case.case_type.as_str())
        .column("ref", |case| Cell::text(&case.reference))
        .column("client", |case| Cell::text(&case.client_name))
        .column("type", |case| Cell::text(case.case_type.as_str()))
        .column("status", |case| Cell::Badge(case.status.badge()))
        .column("risk", |case| Cell::Badge(case.risk.badge()))
        .column("score", |case| Cell::Number(case.risk_score))
        .column("owner", |case| Cell::text(&case.assigned_to))
        .column("due", |case| Cell::Date(case.due_on))
        .total("cases")
        .count("pending", |case| case.status == CaseStatus::Pending)
        .count("high risk", |case| case.risk == RiskLevel::High)
        .ratio("approved", |case| case.status == CaseStatus::Approved)
        .average("avg risk", |case| case.risk_score, KpiUnit::Score)
}

impl ListItem for Client {
    type Status = ClientStatus;

    const SCREEN: ScreenKind = ScreenKind::Clients;

    fn key(&self) -> i64 {
        self.id.get()
    }

    fn status(&self) -> ClientStatus {
        self.status
    }

    fn from_rows(rows: ScreenRows) -> Option<Vec<Self>> {
        match rows {
            ScreenRows::Clients(rows) => Some(rows),
            _ => None,
        }
    }

    fn into_rows(items: Vec<Self>) -> ScreenRows {
        ScreenRows::Clients(items)
    }
}

fn client_actions(client: &Client) -> Vec<RowAction> {
    match client.status {
        ClientStatus::Archived => vec![RowAction::View],
        ClientStatus::Active
        | ClientStatus::Onboarding
        | ClientStatus::Dormant
        | ClientStatus::Unknown => vec![RowAction::View, RowAction::Edit, RowAction::Archive],
    }
}

pub fn clients() -> ViewConfig<Client> {
    ViewConfig::new(fallback::clients, client_actions)
        .search(|client| client.code.as_str())
        .search(|client| client.name.as_str())
        .search(|client| client.manager.as_str())
        .facet("status", ClientStatus::WIRE, |client| client.status.as_str())
        .facet("entity", EntityType::WIRE, |client| {
            client.entity_type.as_str()
        })
        .column("code", |client| Cell::text(&client.code))
        .column("name", |client| Cell::text(&client.name))
        .column("entity", |client| Cell::text(client.entity_type.as_str()))
        .column("status", |client| Cell::Badge(client.status.badge()))
        .column("manager", |client| Cell::text(&client.manager))
        .column("fee", |client| Cell::Money(client.annual_fee_pence))
        .column("since", |client| Cell::Date(client.client_since))
        .total("clients")
        .count("active", |client| client.status == ClientStatus::Active)
        .count("onboarding", |client| {
            client.status == ClientStatus::Onboarding
        })
        .sum("annual fees", |client| client.annual_fee_pence, KpiUnit::Pence)
        .ratio("retained", |client| client.status == ClientStatus::Active)
}

impl ListItem for Invoice {
    type Status = InvoiceStatus;

    const SCREEN: ScreenKind = ScreenKind::Invoices;

    fn key(&self) -> i64 {
        self.id.get()
    }

    fn status(&self) -> InvoiceStatus {
        self.status
    }

    fn from_rows(rows: ScreenRows) -> Option<Vec<Self>> {
        match rows {
            ScreenRows::Invoices(rows) => Some(rows),
            _ => None,
        }
    }

    fn into_rows(items: Vec<Self>) -> ScreenRows {
        ScreenRows::Invoices(items)
    }
}

fn invoice_actions(invoice: &Invoice) -> Vec<RowAction> {
    match invoice.status {
        InvoiceStatus::Draft => vec![RowAction::View, RowAction::Edit],
        InvoiceStatus::Sent | InvoiceStatus::Overdue => vec![RowAction::View, RowAction::Remind],
        InvoiceStatus::Paid | InvoiceStatus::Void | InvoiceStatus::Unknown => {
            vec![RowAction::View]
        }
    }
}

fn invoice_outstanding(invoice: &Invoice) -> Option<i64> {
    matches!(invoice.status, InvoiceStatus::Sent | InvoiceStatus::Overdue)
        .then_some(invoice.amount_pence)
}

pub fn invoices() -> ViewConfig<Invoice> {
    ViewConfig::new(fallback::invoices, invoice_actions)
        .search(|invoice| invoice.number.as_str())
        .search(|invoice| invoice.client_name.as_str())
        .facet("status", InvoiceStatus::WIRE, |invoice| {
            invoice.status.as_str()
        })
        .facet("service", ServiceLine::WIRE, |invoice| {
            invoice.service.as_str()
        })
        .column("number", |invoice| Cell::text(&invoice.number))
        .column("client", |invoice| Cell::text(&invoice.client_name))
        .column("service", |invoice| Cell::text(invoice.service.as_str()))
        .column("status", |invoice| Cell::Badge(invoice.status.badge()))
        .column("amount", |invoice| Cell::Money(Some(invoice.amount_pence)))
        .column("overdue", |invoice| Cell::Number(invoice.days_overdue))
        .column("issued", |invoice| Cell::Date(Some(invoice.issued_on)))
        .column("due", |invoice| Cell::Date(Some(invoice.due_on)))
        .sum("outstanding", invoice_outstanding, KpiUnit::Pence)
        .trend(Trend::down("vs last month"))
        .count("overdue", |invoice| invoice.status == InvoiceStatus::Overdue)
        .ratio("collected", |invoice| invoice.status == InvoiceStatus::Paid)
        .average("avg days late", |invoice| invoice.days_overdue, KpiUnit::Days)
}

impl ListItem for PracticeTask {
    type Status = TaskStatus;

    const SCREEN: ScreenKind = ScreenKind::Tasks;

    fn key(&self) -> i64 {
        self.id.get()
    }

    fn status(&self) -> TaskStatus {
        self.status
    }

    fn from_rows(rows: ScreenRows) -> Option<Vec<Self>> {
        match rows {
            ScreenRows::Tasks(rows) => Some(rows),
            _ => None,
        }
    }

    fn into_rows(items: Vec<Self>) -> ScreenRows {
        ScreenRows::Tasks(items)
    }
}

fn task_actions(task: &PracticeTask) -> Vec<RowAction> {
    match task.status {
        TaskStatus::Done => vec![RowAction::View, RowAction::Archive],
        TaskStatus::NotStarted
        | TaskStatus::InProgress
        | TaskStatus::Blocked
        | TaskStatus::Unknown => vec![RowAction::View, RowAction::Edit, RowAction::Remind],
    }
}

pub fn tasks() -> ViewConfig<PracticeTask> {
    ViewConfig::new(fallback::tasks, task_actions)
        .search(|task| task.title.as_str())
        .search(|task| task.client_name.as_str())
        .search(|task| task.assignee.as_str())
        .facet("status", TaskStatus::WIRE, |task| task.status.as_str())
        .facet("priority", TaskPriority::WIRE, |task| task.priority.as_str())
        .column("task", |task| Cell::text(&task.title))
        .column("client", |task| Cell::text(&task.client_name))
        .column("assignee", |task| Cell::text(&task.assignee))
        .column("priority", |task| Cell::Badge(task.priority.badge()))
        .column("status", |task| Cell::Badge(task.status.badge()))
        .column("due", |task| Cell::Date(task.due_on))
        .column("est", |task| Cell::Number(task.estimate_hours))
        .count("open", |task| task.status != TaskStatus::Done)
        .count("blocked", |task| task.status == TaskStatus::Blocked)
        .ratio("complete", |task| task.status == TaskStatus::Done)
        .sum("estimate", |task| task.estimate_hours, KpiUnit::Hours)
}

impl ListItem for QualityReview {
    type Status = ReviewStatus;

    const SCREEN: ScreenKind = ScreenKind::QualityReviews;

    fn key(&self) -> i64 {
        self.id.get()
    }

    fn status(&self) -> ReviewStatus {
        self.status
    }

    fn from_rows(rows: ScreenRows) -> Option<Vec<Self>> {
        match rows {
            ScreenRows::QualityReviews(rows) => Some(rows),
            _ => None,
        }
    }

    fn into_rows(items: Vec<Self>) -> ScreenRows {
        ScreenRows::QualityReviews(items)
    }
}

fn review_actions(review: &QualityReview) -> Vec<RowAction> {
    match review.status {
        ReviewStatus::Pending => vec![RowAction::View, RowAction::Approve, RowAction::Reject],
        ReviewStatus::Approved | ReviewStatus::Rejected | ReviewStatus::Unknown => {
            vec![RowAction::View]
        }
    }
}

pub fn quality_reviews() -> ViewConfig<QualityReview> {
    ViewConfig::new(fallback::quality_reviews, review_actions)
        .search(|review| review.file_reference.as_str())
        .search(|review| review.client_name.as_str())
        .search(|review| review.reviewer.as_str())
        .facet("status", ReviewStatus::WIRE, |review| review.status.as_str())
        .facet("area", ReviewArea::WIRE, |review| review.area.as_str())
        .column("file", |review| Cell::text(&review.file_reference))
        .column("client", |review| Cell::text(&review.client_name))
        .column("area", |review| Cell::text(review.area.as_str()))
        .column("reviewer", |review| Cell::text(&review.reviewer))
        .column("status", |review| Cell::Badge(review.status.badge()))
        .column("score", |review| Cell::Number(review.score))
        .column("reviewed", |review| Cell::Date(review.reviewed_on))
        .count("pending", |review| review.status == ReviewStatus::Pending)
        .ratio("pass rate", |review| review.status == ReviewStatus::Approved)
        .average("avg score", |review| review.score, KpiUnit::Score)
}

impl ListItem for BrandingTemplate {
    type Status = TemplateStatus;

    const SCREEN: ScreenKind = ScreenKind::Templates;

    fn key(&self) -> i64 {
        self.id.get()
    }

    fn status(&self) -> TemplateStatus {
        self.status
    }

    fn from_rows(rows: ScreenRows) -> Option<Vec<Self>> {
        match rows {
            ScreenRows::Templates(rows) => Some(rows),
            _ => None,
        }
    }

    fn into_rows(items: Vec<Self>) -> ScreenRows {
        ScreenRows::Templates(items)
    }
}

fn template_actions(template: &BrandingTemplate) -> Vec<RowAction> {
    match template.status {
        TemplateStatus::Archived => vec![RowAction::View],
        TemplateStatus::Draft | TemplateStatus::Published | TemplateStatus::Unknown => {
            vec![RowAction::View, RowAction::Edit, RowAction::Archive]
        }
    }
}

pub fn templates() -> ViewConfig<BrandingTemplate> {
    ViewConfig::new(fallback::templates, template_actions)
        .search(|template| template.name.as_str())
        .search(|template| template.accent_colour.as_str())
        .facet("status", TemplateStatus::WIRE, |template| {
            template.status.as_str()
        })
        .facet("kind", TemplateKind::WIRE, |template| template.kind.as_str())
        .column("name", |template| Cell::text(&template.name))
        .column("kind", |template| Cell::text(template.kind.as_str()))
        .column("status", |template| Cell::Badge(template.status.badge()))
        .column("accent", |template| Cell::text(&template.accent_colour))
        .column("updated", |template| Cell::Date(Some(template.updated_on)))
        .column("uses", |template| Cell::Number(template.usage_count))
        .scope(KpiScope::Loaded)
        .total("templates")
        .count("live", |template| {
            template.status == TemplateStatus::Published
        })
        .count("payslips", |template| template.kind == TemplateKind::Payslip)
        .sum("total uses", |template| template.usage_count, KpiUnit::Count)
}

#[cfg(test)]
mod tests {
    use super::open;
    use crate::error::FetchError;
    use crate::fallback;
    use crate::filter::FacetChoice;
    use crate::model::{ScreenKind, ScreenRows};
    use crate::render::RowAction;
    use crate::view::{FallbackPolicy, ListItem, Provenance};

    fn loaded(screen: ScreenKind) -> Box<dyn crate::view::ScreenView> {
        let mut view = open(screen);
        view.apply_outcome(Ok(fallback::rows_for(screen)), FallbackPolicy::Surface);
        view
    }

    #[test]
    fn every_screen_opens_with_matching_kind() {
        for screen in ScreenKind::ALL {
            let view = open(screen);
            assert_eq!(view.screen(), screen);
            assert!(!view.column_labels().is_empty());
            assert!(!view.facet_summaries().is_empty());
        }
    }

    #[test]
    fn fallback_rows_render_in_dataset_order() {
        let mut view = open(ScreenKind::AmlCases);
        view.apply_outcome(Err(FetchError::Offline), FallbackPolicy::Substitute);
        assert_eq!(view.load_state().provenance(), Some(Provenance::Fallback));
        let keys = view.rows().iter().map(|row| row.key).collect::<Vec<_>>();
        let expected = fallback::aml_cases()
            .iter()
            .map(ListItem::key)
            .collect::<Vec<_>>();
        assert_eq!(keys, expected);
    }

    #[test]
    fn aml_kpis_over_sample_data() {
        let view = loaded(ScreenKind::AmlCases);
        let values = view.kpis().iter().map(|kpi| kpi.value).collect::<Vec<_>>();
        // 5 cases, 1 pending, 2 high risk, 1 of 5 approved, (18+46+82+12+0)/5
        assert_eq!(values, vec![5, 1, 2, 20, 32]);
    }

    #[test]
    fn kpis_follow_the_filtered_rows() {
        let mut view = loaded(ScreenKind::Invoices);
        view.set_query("quayside");
        let kpis = view.kpis();
        assert_eq!(view.rows().len(), 2);
        assert_eq!(kpis[0].value, 142_500 + 60_000);
        assert_eq!(kpis[1].value, 2);
        assert_eq!(kpis[2].value, 0);
        assert_eq!(kpis[3].value, 14);
        assert!(kpis[0].trend.is_some());
    }

    #[test]
    fn loaded_scope_ignores_filters() {
        let mut view = loaded(ScreenKind::Templates);
        let before = view.kpis();
        view.set_query("charity");
        assert_eq!(view.rows().len(), 1);
        assert_eq!(view.kpis(), before);
    }

    #[test]
    fn pending_case_offers_approve_and_reject_only() {
        let view = loaded(ScreenKind::AmlCases);
        let rows = view.rows();
        let pending = &rows[0];
        assert!(pending.allows(RowAction::Approve));
        assert!(pending.allows(RowAction::Reject));
        assert!(!pending.allows(RowAction::Escalate));

        let in_review = &rows[1];
        assert!(in_review.allows(RowAction::Escalate));

        let escalated = &rows[2];
        assert_eq!(escalated.actions, vec![RowAction::View]);
    }

    #[test]
    fn status_facet_narrows_rows() {
        let mut view = loaded(ScreenKind::Tasks);
        let summary = view.cycle_facet(0).expect("status facet");
        assert_eq!(summary.choice, FacetChoice::Only("not_started".to_owned()));
        let rows = view.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].badge.label, "to do");
    }

    #[test]
    fn search_highlights_first_matching_text_cell() {
        let mut view = loaded(ScreenKind::Clients);
        view.set_query("marsh");
        let rows = view.rows();
        assert_eq!(rows.len(), 1);
        let highlight = rows[0].highlight.clone().expect("highlight");
        assert_eq!(highlight.column, 1);
        assert_eq!(highlight.span, 0..5);
    }

    #[test]
    fn from_rows_rejects_other_screens() {
        let rows = ScreenRows::Clients(fallback::clients());
        assert!(<crate::model::AmlCase as ListItem>::from_rows(rows).is_none());
        let back = <crate::model::Client as ListItem>::into_rows(fallback::clients());
        assert_eq!(back.kind(), ScreenKind::Clients);
    }
}
