// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use time::Date;

use crate::ids::*;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Declares a closed wire enumeration with an explicit `Unknown` arm.
///
/// Unrecognised wire values deserialize to `Unknown` instead of failing, so a
/// backend that grows a new status never blanks a screen.
macro_rules! closed_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => $wire:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
            #[serde(rename = "unknown", other)]
            Unknown,
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];
            pub const WIRE: &'static [&'static str] = &[$($wire),+];

            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                    Self::Unknown => "unknown",
                }
            }

            pub fn parse(value: &str) -> Option<Self> {
                match value {
                    $($wire => Some(Self::$variant),)+
                    _ => None,
                }
            }

            pub fn from_raw(value: &str) -> Self {
                Self::parse(value).unwrap_or(Self::Unknown)
            }
        }
    };
}

closed_enum! {
    pub enum CaseStatus {
        Pending => "pending",
        InReview => "in_review",
        Approved => "approved",
        Rejected => "rejected",
        Escalated => "escalated",
    }
}

closed_enum! {
    pub enum CaseType {
        Onboarding => "onboarding",
        PeriodicReview => "periodic_review",
        EnhancedDueDiligence => "enhanced_due_diligence",
        SourceOfFunds => "source_of_funds",
    }
}

closed_enum! {
    pub enum RiskLevel {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
}

closed_enum! {
    pub enum ClientStatus {
        Active => "active",
        Onboarding => "onboarding",
        Dormant => "dormant",
        Archived => "archived",
    }
}

closed_enum! {
    pub enum EntityType {
        SoleTrader => "sole_trader",
        Partnership => "partnership",
        LimitedCompany => "limited_company",
        Llp => "llp",
        Charity => "charity",
    }
}

closed_enum! {
    pub enum InvoiceStatus {
        Draft => "draft",
        Sent => "sent",
        Paid => "paid",
        Overdue => "overdue",
        Void => "void",
    }
}

closed_enum! {
    pub enum ServiceLine {
        Accounts => "accounts",
        Payroll => "payroll",
        Tax => "tax",
        Advisory => "advisory",
        Bookkeeping => "bookkeeping",
    }
}

closed_enum! {
    pub enum TaskStatus {
        NotStarted => "not_started",
        InProgress => "in_progress",
        Blocked => "blocked",
        Done => "done",
    }
}

closed_enum! {
    pub enum TaskPriority {
        Low => "low",
        Normal => "normal",
        Urgent => "urgent",
    }
}

closed_enum! {
    pub enum ReviewStatus {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
    }
}

closed_enum! {
    pub enum ReviewArea {
        Accounts => "accounts",
        Tax => "tax",
        Payroll => "payroll",
        Aml => "aml",
    }
}

closed_enum! {
    pub enum TemplateStatus {
        Draft => "draft",
        Published => "published",
        Archived => "archived",
    }
}

closed_enum! {
    pub enum TemplateKind {
        Payslip => "payslip",
        Invoice => "invoice",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ScreenKind {
    AmlCases,
    Clients,
    Invoices,
    Tasks,
    QualityReviews,
    Templates,
}

impl ScreenKind {
    pub const ALL: [Self; 6] = [
        Self::AmlCases,
        Self::Clients,
        Self::Invoices,
        Self::Tasks,
        Self::QualityReviews,
        Self::Templates,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AmlCases => "aml_cases",
            Self::Clients => "clients",
            Self::Invoices => "invoices",
            Self::Tasks => "tasks",
            Self::QualityReviews => "quality_reviews",
            Self::Templates => "templates",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "aml_cases" => Some(Self::AmlCases),
            "clients" => Some(Self::Clients),
            "invoices" => Some(Self::Invoices),
            "tasks" => Some(Self::Tasks),
            "quality_reviews" => Some(Self::QualityReviews),
            "templates" => Some(Self::Templates),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::AmlCases => "aml",
            Self::Clients => "clients",
            Self::Invoices => "billing",
            Self::Tasks => "tasks",
            Self::QualityReviews => "quality",
            Self::Templates => "templates",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::AmlCases => "AML/KYC cases",
            Self::Clients => "Clients",
            Self::Invoices => "Invoices",
            Self::Tasks => "Practice tasks",
            Self::QualityReviews => "Quality reviews",
            Self::Templates => "Branding templates",
        }
    }

    pub fn default_endpoint(self) -> Endpoint {
        match self {
            Self::AmlCases => Endpoint::get("/api/aml/cases"),
            Self::Clients => Endpoint::get("/api/crm/clients"),
            Self::Invoices => Endpoint::get("/api/billing/invoices"),
            Self::Tasks => Endpoint::get("/api/practice/tasks"),
            Self::QualityReviews => Endpoint::post("/api/quality/reviews/search"),
            Self::Templates => Endpoint::get("/api/branding/templates"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub method: HttpMethod,
    pub path: String,
}

impl Endpoint {
    pub fn get(path: &str) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.to_owned(),
        }
    }

    pub fn post(path: &str) -> Self {
        Self {
            method: HttpMethod::Post,
            path: path.to_owned(),
        }
    }

    pub fn with_path(&self, path: &str) -> Self {
        Self {
            method: self.method,
            path: path.to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppMode {
    Nav,
    Search,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmlCase {
    pub id: CaseId,
    pub reference: String,
    pub client_name: String,
    pub case_type: CaseType,
    pub status: CaseStatus,
    pub risk: RiskLevel,
    #[serde(default)]
    pub risk_score: Option<i64>,
    #[serde(default)]
    pub assigned_to: String,
    #[serde(with = "iso_date")]
    pub opened_on: Date,
    #[serde(default, with = "iso_date::option")]
    pub due_on: Option<Date>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: ClientId,
    pub code: String,
    pub name: String,
    pub entity_type: EntityType,
    pub status: ClientStatus,
    #[serde(default)]
    pub manager: String,
    #[serde(default)]
    pub annual_fee_pence: Option<i64>,
    #[serde(default, with = "iso_date::option")]
    pub client_since: Option<Date>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: InvoiceId,
    pub number: String,
    pub client_name: String,
    pub service: ServiceLine,
    pub status: InvoiceStatus,
    pub amount_pence: i64,
    #[serde(default)]
    pub days_overdue: Option<i64>,
    #[serde(with = "iso_date")]
    pub issued_on: Date,
    #[serde(with = "iso_date")]
    pub due_on: Date,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeTask {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub assignee: String,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    #[serde(default, with = "iso_date::option")]
    pub due_on: Option<Date>,
    #[serde(default)]
    pub estimate_hours: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityReview {
    pub id: ReviewId,
    pub file_reference: String,
    pub client_name: String,
    #[serde(default)]
    pub reviewer: String,
    pub area: ReviewArea,
    pub status: ReviewStatus,
    #[serde(default)]
    pub score: Option<i64>,
    #[serde(default, with = "iso_date::option")]
    pub reviewed_on: Option<Date>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandingTemplate {
    pub id: TemplateId,
    pub name: String,
    pub kind: TemplateKind,
    pub status: TemplateStatus,
    #[serde(default)]
    pub accent_colour: String,
    #[serde(with = "iso_date")]
    pub updated_on: Date,
    #[serde(default)]
    pub usage_count: Option<i64>,
}

/// One screen's worth of records, as produced by a fetch or a fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenRows {
    AmlCases(Vec<AmlCase>),
    Clients(Vec<Client>),
    Invoices(Vec<Invoice>),
    Tasks(Vec<PracticeTask>),
    QualityReviews(Vec<QualityReview>),
    Templates(Vec<BrandingTemplate>),
}

impl ScreenRows {
    pub const fn kind(&self) -> ScreenKind {
        match self {
            Self::AmlCases(_) => ScreenKind::AmlCases,
            Self::Clients(_) => ScreenKind::Clients,
            Self::Invoices(_) => ScreenKind::Invoices,
            Self::Tasks(_) => ScreenKind::Tasks,
            Self::QualityReviews(_) => ScreenKind::QualityReviews,
            Self::Templates(_) => ScreenKind::Templates,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::AmlCases(rows) => rows.len(),
            Self::Clients(rows) => rows.len(),
            Self::Invoices(rows) => rows.len(),
            Self::Tasks(rows) => rows.len(),
            Self::QualityReviews(rows) => rows.len(),
            Self::Templates(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::{AmlCase, CaseStatus, HttpMethod, Invoice, RiskLevel, ScreenKind};
    use time::{Date, Month};

    #[test]
    fn closed_enum_parse_is_strict_and_from_raw_is_total() {
        assert_eq!(CaseStatus::parse("in_review"), Some(CaseStatus::InReview));
        assert_eq!(CaseStatus::parse("IN_REVIEW"), None);
        assert_eq!(CaseStatus::from_raw("frozen"), CaseStatus::Unknown);
        assert_eq!(CaseStatus::from_raw(""), CaseStatus::Unknown);
        assert!(!CaseStatus::ALL.contains(&CaseStatus::Unknown));
    }

    #[test]
    fn closed_enum_wire_names_round_trip_through_as_str() {
        for status in CaseStatus::ALL {
            assert_eq!(CaseStatus::parse(status.as_str()), Some(*status));
        }
        for risk in RiskLevel::ALL {
            assert_eq!(RiskLevel::parse(risk.as_str()), Some(*risk));
        }
    }

    #[test]
    fn unknown_wire_status_deserializes_to_unknown_variant() {
        let raw = r#"{
            "id": 3,
            "reference": "AML-0003",
            "clientName": "Harbour Lane Ltd",
            "caseType": "onboarding",
            "status": "frozen_by_regulator",
            "risk": "high",
            "openedOn": "2026-02-01"
        }"#;
        let case: AmlCase = serde_json::from_str(raw).expect("decode case");
        assert_eq!(case.status, CaseStatus::Unknown);
        assert_eq!(case.risk, RiskLevel::High);
        assert_eq!(case.due_on, None);
        assert!(case.assigned_to.is_empty());
        assert_eq!(
            case.opened_on,
            Date::from_calendar_date(2026, Month::February, 1).expect("valid date")
        );
    }

    #[test]
    fn invoice_dates_serialize_as_iso_days() {
        let raw = r#"{
            "id": 9,
            "number": "INV-1009",
            "clientName": "Fenwick & Daughters",
            "service": "payroll",
            "status": "overdue",
            "amountPence": 42000,
            "daysOverdue": 12,
            "issuedOn": "2026-01-05",
            "dueOn": "2026-02-04"
        }"#;
        let invoice: Invoice = serde_json::from_str(raw).expect("decode invoice");
        let encoded = serde_json::to_value(&invoice).expect("encode invoice");
        assert_eq!(encoded["issuedOn"], "2026-01-05");
        assert_eq!(encoded["status"], "overdue");
    }

    #[test]
    fn screen_kind_parse_round_trips() {
        for kind in ScreenKind::ALL {
            assert_eq!(ScreenKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ScreenKind::parse("payroll_runs"), None);
    }

    #[test]
    fn quality_reviews_use_post_search_endpoint() {
        let endpoint = ScreenKind::QualityReviews.default_endpoint();
        assert_eq!(endpoint.method, HttpMethod::Post);
        assert_eq!(ScreenKind::Clients.default_endpoint().method, HttpMethod::Get);
    }
}
