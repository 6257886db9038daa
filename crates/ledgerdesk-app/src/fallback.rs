// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Sample records shown when the practice API cannot be reached.

use time::macros::date;

use crate::ids::*;
use crate::model::*;

pub fn rows_for(screen: ScreenKind) -> ScreenRows {
    match screen {
        ScreenKind::AmlCases => ScreenRows::AmlCases(aml_cases()),
        ScreenKind::Clients => ScreenRows::Clients(clients()),
        ScreenKind::Invoices => ScreenRows::Invoices(invoices()),
        ScreenKind::Tasks => ScreenRows::Tasks(tasks()),
        ScreenKind::QualityReviews => ScreenRows::QualityReviews(quality_reviews()),
        ScreenKind::Templates => ScreenRows::Templates(templates()),
    }
}

fn aml_case(
    id: i64,
    client_name: &str,
    case_type: CaseType,
    status: CaseStatus,
    risk: RiskLevel,
    risk_score: Option<i64>,
    assigned_to: &str,
) -> AmlCase {
    AmlCase {
        id: CaseId::new(id),
        reference: format!("AML-{id:04}"),
        client_name: client_name.to_owned(),
        case_type,
        status,
        risk,
        risk_score,
        assigned_to: assigned_to.to_owned(),
        opened_on: date!(2026 - 01 - 06),
        due_on: None,
    }
}

pub fn aml_cases() -> Vec<AmlCase> {
    let mut cases = vec![
        aml_case(
            1,
            "Albion Bakery Ltd",
            CaseType::Onboarding,
            CaseStatus::Pending,
            RiskLevel::Low,
            Some(18),
            "Priya Shah",
        ),
        aml_case(
            2,
            "Marsh & Co LLP",
            CaseType::PeriodicReview,
            CaseStatus::InReview,
            RiskLevel::Medium,
            Some(46),
            "Tom Hughes",
        ),
        aml_case(
            3,
            "Quayside Holdings Ltd",
            CaseType::EnhancedDueDiligence,
            CaseStatus::Escalated,
            RiskLevel::High,
            Some(82),
            "Priya Shah",
        ),
        aml_case(
            4,
            "Greenway Florists",
            CaseType::Onboarding,
            CaseStatus::Approved,
            RiskLevel::Low,
            Some(12),
            "Amelia Clarke",
        ),
        aml_case(
            5,
            "Northgate Motors Ltd",
            CaseType::SourceOfFunds,
            CaseStatus::Rejected,
            RiskLevel::High,
            None,
            "Tom Hughes",
        ),
    ];
    cases[0].due_on = Some(date!(2026 - 02 - 06));
    cases[1].opened_on = date!(2025 - 11 - 20);
    cases[1].due_on = Some(date!(2026 - 01 - 31));
    cases[2].opened_on = date!(2025 - 12 - 02);
    cases[2].due_on = Some(date!(2026 - 01 - 16));
    cases[3].opened_on = date!(2025 - 10 - 14);
    cases[4].opened_on = date!(2025 - 09 - 30);
    cases
}

fn client(
    id: i64,
    code: &str,
    name: &str,
    entity_type: EntityType,
    status: ClientStatus,
    manager: &str,
    annual_fee_pence: Option<i64>,
) -> Client {
    Client {
        id: ClientId::new(id),
        code: code.to_owned(),
        name: name.to_owned(),
        entity_type,
        status,
        manager: manager.to_owned(),
        annual_fee_pence,
        client_since: None,
    }
}

pub fn clients() -> Vec<Client> {
    let mut clients = vec![
        client(
            1,
            "ALB01",
            "Albion Bakery Ltd",
            EntityType::LimitedCompany,
            ClientStatus::Onboarding,
            "Priya Shah",
            Some(240_000),
        ),
        client(
            2,
            "MAR07",
            "Marsh & Co LLP",
            EntityType::Llp,
            ClientStatus::Active,
            "Tom Hughes",
            Some(1_150_000),
        ),
        client(
            3,
            "QUA02",
            "Quayside Holdings Ltd",
            EntityType::LimitedCompany,
            ClientStatus::Active,
            "Priya Shah",
            Some(860_000),
        ),
        client(
            4,
            "GRE11",
            "Greenway Florists",
            EntityType::SoleTrader,
            ClientStatus::Active,
            "Amelia Clarke",
            Some(95_000),
        ),
        client(
            5,
            "STM03",
            "St Mary's Food Bank",
            EntityType::Charity,
            ClientStatus::Dormant,
            "Amelia Clarke",
            None,
        ),
    ];
    clients[1].client_since = Some(date!(2019 - 04 - 01));
    clients[2].client_since = Some(date!(2021 - 09 - 15));
    clients[3].client_since = Some(date!(2023 - 02 - 10));
    clients[4].client_since = Some(date!(2017 - 06 - 30));
    clients
}

fn invoice(
    id: i64,
    client_name: &str,
    service: ServiceLine,
    status: InvoiceStatus,
    amount_pence: i64,
    days_overdue: Option<i64>,
) -> Invoice {
    Invoice {
        id: InvoiceId::new(id),
        number: format!("INV-{:04}", 1000 + id),
        client_name: client_name.to_owned(),
        service,
        status,
        amount_pence,
        days_overdue,
        issued_on: date!(2026 - 01 - 02),
        due_on: date!(2026 - 02 - 01),
    }
}

pub fn invoices() -> Vec<Invoice> {
    let mut invoices = vec![
        invoice(
            1,
            "Marsh & Co LLP",
            ServiceLine::Accounts,
            InvoiceStatus::Paid,
            285_000,
            None,
        ),
        invoice(
            2,
            "Quayside Holdings Ltd",
            ServiceLine::Tax,
            InvoiceStatus::Overdue,
            142_500,
            Some(21),
        ),
        invoice(
            3,
            "Greenway Florists",
            ServiceLine::Bookkeeping,
            InvoiceStatus::Sent,
            38_000,
            None,
        ),
        invoice(
            4,
            "Albion Bakery Ltd",
            ServiceLine::Payroll,
            InvoiceStatus::Draft,
            19_500,
            None,
        ),
        invoice(
            5,
            "Quayside Holdings Ltd",
            ServiceLine::Advisory,
            InvoiceStatus::Overdue,
            60_000,
            Some(7),
        ),
    ];
    invoices[1].issued_on = date!(2025 - 11 - 28);
    invoices[1].due_on = date!(2025 - 12 - 28);
    invoices[4].issued_on = date!(2025 - 12 - 12);
    invoices[4].due_on = date!(2026 - 01 - 11);
    invoices
}

fn task(
    id: i64,
    title: &str,
    client_name: &str,
    assignee: &str,
    priority: TaskPriority,
    status: TaskStatus,
    estimate_hours: Option<i64>,
) -> PracticeTask {
    PracticeTask {
        id: TaskId::new(id),
        title: title.to_owned(),
        client_name: client_name.to_owned(),
        assignee: assignee.to_owned(),
        priority,
        status,
        due_on: None,
        estimate_hours,
    }
}

pub fn tasks() -> Vec<PracticeTask> {
    let mut tasks = vec![
        task(
            1,
            "Year-end accounts",
            "Marsh & Co LLP",
            "Tom Hughes",
            TaskPriority::Normal,
            TaskStatus::InProgress,
            Some(12),
        ),
        task(
            2,
            "VAT return Q4",
            "Quayside Holdings Ltd",
            "Priya Shah",
            TaskPriority::Urgent,
            TaskStatus::Blocked,
            Some(3),
        ),
        task(
            3,
            "Self assessment",
            "Greenway Florists",
            "Amelia Clarke",
            TaskPriority::Normal,
            TaskStatus::NotStarted,
            Some(4),
        ),
        task(
            4,
            "Payroll setup",
            "Albion Bakery Ltd",
            "Priya Shah",
            TaskPriority::Low,
            TaskStatus::Done,
            None,
        ),
    ];
    tasks[0].due_on = Some(date!(2026 - 03 - 31));
    tasks[1].due_on = Some(date!(2026 - 02 - 07));
    tasks[2].due_on = Some(date!(2026 - 01 - 31));
    tasks
}

fn review(
    id: i64,
    client_name: &str,
    reviewer: &str,
    area: ReviewArea,
    status: ReviewStatus,
    score: Option<i64>,
) -> QualityReview {
    QualityReview {
        id: ReviewId::new(id),
        file_reference: format!("QR-{id:03}"),
        client_name: client_name.to_owned(),
        reviewer: reviewer.to_owned(),
        area,
        status,
        score,
        reviewed_on: None,
    }
}

pub fn quality_reviews() -> Vec<QualityReview> {
    let mut reviews = vec![
        review(
            1,
            "Marsh & Co LLP",
            "Helen Ward",
            ReviewArea::Accounts,
            ReviewStatus::Approved,
            Some(92),
        ),
        review(
            2,
            "Quayside Holdings Ltd",
            "Helen Ward",
            ReviewArea::Aml,
            ReviewStatus::Rejected,
            Some(58),
        ),
        review(
            3,
            "Greenway Florists",
            "David Okafor",
            ReviewArea::Tax,
            ReviewStatus::Pending,
            None,
        ),
        review(
            4,
            "Albion Bakery Ltd",
            "David Okafor",
            ReviewArea::Payroll,
            ReviewStatus::Approved,
            Some(85),
        ),
    ];
    reviews[0].reviewed_on = Some(date!(2026 - 01 - 09));
    reviews[1].reviewed_on = Some(date!(2026 - 01 - 12));
    reviews[3].reviewed_on = Some(date!(2025 - 12 - 18));
    reviews
}

fn template(
    id: i64,
    name: &str,
    kind: TemplateKind,
    status: TemplateStatus,
    accent_colour: &str,
    usage_count: Option<i64>,
) -> BrandingTemplate {
    BrandingTemplate {
        id: TemplateId::new(id),
        name: name.to_owned(),
        kind,
        status,
        accent_colour: accent_colour.to_owned(),
        updated_on: date!(2026 - 01 - 05),
        usage_count,
    }
}

pub fn templates() -> Vec<BrandingTemplate> {
    let mut templates = vec![
        template(
            1,
            "Standard payslip",
            TemplateKind::Payslip,
            TemplateStatus::Published,
            "#1f6feb",
            Some(412),
        ),
        template(
            2,
            "Standard invoice",
            TemplateKind::Invoice,
            TemplateStatus::Published,
            "#1f6feb",
            Some(986),
        ),
        template(
            3,
            "Charity invoice",
            TemplateKind::Invoice,
            TemplateStatus::Draft,
            "#2da44e",
            None,
        ),
        template(
            4,
            "Legacy payslip",
            TemplateKind::Payslip,
            TemplateStatus::Archived,
            "#6e7781",
            Some(57),
        ),
    ];
    templates[3].updated_on = date!(2024 - 03 - 28);
    templates
}
