// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use ledgerdesk_app::*;
use std::path::PathBuf;
use time::macros::date;
use time::{Date, Duration};

const COMPANY_STEMS: [&str; 16] = [
    "Albion", "Harbour", "Fenwick", "Quayside", "Northgate", "Greenway", "Kestrel", "Marsh",
    "Ashdown", "Bramley", "Calder", "Dunmore", "Elmstead", "Foxley", "Wrekin", "Tamar",
];

const COMPANY_TRADES: [&str; 10] = [
    "Bakery",
    "Motors",
    "Joinery",
    "Dental",
    "Lettings",
    "Florists",
    "Logistics",
    "Brewing",
    "Architects",
    "Veterinary",
];

const COMPANY_SUFFIXES: [&str; 4] = ["Ltd", "LLP", "& Co", "Holdings Ltd"];

const STAFF: [&str; 10] = [
    "Priya Shah",
    "Tom Hughes",
    "Amelia Clarke",
    "Helen Ward",
    "David Okafor",
    "Rhys Evans",
    "Fiona Grant",
    "Callum Reid",
    "Nadia Begum",
    "Owen Price",
];

const TASK_TITLES: [&str; 8] = [
    "Year-end accounts",
    "VAT return",
    "Self assessment",
    "Payroll run",
    "Confirmation statement",
    "Corporation tax return",
    "Management accounts",
    "P11D submission",
];

const ACCENTS: [&str; 6] = [
    "#1f6feb", "#2da44e", "#bf3989", "#d29922", "#6e7781", "#0a3069",
];

struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// Seeded generator of practice records. The same seed always yields the
/// same sequence.
pub struct PracticeFaker {
    rng: DeterministicRng,
    next_id: i64,
}

impl PracticeFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            next_id: 1,
        }
    }

    pub fn company_name(&mut self) -> String {
        format!(
            "{} {} {}",
            self.pick(&COMPANY_STEMS),
            self.pick(&COMPANY_TRADES),
            self.pick(&COMPANY_SUFFIXES),
        )
    }

    pub fn aml_case(&mut self) -> AmlCase {
        let id = self.take_id();
        let opened_on = self.date_within(365);
        AmlCase {
            id: CaseId::new(id),
            reference: format!("AML-{id:04}"),
            client_name: self.company_name(),
            case_type: self.pick_enum(CaseType::ALL),
            status: self.pick_enum(CaseStatus::ALL),
            risk: self.pick_enum(RiskLevel::ALL),
            risk_score: self.maybe(|faker| faker.int_range(0, 100)),
            assigned_to: self.pick(&STAFF).to_owned(),
            opened_on,
            due_on: self.maybe(|faker| opened_on + faker.days_up_to(60)),
        }
    }

    pub fn client(&mut self) -> Client {
        let id = self.take_id();
        let name = self.company_name();
        let code = format!(
            "{}{id:02}",
            name.chars()
                .filter(char::is_ascii_alphabetic)
                .take(3)
                .collect::<String>()
                .to_uppercase()
        );
        Client {
            id: ClientId::new(id),
            code,
            name,
            entity_type: self.pick_enum(EntityType::ALL),
            status: self.pick_enum(ClientStatus::ALL),
            manager: self.pick(&STAFF).to_owned(),
            annual_fee_pence: self.maybe(|faker| faker.int_range(50_000, 2_500_000)),
            client_since: self.maybe(|faker| faker.date_within(3650)),
        }
    }

    pub fn invoice(&mut self) -> Invoice {
        let id = self.take_id();
        let status = self.pick_enum(InvoiceStatus::ALL);
        let issued_on = self.date_within(180);
        Invoice {
            id: InvoiceId::new(id),
            number: format!("INV-{:04}", 1000 + id),
            client_name: self.company_name(),
            service: self.pick_enum(ServiceLine::ALL),
            status,
            amount_pence: self.int_range(5_000, 1_000_000),
            days_overdue: (status == InvoiceStatus::Overdue).then(|| self.int_range(1, 90)),
            issued_on,
            due_on: issued_on + Duration::days(30),
        }
    }

    pub fn task(&mut self) -> PracticeTask {
        let id = self.take_id();
        PracticeTask {
            id: TaskId::new(id),
            title: self.pick(&TASK_TITLES).to_owned(),
            client_name: self.company_name(),
            assignee: self.pick(&STAFF).to_owned(),
            priority: self.pick_enum(TaskPriority::ALL),
            status: self.pick_enum(TaskStatus::ALL),
            due_on: self.maybe(|faker| faker.date_within(120)),
            estimate_hours: self.maybe(|faker| faker.int_range(1, 40)),
        }
    }

    pub fn quality_review(&mut self) -> QualityReview {
        let id = self.take_id();
        let status = self.pick_enum(ReviewStatus::ALL);
        let reviewed = status != ReviewStatus::Pending;
        QualityReview {
            id: ReviewId::new(id),
            file_reference: format!("QR-{id:03}"),
            client_name: self.company_name(),
            reviewer: self.pick(&STAFF).to_owned(),
            area: self.pick_enum(ReviewArea::ALL),
            status,
            score: reviewed.then(|| self.int_range(40, 100)),
            reviewed_on: reviewed.then(|| self.date_within(90)),
        }
    }

    pub fn template(&mut self) -> BrandingTemplate {
        let id = self.take_id();
        let kind = self.pick_enum(TemplateKind::ALL);
        let prefix = self.pick(&COMPANY_STEMS);
        BrandingTemplate {
            id: TemplateId::new(id),
            name: format!("{prefix} {}", kind.as_str()),
            kind,
            status: self.pick_enum(TemplateStatus::ALL),
            accent_colour: self.pick(&ACCENTS).to_owned(),
            updated_on: self.date_within(720),
            usage_count: self.maybe(|faker| faker.int_range(0, 2_000)),
        }
    }

    /// `count` records for `screen`.
    pub fn rows(&mut self, screen: ScreenKind, count: usize) -> ScreenRows {
        match screen {
            ScreenKind::AmlCases => ScreenRows::AmlCases(self.many(count, Self::aml_case)),
            ScreenKind::Clients => ScreenRows::Clients(self.many(count, Self::client)),
            ScreenKind::Invoices => ScreenRows::Invoices(self.many(count, Self::invoice)),
            ScreenKind::Tasks => ScreenRows::Tasks(self.many(count, Self::task)),
            ScreenKind::QualityReviews => {
                ScreenRows::QualityReviews(self.many(count, Self::quality_review))
            }
            ScreenKind::Templates => ScreenRows::Templates(self.many(count, Self::template)),
        }
    }

    fn many<T>(&mut self, count: usize, make: fn(&mut Self) -> T) -> Vec<T> {
        (0..count).map(|_| make(self)).collect()
    }

    fn take_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn pick_enum<T: Copy>(&mut self, items: &[T]) -> T {
        items[self.rng.int_n(items.len())]
    }

    fn maybe<T>(&mut self, make: impl FnOnce(&mut Self) -> T) -> Option<T> {
        if self.rng.bool() { Some(make(self)) } else { None }
    }

    fn int_range(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = max - min + 1;
        min + (self.rng.next_u64() % (span as u64)) as i64
    }

    fn days_up_to(&mut self, days: i64) -> Duration {
        Duration::days(self.int_range(0, days))
    }

    fn date_within(&mut self, days: i64) -> Date {
        reference_date() - self.days_up_to(days)
    }
}

/// JSON array body for `rows`, as the practice API would send it.
pub fn rows_json(rows: &ScreenRows) -> Result<String> {
    let body = match rows {
        ScreenRows::AmlCases(items) => serde_json::to_string(items),
        ScreenRows::Clients(items) => serde_json::to_string(items),
        ScreenRows::Invoices(items) => serde_json::to_string(items),
        ScreenRows::Tasks(items) => serde_json::to_string(items),
        ScreenRows::QualityReviews(items) => serde_json::to_string(items),
        ScreenRows::Templates(items) => serde_json::to_string(items),
    };
    body.context("encode rows as json")
}

pub fn temp_config_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let path = dir.path().join("config.toml");
    Ok((dir, path))
}

pub fn reference_date() -> Date {
    date!(2026 - 01 - 15)
}
