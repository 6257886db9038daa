// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::model::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BadgeColor {
    Green,
    Amber,
    Red,
    Blue,
    Purple,
    Gray,
}

impl BadgeColor {
    pub const DEFAULT: Self = Self::Gray;

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Amber => "amber",
            Self::Red => "red",
            Self::Blue => "blue",
            Self::Purple => "purple",
            Self::Gray => "gray",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    pub label: &'static str,
    pub color: BadgeColor,
}

/// An enum value that can be drawn as a colored badge.
///
/// `color` must be an exhaustive match with an `Unknown` arm mapped to
/// [`BadgeColor::DEFAULT`].
pub trait BadgeStatus: Copy + Eq + std::fmt::Debug {
    fn label(self) -> &'static str;
    fn color(self) -> BadgeColor;
    fn wire(self) -> &'static str;

    fn badge(self) -> Badge {
        Badge {
            label: self.label(),
            color: self.color(),
        }
    }
}

impl BadgeStatus for CaseStatus {
    fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InReview => "in review",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Escalated => "escalated",
            Self::Unknown => "unknown",
        }
    }

    fn color(self) -> BadgeColor {
        match self {
            Self::Pending => BadgeColor::Amber,
            Self::InReview => BadgeColor::Blue,
            Self::Approved => BadgeColor::Green,
            Self::Rejected => BadgeColor::Red,
            Self::Escalated => BadgeColor::Purple,
            Self::Unknown => BadgeColor::DEFAULT,
        }
    }

    fn wire(self) -> &'static str {
        self.as_str()
    }
}

impl BadgeStatus for RiskLevel {
    fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Unknown => "unrated",
        }
    }

    fn color(self) -> BadgeColor {
        match self {
            Self::Low => BadgeColor::Green,
            Self::Medium => BadgeColor::Amber,
            Self::High => BadgeColor::Red,
            Self::Unknown => BadgeColor::DEFAULT,
        }
    }

    fn wire(self) -> &'static str {
        self.as_str()
    }
}

impl BadgeStatus for ClientStatus {
    fn label(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Onboarding => "onboarding",
            Self::Dormant => "dormant",
            Self::Archived => "archived",
            Self::Unknown => "unknown",
        }
    }

    fn color(self) -> BadgeColor {
        match self {
            Self::Active => BadgeColor::Green,
            Self::Onboarding => BadgeColor::Blue,
            Self::Dormant => BadgeColor::Amber,
            Self::Archived => BadgeColor::Gray,
            Self::Unknown => BadgeColor::DEFAULT,
        }
    }

    fn wire(self) -> &'static str {
        self.as_str()
    }
}

impl BadgeStatus for InvoiceStatus {
    fn label(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::Paid => "paid",
            Self::Overdue => "overdue",
            Self::Void => "void",
            Self::Unknown => "unknown",
        }
    }

    fn color(self) -> BadgeColor {
        match self {
            Self::Draft => BadgeColor::Gray,
            Self::Sent => BadgeColor::Blue,
            Self::Paid => BadgeColor::Green,
            Self::Overdue => BadgeColor::Red,
            Self::Void => BadgeColor::Purple,
            Self::Unknown => BadgeColor::DEFAULT,
        }
    }

    fn wire(self) -> &'static str {
        self.as_str()
    }
}

impl BadgeStatus for TaskStatus {
    fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "to do",
            Self::InProgress => "wip",
            Self::Blocked => "blocked",
            Self::Done => "done",
            Self::Unknown => "unknown",
        }
    }

    fn color(self) -> BadgeColor {
        match self {
            Self::NotStarted => BadgeColor::Gray,
            Self::InProgress => BadgeColor::Blue,
            Self::Blocked => BadgeColor::Red,
            Self::Done => BadgeColor::Green,
            Self::Unknown => BadgeColor::DEFAULT,
        }
    }

    fn wire(self) -> &'static str {
        self.as_str()
    }
}

impl BadgeStatus for TaskPriority {
    fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::Urgent => "urgent",
            Self::Unknown => "unset",
        }
    }

    fn color(self) -> BadgeColor {
        match self {
            Self::Low => BadgeColor::Gray,
            Self::Normal => BadgeColor::Blue,
            Self::Urgent => BadgeColor::Red,
            Self::Unknown => BadgeColor::DEFAULT,
        }
    }

    fn wire(self) -> &'static str {
        self.as_str()
    }
}

impl BadgeStatus for ReviewStatus {
    fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "passed",
            Self::Rejected => "failed",
            Self::Unknown => "unknown",
        }
    }

    fn color(self) -> BadgeColor {
        match self {
            Self::Pending => BadgeColor::Amber,
            Self::Approved => BadgeColor::Green,
            Self::Rejected => BadgeColor::Red,
            Self::Unknown => BadgeColor::DEFAULT,
        }
    }

    fn wire(self) -> &'static str {
        self.as_str()
    }
}

impl BadgeStatus for TemplateStatus {
    fn label(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "live",
            Self::Archived => "archived",
            Self::Unknown => "unknown",
        }
    }

    fn color(self) -> BadgeColor {
        match self {
            Self::Draft => BadgeColor::Amber,
            Self::Published => BadgeColor::Green,
            Self::Archived => BadgeColor::Gray,
            Self::Unknown => BadgeColor::DEFAULT,
        }
    }

    fn wire(self) -> &'static str {
        self.as_str()
    }
}

/// Badge color for a raw status string on the given screen. Total over all
/// inputs: anything outside the screen's status enumeration maps to
/// [`BadgeColor::DEFAULT`].
pub fn status_color(screen: ScreenKind, raw: &str) -> BadgeColor {
    match screen {
        ScreenKind::AmlCases => CaseStatus::from_raw(raw).color(),
        ScreenKind::Clients => ClientStatus::from_raw(raw).color(),
        ScreenKind::Invoices => InvoiceStatus::from_raw(raw).color(),
        ScreenKind::Tasks => TaskStatus::from_raw(raw).color(),
        ScreenKind::QualityReviews => ReviewStatus::from_raw(raw).color(),
        ScreenKind::Templates => TemplateStatus::from_raw(raw).color(),
    }
}

#[cfg(test)]
mod tests {
    use super::{BadgeColor, BadgeStatus, status_color};
    use crate::model::{CaseStatus, InvoiceStatus, ScreenKind};

    #[test]
    fn status_color_is_total_for_unexpected_values() {
        for screen in ScreenKind::ALL {
            for raw in ["", "PENDING", "archived-ish", "🙃", "approved\n"] {
                assert_eq!(
                    status_color(screen, raw),
                    BadgeColor::DEFAULT,
                    "screen {} raw {raw:?}",
                    screen.as_str()
                );
            }
        }
    }

    #[test]
    fn known_statuses_map_to_their_palette_color() {
        assert_eq!(status_color(ScreenKind::AmlCases, "pending"), BadgeColor::Amber);
        assert_eq!(status_color(ScreenKind::AmlCases, "rejected"), BadgeColor::Red);
        assert_eq!(status_color(ScreenKind::Invoices, "paid"), BadgeColor::Green);
        assert_eq!(status_color(ScreenKind::Templates, "published"), BadgeColor::Green);
    }

    #[test]
    fn unknown_variant_badge_uses_default_color() {
        let badge = CaseStatus::Unknown.badge();
        assert_eq!(badge.label, "unknown");
        assert_eq!(badge.color, BadgeColor::DEFAULT);
        assert_eq!(InvoiceStatus::from_raw("written_off").badge().color, BadgeColor::Gray);
    }
}
