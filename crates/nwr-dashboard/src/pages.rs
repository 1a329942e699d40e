//! Page bodies for the authenticated views.
//!
//! Pages render the identity and the panels its capabilities unlock. Para
//! records themselves are not part of this crate.

use nwr_core::{Capability, Identity};
use std::str::FromStr;

use crate::templates::{card, empty_state, html_escape, layout, role_badge};

/// Unit whose audit figures are broken down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditUnit {
    AllUnits,
    Headquarters,
}

impl AuditUnit {
    pub const ALL: [AuditUnit; 2] = [AuditUnit::AllUnits, AuditUnit::Headquarters];

    pub fn slug(&self) -> &'static str {
        match self {
            AuditUnit::AllUnits => "all-units",
            AuditUnit::Headquarters => "hq",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AuditUnit::AllUnits => "All Units",
            AuditUnit::Headquarters => "Headquarters",
        }
    }
}

impl FromStr for AuditUnit {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|unit| unit.slug() == s).ok_or(())
    }
}

/// Figure of the audit overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditMetric {
    OpeningBalance,
    AddedCases,
    ClosingBalance,
}

impl AuditMetric {
    pub const ALL: [AuditMetric; 3] = [
        AuditMetric::OpeningBalance,
        AuditMetric::AddedCases,
        AuditMetric::ClosingBalance,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            AuditMetric::OpeningBalance => "opening-balance",
            AuditMetric::AddedCases => "added-cases",
            AuditMetric::ClosingBalance => "closing-balance",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AuditMetric::OpeningBalance => "Opening Balance",
            AuditMetric::AddedCases => "Added Cases",
            AuditMetric::ClosingBalance => "Closing Balance",
        }
    }
}

impl FromStr for AuditMetric {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|metric| metric.slug() == s).ok_or(())
    }
}

fn page_header(title: &str, subtitle: &str) -> String {
    format!(
        r##"<div class="mb-8">
            <h2 class="text-3xl font-bold text-gray-900 mb-2">{}</h2>
            <p class="text-gray-600">{}</p>
        </div>"##,
        html_escape(title),
        html_escape(subtitle)
    )
}

fn back_link(href: &str, label: &str) -> String {
    format!(
        r#"<a href="{}" class="inline-flex items-center gap-2 text-sm text-gray-600 hover:text-gray-900 mb-6"><i class="fas fa-arrow-left"></i> {}</a>"#,
        html_escape(href),
        html_escape(label)
    )
}

fn tabs(active_emails: bool) -> String {
    let class = |active: bool| {
        if active {
            "bg-white shadow text-gray-900"
        } else {
            "text-gray-600 hover:text-gray-900"
        }
    };
    format!(
        r##"<div class="grid grid-cols-2 bg-gray-100 rounded-lg p-1 mb-6">
            <a href="/dashboard" class="text-center py-2 rounded-md {overview}"><i class="fas fa-chart-bar"></i> Overview</a>
            <a href="/emails" class="text-center py-2 rounded-md {emails}"><i class="fas fa-envelope"></i> Email Reminders</a>
        </div>"##,
        overview = class(!active_emails),
        emails = class(active_emails),
    )
}

/// Para actions the identity may perform, or nothing.
pub fn para_actions(identity: &Identity) -> String {
    let buttons: Vec<String> = [
        (Capability::UploadDocument, "upload", "Upload Document"),
        (Capability::EditPara, "edit", "Edit Para"),
        (Capability::AssignUser, "user-plus", "Assign User"),
    ]
    .into_iter()
    .filter(|(capability, _, _)| identity.can(*capability))
    .map(|(_, icon, label)| {
        format!(
            r#"<button type="button" class="w-full flex items-center gap-2 px-3 py-2 border rounded-md text-sm"><i class="fas fa-{icon}"></i> {label}</button>"#
        )
    })
    .collect();

    if buttons.is_empty() {
        return String::new();
    }
    card("Actions", &format!(r#"<div class="space-y-3">{}</div>"#, buttons.join("\n")))
}

/// Overview dashboard.
pub fn dashboard_page(identity: &Identity) -> String {
    let rows: String = AuditUnit::ALL
        .iter()
        .map(|unit| {
            let links: String = AuditMetric::ALL
                .iter()
                .map(|metric| {
                    format!(
                        r#"<a href="/audit/{}/{}" class="block p-4 border rounded-lg hover:bg-gray-50">{}</a>"#,
                        unit.slug(),
                        metric.slug(),
                        metric.label()
                    )
                })
                .collect();
            format!(
                r#"<div class="mb-6"><h4 class="font-medium text-gray-700 mb-2">{}</h4><div class="grid grid-cols-3 gap-4">{}</div></div>"#,
                unit.label(),
                links
            )
        })
        .collect();

    let sidebar = card(
        "Para Details",
        r#"<p class="text-gray-500 text-center">Select a para to view details</p>"#,
    );

    let content = format!(
        r##"{header}
        {tabs}
        <div class="flex gap-6">
            <div class="flex-1">{overview}</div>
            <aside class="w-80 space-y-4">{sidebar}</aside>
        </div>"##,
        header = page_header(
            "Audit Dashboard",
            "Overview of all audit activities and email communications"
        ),
        tabs = tabs(false),
        overview = card("Audit Overview", &rows),
        sidebar = sidebar,
    );
    layout("Dashboard", identity, &content)
}

/// History of one para.
pub fn para_history_page(identity: &Identity, para_id: &str) -> String {
    let details_href = format!("/para/{}/details", urlencoding::encode(para_id));
    let content = format!(
        r##"{back}
        {header}
        {history}"##,
        back = back_link("/dashboard", "Back to Dashboard"),
        header = page_header(&format!("Para {para_id}"), "Action history"),
        history = card(
            "Activity",
            &format!(
                r#"{}<a href="{details_href}" class="text-blue-600 hover:underline">View full details</a>"#,
                empty_state("history", "History", "Actions recorded against this para appear here.", None)
            )
        ),
    );
    layout("Para History", identity, &content)
}

/// Details of one para, with the actions the identity may take.
pub fn para_details_page(identity: &Identity, para_id: &str) -> String {
    let content = format!(
        r##"{back}
        {header}
        <div class="flex gap-6">
            <div class="flex-1">{details}</div>
            <aside class="w-80 space-y-4">{actions}</aside>
        </div>"##,
        back = back_link(&format!("/para/{}", urlencoding::encode(para_id)), "Back to History"),
        header = page_header(&format!("Para {para_id}"), "Details"),
        details = card(
            "Details",
            &empty_state("file-alt", "Para Details", "Subject, status and department of the para.", None)
        ),
        actions = para_actions(identity),
    );
    layout("Para Details", identity, &content)
}

/// Breakdown of one audit figure for one unit.
pub fn audit_breakdown_page(identity: &Identity, unit: AuditUnit, metric: AuditMetric) -> String {
    let content = format!(
        r##"{back}
        {header}
        {cases}"##,
        back = back_link("/dashboard", "Back to Dashboard"),
        header = page_header(&format!("{} - {}", unit.label(), metric.label()), "Audit breakdown"),
        cases = card(
            "Cases",
            &empty_state("folder-open", "Cases", "Paras counted in this figure appear here.", None)
        ),
    );
    layout("Audit Details", identity, &content)
}

/// Reminder-email panel.
pub fn emails_page(identity: &Identity) -> String {
    let content = format!(
        r##"{header}
        {tabs}
        {panel}"##,
        header = page_header(
            "Audit Dashboard",
            "Overview of all audit activities and email communications"
        ),
        tabs = tabs(true),
        panel = card(
            "Email Reminders",
            &format!(
                r#"<p class="text-sm text-gray-600 mb-4">Signed in as {} {}</p>{}"#,
                html_escape(&identity.username),
                role_badge(identity.role),
                empty_state(
                    "envelope",
                    "Reminders",
                    "Select overdue paras to compose reminders to department heads.",
                    None
                )
            )
        ),
    );
    layout("Email Reminders", identity, &content)
}
