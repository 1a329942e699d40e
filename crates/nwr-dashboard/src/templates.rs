//! HTML templates for the dashboard.
//!
//! Uses a simple `format!` template approach with Tailwind CSS.

use nwr_core::{Identity, Role};

/// Base HTML document.
fn document(title: &str, body: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - NWR Audit Central</title>
    <script src="https://cdn.tailwindcss.com"></script>
    <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.5.1/css/all.min.css">
</head>
{body}
</html>"##,
        title = html_escape(title),
        body = body,
    )
}

/// Page layout for authenticated views: navigation bar plus content.
pub fn layout(title: &str, identity: &Identity, content: &str) -> String {
    let body = format!(
        r##"<body class="bg-gray-50 min-h-screen">
    {nav}
    <main class="p-6">
        <div class="max-w-7xl mx-auto">
            {content}
        </div>
    </main>
</body>"##,
        nav = nav(identity),
        content = content,
    );
    document(title, &body)
}

/// Page layout for views shown without an identity.
pub fn bare_layout(title: &str, content: &str) -> String {
    let body = format!(
        r##"<body class="min-h-screen flex items-center justify-center bg-gradient-to-br from-blue-50 to-indigo-100 p-4">
    {content}
</body>"##
    );
    document(title, &body)
}

fn nav(identity: &Identity) -> String {
    format!(
        r##"<nav class="bg-white shadow-sm border-b border-gray-200">
        <div class="max-w-7xl mx-auto px-6 h-16 flex items-center justify-between">
            <a href="/dashboard" class="flex items-center gap-3">
                <span class="bg-blue-600 p-2 rounded-full text-white"><i class="fas fa-building"></i></span>
                <span class="text-xl font-bold text-gray-800">NWR Audit Central</span>
            </a>
            <div class="flex items-center gap-4">
                <div class="text-right">
                    <p class="text-sm font-medium text-gray-900">{username}</p>
                    <p class="text-xs text-gray-500">{department}</p>
                </div>
                {badge}
                <form method="POST" action="/logout">
                    <button type="submit" class="px-3 py-2 text-sm text-gray-600 hover:text-gray-900">
                        <i class="fas fa-sign-out-alt"></i> Logout
                    </button>
                </form>
            </div>
        </div>
    </nav>"##,
        username = html_escape(&identity.username),
        department = html_escape(identity.department_label()),
        badge = role_badge(identity.role),
    )
}

/// Colored badge naming a role.
pub fn role_badge(role: Role) -> String {
    let (color, label) = match role {
        Role::Admin => ("bg-purple-100 text-purple-800", "Admin"),
        Role::Audit => ("bg-blue-100 text-blue-800", "Audit"),
        Role::Department => ("bg-green-100 text-green-800", "Department"),
    };
    format!(r#"<span class="px-2 py-1 rounded-full text-xs font-medium {color}">{label}</span>"#)
}

/// Card with a heading.
pub fn card(title: &str, content: &str) -> String {
    format!(
        r##"<div class="bg-white rounded-lg shadow p-6">
            <h3 class="text-lg font-semibold text-gray-900 mb-4">{title}</h3>
            {content}
        </div>"##,
        title = html_escape(title),
    )
}

/// Centered message with an icon and an optional link.
pub fn empty_state(icon: &str, title: &str, message: &str, action: Option<(&str, &str)>) -> String {
    let action_html = action
        .map(|(label, href)| {
            format!(
                r#"<a href="{}" class="mt-4 inline-block px-4 py-2 bg-blue-600 text-white rounded-lg">{}</a>"#,
                html_escape(href),
                html_escape(label)
            )
        })
        .unwrap_or_default();

    format!(
        r##"<div class="text-center py-12">
            <i class="fas fa-{icon} text-4xl text-gray-400 mb-4"></i>
            <h3 class="text-lg font-medium text-gray-900">{title}</h3>
            <p class="text-gray-500 mt-1">{message}</p>
            {action_html}
        </div>"##,
        icon = icon,
        title = html_escape(title),
        message = html_escape(message),
    )
}

/// Shown when the guard forbids a view.
pub fn forbidden_page(identity: &Identity, message: &str) -> String {
    layout(
        "Access Restricted",
        identity,
        &card(
            "Access Restricted",
            &empty_state("lock", "Access Restricted", message, Some(("Back to Dashboard", "/dashboard"))),
        ),
    )
}

/// Shown for unknown routes and records.
pub fn not_found_page(what: &str) -> String {
    bare_layout(
        "Not Found",
        &format!(
            r##"<div class="bg-white rounded-lg shadow-xl p-8 max-w-md w-full">
        {}
    </div>"##,
            empty_state("exclamation-triangle", "404", what, Some(("Return to Home", "/")))
        ),
    )
}

/// Simple HTML escape function.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_layout_escapes_identity() {
        let identity = Identity {
            id: "9".into(),
            username: "<script>".into(),
            role: Role::Department,
            department: Some("R&D".into()),
        };
        let html = layout("Dashboard", &identity, "<p>body</p>");
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("R&amp;D"));
        assert!(html.contains("<p>body</p>"));
        assert!(html.contains("Dashboard - NWR Audit Central"));
    }
}
