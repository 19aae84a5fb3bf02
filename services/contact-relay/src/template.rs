// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Rendering of the notification email sent to the site owner.

use crate::validator::ContactSubmission;

/// Escape the five HTML-significant characters.
pub fn escape_html(unsafe_text: &str) -> String {
    let mut escaped = String::with_capacity(unsafe_text.len());
    for c in unsafe_text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Subject line and HTML body for one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactEmail {
    pub subject: String,
    pub html: String,
}

impl ContactEmail {
    /// Render a submission. Every user-supplied value is escaped.
    pub fn compose(submission: &ContactSubmission) -> Self {
        let name = escape_html(&submission.name);
        let email = escape_html(&submission.email);
        let subject = escape_html(&submission.subject);
        let message = escape_html(&submission.message).replace('\n', "<br>");

        let html = format!(
            "\n<h2>New Contact Form Submission</h2>\n\
             <p><strong>From:</strong> {name}</p>\n\
             <p><strong>Email:</strong> {email}</p>\n\
             <p><strong>Subject:</strong> {subject}</p>\n\
             <hr />\n\
             <p><strong>Message:</strong></p>\n\
             <p>{message}</p>\n"
        );

        Self {
            subject: format!("Portfolio Contact: {subject}"),
            html,
        }
    }
}
