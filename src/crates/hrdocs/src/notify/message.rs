//! Document-ready email message and its HTML body

use serde::Serialize;

use crate::notify::NotifyError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub document_title: String,
    pub document_content: String,
    pub task_title: String,
}

impl EmailMessage {
    /// Message announcing a freshly generated document
    pub fn document_ready(
        to: impl Into<String>,
        task_title: impl Into<String>,
        document_title: impl Into<String>,
        document_content: impl Into<String>,
    ) -> Self {
        let document_title = document_title.into();
        Self {
            to: to.into(),
            subject: format!("HR Document Ready: {document_title}"),
            document_title,
            document_content: document_content.into(),
            task_title: task_title.into(),
        }
    }

    /// Structural recipient check: one `@` with text on both sides, a dot in
    /// the domain, no whitespace.
    pub fn validate(&self) -> Result<(), NotifyError> {
        let to = self.to.trim();
        let valid = match to.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.contains('@')
                    && domain.contains('.')
                    && !domain.starts_with('.')
                    && !domain.ends_with('.')
                    && !to.chars().any(char::is_whitespace)
            }
            None => false,
        };
        if !valid {
            return Err(NotifyError::InvalidRecipient(self.to.clone()));
        }
        if self.subject.trim().is_empty() {
            return Err(NotifyError::InvalidMessage("empty subject".to_string()));
        }
        Ok(())
    }

    /// HTML body; each content line becomes one paragraph
    pub fn render_html(&self) -> String {
        let paragraphs: String = self
            .document_content
            .split('\n')
            .map(|line| format!("<p style=\"margin: 0 0 10px 0;\">{}</p>", escape_html(line)))
            .collect();

        format!(
            r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
  </head>
  <body style="font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Arial, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px;">
    <div style="background: #667eea; padding: 30px; border-radius: 10px 10px 0 0; text-align: center;">
      <h1 style="color: white; margin: 0; font-size: 28px;">HR Document Ready</h1>
    </div>
    <div style="background: #f9f9f9; padding: 30px; border: 1px solid #e0e0e0; border-top: none; border-radius: 0 0 10px 10px;">
      <p style="font-size: 16px; margin-bottom: 20px;">Your HR document has been generated and is ready for review.</p>
      <div style="background: white; padding: 20px; border-radius: 8px; margin: 20px 0; border-left: 4px solid #667eea;">
        <h2 style="margin: 0 0 10px 0; color: #667eea; font-size: 20px;">{task_title}</h2>
        <p style="margin: 0; color: #666; font-size: 14px;">Document Type: {document_title}</p>
      </div>
      <div style="background: white; padding: 25px; border-radius: 8px; margin: 20px 0;">
        <h3 style="margin: 0 0 15px 0; color: #333; font-size: 18px;">Document Content</h3>
        <div style="color: #555; font-size: 14px; line-height: 1.8;">{paragraphs}</div>
      </div>
      <p style="margin-top: 30px; text-align: center; color: #999; font-size: 12px;">This is an automated message from your HR Document System</p>
    </div>
  </body>
</html>"#,
            task_title = escape_html(&self.task_title),
            document_title = escape_html(&self.document_title),
            paragraphs = paragraphs,
        )
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
