//! Invitation e-mail bodies.

use super::OutgoingEmail;
use crate::types::Invitation;

/// Escape text for inclusion in HTML.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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

/// Absolute links pass through; relative ones are joined to `app_url`.
pub fn resolve_link(link: &str, app_url: &str) -> String {
    if link.starts_with("http://") || link.starts_with("https://") {
        return link.to_string();
    }
    format!(
        "{}/{}",
        app_url.trim_end_matches('/'),
        link.trim_start_matches('/')
    )
}

/// Render the invitation as an HTML + plaintext e-mail.
pub fn render_invitation(invitation: &Invitation, app_url: &str) -> OutgoingEmail {
    let accept_link = resolve_link(&invitation.accept_link, app_url);
    let app_url = app_url.trim_end_matches('/');

    let text = format!(
        "You've been invited to join {team} on Codiny\n\n\
         {inviter} has invited you to join the team \"{team}\" as {role}.\n\n\
         Accept the invitation:\n{link}\n\n\
         If you weren't expecting this invitation, you can ignore this email.\n\n\
         Codiny - {app_url}\n",
        team = invitation.team_name,
        inviter = invitation.invited_by,
        role = invitation.role,
        link = accept_link,
        app_url = app_url,
    );

    let html = format!(
        r#"<!DOCTYPE html>
<html>
  <body style="font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; color: #1f2937; background: #f9fafb; padding: 24px;">
    <div style="max-width: 560px; margin: 0 auto; background: #ffffff; border-radius: 8px; padding: 32px;">
      <h2 style="margin-top: 0;">You've been invited to join {team}</h2>
      <p><strong>{inviter}</strong> has invited you to join the team <strong>{team}</strong> on Codiny as <strong>{role}</strong>.</p>
      <p style="margin: 32px 0;">
        <a href="{link}" style="background: #2563eb; color: #ffffff; padding: 12px 24px; border-radius: 6px; text-decoration: none;">Accept invitation</a>
      </p>
      <p style="font-size: 13px; color: #6b7280;">Or paste this link into your browser:<br>{link}</p>
      <p style="font-size: 13px; color: #6b7280;">If you weren't expecting this invitation, you can ignore this email.</p>
      <hr style="border: none; border-top: 1px solid #e5e7eb;">
      <p style="font-size: 12px; color: #9ca3af;"><a href="{app_url}" style="color: #9ca3af;">Codiny</a></p>
    </div>
  </body>
</html>
"#,
        team = escape_html(&invitation.team_name),
        inviter = escape_html(&invitation.invited_by),
        role = escape_html(&invitation.role),
        link = escape_html(&accept_link),
        app_url = escape_html(app_url),
    );

    OutgoingEmail {
        to: invitation.to.clone(),
        subject: invitation.subject.clone(),
        html,
        text,
    }
}
