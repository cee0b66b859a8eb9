use super::EmailMessage;

/// Data for the employee invitation email
#[derive(Debug, Clone)]
pub struct EmployeeInviteEmail {
    pub to: String,
    pub first_name: String,
    pub last_name: String,
    pub company_name: String,
    pub inviter_name: String,
    pub invite_url: String,
    pub ttl_days: i64,
}

/// Render the invitation email (HTML + text)
pub fn render_employee_invite(data: &EmployeeInviteEmail) -> EmailMessage {
    let subject = format!("You've been invited to join {}", data.company_name);

    let first_name = escape_html(&data.first_name);
    let last_name = escape_html(&data.last_name);
    let company = escape_html(&data.company_name);
    let inviter = escape_html(&data.inviter_name);
    let url = escape_html(&data.invite_url);
    let days = data.ttl_days;

    let html = format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Employee Invitation</title>
    <style>
      body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}
      .container {{ max-width: 600px; margin: 0 auto; padding: 20px; }}
      .header {{ background: #f8f9fa; padding: 20px; text-align: center; border-radius: 8px 8px 0 0; }}
      .content {{ background: #fff; padding: 30px; border: 1px solid #e9ecef; }}
      .button {{ display: inline-block; background: #007bff; color: white; padding: 12px 24px; text-decoration: none; border-radius: 6px; margin: 20px 0; }}
      .footer {{ background: #f8f9fa; padding: 20px; text-align: center; border-radius: 0 0 8px 8px; font-size: 14px; color: #6c757d; }}
    </style>
  </head>
  <body>
    <div class="container">
      <div class="header"><h1>You're Invited!</h1></div>
      <div class="content">
        <h2>Hello {first_name} {last_name},</h2>
        <p>You've been invited by <strong>{inviter}</strong> to join <strong>{company}</strong> as an employee.</p>
        <p>This invitation will allow you to:</p>
        <ul>
          <li>Make purchases on behalf of {company}</li>
          <li>Access company-specific pricing and approvals</li>
          <li>Manage your spending limits and preferences</li>
        </ul>
        <p style="text-align: center;"><a href="{url}" class="button">Accept Invitation</a></p>
        <p><strong>Note:</strong> This invitation link will expire in {days} days for security reasons.</p>
      </div>
      <div class="footer">
        <p>If you didn't expect this invitation, please ignore this email.</p>
      </div>
    </div>
  </body>
</html>
"#
    );

    let text = format!(
        "Hello {first} {last},\n\n\
         You've been invited by {inviter} to join {company} as an employee.\n\n\
         This invitation will allow you to:\n\
         - Make purchases on behalf of {company}\n\
         - Access company-specific pricing and approvals\n\
         - Manage your spending limits and preferences\n\n\
         Accept your invitation here: {url}\n\n\
         Note: This invitation link will expire in {days} days for security reasons.\n\n\
         If you didn't expect this invitation, please ignore this email.\n",
        first = data.first_name,
        last = data.last_name,
        inviter = data.inviter_name,
        company = data.company_name,
        url = data.invite_url,
        days = days,
    );

    EmailMessage {
        to: data.to.clone(),
        subject,
        html,
        text,
    }
}

fn escape_html(input: &str) -> String {
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
