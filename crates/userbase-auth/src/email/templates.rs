//! Plain templates for the verification and password reset emails.

use userbase_core::config::EmailConfig;
use userbase_core::traits::EmailMessage;

/// Compose the email asking a new user to confirm their address.
pub fn verification_email(config: &EmailConfig, to: &str, name: &str, code: &str) -> EmailMessage {
    let link = format!(
        "{}/auth/verifyemail?code={code}",
        config.link.trim_end_matches('/')
    );
    let product = &config.name;

    let body_plain = format!(
        "Hi {name},\n\n\
         Welcome to {product}! We're very excited to have you on board.\n\n\
         To get started with {product}, please open this link:\n{link}\n\n\
         Need help, or have questions? Just reply to this email.\n"
    );
    let body_html = format!(
        "<p>Hi {name},</p>\
         <p>Welcome to {product}! We're very excited to have you on board.</p>\
         <p>To get started with {product}, please click here: \
         <a href=\"{link}\">Confirm your account</a></p>\
         <p>Need help, or have questions? Just reply to this email.</p>",
        name = escape_html(name),
        product = escape_html(product),
    );

    EmailMessage {
        from: config.from.clone(),
        to: to.to_string(),
        subject: config.verification_subject.clone(),
        body_html,
        body_plain,
    }
}

/// Compose the email carrying a password reset link.
pub fn password_reset_email(
    config: &EmailConfig,
    to: &str,
    name: &str,
    token: &str,
    valid_minutes: i64,
) -> EmailMessage {
    let link = format!(
        "{}/auth/resetpassword?code={token}",
        config.link.trim_end_matches('/')
    );
    let product = &config.name;

    let body_plain = format!(
        "Hi {name},\n\n\
         You have received this email because a password reset request for your \
         {product} account was received.\n\n\
         Open this link to reset your password (valid for {valid_minutes} minutes):\n{link}\n\n\
         If you did not request a password reset, no further action is required.\n"
    );
    let body_html = format!(
        "<p>Hi {name},</p>\
         <p>You have received this email because a password reset request for your \
         {product} account was received.</p>\
         <p>Click the link below to reset your password (valid for {valid_minutes} minutes): \
         <a href=\"{link}\">Reset your password</a></p>\
         <p>If you did not request a password reset, no further action is required.</p>",
        name = escape_html(name),
        product = escape_html(product),
    );

    EmailMessage {
        from: config.from.clone(),
        to: to.to_string(),
        subject: config.reset_subject.clone(),
        body_html,
        body_plain,
    }
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
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
