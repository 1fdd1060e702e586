//! HTML bodies for the emails the service sends

use super::EmailMessage;

pub fn verification_email(email: &str, domain: &str, token: &str) -> EmailMessage {
    let link = format!("http://{}/api/v1/auth/verify/{}", domain, token);
    let html = format!(
        "<h1>Verify your Email</h1>\
         <p>Please click this <a href=\"{}\">link</a> to verify your email</p>",
        link
    );

    EmailMessage::new(vec![email.to_string()], "Verify Your email", html)
}

pub fn password_reset_email(email: &str, domain: &str, token: &str) -> EmailMessage {
    let link = format!(
        "http://{}/api/v1/auth/password-reset-confirm/{}",
        domain, token
    );
    let html = format!(
        "<h1>Reset Your Password</h1>\
         <p>Please click this <a href=\"{}\">link</a> to Reset Your Password</p>",
        link
    );

    EmailMessage::new(vec![email.to_string()], "Reset Your Password", html)
}

pub fn welcome_email(recipients: Vec<String>) -> EmailMessage {
    EmailMessage::new(
        recipients,
        "Welcome to our app",
        "<h1>Welcome to the app</h1>",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_link() {
        let message = verification_email("a@example.com", "localhost:8000", "abc.def.ghi");
        assert_eq!(message.recipients, vec!["a@example.com".to_string()]);
        assert!(message
            .html_body
            .contains("http://localhost:8000/api/v1/auth/verify/abc.def.ghi"));
    }

    #[test]
    fn test_password_reset_link() {
        let message = password_reset_email("a@example.com", "books.dev", "tok");
        assert!(message
            .html_body
            .contains("http://books.dev/api/v1/auth/password-reset-confirm/tok"));
    }
}
