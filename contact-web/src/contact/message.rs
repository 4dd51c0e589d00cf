//! Turning a validated submission into the email sent to the site owner.

use crate::contact::Submission;
use crate::mailer::OutboundEmail;

/// Name shown in the subject when the sender left it blank.
const ANONYMOUS_NAME: &str = "someone";

/// Build the notification email for a submission.
///
/// Replies go straight to the submitter. The subject falls back to
/// "someone" for a blank name, but the body prints the name as given.
pub fn compose_email(submission: &Submission, from: &str, to: &str) -> OutboundEmail {
    let display_name = if submission.name.is_empty() {
        ANONYMOUS_NAME
    } else {
        submission.name.as_str()
    };

    OutboundEmail {
        from: from.to_string(),
        to: vec![to.to_string()],
        reply_to: submission.email.clone(),
        subject: format!("New message from {} ({})", display_name, submission.email),
        text: format!(
            "Name: {}\nEmail: {}\n\n{}",
            submission.name, submission.email, submission.message
        ),
    }
}
