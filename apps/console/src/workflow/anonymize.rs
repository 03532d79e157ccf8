use once_cell::sync::Lazy;
use regex::Regex;

use crate::api::ApiClient;
use crate::models::CaseCreate;

pub const CLIENT_NAME_TOKEN: &str = "[CLIENT_NAME]";
pub const STAFF_NAME_TOKEN: &str = "[STAFF_NAME]";
pub const DATE_TOKEN: &str = "[DATE]";

// Longest match first: a four-word name must collapse to a single token
// rather than leaving a two-word fragment behind.
static NAME_PATTERNS: Lazy<[Regex; 3]> = Lazy::new(|| {
    [
        Regex::new(r"\b[A-Z][a-z]+ [A-Z][a-z]+ [A-Z][a-z]+ [A-Z][a-z]+\b").unwrap(),
        Regex::new(r"\b[A-Z][a-z]+ [A-Z][a-z]+ [A-Z][a-z]+\b").unwrap(),
        Regex::new(r"\b[A-Z][a-z]+ [A-Z][a-z]+\b").unwrap(),
    ]
});

/// Local fallback when the anonymization service is unavailable: replace
/// runs of two-to-four capitalized words (read as personal names) with the
/// client placeholder. Idempotent — the token itself never matches.
pub fn redact_names(text: &str) -> String {
    let mut result = text.to_string();
    for pattern in NAME_PATTERNS.iter() {
        result = pattern.replace_all(&result, CLIENT_NAME_TOKEN).into_owned();
    }
    result
}

/// Compliance pass over one case before it is persisted. Structured
/// fields are replaced outright; the free-text description goes through
/// the anonymization service, falling back to [`redact_names`] when that
/// call fails. A failed service call never aborts the commit.
pub async fn anonymize_case(client: &ApiClient, case: &mut CaseCreate) {
    if case.guest.is_some() {
        case.guest = Some(CLIENT_NAME_TOKEN.to_string());
    }
    if case.created_by.is_some() {
        case.created_by = Some(STAFF_NAME_TOKEN.to_string());
    }
    if case.modified_by.is_some() {
        case.modified_by = Some(STAFF_NAME_TOKEN.to_string());
    }
    if case.case_date.is_some() {
        case.case_date = Some(DATE_TOKEN.to_string());
    }

    if let Some(description) = case.case_description.take() {
        case.case_description = Some(anonymize_description(client, &description).await);
    }
}

async fn anonymize_description(client: &ApiClient, text: &str) -> String {
    match client.anonymize_text(text, false, false).await {
        Ok(response) => response.anonymized_text,
        Err(err) => {
            tracing::warn!("anonymization service unavailable, using local redaction: {err}");
            redact_names(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longest_match_wins() {
        assert_eq!(
            redact_names("John Michael Smith called"),
            "[CLIENT_NAME] called"
        );
        assert_eq!(
            redact_names("Anna Maria Garcia Lopez complained about room 204"),
            "[CLIENT_NAME] complained about room 204"
        );
    }

    #[test]
    fn two_word_names_are_redacted() {
        assert_eq!(
            redact_names("The guest John Smith asked for a late checkout"),
            "The guest [CLIENT_NAME] asked for a late checkout"
        );
    }

    #[test]
    fn leading_capitalized_words_fold_into_the_match() {
        // Over-redaction is the accepted trade-off: a capitalized word
        // directly before a name joins the longer pattern rather than
        // risking a leaked fragment.
        assert_eq!(
            redact_names("Guest John Smith asked for a late checkout"),
            "[CLIENT_NAME] asked for a late checkout"
        );
    }

    #[test]
    fn redaction_is_idempotent() {
        let once = redact_names("John Michael Smith called");
        let twice = redact_names(&once);
        assert_eq!(once, twice);

        let only_token = format!("{CLIENT_NAME_TOKEN} called twice");
        assert_eq!(redact_names(&only_token), only_token);
    }

    #[test]
    fn lowercase_and_single_words_survive() {
        let text = "the minibar was empty and Housekeeping was notified";
        assert_eq!(redact_names(text), text);
    }

    #[test]
    fn multiple_names_in_one_sentence() {
        assert_eq!(
            redact_names("John Smith spoke to Mary Jones at the desk"),
            "[CLIENT_NAME] spoke to [CLIENT_NAME] at the desk"
        );
    }
}
