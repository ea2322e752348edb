//! Outreach draft templating and reflow.

use std::sync::LazyLock;

use partneros_core::Signal;
use regex::Regex;

/// Opener, dangling title line, and a continuation word. Titles may start
/// lowercase (`acme.io`).
static OPENER_WITH_CONTINUATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(I noticed|I saw|I came across|I read about)[ \t]*\n\s*([A-Z][^\n]*?)[ \t]*\n\s*(and thought|and|which)\b",
    )
    .expect("valid opener regex")
});

/// Opener followed by a dangling title line.
static OPENER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(I noticed|I saw|I came across|I read about)[ \t]*\n\s*([A-Z][^\n]*?)[ \t]*\n\s*",
    )
    .expect("valid opener regex")
});

static GREETING_OR_CLOSING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(Hi|Hello|I|We|Would|Best|Thanks|Thank|Regards|Sincerely)")
        .expect("valid greeting regex")
});

static BLANK_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid blank-run regex"));

const MERGE_MAX_LINE_CHARS: usize = 100;

/// Deterministic draft used when no generated copy is available.
#[must_use]
pub fn default_outreach_draft(signal: &Signal) -> String {
    format!(
        "Hi there,\n\n\
         I noticed \"{}\" and thought it might be relevant to explore potential partnership opportunities.\n\n\
         Would you be open to a quick conversation?\n\n\
         Best regards",
        signal.title
    )
}

/// Reflow a draft so titles are not stranded on their own line.
///
/// Paragraph breaks survive; runs of blank lines collapse to one.
#[must_use]
pub fn format_outreach_draft(draft: &str) -> String {
    if draft.trim().is_empty() {
        return String::new();
    }

    let rejoined = OPENER_WITH_CONTINUATION_RE.replace_all(draft, "${1} \"${2}\" ${3}");
    let rejoined = OPENER_RE.replace_all(&rejoined, "${1} \"${2}\" ");

    let lines: Vec<&str> = rejoined.lines().map(str::trim).collect();
    let mut merged: Vec<String> = Vec::with_capacity(lines.len());
    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        if merged.is_empty() && line.is_empty() {
            i += 1;
            continue;
        }
        let next = lines.get(i + 1).copied().unwrap_or("");
        if should_merge(line, next) {
            merged.push(format!("{line} {next}"));
            i += 2;
            continue;
        }
        merged.push(line.to_owned());
        i += 1;
    }

    let joined = merged.join("\n");
    let collapsed = BLANK_RUN_RE.replace_all(&joined, "\n\n");
    collapsed
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_owned()
}

fn should_merge(line: &str, next: &str) -> bool {
    !line.is_empty()
        && !next.is_empty()
        && line.chars().count() < MERGE_MAX_LINE_CHARS
        && !line.ends_with(['.', '!', '?', ':'])
        && next.starts_with(|c: char| c.is_ascii_uppercase())
        && !GREETING_OR_CLOSING_RE.is_match(next)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use partneros_core::SignalType;
    use uuid::Uuid;

    use super::*;

    #[test]
    fn rejoins_title_stranded_after_opener() {
        let draft = "Hi Sam,\n\nI noticed\nAcme Launches Data Cloud\nand thought we should talk.";
        assert_eq!(
            format_outreach_draft(draft),
            "Hi Sam,\n\nI noticed \"Acme Launches Data Cloud\" and thought we should talk."
        );
    }

    #[test]
    fn rejoins_lowercase_title_stranded_after_opener() {
        let draft = "i saw\nacme.io now supports SSO\nwhich fits our roadmap.";
        assert_eq!(
            format_outreach_draft(draft),
            "i saw \"acme.io now supports SSO\" which fits our roadmap."
        );
    }

    #[test]
    fn rejoins_title_without_continuation_word() {
        let draft = "I came across\nAcme Series B\nCongrats on the round.";
        assert_eq!(
            format_outreach_draft(draft),
            "I came across \"Acme Series B\" Congrats on the round."
        );
    }

    #[test]
    fn merges_fragment_into_capitalized_continuation() {
        let draft = "Your new Marketplace listing for\nAcme Analytics looks great.";
        assert_eq!(
            format_outreach_draft(draft),
            "Your new Marketplace listing for Acme Analytics looks great."
        );
    }

    #[test]
    fn does_not_merge_into_greeting_or_closing() {
        let draft = "Looking forward to it\nBest regards";
        assert_eq!(format_outreach_draft(draft), draft);
    }

    #[test]
    fn does_not_merge_after_terminal_punctuation() {
        let draft = "Congrats on the launch!\nAcme looks great.";
        assert_eq!(format_outreach_draft(draft), draft);
    }

    #[test]
    fn collapses_blank_runs_and_trims() {
        let draft = "\n\nHi there,   \n\n\n\n\nWould you be open to a chat?\n\n";
        assert_eq!(
            format_outreach_draft(draft),
            "Hi there,\n\nWould you be open to a chat?"
        );
    }

    #[test]
    fn empty_draft_stays_empty() {
        assert_eq!(format_outreach_draft("  \n "), "");
    }

    #[test]
    fn default_draft_quotes_title_and_survives_formatting() {
        let signal = partneros_core::Signal {
            id: Uuid::new_v4(),
            partner_id: Uuid::new_v4(),
            signal_type: SignalType::Launch,
            title: "Acme ships v2".to_owned(),
            source_url: "https://acme.example/v2".to_owned(),
            summary: String::new(),
            facets: None,
            published_at: None,
            dedupe_hash: "h".to_owned(),
            created_at: Utc::now(),
        };
        let draft = default_outreach_draft(&signal);
        assert!(draft.contains("I noticed \"Acme ships v2\""));
        assert_eq!(format_outreach_draft(&draft), draft);
    }
}
