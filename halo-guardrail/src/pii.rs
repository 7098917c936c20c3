use halo_core::Redaction;
use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PiiKind {
    Email,
    Phone,
    CardPartial,
}

impl PiiKind {
    /// Rule application order.
    pub const ALL: [PiiKind; 3] = [PiiKind::Email, PiiKind::Phone, PiiKind::CardPartial];

    pub fn as_str(&self) -> &'static str {
        match self {
            PiiKind::Email => "email",
            PiiKind::Phone => "phone",
            PiiKind::CardPartial => "cc_partial",
        }
    }

    pub fn placeholder(&self) -> String {
        format!("<{}_redacted>", self.as_str())
    }

    fn pattern(&self) -> &'static str {
        match self {
            PiiKind::Email => r"[\w\.-]+@[\w\.-]+\.[a-zA-Z]{2,}",
            PiiKind::Phone => r"\+?\d[\d\s\-]{7,}\d",
            PiiKind::CardPartial => r"\b(?:\d[ -]*?){13,16}\b",
        }
    }
}

static RULES: OnceLock<Vec<(PiiKind, Regex)>> = OnceLock::new();

fn rules() -> &'static [(PiiKind, Regex)] {
    RULES.get_or_init(|| {
        PiiKind::ALL
            .iter()
            .map(|kind| (*kind, Regex::new(kind.pattern()).expect("PII pattern must compile")))
            .collect()
    })
}

/// Ordered regex rules. Each rule runs as a full pass over the output of the
/// previous one, so text replaced by an earlier rule is invisible to later ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct PiiMasker;

impl PiiMasker {
    pub fn new() -> Self {
        Self
    }

    pub fn mask(&self, text: &str) -> (String, Vec<Redaction>) {
        let mut masked = text.to_string();
        let mut redactions = Vec::new();

        for (kind, regex) in rules() {
            let found: Vec<Redaction> = regex
                .find_iter(&masked)
                .map(|m| Redaction::new(kind.as_str(), m.as_str()))
                .collect();
            if found.is_empty() {
                continue;
            }
            masked = regex.replace_all(&masked, kind.placeholder().as_str()).into_owned();
            redactions.extend(found);
        }

        if !redactions.is_empty() {
            tracing::debug!(redactions = redactions.len(), "masked PII in text");
        }
        (masked, redactions)
    }
}

pub fn mask_pii(text: &str) -> (String, Vec<Redaction>) {
    PiiMasker.mask(text)
}
