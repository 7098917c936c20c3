//! Canned replies used when an agent cannot produce an answer.

use crate::AgentKind;

pub const GENERIC_APOLOGY: &str = "Maaf, saya mengalami kendala memproses pertanyaan Anda.";
pub const GENERIC_RETRY: &str = "Maaf, saya mengalami kendala memproses pertanyaan Anda. Mohon coba lagi atau hubungi customer service kami.";
pub const ORDER_STATUS_RETRY: &str = "Maaf, saya mengalami kendala memproses pertanyaan tentang status pesanan. Mohon coba lagi atau hubungi customer service kami.";
pub const PRODUCT_RECO_RETRY: &str = "Maaf, saya mengalami kendala memproses permintaan rekomendasi produk. Mohon coba lagi atau hubungi customer service kami.";
pub const HANDOVER_APOLOGY: &str = "Mohon maaf, saya tidak bisa membantu dengan pertanyaan ini. Saya akan mengalihkan Anda ke agen manusia kami. Mohon tunggu sebentar.";
pub const HANDOVER_ERROR: &str =
    "Mohon maaf, saya mengalami kendala. Saya akan mengalihkan Anda ke agen manusia kami.";

fn mentions(query: &str, words: &[&str]) -> bool {
    words.iter().any(|w| query.contains(w))
}

/// Reply for an unusable reasoning trace, chosen by coarse keyword matching
/// on the lowercased query.
pub fn parse_error_fallback(kind: AgentKind, query: &str) -> &'static str {
    let query = query.to_lowercase();
    match kind {
        AgentKind::GeneralQa => {
            if mentions(&query, &["halo", "hello", "hi", "hai"]) {
                "Halo! Ada yang bisa saya bantu hari ini?"
            } else if mentions(&query, &["terima kasih", "thanks", "thank you"]) {
                "Sama-sama! Ada yang bisa saya bantu lagi?"
            } else if mentions(
                &query,
                &["selamat pagi", "selamat siang", "selamat sore", "selamat malam"],
            ) {
                "Selamat! Ada yang bisa saya bantu hari ini?"
            } else if mentions(&query, &["apa kabar", "how are you"]) {
                "Baik, terima kasih! Ada yang bisa saya bantu?"
            } else {
                GENERIC_RETRY
            }
        }
        AgentKind::OrderStatus if mentions(&query, &["pesanan", "order", "status"]) => {
            ORDER_STATUS_RETRY
        }
        AgentKind::ProductReco
            if mentions(&query, &["rekomendasi", "recommendation", "produk", "product"]) =>
        {
            PRODUCT_RECO_RETRY
        }
        AgentKind::OrderStatus | AgentKind::ProductReco => GENERIC_APOLOGY,
        AgentKind::Handover => HANDOVER_APOLOGY,
    }
}

/// Reply when no agent of this kind could be constructed.
pub fn unavailable_fallback(kind: AgentKind) -> &'static str {
    match kind {
        AgentKind::OrderStatus => ORDER_STATUS_RETRY,
        AgentKind::ProductReco => PRODUCT_RECO_RETRY,
        AgentKind::GeneralQa => GENERIC_RETRY,
        AgentKind::Handover => HANDOVER_APOLOGY,
    }
}

/// Reply for a model or tool failure.
pub fn error_fallback(kind: AgentKind) -> &'static str {
    match kind {
        AgentKind::Handover => HANDOVER_ERROR,
        _ => GENERIC_APOLOGY,
    }
}
