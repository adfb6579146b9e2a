//! Presentation view of a resolved record.
//!
//! Everything the result card needs is derived here so that clients only
//! render: the badge, whether to celebrate, the contact block for passed
//! candidates and a motivational line.

use announce_core::StrExt;
use rand::seq::IndexedRandom;
use serde::Serialize;

use crate::contact::whatsapp_link;
use crate::lookup::Record;
use crate::status::{Verdict, classify};

/// Shown instead of the contact name when the sheet leaves it blank.
const CONTACT_FALLBACK_NAME: &str = "Narahubung";

/// Shown to candidates who did not (yet) pass.
const NOT_PASSED_INFO: &str =
    "Tetap semangat. Jika merasa ada kekeliruan data, hubungi panitia.";

pub const MOTIVATIONS: [&str; 5] = [
    "Langkahmu hari ini adalah awal kontribusi besar besok. Gas terus!",
    "Selamat! Tetap rendah hati, terus belajar, dan buktikan lewat aksi.",
    "Kamu sudah sampai sini—sekarang waktunya tumbuh dan berdampak.",
    "Satu tim, satu tujuan. Jadilah versi terbaikmu di periode ini!",
    "Kemenangan kecil hari ini = fondasi untuk prestasi yang lebih besar.",
];

/// Result card for one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Announcement {
    pub record: Record,
    pub verdict: Verdict,
    pub badge: &'static str,
    pub tone: &'static str,
    pub celebrate: bool,
    pub motivation: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<ContactCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<&'static str>,
}

/// Who a passed candidate should reach out to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactCard {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// False when neither a WhatsApp link nor a LINE id could be derived.
    pub available: bool,
}

impl ContactCard {
    fn from_record(record: &Record) -> Self {
        let whatsapp = whatsapp_link(&record.contact_whatsapp);
        let line = record.contact_line.to_opt();

        Self {
            name: record.contact_name.or_str(CONTACT_FALLBACK_NAME).to_string(),
            available: whatsapp.is_some() || line.is_some(),
            whatsapp,
            line,
            note: record.note.to_opt(),
        }
    }
}

impl Announcement {
    /// Build the card with a randomly chosen motivational line.
    #[must_use]
    pub fn from_record(record: Record) -> Self {
        let motivation = MOTIVATIONS
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or(MOTIVATIONS[0]);
        Self::with_motivation(record, motivation)
    }

    #[must_use]
    pub fn with_motivation(record: Record, motivation: &'static str) -> Self {
        let verdict = classify(&record.status);
        let passed = verdict == Verdict::Passed;

        Self {
            contact: passed.then(|| ContactCard::from_record(&record)),
            info: (!passed).then_some(NOT_PASSED_INFO),
            badge: verdict.badge(),
            tone: verdict.tone(),
            celebrate: verdict.celebrates(),
            verdict,
            motivation,
            record,
        }
    }
}
