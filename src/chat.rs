//! Per-message routing for the chat front-ends
//!
//! Decides what a message is before anything gets rendered: a liveness ping,
//! a bare price inquiry, a tire size to look up, or a question for the
//! conversational service.

use crate::models::InventoryRecord;
use crate::normalizer::NormalizedKey;
use crate::service::StockLookupService;
use crate::snapshot::Clock;
use crate::source::InventorySource;
use serde::Serialize;

pub const PONG: &str = "pong 🏓";

/// "Just message the admin!"
pub const CONTACT_ADMIN: &str = "ทักแอดมินได้เลยจ้า";

/// "This size is not in stock right now, message the admin to order"
pub const NO_STOCK: &str = "ขออภัย ตอนนี้ไม่มียางขนาดนี้ในสต็อก ทักแอดมินเพื่อสั่งได้เลยจ้า";

/// "Checking stock is unavailable at the moment, please try again shortly"
pub const INVENTORY_UNAVAILABLE: &str = "ระบบเช็คสต็อกไม่พร้อมใช้งานชั่วคราว กรุณาลองใหม่อีกครั้ง";

/// Messages answered with [`CONTACT_ADMIN`] instead of a lookup
const PRICE_KEYWORDS: &[&str] = &["ราคา", "price"];

/// What the chat glue should do with one incoming message
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reply {
    Pong,
    ContactAdmin,
    InStock {
        key: NormalizedKey,
        matches: Vec<InventoryRecord>,
    },
    NoStock {
        key: NormalizedKey,
    },
    /// Not a size query; hand the text to the conversational service
    Consult,
}

impl Reply {
    /// True when the glue should also ask the conversational service
    pub fn needs_fallback(&self) -> bool {
        matches!(self, Reply::NoStock { .. } | Reply::Consult)
    }

    /// Fixed plain-text reply, if this outcome has one
    pub fn text(&self) -> Option<&'static str> {
        match self {
            Reply::Pong => Some(PONG),
            Reply::ContactAdmin => Some(CONTACT_ADMIN),
            Reply::NoStock { .. } => Some(NO_STOCK),
            Reply::InStock { .. } | Reply::Consult => None,
        }
    }
}

/// Route one chat message
pub async fn route<S: InventorySource, C: Clock>(
    service: &StockLookupService<S, C>,
    text: &str,
) -> Reply {
    let trimmed = text.trim();

    if trimmed.eq_ignore_ascii_case("ping") {
        return Reply::Pong;
    }

    if PRICE_KEYWORDS
        .iter()
        .any(|keyword| trimmed.eq_ignore_ascii_case(keyword))
    {
        return Reply::ContactAdmin;
    }

    let Some(key) = service.query_key(trimmed) else {
        return Reply::Consult;
    };

    let matches = service.lookup(trimmed).await;
    if matches.is_empty() {
        log::info!("No stock for size key {}", key);
        Reply::NoStock { key }
    } else {
        log::info!("Found {} rows for size key {}", matches.len(), key);
        Reply::InStock { key, matches }
    }
}
