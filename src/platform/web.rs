//! DOM HUD
//!
//! Looks elements up by id on every call so the page can be edited without
//! restarting the game. A missing element is logged once and then ignored.

use std::collections::HashSet;

use web_sys::{Document, Element};

use crate::session::Hud;

pub const SCORE_ID: &str = "scoreEl";
pub const MODAL_ID: &str = "modal";
pub const MODAL_SCORE_ID: &str = "modal_score";

pub struct DomHud {
    document: Option<Document>,
    reported_missing: HashSet<&'static str>,
}

impl DomHud {
    pub fn new() -> Self {
        let document = web_sys::window().and_then(|w| w.document());
        if document.is_none() {
            log::warn!("No document - HUD disabled");
        }
        Self {
            document,
            reported_missing: HashSet::new(),
        }
    }

    fn element(&mut self, id: &'static str) -> Option<Element> {
        let el = self.document.as_ref()?.get_element_by_id(id);
        if el.is_none() && self.reported_missing.insert(id) {
            log::warn!("HUD element #{} not found", id);
        }
        el
    }
}

impl Default for DomHud {
    fn default() -> Self {
        Self::new()
    }
}

impl Hud for DomHud {
    fn set_score(&mut self, score: u64) {
        if let Some(el) = self.element(SCORE_ID) {
            el.set_text_content(Some(&score.to_string()));
        }
    }

    fn show_end_overlay(&mut self, final_score: u64) {
        if let Some(el) = self.element(MODAL_SCORE_ID) {
            el.set_text_content(Some(&final_score.to_string()));
        }
        if let Some(el) = self.element(MODAL_ID) {
            let _ = el.set_attribute("class", "");
        }
    }

    fn hide_overlay(&mut self) {
        if let Some(el) = self.element(MODAL_ID) {
            let _ = el.set_attribute("class", "hidden");
        }
    }
}
