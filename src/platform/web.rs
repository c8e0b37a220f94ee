//! Browser implementations of the platform traits

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, Storage};

use super::{Clock, HudSink, HudSnapshot};
use crate::persistence::ScoreStore;

/// `performance.now()` clock
pub struct PerformanceClock {
    performance: Option<web_sys::Performance>,
}

impl PerformanceClock {
    pub fn new() -> Self {
        Self {
            performance: web_sys::window().and_then(|w| w.performance()),
        }
    }
}

impl Default for PerformanceClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for PerformanceClock {
    fn now_ms(&self) -> f64 {
        match &self.performance {
            Some(performance) => performance.now(),
            None => js_sys::Date::now(),
        }
    }
}

/// LocalStorage-backed store; a missing or blocked storage reads as empty
pub struct LocalStorageStore {
    storage: Option<Storage>,
}

impl LocalStorageStore {
    pub fn new() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if storage.is_none() {
            log::warn!("LocalStorage unavailable, scores will not persist");
        }
        Self { storage }
    }
}

impl Default for LocalStorageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreStore for LocalStorageStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set_item(&mut self, key: &str, value: &str) {
        if let Some(storage) = &self.storage {
            if storage.set_item(key, value).is_err() {
                log::warn!("Failed to write {}", key);
            }
        }
    }
}

/// Writes HUD snapshots into the page's DOM elements
pub struct DomHud {
    document: Option<Document>,
}

impl DomHud {
    pub fn new() -> Self {
        Self {
            document: web_sys::window().and_then(|w| w.document()),
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            let display = if visible { "block" } else { "none" };
            let _ = el.style().set_property("display", display);
        }
    }

    fn update_hearts(document: &Document, lives: u8) {
        let Ok(hearts) = document.query_selector_all(".heart") else {
            return;
        };
        for i in 0..hearts.length() {
            let Some(heart) = hearts.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let classes = heart.class_list();
            let _ = if i >= u32::from(lives) {
                classes.add_1("lost")
            } else {
                classes.remove_1("lost")
            };
        }
    }
}

impl Default for DomHud {
    fn default() -> Self {
        Self::new()
    }
}

impl HudSink for DomHud {
    fn push(&mut self, snapshot: &HudSnapshot) {
        let Some(document) = &self.document else {
            return;
        };
        Self::set_text(document, "score", &snapshot.score.to_string());
        Self::set_text(document, "distance", &format!("{}km", snapshot.distance_km));
        Self::set_text(
            document,
            "speed",
            &HudSnapshot::format_multiplier(snapshot.speed_multiplier),
        );
        Self::set_text(document, "size", &HudSnapshot::format_multiplier(snapshot.size));
        Self::update_hearts(document, snapshot.lives);

        match &snapshot.question {
            Some(question) => {
                Self::set_text(document, "questionText", &question.prompt);
                Self::set_text(document, "leftChoice", &question.left);
                Self::set_text(document, "rightChoice", &question.right);
                Self::set_visible(document, "questionPanel", true);
            }
            None => Self::set_visible(document, "questionPanel", false),
        }
    }
}
