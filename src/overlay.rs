//! DOM overlay: emoji sprites, HUD, banners
//!
//! Emoji are drawn by the browser as absolutely positioned spans on top of
//! the canvas. Spans are pooled and reused frame to frame.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlElement};

use crate::renderer::{EmojiSprite, Viewport};
use crate::sim::{GamePhase, GameState};

pub struct Overlay {
    document: Document,
    layer: HtmlElement,
    pool: Vec<HtmlElement>,
    /// Spans currently shown (the rest of the pool is hidden)
    visible: usize,
}

impl Overlay {
    pub fn new(document: &Document) -> Result<Self, JsValue> {
        let layer: HtmlElement = document
            .get_element_by_id("emoji-layer")
            .ok_or_else(|| JsValue::from_str("missing #emoji-layer"))?
            .dyn_into()?;

        Ok(Self {
            document: document.clone(),
            layer,
            pool: Vec::new(),
            visible: 0,
        })
    }

    /// Position one span per sprite. `viewport` is in CSS pixels.
    pub fn sync_sprites(&mut self, sprites: &[EmojiSprite<'_>], viewport: &Viewport) {
        while self.pool.len() < sprites.len() {
            match self.create_span() {
                Ok(span) => self.pool.push(span),
                Err(e) => {
                    log::warn!("Could not create emoji span: {:?}", e);
                    break;
                }
            }
        }

        for (span, sprite) in self.pool.iter().zip(sprites) {
            let screen = viewport.world_to_screen(sprite.pos);
            let px = viewport.units_to_pixels(sprite.size);
            if span.text_content().as_deref() != Some(sprite.glyph) {
                span.set_text_content(Some(sprite.glyph));
            }
            let style = span.style();
            // CSS rotates clockwise
            let transform = format!(
                "translate({:.1}px, {:.1}px) translate(-50%, -50%) rotate({:.3}rad)",
                screen.x, screen.y, -sprite.rotation
            );
            style.set_property("transform", &transform).ok();
            style.set_property("font-size", &format!("{:.1}px", px)).ok();
            style.set_property("opacity", &format!("{:.3}", sprite.opacity)).ok();
            style.set_property("display", "block").ok();
        }

        let shown = sprites.len().min(self.pool.len());
        for span in self.pool.iter().take(self.visible).skip(shown) {
            span.style().set_property("display", "none").ok();
        }
        self.visible = shown;
    }

    fn create_span(&self) -> Result<HtmlElement, JsValue> {
        let span: HtmlElement = self.document.create_element("span")?.dyn_into()?;
        span.set_class_name("emoji");
        let style = span.style();
        style.set_property("position", "absolute")?;
        style.set_property("left", "0")?;
        style.set_property("top", "0")?;
        style.set_property("line-height", "1")?;
        style.set_property("pointer-events", "none")?;
        self.layer.append_child(&span)?;
        Ok(span)
    }

    /// Update HUD text and show/hide banners for the current phase
    pub fn update_hud(&self, state: &GameState) {
        self.set_text("#hud-pops .hud-value", &state.stats.pops.to_string());

        if let Some(el) = self.document.get_element_by_id("hud-streak") {
            if state.stats.streak > 1 {
                let _ = el.set_attribute("class", "hud-item");
                self.set_text("#hud-streak .hud-value", &state.stats.streak.to_string());
            } else {
                let _ = el.set_attribute("class", "hud-item hidden");
            }
        }

        if let Some(el) = self.document.get_element_by_id("hud-goal") {
            match state.pops_remaining() {
                Some(left) => {
                    let _ = el.set_attribute("class", "hud-item");
                    self.set_text("#hud-goal .hud-value", &left.to_string());
                }
                None => {
                    let _ = el.set_attribute("class", "hud-item hidden");
                }
            }
        }

        if let Some(el) = self.document.get_element_by_id("hud-powerup") {
            match state.pending_powerup {
                Some(kind) => {
                    let _ = el.set_attribute("class", "hud-item");
                    el.set_text_content(Some(&format!("{} {}", kind.icon(), kind.name())));
                }
                None => {
                    let _ = el.set_attribute("class", "hud-item hidden");
                }
            }
        }

        // Show/hide countdown
        if let Some(el) = self.document.get_element_by_id("countdown") {
            match state.phase {
                GamePhase::Countdown { value, .. } => {
                    let _ = el.set_attribute("class", "");
                    el.set_text_content(Some(&value.to_string()));
                }
                GamePhase::Playing if state.showing_go() => {
                    let _ = el.set_attribute("class", "go");
                    el.set_text_content(Some("Go!"));
                }
                _ => {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }

        self.toggle("pause-banner", state.phase == GamePhase::Paused);

        if let Some(el) = self.document.get_element_by_id("win-banner") {
            if state.is_won() {
                let class = if state.can_restart() { "ready" } else { "" };
                let _ = el.set_attribute("class", class);
            } else {
                let _ = el.set_attribute("class", "hidden");
            }
        }
    }

    pub fn set_mute_icon(&self, muted: bool) {
        if let Some(btn) = self.document.get_element_by_id("muteBtn") {
            btn.set_text_content(Some(if muted { "🔇" } else { "🔊" }));
        }
    }

    pub fn set_title(&self, title: &str) {
        self.document.set_title(title);
        if let Some(el) = self.document.get_element_by_id("title") {
            el.set_text_content(Some(title));
        }
    }

    fn set_text(&self, selector: &str, text: &str) {
        if let Some(el) = self.document.query_selector(selector).ok().flatten() {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    fn toggle(&self, id: &str, shown: bool) {
        if let Some(el) = self.document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if shown { "" } else { "hidden" });
        }
    }
}
