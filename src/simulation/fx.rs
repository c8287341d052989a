//! Floating texts (payouts, tips, unhappy exits)
//!
//! Visual only. They live in the core so their lifetime follows simulation
//! time, which keeps pause and frame clamping consistent for renderers.

use serde::Serialize;

use crate::core::types::{Millis, Vec2};

/// Drift upwards (px / ms)
const RISE_SPEED: f32 = 0.03;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FxKind {
    Cash,
    Tip,
    Unhappy,
    LevelUp,
    Quip,
}

#[derive(Debug, Clone, Serialize)]
pub struct FloatingText {
    pub text: String,
    pub pos: Vec2,
    pub kind: FxKind,
    pub ttl_ms: Millis,
}

/// Live floating texts
#[derive(Debug, Clone, Default)]
pub struct FxList {
    items: Vec<FloatingText>,
}

impl FxList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, text: impl Into<String>, pos: Vec2, kind: FxKind, ttl_ms: Millis) {
        self.items.push(FloatingText {
            text: text.into(),
            pos,
            kind,
            ttl_ms,
        });
    }

    /// Age every text by `dt`, dropping the expired ones
    pub fn expire(&mut self, dt: Millis) {
        for fx in &mut self.items {
            fx.ttl_ms -= dt;
            fx.pos.y -= RISE_SPEED * dt as f32;
        }
        self.items.retain(|fx| fx.ttl_ms > 0.0);
    }

    pub fn items(&self) -> &[FloatingText] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fx_expire_after_ttl() {
        let mut fx = FxList::new();
        fx.push("+$8", Vec2::new(10.0, 100.0), FxKind::Cash, 900.0);
        fx.expire(450.0);
        assert_eq!(fx.len(), 1);
        assert!(fx.items()[0].pos.y < 100.0, "text rises");
        fx.expire(450.0);
        assert!(fx.is_empty());
    }
}
