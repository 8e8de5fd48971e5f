use crate::domain::ports::MountSurfaces;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// What a surface currently shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceContent {
    pub notice: Option<String>,
    pub detail: Option<Value>,
}

/// An in-memory set of named mount surfaces.
///
/// Only declared surfaces resolve as mount targets. Clearing a surface wipes
/// its content but keeps it declared.
#[derive(Debug, Default, Clone)]
pub struct InMemorySurfaces {
    surfaces: Arc<RwLock<HashMap<String, SurfaceContent>>>,
}

impl InMemorySurfaces {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_surfaces<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let surfaces = Self::new();
        for id in ids {
            surfaces.declare(id);
        }
        surfaces
    }

    pub fn declare(&self, id: impl Into<String>) {
        self.surfaces.write().entry(id.into()).or_default();
    }

    pub fn remove(&self, id: &str) {
        self.surfaces.write().remove(id);
    }

    pub fn content(&self, id: &str) -> Option<SurfaceContent> {
        self.surfaces.read().get(id).cloned()
    }

    pub fn notice(&self, id: &str) -> Option<String> {
        self.content(id).and_then(|content| content.notice)
    }

    pub fn detail(&self, id: &str) -> Option<Value> {
        self.content(id).and_then(|content| content.detail)
    }
}

impl MountSurfaces for InMemorySurfaces {
    fn exists(&self, target: &str) -> bool {
        self.surfaces.read().contains_key(target)
    }

    fn show_notice(&self, target: &str, notice: &str) {
        if let Some(content) = self.surfaces.write().get_mut(target) {
            content.notice = Some(notice.to_string());
        }
    }

    fn render_detail(&self, target: &str, detail: &Value) {
        if let Some(content) = self.surfaces.write().get_mut(target) {
            content.detail = Some(detail.clone());
        }
    }

    fn clear(&self, target: &str) {
        if let Some(content) = self.surfaces.write().get_mut(target) {
            *content = SurfaceContent::default();
        }
    }

    fn clear_all(&self) {
        for content in self.surfaces.write().values_mut() {
            *content = SurfaceContent::default();
        }
    }
}
