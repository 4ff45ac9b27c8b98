use std::collections::VecDeque;

/// Notifications for the UI layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerEvent {
    ModelLoaded { faces: usize, vertices: usize },
}

impl ViewerEvent {
    pub fn faces_text(&self) -> Option<String> {
        match self {
            ViewerEvent::ModelLoaded { faces, .. } => Some(faces.to_string()),
        }
    }

    pub fn vertices_text(&self) -> Option<String> {
        match self {
            ViewerEvent::ModelLoaded { vertices, .. } => Some(vertices.to_string()),
        }
    }
}

/// FIFO of pending notifications, drained by the host between frames.
#[derive(Debug, Default)]
pub struct EventQueue {
    pending: VecDeque<ViewerEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: ViewerEvent) {
        log::debug!("queued {:?}", event);
        self.pending.push_back(event);
    }

    pub fn drain(&mut self) -> Vec<ViewerEvent> {
        self.pending.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
