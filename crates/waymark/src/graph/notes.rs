//! Notes and circles: the two entities with no coordinate links of their own.

use tracing::debug;

use super::error::{GraphError, Result};
use super::ids::{CircleId, NoteId};
use super::store::ElementGraph;
use super::types::{
    Circle, CircleDeletion, CircleDraft, CirclePatch, ElementKind, Note, NoteDraft, NoteLink,
    NotePatch,
};

impl ElementGraph {
    /// Add a note; a link must point at an existing entity.
    pub fn add_note(&mut self, draft: NoteDraft) -> Result<Note> {
        let id = draft.id.unwrap_or_else(NoteId::generate);
        if self.notes.contains(&id) {
            return Err(GraphError::DuplicateId {
                kind: ElementKind::Note,
                id: id.0,
            });
        }
        if let Some(link) = &draft.link {
            self.ensure_link_target(link)?;
        }
        let note = Note {
            id: id.clone(),
            title: draft.title,
            content: draft.content,
            link: draft.link,
        };
        self.notes.insert(id.clone(), note.clone());
        debug!(note = %id, linked = note.link.is_some(), "note added");
        Ok(note)
    }

    pub fn update_note(&mut self, id: &NoteId, patch: NotePatch) -> Result<Note> {
        if let Some(Some(link)) = &patch.link {
            self.ensure_link_target(link)?;
        }
        let note = self
            .notes
            .get_mut(id)
            .ok_or_else(|| GraphError::UnknownNote(id.clone()))?;
        if let Some(title) = patch.title {
            note.title = title;
        }
        if let Some(content) = patch.content {
            note.content = content;
        }
        if let Some(link) = patch.link {
            note.link = link;
        }
        debug!(note = %id, "note updated");
        Ok(note.clone())
    }

    pub fn delete_note(&mut self, id: &NoteId) -> Option<Note> {
        let note = self.notes.remove(id)?;
        debug!(note = %id, "note deleted");
        Some(note)
    }

    pub fn add_circle(&mut self, draft: CircleDraft) -> Result<Circle> {
        let id = draft.id.unwrap_or_else(CircleId::generate);
        if self.circles.contains(&id) {
            return Err(GraphError::DuplicateId {
                kind: ElementKind::Circle,
                id: id.0,
            });
        }
        let circle = Circle {
            id: id.clone(),
            name: draft.name,
            center: draft.center,
            radius_km: draft.radius_km,
            color: draft.color,
            extra: Default::default(),
        };
        self.circles.insert(id.clone(), circle.clone());
        debug!(circle = %id, radius_km = circle.radius_km, "circle added");
        Ok(circle)
    }

    pub fn update_circle(&mut self, id: &CircleId, patch: CirclePatch) -> Result<Circle> {
        let circle = self
            .circles
            .get_mut(id)
            .ok_or_else(|| GraphError::UnknownCircle(id.clone()))?;
        if let Some(name) = patch.name {
            circle.name = name;
        }
        if let Some(center) = patch.center {
            circle.center = center;
        }
        if let Some(radius_km) = patch.radius_km {
            circle.radius_km = radius_km;
        }
        if let Some(color) = patch.color {
            circle.color = color;
        }
        debug!(circle = %id, "circle updated");
        Ok(circle.clone())
    }

    pub fn delete_circle(&mut self, id: &CircleId) -> Option<CircleDeletion> {
        let circle = self.circles.remove(id)?;
        let deleted_notes = self.drop_notes_linked_to(&NoteLink::Circle(id.clone()));
        debug!(circle = %id, notes = deleted_notes.len(), "circle deleted");
        Some(CircleDeletion {
            circle,
            deleted_notes,
        })
    }

    fn ensure_link_target(&self, link: &NoteLink) -> Result<()> {
        if self.link_target_exists(link) {
            Ok(())
        } else {
            Err(GraphError::UnknownLinkTarget {
                kind: link.kind(),
                id: link.id_str().to_string(),
            })
        }
    }
}
