use std::convert::Infallible;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::editor::edits;
use crate::editor::history::History;
use crate::models::cv::{
    Document, Education, EducationPatch, PersonalDetailsPatch, SettingsPatch, Template,
    WorkExperience, WorkExperiencePatch,
};
use crate::storage::{KvStore, DOCUMENT_KEY};

/// Snapshot of the editor as the UI sees it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorView {
    pub document: Arc<Document>,
    pub can_undo: bool,
    pub can_redo: bool,
}

impl EditorView {
    fn of(history: &History) -> Self {
        Self {
            document: Arc::clone(history.present()),
            can_undo: history.can_undo(),
            can_redo: history.can_redo(),
        }
    }
}

#[derive(Debug, Error)]
pub enum EditError {
    #[error("Duplicate record id '{0}'")]
    DuplicateId(String),
}

/// The single authoritative holder of the live document.
///
/// Every mutating method is a commit: the previous document goes onto the undo
/// stack, redo is cleared, and the new document is published to subscribers
/// (the autosaver among them). Edits that would change nothing do not commit.
/// Each returns the view taken under the same lock as its commit.
pub struct DocumentStore {
    history: Mutex<History>,
    changes: watch::Sender<Arc<Document>>,
}

impl DocumentStore {
    pub fn new(initial: Document) -> Self {
        let history = History::new(initial);
        let (changes, _) = watch::channel(Arc::clone(history.present()));
        Self {
            history: Mutex::new(history),
            changes,
        }
    }

    /// Restores the autosaved document, falling back to the empty default when
    /// nothing is stored or the stored value cannot be read.
    pub async fn load(kv: &dyn KvStore) -> Self {
        let initial = match kv.get(DOCUMENT_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<Document>(&raw) {
                Ok(doc) => {
                    info!("Restored autosaved document");
                    doc
                }
                Err(e) => {
                    warn!("Stored document is corrupt, starting from default: {e}");
                    Document::default()
                }
            },
            Ok(None) => {
                info!("No autosaved document, starting from default");
                Document::default()
            }
            Err(e) => {
                warn!("Failed to read stored document, starting from default: {e}");
                Document::default()
            }
        };
        Self::new(initial)
    }

    fn lock(&self) -> MutexGuard<'_, History> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn current(&self) -> Arc<Document> {
        Arc::clone(self.lock().present())
    }

    pub fn view(&self) -> EditorView {
        EditorView::of(&self.lock())
    }

    /// Receives the live document every time it changes.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Document>> {
        self.changes.subscribe()
    }

    /// Applies `edit` to the current document and commits the result, if any.
    /// Publishing happens under the same lock so subscribers observe changes in
    /// commit order. An `Err` from `edit` leaves everything untouched.
    fn try_commit_with<E, F>(&self, op: &str, edit: F) -> Result<EditorView, E>
    where
        F: FnOnce(&Document) -> Result<Option<Document>, E>,
    {
        let mut history = self.lock();
        match edit(history.present())? {
            Some(next) => {
                let next = history.commit(next);
                self.changes.send_replace(next);
                debug!(op, undo_depth = history.undo_depth(), "Committed document change");
            }
            None => debug!(op, "Edit changed nothing, skipping commit"),
        }
        Ok(EditorView::of(&history))
    }

    fn commit_with<F>(&self, op: &str, edit: F) -> EditorView
    where
        F: FnOnce(&Document) -> Option<Document>,
    {
        match self.try_commit_with::<Infallible, _>(op, |doc| Ok(edit(doc))) {
            Ok(view) => view,
            Err(never) => match never {},
        }
    }

    // ── Core commits ──────────────────────────────────────────────────────

    pub fn update_personal_details(&self, patch: &PersonalDetailsPatch) -> EditorView {
        self.commit_with("personal_details", |doc| {
            Some(Document {
                personal_details: patch.apply(&doc.personal_details),
                ..doc.clone()
            })
        })
    }

    pub fn update_professional_summary(&self, summary: impl Into<String>) -> EditorView {
        let summary = summary.into();
        self.commit_with("professional_summary", |doc| {
            Some(Document {
                professional_summary: summary,
                ..doc.clone()
            })
        })
    }

    /// Replaces the whole sequence. Two records sharing an id are rejected.
    pub fn update_work_experience(
        &self,
        records: Vec<WorkExperience>,
    ) -> Result<EditorView, EditError> {
        if let Some(id) = edits::duplicate_id(&records) {
            return Err(EditError::DuplicateId(id.to_string()));
        }
        Ok(self.commit_with("work_experience", |doc| {
            Some(Document {
                work_experience: records,
                ..doc.clone()
            })
        }))
    }

    /// Replaces the whole sequence. Two records sharing an id are rejected.
    pub fn update_education(&self, records: Vec<Education>) -> Result<EditorView, EditError> {
        if let Some(id) = edits::duplicate_id(&records) {
            return Err(EditError::DuplicateId(id.to_string()));
        }
        Ok(self.commit_with("education", |doc| {
            Some(Document {
                education: records,
                ..doc.clone()
            })
        }))
    }

    /// Replaces the skill set, trimmed and without blanks or duplicates.
    pub fn update_skills(&self, skills: Vec<String>) -> EditorView {
        let skills = edits::dedup_skills(&skills);
        self.commit_with("skills", |doc| {
            Some(Document {
                skills,
                ..doc.clone()
            })
        })
    }

    pub fn update_template(&self, template: Template) -> EditorView {
        self.commit_with("template", |doc| {
            Some(Document {
                template,
                ..doc.clone()
            })
        })
    }

    pub fn update_settings(&self, patch: &SettingsPatch) -> EditorView {
        self.commit_with("settings", |doc| {
            Some(Document {
                settings: patch.apply(&doc.settings),
                ..doc.clone()
            })
        })
    }

    /// Replaces the whole document in a single commit (version restore, import).
    pub fn restore(&self, document: Document) -> EditorView {
        self.commit_with("restore", |_| Some(document))
    }

    // ── Sequence edits ────────────────────────────────────────────────────

    pub fn add_skill(&self, skill: &str) -> EditorView {
        self.commit_with("add_skill", |doc| {
            edits::add_skill(&doc.skills, skill).map(|skills| Document {
                skills,
                ..doc.clone()
            })
        })
    }

    pub fn remove_skill(&self, skill: &str) -> EditorView {
        self.commit_with("remove_skill", |doc| {
            edits::remove_skill(&doc.skills, skill).map(|skills| Document {
                skills,
                ..doc.clone()
            })
        })
    }

    /// Appends a new work-experience record built from `patch` and returns its id
    /// along with the resulting view.
    pub fn add_work_experience(&self, patch: &WorkExperiencePatch) -> (String, EditorView) {
        let record = patch.apply(&WorkExperience::new());
        let id = record.id.clone();
        let view = self.commit_with("add_work_experience", |doc| {
            edits::append_record(&doc.work_experience, record).map(|work_experience| Document {
                work_experience,
                ..doc.clone()
            })
        });
        (id, view)
    }

    /// Merges `patch` into the record with `id`; `None` when there is no such record.
    pub fn edit_work_experience(
        &self,
        id: &str,
        patch: &WorkExperiencePatch,
    ) -> Option<EditorView> {
        self.try_commit_with("edit_work_experience", |doc| {
            edits::merge_record(&doc.work_experience, id, patch)
                .map(|work_experience| {
                    Some(Document {
                        work_experience,
                        ..doc.clone()
                    })
                })
                .ok_or(())
        })
        .ok()
    }

    pub fn remove_work_experience(&self, id: &str) -> EditorView {
        self.commit_with("remove_work_experience", |doc| {
            edits::remove_record(&doc.work_experience, id).map(|work_experience| Document {
                work_experience,
                ..doc.clone()
            })
        })
    }

    pub fn add_education(&self, patch: &EducationPatch) -> (String, EditorView) {
        let record = patch.apply(&Education::new());
        let id = record.id.clone();
        let view = self.commit_with("add_education", |doc| {
            edits::append_record(&doc.education, record).map(|education| Document {
                education,
                ..doc.clone()
            })
        });
        (id, view)
    }

    /// Merges `patch` into the record with `id`; `None` when there is no such record.
    pub fn edit_education(&self, id: &str, patch: &EducationPatch) -> Option<EditorView> {
        self.try_commit_with("edit_education", |doc| {
            edits::merge_record(&doc.education, id, patch)
                .map(|education| {
                    Some(Document {
                        education,
                        ..doc.clone()
                    })
                })
                .ok_or(())
        })
        .ok()
    }

    pub fn remove_education(&self, id: &str) -> EditorView {
        self.commit_with("remove_education", |doc| {
            edits::remove_record(&doc.education, id).map(|education| Document {
                education,
                ..doc.clone()
            })
        })
    }

    // ── Undo / redo ───────────────────────────────────────────────────────

    /// Steps back one commit. With nothing to undo this is a no-op.
    pub fn undo(&self) -> EditorView {
        let mut history = self.lock();
        if let Some(doc) = history.undo() {
            self.changes.send_replace(doc);
            debug!(undo_depth = history.undo_depth(), "Undo");
        }
        EditorView::of(&history)
    }

    /// Re-applies the most recently undone commit, if any.
    pub fn redo(&self) -> EditorView {
        let mut history = self.lock();
        if let Some(doc) = history.redo() {
            self.changes.send_replace(doc);
            debug!(redo_depth = history.redo_depth(), "Redo");
        }
        EditorView::of(&history)
    }
}
