/// Inline text with a view/edit toggle, used for profile and frame names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditableText {
    Viewing { text: String },
    Editing { text: String, draft: String },
}

impl EditableText {
    pub fn new(text: impl Into<String>) -> Self {
        EditableText::Viewing { text: text.into() }
    }

    /// The committed text.
    pub fn text(&self) -> &str {
        match self {
            EditableText::Viewing { text } | EditableText::Editing { text, .. } => text,
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, EditableText::Editing { .. })
    }

    pub fn draft(&self) -> Option<&str> {
        match self {
            EditableText::Editing { draft, .. } => Some(draft),
            EditableText::Viewing { .. } => None,
        }
    }

    /// Enter edit mode with the current text as the draft.
    pub fn begin_edit(&mut self) {
        if let EditableText::Viewing { text } = self {
            let text = std::mem::take(text);
            *self = EditableText::Editing {
                draft: text.clone(),
                text,
            };
        }
    }

    /// Mutable access to the draft while editing, for text inputs that edit
    /// in place.
    pub fn draft_mut(&mut self) -> Option<&mut String> {
        match self {
            EditableText::Editing { draft, .. } => Some(draft),
            EditableText::Viewing { .. } => None,
        }
    }

    pub fn set_draft(&mut self, value: impl Into<String>) {
        if let Some(draft) = self.draft_mut() {
            *draft = value.into();
        }
    }

    /// Leave edit mode keeping the draft. Returns the new text if it
    /// differs from the previous one.
    pub fn commit(&mut self) -> Option<String> {
        let EditableText::Editing { text, draft } = self else {
            return None;
        };
        let changed = (*draft != *text).then(|| draft.clone());
        let draft = std::mem::take(draft);
        *self = EditableText::Viewing { text: draft };
        changed
    }

    /// Leave edit mode discarding the draft.
    pub fn cancel(&mut self) {
        if let EditableText::Editing { text, .. } = self {
            let text = std::mem::take(text);
            *self = EditableText::Viewing { text };
        }
    }

    /// Replace the shown text from outside (e.g. after the model changed).
    /// Ignored while editing so an in-progress draft is not clobbered.
    pub fn sync(&mut self, value: &str) {
        if let EditableText::Viewing { text } = self
            && text != value
        {
            *text = value.to_string();
        }
    }
}
