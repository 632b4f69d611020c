use dom::{Document, DomError, NativeRange, NodeKey, RangeApi, TextRange};

/// A document together with its platform selection.
///
/// Standard hosts may have no selection at all. Legacy hosts always
/// answer with a range, collapsed at the start of the body when the user
/// has not selected anything.
pub struct Window {
    document: Document,
    api: RangeApi,
    selection: Option<NativeRange>,
}

impl Window {
    pub fn new(api: RangeApi) -> Self {
        Self::with_document(Document::new(), api)
    }

    pub fn with_document(document: Document, api: RangeApi) -> Self {
        Self {
            document,
            api,
            selection: None,
        }
    }

    pub fn api(&self) -> RangeApi {
        self.api
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// A copy of the active selection range.
    pub fn selection_range(&self) -> Option<NativeRange> {
        match self.api {
            RangeApi::Standard => self.selection.clone(),
            RangeApi::Legacy => Some(
                self.selection
                    .clone()
                    .unwrap_or(NativeRange::LegacyText(TextRange::collapsed_at(0))),
            ),
        }
    }

    /// The live selection range, for hosts that adjust it in place (e.g.
    /// while extending a selection with the keyboard).
    pub fn selection_mut(&mut self) -> Option<&mut NativeRange> {
        self.selection.as_mut()
    }

    /// Replaces the active selection with a copy of `range`.
    pub fn set_selection(&mut self, range: &NativeRange) {
        log::trace!(target: "platform.window", "set_selection: {range:?}");
        self.selection = Some(range.clone());
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn create_native_range(
        &self,
        node: NodeKey,
        contents_only: bool,
    ) -> Result<NativeRange, DomError> {
        NativeRange::for_node(&self.document, self.api, node, contents_only)
    }
}
