use crate::domain::models::{ImageAttrs, Range};
use anyhow::Result;

#[derive(Debug, Clone, PartialEq)]
pub enum EditorOp {
    Focus,
    Blur,
    DeleteRange(Range),
    SetImage(ImageAttrs),
    InsertContent(String),
}

/// The document-mutation surface the menus are allowed to touch.
#[cfg_attr(test, mockall::automock)]
pub trait DocumentEditor {
    fn apply(&mut self, op: EditorOp) -> Result<()>;
}

/// Queues operations and applies them in order on `run`.
///
/// ```ignore
/// EditorChain::new(editor).focus().delete_range(range).run()?;
/// ```
#[must_use = "an editor chain does nothing until `run` is called"]
pub struct EditorChain<'a> {
    editor: &'a mut dyn DocumentEditor,
    ops: Vec<EditorOp>,
}

impl<'a> EditorChain<'a> {
    pub fn new(editor: &'a mut dyn DocumentEditor) -> Self {
        Self {
            editor,
            ops: Vec::new(),
        }
    }

    pub fn focus(mut self) -> Self {
        self.ops.push(EditorOp::Focus);
        self
    }

    pub fn blur(mut self) -> Self {
        self.ops.push(EditorOp::Blur);
        self
    }

    pub fn delete_range(mut self, range: Range) -> Self {
        self.ops.push(EditorOp::DeleteRange(range));
        self
    }

    pub fn set_image(mut self, attrs: ImageAttrs) -> Self {
        self.ops.push(EditorOp::SetImage(attrs));
        self
    }

    pub fn insert_content(mut self, content: impl Into<String>) -> Self {
        self.ops.push(EditorOp::InsertContent(content.into()));
        self
    }

    /// Applies the queued operations, stopping at the first failure.
    pub fn run(self) -> Result<()> {
        for op in self.ops {
            self.editor.apply(op)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Position;
    use mockall::Sequence;

    #[test]
    fn test_chain_applies_in_order() {
        let mut mock = MockDocumentEditor::new();
        let mut seq = Sequence::new();
        let range = Range::new(Position::new(0, 0), Position::new(0, 1));

        mock.expect_apply()
            .withf(|op| *op == EditorOp::Focus)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        mock.expect_apply()
            .withf(move |op| *op == EditorOp::DeleteRange(range))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        EditorChain::new(&mut mock)
            .focus()
            .delete_range(range)
            .run()
            .unwrap();
    }

    #[test]
    fn test_chain_stops_at_first_error() {
        let mut mock = MockDocumentEditor::new();
        mock.expect_apply()
            .withf(|op| *op == EditorOp::Focus)
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("detached")));
        mock.expect_apply()
            .withf(|op| *op == EditorOp::Blur)
            .never();

        let result = EditorChain::new(&mut mock).focus().blur().run();
        assert!(result.is_err());
    }
}
