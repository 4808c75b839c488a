use std::collections::BTreeSet;
use std::fmt;

/// A line flagged as a duplicate, with its index in the original text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateLine {
    pub index: usize,
    pub text: String,
}

impl From<(usize, String)> for DuplicateLine {
    fn from((index, text): (usize, String)) -> Self {
        Self { index, text }
    }
}

/// Selection state for reviewing detected duplicate lines
///
/// The caller detects the duplicates and decides what "apply" means; this
/// only tracks which of the offered lines the user wants restored.
pub struct DuplicateReview {
    lines: Vec<DuplicateLine>,
    selected: BTreeSet<usize>,
    on_apply: Box<dyn FnMut() + Send>,
}

impl DuplicateReview {
    pub fn new<I, L>(lines: I, on_apply: impl FnMut() + Send + 'static) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<DuplicateLine>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            selected: BTreeSet::new(),
            on_apply: Box::new(on_apply),
        }
    }

    pub fn lines(&self) -> &[DuplicateLine] {
        &self.lines
    }

    /// Flip the selection of `index`; returns whether it is now selected
    ///
    /// Indices not offered for review are ignored.
    pub fn toggle(&mut self, index: usize) -> bool {
        if !self.offers(index) {
            return false;
        }
        if !self.selected.remove(&index) {
            self.selected.insert(index);
        }
        self.selected.contains(&index)
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    /// Selected indices in ascending order
    pub fn selected(&self) -> Vec<usize> {
        self.selected.iter().copied().collect()
    }

    pub fn select_all(&mut self) {
        self.selected = self.lines.iter().map(|l| l.index).collect();
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Invoke the caller's apply callback
    pub fn apply(&mut self) {
        log::debug!("Applying duplicate review with {} selected", self.selected.len());
        (self.on_apply)();
    }

    fn offers(&self, index: usize) -> bool {
        self.lines.iter().any(|l| l.index == index)
    }
}

impl fmt::Debug for DuplicateReview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DuplicateReview")
            .field("lines", &self.lines)
            .field("selected", &self.selected)
            .finish_non_exhaustive()
    }
}
