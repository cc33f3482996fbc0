use std::path::Path;

use syllo_core::{AssetLoader, Conclusion, Judgment, PhaseKind, Response, StimulusItem};
use tracing::{debug, warn};

use crate::error::StimulusError;

/// Ordered stimuli of one phase with a cursor that only moves forward.
///
/// `cursor == len()` means the phase has been worked through.
#[derive(Debug, Clone)]
pub struct StimulusSequence<A> {
    kind: PhaseKind,
    items: Vec<StimulusItem<A>>,
    cursor: usize,
}

impl<A> StimulusSequence<A> {
    /// Loads every file in `dir` whose name carries an accepted tag at
    /// `tag_offset`, in filename order. Misnamed files are skipped.
    pub fn load<L>(
        kind: PhaseKind,
        dir: &Path,
        tag_offset: usize,
        loader: &mut L,
    ) -> Result<Self, StimulusError>
    where
        L: AssetLoader<Asset = A>,
    {
        let directory_err = |source| StimulusError::Directory {
            path: dir.to_path_buf(),
            source,
        };

        let mut names = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(directory_err)? {
            let entry = entry.map_err(directory_err)?;
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => warn!(?raw, dir = %dir.display(), "non UTF-8 filename, skipping"),
            }
        }
        names.sort();

        let mut items = Vec::with_capacity(names.len());
        for name in names {
            let path = dir.join(&name);
            let Some(tag) = name.chars().nth(tag_offset).filter(|c| kind.accepts_tag(*c)) else {
                warn!(
                    file = %path.display(),
                    "incorrect file type or naming convention, skipping file"
                );
                continue;
            };
            if !path.is_file() {
                warn!(file = %path.display(), "not a regular file, skipping");
                continue;
            }
            let asset = loader.load(&path)?;
            items.push(StimulusItem::from_tagged(kind, tag, asset));
        }

        if items.is_empty() {
            if kind == PhaseKind::Conclusion {
                return Err(StimulusError::Empty {
                    kind,
                    path: dir.to_path_buf(),
                });
            }
            warn!(?kind, dir = %dir.display(), "stimulus sequence is empty");
        }
        debug!(?kind, dir = %dir.display(), count = items.len(), "loaded stimuli");

        Ok(Self::from_items(kind, items))
    }

    pub fn from_items(kind: PhaseKind, items: Vec<StimulusItem<A>>) -> Self {
        Self {
            kind,
            items,
            cursor: 0,
        }
    }

    pub fn kind(&self) -> PhaseKind {
        self.kind
    }

    pub fn items(&self) -> &[StimulusItem<A>] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// 1-based position of the current item.
    pub fn position(&self) -> usize {
        self.cursor + 1
    }

    pub fn is_complete(&self) -> bool {
        self.cursor >= self.items.len()
    }

    /// True on the final item, or when there is nothing left to show.
    pub fn is_last(&self) -> bool {
        self.cursor + 1 >= self.items.len()
    }

    /// `None` once the sequence is complete.
    pub fn current(&self) -> Option<&StimulusItem<A>> {
        self.items.get(self.cursor)
    }

    /// Moves to the next item. Ignored when already complete.
    pub fn advance(&mut self) -> bool {
        if self.is_complete() {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Display time of the current conclusion, if it has been shown.
    pub fn current_display_time(&self) -> Option<u64> {
        self.current()
            .and_then(StimulusItem::as_conclusion)
            .and_then(Conclusion::display_time_ns)
    }

    /// Stamps the first display of the current conclusion. Returns true
    /// only on the pass that set it.
    pub fn mark_displayed(&mut self, now_ns: u64) -> bool {
        self.items
            .get_mut(self.cursor)
            .and_then(StimulusItem::as_conclusion_mut)
            .is_some_and(|c| c.mark_displayed(now_ns))
    }

    /// Answers the current conclusion and moves past it.
    pub fn record_judgment(&mut self, judgment: Judgment, now_ns: u64) -> Option<Response> {
        let response = *self
            .items
            .get_mut(self.cursor)
            .and_then(StimulusItem::as_conclusion_mut)?
            .answer(judgment, now_ns)?;
        self.cursor += 1;
        Some(response)
    }

    pub fn conclusions(&self) -> impl Iterator<Item = &Conclusion<A>> {
        self.items.iter().filter_map(StimulusItem::as_conclusion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use syllo_core::PathLoader;

    fn folder(files: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for f in files {
            fs::write(dir.path().join(f), b"img").unwrap();
        }
        dir
    }

    fn conclusions(n: usize) -> StimulusSequence<()> {
        let items = (0..n)
            .map(|i| StimulusItem::Conclusion(Conclusion::new((), i % 2 == 0)))
            .collect();
        StimulusSequence::from_items(PhaseKind::Conclusion, items)
    }

    #[test]
    fn conclusion_folder_skips_misnamed_files() {
        let dir = folder(&["02_F_a.jpg", "bad.jpg", "01_T_a.jpg"]);
        let seq = StimulusSequence::load(PhaseKind::Conclusion, dir.path(), 3, &mut PathLoader)
            .unwrap();
        assert_eq!(seq.len(), 2);
        let labels: Vec<bool> = seq.conclusions().map(|c| c.label).collect();
        assert_eq!(labels, vec![true, false]);
        let names: Vec<PathBuf> = seq.items().iter().map(|i| i.image().clone()).collect();
        assert_eq!(
            names,
            vec![dir.path().join("01_T_a.jpg"), dir.path().join("02_F_a.jpg")]
        );
    }

    #[test]
    fn premise_folder_requires_p_tag() {
        let dir = folder(&["01_P.png", "02_T.png", "03_P.png"]);
        let seq =
            StimulusSequence::load(PhaseKind::Premise, dir.path(), 3, &mut PathLoader).unwrap();
        assert_eq!(seq.len(), 2);
        assert!(seq.conclusions().next().is_none());
    }

    #[test]
    fn missing_directory_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = StimulusSequence::load(
            PhaseKind::Test,
            &dir.path().join("nope"),
            3,
            &mut PathLoader,
        )
        .unwrap_err();
        assert!(matches!(err, StimulusError::Directory { .. }));
    }

    #[test]
    fn empty_conclusion_folder_is_fatal() {
        let dir = folder(&["bad.jpg"]);
        let err = StimulusSequence::load(PhaseKind::Conclusion, dir.path(), 3, &mut PathLoader)
            .unwrap_err();
        assert!(matches!(err, StimulusError::Empty { .. }));
    }

    #[test]
    fn advance_stops_at_end() {
        let mut seq = conclusions(2);
        assert!(seq.advance());
        assert!(seq.advance());
        assert!(seq.is_complete());
        assert!(!seq.advance());
        assert_eq!(seq.cursor(), 2);
        assert!(seq.current().is_none());
    }

    #[test]
    fn first_display_is_stamped_once() {
        let mut seq = conclusions(1);
        assert!(seq.mark_displayed(10));
        assert!(!seq.mark_displayed(99));
        assert_eq!(seq.current_display_time(), Some(10));
    }

    #[test]
    fn judgment_records_and_advances() {
        let mut seq = conclusions(2);
        seq.mark_displayed(1_000_000_000);
        let r = seq.record_judgment(Judgment::Invalid, 3_000_000_000).unwrap();
        assert!(!r.user_input);
        assert!((r.reaction_time - 2.0).abs() < 1e-9);
        assert_eq!(seq.cursor(), 1);
        seq.record_judgment(Judgment::Valid, 3_000_000_000).unwrap();
        assert!(seq.record_judgment(Judgment::Valid, 4_000_000_000).is_none());
        assert_eq!(seq.cursor(), 2);
    }

    #[test]
    fn judgment_is_ignored_on_non_conclusions() {
        let mut seq = StimulusSequence::from_items(PhaseKind::Premise, vec![StimulusItem::Premise(())]);
        assert!(seq.record_judgment(Judgment::Valid, 1).is_none());
        assert!(!seq.mark_displayed(1));
        assert_eq!(seq.cursor(), 0);
    }
}
