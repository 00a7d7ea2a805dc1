use docchat_core::{Turn, TurnStatus};

const PENDING_LINE: &str = "   ... waiting for answer";
const CONTINUATION: &str = "   ";

/// Where the viewport sits over the laid-out transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollPosition {
    /// First visible line.
    pub offset: usize,
    /// Largest valid offset; equal to `offset` when anchored at the bottom.
    pub max: usize,
    /// False while there is nothing to show.
    pub visible: bool,
}

impl ScrollPosition {
    /// True when the newest line is visible.
    pub fn at_bottom(&self) -> bool {
        self.offset == self.max
    }
}

/// Fixed-height window over the transcript, one text line per row.
///
/// Every call to [`layout`](Self::layout) with a non-empty transcript leaves
/// the window anchored at the bottom so the newest turn is visible. Manual
/// scrolling holds until the next layout.
#[derive(Debug, Clone)]
pub struct TranscriptView {
    viewport_height: usize,
    lines: Vec<String>,
    scroll_offset: usize,
}

impl TranscriptView {
    /// Empty view showing `viewport_height` lines.
    pub fn new(viewport_height: usize) -> Self {
        Self {
            viewport_height: viewport_height.max(1),
            lines: Vec::new(),
            scroll_offset: 0,
        }
    }

    /// Redraws all turns top to bottom and anchors the window at the bottom.
    pub fn layout(&mut self, turns: &[Turn]) {
        self.lines.clear();
        for (i, turn) in turns.iter().enumerate() {
            if i > 0 {
                self.lines.push(String::new());
            }
            push_prefixed(&mut self.lines, "Q: ", turn.question());
            match &turn.status {
                TurnStatus::Pending => self.lines.push(PENDING_LINE.to_string()),
                TurnStatus::Answered { text } => push_prefixed(&mut self.lines, "A: ", text),
                TurnStatus::Failed { reason } => push_prefixed(&mut self.lines, "!  ", reason),
            }
        }

        if self.is_visible() {
            self.scroll_to_bottom();
        } else {
            self.scroll_offset = 0;
        }
    }

    /// False while there is nothing to show.
    pub fn is_visible(&self) -> bool {
        !self.lines.is_empty()
    }

    /// Every laid-out line, visible or not.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Lines inside the viewport.
    pub fn visible_lines(&self) -> &[String] {
        let end = (self.scroll_offset + self.viewport_height).min(self.lines.len());
        &self.lines[self.scroll_offset.min(end)..end]
    }

    /// Rows the viewport shows.
    pub fn viewport_height(&self) -> usize {
        self.viewport_height
    }

    /// Offset at which the last line is at the bottom of the viewport.
    pub fn max_scroll_offset(&self) -> usize {
        self.lines.len().saturating_sub(self.viewport_height)
    }

    /// Anchors the viewport at the newest line.
    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = self.max_scroll_offset();
    }

    /// Moves up by `rows`, stopping at the first line.
    pub fn scroll_up(&mut self, rows: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(rows);
    }

    /// Moves down by `rows`, stopping at the bottom.
    pub fn scroll_down(&mut self, rows: usize) {
        self.scroll_offset = (self.scroll_offset + rows).min(self.max_scroll_offset());
    }

    /// Current offset, bound, and visibility.
    pub fn position(&self) -> ScrollPosition {
        ScrollPosition {
            offset: self.scroll_offset,
            max: self.max_scroll_offset(),
            visible: self.is_visible(),
        }
    }
}

fn push_prefixed(lines: &mut Vec<String>, prefix: &str, text: &str) {
    let mut rows = text.lines();
    lines.push(format!("{prefix}{}", rows.next().unwrap_or_default()));
    for row in rows {
        lines.push(format!("{CONTINUATION}{row}"));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use docchat_core::TurnId;

    fn turn(id: u64, q: &str, status: TurnStatus) -> Turn {
        let mut t = Turn::new(TurnId(id), q).unwrap();
        t.resolve(status).unwrap();
        t
    }

    #[test]
    fn test_empty_transcript_has_no_container() {
        let mut view = TranscriptView::new(5);
        view.layout(&[]);
        assert!(!view.is_visible());
        assert_eq!(view.position().offset, 0);
        assert!(view.visible_lines().is_empty());
    }

    #[test]
    fn test_layout_formats_each_status() {
        let turns = vec![
            turn(0, "Title?", TurnStatus::Answered { text: "Annual report".into() }),
            turn(1, "Author?", TurnStatus::Failed { reason: "HTTP error: refused".into() }),
            turn(2, "Year?", TurnStatus::Pending),
        ];
        let mut view = TranscriptView::new(50);
        view.layout(&turns);
        assert_eq!(
            view.lines(),
            &[
                "Q: Title?",
                "A: Annual report",
                "",
                "Q: Author?",
                "!  HTTP error: refused",
                "",
                "Q: Year?",
                PENDING_LINE,
            ]
        );
    }

    #[test]
    fn test_multiline_answer_is_indented() {
        let turns = vec![turn(
            0,
            "List them",
            TurnStatus::Answered { text: "one\ntwo".into() },
        )];
        let mut view = TranscriptView::new(10);
        view.layout(&turns);
        assert_eq!(view.lines(), &["Q: List them", "A: one", "   two"]);
    }

    #[test]
    fn test_layout_anchors_bottom_after_manual_scroll() {
        let turns: Vec<Turn> = (0..5)
            .map(|i| turn(i, &format!("q{i}"), TurnStatus::Answered { text: format!("a{i}") }))
            .collect();
        let mut view = TranscriptView::new(4);
        view.layout(&turns);
        assert!(view.position().at_bottom());
        assert_eq!(view.visible_lines().last().unwrap(), "A: a4");

        view.scroll_up(3);
        assert!(!view.position().at_bottom());
        view.scroll_down(100);
        assert!(view.position().at_bottom());

        view.scroll_up(100);
        assert_eq!(view.position().offset, 0);
        assert_eq!(view.visible_lines()[0], "Q: q0");

        view.layout(&turns);
        assert!(view.position().at_bottom());
    }

    #[test]
    fn test_short_transcript_fits_without_scroll() {
        let turns = vec![turn(0, "q", TurnStatus::Pending)];
        let mut view = TranscriptView::new(10);
        view.layout(&turns);
        assert_eq!(view.position(), ScrollPosition { offset: 0, max: 0, visible: true });
        assert_eq!(view.visible_lines().len(), 2);
    }
}
