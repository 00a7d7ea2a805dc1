use docchat_core::{DocchatError, DocchatResult, Turn, TurnId, TurnStatus};

/// Ordered question/answer turns of one conversation.
///
/// Insertion order is conversation order and render order. Turns are never
/// removed or reordered; each one is resolved at most once, by id.
#[derive(Debug, Default)]
pub struct Transcript {
    turns: Vec<Turn>,
    next_id: u64,
}

impl Transcript {
    /// Empty transcript; the first turn gets id `#0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a pending turn and returns its id.
    pub fn push(&mut self, question: impl Into<String>) -> DocchatResult<TurnId> {
        let id = TurnId(self.next_id);
        let turn = Turn::new(id, question)?;
        self.next_id += 1;
        self.turns.push(turn);
        Ok(id)
    }

    /// Resolves the turn with this id. Other turns are never touched,
    /// whatever order answers arrive in.
    pub fn resolve(&mut self, id: TurnId, outcome: TurnStatus) -> DocchatResult<()> {
        self.get_mut(id)
            .ok_or(DocchatError::UnknownTurn(id))?
            .resolve(outcome)
    }

    /// Turn with the given id.
    pub fn get(&self, id: TurnId) -> Option<&Turn> {
        self.turns.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: TurnId) -> Option<&mut Turn> {
        self.turns.iter_mut().find(|t| t.id == id)
    }

    /// All turns in submission order.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Most recently submitted turn.
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Number of turns.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// True before the first question.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Turns still waiting for an answer.
    pub fn pending_count(&self) -> usize {
        self.turns.iter().filter(|t| t.is_pending()).count()
    }
}
