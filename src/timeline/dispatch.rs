use crate::{
    foundation::error::{ChoreoError, ChoreoResult},
    timeline::stage::{StageId, Timeline},
};

/// Stage-index keyed handler table, built once when a sequence is set up.
///
/// Several stages may map to the same handler value; the handler then
/// branches on the stage id it receives.
#[derive(Clone, Debug)]
pub struct DispatchTable<H> {
    handlers: Vec<H>,
}

impl<H: Copy> DispatchTable<H> {
    pub fn build<S: StageId>(timeline: &Timeline<S>, handler_for: impl Fn(S) -> H) -> Self {
        Self {
            handlers: timeline.stages().iter().map(|s| handler_for(s.id)).collect(),
        }
    }

    pub fn get(&self, index: usize) -> ChoreoResult<H> {
        self.handlers.get(index).copied().ok_or_else(|| {
            ChoreoError::timeline(format!(
                "no handler registered for stage index {index} ({} stages)",
                self.handlers.len()
            ))
        })
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
