/// Components that may intercept keys before normal mode handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookTarget {
    ImageMenu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(u64);

/// Registry of app-wide key hooks.
///
/// A hook sees key presses regardless of which pane has focus. Every
/// `subscribe` must be paired with exactly one `unsubscribe` by its owner.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyHooks {
    next_id: u64,
    active: Vec<(HookId, HookTarget)>,
    attached: u64,
    detached: u64,
}

impl KeyHooks {
    pub fn subscribe(&mut self, target: HookTarget) -> HookId {
        let id = HookId(self.next_id);
        self.next_id += 1;
        self.active.push((id, target));
        self.attached += 1;
        tracing::debug!(?id, ?target, "key hook attached");
        id
    }

    /// Returns false when `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: HookId) -> bool {
        let Some(pos) = self.active.iter().position(|(active, _)| *active == id) else {
            return false;
        };
        let (_, target) = self.active.remove(pos);
        self.detached += 1;
        tracing::debug!(?id, ?target, "key hook detached");
        true
    }

    /// The most recently attached hook; it gets first look at keys.
    #[must_use]
    pub fn top(&self) -> Option<HookTarget> {
        self.active.last().map(|(_, target)| *target)
    }

    #[must_use]
    pub fn is_subscribed(&self, id: HookId) -> bool {
        self.active.iter().any(|(active, _)| *active == id)
    }

    #[must_use]
    pub fn attach_count(&self) -> u64 {
        self.attached
    }

    #[must_use]
    pub fn detach_count(&self) -> u64 {
        self.detached
    }
}
