//! Form slots: draft fields plus the submitting flag that blocks re-entry.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// One on-screen form instance.
///
/// A slot only guards itself; two slots holding the same kind of draft submit independently.
#[derive(Debug, Default)]
pub struct FormSlot<T> {
    draft: Mutex<T>,
    submitting: AtomicBool,
}

impl<T: Clone + Default> FormSlot<T> {
    pub fn new(draft: T) -> Self {
        Self {
            draft: Mutex::new(draft),
            submitting: AtomicBool::new(false),
        }
    }

    pub fn draft(&self) -> T {
        self.draft.lock().expect("form mutex poisoned").clone()
    }

    pub fn edit(&self, apply: impl FnOnce(&mut T)) {
        let mut guard = self.draft.lock().expect("form mutex poisoned");
        apply(&mut guard);
    }

    pub fn replace(&self, draft: T) {
        *self.draft.lock().expect("form mutex poisoned") = draft;
    }

    /// Clear every field back to its default.
    pub fn reset(&self) {
        self.replace(T::default());
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Claim the slot for one submission. `None` while another submission is outstanding.
    pub(crate) fn begin(&self) -> Option<SubmitGuard<'_, T>> {
        self.submitting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SubmitGuard { slot: self })
    }
}

/// Releases the submitting flag when the attempt ends, whatever the outcome.
#[derive(Debug)]
pub(crate) struct SubmitGuard<'a, T> {
    slot: &'a FormSlot<T>,
}

impl<T> Drop for SubmitGuard<'_, T> {
    fn drop(&mut self) {
        self.slot.submitting.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    struct Draft {
        name: String,
    }

    #[test]
    fn begin_blocks_reentry_until_guard_drops() {
        let slot = FormSlot::new(Draft::default());
        let guard = slot.begin().expect("first claim succeeds");
        assert!(slot.is_submitting());
        assert!(slot.begin().is_none());

        drop(guard);
        assert!(!slot.is_submitting());
        assert!(slot.begin().is_some());
    }

    #[test]
    fn separate_slots_do_not_share_the_flag() {
        let first = FormSlot::new(Draft::default());
        let second = FormSlot::new(Draft::default());
        let _held = first.begin().expect("claim first");
        assert!(second.begin().is_some());
    }

    #[test]
    fn reset_clears_fields() {
        let slot = FormSlot::new(Draft {
            name: "Иван".to_string(),
        });
        slot.edit(|draft| draft.name.push('!'));
        assert_eq!(slot.draft().name, "Иван!");
        slot.reset();
        assert_eq!(slot.draft(), Draft::default());
    }
}
