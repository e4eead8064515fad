//! Speculative list changes with rollback

/// Snapshot taken before a local change that the server has yet to confirm.
///
/// Call [`Reconcile::commit`] once the request succeeded or
/// [`Reconcile::rollback`] to restore the list exactly as it was.
#[must_use = "a speculative change must be committed or rolled back"]
#[derive(Debug)]
pub struct Reconcile<T: Clone> {
    snapshot: Vec<T>,
}

impl<T: Clone> Reconcile<T> {
    pub fn begin(items: &mut Vec<T>, change: impl FnOnce(&mut Vec<T>)) -> Self {
        let snapshot = items.clone();
        change(items);
        Self { snapshot }
    }

    pub fn commit(self) {}

    pub fn rollback(self, items: &mut Vec<T>) {
        *items = self.snapshot;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rollback_restores_order_and_values() {
        let mut items = vec![(1, false), (2, false), (3, true)];
        let pending = Reconcile::begin(&mut items, |items| {
            items.retain(|(id, _)| *id != 2);
            items[0].1 = true;
        });
        assert_eq!(items, vec![(1, true), (3, true)]);

        pending.rollback(&mut items);
        assert_eq!(items, vec![(1, false), (2, false), (3, true)]);
    }

    #[test]
    fn test_commit_keeps_change() {
        let mut items = vec![1, 2];
        Reconcile::begin(&mut items, |items| items.push(3)).commit();
        assert_eq!(items, vec![1, 2, 3]);
    }
}
