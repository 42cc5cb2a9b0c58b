use crate::api::ApiResult;
use leptos::prelude::*;
use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

/// Local state that can be snapshotted and swapped wholesale.
pub(crate) trait LocalState<T> {
    fn snapshot(&self) -> T;
    fn replace(&self, value: T);
    /// Borrowing read. Signals track it, so views re-render on change.
    fn read_with<R>(&self, f: impl FnOnce(&T) -> R) -> R;
}

impl<T: Clone + Send + Sync + 'static> LocalState<T> for RwSignal<T> {
    fn snapshot(&self) -> T {
        self.get_untracked()
    }

    fn replace(&self, value: T) {
        self.set(value);
    }

    fn read_with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.with(f)
    }
}

impl<T: Clone> LocalState<T> for Rc<RefCell<T>> {
    fn snapshot(&self) -> T {
        self.borrow().clone()
    }

    fn replace(&self, value: T) {
        *self.borrow_mut() = value;
    }

    fn read_with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.borrow())
    }
}

/// Show `next` right away, then persist. On failure the state goes back to
/// exactly what it was before the call.
pub(crate) async fn optimistic<T, R, L, F>(state: &L, next: T, persist: F) -> ApiResult<R>
where
    L: LocalState<T>,
    F: Future<Output = ApiResult<R>>,
{
    let before = state.snapshot();
    state.replace(next);

    match persist.await {
        Ok(v) => Ok(v),
        Err(e) => {
            state.replace(before);
            Err(e)
        }
    }
}

/// Runs `work` with `flag` raised. Returns `None` without polling `work` when
/// an earlier run still holds the flag.
pub(crate) async fn exclusive<L, F, R>(flag: &L, work: F) -> Option<R>
where
    L: LocalState<bool>,
    F: Future<Output = R>,
{
    if flag.snapshot() {
        return None;
    }
    flag.replace(true);
    let out = work.await;
    flag.replace(false);
    Some(out)
}
