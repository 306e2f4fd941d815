/// Watches a solver's iteration and can ask it to change course.
///
/// A solver emits one event per unit of work and hands each to its
/// observer. Returning `Some(action)` requests a solver-defined action,
/// such as stopping early; returning `None` lets the iteration continue
/// unchanged. What counts as an event and which actions exist are chosen
/// by each solver through the `E` and `A` parameters.
///
/// Any `FnMut(&E) -> Option<A>` closure is an observer, and `()` is the
/// observer that never intervenes.
pub trait Observer<E, A> {
    /// Inspects one event and optionally requests an action.
    fn observe(&mut self, event: &E) -> Option<A>;
}

impl<E, A, F> Observer<E, A> for F
where
    F: FnMut(&E) -> Option<A>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        self(event)
    }
}

/// The observer that watches nothing and never intervenes.
impl<E, A> Observer<E, A> for () {
    fn observe(&mut self, _event: &E) -> Option<A> {
        None
    }
}
