//! Default-action suppression for UI events

/// An event whose default action can be suppressed (e.g. a form submit).
pub trait Cancelable {
    fn prevent_default(&mut self);

    fn is_default_prevented(&self) -> bool;
}

/// Wrap a handler so the event's default action is suppressed before it runs.
///
/// The handler's return value passes through unchanged.
pub fn prevent_default<E, R, F>(mut handler: F) -> impl FnMut(&mut E) -> R
where
    E: Cancelable + ?Sized,
    F: FnMut(&mut E) -> R,
{
    move |event: &mut E| {
        event.prevent_default();
        handler(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct SubmitEvent {
        prevented: bool,
    }

    impl Cancelable for SubmitEvent {
        fn prevent_default(&mut self) {
            self.prevented = true;
        }

        fn is_default_prevented(&self) -> bool {
            self.prevented
        }
    }

    #[test]
    fn test_prevents_default_before_handler() {
        let mut seen = None;
        let mut handler = prevent_default(|event: &mut SubmitEvent| {
            seen = Some(event.is_default_prevented());
        });
        let mut event = SubmitEvent::default();
        handler(&mut event);
        drop(handler);
        assert!(event.is_default_prevented());
        assert_eq!(seen, Some(true));
    }

    #[test]
    fn test_passes_return_value_through() {
        let mut handler = prevent_default(|_: &mut SubmitEvent| 42);
        let mut event = SubmitEvent::default();
        assert_eq!(handler(&mut event), 42);
    }

    #[test]
    fn test_handler_can_be_called_repeatedly() {
        let mut calls = 0;
        {
            let mut handler = prevent_default(|_: &mut SubmitEvent| calls += 1);
            handler(&mut SubmitEvent::default());
            handler(&mut SubmitEvent::default());
        }
        assert_eq!(calls, 2);
    }
}
