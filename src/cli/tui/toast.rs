//! Transient notifications shown at the bottom of the screen

use crate::render::{Notification, Notifier};

/// Holds at most one notification for a fixed number of ticks
#[derive(Debug)]
pub struct Toast {
    lifetime: u32,
    current: Option<(Notification, u32)>,
}

impl Toast {
    pub fn new(lifetime: u32) -> Self {
        Self {
            lifetime,
            current: None,
        }
    }

    /// The visible notification, if any
    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref().map(|(notification, _)| notification)
    }

    /// Advances one tick, dropping the notification when it expires
    pub fn tick(&mut self) {
        let expired = match &mut self.current {
            Some((_, remaining)) => {
                *remaining = remaining.saturating_sub(1);
                *remaining == 0
            }
            None => false,
        };
        if expired {
            self.current = None;
        }
    }
}

impl Notifier for Toast {
    fn success(&mut self, notification: Notification) {
        if self.lifetime > 0 {
            self.current = Some((notification, self.lifetime));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{ToastPosition, COPIED_MESSAGE};

    fn copied() -> Notification {
        Notification {
            message: COPIED_MESSAGE.to_string(),
            position: ToastPosition::BottomCenter,
        }
    }

    #[test]
    fn expires_after_lifetime() {
        let mut toast = Toast::new(2);
        toast.success(copied());
        assert_eq!(toast.current().map(|n| n.message.as_str()), Some(COPIED_MESSAGE));

        toast.tick();
        assert!(toast.current().is_some());
        toast.tick();
        assert!(toast.current().is_none());
    }

    #[test]
    fn new_notification_restarts_timer() {
        let mut toast = Toast::new(2);
        toast.success(copied());
        toast.tick();
        toast.success(copied());
        toast.tick();
        assert!(toast.current().is_some());
    }

    #[test]
    fn zero_lifetime_never_shows() {
        let mut toast = Toast::new(0);
        toast.success(copied());
        assert!(toast.current().is_none());
    }
}
