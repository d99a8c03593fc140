//! Progress notifications (integer percentage, 0-100).
//!
//! Listeners are called synchronously on the checker's thread. There is no
//! acknowledgement; a listener that cannot deliver simply drops the value.

use std::sync::mpsc::Sender;

pub trait ProgressListener {
    fn progress_changed(&mut self, percent: u8);
}

impl<F> ProgressListener for F
where
    F: FnMut(u8),
{
    fn progress_changed(&mut self, percent: u8) {
        self(percent)
    }
}

impl ProgressListener for Sender<u8> {
    fn progress_changed(&mut self, percent: u8) {
        // Receiver gone: nobody is watching any more.
        let _ = self.send(percent);
    }
}

/// Listener that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressListener for NoProgress {
    fn progress_changed(&mut self, _percent: u8) {}
}

/// Forwards every notification to zero or more listeners, in subscription order.
#[derive(Default)]
pub struct ProgressFanout<'a> {
    listeners: Vec<Box<dyn ProgressListener + 'a>>,
}

impl<'a> ProgressFanout<'a> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: impl ProgressListener + 'a) {
        self.listeners.push(Box::new(listener));
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl ProgressListener for ProgressFanout<'_> {
    fn progress_changed(&mut self, percent: u8) {
        for listener in &mut self.listeners {
            listener.progress_changed(percent);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn closures_receive_progress() {
        let mut seen = Vec::new();
        {
            let mut listener = |p: u8| seen.push(p);
            listener.progress_changed(0);
            listener.progress_changed(100);
        }
        assert_eq!(seen, vec![0, 100]);
    }

    #[test]
    fn sender_ignores_closed_channel() {
        let (mut tx, rx) = mpsc::channel::<u8>();
        tx.progress_changed(50);
        assert_eq!(rx.recv().unwrap(), 50);
        drop(rx);
        tx.progress_changed(100);
    }

    #[test]
    fn fanout_notifies_every_listener() {
        let (tx, rx) = mpsc::channel::<u8>();
        let mut seen = Vec::new();
        {
            let mut fanout = ProgressFanout::new();
            assert!(fanout.is_empty());
            fanout.subscribe(tx);
            fanout.subscribe(|p: u8| seen.push(p));
            assert_eq!(fanout.len(), 2);
            fanout.progress_changed(33);
        }
        assert_eq!(rx.recv().unwrap(), 33);
        assert_eq!(seen, vec![33]);
    }
}
