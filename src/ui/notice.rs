use crate::state::data::Notice;

/// Holds the one notice currently on screen.
///
/// Each notice gets a fresh id; a dismiss request only clears the slot if it
/// names the notice still showing, so the timer of an old notice cannot
/// remove a newer one.
#[derive(Debug, Default)]
pub struct NoticeSlot {
    current: Option<(u64, Notice)>,
    next_id: u64,
}

impl NoticeSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace whatever is showing; returns the id to dismiss it with
    pub fn show(&mut self, notice: Notice) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        log::debug!("Notice #{}: {:?}", id, notice);
        self.current = Some((id, notice));
        id
    }

    /// Returns true if the notice was still showing
    pub fn dismiss(&mut self, id: u64) -> bool {
        match &self.current {
            Some((current, _)) if *current == id => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    pub fn current(&self) -> Option<(u64, &Notice)> {
        self.current.as_ref().map(|(id, notice)| (*id, notice))
    }
}
