use crate::models::Announcement;
use std::collections::HashSet;

/// Announcement ids the viewer has acknowledged. Never persisted.
#[derive(Debug, Clone, Default)]
pub struct ReadState {
    read: HashSet<u32>,
}

impl ReadState {
    pub fn mark_read(&mut self, id: u32) {
        self.read.insert(id);
    }

    pub fn mark_all_read(&mut self, announcements: &[Announcement]) {
        self.read
            .extend(announcements.iter().filter(|a| a.active).map(|a| a.id));
    }

    pub fn reset(&mut self) {
        self.read.clear();
    }

    pub fn is_read(&self, id: u32) -> bool {
        self.read.contains(&id)
    }

    pub fn read_count(&self, announcements: &[Announcement]) -> usize {
        announcements
            .iter()
            .filter(|a| a.active && self.read.contains(&a.id))
            .count()
    }

    pub fn unread_count(&self, announcements: &[Announcement]) -> usize {
        active_count(announcements) - self.read_count(announcements)
    }
}

pub fn active_count(announcements: &[Announcement]) -> usize {
    announcements.iter().filter(|a| a.active).count()
}

pub struct NotificationPanel {
    announcements: Vec<Announcement>,
    state: ReadState,
    open: bool,
}

impl NotificationPanel {
    pub fn new(announcements: Vec<Announcement>) -> Self {
        Self {
            announcements,
            state: ReadState::default(),
            open: false,
        }
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn mark_read(&mut self, id: u32) {
        self.state.mark_read(id);
    }

    pub fn mark_all_read(&mut self) {
        self.state.mark_all_read(&self.announcements);
    }

    pub fn reset(&mut self) {
        self.state.reset();
    }

    pub fn is_read(&self, id: u32) -> bool {
        self.state.is_read(id)
    }

    /// Active announcements in source order.
    pub fn active(&self) -> Vec<&Announcement> {
        self.announcements.iter().filter(|a| a.active).collect()
    }

    pub fn active_count(&self) -> usize {
        active_count(&self.announcements)
    }

    pub fn unread_count(&self) -> usize {
        self.state.unread_count(&self.announcements)
    }

    pub fn read_count(&self) -> usize {
        self.state.read_count(&self.announcements)
    }

    pub fn badge_label(&self) -> String {
        match self.unread_count() {
            0 => String::new(),
            count if count > 9 => "9+".to_string(),
            count => count.to_string(),
        }
    }

    pub fn unread_summary(&self) -> Option<String> {
        match self.unread_count() {
            0 => None,
            count => Some(format!("{count} pengumuman belum dibaca")),
        }
    }

    pub fn footer(&self) -> Option<String> {
        let active = self.active_count();
        if active == 0 {
            return None;
        }
        Some(format!("{} dari {} dibaca", self.read_count(), active))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;
    use crate::reference::demo_announcements;
    use chrono::{TimeZone, Utc};

    fn announcement(id: u32, active: bool) -> Announcement {
        Announcement {
            id,
            title: format!("Pengumuman {id}"),
            content: "Isi".to_string(),
            priority: Priority::Low,
            active,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, id).unwrap(),
        }
    }

    #[test]
    fn mark_all_read_clears_unread() {
        let list = vec![announcement(1, true), announcement(2, true), announcement(3, false)];
        let mut state = ReadState::default();
        assert_eq!(state.unread_count(&list), 2);
        state.mark_all_read(&list);
        assert_eq!(state.unread_count(&list), 0);
        assert!(!state.is_read(3));
    }

    #[test]
    fn marking_unknown_or_inactive_id_keeps_count() {
        let list = vec![announcement(1, true), announcement(2, false)];
        let mut state = ReadState::default();
        state.mark_read(99);
        state.mark_read(2);
        assert_eq!(state.unread_count(&list), 1);
    }

    #[test]
    fn mark_read_is_idempotent() {
        let list = vec![announcement(1, true), announcement(2, true)];
        let mut state = ReadState::default();
        state.mark_read(1);
        state.mark_read(1);
        assert_eq!(state.unread_count(&list), 1);
        assert_eq!(state.read_count(&list), 1);
    }

    #[test]
    fn reset_restores_active_count() {
        let list = demo_announcements();
        let mut state = ReadState::default();
        state.mark_all_read(&list);
        state.reset();
        assert_eq!(state.unread_count(&list), active_count(&list));
    }

    #[test]
    fn mark_all_read_keeps_earlier_marks() {
        let mut list = vec![announcement(1, true)];
        let mut state = ReadState::default();
        state.mark_read(5);
        state.mark_all_read(&list);
        list.push(announcement(5, true));
        assert_eq!(state.unread_count(&list), 0);
    }

    #[test]
    fn badge_caps_at_nine() {
        let list: Vec<Announcement> = (1..=12).map(|id| announcement(id, true)).collect();
        let mut panel = NotificationPanel::new(list);
        assert_eq!(panel.badge_label(), "9+");
        for id in 1..=4 {
            panel.mark_read(id);
        }
        assert_eq!(panel.badge_label(), "8");
        panel.mark_all_read();
        assert_eq!(panel.badge_label(), "");
        assert_eq!(panel.unread_summary(), None);
        assert_eq!(panel.footer().as_deref(), Some("12 dari 12 dibaca"));
    }

    #[test]
    fn empty_panel_has_no_footer() {
        let panel = NotificationPanel::new(vec![announcement(1, false)]);
        assert_eq!(panel.footer(), None);
        assert_eq!(panel.unread_count(), 0);
    }

    #[test]
    fn toggle_and_close() {
        let mut panel = NotificationPanel::new(Vec::new());
        assert!(!panel.is_open());
        panel.toggle();
        assert!(panel.is_open());
        panel.close();
        assert!(!panel.is_open());
    }

    #[test]
    fn active_keeps_source_order() {
        let list = vec![announcement(3, true), announcement(1, false), announcement(2, true)];
        let ids: Vec<u32> = NotificationPanel::new(list)
            .active()
            .iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec![3, 2]);

        let panel = NotificationPanel::new(demo_announcements());
        assert_eq!(
            panel.unread_summary().as_deref(),
            Some("3 pengumuman belum dibaca")
        );
    }
}
