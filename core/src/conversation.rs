/// Conversation list management: filtering, sorting, search, selection
use crate::types::Conversation;
use chrono::DateTime;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    All,
    Unread,
    Favorites,
    Groups,
}

impl Filter {
    pub fn label(self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Unread => "Unread",
            Filter::Favorites => "Favorites",
            Filter::Groups => "Groups",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Filter::All => Filter::Unread,
            Filter::Unread => Filter::Favorites,
            Filter::Favorites => Filter::Groups,
            Filter::Groups => Filter::All,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Recent,
    UnreadCount,
    Alphabetical,
}

impl SortOrder {
    pub fn label(self) -> &'static str {
        match self {
            SortOrder::Recent => "Recent",
            SortOrder::UnreadCount => "Unread",
            SortOrder::Alphabetical => "A-Z",
        }
    }

    pub fn next(self) -> Self {
        match self {
            SortOrder::Recent => SortOrder::UnreadCount,
            SortOrder::UnreadCount => SortOrder::Alphabetical,
            SortOrder::Alphabetical => SortOrder::Recent,
        }
    }
}

/// Holds the full conversation set and derives the ordered view the sidebar
/// renders. A non-empty search term replaces the filter entirely.
#[derive(Debug, Clone)]
pub struct ConversationList {
    conversations: Vec<Conversation>,
    filter: Filter,
    sort: SortOrder,
    search: String,
    favorites: HashSet<String>,
    selected: Option<String>,
}

impl ConversationList {
    pub fn new(conversations: Vec<Conversation>) -> Self {
        Self {
            conversations,
            filter: Filter::All,
            sort: SortOrder::Recent,
            search: String::new(),
            favorites: HashSet::new(),
            selected: None,
        }
    }

    pub fn set_conversations(&mut self, conversations: Vec<Conversation>) {
        self.conversations = conversations;
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    pub fn sort(&self) -> SortOrder {
        self.sort
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        self.sort = sort;
    }

    pub fn search_term(&self) -> &str {
        &self.search
    }

    pub fn search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    pub fn clear_search(&mut self) {
        self.search.clear();
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.contains(id)
    }

    /// Toggle favorite membership; returns whether the id is now a favorite
    pub fn toggle_favorite(&mut self, id: &str) -> bool {
        if self.favorites.remove(id) {
            false
        } else {
            self.favorites.insert(id.to_string());
            true
        }
    }

    /// Clear the unread counter (done when a conversation is opened)
    pub fn mark_read(&mut self, id: &str) {
        if let Some(c) = self.conversations.iter_mut().find(|c| c.id == id) {
            c.unread_count = 0;
        }
    }

    /// Select a conversation by id, clearing its unread counter. Returns the
    /// selected conversation so the caller can reload the message thread.
    pub fn select(&mut self, id: &str) -> Option<&Conversation> {
        if !self.conversations.iter().any(|c| c.id == id) {
            return None;
        }
        self.selected = Some(id.to_string());
        self.mark_read(id);
        self.get(id)
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected(&self) -> Option<&Conversation> {
        self.selected.as_deref().and_then(|id| self.get(id))
    }

    pub fn get(&self, id: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == id)
    }

    pub fn all(&self) -> &[Conversation] {
        &self.conversations
    }

    /// The derived, ordered view for the current filter/sort/search state
    pub fn visible(&self) -> Vec<&Conversation> {
        let mut view: Vec<&Conversation> = self
            .conversations
            .iter()
            .filter(|c| self.matches(c))
            .collect();

        match self.sort {
            SortOrder::Recent => {
                view.sort_by_key(|c| std::cmp::Reverse(activity_epoch(&c.last_activity)));
            }
            SortOrder::UnreadCount => {
                view.sort_by_key(|c| std::cmp::Reverse(c.unread_count));
            }
            SortOrder::Alphabetical => {
                view.sort_by_key(|c| c.name.to_lowercase());
            }
        }
        view
    }

    fn matches(&self, c: &Conversation) -> bool {
        if !self.search.is_empty() {
            let term = self.search.to_lowercase();
            return c.name.to_lowercase().contains(&term)
                || c.last_message.to_lowercase().contains(&term);
        }
        match self.filter {
            Filter::All => true,
            Filter::Unread => c.unread_count > 0,
            Filter::Favorites => self.favorites.contains(&c.id),
            Filter::Groups => c.is_group(),
        }
    }
}

/// RFC3339 parse for the recency sort; unparsable values sort as the epoch
fn activity_epoch(raw: &str) -> i64 {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.timestamp())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::fixture_conversations;

    fn list() -> ConversationList {
        ConversationList::new(fixture_conversations())
    }

    #[test]
    fn all_filter_returns_full_set() {
        let list = list();
        assert_eq!(list.visible().len(), list.all().len());
    }

    #[test]
    fn unread_filter_is_exactly_the_unread_subset() {
        let mut list = list();
        list.set_filter(Filter::Unread);
        let view = list.visible();
        assert!(view.iter().all(|c| c.unread_count > 0));
        let expected = list.all().iter().filter(|c| c.unread_count > 0).count();
        assert_eq!(view.len(), expected);
    }

    #[test]
    fn groups_filter() {
        let mut list = list();
        list.set_filter(Filter::Groups);
        assert!(list.visible().iter().all(|c| c.is_group()));
        assert_eq!(list.visible().len(), 4);
    }

    #[test]
    fn favorites_filter_follows_toggles() {
        let mut list = list();
        list.set_filter(Filter::Favorites);
        assert!(list.visible().is_empty());

        assert!(list.toggle_favorite("jane-smith"));
        assert_eq!(list.visible().len(), 1);
        assert_eq!(list.visible()[0].id, "jane-smith");

        assert!(!list.toggle_favorite("jane-smith"));
        assert!(list.visible().is_empty());
    }

    #[test]
    fn search_is_case_insensitive_over_name_and_preview() {
        let mut list = list();
        list.search("JANE");
        assert_eq!(list.visible().len(), 1);

        // "mockups" only appears in a last-message preview
        list.search("MOCKUPS");
        assert_eq!(list.visible().len(), 1);
        assert_eq!(list.visible()[0].id, "design-team");
    }

    #[test]
    fn search_overrides_the_active_filter() {
        let mut list = list();
        list.set_filter(Filter::Unread);
        list.search("development");
        // Development Team has zero unread but still matches the search
        assert_eq!(list.visible().len(), 1);
        assert_eq!(list.visible()[0].id, "development-team");

        list.clear_search();
        assert!(list.visible().iter().all(|c| c.unread_count > 0));
    }

    #[test]
    fn search_with_no_match_is_empty() {
        let mut list = list();
        list.search("zzzzz");
        assert!(list.visible().is_empty());
    }

    #[test]
    fn recent_sort_is_most_recent_first() {
        let list = list();
        let view = list.visible();
        let stamps: Vec<i64> = view
            .iter()
            .map(|c| activity_epoch(&c.last_activity))
            .collect();
        assert!(stamps.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(view[0].id, "team-project");
    }

    #[test]
    fn unread_sort_is_descending() {
        let mut list = list();
        list.set_sort(SortOrder::UnreadCount);
        let counts: Vec<u32> = list.visible().iter().map(|c| c.unread_count).collect();
        assert!(counts.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn alphabetical_sort() {
        let mut list = list();
        list.set_sort(SortOrder::Alphabetical);
        let names: Vec<String> = list
            .visible()
            .iter()
            .map(|c| c.name.to_lowercase())
            .collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    fn unparsable_activity_sorts_last() {
        let mut conversations = fixture_conversations();
        conversations[0].last_activity = "not a date".to_string();
        let list = ConversationList::new(conversations);
        assert_eq!(list.visible().last().unwrap().id, "team-project");
    }

    #[test]
    fn select_clears_unread_and_tracks_selection() {
        let mut list = list();
        assert_eq!(list.get("team-project").unwrap().unread_count, 2);
        let selected = list.select("team-project").unwrap();
        assert_eq!(selected.unread_count, 0);
        assert_eq!(list.selected_id(), Some("team-project"));
    }

    #[test]
    fn select_unknown_id_is_a_no_op() {
        let mut list = list();
        assert!(list.select("nope").is_none());
        assert_eq!(list.selected_id(), None);
    }
}
