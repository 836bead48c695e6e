//! Navigation visibility as a pure function of session presence.

use crate::gate::Page;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavItem {
    Login,
    Register,
    Dashboard,
    Wallet,
    Transactions,
    Logout,
}

impl NavItem {
    pub const ALL: [NavItem; 6] = [
        NavItem::Login,
        NavItem::Register,
        NavItem::Dashboard,
        NavItem::Wallet,
        NavItem::Transactions,
        NavItem::Logout,
    ];

    pub fn label(self) -> &'static str {
        match self {
            NavItem::Login => "Login",
            NavItem::Register => "Register",
            NavItem::Dashboard => "Dashboard",
            NavItem::Wallet => "Wallet",
            NavItem::Transactions => "Transactions",
            NavItem::Logout => "Logout",
        }
    }

    /// Page a link points at. `Logout` is an action, not a link.
    pub fn page(self) -> Option<Page> {
        match self {
            NavItem::Login => Some(Page::Login),
            NavItem::Register => Some(Page::Register),
            NavItem::Dashboard => Some(Page::Dashboard),
            NavItem::Wallet => Some(Page::Wallet),
            NavItem::Transactions => Some(Page::Transactions),
            NavItem::Logout => None,
        }
    }

    fn requires_session(self) -> bool {
        !matches!(self, NavItem::Login | NavItem::Register)
    }
}

/// Which items to show. Containers render only the items they carry, so a
/// footer without a wallet link simply ignores `Wallet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavVisibility {
    signed_in: bool,
}

impl NavVisibility {
    pub fn for_session(signed_in: bool) -> Self {
        Self { signed_in }
    }

    pub fn is_visible(&self, item: NavItem) -> bool {
        item.requires_session() == self.signed_in
    }

    pub fn visible_items(&self) -> Vec<NavItem> {
        NavItem::ALL
            .into_iter()
            .filter(|i| self.is_visible(*i))
            .collect()
    }

    /// Subset of `available` that should be shown, in the given order.
    pub fn filter<'a>(&self, available: &'a [NavItem]) -> impl Iterator<Item = NavItem> + 'a {
        let this = *self;
        available.iter().copied().filter(move |i| this.is_visible(*i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_out_shows_auth_links_only() {
        let nav = NavVisibility::for_session(false);
        assert_eq!(nav.visible_items(), vec![NavItem::Login, NavItem::Register]);
    }

    #[test]
    fn signed_in_shows_account_links_and_logout() {
        let nav = NavVisibility::for_session(true);
        assert_eq!(
            nav.visible_items(),
            vec![
                NavItem::Dashboard,
                NavItem::Wallet,
                NavItem::Transactions,
                NavItem::Logout
            ]
        );
    }

    #[test]
    fn idempotent_and_partial_markup_safe() {
        let nav = NavVisibility::for_session(true);
        assert_eq!(nav, NavVisibility::for_session(true));
        let footer = [NavItem::Login, NavItem::Dashboard];
        assert_eq!(nav.filter(&footer).collect::<Vec<_>>(), vec![NavItem::Dashboard]);
        assert_eq!(nav.filter(&[]).count(), 0);
    }
}
