//! "Which component is shown" records, one per container, plus the partial
//! patches the reducers apply to them. A patch field left as `None` keeps the
//! prior value.

use std::str::FromStr;

use crate::core::model::{CommentId, ListItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthView {
    Register,
    Login,
    Home,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneralComponentsDisplay {
    pub register: bool,
    pub login: bool,
    pub home: bool,
}

impl GeneralComponentsDisplay {
    pub fn only(view: AuthView) -> Self {
        Self {
            register: view == AuthView::Register,
            login: view == AuthView::Login,
            home: view == AuthView::Home,
        }
    }

    pub fn shown_count(&self) -> usize {
        [self.register, self.login, self.home]
            .into_iter()
            .filter(|shown| *shown)
            .count()
    }

    pub fn active(&self) -> Option<AuthView> {
        if self.shown_count() != 1 {
            None
        } else if self.register {
            Some(AuthView::Register)
        } else if self.login {
            Some(AuthView::Login)
        } else {
            Some(AuthView::Home)
        }
    }
}

impl Default for GeneralComponentsDisplay {
    fn default() -> Self {
        Self::only(AuthView::Login)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dropdown {
    NavbarHamburger,
    ListViewTopBarFilter,
}

impl FromStr for Dropdown {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "navbarHamburger" => Ok(Dropdown::NavbarHamburger),
            "listViewTopBarFilter" => Ok(Dropdown::ListViewTopBarFilter),
            other => Err(format!("unknown dropdown {other:?}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GeneralDropdownsDisplay {
    pub navbar_hamburger: bool,
    pub list_view_top_bar_filter: bool,
}

impl GeneralDropdownsDisplay {
    pub fn is_open(&self, dropdown: Dropdown) -> bool {
        match dropdown {
            Dropdown::NavbarHamburger => self.navbar_hamburger,
            Dropdown::ListViewTopBarFilter => self.list_view_top_bar_filter,
        }
    }

    pub fn with(mut self, dropdown: Dropdown, open: bool) -> Self {
        match dropdown {
            Dropdown::NavbarHamburger => self.navbar_hamburger = open,
            Dropdown::ListViewTopBarFilter => self.list_view_top_bar_filter = open,
        }
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountPanel {
    Sidebar,
    Settings,
    EditInfoModal,
    EditEmailModal,
    EditPasswordModal,
    DeleteAccountModal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccountComponentsDisplay {
    pub sidebar: bool,
    pub settings: bool,
    pub edit_info_modal: bool,
    pub edit_email_modal: bool,
    pub edit_password_modal: bool,
    pub delete_account_modal: bool,
}

impl AccountComponentsDisplay {
    pub fn only(panel: AccountPanel) -> Self {
        Self::default().apply(&AccountDisplayPatch::open(panel))
    }

    pub fn any_open(&self) -> bool {
        self.sidebar
            || self.settings
            || self.edit_info_modal
            || self.edit_email_modal
            || self.edit_password_modal
            || self.delete_account_modal
    }

    pub fn is_open(&self, panel: AccountPanel) -> bool {
        match panel {
            AccountPanel::Sidebar => self.sidebar,
            AccountPanel::Settings => self.settings,
            AccountPanel::EditInfoModal => self.edit_info_modal,
            AccountPanel::EditEmailModal => self.edit_email_modal,
            AccountPanel::EditPasswordModal => self.edit_password_modal,
            AccountPanel::DeleteAccountModal => self.delete_account_modal,
        }
    }

    pub fn apply(&self, patch: &AccountDisplayPatch) -> Self {
        Self {
            sidebar: patch.sidebar.unwrap_or(self.sidebar),
            settings: patch.settings.unwrap_or(self.settings),
            edit_info_modal: patch.edit_info_modal.unwrap_or(self.edit_info_modal),
            edit_email_modal: patch.edit_email_modal.unwrap_or(self.edit_email_modal),
            edit_password_modal: patch.edit_password_modal.unwrap_or(self.edit_password_modal),
            delete_account_modal: patch.delete_account_modal.unwrap_or(self.delete_account_modal),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccountDisplayPatch {
    pub sidebar: Option<bool>,
    pub settings: Option<bool>,
    pub edit_info_modal: Option<bool>,
    pub edit_email_modal: Option<bool>,
    pub edit_password_modal: Option<bool>,
    pub delete_account_modal: Option<bool>,
}

impl AccountDisplayPatch {
    /// Patch that opens `panel` and leaves every other flag alone.
    pub fn open(panel: AccountPanel) -> Self {
        let mut patch = Self::default();
        let flag = match panel {
            AccountPanel::Sidebar => &mut patch.sidebar,
            AccountPanel::Settings => &mut patch.settings,
            AccountPanel::EditInfoModal => &mut patch.edit_info_modal,
            AccountPanel::EditEmailModal => &mut patch.edit_email_modal,
            AccountPanel::EditPasswordModal => &mut patch.edit_password_modal,
            AccountPanel::DeleteAccountModal => &mut patch.delete_account_modal,
        };
        *flag = Some(true);
        patch
    }
}

/// Which of the two main views of a list container is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListView {
    List,
    Item,
}

/// Secondary panels layered over a list container's main views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOverlay {
    CreateSidebar,
    ListDeleteModal,
    ItemEditInfo,
    ItemDeleteModal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListComponentsDisplay<T> {
    pub list_view: bool,
    pub list_view_create_sidebar: bool,
    pub list_view_delete_modal: bool,
    pub item_view: bool,
    pub item_view_edit_info: bool,
    pub item_view_delete_modal: bool,
    pub item_view_current_item: Option<T>,
}

impl<T: ListItem> ListComponentsDisplay<T> {
    /// Every flag off, current item cleared.
    pub fn closed() -> Self {
        Self {
            list_view: false,
            list_view_create_sidebar: false,
            list_view_delete_modal: false,
            item_view: false,
            item_view_edit_info: false,
            item_view_delete_modal: false,
            item_view_current_item: None,
        }
    }

    pub fn current_view(&self) -> Option<ListView> {
        if self.item_view {
            Some(ListView::Item)
        } else if self.list_view {
            Some(ListView::List)
        } else {
            None
        }
    }

    pub fn current_item_id(&self) -> Option<T::Id> {
        self.item_view_current_item.as_ref().map(ListItem::id)
    }

    pub fn overlay_open(&self, overlay: ListOverlay) -> bool {
        match overlay {
            ListOverlay::CreateSidebar => self.list_view_create_sidebar,
            ListOverlay::ListDeleteModal => self.list_view_delete_modal,
            ListOverlay::ItemEditInfo => self.item_view_edit_info,
            ListOverlay::ItemDeleteModal => self.item_view_delete_modal,
        }
    }

    pub fn apply(&self, patch: &ListDisplayPatch<T>) -> Self {
        Self {
            list_view: patch.list_view.unwrap_or(self.list_view),
            list_view_create_sidebar: patch
                .list_view_create_sidebar
                .unwrap_or(self.list_view_create_sidebar),
            list_view_delete_modal: patch
                .list_view_delete_modal
                .unwrap_or(self.list_view_delete_modal),
            item_view: patch.item_view.unwrap_or(self.item_view),
            item_view_edit_info: patch.item_view_edit_info.unwrap_or(self.item_view_edit_info),
            item_view_delete_modal: patch
                .item_view_delete_modal
                .unwrap_or(self.item_view_delete_modal),
            item_view_current_item: match &patch.item_view_current_item {
                Some(item) => item.clone(),
                None => self.item_view_current_item.clone(),
            },
        }
    }
}

impl<T: ListItem> Default for ListComponentsDisplay<T> {
    fn default() -> Self {
        Self {
            list_view: T::LIST_VIEW_BY_DEFAULT,
            ..Self::closed()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListDisplayPatch<T> {
    pub list_view: Option<bool>,
    pub list_view_create_sidebar: Option<bool>,
    pub list_view_delete_modal: Option<bool>,
    pub item_view: Option<bool>,
    pub item_view_edit_info: Option<bool>,
    pub item_view_delete_modal: Option<bool>,
    /// `Some(None)` clears the current item, `None` keeps it.
    pub item_view_current_item: Option<Option<T>>,
}

impl<T> Default for ListDisplayPatch<T> {
    fn default() -> Self {
        Self {
            list_view: None,
            list_view_create_sidebar: None,
            list_view_delete_modal: None,
            item_view: None,
            item_view_edit_info: None,
            item_view_delete_modal: None,
            item_view_current_item: None,
        }
    }
}

impl<T> ListDisplayPatch<T> {
    pub fn overlay(overlay: ListOverlay, open: bool) -> Self {
        let mut patch = Self::default();
        let flag = match overlay {
            ListOverlay::CreateSidebar => &mut patch.list_view_create_sidebar,
            ListOverlay::ListDeleteModal => &mut patch.list_view_delete_modal,
            ListOverlay::ItemEditInfo => &mut patch.item_view_edit_info,
            ListOverlay::ItemDeleteModal => &mut patch.item_view_delete_modal,
        };
        *flag = Some(open);
        patch
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommentComponentsDisplay {
    pub comment_being_edited: Option<CommentId>,
    pub comment_to_be_deleted: Option<CommentId>,
}

impl CommentComponentsDisplay {
    pub fn apply(&self, patch: &CommentDisplayPatch) -> Self {
        Self {
            comment_being_edited: patch
                .comment_being_edited
                .unwrap_or(self.comment_being_edited),
            comment_to_be_deleted: patch
                .comment_to_be_deleted
                .unwrap_or(self.comment_to_be_deleted),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommentDisplayPatch {
    pub comment_being_edited: Option<Option<CommentId>>,
    pub comment_to_be_deleted: Option<Option<CommentId>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{Bug, Project};

    #[test]
    fn general_default_shows_login_only() {
        let display = GeneralComponentsDisplay::default();
        assert_eq!(display.active(), Some(AuthView::Login));
        assert_eq!(display.shown_count(), 1);
    }

    #[test]
    fn list_defaults_differ_per_kind() {
        assert_eq!(
            ListComponentsDisplay::<Project>::default().current_view(),
            Some(ListView::List)
        );
        assert_eq!(ListComponentsDisplay::<Bug>::default().current_view(), None);
    }

    #[test]
    fn patch_keeps_omitted_fields() {
        let display = ListComponentsDisplay::<Bug> {
            list_view: true,
            list_view_create_sidebar: true,
            ..ListComponentsDisplay::closed()
        };
        let patched = display.apply(&ListDisplayPatch {
            list_view: Some(false),
            item_view: Some(true),
            ..Default::default()
        });

        assert!(!patched.list_view);
        assert!(patched.item_view);
        assert!(patched.list_view_create_sidebar);
        assert_eq!(patched.item_view_current_item, None);
    }

    #[test]
    fn account_patch_opens_single_panel() {
        let display = AccountComponentsDisplay::only(AccountPanel::EditEmailModal);
        assert!(display.is_open(AccountPanel::EditEmailModal));
        assert!(!display.sidebar);
        assert!(display.any_open());
        assert!(!AccountComponentsDisplay::default().any_open());
    }

    #[test]
    fn dropdown_names_parse() {
        assert_eq!("navbarHamburger".parse::<Dropdown>(), Ok(Dropdown::NavbarHamburger));
        assert!("sideways".parse::<Dropdown>().is_err());
    }
}
