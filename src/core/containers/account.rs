use std::sync::Arc;

use crate::core::{
    display::{AccountComponentsDisplay, AccountDisplayPatch, AccountPanel},
    model::{Account, AccountSettings, Theme},
};

use super::replace_if_changed;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AccountContainer {
    pub account: Option<Account>,
    /// `None` until the server sent the account's settings.
    pub settings: Option<AccountSettings>,
    pub setting_themes: Vec<Theme>,
    pub components_display: AccountComponentsDisplay,
}

impl AccountContainer {
    pub fn active_theme(&self) -> Option<&Theme> {
        let theme_id = self.settings.as_ref()?.theme_id?;
        self.setting_themes.iter().find(|theme| theme.theme_id == theme_id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AccountAction {
    SetAccount(Account),
    /// Replaces the settings record whole.
    SetSettings(AccountSettings),
    SetSettingThemes(Vec<Theme>),
    SetComponentsDisplay(AccountDisplayPatch),
    /// Opens `panel` and closes every other account panel.
    ShowOnly(AccountPanel),
    CloseComponents,
}

pub(crate) fn reduce(
    state: &Arc<AccountContainer>,
    action: &AccountAction,
) -> Arc<AccountContainer> {
    let next = match action {
        AccountAction::SetAccount(account) => AccountContainer {
            account: Some(account.clone()),
            ..(**state).clone()
        },
        AccountAction::SetSettings(settings) => AccountContainer {
            settings: Some(settings.clone()),
            ..(**state).clone()
        },
        AccountAction::SetSettingThemes(themes) => AccountContainer {
            setting_themes: themes.clone(),
            ..(**state).clone()
        },
        AccountAction::SetComponentsDisplay(patch) => AccountContainer {
            components_display: state.components_display.apply(patch),
            ..(**state).clone()
        },
        AccountAction::ShowOnly(panel) => AccountContainer {
            components_display: AccountComponentsDisplay::only(*panel),
            ..(**state).clone()
        },
        AccountAction::CloseComponents => AccountContainer {
            components_display: AccountComponentsDisplay::default(),
            ..(**state).clone()
        },
    };
    replace_if_changed(state, next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::AccountId;

    fn account(edited: i64) -> Account {
        Account {
            account_id: AccountId(1),
            email: "a@b.com".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            join_date: None,
            last_edited_timestamp: edited,
        }
    }

    #[test]
    fn patch_keeps_other_panels() {
        let state = Arc::new(AccountContainer {
            components_display: AccountComponentsDisplay::only(AccountPanel::Sidebar),
            ..Default::default()
        });
        let next = reduce(
            &state,
            &AccountAction::SetComponentsDisplay(AccountDisplayPatch::open(AccountPanel::Settings)),
        );
        assert!(next.components_display.sidebar);
        assert!(next.components_display.settings);

        let only = reduce(&next, &AccountAction::ShowOnly(AccountPanel::EditInfoModal));
        assert_eq!(
            only.components_display,
            AccountComponentsDisplay::only(AccountPanel::EditInfoModal)
        );
    }

    #[test]
    fn closing_when_closed_keeps_snapshot() {
        let state = Arc::new(AccountContainer {
            account: Some(account(1)),
            ..Default::default()
        });
        let next = reduce(&state, &AccountAction::CloseComponents);
        assert!(Arc::ptr_eq(&state, &next));

        let updated = reduce(&state, &AccountAction::SetAccount(account(2)));
        assert_eq!(updated.account.as_ref().map(|a| a.last_edited_timestamp), Some(2));
    }

    #[test]
    fn settings_are_replaced_whole() {
        let themes = vec![
            Theme {
                theme_id: 1,
                color: "blue".into(),
            },
            Theme {
                theme_id: 2,
                color: "red".into(),
            },
        ];
        let state = Arc::new(AccountContainer::default());
        let state = reduce(&state, &AccountAction::SetSettingThemes(themes));
        assert_eq!(state.active_theme(), None);

        let dark_red = AccountSettings {
            dark_mode: true,
            theme_id: Some(2),
            ..Default::default()
        };
        let state = reduce(&state, &AccountAction::SetSettings(dark_red));
        assert_eq!(state.active_theme().map(|t| t.color.as_str()), Some("red"));

        let state = reduce(&state, &AccountAction::SetSettings(AccountSettings::default()));
        let settings = state.settings.as_ref().unwrap();
        assert!(!settings.dark_mode);
        assert_eq!(settings.theme_id, None);
        assert_eq!(state.active_theme(), None);
        assert_eq!(state.setting_themes.len(), 2);
    }
}
