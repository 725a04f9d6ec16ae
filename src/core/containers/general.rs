use std::sync::Arc;

use crate::{
    core::display::{AuthView, Dropdown, GeneralComponentsDisplay, GeneralDropdownsDisplay},
    error::BackendErrors,
};

use super::replace_if_changed;

/// App-wide display state plus the error-display store.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeneralContainer {
    pub components_display: GeneralComponentsDisplay,
    pub dropdowns_display: GeneralDropdownsDisplay,
    pub backend_errors: BackendErrors,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GeneralAction {
    /// Shows exactly one of register/login/home. Errors belonging to the
    /// form being closed are dropped when the view actually changes.
    ShowAuthView(AuthView),
    SetDropdown { dropdown: Dropdown, open: bool },
    CloseDropdowns,
    SetBackendErrors(BackendErrors),
    ClearBackendErrors,
}

pub(crate) fn reduce(
    state: &Arc<GeneralContainer>,
    action: &GeneralAction,
) -> Arc<GeneralContainer> {
    let next = match action {
        GeneralAction::ShowAuthView(view) => {
            let display = GeneralComponentsDisplay::only(*view);
            if display == state.components_display {
                return Arc::clone(state);
            }
            GeneralContainer {
                components_display: display,
                dropdowns_display: state.dropdowns_display,
                backend_errors: BackendErrors::new(),
            }
        }
        GeneralAction::SetDropdown { dropdown, open } => GeneralContainer {
            dropdowns_display: state.dropdowns_display.with(*dropdown, *open),
            ..(**state).clone()
        },
        GeneralAction::CloseDropdowns => GeneralContainer {
            dropdowns_display: GeneralDropdownsDisplay::default(),
            ..(**state).clone()
        },
        GeneralAction::SetBackendErrors(errors) => GeneralContainer {
            backend_errors: errors.clone(),
            ..(**state).clone()
        },
        GeneralAction::ClearBackendErrors => GeneralContainer {
            backend_errors: BackendErrors::new(),
            ..(**state).clone()
        },
    };
    replace_if_changed(state, next)
}
