//! Input events and the table that maps them to controller actions.
//!
//! The table is built once and never mutated, so the full wiring can be
//! listed and checked without a running UI.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    TransformButton,
    CopyButton,
    DownloadButton,
    ThemeToggle,
    SettingsTrigger,
    PanelClose,
    PanelOverlay,
    StyleButton,
    KeyCheckbox,
    PromptInput,
    Document,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Enter,
    Escape,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UiEvent {
    Click(Target),
    KeyDown {
        target: Target,
        key: Key,
        ctrl_or_meta: bool,
    },
    Input(Target),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Transform,
    Copy,
    Download,
    ToggleTheme,
    ShowPanel,
    HidePanel,
    SelectStyle,
    ToggleKey,
    ResizeInput,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    Click,
    Input,
    // `ctrl_or_meta: false` accepts the key with or without modifiers.
    Key { key: Key, ctrl_or_meta: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub trigger: Trigger,
    pub target: Target,
    pub action: Action,
}

impl Binding {
    fn matches(&self, event: &UiEvent) -> bool {
        match (&self.trigger, event) {
            (Trigger::Click, UiEvent::Click(target)) => *target == self.target,
            (Trigger::Input, UiEvent::Input(target)) => *target == self.target,
            (
                Trigger::Key { key, ctrl_or_meta },
                UiEvent::KeyDown {
                    target,
                    key: pressed,
                    ctrl_or_meta: held,
                },
            ) => *target == self.target && key == pressed && (!ctrl_or_meta || *held),
            _ => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EventTable {
    bindings: Vec<Binding>,
}

impl EventTable {
    pub fn standard() -> Self {
        let click = |target, action| Binding {
            trigger: Trigger::Click,
            target,
            action,
        };

        Self {
            bindings: vec![
                click(Target::TransformButton, Action::Transform),
                click(Target::CopyButton, Action::Copy),
                click(Target::DownloadButton, Action::Download),
                click(Target::ThemeToggle, Action::ToggleTheme),
                click(Target::SettingsTrigger, Action::ShowPanel),
                click(Target::PanelClose, Action::HidePanel),
                click(Target::PanelOverlay, Action::HidePanel),
                click(Target::StyleButton, Action::SelectStyle),
                click(Target::KeyCheckbox, Action::ToggleKey),
                Binding {
                    trigger: Trigger::Key {
                        key: Key::Enter,
                        ctrl_or_meta: true,
                    },
                    target: Target::PromptInput,
                    action: Action::Transform,
                },
                Binding {
                    trigger: Trigger::Input,
                    target: Target::PromptInput,
                    action: Action::ResizeInput,
                },
                Binding {
                    trigger: Trigger::Key {
                        key: Key::Escape,
                        ctrl_or_meta: false,
                    },
                    target: Target::Document,
                    action: Action::HidePanel,
                },
            ],
        }
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn lookup(&self, event: &UiEvent) -> Option<Action> {
        self.bindings
            .iter()
            .find(|b| b.matches(event))
            .map(|b| b.action)
    }
}

impl Default for EventTable {
    fn default() -> Self {
        Self::standard()
    }
}
