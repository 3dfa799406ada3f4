use dioxus::prelude::*;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ButtonVariant {
    /// Black, full width.
    #[default]
    Primary,
    /// Smaller, right-aligned "Change" buttons.
    Small,
    /// Text-only footer link.
    Link,
}

impl ButtonVariant {
    fn class(self) -> &'static str {
        match self {
            ButtonVariant::Primary => "button button--primary",
            ButtonVariant::Small => "button button--small",
            ButtonVariant::Link => "button button--link",
        }
    }
}

#[component]
pub fn Button(
    #[props(default)] variant: ButtonVariant,
    #[props(default)] disabled: bool,
    onclick: EventHandler<MouseEvent>,
    children: Element,
) -> Element {
    rsx! {
        button {
            class: variant.class(),
            disabled,
            onclick: move |evt| onclick.call(evt),
            {children}
        }
    }
}
