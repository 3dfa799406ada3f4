use dioxus::prelude::*;

/// Single-line text field that reports every edit.
#[component]
pub fn TextInput(
    value: String,
    #[props(default)] placeholder: String,
    /// Mask the content (passwords).
    #[props(default)]
    secure: bool,
    oninput: EventHandler<String>,
) -> Element {
    rsx! {
        input {
            class: "text-input",
            r#type: if secure { "password" } else { "text" },
            placeholder: "{placeholder}",
            value: "{value}",
            oninput: move |evt: FormEvent| oninput.call(evt.value()),
        }
    }
}
