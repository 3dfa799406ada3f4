use dioxus::prelude::*;
use ui::components::{Button, ButtonVariant, TextInput};
use ui::LoginForm;

use super::use_notice;
use crate::{Platform, Route};

#[component]
pub fn Login() -> Element {
    let platform = use_context::<Platform>();
    let nav = use_navigator();
    let mut notice = use_notice();
    let mut form = use_signal(LoginForm::default);
    let mut busy = use_signal(|| false);

    let submit = move |_: MouseEvent| {
        if busy() {
            return;
        }
        let auth = platform.auth.clone();
        busy.set(true);
        spawn(async move {
            let request = form();
            let result = request.submit(&auth).await;
            busy.set(false);
            match result {
                Ok(screen) => {
                    form.write().password.clear();
                    notice.set(None);
                    nav.replace(Route::from(screen));
                }
                Err(alert) => notice.set(Some(alert)),
            }
        });
    };

    rsx! {
        div {
            class: "screen login",
            h1 { "Log in" }
            TextInput {
                value: form.read().email.clone(),
                placeholder: "Email",
                oninput: move |value: String| form.write().email = value,
            }
            TextInput {
                value: form.read().password.clone(),
                placeholder: "Password",
                secure: true,
                oninput: move |value: String| form.write().password = value,
            }
            Button { disabled: busy(), onclick: submit, "Log in" }
            Button {
                variant: ButtonVariant::Link,
                onclick: move |_| {
                    nav.push(Route::from(form.read().signup_link()));
                },
                "Don't have an account? Sign up"
            }
        }
    }
}
