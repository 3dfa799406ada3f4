use dioxus::prelude::*;
use ui::components::{Button, ButtonVariant, TextInput};
use ui::{AvatarImage, SignupForm, SignupOutcome};

use super::use_notice;
use crate::{Platform, Route};

#[component]
pub fn Signup() -> Element {
    let platform = use_context::<Platform>();
    let nav = use_navigator();
    let mut notice = use_notice();
    let mut form = use_signal(SignupForm::new);

    let photo_platform = platform.clone();
    let pick_photo = move |_: MouseEvent| {
        let picker = photo_platform.picker.clone();
        let storage = photo_platform.storage.clone();
        spawn(async move {
            if let Some(url) = SignupForm::pick_photo(&picker, &storage).await {
                form.write().set_photo(url);
            }
        });
    };

    let submit = move |_: MouseEvent| {
        if form.read().is_loading() {
            return;
        }
        let request = match form.write().begin_submit() {
            Ok(request) => request,
            Err(alert) => {
                notice.set(Some(alert));
                return;
            }
        };
        let platform = platform.clone();
        spawn(async move {
            let outcome = request
                .send(&platform.auth, &platform.db, &platform.config)
                .await;
            form.write().finish_submit(&outcome);
            match outcome {
                SignupOutcome::Invalid(alert) => notice.set(Some(alert)),
                SignupOutcome::Rejected { notice: alert, next }
                | SignupOutcome::Created {
                    notice: alert,
                    next,
                    ..
                } => {
                    notice.set(Some(alert));
                    nav.replace(Route::from(next));
                }
            }
        });
    };

    rsx! {
        div {
            class: "screen signup",
            h1 { "Create account" }
            button {
                class: "avatar-picker",
                onclick: pick_photo,
                AvatarImage { avatar: form.read().avatar() }
            }
            TextInput {
                value: form.read().email.clone(),
                placeholder: "Email",
                oninput: move |value: String| form.write().email = value,
            }
            TextInput {
                value: form.read().first_name.clone(),
                placeholder: "First name",
                oninput: move |value: String| form.write().first_name = value,
            }
            TextInput {
                value: form.read().password.clone(),
                placeholder: "Password",
                secure: true,
                oninput: move |value: String| form.write().password = value,
            }
            if form.read().is_loading() {
                p { class: "loading", "Creating your account..." }
            }
            Button { disabled: form.read().is_loading(), onclick: submit, "Sign up" }
            Button {
                variant: ButtonVariant::Link,
                onclick: move |_| {
                    nav.push(Route::from(form.read().login_link()));
                },
                "Already have an account? Log in"
            }
        }
    }
}
