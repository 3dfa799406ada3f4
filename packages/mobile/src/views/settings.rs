use api::AuthService;
use dioxus::prelude::*;
use ui::components::{Button, ButtonVariant, TextInput};
use ui::settings::PASSWORD_PLACEHOLDER;
use ui::{AvatarImage, Notice, ProfileSettings, SettingsChange};

use super::use_notice;
use crate::{Platform, Route};

#[component]
pub fn Settings() -> Element {
    let platform = use_context::<Platform>();
    let nav = use_navigator();
    let mut notice = use_notice();
    let session = platform.auth.current_session();
    let mut settings = use_signal(move || session.as_ref().map(ProfileSettings::new));

    let Some(current) = settings() else {
        nav.replace(Route::Login {});
        return rsx! {};
    };

    let name_platform = platform.clone();
    let change_name = move |_: MouseEvent| {
        let auth = name_platform.auth.clone();
        spawn(async move {
            let Some(request) = settings() else { return };
            let alert = match request.change_display_name(&auth).await {
                Ok(change) => apply(settings, change),
                Err(alert) => Some(alert),
            };
            notice.set(alert);
        });
    };

    let password_platform = platform.clone();
    let change_password = move |_: MouseEvent| {
        let auth = password_platform.auth.clone();
        spawn(async move {
            let Some(request) = settings() else { return };
            let alert = match request.change_password(&auth).await {
                Ok(change) => apply(settings, change),
                Err(alert) => Some(alert),
            };
            notice.set(alert);
        });
    };

    let avatar_platform = platform.clone();
    let change_avatar = move |_: MouseEvent| {
        let platform = avatar_platform.clone();
        spawn(async move {
            let Some(request) = settings() else { return };
            let change = request
                .change_avatar(&platform.picker, &platform.storage, &platform.auth)
                .await;
            if let Some(change) = change {
                let alert = apply(settings, change);
                notice.set(alert);
            }
        });
    };

    let sign_out = move |_: MouseEvent| {
        let auth = platform.auth.clone();
        spawn(async move {
            let Some(request) = settings() else { return };
            match request.sign_out(&auth).await {
                Ok(screen) => {
                    nav.replace(Route::from(screen));
                }
                Err(alert) => notice.set(Some(alert)),
            }
        });
    };

    rsx! {
        div {
            class: "screen settings",
            h1 { "Settings" }
            button {
                class: "avatar-picker",
                onclick: change_avatar,
                AvatarImage { avatar: current.avatar().clone() }
            }

            label { "Username" }
            TextInput {
                value: current.display_name_input.clone(),
                placeholder: current.username_placeholder().to_string(),
                oninput: move |value: String| {
                    if let Some(state) = settings.write().as_mut() {
                        state.display_name_input = value;
                    }
                },
            }
            Button { variant: ButtonVariant::Small, onclick: change_name, "Change" }

            label { "Password" }
            TextInput {
                value: current.password_input.clone(),
                placeholder: PASSWORD_PLACEHOLDER,
                secure: true,
                oninput: move |value: String| {
                    if let Some(state) = settings.write().as_mut() {
                        state.password_input = value;
                    }
                },
            }
            Button { variant: ButtonVariant::Small, onclick: change_password, "Change" }

            Button {
                variant: ButtonVariant::Link,
                onclick: move |_| {
                    nav.push(Route::GoalHistory {});
                },
                "Past goals"
            }
            Button { onclick: sign_out, "Sign out" }
        }
    }
}

/// Apply a finished change to whatever the screen holds now.
fn apply(mut settings: Signal<Option<ProfileSettings>>, change: SettingsChange) -> Option<Notice> {
    let alert = settings.write().as_mut().map(|state| state.apply(change));
    alert
}
