use api::AuthService;
use dioxus::prelude::*;
use ui::components::{Button, ButtonVariant};
use ui::{GoalHistoryRender, GoalList};

use crate::{Platform, Route};

/// Past goals, kept live while the screen is mounted.
///
/// The coroutine owns the controller; when the route unmounts the task is
/// dropped and the controller cancels both subscriptions.
#[component]
pub fn GoalHistory() -> Element {
    let platform = use_context::<Platform>();
    let nav = use_navigator();
    let session = platform.auth.current_session();
    let signed_in = session.is_some();
    // `None` until both feeds have answered.
    let mut render = use_signal(|| Option::<GoalHistoryRender>::None);

    use_coroutine(move |_: UnboundedReceiver<()>| {
        let platform = platform.clone();
        let session = session.clone();
        async move {
            let Some(user) = session else { return };
            let mut history = ui::GoalHistory::new(platform.db, user, platform.config);
            if let Err(e) = history.mount() {
                tracing::error!("could not subscribe to goal history: {e}");
                return;
            }
            while history.pump().await {
                if history.is_loaded() {
                    render.set(Some(history.render()));
                }
            }
        }
    });

    if !signed_in {
        nav.replace(Route::Login {});
        return rsx! {};
    }

    rsx! {
        div {
            class: "screen goal-history",
            h1 { "Past Goals" }
            if let Some(render) = render() {
                GoalList { render }
            } else {
                p { class: "loading", "Loading..." }
            }
            Button {
                variant: ButtonVariant::Link,
                onclick: move |_| {
                    nav.push(Route::Settings {});
                },
                "Settings"
            }
        }
    }
}
