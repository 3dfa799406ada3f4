use dioxus::prelude::*;
use ui::components::{Button, ButtonVariant};
use ui::LandingAction;

use crate::Route;

#[component]
pub fn Landing() -> Element {
    let nav = use_navigator();
    let go = move |action: LandingAction| {
        nav.push(Route::from(action.target()));
    };

    rsx! {
        div {
            class: "screen landing",
            h1 { class: "landing-title", "BudgeKing" }
            p { class: "landing-tagline", "Set a budget. Share your goals." }
            Button { onclick: move |_| go(LandingAction::Login), "Login" }
            Button {
                variant: ButtonVariant::Link,
                onclick: move |_| go(LandingAction::SignUp),
                "Sign Up"
            }
        }
    }
}
