use dioxus::prelude::*;
use ui::Screen;
use views::{GoalHistory, Landing, Login, Settings, Signup};

mod platform;
mod views;

pub(crate) use platform::Platform;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/")]
    Landing {},
    #[route("/login")]
    Login {},
    #[route("/signup")]
    Signup {},
    #[route("/settings")]
    Settings {},
    #[route("/goals/history")]
    GoalHistory {},
}

impl From<Screen> for Route {
    fn from(screen: Screen) -> Self {
        match screen {
            Screen::Landing => Route::Landing {},
            Screen::Login => Route::Login {},
            Screen::Signup => Route::Signup {},
            Screen::Settings => Route::Settings {},
            Screen::GoalHistory => Route::GoalHistory {},
        }
    }
}

fn main() {
    // Ignore the error when a subscriber is already installed (hot reload).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .try_init();

    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    use_context_provider(Platform::from_environment);
    let mut notice = use_context_provider(|| Signal::new(Option::<ui::Notice>::None));

    rsx! {
        ui::NoticeBanner { notice: notice(), on_dismiss: move |_| notice.set(None) }
        Router::<Route> {}
    }
}
