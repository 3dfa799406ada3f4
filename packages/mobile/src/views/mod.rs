use dioxus::prelude::*;
use ui::Notice;

mod landing;
pub use landing::Landing;

mod login;
pub use login::Login;

mod signup;
pub use signup::Signup;

mod settings;
pub use settings::Settings;

mod goal_history;
pub use goal_history::GoalHistory;

/// The app-wide alert slot rendered above the router.
pub(crate) fn use_notice() -> Signal<Option<Notice>> {
    use_context::<Signal<Option<Notice>>>()
}
