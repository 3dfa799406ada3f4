use dioxus::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// A blocking alert shown to the user after an action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

/// Banner for the latest notice. Dismissed by clicking it.
#[component]
pub fn NoticeBanner(notice: Option<Notice>, on_dismiss: EventHandler<()>) -> Element {
    let Some(notice) = notice else {
        return rsx! {};
    };
    let class = match notice.level {
        NoticeLevel::Info => "notice notice--info",
        NoticeLevel::Success => "notice notice--success",
        NoticeLevel::Error => "notice notice--error",
    };

    rsx! {
        div {
            class: "{class}",
            role: "alert",
            onclick: move |_| on_dismiss.call(()),
            "{notice.message}"
        }
    }
}
