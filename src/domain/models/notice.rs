use serde_derive::Serialize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// One shot banner shown on the page rendered right after a save or load.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn success(text: &str) -> Notice {
        return Notice {
            level: NoticeLevel::Success,
            text: text.to_string(),
        };
    }

    pub fn warning(text: &str) -> Notice {
        return Notice {
            level: NoticeLevel::Warning,
            text: text.to_string(),
        };
    }

    pub fn error(text: &str) -> Notice {
        return Notice {
            level: NoticeLevel::Error,
            text: text.to_string(),
        };
    }
}
